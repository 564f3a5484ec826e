//! Interactive shop rendered on the terminal.
//!
//! Arrows move the cursor, Enter is a left click, Space a right click, Esc
//! closes the open panel and `q` quits. The shop reopens whenever nothing
//! is shown, until its Leave button is used.
//!
//! Set `SHOP_LOG=path` to write router logs as JSON lines.

use std::error::Error;
use std::io::{self, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use slot_panels::{
    Button, ClickGesture, ClickRouter, ConfirmPrompt, FileSink, ItemBuilder, LogLevel, Logger,
    Panel, SharedPanel, TerminalHost, ViewerId,
};

type Purchases = Arc<Mutex<Vec<String>>>;

const OFFERS: &[(&str, &str, u32)] = &[
    ("diamond", "&bDiamond", 120),
    ("emerald", "&aEmerald", 80),
    ("gold_ingot", "&6Gold Ingot", 25),
    ("iron_ingot", "&fIron Ingot", 10),
    ("redstone", "&cRedstone", 4),
    ("lapis_lazuli", "&9Lapis", 6),
];

fn main() -> Result<(), Box<dyn Error>> {
    let viewer: ViewerId = "player".to_string();
    let host = TerminalHost::new(io::stdout(), viewer.clone()).with_cell_width(14);
    let mut router = ClickRouter::new(host);
    {
        let config = router.config_mut();
        if let Ok(path) = std::env::var("SHOP_LOG") {
            let sink = FileSink::new(path, 1 << 20)?;
            config.logger = Some(Logger::new(sink).with_min_level(LogLevel::Debug));
        }
        config.enable_metrics();
    }

    let purchases: Purchases = Arc::new(Mutex::new(Vec::new()));
    let leaving = Arc::new(AtomicBool::new(false));
    let shop = build_shop(purchases.clone(), leaving.clone())?;

    let mut stdout = io::stdout();
    enter(&mut stdout)?;
    let result = run(&mut router, &shop, &purchases, &leaving, &viewer);
    router.emit_metrics();
    exit(&mut stdout);
    result?;

    for purchase in purchases.lock().map_err(|_| "purchases poisoned")?.iter() {
        println!("bought {purchase}");
    }
    Ok(())
}

fn run(
    router: &mut ClickRouter<TerminalHost<Stdout>>,
    shop: &SharedPanel,
    purchases: &Purchases,
    leaving: &AtomicBool,
    viewer: &ViewerId,
) -> Result<(), Box<dyn Error>> {
    router.activate(shop, viewer)?;

    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Char('q') => return Ok(()),
            KeyCode::Left => router.host_mut().move_cursor(-1, 0)?,
            KeyCode::Right => router.host_mut().move_cursor(1, 0)?,
            KeyCode::Up => router.host_mut().move_cursor(0, -1)?,
            KeyCode::Down => router.host_mut().move_cursor(0, 1)?,
            KeyCode::Enter => click(router, ClickGesture::Left)?,
            KeyCode::Char(' ') => click(router, ClickGesture::Right)?,
            KeyCode::Esc => {
                router.host_mut().dismiss()?;
            }
            _ => {}
        }

        for close in router.host_mut().take_close_events() {
            router.handle_close(&close)?;
        }

        if !router.host().is_open() {
            if leaving.load(Ordering::Relaxed) {
                return Ok(());
            }
            update_counter(shop, purchases)?;
            router.activate(shop, viewer)?;
        }
    }
}

fn click(
    router: &mut ClickRouter<TerminalHost<Stdout>>,
    gesture: ClickGesture,
) -> slot_panels::Result<()> {
    if let Some(mut event) = router.host().click(gesture) {
        router.handle_click(&mut event)?;
    }
    Ok(())
}

fn build_shop(
    purchases: Purchases,
    leaving: Arc<AtomicBool>,
) -> slot_panels::Result<SharedPanel> {
    let mut panel = Panel::paginated("&8» &6&lGeneral Store");
    for round in 0..20u32 {
        for (kind, name, price) in OFFERS {
            let amount = (round % 4 + 1) as u8 * 8;
            let price = price * u32::from(amount);
            let label = format!("{name} &7x{amount}");
            let item = ItemBuilder::start(*kind)
                .name(&label)
                .amount(amount)
                .lore([format!("&7Price: &e{price} coins"), "&8Click to buy".to_string()]);

            let purchases = purchases.clone();
            panel.add_button(Button::with_handler(item, move |ctx| {
                ctx.cancel();
                let bought = purchases.clone();
                let entry = format!("{label} for {price} coins");
                let prompt = ConfirmPrompt::new("&8Confirm purchase")
                    .description(
                        ItemBuilder::start("paper")
                            .name(&label)
                            .add_lore(&format!("&7Costs &e{price} coins")),
                    )
                    .on_confirm(move |_viewer| {
                        if let Ok(mut list) = bought.lock() {
                            list.push(slot_panels::text::strip(&entry));
                        }
                    })
                    .build();
                ctx.open(prompt.into_shared());
            }));
        }
    }

    if let Some(pages) = panel.pagination_mut() {
        pages.set_toolbar_item(
            8,
            Button::with_handler(ItemBuilder::start("barrier").name("&cLeave"), move |ctx| {
                ctx.cancel();
                leaving.store(true, Ordering::Relaxed);
                ctx.close();
            }),
        )?;
    }
    Ok(panel.into_shared())
}

fn update_counter(shop: &SharedPanel, purchases: &Purchases) -> Result<(), Box<dyn Error>> {
    let count = purchases.lock().map_err(|_| "purchases poisoned")?.len();
    let mut panel = shop.lock().map_err(|_| "shop poisoned")?;
    if let Some(pages) = panel.pagination_mut() {
        pages.set_toolbar_item(
            0,
            Button::inert(
                ItemBuilder::start("chest").name(&format!("&eBasket: &f{count}")),
            ),
        )?;
    }
    Ok(())
}

fn enter(stdout: &mut impl Write) -> io::Result<()> {
    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))
}

fn exit(stdout: &mut impl Write) {
    execute!(stdout, Show, LeaveAlternateScreen).ok();
    terminal::disable_raw_mode().ok();
}
