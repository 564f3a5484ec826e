use std::sync::{Arc, Mutex};

use slot_panels::{
    Button, ClickDisposition, ClickGesture, ClickRouter, CloseDisposition, ConfirmPrompt, Item,
    ItemBuilder, MemoryHost, Panel, PanelState, SharedPanel, ViewerId, text,
};

const VIEWER: &str = "alex";

fn viewer() -> ViewerId {
    VIEWER.to_string()
}

fn shop(entries: usize) -> SharedPanel {
    let mut panel = Panel::paginated("&6Shop");
    for idx in 0..entries {
        panel.add_button(Button::new(
            ItemBuilder::start("emerald").name(&format!("Offer {idx}")),
        ));
    }
    panel.into_shared()
}

fn current_page(panel: &SharedPanel) -> usize {
    panel
        .lock()
        .unwrap()
        .pagination()
        .map(|pages| pages.current_page())
        .unwrap()
}

fn click(router: &mut ClickRouter<MemoryHost>, slot: i32, gesture: ClickGesture) -> bool {
    let mut event = router.host().click(VIEWER, slot, gesture).unwrap();
    let disposition = router.handle_click(&mut event).unwrap();
    assert_eq!(disposition, ClickDisposition::Handled);
    event.is_cancelled()
}

fn shown_label(router: &ClickRouter<MemoryHost>, slot: usize) -> Option<String> {
    let (_, container) = router.host().open_container(VIEWER)?;
    container.item(slot).map(|item| text::strip(item.label()))
}

#[test]
fn forward_on_last_page_wraps_to_first() {
    let panel = shop(100);
    let mut router = ClickRouter::new(MemoryHost::new());
    router.activate(&panel, &viewer()).unwrap();

    assert!(click(&mut router, 49, ClickGesture::Right));
    assert_eq!(current_page(&panel), 1);
    assert!(click(&mut router, 49, ClickGesture::Right));
    assert_eq!(current_page(&panel), 2);
    assert_eq!(shown_label(&router, 49).as_deref(), Some("Page 3/3"));

    assert!(click(&mut router, 49, ClickGesture::Right));
    assert_eq!(current_page(&panel), 0);
    assert_eq!(shown_label(&router, 0).as_deref(), Some("Offer 0"));
}

#[test]
fn back_on_first_page_wraps_to_last() {
    let panel = shop(100);
    let mut router = ClickRouter::new(MemoryHost::new());
    router.activate(&panel, &viewer()).unwrap();

    assert!(click(&mut router, 49, ClickGesture::Left));
    assert_eq!(current_page(&panel), 2);
    assert_eq!(shown_label(&router, 0).as_deref(), Some("Offer 90"));
    assert_eq!(shown_label(&router, 9), Some("Offer 99".to_string()));
    assert_eq!(shown_label(&router, 10), None);

    assert!(click(&mut router, 49, ClickGesture::Left));
    assert_eq!(current_page(&panel), 1);
}

#[test]
fn other_gestures_only_refresh() {
    let panel = shop(60);
    let mut router = ClickRouter::new(MemoryHost::new());
    let first = router.activate(&panel, &viewer()).unwrap();

    assert!(click(&mut router, 49, ClickGesture::Middle));
    assert_eq!(current_page(&panel), 0);
    assert_ne!(router.open_container(VIEWER), Some(first));
}

#[test]
fn pages_show_every_entry_exactly_once() {
    let panel = shop(51);
    let mut router = ClickRouter::new(MemoryHost::new());
    router.activate(&panel, &viewer()).unwrap();

    let mut seen = Vec::new();
    for _ in 0..2 {
        let (_, container) = router.host().open_container(VIEWER).unwrap();
        seen.extend(
            container
                .items
                .range(0..45)
                .map(|(_, item)| text::strip(item.label())),
        );
        click(&mut router, 49, ClickGesture::Right);
    }

    assert_eq!(seen.len(), 51);
    let mut unique = seen.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 51);
}

#[test]
fn content_clicks_follow_the_visible_page() {
    let picked = Arc::new(Mutex::new(Vec::new()));
    let mut panel = Panel::paginated("Pick");
    for idx in 0..50 {
        let picked = picked.clone();
        panel.add_button(Button::with_handler(Item::new("paper"), move |ctx| {
            ctx.cancel();
            picked.lock().unwrap().push(idx);
        }));
    }
    let panel = panel.into_shared();
    let mut router = ClickRouter::new(MemoryHost::new());
    router.activate(&panel, &viewer()).unwrap();

    click(&mut router, 3, ClickGesture::Left);
    click(&mut router, 49, ClickGesture::Right);
    click(&mut router, 3, ClickGesture::Left);

    assert_eq!(*picked.lock().unwrap(), vec![3, 48]);
}

#[test]
fn toolbar_buttons_stay_put_across_pages() {
    let closes = Arc::new(Mutex::new(0));
    let mut panel = Panel::paginated("Shop");
    for idx in 0..70 {
        panel.add_button(Button::new(Item::new(format!("item{idx}"))));
    }
    panel
        .pagination_mut()
        .unwrap()
        .set_toolbar_item(
            8,
            Button::with_handler(Item::new("barrier"), |ctx| {
                ctx.cancel();
                ctx.close();
            }),
        )
        .unwrap();
    let counter = closes.clone();
    panel.set_on_close(move |_panel, _event| *counter.lock().unwrap() += 1);
    let panel = panel.into_shared();
    let mut router = ClickRouter::new(MemoryHost::new());
    router.activate(&panel, &viewer()).unwrap();

    click(&mut router, 49, ClickGesture::Right);
    let (_, container) = router.host().open_container(VIEWER).unwrap();
    assert_eq!(container.item(53).map(|i| i.kind.as_str()), Some("barrier"));

    click(&mut router, 53, ClickGesture::Left);
    assert!(router.host().open_container(VIEWER).is_none());
    let events = router.host_mut().take_close_events();
    let dispositions: Vec<_> = events
        .iter()
        .map(|event| router.handle_close(event).unwrap())
        .collect();
    assert!(dispositions.contains(&CloseDisposition::Notified));
    assert_eq!(*closes.lock().unwrap(), 1);
    assert_eq!(panel.lock().unwrap().state(), PanelState::Closed);
}

#[test]
fn single_page_label_is_inert() {
    let panel = shop(3);
    let mut router = ClickRouter::new(MemoryHost::new());
    let container = router.activate(&panel, &viewer()).unwrap();

    assert_eq!(shown_label(&router, 49).as_deref(), Some("Page 1/1"));
    assert!(click(&mut router, 49, ClickGesture::Right));
    assert_eq!(current_page(&panel), 0);
    assert_eq!(router.open_container(VIEWER), Some(container));
}

#[test]
fn confirm_answer_closes_without_cancelling() {
    let answers = Arc::new(Mutex::new(Vec::new()));
    let (yes, no) = (answers.clone(), answers.clone());
    let prompt = ConfirmPrompt::new("Delete home?")
        .on_confirm(move |viewer| yes.lock().unwrap().push(format!("yes:{viewer}")))
        .on_cancel(move |viewer| no.lock().unwrap().push(format!("no:{viewer}")))
        .build()
        .into_shared();
    let mut router = ClickRouter::new(MemoryHost::new());
    router.activate(&prompt, &viewer()).unwrap();

    assert!(click(&mut router, ConfirmPrompt::CONFIRM_SLOT, ClickGesture::Left));
    for event in router.host_mut().take_close_events() {
        assert_eq!(
            router.handle_close(&event).unwrap(),
            CloseDisposition::Suppressed
        );
    }

    assert_eq!(*answers.lock().unwrap(), vec!["yes:alex".to_string()]);
}

#[test]
fn dismissed_confirm_counts_as_cancel() {
    let answers = Arc::new(Mutex::new(Vec::new()));
    let no = answers.clone();
    let prompt = ConfirmPrompt::new("Delete home?")
        .on_cancel(move |viewer| no.lock().unwrap().push(format!("no:{viewer}")))
        .build()
        .into_shared();
    let mut router = ClickRouter::new(MemoryHost::new());
    router.activate(&prompt, &viewer()).unwrap();

    let close = router.host_mut().dismiss(VIEWER).unwrap();
    assert_eq!(
        router.handle_close(&close).unwrap(),
        CloseDisposition::Notified
    );
    assert_eq!(*answers.lock().unwrap(), vec!["no:alex".to_string()]);

    router.activate(&prompt, &viewer()).unwrap();
    click(&mut router, ConfirmPrompt::CANCEL_SLOT, ClickGesture::Left);
    for event in router.host_mut().take_close_events() {
        router.handle_close(&event).unwrap();
    }
    assert_eq!(
        *answers.lock().unwrap(),
        vec!["no:alex".to_string(), "no:alex".to_string()]
    );
}
