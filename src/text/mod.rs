//! Text helpers for panel titles and item labels.
//!
//! Labels are authored with `&`-prefixed formatting codes (`&e`, `&l`,
//! `&#ffaa00#`) and translated into ANSI SGR sequences before they reach a
//! host. Templates use literal `$placeholder` substitution.

/// Prefix character of a formatting code.
pub const COLOR_CHAR: char = '&';

const CSI: &str = "\x1b[";

/// Replace every occurrence of each placeholder with its value.
///
/// Placeholders are applied once each, in the order given. Matching is
/// literal, not a pattern.
pub fn replace<K, V>(template: &str, pairs: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut out = template.to_string();
    for (placeholder, value) in pairs {
        let placeholder = placeholder.as_ref();
        if placeholder.is_empty() {
            continue;
        }
        out = out.replace(placeholder, value.as_ref());
    }
    out
}

/// [`replace`] applied to every line.
pub fn replace_lines<K, V>(lines: &[String], pairs: &[(K, V)]) -> Vec<String>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    lines.iter().map(|line| replace(line, pairs)).collect()
}

/// Translate `&` formatting codes into ANSI escape sequences.
///
/// Hex codes (`&#RRGGBB#`) become 24-bit foreground colours, legacy codes
/// (`&0`-`&f`, `&k`-`&o`, `&r`) become SGR attributes. Anything else after a
/// `&` is left untouched.
pub fn color(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    let mut idx = 0;

    while idx < chars.len() {
        let ch = chars[idx];
        if ch == COLOR_CHAR {
            if let Some(seq) = hex_sequence(&chars[idx..]) {
                out.push_str(&seq);
                idx += 9;
                continue;
            }
            if let Some(sgr) = chars.get(idx + 1).and_then(|code| legacy_sgr(*code)) {
                out.push_str(CSI);
                out.push_str(sgr);
                out.push('m');
                idx += 2;
                continue;
            }
        }
        out.push(ch);
        idx += 1;
    }

    out
}

/// [`color`] applied to every line.
pub fn color_lines(lines: &[String]) -> Vec<String> {
    lines.iter().map(|line| color(line)).collect()
}

/// Translate formatting codes, then drop every escape sequence.
pub fn strip(text: &str) -> String {
    let colored = color(text);
    let clean = strip_ansi_escapes::strip(colored.as_bytes());
    String::from_utf8_lossy(&clean).into_owned()
}

fn hex_sequence(chars: &[char]) -> Option<String> {
    if chars.len() < 9 || chars[1] != '#' || chars[8] != '#' {
        return None;
    }
    let hex: String = chars[2..8].iter().collect();
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(&hex, 16).ok()?;
    let (r, g, b) = ((value >> 16) & 0xff, (value >> 8) & 0xff, value & 0xff);
    Some(format!("{CSI}38;2;{r};{g};{b}m"))
}

// Colour codes reset any active formatting first, formatting codes stack.
fn legacy_sgr(code: char) -> Option<&'static str> {
    let sgr = match code.to_ascii_lowercase() {
        '0' => "0;30",
        '1' => "0;34",
        '2' => "0;32",
        '3' => "0;36",
        '4' => "0;31",
        '5' => "0;35",
        '6' => "0;33",
        '7' => "0;37",
        '8' => "0;90",
        '9' => "0;94",
        'a' => "0;92",
        'b' => "0;96",
        'c' => "0;91",
        'd' => "0;95",
        'e' => "0;93",
        'f' => "0;97",
        'k' => "5",
        'l' => "1",
        'm' => "9",
        'n' => "4",
        'o' => "3",
        'r' => "0",
        _ => return None,
    };
    Some(sgr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_is_literal() {
        let out = replace(
            "Page $currentPage/$maxPage (.*)",
            &[("$currentPage", "2"), ("$maxPage", "7")],
        );
        assert_eq!(out, "Page 2/7 (.*)");
    }

    #[test]
    fn replace_applies_to_every_occurrence() {
        let out = replace("$n and $n", &[("$n", "x")]);
        assert_eq!(out, "x and x");
    }

    #[test]
    fn replace_lines_keeps_order() {
        let lines = vec!["a $x".to_string(), "b $x".to_string()];
        assert_eq!(replace_lines(&lines, &[("$x", "1")]), vec!["a 1", "b 1"]);
    }

    #[test]
    fn legacy_codes_translate() {
        assert_eq!(color("&eHi&r"), "\x1b[0;93mHi\x1b[0m");
        assert_eq!(color("&LBold"), "\x1b[1mBold");
    }

    #[test]
    fn unknown_codes_stay_literal() {
        assert_eq!(color("Fish & chips &z"), "Fish & chips &z");
        assert_eq!(color("trailing &"), "trailing &");
    }

    #[test]
    fn hex_codes_translate() {
        assert_eq!(color("&#ff8000#Gold"), "\x1b[38;2;255;128;0mGold");
        assert_eq!(color("&#ff80zz#x"), "&#ff80zz#x");
    }

    #[test]
    fn strip_removes_all_formatting() {
        assert_eq!(strip("&7Page &e1&8/&e3"), "Page 1/3");
        assert_eq!(strip("&#123456#&lHex"), "Hex");
    }
}
