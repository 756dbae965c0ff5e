//! Key identification for legacy terminal input sequences.
//!
//! Components receive raw input strings and test them with
//! `matches_key(data, "ctrl+e")` style identifiers.

const ESC: &str = "\x1b";

/// Parse raw input into a key identifier such as `up`, `space` or `ctrl+s`.
///
/// Printable input that is not a named key returns `None`.
pub fn parse_key(data: &str) -> Option<String> {
    let named = match data {
        "\x1b[A" | "\x1bOA" => "up",
        "\x1b[B" | "\x1bOB" => "down",
        "\x1b[C" | "\x1bOC" => "right",
        "\x1b[D" | "\x1bOD" => "left",
        "\x1b[H" | "\x1bOH" | "\x1b[1~" => "home",
        "\x1b[F" | "\x1bOF" | "\x1b[4~" => "end",
        "\x1b[5~" => "pageup",
        "\x1b[6~" => "pagedown",
        "\x1b[3~" => "delete",
        "\r" | "\n" => "enter",
        "\t" => "tab",
        "\x1b[Z" => "shift+tab",
        " " => "space",
        "\x7f" | "\x08" => "backspace",
        ESC => "escape",
        _ => {
            let mut chars = data.chars();
            let ch = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            let code = ch as u32;
            // ctrl+a ..= ctrl+z map to 0x01 ..= 0x1a, minus the named ones above
            if (1..=26).contains(&code) {
                let letter = char::from_u32(code + 96)?;
                return Some(format!("ctrl+{letter}"));
            }
            return None;
        }
    };
    Some(named.to_string())
}

/// Check if `data` is the key named by `key_id`.
pub fn matches_key(data: &str, key_id: &str) -> bool {
    match parse_key(data) {
        Some(parsed) => parsed == normalize_key_id(key_id),
        None => false,
    }
}

fn normalize_key_id(key_id: &str) -> String {
    let lower = key_id.to_lowercase();
    match lower.as_str() {
        "esc" => "escape".to_string(),
        "return" => "enter".to_string(),
        _ => lower,
    }
}

/// True for input that should be typed into a text field.
pub fn is_printable(data: &str) -> bool {
    !data.is_empty()
        && data
            .chars()
            .all(|c| !(c as u32 <= 31 || c as u32 == 0x7f || (0x80..=0x9f).contains(&(c as u32))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_keys() {
        assert!(matches_key("\x1b[A", "up"));
        assert!(matches_key("\x1bOB", "down"));
        assert!(!matches_key("\x1b[A", "down"));
    }

    #[test]
    fn test_ctrl_letters() {
        assert_eq!(parse_key("\x05").as_deref(), Some("ctrl+e"));
        assert!(matches_key("\x13", "ctrl+s"));
        assert!(matches_key("\x03", "ctrl+c"));
    }

    #[test]
    fn test_named_keys_win_over_ctrl_letters() {
        assert!(matches_key("\t", "tab"));
        assert!(matches_key("\r", "enter"));
        assert!(matches_key("\x1b", "esc"));
    }

    #[test]
    fn test_printable() {
        assert!(is_printable("a"));
        assert!(is_printable("é"));
        assert!(!is_printable("\x1b[A"));
        assert!(!is_printable(""));
        assert!(parse_key("a").is_none());
    }
}
