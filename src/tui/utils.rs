use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const INVERSE: &str = "\x1b[7m";

enum Segment<'a> {
    Ansi(&'a str),
    Grapheme(&'a str),
}

/// Split `text` into CSI escape sequences and graphemes.
fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut result = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        if let Some(len) = ansi_code_len(rest) {
            result.push(Segment::Ansi(&rest[..len]));
            rest = &rest[len..];
            continue;
        }
        let first_len = rest.chars().next().map(char::len_utf8).unwrap_or(1);
        let next_escape = rest[first_len..]
            .find('\x1b')
            .map(|pos| pos + first_len)
            .unwrap_or(rest.len());
        let plain = &rest[..next_escape];
        result.extend(plain.graphemes(true).map(Segment::Grapheme));
        rest = &rest[next_escape..];
    }
    result
}

fn ansi_code_len(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'\x1b' || bytes[1] != b'[' {
        return None;
    }
    bytes[2..]
        .iter()
        .position(|byte| byte.is_ascii_alphabetic())
        .map(|pos| pos + 3)
}

pub fn visible_width(text: &str) -> usize {
    if text.bytes().all(|byte| (0x20..=0x7e).contains(&byte)) {
        return text.len();
    }
    segments(text)
        .into_iter()
        .map(|segment| match segment {
            Segment::Ansi(_) => 0,
            Segment::Grapheme(grapheme) => UnicodeWidthStr::width(grapheme),
        })
        .sum()
}

pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    truncate_to_width_with_ellipsis(text, max_width, "...")
}

pub fn truncate_to_width_with_ellipsis(text: &str, max_width: usize, ellipsis: &str) -> String {
    if visible_width(text) <= max_width {
        return text.to_string();
    }
    let target_width = max_width.saturating_sub(visible_width(ellipsis));
    if target_width == 0 {
        return ellipsis.chars().take(max_width).collect();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for segment in segments(text) {
        match segment {
            Segment::Ansi(code) => result.push_str(code),
            Segment::Grapheme(grapheme) => {
                let width = UnicodeWidthStr::width(grapheme);
                if current_width + width > target_width {
                    break;
                }
                result.push_str(grapheme);
                current_width += width;
            }
        }
    }
    format!("{result}{RESET}{ellipsis}")
}
