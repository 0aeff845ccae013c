pub mod config;
pub mod record;

pub use config::MuseConfig;
pub use record::{Record, TIMESTAMP_FORMAT};

/// Shorten `text` to at most `max_chars` characters, appending `…` when cut.
///
/// Counts chars rather than bytes so multi-byte prompts never split mid-codepoint.
pub fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let cut: String = flat.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("a flying car", 40), "a flying car");
    }

    #[test]
    fn test_preview_truncates_and_marks() {
        assert_eq!(preview("abcdef ghij", 6), "abcdef…");
    }

    #[test]
    fn test_preview_collapses_newlines() {
        assert_eq!(preview("line one\n\nline two", 80), "line one line two");
    }

    #[test]
    fn test_preview_multibyte_safe() {
        let text = "会飞的汽车会飞的汽车";
        assert_eq!(preview(text, 3), "会飞的…");
    }
}
