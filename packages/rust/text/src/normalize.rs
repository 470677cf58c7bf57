//! Normalization of raw extracted document text.
//!
//! Passes run in sequence: page-number lines, disallowed symbols, whitespace.

use std::sync::LazyLock;

use regex::Regex;

/// Normalize raw document text into a single line of clean prose.
pub fn clean_text(raw: &str) -> String {
    let mut result = drop_page_numbers(raw);
    result = strip_symbols(&result);
    result = collapse_whitespace(&result);
    result.trim().to_string()
}

// ---------------------------------------------------------------------------
// Pass 1: Page numbers
// ---------------------------------------------------------------------------

/// Remove lines that consist solely of digits.
fn drop_page_numbers(text: &str) -> String {
    text.lines()
        .filter(|line| {
            let trimmed = line.trim();
            trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Pass 2: Symbols
// ---------------------------------------------------------------------------

/// Keep word characters, whitespace, and `. , ; : ! ? - ( ) /`.
fn strip_symbols(text: &str) -> String {
    static DISALLOWED_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[^\w\s.,;:!?\-()/]").expect("valid regex"));

    DISALLOWED_RE.replace_all(text, "").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 3: Whitespace
// ---------------------------------------------------------------------------

fn collapse_whitespace(text: &str) -> String {
    static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

    WS_RE.replace_all(text, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_runs() {
        let input = "Apply   pressure\n\n\tto the\r\nwound.";
        assert_eq!(clean_text(input), "Apply pressure to the wound.");
    }

    #[test]
    fn drops_page_number_lines() {
        let input = "Keep the patient warm.\n  12  \nMonitor the pulse.\n3";
        assert_eq!(clean_text(input), "Keep the patient warm. Monitor the pulse.");
    }

    #[test]
    fn keeps_numbers_inside_prose() {
        let input = "Give 500 mg every 4 hours.\n42 patients were treated.";
        assert_eq!(
            clean_text(input),
            "Give 500 mg every 4 hours. 42 patients were treated."
        );
    }

    #[test]
    fn strips_disallowed_symbols() {
        let input = "Dose: 5mg/kg (max 4g) – see §3 * note! \"urgent\" ~ok?";
        assert_eq!(clean_text(input), "Dose: 5mg/kg (max 4g) see 3 note! urgent ok?");
    }

    #[test]
    fn keeps_unicode_word_characters() {
        assert_eq!(clean_text("Fièvre élevée; traitement"), "Fièvre élevée; traitement");
    }

    #[test]
    fn empty_and_symbol_only_input() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("  \n 7 \n ** "), "");
    }
}
