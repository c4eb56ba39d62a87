//! Cleanup passes applied to resolved annotation text.
//!
//! Every pass is a pure `&str -> String` function. They run in a fixed order:
//! highlighted-text normalization (derived text only), boundary-chunk
//! stripping, then pollution-character removal. See [`normalize_derived`] and
//! [`normalize_literal`] for the two compositions.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

static SMART_DOUBLE_QUOTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[\u{201C}\u{201D}]").expect("valid smart quote regex"));

/// Dangling tail of the previous sentence: `x. `, `? `, `o `, or a lone space.
static LEADING_CHUNK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{Lowercase}?[.?!]? ").expect("valid leading chunk regex"));

/// Dangling head of the next sentence: ` W` or a lone trailing space.
static TRAILING_CHUNK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" \p{Alphabetic}?$").expect("valid trailing chunk regex"));

/// Collapse whitespace runs to one space and fold typographic double quotes
/// to `"`.
pub fn normalize_highlighted_text(text: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(text, " ");
    SMART_DOUBLE_QUOTES.replace_all(&collapsed, "\"").into_owned()
}

/// Remove fragments of neighbouring sentences captured at the selection
/// edges, then unwrap enclosing double quotes.
pub fn strip_unwanted_chunks(text: &str) -> String {
    let text = LEADING_CHUNK.replacen(text, 1, "");
    let text = TRAILING_CHUNK.replacen(&text, 1, "");
    strip_quotes(&text)
}

/// Replace tabs with spaces, then unwrap enclosing double quotes.
pub fn remove_pollution_chars(text: &str) -> String {
    strip_quotes(&text.replace('\t', " "))
}

/// Strip one layer of enclosing double quotes and trim what was inside.
///
/// Text that does not both start and end with `"` is returned unchanged;
/// a lone `"` is not a pair.
pub fn strip_quotes(text: &str) -> String {
    match text
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => inner.trim().to_string(),
        None => text.to_string(),
    }
}

/// Full pipeline for text derived from a highlighted region.
pub fn normalize_derived(raw: &str) -> String {
    normalize_literal(&normalize_highlighted_text(raw))
}

/// Full pipeline for literal annotation contents.
pub fn normalize_literal(text: &str) -> String {
    remove_pollution_chars(&strip_unwanted_chunks(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_quotes_unwraps_pair() {
        assert_eq!(strip_quotes("\"Awesome!\""), "Awesome!");
    }

    #[test]
    fn strip_quotes_trims_inside() {
        assert_eq!(strip_quotes("\"  spaced \""), "spaced");
    }

    #[test]
    fn strip_quotes_empty_is_noop() {
        assert_eq!(strip_quotes(""), "");
    }

    #[test]
    fn strip_quotes_lone_quote_unchanged() {
        assert_eq!(strip_quotes("\""), "\"");
    }

    #[test]
    fn strip_quotes_pair_of_quotes_becomes_empty() {
        assert_eq!(strip_quotes("\"\""), "");
    }

    #[test]
    fn strip_quotes_unbalanced_unchanged() {
        assert_eq!(strip_quotes("\"open"), "\"open");
        assert_eq!(strip_quotes("close\""), "close\"");
    }

    #[test]
    fn strip_quotes_removes_one_layer_only() {
        assert_eq!(strip_quotes("\"\"nested\"\""), "\"nested\"");
    }

    #[test]
    fn strip_unwanted_chunks_trailing_letter() {
        assert_eq!(strip_unwanted_chunks("Be them. W"), "Be them.");
    }

    #[test]
    fn strip_unwanted_chunks_leading_fragment() {
        assert_eq!(strip_unwanted_chunks("o? When"), "When");
    }

    #[test]
    fn strip_unwanted_chunks_clean_text_unchanged() {
        assert_eq!(strip_unwanted_chunks("I can be"), "I can be");
    }

    #[test]
    fn strip_unwanted_chunks_unwraps_quotes() {
        assert_eq!(strip_unwanted_chunks("\"Awesome!\""), "Awesome!");
    }

    #[test]
    fn strip_unwanted_chunks_leading_punctuation_only() {
        assert_eq!(strip_unwanted_chunks(". Next sentence"), "Next sentence");
    }

    #[test]
    fn strip_unwanted_chunks_non_ascii_letters() {
        assert_eq!(strip_unwanted_chunks("ж. Пет"), "Пет");
        assert_eq!(strip_unwanted_chunks("Пет ж"), "Пет");
    }

    #[test]
    fn strip_unwanted_chunks_only_first_match() {
        assert_eq!(strip_unwanted_chunks("a b. c"), "b.");
    }

    #[test]
    fn highlighted_text_collapses_whitespace() {
        assert_eq!(
            normalize_highlighted_text("one  two\n\tthree\r\nfour"),
            "one two three four"
        );
    }

    #[test]
    fn highlighted_text_folds_smart_quotes() {
        assert_eq!(
            normalize_highlighted_text("\u{201C}quoted\u{201D}"),
            "\"quoted\""
        );
    }

    #[test]
    fn pollution_tabs_become_spaces() {
        assert_eq!(remove_pollution_chars("web\tbrowser"), "web browser");
        assert_eq!(remove_pollution_chars("\"tabbed\tquote\""), "tabbed quote");
    }

    #[test]
    fn derived_pipeline_end_to_end() {
        let raw = "s. \u{201C}seven eight\nnine\u{201D} T";
        assert_eq!(normalize_derived(raw), "seven eight nine");
    }

    #[test]
    fn derived_pipeline_drops_surrounding_spaces() {
        assert_eq!(normalize_derived("\n One Two \n"), "One Two");
    }

    #[test]
    fn literal_pipeline_keeps_newlines() {
        assert_eq!(normalize_literal("line one\nline two"), "line one\nline two");
    }

    #[test]
    fn normalization_is_idempotent_on_clean_sentences() {
        let samples = [
            "The programs that a home user needs are email, web browser, pdf file viewer",
            "Be them.",
            "When",
            "seven eight nine ten eleven twelve",
            "Awesome!",
            "Пет",
        ];
        for sample in samples {
            let once = normalize_literal(sample);
            assert_eq!(normalize_literal(&once), once, "not idempotent: {sample:?}");
        }
    }
}
