//! Integration tests for inline formatting.

use notepress::render::{format_runs, split_inline_code, FormattedRun};
use proptest::prelude::*;

#[test]
fn test_bold_and_italic_are_disjoint() {
    let runs = format_runs("**a** *b*");
    let styled: Vec<_> = runs.iter().filter(|r| r.bold || r.italic).collect();
    assert_eq!(styled.len(), 2);
    assert!(styled.iter().all(|r| !(r.bold && r.italic)));
    assert_eq!((styled[0].text.as_str(), styled[0].bold), ("a", true));
    assert_eq!((styled[1].text.as_str(), styled[1].italic), ("b", true));
}

#[test]
fn test_several_spans_in_one_line() {
    let runs = format_runs("*x* and **y** and *z*");
    let texts: Vec<_> = runs.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["x", " and ", "y", " and ", "z"]);
}

#[test]
fn test_segments_alternate() {
    let segments = split_inline_code("`a` b `c`");
    let kinds: Vec<_> = segments.iter().map(|s| s.is_code).collect();
    assert_eq!(kinds, vec![true, false, true]);
}

proptest! {
    #[test]
    fn prop_text_without_stars_is_one_plain_run(line in "[^*]{0,60}") {
        prop_assert_eq!(format_runs(&line), vec![FormattedRun::plain(line.clone())]);
    }

    #[test]
    fn prop_runs_never_lose_plain_text(words in prop::collection::vec("[a-z]{1,8}", 1..8)) {
        let line = words.join(" ");
        let text: String = format_runs(&line).into_iter().map(|r| r.text).collect();
        prop_assert_eq!(text, line);
    }

    #[test]
    fn prop_backtick_free_text_is_one_segment(line in "[^`]{1,60}") {
        let segments = split_inline_code(&line);
        prop_assert_eq!(segments.len(), 1);
        prop_assert!(!segments[0].is_code);
        prop_assert_eq!(&segments[0].text, &line);
    }
}
