//! Emoji to plain-text substitution.
//!
//! Base-14 fonts cannot show emoji, so common ones are replaced by a short
//! textual equivalent before the content is parsed. Anything not in the
//! table is left alone and later encodes as `?`.

use std::borrow::Cow;

/// (emoji, replacement). Longer sequences come before their prefixes.
const EMOJI_TABLE: &[(&str, &str)] = &[
    ("\u{2764}\u{FE0F}", "<3"),
    ("\u{2714}\u{FE0F}", "[v]"),
    ("\u{26A0}\u{FE0F}", "[!]"),
    ("\u{2B50}", "*"),
    ("\u{2705}", "[x]"),
    ("\u{274C}", "[ ]"),
    ("\u{2714}", "[v]"),
    ("\u{2764}", "<3"),
    ("\u{26A0}", "[!]"),
    ("\u{27A1}", "->"),
    ("\u{2B05}", "<-"),
    ("\u{1F600}", ":D"),
    ("\u{1F603}", ":)"),
    ("\u{1F604}", ":D"),
    ("\u{1F60A}", ":)"),
    ("\u{1F642}", ":)"),
    ("\u{1F609}", ";)"),
    ("\u{1F602}", "XD"),
    ("\u{1F622}", ":'("),
    ("\u{1F641}", ":("),
    ("\u{1F62E}", ":O"),
    ("\u{1F44D}", "(+1)"),
    ("\u{1F44E}", "(-1)"),
    ("\u{1F44F}", "(clap)"),
    ("\u{1F64F}", "(pray)"),
    ("\u{1F389}", "(party)"),
    ("\u{1F525}", "(fire)"),
    ("\u{1F4A1}", "(idea)"),
    ("\u{1F4DD}", "(note)"),
    ("\u{1F4CC}", "(pin)"),
    ("\u{1F4C5}", "(date)"),
    ("\u{1F4C6}", "(date)"),
    ("\u{1F680}", "(rocket)"),
    ("\u{1F3AF}", "(target)"),
    ("\u{1F4AA}", "(strong)"),
    ("\u{1F914}", "(thinking)"),
    ("\u{1F440}", "(eyes)"),
    ("\u{1F41B}", "(bug)"),
    ("\u{1F6A7}", "(wip)"),
    ("\u{1F517}", "(link)"),
    ("\u{1F4DA}", "(books)"),
    ("\u{1F4BB}", "(laptop)"),
    ("\u{23F0}", "(alarm)"),
    ("\u{2615}", "(coffee)"),
];

/// Replace known emoji with their text equivalents.
///
/// Borrows the input when it contains nothing to replace.
pub fn replace_emojis(text: &str) -> Cow<'_, str> {
    if text.is_ascii() || !EMOJI_TABLE.iter().any(|(emoji, _)| text.contains(emoji)) {
        return Cow::Borrowed(text);
    }

    let mut out = text.to_string();
    for (emoji, replacement) in EMOJI_TABLE {
        if out.contains(emoji) {
            out = out.replace(emoji, replacement);
        }
    }
    // Stray variation selectors would otherwise encode as '?'
    Cow::Owned(out.replace('\u{FE0F}', ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_borrowed() {
        assert!(matches!(replace_emojis("no emoji here"), Cow::Borrowed(_)));
        assert!(matches!(replace_emojis("café"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_replacements() {
        assert_eq!(replace_emojis("Done \u{2705}"), "Done [x]");
        assert_eq!(replace_emojis("\u{1F680} launch \u{1F389}"), "(rocket) launch (party)");
    }

    #[test]
    fn test_variation_selector_sequences() {
        assert_eq!(replace_emojis("I \u{2764}\u{FE0F} Rust"), "I <3 Rust");
        assert_eq!(replace_emojis("\u{26A0}\u{FE0F} careful"), "[!] careful");
    }

    #[test]
    fn test_unknown_emoji_untouched() {
        assert_eq!(replace_emojis("\u{1F9A9} flamingo"), "\u{1F9A9} flamingo");
    }
}
