//! Inline formatting: `**bold**`, `*italic*` and `` `code` `` spans.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `**text**`
    static ref RE_BOLD: Regex = Regex::new(r"\*\*(.+?)\*\*").unwrap();

    /// `*text*` candidate; neighbours are checked separately since the
    /// regex engine has no lookaround
    static ref RE_ITALIC: Regex = Regex::new(r"\*([^*\n]+?)\*").unwrap();
}

/// A span of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedRun {
    /// Text without markers
    pub text: String,
    /// Bold
    pub bold: bool,
    /// Italic
    pub italic: bool,
}

impl FormattedRun {
    /// Unstyled run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }

    fn styled(text: &str, bold: bool, italic: bool) -> Self {
        Self {
            text: text.to_string(),
            bold,
            italic,
        }
    }
}

/// A backtick-delimited segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSegment {
    /// Segment text
    pub text: String,
    /// Whether the segment was inside backticks
    pub is_code: bool,
}

/// Span found by one of the scanners: (start, end, inner text range).
type Span = (usize, usize, usize, usize);

fn find_bold(line: &str, from: usize) -> Option<Span> {
    let caps = RE_BOLD.captures_at(line, from)?;
    let (whole, inner) = (caps.get(0)?, caps.get(1)?);
    Some((whole.start(), whole.end(), inner.start(), inner.end()))
}

/// Nearest `*x*` at or after `from` whose asterisks are not part of `**`.
fn find_italic(line: &str, mut from: usize) -> Option<Span> {
    let bytes = line.as_bytes();
    while from < line.len() {
        let caps = RE_ITALIC.captures_at(line, from)?;
        let (whole, inner) = (caps.get(0)?, caps.get(1)?);
        let star_before = whole.start() > 0 && bytes[whole.start() - 1] == b'*';
        let star_after = bytes.get(whole.end()) == Some(&b'*');
        if !star_before && !star_after {
            return Some((whole.start(), whole.end(), inner.start(), inner.end()));
        }
        // '*' is one byte, so start + 1 is a char boundary.
        from = whole.start() + 1;
    }
    None
}

/// Split a line into bold, italic and plain runs, left to right.
///
/// At each position the nearest bold and italic spans are found and the one
/// starting first wins. An empty line gives one empty plain run.
pub fn format_runs(line: &str) -> Vec<FormattedRun> {
    if !line.contains('*') {
        return vec![FormattedRun::plain(line)];
    }

    let mut runs = Vec::new();
    let mut pos = 0;

    while pos < line.len() {
        let bold = find_bold(line, pos);
        let italic = find_italic(line, pos);

        let (span, is_bold) = match (bold, italic) {
            (Some(b), Some(i)) if i.0 < b.0 => (i, false),
            (Some(b), _) => (b, true),
            (None, Some(i)) => (i, false),
            (None, None) => break,
        };
        let (start, end, inner_start, inner_end) = span;

        if start > pos {
            runs.push(FormattedRun::plain(&line[pos..start]));
        }
        runs.push(FormattedRun::styled(&line[inner_start..inner_end], is_bold, !is_bold));
        pos = end;
    }

    if pos < line.len() {
        runs.push(FormattedRun::plain(&line[pos..]));
    }
    if runs.is_empty() {
        runs.push(FormattedRun::plain(""));
    }
    runs
}

/// Split a line on backticks into alternating plain and code segments.
///
/// With an odd number of backticks the text after the last one is plain and
/// keeps its backtick. Empty segments are dropped.
pub fn split_inline_code(line: &str) -> Vec<InlineSegment> {
    let parts: Vec<&str> = line.split('`').collect();
    let dangling = parts.len() % 2 == 0;
    let mut segments: Vec<InlineSegment> = Vec::new();

    for (i, part) in parts.iter().enumerate() {
        let is_last = i + 1 == parts.len();
        let (text, is_code) = if dangling && is_last {
            (format!("`{}", part), false)
        } else {
            (part.to_string(), i % 2 == 1)
        };
        if text.is_empty() {
            continue;
        }
        match segments.last_mut() {
            Some(prev) if !prev.is_code && !is_code => prev.text.push_str(&text),
            _ => segments.push(InlineSegment { text, is_code }),
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, bold: bool, italic: bool) -> FormattedRun {
        FormattedRun::styled(text, bold, italic)
    }

    #[test]
    fn test_plain_line_is_one_run() {
        assert_eq!(format_runs("Hello world"), vec![FormattedRun::plain("Hello world")]);
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(format_runs(""), vec![FormattedRun::plain("")]);
    }

    #[test]
    fn test_bold_then_italic() {
        assert_eq!(
            format_runs("**a** *b*"),
            vec![run("a", true, false), run(" ", false, false), run("b", false, true)]
        );
    }

    #[test]
    fn test_bold_is_not_split_into_italics() {
        assert_eq!(format_runs("**x**"), vec![run("x", true, false)]);
        assert_eq!(
            format_runs("say **loud** now"),
            vec![
                run("say ", false, false),
                run("loud", true, false),
                run(" now", false, false)
            ]
        );
    }

    #[test]
    fn test_italic_first() {
        assert_eq!(
            format_runs("*soft* then **hard**"),
            vec![
                run("soft", false, true),
                run(" then ", false, false),
                run("hard", true, false)
            ]
        );
    }

    #[test]
    fn test_unmatched_markers_stay_plain() {
        assert_eq!(format_runs("2 * 3 = 6"), vec![FormattedRun::plain("2 * 3 = 6")]);
        assert_eq!(format_runs("**open"), vec![FormattedRun::plain("**open")]);
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(
            format_runs("café *crème* ünd"),
            vec![run("café ", false, false), run("crème", false, true), run(" ünd", false, false)]
        );
    }

    #[test]
    fn test_split_inline_code() {
        assert_eq!(
            split_inline_code("run `cargo build` now"),
            vec![
                InlineSegment { text: "run ".into(), is_code: false },
                InlineSegment { text: "cargo build".into(), is_code: true },
                InlineSegment { text: " now".into(), is_code: false },
            ]
        );
    }

    #[test]
    fn test_split_inline_code_dangling_backtick() {
        assert_eq!(
            split_inline_code("a `b` c `d"),
            vec![
                InlineSegment { text: "a ".into(), is_code: false },
                InlineSegment { text: "b".into(), is_code: true },
                InlineSegment { text: " c `d".into(), is_code: false },
            ]
        );
    }

    #[test]
    fn test_split_inline_code_drops_empty_segments() {
        assert_eq!(
            split_inline_code("`x`"),
            vec![InlineSegment { text: "x".into(), is_code: true }]
        );
        assert!(split_inline_code("``").is_empty());
    }
}
