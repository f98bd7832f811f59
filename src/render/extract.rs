//! Structural block extraction.
//!
//! Fenced code blocks and pipe tables are lifted out of the note content
//! before line-by-line layout. Each lifted span is replaced by a single
//! placeholder line; the block itself is kept in [`Extraction::blocks`]
//! under that placeholder.
//!
//! Malformed input never fails: an unterminated fence swallows the rest of
//! the note, and table rows with the wrong cell count end the table and stay
//! in the line stream as text.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Opening or closing fence with an optional language tag
    static ref RE_FENCE: Regex = Regex::new(r"^```\s*([A-Za-z0-9_+#.\-]*)\s*$").unwrap();

    /// Table separator cell such as `---`, `:--`, `:-:`
    static ref RE_SEPARATOR_CELL: Regex = Regex::new(r"^:?-+:?$").unwrap();
}

/// A structural block lifted out of the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedBlock {
    /// Fenced code; `content` is the interior lines joined by `\n`.
    CodeBlock {
        /// Language tag after the opening fence, possibly empty
        language: String,
        /// Raw interior lines
        content: String,
    },
    /// Pipe table; every row has `headers.len()` cells.
    Table {
        /// Header cells, bold markers stripped
        headers: Vec<String>,
        /// Data rows, bold markers stripped
        rows: Vec<Vec<String>>,
    },
}

/// Content with its structural blocks replaced by placeholder lines.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Processed content, lines joined by `\n`
    pub content: String,
    /// Placeholder -> block, in document order
    pub blocks: IndexMap<String, ExtractedBlock>,
}

impl Extraction {
    /// Block whose placeholder is exactly this line (surrounding whitespace ignored).
    pub fn block_for_line(&self, line: &str) -> Option<&ExtractedBlock> {
        self.blocks.get(line.trim())
    }

    /// Lines of the processed content.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }
}

/// Extract code blocks, then tables from the remaining content.
pub fn extract(content: &str) -> Extraction {
    let code = extract_code_blocks(content);
    let tables = extract_tables(&code.content);

    let mut blocks = code.blocks;
    blocks.extend(tables.blocks);

    log::debug!(
        "Extracted {} structural blocks from {} lines",
        blocks.len(),
        content.lines().count()
    );

    Extraction {
        content: tables.content,
        blocks,
    }
}

/// Lift fenced code blocks.
pub fn extract_code_blocks(content: &str) -> Extraction {
    let mut out: Vec<String> = Vec::new();
    let mut blocks = IndexMap::new();
    // (placeholder, language, interior lines) of the fence being read
    let mut open: Option<(String, String, Vec<&str>)> = None;

    for line in content.lines() {
        let fence = RE_FENCE.captures(line.trim());

        match fence {
            Some(caps) => match open.take() {
                Some((token, language, body)) => {
                    blocks.insert(token, code_block(language, &body));
                },
                None => {
                    let token = placeholder();
                    out.push(token.clone());
                    let language = caps.get(1).map_or("", |m| m.as_str()).to_string();
                    open = Some((token, language, Vec::new()));
                },
            },
            None => match open.as_mut() {
                Some((_, _, body)) => body.push(line),
                None => out.push(line.to_string()),
            },
        }
    }

    if let Some((token, language, body)) = open {
        log::debug!("Unterminated code fence absorbed {} trailing lines", body.len());
        blocks.insert(token, code_block(language, &body));
    }

    Extraction {
        content: out.join("\n"),
        blocks,
    }
}

fn code_block(language: String, body: &[&str]) -> ExtractedBlock {
    ExtractedBlock::CodeBlock {
        language,
        content: body.join("\n"),
    }
}

/// Lift pipe tables.
///
/// A header is a line bounded by `|` that either carries `**` markers or is
/// followed by a separator row with as many cells. The separator, when
/// present, is dropped.
pub fn extract_tables(content: &str) -> Extraction {
    let lines: Vec<&str> = content.lines().collect();
    let mut out: Vec<String> = Vec::new();
    let mut blocks = IndexMap::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let has_separator = lines.get(i + 1).is_some_and(|next| {
            is_pipe_row(line)
                && is_separator_row(next)
                && split_cells(next).len() == split_cells(line).len()
        });

        if !is_pipe_row(line) || !(line.contains("**") || has_separator) {
            out.push(line.to_string());
            i += 1;
            continue;
        }

        let headers = split_cells(line);
        i += if has_separator { 2 } else { 1 };

        let mut rows = Vec::new();
        while let Some(row) = lines.get(i).filter(|l| is_pipe_row(l)) {
            let cells = split_cells(row);
            if cells.len() != headers.len() {
                log::debug!(
                    "Table row has {} cells, header has {}; ending table",
                    cells.len(),
                    headers.len()
                );
                break;
            }
            rows.push(cells);
            i += 1;
        }

        let token = placeholder();
        out.push(token.clone());
        blocks.insert(token, ExtractedBlock::Table { headers, rows });
    }

    Extraction {
        content: out.join("\n"),
        blocks,
    }
}

fn placeholder() -> String {
    format!("[[notepress-block:{}]]", uuid::Uuid::new_v4().simple())
}

fn is_pipe_row(line: &str) -> bool {
    let line = line.trim();
    line.len() >= 2 && line.starts_with('|') && line.ends_with('|')
}

fn is_separator_row(line: &str) -> bool {
    if !is_pipe_row(line) {
        return false;
    }
    let cells = split_cells(line);
    !cells.is_empty() && cells.iter().all(|c| RE_SEPARATOR_CELL.is_match(c))
}

/// Cells of a `|a|b|` row, trimmed, with `**` removed.
fn split_cells(line: &str) -> Vec<String> {
    let line = line.trim();
    let inner = &line[1..line.len() - 1];
    inner
        .split('|')
        .map(|cell| cell.replace("**", "").trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only_block(extraction: &Extraction) -> &ExtractedBlock {
        assert_eq!(extraction.blocks.len(), 1);
        extraction.blocks.values().next().unwrap()
    }

    #[test]
    fn test_code_block_round_trip() {
        let content = "intro\n```rust\nfn main() {\n\n    println!(\"hi\");\n}\n```\noutro";
        let extraction = extract(content);
        let (token, block) = extraction.blocks.first().unwrap();

        assert_eq!(
            *block,
            ExtractedBlock::CodeBlock {
                language: "rust".to_string(),
                content: "fn main() {\n\n    println!(\"hi\");\n}".to_string(),
            }
        );
        let lines: Vec<_> = extraction.lines().collect();
        assert_eq!(lines, vec!["intro", token.as_str(), "outro"]);
        assert!(!extraction.content.contains("```"));
    }

    #[test]
    fn test_fence_without_language() {
        let extraction = extract("```\nplain\n```");
        match only_block(&extraction) {
            ExtractedBlock::CodeBlock { language, content } => {
                assert!(language.is_empty());
                assert_eq!(content, "plain");
            },
            other => panic!("unexpected block {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_fence_takes_the_rest() {
        let extraction = extract("before\n```python\nx = 1\n\ny = 2");
        match only_block(&extraction) {
            ExtractedBlock::CodeBlock { content, .. } => assert_eq!(content, "x = 1\n\ny = 2"),
            other => panic!("unexpected block {:?}", other),
        }
        assert_eq!(extraction.lines().count(), 2);
    }

    #[test]
    fn test_indented_fence_and_text_after_backticks() {
        // "```js code" is not a fence: the tag may not contain spaces.
        let extraction = extract("  ```js\nlet a;\n  ```\n```js code");
        assert_eq!(extraction.blocks.len(), 1);
        assert!(extraction.content.ends_with("```js code"));
    }

    #[test]
    fn test_ragged_table_row_stays_text() {
        let extraction = extract("|A|B|\n|---|---|\n|1|2|\n|3|");
        let (token, block) = extraction.blocks.first().unwrap();
        assert_eq!(
            *block,
            ExtractedBlock::Table {
                headers: vec!["A".to_string(), "B".to_string()],
                rows: vec![vec!["1".to_string(), "2".to_string()]],
            }
        );
        let lines: Vec<_> = extraction.lines().collect();
        assert_eq!(lines, vec![token.as_str(), "|3|"]);
    }

    #[test]
    fn test_separator_must_match_header_width() {
        let extraction = extract("|**A**|**B**|\n|---|\n|1|2|");
        let (token, block) = extraction.blocks.first().unwrap();
        assert_eq!(
            *block,
            ExtractedBlock::Table {
                headers: vec!["A".to_string(), "B".to_string()],
                rows: Vec::new(),
            }
        );
        let lines: Vec<_> = extraction.lines().collect();
        assert_eq!(lines, vec![token.as_str(), "|---|", "|1|2|"]);

        let plain = extract("|A|B|\n|---|");
        assert!(plain.blocks.is_empty());
        assert_eq!(plain.content, "|A|B|\n|---|");
    }

    #[test]
    fn test_bold_header_without_separator() {
        let extraction = extract("| **Name** | **Qty** |\n| apples | 3 |\nafter");
        match only_block(&extraction) {
            ExtractedBlock::Table { headers, rows } => {
                assert_eq!(headers, &["Name", "Qty"]);
                assert_eq!(rows, &[vec!["apples".to_string(), "3".to_string()]]);
            },
            other => panic!("unexpected block {:?}", other),
        }
    }

    #[test]
    fn test_plain_pipe_line_is_text() {
        let extraction = extract("|just a line|\nnext");
        assert!(extraction.blocks.is_empty());
        assert_eq!(extraction.content, "|just a line|\nnext");
    }

    #[test]
    fn test_tables_inside_code_are_left_alone() {
        let content = "```\n|**A**|**B**|\n|---|---|\n```\n|**X**|\n|---|\n|1|";
        let extraction = extract(content);
        assert_eq!(extraction.blocks.len(), 2);
        let kinds: Vec<_> = extraction
            .blocks
            .values()
            .map(|b| matches!(b, ExtractedBlock::Table { .. }))
            .collect();
        assert_eq!(kinds, vec![false, true]);
        assert_eq!(extraction.lines().count(), 2);
    }

    #[test]
    fn test_tokens_are_unique() {
        let extraction = extract("```\na\n```\n```\nb\n```");
        let tokens: Vec<_> = extraction.blocks.keys().collect();
        assert_eq!(tokens.len(), 2);
        assert_ne!(tokens[0], tokens[1]);
        for token in tokens {
            assert_eq!(extraction.lines().filter(|l| l == token).count(), 1);
        }
    }
}
