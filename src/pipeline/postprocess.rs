//! Post-processing: deterministic cleanup of converted Markdown.
//!
//! HTML-to-Markdown conversion reproduces whatever whitespace the page
//! carried: CRLF line endings from server-side templates, runs of blank
//! lines where hidden widgets used to be, trailing spaces after inline
//! elements, zero-width characters sprinkled in by documentation generators.
//! The rules below fix layout only and never touch the words.
//!
//! ## Rule Order
//!
//! Line endings are normalised first so every later rule can split on `\n`;
//! invisible characters are removed before blank-line collapsing because a
//! line holding only a zero-width space is blank once it is gone.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all post-processing rules in order:
///
/// 1. Normalise line endings (CRLF / CR → LF)
/// 2. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens, etc.)
/// 3. Trim trailing whitespace per line
/// 4. Collapse 3+ consecutive blank lines down to 2
/// 5. Ensure the file ends with exactly one newline
///
/// Rules 2–4 leave the body of fenced code blocks untouched.
pub fn clean_markdown(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = remove_invisible_chars(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    ensure_final_newline(&s)
}

// ── Fence tracking ───────────────────────────────────────────────────────────

static RE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(```|~~~)").unwrap());

fn is_fence(line: &str) -> bool {
    RE_FENCE.is_match(line)
}

/// Rewrite every line outside fenced blocks with `f`. Fenced content is
/// passed through; delimiter lines only lose trailing whitespace.
fn map_prose_lines(input: &str, mut f: impl FnMut(&str) -> String) -> String {
    let mut in_fence = false;
    let mut out = Vec::new();
    for line in input.split('\n') {
        if is_fence(line) {
            in_fence = !in_fence;
            out.push(line.trim_end().to_string());
        } else if in_fence {
            out.push(line.to_string());
        } else {
            out.push(f(line));
        }
    }
    out.join("\n")
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Remove invisible Unicode characters ─────────────────────────────

const INVISIBLE: [char; 6] = [
    '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
];

fn remove_invisible_chars(input: &str) -> String {
    map_prose_lines(input, |line| line.replace(INVISIBLE, ""))
}

// ── Rule 3: Trim trailing whitespace per line ────────────────────────────────

/// A line ending in two or more spaces after text is a Markdown hard break
/// (`htmd` renders `<br>` that way); it keeps exactly two.
fn trim_trailing_whitespace(input: &str) -> String {
    map_prose_lines(input, |line| {
        let content = line.trim_end();
        if !content.is_empty() && line[content.len()..].starts_with("  ") {
            format!("{content}  ")
        } else {
            content.to_string()
        }
    })
}

// ── Rule 4: Collapse excessive blank lines ───────────────────────────────────

const MAX_BLANK_LINES: usize = 2;

fn collapse_blank_lines(input: &str) -> String {
    let mut blank_run = 0;
    let mut in_fence = false;
    let mut out = Vec::new();
    for line in input.split('\n') {
        if is_fence(line) {
            in_fence = !in_fence;
            blank_run = 0;
        } else if !in_fence && line.is_empty() {
            blank_run += 1;
            if blank_run > MAX_BLANK_LINES {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push(line);
    }
    out.join("\n")
}

// ── Rule 5: Ensure file ends with single newline ─────────────────────────────

fn ensure_final_newline(input: &str) -> String {
    let trimmed = input.trim_end();
    if trimmed.is_empty() {
        String::from("\n")
    } else {
        format!("{}\n", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalise_line_endings() {
        assert_eq!(normalise_line_endings("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_trim_trailing_whitespace() {
        assert_eq!(trim_trailing_whitespace("a \nb\t"), "a\nb");
        assert_eq!(trim_trailing_whitespace("   \nb"), "\nb");
    }

    #[test]
    fn test_hard_break_kept() {
        assert_eq!(trim_trailing_whitespace("line one    \nline two"), "line one  \nline two");
    }

    #[test]
    fn test_fenced_code_whitespace_preserved() {
        let input = "text \n```\ncode \t\n```\nafter ";
        assert_eq!(trim_trailing_whitespace(input), "text\n```\ncode \t\n```\nafter");
    }

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(collapse_blank_lines("a\n\n\n\n\n\nb"), "a\n\n\nb");
        assert_eq!(collapse_blank_lines("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_ensure_final_newline() {
        assert_eq!(ensure_final_newline("hello"), "hello\n");
        assert_eq!(ensure_final_newline("hello\n\n\n"), "hello\n");
        assert_eq!(ensure_final_newline(""), "\n");
    }

    #[test]
    fn test_remove_invisible() {
        let input = "hello\u{200B}world\u{FEFF}foo\u{00AD}bar";
        assert_eq!(remove_invisible_chars(input), "helloworldfoobar");
    }

    #[test]
    fn test_clean_markdown_full_pipeline() {
        let input = "# Title\r\n\r\nSome text \t\n\u{200B}\n\n\n\n\n## Section\n\n";
        let result = clean_markdown(input);
        assert!(result.starts_with("# Title\n\nSome text\n"));
        assert!(result.ends_with("## Section\n"));
        assert!(!result.contains("\n\n\n\n"));
        assert!(!result.contains('\u{200B}'));
    }

    #[test]
    fn test_non_ascii_preserved() {
        let input = "Größe — naïve café 日本語";
        assert_eq!(clean_markdown(input), "Größe — naïve café 日本語\n");
    }

    #[test]
    fn test_fenced_code_keeps_blank_lines_and_invisible_chars() {
        let input = "intro\n```text\na\n\n\n\n\nb\u{200B}\n```\n\n\n\n\nafter\u{200B}";
        let result = clean_markdown(input);
        assert!(result.contains("a\n\n\n\n\nb\u{200B}\n```"), "got: {result:?}");
        assert!(result.ends_with("```\n\n\nafter\n"), "got: {result:?}");
    }
}
