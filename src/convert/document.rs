//! Document transformer
//!
//! The line-by-line state machine driving a whole-document conversion.
//! Three states: normal text, inside a fenced code block, inside a
//! fenced math block. Code blocks pass through verbatim (fences
//! included); math blocks keep their interior verbatim but trade their
//! fence lines for `@f[` / `@f]`.

use serde::{Deserialize, Serialize};

use crate::convert::math::{self, DISPLAY_MATH, INLINE_MATH};
use crate::convert::refs::{self, ROOT_INDEX};
use crate::convert::tag::sanitize_tag;
use crate::core::error::ConvertError;
use crate::core::paths;

/// Fence state while walking the document body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    InCode,
    InMathBlock,
}

/// Counters accumulated over one conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertStats {
    /// `##` headings rewritten to `@section`
    pub sections: usize,
    /// `$...$` pairs rewritten to `@f$...@f$`
    pub inline_formulas: usize,
    /// `$$...$$` pairs rewritten to `@f[...@f]`
    pub display_formulas: usize,
    /// Fenced code blocks passed through verbatim
    pub code_blocks: usize,
    /// ```` ```math ```` blocks rewritten to `@f[` ... `@f]`
    pub math_blocks: usize,
    /// Links resolved to `@subpage` references
    pub references: usize,
}

/// A converted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Tag derived from the document's root-relative path; empty for the
    /// corpus root index (rendered as `@mainpage`).
    pub page_tag: String,
    /// The full converted text, newline-terminated.
    pub output: String,
    /// Counters for the --stats report.
    pub stats: ConvertStats,
}

/// Tag for the page a document becomes.
///
/// A README is identified by its parent directory; any other Markdown
/// file by its path with the `.md` suffix dropped. The corpus root
/// README maps to the empty tag.
fn page_tag(rel_path: &str) -> String {
    if rel_path.ends_with(ROOT_INDEX) {
        sanitize_tag(paths::parent_dir(rel_path))
    } else {
        sanitize_tag(rel_path.strip_suffix(".md").unwrap_or(rel_path))
    }
}

fn math_error_at(err: math::MathError, line: usize) -> ConvertError {
    match err {
        math::MathError::UnbalancedCodeSpans => ConvertError::UnbalancedCodeSpans { line },
        math::MathError::UnclosedDelimiter => ConvertError::UnclosedMath { line },
    }
}

/// Convert one Markdown document to Doxygen markup.
///
/// `rel_path` is the document's path relative to the corpus root,
/// '/'-separated; it decides the page tag and anchors reference
/// resolution. The first line must be a `#` title. Structural defects
/// abort the conversion; no partial result is returned.
pub fn convert_document(source: &str, rel_path: &str) -> Result<Conversion, ConvertError> {
    let mut lines = source.lines();
    let title_line = lines.next().ok_or(ConvertError::MissingTitle)?;
    if !title_line.starts_with('#') {
        return Err(ConvertError::MissingTitle);
    }
    let title = title_line[1..].trim();

    let tag = page_tag(rel_path);
    let doc_dir = paths::parent_dir(rel_path);

    let mut out: Vec<String> = Vec::new();
    if tag.is_empty() {
        out.push("@mainpage".to_string());
    } else {
        out.push(format!("@page {tag} {title}"));
    }

    let mut stats = ConvertStats::default();
    let mut state = State::Normal;
    let mut math_opened_at = 0usize;

    for (idx, line) in source.lines().enumerate().skip(1) {
        let line_no = idx + 1;
        let stripped = line.trim();

        if stripped.starts_with("```") {
            match state {
                State::InCode => {
                    state = State::Normal;
                    out.push(line.to_string());
                }
                State::InMathBlock => {
                    state = State::Normal;
                    out.push("@f]".to_string());
                }
                State::Normal if stripped == "```math" => {
                    state = State::InMathBlock;
                    math_opened_at = line_no;
                    stats.math_blocks += 1;
                    out.push("@f[".to_string());
                }
                State::Normal => {
                    state = State::InCode;
                    stats.code_blocks += 1;
                    out.push(line.to_string());
                }
            }
            continue;
        }

        match state {
            State::InCode | State::InMathBlock => out.push(line.to_string()),
            State::Normal => {
                if line.starts_with("##") && !line[2..].starts_with('#') {
                    let sec_title = line[2..].trim();
                    out.push(String::new());
                    out.push(format!("@section {} {sec_title}", sanitize_tag(sec_title)));
                    stats.sections += 1;
                } else {
                    let (line, n_inline) = math::rewrite_math(line, INLINE_MATH)
                        .map_err(|e| math_error_at(e, line_no))?;
                    let (line, n_display) = math::rewrite_math(&line, DISPLAY_MATH)
                        .map_err(|e| math_error_at(e, line_no))?;
                    let (line, n_refs) = refs::resolve_references(&line, doc_dir);
                    stats.inline_formulas += n_inline;
                    stats.display_formulas += n_display;
                    stats.references += n_refs;
                    out.push(line);
                }
            }
        }
    }

    if state == State::InMathBlock {
        return Err(ConvertError::UnclosedMathBlock {
            line: math_opened_at,
        });
    }

    let mut output = out.join("\n");
    output.push('\n');

    Ok(Conversion {
        page_tag: tag,
        output,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_marker_for_subdocument() {
        let conv = convert_document("# Splines\n\nBody text.\n", "src/splines/README.md").unwrap();
        assert_eq!(conv.page_tag, "src_splines");
        assert_eq!(conv.output, "@page src_splines Splines\n\nBody text.\n");
    }

    #[test]
    fn test_mainpage_for_root_index() {
        let conv = convert_document("# Project Home\n\nWelcome.\n", "README.md").unwrap();
        assert_eq!(conv.page_tag, "");
        assert_eq!(conv.output, "@mainpage\n\nWelcome.\n");
    }

    #[test]
    fn test_non_readme_tag_from_path() {
        let conv = convert_document("# Notes\n", "docs/dev notes.md").unwrap();
        assert_eq!(conv.page_tag, "docs_dev_notes");
    }

    #[test]
    fn test_title_only_document() {
        let conv = convert_document("# Guide\n", "docs/README.md").unwrap();
        assert_eq!(conv.output, "@page docs Guide\n");
    }

    #[test]
    fn test_missing_title_is_fatal() {
        assert_eq!(
            convert_document("no heading here\n", "README.md"),
            Err(ConvertError::MissingTitle)
        );
        assert_eq!(convert_document("", "README.md"), Err(ConvertError::MissingTitle));
    }

    #[test]
    fn test_second_level_heading_becomes_section() {
        let conv = convert_document("# T\n## Setup Guide\n", "docs/README.md").unwrap();
        assert_eq!(conv.output, "@page docs T\n\n@section Setup_Guide Setup Guide\n");
        assert_eq!(conv.stats.sections, 1);
    }

    #[test]
    fn test_third_level_heading_left_alone() {
        let conv = convert_document("# T\n### Deep\n", "docs/README.md").unwrap();
        assert_eq!(conv.output, "@page docs T\n### Deep\n");
        assert_eq!(conv.stats.sections, 0);
    }

    #[test]
    fn test_code_block_passes_verbatim() {
        let src = "# T\n```python\nx = \"$a$\"\n## not a heading\n```\n";
        let conv = convert_document(src, "docs/README.md").unwrap();
        assert_eq!(
            conv.output,
            "@page docs T\n```python\nx = \"$a$\"\n## not a heading\n```\n"
        );
        assert_eq!(conv.stats.code_blocks, 1);
    }

    #[test]
    fn test_math_block_fences_replaced() {
        let src = "# T\n```math\n\\int_0^1 f(x) dx\n```\n";
        let conv = convert_document(src, "docs/README.md").unwrap();
        assert_eq!(conv.output, "@page docs T\n@f[\n\\int_0^1 f(x) dx\n@f]\n");
        assert_eq!(conv.stats.math_blocks, 1);
    }

    #[test]
    fn test_math_block_interior_verbatim() {
        // `$` and `##` inside a math block must not be reinterpreted.
        let src = "# T\n```math\n## $x$\n```\n";
        let conv = convert_document(src, "docs/README.md").unwrap();
        assert_eq!(conv.output, "@page docs T\n@f[\n## $x$\n@f]\n");
    }

    #[test]
    fn test_unclosed_math_block_is_fatal() {
        let src = "# T\n```math\nx = 1\n";
        assert_eq!(
            convert_document(src, "docs/README.md"),
            Err(ConvertError::UnclosedMathBlock { line: 2 })
        );
    }

    #[test]
    fn test_inline_math_rewritten_in_body() {
        let conv = convert_document("# T\nvalue $x$ here\n", "docs/README.md").unwrap();
        assert_eq!(conv.output, "@page docs T\nvalue @f$x@f$ here\n");
        assert_eq!(conv.stats.inline_formulas, 1);
    }

    #[test]
    fn test_display_math_rewritten_in_body() {
        let conv = convert_document("# T\n$$E = mc^2$$\n", "docs/README.md").unwrap();
        assert_eq!(conv.output, "@page docs T\n@f[E = mc^2@f]\n");
        assert_eq!(conv.stats.display_formulas, 1);
    }

    #[test]
    fn test_reference_resolved_against_document_directory() {
        let conv = convert_document(
            "# T\nsee [here](../foo/README.md)\n",
            "docs/bar/README.md",
        )
        .unwrap();
        assert_eq!(conv.output, "@page docs_bar T\nsee @subpage docs_foo\n");
        assert_eq!(conv.stats.references, 1);
    }

    #[test]
    fn test_unbalanced_code_span_reports_line() {
        let src = "# T\nfine\nbad ` line\n";
        assert_eq!(
            convert_document(src, "docs/README.md"),
            Err(ConvertError::UnbalancedCodeSpans { line: 3 })
        );
    }

    #[test]
    fn test_unclosed_inline_math_reports_line() {
        let src = "# T\nlonely $x\n";
        assert_eq!(
            convert_document(src, "docs/README.md"),
            Err(ConvertError::UnclosedMath { line: 2 })
        );
    }

    #[test]
    fn test_heading_marker_requires_normal_state() {
        // A `##` line inside a code block stays a comment, not a section.
        let src = "# T\n```\n## comment\n```\n";
        let conv = convert_document(src, "docs/README.md").unwrap();
        assert!(conv.output.contains("## comment"));
        assert_eq!(conv.stats.sections, 0);
    }

    #[test]
    fn test_fence_with_language_tag_opens_code() {
        let src = "# T\n```rust\nlet x = 1;\n```\n";
        let conv = convert_document(src, "docs/README.md").unwrap();
        assert!(conv.output.contains("```rust"));
        assert_eq!(conv.stats.code_blocks, 1);
    }

    #[test]
    fn test_title_extra_hashes_kept() {
        // Only one '#' is stripped from the title line.
        let conv = convert_document("## Double\n", "docs/README.md").unwrap();
        assert_eq!(conv.output, "@page docs # Double\n");
    }
}
