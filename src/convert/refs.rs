//! Reference resolution
//!
//! Rewrites Markdown links that point at another README inside the
//! corpus into `@subpage` cross-references. Doxygen renders the target
//! page's own title, so the link label is dropped.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::convert::tag::sanitize_tag;
use crate::core::paths;

/// `[label](target)` constructs; the capture is the bare target.
static REFERENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]*\]\(([^)]*)\)").expect("Invalid REFERENCE_RE regex"));

/// Name of the index document each directory page is derived from.
pub const ROOT_INDEX: &str = "README.md";

/// A link target that should resolve to an in-corpus page: a relative
/// path (no leading '/', no URL scheme) ending in the index filename.
fn is_corpus_index(target: &str) -> bool {
    target.ends_with(ROOT_INDEX) && !target.starts_with('/') && !target.contains("://")
}

/// Replace every in-corpus README link on the line with `@subpage <tag>`.
///
/// `doc_dir` is the source document's directory relative to the corpus
/// root; targets are resolved against it before the tag is derived.
/// Returns the rewritten line and the number of links resolved. Scanning
/// is single-pass, left to right: it resumes after each replacement (or
/// after each skipped construct), so matches never overlap.
pub fn resolve_references(line: &str, doc_dir: &str) -> (String, usize) {
    let mut out = line.to_string();
    let mut from = 0usize;
    let mut resolved = 0usize;

    while let Some(caps) = REFERENCE_RE.captures_at(&out, from) {
        let range = caps.get(0).expect("match always has a group 0").range();
        let target = caps
            .get(1)
            .expect("target group always present")
            .as_str()
            .to_string();

        if is_corpus_index(&target) {
            let resolved_path = paths::normalize(&paths::join(doc_dir, &target));
            let tag = sanitize_tag(paths::parent_dir(&resolved_path));
            let replacement = format!("@subpage {tag}");
            let start = range.start;
            out.replace_range(range, &replacement);
            from = start + replacement.len();
            resolved += 1;
        } else {
            from = range.end;
        }
    }

    (out, resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_relative_readme() {
        let (out, n) = resolve_references("see [the guide](../foo/README.md) here", "docs/bar");
        assert_eq!(out, "see @subpage docs_foo here");
        assert_eq!(n, 1);
    }

    #[test]
    fn test_resolves_sibling_from_top_level() {
        let (out, _) = resolve_references("[see here](../foo/README.md)", "bar");
        assert_eq!(out, "@subpage foo");
    }

    #[test]
    fn test_label_is_discarded() {
        let (out, _) = resolve_references("[A Very Long Label](sub/README.md)", "docs");
        assert_eq!(out, "@subpage docs_sub");
    }

    #[test]
    fn test_non_readme_target_untouched() {
        let line = "read [the notes](../foo/notes.md) first";
        let (out, n) = resolve_references(line, "docs/bar");
        assert_eq!(out, line);
        assert_eq!(n, 0);
    }

    #[test]
    fn test_absolute_path_untouched() {
        let line = "[abs](/etc/README.md)";
        let (out, n) = resolve_references(line, "docs");
        assert_eq!(out, line);
        assert_eq!(n, 0);
    }

    #[test]
    fn test_url_untouched() {
        let line = "[remote](https://example.com/project/README.md)";
        let (out, n) = resolve_references(line, "docs");
        assert_eq!(out, line);
        assert_eq!(n, 0);
    }

    #[test]
    fn test_multiple_links_on_one_line() {
        let (out, n) = resolve_references(
            "[a](x/README.md) and [b](y/README.md) and [c](z.md)",
            "",
        );
        assert_eq!(out, "@subpage x and @subpage y and [c](z.md)");
        assert_eq!(n, 2);
    }

    #[test]
    fn test_no_links() {
        let (out, n) = resolve_references("nothing to do", "docs");
        assert_eq!(out, "nothing to do");
        assert_eq!(n, 0);
    }

    #[test]
    fn test_empty_label() {
        let (out, _) = resolve_references("[](sub/README.md)", "");
        assert_eq!(out, "@subpage sub");
    }
}
