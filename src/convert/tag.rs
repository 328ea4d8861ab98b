//! Tag sanitization
//!
//! Doxygen tags may not contain spaces, '+' or path separators. Page and
//! section tags are derived from paths and heading titles by substituting
//! those characters.

/// Ordered substitution rules, applied in sequence.
///
/// The order is part of the contract: tags must come out identical on
/// every run so that cross-references keep resolving.
pub const TAG_RULES: &[(&str, &str)] = &[(" ", "_"), ("+", "x"), ("/", "_")];

/// Build a Doxygen-compatible tag from an arbitrary string.
///
/// Total over all inputs and idempotent: sanitizing a sanitized tag is a
/// no-op.
pub fn sanitize_tag(input: &str) -> String {
    let mut tag = input.to_string();
    for (from, to) in TAG_RULES {
        tag = tag.replace(from, to);
    }
    tag
}
