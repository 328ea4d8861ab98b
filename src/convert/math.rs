//! Inline math rewriting
//!
//! Rewrites `$...$` and `$$...$$` spans on a single line into Doxygen
//! formula markers, leaving anything inside inline code spans untouched.
//! A delimiter is identified by the length of its maximal `$` run: a run
//! of exactly one is an inline delimiter, exactly two a display
//! delimiter, three or more belongs to neither pass.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Maximal runs of consecutive '$' characters.
static DOLLAR_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$+").expect("Invalid DOLLAR_RUN_RE regex"));

/// One rewriting pass: the `$`-run length it consumes and the markers
/// spliced in for each matched pair.
#[derive(Debug, Clone, Copy)]
pub struct MathPass {
    pub run_len: usize,
    pub open: &'static str,
    pub close: &'static str,
}

/// Inline formulas: `$...$` becomes `@f$...@f$`
pub const INLINE_MATH: MathPass = MathPass {
    run_len: 1,
    open: "@f$",
    close: "@f$",
};

/// Display formulas: `$$...$$` becomes `@f[...@f]`
pub const DISPLAY_MATH: MathPass = MathPass {
    run_len: 2,
    open: "@f[",
    close: "@f]",
};

/// Malformed math markup on a single line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MathError {
    /// Odd number of backticks: code spans cannot be paired.
    #[error("unbalanced inline code span (odd number of '`')")]
    UnbalancedCodeSpans,

    /// A start delimiter with no matching end delimiter on the line.
    #[error("math delimiter is never closed")]
    UnclosedDelimiter,
}

/// Pair up the backticks on a line into code-span intervals.
///
/// Intervals are (open, close) byte positions of the delimiting
/// backticks; a position strictly between them is inside the span.
fn code_spans(line: &str) -> Result<Vec<(usize, usize)>, MathError> {
    let ticks: Vec<usize> = line
        .bytes()
        .enumerate()
        .filter(|(_, b)| *b == b'`')
        .map(|(i, _)| i)
        .collect();

    if ticks.len() % 2 != 0 {
        return Err(MathError::UnbalancedCodeSpans);
    }

    Ok(ticks.chunks(2).map(|pair| (pair[0], pair[1])).collect())
}

/// Maximal '$' runs of the line as (start, end) byte ranges.
fn dollar_runs(line: &str) -> Vec<(usize, usize)> {
    DOLLAR_RUN_RE
        .find_iter(line)
        .map(|m| (m.start(), m.end()))
        .collect()
}

/// Rewrite every matched delimiter pair of one pass on a single line.
///
/// Returns the rewritten line and the number of pairs replaced. Start
/// delimiters inside code spans are skipped; the end delimiter is the
/// next exact-length run after the start, wherever it sits. Scanning
/// resumes just past each inserted replacement, so replacement text is
/// never rescanned.
pub fn rewrite_math(line: &str, pass: MathPass) -> Result<(String, usize), MathError> {
    let mut spans = code_spans(line)?;
    if !line.contains('$') {
        return Ok((line.to_string(), 0));
    }

    let mut out = line.to_string();
    let mut from = 0usize;
    let mut replaced = 0usize;

    loop {
        let runs = dollar_runs(&out);
        let start = runs.iter().copied().find(|&(s, e)| {
            s >= from && e - s == pass.run_len && !spans.iter().any(|&(a, b)| a < s && s < b)
        });
        let Some((start_lo, start_hi)) = start else {
            break;
        };

        let end = runs
            .iter()
            .copied()
            .find(|&(s, e)| s >= start_hi && e - s == pass.run_len);
        let Some((end_lo, end_hi)) = end else {
            return Err(MathError::UnclosedDelimiter);
        };

        let replacement = format!("{}{}{}", pass.open, &out[start_hi..end_lo], pass.close);
        out.replace_range(start_lo..end_hi, &replacement);
        from = start_lo + replacement.len();
        replaced += 1;

        // The splice moves every backtick after it, so re-pair the spans
        // against the current positions. Replacement markers contain no
        // backticks, hence the count stays balanced.
        spans = code_spans(&out)?;
    }

    Ok((out, replaced))
}
