//! CLI module - Command-line interface definition and handler

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use crate::convert::document::{convert_document, Conversion};
use crate::core::paths;

/// mdox - translate a Markdown document into Doxygen markup.
#[derive(Parser, Debug)]
#[command(name = "mdox")]
#[command(
    author,
    version,
    about,
    long_about = r#"mdox translates one GitHub/GitLab-flavored Markdown file into markup
understood by Doxygen and writes the result to a new file.

Rewrites performed outside code regions:
- the '#' title line becomes @page (or @mainpage for the corpus root README)
- '##' headings become @section commands
- $...$ and $$...$$ math becomes @f$/@f[ formulas
- ```math fenced blocks become @f[ ... @f] blocks
- [label](path/README.md) links become @subpage references

Page and cross-reference tags are derived from paths relative to the corpus
root (--root / MDOX_ROOT). Malformed input (missing title, unbalanced code
spans, unclosed math) aborts with a nonzero exit and no output file.

Examples:
    mdox README.md build/doc/mainpage.dox
    mdox --root . src/splines/README.md build/doc/src_splines.dox
    mdox --stats docs/guide/README.md out/guide.dox
"#
)]
pub struct Cli {
    /// The Markdown file to translate.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// The file where the translated markup is written.
    #[arg(
        value_name = "OUTPUT",
        long_help = "The file where the translated markup is written.\n\n\
Parent directories are created as needed; an existing file is overwritten.\n\
Nothing is written when the conversion fails."
    )]
    pub output: PathBuf,

    /// Corpus root used to derive page and cross-reference tags.
    #[arg(
        long,
        env = "MDOX_ROOT",
        default_value = ".",
        value_name = "ROOT",
        long_help = "Corpus root used to derive page and cross-reference tags.\n\n\
The input file's path relative to this directory determines its page tag;\n\
README links are resolved against it the same way. Defaults to the current\n\
directory; can also be set through the MDOX_ROOT environment variable."
    )]
    pub root: PathBuf,

    /// Print a JSON conversion summary to stderr.
    #[arg(
        long,
        long_help = "Print a JSON conversion summary to stderr after a successful run:\n\
sections, formulas, code/math blocks and resolved references."
    )]
    pub stats: bool,

    /// Quiet mode (suppress diagnostics).
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose mode (more diagnostics).
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let root = cli.root.canonicalize().unwrap_or_else(|_| cli.root.clone());
    let input = cli
        .input
        .canonicalize()
        .with_context(|| format!("Failed to resolve input file: {}", cli.input.display()))?;

    let rel_path = paths::relative_from(
        &paths::normalize_slashes(&input),
        &paths::normalize_slashes(&root),
    );

    if cli.verbose {
        eprintln!("Translating {} (corpus path: {})", input.display(), rel_path);
    }

    let source = fs::read_to_string(&input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;

    let conversion: Conversion = convert_document(&source, &rel_path)?;

    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(&cli.output, &conversion.output)
        .with_context(|| format!("Failed to write output file: {}", cli.output.display()))?;

    if cli.verbose {
        let page = if conversion.page_tag.is_empty() {
            "@mainpage".to_string()
        } else {
            format!("@page {}", conversion.page_tag)
        };
        eprintln!("Emitted {} -> {}", page, cli.output.display());
    }

    if cli.stats {
        eprintln!("{}", serde_json::to_string(&conversion.stats)?);
    }

    if !cli.quiet && !cli.verbose {
        eprintln!("{} -> {}", cli.input.display(), cli.output.display());
    }

    Ok(())
}
