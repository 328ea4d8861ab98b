//! mdox - translate GitHub/GitLab-flavored Markdown into Doxygen markup
//!
//! mdox rewrites one Markdown document at a time:
//! - `#`/`##` headings become `@page`/`@mainpage`/`@section` commands
//! - `$...$` and `$$...$$` math becomes `@f$`/`@f[`/`@f]` formulas
//! - ```` ```math ```` fences become `@f[` ... `@f]` blocks
//! - links to in-corpus README.md files become `@subpage` references
//!
//! Text inside fenced code blocks and inline code spans is never touched.

use anyhow::Result;
use clap::Parser;

mod cli;
mod convert;
mod core;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::run(cli)
}
