//! # CLI Behavior
//!
//! This is **one possible UI client** for verso. It is the only place that knows about
//! terminal I/O, exit codes and output formatting.
//!
//! ## Commands
//!
//! - `verso modules [--type bible|dict|commentary]`: installed modules
//! - `verso books <module>`: books with chapter and verse counts
//! - `verso text <module> <reference>`: verses of a reference expression
//! - `verso search <module> <term>`: full-module search, progress on stderr
//! - `verso strongs <key>`: a parsed Strong's lexicon entry
//! - `verso config`: the effective configuration
//!
//! `--json` on `text`, `search` and `strongs` prints the records as JSON instead.
//!
//! ## Module Structure
//!
//! - `setup`: Argument parsing via clap, version string
//! - `commands`: Context setup and per-command handlers
//! - `render`: Output formatting (colors, JSON, progress line)

mod commands;
mod render;
pub mod setup;

pub use commands::run;
