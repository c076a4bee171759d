//! # Verso CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, and this file only invokes
//! `cli::run()` and turns an error into a message and exit code.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/verso/src/cli/)                          │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring and dispatch (commands.rs)                │
//! │  - Terminal rendering with console (render.rs)              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/versoapp/src/api.rs)                     │
//! │  - Parses book names and reference expressions              │
//! │  - Returns structured records                               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything from `api.rs` inward is UI agnostic. Argument parsing, logging setup,
//! progress drawing, rendering and exit codes all happen here.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
