//! # Verso Architecture
//!
//! Verso is a **UI-agnostic scripture addressing library**. It turns human references such as
//! `"John 3:16-18; Rom 8"` into canonical coordinates, reads the verses behind them from an
//! external module store, searches whole modules in the background and parses Strong's
//! lexicon entries. The `verso` binary is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (verso crate)                                          │
//! │  - Parses arguments, prints, owns stdout/stderr/exit codes  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade, one value per client handle                 │
//! │  - Parses book names and reference expressions              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Components                                                 │
//! │  versification · reference · content · search · lexicon     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - ModuleStore trait                                        │
//! │  - FileStore (JSON directory), InMemoryStore (testing)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust arguments and returns Rust types. It never writes to
//! stdout/stderr and never exits the process. Diagnostics go through `tracing`; installing a
//! subscriber is the host's business.
//!
//! ## Absolute Verse Indices
//!
//! Every verse of a module has a zero-based absolute index, contiguous and ascending in
//! canonical book/chapter/verse order. References and verse records carry it, search results
//! are ordered by it, and the versification converts to and from it.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`versification`]: Per-module book/chapter/verse tables and absolute indices
//! - [`reference`]: Reference expression parsing and resolution
//! - [`content`]: Verse, chapter and book text
//! - [`search`]: Background searches with progress and cancellation
//! - [`lexicon`]: Strong's entry parsing
//! - [`store`]: Module store abstraction and implementations
//! - [`model`]: Core data types (`BookCode`, `Module`, `Reference`, `VerseRecord`)
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod config;
pub mod content;
pub mod error;
pub mod lexicon;
pub mod model;
pub mod reference;
pub mod search;
pub mod store;
pub mod versification;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
