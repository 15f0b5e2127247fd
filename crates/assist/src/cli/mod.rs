//! # CLI Layer
//!
//! One possible UI client for assistapp, not the application itself. This is
//! the only place that knows about terminal I/O, exit codes and formatting.
//!
//! ## Command Shape
//!
//! `assist <domain> <command> [args]`, with domains `task`, `health`, `life`,
//! `pay` and `config`. Records are addressed by the position shown in lists;
//! payments by their id. Selectors take `3`, `1-3`, `1,4` or several words.
//!
//! ## Module Structure
//!
//! - `setup`: argument definitions via clap derive
//! - `commands`: dispatch from parsed arguments to the api
//! - `render`: text output for every result type
//! - `styles`: terminal styles
//! - `logging`: the `tracing` subscriber

mod commands;
mod logging;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
