//! # assist
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, and this
//! file only invokes `cli::run()` and handles process termination.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  CLI (crates/assist/src/cli/)                │
//! │  clap parsing, dispatch, rendering, logging  │
//! └──────────────────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌──────────────────────────────────────────────┐
//! │  assistapp::api::AssistApi                   │
//! │  selectors parsed, structured results        │
//! └──────────────────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌──────────────────────────────────────────────┐
//! │  assistapp::commands / store / analytics     │
//! │  UI-agnostic logic over plain-text files     │
//! └──────────────────────────────────────────────┘
//! ```

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
