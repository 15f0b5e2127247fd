//! # assistapp
//!
//! Plain-text record keeping for four personal domains: **tasks**, **health**
//! measurements, a **life log** and **payments**. Every domain lives in one
//! human-readable file, one record per line, and everything on top of those
//! files (editing, querying, payment analytics) goes through this crate.
//!
//! ## Architecture
//!
//! ```text
//! UI (assist binary)  ->  api::AssistApi  ->  commands::*  ->  store::RecordStore
//!                                                   |                 |
//!                                              analytics::*     codec + LineBackend
//! ```
//!
//! - [`store`]: the generic [`RecordStore`](store::RecordStore) keeps an
//!   ordered in-memory list consistent with its file
//! - [`codec`]: delimited-line encoding shared by every record type
//! - [`index`]: 1-based positions used to address records
//! - [`query`]: field predicates for filtering and keyword search
//! - [`model`]: the four record types and their validation
//! - [`analytics`]: period comparison, category totals, charts and insights
//! - [`commands`]: one function per user operation, returning [`CmdResult`](commands::CmdResult)
//! - [`api`]: the facade UIs call
//! - [`config`] / [`init`]: configuration and startup
//!
//! The library never prints. Results are structured data; rendering them is
//! the UI's job.
//!
//! ## Testing
//!
//! Stores are generic over [`LineBackend`](store::backend::LineBackend), so
//! the whole stack runs on [`MemBackend`](store::MemBackend) in unit tests.
//! Enable the `test_utils` feature for [`test_utils::TestEnv`], which runs it
//! on real files in a temporary directory.

pub mod analytics;
pub mod api;
pub mod codec;
pub mod commands;
pub mod config;
pub mod error;
pub mod index;
pub mod init;
pub mod model;
pub mod query;
pub mod store;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
