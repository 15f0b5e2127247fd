use super::backend::{LineBackend, RawLine};
use crate::error::{AssistError, Result};
use std::cell::RefCell;
use std::io;
use std::path::PathBuf;

/// In-memory line storage for testing.
///
/// Uses `RefCell` for interior mutability since assist is single-threaded,
/// which lets `LineBackend` take `&self` everywhere.
pub struct MemBackend {
    name: String,
    lines: RefCell<Option<Vec<String>>>,
    simulate_write_error: RefCell<bool>,
}

impl Default for MemBackend {
    fn default() -> Self {
        Self {
            name: "records".to_string(),
            lines: RefCell::new(None),
            simulate_write_error: RefCell::new(false),
        }
    }
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Seeds raw lines, as if a file with this content already existed.
    pub fn with_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let backend = Self::default();
        *backend.lines.borrow_mut() = Some(lines.into_iter().map(Into::into).collect());
        backend
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Current lines; empty when nothing was ever written.
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone().unwrap_or_default()
    }

    /// The bytes a file backend would hold.
    pub fn contents(&self) -> String {
        self.lines()
            .iter()
            .map(|l| format!("{}\n", l))
            .collect()
    }

    fn check_writable(&self) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(AssistError::Io(io::Error::other("Simulated write error")));
        }
        Ok(())
    }
}

impl LineBackend for MemBackend {
    fn read_lines(&self) -> Result<Option<Vec<RawLine>>> {
        Ok(self
            .lines
            .borrow()
            .clone()
            .map(|lines| lines.into_iter().map(Ok).collect()))
    }

    fn append_line(&self, line: &str) -> Result<()> {
        self.check_writable()?;
        self.lines
            .borrow_mut()
            .get_or_insert_with(Vec::new)
            .push(line.to_string());
        Ok(())
    }

    fn rewrite(&self, lines: &[String]) -> Result<()> {
        self.check_writable()?;
        *self.lines.borrow_mut() = Some(lines.to_vec());
        Ok(())
    }

    fn location(&self) -> PathBuf {
        PathBuf::from(format!("memory://{}", self.name))
    }
}
