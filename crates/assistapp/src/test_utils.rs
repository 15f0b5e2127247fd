use crate::analytics::Categorizer;
use crate::api::AssistApi;
use crate::model::Domain;
use crate::store::{FsBackend, MemBackend};
use std::path::PathBuf;
use tempfile::TempDir;

/// An api over in-memory backends named after their domain.
pub fn mem_api() -> AssistApi<MemBackend> {
    AssistApi::open(|domain| MemBackend::named(&domain.to_string()), Categorizer::default())
        .expect("memory backends never fail to open")
}

pub struct TestEnv {
    // Keeps the directory alive until the test is done
    pub _temp_dir: TempDir,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    pub fn path(&self, domain: Domain) -> PathBuf {
        self.root.join(domain.file_name())
    }

    /// Opens a fresh api over the files in this environment. Calling it
    /// again simulates a restart.
    pub fn api(&self) -> AssistApi<FsBackend> {
        AssistApi::open(|domain| FsBackend::new(self.path(domain)), Categorizer::default())
            .expect("failed to open stores")
    }
}
