//! # Startup
//!
//! [`initialize`] turns command line overrides into a ready [`AssistContext`]:
//! a loaded configuration, a resolved data directory and an [`AssistApi`]
//! with one file-backed store per domain.
//!
//! ## Data Directory Resolution
//!
//! 1. `--data <dir>` (`data_override`)
//! 2. `data_dir` from the configuration (env, `--config`, global file)
//! 3. The OS data directory (via `directories`)
//!
//! Once the data directory is known, `<data_dir>/assist.toml` joins the
//! configuration sources and the configuration is loaded again, so settings
//! that live next to the data take effect.
//!
//! A missing data directory is created when the stores open.

use crate::api::AssistApi;
use crate::config::{AssistConfig, CONFIG_FILE_NAME};
use crate::error::{AssistError, Result};
use crate::store::FsBackend;
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::debug;

pub struct AssistContext {
    pub api: AssistApi<FsBackend>,
    pub config: AssistConfig,
    pub data_dir: PathBuf,
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "assist", "assist")
        .ok_or_else(|| AssistError::Config("could not determine home directory".to_string()))
}

/// Location of the global `assist.toml`, if a home directory exists.
pub fn global_config_path() -> Option<PathBuf> {
    project_dirs()
        .ok()
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

pub fn initialize(data_override: Option<PathBuf>, config_file: Option<PathBuf>) -> Result<AssistContext> {
    let global: Vec<PathBuf> = global_config_path().into_iter().collect();
    let config = AssistConfig::load(config_file.as_deref(), &global)?;

    let data_dir = match data_override.or_else(|| config.data_dir.clone()) {
        Some(dir) => dir,
        None => project_dirs()?.data_dir().to_path_buf(),
    };

    let local = data_dir.join(CONFIG_FILE_NAME);
    let config = if local.is_file() {
        let mut files = vec![local];
        files.extend(global);
        AssistConfig::load(config_file.as_deref(), &files)?
    } else {
        config
    };
    debug!(data_dir = %data_dir.display(), "resolved data directory");

    let api = AssistApi::open(
        |domain| FsBackend::new(data_dir.join(domain.file_name())),
        config.categorizer(),
    )?;

    Ok(AssistContext {
        api,
        config,
        data_dir,
    })
}
