//! # Configuration
//!
//! Configuration is a [`confique`] struct loaded from layered sources, highest
//! priority first:
//!
//! 1. **Environment**: `ASSIST_DATA_DIR`
//! 2. **Explicit file**: the `--config` path, which must exist
//! 3. **Data directory**: `<data_dir>/assist.toml`
//! 4. **Global file**: `assist.toml` in the OS config directory (via `directories`)
//! 5. **Compiled defaults**
//!
//! The `--data` flag overrides `data_dir` from every source.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_dir` | OS data directory | Where the four record files live |
//! | `category_rules` | built-in table | Ordered `{ category, keywords }` list for payments |
//!
//! ```toml
//! [[category_rules]]
//! category = "Pets"
//! keywords = ["vet", "pet food"]
//! ```

use crate::analytics::{Categorizer, CategoryRule};
use crate::error::{AssistError, Result};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "assist.toml";

/// Configuration for assist, stored in `assist.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AssistConfig {
    /// Directory holding the record files.
    #[config(env = "ASSIST_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Keyword rules for payment categories, checked in order.
    /// When absent, the built-in table is used.
    pub category_rules: Option<Vec<CategoryRule>>,
}

impl AssistConfig {
    /// Loads from the given files in priority order. Missing files are
    /// skipped; an `explicit` file must exist.
    pub fn load(explicit: Option<&Path>, files: &[PathBuf]) -> Result<Self> {
        let mut builder = AssistConfig::builder().env();
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(AssistError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.file(path);
        }
        for file in files {
            builder = builder.file(file);
        }
        builder
            .load()
            .map_err(|e| AssistError::Config(e.to_string()))
    }

    pub fn categorizer(&self) -> Categorizer {
        match &self.category_rules {
            Some(rules) => Categorizer::new(rules.clone()),
            None => Categorizer::default(),
        }
    }

    /// A commented sample `assist.toml`.
    pub fn template() -> String {
        confique::toml::template::<AssistConfig>(confique::toml::FormatOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PaymentKind;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn default_config_uses_builtin_rules() {
        let config = AssistConfig::default();
        assert_eq!(config.data_dir, None);
        assert_eq!(
            config
                .categorizer()
                .categorize(PaymentKind::Expense, Some("subway card")),
            "Transport"
        );
    }

    #[test]
    fn custom_rules_come_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "[[category_rules]]\ncategory = \"Pets\"\nkeywords = [\"vet\"]\n",
        )
        .unwrap();

        let config = AssistConfig::load(None, &[path]).unwrap();
        let categorizer = config.categorizer();
        assert_eq!(categorizer.rules().len(), 1);
        assert_eq!(
            categorizer.categorize(PaymentKind::Expense, Some("vet visit")),
            "Pets"
        );
    }

    #[test]
    fn earlier_files_win() {
        let dir = tempdir().unwrap();
        let high = dir.path().join("high.toml");
        let low = dir.path().join("low.toml");
        fs::write(&high, "data_dir = \"/from/high\"\n").unwrap();
        fs::write(&low, "data_dir = \"/from/low\"\n").unwrap();

        let config = AssistConfig::load(Some(&high), &[low]).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/from/high")));
    }

    #[test]
    fn missing_optional_files_are_skipped() {
        let dir = tempdir().unwrap();
        let config = AssistConfig::load(None, &[dir.path().join("nope.toml")]).unwrap();
        assert_eq!(config.category_rules, None);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        let result = AssistConfig::load(Some(&dir.path().join("nope.toml")), &[]);
        assert!(matches!(result, Err(AssistError::Config(_))));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "category_rules = 3\n").unwrap();
        assert!(AssistConfig::load(Some(&path), &[]).is_err());
    }

    #[test]
    fn serialized_config_loads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = AssistConfig {
            data_dir: Some(PathBuf::from("/srv/assist")),
            category_rules: Some(vec![CategoryRule::new("Pets", &["vet"])]),
        };
        fs::write(&path, toml::to_string(&config).unwrap()).unwrap();

        assert_eq!(AssistConfig::load(Some(&path), &[]).unwrap(), config);
    }

    #[test]
    fn template_mentions_every_key() {
        let template = AssistConfig::template();
        assert!(template.contains("data_dir"));
        assert!(template.contains("category_rules"));
    }
}
