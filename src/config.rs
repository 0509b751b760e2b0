use crate::errors::{AppError, AppResult};
use crate::listing::Sorter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 500;
pub const DEFAULT_KEY_WIDTH: usize = 3;
const MAX_KEY_WIDTH: usize = 12;

/// Per-view list settings, usually read from a YAML file shipped with the
/// dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
    /// Minimum width of zero-padded display keys.
    pub key_width: usize,
    pub default_sort: Sorter,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            key_width: DEFAULT_KEY_WIDTH,
            default_sort: Sorter::end_date_desc(),
        }
    }
}

impl ListConfig {
    pub fn from_yaml_str(raw: &str) -> AppResult<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> AppResult<Self> {
        let raw = fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&raw)?;
        tracing::debug!(
            path = %path.to_string_lossy(),
            page_size = config.default_page_size,
            "loaded list config"
        );
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.max_page_size == 0 {
            return Err(AppError::Config("maxPageSize must be at least 1".to_string()));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(AppError::Config(format!(
                "defaultPageSize must be between 1 and {}, got {}",
                self.max_page_size, self.default_page_size
            )));
        }
        if !(1..=MAX_KEY_WIDTH).contains(&self.key_width) {
            return Err(AppError::Config(format!(
                "keyWidth must be between 1 and {}, got {}",
                MAX_KEY_WIDTH, self.key_width
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{SortDirection, SortKey};
    use std::io::Write;

    #[test]
    fn empty_yaml_uses_defaults() {
        let config = ListConfig::from_yaml_str("").expect("config");
        assert_eq!(config, ListConfig::default());
    }

    #[test]
    fn partial_yaml_fills_missing_fields() {
        let config = ListConfig::from_yaml_str(
            "defaultPageSize: 25\ndefaultSort:\n  key: priority\n  direction: asc\n",
        )
        .expect("config");
        assert_eq!(config.default_page_size, 25);
        assert_eq!(config.max_page_size, MAX_PAGE_SIZE);
        assert_eq!(config.default_sort, Sorter::new(SortKey::Priority, SortDirection::Asc));
    }

    #[test]
    fn rejects_page_size_above_max() {
        let error = ListConfig::from_yaml_str("defaultPageSize: 50\nmaxPageSize: 20\n").unwrap_err();
        assert!(matches!(error, AppError::Config(_)));
        assert!(error.to_string().starts_with("CONFIG_INVALID"));
    }

    #[test]
    fn rejects_unparseable_yaml() {
        let error = ListConfig::from_yaml_str("defaultPageSize: [oops").unwrap_err();
        assert!(matches!(error, AppError::Config(_)));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp config");
        writeln!(file, "keyWidth: 4").expect("write config");
        let config = ListConfig::load(file.path()).expect("config");
        assert_eq!(config.key_width, 4);

        let missing = ListConfig::load(&file.path().with_extension("missing")).unwrap_err();
        assert!(matches!(missing, AppError::Io(_)));
    }
}
