use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{read_config_file, LabelsError, Result};

pub const SEARCH_QUERY_CONFIG_VERSION: &str = "1.0.0";

/// Settings for [`SearchQuery`](crate::SearchQuery).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchQueryConfig {
    pub version: String,
    pub params: QueryParamNames,
}

/// Names of the URL query parameters backing each search field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryParamNames {
    pub name: String,
    pub page: String,
    pub page_size: String,
    pub labels: String,
}

impl Default for SearchQueryConfig {
    fn default() -> Self {
        Self {
            version: SEARCH_QUERY_CONFIG_VERSION.to_string(),
            params: QueryParamNames::default(),
        }
    }
}

impl Default for QueryParamNames {
    fn default() -> Self {
        Self {
            name: "name".to_string(),
            page: "page".to_string(),
            page_size: "pageSize".to_string(),
            labels: "labels".to_string(),
        }
    }
}

impl SearchQueryConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|error| LabelsError::Config(format!("invalid search query config: {error}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = read_config_file(path.as_ref().to_path_buf())?;
        let config = Self::from_json_str(&raw)?;
        log::debug!("loaded search query config from {:?}", path.as_ref());
        Ok(config)
    }

    /// Parameter names must be non-empty and distinct.
    pub fn validate(&self) -> Result<()> {
        let names = [
            &self.params.name,
            &self.params.page,
            &self.params.page_size,
            &self.params.labels,
        ];
        if names.iter().any(|name| name.trim().is_empty()) {
            return Err(LabelsError::Config(
                "query parameter names must not be empty".to_string(),
            ));
        }
        for (index, name) in names.iter().enumerate() {
            if names[index + 1..].contains(name) {
                return Err(LabelsError::Config(format!(
                    "query parameter name {name:?} is used more than once"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_url_parameter_names() {
        let config = SearchQueryConfig::default();
        assert_eq!(config.params.name, "name");
        assert_eq!(config.params.page, "page");
        assert_eq!(config.params.page_size, "pageSize");
        assert_eq!(config.params.labels, "labels");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config =
            SearchQueryConfig::from_json_str(r#"{"params":{"labels":"selector"}}"#).expect("parse");
        assert_eq!(config.params.labels, "selector");
        assert_eq!(config.params.page_size, "pageSize");
        assert_eq!(config.version, SEARCH_QUERY_CONFIG_VERSION);
    }

    #[test]
    fn rejects_duplicate_names() {
        let error = SearchQueryConfig::from_json_str(r#"{"params":{"page":"name"}}"#)
            .expect_err("duplicate");
        assert!(matches!(error, LabelsError::Config(_)));
    }

    #[test]
    fn rejects_empty_names() {
        assert!(SearchQueryConfig::from_json_str(r#"{"params":{"labels":" "}}"#).is_err());
        assert!(SearchQueryConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"params":{{"pageSize":"limit"}}}}"#).expect("write");

        let config = SearchQueryConfig::load(file.path()).expect("load");
        assert_eq!(config.params.page_size, "limit");
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let error = SearchQueryConfig::load(dir.path().join("missing.json")).expect_err("missing");
        assert!(matches!(error, LabelsError::ConfigNotFound(_)));
    }
}
