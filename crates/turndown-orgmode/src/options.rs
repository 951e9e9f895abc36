//! Delimiters used by the Org-mode inline rules.

use serde::Deserialize;

/// Settings for the Org-mode rule set
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrgModeOptions {
    /// Wraps emphasised text (`/italic/`)
    pub em_delimiter: String,

    /// Wraps strong text (`*bold*`)
    pub strong_delimiter: String,
}

impl Default for OrgModeOptions {
    fn default() -> Self {
        Self {
            em_delimiter: "/".to_string(),
            strong_delimiter: "*".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = OrgModeOptions::default();
        assert_eq!(options.em_delimiter, "/");
        assert_eq!(options.strong_delimiter, "*");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options: OrgModeOptions = serde_json::from_str(r#"{"emDelimiter": "_"}"#).unwrap();
        assert_eq!(options.em_delimiter, "_");
        assert_eq!(options.strong_delimiter, "*");
    }
}
