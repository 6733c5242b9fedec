//! Mirror configuration

use std::path::PathBuf;

pub const DEFAULT_SOURCE_URL: &str = "https://fbref.com/en/comps/9/Premier-League-Stats";
pub const DEFAULT_SPREADSHEET_TITLE: &str = "2024-2025 Premier League Data";
pub const DEFAULT_HISTORY_LOG: &str = "history.log";

/// Settings for one run of the mirror
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorConfig {
    /// Key of the target spreadsheet (`SHEET_ID`)
    pub spreadsheet_id: String,

    /// Path to the service-account key file (`CREDENTIALS_FILE`)
    pub credentials_file: PathBuf,

    /// Page whose tables are mirrored
    pub source_url: String,

    /// Display title given to the spreadsheet
    pub spreadsheet_title: String,

    /// Append-only run history
    pub history_log: PathBuf,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            credentials_file: PathBuf::new(),
            source_url: DEFAULT_SOURCE_URL.to_string(),
            spreadsheet_title: DEFAULT_SPREADSHEET_TITLE.to_string(),
            history_log: PathBuf::from(DEFAULT_HISTORY_LOG),
        }
    }
}

impl MirrorConfig {
    /// Create config from environment variables.
    ///
    /// `SHEET_ID` and `CREDENTIALS_FILE` are not checked here; when they are
    /// missing the run fails at authentication.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            spreadsheet_id: lookup("SHEET_ID").unwrap_or_default(),
            credentials_file: lookup("CREDENTIALS_FILE").map(PathBuf::from).unwrap_or_default(),
            source_url: lookup("SOURCE_URL").unwrap_or(defaults.source_url),
            spreadsheet_title: lookup("SHEET_TITLE").unwrap_or(defaults.spreadsheet_title),
            history_log: lookup("HISTORY_LOG").map(PathBuf::from).unwrap_or(defaults.history_log),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_required_values_from_lookup() {
        let config = MirrorConfig::from_lookup(lookup_from(&[
            ("SHEET_ID", "1AbCdEf"),
            ("CREDENTIALS_FILE", "/etc/mirror/creds.json"),
        ]));

        assert_eq!(config.spreadsheet_id, "1AbCdEf");
        assert_eq!(config.credentials_file, PathBuf::from("/etc/mirror/creds.json"));
        assert_eq!(config.source_url, DEFAULT_SOURCE_URL);
        assert_eq!(config.spreadsheet_title, DEFAULT_SPREADSHEET_TITLE);
        assert_eq!(config.history_log, PathBuf::from("history.log"));
    }

    #[test]
    fn test_missing_values_are_left_empty() {
        let config = MirrorConfig::from_lookup(lookup_from(&[]));

        assert!(config.spreadsheet_id.is_empty());
        assert!(config.credentials_file.as_os_str().is_empty());
        assert_eq!(config, MirrorConfig::default());
    }

    #[test]
    fn test_optional_overrides() {
        let config = MirrorConfig::from_lookup(lookup_from(&[
            ("SOURCE_URL", "https://fbref.com/en/comps/12/La-Liga-Stats"),
            ("SHEET_TITLE", "La Liga"),
            ("HISTORY_LOG", "/var/log/mirror.log"),
        ]));

        assert_eq!(config.source_url, "https://fbref.com/en/comps/12/La-Liga-Stats");
        assert_eq!(config.spreadsheet_title, "La Liga");
        assert_eq!(config.history_log, PathBuf::from("/var/log/mirror.log"));
    }
}
