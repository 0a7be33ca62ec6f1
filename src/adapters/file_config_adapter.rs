//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }

    fn keys(&self, section: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .config
            .get_map_ref()
            .get(&section.to_lowercase())
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    const SAMPLE: &str = r#"
[provider]
kind = sqlite

[sqlite]
path = /var/lib/trendscan/screener.db
pool_size = 8

[screen]
exchange = NSE
max_concurrency = 12
use_cache = yes

[trend_support]
rsi_max = 60.5

[lists]
nifty it = 1594,11536
nifty bank = 1333,4963
"#;

    #[test]
    fn from_string_parses_config() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(
            adapter.get_string("provider", "kind"),
            Some("sqlite".to_string())
        );
        assert_eq!(
            adapter.get_string("sqlite", "path"),
            Some("/var/lib/trendscan/screener.db".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_string("screen", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_value_or_default() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_int("screen", "max_concurrency", 10), 12);
        assert_eq!(adapter.get_int("screen", "top_n", 10), 10);
    }

    #[test]
    fn get_int_returns_default_for_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[screen]\ntop_n = many\n").unwrap();
        assert_eq!(adapter.get_int("screen", "top_n", 10), 10);
    }

    #[test]
    fn get_double_returns_value_or_default() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_double("trend_support", "rsi_max", 65.0), 60.5);
        assert_eq!(adapter.get_double("trend_support", "volume_factor", 0.8), 0.8);
    }

    #[test]
    fn get_bool_values() {
        let adapter =
            FileConfigAdapter::from_string("[screen]\na = true\nb = no\nc = maybe\n").unwrap();
        assert!(adapter.get_bool("screen", "a", false));
        assert!(!adapter.get_bool("screen", "b", true));
        assert!(adapter.get_bool("screen", "c", true));
        assert!(!adapter.get_bool("screen", "missing", false));
    }

    #[test]
    fn keys_lists_section_entries_sorted() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.keys("lists"), vec!["nifty bank", "nifty it"]);
        assert_eq!(adapter.keys("LISTS"), vec!["nifty bank", "nifty it"]);
        assert!(adapter.keys("nothing").is_empty());
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[csv]\npath = /data/nse\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("csv", "path"),
            Some("/data/nse".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/trendscan.ini");
        assert!(result.is_err());
    }
}
