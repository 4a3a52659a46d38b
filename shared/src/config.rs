use std::env;

pub const DEFAULT_TABLE_NAME: &str = "showcase";
pub const DEFAULT_BUCKET_NAME: &str = "showcase-photos";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Settings read once per cold start
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub table_name: String,
    pub bucket_name: String,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env` but reads from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let allowed_origins = non_empty("ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .filter(|origins| !origins.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_ALLOWED_ORIGIN.to_string()]);

        Self {
            table_name: non_empty("TABLE_NAME").unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
            bucket_name: non_empty("BUCKET_NAME").unwrap_or_else(|| DEFAULT_BUCKET_NAME.to_string()),
            allowed_origins,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]);
        assert_eq!(config.table_name, DEFAULT_TABLE_NAME);
        assert_eq!(config.bucket_name, DEFAULT_BUCKET_NAME);
        assert_eq!(config.allowed_origins, vec![DEFAULT_ALLOWED_ORIGIN]);
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("TABLE_NAME", "prod"),
            ("BUCKET_NAME", "prod-photos"),
            ("ALLOWED_ORIGINS", "https://a.example/, https://b.example ,"),
        ]);
        assert_eq!(config.table_name, "prod");
        assert_eq!(config.bucket_name, "prod-photos");
        assert_eq!(config.allowed_origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn blank_values_fall_back() {
        let config = config(&[("TABLE_NAME", "  "), ("ALLOWED_ORIGINS", " , ")]);
        assert_eq!(config.table_name, DEFAULT_TABLE_NAME);
        assert_eq!(config.allowed_origins, vec![DEFAULT_ALLOWED_ORIGIN]);
    }
}
