//! Configuration loaded from `profmerge.toml` and `PROFMERGE_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use profmerge::dedup::MatchConfig;
use profmerge::render::SqlOptions;
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "profmerge.toml";
const ENV_PREFIX: &str = "PROFMERGE_";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Level for this crate's log target; `RUST_LOG` overrides it entirely.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(flatten)]
    pub matching: MatchConfig,

    #[serde(default = "default_sql_table")]
    pub sql_table: String,
    #[serde(default = "default_merge_function")]
    pub merge_function: String,
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_sql_table() -> String {
    SqlOptions::default().table
}

fn default_merge_function() -> String {
    SqlOptions::default().merge_function
}

impl Config {
    /// Load from an explicit TOML file (which must exist) or the optional
    /// default file, with environment variables taking precedence.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => {
                if !path.exists() {
                    bail!("config file {} does not exist", path.display());
                }
                path.to_path_buf()
            }
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        Figment::new()
            .merge(Toml::file(&file))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .context("Failed to load config")
    }

    pub fn sql_options(&self) -> SqlOptions {
        SqlOptions {
            table: self.sql_table.clone(),
            merge_function: self.merge_function.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_without_file_or_env() {
        Jail::expect_with(|_jail| {
            let config = Config::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.log_level, "info");
            assert_eq!(config.matching, MatchConfig::default());
            assert_eq!(config.sql_options(), SqlOptions::default());
            Ok(())
        });
    }

    #[test]
    fn file_then_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "profmerge.toml",
                r#"
                log_level = "warn"
                typo_max_distance = 1
                placeholder_patterns = ["vacancy", "tbd"]
                "#,
            )?;
            jail.set_env("PROFMERGE_LOG_LEVEL", "debug");
            jail.set_env("PROFMERGE_TYPO_MIN_LENGTH", "7");
            jail.set_env("PROFMERGE_CONTAINMENT_WORD_BOUNDARY", "true");

            let config = Config::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.log_level, "debug");
            assert_eq!(config.matching.typo_max_distance, 1);
            assert_eq!(config.matching.typo_min_length, 7);
            assert_eq!(config.matching.placeholder_patterns, vec!["vacancy", "tbd"]);
            assert_eq!(config.matching.partial_min_tokens, 2);
            assert!(config.matching.containment_word_boundary);
            assert_eq!(config.matching.containment_min_tokens, 1);
            Ok(())
        });
    }

    #[test]
    fn explicit_file_must_exist() {
        Jail::expect_with(|_jail| {
            assert!(Config::load(Some(Path::new("missing.toml"))).is_err());
            Ok(())
        });
    }

    #[test]
    fn explicit_file_sets_sql_names() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
                sql_table = "staff.teachers"
                merge_function = "merge_teachers"
                "#,
            )?;
            let config = Config::load(Some(Path::new("custom.toml"))).map_err(|e| e.to_string())?;
            let options = config.sql_options();
            assert_eq!(options.table, "staff.teachers");
            assert_eq!(options.merge_function, "merge_teachers");
            Ok(())
        });
    }
}
