//! Global and per-statement rendering configuration.
//!
//! The global configuration is read once per process from a TOML file:
//!
//! ```toml
//! # dynsql.toml
//! non_rendering_where_clause_allowed = false
//! empty_list_policy = "constant"   # "constant" | "skip" | "error"
//! ```
//!
//! The file is located through the `DYNSQL_CONFIG` environment variable, falling back
//! to `dynsql.toml` in the working directory. A missing file means defaults.
//! Every statement starts from a copy of the global settings and may override them
//! with `configure_statement` before it is built.

use crate::condition::EmptyListPolicy;
use crate::error::{RenderError, RenderResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "DYNSQL_CONFIG";

/// Configuration file looked up in the working directory when `DYNSQL_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "dynsql.toml";

/// Process-wide defaults for statement configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfiguration {
    /// Allow WHERE/HAVING clauses whose criteria all elide.
    pub non_rendering_where_clause_allowed: bool,
    /// What list conditions do when their list is empty.
    pub empty_list_policy: EmptyListPolicy,
}

static GLOBAL: OnceLock<GlobalConfiguration> = OnceLock::new();

impl GlobalConfiguration {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(raw: &str) -> RenderResult<Self> {
        toml::from_str(raw)
            .map_err(|e| RenderError::config(format!("failed to parse configuration: {e}")))
    }

    /// Read and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            RenderError::config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw).map_err(|e| match e {
            RenderError::Config(msg) => RenderError::config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Locate and load the configuration file, or return defaults when there is none.
    ///
    /// A path named by `DYNSQL_CONFIG` must exist; the implicit `dynsql.toml` is optional.
    pub fn from_env() -> RenderResult<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::load(PathBuf::from(path));
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            Self::load(fallback)
        } else {
            Ok(Self::default())
        }
    }

    /// The process-wide configuration, loaded on first use.
    ///
    /// A configuration that fails to load is reported and replaced by defaults.
    pub fn get() -> &'static GlobalConfiguration {
        GLOBAL.get_or_init(|| match Self::from_env() {
            Ok(config) => config,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(target: "dynsql.config", error = %_err, "using default configuration");
                Self::default()
            }
        })
    }

    /// Build a statement configuration seeded from these settings.
    pub fn statement_configuration(&self) -> StatementConfiguration {
        StatementConfiguration {
            non_rendering_where_clause_allowed: self.non_rendering_where_clause_allowed,
            empty_list_policy: self.empty_list_policy.clone(),
        }
    }
}

/// Per-statement configuration flags.
///
/// Only mutable through a builder's `configure_statement` before `build()`.
#[derive(Debug, Clone)]
pub struct StatementConfiguration {
    non_rendering_where_clause_allowed: bool,
    empty_list_policy: EmptyListPolicy,
}

impl Default for StatementConfiguration {
    fn default() -> Self {
        GlobalConfiguration::get().statement_configuration()
    }
}

impl StatementConfiguration {
    /// Whether a WHERE/HAVING clause may elide to nothing.
    pub fn is_non_rendering_where_clause_allowed(&self) -> bool {
        self.non_rendering_where_clause_allowed
    }

    /// Allow or forbid WHERE/HAVING clauses that elide to nothing.
    pub fn set_non_rendering_where_clause_allowed(&mut self, allowed: bool) -> &mut Self {
        self.non_rendering_where_clause_allowed = allowed;
        self
    }

    /// Policy applied to list conditions that did not choose one themselves.
    pub fn empty_list_policy(&self) -> &EmptyListPolicy {
        &self.empty_list_policy
    }

    /// Set the statement-wide empty list policy.
    pub fn set_empty_list_policy(&mut self, policy: EmptyListPolicy) -> &mut Self {
        self.empty_list_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GlobalConfiguration::from_toml_str("").unwrap();
        assert!(!config.non_rendering_where_clause_allowed);
        assert!(matches!(config.empty_list_policy, EmptyListPolicy::Constant));
    }

    #[test]
    fn test_parse_toml() {
        let config = GlobalConfiguration::from_toml_str(
            r#"
            non_rendering_where_clause_allowed = true
            empty_list_policy = "error"
            "#,
        )
        .unwrap();
        assert!(config.non_rendering_where_clause_allowed);
        assert!(matches!(config.empty_list_policy, EmptyListPolicy::Error));

        let statement = config.statement_configuration();
        assert!(statement.is_non_rendering_where_clause_allowed());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = GlobalConfiguration::from_toml_str("render_everything = true").unwrap_err();
        assert!(matches!(err, RenderError::Config(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = GlobalConfiguration::load("/definitely/not/here/dynsql.toml").unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn test_statement_configuration_mutators() {
        let mut config = GlobalConfiguration::default().statement_configuration();
        config
            .set_non_rendering_where_clause_allowed(true)
            .set_empty_list_policy(EmptyListPolicy::Skip);
        assert!(config.is_non_rendering_where_clause_allowed());
        assert!(matches!(config.empty_list_policy(), EmptyListPolicy::Skip));
    }
}
