//! Configuration loader for Verbum.
//!
//! The config file is found in this order:
//! 1. the path given on the command line (`--config`)
//! 2. `$VERBUM_CONFIG`
//! 3. `./verbum.toml`
//! 4. `{config_dir}/verbum/verbum.toml` (e.g. `~/.config/verbum/verbum.toml`)
//!
//! An explicitly named file must exist and parse. A missing default file
//! silently yields [`AssistantConfig::default()`]. Environment overrides
//! (`VERBUM_MODEL`, `PORT`) are applied last, then the result is validated.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use verbum_types::config::{AssistantConfig, BackendConfig};
use verbum_types::error::ConfigError;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "VERBUM_CONFIG";

/// Environment variable overriding `backend.model`.
pub const MODEL_ENV: &str = "VERBUM_MODEL";

/// Environment variable overriding `server.port`.
pub const PORT_ENV: &str = "PORT";

pub const DEFAULT_CONFIG_FILE: &str = "verbum.toml";

/// Where a config file path came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named by the user; must exist.
    Explicit(PathBuf),
    /// Conventional location; may be absent.
    Default(PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> &Path {
        match self {
            ConfigSource::Explicit(p) | ConfigSource::Default(p) => p,
        }
    }
}

/// Pick the config file to read. `lookup` reads environment variables.
pub fn resolve_config_path(
    cli_path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> ConfigSource {
    if let Some(path) = cli_path {
        return ConfigSource::Explicit(path.to_path_buf());
    }
    if let Some(path) = lookup(CONFIG_PATH_ENV).filter(|p| !p.trim().is_empty()) {
        return ConfigSource::Explicit(PathBuf::from(path));
    }

    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    if local.exists() {
        return ConfigSource::Default(local);
    }
    match dirs::config_dir() {
        Some(dir) => ConfigSource::Default(dir.join("verbum").join(DEFAULT_CONFIG_FILE)),
        None => ConfigSource::Default(local),
    }
}

/// Read and parse the file named by `source`.
pub async fn load_config_file(source: &ConfigSource) -> Result<AssistantConfig, ConfigError> {
    let path = source.path();
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err)
            if err.kind() == std::io::ErrorKind::NotFound
                && matches!(source, ConfigSource::Default(_)) =>
        {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(AssistantConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source: err,
            });
        }
    };

    toml::from_str::<AssistantConfig>(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

/// Apply `VERBUM_MODEL` and `PORT` on top of the file values.
pub fn apply_env_overrides(
    config: &mut AssistantConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if let Some(model) = lookup(MODEL_ENV).filter(|m| !m.trim().is_empty()) {
        config.backend.model = model.trim().to_string();
    }
    if let Some(port) = lookup(PORT_ENV) {
        config.server.port = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("{PORT_ENV} must be a port number, got '{port}'")))?;
    }
    Ok(())
}

/// Resolve, read, override and validate the configuration.
pub async fn load_config(cli_path: Option<&Path>) -> Result<AssistantConfig, ConfigError> {
    let env = |name: &str| std::env::var(name).ok();
    let source = resolve_config_path(cli_path, env);
    let mut config = load_config_file(&source).await?;
    apply_env_overrides(&mut config, env)?;
    config.validate()?;
    tracing::debug!(path = %source.path().display(), model = %config.backend.model, "Configuration loaded");
    Ok(config)
}

/// Fetch the backend API key named by `backend.api_key_env`.
///
/// Offline mode needs no key and yields `None`. Otherwise a missing or blank
/// variable is a [`ConfigError::MissingApiKey`].
pub fn resolve_api_key(
    backend: &BackendConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Option<SecretString>, ConfigError> {
    if backend.offline {
        return Ok(None);
    }
    match lookup(&backend.api_key_env) {
        Some(key) if !key.trim().is_empty() => Ok(Some(SecretString::from(key.trim().to_string()))),
        _ => Err(ConfigError::MissingApiKey {
            var: backend.api_key_env.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[tokio::test]
    async fn missing_default_file_returns_defaults() {
        let tmp = TempDir::new().unwrap();
        let source = ConfigSource::Default(tmp.path().join("verbum.toml"));
        let config = load_config_file(&source).await.unwrap();
        assert_eq!(config.chat.max_history, 10);
    }

    #[tokio::test]
    async fn missing_explicit_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let source = ConfigSource::Explicit(tmp.path().join("nope.toml"));
        let err = load_config_file(&source).await.unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[tokio::test]
    async fn valid_file_is_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("verbum.toml");
        tokio::fs::write(
            &path,
            r#"
[chat]
max_history = 6
window_size = 3

[backend]
model = "gemini-1.5-pro"
"#,
        )
        .await
        .unwrap();

        let config = load_config_file(&ConfigSource::Explicit(path)).await.unwrap();
        assert_eq!(config.chat.max_history, 6);
        assert_eq!(config.chat.window_size, 3);
        assert_eq!(config.backend.model, "gemini-1.5-pro");
    }

    #[tokio::test]
    async fn malformed_file_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("verbum.toml");
        tokio::fs::write(&path, "this is not { valid toml !!!").await.unwrap();

        let err = load_config_file(&ConfigSource::Default(path)).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn cli_path_wins_over_env() {
        let source = resolve_config_path(
            Some(Path::new("cli.toml")),
            env(&[(CONFIG_PATH_ENV, "env.toml")]),
        );
        assert_eq!(source, ConfigSource::Explicit(PathBuf::from("cli.toml")));

        let source = resolve_config_path(None, env(&[(CONFIG_PATH_ENV, "env.toml")]));
        assert_eq!(source, ConfigSource::Explicit(PathBuf::from("env.toml")));
    }

    #[test]
    fn no_path_falls_back_to_default_location() {
        let source = resolve_config_path(None, env(&[]));
        assert!(matches!(source, ConfigSource::Default(_)));
        assert!(source.path().ends_with(DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = AssistantConfig::default();
        apply_env_overrides(&mut config, env(&[(MODEL_ENV, "gemini-exp"), (PORT_ENV, "8080")]))
            .unwrap();
        assert_eq!(config.backend.model, "gemini-exp");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn bad_port_override_is_invalid() {
        let mut config = AssistantConfig::default();
        let err = apply_env_overrides(&mut config, env(&[(PORT_ENV, "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn api_key_resolution() {
        let backend = BackendConfig::default();
        let key = resolve_api_key(&backend, env(&[("GEMINI_API_KEY", " abc ")]))
            .unwrap()
            .unwrap();
        assert_eq!(key.expose_secret(), "abc");

        let err = resolve_api_key(&backend, env(&[("GEMINI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey { ref var } if var == "GEMINI_API_KEY"));
    }

    #[test]
    fn offline_needs_no_key() {
        let backend = BackendConfig {
            offline: true,
            ..BackendConfig::default()
        };
        assert!(resolve_api_key(&backend, env(&[])).unwrap().is_none());
    }
}
