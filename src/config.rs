//! Configuration file structures and loading.
//!
//! The bot reads a YAML configuration file holding the Matrix account
//! settings. Any value can be overridden with a `ROLLO_`-prefixed
//! environment variable using `__` as the section separator.
//!
//! # Configuration File Format
//!
//! ```yaml
//! matrix:
//!   user_id: "@rollo:matrix.org"
//!   password: "secret-password"
//!   passphrase: "recovery-passphrase"
//! ```
//!
//! # Environment Variable Overrides
//!
//! ```bash
//! export ROLLO_MATRIX__PASSWORD="secret-from-env"
//! export ROLLO_MATRIX__PASSPHRASE="phrase-from-env"
//! ```

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;

/// Root configuration structure for the bot.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Matrix account configuration
    pub matrix: Matrix,
}

/// Matrix account configuration.
///
/// # YAML Section
///
/// ```yaml
/// matrix:
///   user_id: "@rollo:matrix.org"
///   password: "your-password"
///   passphrase: "your-recovery-passphrase"
/// ```
#[derive(Debug, Deserialize)]
pub struct Matrix {
    /// Fully qualified Matrix user ID of the bot account, in the format
    /// `@username:homeserver.com`.
    pub user_id: String,

    /// Matrix account password.
    ///
    /// Used for the initial login. After successful authentication, the
    /// session is persisted and the bot restores it without
    /// re-authenticating.
    pub password: String,

    /// E2EE recovery passphrase.
    ///
    /// Used to decrypt cross-signing keys and restore end-to-end
    /// encryption. Required for participating in encrypted rooms.
    pub passphrase: String,
}

impl Config {
    /// Loads the configuration from a YAML file, applying `ROLLO_`-prefixed
    /// environment overrides on top.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a required value is
    /// missing after the merge.
    pub fn load(path: &str) -> Result<Config, figment::Error> {
        Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("ROLLO_").split("__"))
            .extract()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serial_test::serial;
    use tempfile::NamedTempFile;

    use super::*;

    fn create_config_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "matrix:\n  user_id: \"@rollo:example.com\"\n  password: \"hunter2\"\n  passphrase: \"words\"",
        )
        .unwrap();
        file
    }

    #[test]
    #[serial]
    fn test_load_from_yaml() {
        let file = create_config_file();

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.matrix.user_id, "@rollo:example.com");
        assert_eq!(config.matrix.password, "hunter2");
        assert_eq!(config.matrix.passphrase, "words");
    }

    #[test]
    #[serial]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/config.yaml");
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_env_overrides_yaml() {
        let file = create_config_file();

        unsafe { std::env::set_var("ROLLO_MATRIX__PASSWORD", "from-env") };
        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        unsafe { std::env::remove_var("ROLLO_MATRIX__PASSWORD") };

        assert_eq!(config.matrix.password, "from-env");
        assert_eq!(config.matrix.user_id, "@rollo:example.com");
    }
}
