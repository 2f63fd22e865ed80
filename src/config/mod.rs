//! Registry credential configuration.
//!
//! Credentials live in a JSON file in the user's home directory, mapping a
//! registry endpoint to a base64-encoded `username:password` pair and an
//! optional email. A missing file is not an error: it simply yields an
//! empty configuration. A present-but-unreadable or malformed file is.

use crate::error::{CliError, Result};
use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};


/// File name of the per-user credential file.
pub const CONFIG_FILE_NAME: &str = ".stevedorecfg";

/// Returns the credential file path under the given home directory.
pub fn config_path(home: &Path) -> PathBuf {
    home.join(CONFIG_FILE_NAME)
}

/// Credentials for a single registry endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
}

impl AuthConfig {
    /// Creates a new auth entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use stevedore::config::AuthConfig;
    ///
    /// let auth = AuthConfig::new("user", "secret", Some("user@example.com"));
    /// assert_eq!(auth.username, "user");
    /// ```
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        email: Option<impl Into<String>>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: email.map(|e| e.into()),
        }
    }

    /// Encodes the `username:password` pair into the stored base64 form.
    pub fn encode(&self) -> String {
        general_purpose::STANDARD.encode(format!("{}:{}", self.username, self.password))
    }

    /// Decodes a stored base64 `username:password` pair.
    ///
    /// The username may not contain a colon; the password may, so the split
    /// happens at the first one.
    fn decode(auth: &str, endpoint: &str) -> Result<(String, String)> {
        let bytes = general_purpose::STANDARD.decode(auth).map_err(|e| {
            CliError::config_with_source(
                format!("invalid auth encoding for {endpoint}"),
                None,
                e,
            )
        })?;
        let text = String::from_utf8(bytes).map_err(|e| {
            CliError::config_with_source(
                format!("invalid auth encoding for {endpoint}"),
                None,
                e,
            )
        })?;
        match text.split_once(':') {
            Some((username, password)) => Ok((username.to_string(), password.to_string())),
            None => Err(CliError::config(
                format!("invalid auth entry for {endpoint}"),
                None,
            )),
        }
    }
}

/// Stored representation of one auth entry, as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct StoredAuth {
    /// base64 of `username:password`
    auth: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

/// The loaded registry credential configuration: registry endpoint to
/// decoded credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    auths: HashMap<String, AuthConfig>,
}

impl ConfigFile {
    /// Loads the credential file from the given home directory.
    ///
    /// A missing file yields an empty configuration. An unreadable file, a
    /// file that is not a JSON object of auth entries, or an entry whose
    /// auth value does not decode, yields a [`CliError::Config`].
    pub fn load(home: &Path) -> Result<Self> {
        let path = config_path(home);
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path).map_err(|e| {
            CliError::config_with_source(
                format!("failed to read {}", path.display()),
                Some(path.display().to_string()),
                e,
            )
        })?;
        let stored: HashMap<String, StoredAuth> = serde_json::from_str(&raw).map_err(|e| {
            CliError::config_with_source(
                format!("malformed credential file {}", path.display()),
                Some(path.display().to_string()),
                e,
            )
        })?;

        let mut auths = HashMap::new();
        for (endpoint, entry) in stored {
            let (username, password) = AuthConfig::decode(&entry.auth, &endpoint)?;
            auths.insert(
                endpoint,
                AuthConfig {
                    username,
                    password,
                    email: entry.email,
                },
            );
        }
        Ok(Self { auths })
    }

    /// Writes the configuration back to the credential file under the given
    /// home directory, with permissions restricted to the owner.
    pub fn save(&self, home: &Path) -> Result<()> {
        let path = config_path(home);
        let stored: HashMap<&String, StoredAuth> = self
            .auths
            .iter()
            .map(|(endpoint, auth)| {
                (
                    endpoint,
                    StoredAuth {
                        auth: auth.encode(),
                        email: auth.email.clone(),
                    },
                )
            })
            .collect();
        let raw = serde_json::to_string_pretty(&stored).map_err(|e| {
            CliError::config_with_source(
                "failed to serialize credential file".to_string(),
                Some(path.display().to_string()),
                e,
            )
        })?;

        fs::write(&path, raw).map_err(|e| {
            CliError::config_with_source(
                format!("failed to write {}", path.display()),
                Some(path.display().to_string()),
                e,
            )
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).map_err(|e| {
                CliError::config_with_source(
                    format!("failed to restrict permissions on {}", path.display()),
                    Some(path.display().to_string()),
                    e,
                )
            })?;
        }

        Ok(())
    }

    /// Looks up the credentials stored for a registry endpoint.
    pub fn auth_for(&self, endpoint: &str) -> Option<&AuthConfig> {
        self.auths.get(endpoint)
    }

    /// Inserts or replaces the credentials for a registry endpoint.
    pub fn set_auth(&mut self, endpoint: impl Into<String>, auth: AuthConfig) {
        self.auths.insert(endpoint.into(), auth);
    }

    /// Removes the credentials for a registry endpoint, returning them if
    /// present.
    pub fn remove_auth(&mut self, endpoint: &str) -> Option<AuthConfig> {
        self.auths.remove(endpoint)
    }

    /// Iterates over the registry endpoints with stored credentials.
    pub fn endpoints(&self) -> impl Iterator<Item = &str> {
        self.auths.keys().map(String::as_str)
    }

    /// True when no credentials are stored.
    pub fn is_empty(&self) -> bool {
        self.auths.is_empty()
    }
}
