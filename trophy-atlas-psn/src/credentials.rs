use std::path::PathBuf;

use crate::error::PsnError;

/// Credentials for authenticating with the PSN API.
///
/// The NPSSO token is a session cookie the user copies from a logged-in
/// browser session; it is exchanged for an OAuth access token at connect
/// time.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub npsso: String,
}

/// Where the NPSSO token's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the config file.
    ConfigFile,
    /// Not set anywhere.
    Missing,
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// TOML config file format.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct ConfigFile {
    psn: Option<PsnConfig>,
}

#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct PsnConfig {
    npsso: Option<String>,
}

impl Credentials {
    /// Load the NPSSO token from the environment or the config file.
    ///
    /// Priority: `PSN_NPSSO` env var > config file.
    pub fn load() -> Result<Self, PsnError> {
        let npsso = std::env::var("PSN_NPSSO")
            .ok()
            .or_else(|| load_config_file().and_then(|c| c.npsso))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                PsnError::Config(
                    "Missing NPSSO token. Set the PSN_NPSSO env var or add it to the config file"
                        .to_string(),
                )
            })?;

        Ok(Self { npsso })
    }
}

/// Return the path to the credentials config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("trophy-atlas").join("credentials.toml"))
}

/// Save credentials to the config file, creating parent directories as needed.
///
/// Returns the path the file was written to.
pub fn save_to_file(creds: &Credentials) -> Result<PathBuf, PsnError> {
    let path = config_path()
        .ok_or_else(|| PsnError::Config("Could not determine config directory".to_string()))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let config = ConfigFile {
        psn: Some(PsnConfig {
            npsso: Some(creds.npsso.clone()),
        }),
    };

    let toml_str = toml::to_string_pretty(&config)
        .map_err(|e| PsnError::Config(format!("Failed to serialize config: {}", e)))?;

    std::fs::write(&path, toml_str)?;
    Ok(path)
}

/// Determine where the NPSSO token is coming from.
pub fn credential_source() -> CredentialSource {
    if std::env::var("PSN_NPSSO").is_ok() {
        CredentialSource::EnvVar("PSN_NPSSO")
    } else if load_config_file().and_then(|c| c.npsso).is_some() {
        CredentialSource::ConfigFile
    } else {
        CredentialSource::Missing
    }
}

fn load_config_file() -> Option<PsnConfig> {
    let path = config_path()?;
    let content = std::fs::read_to_string(&path).ok()?;
    let config: ConfigFile = toml::from_str(&content).ok()?;
    config.psn
}
