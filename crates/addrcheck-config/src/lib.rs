use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

const APP_DIR: &str = "addrcheck";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_TOKEN_URL: &str = "https://apis.usps.com/oauth2/v3/token";
pub const DEFAULT_ADDRESS_URL: &str = "https://apis.usps.com/addresses/v3/address";
pub const DEFAULT_GEOCODING_URL: &str = "https://api.opencagedata.com/geocode/v1/json";
pub const DEFAULT_USER_AGENT: &str = "addrcheck";

pub const ENV_CLIENT_ID: &str = "ADDRCHECK_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "ADDRCHECK_CLIENT_SECRET";
pub const ENV_GEOCODING_API_KEY: &str = "ADDRCHECK_GEOCODING_API_KEY";

/// Opaque credential. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub user_agent: String,
    pub validation: ValidationConfig,
    pub geocoding: GeocodingConfig,
}

#[derive(Debug, Clone)]
pub struct ValidationConfig {
    pub client_id: Option<Secret>,
    pub client_secret: Option<Secret>,
    pub token_url: String,
    pub address_url: String,
}

#[derive(Debug, Clone)]
pub struct GeocodingConfig {
    pub api_key: Option<Secret>,
    pub url: String,
    pub enabled: bool,
}

#[derive(Debug, Clone)]
pub struct ValidationCredentials {
    pub client_id: Secret,
    pub client_secret: Secret,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            validation: ValidationConfig {
                client_id: None,
                client_secret: None,
                token_url: DEFAULT_TOKEN_URL.to_string(),
                address_url: DEFAULT_ADDRESS_URL.to_string(),
            },
            geocoding: GeocodingConfig {
                api_key: None,
                url: DEFAULT_GEOCODING_URL.to_string(),
                enabled: true,
            },
        }
    }
}

impl AppConfig {
    pub fn validation_credentials(&self) -> Result<ValidationCredentials> {
        let client_id = self
            .validation
            .client_id
            .clone()
            .ok_or(ConfigError::MissingSecret {
                key: "validation.client_id",
                env: ENV_CLIENT_ID,
            })?;
        let client_secret =
            self.validation
                .client_secret
                .clone()
                .ok_or(ConfigError::MissingSecret {
                    key: "validation.client_secret",
                    env: ENV_CLIENT_SECRET,
                })?;
        Ok(ValidationCredentials {
            client_id,
            client_secret,
        })
    }

    pub fn geocoding_api_key(&self) -> Result<Secret> {
        self.geocoding
            .api_key
            .clone()
            .ok_or(ConfigError::MissingSecret {
                key: "geocoding.api_key",
                env: ENV_GEOCODING_API_KEY,
            })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("missing secret {key} (set it in the config file or {env})")]
    MissingSecret {
        key: &'static str,
        env: &'static str,
    },
    #[error("invalid {field} url {value:?}: {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },
    #[error("invalid user_agent value")]
    InvalidUserAgent,
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    user_agent: Option<String>,
    validation: Option<ValidationFile>,
    geocoding: Option<GeocodingFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ValidationFile {
    client_id: Option<String>,
    client_secret: Option<String>,
    token_url: Option<String>,
    address_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GeocodingFile {
    api_key: Option<String>,
    url: Option<String>,
    enabled: Option<bool>,
}

/// Loads the config file (if any) and applies environment overrides.
pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    load_with_env(config_path, |name| env::var(name).ok())
}

pub fn load_with_env<F>(config_path: Option<PathBuf>, lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let required = config_path.is_some();
    let parsed = match resolve_config_path(config_path) {
        Ok(path) => load_at_path(&path, required)?,
        Err(ConfigError::MissingHomeDir) if !required => None,
        Err(ConfigError::InvalidConfigPath(_)) if !required => None,
        Err(err) => return Err(err),
    };
    let mut config = merge_config(parsed.unwrap_or_default())?;
    apply_env(&mut config, lookup);
    Ok(config)
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<ConfigFile>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(parsed))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(user_agent) = parsed.user_agent {
        let trimmed = user_agent.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::InvalidUserAgent);
        }
        config.user_agent = trimmed.to_string();
    }

    if let Some(validation) = parsed.validation {
        if let Some(raw) = validation.client_id {
            config.validation.client_id = Secret::new(&raw);
        }
        if let Some(raw) = validation.client_secret {
            config.validation.client_secret = Secret::new(&raw);
        }
        if let Some(raw) = validation.token_url {
            config.validation.token_url = validate_url("validation.token_url", &raw)?;
        }
        if let Some(raw) = validation.address_url {
            config.validation.address_url = validate_url("validation.address_url", &raw)?;
        }
    }

    if let Some(geocoding) = parsed.geocoding {
        if let Some(raw) = geocoding.api_key {
            config.geocoding.api_key = Secret::new(&raw);
        }
        if let Some(raw) = geocoding.url {
            config.geocoding.url = validate_url("geocoding.url", &raw)?;
        }
        if let Some(enabled) = geocoding.enabled {
            config.geocoding.enabled = enabled;
        }
    }

    Ok(config)
}

fn apply_env<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let secret = |name: &str| lookup(name).and_then(|raw| Secret::new(&raw));
    if let Some(value) = secret(ENV_CLIENT_ID) {
        config.validation.client_id = Some(value);
    }
    if let Some(value) = secret(ENV_CLIENT_SECRET) {
        config.validation.client_secret = Some(value);
    }
    if let Some(value) = secret(ENV_GEOCODING_API_KEY) {
        config.geocoding.api_key = Some(value);
    }
}

fn validate_url(field: &'static str, raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|err| ConfigError::InvalidUrl {
        field,
        value: trimmed.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            field,
            value: trimmed.to_string(),
            reason: "scheme must be http or https".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
