//! Configuration for gateways, the pinning backend and logging.
//!
//! Sources are merged with later ones taking precedence:
//! 1. Bundled defaults (`include_str!` of the workspace `pinway.toml`)
//! 2. `~/.config/pinway/pinway.toml`
//! 3. `./pinway.toml`
//! 4. `PINWAY_*` environment variables, `__` between section and key
//!
//! The dedicated gateway is normally supplied through the environment as
//! `PINWAY_GATEWAY__DEDICATED`.

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use pinway_error::{ConfigError, ConfigErrorKind, PinwayResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../pinway.toml");

/// Load failures tolerated per asset when configuration does not say otherwise.
pub const DEFAULT_MAX_GATEWAY_ATTEMPTS: usize = 5;

/// Gateway resolution settings.
///
/// ```toml
/// [gateway]
/// gateways = ["https://ipfs.io/ipfs", "https://dweb.link/ipfs"]
/// dedicated = "https://example.mypinata.cloud/ipfs"
/// max_attempts = 5
/// probe_timeout_ms = 3000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GatewayConfig {
    /// Public gateway bases in preference order
    pub gateways: Vec<String>,

    /// Deployment-specific gateway placed ahead of the public list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dedicated: Option<String>,

    /// Load failures tolerated per asset before it is reported unavailable
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Liveness probe budget in milliseconds
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

fn default_max_attempts() -> usize {
    DEFAULT_MAX_GATEWAY_ATTEMPTS
}

fn default_probe_timeout_ms() -> u64 {
    3_000
}

/// Pinning backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UploadConfig {
    /// Backend API root, e.g. `https://api.pinata.cloud`
    pub endpoint: String,

    /// Bearer token for the backend
    #[serde(default, skip_serializing)]
    pub jwt: Option<String>,

    /// Total attempts per upload, first try included
    pub max_retries: u32,

    /// Wait before the second attempt; doubles after each further failure
    pub initial_backoff_ms: u64,

    /// Upper bound on any single wait
    pub max_backoff_ms: u64,

    /// Randomize waits to spread retries from many clients
    #[serde(default)]
    pub jitter: bool,

    /// Per-attempt request timeout
    pub request_timeout_ms: u64,

    /// CID version requested from the backend
    pub cid_version: u8,

    /// Ask the backend to wrap the file in a directory
    #[serde(default)]
    pub wrap_with_directory: bool,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset
    pub level: String,

    /// Emit JSON lines instead of human-readable text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Top-level pinway configuration.
///
/// # Example
///
/// ```no_run
/// use pinway_core::PinwayConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = PinwayConfig::load()?;
/// println!("first gateway: {}", config.gateway.gateways[0]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PinwayConfig {
    /// Gateway resolution settings
    pub gateway: GatewayConfig,
    /// Pinning backend settings
    pub upload: UploadConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PinwayConfig {
    /// The bundled defaults alone, without user files or environment.
    #[instrument]
    pub fn bundled() -> PinwayResult<Self> {
        Self::finish(Self::defaults())
    }

    /// Bundled defaults overlaid with a single configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> PinwayResult<Self> {
        debug!("Loading configuration from file");
        Self::finish(Self::defaults().add_source(File::from(path.as_ref())))
    }

    /// Load configuration with precedence: environment > current dir > home dir > bundled.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> PinwayResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder = Self::defaults();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/pinway/pinway.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("pinway").required(false))
            .add_source(
                Environment::with_prefix("PINWAY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("gateway.gateways"),
            );

        Self::finish(builder)
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> PinwayResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Load(e.to_string())))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Parse(e.to_string())))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the resolver or retrier cannot operate with.
    pub fn validate(&self) -> PinwayResult<()> {
        let invalid = |field: &str, reason: &str| {
            ConfigError::new(ConfigErrorKind::InvalidValue {
                field: field.to_string(),
                reason: reason.to_string(),
            })
        };

        if self.gateway.gateways.is_empty() && self.gateway.dedicated.is_none() {
            return Err(invalid("gateway.gateways", "at least one gateway is required").into());
        }
        if self.gateway.max_attempts == 0 {
            return Err(invalid("gateway.max_attempts", "must be at least 1").into());
        }
        if self.upload.max_retries == 0 {
            return Err(invalid("upload.max_retries", "must be at least 1").into());
        }
        if self.upload.max_backoff_ms < self.upload.initial_backoff_ms {
            return Err(invalid(
                "upload.max_backoff_ms",
                "must not be smaller than upload.initial_backoff_ms",
            ).into());
        }
        if !matches!(self.upload.cid_version, 0 | 1) {
            return Err(invalid("upload.cid_version", "must be 0 or 1").into());
        }
        Ok(())
    }

    /// The bearer token, or an error naming the missing key.
    #[track_caller]
    pub fn require_jwt(&self) -> PinwayResult<&str> {
        match self.upload.jwt.as_deref().map(str::trim) {
            Some(jwt) if !jwt.is_empty() => Ok(jwt),
            _ => Err(ConfigError::new(ConfigErrorKind::MissingCredential(
                "upload.jwt (PINWAY_UPLOAD__JWT)".to_string(),
            ))
            .into()),
        }
    }
}
