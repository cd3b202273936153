use crate::error::ConfigError;
use chrono_tz::Tz;
use smartpot_core::DEFAULT_READINGS_WINDOW;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

const MEMORY_BACKEND: &str = "memory";

pub struct Config {
    bind_addr: SocketAddr,
    store_backend: StoreBackend,
    asset_backend: AssetBackend,
    asset_timeout_ms: u64,
    readings_window: usize,
    timezone: Tz,
    default_image_path: Option<PathBuf>,
    max_image_bytes: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    Postgres(String),
    Memory,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssetBackend {
    Cloudinary(CloudinaryConfig),
    Memory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub api_base: String,
    pub delivery_base: String,
}

impl Config {
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    pub fn store_backend(&self) -> &StoreBackend {
        &self.store_backend
    }

    pub fn asset_backend(&self) -> &AssetBackend {
        &self.asset_backend
    }

    pub fn asset_timeout(&self) -> Duration {
        Duration::from_millis(self.asset_timeout_ms)
    }

    pub fn readings_window(&self) -> usize {
        self.readings_window
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn default_image_path(&self) -> Option<&Path> {
        self.default_image_path.as_deref()
    }

    pub fn max_image_bytes(&self) -> u64 {
        self.max_image_bytes
    }

    /// Reads the config from the environment, after loading a `.env` file if present
    pub fn from_env() -> Result<Config, ConfigError> {
        dotenv::dotenv().ok();
        Config::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let server_port: u16 = parse("SERVER_PORT", &required("SERVER_PORT")?)?;
        let bind_ip: IpAddr = match lookup("BIND_ADDR") {
            Some(raw) => parse("BIND_ADDR", &raw)?,
            None => IpAddr::from([0, 0, 0, 0]),
        };

        let database_url = required("DATABASE_URL")?;
        let store_backend = if database_url == MEMORY_BACKEND {
            StoreBackend::Memory
        } else {
            StoreBackend::Postgres(database_url)
        };

        let asset_backend = match lookup("ASSET_BACKEND").as_deref() {
            Some(MEMORY_BACKEND) => AssetBackend::Memory,
            Some("cloudinary") | None => AssetBackend::Cloudinary(CloudinaryConfig {
                cloud_name: required("CLOUDINARY_CLOUD_NAME")?,
                api_key: required("CLOUDINARY_API_KEY")?,
                api_secret: required("CLOUDINARY_API_SECRET")?,
                api_base: lookup("CLOUDINARY_API_BASE")
                    .unwrap_or_else(|| "https://api.cloudinary.com".to_owned()),
                delivery_base: lookup("CLOUDINARY_DELIVERY_BASE")
                    .unwrap_or_else(|| "https://res.cloudinary.com".to_owned()),
            }),
            Some(other) => return Err(ConfigError::Invalid("ASSET_BACKEND", other.to_owned())),
        };

        let asset_timeout_ms = optional(&lookup, "ASSET_TIMEOUT_MS", 10_000)?;
        let readings_window = optional(&lookup, "READINGS_WINDOW", DEFAULT_READINGS_WINDOW)?;
        if readings_window == 0 {
            return Err(ConfigError::Invalid(
                "READINGS_WINDOW",
                "must be positive".to_owned(),
            ));
        }
        let max_image_bytes = optional(&lookup, "MAX_IMAGE_BYTES", 10 * 1024 * 1024)?;

        let timezone = match lookup("TIMEZONE") {
            Some(raw) => raw
                .parse::<Tz>()
                .map_err(|e| ConfigError::Invalid("TIMEZONE", e.to_string()))?,
            None => Tz::UTC,
        };

        Ok(Config {
            bind_addr: SocketAddr::new(bind_ip, server_port),
            store_backend,
            asset_backend,
            asset_timeout_ms,
            readings_window,
            timezone,
            default_image_path: lookup("DEFAULT_IMAGE_PATH").map(PathBuf::from),
            max_image_bytes,
        })
    }
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid(key, e.to_string()))
}

fn optional<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => parse(key, &raw),
        None => Ok(default),
    }
}
