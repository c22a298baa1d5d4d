//! Server configuration read from the environment.

use std::env;
use std::net::SocketAddr;

use actix_web::cookie::Key;
use tracing::warn;

/// Runtime configuration for the HTTP server.
///
/// Variables:
/// - `BIND_ADDR`: listen address, default `0.0.0.0:8080`.
/// - `REDIS_URL`: document store; unset falls back to in-memory stores.
/// - `SESSION_KEY_FILE`: file holding the session signing key material;
///   a missing file falls back to an ephemeral key.
/// - `SESSION_COOKIE_SECURE`: set to `0` to allow plain-HTTP cookies.
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub redis_url: Option<String>,
    pub session_key: Key,
    pub cookie_secure: bool,
}

impl ServerConfig {
    /// Assemble the configuration from environment variables.
    pub fn from_env() -> std::io::Result<Self> {
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_owned())
            .parse()
            .map_err(|error| {
                std::io::Error::other(format!("BIND_ADDR is not a socket address: {error}"))
            })?;

        let key_path = env::var("SESSION_KEY_FILE")
            .unwrap_or_else(|_| "/var/run/secrets/session_key".to_owned());
        let session_key = match std::fs::read(&key_path) {
            Ok(bytes) => Key::derive_from(&bytes),
            Err(error) => {
                warn!(path = %key_path, %error, "using an ephemeral session key; sessions reset on restart");
                Key::generate()
            }
        };

        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .map(|value| value != "0")
            .unwrap_or(true);

        Ok(Self {
            bind_addr,
            redis_url: env::var("REDIS_URL").ok(),
            session_key,
            cookie_secure,
        })
    }
}
