//! Server settings loaded via OrthoConfig.
//!
//! Values come from `HELPDESK_*` environment variables, an optional
//! configuration file, or command-line flags, in increasing precedence.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

/// Configuration values for binding and wiring the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HELPDESK")]
pub struct ServerSettings {
    /// Address to bind; defaults to all interfaces.
    pub host: Option<IpAddr>,
    /// Port to bind.
    pub port: Option<u16>,
    /// PostgreSQL connection string. Absent means in-memory storage.
    pub database_url: Option<String>,
    /// Directory holding uploaded ticket attachments.
    pub upload_dir: Option<PathBuf>,
    /// Browser origin allowed to make credentialed requests.
    pub cors_origin: Option<String>,
    /// Permit in-memory storage in release builds.
    #[ortho_config(default = false)]
    pub allow_in_memory: bool,
    /// Let public registration create admin accounts.
    #[ortho_config(default = false)]
    pub open_admin_signup: bool,
}

impl ServerSettings {
    /// Socket address the server should bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    /// Upload directory, falling back to `./uploads`.
    #[must_use]
    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR))
    }

    /// Allowed CORS origin, falling back to the local frontend dev server.
    #[must_use]
    pub fn cors_origin(&self) -> &str {
        self.cors_origin.as_deref().unwrap_or(DEFAULT_CORS_ORIGIN)
    }

    /// Database URL with blank values treated as absent.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
