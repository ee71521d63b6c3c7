use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

/// Preview ceiling applied when no override is configured (2 MiB).
pub const DEFAULT_MAX_PREVIEW_BYTES: u64 = 2 * 1024 * 1024;
/// Default lifetime for signed delivery URLs.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct Config {
    // filesystem configuration
    /// directory all browsing is confined to,
    ///  if not set then the user's home directory is used
    pub root: Option<PathBuf>,
    /// largest file size served through the text preview endpoint
    pub max_preview_bytes: u64,

    // http server configuration
    /// address for the API server to listen on.
    ///  if not set then 0.0.0.0:3000 will be used
    pub listen_addr: SocketAddr,

    // signing configuration
    /// HS256 key material for session verification and signed URLs,
    ///  if not set then a random dev secret is generated at startup
    pub secret: Option<String>,
    /// lifetime for signed URLs when the caller does not pick one
    pub default_ttl_secs: u64,

    // tool catalog
    /// optional TOML file overriding the built-in tool catalog
    pub tools_file: Option<PathBuf>,

    // misc
    pub log_level: tracing::Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: None,
            max_preview_bytes: DEFAULT_MAX_PREVIEW_BYTES,
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), 3000),
            secret: None,
            default_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            tools_file: None,
            log_level: tracing::Level::INFO,
        }
    }
}
