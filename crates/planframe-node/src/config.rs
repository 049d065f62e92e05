//! Node configuration, read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

/// Runtime settings for the node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,

    /// Directory of the file-backed frame repository.
    pub data_dir: PathBuf,

    /// Default log filter, used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: std::env::var("PLANFRAME_BIND_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            data_dir: std::env::var("PLANFRAME_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            log_filter: std::env::var("PLANFRAME_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

impl NodeConfig {
    /// Read the environment and check the values that can be checked up front.
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self::default();
        config.socket_addr()?;
        anyhow::ensure!(
            !config.data_dir.as_os_str().is_empty(),
            "PLANFRAME_DATA_DIR must not be empty"
        );
        Ok(config)
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        self.bind_addr
            .parse()
            .with_context(|| format!("invalid PLANFRAME_BIND_ADDR `{}`", self.bind_addr))
    }
}
