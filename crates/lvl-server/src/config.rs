use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Port the game client talks to by default.
pub const DEFAULT_PORT: u16 = 5462;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory holding the level directory and the ledger file.
    pub data_root: PathBuf,
    /// Level directory name, relative to `data_root`.
    pub levels_dir: PathBuf,
    /// Ledger file name, relative to `data_root`.
    pub ledger_file: PathBuf,
    /// Answer every route with permissive CORS headers.
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            data_root: PathBuf::from("."),
            levels_dir: PathBuf::from("levels"),
            ledger_file: PathBuf::from("details.json"),
            cors: true,
        }
    }
}

impl ServerConfig {
    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> ServerResult<Self> {
        toml::from_str(s).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn levels_path(&self) -> PathBuf {
        self.data_root.join(&self.levels_dir)
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.data_root.join(&self.ledger_file)
    }
}
