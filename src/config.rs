use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Database file name inside the data directory.
const DB_FILE: &str = "batepapo.db";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data_dir: PathBuf,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./chat-data"),
            port: 5000,
        }
    }
}

impl Config {
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }
}
