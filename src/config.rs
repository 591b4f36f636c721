use std::path::PathBuf;

use color_eyre::eyre::{Result, eyre};
use directories::ProjectDirs;

use crate::audio::config::AudioConfig;

pub const DEFAULT_API_URL: &str = "https://saavn.dev/api";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub data_dir: PathBuf,
    pub audio: AudioConfig,
}

impl Config {
    /// Reads `SAAVTUI_*` variables (a `.env` file is honoured by `main`).
    pub fn from_env() -> Result<Self> {
        let api_url = std::env::var("SAAVTUI_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let data_dir = match std::env::var_os("SAAVTUI_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => project_dirs()?.data_local_dir().to_path_buf(),
        };

        let mut audio = AudioConfig::default();
        if let Ok(query) = std::env::var("SAAVTUI_FOR_YOU_QUERY")
            && !query.trim().is_empty()
        {
            audio.for_you_fallback_query = query;
        }

        Ok(Self {
            api_url,
            data_dir,
            audio,
        })
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join("settings.json")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(concat!(env!("CARGO_PKG_NAME"), ".log"))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", env!("CARGO_PKG_NAME"))
        .ok_or_else(|| eyre!("could not determine a home directory"))
}
