use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use shared::domain::Difficulty;
use tracing::warn;

pub const SETTINGS_FILE: &str = "sudoku.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server_url: String,
    pub difficulty: Difficulty,
    pub device_id_path: PathBuf,
    pub sync_interval_seconds: u64,
    pub share_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8000".into(),
            difficulty: Difficulty::default(),
            device_id_path: PathBuf::from("./data/device_id"),
            sync_interval_seconds: 10,
            share_base_url: "http://localhost:5173/".into(),
        }
    }
}

impl Settings {
    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_seconds.max(1))
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            Ok(file_cfg) => {
                let file_cfg: HashMap<String, String> = file_cfg
                    .into_iter()
                    .filter_map(|(key, value)| scalar_to_string(value).map(|v| (key, v)))
                    .collect();
                apply(&mut settings, |key| file_cfg.get(key).cloned());
            }
            Err(error) => warn!(path = %path.display(), %error, "ignoring unreadable settings file"),
        }
    }

    if let Some(v) = env("SUDOKU_SERVER_URL") {
        settings.server_url = v;
    }
    apply(&mut settings, |key| env(&format!("APP__{}", key.to_uppercase())));

    settings
}

fn apply(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("server_url") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("difficulty") {
        match Difficulty::parse(&v) {
            Some(difficulty) => settings.difficulty = difficulty,
            None => warn!(value = %v, "unknown difficulty, keeping {}", settings.difficulty),
        }
    }
    if let Some(v) = lookup("device_id_path") {
        settings.device_id_path = PathBuf::from(v);
    }
    if let Some(v) = lookup("sync_interval_seconds") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.sync_interval_seconds = parsed;
        }
    }
    if let Some(v) = lookup("share_base_url") {
        settings.share_base_url = v;
    }
}

fn scalar_to_string(value: toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s),
        toml::Value::Integer(i) => Some(i.to_string()),
        _ => None,
    }
}
