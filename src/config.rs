use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::words::Difficulty;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub users_file: PathBuf,
    pub words_easy: PathBuf,
    pub words_medium: PathBuf,
    pub words_hard: PathBuf,
    pub public_dir: PathBuf,
    pub demo_user_id: String,
    pub seed_demo_user: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let data_dir = env_path("DATA_DIR").unwrap_or_else(|| PathBuf::from("data"));
        let users_file = env_path("USERS_FILE").unwrap_or_else(|| data_dir.join("users.json"));
        let words_easy = env_path("WORDS_EASY")
            .unwrap_or_else(|| data_dir.join(Difficulty::Easy.default_file_name()));
        let words_medium = env_path("WORDS_MEDIUM")
            .unwrap_or_else(|| data_dir.join(Difficulty::Medium.default_file_name()));
        let words_hard = env_path("WORDS_HARD")
            .unwrap_or_else(|| data_dir.join(Difficulty::Hard.default_file_name()));

        let public_dir = env_path("PUBLIC_DIR").unwrap_or_else(|| PathBuf::from("public"));

        let demo_user_id = std::env::var("DEMO_USER_ID")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "demo".to_string());

        let seed_demo_user = env_bool("SEED_DEMO_USER").unwrap_or(true);

        Self {
            host,
            port,
            log_level,
            users_file,
            words_easy,
            words_medium,
            words_hard,
            public_dir,
            demo_user_id,
            seed_demo_user,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    let value = std::env::var(key).ok()?;
    parse_bool(&value)
}

fn parse_bool(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}
