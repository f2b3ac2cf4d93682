use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_host: String,
    pub port: u16,
    pub data_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind_host: env::var("REMINDER_BIND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("REMINDER_PORT", 8080),
            data_path: env::var("REMINDER_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./reminders.json")),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("{} is not valid ({:?}), using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}
