use ::envconfig::Envconfig;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    File,
    Memory,
}

impl ::std::str::FromStr for StorageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(StorageMode::File),
            "memory" => Ok(StorageMode::Memory),
            other => Err(format!("unknown session storage: {}", other)),
        }
    }
}

#[derive(::envconfig::Envconfig, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    #[envconfig(from = "SOCIALAPP_API_BASE_URL", default = "http://localhost:8000")]
    pub api_base_url: String,

    #[envconfig(from = "SOCIALAPP_SESSION_STORAGE", default = "file")]
    pub session_storage: StorageMode,

    #[envconfig(
        from = "SOCIALAPP_SESSION_FILE",
        default = ".socialapp-session.json"
    )]
    pub session_file: String,

    #[envconfig(from = "RUST_LOG", default = "info")]
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, envconfig::Error> {
        Self::init_from_env()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_storage: StorageMode::File,
            session_file: ".socialapp-session.json".to_string(),
            log_level: "info".to_string(),
        }
    }
}
