// src/config.rs
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// --- Constants ---
pub const DEFAULT_CONFIG_FILENAME: &str = "chess_duel.json";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 50000;

/// Front-end settings. Every field is optional in the JSON file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Address `join` connects to when none is given.
    pub host: String,
    pub port: u16,
    /// Reprint the board after every accepted move.
    pub show_board: bool,
    /// Log every line received from the peer.
    pub echo_remote: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            show_board: true,
            echo_remote: true,
        }
    }
}

impl Config {
    pub fn from_json(text: &str, origin: &str) -> Result<Config, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(origin.to_string(), e))
    }

    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let origin = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io(origin.clone(), e))?;
        Config::from_json(&text, &origin)
    }

    /// Loads `path` if given, else the default file if it exists, else defaults.
    pub fn load_or_default(path: Option<&str>) -> Result<Config, ConfigError> {
        match path {
            Some(p) => Config::load(Path::new(p)),
            None if Path::new(DEFAULT_CONFIG_FILENAME).exists() => Config::load(Path::new(DEFAULT_CONFIG_FILENAME)),
            None => Ok(Config::default()),
        }
    }
}

// --- Command Line ---

/// What to do right after start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Startup {
    Local,
    Host,
    Join(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub config_path: Option<String>,
    pub startup: Startup,
    pub port: Option<u16>,
    pub help: bool,
}

/// Parses `--config <file>`, `--host`, `--join <addr>`, `--port <n>`, `--help`.
/// The iterator must not include the program name.
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<CliArgs, ConfigError> {
    let mut cli = CliArgs { config_path: None, startup: Startup::Local, port: None, help: false };
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                cli.config_path = Some(args.next().ok_or_else(|| ConfigError::MissingArgument(arg.clone()))?);
            }
            "--host" => cli.startup = Startup::Host,
            "--join" | "-j" => {
                let addr = args.next().ok_or_else(|| ConfigError::MissingArgument(arg.clone()))?;
                cli.startup = Startup::Join(addr);
            }
            "--port" | "-p" => {
                let value = args.next().ok_or_else(|| ConfigError::MissingArgument(arg.clone()))?;
                let port = value.parse().map_err(|_| ConfigError::InvalidArgument(value.clone()))?;
                cli.port = Some(port);
            }
            "--help" | "-h" => cli.help = true,
            other => return Err(ConfigError::InvalidArgument(other.to_string())),
        }
    }
    Ok(cli)
}

impl CliArgs {
    /// Command-line values win over the file.
    pub fn apply(&self, config: &mut Config) {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Startup::Join(addr) = &self.startup {
            config.host = addr.clone();
        }
    }
}
