use std::env;
use std::fs;
use std::io;
use std::path::Path;

use log::LevelFilter;
use ringplan_core::Options;
use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! from_environment {
    ($config:expr, $($key:expr, $name:tt),*$(,)?) => {{
        $(
            {
                if let Ok(value) = env::var($key) {
                    match value.parse() {
                        Ok(value) => $config.$name = value,
                        Err(_) => log::warn!("Ignoring invalid value {:?} of {}", value, $key),
                    }
                }
            }
        )*
    }};
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub loglevel: LevelFilter,
    pub options: Options,
}

impl Config {
    pub fn from_file<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let buf = fs::read_to_string(path)?;

        Ok(toml::from_str(&buf)?)
    }

    /// Overrides all values set in `RINGPLAN_*` environment variables.
    pub fn with_environment(mut self) -> Self {
        from_environment!(self, "RINGPLAN_LOGLEVEL", loglevel);
        from_environment!(
            self.options,
            "RINGPLAN_RINGS",
            rings,
            "RINGPLAN_COMPETITORS",
            competitors,
            "RINGPLAN_MATCH_MINUTES",
            match_minutes,
            "RINGPLAN_START",
            start,
            "RINGPLAN_END",
            end,
            "RINGPLAN_MIN_GROUP_SIZE",
            min_group_size,
            "RINGPLAN_MAX_GROUP_SIZE",
            max_group_size,
        );

        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loglevel: LevelFilter::Warn,
            options: Options::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
