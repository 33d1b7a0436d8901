use std::env;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use url::Url;

use crate::utils::validation::ImageRule;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_SEED_URL: &str = "https://randomuser.me/api/";
const DEFAULT_SEED_COUNT: usize = 10;
const DEFAULT_SEED_NATIONALITY: &str = "in";
const MAX_SEED_COUNT: usize = 100;

#[derive(Debug)]
pub struct ConfigError {
    var: &'static str,
    value: String,
    reason: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} has invalid value `{}`: {}", self.var, self.value, self.reason)
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub enabled: bool,
    pub url: Url,
    pub count: usize,
    pub nationality: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub data_dir: PathBuf,
    pub seed: SeedConfig,
    pub image_rule: ImageRule,
}

impl AppConfig {
    /// Reads `HR_*` variables from the process environment. Call
    /// `dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let bind_addr = read("HR_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let data_dir = PathBuf::from(read("HR_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()));

        let enabled = parse_bool("HR_SEED_ENABLED", read("HR_SEED_ENABLED"), true)?;

        let raw_url = read("HR_SEED_URL").unwrap_or_else(|| DEFAULT_SEED_URL.to_string());
        let url = Url::parse(&raw_url).map_err(|err| ConfigError {
            var: "HR_SEED_URL",
            value: raw_url.clone(),
            reason: err.to_string(),
        })?;

        let count = match read("HR_SEED_COUNT") {
            None => DEFAULT_SEED_COUNT,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(count) if (1..=MAX_SEED_COUNT).contains(&count) => count,
                _ => {
                    return Err(ConfigError {
                        var: "HR_SEED_COUNT",
                        value: raw,
                        reason: format!("expected a number between 1 and {}", MAX_SEED_COUNT),
                    })
                }
            },
        };

        let nationality =
            read("HR_SEED_NATIONALITY").unwrap_or_else(|| DEFAULT_SEED_NATIONALITY.to_string());

        let image_rule = if parse_bool("HR_REQUIRE_IMAGE", read("HR_REQUIRE_IMAGE"), true)? {
            ImageRule::Required
        } else {
            ImageRule::Optional
        };

        Ok(Self {
            bind_addr,
            data_dir,
            seed: SeedConfig {
                enabled,
                url,
                count,
                nationality,
            },
            image_rule,
        })
    }
}

fn parse_bool(var: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError {
            var,
            value: raw,
            reason: "expected true or false".to_string(),
        }),
    }
}
