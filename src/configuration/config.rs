#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::collections::HashMap;
use std::env;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use strum::IntoStaticStr;
use tokio::fs;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(
    Clone, Copy, Debug, Eq, PartialEq, EnumIter, EnumVariantNames, IntoStaticStr, strum::Display,
)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ApiURL,
    ConfigFile,
    RequestTimeout,
    TokenFile,
}

impl ConfigKey {
    /// Key name as used in config files, CLI flags and clap argument ids.
    pub fn as_str(&self) -> &'static str {
        return (*self).into();
    }

    fn is_integer(&self) -> bool {
        return *self == ConfigKey::RequestTimeout;
    }
}

/// Per-user directory for bistro files, under `base` when the platform has
/// one.
pub fn app_dir(base: Option<path::PathBuf>) -> path::PathBuf {
    return base.unwrap_or_else(env::temp_dir).join("bistro");
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default(key: ConfigKey) -> String {
        let res = match key {
            ConfigKey::ApiURL => "http://127.0.0.1:8000".to_string(),
            ConfigKey::ConfigFile => app_dir(dirs::config_dir())
                .join("config.toml")
                .to_string_lossy()
                .to_string(),
            ConfigKey::RequestTimeout => "5000".to_string(),
            ConfigKey::TokenFile => app_dir(dirs::cache_dir())
                .join("token")
                .to_string_lossy()
                .to_string(),
        };

        return res;
    }

    fn validate(key: ConfigKey, val: &str) -> Result<()> {
        if key.is_integer() && val.parse::<u64>().is_err() {
            bail!(format!(
                "Invalid value for '{key}': {val}\nExpected a whole number of milliseconds"
            ));
        }

        return Ok(());
    }

    /// Resolves every key from defaults, then the config file, then CLI flags
    /// and environment variables. Nothing is stored unless every value is
    /// valid.
    pub async fn load(clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        let mut values: HashMap<String, String> = HashMap::new();
        for key in ConfigKey::iter() {
            values.insert(key.to_string(), Config::default(key));
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(ConfigKey::ConfigFile.as_str())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter() {
                if let Some(val) = doc.get(key.as_str()) {
                    if let Some(val_int) = val.as_integer() {
                        Config::validate(key, &val_int.to_string())
                            .map_err(|err| return anyhow::anyhow!("config.toml: {err}"))?;
                        values.insert(key.to_string(), val_int.to_string());
                    } else if let Some(val_str) = val.as_str() {
                        if val_str.is_empty() {
                            continue;
                        }
                        Config::validate(key, val_str)
                            .map_err(|err| return anyhow::anyhow!("config.toml: {err}"))?;
                        values.insert(key.to_string(), val_str.to_string());
                    }
                }
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(key.as_str()) {
                    if val.is_empty() {
                        continue;
                    }
                    Config::validate(key, val)?;
                    values.insert(key.to_string(), val.to_string());
                }
            }
        }

        for (key, val) in values.into_iter() {
            CONFIG.insert(key, val);
        }

        tracing::debug!(
            api_url = Config::get(ConfigKey::ApiURL),
            request_timeout = Config::get(ConfigKey::RequestTimeout),
            token_file = Config::get(ConfigKey::TokenFile),
            "config"
        );

        return Ok(());
    }

    pub fn serialize_default(cmd: Command) -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::ConfigFile {
                    return None;
                }

                let arg = cmd
                    .get_arguments()
                    .find(|e| return e.get_long() == Some(key.as_str()))?;

                let description = arg
                    .get_help()
                    .map(|help| return help.to_string())
                    .unwrap_or_default()
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                let default = Config::default(key);
                let val = if key.is_integer() {
                    format!("{key} = {default}")
                } else {
                    format!("{key} = \"{default}\"")
                };

                return Some(format!("# {description}\n{val}"));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}
