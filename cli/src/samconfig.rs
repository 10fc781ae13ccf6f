use std::fs;
use std::path::Path;

use env_defs::DeployConfig;
use log::debug;
use thiserror::Error;

const DEPLOY_COMMAND: &str = "deploy";
const GLOBAL_SECTION: &str = "global";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Reads the deploy parameters recorded for `config_env` from a
/// `samconfig.toml` style file. Keys missing under
/// `[<env>.deploy.parameters]` are taken from `[<env>.global.parameters]`.
/// A file that does not exist is treated as empty configuration.
pub fn load_deploy_config(path: &Path, config_env: &str) -> Result<DeployConfig, ConfigError> {
    if !path.exists() {
        debug!("Config file {} not found, continuing without it", path.display());
        return Ok(DeployConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let document: toml::Table = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;

    let deploy = parameters(&document, config_env, DEPLOY_COMMAND, path)?;
    let global = parameters(&document, config_env, GLOBAL_SECTION, path)?;
    debug!("Loaded {} parameters: {:?}", config_env, deploy);

    Ok(deploy.or(global))
}

fn parameters(
    document: &toml::Table,
    config_env: &str,
    section: &str,
    path: &Path,
) -> Result<DeployConfig, ConfigError> {
    let parameters = document
        .get(config_env)
        .and_then(|env| env.get(section))
        .and_then(|section| section.get("parameters"));

    match parameters {
        Some(parameters) => parameters
            .clone()
            .try_into()
            .map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            }),
        None => Ok(DeployConfig::default()),
    }
}
