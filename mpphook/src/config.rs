// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use anyhow::{Context, Result};
use mpptrans::adapters::inventory::InventoryFormat;
use mpptrans::app::resources::{DEFAULT_HOST_ATTRIBUTE, DEFAULT_NID_ATTRIBUTE};
use mpptrans::app::types::MatchKeys;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

const APP_DIR_NAME: &str = "mpphook";
const CONFIG_FILE_NAME: &str = "mpphook.toml";
const CONFIG_ENV_VAR: &str = "MPPHOOK_CONFIG_PATH";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    inventory_path: Option<String>,
    inventory_format: Option<InventoryFormat>,
    nid_attribute: Option<String>,
    host_attribute: Option<String>,
    verbose: Option<bool>,
}

#[derive(Debug)]
pub struct Config {
    pub inventory_path: Option<PathBuf>,
    pub inventory_format: Option<InventoryFormat>,
    pub match_keys: MatchKeys,
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Override,
    Env,
    ConfigFile,
    Default,
}

impl ConfigSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigSource::Override => "override",
            ConfigSource::Env => "env",
            ConfigSource::ConfigFile => "config",
            ConfigSource::Default => "default",
        }
    }
}

#[derive(Debug)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

#[derive(Debug)]
pub struct ConfigReport {
    pub config_path: Option<PathBuf>,
    pub config_path_source: Option<ConfigSource>,
    pub config_file_present: bool,
    pub inventory_path: ConfigValue<Option<PathBuf>>,
    pub inventory_format: ConfigValue<Option<InventoryFormat>>,
    pub nid_attribute: ConfigValue<String>,
    pub host_attribute: ConfigValue<String>,
    pub verbose: ConfigValue<bool>,
}

#[derive(Debug)]
pub struct LoadResult {
    pub config: Config,
    pub report: ConfigReport,
}

#[derive(Debug, Default)]
pub struct Overrides {
    pub inventory_path: Option<PathBuf>,
    pub inventory_format: Option<InventoryFormat>,
    pub verbose: Option<bool>,
}

#[cfg(test)]
pub fn load(config_path_override: Option<PathBuf>, overrides: Overrides) -> Result<Config> {
    Ok(load_with_report(config_path_override, overrides)?.config)
}

pub fn load_with_report(
    config_path_override: Option<PathBuf>,
    overrides: Overrides,
) -> Result<LoadResult> {
    let (config_path, config_path_source, required) = match config_path_override {
        Some(path) => (Some(expand_path(path)), Some(ConfigSource::Override), true),
        None => match config_path_from_env()? {
            Some(path) => (Some(expand_path(path)), Some(ConfigSource::Env), true),
            None => match default_config_path().ok() {
                Some(path) => (Some(path), Some(ConfigSource::Default), false),
                None => (None, None, false),
            },
        },
    };
    let config_file_present = config_path
        .as_deref()
        .map(|path| path.exists())
        .unwrap_or(false);

    let file_config = match config_path.as_deref() {
        Some(path) => read_config_file(path, required)?,
        None => FileConfig::default(),
    };

    let (inventory_path, inventory_path_source) = match overrides.inventory_path {
        Some(path) => (Some(expand_path(path)), ConfigSource::Override),
        None => match file_config.inventory_path {
            Some(raw) => (
                Some(resolve_path(
                    &raw,
                    config_path.as_deref().and_then(|path| path.parent()),
                )),
                ConfigSource::ConfigFile,
            ),
            None => (None, ConfigSource::Default),
        },
    };

    let (inventory_format, inventory_format_source) = match overrides.inventory_format {
        Some(format) => (Some(format), ConfigSource::Override),
        None => match file_config.inventory_format {
            Some(format) => (Some(format), ConfigSource::ConfigFile),
            None => (None, ConfigSource::Default),
        },
    };

    let (nid_attribute, nid_source) =
        attribute_name("nid_attribute", file_config.nid_attribute, DEFAULT_NID_ATTRIBUTE)?;
    let (host_attribute, host_source) = attribute_name(
        "host_attribute",
        file_config.host_attribute,
        DEFAULT_HOST_ATTRIBUTE,
    )?;

    let (verbose, verbose_source) = match overrides.verbose {
        Some(verbose) => (verbose, ConfigSource::Override),
        None => match file_config.verbose {
            Some(verbose) => (verbose, ConfigSource::ConfigFile),
            None => (false, ConfigSource::Default),
        },
    };

    let config = Config {
        inventory_path: inventory_path.clone(),
        inventory_format,
        match_keys: MatchKeys {
            nid: nid_attribute.clone(),
            host: host_attribute.clone(),
        },
        verbose,
    };

    let report = ConfigReport {
        config_path,
        config_path_source,
        config_file_present,
        inventory_path: ConfigValue {
            value: inventory_path,
            source: inventory_path_source,
        },
        inventory_format: ConfigValue {
            value: inventory_format,
            source: inventory_format_source,
        },
        nid_attribute: ConfigValue {
            value: nid_attribute,
            source: nid_source,
        },
        host_attribute: ConfigValue {
            value: host_attribute,
            source: host_source,
        },
        verbose: ConfigValue {
            value: verbose,
            source: verbose_source,
        },
    };

    Ok(LoadResult { config, report })
}

fn attribute_name(
    key: &str,
    raw: Option<String>,
    default: &str,
) -> Result<(String, ConfigSource)> {
    match raw {
        Some(value) => {
            let value = value.trim();
            if value.is_empty() {
                anyhow::bail!("{key} must not be empty");
            }
            Ok((value.to_string(), ConfigSource::ConfigFile))
        }
        None => Ok((default.to_string(), ConfigSource::Default)),
    }
}

fn read_config_file(path: &Path, required: bool) -> Result<FileConfig> {
    if !path.exists() {
        if required {
            anyhow::bail!("config file not found at {}", path.display());
        }
        return Ok(FileConfig::default());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

fn resolve_path(raw: &str, base_dir: Option<&Path>) -> PathBuf {
    let expanded = shellexpand::tilde(raw);
    let path = PathBuf::from(expanded.as_ref());
    if path.is_absolute() {
        return path;
    }
    match base_dir {
        Some(dir) => dir.join(path),
        None => path,
    }
}

fn expand_path(path: PathBuf) -> PathBuf {
    let path_string = path.to_string_lossy().to_string();
    let expanded = shellexpand::tilde(&path_string);
    PathBuf::from(expanded.as_ref())
}

fn config_path_from_env() -> Result<Option<PathBuf>> {
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(value) => {
            if value.is_empty() {
                anyhow::bail!("{CONFIG_ENV_VAR} is set but empty");
            }
            Ok(Some(PathBuf::from(value)))
        }
        None => Ok(None),
    }
}

fn default_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("failed to resolve config directory")?;
    Ok(base.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}
