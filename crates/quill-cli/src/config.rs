//! `quill.toml` discovery and loading.

use std::path::{Path, PathBuf};

use quill_codegen::{GeneratorOptions, Target};
use serde::Deserialize;

use crate::error::{convert_io_error, CliError};
use crate::io::read_file;

pub const CONFIG_FILE: &str = "quill.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuillConfig {
    pub build: BuildConfig,
    pub swift: GeneratorOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Output directory, relative to the config file.
    pub output: Option<PathBuf>,
    pub targets: Vec<Target>,
}

/// A parsed config together with the directory it was found in.
#[derive(Debug)]
pub struct LoadedConfig {
    pub root: PathBuf,
    pub config: QuillConfig,
}

impl LoadedConfig {
    pub fn output_dir(&self) -> Option<PathBuf> {
        self.config.build.output.as_ref().map(|out| self.root.join(out))
    }
}

/// Finds `quill.toml` by searching upwards from `start_path`.
pub fn find_config(start_path: &Path) -> Result<PathBuf, CliError> {
    let mut current = if start_path.is_dir() {
        start_path.to_path_buf()
    } else {
        start_path
            .parent()
            .map_or_else(|| start_path.to_path_buf(), |p| p.to_path_buf())
    };
    if current.as_os_str().is_empty() {
        current = PathBuf::from(".");
    }
    current = current
        .canonicalize()
        .map_err(|e| convert_io_error(e, current.clone(), "resolving the config search path"))?;

    loop {
        let candidate = current.join(CONFIG_FILE);
        if candidate.is_file() {
            return Ok(candidate);
        }
        if !current.pop() {
            return Err(CliError::ConfigNotFound { searched_path: start_path.to_path_buf() });
        }
    }
}

pub fn load_config(path: &Path) -> Result<LoadedConfig, CliError> {
    let text = read_file(path)?;
    let config: QuillConfig = toml::from_str(&text)
        .map_err(|e| CliError::Config { path: path.to_path_buf(), message: e.to_string() })?;
    let root = path
        .parent()
        .map_or_else(|| PathBuf::from("."), |p| p.to_path_buf());
    log::debug!("loaded {} ({} target(s))", path.display(), config.build.targets.len());
    Ok(LoadedConfig { root, config })
}

/// An explicit path must exist; otherwise search upwards from `input` and
/// fall back to defaults when nothing is found.
pub fn resolve_config(explicit: Option<&Path>, input: &Path) -> Result<Option<LoadedConfig>, CliError> {
    if let Some(path) = explicit {
        return load_config(path).map(Some);
    }
    match find_config(input) {
        Ok(path) => load_config(&path).map(Some),
        Err(CliError::ConfigNotFound { .. }) => {
            log::debug!("no {CONFIG_FILE} above {}, using defaults", input.display());
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
