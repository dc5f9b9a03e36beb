// src/core/config.rs

use crate::core::common::CbirError;
use crate::core::indexing::kdtree::SplitMethod;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const SUPPORTED_SUFFIXES: [&str; 4] = [".jpg", ".png", ".bmp", ".gif"];
const LOGGER_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Retrieval configuration.
///
/// Every key is optional in the TOML file; missing keys take the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub images_directory: PathBuf,
    pub images_prefix: String,
    pub images_suffix: String,
    pub num_of_images: usize,
    pub num_of_similar_images: usize,
    pub knn: usize,
    pub split_method: SplitMethod,
    /// Seed for `SplitMethod::Random`; unset means a fresh seed per build.
    pub split_seed: Option<u64>,
    pub logger_level: String,
}

/// Builder for `Config`.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    images_directory: Option<PathBuf>,
    images_prefix: Option<String>,
    images_suffix: Option<String>,
    num_of_images: Option<usize>,
    num_of_similar_images: Option<usize>,
    knn: Option<usize>,
    split_method: Option<SplitMethod>,
    split_seed: Option<u64>,
    logger_level: Option<String>,
}

impl ConfigBuilder {
    /// Creates a new ConfigBuilder with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn images_directory<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.images_directory = Some(path.into());
        self
    }

    pub fn images_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.images_prefix = Some(prefix.into());
        self
    }

    pub fn images_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.images_suffix = Some(suffix.into());
        self
    }

    pub fn num_of_images(mut self, count: usize) -> Self {
        self.num_of_images = Some(count);
        self
    }

    pub fn num_of_similar_images(mut self, count: usize) -> Self {
        self.num_of_similar_images = Some(count);
        self
    }

    pub fn knn(mut self, k: usize) -> Self {
        self.knn = Some(k);
        self
    }

    pub fn split_method(mut self, method: SplitMethod) -> Self {
        self.split_method = Some(method);
        self
    }

    pub fn split_seed(mut self, seed: u64) -> Self {
        self.split_seed = Some(seed);
        self
    }

    pub fn logger_level(mut self, level: impl Into<String>) -> Self {
        self.logger_level = Some(level.into());
        self
    }

    /// Builds the Config instance with validation
    pub fn build(self) -> Result<Config, CbirError> {
        let defaults = Config::default();
        let config = Config {
            images_directory: self.images_directory.unwrap_or(defaults.images_directory),
            images_prefix: self.images_prefix.unwrap_or(defaults.images_prefix),
            images_suffix: self.images_suffix.unwrap_or(defaults.images_suffix),
            num_of_images: self.num_of_images.unwrap_or(defaults.num_of_images),
            num_of_similar_images: self.num_of_similar_images.unwrap_or(defaults.num_of_similar_images),
            knn: self.knn.unwrap_or(defaults.knn),
            split_method: self.split_method.unwrap_or(defaults.split_method),
            split_seed: self.split_seed.or(defaults.split_seed),
            logger_level: self.logger_level.unwrap_or(defaults.logger_level),
        };

        config.validate()?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            images_directory: PathBuf::from("images"),
            images_prefix: "img".to_string(),
            images_suffix: ".png".to_string(),
            num_of_images: 1,
            num_of_similar_images: 1,
            knn: 1,
            split_method: SplitMethod::MaxSpread,
            split_seed: None,
            logger_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Creates a new ConfigBuilder for fluent configuration
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), CbirError> {
        if self.num_of_images == 0 {
            return Err(CbirError::Configuration("num_of_images must be greater than 0".to_string()));
        }

        if self.num_of_similar_images == 0 {
            return Err(CbirError::Configuration(
                "num_of_similar_images must be greater than 0".to_string(),
            ));
        }

        if self.knn == 0 {
            return Err(CbirError::Configuration("knn must be greater than 0".to_string()));
        }

        if !SUPPORTED_SUFFIXES.contains(&self.images_suffix.as_str()) {
            return Err(CbirError::Configuration(format!(
                "images_suffix must be one of {:?}, got '{}'",
                SUPPORTED_SUFFIXES, self.images_suffix
            )));
        }

        if !LOGGER_LEVELS.contains(&self.logger_level.to_ascii_lowercase().as_str()) {
            return Err(CbirError::Configuration(format!(
                "logger_level must be one of {:?}, got '{}'",
                LOGGER_LEVELS, self.logger_level
            )));
        }

        Ok(())
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `CbirError::Configuration` if parsing or validation fails. A missing
    /// file yields the default configuration.
    pub fn load_from_file(path: &Path) -> Result<Self, CbirError> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config: Self = toml::from_str(&contents).map_err(|e| {
                    CbirError::Configuration(format!(
                        "Failed to parse config file '{}': {}",
                        path.display(),
                        e
                    ))
                })?;

                config.validate()?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(CbirError::Io(e)),
        }
    }

    /// Loads configuration from an optional TOML file path.
    pub fn load_or_default(optional_path: Option<&Path>) -> Result<Self, CbirError> {
        match optional_path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Path of database image `index`: `<dir>/<prefix><index><suffix>`.
    pub fn image_path(&self, index: usize) -> Result<PathBuf, CbirError> {
        self.check_index(index)?;
        Ok(self
            .images_directory
            .join(format!("{}{}{}", self.images_prefix, index, self.images_suffix)))
    }

    /// Path of the feature file of database image `index`: `<dir>/<prefix><index>.feats`.
    pub fn features_path(&self, index: usize) -> Result<PathBuf, CbirError> {
        self.check_index(index)?;
        Ok(self.images_directory.join(format!("{}{}.feats", self.images_prefix, index)))
    }

    fn check_index(&self, index: usize) -> Result<(), CbirError> {
        if index >= self.num_of_images {
            return Err(CbirError::invalid_input(format!(
                "Image index {} is out of range for {} images",
                index, self.num_of_images
            )));
        }
        Ok(())
    }
}
