//! Format-agnostic configuration loading and saving

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, NormalizedPath, Result, io};

/// Format-agnostic configuration store.
///
/// Detects the format from the file extension and handles
/// serialization/deserialization transparently.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from a file.
    ///
    /// Format is detected from file extension:
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let content = io::read_text(path)?;
        self.parse(path, &content)
    }

    /// Load configuration, falling back to `T::default()` when the file is missing.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, path: &NormalizedPath) -> Result<T> {
        match io::read_text_if_exists(path)? {
            Some(content) => self.parse(path, &content),
            None => Ok(T::default()),
        }
    }

    fn parse<T: DeserializeOwned>(&self, path: &NormalizedPath, content: &str) -> Result<T> {
        let extension = path.extension().unwrap_or("");
        let parse_err = |format: &str, message: String| Error::ConfigParse {
            path: path.to_native(),
            format: format.into(),
            message,
        };

        match extension.to_lowercase().as_str() {
            "toml" => toml::from_str(content).map_err(|e| parse_err("TOML", e.to_string())),
            "json" => serde_json::from_str(content).map_err(|e| parse_err("JSON", e.to_string())),
            "yaml" | "yml" => {
                serde_yaml::from_str(content).map_err(|e| parse_err("YAML", e.to_string()))
            }
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    /// Save configuration to a file.
    ///
    /// Format is determined from file extension. Uses an atomic write.
    pub fn save<T: Serialize>(&self, path: &NormalizedPath, value: &T) -> Result<()> {
        let extension = path.extension().unwrap_or("");
        let serialize_err = |format: &str, message: String| Error::ConfigSerialize {
            path: path.to_native(),
            format: format.into(),
            message,
        };

        let content = match extension.to_lowercase().as_str() {
            "toml" => {
                toml::to_string_pretty(value).map_err(|e| serialize_err("TOML", e.to_string()))?
            }
            "json" => serde_json::to_string_pretty(value)
                .map_err(|e| serialize_err("JSON", e.to_string()))?,
            "yaml" | "yml" => {
                serde_yaml::to_string(value).map_err(|e| serialize_err("YAML", e.to_string()))?
            }
            _ => {
                return Err(Error::UnsupportedFormat {
                    extension: extension.to_string(),
                });
            }
        };

        io::write_atomic(path, content.as_bytes())
    }
}
