//! Device property store.
//!
//! The supported-instruction-set resolver reads one key from an opaque
//! key-value store. [`PropertySource`] is that seam; this module provides an
//! in-memory map that can be loaded from TOML or from `build.prop`-style text,
//! and a source backed by the host's `getprop` tool.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;

use serde::Deserialize;

use crate::error::{IsaError, Result};

/// Property naming which runtime variants a device runs.
pub const ZYGOTE_PROPERTY: &str = "ro.zygote";

/// A read-only key-value property store.
pub trait PropertySource {
    /// Value stored under `name`, or the empty string when absent.
    fn get_property(&self, name: &str) -> String;
}

/// In-memory property store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PropertyMap {
    #[serde(default)]
    properties: BTreeMap<String, String>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a property.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Copy every entry of `other` over this map.
    pub fn merge(&mut self, other: PropertyMap) {
        self.properties.extend(other.properties);
    }

    /// Parse a TOML document with a `[properties]` table.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let map: PropertyMap = toml::from_str(toml_str)?;
        Ok(map)
    }

    /// Parse `build.prop` text: one `key=value` per line, `#` comments and
    /// blank lines ignored. Later duplicates win.
    pub fn from_build_prop_str(text: &str) -> Result<Self> {
        let mut map = PropertyMap::new();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(IsaError::MalformedLine {
                    line: index + 1,
                    text: raw.to_string(),
                });
            };
            map.set(key.trim(), value.trim());
        }
        Ok(map)
    }

    /// Load a TOML property file.
    pub fn load_toml(path: &Path) -> Result<Self> {
        Self::from_toml_str(&read_existing(path)?)
    }

    /// Load a `build.prop` file.
    pub fn load_build_prop(path: &Path) -> Result<Self> {
        Self::from_build_prop_str(&read_existing(path)?)
    }

    /// Load a property file, choosing the format by extension: `.prop` is
    /// `build.prop` text, anything else TOML.
    pub fn load(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("prop") => Self::load_build_prop(path),
            _ => Self::load_toml(path),
        }
    }
}

fn read_existing(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(IsaError::NotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(std::fs::read_to_string(path)?)
}

impl PropertySource for PropertyMap {
    fn get_property(&self, name: &str) -> String {
        self.properties.get(name).cloned().unwrap_or_default()
    }
}

impl<P: PropertySource + ?Sized> PropertySource for &P {
    fn get_property(&self, name: &str) -> String {
        (**self).get_property(name)
    }
}

/// Properties of the running device, read through `getprop`.
///
/// Hosts without `getprop` read every property as empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProperties;

impl PropertySource for SystemProperties {
    fn get_property(&self, name: &str) -> String {
        match Command::new("getprop").arg(name).output() {
            Ok(output) if output.status.success() => {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            }
            Ok(output) => {
                log::debug!("getprop {name} exited with {}", output.status);
                String::new()
            }
            Err(e) => {
                log::debug!("getprop unavailable: {e}");
                String::new()
            }
        }
    }
}
