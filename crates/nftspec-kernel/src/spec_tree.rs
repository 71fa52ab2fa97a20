//! Parsed specification tree and its TOML/JSON loaders.
//!
//! The loaders only establish shape. Every semantic constraint is checked
//! by [`crate::validate`].

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SpecificationTree {
    #[serde(default)]
    pub derive: Vec<String>,
    #[serde(default)]
    pub include: Vec<IncludeDecl>,
    #[serde(default, rename = "field")]
    pub fields: Vec<FieldDecl>,
    #[serde(default, rename = "modify")]
    pub modifiers: Vec<ModifierBinding>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct IncludeDecl {
    pub module: String,
    /// `None` when the parameter list is omitted entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<Param>>,
}

/// Untyped literal as written in the specification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Param {
    Int(i64),
    /// Integers above `i64::MAX`, which only JSON input can carry.
    UInt(u64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl Param {
    pub fn type_name(&self) -> &'static str {
        match self {
            Param::Int(_) | Param::UInt(_) => "integer",
            Param::Float(_) => "float",
            Param::Bool(_) => "bool",
            Param::Str(_) => "string",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Uint,
    Int,
    Bytes,
    Bool,
    Address,
    String,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Uint => "uint",
            FieldKind::Int => "int",
            FieldKind::Bytes => "bytes",
            FieldKind::Bool => "bool",
            FieldKind::Address => "address",
            FieldKind::String => "string",
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, FieldKind::Uint | FieldKind::Int)
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ModifierBinding {
    pub function: String,
    pub modifier: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SpecLoadError {
    #[error("I/O error at {path}: {message}")]
    Io { path: String, message: String },

    #[error("invalid TOML at {path}: {message}")]
    InvalidToml { path: String, message: String },

    #[error("invalid JSON at {path}: {message}")]
    InvalidJson { path: String, message: String },
}

impl SpecificationTree {
    pub fn from_toml_str(text: &str) -> Result<Self, SpecLoadError> {
        Self::from_toml_with_path(text, "<in-memory>")
    }

    pub fn from_json_str(text: &str) -> Result<Self, SpecLoadError> {
        Self::from_json_with_path(text, "<in-memory>")
    }

    /// Load a tree from disk. `.json` files are read as JSON, anything else
    /// as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SpecLoadError> {
        let path = path.as_ref();
        let label = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|error| SpecLoadError::Io {
            path: label.clone(),
            message: error.to_string(),
        })?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_with_path(&text, &label)
        } else {
            Self::from_toml_with_path(&text, &label)
        }
    }

    fn from_toml_with_path(text: &str, path: &str) -> Result<Self, SpecLoadError> {
        toml::from_str(text).map_err(|error| SpecLoadError::InvalidToml {
            path: path.to_string(),
            message: error.to_string(),
        })
    }

    fn from_json_with_path(text: &str, path: &str) -> Result<Self, SpecLoadError> {
        serde_json::from_str(text).map_err(|error| SpecLoadError::InvalidJson {
            path: path.to_string(),
            message: error.to_string(),
        })
    }
}
