//! Chart properties: typed definitions from charts.json and the reader over them
//!
//! charts.json is embedded at compile time. Each property declares its kind
//! (free text, a choice list, a bounded number or integer) and a default; the
//! catalog refuses to load when a default breaks its own declaration, so every
//! default the reader hands out is known to be valid.
//!
//! User values are checked against the same declaration when they are set.
//! Rejected values are dropped with a warning and the default shows through.

use super::error::{ChartError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, warn};

const CHARTS_JSON: &str = include_str!("../../charts.json");

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PropertyKind {
    Text,
    /// One of `values`, matched case-insensitively
    Choice { values: Vec<String> },
    Number { min: f64, max: f64 },
    Integer { min: u32, max: u32 },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDef {
    pub name: String,
    #[serde(flatten)]
    pub kind: PropertyKind,
    #[serde(default)]
    pub default_value: String,
    #[serde(default)]
    pub description: String,
}

impl PropertyDef {
    /// Canonical form of `value`, or why it does not fit this property
    pub fn check(&self, value: &str) -> std::result::Result<String, String> {
        let trimmed = value.trim();
        match &self.kind {
            PropertyKind::Text => Ok(value.to_string()),
            PropertyKind::Choice { values } => values
                .iter()
                .find(|v| v.eq_ignore_ascii_case(trimmed))
                .cloned()
                .ok_or_else(|| format!("expected one of [{}]", values.join(", "))),
            PropertyKind::Number { min, max } => match trimmed.parse::<f64>() {
                Ok(v) if v.is_finite() && (*min..=*max).contains(&v) => Ok(trimmed.to_string()),
                Ok(_) => Err(format!("expected a number in [{}, {}]", min, max)),
                Err(_) => Err("expected a number".to_string()),
            },
            PropertyKind::Integer { min, max } => match trimmed.parse::<u32>() {
                Ok(v) if (*min..=*max).contains(&v) => Ok(trimmed.to_string()),
                Ok(_) => Err(format!("expected an integer in [{}, {}]", min, max)),
                Err(_) => Err("expected a whole number".to_string()),
            },
        }
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    properties: Vec<PropertyDef>,
}

/// Every chart property, in charts.json order
#[derive(Debug)]
pub struct PropertyCatalog {
    properties: Vec<PropertyDef>,
    index: HashMap<String, usize>,
}

impl PropertyCatalog {
    /// Parse a catalog and check every default against its declaration
    pub fn from_json_str(text: &str) -> std::result::Result<Self, String> {
        let file: CatalogFile = serde_json::from_str(text).map_err(|e| e.to_string())?;
        let mut index = HashMap::with_capacity(file.properties.len());
        for (i, def) in file.properties.iter().enumerate() {
            if index.insert(def.name.clone(), i).is_some() {
                return Err(format!("property '{}' declared twice", def.name));
            }
            // Empty means "not set" and is allowed for text only
            if def.default_value.is_empty() && def.kind == PropertyKind::Text {
                continue;
            }
            def.check(&def.default_value)
                .map_err(|e| format!("default of '{}': {}", def.name, e))?;
        }
        Ok(PropertyCatalog {
            properties: file.properties,
            index,
        })
    }

    pub fn get(&self, name: &str) -> Option<&PropertyDef> {
        self.index.get(name).map(|&i| &self.properties[i])
    }

    pub fn properties(&self) -> &[PropertyDef] {
        &self.properties
    }
}

static CATALOG: OnceLock<PropertyCatalog> = OnceLock::new();

/// The embedded charts.json catalog
pub fn catalog() -> &'static PropertyCatalog {
    CATALOG.get_or_init(|| {
        PropertyCatalog::from_json_str(CHARTS_JSON).expect("charts.json is an invalid catalog")
    })
}

/// Typed access to chart properties
///
/// Holds only user values that passed their property's check, so the getters
/// never have to second-guess what they read.
#[derive(Debug, Clone, Default)]
pub struct ChartPropertyReader {
    user_values: HashMap<String, String>,
}

impl ChartPropertyReader {
    pub fn new(user_values: HashMap<String, String>) -> Self {
        let mut reader = Self::default();
        for (name, value) in user_values {
            reader.set(&name, value);
        }
        reader
    }

    /// Load user values from a flat JSON object (`{"chart.width": 1200, ...}`)
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        let object = json.as_object().ok_or_else(|| {
            ChartError::Config("properties file must contain a JSON object".to_string())
        })?;

        let mut reader = Self::default();
        for (name, value) in object {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            reader.set(name, value);
        }
        Ok(reader)
    }

    /// Set a user value; empty clears it, unknown names and bad values are dropped
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.user_values.remove(name);
            return;
        }
        let Some(def) = catalog().get(name) else {
            warn!("Ignoring unknown chart property '{}'", name);
            return;
        };
        match def.check(&value) {
            Ok(canonical) => {
                debug!("Chart property '{}' = '{}'", name, canonical);
                self.user_values.insert(name.to_string(), canonical);
            }
            Err(reason) => warn!(
                "Invalid value '{}' for property '{}' ({}). Using default: '{}'",
                value, name, reason, def.default_value
            ),
        }
    }

    /// True when `name` was set by the user
    pub fn is_set(&self, name: &str) -> bool {
        self.user_values.contains_key(name)
    }

    /// User value if set, otherwise the charts.json default
    pub fn get_string(&self, name: &str) -> String {
        self.user_values
            .get(name)
            .cloned()
            .or_else(|| catalog().get(name).map(|d| d.default_value.clone()))
            .unwrap_or_default()
    }

    pub fn get_optional_string(&self, name: &str) -> Option<String> {
        Some(self.get_string(name)).filter(|v| !v.is_empty())
    }

    /// Choice property in its declared spelling
    pub fn get_enum(&self, name: &str) -> String {
        self.get_string(name)
    }

    pub fn get_f64(&self, name: &str) -> f64 {
        self.get_string(name).trim().parse().unwrap_or(0.0)
    }

    pub fn get_u32(&self, name: &str) -> u32 {
        self.get_string(name).trim().parse().unwrap_or(0)
    }
}
