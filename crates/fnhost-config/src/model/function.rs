//! `function.json` as Rust types.

use crate::document::{ConfigurationDocument, DocumentKind};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A validated function configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration_source: Option<ConfigurationSource>,
    #[serde(default)]
    pub bindings: Vec<Binding>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl FunctionConfig {
    /// The trigger binding, if the function declares one.
    #[must_use]
    pub fn trigger(&self) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.is_trigger())
    }

    /// Bindings flowing in the given direction (`inout` counts for both).
    pub fn bindings_in(&self, direction: BindingDirection) -> impl Iterator<Item = &Binding> {
        self.bindings
            .iter()
            .filter(move |b| b.direction == direction || b.direction == BindingDirection::Inout)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConfigurationSource {
    Attributes,
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingDirection {
    In,
    Out,
    Inout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingDataType {
    String,
    Binary,
    Stream,
}

/// One input or output connection of a function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub name: String,
    #[serde(rename = "type")]
    pub binding_type: String,
    pub direction: BindingDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<BindingDataType>,
    /// Settings specific to the binding type.
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

impl Binding {
    /// Trigger types end in `Trigger` by convention (`httpTrigger`,
    /// `queueTrigger`, ...).
    #[must_use]
    pub fn is_trigger(&self) -> bool {
        self.binding_type.ends_with("Trigger")
    }
}

impl TryFrom<&ConfigurationDocument> for FunctionConfig {
    type Error = ConfigError;

    fn try_from(document: &ConfigurationDocument) -> Result<Self, Self::Error> {
        if document.kind() != DocumentKind::Function {
            return Err(ConfigError::DocumentMismatch {
                expected: DocumentKind::Function.to_string(),
                found: document.kind().to_string(),
            });
        }
        document.deserialize()
    }
}
