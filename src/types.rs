//! Input types: bundle specs, plans and their parameter descriptors.
//!
//! Field names follow the bundle spec wire format, so a spec document can be
//! deserialized directly into these types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Returns the JSON type name for diagnostics.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A service definition: identity, catalog flags and its plans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleSpec {
    pub id: String,
    /// Fully qualified name, published as the catalog service name.
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub bindable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    pub plans: Vec<BundlePlan>,
}

/// One plan of a bundle spec.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundlePlan {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    pub free: bool,
    pub bindable: bool,
    /// Names of plans this plan can be updated to.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub updates_to: Vec<String>,
    pub parameters: Vec<ParameterDescriptor>,
    pub bind_parameters: Vec<ParameterDescriptor>,
}

/// Declarative metadata for a single plan parameter.
///
/// Numeric and length fields use `0` for "unset" where zero carries no useful
/// meaning (`maxlength`, `max_length`, `min_length`, `multiple_of`). Bounds
/// are optional since zero is a legitimate bound.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterDescriptor {
    pub name: String,
    pub title: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Legacy spelling of `max_length`.
    #[serde(rename = "maxlength")]
    pub deprecated_max_length: u64,
    pub max_length: u64,
    pub min_length: u64,
    pub pattern: String,
    pub multiple_of: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<f64>,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,
    pub required: bool,
    pub updatable: bool,
    pub display_type: String,
    pub display_group: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,
}

impl ParameterDescriptor {
    /// Create a descriptor with a name and type; everything else defaults.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// The dependency this descriptor participates in, if any.
    ///
    /// Only the first declared dependency is honored. Form libraries consuming
    /// the generated schema cannot express more than one dependency per field,
    /// so any further entries are ignored.
    pub fn dependency(&self) -> Option<&Dependency> {
        self.dependencies.first()
    }
}

/// A dependency of one parameter on the value of another.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    /// Name of the controlling parameter.
    pub key: String,
    /// Controlling value(s): a string or a list of strings.
    #[serde(default)]
    pub value: Value,
}

impl Dependency {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// State of a bundle job as reported by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobState {
    #[serde(rename = "not yet started")]
    NotYetStarted,
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "succeeded")]
    Succeeded,
    #[serde(rename = "failed")]
    Failed,
}

/// Identity of the user behind a catalog request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInfo {
    pub username: String,
    pub uid: String,
}
