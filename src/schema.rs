//! Output schema model.
//!
//! A deliberately small subset of JSON Schema draft-04: the keywords the
//! converter produces and nothing else. All maps are insertion ordered so the
//! serialized document is reproducible.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// `$schema` of every generated parameters schema.
pub const SCHEMA_URL: &str = "http://json-schema.org/draft-04/schema#";

/// JSON Schema primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Integer,
    Object,
    Array,
    Boolean,
    Number,
    Null,
}

/// Non-empty set of primitive types.
///
/// Serializes as a bare string when it holds a single type, as JSON Schema
/// allows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveTypes(Vec<PrimitiveType>);

impl PrimitiveTypes {
    pub fn single(t: PrimitiveType) -> Self {
        Self(vec![t])
    }

    /// The first (for converter output, the only) type.
    pub fn primary(&self) -> PrimitiveType {
        self.0[0]
    }

    pub fn contains(&self, t: PrimitiveType) -> bool {
        self.0.contains(&t)
    }

    pub fn as_slice(&self) -> &[PrimitiveType] {
        &self.0
    }
}

impl Serialize for PrimitiveTypes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.as_slice() {
            [single] => single.serialize(serializer),
            many => many.serialize(serializer),
        }
    }
}

/// A property schema, a dependency entry, or a `oneOf` branch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub primitive_types: Option<PrimitiveTypes>,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,

    // string validators
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    // numeric validators; draft-04 exclusive bounds are flags on maximum/minimum
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<bool>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Schema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<Schema>,
}

impl Schema {
    /// A typed schema with nothing else set.
    pub fn typed(t: PrimitiveType) -> Self {
        Self {
            primitive_types: Some(PrimitiveTypes::single(t)),
            ..Self::default()
        }
    }

    /// A schema holding only an enumeration.
    pub fn enumeration(values: Vec<Value>) -> Self {
        Self {
            enum_values: values,
            ..Self::default()
        }
    }

    pub fn is_type(&self, t: PrimitiveType) -> bool {
        self.primitive_types
            .as_ref()
            .is_some_and(|types| types.primary() == t)
    }
}

/// Property map keyed by parameter name, in declaration order.
pub type Properties = IndexMap<String, Schema>;

/// Dependency map keyed by controlling parameter name.
pub type DependencyMap = IndexMap<String, Schema>;

/// The top level schema of one parameters context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParametersSchema {
    #[serde(rename = "$schema")]
    pub schema_url: String,
    #[serde(rename = "type")]
    pub primitive_types: PrimitiveTypes,
    pub properties: Properties,
    /// Omitted when empty; draft-04 requires at least one entry.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    pub dependencies: DependencyMap,
}

impl ParametersSchema {
    pub fn new(properties: Properties, required: Vec<String>, dependencies: DependencyMap) -> Self {
        Self {
            schema_url: SCHEMA_URL.to_string(),
            primitive_types: PrimitiveTypes::single(PrimitiveType::Object),
            properties,
            required,
            dependencies,
        }
    }

    /// Names of the dependents folded into `dependencies`, including those
    /// inside `oneOf` branches.
    pub fn dependent_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for (controller, entry) in &self.dependencies {
            names.extend(entry.properties.keys().map(String::as_str));
            for branch in &entry.one_of {
                names.extend(
                    branch
                        .properties
                        .keys()
                        .filter(|k| *k != controller)
                        .map(String::as_str),
                );
            }
        }
        names
    }
}

/// `{ "parameters": ... }` wrapper used by every catalog context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputParameters {
    pub parameters: ParametersSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceInstanceSchemas {
    pub create: InputParameters,
    pub update: InputParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceBindingSchemas {
    pub create: InputParameters,
}

/// All parameter schemas of a plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanSchemas {
    pub service_instance: ServiceInstanceSchemas,
    pub service_binding: ServiceBindingSchemas,
}

impl PlanSchemas {
    /// Each context with its dotted path in the document.
    pub fn contexts(&self) -> [(&'static str, &ParametersSchema); 3] {
        [
            (
                "service_instance.create",
                &self.service_instance.create.parameters,
            ),
            (
                "service_instance.update",
                &self.service_instance.update.parameters,
            ),
            (
                "service_binding.create",
                &self.service_binding.create.parameters,
            ),
        ]
    }
}
