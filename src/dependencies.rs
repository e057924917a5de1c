//! Dependency resolution: moves dependent properties into `dependencies`.
//!
//! A dependent on a controller without allowed values is merged into a single
//! schema for that controller. A dependent on an enumerated controller becomes
//! a `oneOf` branch pinning the controller to the matching value(s).

use serde_json::Value;
use tracing::debug;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::schema::{DependencyMap, Properties, Schema};
use crate::types::{json_type_name, ParameterDescriptor};

/// Accumulates dependency entries per controller, in insertion order.
#[derive(Debug, Default)]
pub struct DependencyMapBuilder {
    entries: DependencyMap,
}

impl DependencyMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold an unconditional dependent into the controller's entry.
    ///
    /// The property joins the entry's properties (replacing one of the same
    /// name) and its name is appended to `required`, duplicates included.
    pub fn add_merged_property(&mut self, controller: &str, name: &str, prop: Schema) {
        let entry = self.entries.entry(controller.to_string()).or_default();
        entry.properties.insert(name.to_string(), prop);
        entry.required.push(name.to_string());
    }

    /// Append a conditional branch to the controller's `oneOf` list.
    pub fn add_branch(&mut self, controller: &str, branch: Schema) {
        self.entries
            .entry(controller.to_string())
            .or_default()
            .one_of
            .push(branch);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn build(self) -> DependencyMap {
        self.entries
    }
}

/// Check dependency value(s) against the controller's allowed values.
///
/// Accepts a string that is allowed, or a non-empty list whose every element
/// is an allowed string. Returns the matching values, or a description of the
/// first offending value.
pub fn parse_dependency_values(value: &Value, allowed: &[Value]) -> Result<Vec<Value>, String> {
    let check = |v: &Value| -> Result<Value, String> {
        match v {
            Value::String(s) if allowed.contains(v) => Ok(Value::String(s.clone())),
            Value::String(s) => Err(format!("\"{}\" is not an allowed value", s)),
            other => Err(format!(
                "expected string value, got {}",
                json_type_name(other)
            )),
        }
    };

    match value {
        Value::String(_) => Ok(vec![check(value)?]),
        Value::Array(items) if items.is_empty() => Err("empty value list".to_string()),
        Value::Array(items) => items.iter().map(check).collect(),
        other => Err(format!(
            "expected string or list of strings, got {}",
            json_type_name(other)
        )),
    }
}

/// Build the dependency map for a parameter list and remove every consumed
/// dependent from `props`.
///
/// Controllers and dependents are looked up in `props`; dependencies naming a
/// property that is not there are skipped, as are parameters depending on
/// themselves. Removal happens after the whole
/// list is scanned, so a property that is both a dependent and a controller
/// still serves as a controller for later parameters.
pub fn extract_dependencies(
    params: &[ParameterDescriptor],
    props: &mut Properties,
    diagnostics: &mut Diagnostics,
) -> DependencyMap {
    let mut builder = DependencyMapBuilder::new();
    let mut consumed: Vec<String> = Vec::new();

    for pd in params {
        // Intentionally limited to the first dependency: the form renderer
        // cannot express more than one per field.
        let Some(dep) = pd.dependency() else {
            continue;
        };
        if dep.key == pd.name {
            debug!(parameter = %pd.name, "dependency on itself");
            continue;
        }
        let Some(controller) = props.get(&dep.key) else {
            debug!(parameter = %pd.name, key = %dep.key, "dependency on unknown property");
            continue;
        };
        let Some(dependent) = props.get(&pd.name) else {
            debug!(parameter = %pd.name, "dependent not in this parameter set");
            continue;
        };

        if controller.enum_values.is_empty() {
            builder.add_merged_property(&dep.key, &pd.name, dependent.clone());
            consumed.push(pd.name.clone());
            continue;
        }

        let values = match parse_dependency_values(&dep.value, &controller.enum_values) {
            Ok(values) => values,
            Err(detail) => {
                diagnostics.push(
                    DiagnosticKind::InvalidDependencyValue,
                    &pd.name,
                    format!("invalid value for dependency on {}: {}", dep.key, detail),
                );
                continue;
            }
        };

        let mut branch = Schema::default();
        branch
            .properties
            .insert(pd.name.clone(), dependent.clone());
        branch
            .properties
            .insert(dep.key.clone(), Schema::enumeration(values));
        branch.required = vec![pd.name.clone()];
        builder.add_branch(&dep.key, branch);
        consumed.push(pd.name.clone());
    }

    for name in &consumed {
        props.shift_remove(name);
    }

    builder.build()
}
