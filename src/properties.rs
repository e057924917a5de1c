//! Property extraction: parameter descriptors to typed property schemas.

use regex::Regex;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::ConvertError;
use crate::schema::{PrimitiveType, PrimitiveTypes, Properties, Schema};
use crate::types::ParameterDescriptor;

/// Map a declared parameter type name to its schema type.
///
/// Matching is case-insensitive. `enum` maps to `string`; the allowed values
/// are carried by the descriptor's `enum` list.
///
/// # Errors
///
/// Returns `ConvertError::UnsupportedType` for any other name.
pub fn primitive_types(pd: &ParameterDescriptor) -> Result<PrimitiveTypes, ConvertError> {
    let t = match pd.type_name.to_lowercase().as_str() {
        "string" | "enum" => PrimitiveType::String,
        "int" | "integer" => PrimitiveType::Integer,
        "object" => PrimitiveType::Object,
        "array" => PrimitiveType::Array,
        "bool" | "boolean" => PrimitiveType::Boolean,
        "number" => PrimitiveType::Number,
        "nil" | "null" => PrimitiveType::Null,
        _ => {
            return Err(ConvertError::UnsupportedType {
                parameter: pd.name.clone(),
                type_name: pd.type_name.clone(),
            })
        }
    };
    Ok(PrimitiveTypes::single(t))
}

/// Build the property schema of a single descriptor.
///
/// # Errors
///
/// Returns `ConvertError::UnsupportedType` if the type name is unknown.
pub fn property_schema(
    pd: &ParameterDescriptor,
    diagnostics: &mut Diagnostics,
) -> Result<Schema, ConvertError> {
    let mut prop = Schema {
        title: pd.title.clone(),
        description: pd.description.clone(),
        default: pd.default.clone(),
        primitive_types: Some(primitive_types(pd)?),
        ..Schema::default()
    };

    set_string_validators(pd, &mut prop, diagnostics);
    set_number_validators(pd, &mut prop);
    set_enum(pd, &mut prop);

    Ok(prop)
}

/// Attach length and pattern constraints to a string property.
///
/// Zero lengths are treated as unset. `max_length` overrides the legacy
/// `maxlength`. A pattern that does not compile is left out.
pub fn set_string_validators(
    pd: &ParameterDescriptor,
    prop: &mut Schema,
    diagnostics: &mut Diagnostics,
) {
    if !prop.is_type(PrimitiveType::String) {
        return;
    }

    if pd.deprecated_max_length > 0 {
        prop.max_length = Some(pd.deprecated_max_length);
    }
    if pd.max_length > 0 {
        prop.max_length = Some(pd.max_length);
    }
    if pd.min_length > 0 {
        prop.min_length = Some(pd.min_length);
    }

    if !pd.pattern.is_empty() {
        match Regex::new(&pd.pattern) {
            Ok(_) => prop.pattern = Some(pd.pattern.clone()),
            Err(e) => diagnostics.push(
                DiagnosticKind::InvalidPattern,
                &pd.name,
                format!("invalid pattern \"{}\": {}", pd.pattern, e),
            ),
        }
    }
}

/// Attach numeric constraints to a number or integer property.
pub fn set_number_validators(pd: &ParameterDescriptor, prop: &mut Schema) {
    if !prop.is_type(PrimitiveType::Number) && !prop.is_type(PrimitiveType::Integer) {
        return;
    }

    // 0 is meaningless for multipleOf, so it doubles as "unset"
    if pd.multiple_of > 0.0 {
        prop.multiple_of = Some(pd.multiple_of);
    }

    // 0 is a valid bound: presence decides
    if let Some(max) = pd.maximum {
        prop.maximum = Some(max);
    }
    if let Some(min) = pd.minimum {
        prop.minimum = Some(min);
    }

    // draft-04 models exclusive bounds as flags on maximum/minimum
    if let Some(max) = pd.exclusive_maximum {
        prop.maximum = Some(max);
        prop.exclusive_maximum = Some(true);
    }
    if let Some(min) = pd.exclusive_minimum {
        prop.minimum = Some(min);
        prop.exclusive_minimum = Some(true);
    }
}

/// Copy the allowed values onto the property, whatever its type.
pub fn set_enum(pd: &ParameterDescriptor, prop: &mut Schema) {
    if !pd.enum_values.is_empty() {
        prop.enum_values = pd.enum_values.clone();
    }
}

/// Build the flat property map for a parameter list.
///
/// # Errors
///
/// Fails on the first descriptor with an unsupported type; no partial map is
/// returned.
pub fn extract_properties(
    params: &[ParameterDescriptor],
    diagnostics: &mut Diagnostics,
) -> Result<Properties, ConvertError> {
    let mut properties = Properties::new();
    for pd in params {
        let prop = property_schema(pd, diagnostics)?;
        properties.insert(pd.name.clone(), prop);
    }
    Ok(properties)
}

/// Names of the required parameters, in declaration order.
pub fn extract_required(params: &[ParameterDescriptor]) -> Vec<String> {
    params
        .iter()
        .filter(|pd| pd.required)
        .map(|pd| pd.name.clone())
        .collect()
}

/// Build the property map of the updatable parameters.
///
/// Types are checked for every descriptor, updatable or not, so an update
/// schema is never produced from a list the create schema would reject.
///
/// # Errors
///
/// Returns `ConvertError::UnsupportedType` on the first unknown type name.
pub fn extract_updatable(
    params: &[ParameterDescriptor],
    diagnostics: &mut Diagnostics,
) -> Result<Properties, ConvertError> {
    let mut updatable = Properties::new();
    for pd in params {
        primitive_types(pd)?;
        if pd.updatable {
            let prop = property_schema(pd, diagnostics)?;
            updatable.insert(pd.name.clone(), prop);
        }
    }
    Ok(updatable)
}

/// Required names restricted to those present in the updatable map.
pub fn extract_updatable_required(required: &[String], updatable: &Properties) -> Vec<String> {
    required
        .iter()
        .filter(|name| updatable.contains_key(*name))
        .cloned()
        .collect()
}
