//! Plan conversion: parameter schemas and form metadata for one plan.

use serde_json::{json, Map, Value};

use crate::dependencies::extract_dependencies;
use crate::diagnostics::{Converted, DiagnosticKind, Diagnostics, ParameterList};
use crate::error::ConvertError;
use crate::form::{create_form_definition, create_update_form_definition};
use crate::properties::{
    extract_properties, extract_required, extract_updatable, extract_updatable_required,
};
use crate::schema::{
    InputParameters, ParametersSchema, PlanSchemas, ServiceBindingSchemas, ServiceInstanceSchemas,
};
use crate::types::{BundlePlan, ParameterDescriptor};

/// Build the create, update and bind parameter schemas of a plan.
///
/// # Errors
///
/// Returns `ConvertError::UnsupportedType` if any parameter or bind
/// parameter has an unknown type. Nothing is returned in that case.
pub fn parameters_to_schema(plan: &BundlePlan) -> Result<Converted<PlanSchemas>, ConvertError> {
    let mut diagnostics = Diagnostics::new();
    let schemas = build_plan_schemas(plan, &mut diagnostics)?;
    Ok(Converted::new(schemas, diagnostics))
}

pub(crate) fn build_plan_schemas(
    plan: &BundlePlan,
    diagnostics: &mut Diagnostics,
) -> Result<PlanSchemas, ConvertError> {
    // create and update share descriptors and one collector; bind has its own
    let mut instance = Diagnostics::for_list(ParameterList::Parameters);
    let mut binding = Diagnostics::for_list(ParameterList::BindParameters);

    let mut create_props = extract_properties(&plan.parameters, &mut instance)?;
    let create_required = extract_required(&plan.parameters);

    let mut bind_props = extract_properties(&plan.bind_parameters, &mut binding)?;
    let bind_required = extract_required(&plan.bind_parameters);

    let mut update_props = extract_updatable(&plan.parameters, &mut instance)?;
    let update_required = extract_updatable_required(&create_required, &update_props);

    let create_deps = extract_dependencies(&plan.parameters, &mut create_props, &mut instance);
    let bind_deps = extract_dependencies(&plan.bind_parameters, &mut bind_props, &mut binding);
    let updatable: Vec<ParameterDescriptor> = plan
        .parameters
        .iter()
        .filter(|pd| pd.updatable)
        .cloned()
        .collect();
    let update_deps = extract_dependencies(&updatable, &mut update_props, &mut instance);

    diagnostics.append(instance);
    diagnostics.append(binding);

    Ok(PlanSchemas {
        service_instance: ServiceInstanceSchemas {
            create: InputParameters {
                parameters: ParametersSchema::new(create_props, create_required, create_deps),
            },
            update: InputParameters {
                parameters: ParametersSchema::new(update_props, update_required, update_deps),
            },
        },
        service_binding: ServiceBindingSchemas {
            create: InputParameters {
                parameters: ParametersSchema::new(bind_props, bind_required, bind_deps),
            },
        },
    })
}

/// Plan metadata with the form definitions of every context added under
/// `schemas`.
///
/// The plan's metadata is copied first and never modified. If the copy
/// fails, the original metadata is returned as is, without form definitions.
pub fn extract_plan_metadata(plan: &BundlePlan) -> Converted<Map<String, Value>> {
    let mut diagnostics = Diagnostics::new();
    let metadata = build_plan_metadata(plan, &mut diagnostics);
    Converted::new(metadata, diagnostics)
}

pub(crate) fn build_plan_metadata(
    plan: &BundlePlan,
    diagnostics: &mut Diagnostics,
) -> Map<String, Value> {
    let mut metadata = match copy_metadata(plan.metadata.as_ref()) {
        Ok(metadata) => metadata,
        Err(e) => {
            diagnostics.push(
                DiagnosticKind::MetadataCopyFailure,
                &plan.name,
                format!("cannot copy plan metadata: {}", e),
            );
            return plan.metadata.clone().unwrap_or_default();
        }
    };

    let instance_form = create_form_definition(&plan.parameters);
    let update_form = create_update_form_definition(&plan.parameters);
    let binding_form = create_form_definition(&plan.bind_parameters);

    metadata.insert(
        "schemas".to_string(),
        json!({
            "service_instance": {
                "create": { "openshift_form_definition": instance_form },
                "update": { "openshift_form_definition": update_form },
            },
            "service_binding": {
                "create": { "openshift_form_definition": binding_form },
            },
        }),
    );

    metadata
}

/// Deep copy through a serialize/deserialize round trip.
fn copy_metadata(original: Option<&Map<String, Value>>) -> Result<Map<String, Value>, serde_json::Error> {
    let Some(original) = original else {
        return Ok(Map::new());
    };
    let bytes = serde_json::to_vec(original)?;
    serde_json::from_slice(&bytes)
}
