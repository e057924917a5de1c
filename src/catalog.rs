//! Catalog conversion: bundle specs to service catalog entries.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::convert::{build_plan_metadata, build_plan_schemas};
use crate::diagnostics::{Converted, Diagnostics};
use crate::error::ConvertError;
use crate::schema::PlanSchemas;
use crate::types::{BundlePlan, BundleSpec, JobState, UserInfo};

/// A service as published in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub bindable: bool,
    pub plan_updateable: bool,
    pub plans: Vec<CatalogPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    pub instances_retrievable: bool,
    /// Depends on whether the broker binds asynchronously, which is decided
    /// outside this crate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bindings_retrievable: Option<bool>,
}

/// A plan as published in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogPlan {
    pub id: String,
    pub name: String,
    pub description: String,
    pub metadata: Map<String, Value>,
    pub free: bool,
    pub bindable: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub updates_to: Vec<String>,
    pub schemas: PlanSchemas,
}

/// Last operation state reported to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LastOperationState {
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "succeeded")]
    Succeeded,
    #[serde(rename = "failed")]
    Failed,
}

/// Convert a bundle spec into a catalog service.
///
/// # Errors
///
/// Returns the first `ConvertError` of any plan.
pub fn spec_to_service(spec: &BundleSpec) -> Result<Converted<Service>, ConvertError> {
    let mut diagnostics = Diagnostics::new();
    let plans = to_catalog_plans(&spec.plans, &mut diagnostics)?;

    let service = Service {
        id: spec.id.clone(),
        name: spec.name.clone(),
        description: spec.description.clone(),
        tags: spec.tags.clone(),
        bindable: spec.bindable,
        plan_updateable: plan_updatable(&spec.plans),
        plans,
        metadata: spec.metadata.clone(),
        instances_retrievable: true,
        bindings_retrievable: None,
    };

    Ok(Converted::new(service, diagnostics))
}

/// Convert a single plan.
///
/// # Errors
///
/// Returns `ConvertError::UnsupportedType` if a parameter type is unknown.
pub fn to_catalog_plan(plan: &BundlePlan) -> Result<Converted<CatalogPlan>, ConvertError> {
    let mut diagnostics = Diagnostics::new();
    let converted = catalog_plan(plan, &mut diagnostics)?;
    Ok(Converted::new(converted, diagnostics))
}

fn to_catalog_plans(
    plans: &[BundlePlan],
    diagnostics: &mut Diagnostics,
) -> Result<Vec<CatalogPlan>, ConvertError> {
    plans
        .iter()
        .map(|plan| {
            let mut plan_diagnostics = Diagnostics::new();
            let converted = catalog_plan(plan, &mut plan_diagnostics)?;
            diagnostics.append(plan_diagnostics);
            Ok(converted)
        })
        .collect()
}

fn catalog_plan(
    plan: &BundlePlan,
    diagnostics: &mut Diagnostics,
) -> Result<CatalogPlan, ConvertError> {
    let schemas = build_plan_schemas(plan, diagnostics)?;
    Ok(CatalogPlan {
        id: plan.id.clone(),
        name: plan.name.clone(),
        description: plan.description.clone(),
        metadata: build_plan_metadata(plan, diagnostics),
        free: plan.free,
        bindable: plan.bindable,
        updates_to: plan.updates_to.clone(),
        schemas,
    })
}

/// Whether any plan can be updated to another plan.
pub fn plan_updatable(plans: &[BundlePlan]) -> bool {
    plans.iter().any(|plan| !plan.updates_to.is_empty())
}

/// Map a bundle job state to the catalog's last operation state.
///
/// States without a catalog equivalent report as failed.
pub fn state_to_last_operation(state: JobState) -> LastOperationState {
    match state {
        JobState::InProgress => LastOperationState::InProgress,
        JobState::Succeeded => LastOperationState::Succeeded,
        JobState::Failed => LastOperationState::Failed,
        JobState::NotYetStarted => LastOperationState::Failed,
    }
}

/// Name to record as the last requesting user: the username, or the uid when
/// the username is empty.
pub fn last_requesting_user(user: &UserInfo) -> &str {
    if user.username.is_empty() {
        &user.uid
    } else {
        &user.username
    }
}
