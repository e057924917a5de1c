//! Bundle Schema
//!
//! Generates service catalog parameter schemas and form definitions from the
//! parameter descriptors of a bundle spec.
//!
//! Every plan yields three JSON Schema (draft-04) documents: instance create
//! (all parameters), instance update (updatable parameters only) and binding
//! create (bind parameters). Parameters that depend on another parameter are
//! moved out of `properties` into `dependencies`, either merged per
//! controlling parameter or, when the controller has allowed values, as
//! `oneOf` branches keyed on those values.
//!
//! # Example
//!
//! ```
//! use bundle_schema::{parameters_to_schema, BundlePlan, Dependency, ParameterDescriptor};
//! use serde_json::json;
//!
//! let mut db_type = ParameterDescriptor::new("db_type", "enum");
//! db_type.enum_values = vec![json!("mysql"), json!("postgres")];
//!
//! let mut port = ParameterDescriptor::new("mysql_port", "int");
//! port.dependencies = vec![Dependency::new("db_type", "mysql")];
//!
//! let plan = BundlePlan {
//!     name: "default".into(),
//!     parameters: vec![db_type, port],
//!     ..BundlePlan::default()
//! };
//!
//! let converted = parameters_to_schema(&plan).unwrap();
//! let create = &converted.value.service_instance.create.parameters;
//!
//! // The dependent lives only inside the oneOf branch
//! assert!(create.properties.get("mysql_port").is_none());
//! let branch = &create.dependencies["db_type"].one_of[0];
//! assert!(branch.properties.contains_key("mysql_port"));
//! ```
//!
//! # Form Definitions
//!
//! Plan metadata gains a `schemas` entry holding an
//! `openshift_form_definition` per context. Consecutive parameters sharing a
//! `display_group` become one fieldset:
//!
//! ```json
//! [{ "title": "Database", "type": "fieldset", "items": ["db_host", "db_port"] }, "app_name"]
//! ```

mod catalog;
mod convert;
mod dependencies;
mod diagnostics;
mod error;
mod form;
mod linter;
mod loader;
mod properties;
mod schema;
mod types;

pub use catalog::{
    last_requesting_user, plan_updatable, spec_to_service, state_to_last_operation,
    to_catalog_plan, CatalogPlan, LastOperationState, Service,
};
pub use convert::{extract_plan_metadata, parameters_to_schema};
pub use dependencies::{extract_dependencies, parse_dependency_values, DependencyMapBuilder};
pub use diagnostics::{Converted, Diagnostic, DiagnosticKind, Diagnostics, ParameterList};
pub use error::{ConvertError, LoadError};
pub use form::{create_form_definition, create_update_form_definition, FormField, FormItem};
pub use linter::{lint, lint_file, FileResult, FileStatus, LintDiagnostic, LintResult, Severity};
pub use loader::{is_url, load_spec, load_spec_auto, load_spec_str};
pub use properties::{
    extract_properties, extract_required, extract_updatable, extract_updatable_required,
    primitive_types, property_schema,
};
pub use schema::{
    DependencyMap, InputParameters, ParametersSchema, PlanSchemas, PrimitiveType,
    PrimitiveTypes, Properties, Schema, ServiceBindingSchemas, ServiceInstanceSchemas,
    SCHEMA_URL,
};
pub use types::{
    BundlePlan, BundleSpec, Dependency, JobState, ParameterDescriptor, UserInfo,
};

#[cfg(feature = "remote")]
pub use loader::load_spec_url;
