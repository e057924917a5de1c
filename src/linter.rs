//! Spec linting - static analysis of bundle spec files.
//!
//! Checks spec files for:
//! - JSON syntax and shape errors
//! - Parameter types the converter cannot map
//! - Generated parameter schemas that are not valid draft-04 JSON Schema
//! - Problems the converter works around (bad patterns, bad dependency values)
//! - Dependency declarations the converter ignores

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{json, Value};

use crate::catalog::to_catalog_plan;
use crate::diagnostics::{DiagnosticKind, ParameterList};
use crate::error::ConvertError;
use crate::loader::load_spec;
use crate::types::{BundlePlan, ParameterDescriptor};

/// Severity level for lint diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single lint finding.
#[derive(Debug, Clone, Serialize)]
pub struct LintDiagnostic {
    pub severity: Severity,
    pub code: String,
    pub file: PathBuf,
    /// JSON path to the issue (e.g., "/plans/0/parameters/2")
    pub path: String,
    pub message: String,
}

/// Result of linting a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub file: PathBuf,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<LintDiagnostic>,
}

/// Status of a linted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Ok,
    Error,
    Warning,
}

/// Result of linting a directory or set of files.
#[derive(Debug, Clone, Serialize)]
pub struct LintResult {
    pub path: PathBuf,
    pub files_checked: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub results: Vec<FileResult>,
}

impl LintResult {
    /// Returns true if all files passed (no errors).
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }
}

/// Lint a file or directory.
///
/// If path is a directory, recursively finds all .json files.
/// If `strict` is true, files with warnings count as failed.
pub fn lint(path: &Path, strict: bool) -> LintResult {
    let files = collect_spec_files(path);
    let mut results = Vec::new();
    let mut total_errors = 0;
    let mut total_warnings = 0;

    for file in &files {
        let file_result = lint_file(file, path);
        total_errors += count(&file_result, Severity::Error);
        total_warnings += count(&file_result, Severity::Warning);
        results.push(file_result);
    }

    let failed = results
        .iter()
        .filter(|r| {
            if strict {
                r.status != FileStatus::Ok
            } else {
                r.status == FileStatus::Error
            }
        })
        .count();

    LintResult {
        path: path.to_path_buf(),
        files_checked: files.len(),
        passed: files.len() - failed,
        failed,
        errors: total_errors,
        warnings: total_warnings,
        results,
    }
}

fn count(result: &FileResult, severity: Severity) -> usize {
    result
        .diagnostics
        .iter()
        .filter(|d| d.severity == severity)
        .count()
}

/// Lint a single spec file.
pub fn lint_file(file: &Path, base_path: &Path) -> FileResult {
    let display_file = file.strip_prefix(base_path).unwrap_or(file).to_path_buf();
    let mut findings = Findings {
        file: file.to_path_buf(),
        items: Vec::new(),
    };

    match load_spec(file) {
        Ok(spec) => {
            for (i, plan) in spec.plans.iter().enumerate() {
                check_plan(plan, &format!("/plans/{}", i), &mut findings);
            }
        }
        Err(e) => findings.push(Severity::Error, "E001", "/", format!("cannot load spec: {}", e)),
    }

    let diagnostics = findings.items;
    let has_errors = diagnostics.iter().any(|d| d.severity == Severity::Error);
    let has_warnings = diagnostics.iter().any(|d| d.severity == Severity::Warning);

    let status = if has_errors {
        FileStatus::Error
    } else if has_warnings {
        FileStatus::Warning
    } else {
        FileStatus::Ok
    };

    FileResult {
        file: display_file,
        status,
        diagnostics,
    }
}

struct Findings {
    file: PathBuf,
    items: Vec<LintDiagnostic>,
}

impl Findings {
    fn push(&mut self, severity: Severity, code: &str, path: &str, message: String) {
        self.items.push(LintDiagnostic {
            severity,
            code: code.to_string(),
            file: self.file.clone(),
            path: path.to_string(),
            message,
        });
    }
}

fn check_plan(plan: &BundlePlan, plan_path: &str, findings: &mut Findings) {
    let lists = [
        (ParameterList::Parameters, plan.parameters.as_slice()),
        (ParameterList::BindParameters, plan.bind_parameters.as_slice()),
    ];
    for (list, params) in lists {
        check_declarations(params, &format!("{}/{}", plan_path, list.as_str()), findings);
    }

    let converted = match to_catalog_plan(plan) {
        Ok(converted) => converted,
        Err(ConvertError::UnsupportedType {
            parameter,
            type_name,
        }) => {
            let path = lists
                .iter()
                .find_map(|(list, _)| {
                    param_path(plan, plan_path, *list, |pd| {
                        pd.name == parameter && pd.type_name == type_name
                    })
                })
                .unwrap_or_else(|| plan_path.to_string());
            findings.push(
                Severity::Error,
                "E002",
                &path,
                format!("unsupported parameter type \"{}\"", type_name),
            );
            return;
        }
    };

    for diag in &converted.diagnostics {
        let code = match diag.kind {
            DiagnosticKind::InvalidPattern => "W001",
            DiagnosticKind::InvalidDependencyValue => "W002",
            DiagnosticKind::MetadataCopyFailure => "W003",
        };
        let path = match diag.list {
            Some(list) => param_path(plan, plan_path, list, |pd| pd.name == diag.subject),
            None => Some(format!("{}/metadata", plan_path)),
        };
        findings.push(
            Severity::Warning,
            code,
            &path.unwrap_or_else(|| plan_path.to_string()),
            diag.detail.clone(),
        );
    }

    let strict = match jsonschema::draft4::new(&strict_draft4()) {
        Ok(validator) => validator,
        Err(e) => {
            findings.push(
                Severity::Error,
                "E003",
                plan_path,
                format!("cannot check generated schemas: {}", e),
            );
            return;
        }
    };

    for (context, schema) in converted.value.schemas.contexts() {
        let value = match serde_json::to_value(schema) {
            Ok(value) => value,
            Err(e) => {
                findings.push(
                    Severity::Error,
                    "E003",
                    plan_path,
                    format!("cannot serialize generated {} schema: {}", context, e),
                );
                continue;
            }
        };

        if let Err(e) = jsonschema::draft4::new(&value) {
            findings.push(
                Severity::Error,
                "E003",
                plan_path,
                format!("generated {} schema is invalid: {}", context, e),
            );
            continue;
        }

        for error in strict.iter_errors(&value) {
            findings.push(
                Severity::Error,
                "E003",
                plan_path,
                format!(
                    "generated {} schema is invalid at {}: {}",
                    context, error.instance_path, error
                ),
            );
        }
    }
}

/// Path of the first parameter in `list` matching `found`.
fn param_path(
    plan: &BundlePlan,
    plan_path: &str,
    list: ParameterList,
    found: impl Fn(&ParameterDescriptor) -> bool,
) -> Option<String> {
    let params = match list {
        ParameterList::Parameters => &plan.parameters,
        ParameterList::BindParameters => &plan.bind_parameters,
    };
    params
        .iter()
        .position(found)
        .map(|j| format!("{}/{}/{}", plan_path, list.as_str(), j))
}

/// Draft-04 meta-schema rules the bundled meta-schema of `jsonschema` leaves
/// out: `enum` and `required` must be non-empty and free of duplicates, at
/// every nesting level the generator produces.
fn strict_draft4() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-04/schema#",
        "definitions": {
            "schemaArray": { "type": "array", "items": { "$ref": "#" } },
            "schemaMap": { "type": "object", "additionalProperties": { "$ref": "#" } }
        },
        "properties": {
            "enum": { "type": "array", "minItems": 1, "uniqueItems": true },
            "required": {
                "type": "array",
                "items": { "type": "string" },
                "minItems": 1,
                "uniqueItems": true
            },
            "properties": { "$ref": "#/definitions/schemaMap" },
            "dependencies": { "$ref": "#/definitions/schemaMap" },
            "oneOf": { "$ref": "#/definitions/schemaArray" }
        }
    })
}

/// Checks on declarations the converter accepts without complaint.
fn check_declarations(params: &[ParameterDescriptor], list_path: &str, findings: &mut Findings) {
    let names: HashSet<&str> = params.iter().map(|pd| pd.name.as_str()).collect();
    let mut seen = HashSet::new();

    for (j, pd) in params.iter().enumerate() {
        let path = format!("{}/{}", list_path, j);

        if !seen.insert(pd.name.as_str()) {
            findings.push(
                Severity::Warning,
                "W006",
                &path,
                format!("duplicate parameter name \"{}\"", pd.name),
            );
        }

        if let Some(dep) = pd.dependency() {
            if dep.key == pd.name {
                findings.push(
                    Severity::Warning,
                    "W007",
                    &format!("{}/dependencies/0", path),
                    "dependency on the parameter itself is ignored".to_string(),
                );
            } else if !names.contains(dep.key.as_str()) {
                findings.push(
                    Severity::Warning,
                    "W004",
                    &format!("{}/dependencies/0", path),
                    format!("dependency on unknown parameter \"{}\" is ignored", dep.key),
                );
            }
        }

        if pd.dependencies.len() > 1 {
            findings.push(
                Severity::Warning,
                "W005",
                &format!("{}/dependencies", path),
                format!(
                    "only the first of {} dependencies is used",
                    pd.dependencies.len()
                ),
            );
        }
    }
}

/// Collect all .json files in a path (file or directory).
fn collect_spec_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            return vec![path.to_path_buf()];
        }
        return vec![];
    }

    let mut files = Vec::new();
    collect_files_recursive(path, &mut files);
    files.sort();
    files
}

fn collect_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files_recursive(&path, files);
        } else if path.extension().map(|e| e == "json").unwrap_or(false) {
            files.push(path);
        }
    }
}
