//! Recoverable conversion problems.
//!
//! A conversion either fails with a [`ConvertError`](crate::ConvertError) or
//! succeeds. Problems it can work around are collected here and returned with
//! the result, and are also emitted as `tracing` warnings.

use serde::Serialize;

/// Kind of a recoverable conversion problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A parameter pattern did not compile and was left out of the schema.
    InvalidPattern,
    /// A dependency value is not among the controller's allowed values; the
    /// dependency was skipped.
    InvalidDependencyValue,
    /// Plan metadata could not be copied; it was returned without form
    /// definitions.
    MetadataCopyFailure,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::InvalidPattern => "invalid_pattern",
            DiagnosticKind::InvalidDependencyValue => "invalid_dependency_value",
            DiagnosticKind::MetadataCopyFailure => "metadata_copy_failure",
        }
    }
}

/// Descriptor list of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterList {
    Parameters,
    BindParameters,
}

impl ParameterList {
    /// Field name of the list in a bundle plan.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterList::Parameters => "parameters",
            ParameterList::BindParameters => "bind_parameters",
        }
    }
}

/// A single recoverable problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// List holding the parameter; `None` for plan-level problems.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<ParameterList>,
    /// Parameter (or plan, for metadata) the problem was found on.
    pub subject: String,
    pub detail: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(list) = self.list {
            write!(f, "{}/", list.as_str())?;
        }
        write!(f, "{} [{}]: {}", self.subject, self.kind.as_str(), self.detail)
    }
}

/// Collector threaded through a conversion.
///
/// A collector built with [`Diagnostics::for_list`] tags every problem with
/// that list. Identical problems are recorded once per collector; merging
/// collectors with [`Diagnostics::append`] keeps everything.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
    list: Option<ParameterList>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_list(list: ParameterList) -> Self {
        Self {
            items: Vec::new(),
            list: Some(list),
        }
    }

    /// Record a problem and emit it as a warning event.
    ///
    /// The create and update contexts see the same descriptors, so an
    /// identical problem is recorded once.
    pub fn push(&mut self, kind: DiagnosticKind, subject: &str, detail: impl Into<String>) {
        let diagnostic = Diagnostic {
            kind,
            list: self.list,
            subject: subject.to_string(),
            detail: detail.into(),
        };
        if self.items.contains(&diagnostic) {
            return;
        }
        tracing::warn!(
            kind = kind.as_str(),
            list = self.list.map(|l| l.as_str()),
            subject,
            "{}",
            diagnostic.detail
        );
        self.items.push(diagnostic);
    }

    /// Move every problem of `other` to the end of this collector.
    pub fn append(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

/// A successful conversion result with the problems worked around on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Converted<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Converted<T> {
    pub fn new(value: T, diagnostics: Diagnostics) -> Self {
        Self {
            value,
            diagnostics: diagnostics.into_vec(),
        }
    }

    /// Diagnostics of the given kind.
    pub fn diagnostics_of(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }
}
