//! Shared data models for frontmatter and manifest reports.

pub mod manifest;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// Issue severity. Only errors affect the exit status.
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A single frontmatter issue with location and optional field.
pub struct ValidationIssue {
    pub file: String,
    pub line: usize,
    pub message: String,
    pub field: Option<String>,
    pub severity: Severity,
}

impl ValidationIssue {
    pub fn error(file: &str, line: usize, message: impl Into<String>, field: Option<&str>) -> Self {
        Self::new(file, line, message.into(), field, Severity::Error)
    }

    pub fn warning(
        file: &str,
        line: usize,
        message: impl Into<String>,
        field: Option<&str>,
    ) -> Self {
        Self::new(file, line, message.into(), field, Severity::Warning)
    }

    fn new(file: &str, line: usize, message: String, field: Option<&str>, sev: Severity) -> Self {
        Self {
            file: file.to_string(),
            line: line.max(1),
            message,
            field: field.map(str::to_string),
            severity: sev,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Errors and warnings produced for one document (or a batch of them).
pub struct Findings {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl Findings {
    pub fn extend(&mut self, other: Findings) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Aggregated frontmatter run over all discovered files.
pub struct FrontmatterReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub files_checked: usize,
}

impl FrontmatterReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Promote every warning to an error, keeping their relative order after
    /// the existing errors.
    pub fn into_strict(mut self) -> Self {
        let promoted = self.warnings.drain(..).map(|mut w| {
            w.severity = Severity::Error;
            w
        });
        self.errors.extend(promoted);
        self
    }
}
