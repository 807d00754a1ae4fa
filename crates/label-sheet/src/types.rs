use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabelSheetError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("Template not found: {0}")]
    TemplateNotFound(i64),
    #[error("Label not found: {0}")]
    LabelNotFound(i64),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, LabelSheetError>;

/// A single field-level problem found while validating caller input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldProblem {
    /// Dotted path of the offending field, e.g. `labels[2].quantity`
    pub field: String,
    pub message: String,
}

/// Every problem found in one validation pass.
///
/// Validation collects all problems instead of stopping at the first one so
/// callers can report the whole list at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub problems: Vec<FieldProblem>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.problems.push(FieldProblem {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// Check whether any problem was reported for `field`
    pub fn has_field(&self, field: &str) -> bool {
        self.problems.iter().any(|p| p.field == field)
    }

    /// `Ok(())` when nothing was reported, otherwise a validation error
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(LabelSheetError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .problems
            .iter()
            .map(|p| format!("{}: {}", p.field, p.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// A recoverable problem hit while assembling a sheet.
///
/// None of these abort the render; the affected label or cell is left out and
/// the warning is returned alongside the document.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderWarning {
    /// The requested label id does not exist in the store; no cell was reserved
    UnresolvedLabel { id: i64 },
    /// The stored payload could not be turned into printable content
    UnusableContent {
        label: String,
        instance: usize,
        reason: String,
    },
    /// The payload decoded but could not be embedded (corrupt JPEG or PDF)
    EmbedFailed {
        label: String,
        instance: usize,
        reason: String,
    },
    /// The date did not parse as a calendar date and was printed as given
    UnparsedDate { label: String, date: String },
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderWarning::UnresolvedLabel { id } => {
                write!(f, "label {} not found, skipped", id)
            }
            RenderWarning::UnusableContent {
                label,
                instance,
                reason,
            } => write!(
                f,
                "label '{}' (instance {}) left blank: {}",
                label, instance, reason
            ),
            RenderWarning::EmbedFailed {
                label,
                instance,
                reason,
            } => write!(
                f,
                "label '{}' (instance {}) could not be embedded: {}",
                label, instance, reason
            ),
            RenderWarning::UnparsedDate { label, date } => {
                write!(f, "label '{}': date '{}' printed verbatim", label, date)
            }
        }
    }
}
