use crate::constants::{MAX_INSTANCES_PER_JOB, MAX_QUANTITY_PER_LABEL};
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One requested label: which stored label, how many copies, and its date
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrintItem {
    pub id: i64,
    pub quantity: u32,
    /// Date stamped on every copy of this label
    #[cfg_attr(feature = "serde", serde(default))]
    pub date: Option<String>,
}

impl PrintItem {
    pub fn new(id: i64, quantity: u32) -> Self {
        Self {
            id,
            quantity,
            date: None,
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }
}

/// Everything needed for one print job, assembled once and passed whole
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PrintRequest {
    pub template_id: i64,
    pub labels: Vec<PrintItem>,

    // Older clients send a sheet-wide date switch. It is accepted but never
    // stamps anything: only per-label dates do.
    #[cfg_attr(feature = "serde", serde(default))]
    pub add_date: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub date: Option<String>,
}

impl PrintRequest {
    pub fn new(template_id: i64, labels: Vec<PrintItem>) -> Self {
        Self {
            template_id,
            labels,
            ..Default::default()
        }
    }

    /// Load a request from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let request = serde_json::from_slice(&bytes)
            .map_err(|e| LabelSheetError::Config(format!("Failed to parse print request: {}", e)))?;
        Ok(request)
    }

    /// Save the request to a JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            LabelSheetError::Config(format!("Failed to serialize print request: {}", e))
        })?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Copies requested across all items
    pub fn total_quantity(&self) -> usize {
        self.labels
            .iter()
            .fold(0usize, |total, item| total.saturating_add(item.quantity as usize))
    }

    /// Validate the request
    pub fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::new();

        for (i, item) in self.labels.iter().enumerate() {
            if item.quantity < 1 {
                errors.push(format!("labels[{}].quantity", i), "must be at least 1");
            } else if item.quantity > MAX_QUANTITY_PER_LABEL {
                errors.push(
                    format!("labels[{}].quantity", i),
                    format!("must be at most {}", MAX_QUANTITY_PER_LABEL),
                );
            }
        }

        let total = self.total_quantity();
        if total > MAX_INSTANCES_PER_JOB {
            errors.push(
                "labels",
                format!(
                    "{} copies requested, at most {} per job",
                    total, MAX_INSTANCES_PER_JOB
                ),
            );
        }

        errors.into_result()
    }
}
