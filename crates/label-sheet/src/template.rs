use crate::constants::{SHEET_HEIGHT_MM, SHEET_WIDTH_MM};
use crate::layout::{SheetLayout, compute_layout};
use crate::normalize::{NumericValue, to_number};
use crate::types::{Result, ValidationErrors};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smallest accepted cell edge in millimetres
pub const MIN_LABEL_SIZE_MM: f32 = 10.0;

/// Largest accepted column count
pub const MAX_COLUMNS: usize = 10;

/// Largest accepted row count
pub const MAX_ROWS: usize = 20;

/// Page grid specification for a label sheet, all lengths in millimetres
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Template {
    pub name: String,
    pub top_margin: f32,
    pub bottom_margin: f32,
    pub left_margin: f32,
    pub right_margin: f32,
    /// Gap between neighbouring columns
    pub horizontal_spacing: f32,
    /// Gap between neighbouring rows
    pub vertical_spacing: f32,
    pub label_width: f32,
    pub label_height: f32,
    pub columns: usize,
    pub rows: usize,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            name: "Standart A4 Etiket".to_string(),
            top_margin: 4.0,
            bottom_margin: 4.0,
            left_margin: 4.0,
            right_margin: 4.0,
            horizontal_spacing: 3.0,
            vertical_spacing: 0.0,
            label_width: 50.0,
            label_height: 30.0,
            columns: 3,
            rows: 4,
        }
    }
}

impl Template {
    /// Cell grid of this template on an A4 sheet
    pub fn layout(&self) -> SheetLayout {
        compute_layout(
            SHEET_WIDTH_MM,
            SHEET_HEIGHT_MM,
            self.top_margin,
            self.bottom_margin,
            self.left_margin,
            self.right_margin,
            self.horizontal_spacing,
            self.vertical_spacing,
            self.label_width,
            self.label_height,
            self.columns,
            self.rows,
        )
    }

    /// Number of cells on each sheet
    pub fn cells_per_page(&self) -> usize {
        self.layout().cells_per_page()
    }

    /// Validate the template
    pub fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::new();

        if self.name.trim().is_empty() {
            errors.push("name", "template name is required");
        }

        let non_negative = [
            ("top_margin", self.top_margin),
            ("bottom_margin", self.bottom_margin),
            ("left_margin", self.left_margin),
            ("right_margin", self.right_margin),
            ("horizontal_spacing", self.horizontal_spacing),
            ("vertical_spacing", self.vertical_spacing),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                errors.push(field, "must be zero or greater");
            }
        }

        for (field, value) in [
            ("label_width", self.label_width),
            ("label_height", self.label_height),
        ] {
            if !value.is_finite() || value < MIN_LABEL_SIZE_MM {
                errors.push(field, format!("must be at least {} mm", MIN_LABEL_SIZE_MM));
            }
        }

        if !(1..=MAX_COLUMNS).contains(&self.columns) {
            errors.push("columns", format!("must be between 1 and {}", MAX_COLUMNS));
        }
        if !(1..=MAX_ROWS).contains(&self.rows) {
            errors.push("rows", format!("must be between 1 and {}", MAX_ROWS));
        }

        errors.into_result()
    }
}

/// A template as stored or submitted, before numeric normalization.
///
/// Every measurement may be a number, a locale string such as `"63,5"`, or
/// missing. [`TemplateRecord::normalize`] is the only place where these are
/// turned into a [`Template`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct TemplateRecord {
    pub name: String,
    pub top_margin: Option<NumericValue>,
    pub bottom_margin: Option<NumericValue>,
    pub left_margin: Option<NumericValue>,
    pub right_margin: Option<NumericValue>,
    pub horizontal_spacing: Option<NumericValue>,
    pub vertical_spacing: Option<NumericValue>,
    pub label_width: Option<NumericValue>,
    pub label_height: Option<NumericValue>,
    pub columns: Option<NumericValue>,
    pub rows: Option<NumericValue>,
}

impl TemplateRecord {
    /// Convert to a canonical template and validate it.
    ///
    /// Text that is not a number is reported per field together with any
    /// range problems of the normalized values.
    pub fn normalize(&self) -> Result<Template> {
        let mut errors = ValidationErrors::new();

        let mut number = |field: &str, value: &Option<NumericValue>| -> f32 {
            match to_number(value.as_ref()) {
                Some(v) => v,
                None => {
                    errors.push(field, "not a number");
                    0.0
                }
            }
        };

        let template = Template {
            name: self.name.clone(),
            top_margin: number("top_margin", &self.top_margin),
            bottom_margin: number("bottom_margin", &self.bottom_margin),
            left_margin: number("left_margin", &self.left_margin),
            right_margin: number("right_margin", &self.right_margin),
            horizontal_spacing: number("horizontal_spacing", &self.horizontal_spacing),
            vertical_spacing: number("vertical_spacing", &self.vertical_spacing),
            label_width: number("label_width", &self.label_width),
            label_height: number("label_height", &self.label_height),
            columns: count(number("columns", &self.columns)),
            rows: count(number("rows", &self.rows)),
        };

        if let Err(crate::LabelSheetError::Validation(range_errors)) = template.validate() {
            for problem in range_errors.problems {
                if !errors.has_field(&problem.field) {
                    errors.problems.push(problem);
                }
            }
        }

        errors.into_result()?;
        Ok(template)
    }
}

impl From<&Template> for TemplateRecord {
    fn from(template: &Template) -> Self {
        let n = |v: f32| Some(NumericValue::Number(v as f64));
        Self {
            name: template.name.clone(),
            top_margin: n(template.top_margin),
            bottom_margin: n(template.bottom_margin),
            left_margin: n(template.left_margin),
            right_margin: n(template.right_margin),
            horizontal_spacing: n(template.horizontal_spacing),
            vertical_spacing: n(template.vertical_spacing),
            label_width: n(template.label_width),
            label_height: n(template.label_height),
            columns: n(template.columns as f32),
            rows: n(template.rows as f32),
        }
    }
}

/// Grid counts are whole numbers; fractional or negative input becomes an
/// out-of-range count that validation rejects.
fn count(value: f32) -> usize {
    if value.fract() != 0.0 || value < 0.0 {
        usize::MAX
    } else {
        value as usize
    }
}
