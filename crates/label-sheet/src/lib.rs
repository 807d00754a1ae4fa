pub mod catalog;
pub mod compose;
pub mod constants;
mod csv;
pub mod date;
pub mod label;
pub mod layout;
pub mod normalize;
pub mod render;
mod request;
pub mod service;
mod stats;
pub mod template;
mod types;

pub use catalog::{Catalog, LabelStore};
pub use compose::{SheetOutput, load_pdf, render_sheet, save_pdf};
pub use self::csv::load_print_items_csv;
pub use date::{default_output_filename, format_label_date};
pub use label::{ContentError, LabelAsset, LabelContent, ResolvedLabel};
pub use layout::{CellPosition, SheetLayout, compute_layout};
pub use normalize::{NumericValue, to_number};
pub use request::*;
pub use service::{PrintJob, prepare_job, print_labels, render_job, resolve_labels};
pub use stats::*;
pub use template::{Template, TemplateRecord};
pub use types::*;
