//! Print service boundary
//!
//! Turns a [`PrintRequest`] into a rendered sheet: validate, look up the
//! template and labels, then hand the resolved job to the compositor.

use crate::compose::{SheetOutput, render_sheet};
use crate::catalog::LabelStore;
use crate::label::ResolvedLabel;
use crate::request::PrintRequest;
use crate::template::Template;
use crate::types::*;

/// A validated request with everything looked up
#[derive(Debug, Clone)]
pub struct PrintJob {
    pub template_id: i64,
    pub template: Template,
    pub labels: Vec<ResolvedLabel>,
    /// Problems found while resolving, carried into the render output
    pub warnings: Vec<RenderWarning>,
}

/// Resolve the requested labels in request order.
///
/// Ids missing from the store are dropped and reported; they reserve no cell.
pub fn resolve_labels(
    store: &dyn LabelStore,
    request: &PrintRequest,
) -> (Vec<ResolvedLabel>, Vec<RenderWarning>) {
    let mut labels = Vec::with_capacity(request.labels.len());
    let mut warnings = Vec::new();

    for item in &request.labels {
        match store.label(item.id) {
            Some(asset) => labels.push(ResolvedLabel::from_asset(
                Some(item.id),
                &asset,
                item.quantity,
                item.date.clone(),
            )),
            None => {
                log::warn!("Label {} not found, skipping", item.id);
                warnings.push(RenderWarning::UnresolvedLabel { id: item.id });
            }
        }
    }

    (labels, warnings)
}

/// Validate a request and look up its template and labels
pub fn prepare_job(store: &dyn LabelStore, request: &PrintRequest) -> Result<PrintJob> {
    request.validate()?;

    let template = store
        .template(request.template_id)
        .ok_or(LabelSheetError::TemplateNotFound(request.template_id))?;

    if request.add_date || request.date.is_some() {
        log::debug!("Sheet-wide date settings ignored; dates come from each label");
    }

    let (labels, warnings) = resolve_labels(store, request);
    Ok(PrintJob {
        template_id: request.template_id,
        template,
        labels,
        warnings,
    })
}

/// Render a prepared job; resolution warnings come first in the output
pub fn render_job(job: &PrintJob) -> Result<SheetOutput> {
    let mut output = render_sheet(&job.template, &job.labels)?;
    let mut warnings = job.warnings.clone();
    warnings.append(&mut output.warnings);
    output.warnings = warnings;
    Ok(output)
}

/// Resolve and render a print request.
///
/// Lookup happens on the calling task; rendering is CPU-bound and runs on the
/// blocking pool.
pub async fn print_labels(store: &dyn LabelStore, request: &PrintRequest) -> Result<SheetOutput> {
    let job = prepare_job(store, request)?;
    log::info!(
        "Print job: template {} with {} labels",
        job.template_id,
        job.labels.len()
    );
    let output = tokio::task::spawn_blocking(move || render_job(&job)).await??;
    Ok(output)
}
