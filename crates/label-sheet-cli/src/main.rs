use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use label_sheet::{
    Catalog, LabelAsset, NumericValue, PrintRequest, Template, TemplateRecord,
    calculate_statistics, default_output_filename, load_print_items_csv, prepare_job, render_job,
    save_pdf,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "lsheet", about = "Label sheet printing CLI", version)]
struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a print request to a PDF sheet
    Print {
        /// Catalog JSON file with templates and labels
        #[arg(short, long)]
        catalog: PathBuf,

        /// Print request JSON file
        #[arg(short, long, conflicts_with_all = ["template", "items"])]
        request: Option<PathBuf>,

        /// Template id, used with --items
        #[arg(short, long, requires = "items")]
        template: Option<i64>,

        /// CSV file of print items (columns: label_id, quantity, date)
        #[arg(short, long, requires = "template")]
        items: Option<PathBuf>,

        /// Output PDF file (default: labels-<today>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show statistics only, don't generate PDF
        #[arg(long)]
        stats_only: bool,
    },

    /// Show the cell grid of a template
    Layout {
        #[arg(short, long)]
        catalog: PathBuf,

        #[arg(short, long)]
        template: i64,
    },

    /// Add a JPEG or PDF label to the catalog
    AddLabel {
        #[arg(short, long)]
        catalog: PathBuf,

        /// Label name
        #[arg(short, long)]
        name: String,

        /// JPEG or PDF file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Add a template to the catalog
    ///
    /// Measurements are millimetres and accept a decimal comma ("63,5").
    /// Unset values are taken from the standard A4 template.
    AddTemplate {
        #[arg(short, long)]
        catalog: PathBuf,

        #[arg(short, long)]
        name: String,

        #[arg(long)]
        top_margin: Option<String>,
        #[arg(long)]
        bottom_margin: Option<String>,
        #[arg(long)]
        left_margin: Option<String>,
        #[arg(long)]
        right_margin: Option<String>,
        #[arg(long)]
        horizontal_spacing: Option<String>,
        #[arg(long)]
        vertical_spacing: Option<String>,
        #[arg(long)]
        label_width: Option<String>,
        #[arg(long)]
        label_height: Option<String>,
        #[arg(long)]
        columns: Option<String>,
        #[arg(long)]
        rows: Option<String>,
    },

    /// List templates and labels in the catalog
    List {
        #[arg(short, long)]
        catalog: PathBuf,
    },
}

/// Load a catalog, or start a new one with the standard template
async fn open_catalog(path: &Path) -> Result<Catalog> {
    if tokio::fs::try_exists(path).await? {
        Catalog::load(path)
            .await
            .with_context(|| format!("Failed to load catalog {}", path.display()))
    } else {
        log::info!("Catalog {} not found, starting a new one", path.display());
        Ok(Catalog::with_default_template())
    }
}

/// MIME type of a label file, from its extension
fn label_file_type(path: &Path) -> Result<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => Ok(label_sheet::label::MIME_JPEG),
        Some("pdf") => Ok(label_sheet::label::MIME_PDF),
        _ => bail!("{}: only JPG and PDF labels are supported", path.display()),
    }
}

fn print_template(id: i64, template: &Template) {
    println!(
        "  [{}] {}: {}x{} cells of {}x{} mm",
        id,
        template.name,
        template.columns,
        template.rows,
        template.label_width,
        template.label_height
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    match cli.command {
        Commands::Print {
            catalog,
            request,
            template,
            items,
            output,
            stats_only,
        } => {
            let catalog = open_catalog(&catalog).await?;

            let request = match (request, template, items) {
                (Some(path), _, _) => PrintRequest::load(&path)
                    .await
                    .with_context(|| format!("Failed to load request {}", path.display()))?,
                (None, Some(template_id), Some(items)) => {
                    let labels = load_print_items_csv(&items)
                        .await
                        .with_context(|| format!("Failed to load items {}", items.display()))?;
                    PrintRequest::new(template_id, labels)
                }
                _ => bail!("either --request or --template with --items is required"),
            };

            let job = prepare_job(&catalog, &request)?;

            let stats = calculate_statistics(&job.template, &job.labels);
            println!("Sheet Statistics:");
            println!("  Template: {}", job.template.name);
            println!("  Labels: {}", stats.instances);
            println!("  Cells per page: {}", stats.cells_per_page);
            println!("  Pages: {}", stats.pages);
            println!("  Empty cells on last page: {}", stats.empty_cells);

            if stats_only {
                return Ok(());
            }

            let output_path = output.unwrap_or_else(|| {
                PathBuf::from(default_output_filename(chrono::Local::now().date_naive()))
            });

            let sheet = tokio::task::spawn_blocking(move || render_job(&job)).await??;
            for warning in &sheet.warnings {
                println!("  warning: {}", warning);
            }
            save_pdf(sheet.document, &output_path).await?;
            println!(
                "Generated {} labels on {} pages → {}",
                sheet.instance_count,
                sheet.page_count,
                output_path.display()
            );
        }

        Commands::Layout { catalog, template } => {
            let catalog = open_catalog(&catalog).await?;
            let template = catalog.get_template(template)?;
            let layout = template.layout();

            println!(
                "{}: {} x {} = {} cells",
                template.name, layout.labels_per_row, layout.labels_per_column, layout.total_labels
            );
            for (i, cell) in layout.label_positions.iter().enumerate() {
                println!(
                    "  {:>3}: left {:.2} top {:.2} ({:.2} x {:.2} mm)",
                    i, cell.left, cell.top, cell.width, cell.height
                );
            }
        }

        Commands::AddLabel {
            catalog: catalog_path,
            name,
            file,
        } => {
            let mut catalog = open_catalog(&catalog_path).await?;
            let file_type = label_file_type(&file)?;
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let id = catalog.create_label(LabelAsset::from_file_bytes(&name, &bytes, file_type)?)?;
            catalog.save(&catalog_path).await?;
            println!("Added label [{}] {}", id, name);
        }

        Commands::AddTemplate {
            catalog: catalog_path,
            name,
            top_margin,
            bottom_margin,
            left_margin,
            right_margin,
            horizontal_spacing,
            vertical_spacing,
            label_width,
            label_height,
            columns,
            rows,
        } => {
            let mut catalog = open_catalog(&catalog_path).await?;

            let defaults = TemplateRecord::from(&Template::default());
            let pick = |arg: Option<String>, default: Option<NumericValue>| {
                arg.map(NumericValue::Text).or(default)
            };
            let record = TemplateRecord {
                name: name.clone(),
                top_margin: pick(top_margin, defaults.top_margin),
                bottom_margin: pick(bottom_margin, defaults.bottom_margin),
                left_margin: pick(left_margin, defaults.left_margin),
                right_margin: pick(right_margin, defaults.right_margin),
                horizontal_spacing: pick(horizontal_spacing, defaults.horizontal_spacing),
                vertical_spacing: pick(vertical_spacing, defaults.vertical_spacing),
                label_width: pick(label_width, defaults.label_width),
                label_height: pick(label_height, defaults.label_height),
                columns: pick(columns, defaults.columns),
                rows: pick(rows, defaults.rows),
            };

            let id = catalog.create_template(&record)?;
            catalog.save(&catalog_path).await?;
            println!("Added template:");
            print_template(id, catalog.get_template(id)?);
        }

        Commands::List { catalog } => {
            let catalog = open_catalog(&catalog).await?;

            println!("Templates:");
            for (id, template) in catalog.list_templates() {
                print_template(id, template);
            }
            println!("Labels:");
            for (id, label) in catalog.list_labels() {
                println!("  [{}] {} ({})", id, label.name, label.file_type);
            }
        }
    }

    Ok(())
}
