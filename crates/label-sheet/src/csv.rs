use crate::request::PrintItem;
use crate::types::*;
use std::path::Path;

/// Load print items from a CSV file with a `label_id,quantity[,date]` header.
///
/// Rows with an empty date column print without a date.
pub async fn load_print_items_csv(path: impl AsRef<Path>) -> Result<Vec<PrintItem>> {
    let path = path.as_ref().to_owned();

    let contents = tokio::fs::read_to_string(&path).await?;

    let items = tokio::task::spawn_blocking(move || parse_print_items(&contents)).await??;

    Ok(items)
}

fn parse_print_items(contents: &str) -> Result<Vec<PrintItem>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(contents.as_bytes());
    let mut items = Vec::new();
    let mut errors = ValidationErrors::new();

    for (row, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() < 2 {
            errors.push(format!("row {}", row + 1), "expected label_id and quantity");
            continue;
        }

        let id = record[0].parse::<i64>();
        let quantity = record[1].parse::<u32>();
        let (Ok(id), Ok(quantity)) = (id, quantity) else {
            errors.push(
                format!("row {}", row + 1),
                format!("'{}', '{}' are not a label id and quantity", &record[0], &record[1]),
            );
            continue;
        };

        let date = record.get(2).filter(|d| !d.is_empty()).map(str::to_string);
        items.push(PrintItem { id, quantity, date });
    }

    errors.into_result()?;
    Ok(items)
}
