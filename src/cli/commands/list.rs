use crate::cli::commands::{fail, open_client, open_pool};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::record::{Field, Record};
use crate::ui::messages::info;
use crate::utils::formatting::single_line;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { json } = cmd {
        let pool = open_pool(cfg)?;

        let records = open_client(cfg)
            .and_then(|client| client.list_records())
            .map_err(|e| {
                fail(
                    &pool,
                    "list",
                    "",
                    "Failed to fetch records. Please check your Google Sheets configuration.",
                    e,
                )
            })?;

        if *json {
            let out = serde_json::to_string_pretty(&records)
                .map_err(|e| AppError::Other(e.to_string()))?;
            println!("{}", out);
            return Ok(());
        }

        if records.is_empty() {
            info("No records found. Use `rsheetcrud add` to create the first one.");
            return Ok(());
        }

        print!("{}", render_records(&records));
        println!();
        info(format!(
            "Showing {} record{}",
            records.len(),
            if records.len() == 1 { "" } else { "s" }
        ));
    }
    Ok(())
}

fn column_width(field: Field) -> usize {
    match field {
        Field::SerialNumber => 6,
        Field::Details => 32,
        _ => 20,
    }
}

pub fn render_records(records: &[Record]) -> String {
    let mut columns = vec![Column::new("Row", 5)];
    columns.extend(
        Field::ALL
            .iter()
            .map(|f| Column::new(f.label(), column_width(*f))),
    );

    let mut table = Table::new(columns);
    for record in records {
        let mut row = vec![
            record
                .row_position
                .map(|p| p.to_string())
                .unwrap_or_default(),
        ];
        row.extend(Field::ALL.iter().map(|f| single_line(record.get(*f))));
        table.add_row(row);
    }
    table.render()
}
