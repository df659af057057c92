use crate::cli::commands::{fail, open_client, open_pool};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::record::Field;
use crate::ui::messages::{header, info};
use crate::utils::formatting::{bold, pad_right};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Show { row, json } = cmd {
        let pool = open_pool(cfg)?;

        let record = open_client(cfg)
            .and_then(|client| client.get_record(*row))
            .map_err(|e| fail(&pool, "show", &row.to_string(), "Failed to fetch record", e))?;

        if *json {
            let out = serde_json::to_string_pretty(&record)
                .map_err(|e| AppError::Other(e.to_string()))?;
            println!("{}", out);
            return Ok(());
        }

        header(format!("Row {}", row));
        let label_w = Field::ALL.iter().map(|f| f.label().len()).max().unwrap_or(0);
        for field in Field::ALL {
            println!(
                "{} : {}",
                bold(&pad_right(field.label(), label_w)),
                record.get(field)
            );
        }

        // a cleared row and a never-written row look the same
        if record.is_blank() {
            println!();
            info(format!("Row {} holds no data", row));
        }
    }
    Ok(())
}
