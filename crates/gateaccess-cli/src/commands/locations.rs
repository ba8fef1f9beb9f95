//! Locations command - show what contacts can match against

use anyhow::{Context, Result};
use console::{style, Term};
use gateaccess_core::location::{build_index, build_table, load_locations};
use gateaccess_core::{Config, PhoneNumber, Strategy};
use std::path::Path;

pub fn run(config: &Config, json: Option<&str>) -> Result<()> {
    let term = Term::stdout();
    let json = json.unwrap_or(&config.default_locations_path);

    let records = load_locations(Path::new(json), &config.locations_key)
        .with_context(|| format!("Failed to load locations from {}", json))?;

    term.write_line(&format!(
        "{} ({} locations, {})",
        style("Locations").bold(),
        records.len(),
        config.strategy.display_name()
    ))?;
    term.write_line("")?;

    match config.strategy {
        Strategy::Text => {
            let index = build_index(&records, config.collision_policy);
            for (key, phone) in index.iter() {
                term.write_line(&format!("  {:48} {}", key, phone_label(phone)))?;
            }
            term.write_line("")?;
            term.write_line(&format!(
                "{} keys from {} named locations",
                index.len(),
                index.loaded()
            ))?;
        }
        Strategy::Positional => {
            let table = build_table(&records);
            for (record, phone) in records.iter().zip(table.iter()) {
                term.write_line(&format!(
                    "  {:>4}  {:16} {}",
                    record.ordinal_position,
                    phone_label(phone),
                    style(&record.display_name).dim()
                ))?;
            }
        }
    }

    Ok(())
}

fn phone_label(phone: Option<&PhoneNumber>) -> String {
    match phone {
        Some(phone) => style(phone.as_str()).green().to_string(),
        None => style("no gate phone").red().to_string(),
    }
}
