//! Config command - manage configuration

use anyhow::Result;
use console::{style, Term};
use gateaccess_core::{Config, FieldChain};

pub fn show(config: &Config) -> Result<()> {
    let term = Term::stdout();

    term.write_line(&format!("{}", style("gateaccess Configuration").bold()))?;
    term.write_line("")?;

    term.write_line(&format!(
        "Strategy:         {}",
        style(format!("{} ({})", config.strategy.as_str(), config.strategy.display_name())).cyan()
    ))?;
    term.write_line(&format!(
        "Key collisions:   {}",
        style(config.collision_policy.as_str()).cyan()
    ))?;
    term.write_line(&format!(
        "Name quoting:     {}",
        style(config.client_name_quoting.as_str()).cyan()
    ))?;
    term.write_line(&format!(
        "Locations key:    {}",
        style(&config.locations_key).cyan()
    ))?;
    term.write_line(&format!(
        "Locations file:   {}",
        style(&config.default_locations_path).cyan()
    ))?;
    term.write_line(&format!(
        "Output file:      {}",
        style(&config.default_output_path).cyan()
    ))?;

    let columns = &config.columns;
    term.write_line("")?;
    term.write_line(&format!("{}", style("Columns:").dim()))?;
    term.write_line(&format!(
        "  Name:             {} / {} / {} / {}",
        columns.first_name, columns.last_name, columns.company_name, columns.display_name
    ))?;
    term.write_line(&format!("  Client phone:     {}", chain(&columns.client_phone)))?;
    term.write_line(&format!("  Storage location: {}", chain(&columns.storage_location)))?;
    term.write_line(&format!("  Storage number:   {}", chain(&columns.storage_number)))?;
    term.write_line(&format!("  Gate phone:       {}", chain(&columns.gate_phone)))?;

    Ok(())
}

pub fn show_path(path: Option<&str>) -> Result<()> {
    match path {
        Some(p) => println!("{}", p),
        None => println!("{}", Config::default_config_path()?.display()),
    }
    Ok(())
}

pub fn init(config: &Config, path: Option<&str>) -> Result<()> {
    let written = config.save(path)?;
    Term::stdout().write_line(&format!(
        "{} Configuration written to {}",
        style("✓").green(),
        written.display()
    ))?;
    Ok(())
}

fn chain(chain: &FieldChain) -> String {
    chain
        .columns()
        .iter()
        .map(|c| format!("\"{}\"", c))
        .collect::<Vec<_>>()
        .join(" → ")
}
