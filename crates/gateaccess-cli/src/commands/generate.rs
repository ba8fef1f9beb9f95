//! Generate command - contacts and locations to INSERT statements

use anyhow::{Context, Result};
use console::{style, Term};
use gateaccess_core::{Config, Pipeline, RunSummary};
use std::io::Write;
use std::path::Path;

pub fn run(
    config: &Config,
    json: Option<&str>,
    sources: &[String],
    output: Option<&str>,
    verbose: bool,
) -> Result<()> {
    let json = json.unwrap_or(&config.default_locations_path);
    let output = output.unwrap_or(&config.default_output_path);
    let to_stdout = output == "-";
    // keep stdout clean when the statements go there
    let term = if to_stdout { Term::stderr() } else { Term::stdout() };

    term.write_line(&format!(
        "{} Loading locations: {} ({})",
        style("📍").cyan(),
        json,
        config.strategy.display_name()
    ))?;

    let mut pipeline = Pipeline::from_locations_file(config, Path::new(json))
        .with_context(|| format!("Cannot continue without locations from {}", json))?
        .with_match_tracing(verbose);

    for source in sources {
        term.write_line(&format!("{} Processing {}", style("⚙").cyan(), source))?;
        pipeline.process_file(Path::new(source));
    }

    let result = pipeline.finish();

    if to_stdout {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(result.statements.as_bytes())?;
        if !result.statements.is_empty() {
            stdout.write_all(b"\n")?;
        }
    } else {
        std::fs::write(output, &result.statements)
            .with_context(|| format!("Error writing to {}", output))?;
    }

    term.write_line("")?;
    print_summary(&term, &result.summary)?;
    term.write_line(&format!(
        "{} Generated {} INSERTs in {}",
        style("✓").green(),
        result.grants.len(),
        if to_stdout { "stdout" } else { output }
    ))?;

    Ok(())
}

fn print_summary(term: &Term, summary: &RunSummary) -> Result<()> {
    term.write_line(&format!("{}", style("Summary:").bold()))?;
    term.write_line(&format!(
        "  Locations:        {} ({} keys)",
        summary.locations, summary.location_keys
    ))?;
    term.write_line(&format!(
        "  Sources:          {} processed, {} failed",
        summary.sources_processed, summary.sources_failed
    ))?;
    term.write_line(&format!("  Contacts:         {}", summary.contacts))?;
    term.write_line(&format!("  Duplicates:       {}", summary.duplicates))?;

    if summary.skipped() > 0 {
        term.write_line(&format!(
            "  Skipped:          {}",
            style(summary.skipped()).yellow()
        ))?;
        let reasons = [
            ("no client phone", summary.missing_client_phone),
            ("no storage location", summary.missing_location),
            ("invalid storage number", summary.invalid_index),
            ("storage number out of range", summary.index_out_of_range),
            ("no gate phone", summary.no_gate_phone),
        ];
        for (reason, count) in reasons.into_iter().filter(|(_, count)| *count > 0) {
            term.write_line(&format!("    {:28} {}", reason, count))?;
        }
    }

    if summary.sources_failed > 0 {
        term.write_line(&format!(
            "{} {} source(s) could not be read, see the log above",
            style("⚠").yellow(),
            summary.sources_failed
        ))?;
    }

    Ok(())
}
