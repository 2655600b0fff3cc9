//! Terminal and JSON rendering of command results

use anyhow::{Context, Result};
use colored::Colorize;
use filewise_core::rename::{ExecutionReport, StagingReason};
use filewise_core::RenamePlan;
use serde::Serialize;
use std::path::PathBuf;

/// Print one path per line, or a JSON array
pub fn print_paths(paths: &[PathBuf], json: bool) -> Result<()> {
    if json {
        return print_json(&paths);
    }

    for path in paths {
        println!("{}", path.display());
    }
    Ok(())
}

/// Print one extension per line, or a JSON array
pub fn print_extensions(extensions: &[String], json: bool) -> Result<()> {
    if json {
        return print_json(&extensions);
    }

    for extension in extensions {
        println!("{extension}");
    }
    Ok(())
}

#[derive(Serialize)]
struct PlanDocument<'a> {
    dry_run: bool,
    #[serde(flatten)]
    plan: &'a RenamePlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    applied: Option<&'a ExecutionReport>,
}

/// Render a rename plan, with the execution report when it was applied
pub fn print_plan(
    plan: &RenamePlan,
    dry_run: bool,
    report: Option<&ExecutionReport>,
    json: bool,
) -> Result<()> {
    if json {
        return print_json(&PlanDocument {
            dry_run,
            plan,
            applied: report,
        });
    }

    if plan.is_empty() {
        println!("{}", "Nothing to rename".dimmed());
        return Ok(());
    }

    for step in plan {
        let mut line = format!(
            "{} {} {}",
            step.source.display(),
            "->".dimmed(),
            step.target.display().to_string().green()
        );
        if step.disambiguated {
            line.push_str(&format!(" {}", "(renumbered)".yellow()));
        }
        match step.staging_reason {
            Some(StagingReason::Cycle) => line.push_str(&format!(" {}", "(staged)".cyan())),
            Some(StagingReason::Overwrite) => {
                line.push_str(&format!(" {}", "(overwrites)".red()))
            }
            None => {}
        }
        println!("{line}");
    }

    match report {
        Some(report) => println!(
            "{}",
            format!(
                "Renamed {} paths ({} operations)",
                report.steps, report.operations
            )
            .bold()
        ),
        None if dry_run => println!(
            "{}",
            format!("Dry run: {} renames planned", plan.len()).bold()
        ),
        None => {}
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered =
        serde_json::to_string_pretty(value).context("Failed to serialize output as JSON")?;
    println!("{rendered}");
    Ok(())
}
