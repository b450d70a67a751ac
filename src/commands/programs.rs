//! Programs command implementation

use anyhow::Result;
use chrono::Local;

use crate::cli::ProgramsArgs;
use crate::config::Config;
use crate::programs::{inventory, system_source};

use super::plural;

/// Run the programs command
pub fn run(args: ProgramsArgs, config: &Config) -> Result<()> {
    let old_after_days = args.older_than.unwrap_or(config.programs.old_after_days);
    let today = Local::now().date_naive();

    let mut programs = inventory(system_source().records(), today, old_after_days);
    let total = programs.len();
    let old_count = programs.iter().filter(|p| p.is_old).count();

    if args.old_only {
        programs.retain(|p| p.is_old);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&programs)?);
        return Ok(());
    }

    println!("{} program{} installed", total, plural(total));
    println!(
        "{} old program{} detected (older than {} days)",
        old_count,
        plural(old_count),
        old_after_days
    );

    if programs.is_empty() {
        return Ok(());
    }

    println!();
    for program in &programs {
        let marker = if program.is_old { "!" } else { " " };
        println!("  {} {:<50} {}", marker, program.name, program.date_label());
    }

    Ok(())
}
