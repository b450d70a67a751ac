use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::scanner::JunkTarget;

/// TurboClean - Find and remove temp and cache files
#[derive(Parser, Debug)]
#[command(name = "turboclean")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "PATH", env = "TURBOCLEAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Measure reclaimable space in temp and cache locations
    Scan(ScanArgs),

    /// Scan, then delete the contents of the found locations
    Clean(CleanArgs),

    /// List installed programs, flagging old ones
    Programs(ProgramsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options selecting which locations are probed.
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Extra location to probe, as LABEL=PATH (repeatable)
    #[arg(short, long = "target", value_name = "LABEL=PATH", value_parser = parse_target)]
    pub targets: Vec<JunkTarget>,

    /// Skip the configured locations and only probe --target ones
    #[arg(long)]
    pub no_defaults: bool,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub targets: TargetArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    #[command(flatten)]
    pub targets: TargetArgs,

    /// Labels to leave untouched (repeatable)
    #[arg(short, long, value_name = "LABEL")]
    pub exclude: Vec<String>,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ProgramsArgs {
    /// Only list old programs
    #[arg(long)]
    pub old_only: bool,

    /// Override the age in days after which a program counts as old
    #[arg(long, value_name = "DAYS", value_parser = clap::value_parser!(u32).range(1..))]
    pub older_than: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

fn parse_target(s: &str) -> Result<JunkTarget, String> {
    match s.split_once('=') {
        Some((label, path)) if !label.trim().is_empty() && !path.trim().is_empty() => {
            Ok(JunkTarget::new(label.trim(), path.trim()))
        }
        _ => Err(format!("expected LABEL=PATH, got '{}'", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Validates the CLI definition is correct
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_scan_with_targets() {
        let cli = Cli::parse_from([
            "turboclean",
            "scan",
            "--target",
            "Logs=/var/log/app",
            "-t",
            "Cache=/tmp/cache",
            "--no-defaults",
        ]);
        match cli.command {
            Command::Scan(args) => {
                assert!(args.targets.no_defaults);
                assert_eq!(
                    args.targets.targets,
                    vec![
                        JunkTarget::new("Logs", "/var/log/app"),
                        JunkTarget::new("Cache", "/tmp/cache"),
                    ]
                );
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn parse_clean_with_options() {
        let cli = Cli::parse_from([
            "turboclean",
            "clean",
            "--force",
            "--exclude",
            "Prefetch",
            "-e",
            "Edge Cache",
        ]);
        match cli.command {
            Command::Clean(args) => {
                assert!(args.force);
                assert_eq!(args.exclude, vec!["Prefetch", "Edge Cache"]);
                assert!(!args.targets.no_defaults);
            }
            _ => panic!("Expected Clean command"),
        }
    }

    #[test]
    fn rejects_malformed_target() {
        let result = Cli::try_parse_from(["turboclean", "scan", "--target", "no-equals"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_verbose_flag() {
        let cli = Cli::parse_from(["turboclean", "-vvv", "programs"]);
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn older_than_must_be_positive() {
        assert!(Cli::try_parse_from(["turboclean", "programs", "--older-than", "0"]).is_err());

        let cli = Cli::parse_from(["turboclean", "programs", "--older-than", "4294967295"]);
        match cli.command {
            Command::Programs(args) => assert_eq!(args.older_than, Some(u32::MAX)),
            _ => panic!("Expected Programs command"),
        }
    }
}
