//! # evd CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use evd_cli::export::{run_export, ExportArgs};
use evd_cli::generate::{run_generate, GenerateArgs};
use evd_cli::import::{run_import, ImportArgs};
use evd_cli::list::{run_list, ListArgs};
use evd_cli::review::{run_review, ReviewArgs};
use evd_cli::scope::{run_scope, ScopeArgs};

/// Evidence records CLI.
///
/// Generates mock datasets and runs the list, review, export, visibility and
/// import logic of the evidence service against a local JSON file.
#[derive(Parser, Debug)]
#[command(name = "evd", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Dataset file (JSON array of evidence records). A generated mock
    /// dataset is used when omitted.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a seeded mock dataset.
    Generate(GenerateArgs),

    /// List records with filters, sort and pagination.
    List(ListArgs),

    /// Show the review queue and its per-status counts.
    Review(ReviewArgs),

    /// Export records as CSV, Excel or JSON.
    Export(ExportArgs),

    /// Show what a session scope can see.
    Scope(ScopeArgs),

    /// Import intake forms from a JSON file.
    Import(ImportArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let data = cli.data.as_deref();
    let result = match cli.command {
        Commands::Generate(args) => run_generate(&args),
        Commands::List(args) => run_list(&args, data),
        Commands::Review(args) => run_review(&args, data),
        Commands::Export(args) => run_export(&args, data),
        Commands::Scope(args) => run_scope(&args, data),
        Commands::Import(args) => run_import(&args, data),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_generate_defaults() {
        let cli = Cli::try_parse_from(["evd", "generate"]).unwrap();
        if let Commands::Generate(args) = cli.command {
            assert_eq!(args.count, evd_mock::DEFAULT_COUNT);
            assert_eq!(args.seed, evd_mock::DEFAULT_SEED);
            assert!(args.out.is_none());
        } else {
            panic!("expected generate");
        }
    }

    #[test]
    fn cli_parse_generate_with_out() {
        let cli =
            Cli::try_parse_from(["evd", "generate", "--count", "200", "-o", "x.json"]).unwrap();
        if let Commands::Generate(args) = cli.command {
            assert_eq!(args.count, 200);
            assert_eq!(args.out, Some(PathBuf::from("x.json")));
        } else {
            panic!("expected generate");
        }
    }

    #[test]
    fn cli_parse_list_filters() {
        let cli = Cli::try_parse_from([
            "evd",
            "--data",
            "ev.json",
            "list",
            "--status",
            "Submitted",
            "--province",
            "Hà Nội",
            "--page",
            "2",
            "--page-size",
            "5",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.data, Some(PathBuf::from("ev.json")));
        if let Commands::List(args) = cli.command {
            assert_eq!(args.filter.status.as_deref(), Some("Submitted"));
            assert_eq!(args.filter.province.as_deref(), Some("Hà Nội"));
            assert_eq!(args.page, 2);
            assert_eq!(args.page_size, 5);
            assert!(args.json);
        } else {
            panic!("expected list");
        }
    }

    #[test]
    fn cli_parse_list_defaults() {
        let cli = Cli::try_parse_from(["evd", "list"]).unwrap();
        if let Commands::List(args) = cli.command {
            assert_eq!(args.page, 1);
            assert_eq!(args.page_size, evd_query::DEFAULT_PAGE_SIZE);
            assert!(args.sort.sort.is_none());
        } else {
            panic!("expected list");
        }
    }

    #[test]
    fn cli_parse_review_sort() {
        let cli = Cli::try_parse_from([
            "evd",
            "review",
            "--sort",
            "evidence_id",
            "--direction",
            "desc",
            "--unassigned",
        ])
        .unwrap();
        if let Commands::Review(args) = cli.command {
            assert_eq!(args.sort.sort.as_deref(), Some("evidence_id"));
            assert_eq!(args.sort.direction.as_deref(), Some("desc"));
            assert!(args.unassigned);
        } else {
            panic!("expected review");
        }
    }

    #[test]
    fn cli_parse_export_columns() {
        let cli = Cli::try_parse_from([
            "evd",
            "export",
            "--format",
            "json",
            "--columns",
            "evidenceId,fileName,status",
        ])
        .unwrap();
        if let Commands::Export(args) = cli.command {
            assert_eq!(args.format, "json");
            assert_eq!(args.columns, vec!["evidenceId", "fileName", "status"]);
            assert!(args.ids.is_empty());
            assert_eq!(args.out, PathBuf::from("."));
        } else {
            panic!("expected export");
        }
    }

    #[test]
    fn cli_parse_scope() {
        let cli = Cli::try_parse_from([
            "evd", "scope", "--level", "doi", "--province", "Hà Nội", "--team", "Đội 1",
        ])
        .unwrap();
        if let Commands::Scope(args) = cli.command {
            assert_eq!(args.level, "doi");
            assert_eq!(args.team.as_deref(), Some("Đội 1"));
        } else {
            panic!("expected scope");
        }
    }

    #[test]
    fn cli_parse_import_requires_file() {
        assert!(Cli::try_parse_from(["evd", "import"]).is_err());
        let cli = Cli::try_parse_from(["evd", "import", "forms.json", "--actor", "ops"]).unwrap();
        if let Commands::Import(args) = cli.command {
            assert_eq!(args.file, PathBuf::from("forms.json"));
            assert_eq!(args.actor, "ops");
        } else {
            panic!("expected import");
        }
    }

    #[test]
    fn cli_parse_global_verbose_after_subcommand() {
        let cli = Cli::try_parse_from(["evd", "list", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn cli_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["evd", "serve"]).is_err());
    }
}
