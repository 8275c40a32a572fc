//! Consilium CLI — the main entry point.
//!
//! Commands:
//! - `analyze` — Run the specialist panel over a medical report
//! - `roles`   — List panel roles and templates
//! - `onboard` — Initialize config
//! - `doctor`  — Diagnose configuration and provider health

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use consilium_core::role::Role;

mod commands;
mod report;

use report::ReportFormat;

#[derive(Parser)]
#[command(
    name = "consilium",
    about = "Consilium — multidisciplinary specialist panel over LLMs",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a medical report with the specialist panel
    Analyze {
        /// Read the report from a file
        #[arg(short, long, conflicts_with_all = ["text", "sample"])]
        file: Option<PathBuf>,

        /// Pass the report inline (reads stdin when no source is given)
        #[arg(short, long, conflicts_with = "sample")]
        text: Option<String>,

        /// Analyze the bundled sample report
        #[arg(long)]
        sample: bool,

        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum specialists consulted at once
        #[arg(
            short,
            long,
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
        )]
        concurrency: Option<usize>,

        /// Per-call deadline in seconds
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: Option<u64>,

        /// Comma-separated specialists to consult (default: from config)
        #[arg(long, value_delimiter = ',')]
        roles: Vec<Role>,

        /// Override the provider
        #[arg(long, env = "CONSILIUM_PROVIDER")]
        provider: Option<String>,

        /// Override the model
        #[arg(short, long, env = "CONSILIUM_MODEL")]
        model: Option<String>,
    },

    /// List panel roles and their templates
    Roles {
        /// Print the full template of one role
        #[arg(long)]
        show: Option<Role>,
    },

    /// Initialize configuration
    Onboard,

    /// Diagnose configuration and provider health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so reports on stdout stay clean
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze {
            file,
            text,
            sample,
            format,
            output,
            concurrency,
            timeout,
            roles,
            provider,
            model,
        } => {
            commands::analyze::run(commands::analyze::AnalyzeArgs {
                file,
                text,
                sample,
                format,
                output,
                concurrency,
                timeout,
                roles,
                provider,
                model,
            })
            .await?
        }
        Commands::Roles { show } => commands::roles::run(show).await?,
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn roles_parse_from_a_comma_list() {
        let cli = Cli::parse_from([
            "consilium",
            "analyze",
            "--text",
            "chest pain",
            "--roles",
            "cardiologist,Neurologist",
        ]);
        let Commands::Analyze { roles, format, .. } = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(roles, vec![Role::Cardiologist, Role::Neurologist]);
        assert_eq!(format, ReportFormat::Text);
    }

    #[test]
    fn file_and_text_are_exclusive() {
        let parsed = Cli::try_parse_from([
            "consilium", "analyze", "--file", "a.txt", "--text", "b",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn sample_excludes_other_sources() {
        let parsed = Cli::try_parse_from(["consilium", "analyze", "--sample", "--text", "b"]);
        assert!(parsed.is_err());

        let cli = Cli::parse_from(["consilium", "analyze", "--sample"]);
        let Commands::Analyze { sample, file, text, .. } = cli.command else {
            panic!("expected analyze");
        };
        assert!(sample);
        assert!(file.is_none() && text.is_none());
    }

    #[test]
    fn zero_timeout_and_concurrency_are_rejected() {
        for flag in ["--timeout", "--concurrency"] {
            let parsed = Cli::try_parse_from(["consilium", "analyze", "--text", "b", flag, "0"]);
            assert!(parsed.is_err(), "{flag} 0 should be rejected");

            let parsed = Cli::try_parse_from(["consilium", "analyze", "--text", "b", flag, "5"]);
            assert!(parsed.is_ok(), "{flag} 5 should be accepted");
        }
    }
}
