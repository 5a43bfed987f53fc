//! mailtrace CLI entry point
//!
//! Looks up services where an email address may have a public profile or
//! breach record.

use clap::error::ErrorKind;
use clap::Parser;
use mailtrace::cli::args::{Args, Command, OutputFormat};
use mailtrace::cli::output::{format_checker_list, get_formatter, ProgressObserver};
use mailtrace::engine::orchestrator::{create_checkers, LookupOrchestrator, OrchestratorConfig};
use mailtrace::engine::result::LookupReport;
use mailtrace::version::get_build_info;
use mailtrace::{MailTraceConfig, MailTraceError};

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayVersion
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => ExitCode::SUCCESS,
                _ => ExitCode::from(3),
            };
        }
    };

    init_tracing(args.verbose);

    match args.command {
        Command::Version => print_version(&args.format),
        Command::List => match list_checkers(&args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::from(3)
            }
        },
        Command::Search { ref email } => run_search(&args, email).await,
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("MAILTRACE_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_version(format: &OutputFormat) -> ExitCode {
    let info = get_build_info();
    match format {
        OutputFormat::Text => println!("{}", info),
        OutputFormat::Json => match serde_json::to_string_pretty(&info) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(3);
            }
        },
    }
    ExitCode::SUCCESS
}

fn list_checkers(args: &Args) -> Result<(), MailTraceError> {
    let config = MailTraceConfig::from_args(args)?;
    let checkers = create_checkers(&config)?;
    println!("Profile: {}\n", config.profile);
    print!("{}", format_checker_list(&checkers));
    Ok(())
}

async fn run_search(args: &Args, email: &str) -> ExitCode {
    let config = match MailTraceConfig::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(3);
        }
    };
    tracing::debug!(?config, "effective configuration");

    let checkers = match create_checkers(&config) {
        Ok(checkers) => checkers,
        Err(e) => {
            eprintln!("Error: {}", MailTraceError::from(e));
            return ExitCode::from(3);
        }
    };

    let mut orchestrator = LookupOrchestrator::new(OrchestratorConfig::from(&config));
    orchestrator.register_checkers(checkers);
    if args.format == OutputFormat::Text && !args.quiet {
        orchestrator.add_observer(Arc::new(ProgressObserver));
    }

    let start = Instant::now();
    let snapshot = orchestrator.submit(email).await;
    let total_duration_ms = start.elapsed().as_millis() as u64;

    let formatter = get_formatter(&args.format, args.no_color, args.verbose, args.quiet);

    if let Some(message) = snapshot.error_message() {
        println!("{}", formatter.format_error(&snapshot.email, &message));
        return ExitCode::from(1);
    }

    let report = LookupReport::new(snapshot.email, config.profile, snapshot.results, total_duration_ms);
    println!("{}", formatter.format(&report));
    ExitCode::SUCCESS
}
