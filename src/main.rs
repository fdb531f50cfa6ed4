//! declargs - parse a script's arguments against a JSON argument table.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use declargs::output::finish;
use declargs::{exit_with_help, generate_usage, parse_args, ArgTable, Hooks, Matches};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "DECLARGS_LOG";
/// Program name used when neither the table nor --name provides one.
const DEFAULT_PROGRAM: &str = "script";

/// Declarative argument parsing for scripts.
#[derive(Parser, Debug)]
#[command(name = "declargs", version, about, disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct TableArgs {
    /// JSON argument table for the target script
    #[arg(long)]
    spec: String,

    /// Program name shown in usage and errors (overrides the table)
    #[arg(long)]
    name: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse script arguments and print the results as JSON
    Parse {
        #[command(flatten)]
        table: TableArgs,

        /// Collect surplus positional values instead of failing
        #[arg(long)]
        extra: bool,

        /// Arguments to parse for the target script
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Print help text for the target script
    Help {
        #[command(flatten)]
        table: TableArgs,
    },

    /// Print the usage line for the target script
    Usage {
        #[command(flatten)]
        table: TableArgs,
    },
}

impl TableArgs {
    fn load(&self) -> Result<ArgTable> {
        let mut table = ArgTable::from_json(&self.spec).context("failed to parse argument table")?;
        table.validate().context("invalid argument table")?;
        if let Some(ref name) = self.name {
            table.program_name = Some(name.clone());
        }
        Ok(table)
    }
}

/// JSON document printed for a successful parse.
#[derive(Serialize)]
struct Report<'a> {
    #[serde(flatten)]
    matches: &'a Matches,
    extra: Vec<String>,
}

fn program(table: &ArgTable) -> &str {
    table.program_name.as_deref().unwrap_or(DEFAULT_PROGRAM)
}

/// Build the argument vector the way a program would receive it.
fn script_argv(table: &ArgTable, args: Vec<String>) -> Vec<String> {
    if table.program_name.is_some() {
        args
    } else {
        std::iter::once(DEFAULT_PROGRAM.to_string())
            .chain(args)
            .collect()
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { table, extra, args } => {
            let spec = table.load()?;
            let argv = script_argv(&spec, args);

            let mut extra_values = Vec::new();
            let result = if extra {
                let mut hooks = Hooks::new().on_extra_value(|v| extra_values.push(v.to_string()));
                parse_args(&spec, &argv, &mut hooks)
            } else {
                parse_args(&spec, &argv, &mut Hooks::new())
            };

            let matches = match finish(&spec, &argv, result) {
                Ok(matches) => matches,
                Err(exit) => exit.print_and_exit(),
            };
            let report = Report {
                matches: &matches,
                extra: extra_values,
            };
            let json =
                serde_json::to_string_pretty(&report).context("failed to serialize results")?;
            println!("{}", json);
        }
        Commands::Help { table } => {
            let spec = table.load()?;
            exit_with_help(&spec, program(&spec));
        }
        Commands::Usage { table } => {
            let spec = table.load()?;
            print!("{}", generate_usage(&spec, program(&spec)));
        }
    }

    Ok(())
}
