mod cli;
mod logging;

use clap::{Parser, Subcommand};
use stackdeck_core::{
    cdk::{self, CdkProvider, CliCdkProvider, Verb},
    cfn::{CliCfnProvider, StatusProvider},
    config,
    reconcile::{self, ReconciledStack},
};
use stackdeck_tui::{Outcome, SelectItem, SelectMode, Theme, run_select, with_spinner};
use std::{process::ExitCode, sync::Arc};

#[derive(Parser)]
#[command(version, about = "Interactive batch deploy/destroy for CDK stacks")]
struct Cli {
    /// Override path to config file
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Log level for the log file (error, warn, info, debug, trace)
    #[arg(long, default_value = logging::DEFAULT_LOG_LEVEL)]
    log_level: log::LevelFilter,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the reconciled stack inventory
    List {
        #[arg(long)]
        json: bool,
    },
    /// Deploy the named stacks as one batch
    Deploy {
        stacks: Vec<String>,
        /// Deploy every declared stack
        #[arg(long)]
        all: bool,
        #[arg(long)]
        json: bool,
    },
    /// Destroy the named stacks as one batch
    Destroy {
        stacks: Vec<String>,
        /// Destroy every declared stack
        #[arg(long)]
        all: bool,
        /// Required outside the interactive session
        #[arg(long)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json_errors = command_wants_json(cli.command.as_ref());

    let config = match config::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            let cli_error = crate::cli::CliError::system(error.to_string());
            crate::cli::print_error(&cli_error, json_errors);
            return ExitCode::from(2);
        }
    };

    if let Err(error) = logging::setup_logging(cli.log_level) {
        // A broken log file is not worth refusing to run over.
        eprintln!("warning: failed to set up logging: {error}");
    }

    let cdk: Arc<dyn CdkProvider> = Arc::new(CliCdkProvider::from_config(&config.cdk));
    let cfn: Arc<dyn StatusProvider> = Arc::new(CliCfnProvider::from_config(&config.cdk));

    let result = match cli.command {
        Some(Commands::List { json }) => {
            crate::cli::cmd_list(&config, cdk.as_ref(), cfn.as_ref(), json)
        }
        Some(Commands::Deploy { stacks, all, json }) => {
            let args = crate::cli::DeployArgs { stacks, all, json };
            crate::cli::cmd_deploy(&config, cdk.as_ref(), &args)
        }
        Some(Commands::Destroy {
            stacks,
            all,
            force,
            json,
        }) => {
            let args = crate::cli::DestroyArgs {
                stacks,
                all,
                force,
                json,
            };
            crate::cli::cmd_destroy(&config, cdk.as_ref(), &args)
        }
        None => run_interactive(&config, cdk.as_ref(), cfn.as_ref()),
    };

    match result {
        Ok(()) => ExitCode::from(0),
        Err(error) => {
            if error.code() != 130 {
                crate::cli::print_error(&error, json_errors);
            }
            let code: u8 = match error.code() {
                1 => 1,
                130 => 130,
                _ => 2,
            };
            ExitCode::from(code)
        }
    }
}

fn command_wants_json(command: Option<&Commands>) -> bool {
    match command {
        Some(
            Commands::List { json }
            | Commands::Deploy { json, .. }
            | Commands::Destroy { json, .. },
        ) => *json,
        None => false,
    }
}

/// The interactive session: reconcile, pick a verb, pick stacks, dispatch
/// one batch, report, refresh, repeat.
fn run_interactive(
    config: &config::Config,
    cdk: &dyn CdkProvider,
    cfn: &dyn StatusProvider,
) -> crate::cli::CliResult<()> {
    let theme = Theme::from_config(&config.theme);

    loop {
        let declared = crate::cli::load_declared(config, cdk)?;
        let inventory: Vec<ReconciledStack> =
            with_spinner("Fetching deployment status...", &theme, || {
                reconcile::reconcile_parallel(&declared, cfn)
            })
            .map_err(|e| crate::cli::CliError::system(e.to_string()))?;
        let summary = reconcile::summarize(&inventory);

        let menu = vec![
            SelectItem::new("Deploy stacks", "deploy", 0),
            SelectItem::new("Destroy stacks", "destroy", 1),
            SelectItem::new("Refresh inventory", "refresh", 2),
            SelectItem::new("Quit", "quit", 3),
        ];
        let title = format!("stackdeck — {summary}");
        let choice = match run_select(menu, SelectMode::Single, &title, &theme)? {
            Outcome::Confirmed(values) => values.into_iter().next(),
            Outcome::Cancelled => return Ok(()),
            Outcome::Interrupted => return Err(crate::cli::CliError::interrupted()),
        };

        let verb = match choice.as_deref() {
            Some("deploy") => Verb::Deploy,
            Some("destroy") => Verb::Destroy,
            Some("refresh") => continue,
            _ => return Ok(()),
        };

        let items = crate::cli::to_select_items(&inventory);
        let picker_title = format!("Select stacks to {verb} — {summary}");
        let picked = match run_select(items, SelectMode::Multi, &picker_title, &theme)? {
            Outcome::Confirmed(values) => values,
            Outcome::Cancelled => continue,
            Outcome::Interrupted => return Err(crate::cli::CliError::interrupted()),
        };

        if picked.is_empty() {
            println!("No stacks selected.");
            continue;
        }

        if verb == Verb::Destroy && !confirm_destroy(&picked, &theme)? {
            continue;
        }

        println!(
            "Dispatching one batched {verb} covering {} stack(s)...",
            picked.len()
        );
        let outcome = cdk::dispatch(cdk, verb, &picked).map_err(crate::cli::CliError::from)?;
        if outcome.succeeded {
            println!("{}", outcome.summary());
        } else {
            // Not fatal to the session: report and fall through to a refresh
            // so the operator sees the resulting state.
            eprintln!("{}", outcome.summary());
        }
    }
}

fn confirm_destroy(picked: &[String], theme: &Theme) -> crate::cli::CliResult<bool> {
    let noun = if picked.len() == 1 { "stack" } else { "stacks" };
    let options = vec![
        SelectItem::new(format!("Yes, destroy {} {noun}", picked.len()), "yes", 0),
        SelectItem::new("No, go back", "no", 1),
    ];
    let title = format!("Destroy {} {noun}? This cannot be undone.", picked.len());
    match run_select(options, SelectMode::Single, &title, theme)? {
        Outcome::Confirmed(values) => Ok(values.first().is_some_and(|v| v == "yes")),
        Outcome::Cancelled => Ok(false),
        Outcome::Interrupted => Err(crate::cli::CliError::interrupted()),
    }
}
