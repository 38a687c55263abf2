use serde::Serialize;
use stackdeck_core::{
    cdk::{self, CdkProvider, Verb},
    cfn::StatusProvider,
    config::Config,
    reconcile::{self, ReconciledStack},
    stack::{self, DeclaredStack},
};
use stackdeck_tui::SelectItem;
use std::{collections::HashSet, fmt::Write};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Clone)]
pub struct CliError {
    message: String,
    code: i32,
}

impl CliError {
    pub fn user(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: 1,
        }
    }

    pub fn system(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: 2,
        }
    }

    pub fn interrupted() -> Self {
        Self {
            message: "interrupted".to_string(),
            code: 130,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> i32 {
        self.code
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(value: anyhow::Error) -> Self {
        Self::system(format!("{value:#}"))
    }
}

#[derive(Debug, Clone)]
pub struct DeployArgs {
    pub stacks: Vec<String>,
    pub all: bool,
    pub json: bool,
}

#[derive(Debug, Clone)]
pub struct DestroyArgs {
    pub stacks: Vec<String>,
    pub all: bool,
    pub force: bool,
    pub json: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
struct StackOutput {
    name: String,
    display_name: String,
    backing_id: String,
    status: String,
    deployed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "std::collections::HashMap::is_empty")]
    tags: std::collections::HashMap<String, String>,
}

impl From<&ReconciledStack> for StackOutput {
    fn from(reconciled: &ReconciledStack) -> Self {
        Self {
            name: reconciled.stack.full_name.clone(),
            display_name: reconciled.stack.display_name.clone(),
            backing_id: reconciled.stack.backing_id.clone(),
            status: reconciled.status.as_wire().to_string(),
            deployed: reconciled.is_deployed(),
            stack_id: reconciled.stack_id.clone(),
            created_at: reconciled.created_at.map(|t| t.to_rfc3339()),
            updated_at: reconciled.updated_at.map(|t| t.to_rfc3339()),
            description: reconciled.description.clone(),
            tags: reconciled.tags.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
struct BatchOutput {
    verb: String,
    stacks: Vec<String>,
    succeeded: bool,
}

/// Obtain and parse the declared-stack listing. Failure here is fatal to the
/// caller: with no listing there is nothing to reconcile or act on.
pub fn load_declared(config: &Config, provider: &dyn CdkProvider) -> CliResult<Vec<DeclaredStack>> {
    let raw = provider
        .list_stacks()
        .map_err(|e| CliError::system(format!("failed to obtain the stack listing: {e:#}")))?;

    let extra_noise = stack::compile_noise_patterns(&config.listing.noise_patterns);
    let declared = stack::parse_listing(&raw, &extra_noise);

    if declared.is_empty() {
        return Err(CliError::user(
            "the stack listing contained no stacks (is this a CDK project?)",
        ));
    }
    Ok(declared)
}

/// Resolve operator-named stacks against the declared listing: exact full
/// name or exact backing id, deduplicated, returned in declared order.
pub fn resolve_stacks_exact<'a>(
    declared: &'a [DeclaredStack],
    names: &[String],
) -> CliResult<Vec<&'a DeclaredStack>> {
    let mut wanted = HashSet::new();
    for name in names {
        let found = declared
            .iter()
            .find(|stack| &stack.full_name == name || &stack.backing_id == name)
            .ok_or_else(|| {
                let available = declared
                    .iter()
                    .map(|stack| stack.full_name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                CliError::user(format!("no stack named '{name}' found. Available: {available}"))
            })?;
        wanted.insert(found.full_name.clone());
    }

    Ok(declared
        .iter()
        .filter(|stack| wanted.contains(&stack.full_name))
        .collect())
}

/// Project the reconciled inventory into picker rows. The value is the
/// authoritative full name; the label carries the status so searching can
/// match either.
pub fn to_select_items(inventory: &[ReconciledStack]) -> Vec<SelectItem> {
    inventory
        .iter()
        .enumerate()
        .map(|(index, reconciled)| {
            let presentation = reconciled.status.presentation();
            SelectItem::new(
                format!(
                    "{} {} — {}",
                    presentation.glyph, reconciled.stack.display_name, presentation.text
                ),
                reconciled.stack.full_name.clone(),
                index,
            )
        })
        .collect()
}

pub fn cmd_list(
    config: &Config,
    cdk: &dyn CdkProvider,
    cfn: &dyn StatusProvider,
    json: bool,
) -> CliResult<()> {
    let declared = load_declared(config, cdk)?;
    let inventory = reconcile::reconcile_parallel(&declared, cfn);

    if json {
        let output: Vec<StackOutput> = inventory.iter().map(StackOutput::from).collect();
        print_json(&output)?;
    } else {
        print!("{}", format_inventory_table(&inventory));
        println!("{}", reconcile::summarize(&inventory));
    }

    Ok(())
}

pub fn cmd_deploy(config: &Config, cdk: &dyn CdkProvider, args: &DeployArgs) -> CliResult<()> {
    let declared = load_declared(config, cdk)?;
    let targets = batch_targets(&declared, &args.stacks, args.all)?;
    run_batch(cdk, Verb::Deploy, &targets, args.json)
}

pub fn cmd_destroy(config: &Config, cdk: &dyn CdkProvider, args: &DestroyArgs) -> CliResult<()> {
    if !args.force {
        return Err(CliError::user(
            "destroy is destructive; pass --force, or run stackdeck without a subcommand to confirm interactively",
        ));
    }
    let declared = load_declared(config, cdk)?;
    let targets = batch_targets(&declared, &args.stacks, args.all)?;
    run_batch(cdk, Verb::Destroy, &targets, args.json)
}

fn batch_targets(
    declared: &[DeclaredStack],
    names: &[String],
    all: bool,
) -> CliResult<Vec<String>> {
    if all && !names.is_empty() {
        return Err(CliError::user("cannot name stacks together with --all"));
    }
    if all {
        return Ok(declared.iter().map(|stack| stack.full_name.clone()).collect());
    }
    if names.is_empty() {
        return Err(CliError::user("name at least one stack, or pass --all"));
    }
    let resolved = resolve_stacks_exact(declared, names)?;
    Ok(resolved.iter().map(|stack| stack.full_name.clone()).collect())
}

fn run_batch(cdk: &dyn CdkProvider, verb: Verb, targets: &[String], json: bool) -> CliResult<()> {
    if !json {
        println!(
            "Dispatching one batched {verb} covering {} stack(s)...",
            targets.len()
        );
    }

    let outcome = cdk::dispatch(cdk, verb, targets).map_err(CliError::from)?;

    if json {
        print_json(&BatchOutput {
            verb: verb.to_string(),
            stacks: targets.to_vec(),
            succeeded: outcome.succeeded,
        })?;
    } else if outcome.succeeded {
        println!("{}", outcome.summary());
    }

    if outcome.succeeded {
        Ok(())
    } else {
        Err(CliError::user(outcome.summary()))
    }
}

fn format_inventory_table(inventory: &[ReconciledStack]) -> String {
    let name_header = "stack";
    let status_header = "status";
    let name_width = inventory
        .iter()
        .map(|s| s.stack.full_name.len())
        .max()
        .unwrap_or(name_header.len())
        .max(name_header.len());
    let status_width = inventory
        .iter()
        .map(|s| s.status.presentation().text.len())
        .max()
        .unwrap_or(status_header.len())
        .max(status_header.len());

    let mut out = String::new();
    let _ = writeln!(out, "  {name_header:<name_width$}  {status_header:<status_width$}  changed");
    for reconciled in inventory {
        let presentation = reconciled.status.presentation();
        let changed = reconciled
            .updated_at
            .or(reconciled.created_at)
            .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string());
        let _ = writeln!(
            out,
            "{} {:<name_width$}  {:<status_width$}  {changed}",
            presentation.glyph, reconciled.stack.full_name, presentation.text
        );
    }
    out
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!(
        "{}",
        serde_json::to_string(value).map_err(|e| CliError::system(e.to_string()))?
    );
    Ok(())
}

pub fn print_error(error: &CliError, json: bool) {
    if json {
        let payload = serde_json::json!({ "error": error.message() });
        eprintln!("{payload}");
    } else {
        eprintln!("{}", error.message());
    }
}
