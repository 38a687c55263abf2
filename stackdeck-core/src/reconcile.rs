use crate::{
    cfn::StatusProvider,
    stack::DeclaredStack,
    status::StackStatus,
};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::collections::HashMap;

/// One declared stack annotated with its live deployment state.
///
/// `stack_id` is the resolved backing-store identifier; its presence is the
/// single source of truth for "deployed", independent of the status taxonomy.
/// Never-deployed and lookup-failed stacks carry no fabricated metadata —
/// timestamps stay `None` rather than being invented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledStack {
    pub stack: DeclaredStack,
    pub status: StackStatus,
    pub stack_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub tags: HashMap<String, String>,
}

impl ReconciledStack {
    pub fn is_deployed(&self) -> bool {
        self.stack_id.is_some()
    }
}

/// Derived counters over a reconciled inventory; computed on demand, never
/// stored alongside the stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventorySummary {
    pub total: usize,
    pub deployed: usize,
    pub not_deployed: usize,
    pub unknown: usize,
}

pub fn summarize(stacks: &[ReconciledStack]) -> InventorySummary {
    InventorySummary {
        total: stacks.len(),
        deployed: stacks.iter().filter(|s| s.is_deployed()).count(),
        not_deployed: stacks
            .iter()
            .filter(|s| s.status == StackStatus::NotDeployed)
            .count(),
        unknown: stacks
            .iter()
            .filter(|s| s.status == StackStatus::Unknown)
            .count(),
    }
}

impl std::fmt::Display for InventorySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} stacks ({} deployed, {} not deployed",
            self.total, self.deployed, self.not_deployed
        )?;
        if self.unknown > 0 {
            write!(f, ", {} unknown", self.unknown)?;
        }
        write!(f, ")")
    }
}

fn reconcile_one(declared: &DeclaredStack, provider: &dyn StatusProvider) -> ReconciledStack {
    match provider.describe(&declared.backing_id) {
        Ok(Some(record)) => ReconciledStack {
            stack: declared.clone(),
            status: record.status,
            stack_id: Some(record.stack_id),
            created_at: record.created_at,
            updated_at: record.updated_at,
            description: record.description,
            tags: record.tags,
        },
        Ok(None) => ReconciledStack {
            stack: declared.clone(),
            status: StackStatus::NotDeployed,
            stack_id: None,
            created_at: None,
            updated_at: None,
            description: None,
            tags: HashMap::new(),
        },
        Err(e) => {
            // A single failed lookup degrades this stack to Unknown and the
            // pass continues; it never aborts reconciliation.
            log::warn!("status lookup failed for '{}': {e:#}", declared.backing_id);
            ReconciledStack {
                stack: declared.clone(),
                status: StackStatus::Unknown,
                stack_id: None,
                created_at: None,
                updated_at: None,
                description: None,
                tags: HashMap::new(),
            }
        }
    }
}

/// Merge the declared list with per-stack status lookups: exactly one output
/// per input, in declared order, no drops, no synthesized extras.
pub fn reconcile(declared: &[DeclaredStack], provider: &dyn StatusProvider) -> Vec<ReconciledStack> {
    declared
        .iter()
        .map(|stack| reconcile_one(stack, provider))
        .collect()
}

/// Same contract as [`reconcile`], with lookups running on the rayon pool
/// (bounded concurrency). Collection keeps declared order regardless of
/// completion order.
pub fn reconcile_parallel(
    declared: &[DeclaredStack],
    provider: &dyn StatusProvider,
) -> Vec<ReconciledStack> {
    declared
        .par_iter()
        .map(|stack| reconcile_one(stack, provider))
        .collect()
}
