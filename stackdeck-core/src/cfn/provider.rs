use super::record::StackRecord;
use anyhow::Result;

/// Per-stack deployment status lookup.
///
/// The three outcomes are materially different and callers depend on the
/// distinction: `Ok(Some)` found, `Ok(None)` no record exists for this id
/// (a normal state for a never-deployed stack), `Err` the lookup itself
/// failed.
pub trait StatusProvider: Send + Sync {
    fn describe(&self, backing_id: &str) -> Result<Option<StackRecord>>;
}
