use crate::status::StackStatus;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A found record in the backing store. `status` is always a lifecycle state
/// here — the synthetic `NotDeployed`/`Unknown` states are produced by the
/// reconciler, never by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackRecord {
    pub status: StackStatus,
    pub stack_id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub tags: HashMap<String, String>,
}
