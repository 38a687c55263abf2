use super::{provider::StatusProvider, record::StackRecord};
use anyhow::{Result, anyhow};
use std::{
    collections::HashMap,
    sync::Mutex,
};

/// In-memory provider for tests: seed found records per backing id, force
/// errors per backing id, and inspect which lookups were made.
#[derive(Default)]
pub struct MockStatusProvider {
    pub records: HashMap<String, StackRecord>,
    pub errors: HashMap<String, String>,
    pub describe_calls: Mutex<Vec<String>>,
}

impl StatusProvider for MockStatusProvider {
    fn describe(&self, backing_id: &str) -> Result<Option<StackRecord>> {
        self.describe_calls
            .lock()
            .unwrap()
            .push(backing_id.to_string());

        if let Some(message) = self.errors.get(backing_id) {
            return Err(anyhow!("{message}"));
        }
        Ok(self.records.get(backing_id).cloned())
    }
}
