use super::provider::{CdkProvider, Verb};
use anyhow::Result;
use std::sync::Mutex;

/// Test double for the executor: canned listing output, scripted batch
/// results, and a record of every dispatched batch.
#[derive(Default)]
pub struct MockCdkProvider {
    pub listing: String,
    pub list_result: Mutex<Option<Result<String>>>,
    pub batch_succeeds: Mutex<Option<bool>>,
    pub executed_batches: Mutex<Vec<(Verb, Vec<String>)>>,
}

impl CdkProvider for MockCdkProvider {
    fn list_stacks(&self) -> Result<String> {
        self.list_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(self.listing.clone()))
    }

    fn execute_batch(&self, verb: Verb, full_names: &[String]) -> Result<bool> {
        self.executed_batches
            .lock()
            .unwrap()
            .push((verb, full_names.to_vec()));
        Ok(self.batch_succeeds.lock().unwrap().take().unwrap_or(true))
    }
}
