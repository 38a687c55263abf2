pub mod cli;
pub mod mock;
pub mod provider;

pub use cli::CliCdkProvider;
pub use provider::{CdkProvider, Verb};

use anyhow::{Result, bail};

/// Aggregate result of one batched operation. The external executor reports
/// only pass/fail for the whole batch; per-stack attribution is not available
/// and the UI says so rather than guessing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub verb: Verb,
    pub stack_count: usize,
    pub succeeded: bool,
}

impl BatchOutcome {
    pub fn summary(&self) -> String {
        let noun = if self.stack_count == 1 {
            "stack"
        } else {
            "stacks"
        };
        if self.succeeded {
            format!("{} of {} {noun} succeeded", self.verb, self.stack_count)
        } else {
            format!(
                "{} of {} {noun} failed (the executor reports batch-level results only; check its output above for which stacks were affected)",
                self.verb, self.stack_count
            )
        }
    }
}

/// Submit the confirmed selection as ONE batched call. The executor
/// parallelizes dependency-aware work across the batch itself; issuing one
/// call per stack would serialize that and is never done here.
pub fn dispatch(provider: &dyn CdkProvider, verb: Verb, full_names: &[String]) -> Result<BatchOutcome> {
    if full_names.is_empty() {
        bail!("refusing to dispatch an empty batch");
    }

    log::info!("dispatching batched {verb} covering {} stack(s)", full_names.len());
    let succeeded = provider.execute_batch(verb, full_names)?;

    Ok(BatchOutcome {
        verb,
        stack_count: full_names.len(),
        succeeded,
    })
}

#[cfg(test)]
mod tests {
    use super::{mock::MockCdkProvider, *};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn dispatch_submits_one_batch_not_n_calls() {
        let provider = MockCdkProvider::default();
        let outcome = dispatch(&provider, Verb::Deploy, &names(&["A (cf-a)", "B (cf-b)", "C"])).unwrap();

        assert!(outcome.succeeded);
        let batches = provider.executed_batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].0, Verb::Deploy);
        assert_eq!(batches[0].1, names(&["A (cf-a)", "B (cf-b)", "C"]));
    }

    #[test]
    fn dispatch_rejects_an_empty_batch() {
        let provider = MockCdkProvider::default();
        let error = dispatch(&provider, Verb::Destroy, &[]).unwrap_err();
        assert!(error.to_string().contains("empty batch"));
        assert!(provider.executed_batches.lock().unwrap().is_empty());
    }

    #[test]
    fn failed_batch_summary_admits_missing_attribution() {
        let outcome = BatchOutcome {
            verb: Verb::Destroy,
            stack_count: 3,
            succeeded: false,
        };
        assert!(outcome.summary().contains("batch-level results only"));
    }
}
