use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Deploy,
    Destroy,
}

impl Verb {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deploy => "deploy",
            Self::Destroy => "destroy",
        }
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The external deploy/destroy executor.
pub trait CdkProvider: Send + Sync {
    /// Raw output of the stack listing command. An error here is fatal to the
    /// caller — with no listing there is nothing to reconcile.
    fn list_stacks(&self) -> Result<String>;

    /// Run one batched deploy/destroy covering every named stack, streaming
    /// executor output straight to the terminal. Returns the aggregate
    /// success flag; `Err` is reserved for failing to run the executor at
    /// all.
    fn execute_batch(&self, verb: Verb, full_names: &[String]) -> Result<bool>;
}
