pub mod cli;
pub mod mock;
pub mod provider;
pub mod record;

pub use cli::CliCfnProvider;
pub use provider::StatusProvider;
pub use record::StackRecord;
