use super::provider::{CdkProvider, Verb};
use crate::{config::CdkConfig, invoke::Invocation};
use anyhow::{Context, Result, bail};
use std::process::Stdio;

/// Executor backed by the CDK CLI. Deploy/destroy runs inherit the terminal
/// so the operator watches the executor's own progress output; no timeout is
/// imposed — infrastructure changes legitimately run for many minutes.
pub struct CliCdkProvider {
    command: String,
    extra_args: Vec<String>,
    profile: Option<String>,
    region: Option<String>,
}

impl CliCdkProvider {
    pub fn from_config(config: &CdkConfig) -> Self {
        Self {
            command: config.command.clone(),
            extra_args: config.args.clone(),
            profile: config.profile.clone(),
            region: config.region.clone(),
        }
    }

    fn invocation(&self, args: Vec<String>) -> Invocation {
        let mut full_args = self.extra_args.clone();
        full_args.extend(args);
        Invocation::wrapped(
            self.profile.as_deref(),
            self.region.as_deref(),
            &self.command,
            &full_args,
        )
    }
}

/// Arguments for one batched operation. `deploy` disables the interactive
/// approval gate (the operator already confirmed the batch); `destroy` uses
/// the executor's force flag for the same reason.
fn batch_args(verb: Verb, full_names: &[String]) -> Vec<String> {
    let mut args = vec![verb.as_str().to_string()];
    args.extend(full_names.iter().cloned());
    match verb {
        Verb::Deploy => {
            args.push("--require-approval".to_string());
            args.push("never".to_string());
        }
        Verb::Destroy => args.push("--force".to_string()),
    }
    args
}

impl CdkProvider for CliCdkProvider {
    fn list_stacks(&self) -> Result<String> {
        let output = self
            .invocation(vec!["list".to_string()])
            .to_command()
            .output()
            .with_context(|| format!("failed to run '{} list'", self.command))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("stack listing failed: {}", stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn execute_batch(&self, verb: Verb, full_names: &[String]) -> Result<bool> {
        let status = self
            .invocation(batch_args(verb, full_names))
            .to_command()
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .with_context(|| format!("failed to run '{} {verb}'", self.command))?;

        Ok(status.success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn deploy_batch_covers_every_stack_in_one_command() {
        let args = batch_args(Verb::Deploy, &names(&["A (cf-a)", "B/Child (cf-b)"]));
        assert_eq!(
            args,
            names(&["deploy", "A (cf-a)", "B/Child (cf-b)", "--require-approval", "never"])
        );
    }

    #[test]
    fn destroy_batch_is_forced() {
        let args = batch_args(Verb::Destroy, &names(&["A"]));
        assert_eq!(args, names(&["destroy", "A", "--force"]));
    }

    #[test]
    fn extra_args_precede_the_subcommand() {
        let provider = CliCdkProvider {
            command: "cdk".to_string(),
            extra_args: names(&["--app", "cdk.out"]),
            profile: None,
            region: None,
        };
        let invocation = provider.invocation(vec!["list".to_string()]);
        assert_eq!(invocation.program, "cdk");
        assert_eq!(invocation.args, names(&["--app", "cdk.out", "list"]));
    }

    #[test]
    fn profile_and_region_are_applied() {
        let provider = CliCdkProvider {
            command: "cdk".to_string(),
            extra_args: Vec::new(),
            profile: Some("prod".to_string()),
            region: Some("eu-west-1".to_string()),
        };
        let invocation = provider.invocation(vec!["list".to_string()]);
        assert_eq!(invocation.program, "aws-vault");
        assert_eq!(invocation.args, names(&["exec", "prod", "--", "cdk", "list"]));
        assert_eq!(invocation.envs.len(), 2);
    }
}
