use std::process::Command;

/// A fully resolved external command: program, arguments, and environment
/// overrides. Credential wrapping and region pinning happen here so the
/// providers never reimplement them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
}

impl Invocation {
    /// Build an invocation of `program args…`, wrapped in
    /// `aws-vault exec <profile> --` when a profile is configured, with the
    /// region exported to the child when one is configured.
    pub fn wrapped(
        profile: Option<&str>,
        region: Option<&str>,
        program: &str,
        args: &[String],
    ) -> Self {
        let (program, args) = match profile {
            Some(profile) => {
                let mut wrapped = vec![
                    "exec".to_string(),
                    profile.to_string(),
                    "--".to_string(),
                    program.to_string(),
                ];
                wrapped.extend_from_slice(args);
                ("aws-vault".to_string(), wrapped)
            }
            None => (program.to_string(), args.to_vec()),
        };

        let envs = match region {
            Some(region) => vec![
                ("AWS_REGION".to_string(), region.to_string()),
                ("AWS_DEFAULT_REGION".to_string(), region.to_string()),
            ],
            None => Vec::new(),
        };

        Self {
            program,
            args,
            envs,
        }
    }

    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        for (key, value) in &self.envs {
            command.env(key, value);
        }
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn bare_invocation_passes_through() {
        let invocation = Invocation::wrapped(None, None, "cdk", &args(&["list"]));
        assert_eq!(invocation.program, "cdk");
        assert_eq!(invocation.args, args(&["list"]));
        assert!(invocation.envs.is_empty());
    }

    #[test]
    fn profile_wraps_with_aws_vault() {
        let invocation = Invocation::wrapped(Some("prod"), None, "cdk", &args(&["list"]));
        assert_eq!(invocation.program, "aws-vault");
        assert_eq!(invocation.args, args(&["exec", "prod", "--", "cdk", "list"]));
    }

    #[test]
    fn region_is_exported_to_the_child() {
        let invocation = Invocation::wrapped(None, Some("eu-west-1"), "aws", &args(&["sts"]));
        assert_eq!(
            invocation.envs,
            vec![
                ("AWS_REGION".to_string(), "eu-west-1".to_string()),
                ("AWS_DEFAULT_REGION".to_string(), "eu-west-1".to_string()),
            ]
        );
    }
}
