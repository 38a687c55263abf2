use super::{provider::StatusProvider, record::StackRecord};
use crate::{config::CdkConfig, invoke::Invocation, status::StackStatus};
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// Status lookups via the AWS CLI (`aws cloudformation describe-stacks`),
/// credential-wrapped the same way the deploy executor is.
pub struct CliCfnProvider {
    profile: Option<String>,
    region: Option<String>,
}

impl CliCfnProvider {
    pub fn from_config(config: &CdkConfig) -> Self {
        Self {
            profile: config.profile.clone(),
            region: config.region.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DescribeStacksResponse {
    #[serde(rename = "Stacks", default)]
    stacks: Vec<ApiStack>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiStack {
    stack_id: String,
    stack_status: String,
    #[serde(default)]
    creation_time: Option<String>,
    #[serde(default)]
    last_updated_time: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    tags: Vec<ApiTag>,
}

#[derive(Debug, Deserialize)]
struct ApiTag {
    #[serde(rename = "Key")]
    key: String,
    #[serde(rename = "Value")]
    value: String,
}

impl StatusProvider for CliCfnProvider {
    fn describe(&self, backing_id: &str) -> Result<Option<StackRecord>> {
        let args: Vec<String> = [
            "cloudformation",
            "describe-stacks",
            "--stack-name",
            backing_id,
            "--output",
            "json",
        ]
        .iter()
        .map(ToString::to_string)
        .collect();

        let output = Invocation::wrapped(self.profile.as_deref(), self.region.as_deref(), "aws", &args)
            .to_command()
            .output()
            .with_context(|| format!("failed to run status lookup for '{backing_id}'"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if is_not_found(&stderr) {
                return Ok(None);
            }
            bail!("status lookup for '{backing_id}' failed: {}", stderr.trim());
        }

        let response: DescribeStacksResponse = serde_json::from_slice(&output.stdout)
            .with_context(|| format!("unparseable status response for '{backing_id}'"))?;

        let Some(api_stack) = response.stacks.into_iter().next() else {
            return Ok(None);
        };

        parse_record(backing_id, api_stack).map(Some)
    }
}

/// The CLI reports a missing stack as an error on stderr; that is the normal
/// not-found outcome, not a lookup failure.
fn is_not_found(stderr: &str) -> bool {
    stderr.contains("does not exist")
}

fn parse_record(backing_id: &str, api_stack: ApiStack) -> Result<StackRecord> {
    let Some(status) = StackStatus::parse_wire(&api_stack.stack_status) else {
        bail!(
            "stack '{backing_id}' reported unrecognized status '{}'",
            api_stack.stack_status
        );
    };

    let tags: HashMap<String, String> = api_stack
        .tags
        .into_iter()
        .map(|tag| (tag.key, tag.value))
        .collect();

    Ok(StackRecord {
        status,
        stack_id: api_stack.stack_id,
        created_at: parse_timestamp(api_stack.creation_time.as_deref()),
        updated_at: parse_timestamp(api_stack.last_updated_time.as_deref()),
        description: api_stack.description,
        tags,
    })
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(timestamp) => Some(timestamp.with_timezone(&Utc)),
        Err(e) => {
            log::warn!("ignoring unparseable timestamp '{raw}': {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_stack(status: &str) -> ApiStack {
        ApiStack {
            stack_id: "arn:aws:cloudformation:eu-west-1:123:stack/demo/abc".to_string(),
            stack_status: status.to_string(),
            creation_time: Some("2024-05-03T12:34:56.789000+00:00".to_string()),
            last_updated_time: None,
            description: Some("demo stack".to_string()),
            tags: vec![ApiTag {
                key: "team".to_string(),
                value: "platform".to_string(),
            }],
        }
    }

    #[test]
    fn parse_record_maps_api_fields() {
        let record = parse_record("cf-demo", api_stack("UPDATE_COMPLETE")).unwrap();
        assert_eq!(record.status, StackStatus::UpdateComplete);
        assert!(record.stack_id.starts_with("arn:aws:cloudformation"));
        assert_eq!(record.created_at.unwrap().to_rfc3339(), "2024-05-03T12:34:56.789+00:00");
        assert_eq!(record.updated_at, None);
        assert_eq!(record.tags.get("team").map(String::as_str), Some("platform"));
    }

    #[test]
    fn parse_record_rejects_unrecognized_status() {
        let error = parse_record("cf-demo", api_stack("TOTALLY_NEW_STATE")).unwrap_err();
        assert!(error.to_string().contains("TOTALLY_NEW_STATE"));
    }

    #[test]
    fn describe_stacks_json_deserializes() {
        let payload = r#"{
            "Stacks": [{
                "StackId": "arn:aws:cloudformation:eu-west-1:123:stack/demo/abc",
                "StackName": "demo",
                "StackStatus": "CREATE_COMPLETE",
                "CreationTime": "2024-01-15T10:30:00+00:00",
                "Tags": [{"Key": "env", "Value": "prod"}]
            }]
        }"#;
        let response: DescribeStacksResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(response.stacks.len(), 1);
        assert_eq!(response.stacks[0].stack_status, "CREATE_COMPLETE");
    }

    #[test]
    fn missing_stack_stderr_is_not_found() {
        assert!(is_not_found(
            "An error occurred (ValidationError): Stack with id cf-demo does not exist"
        ));
        assert!(!is_not_found("An error occurred (AccessDenied): not authorized"));
    }
}
