use serde::{Deserialize, Serialize};

/// Lifecycle states the backing store can report for a stack, plus the two
/// synthetic states the reconciler produces itself.
///
/// `NotDeployed` means the store has no record for the stack at all, which is
/// the normal outcome for a stack that has never been deployed. `Unknown`
/// means the lookup itself failed (network, permission, throttling) — a
/// materially different condition that must never be folded into
/// `NotDeployed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StackStatus {
    CreateInProgress,
    CreateFailed,
    CreateComplete,
    RollbackInProgress,
    RollbackFailed,
    RollbackComplete,
    DeleteInProgress,
    DeleteFailed,
    DeleteComplete,
    UpdateInProgress,
    UpdateCompleteCleanupInProgress,
    UpdateComplete,
    UpdateFailed,
    UpdateRollbackInProgress,
    UpdateRollbackFailed,
    UpdateRollbackCompleteCleanupInProgress,
    UpdateRollbackComplete,
    ReviewInProgress,
    ImportInProgress,
    ImportComplete,
    ImportRollbackInProgress,
    ImportRollbackFailed,
    ImportRollbackComplete,
    NotDeployed,
    Unknown,
}

/// Semantic colour class, mapped to a concrete terminal colour by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Info,
    Warning,
    Error,
    Muted,
}

/// How a status is shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    pub glyph: &'static str,
    pub tone: Tone,
    pub text: &'static str,
}

impl StackStatus {
    /// Parse the wire form reported by the backing store. Returns `None` for
    /// anything outside the known lifecycle taxonomy; the synthetic states
    /// never appear on the wire.
    pub fn parse_wire(s: &str) -> Option<Self> {
        let status = match s {
            "CREATE_IN_PROGRESS" => Self::CreateInProgress,
            "CREATE_FAILED" => Self::CreateFailed,
            "CREATE_COMPLETE" => Self::CreateComplete,
            "ROLLBACK_IN_PROGRESS" => Self::RollbackInProgress,
            "ROLLBACK_FAILED" => Self::RollbackFailed,
            "ROLLBACK_COMPLETE" => Self::RollbackComplete,
            "DELETE_IN_PROGRESS" => Self::DeleteInProgress,
            "DELETE_FAILED" => Self::DeleteFailed,
            "DELETE_COMPLETE" => Self::DeleteComplete,
            "UPDATE_IN_PROGRESS" => Self::UpdateInProgress,
            "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS" => Self::UpdateCompleteCleanupInProgress,
            "UPDATE_COMPLETE" => Self::UpdateComplete,
            "UPDATE_FAILED" => Self::UpdateFailed,
            "UPDATE_ROLLBACK_IN_PROGRESS" => Self::UpdateRollbackInProgress,
            "UPDATE_ROLLBACK_FAILED" => Self::UpdateRollbackFailed,
            "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS" => {
                Self::UpdateRollbackCompleteCleanupInProgress
            }
            "UPDATE_ROLLBACK_COMPLETE" => Self::UpdateRollbackComplete,
            "REVIEW_IN_PROGRESS" => Self::ReviewInProgress,
            "IMPORT_IN_PROGRESS" => Self::ImportInProgress,
            "IMPORT_COMPLETE" => Self::ImportComplete,
            "IMPORT_ROLLBACK_IN_PROGRESS" => Self::ImportRollbackInProgress,
            "IMPORT_ROLLBACK_FAILED" => Self::ImportRollbackFailed,
            "IMPORT_ROLLBACK_COMPLETE" => Self::ImportRollbackComplete,
            _ => return None,
        };
        Some(status)
    }

    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::CreateInProgress => "CREATE_IN_PROGRESS",
            Self::CreateFailed => "CREATE_FAILED",
            Self::CreateComplete => "CREATE_COMPLETE",
            Self::RollbackInProgress => "ROLLBACK_IN_PROGRESS",
            Self::RollbackFailed => "ROLLBACK_FAILED",
            Self::RollbackComplete => "ROLLBACK_COMPLETE",
            Self::DeleteInProgress => "DELETE_IN_PROGRESS",
            Self::DeleteFailed => "DELETE_FAILED",
            Self::DeleteComplete => "DELETE_COMPLETE",
            Self::UpdateInProgress => "UPDATE_IN_PROGRESS",
            Self::UpdateCompleteCleanupInProgress => "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS",
            Self::UpdateComplete => "UPDATE_COMPLETE",
            Self::UpdateFailed => "UPDATE_FAILED",
            Self::UpdateRollbackInProgress => "UPDATE_ROLLBACK_IN_PROGRESS",
            Self::UpdateRollbackFailed => "UPDATE_ROLLBACK_FAILED",
            Self::UpdateRollbackCompleteCleanupInProgress => {
                "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS"
            }
            Self::UpdateRollbackComplete => "UPDATE_ROLLBACK_COMPLETE",
            Self::ReviewInProgress => "REVIEW_IN_PROGRESS",
            Self::ImportInProgress => "IMPORT_IN_PROGRESS",
            Self::ImportComplete => "IMPORT_COMPLETE",
            Self::ImportRollbackInProgress => "IMPORT_ROLLBACK_IN_PROGRESS",
            Self::ImportRollbackFailed => "IMPORT_ROLLBACK_FAILED",
            Self::ImportRollbackComplete => "IMPORT_ROLLBACK_COMPLETE",
            Self::NotDeployed => "NOT_DEPLOYED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Exhaustive mapping to presentation. Adding a lifecycle state without
    /// deciding how it renders is a compile error, not a runtime fallback.
    pub const fn presentation(self) -> Presentation {
        match self {
            Self::CreateComplete => Presentation {
                glyph: "✔",
                tone: Tone::Success,
                text: "create complete",
            },
            Self::UpdateComplete => Presentation {
                glyph: "✔",
                tone: Tone::Success,
                text: "update complete",
            },
            Self::ImportComplete => Presentation {
                glyph: "✔",
                tone: Tone::Success,
                text: "import complete",
            },
            Self::CreateInProgress => Presentation {
                glyph: "⟳",
                tone: Tone::Info,
                text: "create in progress",
            },
            Self::UpdateInProgress => Presentation {
                glyph: "⟳",
                tone: Tone::Info,
                text: "update in progress",
            },
            Self::UpdateCompleteCleanupInProgress => Presentation {
                glyph: "⟳",
                tone: Tone::Info,
                text: "update cleanup in progress",
            },
            Self::DeleteInProgress => Presentation {
                glyph: "⟳",
                tone: Tone::Info,
                text: "delete in progress",
            },
            Self::ImportInProgress => Presentation {
                glyph: "⟳",
                tone: Tone::Info,
                text: "import in progress",
            },
            Self::ReviewInProgress => Presentation {
                glyph: "⟳",
                tone: Tone::Info,
                text: "review in progress",
            },
            Self::RollbackInProgress => Presentation {
                glyph: "⟳",
                tone: Tone::Warning,
                text: "rollback in progress",
            },
            Self::UpdateRollbackInProgress => Presentation {
                glyph: "⟳",
                tone: Tone::Warning,
                text: "update rollback in progress",
            },
            Self::UpdateRollbackCompleteCleanupInProgress => Presentation {
                glyph: "⟳",
                tone: Tone::Warning,
                text: "update rollback cleanup in progress",
            },
            Self::ImportRollbackInProgress => Presentation {
                glyph: "⟳",
                tone: Tone::Warning,
                text: "import rollback in progress",
            },
            Self::RollbackComplete => Presentation {
                glyph: "⚠",
                tone: Tone::Warning,
                text: "rollback complete",
            },
            Self::UpdateRollbackComplete => Presentation {
                glyph: "⚠",
                tone: Tone::Warning,
                text: "update rollback complete",
            },
            Self::ImportRollbackComplete => Presentation {
                glyph: "⚠",
                tone: Tone::Warning,
                text: "import rollback complete",
            },
            Self::CreateFailed => Presentation {
                glyph: "✖",
                tone: Tone::Error,
                text: "create failed",
            },
            Self::UpdateFailed => Presentation {
                glyph: "✖",
                tone: Tone::Error,
                text: "update failed",
            },
            Self::DeleteFailed => Presentation {
                glyph: "✖",
                tone: Tone::Error,
                text: "delete failed",
            },
            Self::RollbackFailed => Presentation {
                glyph: "✖",
                tone: Tone::Error,
                text: "rollback failed",
            },
            Self::UpdateRollbackFailed => Presentation {
                glyph: "✖",
                tone: Tone::Error,
                text: "update rollback failed",
            },
            Self::ImportRollbackFailed => Presentation {
                glyph: "✖",
                tone: Tone::Error,
                text: "import rollback failed",
            },
            Self::DeleteComplete => Presentation {
                glyph: "∅",
                tone: Tone::Muted,
                text: "delete complete",
            },
            Self::NotDeployed => Presentation {
                glyph: "∅",
                tone: Tone::Muted,
                text: "not deployed",
            },
            Self::Unknown => Presentation {
                glyph: "?",
                tone: Tone::Warning,
                text: "status unknown",
            },
        }
    }

    pub const fn is_in_progress(self) -> bool {
        matches!(
            self,
            Self::CreateInProgress
                | Self::RollbackInProgress
                | Self::DeleteInProgress
                | Self::UpdateInProgress
                | Self::UpdateCompleteCleanupInProgress
                | Self::UpdateRollbackInProgress
                | Self::UpdateRollbackCompleteCleanupInProgress
                | Self::ReviewInProgress
                | Self::ImportInProgress
                | Self::ImportRollbackInProgress
        )
    }
}

impl std::fmt::Display for StackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_wire_round_trips_lifecycle_states() {
        for wire in [
            "CREATE_COMPLETE",
            "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS",
            "DELETE_FAILED",
            "REVIEW_IN_PROGRESS",
            "IMPORT_ROLLBACK_COMPLETE",
        ] {
            let status = StackStatus::parse_wire(wire).unwrap();
            assert_eq!(status.as_wire(), wire);
        }
    }

    #[test]
    fn parse_wire_rejects_unknown_and_synthetic_tags() {
        assert_eq!(StackStatus::parse_wire("CREATE_DONE"), None);
        assert_eq!(StackStatus::parse_wire(""), None);
        // Synthetic states are produced by the reconciler, never by the store.
        assert_eq!(StackStatus::parse_wire("NOT_DEPLOYED"), None);
        assert_eq!(StackStatus::parse_wire("UNKNOWN"), None);
    }

    #[test]
    fn not_deployed_and_unknown_render_differently() {
        let not_deployed = StackStatus::NotDeployed.presentation();
        let unknown = StackStatus::Unknown.presentation();
        assert_ne!(not_deployed.text, unknown.text);
        assert_ne!(not_deployed.glyph, unknown.glyph);
    }

    #[test]
    fn in_progress_states_use_the_spinner_glyph() {
        assert!(StackStatus::UpdateInProgress.is_in_progress());
        assert_eq!(StackStatus::UpdateInProgress.presentation().glyph, "⟳");
        assert!(!StackStatus::UpdateComplete.is_in_progress());
    }
}
