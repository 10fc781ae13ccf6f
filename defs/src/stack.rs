use serde::{Deserialize, Serialize};

/// Identifies a stack within one region. Stack names are only unique per region,
/// so the region is part of the identity; it stays unset until configuration
/// and flags have been merged.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct StackIdentity {
    pub name: String,
    pub region: Option<String>,
    pub profile: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum StackState {
    NotFound,
    ReviewInProgress,
    Deployed,
    Deleting,
    Deleted,
    DeleteFailed,
}

impl StackState {
    /// Maps a remote stack status (e.g. `CREATE_COMPLETE`) onto the states the
    /// deletion flow cares about. Every status that is not review or delete
    /// related counts as deployed.
    pub fn from_status(status: &str) -> StackState {
        match status {
            "REVIEW_IN_PROGRESS" => StackState::ReviewInProgress,
            "DELETE_IN_PROGRESS" => StackState::Deleting,
            "DELETE_COMPLETE" => StackState::Deleted,
            "DELETE_FAILED" => StackState::DeleteFailed,
            _ => StackState::Deployed,
        }
    }

    pub fn is_deployed(&self) -> bool {
        matches!(
            self,
            StackState::Deployed | StackState::Deleting | StackState::DeleteFailed
        )
    }
}

impl std::fmt::Display for StackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StackState::NotFound => "not found",
            StackState::ReviewInProgress => "review in progress",
            StackState::Deployed => "deployed",
            StackState::Deleting => "deleting",
            StackState::Deleted => "deleted",
            StackState::DeleteFailed => "delete failed",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StackDescription {
    pub status: String,
    pub status_reason: Option<String>,
}

impl StackDescription {
    pub fn state(&self) -> StackState {
        StackState::from_status(&self.status)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TemplateStage {
    // Template as submitted by the deployer, before any transform ran
    Original,
    Processed,
}

impl TemplateStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateStage::Original => "Original",
            TemplateStage::Processed => "Processed",
        }
    }
}
