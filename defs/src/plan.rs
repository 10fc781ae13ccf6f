use serde::{Deserialize, Serialize};

/// What to remove from storage besides the artifacts the template references.
/// Only one of the two confirmation paths is ever taken.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub enum ArtifactScope {
    #[default]
    None,
    TemplateFile(String),
    ArtifactsFolder(String),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct DeletionPlan {
    pub delete_stack: bool,
    pub artifact_scope: ArtifactScope,
}

impl DeletionPlan {
    pub fn template_file(&self) -> Option<&str> {
        match &self.artifact_scope {
            ArtifactScope::TemplateFile(key) => Some(key),
            _ => None,
        }
    }

    pub fn artifacts_prefix(&self) -> Option<&str> {
        match &self.artifact_scope {
            ArtifactScope::ArtifactsFolder(prefix) => Some(prefix),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Aborted,
    StackNotFound,
    Deleted,
}
