use async_trait::async_trait;

use crate::{RemoteError, StackDescription, StackIdentity, TemplateStage};

/// Remote stack management API. Implementations return the raw remote
/// outcome; classifying errors is left to the caller.
#[async_trait]
pub trait StackService: Send + Sync {
    /// `Ok(None)` when the service answered with an empty stack list.
    async fn describe_stack(
        &self,
        stack_name: &str,
    ) -> Result<Option<StackDescription>, RemoteError>;
    async fn get_template(
        &self,
        stack_name: &str,
        stage: TemplateStage,
    ) -> Result<Option<String>, RemoteError>;
    async fn delete_stack(&self, stack_name: &str) -> Result<(), RemoteError>;
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Deletes `key`, or only the given version of it when `version` is set.
    async fn delete_object(
        &self,
        bucket: &str,
        key: &str,
        version: Option<String>,
    ) -> Result<(), RemoteError>;
    /// Returns every key under `prefix`, following pagination.
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, RemoteError>;
}

/// Blocking terminal prompts. Anything that is not an explicit yes is a no.
pub trait Prompter {
    fn confirm(&self, message: &str) -> bool;
    fn prompt_text(&self, message: &str) -> Option<String>;
}

pub struct CloudClients {
    pub stacks: Box<dyn StackService>,
    pub objects: Box<dyn ObjectStore>,
}

/// Builds the remote clients for a resolved stack identity (region, profile).
#[async_trait]
pub trait CloudConnector: Send + Sync {
    async fn connect(&self, identity: &StackIdentity) -> Result<CloudClients, anyhow::Error>;
}
