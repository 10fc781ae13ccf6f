mod artifact;
mod config;
mod errors;
mod plan;
mod provider;
mod stack;

pub use artifact::{ArtifactKind, ArtifactReference};
pub use config::DeployConfig;
pub use errors::{DeleteError, RemoteError};
pub use plan::{ArtifactScope, DeleteOutcome, DeletionPlan};
pub use provider::{CloudClients, CloudConnector, ObjectStore, Prompter, StackService};
pub use stack::{StackDescription, StackIdentity, StackState, TemplateStage};
