mod artifact_executor;
mod artifact_resolver;
mod delete_context;
mod stack_client;

pub use artifact_executor::ArtifactExecutor;

pub use artifact_resolver::resolve_artifact_references;

pub use delete_context::{merge_config, DeleteArgs, DeleteContext, TEMPLATE_STAGE};

pub use stack_client::{stack_not_found_signal, StackClient, WaitConfig};
