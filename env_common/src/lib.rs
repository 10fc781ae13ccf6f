pub mod logic;

pub use logic::{
    merge_config, resolve_artifact_references, ArtifactExecutor, DeleteArgs, DeleteContext,
    StackClient, WaitConfig,
};
