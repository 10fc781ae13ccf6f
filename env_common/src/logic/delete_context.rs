use env_defs::{
    ArtifactScope, CloudConnector, DeleteError, DeleteOutcome, DeletionPlan, DeployConfig,
    Prompter, StackIdentity, TemplateStage,
};
use env_utils::{get_template_file_name, TemplateDocument, TEMPLATE_EXTENSION};
use log::{debug, error, info};

use super::artifact_executor::ArtifactExecutor;
use super::artifact_resolver::resolve_artifact_references;
use super::stack_client::{StackClient, WaitConfig};

/// The template as the user wrote it, before any server-side transforms. This
/// is the body the packaging step uploaded and named.
pub const TEMPLATE_STAGE: TemplateStage = TemplateStage::Original;

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct DeleteArgs {
    pub stack_name: Option<String>,
    pub region: Option<String>,
    pub profile: Option<String>,
    pub force: bool,
}

/// Merges explicit arguments with the recorded deploy configuration.
///
/// The stack name falls back to the configured one. Everything else from the
/// configuration is only used when it was recorded for the same stack, so
/// deleting another stack never picks up this project's bucket and prefix.
pub fn merge_config(args: &DeleteArgs, config: &DeployConfig) -> DeployConfig {
    let stack_name = non_empty(args.stack_name.clone()).or_else(|| non_empty(config.stack_name.clone()));

    let explicit = DeployConfig {
        stack_name: stack_name.clone(),
        region: non_empty(args.region.clone()),
        profile: non_empty(args.profile.clone()),
        s3_bucket: None,
        s3_prefix: None,
    };

    match (&stack_name, &config.stack_name) {
        (Some(name), Some(recorded)) if name == recorded => explicit.or(config.clone()),
        _ => explicit,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub struct DeleteContext<'a> {
    identity: StackIdentity,
    s3_bucket: Option<String>,
    s3_prefix: Option<String>,
    force: bool,
    connector: &'a dyn CloudConnector,
    prompter: &'a dyn Prompter,
    wait_config: WaitConfig,
}

impl<'a> DeleteContext<'a> {
    /// Resolves the stack to delete, asking for its name when neither the
    /// arguments nor the configuration provide one.
    pub fn open(
        args: DeleteArgs,
        config: &DeployConfig,
        connector: &'a dyn CloudConnector,
        prompter: &'a dyn Prompter,
    ) -> Result<DeleteContext<'a>, DeleteError> {
        let merged = merge_config(&args, config);

        let stack_name = match merged.stack_name {
            Some(name) => name,
            None => prompter
                .prompt_text("Enter stack name you want to delete")
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .ok_or(DeleteError::MissingStackName)?,
        };

        Ok(DeleteContext {
            identity: StackIdentity {
                name: stack_name,
                region: merged.region,
                profile: merged.profile,
            },
            s3_bucket: non_empty(merged.s3_bucket),
            s3_prefix: non_empty(merged.s3_prefix),
            force: args.force,
            connector,
            prompter,
            wait_config: WaitConfig::default(),
        })
    }

    pub fn with_wait_config(mut self, wait_config: WaitConfig) -> Self {
        self.wait_config = wait_config;
        self
    }

    pub fn identity(&self) -> &StackIdentity {
        &self.identity
    }

    pub async fn run(self) -> Result<DeleteOutcome, DeleteError> {
        let stack_name = self.identity.name.as_str();
        if self.force {
            debug!("--force is set, confirmations are still required");
        }

        let mut plan = DeletionPlan {
            delete_stack: self.prompter.confirm(&format!(
                "Are you sure you want to delete the stack {} in the region {} ?",
                stack_name,
                self.identity.region.as_deref().unwrap_or("<unset>")
            )),
            artifact_scope: ArtifactScope::None,
        };
        if !plan.delete_stack || self.identity.region.is_none() {
            info!("Deletion of stack {} was not confirmed", stack_name);
            return Ok(DeleteOutcome::Aborted);
        }

        let clients = self.connector.connect(&self.identity).await?;
        let stacks = StackClient::new(clients.stacks.as_ref()).with_wait_config(self.wait_config.clone());
        let artifacts = ArtifactExecutor::new(clients.objects.as_ref());

        if !stacks.has_stack(stack_name).await? {
            info!("Stack {} does not exist", stack_name);
            return Ok(DeleteOutcome::StackNotFound);
        }

        let body = stacks.get_stack_template(stack_name, TEMPLATE_STAGE).await?;
        let document = TemplateDocument::parse(body.as_deref().unwrap_or_default());

        plan.artifact_scope = self.plan_artifact_scope(&document)?;
        self.execute(&stacks, &artifacts, &document, &plan).await?;

        Ok(DeleteOutcome::Deleted)
    }

    /// Asks which uploaded files besides the referenced artifacts should go.
    /// Declining the folder offers the single template file instead, so at most
    /// one of the two is ever chosen.
    fn plan_artifact_scope(&self, document: &TemplateDocument) -> Result<ArtifactScope, DeleteError> {
        let prefix = match (&self.s3_bucket, &self.s3_prefix) {
            (Some(_), Some(prefix)) if !document.is_empty() => prefix,
            _ => return Ok(ArtifactScope::None),
        };

        let delete_folder = self.prompter.confirm(&format!(
            "Are you sure you want to delete the folder {} in S3 which contains the artifacts?",
            prefix
        ));
        if delete_folder {
            return Ok(ArtifactScope::ArtifactsFolder(prefix.clone()));
        }

        let template_name = get_template_file_name(document.body(), TEMPLATE_EXTENSION)
            .map_err(|e| DeleteError::Unhandled(e.into()))?;
        let delete_template = self.prompter.confirm(&format!(
            "Do you want to delete the template file {} in S3?",
            template_name
        ));
        if !delete_template {
            return Ok(ArtifactScope::None);
        }

        Ok(ArtifactScope::TemplateFile(format!(
            "{}/{}",
            prefix.trim_end_matches('/'),
            template_name
        )))
    }

    async fn execute(
        &self,
        stacks: &StackClient<'_>,
        artifacts: &ArtifactExecutor<'_>,
        document: &TemplateDocument,
        plan: &DeletionPlan,
    ) -> Result<(), DeleteError> {
        let stack_name = self.identity.name.as_str();

        if plan.delete_stack {
            info!("Deleting stack {}", stack_name);
            stacks.delete_stack(stack_name).await?;
            stacks.wait_for_delete(stack_name).await?;
        }

        let bucket = match self.s3_bucket.as_deref() {
            Some(bucket) => bucket,
            None => {
                debug!("No artifact bucket configured for {}, leaving S3 untouched", stack_name);
                return Ok(());
            }
        };

        // The stack is gone from here on, every artifact step is attempted
        let mut first_error = None;

        let (owned, foreign): (Vec<_>, Vec<_>) = resolve_artifact_references(document)
            .into_iter()
            .partition(|reference| reference.bucket == bucket);
        for reference in &foreign {
            debug!("Skipping {}, it is outside bucket {}", reference.s3_url(), bucket);
        }
        keep_first(&mut first_error, artifacts.delete_references(&owned).await);

        if let Some(key) = plan.template_file() {
            keep_first(&mut first_error, artifacts.delete_object(bucket, key).await);
        } else if let Some(prefix) = plan.artifacts_prefix() {
            keep_first(&mut first_error, artifacts.delete_prefix(bucket, prefix).await);
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn keep_first(first_error: &mut Option<DeleteError>, result: Result<(), DeleteError>) {
    if let Err(e) = result {
        match first_error {
            None => *first_error = Some(e),
            Some(_) => error!("{}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn recorded() -> DeployConfig {
        DeployConfig {
            stack_name: Some("A".to_string()),
            region: Some("eu-west-1".to_string()),
            profile: Some("dev".to_string()),
            s3_bucket: Some("B".to_string()),
            s3_prefix: Some("P".to_string()),
        }
    }

    #[test]
    fn test_merge_adopts_config_for_same_stack() {
        let args = DeleteArgs {
            stack_name: Some("A".to_string()),
            region: Some("us-east-1".to_string()),
            ..Default::default()
        };

        let merged = merge_config(&args, &recorded());
        assert_eq!(merged.region.as_deref(), Some("us-east-1"));
        assert_eq!(merged.profile.as_deref(), Some("dev"));
        assert_eq!(merged.s3_bucket.as_deref(), Some("B"));
        assert_eq!(merged.s3_prefix.as_deref(), Some("P"));
    }

    #[test]
    fn test_merge_takes_stack_name_from_config() {
        let merged = merge_config(&DeleteArgs::default(), &recorded());
        assert_eq!(merged, recorded());
    }

    #[test]
    fn test_merge_ignores_config_of_other_stack() {
        let args = DeleteArgs {
            stack_name: Some("Z".to_string()),
            ..Default::default()
        };

        let merged = merge_config(&args, &recorded());
        assert_eq!(
            merged,
            DeployConfig {
                stack_name: Some("Z".to_string()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_merge_without_config() {
        let args = DeleteArgs {
            stack_name: Some("demo".to_string()),
            region: Some("".to_string()),
            ..Default::default()
        };

        let merged = merge_config(&args, &DeployConfig::default());
        assert_eq!(merged.stack_name.as_deref(), Some("demo"));
        assert_eq!(merged.region, None);
        assert_eq!(merged.s3_bucket, None);
    }
}
