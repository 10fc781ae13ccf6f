use async_trait::async_trait;
use aws_sdk_cloudformation::types::TemplateStage as CfnTemplateStage;
use env_defs::{RemoteError, StackDescription, StackService, TemplateStage};
use log::debug;

use crate::errors::remote_error;

pub struct CfnStackService {
    client: aws_sdk_cloudformation::Client,
}

impl CfnStackService {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        CfnStackService {
            client: aws_sdk_cloudformation::Client::new(config),
        }
    }
}

#[async_trait]
impl StackService for CfnStackService {
    async fn describe_stack(
        &self,
        stack_name: &str,
    ) -> Result<Option<StackDescription>, RemoteError> {
        let output = self
            .client
            .describe_stacks()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(remote_error)?;

        let description = output.stacks().first().map(|stack| StackDescription {
            status: stack
                .stack_status()
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
            status_reason: stack.stack_status_reason().map(|r| r.to_string()),
        });
        debug!("describe_stacks {}: {:?}", stack_name, description);
        Ok(description)
    }

    async fn get_template(
        &self,
        stack_name: &str,
        stage: TemplateStage,
    ) -> Result<Option<String>, RemoteError> {
        let output = self
            .client
            .get_template()
            .stack_name(stack_name)
            .template_stage(CfnTemplateStage::from(stage.as_str()))
            .send()
            .await
            .map_err(remote_error)?;

        Ok(output.template_body().map(|body| body.to_string()))
    }

    async fn delete_stack(&self, stack_name: &str) -> Result<(), RemoteError> {
        self.client
            .delete_stack()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(remote_error)?;
        Ok(())
    }
}
