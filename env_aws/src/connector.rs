use anyhow::anyhow;
use async_trait::async_trait;
use aws_sdk_cloudformation::config::Region;
use env_defs::{CloudClients, CloudConnector, StackIdentity};
use log::debug;

use crate::{CfnStackService, S3ObjectStore};

/// Builds CloudFormation and S3 clients for the stack's region, using the
/// named profile when one is set and the default credential chain otherwise.
pub struct AwsConnector;

#[async_trait]
impl CloudConnector for AwsConnector {
    async fn connect(&self, identity: &StackIdentity) -> Result<CloudClients, anyhow::Error> {
        let region = identity
            .region
            .clone()
            .ok_or_else(|| anyhow!("No region set for stack {}", identity.name))?;

        let mut config_loader = aws_config::from_env().region(Region::new(region));
        if let Some(profile) = &identity.profile {
            debug!("Using AWS profile {}", profile);
            config_loader = config_loader.profile_name(profile);
        }
        let config = config_loader.load().await;

        Ok(CloudClients {
            stacks: Box::new(CfnStackService::new(&config)),
            objects: Box::new(S3ObjectStore::new(&config)),
        })
    }
}
