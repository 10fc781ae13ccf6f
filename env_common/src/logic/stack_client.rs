use std::time::Duration;

use env_defs::{DeleteError, RemoteError, StackDescription, StackService, StackState, TemplateStage};
use log::{debug, info};
use tokio::time::{sleep, Instant};

/// The stack service has no error code for an unknown stack name, it answers
/// with a validation error whose message contains this text. Matching on it is
/// the only way to tell "not found" apart from other validation errors.
pub fn stack_not_found_signal(stack_name: &str) -> String {
    format!("Stack with id {} does not exist", stack_name)
}

#[derive(Debug, Clone)]
pub struct WaitConfig {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    pub timeout: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        WaitConfig {
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            timeout: Duration::from_secs(60 * 60),
        }
    }
}

impl WaitConfig {
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self.initial_delay.as_secs_f64() * self.multiplier.powi(attempt as i32);
        Duration::from_secs_f64(delay.min(self.max_delay.as_secs_f64()))
    }
}

pub struct StackClient<'a> {
    service: &'a dyn StackService,
    wait_config: WaitConfig,
}

impl<'a> StackClient<'a> {
    pub fn new(service: &'a dyn StackService) -> Self {
        StackClient {
            service,
            wait_config: WaitConfig::default(),
        }
    }

    pub fn with_wait_config(mut self, wait_config: WaitConfig) -> Self {
        self.wait_config = wait_config;
        self
    }

    /// Checks if a stack with the given name exists. A stack that is still in
    /// review was never deployed and a completed delete is gone, neither counts.
    pub async fn has_stack(&self, stack_name: &str) -> Result<bool, DeleteError> {
        match self.describe(stack_name).await? {
            Some(description) => Ok(description.state().is_deployed()),
            None => Ok(false),
        }
    }

    pub async fn get_stack_template(
        &self,
        stack_name: &str,
        stage: TemplateStage,
    ) -> Result<Option<String>, DeleteError> {
        match self.service.get_template(stack_name, stage).await {
            Ok(Some(body)) if !body.is_empty() => Ok(Some(body)),
            Ok(_) => {
                debug!("Stack {} returned an empty {} template", stack_name, stage.as_str());
                Ok(None)
            }
            Err(e) => Err(classify(stack_name, e)),
        }
    }

    /// Issues the delete request without waiting for it to finish.
    pub async fn delete_stack(&self, stack_name: &str) -> Result<(), DeleteError> {
        self.service
            .delete_stack(stack_name)
            .await
            .map_err(|e| classify(stack_name, e))
    }

    pub async fn wait_for_delete(&self, stack_name: &str) -> Result<(), DeleteError> {
        let started = Instant::now();
        let mut attempt = 0;

        loop {
            match self.describe(stack_name).await? {
                None => return Ok(()),
                Some(description) => match description.state() {
                    StackState::Deleted => return Ok(()),
                    StackState::DeleteFailed => {
                        return Err(DeleteError::DeleteFailed {
                            stack_name: stack_name.to_string(),
                            msg: description
                                .status_reason
                                .unwrap_or_else(|| "stack reached DELETE_FAILED".to_string()),
                        });
                    }
                    state => debug!("Stack {} is {}, waiting for deletion", stack_name, state),
                },
            }

            let delay = self.wait_config.delay_for_attempt(attempt);
            if started.elapsed() + delay >= self.wait_config.timeout {
                return Err(DeleteError::DeleteFailed {
                    stack_name: stack_name.to_string(),
                    msg: format!(
                        "timed out waiting for stack deletion after {}s",
                        self.wait_config.timeout.as_secs()
                    ),
                });
            }
            sleep(delay).await;
            attempt += 1;
        }
    }

    async fn describe(&self, stack_name: &str) -> Result<Option<StackDescription>, DeleteError> {
        match self.service.describe_stack(stack_name).await {
            Ok(description) => Ok(description),
            Err(e) if is_stack_not_found(&e, stack_name) => {
                info!("Stack with id {} does not exist", stack_name);
                Ok(None)
            }
            Err(e) => Err(classify(stack_name, e)),
        }
    }
}

fn is_stack_not_found(error: &RemoteError, stack_name: &str) -> bool {
    match error {
        RemoteError::Service { message, .. } => {
            message.contains(&stack_not_found_signal(stack_name))
        }
        _ => false,
    }
}

// Errors we understand become DeleteFailed, anything else is passed through untouched
fn classify(stack_name: &str, error: RemoteError) -> DeleteError {
    match error {
        RemoteError::Unhandled(e) => {
            debug!("Unable to get stack details: {:?}", e);
            DeleteError::Unhandled(e)
        }
        e => {
            debug!("Stack service error for {}: {}", stack_name, e);
            DeleteError::DeleteFailed {
                stack_name: stack_name.to_string(),
                msg: e.to_string(),
            }
        }
    }
}
