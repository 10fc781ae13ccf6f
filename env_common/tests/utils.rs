use async_trait::async_trait;
use env_defs::{
    CloudClients, CloudConnector, ObjectStore, Prompter, RemoteError, StackDescription,
    StackIdentity, StackService, TemplateStage,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn calls(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// A stack that exists with `status` until `delete_stack` is called.
#[derive(Clone)]
pub struct FakeStacks {
    pub status: Option<String>,
    pub template: Option<String>,
    pub log: CallLog,
}

impl FakeStacks {
    fn is_deleted(&self) -> bool {
        self.log
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.starts_with("delete_stack:"))
    }
}

#[async_trait]
impl StackService for FakeStacks {
    async fn describe_stack(
        &self,
        stack_name: &str,
    ) -> Result<Option<StackDescription>, RemoteError> {
        let deleted = self.is_deleted();
        self.log
            .lock()
            .unwrap()
            .push(format!("describe_stack:{}", stack_name));

        match &self.status {
            Some(status) if !deleted => Ok(Some(StackDescription {
                status: status.clone(),
                status_reason: None,
            })),
            _ => Err(RemoteError::service(
                "ValidationError",
                &format!("Stack with id {} does not exist", stack_name),
            )),
        }
    }

    async fn get_template(
        &self,
        stack_name: &str,
        stage: TemplateStage,
    ) -> Result<Option<String>, RemoteError> {
        self.log
            .lock()
            .unwrap()
            .push(format!("get_template:{}:{}", stack_name, stage.as_str()));
        Ok(self.template.clone())
    }

    async fn delete_stack(&self, stack_name: &str) -> Result<(), RemoteError> {
        self.log
            .lock()
            .unwrap()
            .push(format!("delete_stack:{}", stack_name));
        Ok(())
    }
}

/// In-memory bucket contents. Keys listed in `failing` cannot be deleted.
#[derive(Clone, Default)]
pub struct FakeStore {
    pub objects: Arc<Mutex<Vec<(String, String)>>>,
    pub failing: Vec<String>,
    pub log: CallLog,
}

impl FakeStore {
    pub fn with_objects(log: &CallLog, objects: &[(&str, &str)]) -> Self {
        FakeStore {
            objects: Arc::new(Mutex::new(
                objects
                    .iter()
                    .map(|(b, k)| (b.to_string(), k.to_string()))
                    .collect(),
            )),
            failing: vec![],
            log: log.clone(),
        }
    }

    pub fn remaining(&self) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .map(|(b, k)| format!("{}/{}", b, k))
            .collect()
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn delete_object(
        &self,
        bucket: &str,
        key: &str,
        version: Option<String>,
    ) -> Result<(), RemoteError> {
        let call = match version {
            Some(version) => format!("delete_object:{}/{}?versionId={}", bucket, key, version),
            None => format!("delete_object:{}/{}", bucket, key),
        };
        self.log.lock().unwrap().push(call);
        if self.failing.iter().any(|k| k == key) {
            return Err(RemoteError::service("AccessDenied", "Access Denied"));
        }
        self.objects
            .lock()
            .unwrap()
            .retain(|(b, k)| !(b == bucket && k == key));
        Ok(())
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, RemoteError> {
        self.log
            .lock()
            .unwrap()
            .push(format!("list_objects:{}/{}", bucket, prefix));
        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|(b, k)| b == bucket && k.starts_with(prefix))
            .map(|(_, k)| k.clone())
            .collect())
    }
}

pub struct FakeConnector {
    pub stacks: FakeStacks,
    pub store: FakeStore,
    pub log: CallLog,
}

#[async_trait]
impl CloudConnector for FakeConnector {
    async fn connect(&self, identity: &StackIdentity) -> Result<CloudClients, anyhow::Error> {
        self.log.lock().unwrap().push(format!(
            "connect:{}",
            identity.region.clone().unwrap_or_default()
        ));
        Ok(CloudClients {
            stacks: Box::new(self.stacks.clone()),
            objects: Box::new(self.store.clone()),
        })
    }
}

/// Answers confirmations in order; once the script runs out every answer is no.
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<bool>>,
    stack_name: Option<String>,
    pub asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[bool]) -> Self {
        ScriptedPrompter {
            answers: Mutex::new(answers.iter().copied().collect()),
            stack_name: None,
            asked: Mutex::new(vec![]),
        }
    }

    pub fn with_stack_name(mut self, stack_name: &str) -> Self {
        self.stack_name = Some(stack_name.to_string());
        self
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, message: &str) -> bool {
        self.asked.lock().unwrap().push(message.to_string());
        self.answers.lock().unwrap().pop_front().unwrap_or(false)
    }

    fn prompt_text(&self, message: &str) -> Option<String> {
        self.asked.lock().unwrap().push(message.to_string());
        self.stack_name.clone()
    }
}

pub fn deployed_stack(log: &CallLog, template: &str) -> FakeStacks {
    FakeStacks {
        status: Some("CREATE_COMPLETE".to_string()),
        template: Some(template.to_string()),
        log: log.clone(),
    }
}

pub fn missing_stack(log: &CallLog) -> FakeStacks {
    FakeStacks {
        status: None,
        template: None,
        log: log.clone(),
    }
}
