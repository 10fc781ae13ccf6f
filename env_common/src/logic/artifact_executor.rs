use std::collections::BTreeMap;

use env_defs::{ArtifactReference, DeleteError, ObjectStore, RemoteError};
use log::{debug, error, info};

pub struct ArtifactExecutor<'a> {
    store: &'a dyn ObjectStore,
}

impl<'a> ArtifactExecutor<'a> {
    pub fn new(store: &'a dyn ObjectStore) -> Self {
        ArtifactExecutor { store }
    }

    /// Deletes a single object. An object that is already gone counts as deleted.
    pub async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), DeleteError> {
        self.try_delete(bucket, key, None)
            .await
            .map_err(|e| DeleteError::ArtifactDeleteFailed {
                bucket: bucket.to_string(),
                keys: vec![key.to_string()],
                msg: e.to_string(),
            })
    }

    /// Deletes every object under `{prefix}/`. All deletes are attempted, the
    /// keys that failed are reported together.
    pub async fn delete_prefix(&self, bucket: &str, prefix: &str) -> Result<(), DeleteError> {
        let folder = format!("{}/", prefix.trim_end_matches('/'));
        let keys = self
            .store
            .list_objects(bucket, &folder)
            .await
            .map_err(|e| DeleteError::ArtifactDeleteFailed {
                bucket: bucket.to_string(),
                keys: vec![],
                msg: format!("unable to list objects under {}: {}", folder, e),
            })?;

        info!("Deleting {} objects under s3://{}/{}", keys.len(), bucket, folder);
        self.delete_keys(bucket, keys.iter().map(|k| (k.as_str(), None)))
            .await
    }

    /// Deletes the objects a template referenced, bucket by bucket. A pinned
    /// object version is deleted as that version.
    pub async fn delete_references(&self, references: &[ArtifactReference]) -> Result<(), DeleteError> {
        let mut by_bucket: BTreeMap<&str, Vec<(&str, Option<&str>)>> = BTreeMap::new();
        for reference in references {
            by_bucket
                .entry(reference.bucket.as_str())
                .or_default()
                .push((reference.key.as_str(), reference.version.as_deref()));
        }

        let mut first_error = None;
        for (bucket, objects) in by_bucket {
            if let Err(e) = self.delete_keys(bucket, objects.into_iter()).await {
                match first_error {
                    None => first_error = Some(e),
                    Some(_) => error!("{}", e),
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn delete_keys<'k>(
        &self,
        bucket: &str,
        objects: impl Iterator<Item = (&'k str, Option<&'k str>)>,
    ) -> Result<(), DeleteError> {
        let mut failed = vec![];
        let mut reasons = vec![];

        for (key, version) in objects {
            if let Err(e) = self.try_delete(bucket, key, version).await {
                error!("Unable to delete s3://{}/{}: {}", bucket, key, e);
                failed.push(key.to_string());
                reasons.push(e.to_string());
            }
        }

        if failed.is_empty() {
            return Ok(());
        }

        Err(DeleteError::ArtifactDeleteFailed {
            bucket: bucket.to_string(),
            msg: format!(
                "{} object(s) could not be deleted: {}",
                failed.len(),
                reasons.join("; ")
            ),
            keys: failed,
        })
    }

    async fn try_delete(&self, bucket: &str, key: &str, version: Option<&str>) -> Result<(), RemoteError> {
        match self
            .store
            .delete_object(bucket, key, version.map(|v| v.to_string()))
            .await
        {
            Ok(()) => {
                info!("Deleted s3://{}/{}", bucket, key);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                debug!("s3://{}/{} was already deleted", bucket, key);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
