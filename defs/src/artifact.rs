use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    CodePackage,
    TemplateFile,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactKind::CodePackage => write!(f, "code package"),
            ArtifactKind::TemplateFile => write!(f, "template file"),
        }
    }
}

/// An object uploaded during packaging that a deployed template still points at.
/// Recomputed from the template on every run.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ArtifactReference {
    pub bucket: String,
    pub prefix: Option<String>,
    pub key: String,
    pub version: Option<String>,
    pub kind: ArtifactKind,
    pub logical_id: String,
    pub property: String,
}

impl ArtifactReference {
    pub fn new(bucket: &str, key: &str, kind: ArtifactKind) -> Self {
        ArtifactReference {
            bucket: bucket.to_string(),
            prefix: key_prefix(key),
            key: key.to_string(),
            version: None,
            kind,
            logical_id: String::new(),
            property: String::new(),
        }
    }

    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }

    pub fn with_source(mut self, logical_id: &str, property: &str) -> Self {
        self.logical_id = logical_id.to_string();
        self.property = property.to_string();
        self
    }

    pub fn s3_url(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}

fn key_prefix(key: &str) -> Option<String> {
    match key.rsplit_once('/') {
        Some((prefix, _)) if !prefix.is_empty() => Some(prefix.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_prefix_is_parent_path() {
        let reference = ArtifactReference::new(
            "artifacts",
            "my-app/nested/abc123",
            ArtifactKind::CodePackage,
        );
        assert_eq!(reference.prefix.as_deref(), Some("my-app/nested"));
        assert_eq!(reference.s3_url(), "s3://artifacts/my-app/nested/abc123");
    }

    #[test]
    fn test_key_at_bucket_root_has_no_prefix() {
        let reference = ArtifactReference::new("artifacts", "abc123", ArtifactKind::TemplateFile);
        assert_eq!(reference.prefix, None);
    }
}
