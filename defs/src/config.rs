use serde::{Deserialize, Serialize};

/// Deploy parameters recorded for one config environment, as written by the
/// deploy command. Every field is optional; flags always win over these values.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct DeployConfig {
    pub stack_name: Option<String>,
    pub region: Option<String>,
    pub profile: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_prefix: Option<String>,
}

impl DeployConfig {
    pub fn is_empty(&self) -> bool {
        self == &DeployConfig::default()
    }

    /// Fills fields that are unset in `self` from `fallback`.
    pub fn or(self, fallback: DeployConfig) -> DeployConfig {
        DeployConfig {
            stack_name: self.stack_name.or(fallback.stack_name),
            region: self.region.or(fallback.region),
            profile: self.profile.or(fallback.profile),
            s3_bucket: self.s3_bucket.or(fallback.s3_bucket),
            s3_prefix: self.s3_prefix.or(fallback.s3_prefix),
        }
    }
}
