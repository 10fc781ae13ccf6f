mod prompt;
mod samconfig;

pub use prompt::InquirePrompter;
pub use samconfig::{load_deploy_config, ConfigError};
