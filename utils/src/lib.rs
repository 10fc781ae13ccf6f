mod logging;
mod s3_url;
mod template;
mod template_name;

pub use logging::setup_logging;
pub use s3_url::{parse_s3_url, S3Location};
pub use template::{TemplateDocument, TemplateResource};
pub use template_name::{file_checksum, get_template_file_name, TEMPLATE_EXTENSION};
