mod cloudformation;
mod connector;
mod errors;
mod s3;

pub use cloudformation::CfnStackService;
pub use connector::AwsConnector;
pub use s3::S3ObjectStore;
