use env_defs::{ArtifactKind, ArtifactReference};
use env_utils::{parse_s3_url, TemplateDocument, TemplateResource};
use log::debug;
use serde_yaml::Value;

/// How a packaged property stores its object location.
#[derive(Debug, Clone, Copy)]
enum LocationShape {
    /// `s3://bucket/key` or an https object URL. Some resources also accept a
    /// `{Bucket, Key, Version}` mapping in the same property.
    Url,
    /// A mapping with separate bucket/key/version fields.
    BucketKey {
        bucket: &'static str,
        key: &'static str,
        version: Option<&'static str>,
    },
}

struct PackagedProperty {
    resource_type: &'static str,
    property: &'static str,
    shape: LocationShape,
    kind: ArtifactKind,
}

const BUCKET_KEY_VERSION: LocationShape = LocationShape::BucketKey {
    bucket: "Bucket",
    key: "Key",
    version: Some("Version"),
};

const S3_BUCKET_KEY_VERSION: LocationShape = LocationShape::BucketKey {
    bucket: "S3Bucket",
    key: "S3Key",
    version: Some("S3ObjectVersion"),
};

const fn code(resource_type: &'static str, property: &'static str, shape: LocationShape) -> PackagedProperty {
    PackagedProperty {
        resource_type,
        property,
        shape,
        kind: ArtifactKind::CodePackage,
    }
}

const fn template(resource_type: &'static str, property: &'static str) -> PackagedProperty {
    PackagedProperty {
        resource_type,
        property,
        shape: LocationShape::Url,
        kind: ArtifactKind::TemplateFile,
    }
}

// Every property the packaging step rewrites to point into the bucket
const PACKAGED_PROPERTIES: &[PackagedProperty] = &[
    code("AWS::Serverless::Function", "CodeUri", LocationShape::Url),
    code("AWS::Serverless::Api", "DefinitionUri", LocationShape::Url),
    code("AWS::Serverless::HttpApi", "DefinitionUri", LocationShape::Url),
    code("AWS::Serverless::StateMachine", "DefinitionUri", LocationShape::Url),
    code("AWS::Serverless::LayerVersion", "ContentUri", LocationShape::Url),
    template("AWS::Serverless::Application", "Location"),
    code("AWS::AppSync::GraphQLSchema", "DefinitionS3Location", LocationShape::Url),
    code("AWS::AppSync::Resolver", "RequestMappingTemplateS3Location", LocationShape::Url),
    code("AWS::AppSync::Resolver", "ResponseMappingTemplateS3Location", LocationShape::Url),
    code("AWS::AppSync::FunctionConfiguration", "RequestMappingTemplateS3Location", LocationShape::Url),
    code("AWS::AppSync::FunctionConfiguration", "ResponseMappingTemplateS3Location", LocationShape::Url),
    code("AWS::ApiGateway::RestApi", "BodyS3Location", BUCKET_KEY_VERSION),
    code("AWS::Lambda::Function", "Code", S3_BUCKET_KEY_VERSION),
    code("AWS::Lambda::LayerVersion", "Content", S3_BUCKET_KEY_VERSION),
    code(
        "AWS::ElasticBeanstalk::ApplicationVersion",
        "SourceBundle",
        LocationShape::BucketKey {
            bucket: "S3Bucket",
            key: "S3Key",
            version: None,
        },
    ),
    code("AWS::StepFunctions::StateMachine", "DefinitionS3Location", BUCKET_KEY_VERSION),
    code("AWS::Glue::Job", "Command.ScriptLocation", LocationShape::Url),
    code("AWS::CloudFormation::ModuleVersion", "ModulePackage", LocationShape::Url),
    code("AWS::CloudFormation::ResourceVersion", "SchemaHandlerPackage", LocationShape::Url),
    template("AWS::CloudFormation::Stack", "TemplateURL"),
];

/// Lists the objects a deployed template still references in the artifact
/// bucket. Resources whose property is missing, local, an intrinsic function
/// or otherwise not an object location are skipped.
pub fn resolve_artifact_references(document: &TemplateDocument) -> Vec<ArtifactReference> {
    let mut references = vec![];

    for resource in document.resources() {
        if let Some(image_uri) = resource.properties.get("ImageUri") {
            debug!(
                "Skipping image {:?} of {}, container images are not removed",
                image_uri, resource.logical_id
            );
        }

        for packaged in PACKAGED_PROPERTIES
            .iter()
            .filter(|p| p.resource_type == resource.resource_type)
        {
            match resolve_property(&resource, packaged) {
                Some(reference) => {
                    debug!(
                        "Found {} {} in {}.{}",
                        reference.kind,
                        reference.s3_url(),
                        resource.logical_id,
                        packaged.property
                    );
                    references.push(reference);
                }
                None => debug!(
                    "No object location in {}.{}",
                    resource.logical_id, packaged.property
                ),
            }
        }
    }

    references
}

fn resolve_property(
    resource: &TemplateResource<'_>,
    packaged: &PackagedProperty,
) -> Option<ArtifactReference> {
    let value = lookup(resource.properties, packaged.property)?;

    let (bucket, key, version) = match (packaged.shape, value) {
        (LocationShape::Url, Value::String(url)) => {
            let location = parse_s3_url(url)?;
            (location.bucket, location.key, location.version)
        }
        (LocationShape::Url, Value::Mapping(_)) => bucket_key(value, "Bucket", "Key", Some("Version"))?,
        (LocationShape::BucketKey { bucket, key, version }, Value::Mapping(_)) => {
            bucket_key(value, bucket, key, version)?
        }
        _ => return None,
    };

    Some(
        ArtifactReference::new(&bucket, &key, packaged.kind)
            .with_version(version)
            .with_source(resource.logical_id, packaged.property),
    )
}

fn bucket_key(
    value: &Value,
    bucket_field: &str,
    key_field: &str,
    version_field: Option<&str>,
) -> Option<(String, String, Option<String>)> {
    // Intrinsics like {"Ref": ...} are mappings, not strings, and fall out here
    let bucket = value.get(bucket_field)?.as_str()?;
    let key = value.get(key_field)?.as_str()?;
    if bucket.is_empty() || key.is_empty() {
        return None;
    }
    let version = version_field
        .and_then(|field| value.get(field))
        .and_then(|v| v.as_str())
        .map(|v| v.to_string());
    Some((bucket.to_string(), key.to_string(), version))
}

fn lookup<'a>(properties: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(properties, |value, segment| value.get(segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resolve(body: &str) -> Vec<ArtifactReference> {
        resolve_artifact_references(&TemplateDocument::parse(body))
    }

    #[test]
    fn test_serverless_function_code_uri() {
        let references = resolve(
            r#"
Resources:
  HelloFunction:
    Type: AWS::Serverless::Function
    Properties:
      CodeUri: s3://artifacts/demo/0c3b1a5e
      Handler: app.handler
"#,
        );
        assert_eq!(references.len(), 1);
        let reference = &references[0];
        assert_eq!(reference.bucket, "artifacts");
        assert_eq!(reference.key, "demo/0c3b1a5e");
        assert_eq!(reference.prefix.as_deref(), Some("demo"));
        assert_eq!(reference.kind, ArtifactKind::CodePackage);
        assert_eq!(reference.logical_id, "HelloFunction");
        assert_eq!(reference.property, "CodeUri");
    }

    #[test]
    fn test_nested_templates() {
        let references = resolve(
            r#"
Resources:
  App:
    Type: AWS::Serverless::Application
    Properties:
      Location: https://s3.us-east-1.amazonaws.com/artifacts/demo/a1.template
  Nested:
    Type: AWS::CloudFormation::Stack
    Properties:
      TemplateURL: https://artifacts.s3.amazonaws.com/demo/b2.template
"#,
        );
        assert_eq!(references.len(), 2);
        assert!(references.iter().all(|r| r.kind == ArtifactKind::TemplateFile));
        assert_eq!(references[0].key, "demo/a1.template");
        assert_eq!(references[1].key, "demo/b2.template");
    }

    #[test]
    fn test_bucket_key_mappings() {
        let references = resolve(
            r#"
{
  "Resources": {
    "Fn": {
      "Type": "AWS::Lambda::Function",
      "Properties": {
        "Code": {"S3Bucket": "artifacts", "S3Key": "demo/fn.zip", "S3ObjectVersion": "v3"}
      }
    },
    "Api": {
      "Type": "AWS::ApiGateway::RestApi",
      "Properties": {
        "BodyS3Location": {"Bucket": "other-bucket", "Key": "swagger.yaml"}
      }
    },
    "Bundle": {
      "Type": "AWS::ElasticBeanstalk::ApplicationVersion",
      "Properties": {
        "ApplicationName": "app",
        "SourceBundle": {"S3Bucket": "artifacts", "S3Key": "demo/bundle.zip"}
      }
    }
  }
}
"#,
        );
        assert_eq!(references.len(), 3);
        assert_eq!(references[0].key, "demo/fn.zip");
        assert_eq!(references[0].version.as_deref(), Some("v3"));
        assert_eq!(references[1].bucket, "other-bucket");
        assert_eq!(references[1].prefix, None);
        assert_eq!(references[2].key, "demo/bundle.zip");
    }

    #[test]
    fn test_dotted_property_and_multiple_properties() {
        let references = resolve(
            r#"
Resources:
  Job:
    Type: AWS::Glue::Job
    Properties:
      Command:
        Name: glueetl
        ScriptLocation: s3://artifacts/demo/job.py
  Resolver:
    Type: AWS::AppSync::Resolver
    Properties:
      RequestMappingTemplateS3Location: s3://artifacts/demo/req.vtl
      ResponseMappingTemplateS3Location: s3://artifacts/demo/res.vtl
"#,
        );
        let keys: Vec<&str> = references.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["demo/job.py", "demo/req.vtl", "demo/res.vtl"]);
        assert_eq!(references[0].property, "Command.ScriptLocation");
    }

    #[test]
    fn test_unpackaged_and_intrinsic_values_are_skipped() {
        let references = resolve(
            r#"
Resources:
  Local:
    Type: AWS::Serverless::Function
    Properties:
      CodeUri: ./hello_world
  Image:
    Type: AWS::Serverless::Function
    Properties:
      PackageType: Image
      ImageUri: 123456789012.dkr.ecr.us-east-1.amazonaws.com/demo:latest
  FromParam:
    Type: AWS::Lambda::Function
    Properties:
      Code:
        S3Bucket: {"Ref": "CodeBucket"}
        S3Key: demo/fn.zip
  Inline:
    Type: AWS::Lambda::Function
    Properties:
      Code:
        ZipFile: "def handler(event, context): pass"
  Topic:
    Type: AWS::SNS::Topic
    Properties:
      TopicName: demo
"#,
        );
        assert_eq!(references, vec![]);
    }

    #[test]
    fn test_duplicate_references_are_kept() {
        let references = resolve(
            r#"
Resources:
  One:
    Type: AWS::Serverless::Function
    Properties:
      CodeUri: s3://artifacts/demo/shared
  Two:
    Type: AWS::Serverless::Function
    Properties:
      CodeUri: s3://artifacts/demo/shared
"#,
        );
        assert_eq!(references.len(), 2);
        assert_eq!(references[0].key, references[1].key);
    }

    #[test]
    fn test_unparseable_template_yields_nothing() {
        assert_eq!(resolve("Resources: [unclosed"), vec![]);
    }
}
