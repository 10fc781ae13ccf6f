use log::warn;
use serde_yaml::Value;

/// A stack template as fetched from the remote service. JSON bodies parse as
/// YAML too, so both formats go through the same parser; short-form
/// intrinsic tags (`!Ref`, `!Sub`, ...) are ignored.
#[derive(Debug, Clone)]
pub struct TemplateDocument {
    body: String,
    parsed: Value,
}

#[derive(Debug)]
pub struct TemplateResource<'a> {
    pub logical_id: &'a str,
    pub resource_type: &'a str,
    pub properties: &'a Value,
}

impl TemplateDocument {
    pub fn try_parse(body: &str) -> Result<TemplateDocument, serde_yaml::Error> {
        let parsed = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_yaml::from_str(body)?
        };
        Ok(TemplateDocument {
            body: body.to_string(),
            parsed,
        })
    }

    /// Parses `body`, falling back to a document without resources when the
    /// body is not valid YAML/JSON.
    pub fn parse(body: &str) -> TemplateDocument {
        match TemplateDocument::try_parse(body) {
            Ok(document) => document,
            Err(e) => {
                warn!("Unable to parse template, no artifacts will be resolved from it: {}", e);
                TemplateDocument {
                    body: body.to_string(),
                    parsed: Value::Null,
                }
            }
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }

    /// Resources that declare both a `Type` and a `Properties` mapping.
    pub fn resources(&self) -> Vec<TemplateResource<'_>> {
        let resources = match self.parsed.get("Resources").and_then(|r| r.as_mapping()) {
            Some(resources) => resources,
            None => return vec![],
        };

        resources
            .iter()
            .filter_map(|(logical_id, resource)| {
                let logical_id = logical_id.as_str()?;
                let resource_type = resource.get("Type").and_then(|t| t.as_str())?;
                let properties = resource.get("Properties").filter(|p| p.as_mapping().is_some())?;
                Some(TemplateResource {
                    logical_id,
                    resource_type,
                    properties,
                })
            })
            .collect()
    }
}
