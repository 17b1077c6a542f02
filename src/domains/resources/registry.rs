//! Resource template registry.
//!
//! Resource templates use URI templates (RFC 6570) to describe the
//! parameterized `figma:///` addresses clients can fill in.

use rmcp::model::{AnnotateAble, RawResourceTemplate, ResourceTemplate};

use super::reader::JSON_MIME_TYPE;
use super::uri::ResourceKind;

/// One template per resource kind.
pub fn get_all_resource_templates() -> Vec<ResourceTemplate> {
    [
        (
            ResourceKind::File,
            "figma:///file/{fileKey}",
            "Figma File",
            "Full document of a Figma file",
        ),
        (
            ResourceKind::Component,
            "figma:///component/{fileKey}/{componentId}",
            "Figma Component",
            "A component inside a Figma file",
        ),
        (
            ResourceKind::Variable,
            "figma:///variable/{fileKey}/{variableId}",
            "Figma Variable",
            "A variable inside a Figma file",
        ),
    ]
    .into_iter()
    .map(|(kind, uri_template, title, description)| {
        RawResourceTemplate {
            uri_template: uri_template.to_string(),
            name: kind.as_str().to_string(),
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            mime_type: Some(JSON_MIME_TYPE.to_string()),
        }
        .no_annotation()
    })
    .collect()
}
