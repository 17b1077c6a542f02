//! Resource URI codec.
//!
//! Resources are addressed as `figma:///<kind>/<fileKey>[/<resourceId>]`,
//! where `kind` is `file`, `component` or `variable` and each segment is one
//! or more ASCII word characters or hyphens.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::ResourceError;

/// The URI scheme identifying Figma resources.
pub const SCHEME: &str = "figma";

static URI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^figma:///(file|component|variable)/([A-Za-z0-9_-]+)(?:/([A-Za-z0-9_-]+))?$")
        .expect("URI pattern is a valid regex")
});

/// The kind of Figma resource a URI points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    File,
    Component,
    Variable,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Component => "component",
            Self::Variable => "variable",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed resource URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceAddress {
    pub kind: ResourceKind,
    pub file_key: String,
    pub resource_id: Option<String>,
}

impl ResourceAddress {
    /// Address of a whole file.
    pub fn file(file_key: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::File,
            file_key: file_key.into(),
            resource_id: None,
        }
    }

    /// Parses and validates a resource URI.
    pub fn parse(uri: &str) -> Result<Self, ResourceError> {
        let captures = URI_PATTERN
            .captures(uri)
            .ok_or_else(|| ResourceError::invalid_uri(uri))?;

        let kind = match &captures[1] {
            "file" => ResourceKind::File,
            "component" => ResourceKind::Component,
            "variable" => ResourceKind::Variable,
            _ => return Err(ResourceError::invalid_uri(uri)),
        };

        Ok(Self {
            kind,
            file_key: captures[2].to_string(),
            resource_id: captures.get(3).map(|m| m.as_str().to_string()),
        })
    }

    /// The sub-resource id, required for components and variables.
    pub fn required_resource_id(&self) -> Result<&str, ResourceError> {
        self.resource_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ResourceError::missing_resource_id(self.kind, self.to_string()))
    }
}

impl fmt::Display for ResourceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}:///{}/{}", self.kind, self.file_key)?;
        if let Some(id) = &self.resource_id {
            write!(f, "/{id}")?;
        }
        Ok(())
    }
}

impl FromStr for ResourceAddress {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_uri() {
        let address = ResourceAddress::parse("figma:///file/abc-123").unwrap();
        assert_eq!(address.kind, ResourceKind::File);
        assert_eq!(address.file_key, "abc-123");
        assert_eq!(address.resource_id, None);
        assert_eq!(address.to_string(), "figma:///file/abc-123");
    }

    #[test]
    fn test_parse_component_uri_with_id() {
        let address: ResourceAddress = "figma:///component/FILE_1/comp-9".parse().unwrap();
        assert_eq!(address.kind, ResourceKind::Component);
        assert_eq!(address.file_key, "FILE_1");
        assert_eq!(address.resource_id.as_deref(), Some("comp-9"));
        assert_eq!(address.required_resource_id().unwrap(), "comp-9");
    }

    #[test]
    fn test_parse_variable_uri() {
        let address = ResourceAddress::parse("figma:///variable/F/v_1").unwrap();
        assert_eq!(address.kind, ResourceKind::Variable);
        assert_eq!(address.resource_id.as_deref(), Some("v_1"));
    }

    #[test]
    fn test_component_without_id_parses_but_id_is_required() {
        let address = ResourceAddress::parse("figma:///component/F").unwrap();
        let err = address.required_resource_id().unwrap_err();
        assert!(matches!(err, ResourceError::MissingResourceId { .. }));
    }

    #[test]
    fn test_round_trip() {
        for uri in [
            "figma:///file/X",
            "figma:///file/a_b-c",
            "figma:///component/F/C",
            "figma:///variable/F/V",
        ] {
            let address = ResourceAddress::parse(uri).unwrap();
            assert_eq!(address.to_string(), uri);
            assert_eq!(ResourceAddress::parse(&address.to_string()).unwrap(), address);
        }
    }

    #[test]
    fn test_file_constructor_encodes() {
        assert_eq!(ResourceAddress::file("key").to_string(), "figma:///file/key");
    }

    #[test]
    fn test_rejects_malformed_uris() {
        for uri in [
            "invalid-uri",
            "",
            "figma:///unknown/X",
            "figma:///component/",
            "figma:///file/",
            "figma://file/X",
            "file/X",
            "other:///file/X",
            "figma:///file/X/",
            "figma:///file/X/Y/Z",
            "figma:///file/X Y",
            "figma:///file/X?query",
            "FIGMA:///file/X",
        ] {
            let result = ResourceAddress::parse(uri);
            assert!(
                matches!(result, Err(ResourceError::InvalidUri(_))),
                "expected {uri:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(ResourceKind::Variable).unwrap(),
            serde_json::json!("variable")
        );
    }
}
