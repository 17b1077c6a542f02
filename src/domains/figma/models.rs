//! Response shapes for the Figma endpoints this crate decodes.
//!
//! Only the fields the server reads are typed. Unknown fields are skipped
//! during decoding; passthrough endpoints return the raw JSON instead.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `GET /files`, `GET /projects/{id}/files` and `GET /search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileListResponse {
    #[serde(default)]
    pub files: Vec<FileSummary>,
}

/// One entry of a file listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "last_modified")]
    pub last_modified: Option<String>,
    #[serde(default, alias = "thumbnail_url")]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub version: Option<Value>,
}

/// The parts of `GET /files/{key}` used for change detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDocument {
    #[serde(default)]
    pub name: Option<String>,
    pub last_modified: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_list_tolerates_missing_fields() {
        let body = serde_json::json!({
            "files": [
                { "key": "abc", "name": "Design System" },
                {
                    "key": "def",
                    "name": "Landing",
                    "lastModified": "2024-05-01T10:00:00Z",
                    "thumbnailUrl": "https://example.com/t.png",
                    "version": "42"
                }
            ]
        });
        let list: FileListResponse = serde_json::from_value(body).unwrap();
        assert_eq!(list.files.len(), 2);
        assert!(list.files[0].last_modified.is_none());
        assert_eq!(list.files[1].version, Some(serde_json::json!("42")));
    }

    #[test]
    fn test_file_list_without_files_key_is_empty() {
        let list: FileListResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(list.files.is_empty());
    }

    #[test]
    fn test_file_document_skips_unknown_fields() {
        let body = serde_json::json!({
            "name": "Landing",
            "lastModified": "2024-05-01T10:00:00Z",
            "document": { "id": "0:0" }
        });
        let doc: FileDocument = serde_json::from_value(body).unwrap();
        assert_eq!(doc.last_modified, "2024-05-01T10:00:00Z");
        assert_eq!(doc.name.as_deref(), Some("Landing"));
    }
}
