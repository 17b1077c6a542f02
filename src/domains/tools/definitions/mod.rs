//! Tool definitions module.
//!
//! Tools are grouped by the part of the Figma API they cover. Each tool is a
//! unit struct implementing [`FigmaTool`].

mod common;
pub mod files;
pub mod library;
pub mod resources;
pub mod variables;

pub use common::{FigmaTool, into_call_result, parse_params};
pub use files::{GetCommentsTool, GetVersionsTool, PostCommentTool};
pub use library::{
    GetComponentTool, GetImagesTool, GetProjectFilesTool, GetStyleTool, GetTeamComponentsTool,
};
pub use resources::{CheckResourceTool, SearchResourcesTool, WatchResourceTool};
pub use variables::{GetVariableCollectionsTool, GetVariablesTool, ModifyVariablesTool};

#[cfg(test)]
pub(crate) use common::test_support;
