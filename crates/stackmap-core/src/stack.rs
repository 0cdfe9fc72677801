//! Reading a tool list from JSON or TOML.
//!
//! JSON is either a bare array of `{"name", "category"}` objects or an object
//! with a `tools` array. TOML uses `[[tool]]` tables.

use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Result, StackmapError};
use crate::tool::ToolInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackFormat {
    Json,
    Toml,
}

impl FromStr for StackFormat {
    type Err = StackmapError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            other => Err(StackmapError::UnknownFormat(other.to_string())),
        }
    }
}

impl StackFormat {
    /// Pick a format from the file extension.
    pub fn from_path(path: &std::path::Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| StackmapError::UnknownFormat(path.display().to_string()))?;
        ext.parse()
            .map_err(|_| StackmapError::UnknownFormat(path.display().to_string()))
    }
}

#[derive(Deserialize)]
struct TomlStack {
    #[serde(default)]
    tool: Vec<ToolInput>,
}

/// Parse a tool list. Entries with a blank name are rejected.
pub fn parse_stack(text: &str, format: StackFormat) -> Result<Vec<ToolInput>> {
    let tools = match format {
        StackFormat::Json => parse_json_tools(text)?,
        StackFormat::Toml => {
            let s: TomlStack =
                toml::from_str(text).map_err(|e| StackmapError::StackFile(e.to_string()))?;
            s.tool
        }
    };

    if let Some(i) = tools.iter().position(|t| t.name.trim().is_empty()) {
        return Err(StackmapError::StackFile(format!("tool #{} has an empty name", i + 1)));
    }
    Ok(tools)
}

/// Pick the shape first, then deserialize it so field errors (a missing
/// `category`, say) come through from serde_json.
fn parse_json_tools(text: &str) -> Result<Vec<ToolInput>> {
    const SHAPE: &str = "expected an array of tools or an object with a \"tools\" array";
    let value: serde_json::Value = serde_json::from_str(text)?;
    let list = match value {
        serde_json::Value::Array(_) => value,
        serde_json::Value::Object(mut obj) => obj
            .remove("tools")
            .ok_or_else(|| StackmapError::StackFile(SHAPE.into()))?,
        _ => return Err(StackmapError::StackFile(SHAPE.into())),
    };
    Ok(serde_json::from_value(list)?)
}

/// Read a tool list from a file, choosing the format by extension.
#[cfg(feature = "fs")]
pub fn load_stack(path: &std::path::Path) -> Result<Vec<ToolInput>> {
    let format = StackFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)
        .map_err(|e| StackmapError::Io(format!("{}: {e}", path.display())))?;
    parse_stack(&content, format)
}
