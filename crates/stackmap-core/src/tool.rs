use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A tool as entered by the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolInput {
    pub name: String,
    pub category: String,
}

impl ToolInput {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
        }
    }

    pub fn normalized_name(&self) -> String {
        normalize(&self.name)
    }

    pub fn normalized_category(&self) -> String {
        normalize(&self.category)
    }
}

/// Lowercase + trim. Every name/category comparison goes through this.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Where a resolved cost came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CostSource {
    /// A price listed for the tool itself.
    Tool,
    /// A default for the tool's category.
    Category,
}

impl std::fmt::Display for CostSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tool => write!(f, "tool"),
            Self::Category => write!(f, "category"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CostInfo {
    pub cost_mo: Option<f64>,
    pub cost_basis: Option<String>,
    pub source: Option<CostSource>,
}

/// Resolved costs keyed by normalized tool name.
pub type CostMap = BTreeMap<String, CostInfo>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Replace,
    Evaluate,
    Keep,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Replace, Action::Evaluate, Action::Keep];

    pub fn label(self) -> &'static str {
        match self {
            Self::Replace => "Replace",
            Self::Evaluate => "Evaluate",
            Self::Keep => "Keep",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of analysis output. Produced fresh per call, one per input tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyzedItem {
    pub name: String,
    pub category: String,
    pub cost_mo: Option<f64>,
    pub action: Action,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_alt: Option<String>,
}
