use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StackmapError};
use crate::tool::{normalize, CostInfo, CostMap, CostSource, ToolInput};

/// A default monthly cost from costs.toml.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct CostEntry {
    /// USD per month. Absent when the price is not published.
    pub cost_mo: Option<f64>,
    /// How `cost_mo` was derived, e.g. "per user", "flat".
    pub cost_basis: Option<String>,
}

/// Tool and category cost defaults, keyed by normalized name.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CostTable {
    #[serde(default, rename = "tool")]
    pub tools: BTreeMap<String, CostEntry>,
    #[serde(default, rename = "category")]
    pub categories: BTreeMap<String, CostEntry>,
}

impl CostTable {
    /// Overlay `other` on top of this table. Entries in `other` win.
    pub fn merge(&mut self, other: CostTable) {
        self.tools.extend(other.tools);
        self.categories.extend(other.categories);
    }

    /// Resolve a single tool: its own entry first, then its category's.
    pub fn lookup(&self, name: &str, category: &str) -> Option<CostInfo> {
        if let Some(e) = self.tools.get(&normalize(name)) {
            return Some(e.to_info(CostSource::Tool));
        }
        self.categories
            .get(&normalize(category))
            .map(|e| e.to_info(CostSource::Category))
    }

    /// Resolve the whole stack in one pass. The first occurrence of a
    /// normalized name decides its category fallback.
    pub fn resolve(&self, tools: &[ToolInput]) -> CostMap {
        let mut out = CostMap::new();
        for t in tools {
            let key = t.normalized_name();
            if out.contains_key(&key) {
                continue;
            }
            if let Some(info) = self.lookup(&t.name, &t.category) {
                out.insert(key, info);
            }
        }
        debug!(
            tools = tools.len(),
            resolved = out.len(),
            by_tool = out
                .values()
                .filter(|c| c.source == Some(CostSource::Tool))
                .count(),
            "resolved costs"
        );
        out
    }

    pub fn len(&self) -> usize {
        self.tools.len() + self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty() && self.categories.is_empty()
    }

    fn normalized(self) -> Result<Self> {
        Ok(Self {
            tools: normalize_keys(self.tools, "tool")?,
            categories: normalize_keys(self.categories, "category")?,
        })
    }
}

impl CostEntry {
    fn to_info(&self, source: CostSource) -> CostInfo {
        CostInfo {
            cost_mo: self.cost_mo,
            cost_basis: self.cost_basis.clone(),
            source: Some(source),
        }
    }
}

fn normalize_keys(
    entries: BTreeMap<String, CostEntry>,
    kind: &str,
) -> Result<BTreeMap<String, CostEntry>> {
    let mut out = BTreeMap::new();
    // normalized key -> key as written, to report collisions
    let mut seen: BTreeMap<String, String> = BTreeMap::new();
    for (key, entry) in entries {
        if let Some(c) = entry.cost_mo {
            if !c.is_finite() || c < 0.0 {
                return Err(StackmapError::CostTable(format!(
                    "{kind}.{key}: cost_mo must be a non-negative number, got {c}"
                )));
            }
        }
        let norm = normalize(&key);
        if let Some(prev) = seen.get(&norm) {
            return Err(StackmapError::CostTable(format!(
                "{kind}.{prev} and {kind}.{key} are the same entry ({norm:?})"
            )));
        }
        seen.insert(norm.clone(), key);
        out.insert(norm, entry);
    }
    Ok(out)
}

/// Parse a cost table from a TOML string.
pub fn parse_costs(toml_str: &str) -> Result<CostTable> {
    let table: CostTable =
        toml::from_str(toml_str).map_err(|e| StackmapError::CostTable(e.to_string()))?;
    table.normalized()
}

/// Load the bundled costs.toml from the data/ directory.
pub fn load_bundled_costs() -> Result<CostTable> {
    let toml_str = include_str!("../../../data/costs.toml");
    parse_costs(toml_str)
}

/// Load a cost table from a file.
#[cfg(feature = "fs")]
pub fn load_costs(path: &std::path::Path) -> Result<CostTable> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| StackmapError::Io(format!("{}: {e}", path.display())))?;
    parse_costs(&content).map_err(|e| match e {
        StackmapError::CostTable(msg) => {
            StackmapError::CostTable(format!("{}: {msg}", path.display()))
        }
        other => other,
    })
}

/// Path of the per-user cost overrides, `<config_dir>/stackmap/costs.toml`.
#[cfg(feature = "fs")]
pub fn user_costs_path() -> Option<std::path::PathBuf> {
    Some(dirs::config_dir()?.join("stackmap").join("costs.toml"))
}

/// Bundled table, overlaid with the user's overrides file if it exists and
/// parses, overlaid with `explicit` if given. A broken user file is skipped;
/// a broken explicit file is an error.
#[cfg(feature = "fs")]
pub fn load_costs_layered(explicit: Option<&std::path::Path>) -> Result<CostTable> {
    let mut table = load_bundled_costs()?;

    if let Some(path) = user_costs_path().filter(|p| p.exists()) {
        match load_costs(&path) {
            Ok(user) => {
                debug!(path = %path.display(), entries = user.len(), "loaded user costs");
                table.merge(user);
            }
            Err(e) => tracing::warn!("ignoring user cost table: {e}"),
        }
    }

    if let Some(path) = explicit {
        let extra = load_costs(path)?;
        debug!(path = %path.display(), entries = extra.len(), "loaded cost overrides");
        table.merge(extra);
    }

    Ok(table)
}
