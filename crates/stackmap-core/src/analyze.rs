use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::rules;
use crate::tool::{Action, AnalyzedItem, CostMap, ToolInput};

/// Facts about the whole stack that individual rules consult.
struct StackContext {
    names: HashSet<String>,
    category_counts: HashMap<String, usize>,
}

impl StackContext {
    fn new(tools: &[ToolInput]) -> Self {
        let mut names = HashSet::with_capacity(tools.len());
        let mut category_counts: HashMap<String, usize> = HashMap::new();
        for t in tools {
            names.insert(t.normalized_name());
            *category_counts.entry(t.normalized_category()).or_default() += 1;
        }
        Self {
            names,
            category_counts,
        }
    }

    fn category_count(&self, normalized_category: &str) -> usize {
        self.category_counts
            .get(normalized_category)
            .copied()
            .unwrap_or(0)
    }
}

/// A tool under evaluation, with its normalized keys computed once.
struct Subject<'a> {
    tool: &'a ToolInput,
    name: String,
    category: String,
}

struct Verdict {
    action: Action,
    reason: String,
    suggested_alt: Option<String>,
}

type Stage = fn(&StackContext, &Subject<'_>) -> Option<Verdict>;

/// Rule stages in priority order. The first stage returning a verdict wins.
const STAGES: &[Stage] = &[
    known_overlap,
    category_redundancy,
    key_category_singleton,
];

fn known_overlap(ctx: &StackContext, s: &Subject<'_>) -> Option<Verdict> {
    let rule = rules::find_overlap_rule(&s.name)?;
    Some(Verdict {
        action: Action::Replace,
        reason: rule.reason(|m| ctx.names.contains(m)).to_string(),
        suggested_alt: Some(rule.suggested_alt.to_string()),
    })
}

fn category_redundancy(ctx: &StackContext, s: &Subject<'_>) -> Option<Verdict> {
    if ctx.category_count(&s.category) <= 1 {
        return None;
    }
    Some(Verdict {
        action: Action::Evaluate,
        reason: format!(
            "Multiple tools in category \"{}\" → redundancy potential",
            s.tool.category
        ),
        suggested_alt: None,
    })
}

fn key_category_singleton(ctx: &StackContext, s: &Subject<'_>) -> Option<Verdict> {
    if !rules::is_key_category(&s.category) || ctx.category_count(&s.category) != 1 {
        return None;
    }
    Some(Verdict {
        action: Action::Keep,
        reason: format!("Single tool in key category \"{}\"", s.tool.category),
        suggested_alt: None,
    })
}

fn default_verdict() -> Verdict {
    Verdict {
        action: Action::Keep,
        reason: "No issues detected in initial pass.".to_string(),
        suggested_alt: None,
    }
}

/// Classify every tool in the stack as Replace, Evaluate or Keep and attach
/// its monthly cost from `costs_by_name` (keyed by normalized tool name).
///
/// Returns one item per input tool, in input order.
pub fn analyze_stack(tools: &[ToolInput], costs_by_name: &CostMap) -> Vec<AnalyzedItem> {
    let ctx = StackContext::new(tools);

    let items: Vec<AnalyzedItem> = tools
        .iter()
        .map(|tool| {
            let subject = Subject {
                tool,
                name: tool.normalized_name(),
                category: tool.normalized_category(),
            };
            let verdict = STAGES
                .iter()
                .find_map(|stage| stage(&ctx, &subject))
                .unwrap_or_else(default_verdict);
            let cost_mo = costs_by_name.get(&subject.name).and_then(|c| c.cost_mo);

            AnalyzedItem {
                name: tool.name.clone(),
                category: tool.category.clone(),
                cost_mo,
                action: verdict.action,
                reason: verdict.reason,
                suggested_alt: verdict.suggested_alt,
            }
        })
        .collect();

    debug!(
        tools = tools.len(),
        categories = ctx.category_counts.len(),
        flagged = items.iter().filter(|i| i.action != Action::Keep).count(),
        "analyzed stack"
    );
    items
}
