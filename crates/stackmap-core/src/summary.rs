use serde::{Deserialize, Serialize};

use crate::tool::{normalize, Action, AnalyzedItem};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionCounts {
    pub replace: usize,
    pub evaluate: usize,
    pub keep: usize,
}

impl ActionCounts {
    pub fn get(&self, action: Action) -> usize {
        match action {
            Action::Replace => self.replace,
            Action::Evaluate => self.evaluate,
            Action::Keep => self.keep,
        }
    }

    fn bump(&mut self, action: Action) {
        match action {
            Action::Replace => self.replace += 1,
            Action::Evaluate => self.evaluate += 1,
            Action::Keep => self.keep += 1,
        }
    }
}

/// Tools and known spend for one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTotal {
    /// Spelling of the first tool seen in this category.
    pub category: String,
    pub tool_count: usize,
    pub cost_mo: f64,
}

/// Tools that could fold into one suggested platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Suggestion {
    pub alternative: String,
    pub replaces: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StackSummary {
    pub tool_count: usize,
    pub priced_count: usize,
    /// Tools with no known cost, in input order.
    pub unpriced: Vec<String>,
    pub total_cost_mo: f64,
    pub action_counts: ActionCounts,
    /// Spend on tools marked Replace; the most consolidation could save.
    pub replace_cost_mo: f64,
    /// Spend on tools marked Evaluate.
    pub evaluate_cost_mo: f64,
    pub categories: Vec<CategoryTotal>,
    pub suggestions: Vec<Suggestion>,
}

impl StackSummary {
    /// Share of known spend that is flagged (Replace or Evaluate), 0.0..=1.0.
    pub fn flagged_share(&self) -> f64 {
        if self.total_cost_mo <= 0.0 {
            return 0.0;
        }
        (self.replace_cost_mo + self.evaluate_cost_mo) / self.total_cost_mo
    }
}

/// Aggregate analysis results into totals.
pub fn summarize(items: &[AnalyzedItem]) -> StackSummary {
    let mut s = StackSummary {
        tool_count: items.len(),
        ..Default::default()
    };
    // Normalized key alongside each category total, first-seen order.
    let mut cat_keys: Vec<String> = Vec::new();

    for item in items {
        s.action_counts.bump(item.action);

        let cost = item.cost_mo.unwrap_or(0.0);
        match item.cost_mo {
            Some(c) => {
                s.priced_count += 1;
                s.total_cost_mo += c;
            }
            None => s.unpriced.push(item.name.clone()),
        }
        match item.action {
            Action::Replace => s.replace_cost_mo += cost,
            Action::Evaluate => s.evaluate_cost_mo += cost,
            Action::Keep => {}
        }

        let key = normalize(&item.category);
        match cat_keys.iter().position(|k| *k == key) {
            Some(i) => {
                s.categories[i].tool_count += 1;
                s.categories[i].cost_mo += cost;
            }
            None => {
                cat_keys.push(key);
                s.categories.push(CategoryTotal {
                    category: item.category.clone(),
                    tool_count: 1,
                    cost_mo: cost,
                });
            }
        }

        if let Some(alt) = &item.suggested_alt {
            match s.suggestions.iter_mut().find(|g| g.alternative == *alt) {
                Some(g) => g.replaces.push(item.name.clone()),
                None => s.suggestions.push(Suggestion {
                    alternative: alt.clone(),
                    replaces: vec![item.name.clone()],
                }),
            }
        }
    }

    s
}
