use serde::Serialize;
use wasm_bindgen::prelude::*;

use stackmap_core::analyze;
use stackmap_core::cost;
use stackmap_core::summary::{self, StackSummary};
use stackmap_core::tool::{AnalyzedItem, CostMap, ToolInput};

/// Plain objects for maps and `null` for `None`, as the UI expects.
fn to_js<T: Serialize>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// Classify a stack against a caller-supplied cost map.
/// `tools` is [{name, category}], `costs` is {normalized_name: CostInfo}.
/// Returns AnalyzedItem[] or null.
#[wasm_bindgen]
pub fn analyze_stack(tools: JsValue, costs: JsValue) -> JsValue {
    let tools: Vec<ToolInput> = match serde_wasm_bindgen::from_value(tools) {
        Ok(t) => t,
        Err(_) => return JsValue::NULL,
    };
    let costs: CostMap = if costs.is_undefined() || costs.is_null() {
        CostMap::new()
    } else {
        match serde_wasm_bindgen::from_value(costs) {
            Ok(c) => c,
            Err(_) => return JsValue::NULL,
        }
    };
    let items = analyze::analyze_stack(&tools, &costs);
    to_js(&items)
}

#[derive(Serialize)]
struct AnalysisJs {
    items: Vec<AnalyzedItem>,
    summary: StackSummary,
}

/// Price the stack from the bundled cost table, classify it, and summarize.
/// Returns {items, summary} or null.
#[wasm_bindgen]
pub fn analyze_with_bundled_costs(tools: JsValue) -> JsValue {
    let tools: Vec<ToolInput> = match serde_wasm_bindgen::from_value(tools) {
        Ok(t) => t,
        Err(_) => return JsValue::NULL,
    };
    let table = match cost::load_bundled_costs() {
        Ok(t) => t,
        Err(_) => return JsValue::NULL,
    };
    let items = analyze::analyze_stack(&tools, &table.resolve(&tools));
    let summary = summary::summarize(&items);
    to_js(&AnalysisJs { items, summary })
}

// ---------------------------------------------------------------------------
// Costs
// ---------------------------------------------------------------------------

/// Resolve costs for a stack from the bundled table.
/// Returns {normalized_name: CostInfo} or null.
#[wasm_bindgen]
pub fn resolve_costs(tools: JsValue) -> JsValue {
    let tools: Vec<ToolInput> = match serde_wasm_bindgen::from_value(tools) {
        Ok(t) => t,
        Err(_) => return JsValue::NULL,
    };
    match cost::load_bundled_costs() {
        Ok(table) => to_js(&table.resolve(&tools)),
        Err(_) => JsValue::NULL,
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Aggregate AnalyzedItem[] into totals. Returns StackSummary or null.
#[wasm_bindgen]
pub fn summarize(items: JsValue) -> JsValue {
    let items: Vec<AnalyzedItem> = match serde_wasm_bindgen::from_value(items) {
        Ok(i) => i,
        Err(_) => return JsValue::NULL,
    };
    to_js(&summary::summarize(&items))
}
