use serde_json::json;
use stackmap_core::cost::{load_bundled_costs, parse_costs};
use stackmap_core::stack::{parse_stack, StackFormat};
use stackmap_core::{analyze_stack, summarize, Action, CostSource};

#[test]
fn bundled_costs_price_a_typical_stack() {
    let data = json!([
        {"name": "Salesforce", "category": "CRM"},
        {"name": "Zendesk", "category": "Service"},
        {"name": "Intercom", "category": "Service"},
        {"name": "Marketo", "category": "Marketing Automation"},
        {"name": "Acme Ledger", "category": "Accounting"},
        {"name": "Homegrown Wiki", "category": "Internal"}
    ]);
    let tools = parse_stack(&data.to_string(), StackFormat::Json).expect("should parse");
    let table = load_bundled_costs().unwrap();
    let costs = table.resolve(&tools);

    assert_eq!(costs["salesforce"].source, Some(CostSource::Tool));
    assert_eq!(costs["acme ledger"].source, Some(CostSource::Category));
    assert!(!costs.contains_key("homegrown wiki"));

    let items = analyze_stack(&tools, &costs);
    assert_eq!(items[0].action, Action::Keep);
    assert_eq!(items[1].action, Action::Replace);
    assert_eq!(items[2].action, Action::Replace);
    assert_eq!(items[3].action, Action::Replace);
    assert_eq!(items[4].cost_mo, Some(50.0));
    assert_eq!(items[5].cost_mo, None);

    let summary = summarize(&items);
    assert_eq!(summary.tool_count, 6);
    assert_eq!(summary.priced_count, 5);
    assert_eq!(summary.unpriced, vec!["Homegrown Wiki".to_string()]);
    assert_eq!(summary.action_counts.replace, 3);
    assert!((summary.replace_cost_mo - (115.0 + 85.0 + 1250.0)).abs() < 1e-9);
    assert!((summary.total_cost_mo - (150.0 + 115.0 + 85.0 + 1250.0 + 50.0)).abs() < 1e-9);
    assert_eq!(summary.suggestions.len(), 2);
    assert_eq!(summary.suggestions[0].replaces, vec!["Zendesk", "Intercom"]);
}

#[test]
fn wrapped_json_and_toml_agree() {
    let json_stack = json!({"tools": [
        {"name": "Asana", "category": "Project Management"},
        {"name": "Trello", "category": "Project Management"}
    ]});
    let toml_stack = r#"
[[tool]]
name = "Asana"
category = "Project Management"

[[tool]]
name = "Trello"
category = "Project Management"
"#;
    let a = parse_stack(&json_stack.to_string(), StackFormat::Json).unwrap();
    let b = parse_stack(toml_stack, StackFormat::Toml).unwrap();
    assert_eq!(a, b);

    let costs = load_bundled_costs().unwrap().resolve(&a);
    let items = analyze_stack(&a, &costs);
    assert!(items.iter().all(|i| i.action == Action::Evaluate));
    let summary = summarize(&items);
    assert!((summary.evaluate_cost_mo - (13.49 + 6.0)).abs() < 1e-9);
    assert_eq!(summary.categories.len(), 1);
}

#[test]
fn category_entry_without_price_yields_null_cost() {
    let table = parse_costs(
        r#"
[category.security]
cost_basis = "quote only"
"#,
    )
    .unwrap();
    let tools = parse_stack(r#"[{"name": "Vanta", "category": "Security"}]"#, StackFormat::Json)
        .unwrap();
    let costs = table.resolve(&tools);
    assert_eq!(costs["vanta"].cost_basis.as_deref(), Some("quote only"));

    let items = analyze_stack(&tools, &costs);
    assert_eq!(items[0].cost_mo, None);

    let out = serde_json::to_value(&items).unwrap();
    assert_eq!(
        out,
        json!([{
            "name": "Vanta",
            "category": "Security",
            "cost_mo": null,
            "action": "Keep",
            "reason": "No issues detected in initial pass."
        }])
    );
}

#[test]
fn sample_stack_file() {
    let tools = parse_stack(include_str!("../../../data/sample_stack.toml"), StackFormat::Toml)
        .expect("sample stack should parse");
    assert_eq!(tools.len(), 8);

    let costs = load_bundled_costs().unwrap().resolve(&tools);
    let items = analyze_stack(&tools, &costs);
    let actions: Vec<Action> = items.iter().map(|i| i.action).collect();
    assert_eq!(
        actions,
        vec![
            Action::Keep,
            Action::Replace,
            Action::Replace,
            Action::Replace,
            Action::Evaluate,
            Action::Evaluate,
            Action::Keep,
            Action::Keep,
        ]
    );
    assert!(items.iter().all(|i| i.cost_mo.is_some()), "every sample tool is priced");
}
