use stackmap_core::analyze::analyze_stack;
use stackmap_core::tool::{Action, CostInfo, CostMap, CostSource, ToolInput};

fn make_tool(name: &str, category: &str) -> ToolInput {
    ToolInput::new(name, category)
}

fn make_cost(cost_mo: f64, basis: &str) -> CostInfo {
    CostInfo {
        cost_mo: Some(cost_mo),
        cost_basis: Some(basis.to_string()),
        source: Some(CostSource::Tool),
    }
}

fn service_costs() -> CostMap {
    let mut costs = CostMap::new();
    costs.insert("zendesk".into(), make_cost(115.0, "per agent"));
    costs.insert("intercom".into(), make_cost(85.0, "per seat"));
    costs.insert("freshdesk".into(), make_cost(49.0, "per agent"));
    costs
}

#[test]
fn same_input_same_output() {
    let tools = vec![
        make_tool("Zendesk", "Service"),
        make_tool("Freshdesk", "Service"),
        make_tool("Salesforce", "CRM"),
    ];
    let costs = service_costs();
    assert_eq!(analyze_stack(&tools, &costs), analyze_stack(&tools, &costs));
}

#[test]
fn one_item_per_tool_in_input_order() {
    let tools = vec![
        make_tool("Notion", "Docs"),
        make_tool("Zendesk", "Service"),
        make_tool("Notion", "Docs"),
        make_tool("Figma", "Design"),
    ];
    let out = analyze_stack(&tools, &CostMap::new());
    assert_eq!(out.len(), tools.len());
    for (item, tool) in out.iter().zip(&tools) {
        assert_eq!(item.name, tool.name);
        assert_eq!(item.category, tool.category);
    }
    assert!(analyze_stack(&[], &CostMap::new()).is_empty());
}

#[test]
fn intercom_and_zendesk_both_replaced() {
    let tools = vec![make_tool("Intercom", "Service"), make_tool("Zendesk", "Service")];
    let out = analyze_stack(&tools, &CostMap::new());
    assert!(out.iter().all(|i| i.action == Action::Replace));
    assert!(out
        .iter()
        .any(|i| i.suggested_alt.as_deref() == Some("HubSpot Service Hub")));
    assert_eq!(
        out[0].reason,
        "Intercom and Zendesk overlap in support/messaging. Consider consolidating."
    );
}

#[test]
fn known_pair_is_flagged_regardless_of_order() {
    let tools = vec![make_tool("Zendesk", "Service"), make_tool("Intercom", "Service")];
    let out = analyze_stack(&tools, &service_costs());
    assert_eq!(out.len(), 2);
    assert!(out.iter().all(|i| i.action != Action::Keep));
    assert_eq!(out[0].cost_mo, Some(115.0));
    assert_eq!(out[1].cost_mo, Some(85.0));
}

#[test]
fn lone_zendesk_is_replaced_while_its_neighbour_is_evaluated() {
    let tools = vec![make_tool("Zendesk", "Service"), make_tool("Freshdesk", "Service")];
    let out = analyze_stack(&tools, &service_costs());
    assert_eq!(out.len(), 2);
    assert!(out.iter().any(|i| i.action == Action::Evaluate));

    assert_eq!(out[0].action, Action::Replace);
    assert_eq!(
        out[0].reason,
        "Overlaps with other service tools; consider consolidation."
    );
    assert_eq!(out[0].suggested_alt.as_deref(), Some("HubSpot Service Hub"));
    assert_eq!(out[0].cost_mo, Some(115.0));

    assert_eq!(out[1].action, Action::Evaluate);
    assert_eq!(
        out[1].reason,
        "Multiple tools in category \"Service\" → redundancy potential"
    );
    assert!(out[1].suggested_alt.is_none());
    assert_eq!(out[1].cost_mo, Some(49.0));
}

#[test]
fn generic_service_overlap_is_evaluate() {
    let tools = vec![make_tool("Freshdesk", "Service"), make_tool("Help Scout", "service")];
    let out = analyze_stack(&tools, &service_costs());
    assert!(out.iter().all(|i| i.action == Action::Evaluate));
    assert!(out.iter().all(|i| i.suggested_alt.is_none()));
    assert_eq!(
        out[0].reason,
        "Multiple tools in category \"Service\" → redundancy potential"
    );
}

#[test]
fn no_overlap_keeps_everything() {
    let tools = vec![
        make_tool("Salesforce", "Sales"),
        make_tool("Google Analytics", "Analytics"),
    ];
    let mut costs = CostMap::new();
    costs.insert("salesforce".into(), make_cost(150.0, "per user"));
    costs.insert("google analytics".into(), make_cost(0.0, "free tier"));

    let out = analyze_stack(&tools, &costs);
    assert!(out.iter().all(|i| i.action == Action::Keep));
    assert_eq!(out[0].reason, "No issues detected in initial pass.");
}

#[test]
fn cost_passes_through() {
    let mut costs = CostMap::new();
    costs.insert("salesforce".into(), make_cost(150.0, "per user"));
    let out = analyze_stack(&[make_tool("Salesforce", "Sales")], &costs);
    assert_eq!(out[0].cost_mo, Some(150.0));
}

#[test]
fn unknown_tool_has_no_cost_and_is_kept() {
    let out = analyze_stack(&[make_tool("Unknown Tool", "Other")], &CostMap::new());
    assert_eq!(out[0].cost_mo, None);
    assert_eq!(out[0].action, Action::Keep);
}

#[test]
fn name_casing_and_whitespace_do_not_matter() {
    let mut costs = CostMap::new();
    costs.insert("salesforce".into(), make_cost(150.0, "per user"));
    costs.insert("marketo".into(), make_cost(1250.0, "flat"));

    for name in ["Salesforce", "SALESFORCE", "  salesforce "] {
        let out = analyze_stack(&[make_tool(name, "CRM")], &costs);
        assert_eq!(out[0].cost_mo, Some(150.0), "{name:?}");
        assert_eq!(out[0].action, Action::Keep, "{name:?}");
        assert_eq!(out[0].reason, "Single tool in key category \"CRM\"", "{name:?}");
    }

    let out = analyze_stack(&[make_tool(" MARKETO", "Email")], &costs);
    assert_eq!(out[0].action, Action::Replace);
    assert_eq!(out[0].cost_mo, Some(1250.0));
}

#[test]
fn key_category_with_two_tools_is_evaluated_not_protected() {
    let tools = vec![make_tool("HubSpot", "CRM"), make_tool("Pipedrive", "crm")];
    let out = analyze_stack(&tools, &CostMap::new());
    assert!(out.iter().all(|i| i.action == Action::Evaluate));
}

#[test]
fn pair_rule_checks_whole_stack_not_neighbours() {
    let tools = vec![
        make_tool("Intercom", "Messaging"),
        make_tool("Figma", "Design"),
        make_tool("Zendesk", "Helpdesk"),
    ];
    let out = analyze_stack(&tools, &CostMap::new());
    assert_eq!(out[0].action, Action::Replace);
    assert_eq!(out[1].action, Action::Keep);
    assert_eq!(out[2].action, Action::Replace);
    assert_eq!(out[0].reason, out[2].reason);
}
