use std::io::Read as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::Style;
use stackmap_core::{
    analyze_stack,
    cost::{self, CostTable},
    rules::{KEY_CATEGORIES, OVERLAP_RULES},
    stack::{self, StackFormat},
    summarize, Action, AnalyzedItem, StackSummary, ToolInput,
};
use tracing_subscriber::EnvFilter;

// ── Palette ──────────────────────────────────────────────────────────

fn s_header() -> Style { Style::new().color256(252).bold() }  // bright gray, bold
fn s_dim() -> Style    { Style::new().color256(248) }         // light gray
fn s_tree() -> Style   { Style::new().color256(245) }         // mid gray
fn s_hint() -> Style   { Style::new().color256(243) }         // soft gray
fn s_keep() -> Style   { Style::new().color256(114) }         // green
fn s_eval() -> Style   { Style::new().color256(214) }         // amber
fn s_err() -> Style    { Style::new().color256(167) }         // red
fn s_price() -> Style  { Style::new().color256(109) }         // teal
fn s_bold() -> Style   { Style::new().bold() }
fn s_label() -> Style  { Style::new().color256(146) }         // muted lavender

fn sep(width: usize) -> String {
    s_tree().apply_to("\u{2500}".repeat(width)).to_string()
}

fn action_color(a: Action) -> Color {
    match a {
        Action::Replace  => Color::AnsiValue(167),
        Action::Evaluate => Color::AnsiValue(214),
        Action::Keep     => Color::AnsiValue(114),
    }
}

fn action_str(a: Action) -> String {
    match a {
        Action::Replace  => format!("{}", s_err().apply_to("\u{2717} replace")),
        Action::Evaluate => format!("{}", s_eval().apply_to("\u{25d0} evaluate")),
        Action::Keep     => format!("{}", s_keep().apply_to("\u{25cf} keep")),
    }
}

fn fmt_cost(c: Option<f64>) -> String {
    match c {
        Some(v) if v >= 1000.0 => format!("${:.1}k/mo", v / 1000.0),
        Some(v) if v.fract() == 0.0 => format!("${v:.0}/mo"),
        Some(v) => format!("${v:.2}/mo"),
        None => "\u{2014}".to_string(),
    }
}

// ── CLI Args ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "stackmap",
    about = "Map a business's software stack, flag overlapping tools, and total what it costs",
    version,
    after_help = "examples:\n  \
        stackmap analyze stack.toml\n  \
        stackmap analyze stack.json --json\n  \
        cat stack.json | stackmap analyze -\n  \
        stackmap analyze stack.toml --costs negotiated.toml\n  \
        stackmap cost zendesk\n  \
        stackmap cost acme-crm --category CRM\n  \
        stackmap rules"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// More log output (-v debug, -vv trace). STACKMAP_LOG overrides.
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every tool in a stack file and total its cost.
    Analyze {
        /// Stack file (.json or .toml), or `-` for JSON on stdin.
        file: PathBuf,
        /// Extra cost table layered over the bundled and user tables.
        #[arg(long, env = "STACKMAP_COSTS")]
        costs: Option<PathBuf>,
        #[arg(long, short)]
        json: bool,
    },
    /// Look up the monthly cost of one tool.
    Cost {
        name: String,
        #[arg(long, short, default_value = "")]
        category: String,
        #[arg(long, env = "STACKMAP_COSTS")]
        costs: Option<PathBuf>,
        #[arg(long, short)]
        json: bool,
    },
    /// Show the overlap rules and key categories.
    Rules,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze { file, costs, json } => cmd_analyze(&file, costs.as_deref(), json),
        Commands::Cost {
            name,
            category,
            costs,
            json,
        } => cmd_cost(&name, &category, costs.as_deref(), json),
        Commands::Rules => {
            cmd_rules();
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("STACKMAP_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn load_table(explicit: Option<&Path>) -> anyhow::Result<CostTable> {
    cost::load_costs_layered(explicit).context("loading cost tables")
}

fn read_stack(file: &Path) -> anyhow::Result<Vec<ToolInput>> {
    if file.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stack from stdin")?;
        return Ok(stack::parse_stack(&buf, StackFormat::Json)?);
    }
    stack::load_stack(file).with_context(|| format!("reading {}", file.display()))
}

// ── Analyze ──────────────────────────────────────────────────────────

fn cmd_analyze(file: &Path, costs: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let tools = read_stack(file)?;
    let table = load_table(costs)?;
    let resolved = table.resolve(&tools);
    let items = analyze_stack(&tools, &resolved);
    let summary = summarize(&items);

    if json {
        let out = serde_json::json!({ "items": items, "summary": summary });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if items.is_empty() {
        eprintln!("{}", s_err().apply_to("no tools in stack file"));
        return Ok(());
    }

    println!();
    println!(
        "{}  {}",
        s_header().apply_to("stack analysis"),
        s_dim().apply_to(format!("{} tools", items.len()))
    );
    println!("{}", sep(72));
    print_items(&items);
    print_summary(&summary);
    Ok(())
}

fn print_items(items: &[AnalyzedItem]) {
    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("  Tool").fg(Color::AnsiValue(243)),
        Cell::new("Category").fg(Color::AnsiValue(243)),
        Cell::new("Action").fg(Color::AnsiValue(243)),
        Cell::new("Cost").fg(Color::AnsiValue(243)),
        Cell::new("Why").fg(Color::AnsiValue(243)),
    ]);

    for item in items {
        let why = match &item.suggested_alt {
            Some(alt) => format!("{}\n\u{2192} {alt}", item.reason),
            None => item.reason.clone(),
        };
        table.add_row(vec![
            Cell::new(format!("  {}", item.name)).fg(Color::AnsiValue(252)),
            Cell::new(&item.category).fg(Color::AnsiValue(146)),
            Cell::new(item.action.label()).fg(action_color(item.action)),
            Cell::new(fmt_cost(item.cost_mo)).fg(Color::AnsiValue(109)),
            Cell::new(why).fg(Color::AnsiValue(248)),
        ]);
    }
    println!("{table}");
}

fn print_summary(s: &StackSummary) {
    println!();
    println!("{}", s_header().apply_to("summary"));
    println!("{}", sep(72));

    println!(
        "  {:<22} {}",
        s_dim().apply_to("known spend"),
        s_price().apply_to(fmt_cost(Some(s.total_cost_mo)))
    );
    if s.replace_cost_mo > 0.0 {
        println!(
            "  {:<22} {}",
            s_dim().apply_to("flagged to replace"),
            s_err().apply_to(fmt_cost(Some(s.replace_cost_mo)))
        );
    }
    if s.evaluate_cost_mo > 0.0 {
        println!(
            "  {:<22} {}",
            s_dim().apply_to("worth a review"),
            s_eval().apply_to(fmt_cost(Some(s.evaluate_cost_mo)))
        );
    }
    let counts: Vec<String> = Action::ALL
        .iter()
        .filter(|a| s.action_counts.get(**a) > 0)
        .map(|a| format!("{} {}", s.action_counts.get(*a), action_str(*a)))
        .collect();
    println!("  {:<22} {}", s_dim().apply_to("actions"), counts.join("  "));

    if !s.suggestions.is_empty() {
        println!();
        println!("{}", s_header().apply_to("consolidation"));
        for g in &s.suggestions {
            println!(
                "  {} {}  {}",
                s_bold().apply_to(&g.alternative),
                s_tree().apply_to("\u{2190}"),
                s_label().apply_to(g.replaces.join(", "))
            );
        }
    }

    if !s.categories.is_empty() {
        println!();
        println!("{}", s_header().apply_to("by category"));
        for c in &s.categories {
            println!(
                "  {:<28} {:>3}  {}",
                s_label().apply_to(&c.category),
                c.tool_count,
                s_price().apply_to(fmt_cost(Some(c.cost_mo)))
            );
        }
    }

    println!();
    if !s.unpriced.is_empty() {
        println!(
            "{}",
            s_hint().apply_to(format!("  no cost data: {}", s.unpriced.join(", ")))
        );
    }
    println!(
        "{}",
        s_hint().apply_to(format!(
            "  {} of {} tools priced, {:.0}% of known spend flagged",
            s.priced_count,
            s.tool_count,
            s.flagged_share() * 100.0
        ))
    );
    println!();
}

// ── Cost lookup ──────────────────────────────────────────────────────

fn cmd_cost(name: &str, category: &str, costs: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let table = load_table(costs)?;
    let info = table.lookup(name, category);

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    match info {
        Some(c) => {
            println!(
                "  {}  {}  {}",
                s_bold().apply_to(name),
                s_price().apply_to(fmt_cost(c.cost_mo)),
                s_dim().apply_to(c.cost_basis.as_deref().unwrap_or("")),
            );
            if let Some(src) = c.source {
                println!("  {}", s_hint().apply_to(format!("from {src} defaults")));
            }
        }
        None => {
            let hint = if category.is_empty() {
                "  try --category to fall back to a category default".to_string()
            } else {
                format!("  no default for category {category:?} either")
            };
            println!("  {} {}", s_bold().apply_to(name), s_err().apply_to("no cost data"));
            println!("{}", s_hint().apply_to(hint));
        }
    }
    Ok(())
}

// ── Rules ────────────────────────────────────────────────────────────

fn cmd_rules() {
    println!();
    println!("{}", s_header().apply_to("known overlaps"));
    println!("{}", sep(64));
    for rule in OVERLAP_RULES {
        println!(
            "  {} {} {}",
            s_bold().apply_to(rule.members.join(" + ")),
            s_tree().apply_to("\u{2192}"),
            s_price().apply_to(rule.suggested_alt)
        );
        println!("    {}", s_dim().apply_to(rule.reason_all));
        if rule.reason_partial != rule.reason_all {
            println!("    {}", s_dim().apply_to(rule.reason_partial));
        }
    }

    println!();
    println!("{}", s_header().apply_to("key categories"));
    println!("{}", sep(64));
    println!("  {}", s_label().apply_to(KEY_CATEGORIES.join(", ")));
    println!();
    println!(
        "{}",
        s_hint().apply_to(
            "  known overlaps win, then shared categories (evaluate), then lone key categories (keep)"
        )
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_formatting() {
        assert_eq!(fmt_cost(None), "\u{2014}");
        assert_eq!(fmt_cost(Some(150.0)), "$150/mo");
        assert_eq!(fmt_cost(Some(8.75)), "$8.75/mo");
        assert_eq!(fmt_cost(Some(1500.0)), "$1.5k/mo");
    }

    #[test]
    fn cli_parses_analyze() {
        let cli = Cli::try_parse_from(["stackmap", "-v", "analyze", "stack.toml", "--json"]).unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Analyze { file, json, .. } => {
                assert_eq!(file, PathBuf::from("stack.toml"));
                assert!(json);
            }
            _ => panic!("expected analyze"),
        }
    }
}
