//! `bptea graph` command - Process graph listing

use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::{effective_format, load_snapshot, print_json, print_yaml};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::graph::{Edge, NodeKind, NodeView, ProcessGraph};

#[derive(clap::Args, Debug)]
pub struct GraphArgs {
    /// Study ID (full or unique prefix); lists the defaults when omitted
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
struct GraphListing {
    nodes: Vec<NodeView>,
    edges: &'static [Edge],
}

pub fn run(args: GraphArgs, global: &GlobalOpts) -> Result<()> {
    let (_, parameters, configuration) = load_snapshot(global, args.id.as_deref())?;
    let graph = ProcessGraph::standard();

    let mut views = graph
        .describe(&parameters, &configuration)
        .map_err(|e| miette::miette!("{}", e))?;
    let order = graph
        .topological_order()
        .map_err(|e| miette::miette!("{}", e))?;
    views.sort_by_key(|view| order.iter().position(|node| node.key == view.key));

    let listing = GraphListing {
        nodes: views,
        edges: graph.edges(),
    };

    match effective_format(global, OutputFormat::Auto) {
        OutputFormat::Json => print_json(&listing),
        OutputFormat::Yaml => print_yaml(&listing),
        OutputFormat::Id => {
            for node in &listing.nodes {
                println!("{}", node.key);
            }
            Ok(())
        }
        OutputFormat::Tsv | OutputFormat::Csv => {
            let sep = if global.format == OutputFormat::Csv { "," } else { "\t" };
            println!("{}", ["key", "kind", "label", "selected"].join(sep));
            for node in &listing.nodes {
                println!(
                    "{}",
                    [
                        node.key,
                        kind_name(node.kind),
                        node.label,
                        node.selected.unwrap_or(""),
                    ]
                    .join(sep)
                );
            }
            Ok(())
        }
        OutputFormat::Md | OutputFormat::Auto => {
            print_listing(&listing, global.quiet);
            Ok(())
        }
    }
}

fn kind_name(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Fixed => "fixed",
        NodeKind::Alternative => "alternative",
    }
}

fn print_listing(listing: &GraphListing, quiet: bool) {
    if !quiet {
        println!("{}", style("Process steps").bold());
        println!("{}", style("─".repeat(60)).dim());
    }
    for (i, node) in listing.nodes.iter().enumerate() {
        match node.kind {
            NodeKind::Fixed => println!(
                "{:>2}. {:<24} {}",
                i + 1,
                style(node.label).bold(),
                style(&node.description).dim()
            ),
            NodeKind::Alternative => println!(
                "{:>2}. {:<24} {} {}",
                i + 1,
                style(node.label).bold(),
                style(node.selected_label.unwrap_or("-")).cyan(),
                style(format!("({} options)", node.option_count)).dim()
            ),
        }
    }

    if !quiet {
        println!();
        println!("{}", style("Flow").bold());
        println!("{}", style("─".repeat(60)).dim());
    }
    for edge in listing.edges {
        println!("  {} → {}", edge.from, edge.to);
    }
}
