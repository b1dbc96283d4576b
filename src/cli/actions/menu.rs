use crate::{cli::globals::GlobalArgs, menu::NavigationNode};
use anyhow::Result;
use std::fmt::Write as _;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub json: bool,
}

/// Fetch the navigation tree and print it.
/// # Errors
/// Returns an error if the menu cannot be loaded.
pub async fn execute(args: Args) -> Result<()> {
    let context = args.globals.context()?;
    let nodes = context
        .menu()
        .fetch_menu()
        .await
        .map_err(|err| super::menu_error(err, &args.globals.api_url))?;
    debug!(sections = nodes.len(), "menu fetched");

    if args.json {
        println!("{}", serde_json::to_string_pretty(nodes.as_slice())?);
    } else {
        print!("{}", render_tree(&nodes));
    }
    Ok(())
}

/// One line per node, children indented below their section.
#[must_use]
pub fn render_tree(nodes: &[NavigationNode]) -> String {
    let mut out = String::new();
    render_level(&mut out, nodes, 0);
    out
}

fn render_level(out: &mut String, nodes: &[NavigationNode], depth: usize) {
    for node in nodes {
        let indent = "  ".repeat(depth);
        let route = node.route_path().unwrap_or_default();
        let _ = writeln!(
            out,
            "{indent}{} [{}] {} ({}) {route}",
            node.id, node.code, node.label, node.icon
        );
        render_level(out, &node.children, depth + 1);
    }
}
