use crate::{
    cli::globals::GlobalArgs,
    menu::NavigationNode,
    sidebar::{is_active, SidebarState},
};
use anyhow::Result;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub url: String,
}

/// Print the branch the sidebar would expand for a route.
/// # Errors
/// Returns an error if the menu cannot be loaded.
pub async fn execute(args: Args) -> Result<()> {
    let context = args.globals.context()?;
    let nodes = context
        .menu()
        .fetch_menu()
        .await
        .map_err(|err| super::menu_error(err, &args.globals.api_url))?;

    let mut state = SidebarState::new();
    state.sync_to_route(&nodes, &args.url);

    let trail = expanded_trail(&nodes, &state, &args.url);
    if trail.is_empty() {
        println!("no menu entry matches {}", args.url);
    } else {
        for line in trail {
            println!("{line}");
        }
    }
    Ok(())
}

/// Labels along the expanded path; the active page is marked with `*`.
#[must_use]
pub fn expanded_trail(nodes: &[NavigationNode], state: &SidebarState, url: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut level = nodes;
    for (depth, slot) in state.path().iter().enumerate() {
        let Some(node) = slot.and_then(|index| level.get(index)) else {
            break;
        };
        let marker = if is_active(node, url) { "*" } else { " " };
        lines.push(format!("{}{marker} {} ({})", "  ".repeat(depth), node.label, node.code));
        level = &node.children;
    }
    lines
}
