use crate::cli::actions::{catalog, menu, permissions, sidebar, Action};
use anyhow::Result;

/// Execute the provided action.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Menu(args) => menu::execute(args).await,
        Action::Permissions(args) => permissions::execute(args).await,
        Action::Sidebar(args) => sidebar::execute(args).await,
        Action::Catalog(args) => catalog::execute(&args),
    }
}
