pub mod catalog;
pub mod menu;
pub mod permissions;
pub mod sidebar;

// Dispatch for `Action`.
mod run;

#[derive(Debug)]
pub enum Action {
    Menu(menu::Args),
    Permissions(permissions::Args),
    Sidebar(sidebar::Args),
    Catalog(catalog::Args),
}

/// Wraps a menu load failure, naming the backend when it could not be reached.
pub(crate) fn menu_error(err: crate::Error, api_url: &str) -> anyhow::Error {
    let message = if err.is_backend_unavailable() {
        format!("access backend at {api_url} is unavailable")
    } else {
        "failed to load navigation menu".to_string()
    };
    anyhow::Error::new(err).context(message)
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
