use super::node::NavigationNode;
use crate::state::{StateCell, Subscription};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

/// Default lifetime of a fetched menu tree.
pub const DEFAULT_MENU_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Clone, Debug, Default)]
pub struct MenuSnapshot {
    pub nodes: Arc<Vec<NavigationNode>>,
    pub fetched_at: Option<Instant>,
}

impl MenuSnapshot {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Non-empty and younger than `ttl`.
    #[must_use]
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        !self.is_empty() && self.fetched_at.is_some_and(|at| at.elapsed() < ttl)
    }
}

/// Shared holder of the current navigation tree.
///
/// The tree is swapped as a whole, so readers see either the previous
/// complete tree or the new one.
#[derive(Clone, Debug)]
pub struct MenuStore {
    cell: Arc<StateCell<MenuSnapshot>>,
}

impl Default for MenuStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cell: StateCell::new(MenuSnapshot::default()),
        }
    }

    pub fn replace(&self, nodes: Arc<Vec<NavigationNode>>) {
        self.cell.publish(MenuSnapshot {
            nodes,
            fetched_at: Some(Instant::now()),
        });
    }

    pub fn clear(&self) {
        self.cell.publish(MenuSnapshot::default());
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<MenuSnapshot> {
        self.cell.current()
    }

    #[must_use]
    pub fn nodes(&self) -> Arc<Vec<NavigationNode>> {
        Arc::clone(&self.cell.current().nodes)
    }

    #[must_use]
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.cell.current().is_fresh(ttl)
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(&MenuSnapshot) + Send + Sync + 'static,
    ) -> Subscription {
        self.cell.subscribe(listener)
    }
}
