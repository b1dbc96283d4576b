//! Menu fetch pipeline: cached, coalesced loading of the navigation tree.

use super::{
    node::{build_tree, NavigationNode},
    store::{MenuStore, DEFAULT_MENU_TTL},
    types::MenuResponse,
};
use crate::{
    api::{ApiClient, Error},
    coalesce::InFlight,
    notify::{Notice, Severity},
};
use std::{sync::Arc, time::Duration};
use tracing::{debug, info, instrument, warn};

pub const MENU_PATH: &str = "api/permisos/navegacion";

type Tree = Arc<Vec<NavigationNode>>;

#[derive(Clone, Debug)]
pub struct MenuService {
    client: Arc<ApiClient>,
    store: MenuStore,
    in_flight: InFlight<(), Tree>,
    ttl: Duration,
}

impl MenuService {
    #[must_use]
    pub fn new(client: Arc<ApiClient>, store: MenuStore) -> Self {
        Self {
            client,
            store,
            in_flight: InFlight::new(),
            ttl: DEFAULT_MENU_TTL,
        }
    }

    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub const fn store(&self) -> &MenuStore {
        &self.store
    }

    /// Cached tree when fresh, otherwise a (shared) network fetch.
    ///
    /// # Errors
    /// Returns the transport or envelope error of the fetch.
    pub async fn fetch_menu(&self) -> Result<Tree, Error> {
        self.fetch_menu_with(false).await
    }

    /// # Errors
    /// Returns the transport or envelope error of the fetch. The store keeps its
    /// previous contents on failure.
    #[instrument(skip(self))]
    pub async fn fetch_menu_with(&self, force_refresh: bool) -> Result<Tree, Error> {
        if !force_refresh && self.store.is_fresh(self.ttl) {
            debug!("menu served from cache");
            return Ok(self.store.nodes());
        }

        let client = Arc::clone(&self.client);
        let store = self.store.clone();
        self.in_flight
            .run((), move || async move {
                let response: MenuResponse = client.get_json(MENU_PATH).await?;
                if let Some(notice) = response.notice.as_deref().map(str::trim) {
                    if !notice.is_empty() {
                        client
                            .notifier()
                            .notify(Notice::new(Severity::Info, "Aviso", notice));
                    }
                }

                let nodes = Arc::new(build_tree(response)?);
                info!(sections = nodes.len(), "menu loaded");
                store.replace(Arc::clone(&nodes));
                Ok(nodes)
            })
            .await
    }

    /// Tree for the application shell: failures degrade to an empty menu.
    pub async fn load_or_empty(&self) -> Tree {
        match self.fetch_menu().await {
            Ok(nodes) => nodes,
            Err(err) => {
                warn!("menu unavailable: {err}");
                Arc::new(Vec::new())
            }
        }
    }

    /// Resolves numeric ids for a section/subsection code pair, fetching the
    /// menu first when the store is empty.
    ///
    /// # Errors
    /// Returns `Error::LookupNotFound` when either code is missing, or the
    /// fetch error when the menu cannot be loaded.
    pub async fn section_ids(
        &self,
        section_code: &str,
        subsection_code: &str,
    ) -> Result<(i64, i64), Error> {
        let cached = self.store.nodes();
        let nodes = if cached.is_empty() {
            self.fetch_menu().await?
        } else {
            cached
        };

        find_ids(&nodes, section_code, subsection_code).ok_or_else(|| Error::LookupNotFound {
            section: section_code.to_string(),
            subsection: subsection_code.to_string(),
        })
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_pending(&())
    }
}

// first section with the code wins, as in the backend's own lookup
fn find_ids(nodes: &[NavigationNode], section_code: &str, subsection_code: &str) -> Option<(i64, i64)> {
    let section = nodes
        .iter()
        .find(|node| node.is_section() && node.code == section_code)?;
    let subsection = section.child_by_code(subsection_code)?;
    Some((section.id, subsection.id))
}
