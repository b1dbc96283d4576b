//! Sidebar expansion state: at most one open branch per depth, re-derived from
//! the current route on navigation.

use crate::menu::NavigationNode;
use serde::Serialize;

/// Selected sibling index per depth; `None` is collapsed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SidebarState {
    path: Vec<Option<usize>>,
}

impl SidebarState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn path(&self) -> &[Option<usize>] {
        &self.path
    }

    #[must_use]
    pub fn is_expanded(&self, depth: usize, index: usize) -> bool {
        self.path.get(depth).copied().flatten() == Some(index)
    }

    /// Opens `index` at `depth`, or collapses it when it is already open.
    /// Either way everything deeper is closed.
    pub fn toggle(&mut self, depth: usize, index: usize) {
        let already_open = self.is_expanded(depth, index);
        self.path.resize(depth + 1, None);
        self.path[depth] = if already_open { None } else { Some(index) };
    }

    /// Expands the branch leading to the first node (depth-first) whose route
    /// prefixes `url`. Leaves the state alone when nothing matches.
    pub fn sync_to_route(&mut self, nodes: &[NavigationNode], url: &str) {
        let url = normalize(strip_query(url));
        let mut trail = Vec::new();
        if find_match(nodes, &url, &mut trail) {
            self.path = trail.into_iter().map(Some).collect();
        }
    }
}

fn find_match(nodes: &[NavigationNode], url: &str, trail: &mut Vec<usize>) -> bool {
    for (index, node) in nodes.iter().enumerate() {
        trail.push(index);
        if node.route_path().is_some_and(|path| url.starts_with(&path)) {
            return true;
        }
        if find_match(&node.children, url, trail) {
            return true;
        }
        trail.pop();
    }
    false
}

/// Whether `node` should render as the current page: its route equals the
/// normalized url. Nodes without a route (sections) are never active.
#[must_use]
pub fn is_active(node: &NavigationNode, url: &str) -> bool {
    node.route_path()
        .is_some_and(|path| normalize(&path) == normalize(strip_query(url)))
}

fn strip_query(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

fn normalize(url: &str) -> String {
    let mut normalized = if url.starts_with('/') {
        url.to_string()
    } else {
        format!("/{url}")
    };
    if normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{build_tree, types::MenuResponse};
    use serde_json::json;

    fn tree() -> Vec<NavigationNode> {
        let response: MenuResponse = serde_json::from_value(json!({
            "success": true,
            "data": [{
                "sistema_id": 1,
                "secciones": [
                    {"id": 1, "codigo": "INICIO", "nombre": "Inicio", "orden": 1, "subsecciones": [
                        {"id": 1, "codigo": "ACCESO", "nombre": "Acceso", "orden": 1, "ruta": "/inicio/acceso"}
                    ]},
                    {"id": 3, "codigo": "COTIZAR", "nombre": "Cotizar", "orden": 2, "subsecciones": [
                        {"id": 3, "codigo": "CREAR", "nombre": "Crear", "orden": 1, "ruta": "/cotizaciones/crear"},
                        {"id": 4, "codigo": "CONSULTA", "nombre": "Consulta", "orden": 2, "ruta": "/cotizaciones/consulta"}
                    ]}
                ]
            }]
        }))
        .expect("valid payload");
        build_tree(response).expect("tree")
    }

    #[test]
    fn starts_collapsed() {
        let state = SidebarState::new();
        assert!(state.path().is_empty());
        assert!(!state.is_expanded(0, 0));
    }

    #[test]
    fn toggle_twice_collapses_at_and_below_depth() {
        let mut state = SidebarState::new();
        state.toggle(0, 1);
        state.toggle(1, 0);
        assert_eq!(state.path(), &[Some(1), Some(0)]);

        state.toggle(0, 1);
        assert_eq!(state.path(), &[None]);
        assert!(!state.is_expanded(0, 1));
        assert!(!state.is_expanded(1, 0));
    }

    #[test]
    fn opening_a_sibling_closes_the_previous_branch() {
        let mut state = SidebarState::new();
        state.toggle(0, 0);
        state.toggle(1, 2);
        state.toggle(0, 1);
        assert_eq!(state.path(), &[Some(1)]);
        assert!(state.is_expanded(0, 1));
        assert!(!state.is_expanded(0, 0));
    }

    #[test]
    fn toggle_deeper_than_path_pads_collapsed() {
        let mut state = SidebarState::new();
        state.toggle(2, 3);
        assert_eq!(state.path(), &[None, None, Some(3)]);
    }

    #[test]
    fn sync_expands_branch_for_route() {
        let nodes = tree();
        let mut state = SidebarState::new();
        state.sync_to_route(&nodes, "/cotizaciones/consulta/42?tab=1#top");
        assert_eq!(state.path(), &[Some(1), Some(1)]);
    }

    #[test]
    fn sync_is_idempotent() {
        let nodes = tree();
        let mut state = SidebarState::new();
        state.sync_to_route(&nodes, "/inicio/acceso");
        let first = state.clone();
        state.sync_to_route(&nodes, "/inicio/acceso");
        assert_eq!(state, first);
        assert_eq!(state.path(), &[Some(0), Some(0)]);
    }

    #[test]
    fn sync_without_match_keeps_state() {
        let nodes = tree();
        let mut state = SidebarState::new();
        state.toggle(0, 1);
        state.sync_to_route(&nodes, "/desconocido");
        assert_eq!(state.path(), &[Some(1)]);
    }

    #[test]
    fn active_detection() {
        let nodes = tree();
        let consulta = &nodes[1].children[1];
        assert!(is_active(consulta, "/cotizaciones/consulta/"));
        assert!(is_active(consulta, "cotizaciones/consulta?x=1"));
        assert!(!is_active(consulta, "/cotizaciones/consulta/42"));
        assert!(!is_active(&nodes[1].children[0], "/cotizaciones/consulta"));

        assert!(!is_active(&nodes[1], "/cotizaciones/consulta"));
        assert!(!is_active(&nodes[0], "/inicio"));
    }

    #[test]
    fn sync_accepts_relative_and_trailing_slash_urls() {
        let nodes = tree();
        let mut state = SidebarState::new();
        state.sync_to_route(&nodes, "cotizaciones/consulta");
        assert_eq!(state.path(), &[Some(1), Some(1)]);

        let mut state = SidebarState::new();
        state.sync_to_route(&nodes, "inicio/acceso/?tab=2");
        assert_eq!(state.path(), &[Some(0), Some(0)]);
    }
}
