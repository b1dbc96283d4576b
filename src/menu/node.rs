//! Normalized navigation tree built from the backend payload.

use super::{
    icons::icon_for,
    types::{MenuResponse, SectionPayload, SubsectionPayload, SystemPayload},
};
use crate::api::Error;
use serde::Serialize;

/// Route used by subsections the backend sent without one.
pub const FALLBACK_ROUTE: &str = "inicio";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Section,
    Subsection,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NodeMetadata {
    pub kind: NodeKind,
    pub system_id: i64,
    pub system_name: String,
    /// Owning section id; only set on subsections.
    pub parent_id: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavigationNode {
    pub id: i64,
    pub code: String,
    pub label: String,
    pub icon: String,
    pub children: Vec<NavigationNode>,
    pub route: Option<Vec<String>>,
    pub metadata: NodeMetadata,
}

impl NavigationNode {
    #[must_use]
    pub fn is_section(&self) -> bool {
        self.metadata.kind == NodeKind::Section
    }

    /// Route as an absolute path (`/a/b`), if the node has one.
    #[must_use]
    pub fn route_path(&self) -> Option<String> {
        self.route
            .as_ref()
            .map(|segments| format!("/{}", segments.join("/")))
    }

    #[must_use]
    pub fn child_by_code(&self, code: &str) -> Option<&NavigationNode> {
        self.children.iter().find(|child| child.code == code)
    }
}

/// Turns a successful payload into the ordered node tree.
///
/// # Errors
/// Returns `Error::Backend` with the envelope message when `success` is false.
pub fn build_tree(response: MenuResponse) -> Result<Vec<NavigationNode>, Error> {
    if !response.success {
        return Err(Error::Backend(
            response
                .message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| "Error al obtener menú".to_string()),
        ));
    }

    Ok(response.data.iter().flat_map(section_nodes).collect())
}

fn section_nodes(system: &SystemPayload) -> Vec<NavigationNode> {
    sorted_by_order(&system.sections, |section| section.order)
        .into_iter()
        .map(|section| section_node(section, system))
        .collect()
}

fn section_node(section: &SectionPayload, system: &SystemPayload) -> NavigationNode {
    let children = sorted_by_order(&section.subsections, |subsection| subsection.order)
        .into_iter()
        .map(|subsection| subsection_node(subsection, section.id, system))
        .collect();

    NavigationNode {
        id: section.id,
        code: section.code.clone(),
        label: section.name.clone(),
        icon: icon_for(&section.code).to_string(),
        children,
        route: None,
        metadata: NodeMetadata {
            kind: NodeKind::Section,
            system_id: system.system_id,
            system_name: system.system_name.clone(),
            parent_id: None,
        },
    }
}

fn subsection_node(
    subsection: &SubsectionPayload,
    section_id: i64,
    system: &SystemPayload,
) -> NavigationNode {
    NavigationNode {
        id: subsection.id,
        code: subsection.code.clone(),
        label: subsection.name.clone(),
        icon: icon_for(&subsection.code).to_string(),
        children: Vec::new(),
        route: Some(parse_route(subsection.route.as_deref())),
        metadata: NodeMetadata {
            kind: NodeKind::Subsection,
            system_id: system.system_id,
            system_name: system.system_name.clone(),
            parent_id: Some(section_id),
        },
    }
}

/// Strips one leading `/` and splits into segments; empty routes fall back to
/// [`FALLBACK_ROUTE`].
#[must_use]
pub fn parse_route(route: Option<&str>) -> Vec<String> {
    match route.filter(|route| !route.is_empty()) {
        Some(route) => {
            let route = route.strip_prefix('/').unwrap_or(route);
            route.split('/').map(str::to_string).collect()
        }
        None => vec![FALLBACK_ROUTE.to_string()],
    }
}

// stable: equal `orden` keeps payload order
fn sorted_by_order<T>(items: &[T], order: impl Fn(&T) -> i64) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by_key(|item| order(item));
    sorted
}
