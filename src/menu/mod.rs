pub mod icons;
pub mod node;
pub mod service;
pub mod store;
pub mod types;

pub use node::{build_tree, parse_route, NavigationNode, NodeKind, NodeMetadata};
pub use service::MenuService;
pub use store::{MenuSnapshot, MenuStore, DEFAULT_MENU_TTL};
