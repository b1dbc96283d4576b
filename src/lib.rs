//! # Cotizaciones (navigation & permission client)
//!
//! Client-side core of the quotations admin console. The console builds its
//! navigation menu from a backend response and gates every page on per-module
//! permissions; this crate owns that pipeline.
//!
//! ## Pipeline
//!
//! 1. **Menu fetch:** `GET api/permisos/navegacion` returns systems, sections and
//!    subsections. [`menu::MenuService`] sorts them by `orden`, resolves icons and
//!    routes, and publishes the tree into the [`menu::MenuStore`].
//! 2. **Permission resolution:** pages ask [`permissions::PermissionsService`] for a
//!    `(section code, subsection code)` pair. Codes are resolved to numeric ids
//!    through the menu tree, then `GET api/permisos/{section}/{subsection}` is
//!    issued (or reused from cache).
//! 3. **Page adapter:** [`permissions::PermissionsHelper`] subscribes to the
//!    resulting state and exposes simple access checks.
//! 4. **Sidebar:** [`sidebar::SidebarState`] keeps one expanded branch per depth
//!    and follows the active route.
//!
//! ## Caching
//!
//! Menu trees live for 10 minutes, permission sets for 5 minutes. Concurrent
//! requests for the same key share one in-flight call. All caches hang off an
//! explicit [`context::AppContext`]; `logout()` clears them together with the
//! bearer token.

pub mod api;
pub mod catalog;
pub mod cli;
pub mod coalesce;
pub mod context;
pub mod menu;
pub mod notify;
pub mod permissions;
pub mod session;
pub mod sidebar;
pub mod state;

pub use api::Error;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            return;
        }
        assert!(GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_user_agent() {
        assert!(APP_USER_AGENT.starts_with("cotizaciones/"));
    }
}
