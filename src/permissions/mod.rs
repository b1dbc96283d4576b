pub mod checks;
pub mod helper;
pub mod service;
pub mod types;

pub use checks::select_first_accessible;
pub use helper::{PermissionsHelper, PermissionsSummary};
pub use service::{PermissionsService, DEFAULT_PERMISSIONS_TTL};
pub use types::{
    ModulePermission, PermissionKey, PermissionRecord, PermissionsState, SectionKey,
};
