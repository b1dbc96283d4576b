//! Pure capability checks over a resolved module list.

use super::types::ModulePermission;

fn find<'a>(modules: &'a [ModulePermission], module_code: &str) -> Option<&'a ModulePermission> {
    modules.iter().find(|module| module.module_code == module_code)
}

#[must_use]
pub fn can_access_module(modules: &[ModulePermission], module_code: &str) -> bool {
    find(modules, module_code).is_some_and(ModulePermission::is_accessible)
}

#[must_use]
pub fn can_read_module(modules: &[ModulePermission], module_code: &str) -> bool {
    find(modules, module_code).is_some_and(|module| module.can_read)
}

#[must_use]
pub fn can_write_module(modules: &[ModulePermission], module_code: &str) -> bool {
    find(modules, module_code).is_some_and(|module| module.can_write)
}

#[must_use]
pub fn can_update_module(modules: &[ModulePermission], module_code: &str) -> bool {
    find(modules, module_code).is_some_and(|module| module.can_update)
}

#[must_use]
pub fn can_delete_module(modules: &[ModulePermission], module_code: &str) -> bool {
    find(modules, module_code).is_some_and(|module| module.can_delete)
}

#[must_use]
pub fn accessible_modules(modules: &[ModulePermission]) -> Vec<&ModulePermission> {
    modules
        .iter()
        .filter(|module| module.is_accessible())
        .collect()
}

/// First module, in list order, that can be read, written or updated.
#[must_use]
pub fn select_first_accessible(modules: &[ModulePermission]) -> Option<&ModulePermission> {
    modules.iter().find(|module| module.is_accessible())
}

/// Matches `MODULE_perm`, `MODULE_PERM`, `perm` or `PERM` in the general code list.
#[must_use]
pub fn has_permission_for_module(general_codes: &[String], module_code: &str, permission: &str) -> bool {
    let upper = permission.to_uppercase();
    let scoped = format!("{module_code}_{permission}");
    let scoped_upper = format!("{module_code}_{upper}");

    general_codes.iter().any(|code| {
        *code == scoped || *code == scoped_upper || code == permission || *code == upper
    })
}
