use crate::{
    cli::globals::GlobalArgs,
    permissions::{ModulePermission, PermissionsState},
};
use anyhow::{anyhow, Result};
use serde_json::json;
use std::{fmt::Write as _, sync::Arc};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub section: String,
    pub subsection: String,
    pub json: bool,
}

/// Resolve permissions for one section/subsection pair and print them.
/// # Errors
/// Returns an error if the context cannot be built or resolution ends in an error state.
pub async fn execute(args: Args) -> Result<()> {
    let context = args.globals.context()?;

    let helper = context
        .helper(&args.section, &args.subsection)
        .on_permissions_loaded(|| info!("permissions loaded"))
        .on_first_accessible_module(|module| {
            info!(module = %module.module_code, "first accessible module");
        });
    let helper = Arc::new(helper);
    helper.initialize();

    let state = context
        .permissions()
        .get_permissions(&args.section, &args.subsection)
        .wait_for(PermissionsState::is_terminal)
        .await;
    helper.destroy();

    if let Some(error) = &state.error {
        return Err(anyhow!("{error}"));
    }

    if args.json {
        let body = json!({
            "summary": helper.summary(),
            "first_accessible": helper.first_accessible_module(),
            "state": &*state,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print!("{}", render_modules(&state.modules));
    }
    Ok(())
}

fn flag(granted: bool, letter: char) -> char {
    if granted {
        letter
    } else {
        '-'
    }
}

/// `rwud` capability columns per module.
#[must_use]
pub fn render_modules(modules: &[ModulePermission]) -> String {
    let mut out = String::new();
    for module in modules {
        let _ = writeln!(
            out,
            "{}{}{}{} {} {}",
            flag(module.can_read, 'r'),
            flag(module.can_write, 'w'),
            flag(module.can_update, 'u'),
            flag(module.can_delete, 'd'),
            module.module_id,
            module.module_code
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::PermissionRecord;

    #[test]
    fn renders_capability_columns() -> Result<()> {
        let records: Vec<PermissionRecord> = serde_json::from_value(json!([
            {"id": 1, "codigo": "GENERAL", "permisos": {"leer": true}},
            {"id": 2, "codigo": "COLORES", "permisos": {"crear": true, "eliminar": true}}
        ]))?;
        let state = PermissionsState::ready(&records);

        assert_eq!(render_modules(&state.modules), "r--- 1 GENERAL\n-w-d 2 COLORES\n");
        Ok(())
    }
}
