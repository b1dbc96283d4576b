//! Permission records as sent by `GET api/permisos/{section}/{subsection}` and
//! the capability view derived from them.

use crate::api::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const IDS_ERROR: &str = "Error obteniendo IDs de sección y subsección";
pub const LOAD_ERROR: &str = "Error cargando permisos del servidor";

/// Cache key for resolved permission states.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionKey {
    pub section_code: String,
    pub subsection_code: String,
}

impl SectionKey {
    #[must_use]
    pub fn new(section_code: impl Into<String>, subsection_code: impl Into<String>) -> Self {
        Self {
            section_code: section_code.into(),
            subsection_code: subsection_code.into(),
        }
    }
}

/// Cache key for raw permission records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PermissionKey {
    pub section_id: i64,
    pub subsection_id: i64,
}

impl PermissionKey {
    #[must_use]
    pub const fn new(section_id: i64, subsection_id: i64) -> Self {
        Self {
            section_id,
            subsection_id,
        }
    }

    #[must_use]
    pub fn path(&self) -> String {
        format!("api/permisos/{}/{}", self.section_id, self.subsection_id)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PermissionsResponse {
    pub success: Option<bool>,
    pub message: Option<String>,
    pub data: Option<Vec<PermissionRecord>>,
}

impl PermissionsResponse {
    /// Records of a successful answer; a missing or null `data` means none.
    ///
    /// # Errors
    /// Returns `Error::Backend` when the envelope says `success: false`.
    pub fn into_records(self) -> Result<Vec<PermissionRecord>, Error> {
        if self.success == Some(false) {
            return Err(Error::Backend(
                self.message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| LOAD_ERROR.to_string()),
            ));
        }
        Ok(self.data.unwrap_or_default())
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct PermissionRecord {
    pub id: i64,
    #[serde(rename = "codigo", default)]
    pub code: String,
    #[serde(rename = "permisos", default)]
    pub flags: Option<PermissionFlags>,
}

/// Backend capability flags; absent or null flags are denied.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct PermissionFlags {
    pub leer: Option<bool>,
    pub crear: Option<bool>,
    pub actualizar: Option<bool>,
    pub eliminar: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModulePermission {
    pub module_id: i64,
    pub module_code: String,
    pub can_read: bool,
    /// Sourced from the backend's `crear` flag, not `actualizar`.
    pub can_write: bool,
    pub can_update: bool,
    pub can_delete: bool,
    pub permission_codes: BTreeSet<String>,
}

impl ModulePermission {
    #[must_use]
    pub fn from_record(record: &PermissionRecord) -> Self {
        let flags = record.flags.unwrap_or_default();
        Self {
            module_id: record.id,
            module_code: record.code.clone(),
            can_read: flags.leer.unwrap_or(false),
            can_write: flags.crear.unwrap_or(false),
            can_update: flags.actualizar.unwrap_or(false),
            can_delete: flags.eliminar.unwrap_or(false),
            permission_codes: BTreeSet::from([record.code.clone()]),
        }
    }

    /// Read, write or update; delete alone does not grant access.
    #[must_use]
    pub const fn is_accessible(&self) -> bool {
        self.can_read || self.can_write || self.can_update
    }
}

/// Complete snapshot of a permission resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PermissionsState {
    pub loading: bool,
    pub loaded: bool,
    pub error: Option<String>,
    pub modules: Vec<ModulePermission>,
    pub general_codes: Vec<String>,
}

impl PermissionsState {
    #[must_use]
    pub const fn loading() -> Self {
        Self {
            loading: true,
            loaded: false,
            error: None,
            modules: Vec::new(),
            general_codes: Vec::new(),
        }
    }

    #[must_use]
    pub fn ready(records: &[PermissionRecord]) -> Self {
        Self {
            loading: false,
            loaded: true,
            error: None,
            modules: records.iter().map(ModulePermission::from_record).collect(),
            general_codes: records.iter().map(|record| record.code.clone()).collect(),
        }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            loading: false,
            loaded: true,
            error: Some(message.into()),
            modules: Vec::new(),
            general_codes: Vec::new(),
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.loaded
    }
}

impl Default for PermissionsState {
    fn default() -> Self {
        Self::loading()
    }
}
