//! Static catalog of the section, subsection and module codes the console knows
//! about. Pages use it to name the pair they ask permissions for; the backend
//! menu stays the source of truth for what a user actually sees.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogModule {
    pub id: i64,
    pub code: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogSubsection {
    pub id: i64,
    pub code: &'static str,
    pub modules: &'static [CatalogModule],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogSection {
    pub id: i64,
    pub code: &'static str,
    pub subsections: &'static [CatalogSubsection],
}

/// Where a module sits in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ModuleLocation {
    pub section: &'static CatalogSection,
    pub subsection: &'static CatalogSubsection,
    pub module: &'static CatalogModule,
}

const fn module(id: i64, code: &'static str) -> CatalogModule {
    CatalogModule { id, code }
}

const fn leaf(id: i64, code: &'static str) -> CatalogSubsection {
    CatalogSubsection {
        id,
        code,
        modules: &[],
    }
}

pub static NAVIGATION: &[CatalogSection] = &[
    CatalogSection {
        id: 1,
        code: "INICIO",
        subsections: &[leaf(1, "ACCESO")],
    },
    CatalogSection {
        id: 2,
        code: "REPORTES",
        subsections: &[leaf(2, "COTIZACIONES")],
    },
    CatalogSection {
        id: 3,
        code: "COTIZAR",
        subsections: &[
            CatalogSubsection {
                id: 3,
                code: "CREAR",
                modules: &[
                    module(19, "CREACION_INDIVIDUAL"),
                    module(18, "CREACION_MASIVA"),
                ],
            },
            leaf(4, "CONSULTA"),
            CatalogSubsection {
                id: 5,
                code: "DETALLE",
                modules: &[
                    module(1, "GENERAL"),
                    module(2, "COLORES"),
                    module(3, "COMPONENTES"),
                    module(4, "DESCRIPTORES"),
                    module(5, "DIMENSIONES"),
                    module(6, "MINUTAJES"),
                    module(7, "EXTRAS"),
                    module(8, "HILADOS_COLOR"),
                    module(9, "HILADOS_ESPECIALES"),
                    module(10, "RESUMEN"),
                ],
            },
            leaf(6, "CALCULO"),
            leaf(7, "CONFIRMAR"),
            leaf(8, "REVERTIR"),
            leaf(9, "RETIRAR"),
        ],
    },
    CatalogSection {
        id: 4,
        code: "HERRAMIENTAS",
        subsections: &[leaf(10, "VARIABLES"), leaf(11, "PRECIO"), leaf(12, "RUBROS")],
    },
    CatalogSection {
        id: 6,
        code: "ESTILOS",
        subsections: &[leaf(14, "REQUERIMIENTO")],
    },
    CatalogSection {
        id: 19,
        code: "EJEMPLO",
        subsections: &[leaf(51, "EJEMPLO1")],
    },
];

#[must_use]
pub fn section_by_code(code: &str) -> Option<&'static CatalogSection> {
    NAVIGATION.iter().find(|section| section.code == code)
}

#[must_use]
pub fn section_by_id(id: i64) -> Option<&'static CatalogSection> {
    NAVIGATION.iter().find(|section| section.id == id)
}

#[must_use]
pub fn subsections_of(section_code: &str) -> &'static [CatalogSubsection] {
    section_by_code(section_code)
        .map(|section| section.subsections)
        .unwrap_or_default()
}

#[must_use]
pub fn subsection_by_code(
    section_code: &str,
    subsection_code: &str,
) -> Option<&'static CatalogSubsection> {
    subsections_of(section_code)
        .iter()
        .find(|subsection| subsection.code == subsection_code)
}

#[must_use]
pub fn subsection_by_id(id: i64) -> Option<&'static CatalogSubsection> {
    all_subsections().find(|subsection| subsection.id == id)
}

pub fn all_subsections() -> impl Iterator<Item = &'static CatalogSubsection> {
    NAVIGATION
        .iter()
        .flat_map(|section| section.subsections.iter())
}

#[must_use]
pub fn modules_of(section_code: &str, subsection_code: &str) -> &'static [CatalogModule] {
    subsection_by_code(section_code, subsection_code)
        .map(|subsection| subsection.modules)
        .unwrap_or_default()
}

#[must_use]
pub fn module_by_code(
    section_code: &str,
    subsection_code: &str,
    module_code: &str,
) -> Option<&'static CatalogModule> {
    modules_of(section_code, subsection_code)
        .iter()
        .find(|module| module.code == module_code)
}

#[must_use]
pub fn module_by_id(
    section_code: &str,
    subsection_code: &str,
    module_id: i64,
) -> Option<&'static CatalogModule> {
    modules_of(section_code, subsection_code)
        .iter()
        .find(|module| module.id == module_id)
}

/// Searches every subsection for a module id.
#[must_use]
pub fn locate_module(module_id: i64) -> Option<ModuleLocation> {
    NAVIGATION.iter().find_map(|section| {
        section.subsections.iter().find_map(|subsection| {
            subsection
                .modules
                .iter()
                .find(|module| module.id == module_id)
                .map(|module| ModuleLocation {
                    section,
                    subsection,
                    module,
                })
        })
    })
}
