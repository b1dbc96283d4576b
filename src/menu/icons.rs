//! Static code → icon table for navigation nodes.

pub const DEFAULT_ICON: &str = "pi pi-circle";

const SECTION_ICONS: &[(&str, &str)] = &[
    ("INICIO", "pi pi-home"),
    ("COTIZAR", "pi pi-dollar"),
    ("HERRAMIENTAS", "pi pi-cog"),
    ("REPORTES", "pi pi-chart-bar"),
    ("ESTILOS", "pi pi-palette"),
];

const SUBSECTION_ICONS: &[(&str, &str)] = &[
    ("ACCESO", "pi pi-check"),
    ("COTIZACIONES", "pi pi-file-pdf"),
    ("CREAR", "pi pi-plus"),
    ("CONSULTA", "pi pi-search"),
    ("DETALLE", "pi pi-eye"),
    ("CALCULO", "pi pi-calculator"),
    ("CONFIRMAR", "pi pi-check-circle"),
    ("REVERTIR", "pi pi-undo"),
    ("RETIRAR", "pi pi-trash"),
    ("VARIABLES", "pi pi-sliders-h"),
    ("PRECIO", "pi pi-money-bill"),
    ("RUBROS", "pi pi-list"),
    ("USUARIOS", "pi pi-users"),
    ("PERMISOS", "pi pi-shield"),
    ("ROLES", "pi pi-id-card"),
    ("BACKUP", "pi pi-download"),
    ("LOGS", "pi pi-file"),
    ("SISTEMA", "pi pi-desktop"),
    ("NOTIFICACIONES", "pi pi-bell"),
    ("EMAILS", "pi pi-envelope"),
    ("PRODUCTOS", "pi pi-box"),
    ("CLIENTES", "pi pi-user-plus"),
    ("PROVEEDORES", "pi pi-building"),
    ("FACTURAS", "pi pi-receipt"),
    ("PAGOS", "pi pi-credit-card"),
    ("NOMINA", "pi pi-wallet"),
    ("EMPLEADOS", "pi pi-users"),
    ("ASISTENCIA", "pi pi-clock"),
    ("INVENTARIO_ENTRADA", "pi pi-plus-circle"),
    ("INVENTARIO_SALIDA", "pi pi-minus-circle"),
    ("CATALOGO", "pi pi-th-large"),
    ("DASHBOARD", "pi pi-chart-pie"),
    ("CONFIGURACION_GENERAL", "pi pi-cog"),
    ("AUDITORIA", "pi pi-history"),
    ("REQUERIMIENTO", "pi pi-file-edit"),
    ("EJEMPLO", "pi pi-file-edit"),
    ("EJEMPLO1", "pi pi-file-edit"),
];

/// Icon for a section or subsection code. Matching ignores case and
/// surrounding whitespace; section entries win over subsection entries.
#[must_use]
pub fn icon_for(code: &str) -> &'static str {
    let code = code.trim();
    if code.is_empty() {
        return DEFAULT_ICON;
    }

    SECTION_ICONS
        .iter()
        .chain(SUBSECTION_ICONS)
        .find(|(key, _)| key.eq_ignore_ascii_case(code))
        .map_or(DEFAULT_ICON, |&(_, icon)| icon)
}
