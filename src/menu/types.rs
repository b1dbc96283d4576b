//! Wire format of `GET api/permisos/navegacion`.

use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MenuResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    #[serde(rename = "mensajeAviso")]
    pub notice: Option<String>,
    #[serde(default)]
    pub data: Vec<SystemPayload>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SystemPayload {
    #[serde(rename = "sistema_id")]
    pub system_id: i64,
    #[serde(rename = "sistema_nombre", default)]
    pub system_name: String,
    #[serde(rename = "secciones", default)]
    pub sections: Vec<SectionPayload>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SectionPayload {
    pub id: i64,
    #[serde(rename = "codigo", default)]
    pub code: String,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "orden", default)]
    pub order: i64,
    #[serde(rename = "subsecciones", default)]
    pub subsections: Vec<SubsectionPayload>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SubsectionPayload {
    pub id: i64,
    #[serde(rename = "codigo", default)]
    pub code: String,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "orden", default)]
    pub order: i64,
    #[serde(rename = "ruta")]
    pub route: Option<String>,
}
