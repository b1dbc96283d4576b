//! Application context: owns the transport, the session and every cache.
//!
//! Nothing in the crate keeps global state; the shell builds one context at
//! startup and drops or [`AppContext::logout`]s it when the user leaves.

use crate::{
    api::{ApiClient, ClientConfig, Error},
    menu::{MenuService, MenuStore, DEFAULT_MENU_TTL},
    notify::Notifier,
    permissions::{PermissionsHelper, PermissionsService, DEFAULT_PERMISSIONS_TTL},
    session::Session,
};
use std::{sync::Arc, time::Duration};
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    pub menu_ttl: Duration,
    pub permissions_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            menu_ttl: DEFAULT_MENU_TTL,
            permissions_ttl: DEFAULT_PERMISSIONS_TTL,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppContext {
    session: Session,
    client: Arc<ApiClient>,
    menu: MenuService,
    permissions: PermissionsService,
}

impl AppContext {
    /// # Errors
    /// Returns `Error::Config` when the client configuration is invalid.
    pub fn new(
        client_config: &ClientConfig,
        cache: CacheConfig,
        session: Session,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, Error> {
        let client = Arc::new(ApiClient::new(client_config, session.clone(), notifier)?);
        let menu = MenuService::new(Arc::clone(&client), MenuStore::new()).with_ttl(cache.menu_ttl);
        let permissions = PermissionsService::new(Arc::clone(&client), menu.clone())
            .with_ttl(cache.permissions_ttl);

        Ok(Self {
            session,
            client,
            menu,
            permissions,
        })
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub const fn menu(&self) -> &MenuService {
        &self.menu
    }

    #[must_use]
    pub const fn permissions(&self) -> &PermissionsService {
        &self.permissions
    }

    /// Helper for one page; attach callbacks, wrap in `Arc`, then initialize.
    #[must_use]
    pub fn helper(&self, section_code: &str, subsection_code: &str) -> PermissionsHelper {
        PermissionsHelper::new(self.permissions.clone(), section_code, subsection_code)
    }

    /// Forgets the token and every cached menu or permission.
    pub fn logout(&self) {
        self.session.clear();
        self.menu.clear();
        self.permissions.clear_cache();
        self.permissions.clear_records(None);
        info!("session closed, caches cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{notify::TracingNotifier, permissions::PermissionsState};
    use secrecy::SecretString;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[test]
    fn default_ttls() {
        let cache = CacheConfig::default();
        assert_eq!(cache.menu_ttl, Duration::from_secs(600));
        assert_eq!(cache.permissions_ttl, Duration::from_secs(300));
    }

    #[test]
    fn rejects_bad_base_url() {
        let result = AppContext::new(
            &ClientConfig::new("localhost"),
            CacheConfig::default(),
            Session::default(),
            Arc::new(TracingNotifier),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn logout_clears_everything() -> anyhow::Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/permisos/navegacion"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [{"sistema_id": 1, "secciones": [{"id": 1, "codigo": "INICIO", "nombre": "Inicio", "orden": 1,
                    "subsecciones": [{"id": 1, "codigo": "ACCESO", "nombre": "Acceso", "orden": 1, "ruta": "/inicio"}]}]}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/permisos/1/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [
                {"id": 1, "codigo": "GENERAL", "permisos": {"leer": true}}
            ]})))
            .mount(&server)
            .await;

        let context = AppContext::new(
            &ClientConfig::new(format!("{}/", server.uri())),
            CacheConfig::default(),
            Session::new(Some(SecretString::from("token".to_string()))),
            Arc::new(TracingNotifier),
        )?;

        let state = context
            .permissions()
            .get_permissions("INICIO", "ACCESO")
            .wait_for(PermissionsState::is_terminal)
            .await;
        assert_eq!(state.general_codes, vec!["GENERAL"]);
        assert_eq!(context.permissions().cached_states(), 1);
        assert!(!context.menu().store().nodes().is_empty());

        context.logout();

        assert!(!context.session().has_token());
        assert!(context.menu().store().nodes().is_empty());
        assert_eq!(context.permissions().cached_states(), 0);
        assert_eq!(context.permissions().cached_records_count(), 0);
        Ok(())
    }
}
