use crate::{
    api::ClientConfig,
    context::{AppContext, CacheConfig},
    notify::TracingNotifier,
    session::Session,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::{sync::Arc, time::Duration};

/// Connection and cache settings shared by every subcommand.
#[derive(Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub token: Option<SecretString>,
    pub timeout: Duration,
    pub menu_ttl: Duration,
    pub permissions_ttl: Duration,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String) -> Self {
        let cache = CacheConfig::default();
        Self {
            api_url,
            token: None,
            timeout: crate::api::DEFAULT_TIMEOUT,
            menu_ttl: cache.menu_ttl,
            permissions_ttl: cache.permissions_ttl,
        }
    }

    pub fn set_token(&mut self, token: SecretString) {
        self.token = Some(token);
    }

    /// Builds the application context these settings describe.
    ///
    /// # Errors
    /// Returns an error if the API URL is invalid.
    pub fn context(&self) -> Result<AppContext> {
        AppContext::new(
            &ClientConfig::new(self.api_url.clone()).with_timeout(self.timeout),
            CacheConfig {
                menu_ttl: self.menu_ttl,
                permissions_ttl: self.permissions_ttl,
            },
            Session::new(self.token.clone()),
            Arc::new(TracingNotifier),
        )
        .with_context(|| format!("invalid COTIZACIONES_API_URL: {}", self.api_url))
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .field("menu_ttl", &self.menu_ttl)
            .field("permissions_ttl", &self.permissions_ttl)
            .finish()
    }
}
