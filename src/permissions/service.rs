//! Permission resolution: section codes → ids → backend records → state.
//!
//! Two caches live here. Resolved states are kept per code pair and handed out
//! as observable cells; raw records are kept per id pair, fetched at most once
//! concurrently, and evicted by a delayed task when their TTL runs out.

use super::types::{
    PermissionKey, PermissionRecord, PermissionsResponse, PermissionsState, SectionKey, IDS_ERROR,
    LOAD_ERROR,
};
use crate::{
    api::{ApiClient, Error},
    coalesce::InFlight,
    menu::MenuService,
    state::StateCell,
};
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};
use tracing::{debug, instrument, warn};

/// Default lifetime of permission records and resolved states.
pub const DEFAULT_PERMISSIONS_TTL: Duration = Duration::from_secs(5 * 60);

type Records = Arc<Vec<PermissionRecord>>;
type StateHandle = Arc<StateCell<PermissionsState>>;

#[derive(Debug)]
struct StateEntry {
    cell: StateHandle,
    created_at: Instant,
}

#[derive(Debug)]
struct RecordEntry {
    records: Records,
    stored_at: Instant,
    generation: u64,
}

#[derive(Clone, Debug)]
pub struct PermissionsService {
    client: Arc<ApiClient>,
    menu: MenuService,
    states: Arc<Mutex<HashMap<SectionKey, StateEntry>>>,
    records: Arc<Mutex<HashMap<PermissionKey, RecordEntry>>>,
    in_flight: InFlight<PermissionKey, Records>,
    generation: Arc<AtomicU64>,
    ttl: Duration,
}

impl PermissionsService {
    #[must_use]
    pub fn new(client: Arc<ApiClient>, menu: MenuService) -> Self {
        Self {
            client,
            menu,
            states: Arc::new(Mutex::new(HashMap::new())),
            records: Arc::new(Mutex::new(HashMap::new())),
            in_flight: InFlight::new(),
            generation: Arc::new(AtomicU64::new(0)),
            ttl: DEFAULT_PERMISSIONS_TTL,
        }
    }

    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Observable permission state for a code pair.
    ///
    /// A fresh cached cell is returned as-is; otherwise a new cell starting in
    /// `loading` is cached and resolved on a spawned task. The cell always ends
    /// in a terminal state; failures are reported through `error` and are not
    /// cached.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn get_permissions(&self, section_code: &str, subsection_code: &str) -> StateHandle {
        let key = SectionKey::new(section_code, subsection_code);

        let cell = {
            let mut states = self.states.lock();
            if let Some(entry) = states.get(&key) {
                if entry.created_at.elapsed() < self.ttl {
                    return Arc::clone(&entry.cell);
                }
            }

            let cell = StateCell::new(PermissionsState::loading());
            states.insert(
                key.clone(),
                StateEntry {
                    cell: Arc::clone(&cell),
                    created_at: Instant::now(),
                },
            );
            cell
        };

        let service = self.clone();
        let target = Arc::clone(&cell);
        tokio::spawn(async move { service.resolve(key, target).await });

        cell
    }

    #[instrument(skip_all, fields(section = %key.section_code, subsection = %key.subsection_code))]
    async fn resolve(&self, key: SectionKey, cell: StateHandle) {
        let state = match self
            .menu
            .section_ids(&key.section_code, &key.subsection_code)
            .await
        {
            Err(err) => {
                warn!("{IDS_ERROR}: {err}");
                PermissionsState::failed(IDS_ERROR)
            }
            Ok((section_id, subsection_id)) => {
                match self
                    .fetch_records(PermissionKey::new(section_id, subsection_id))
                    .await
                {
                    Ok(records) => PermissionsState::ready(&records),
                    Err(Error::Backend(message)) => {
                        warn!("permissions rejected by backend: {message}");
                        PermissionsState::failed(message)
                    }
                    Err(err) => {
                        warn!(status = ?err.status(), "{LOAD_ERROR}: {err}");
                        PermissionsState::failed(LOAD_ERROR)
                    }
                }
            }
        };

        // drop failures before publishing so a listener retrying gets a new cell
        if state.error.is_some() {
            let mut states = self.states.lock();
            if states
                .get(&key)
                .is_some_and(|entry| Arc::ptr_eq(&entry.cell, &cell))
            {
                states.remove(&key);
            }
        }

        cell.publish(state);
    }

    /// Raw permission records for an id pair, cached for the TTL.
    ///
    /// # Errors
    /// Returns the transport error or `Error::Backend` for `success: false`.
    pub async fn fetch_records(&self, key: PermissionKey) -> Result<Records, Error> {
        if let Some(records) = self.cached_records(&key) {
            debug!(?key, "permission records served from cache");
            return Ok(records);
        }

        let service = self.clone();
        self.in_flight
            .run(key, move || async move {
                let response: PermissionsResponse = service.client.get_json(&key.path()).await?;
                let records = Arc::new(response.into_records()?);
                service.store_records(key, Arc::clone(&records));
                Ok(records)
            })
            .await
    }

    /// True when any record for the id pair carries `code`.
    ///
    /// # Errors
    /// Same as [`Self::fetch_records`].
    pub async fn has_permission(
        &self,
        section_id: i64,
        subsection_id: i64,
        code: &str,
    ) -> Result<bool, Error> {
        let records = self
            .fetch_records(PermissionKey::new(section_id, subsection_id))
            .await?;
        Ok(records.iter().any(|record| record.code == code))
    }

    /// Drops cached records for one id pair, or all of them.
    pub fn clear_records(&self, key: Option<PermissionKey>) {
        let mut records = self.records.lock();
        match key {
            Some(key) => {
                records.remove(&key);
            }
            None => records.clear(),
        }
    }

    /// Drops every resolved state. Cells already handed out keep their value.
    pub fn clear_cache(&self) {
        self.states.lock().clear();
    }

    #[must_use]
    pub fn cached_states(&self) -> usize {
        self.states.lock().len()
    }

    #[must_use]
    pub fn cached_records_count(&self) -> usize {
        self.records.lock().len()
    }

    fn cached_records(&self, key: &PermissionKey) -> Option<Records> {
        self.records
            .lock()
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| Arc::clone(&entry.records))
    }

    fn store_records(&self, key: PermissionKey, records: Records) {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        self.records.lock().insert(
            key,
            RecordEntry {
                records,
                stored_at: Instant::now(),
                generation,
            },
        );

        let map = Arc::clone(&self.records);
        let ttl = self.ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut records = map.lock();
            // a newer store for the same key owns its own timer
            if records
                .get(&key)
                .is_some_and(|entry| entry.generation == generation)
            {
                records.remove(&key);
                debug!(?key, "permission records expired");
            }
        });
    }
}
