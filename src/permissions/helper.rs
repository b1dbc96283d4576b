//! Per-page adapter over [`PermissionsService`].
//!
//! A page builds one helper for its section/subsection pair, calls
//! [`PermissionsHelper::initialize`] when it mounts and
//! [`PermissionsHelper::destroy`] (or just drops the helper) when it goes away.
//! Every check answers `false` until a terminal state has arrived.

use super::{
    checks,
    service::PermissionsService,
    types::{ModulePermission, PermissionsState},
};
use crate::state::Subscription;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tracing::debug;

type LoadedCallback = Box<dyn Fn() + Send + Sync>;
type ModuleCallback = Box<dyn Fn(&ModulePermission) + Send + Sync>;

#[derive(Default)]
struct Callbacks {
    on_permissions_loaded: Option<LoadedCallback>,
    on_first_accessible_module: Option<ModuleCallback>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PermissionsSummary {
    pub loading: bool,
    pub loaded: bool,
    pub error: Option<String>,
    pub has_modules: bool,
}

pub struct PermissionsHelper {
    service: PermissionsService,
    section_code: String,
    subsection_code: String,
    callbacks: Callbacks,
    view: Arc<Mutex<PermissionsState>>,
    subscription: Mutex<Option<Subscription>>,
    initialized: AtomicBool,
    active: Arc<AtomicBool>,
}

impl PermissionsHelper {
    #[must_use]
    pub fn new(
        service: PermissionsService,
        section_code: impl Into<String>,
        subsection_code: impl Into<String>,
    ) -> Self {
        Self {
            service,
            section_code: section_code.into(),
            subsection_code: subsection_code.into(),
            callbacks: Callbacks::default(),
            view: Arc::new(Mutex::new(PermissionsState::loading())),
            subscription: Mutex::new(None),
            initialized: AtomicBool::new(false),
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Called for every terminal state, successful or not.
    #[must_use]
    pub fn on_permissions_loaded(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.callbacks.on_permissions_loaded = Some(Box::new(callback));
        self
    }

    /// Called after a successful load with the first accessible module, if any.
    #[must_use]
    pub fn on_first_accessible_module(
        mut self,
        callback: impl Fn(&ModulePermission) + Send + Sync + 'static,
    ) -> Self {
        self.callbacks.on_first_accessible_module = Some(Box::new(callback));
        self
    }

    /// Subscribes to the permission state for this helper's pair. Repeat calls
    /// and calls after [`Self::destroy`] do nothing.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn initialize(self: &Arc<Self>) {
        if self.initialized.swap(true, Ordering::AcqRel) || !self.active.load(Ordering::Acquire) {
            return;
        }

        let cell = self
            .service
            .get_permissions(&self.section_code, &self.subsection_code);
        let helper = Arc::downgrade(self);
        let subscription = cell.subscribe(move |state| {
            if let Some(helper) = helper.upgrade() {
                helper.apply(state);
            }
        });

        let mut slot = self.subscription.lock();
        if self.active.load(Ordering::Acquire) {
            *slot = Some(subscription);
        }
    }

    /// Stops reacting to state changes. In-flight fetches keep running and
    /// still fill the shared caches.
    pub fn destroy(&self) {
        self.active.store(false, Ordering::Release);
        let subscription = self.subscription.lock().take();
        if let Some(subscription) = subscription {
            debug!(
                section = %self.section_code,
                subsection = %self.subsection_code,
                "permissions helper released"
            );
            subscription.unsubscribe();
        }
    }

    fn apply(&self, state: &PermissionsState) {
        if !self.active.load(Ordering::Acquire) {
            return;
        }
        *self.view.lock() = state.clone();

        if !state.loaded {
            return;
        }
        if let Some(callback) = &self.callbacks.on_permissions_loaded {
            callback();
        }
        if state.error.is_none() {
            self.select_first_accessible_module();
        }
    }

    /// Fires the first-accessible callback for the current modules.
    pub fn select_first_accessible_module(&self) {
        let Some(module) = self.first_accessible_module() else {
            return;
        };
        if let Some(callback) = &self.callbacks.on_first_accessible_module {
            callback(&module);
        }
    }

    fn loaded_view(&self) -> Option<PermissionsState> {
        let view = self.view.lock();
        view.loaded.then(|| view.clone())
    }

    fn check(&self, check: impl FnOnce(&PermissionsState) -> bool) -> bool {
        let view = self.view.lock();
        view.loaded && check(&view)
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.view.lock().loaded
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.view.lock().loading
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.view.lock().error.clone()
    }

    #[must_use]
    pub fn modules(&self) -> Vec<ModulePermission> {
        self.view.lock().modules.clone()
    }

    #[must_use]
    pub fn general_codes(&self) -> Vec<String> {
        self.view.lock().general_codes.clone()
    }

    #[must_use]
    pub fn can_access_module(&self, module_code: &str) -> bool {
        self.check(|view| checks::can_access_module(&view.modules, module_code))
    }

    #[must_use]
    pub fn can_read_module(&self, module_code: &str) -> bool {
        self.check(|view| checks::can_read_module(&view.modules, module_code))
    }

    #[must_use]
    pub fn can_write_module(&self, module_code: &str) -> bool {
        self.check(|view| checks::can_write_module(&view.modules, module_code))
    }

    #[must_use]
    pub fn can_update_module(&self, module_code: &str) -> bool {
        self.check(|view| checks::can_update_module(&view.modules, module_code))
    }

    #[must_use]
    pub fn can_delete_module(&self, module_code: &str) -> bool {
        self.check(|view| checks::can_delete_module(&view.modules, module_code))
    }

    #[must_use]
    pub fn has_permission_for_module(&self, module_code: &str, permission: &str) -> bool {
        self.check(|view| {
            checks::has_permission_for_module(&view.general_codes, module_code, permission)
        })
    }

    #[must_use]
    pub fn accessible_modules(&self) -> Vec<ModulePermission> {
        self.loaded_view().map_or_else(Vec::new, |view| {
            checks::accessible_modules(&view.modules)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    #[must_use]
    pub fn first_accessible_module(&self) -> Option<ModulePermission> {
        let view = self.loaded_view()?;
        checks::select_first_accessible(&view.modules).cloned()
    }

    #[must_use]
    pub fn summary(&self) -> PermissionsSummary {
        let view = self.view.lock();
        PermissionsSummary {
            loading: view.loading,
            loaded: view.loaded,
            error: view.error.clone(),
            has_modules: !view.modules.is_empty(),
        }
    }
}

impl Drop for PermissionsHelper {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl std::fmt::Debug for PermissionsHelper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionsHelper")
            .field("section_code", &self.section_code)
            .field("subsection_code", &self.subsection_code)
            .field("active", &self.active.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
