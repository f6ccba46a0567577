//! Application state managed via Dioxus context.
//!
//! `AppState` bundles all reactive signals into a single struct provided via
//! `use_context_provider`. Child components retrieve it with `use_context::<AppState>()`.

use crate::storage::BrowserStorage;
use mpfm_api::{ApiClient, ApiConfig, StoredSession, TokenStore};
use mpfm_model::flow::TimeRange;
use mpfm_model::hierarchy::Hierarchy;
use mpfm_view::{DeviceGroups, ExpandedSet, SelectionStore};
use dioxus::prelude::*;

/// Shared dashboard state.
#[derive(Clone, Copy)]
pub struct AppState {
    pub config: Signal<ApiConfig>,
    /// Signed-in session; `None` shows the login form
    pub session: Signal<Option<StoredSession>>,
    /// Hierarchy tree (empty until loaded)
    pub hierarchy: Signal<Hierarchy>,
    /// All devices of the company, bucketed under their wells
    pub groups: Signal<DeviceGroups>,
    /// Ids of expanded sidebar nodes
    pub expanded: Signal<ExpandedSet>,
    pub selection: Signal<SelectionStore>,
    /// Bumped after every selection change or mutation; polling restarts on change
    pub revision: Signal<u64>,
    pub time_range: Signal<TimeRange>,
    /// 1-based page of the device table
    pub device_page: Signal<u32>,
    /// Whether the tree is still loading
    pub loading: Signal<bool>,
    /// Error of the last load shown inline
    pub error_msg: Signal<Option<String>>,
    /// Short-lived message after a form action
    pub notice: Signal<Option<String>>,
}

impl AppState {
    /// Create state for `config`, restoring a stored session when one is
    /// still valid.
    pub fn new(config: ApiConfig) -> Self {
        let session = TokenStore::new(BrowserStorage).session();
        if session.is_some() {
            log::info!("Restored stored session");
        }
        Self {
            config: Signal::new(config),
            session: Signal::new(session),
            hierarchy: Signal::new(Hierarchy::default()),
            groups: Signal::new(DeviceGroups::default()),
            expanded: Signal::new(ExpandedSet::new()),
            selection: Signal::new(SelectionStore::new()),
            revision: Signal::new(0),
            time_range: Signal::new(TimeRange::default()),
            device_page: Signal::new(1),
            loading: Signal::new(true),
            error_msg: Signal::new(None),
            notice: Signal::new(None),
        }
    }

    /// Client carrying the session token, or `None` when signed out.
    pub fn client(&self) -> Option<ApiClient> {
        let token = self.session.peek().as_ref()?.token.clone();
        match ApiClient::new(&self.config.peek()) {
            Ok(client) => Some(client.with_token(token)),
            Err(e) => {
                log::error!("Cannot build API client: {}", e);
                None
            }
        }
    }

    /// Client without a token, for the login and signup forms.
    pub fn anonymous_client(&self) -> Result<ApiClient, mpfm_api::ApiError> {
        ApiClient::new(&self.config.peek())
    }

    /// Ask every polled view to refetch.
    pub fn bump_revision(&mut self) {
        *self.revision.write() += 1;
    }

    /// Forget the session and everything loaded with it.
    pub fn sign_out(&mut self) {
        if let Err(e) = TokenStore::new(BrowserStorage).clear() {
            log::warn!("{}", e);
        }
        self.session.set(None);
        self.hierarchy.set(Hierarchy::default());
        self.groups.set(DeviceGroups::default());
        self.expanded.set(ExpandedSet::new());
        self.selection.write().clear();
        self.device_page.set(1);
        self.loading.set(true);
        self.error_msg.set(None);
        self.bump_revision();
    }
}
