//! Admin collection view.
//!
//! ```text
//! Idle --load--> Loading --ok--> Ready
//!                       \--err--> Failed
//! ```
//!
//! The list is fetched once per activation and held in memory. The visible
//! rows are a pure function of that list and the search string, recomputed
//! on every call to [`CollectionController::visible`].
//!
//! Every activation gets a generation number. A fetch remembers the
//! generation it started under; if the view has been deactivated or
//! re-activated by the time the response arrives, the response is dropped.
//! Within one activation only one fetch may be in flight.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, instrument, warn};

use admin_portal_core::{AdminId, AdminRecord};

use crate::api::AdminApi;
use crate::error::ClientError;
use crate::notify::{Notification, Notifier};
use crate::session::SessionContext;

/// Fetch state of the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Result of a [`CollectionController::load`] call that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The list was replaced with this many records.
    Loaded(usize),
    /// A fetch for this activation is already running; nothing was sent.
    AlreadyLoading,
    /// The activation ended before the response arrived; it was discarded.
    Stale,
}

/// Handle tying a fetch to one activation of the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation(u64);

#[derive(Debug, Default)]
struct Inner {
    generation: u64,
    active: bool,
    in_flight: bool,
    state: LoadState,
    admins: Vec<AdminRecord>,
    search: String,
}

impl Inner {
    const fn is_current(&self, activation: Activation) -> bool {
        self.active && self.generation == activation.0
    }
}

/// Controller behind the home screen's admin list.
pub struct CollectionController {
    api: Arc<dyn AdminApi>,
    session: SessionContext,
    notifier: Arc<dyn Notifier>,
    inner: Mutex<Inner>,
}

impl std::fmt::Debug for CollectionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("CollectionController")
            .field("state", &inner.state)
            .field("records", &inner.admins.len())
            .field("search", &inner.search)
            .finish_non_exhaustive()
    }
}

impl CollectionController {
    #[must_use]
    pub fn new(
        api: Arc<dyn AdminApi>,
        session: SessionContext,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            session,
            notifier,
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new activation of the view.
    ///
    /// Any fetch still running for a previous activation becomes stale. The
    /// list is cleared; the search string is kept.
    pub fn activate(&self) -> Activation {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.active = true;
        inner.in_flight = false;
        inner.state = LoadState::Idle;
        inner.admins.clear();
        debug!(generation = inner.generation, "Collection view activated");
        Activation(inner.generation)
    }

    /// End the current activation. Outstanding fetches will be discarded.
    pub fn deactivate(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.active = false;
        inner.in_flight = false;
        if inner.state == LoadState::Loading {
            inner.state = LoadState::Idle;
        }
        debug!(generation = inner.generation, "Collection view deactivated");
    }

    /// Fetch the admin list for `activation`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Authorization`] if no session is stored; no request is sent
    /// - any error from [`AdminApi::list_admins`]
    ///
    /// Errors for a stale activation are not reported; they resolve to
    /// [`LoadOutcome::Stale`].
    #[instrument(skip(self))]
    pub async fn load(&self, activation: Activation) -> Result<LoadOutcome, ClientError> {
        {
            let mut inner = self.lock();
            if !inner.is_current(activation) {
                return Ok(LoadOutcome::Stale);
            }
            if inner.in_flight {
                debug!("Fetch already in flight, ignoring trigger");
                return Ok(LoadOutcome::AlreadyLoading);
            }
            inner.in_flight = true;
            inner.state = LoadState::Loading;
        }

        let result = match self.session.token().await {
            Ok(token) => self.api.list_admins(&token).await,
            Err(e) => Err(e),
        };

        let mut inner = self.lock();
        if !inner.is_current(activation) {
            debug!("Dropping response for ended activation");
            return Ok(LoadOutcome::Stale);
        }
        inner.in_flight = false;

        match result {
            Ok(admins) => {
                let count = admins.len();
                inner.admins = admins;
                inner.state = LoadState::Ready;
                debug!(count, "Collection ready");
                Ok(LoadOutcome::Loaded(count))
            }
            Err(err) => {
                inner.admins.clear();
                inner.state = LoadState::Failed;
                drop(inner);
                warn!(error = %err, "Failed to load admins");
                self.notifier.notify(Notification::from_error(&err));
                Err(err)
            }
        }
    }

    /// Current fetch state.
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.lock().state
    }

    /// Whether the loading indicator should be shown.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lock().state == LoadState::Loading
    }

    /// Replace the search string.
    pub fn set_search(&self, query: impl Into<String>) {
        self.lock().search = query.into();
    }

    /// Current search string.
    #[must_use]
    pub fn search(&self) -> String {
        self.lock().search.clone()
    }

    /// Number of fetched records, before filtering.
    #[must_use]
    pub fn total(&self) -> usize {
        self.lock().admins.len()
    }

    /// Records matching the current search, in fetch order.
    ///
    /// Empty unless the state is [`LoadState::Ready`].
    #[must_use]
    pub fn visible(&self) -> Vec<AdminRecord> {
        let inner = self.lock();
        if inner.state != LoadState::Ready {
            return Vec::new();
        }
        filter_admins(&inner.admins, &inner.search)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Hand a record to the editor. No request is made.
    #[must_use]
    pub fn edit(&self, id: &AdminId) -> Option<AdminRecord> {
        self.lock()
            .admins
            .iter()
            .find(|record| record.id.as_ref() == Some(id))
            .cloned()
    }
}

/// Records whose name, email or restaurant name contains `query`,
/// ignoring case. An empty query returns every record.
#[must_use]
pub fn filter_admins<'a>(admins: &'a [AdminRecord], query: &str) -> Vec<&'a AdminRecord> {
    let needle = query.to_lowercase();
    admins
        .iter()
        .filter(|record| record.matches_lowercase(&needle))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notify::QueuedNotifier;
    use crate::store::{CredentialStore, MemoryStore, keys};
    use crate::testing::{ApiCall, FakeApi};

    fn admin(id: &str, name: &str, email: &str, restaurant: &str) -> AdminRecord {
        AdminRecord {
            id: Some(AdminId::new(id)),
            name: name.to_owned(),
            email: email.to_owned(),
            restaurant_name: restaurant.to_owned(),
            ..AdminRecord::default()
        }
    }

    fn sample() -> Vec<AdminRecord> {
        vec![
            admin("1", "John Doe", "john@example.com", "Munchies"),
            admin("2", "Jane Smith", "jane@example.com", "Food Palace"),
            admin("3", "Ravi Kumar", "ravi@curry.io", "Spice Route"),
        ]
    }

    struct Harness {
        api: Arc<FakeApi>,
        store: Arc<MemoryStore>,
        notifier: Arc<QueuedNotifier>,
        controller: CollectionController,
    }

    async fn harness(signed_in: bool) -> Harness {
        let api = Arc::new(FakeApi::default());
        let store = Arc::new(MemoryStore::new());
        if signed_in {
            store.set(keys::TOKEN, "t1").await.unwrap();
        }
        let notifier = Arc::new(QueuedNotifier::new());
        let controller = CollectionController::new(
            api.clone(),
            SessionContext::new(store.clone()),
            notifier.clone(),
        );
        Harness {
            api,
            store,
            notifier,
            controller,
        }
    }

    fn names(records: &[AdminRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_filter_empty_query_returns_all() {
        let admins = sample();
        assert_eq!(filter_admins(&admins, "").len(), admins.len());
    }

    #[test]
    fn test_filter_matches_any_of_three_fields() {
        let admins = sample();
        let by_name: Vec<_> = filter_admins(&admins, "JANE").into_iter().cloned().collect();
        assert_eq!(names(&by_name), vec!["Jane Smith"]);

        let by_email: Vec<_> = filter_admins(&admins, "curry.io").into_iter().cloned().collect();
        assert_eq!(names(&by_email), vec!["Ravi Kumar"]);

        let by_restaurant: Vec<_> = filter_admins(&admins, "palace").into_iter().cloned().collect();
        assert_eq!(names(&by_restaurant), vec!["Jane Smith"]);

        let shared: Vec<_> = filter_admins(&admins, "example").into_iter().cloned().collect();
        assert_eq!(names(&shared), vec!["John Doe", "Jane Smith"]);

        assert!(filter_admins(&admins, "nobody").is_empty());
    }

    #[test]
    fn test_filter_is_exact_subset_for_every_query() {
        let admins = sample();
        for query in ["", "j", "o", "e", "EXAMPLE", "route", "zz", "a@"] {
            let filtered = filter_admins(&admins, query);
            let expected: Vec<&AdminRecord> = admins
                .iter()
                .filter(|r| {
                    let q = query.to_lowercase();
                    r.name.to_lowercase().contains(&q)
                        || r.email.to_lowercase().contains(&q)
                        || r.restaurant_name.to_lowercase().contains(&q)
                })
                .collect();
            assert_eq!(filtered.len(), expected.len(), "query {query:?}");
            for (got, want) in filtered.iter().zip(expected.iter()) {
                assert_eq!(got.id, want.id);
            }
        }
    }

    #[tokio::test]
    async fn test_load_then_search() {
        let h = harness(true).await;
        h.api.push_list(Ok(sample()));

        let activation = h.controller.activate();
        assert_eq!(h.controller.state(), LoadState::Idle);
        let outcome = h.controller.load(activation).await.unwrap();

        assert_eq!(outcome, LoadOutcome::Loaded(3));
        assert_eq!(h.controller.state(), LoadState::Ready);
        assert!(!h.controller.is_loading());
        assert_eq!(h.controller.visible().len(), 3);

        h.controller.set_search("munch");
        assert_eq!(names(&h.controller.visible()), vec!["John Doe"]);
        h.controller.set_search("");
        assert_eq!(h.controller.visible().len(), 3);

        assert_eq!(
            h.api.calls(),
            vec![ApiCall::List {
                token: "t1".to_string()
            }]
        );
        assert!(h.notifier.drain().is_empty());
    }

    #[tokio::test]
    async fn test_network_failure_leaves_empty_failed_list() {
        let h = harness(true).await;
        h.api.push_list(Err(ClientError::Network("connection refused".to_string())));

        let activation = h.controller.activate();
        let result = h.controller.load(activation).await;

        assert!(matches!(result, Err(ClientError::Network(_))));
        assert_eq!(h.controller.state(), LoadState::Failed);
        assert!(h.controller.visible().is_empty());
        assert!(!h.controller.is_loading());
        assert_eq!(h.notifier.drain().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_token_fails_fast() {
        let h = harness(false).await;

        let activation = h.controller.activate();
        let result = h.controller.load(activation).await;

        assert!(matches!(result, Err(ClientError::Authorization(_))));
        assert!(h.api.calls().is_empty());
        assert_eq!(h.controller.state(), LoadState::Failed);
        assert!(h.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_second_trigger_while_loading_is_ignored() {
        let h = harness(true).await;
        let gate = h.api.gate_list();
        h.api.push_list(Ok(sample()));

        let activation = h.controller.activate();
        let first = h.controller.load(activation);
        let second = async {
            tokio::task::yield_now().await;
            assert!(h.controller.is_loading());
            let outcome = h.controller.load(activation).await;
            gate.add_permits(1);
            outcome
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first.unwrap(), LoadOutcome::Loaded(3));
        assert_eq!(second.unwrap(), LoadOutcome::AlreadyLoading);
        assert_eq!(h.api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_response_after_deactivate_is_dropped() {
        let h = harness(true).await;
        let gate = h.api.gate_list();
        h.api.push_list(Ok(sample()));

        let activation = h.controller.activate();
        let load = h.controller.load(activation);
        let leave = async {
            tokio::task::yield_now().await;
            h.controller.deactivate();
            gate.add_permits(1);
        };
        let (outcome, ()) = tokio::join!(load, leave);

        assert_eq!(outcome.unwrap(), LoadOutcome::Stale);
        assert_eq!(h.controller.state(), LoadState::Idle);
        assert_eq!(h.controller.total(), 0);
    }

    #[tokio::test]
    async fn test_stale_failure_is_not_notified() {
        let h = harness(true).await;
        let gate = h.api.gate_list();
        h.api.push_list(Err(ClientError::Network("timeout".to_string())));

        let old = h.controller.activate();
        let load = h.controller.load(old);
        let reactivate = async {
            tokio::task::yield_now().await;
            let fresh = h.controller.activate();
            gate.add_permits(1);
            fresh
        };
        let (outcome, fresh) = tokio::join!(load, reactivate);

        assert_eq!(outcome.unwrap(), LoadOutcome::Stale);
        assert!(h.notifier.drain().is_empty());
        assert_ne!(old, fresh);
        assert_eq!(h.controller.state(), LoadState::Idle);
    }

    #[tokio::test]
    async fn test_load_with_old_activation_is_stale() {
        let h = harness(true).await;
        let old = h.controller.activate();
        let _fresh = h.controller.activate();

        assert_eq!(h.controller.load(old).await.unwrap(), LoadOutcome::Stale);
        assert!(h.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_edit_hands_off_full_record() {
        let h = harness(true).await;
        let mut records = sample();
        if let Some(first) = records.first_mut() {
            first.phone = "123-456-7890".to_owned();
        }
        h.api.push_list(Ok(records));
        let activation = h.controller.activate();
        h.controller.load(activation).await.unwrap();

        let record = h.controller.edit(&AdminId::new("1")).unwrap();
        assert_eq!(record.phone, "123-456-7890");
        assert!(h.controller.edit(&AdminId::new("999")).is_none());
        assert_eq!(h.api.calls().len(), 1);
    }
}
