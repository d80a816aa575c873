//! In-memory view state of the tracker page.
//!
//! The store is a read cache of the remote tables plus the user's unsaved
//! input. Lists are never patched locally: every mutation is followed by a
//! full re-fetch. Each fetch takes a ticket and its result is only applied if
//! no newer fetch of the same list has been issued since, so a slow response
//! for a previous selection can never overwrite the current one.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;

use crate::domain::dish::Dish;
use crate::domain::event::Event;
use crate::domain::types::{DishId, EventId};
use crate::models::config::DraftPolicy;

pub mod debounce;
pub mod sessions;

pub use debounce::ClaimDebouncer;
pub use sessions::TrackerSessions;

/// One dish row of the create-event form.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct DraftDish {
    pub name: String,
    pub assigned_to: String,
}

/// Unsaved contents of the create-event form.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct EventDraft {
    pub name: String,
    pub event_date: String,
    pub dishes: Vec<DraftDish>,
}

impl Default for EventDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            event_date: String::new(),
            dishes: vec![DraftDish::default()],
        }
    }
}

/// Severity of an alert raised outside of a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertLevel {
    Success,
    Error,
}

/// Alert raised by a background write, shown on the next page render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingAlert {
    pub level: AlertLevel,
    pub message: String,
}

impl PendingAlert {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Error,
            message: message.into(),
        }
    }
}

/// Ticket identifying one dish-list fetch for one selected event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DishFetch {
    pub event_id: EventId,
    pub ticket: u64,
}

#[derive(Debug, Default)]
struct TrackerState {
    initialized: bool,
    events: Vec<Event>,
    selected: Option<Event>,
    dishes: Vec<Dish>,
    show_create_event: bool,
    draft: EventDraft,
    loading: bool,
    claim_drafts: HashMap<DishId, String>,
    /// Highest keystroke sequence seen per dish; survives saved drafts.
    claim_seqs: HashMap<DishId, u64>,
    events_ticket: u64,
    dishes_ticket: u64,
    alerts: Vec<PendingAlert>,
}

/// Consistent copy of the view state used for rendering.
#[derive(Clone, Debug, Default)]
pub struct TrackerSnapshot {
    pub initialized: bool,
    pub events: Vec<Event>,
    pub selected: Option<Event>,
    pub dishes: Vec<Dish>,
    pub show_create_event: bool,
    pub draft: EventDraft,
    pub loading: bool,
    pub claim_drafts: HashMap<DishId, String>,
}

/// Shared view state plus the claim-write timers it owns.
#[derive(Debug)]
pub struct TrackerStore {
    state: Mutex<TrackerState>,
    claims: ClaimDebouncer,
    policy: DraftPolicy,
}

impl TrackerStore {
    pub fn new(policy: DraftPolicy, claim_delay: Duration) -> Self {
        Self {
            state: Mutex::default(),
            claims: ClaimDebouncer::new(claim_delay),
            policy,
        }
    }

    fn state(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn claims(&self) -> &ClaimDebouncer {
        &self.claims
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        let state = self.state();
        TrackerSnapshot {
            initialized: state.initialized,
            events: state.events.clone(),
            selected: state.selected.clone(),
            dishes: state.dishes.clone(),
            show_create_event: state.show_create_event,
            draft: state.draft.clone(),
            loading: state.loading,
            claim_drafts: state.claim_drafts.clone(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.state().initialized
    }

    pub fn selected_event_id(&self) -> Option<EventId> {
        self.state().selected.as_ref().map(|event| event.id.clone())
    }

    pub fn begin_events_fetch(&self) -> u64 {
        let mut state = self.state();
        state.events_ticket += 1;
        state.events_ticket
    }

    /// Stores a fetched event list unless a newer fetch has been issued.
    pub fn apply_events(&self, ticket: u64, events: Vec<Event>) -> bool {
        let mut state = self.state();
        if ticket != state.events_ticket {
            log::debug!("Discarding stale event list (ticket {ticket})");
            return false;
        }
        if let Some(selected) = &state.selected {
            // Keep the selected copy in sync with the refreshed row.
            if let Some(fresh) = events.iter().find(|event| event.id == selected.id) {
                state.selected = Some(fresh.clone());
            }
        }
        state.events = events;
        state.initialized = true;
        true
    }

    /// Marks `event_id` as selected and returns the dish fetch to run for it.
    ///
    /// Returns `None` when the event is not in the current list.
    pub fn select_event(&self, event_id: &EventId) -> Option<DishFetch> {
        let mut state = self.state();
        let event = state
            .events
            .iter()
            .find(|event| &event.id == event_id)
            .cloned()?;

        let switched = state
            .selected
            .as_ref()
            .is_none_or(|current| current.id != event.id);
        if switched {
            state.dishes.clear();
            // Claim inputs only exist for the selected event's dishes, so
            // every draft belongs to the selection being left.
            if self.policy == DraftPolicy::Reset {
                state.claim_drafts.clear();
            }
        }
        state.selected = Some(event);
        state.dishes_ticket += 1;

        Some(DishFetch {
            event_id: event_id.clone(),
            ticket: state.dishes_ticket,
        })
    }

    /// Issues a dish fetch for the current selection, if any.
    pub fn begin_dishes_fetch(&self) -> Option<DishFetch> {
        let mut state = self.state();
        let event_id = state.selected.as_ref()?.id.clone();
        state.dishes_ticket += 1;
        Some(DishFetch {
            event_id,
            ticket: state.dishes_ticket,
        })
    }

    /// Stores a fetched dish list if it still answers the newest fetch.
    pub fn apply_dishes(&self, fetch: &DishFetch, dishes: Vec<Dish>) -> bool {
        let mut state = self.state();
        let current = state
            .selected
            .as_ref()
            .is_some_and(|event| event.id == fetch.event_id);
        if !current || fetch.ticket != state.dishes_ticket {
            log::debug!(
                "Discarding stale dish list for event {} (ticket {})",
                fetch.event_id,
                fetch.ticket
            );
            return false;
        }
        state.dishes = dishes;
        true
    }

    /// Drops a deleted event from the view, clearing the selection if needed.
    pub fn forget_event(&self, event_id: &EventId) {
        let mut state = self.state();
        state.events.retain(|event| &event.id != event_id);
        if state
            .selected
            .as_ref()
            .is_some_and(|event| &event.id == event_id)
        {
            state.selected = None;
            state.dishes.clear();
            state.dishes_ticket += 1;
        }
    }

    pub fn toggle_create_form(&self) -> bool {
        let mut state = self.state();
        state.show_create_event = !state.show_create_event;
        state.show_create_event
    }

    pub fn draft(&self) -> EventDraft {
        self.state().draft.clone()
    }

    pub fn set_draft(&self, draft: EventDraft) {
        let mut state = self.state();
        state.draft = draft;
        state.show_create_event = true;
    }

    /// Empties the create form and closes it.
    pub fn reset_draft(&self) {
        let mut state = self.state();
        state.draft = EventDraft::default();
        state.show_create_event = false;
    }

    /// Claims the loading flag; `false` if a creation is already running.
    pub fn begin_loading(&self) -> bool {
        let mut state = self.state();
        if state.loading {
            return false;
        }
        state.loading = true;
        true
    }

    pub fn finish_loading(&self) {
        self.state().loading = false;
    }

    /// Records a claim keystroke unless a later one for the same dish got here
    /// first. Keystrokes without a sequence number are always taken.
    pub fn accept_claim_keystroke(&self, dish_id: &DishId, value: &str, seq: Option<u64>) -> bool {
        let mut state = self.state();
        if let Some(seq) = seq {
            if state
                .claim_seqs
                .get(dish_id)
                .is_some_and(|latest| *latest >= seq)
            {
                return false;
            }
            state.claim_seqs.insert(dish_id.clone(), seq);
        }
        state
            .claim_drafts
            .insert(dish_id.clone(), value.to_string());
        true
    }

    pub fn claim_draft(&self, dish_id: &DishId) -> Option<String> {
        self.state().claim_drafts.get(dish_id).cloned()
    }

    /// Removes the draft once `written` is persisted, unless it changed since.
    pub fn settle_claim_draft(&self, dish_id: &DishId, written: &str) {
        let mut state = self.state();
        if state
            .claim_drafts
            .get(dish_id)
            .is_some_and(|draft| draft == written)
        {
            state.claim_drafts.remove(dish_id);
        }
    }

    pub fn discard_claim_draft(&self, dish_id: &DishId) {
        self.state().claim_drafts.remove(dish_id);
    }

    pub fn push_alert(&self, alert: PendingAlert) {
        self.state().alerts.push(alert);
    }

    pub fn take_alerts(&self) -> Vec<PendingAlert> {
        std::mem::take(&mut self.state().alerts)
    }

    /// Cancels every pending claim write before the store is released.
    pub fn shutdown(&self) -> usize {
        let cancelled = self.claims.cancel_all();
        if cancelled > 0 {
            log::debug!("Cancelled {cancelled} pending claim writes of one visitor");
        }
        cancelled
    }
}

impl Default for TrackerStore {
    fn default() -> Self {
        Self::new(DraftPolicy::default(), debounce::DEFAULT_CLAIM_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn event(id: &str, day: u32) -> Event {
        Event {
            id: EventId::new(id).unwrap(),
            name: format!("Event {id}"),
            event_date: NaiveDate::from_ymd_opt(2024, 11, day).unwrap(),
            created_at: None,
        }
    }

    fn dish(id: &str, event_id: &str) -> Dish {
        Dish {
            id: DishId::new(id).unwrap(),
            event_id: EventId::new(event_id).unwrap(),
            name: format!("Dish {id}"),
            assigned_to: None,
            created_at: None,
        }
    }

    fn store_with_events(policy: DraftPolicy) -> TrackerStore {
        let store = TrackerStore::new(policy, Duration::from_millis(500));
        let ticket = store.begin_events_fetch();
        assert!(store.apply_events(ticket, vec![event("a", 2), event("b", 1)]));
        store
    }

    fn id(value: &str) -> EventId {
        EventId::new(value).unwrap()
    }

    #[test]
    fn applying_events_initializes_the_store() {
        let store = TrackerStore::default();
        assert!(!store.is_initialized());
        let ticket = store.begin_events_fetch();
        store.apply_events(ticket, vec![event("a", 2)]);
        assert!(store.is_initialized());
        assert_eq!(store.snapshot().events.len(), 1);
    }

    #[test]
    fn older_event_fetch_is_discarded() {
        let store = TrackerStore::default();
        let first = store.begin_events_fetch();
        let second = store.begin_events_fetch();

        assert!(store.apply_events(second, vec![event("new", 3)]));
        assert!(!store.apply_events(first, vec![event("old", 1)]));
        assert_eq!(store.snapshot().events[0].id, id("new"));
    }

    #[test]
    fn selecting_unknown_event_returns_none() {
        let store = store_with_events(DraftPolicy::Reset);
        assert_eq!(store.select_event(&id("zzz")), None);
        assert!(store.selected_event_id().is_none());
    }

    #[test]
    fn stale_dish_fetch_cannot_overwrite_newer_selection() {
        let store = store_with_events(DraftPolicy::Reset);

        let fetch_a = store.select_event(&id("a")).unwrap();
        let fetch_b = store.select_event(&id("b")).unwrap();

        assert!(store.apply_dishes(&fetch_b, vec![dish("b1", "b")]));
        assert!(!store.apply_dishes(&fetch_a, vec![dish("a1", "a")]));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.dishes, vec![dish("b1", "b")]);
        assert_eq!(snapshot.selected.unwrap().id, id("b"));
    }

    #[test]
    fn switching_events_clears_previous_dishes() {
        let store = store_with_events(DraftPolicy::Reset);
        let fetch = store.select_event(&id("a")).unwrap();
        store.apply_dishes(&fetch, vec![dish("a1", "a")]);

        store.select_event(&id("b")).unwrap();

        assert!(store.snapshot().dishes.is_empty());
    }

    #[test]
    fn reset_policy_discards_drafts_on_switch() {
        let store = store_with_events(DraftPolicy::Reset);
        let fetch = store.select_event(&id("a")).unwrap();
        store.apply_dishes(&fetch, vec![dish("a1", "a"), dish("a2", "a")]);
        store.accept_claim_keystroke(&DishId::new("a1").unwrap(), "Al", None);
        store.accept_claim_keystroke(&DishId::new("a2").unwrap(), "Bo", None);

        store.select_event(&id("b")).unwrap();

        assert!(store.snapshot().claim_drafts.is_empty());
    }

    #[test]
    fn preserve_policy_keeps_drafts_on_switch() {
        let store = store_with_events(DraftPolicy::Preserve);
        store.select_event(&id("a")).unwrap();
        store.accept_claim_keystroke(&DishId::new("a1").unwrap(), "Al", None);

        store.select_event(&id("b")).unwrap();

        assert_eq!(
            store.claim_draft(&DishId::new("a1").unwrap()),
            Some("Al".to_string())
        );
    }

    #[test]
    fn reselecting_same_event_keeps_drafts_and_dishes() {
        let store = store_with_events(DraftPolicy::Reset);
        let fetch = store.select_event(&id("a")).unwrap();
        store.apply_dishes(&fetch, vec![dish("a1", "a")]);
        store.accept_claim_keystroke(&DishId::new("a1").unwrap(), "Al", None);

        store.select_event(&id("a")).unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.dishes.len(), 1);
        assert_eq!(snapshot.claim_drafts.len(), 1);
    }

    #[test]
    fn forgetting_selected_event_clears_view_and_invalidates_fetches() {
        let store = store_with_events(DraftPolicy::Reset);
        let fetch = store.select_event(&id("a")).unwrap();
        store.apply_dishes(&fetch, vec![dish("a1", "a")]);
        let in_flight = store.begin_dishes_fetch().unwrap();

        store.forget_event(&id("a"));

        let snapshot = store.snapshot();
        assert!(snapshot.selected.is_none());
        assert!(snapshot.dishes.is_empty());
        assert_eq!(snapshot.events.len(), 1);
        assert!(!store.apply_dishes(&in_flight, vec![dish("a1", "a")]));
    }

    #[test]
    fn forgetting_other_event_keeps_selection() {
        let store = store_with_events(DraftPolicy::Reset);
        store.select_event(&id("a")).unwrap();
        store.forget_event(&id("b"));
        assert_eq!(store.selected_event_id(), Some(id("a")));
    }

    #[test]
    fn settle_keeps_newer_draft() {
        let store = TrackerStore::default();
        let dish_id = DishId::new("d").unwrap();

        store.accept_claim_keystroke(&dish_id, "Alice", None);
        store.settle_claim_draft(&dish_id, "Al");
        assert_eq!(store.claim_draft(&dish_id), Some("Alice".to_string()));

        store.settle_claim_draft(&dish_id, "Alice");
        assert_eq!(store.claim_draft(&dish_id), None);
    }

    #[test]
    fn late_keystroke_does_not_replace_newer_one() {
        let store = TrackerStore::default();
        let dish_id = DishId::new("d").unwrap();

        assert!(store.accept_claim_keystroke(&dish_id, "Alice", Some(5)));
        assert!(!store.accept_claim_keystroke(&dish_id, "Al", Some(4)));
        assert!(!store.accept_claim_keystroke(&dish_id, "Ali", Some(5)));
        assert_eq!(store.claim_draft(&dish_id), Some("Alice".to_string()));

        // Still rejected once the newer value has been saved.
        store.settle_claim_draft(&dish_id, "Alice");
        assert!(!store.accept_claim_keystroke(&dish_id, "Al", Some(4)));
        assert_eq!(store.claim_draft(&dish_id), None);

        assert!(store.accept_claim_keystroke(&dish_id, "Bo", None));
        assert!(store.accept_claim_keystroke(&dish_id, "Bob", Some(6)));
        assert_eq!(store.claim_draft(&dish_id), Some("Bob".to_string()));
    }

    #[test]
    fn loading_flag_is_exclusive() {
        let store = TrackerStore::default();
        assert!(store.begin_loading());
        assert!(!store.begin_loading());
        store.finish_loading();
        assert!(store.begin_loading());
    }

    #[test]
    fn draft_lifecycle() {
        let store = TrackerStore::default();
        assert_eq!(store.draft().dishes.len(), 1);
        assert!(store.toggle_create_form());

        let mut draft = store.draft();
        draft.name = "Picnic".to_string();
        draft.dishes.push(DraftDish::default());
        store.set_draft(draft);
        assert_eq!(store.draft().dishes.len(), 2);

        store.reset_draft();
        let snapshot = store.snapshot();
        assert_eq!(snapshot.draft, EventDraft::default());
        assert!(!snapshot.show_create_event);
    }

    #[test]
    fn alerts_are_taken_once() {
        let store = TrackerStore::default();
        store.push_alert(PendingAlert::error("Error updating assignment"));
        assert_eq!(store.take_alerts().len(), 1);
        assert!(store.take_alerts().is_empty());
    }
}
