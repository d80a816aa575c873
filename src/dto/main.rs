use serde::Serialize;

use crate::domain::dish::Dish;
use crate::domain::event::Event;
use crate::store::{EventDraft, TrackerSnapshot};

/// Event row of the left-hand list.
#[derive(Debug, Serialize)]
pub struct EventItem {
    #[serde(flatten)]
    pub event: Event,
    pub is_selected: bool,
}

/// Dish card with the value its claim input should display.
#[derive(Debug, Serialize)]
pub struct DishItem {
    #[serde(flatten)]
    pub dish: Dish,
    /// Unsaved draft if the user is typing, otherwise the saved claimant.
    pub claim_value: String,
}

/// Data required to render the tracker page.
#[derive(Debug, Serialize)]
pub struct IndexPageData {
    /// `false` until the first event list has been loaded.
    pub initialized: bool,
    pub events: Vec<EventItem>,
    pub selected: Option<Event>,
    pub dishes: Vec<DishItem>,
    pub show_create_event: bool,
    pub draft: EventDraft,
    pub loading: bool,
}

impl From<TrackerSnapshot> for IndexPageData {
    fn from(snapshot: TrackerSnapshot) -> Self {
        let TrackerSnapshot {
            initialized,
            events,
            selected,
            dishes,
            show_create_event,
            draft,
            loading,
            claim_drafts,
        } = snapshot;

        let events = events
            .into_iter()
            .map(|event| EventItem {
                is_selected: selected.as_ref().is_some_and(|s| s.id == event.id),
                event,
            })
            .collect();

        let dishes = dishes
            .into_iter()
            .map(|dish| DishItem {
                claim_value: claim_drafts
                    .get(&dish.id)
                    .cloned()
                    .unwrap_or_else(|| dish.claimant_or_empty().to_string()),
                dish,
            })
            .collect();

        Self {
            initialized,
            events,
            selected,
            dishes,
            show_create_event,
            draft,
            loading,
        }
    }
}
