//! Forms for creating and deleting events.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::dish::NewDish;
use crate::domain::event::NewEvent;
use crate::domain::types::{ClaimantName, DishName, EventId, EventName, parse_event_date};
use crate::forms::FormError;
use crate::store::{DraftDish, EventDraft};

/// Create-event form with any number of dish rows.
///
/// Dish rows arrive as repeated `dish_name` / `dish_assigned_to` fields and are
/// paired by position.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateEventForm {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub event_date: String,
    #[serde(default)]
    pub dish_name: Vec<String>,
    #[serde(default)]
    pub dish_assigned_to: Vec<String>,
}

impl CreateEventForm {
    /// Decodes an `application/x-www-form-urlencoded` body with repeated keys.
    pub fn parse(body: &[u8]) -> Result<Self, FormError> {
        serde_html_form::from_bytes(body).map_err(|e| FormError::Malformed(e.to_string()))
    }

    /// Raw field values as the form should be re-rendered.
    pub fn to_draft(&self) -> EventDraft {
        let mut dishes = self
            .dish_name
            .iter()
            .enumerate()
            .map(|(index, name)| DraftDish {
                name: name.clone(),
                assigned_to: self
                    .dish_assigned_to
                    .get(index)
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect::<Vec<_>>();
        if dishes.is_empty() {
            dishes.push(DraftDish::default());
        }

        EventDraft {
            name: self.name.clone(),
            event_date: self.event_date.clone(),
            dishes,
        }
    }
}

/// Validated create-event request.
#[derive(Debug, PartialEq)]
pub struct CreateEventPayload {
    pub name: EventName,
    pub event_date: NaiveDate,
    /// Rows with a non-blank dish name, in form order.
    pub dishes: Vec<(DishName, Option<ClaimantName>)>,
}

impl TryFrom<&CreateEventForm> for CreateEventPayload {
    type Error = FormError;

    fn try_from(form: &CreateEventForm) -> Result<Self, Self::Error> {
        if form.validate().is_err()
            || form.name.trim().is_empty()
            || form.event_date.trim().is_empty()
        {
            return Err(FormError::MissingEventFields);
        }

        let name = EventName::new(form.name.as_str())?;
        let event_date = parse_event_date(&form.event_date)?;

        let dishes = form
            .to_draft()
            .dishes
            .into_iter()
            .filter_map(|row| {
                DishName::new(row.name)
                    .ok()
                    .map(|name| (name, ClaimantName::from_input(&row.assigned_to)))
            })
            .collect();

        Ok(Self {
            name,
            event_date,
            dishes,
        })
    }
}

impl CreateEventPayload {
    pub fn new_event(&self) -> NewEvent {
        NewEvent::new(self.name.clone(), self.event_date)
    }

    /// Dish rows to insert once the event has its identifier.
    pub fn new_dishes(&self, event_id: &EventId) -> Vec<NewDish> {
        self.dishes
            .iter()
            .map(|(name, assigned_to)| {
                NewDish::new(event_id.clone(), name.clone(), assigned_to.clone())
            })
            .collect()
    }
}

/// Deleting an event removes its dishes too, so the browser must confirm.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteEventForm {
    #[serde(default)]
    pub confirm: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thanksgiving() -> CreateEventForm {
        CreateEventForm::parse(
            b"name=Thanksgiving&event_date=2024-11-28\
              &dish_name=Turkey&dish_assigned_to=\
              &dish_name=Pie&dish_assigned_to=Sam\
              &dish_name=++&dish_assigned_to=Nobody",
        )
        .unwrap()
    }

    #[test]
    fn parses_repeated_dish_rows() {
        let form = thanksgiving();
        assert_eq!(form.dish_name, vec!["Turkey", "Pie", "  "]);
        assert_eq!(form.dish_assigned_to, vec!["", "Sam", "Nobody"]);
    }

    #[test]
    fn payload_skips_blank_dishes_and_nulls_blank_claimants() {
        let payload = CreateEventPayload::try_from(&thanksgiving()).unwrap();

        assert_eq!(payload.name.as_str(), "Thanksgiving");
        assert_eq!(
            payload.event_date,
            NaiveDate::from_ymd_opt(2024, 11, 28).unwrap()
        );
        assert_eq!(payload.dishes.len(), 2);
        assert_eq!(payload.dishes[0].0.as_str(), "Turkey");
        assert_eq!(payload.dishes[0].1, None);
        assert_eq!(payload.dishes[1].1.as_deref(), Some("Sam"));
    }

    #[test]
    fn new_dishes_reference_created_event() {
        let payload = CreateEventPayload::try_from(&thanksgiving()).unwrap();
        let event_id = EventId::new("e-42").unwrap();

        let dishes = payload.new_dishes(&event_id);

        assert!(dishes.iter().all(|dish| dish.event_id == event_id));
    }

    #[test]
    fn missing_name_or_date_is_rejected() {
        let form = CreateEventForm::parse(b"name=&event_date=2024-11-28").unwrap();
        assert!(matches!(
            CreateEventPayload::try_from(&form),
            Err(FormError::MissingEventFields)
        ));

        let form = CreateEventForm::parse(b"name=Party").unwrap();
        assert!(matches!(
            CreateEventPayload::try_from(&form),
            Err(FormError::MissingEventFields)
        ));

        let form = CreateEventForm::parse(b"name=+++&event_date=2024-11-28").unwrap();
        assert!(matches!(
            CreateEventPayload::try_from(&form),
            Err(FormError::MissingEventFields)
        ));
    }

    #[test]
    fn malformed_date_is_rejected() {
        let form = CreateEventForm::parse(b"name=Party&event_date=tomorrow").unwrap();
        assert!(matches!(
            CreateEventPayload::try_from(&form),
            Err(FormError::InvalidDate)
        ));
    }

    #[test]
    fn draft_always_has_a_dish_row() {
        let form = CreateEventForm::parse(b"name=Party").unwrap();
        let draft = form.to_draft();
        assert_eq!(draft.name, "Party");
        assert_eq!(draft.dishes, vec![DraftDish::default()]);
    }

    #[test]
    fn delete_requires_explicit_confirmation_flag() {
        let form: DeleteEventForm = serde_html_form::from_str("").unwrap();
        assert!(!form.confirm);
        let form: DeleteEventForm = serde_html_form::from_str("confirm=true").unwrap();
        assert!(form.confirm);
    }
}
