//! Forms for adding, deleting and claiming dishes.

use serde::Deserialize;
use validator::Validate;

use crate::domain::types::DishName;
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
/// Form data for adding a dish to the selected event.
pub struct AddDishForm {
    #[validate(length(min = 1))]
    pub name: String,
}

impl TryFrom<AddDishForm> for DishName {
    type Error = FormError;

    fn try_from(form: AddDishForm) -> Result<Self, Self::Error> {
        form.validate()?;
        DishName::new(form.name).map_err(|_| FormError::InvalidName)
    }
}

#[derive(Debug, Deserialize)]
/// One keystroke of a claim field: the full current text of the input.
pub struct ClaimDishForm {
    #[serde(default)]
    pub value: String,
    /// Increases with every keystroke the browser sends.
    #[serde(default)]
    pub seq: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_dish_requires_a_name() {
        let form = AddDishForm {
            name: String::new(),
        };
        assert!(matches!(DishName::try_from(form), Err(FormError::Validation(_))));

        let form = AddDishForm {
            name: "   ".to_string(),
        };
        assert!(matches!(DishName::try_from(form), Err(FormError::InvalidName)));

        let form = AddDishForm {
            name: " Rolls ".to_string(),
        };
        assert_eq!(DishName::try_from(form).unwrap().as_str(), "Rolls");
    }

    #[test]
    fn empty_claim_value_is_accepted() {
        let form: ClaimDishForm = serde_html_form::from_str("value=").unwrap();
        assert_eq!(form.value, "");
        let form: ClaimDishForm = serde_html_form::from_str("").unwrap();
        assert_eq!(form.value, "");
        assert_eq!(form.seq, None);

        let form: ClaimDishForm = serde_html_form::from_str("value=Al&seq=42").unwrap();
        assert_eq!(form.seq, Some(42));
    }
}
