//! Requisition event domain model.
//!
//! # Responsibility
//! - Define the canonical record for one needle requisition.
//! - Parse raw form input into a validated, insertable shape.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused.
//! - `quantity` is always a positive integer.
//! - `occurred_on` is a calendar date without time component.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned row identifier.
pub type EventId = i64;

/// ISO date format used for persistence and form input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Needle manufacturer a requisition is booked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Groz-Beckert")]
    GrozBeckert,
    #[serde(rename = "Neetex")]
    Neetex,
}

impl Category {
    /// Every known category, in chart tab order.
    pub const ALL: [Category; 2] = [Category::Neetex, Category::GrozBeckert];

    /// Stored and displayed name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GrozBeckert => "Groz-Beckert",
            Self::Neetex => "Neetex",
        }
    }

    /// Lowercase file-name friendly identifier.
    pub fn slug(self) -> &'static str {
        match self {
            Self::GrozBeckert => "groz-beckert",
            Self::Neetex => "neetex",
        }
    }

    /// Parses a stored name or slug. Matching ignores ASCII case.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| {
                category.as_str().eq_ignore_ascii_case(trimmed)
                    || category.slug().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| ValidationError::UnknownCategory(trimmed.to_string()))
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Needle heel height ("talão") of a requisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Subcategory {
    Alto,
    Baixo,
}

impl Subcategory {
    pub const ALL: [Subcategory; 2] = [Subcategory::Alto, Subcategory::Baixo];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alto => "Alto",
            Self::Baixo => "Baixo",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|subcategory| subcategory.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::UnknownSubcategory(trimmed.to_string()))
    }
}

impl Display for Subcategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for requisition input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required form field was blank.
    EmptyField(&'static str),
    /// Quantity is not an integer in `1..=u32::MAX`.
    InvalidQuantity(String),
    UnknownCategory(String),
    UnknownSubcategory(String),
    /// Date is not a valid `YYYY-MM-DD` calendar date.
    InvalidDate(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "required field `{field}` is empty"),
            Self::InvalidQuantity(value) => {
                write!(f, "quantity must be a positive integer, got `{value}`")
            }
            Self::UnknownCategory(value) => write!(f, "unknown category `{value}`"),
            Self::UnknownSubcategory(value) => write!(f, "unknown subcategory `{value}`"),
            Self::InvalidDate(value) => {
                write!(f, "date must be a valid YYYY-MM-DD value, got `{value}`")
            }
        }
    }
}

impl Error for ValidationError {}

/// Requisition not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRequisition {
    pub quantity: u32,
    pub category: Category,
    pub subcategory: Subcategory,
    pub occurred_on: NaiveDate,
}

impl NewRequisition {
    pub fn new(
        quantity: u32,
        category: Category,
        subcategory: Subcategory,
        occurred_on: NaiveDate,
    ) -> Self {
        Self {
            quantity,
            category,
            subcategory,
            occurred_on,
        }
    }

    /// Checks write-path invariants.
    ///
    /// # Errors
    /// - Returns `InvalidQuantity` when `quantity == 0`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.quantity == 0 {
            return Err(ValidationError::InvalidQuantity("0".to_string()));
        }
        Ok(())
    }
}

/// Persisted requisition event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequisitionEvent {
    pub id: EventId,
    pub quantity: u32,
    pub category: Category,
    pub subcategory: Subcategory,
    pub occurred_on: NaiveDate,
}

impl RequisitionEvent {
    /// Returns the insertable part of this event, without its id.
    pub fn to_new(&self) -> NewRequisition {
        NewRequisition::new(
            self.quantity,
            self.category,
            self.subcategory,
            self.occurred_on,
        )
    }
}

/// Raw values as typed into the entry form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequisitionForm {
    pub quantity: String,
    pub category: String,
    pub subcategory: String,
    pub date: String,
}

impl RequisitionForm {
    /// Parses the form into a validated requisition.
    ///
    /// Blank fields are reported before any value is parsed, in form order.
    pub fn parse(&self) -> Result<NewRequisition, ValidationError> {
        let quantity = required("quantity", &self.quantity)?;
        let category = required("category", &self.category)?;
        let subcategory = required("subcategory", &self.subcategory)?;
        let date = required("date", &self.date)?;

        let requisition = NewRequisition {
            quantity: parse_quantity(quantity)?,
            category: Category::parse(category)?,
            subcategory: Subcategory::parse(subcategory)?,
            occurred_on: parse_date(date)?,
        };
        requisition.validate()?;
        Ok(requisition)
    }
}

/// Parses a quantity string into a positive count.
pub fn parse_quantity(value: &str) -> Result<u32, ValidationError> {
    let trimmed = value.trim();
    match trimmed.parse::<u32>() {
        Ok(0) | Err(_) => Err(ValidationError::InvalidQuantity(trimmed.to_string())),
        Ok(quantity) => Ok(quantity),
    }
}

/// Parses an ISO `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(trimmed.to_string()))
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::{parse_date, parse_quantity, Category, RequisitionForm, Subcategory, ValidationError};

    fn form(quantity: &str, category: &str, subcategory: &str, date: &str) -> RequisitionForm {
        RequisitionForm {
            quantity: quantity.to_string(),
            category: category.to_string(),
            subcategory: subcategory.to_string(),
            date: date.to_string(),
        }
    }

    #[test]
    fn parses_complete_form() {
        let parsed = form(" 12 ", "Neetex", "alto", "2023-04-05")
            .parse()
            .expect("form should parse");
        assert_eq!(parsed.quantity, 12);
        assert_eq!(parsed.category, Category::Neetex);
        assert_eq!(parsed.subcategory, Subcategory::Alto);
        assert_eq!(parsed.occurred_on.to_string(), "2023-04-05");
    }

    #[test]
    fn reports_first_blank_field() {
        let err = form("", "", "Alto", "2023-01-01").parse().unwrap_err();
        assert_eq!(err, ValidationError::EmptyField("quantity"));

        let err = form("3", "Neetex", "  ", "2023-01-01").parse().unwrap_err();
        assert_eq!(err, ValidationError::EmptyField("subcategory"));
    }

    #[test]
    fn quantity_must_be_positive_integer() {
        assert_eq!(parse_quantity("7"), Ok(7));
        assert!(matches!(
            parse_quantity("0"),
            Err(ValidationError::InvalidQuantity(_))
        ));
        assert!(matches!(
            parse_quantity("-4"),
            Err(ValidationError::InvalidQuantity(_))
        ));
        assert!(matches!(
            parse_quantity("2.5"),
            Err(ValidationError::InvalidQuantity(_))
        ));
        assert!(matches!(
            parse_quantity("ten"),
            Err(ValidationError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn rejects_impossible_dates() {
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("15/03/2022").is_err());
        assert!(parse_date("2024-02-29").is_ok());
    }

    #[test]
    fn category_parse_accepts_name_and_slug() {
        assert_eq!(Category::parse("Groz-Beckert"), Ok(Category::GrozBeckert));
        assert_eq!(Category::parse("groz-beckert"), Ok(Category::GrozBeckert));
        assert_eq!(Category::parse("NEETEX"), Ok(Category::Neetex));
        assert_eq!(
            Category::parse("Schmetz"),
            Err(ValidationError::UnknownCategory("Schmetz".to_string()))
        );
    }
}
