use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Currency;
use crate::domain::{DomainError, ValidationFailure};

/// Interests suggested by the planner form. Free-form tags are accepted too.
pub const POPULAR_INTERESTS: &[&str] = &[
    "Adventure",
    "Art",
    "Beach",
    "Culture",
    "Cuisine",
    "Family-friendly",
    "Hiking",
    "History",
    "Luxury",
    "Museums",
    "Nature",
    "Nightlife",
    "Photography",
    "Relaxation",
    "Shopping",
    "Sightseeing",
    "Sports",
    "Wildlife",
    "Local experiences",
    "Architecture",
    "Festivals",
];

pub const DEFAULT_TRAVELERS: u32 = 2;

fn default_travelers() -> u32 {
    DEFAULT_TRAVELERS
}

/// Mutable form state for a trip. Nothing here is trusted until
/// [`TravelRequestDraft::submit`] turns it into a [`TravelRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelRequestDraft {
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default = "default_travelers")]
    pub travelers: u32,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

impl Default for TravelRequestDraft {
    fn default() -> Self {
        Self {
            origin: String::new(),
            destination: String::new(),
            start_date: None,
            end_date: None,
            budget: None,
            travelers: DEFAULT_TRAVELERS,
            interests: Vec::new(),
            currency: None,
        }
    }
}

impl TravelRequestDraft {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            ..Self::default()
        }
    }

    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn with_travelers(mut self, travelers: u32) -> Self {
        self.travelers = travelers;
        self
    }

    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interests = interests.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_currency(mut self, code: impl Into<String>) -> Self {
        self.currency = Some(code.into());
        self
    }

    /// Validate every field against `today` and freeze the draft.
    ///
    /// All failing fields are reported together, mirroring how the form
    /// highlights every invalid input at once.
    pub fn submit(&self, today: NaiveDate) -> Result<TravelRequest, DomainError> {
        let mut failure = ValidationFailure::new();

        let origin = self.origin.trim();
        let destination = self.destination.trim();
        if origin.is_empty() {
            failure.push("origin", "Starting location is required");
        }
        if destination.is_empty() {
            failure.push("destination", "Destination is required");
        }

        if self.start_date.is_none() {
            failure.push("start_date", "Start date is required");
        }
        if self.end_date.is_none() {
            failure.push("end_date", "End date is required");
        }
        if let Some(start) = self.start_date {
            if start < today {
                failure.push("start_date", "Start date cannot be in the past");
            }
            if let Some(end) = self.end_date {
                if end < start {
                    failure.push("end_date", "End date must be after start date");
                }
            }
        }

        match self.budget {
            Some(b) if b.is_finite() && b > 0.0 => {}
            _ => failure.push("budget", "Budget must be greater than 0"),
        }
        if self.travelers == 0 {
            failure.push("travelers", "Number of travelers must be greater than 0");
        }

        let currency = match self.currency.as_deref() {
            None => Currency::default(),
            Some(code) => match code.parse::<Currency>() {
                Ok(c) => c,
                Err(_) => {
                    failure.push("currency", format!("Unsupported currency: {}", code.trim()));
                    Currency::default()
                }
            },
        };

        failure.into_result()?;

        let (Some(start_date), Some(end_date), Some(budget)) =
            (self.start_date, self.end_date, self.budget)
        else {
            return Err(DomainError::internal("validated draft is missing fields"));
        };

        Ok(TravelRequest {
            origin: origin.to_string(),
            destination: destination.to_string(),
            start_date,
            end_date,
            budget,
            travelers: self.travelers,
            interests: normalize_interests(&self.interests),
            currency,
        })
    }
}

/// Trim, drop blanks, and de-duplicate while keeping first-seen order.
fn normalize_interests(raw: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for interest in raw {
        let trimmed = interest.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !out.iter().any(|existing| existing.eq_ignore_ascii_case(trimmed)) {
            out.push(trimmed.to_string());
        }
    }
    out
}

/// A validated, immutable trip request. Only obtainable through
/// [`TravelRequestDraft::submit`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TravelRequest {
    origin: String,
    destination: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    budget: f64,
    travelers: u32,
    interests: Vec<String>,
    currency: Currency,
}

impl TravelRequest {
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    pub fn travelers(&self) -> u32 {
        self.travelers
    }

    pub fn interests(&self) -> &[String] {
        &self.interests
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn trip_duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}
