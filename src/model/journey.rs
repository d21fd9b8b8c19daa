//! The journey aggregate and the places inside it.

use jiff::civil::Date;
use jiff::tz::TimeZone;
use jiff::{Span, Timestamp};
use serde::{Deserialize, Serialize};

use super::{Tag, User};

/// Kind of place, as classified by the place search backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlaceCategory {
    Attraction,
    Restaurant,
    Cafe,
    Culture,
    Accommodation,
    #[default]
    #[serde(other)]
    Etc,
}

/// A place: a candidate ("pikmi") while voting, a "piki" once placed into a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pik {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub category: PlaceCategory,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub like_by: Vec<User>,
}

impl Pik {
    pub fn like_count(&self) -> usize {
        self.like_by.len()
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.like_by.iter().any(|u| u.id == user_id)
    }
}

/// One itinerary day.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pikiday {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub pikis: Vec<Pik>,
}

/// The shared trip-planning aggregate.
///
/// Dates are Unix seconds on the wire. The aggregate is only ever replaced
/// wholesale from a fetch; screens never patch it in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journey {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub start_date: f64,
    #[serde(default)]
    pub end_date: f64,
    #[serde(default)]
    pub theme_path: String,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub pikmis: Vec<Pik>,
    #[serde(default)]
    pub pikidays: Vec<Pikiday>,
}

impl Journey {
    /// Calendar date of the first day, in UTC.
    pub fn start_day(&self) -> Date {
        timestamp_to_date(self.start_date)
    }

    pub fn end_day(&self) -> Date {
        timestamp_to_date(self.end_date)
    }

    /// Calendar date of the day at `offset` (0-based) from the start.
    pub fn day_date(&self, offset: usize) -> Date {
        self.start_day()
            .saturating_add(Span::new().days(offset as i64))
    }

    pub fn find_pikmi(&self, pikmi_id: &str) -> Option<&Pik> {
        self.pikmis.iter().find(|p| p.id == pikmi_id)
    }
}

fn timestamp_to_date(seconds: f64) -> Date {
    let ts = Timestamp::from_second(seconds as i64).unwrap_or(Timestamp::UNIX_EPOCH);
    ts.to_zoned(TimeZone::UTC).date()
}

/// Request body for creating a new journey.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJourneyRequest {
    pub name: String,
    pub start_date: f64,
    pub end_date: f64,
    pub theme_path: String,
    pub tags: Vec<Tag>,
}

/// Request body for joining a journey with the member's tag choices.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinJourneyRequest {
    pub tags: Vec<Tag>,
}

/// Request body replacing the places of one itinerary day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePikisRequest {
    pub pikis: Vec<Pik>,
}
