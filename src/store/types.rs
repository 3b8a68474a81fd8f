//! Record types for listings and booking requests.
//!
//! Wire names are camelCase to match the public JSON API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Transmission kind of a listed car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transmission {
    Automatic,
    Manual,
}

/// Fuel kind of a listed car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fuel {
    Gas,
    Hybrid,
    Electric,
    Diesel,
}

/// A rental listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: i64,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub trim: Option<String>,
    pub daily_price: i64,
    pub city: String,
    pub state: String,
    pub mileage: i64,
    pub transmission: Transmission,
    pub fuel: Fuel,
    pub seats: u8,
    pub doors: u8,
    pub image_url: String,
    pub images: Vec<String>,
    pub description: String,
    pub features: Vec<String>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a listing. Id and timestamp are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarInput {
    pub make: String,
    pub model: String,
    pub year: i32,
    #[serde(default)]
    pub trim: Option<String>,
    pub daily_price: i64,
    pub city: String,
    pub state: String,
    pub mileage: i64,
    pub transmission: Transmission,
    pub fuel: Fuel,
    pub seats: u8,
    pub doors: u8,
    pub image_url: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// Partial update for a listing. Absent fields are left untouched.
///
/// `trim` is nullable as well as optional: an explicit `"trim": null`
/// clears the stored value, while an absent key leaves it alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarPatch {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "nullable_field")]
    pub trim: Option<Option<String>>,
    pub daily_price: Option<i64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub mileage: Option<i64>,
    pub transmission: Option<Transmission>,
    pub fuel: Option<Fuel>,
    pub seats: Option<u8>,
    pub doors: Option<u8>,
    pub image_url: Option<String>,
    pub images: Option<Vec<String>>,
    pub description: Option<String>,
    pub features: Option<Vec<String>>,
    pub available: Option<bool>,
}

/// Deserializes a field that distinguishes `null` from absent.
///
/// Serde only runs this when the key is present, so `null` becomes
/// `Some(None)` while a missing key stays `None` via the default.
fn nullable_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A stored booking request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub car_id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated input for a booking request.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingInput {
    pub car_id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_trim_distinguishes_null_from_absent() {
        let absent: CarPatch = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(absent.trim, None);

        let cleared: CarPatch =
            serde_json::from_value(serde_json::json!({ "trim": null })).unwrap();
        assert_eq!(cleared.trim, Some(None));

        let set: CarPatch =
            serde_json::from_value(serde_json::json!({ "trim": "XLE" })).unwrap();
        assert_eq!(set.trim, Some(Some("XLE".into())));
    }
}
