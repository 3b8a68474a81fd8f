//! Input validation for listings and booking requests.
//!
//! # Responsibilities
//! - Enforce the listing field constraints (ranges, URL shape, enums come
//!   free from serde)
//! - Parse and sanity-check the loosely-typed booking payload
//!
//! # Design Decisions
//! - Listing validation collects every violation, keyed by wire field name
//! - Booking validation is all-or-nothing: any failure maps to the single
//!   `Invalid payload` rejection

use chrono::{Datelike, NaiveDate, Utc};
use serde_json::Value;

use crate::api::error::FieldErrors;
use crate::store::types::{BookingInput, CarInput, CarPatch};

const MIN_YEAR: i32 = 1980;
const MIN_DAILY_PRICE: i64 = 10;
const MAX_DAILY_PRICE: i64 = 2_000;
const MAX_MILEAGE: i64 = 500_000;
const MAX_DESCRIPTION_CHARS: usize = 2_000;

/// Validate a complete listing input.
pub fn validate_car_input(input: &CarInput) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    check_non_empty(&mut errors, "make", &input.make);
    check_non_empty(&mut errors, "model", &input.model);
    check_year(&mut errors, input.year);
    check_daily_price(&mut errors, input.daily_price);
    check_non_empty(&mut errors, "city", &input.city);
    check_state(&mut errors, &input.state);
    check_mileage(&mut errors, input.mileage);
    check_seats(&mut errors, input.seats);
    check_doors(&mut errors, input.doors);
    check_url(&mut errors, "imageUrl", &input.image_url);
    check_urls(&mut errors, "images", &input.images);
    check_description(&mut errors, &input.description);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate only the fields present in a partial update.
pub fn validate_car_patch(patch: &CarPatch) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if let Some(ref make) = patch.make {
        check_non_empty(&mut errors, "make", make);
    }
    if let Some(ref model) = patch.model {
        check_non_empty(&mut errors, "model", model);
    }
    if let Some(year) = patch.year {
        check_year(&mut errors, year);
    }
    if let Some(daily_price) = patch.daily_price {
        check_daily_price(&mut errors, daily_price);
    }
    if let Some(ref city) = patch.city {
        check_non_empty(&mut errors, "city", city);
    }
    if let Some(ref state) = patch.state {
        check_state(&mut errors, state);
    }
    if let Some(mileage) = patch.mileage {
        check_mileage(&mut errors, mileage);
    }
    if let Some(seats) = patch.seats {
        check_seats(&mut errors, seats);
    }
    if let Some(doors) = patch.doors {
        check_doors(&mut errors, doors);
    }
    if let Some(ref image_url) = patch.image_url {
        check_url(&mut errors, "imageUrl", image_url);
    }
    if let Some(ref images) = patch.images {
        check_urls(&mut errors, "images", images);
    }
    if let Some(ref description) = patch.description {
        check_description(&mut errors, description);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parse the loosely-typed booking payload. Any shape or constraint failure
/// returns None; the caller maps it to a 422.
pub fn parse_booking(payload: &Value) -> Option<BookingInput> {
    let car_id = int_field(payload, "carId")?;
    if car_id == 0 {
        return None;
    }

    let name = required_string(payload, "name")?;
    let email = required_string(payload, "email")?;
    if !is_email(&email) {
        return None;
    }

    let start_date = date_field(payload, "startDate")?;
    let end_date = date_field(payload, "endDate")?;
    if start_date > end_date {
        return None;
    }

    Some(BookingInput {
        car_id,
        name,
        email,
        phone: optional_string(payload, "phone"),
        start_date,
        end_date,
        message: optional_string(payload, "message"),
    })
}

/// Loose email shape check: something before an `@`, and a dot with
/// characters on both sides somewhere after it.
fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn int_field(payload: &Value, key: &str) -> Option<i64> {
    let value = payload.get(key)?;
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

fn required_string(payload: &Value, key: &str) -> Option<String> {
    let s = payload.get(key)?.as_str()?;
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn optional_string(payload: &Value, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn date_field(payload: &Value, key: &str) -> Option<NaiveDate> {
    payload
        .get(key)?
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

fn check_non_empty(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.is_empty() {
        errors.insert(field.to_string(), "must not be empty".to_string());
    }
}

fn check_year(errors: &mut FieldErrors, year: i32) {
    let max_year = Utc::now().year() + 1;
    if year < MIN_YEAR || year > max_year {
        errors.insert(
            "year".to_string(),
            format!("must be between {MIN_YEAR} and {max_year}"),
        );
    }
}

fn check_daily_price(errors: &mut FieldErrors, price: i64) {
    if !(MIN_DAILY_PRICE..=MAX_DAILY_PRICE).contains(&price) {
        errors.insert(
            "dailyPrice".to_string(),
            format!("must be between {MIN_DAILY_PRICE} and {MAX_DAILY_PRICE}"),
        );
    }
}

fn check_state(errors: &mut FieldErrors, state: &str) {
    if state.chars().count() != 2 {
        errors.insert(
            "state".to_string(),
            "must be a 2-letter state code".to_string(),
        );
    }
}

fn check_mileage(errors: &mut FieldErrors, mileage: i64) {
    if !(0..=MAX_MILEAGE).contains(&mileage) {
        errors.insert(
            "mileage".to_string(),
            format!("must be between 0 and {MAX_MILEAGE}"),
        );
    }
}

fn check_seats(errors: &mut FieldErrors, seats: u8) {
    if !(2..=9).contains(&seats) {
        errors.insert("seats".to_string(), "must be between 2 and 9".to_string());
    }
}

fn check_doors(errors: &mut FieldErrors, doors: u8) {
    if !(2..=5).contains(&doors) {
        errors.insert("doors".to_string(), "must be between 2 and 5".to_string());
    }
}

fn check_url(errors: &mut FieldErrors, field: &str, value: &str) {
    if url::Url::parse(value).is_err() {
        errors.insert(field.to_string(), "must be a valid URL".to_string());
    }
}

fn check_urls(errors: &mut FieldErrors, field: &str, values: &[String]) {
    if values.iter().any(|v| url::Url::parse(v).is_err()) {
        errors.insert(field.to_string(), "every entry must be a valid URL".to_string());
    }
}

fn check_description(errors: &mut FieldErrors, description: &str) {
    let chars = description.chars().count();
    if chars == 0 || chars > MAX_DESCRIPTION_CHARS {
        errors.insert(
            "description".to_string(),
            format!("must be between 1 and {MAX_DESCRIPTION_CHARS} characters"),
        );
    }
}
