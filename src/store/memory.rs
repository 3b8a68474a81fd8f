//! In-process record store.
//!
//! # Responsibilities
//! - Hold listings and booking requests for the process lifetime
//! - Assign monotonically increasing ids
//! - Serve reads/writes safely under concurrent handlers
//!
//! # Design Decisions
//! - DashMap keyed by id; updates hold the entry guard so partial updates
//!   are atomic per record
//! - Listing order is newest first, which for append-only ids is id
//!   descending
//! - No durability; the store resets on restart

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use dashmap::DashMap;

use crate::store::types::{Booking, BookingInput, Car, CarInput, CarPatch};

/// Concurrency-safe in-memory store for cars and bookings.
pub struct MemoryStore {
    cars: DashMap<i64, Car>,
    bookings: DashMap<i64, Booking>,
    next_car_id: AtomicI64,
    next_booking_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            cars: DashMap::new(),
            bookings: DashMap::new(),
            next_car_id: AtomicI64::new(1),
            next_booking_id: AtomicI64::new(1),
        }
    }

    /// All listings, newest first.
    pub fn list_cars(&self) -> Vec<Car> {
        let mut cars: Vec<Car> = self.cars.iter().map(|e| e.value().clone()).collect();
        cars.sort_by(|a, b| b.id.cmp(&a.id));
        cars
    }

    pub fn get_car(&self, id: i64) -> Option<Car> {
        self.cars.get(&id).map(|e| e.value().clone())
    }

    pub fn create_car(&self, input: CarInput) -> Car {
        let id = self.next_car_id.fetch_add(1, Ordering::Relaxed);
        let car = Car {
            id,
            make: input.make,
            model: input.model,
            year: input.year,
            trim: input.trim,
            daily_price: input.daily_price,
            city: input.city,
            state: input.state,
            mileage: input.mileage,
            transmission: input.transmission,
            fuel: input.fuel,
            seats: input.seats,
            doors: input.doors,
            image_url: input.image_url,
            images: input.images,
            description: input.description,
            features: input.features,
            available: input.available,
            created_at: Utc::now(),
        };
        self.cars.insert(id, car.clone());
        car
    }

    /// Apply a partial update. Returns the updated car, or None if absent.
    pub fn update_car(&self, id: i64, patch: CarPatch) -> Option<Car> {
        let mut entry = self.cars.get_mut(&id)?;
        let car = entry.value_mut();
        if let Some(make) = patch.make {
            car.make = make;
        }
        if let Some(model) = patch.model {
            car.model = model;
        }
        if let Some(year) = patch.year {
            car.year = year;
        }
        if let Some(trim) = patch.trim {
            car.trim = trim;
        }
        if let Some(daily_price) = patch.daily_price {
            car.daily_price = daily_price;
        }
        if let Some(city) = patch.city {
            car.city = city;
        }
        if let Some(state) = patch.state {
            car.state = state;
        }
        if let Some(mileage) = patch.mileage {
            car.mileage = mileage;
        }
        if let Some(transmission) = patch.transmission {
            car.transmission = transmission;
        }
        if let Some(fuel) = patch.fuel {
            car.fuel = fuel;
        }
        if let Some(seats) = patch.seats {
            car.seats = seats;
        }
        if let Some(doors) = patch.doors {
            car.doors = doors;
        }
        if let Some(image_url) = patch.image_url {
            car.image_url = image_url;
        }
        if let Some(images) = patch.images {
            car.images = images;
        }
        if let Some(description) = patch.description {
            car.description = description;
        }
        if let Some(features) = patch.features {
            car.features = features;
        }
        if let Some(available) = patch.available {
            car.available = available;
        }
        Some(car.clone())
    }

    /// Returns true if the car existed and was removed.
    pub fn delete_car(&self, id: i64) -> bool {
        self.cars.remove(&id).is_some()
    }

    pub fn create_booking(&self, input: BookingInput) -> Booking {
        let id = self.next_booking_id.fetch_add(1, Ordering::Relaxed);
        let booking = Booking {
            id,
            car_id: input.car_id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            start_date: input.start_date,
            end_date: input.end_date,
            message: input.message,
            created_at: Utc::now(),
        };
        self.bookings.insert(id, booking.clone());
        booking
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::{Fuel, Transmission};

    fn sample_input() -> CarInput {
        CarInput {
            make: "Toyota".into(),
            model: "Camry".into(),
            year: 2021,
            trim: Some("SE".into()),
            daily_price: 55,
            city: "Little Rock".into(),
            state: "AR".into(),
            mileage: 42_000,
            transmission: Transmission::Automatic,
            fuel: Fuel::Gas,
            seats: 5,
            doors: 4,
            image_url: "https://img.example/camry.jpg".into(),
            images: vec![],
            description: "Clean commuter sedan".into(),
            features: vec!["Backup camera".into()],
            available: true,
        }
    }

    #[test]
    fn ids_ascend_and_listing_is_newest_first() {
        let store = MemoryStore::new();
        let first = store.create_car(sample_input());
        let second = store.create_car(sample_input());
        assert!(second.id > first.id);
        let listed = store.list_cars();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[test]
    fn patch_touches_only_supplied_fields() {
        let store = MemoryStore::new();
        let car = store.create_car(sample_input());
        let updated = store
            .update_car(
                car.id,
                CarPatch {
                    daily_price: Some(60),
                    available: Some(false),
                    ..CarPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.daily_price, 60);
        assert!(!updated.available);
        assert_eq!(updated.make, "Toyota");
        assert_eq!(updated.trim.as_deref(), Some("SE"));
    }

    #[test]
    fn patch_with_null_trim_clears_it() {
        let store = MemoryStore::new();
        let car = store.create_car(sample_input());
        assert_eq!(car.trim.as_deref(), Some("SE"));
        let updated = store
            .update_car(
                car.id,
                CarPatch {
                    trim: Some(None),
                    ..CarPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.trim, None);
        // An absent trim leaves the cleared value alone.
        let untouched = store.update_car(car.id, CarPatch::default()).unwrap();
        assert_eq!(untouched.trim, None);
    }

    #[test]
    fn update_and_delete_missing_car() {
        let store = MemoryStore::new();
        assert!(store.update_car(99, CarPatch::default()).is_none());
        assert!(!store.delete_car(99));
    }

    #[test]
    fn delete_removes_from_listing() {
        let store = MemoryStore::new();
        let car = store.create_car(sample_input());
        assert!(store.delete_car(car.id));
        assert!(store.get_car(car.id).is_none());
        assert!(store.list_cars().is_empty());
    }
}
