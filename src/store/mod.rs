//! Record storage subsystem.
//!
//! # Design Decisions
//! - Persistence is a collaborator by contract; this module is the narrow
//!   boundary standing in for it
//! - Handlers depend only on the `MemoryStore` API (ids, newest-first
//!   listing, partial update), so a durable backend can replace it without
//!   touching the route layer

pub mod memory;
pub mod types;

pub use memory::MemoryStore;
pub use types::{Booking, BookingInput, Car, CarInput, CarPatch, Fuel, Transmission};
