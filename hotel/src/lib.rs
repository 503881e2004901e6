//! In-memory hotel reservation manager.
//!
//! A hotel keeps a room inventory and a reservation log. Booking a room
//! charges its nightly price through a [`PaymentProcessor`]; only a
//! successful charge creates a [`Reservation`] and marks the room booked.
//!
//! The hotel aggregate is a reducer ([`HotelReducer`]) running inside an
//! `innkeeper_runtime::Store`. The check that a room is free and the payment
//! hold on it happen in one reducer step under the store's write lock, so
//! concurrent requests for the same room cannot both be charged.
//!
//! # Quick Start
//!
//! ```no_run
//! use hotel::{Hotel, HotelEnvironment, Money, Room, RoomNumber, SimulatedPaymentProcessor};
//! use innkeeper_core::environment::SystemClock;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), hotel::HotelError> {
//! let env = HotelEnvironment::new(
//!     Arc::new(SystemClock),
//!     SimulatedPaymentProcessor::new().shared(),
//! );
//! let hotel = Hotel::new(env);
//!
//! hotel
//!     .add_room(Room::new(RoomNumber::new(102), "Double", Money::from_dollars(150)))
//!     .await?;
//!
//! for room in hotel.search_available_rooms("double").await {
//!     println!("{room}");
//! }
//!
//! let reservation = hotel.reserve_one_night(RoomNumber::new(102), "Alice").await?;
//! println!("{reservation}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod hotel;
pub mod menu;
pub mod payment;
pub mod reducer;
pub mod types;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use error::{BookingError, HotelError};
pub use hotel::{Hotel, HotelStore};
pub use menu::Menu;
pub use payment::{
    PaymentError, PaymentProcessor, PaymentReceipt, PaymentResult, SimulatedPaymentProcessor,
};
pub use reducer::{HotelAction, HotelEnvironment, HotelReducer};
pub use types::{
    HotelState, Money, PaymentHold, Reservation, ReservationId, Room, RoomNumber, StayInterval,
};
