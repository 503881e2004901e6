//! Error types for the hotel aggregate and its facade.

use crate::types::{ReservationId, RoomNumber};
use chrono::{DateTime, Utc};
use innkeeper_runtime::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a room registration or a booking was refused
///
/// Carried inside rejection actions, so it is `Clone` and serializable.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingError {
    /// No room with this number is registered
    #[error("Room {0} does not exist")]
    RoomNotFound(RoomNumber),

    /// The room is booked or has a payment in flight
    #[error("Room {0} is not available")]
    RoomUnavailable(RoomNumber),

    /// A room with this number is already registered
    #[error("Room {0} is already registered")]
    DuplicateRoom(RoomNumber),

    /// The guest name is empty or only whitespace
    #[error("Guest name cannot be empty")]
    InvalidGuestName,

    /// Check-out is not after check-in
    #[error("Check-out ({check_out}) must be after check-in ({check_in})")]
    InvalidStay {
        /// Requested check-in
        check_in: DateTime<Utc>,
        /// Requested check-out
        check_out: DateTime<Utc>,
    },

    /// The payment processor refused the charge
    #[error("Payment failed: {reason}")]
    PaymentDeclined {
        /// Reason reported by the processor
        reason: String,
    },

    /// The caller gave up before the payment came back
    #[error("Reservation request was cancelled before payment completed")]
    Cancelled,
}

/// Errors returned by the [`Hotel`](crate::Hotel) facade
#[derive(Error, Debug)]
pub enum HotelError {
    /// The request was refused by the hotel's rules
    #[error(transparent)]
    Booking(#[from] BookingError),

    /// The store could not process the request
    #[error("Reservation store error: {0}")]
    Store(#[from] StoreError),

    /// The request timed out and could no longer be withdrawn
    ///
    /// The booking may still complete; check the reservation log for this id.
    #[error("Outcome of reservation {0} is unknown")]
    OutcomeUnknown(ReservationId),

    /// The store answered with an action that is not an outcome of the request
    #[error("Unexpected outcome: {0}")]
    UnexpectedOutcome(String),
}

impl HotelError {
    /// The domain error behind this failure, if any
    #[must_use]
    pub const fn as_booking(&self) -> Option<&BookingError> {
        match self {
            Self::Booking(error) => Some(error),
            Self::Store(_) | Self::OutcomeUnknown(_) | Self::UnexpectedOutcome(_) => None,
        }
    }
}
