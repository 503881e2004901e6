//! Reducer logic for the hotel aggregate.
//!
//! A booking runs in two reducer steps. `MakeReservation` validates the
//! request, places a payment hold on the room and starts the charge as an
//! effect. The charge outcome comes back as `PaymentSucceeded` or
//! `PaymentFailed`, which books the room or releases it. Every request ends
//! with a notification action (`ReservationConfirmed` or
//! `ReservationRejected`) carrying its reservation id, which is what callers
//! wait for.
//!
//! A caller that stops waiting sends `CancelReservation`. If the charge has
//! not come back yet the hold is dropped, and the late `PaymentSucceeded`
//! finds no hold and books nothing.

use crate::error::BookingError;
use crate::payment::{PaymentProcessor, PaymentReceipt};
use crate::types::{
    HotelState, PaymentHold, Reservation, ReservationId, Room, RoomNumber, StayInterval,
};
use innkeeper_core::{
    SmallVec, async_effect, effect::Effect, environment::Clock, reducer::Reducer, smallvec,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Actions for the hotel aggregate
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HotelAction {
    // Commands
    /// Register a room in the inventory
    AddRoom {
        /// Room to register
        room: Room,
    },
    /// Book a room for a guest
    MakeReservation {
        /// Id the reservation will have if confirmed
        reservation_id: ReservationId,
        /// Room to book
        room_number: RoomNumber,
        /// Guest name
        guest_name: String,
        /// Requested stay
        stay: StayInterval,
    },
    /// Withdraw a booking request whose payment has not come back yet
    CancelReservation {
        /// Booking request
        reservation_id: ReservationId,
        /// Room it asked for
        room_number: RoomNumber,
    },

    // Events
    /// The charge for a held room went through
    PaymentSucceeded {
        /// Booking request
        reservation_id: ReservationId,
        /// Held room
        room_number: RoomNumber,
        /// Processor receipt
        receipt: PaymentReceipt,
    },
    /// The charge for a held room failed
    PaymentFailed {
        /// Booking request
        reservation_id: ReservationId,
        /// Held room
        room_number: RoomNumber,
        /// Failure reported by the processor
        reason: String,
    },

    // Notifications
    /// A room was added to the inventory
    RoomRegistered {
        /// Registered room
        room_number: RoomNumber,
    },
    /// A room was refused
    RoomRejected {
        /// Refused room
        room_number: RoomNumber,
        /// Why
        error: BookingError,
    },
    /// A booking completed
    ReservationConfirmed {
        /// The new reservation
        reservation: Reservation,
    },
    /// A booking was refused or its payment failed
    ReservationRejected {
        /// Booking request
        reservation_id: ReservationId,
        /// Why
        error: BookingError,
    },
}

impl HotelAction {
    /// Whether this action ends the booking request `id`
    #[must_use]
    pub fn is_reservation_outcome(&self, id: ReservationId) -> bool {
        match self {
            Self::ReservationConfirmed { reservation } => reservation.id == id,
            Self::ReservationRejected { reservation_id, .. } => *reservation_id == id,
            _ => false,
        }
    }

    /// Whether this action ends the registration of room `number`
    #[must_use]
    pub fn is_room_outcome(&self, number: RoomNumber) -> bool {
        match self {
            Self::RoomRegistered { room_number } | Self::RoomRejected { room_number, .. } => {
                *room_number == number
            },
            _ => false,
        }
    }
}

/// Environment dependencies for the hotel reducer
#[derive(Clone)]
pub struct HotelEnvironment {
    /// Clock for check-in and booking timestamps
    pub clock: Arc<dyn Clock>,
    /// Processor charging room prices
    pub payments: Arc<dyn PaymentProcessor>,
}

impl HotelEnvironment {
    /// Creates a new `HotelEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, payments: Arc<dyn PaymentProcessor>) -> Self {
        Self { clock, payments }
    }
}

/// Reducer for the hotel aggregate
#[derive(Clone, Debug, Default)]
pub struct HotelReducer;

impl HotelReducer {
    /// Creates a new `HotelReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a `MakeReservation` command and returns the room to hold
    fn validate_reservation<'a>(
        state: &'a HotelState,
        room_number: RoomNumber,
        guest_name: &str,
        stay: &StayInterval,
    ) -> Result<&'a Room, BookingError> {
        if guest_name.trim().is_empty() {
            return Err(BookingError::InvalidGuestName);
        }

        if !stay.is_ordered() {
            return Err(BookingError::InvalidStay {
                check_in: stay.check_in(),
                check_out: stay.check_out(),
            });
        }

        if state.room(room_number).is_none() {
            return Err(BookingError::RoomNotFound(room_number));
        }

        state
            .find_bookable(room_number)
            .ok_or(BookingError::RoomUnavailable(room_number))
    }

    /// Releases the hold on `room_number` if it belongs to `reservation_id`
    fn take_hold(
        state: &mut HotelState,
        room_number: RoomNumber,
        reservation_id: ReservationId,
    ) -> Option<PaymentHold> {
        if state
            .hold(room_number)
            .is_some_and(|hold| hold.reservation_id == reservation_id)
        {
            state.release_hold(room_number)
        } else {
            None
        }
    }

    /// Records a refused booking and notifies the caller
    fn reject(
        state: &mut HotelState,
        reservation_id: ReservationId,
        error: BookingError,
    ) -> SmallVec<[Effect<HotelAction>; 4]> {
        tracing::warn!(%reservation_id, %error, "Reservation rejected");
        metrics::counter!("hotel.reservations.rejected").increment(1);
        state.last_error = Some(error.to_string());
        smallvec![Effect::emit(HotelAction::ReservationRejected {
            reservation_id,
            error,
        })]
    }

    /// Books the held room once its payment went through
    fn confirm(
        state: &mut HotelState,
        hold: PaymentHold,
        room_number: RoomNumber,
        receipt: &PaymentReceipt,
        env: &HotelEnvironment,
    ) -> Result<Reservation, BookingError> {
        let room = state
            .room_mut(room_number)
            .ok_or(BookingError::RoomNotFound(room_number))?;

        let reservation = Reservation::new(
            hold.reservation_id,
            room,
            hold.guest_name,
            hold.stay,
            receipt,
            env.clock.now(),
        );
        room.mark_booked()?;

        state.record(reservation.clone());
        state.last_error = None;
        Ok(reservation)
    }
}

impl Reducer for HotelReducer {
    type State = HotelState;
    type Action = HotelAction;
    type Environment = HotelEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            HotelAction::AddRoom { room } => {
                let room_number = room.number;
                match state.insert_room(room) {
                    Ok(()) => {
                        tracing::debug!(%room_number, "Room registered");
                        smallvec![Effect::emit(HotelAction::RoomRegistered { room_number })]
                    },
                    Err(error) => {
                        tracing::warn!(%room_number, %error, "Room rejected");
                        state.last_error = Some(error.to_string());
                        smallvec![Effect::emit(HotelAction::RoomRejected { room_number, error })]
                    },
                }
            },

            HotelAction::MakeReservation {
                reservation_id,
                room_number,
                guest_name,
                stay,
            } => {
                let amount =
                    match Self::validate_reservation(state, room_number, &guest_name, &stay) {
                        Ok(room) => room.price,
                        Err(error) => return Self::reject(state, reservation_id, error),
                    };

                tracing::info!(%reservation_id, %room_number, guest = %guest_name, %amount, "Room held for payment");
                state.place_hold(
                    room_number,
                    PaymentHold {
                        reservation_id,
                        guest_name,
                        stay,
                        amount,
                        placed_at: env.clock.now(),
                    },
                );

                let payments = Arc::clone(&env.payments);
                smallvec![async_effect! {
                    match payments.process_payment(amount).await {
                        Ok(receipt) => Some(HotelAction::PaymentSucceeded {
                            reservation_id,
                            room_number,
                            receipt,
                        }),
                        Err(error) => Some(HotelAction::PaymentFailed {
                            reservation_id,
                            room_number,
                            reason: error.to_string(),
                        }),
                    }
                }]
            },

            HotelAction::CancelReservation {
                reservation_id,
                room_number,
            } => {
                if Self::take_hold(state, room_number, reservation_id).is_none() {
                    // Already settled
                    return SmallVec::new();
                }
                metrics::counter!("hotel.reservations.cancelled").increment(1);
                Self::reject(state, reservation_id, BookingError::Cancelled)
            },

            // ========== Events ==========
            HotelAction::PaymentSucceeded {
                reservation_id,
                room_number,
                receipt,
            } => {
                let Some(hold) = Self::take_hold(state, room_number, reservation_id) else {
                    tracing::warn!(
                        %reservation_id,
                        %room_number,
                        transaction_id = %receipt.transaction_id,
                        amount = %receipt.amount,
                        "Charge captured without a hold, refund required"
                    );
                    return Self::reject(
                        state,
                        reservation_id,
                        BookingError::RoomUnavailable(room_number),
                    );
                };

                match Self::confirm(state, hold, room_number, &receipt, env) {
                    Ok(reservation) => {
                        tracing::info!(
                            %reservation_id,
                            %room_number,
                            transaction_id = %reservation.transaction_id,
                            "Reservation confirmed"
                        );
                        metrics::counter!("hotel.reservations.confirmed").increment(1);
                        smallvec![Effect::emit(HotelAction::ReservationConfirmed { reservation })]
                    },
                    Err(error) => {
                        tracing::warn!(
                            %reservation_id,
                            %room_number,
                            transaction_id = %receipt.transaction_id,
                            amount = %receipt.amount,
                            "Charge captured but booking failed, refund required"
                        );
                        Self::reject(state, reservation_id, error)
                    },
                }
            },

            HotelAction::PaymentFailed {
                reservation_id,
                room_number,
                reason,
            } => {
                Self::take_hold(state, room_number, reservation_id);
                Self::reject(state, reservation_id, BookingError::PaymentDeclined { reason })
            },

            // ========== Notifications ==========
            HotelAction::RoomRegistered { .. }
            | HotelAction::RoomRejected { .. }
            | HotelAction::ReservationConfirmed { .. }
            | HotelAction::ReservationRejected { .. } => SmallVec::new(),
        }
    }
}
