//! The `Hotel` facade: request/response operations over the hotel store.

use crate::config::Config;
use crate::error::HotelError;
use crate::payment::SimulatedPaymentProcessor;
use crate::reducer::{HotelAction, HotelEnvironment, HotelReducer};
use crate::types::{HotelState, Reservation, ReservationId, Room, RoomNumber, StayInterval};
use innkeeper_core::environment::{Clock, SystemClock};
use innkeeper_runtime::{DEFAULT_BROADCAST_CAPACITY, Store, StoreError};
use std::sync::Arc;
use std::time::Duration;

/// Store type for the hotel aggregate
pub type HotelStore = Store<HotelState, HotelAction, HotelEnvironment, HotelReducer>;

/// How long a request waits for its outcome unless configured otherwise
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// A hotel: room inventory plus reservation log
///
/// Cloning yields another handle to the same hotel.
#[derive(Clone)]
pub struct Hotel {
    store: HotelStore,
    clock: Arc<dyn Clock>,
    request_timeout: Duration,
}

impl Hotel {
    /// Creates an empty hotel
    #[must_use]
    pub fn new(environment: HotelEnvironment) -> Self {
        Self::with_options(
            environment,
            DEFAULT_REQUEST_TIMEOUT,
            DEFAULT_BROADCAST_CAPACITY,
        )
    }

    /// Creates an empty hotel with a custom request timeout and action buffer
    #[must_use]
    pub fn with_options(
        environment: HotelEnvironment,
        request_timeout: Duration,
        action_buffer: usize,
    ) -> Self {
        let clock = Arc::clone(&environment.clock);
        let store = Store::with_broadcast_capacity(
            HotelState::new(),
            HotelReducer::new(),
            environment,
            action_buffer,
        );

        Self {
            store,
            clock,
            request_timeout,
        }
    }

    /// Builds the hotel described by `config` and registers its seed rooms
    ///
    /// # Errors
    ///
    /// Returns [`HotelError`] if a seed room cannot be registered.
    pub async fn from_config(config: &Config) -> Result<Self, HotelError> {
        let mut processor =
            SimulatedPaymentProcessor::new().with_latency(config.payment_latency());
        if config.payment.decline {
            processor = processor.declining("Payment declined by simulated processor");
        }

        let environment = HotelEnvironment::new(Arc::new(SystemClock), processor.shared());
        let hotel = Self::with_options(
            environment,
            config.request_timeout(),
            config.runtime.action_buffer,
        );

        for seed in &config.inventory.rooms {
            hotel.add_room(seed.to_room()).await?;
        }

        tracing::info!(rooms = config.inventory.rooms.len(), "Hotel ready");
        Ok(hotel)
    }

    /// Registers a room
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::DuplicateRoom`](crate::BookingError::DuplicateRoom) if the number is taken, or a
    /// store error if the hotel is shutting down.
    #[tracing::instrument(skip(self, room), fields(room_number = %room.number))]
    pub async fn add_room(&self, room: Room) -> Result<(), HotelError> {
        let room_number = room.number;
        let outcome = self
            .store
            .send_and_wait_for(
                HotelAction::AddRoom { room },
                |action| action.is_room_outcome(room_number),
                self.request_timeout,
            )
            .await?;

        match outcome {
            HotelAction::RoomRegistered { .. } => Ok(()),
            HotelAction::RoomRejected { error, .. } => Err(error.into()),
            other => Err(HotelError::UnexpectedOutcome(format!("{other:?}"))),
        }
    }

    /// The full inventory in insertion order
    pub async fn rooms(&self) -> Vec<Room> {
        self.store.state(|s| s.rooms().to_vec()).await
    }

    /// Bookable rooms whose type matches `room_type` ignoring case
    pub async fn search_available_rooms(&self, room_type: &str) -> Vec<Room> {
        self.store.state(|s| s.search_available(room_type)).await
    }

    /// The room with this number, if it exists and can be booked
    pub async fn find_bookable_room(&self, number: RoomNumber) -> Option<Room> {
        self.store.state(|s| s.find_bookable(number).cloned()).await
    }

    /// Books `room_number` for `guest_name`, charging the room price
    ///
    /// On success exactly one reservation is added and the room is no longer
    /// available. On failure nothing changes.
    ///
    /// If no outcome arrives within the request timeout the request is
    /// withdrawn, so a payment that completes later does not book the room.
    ///
    /// # Errors
    ///
    /// Returns [`HotelError::Booking`] when the request is refused
    /// (`RoomNotFound`, `RoomUnavailable`, `InvalidGuestName`, `InvalidStay`,
    /// `PaymentDeclined`), [`HotelError::Store`] when no outcome arrives in time,
    /// or [`HotelError::OutcomeUnknown`] when the timed-out request could not
    /// be withdrawn because the hotel is shutting down.
    #[tracing::instrument(skip(self, guest_name, stay))]
    pub async fn make_reservation(
        &self,
        room_number: RoomNumber,
        guest_name: impl Into<String>,
        stay: StayInterval,
    ) -> Result<Reservation, HotelError> {
        let reservation_id = ReservationId::new();
        let command = HotelAction::MakeReservation {
            reservation_id,
            room_number,
            guest_name: guest_name.into(),
            stay,
        };

        let outcome = match self
            .store
            .send_and_wait_for(
                command,
                |action| action.is_reservation_outcome(reservation_id),
                self.request_timeout,
            )
            .await
        {
            Ok(outcome) => outcome,
            Err(error @ (StoreError::Timeout | StoreError::ChannelClosed)) => {
                return self.withdraw(reservation_id, room_number, error).await;
            },
            Err(error) => return Err(error.into()),
        };

        match outcome {
            HotelAction::ReservationConfirmed { reservation } => Ok(reservation),
            HotelAction::ReservationRejected { error, .. } => Err(error.into()),
            other => Err(HotelError::UnexpectedOutcome(format!("{other:?}"))),
        }
    }

    /// Cancels a request whose outcome never arrived
    ///
    /// The cancel is reduced before `send` returns, so afterwards the log
    /// says for certain whether the booking went through.
    async fn withdraw(
        &self,
        reservation_id: ReservationId,
        room_number: RoomNumber,
        error: StoreError,
    ) -> Result<Reservation, HotelError> {
        tracing::warn!(%reservation_id, %room_number, %error, "No outcome in time, withdrawing request");

        let cancelled = self
            .store
            .send(HotelAction::CancelReservation {
                reservation_id,
                room_number,
            })
            .await
            .is_ok();

        let booked = self
            .store
            .state(|s| s.reservation(reservation_id).cloned())
            .await;

        match booked {
            Some(reservation) => Ok(reservation),
            None if cancelled => Err(error.into()),
            None => Err(HotelError::OutcomeUnknown(reservation_id)),
        }
    }

    /// Books one night starting now (by the hotel's clock)
    ///
    /// # Errors
    ///
    /// See [`Hotel::make_reservation`].
    pub async fn reserve_one_night(
        &self,
        room_number: RoomNumber,
        guest_name: impl Into<String>,
    ) -> Result<Reservation, HotelError> {
        let stay = StayInterval::one_night(self.clock.now());
        self.make_reservation(room_number, guest_name, stay).await
    }

    /// The reservation log in booking order
    pub async fn view_reservations(&self) -> Vec<Reservation> {
        self.store.state(|s| s.reservations().to_vec()).await
    }

    /// Message of the most recent rejection, if any
    pub async fn last_error(&self) -> Option<String> {
        self.store.state(|s| s.last_error.clone()).await
    }

    /// Stops accepting requests and waits for in-flight payments
    ///
    /// # Errors
    ///
    /// Returns [`HotelError::Store`] if payments are still running at `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), HotelError> {
        self.store.shutdown(timeout).await?;
        Ok(())
    }
}

