//! Domain types for the hotel reservation manager.
//!
//! Rooms and reservations are plain values. The only state transition a room
//! has, Available to Booked, is the explicit [`Room::mark_booked`] call that
//! the reducer applies right after building the [`Reservation`] value.

use crate::error::BookingError;
use crate::payment::PaymentReceipt;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Number identifying a room within a hotel (e.g. `101`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoomNumber(u32);

impl RoomNumber {
    /// Creates a `RoomNumber`
    #[must_use]
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RoomNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error parsing a room number from text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid room number '{0}': expected a positive integer")]
pub struct ParseRoomNumberError(String);

impl FromStr for RoomNumber {
    type Err = ParseRoomNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<u32>() {
            Ok(number) if number > 0 => Ok(Self(number)),
            _ => Err(ParseRoomNumberError(s.trim().to_string())),
        }
    }
}

/// Unique identifier for a reservation
///
/// Also used as the correlation id of the booking request that creates it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationId(Uuid);

impl ReservationId {
    /// Creates a new random `ReservationId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ReservationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Value Objects
// ============================================================================

/// Money amount in cents (USD)
///
/// Stored as whole cents so prices are exact and never negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    /// Creates a `Money` value from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Creates a `Money` value from whole dollars, saturating at `u64::MAX` cents
    #[must_use]
    pub const fn from_dollars(dollars: u64) -> Self {
        Self(dollars.saturating_mul(100))
    }

    /// Returns the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Error parsing a money amount from text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid amount '{0}': expected dollars with at most two decimals, e.g. 150 or 99.50")]
pub struct ParseMoneyError(String);

impl FromStr for Money {
    type Err = ParseMoneyError;

    /// Parses `150`, `150.5`, `150.50` or `$150.50`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('$').unwrap_or(trimmed);
        let invalid = || ParseMoneyError(trimmed.to_string());

        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > 2 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let dollars: u64 = whole.parse().map_err(|_| invalid())?;
        let cents: u64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        dollars
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .map(Self)
            .ok_or_else(invalid)
    }
}

/// The nights a guest stays: `[check_in, check_out)`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayInterval {
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
}

impl StayInterval {
    /// Creates a stay, rejecting intervals where check-out is not after check-in
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidStay`] if `check_out <= check_in`.
    pub fn new(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> Result<Self, BookingError> {
        let stay = Self {
            check_in,
            check_out,
        };
        if stay.is_ordered() {
            Ok(stay)
        } else {
            Err(BookingError::InvalidStay {
                check_in,
                check_out,
            })
        }
    }

    /// A single night starting at `check_in` (check-out 24 hours later)
    #[must_use]
    pub fn one_night(check_in: DateTime<Utc>) -> Self {
        Self {
            check_in,
            check_out: check_in + Duration::hours(24),
        }
    }

    /// Check-in time
    #[must_use]
    pub const fn check_in(&self) -> DateTime<Utc> {
        self.check_in
    }

    /// Check-out time
    #[must_use]
    pub const fn check_out(&self) -> DateTime<Utc> {
        self.check_out
    }

    /// Whether check-out comes after check-in
    ///
    /// Always true for stays built with [`StayInterval::new`]; deserialized
    /// values are re-checked by the reducer.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.check_out > self.check_in
    }
}

// ============================================================================
// Entities
// ============================================================================

/// A bookable room
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Room number, unique within a hotel
    pub number: RoomNumber,
    /// Free-form type label (e.g. "Single", "Double", "Suite")
    pub room_type: String,
    /// Price per night
    pub price: Money,
    /// Whether the room can still be booked
    pub available: bool,
}

impl Room {
    /// Creates an available room
    #[must_use]
    pub fn new(number: RoomNumber, room_type: impl Into<String>, price: Money) -> Self {
        Self {
            number,
            room_type: room_type.into(),
            price,
            available: true,
        }
    }

    /// Case-insensitive comparison of the type label (no other normalization)
    #[must_use]
    pub fn matches_type(&self, room_type: &str) -> bool {
        self.room_type
            .chars()
            .flat_map(char::to_lowercase)
            .eq(room_type.chars().flat_map(char::to_lowercase))
    }

    /// Transition Available → Booked
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::RoomUnavailable`] if the room is already booked.
    pub fn mark_booked(&mut self) -> Result<(), BookingError> {
        if !self.available {
            return Err(BookingError::RoomUnavailable(self.number));
        }
        self.available = false;
        Ok(())
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Room {} ({}) - {}/night",
            self.number, self.room_type, self.price
        )
    }
}

/// A confirmed booking
///
/// Built only after a successful payment. Refers to its room by number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Reservation identifier
    pub id: ReservationId,
    /// Booked room
    pub room_number: RoomNumber,
    /// Room type at booking time
    pub room_type: String,
    /// Guest the room is booked for
    pub guest_name: String,
    /// Check-in and check-out
    pub stay: StayInterval,
    /// Amount charged
    pub amount: Money,
    /// Processor transaction for the charge
    pub transaction_id: String,
    /// When the booking was confirmed
    pub booked_at: DateTime<Utc>,
}

impl Reservation {
    /// Builds the reservation record; the room itself is not touched
    #[must_use]
    pub fn new(
        id: ReservationId,
        room: &Room,
        guest_name: impl Into<String>,
        stay: StayInterval,
        receipt: &PaymentReceipt,
        booked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            room_number: room.number,
            room_type: room.room_type.clone(),
            guest_name: guest_name.into(),
            stay,
            amount: receipt.amount,
            transaction_id: receipt.transaction_id.clone(),
            booked_at,
        }
    }
}

impl fmt::Display for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Reservation for {} - Room {} from {} to {}",
            self.guest_name,
            self.room_number,
            self.stay.check_in.format("%Y-%m-%d %H:%M UTC"),
            self.stay.check_out.format("%Y-%m-%d %H:%M UTC"),
        )
    }
}

/// A room held while its payment is in flight
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentHold {
    /// Booking request holding the room
    pub reservation_id: ReservationId,
    /// Guest the room will be booked for
    pub guest_name: String,
    /// Requested stay
    pub stay: StayInterval,
    /// Amount being charged
    pub amount: Money,
    /// When the hold was placed
    pub placed_at: DateTime<Utc>,
}

// ============================================================================
// Aggregate State
// ============================================================================

/// State of the hotel aggregate
///
/// Rooms keep insertion order for listing and are indexed by number.
/// The reservation log is append-only.
#[derive(Clone, Debug, Default)]
pub struct HotelState {
    rooms: Vec<Room>,
    index: HashMap<RoomNumber, usize>,
    reservations: Vec<Reservation>,
    holds: HashMap<RoomNumber, PaymentHold>,
    /// Last rejection message (if any)
    pub last_error: Option<String>,
}

impl HotelState {
    /// Creates an empty hotel
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a hotel with the given rooms
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::DuplicateRoom`] if two rooms share a number.
    pub fn with_rooms(rooms: impl IntoIterator<Item = Room>) -> Result<Self, BookingError> {
        let mut state = Self::new();
        for room in rooms {
            state.insert_room(room)?;
        }
        Ok(state)
    }

    /// Registers a room, keeping room numbers unique
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::DuplicateRoom`] if the number is taken.
    pub fn insert_room(&mut self, room: Room) -> Result<(), BookingError> {
        if self.index.contains_key(&room.number) {
            return Err(BookingError::DuplicateRoom(room.number));
        }
        self.index.insert(room.number, self.rooms.len());
        self.rooms.push(room);
        Ok(())
    }

    /// All rooms in insertion order
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Looks up a room by number
    #[must_use]
    pub fn room(&self, number: RoomNumber) -> Option<&Room> {
        self.index.get(&number).and_then(|&i| self.rooms.get(i))
    }

    pub(crate) fn room_mut(&mut self, number: RoomNumber) -> Option<&mut Room> {
        self.index.get(&number).and_then(|&i| self.rooms.get_mut(i))
    }

    /// Whether a payment is in flight for the room
    #[must_use]
    pub fn is_held(&self, number: RoomNumber) -> bool {
        self.holds.contains_key(&number)
    }

    /// The in-flight payment hold on a room
    #[must_use]
    pub fn hold(&self, number: RoomNumber) -> Option<&PaymentHold> {
        self.holds.get(&number)
    }

    /// The room if it exists, is available and has no payment in flight
    #[must_use]
    pub fn find_bookable(&self, number: RoomNumber) -> Option<&Room> {
        self.room(number)
            .filter(|room| room.available && !self.is_held(number))
    }

    /// Bookable rooms of the given type, in insertion order
    #[must_use]
    pub fn search_available(&self, room_type: &str) -> Vec<Room> {
        self.rooms
            .iter()
            .filter(|room| room.available && !self.is_held(room.number))
            .filter(|room| room.matches_type(room_type))
            .cloned()
            .collect()
    }

    /// The reservation log in booking order
    #[must_use]
    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    /// Looks up a reservation by id
    #[must_use]
    pub fn reservation(&self, id: ReservationId) -> Option<&Reservation> {
        self.reservations.iter().find(|r| r.id == id)
    }

    pub(crate) fn place_hold(&mut self, number: RoomNumber, hold: PaymentHold) {
        self.holds.insert(number, hold);
    }

    pub(crate) fn release_hold(&mut self, number: RoomNumber) -> Option<PaymentHold> {
        self.holds.remove(&number)
    }

    pub(crate) fn record(&mut self, reservation: Reservation) {
        self.reservations.push(reservation);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_rooms() -> Vec<Room> {
        vec![
            Room::new(RoomNumber::new(101), "Single", Money::from_dollars(100)),
            Room::new(RoomNumber::new(102), "Double", Money::from_dollars(150)),
            Room::new(RoomNumber::new(103), "Suite", Money::from_dollars(300)),
        ]
    }

    #[test]
    fn room_display_matches_listing_format() {
        let room = Room::new(RoomNumber::new(102), "Double", Money::from_dollars(150));
        assert_eq!(room.to_string(), "Room 102 (Double) - $150.00/night");
    }

    #[test]
    fn room_number_parsing() {
        assert_eq!("101".parse::<RoomNumber>().unwrap(), RoomNumber::new(101));
        assert_eq!(" 7 ".parse::<RoomNumber>().unwrap(), RoomNumber::new(7));
        assert!("0".parse::<RoomNumber>().is_err());
        assert!("-3".parse::<RoomNumber>().is_err());
        assert!("abc".parse::<RoomNumber>().is_err());
    }

    #[test]
    fn money_parsing_and_display() {
        assert_eq!("150".parse::<Money>().unwrap(), Money::from_dollars(150));
        assert_eq!("99.5".parse::<Money>().unwrap(), Money::from_cents(9950));
        assert_eq!("$99.05".parse::<Money>().unwrap(), Money::from_cents(9905));
        assert!("-1".parse::<Money>().is_err());
        assert!("1.234".parse::<Money>().is_err());
        assert!(".50".parse::<Money>().is_err());
        assert_eq!(Money::from_cents(9905).to_string(), "$99.05");
    }

    #[test]
    fn stay_interval_rejects_reversed_dates() {
        let now = Utc::now();
        assert!(StayInterval::new(now, now + Duration::days(2)).is_ok());
        assert!(matches!(
            StayInterval::new(now, now),
            Err(BookingError::InvalidStay { .. })
        ));
    }

    #[test]
    fn one_night_is_twenty_four_hours() {
        let now = Utc::now();
        let stay = StayInterval::one_night(now);
        assert_eq!(stay.check_out() - stay.check_in(), Duration::hours(24));
    }

    #[test]
    fn mark_booked_is_one_way() {
        let mut room = Room::new(RoomNumber::new(101), "Single", Money::from_dollars(100));
        assert!(room.mark_booked().is_ok());
        assert!(!room.available);
        assert_eq!(
            room.mark_booked(),
            Err(BookingError::RoomUnavailable(RoomNumber::new(101)))
        );
    }

    #[test]
    fn reservation_new_leaves_room_untouched() {
        let room = Room::new(RoomNumber::new(102), "Double", Money::from_dollars(150));
        let receipt = PaymentReceipt::new("txn_1", room.price);
        let reservation = Reservation::new(
            ReservationId::new(),
            &room,
            "Alice",
            StayInterval::one_night(Utc::now()),
            &receipt,
            Utc::now(),
        );

        assert!(room.available);
        assert_eq!(reservation.room_number, RoomNumber::new(102));
        assert_eq!(reservation.amount, Money::from_dollars(150));
        assert_eq!(reservation.transaction_id, "txn_1");
    }

    #[test]
    fn duplicate_room_numbers_are_rejected() {
        let mut state = HotelState::with_rooms(sample_rooms()).unwrap();
        let result = state.insert_room(Room::new(
            RoomNumber::new(101),
            "Suite",
            Money::from_dollars(999),
        ));

        assert_eq!(result, Err(BookingError::DuplicateRoom(RoomNumber::new(101))));
        assert_eq!(state.rooms().len(), 3);
        assert_eq!(state.room(RoomNumber::new(101)).unwrap().room_type, "Single");
    }

    #[test]
    fn search_is_case_insensitive_and_ordered() {
        let mut rooms = sample_rooms();
        rooms.push(Room::new(RoomNumber::new(104), "double", Money::from_dollars(140)));
        let state = HotelState::with_rooms(rooms).unwrap();

        for query in ["double", "DOUBLE", "Double"] {
            let numbers: Vec<_> = state
                .search_available(query)
                .iter()
                .map(|r| r.number.get())
                .collect();
            assert_eq!(numbers, vec![102, 104]);
        }
        assert!(state.search_available("Penthouse").is_empty());
        assert!(state.search_available(" Double").is_empty());
    }

    #[test]
    fn matches_type_folds_case_char_by_char() {
        let room = Room::new(RoomNumber::new(105), "Suíte", Money::from_dollars(300));

        assert!(room.matches_type("SUÍTE"));
        assert!(room.matches_type("suíte"));
        assert!(!room.matches_type("Suite"));
        assert!(!room.matches_type("Suítes"));
        assert!(!room.matches_type("Suít"));
        assert!(!room.matches_type(""));
    }

    #[test]
    fn held_rooms_are_not_bookable() {
        let mut state = HotelState::with_rooms(sample_rooms()).unwrap();
        state.place_hold(
            RoomNumber::new(102),
            PaymentHold {
                reservation_id: ReservationId::new(),
                guest_name: "Alice".to_string(),
                stay: StayInterval::one_night(Utc::now()),
                amount: Money::from_dollars(150),
                placed_at: Utc::now(),
            },
        );

        assert!(state.search_available("Double").is_empty());
        assert!(state.find_bookable(RoomNumber::new(102)).is_none());
        assert!(state.room(RoomNumber::new(102)).unwrap().available);

        state.release_hold(RoomNumber::new(102));
        assert!(state.find_bookable(RoomNumber::new(102)).is_some());
    }
}
