//! Configuration management for the hotel application.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::types::{Money, Room, RoomNumber};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Inventory used when `HOTEL_ROOMS` is not set
pub const DEFAULT_ROOMS: &str = "101:Single:100,102:Double:150,103:Suite:300";

/// Log filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_LEVEL: &str = "hotel=info,innkeeper_runtime=warn";

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A `HOTEL_ROOMS` entry is not `number:type:price`
    #[error("Invalid room entry '{entry}': {reason}")]
    InvalidRoom {
        /// Offending entry
        entry: String,
        /// What is wrong with it
        reason: String,
    },

    /// The same room number appears twice in `HOTEL_ROOMS`
    #[error("Room {0} is listed more than once in HOTEL_ROOMS")]
    DuplicateRoom(RoomNumber),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Rooms the hotel starts with
    pub inventory: InventoryConfig,
    /// Simulated payment processor settings
    pub payment: PaymentConfig,
    /// Store and process settings
    pub runtime: RuntimeConfig,
}

/// Seed inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Rooms in listing order
    pub rooms: Vec<RoomSeed>,
}

/// One `number:type:price` entry of `HOTEL_ROOMS`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSeed {
    /// Room number
    pub number: RoomNumber,
    /// Type label
    pub room_type: String,
    /// Price per night
    pub price: Money,
}

impl RoomSeed {
    /// Builds the available room this entry describes
    #[must_use]
    pub fn to_room(&self) -> Room {
        Room::new(self.number, self.room_type.clone(), self.price)
    }
}

/// Simulated payment processor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Artificial delay per charge in milliseconds (default: 0)
    pub latency_ms: u64,
    /// Decline every charge (default: false)
    pub decline: bool,
}

/// Runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Log filter directive
    pub log_level: String,
    /// How long a request waits for its outcome, in seconds (default: 5)
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: 5)
    pub shutdown_timeout_secs: u64,
    /// Capacity of the store's action broadcast (default: 64)
    pub action_buffer: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Falls back to defaults for missing or unparsable numeric values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `HOTEL_ROOMS` is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `HOTEL_ROOMS` is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let rooms = parse_rooms(
            lookup("HOTEL_ROOMS")
                .as_deref()
                .unwrap_or(DEFAULT_ROOMS),
        )?;

        Ok(Self {
            inventory: InventoryConfig { rooms },
            payment: PaymentConfig {
                latency_ms: lookup("HOTEL_PAYMENT_LATENCY_MS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0),
                decline: lookup("HOTEL_PAYMENT_DECLINE")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(false),
            },
            runtime: RuntimeConfig {
                log_level: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
                request_timeout_secs: lookup("HOTEL_REQUEST_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
                shutdown_timeout_secs: lookup("HOTEL_SHUTDOWN_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
                action_buffer: lookup("HOTEL_ACTION_BUFFER")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(64),
            },
        })
    }

    /// Request timeout as a `Duration`
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.runtime.request_timeout_secs)
    }

    /// Shutdown timeout as a `Duration`
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.runtime.shutdown_timeout_secs)
    }

    /// Payment latency as a `Duration`
    #[must_use]
    pub const fn payment_latency(&self) -> Duration {
        Duration::from_millis(self.payment.latency_ms)
    }
}

/// Parses a comma-separated list of `number:type:price` entries
///
/// Blank entries are skipped, so an empty string yields an empty inventory.
///
/// # Errors
///
/// Returns [`ConfigError`] for a malformed entry or a repeated room number.
pub fn parse_rooms(entries: &str) -> Result<Vec<RoomSeed>, ConfigError> {
    let mut rooms: Vec<RoomSeed> = Vec::new();

    for entry in entries.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let invalid = |reason: String| ConfigError::InvalidRoom {
            entry: entry.to_string(),
            reason,
        };

        let parts: Vec<&str> = entry.split(':').map(str::trim).collect();
        let [number, room_type, price] = parts.as_slice() else {
            return Err(invalid("expected number:type:price".to_string()));
        };

        let number = number.parse::<RoomNumber>().map_err(|e| invalid(e.to_string()))?;
        if room_type.is_empty() {
            return Err(invalid("room type cannot be empty".to_string()));
        }
        let price = price.parse::<Money>().map_err(|e| invalid(e.to_string()))?;

        if rooms.iter().any(|seed| seed.number == number) {
            return Err(ConfigError::DuplicateRoom(number));
        }

        rooms.push(RoomSeed {
            number,
            room_type: (*room_type).to_string(),
            price,
        });
    }

    Ok(rooms)
}
