#![cfg_attr(not(test), no_std)]

//! Exposes application memory to an I2C bus master through a slave-mode
//! peripheral.
//!
//! The first byte of every write transaction selects a memory location by
//! identifier. Following bytes are stored into that location, and bytes the
//! master reads are taken from it. Transfers past the end of a location are
//! clamped: writes are discarded and reads return zero.

mod config;
mod exposed;
mod interrupts;
mod location;
mod registers;
mod session;
mod session_holder;
mod slave;
mod status;

#[cfg(feature = "stm32")]
pub mod stm32;

pub use config::{
    BusAddress, ConfigError, SlaveConfig, Timing, MAX_FREQUENCY_MHZ, MIN_FREQUENCY_MHZ,
};
pub use exposed::Exposed;
pub use location::{Location, LocationTable, Resolver};
pub use registers::Registers;
pub use session::{Effect, Reaction, Session};
pub use slave::MemorySlave;
pub use status::{Pending, Status};

#[cfg(feature = "dump")]
pub use slave::StateDump;

#[derive(Debug, Clone, Copy, PartialEq, Eq, bytemuck::NoUninit)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Phase {
    AwaitingIdentifier,
    Streaming,
}

/// Transfer direction as seen from the slave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// The master writes, the slave receives.
    Receive,
    /// The master reads, the slave transmits.
    Transmit,
}

/// Bus-level errors. They are cleared in hardware and never change the
/// session; recovery is up to the master.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    BusError,
    ArbitrationLoss,
    Overrun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    AddressMatch { direction: Direction },
    ByteReceived(u8),
    ByteRequested,
    AcknowledgeFailure,
    StopCondition,
    Fault(Fault),
}

/// Reported to the application through [`MemorySlave::listen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Notification {
    /// The master stored `len` payload bytes into the location behind
    /// `identifier`.
    Written { identifier: u8, len: usize },
    /// The master selected an identifier the resolver does not know.
    UnknownIdentifier { identifier: u8 },
    Fault(Fault),
}
