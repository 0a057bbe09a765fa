use crate::Fault;

pub const SR1_TXE: u8 = 0b1000_0000;
pub const SR1_RXNE: u8 = 0b0100_0000;
pub const SR1_STOPF: u8 = 0b0001_0000;
pub const SR1_ADDR: u8 = 0b0000_0010;
pub const SR2_OVR: u8 = 0b0000_1000;
pub const SR2_AF: u8 = 0b0000_0100;
pub const SR2_ARLO: u8 = 0b0000_0010;
pub const SR2_BERR: u8 = 0b0000_0001;

/// Latched peripheral conditions. Several may be set at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    pub address_matched: bool,
    pub byte_received: bool,
    pub byte_requested: bool,
    pub acknowledge_failure: bool,
    pub stop_detected: bool,
    pub bus_error: bool,
    pub arbitration_loss: bool,
    pub overrun: bool,
}

/// The condition a single dispatch handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pending {
    AddressMatch,
    ByteReceived,
    ByteRequested,
    AcknowledgeFailure,
    StopCondition,
    Fault(Fault),
}

impl Status {
    /// Decodes the two status bytes. The event flags live in the first, the
    /// error flags in the low nibble of the second.
    pub const fn from_bits(sr1: u8, sr2: u8) -> Self {
        Self {
            address_matched: sr1 & SR1_ADDR != 0,
            byte_received: sr1 & SR1_RXNE != 0,
            byte_requested: sr1 & SR1_TXE != 0,
            stop_detected: sr1 & SR1_STOPF != 0,
            acknowledge_failure: sr2 & SR2_AF != 0,
            bus_error: sr2 & SR2_BERR != 0,
            arbitration_loss: sr2 & SR2_ARLO != 0,
            overrun: sr2 & SR2_OVR != 0,
        }
    }

    /// Highest priority latched condition. The peripheral raises the
    /// interrupt again for whatever is left, so one per dispatch is enough.
    pub const fn pending(&self) -> Option<Pending> {
        if self.address_matched {
            Some(Pending::AddressMatch)
        } else if self.byte_received {
            Some(Pending::ByteReceived)
        } else if self.byte_requested {
            Some(Pending::ByteRequested)
        } else if self.acknowledge_failure {
            Some(Pending::AcknowledgeFailure)
        } else if self.stop_detected {
            Some(Pending::StopCondition)
        } else if self.bus_error {
            Some(Pending::Fault(Fault::BusError))
        } else if self.arbitration_loss {
            Some(Pending::Fault(Fault::ArbitrationLoss))
        } else if self.overrun {
            Some(Pending::Fault(Fault::Overrun))
        } else {
            None
        }
    }

    pub const fn is_idle(&self) -> bool {
        self.pending().is_none()
    }
}
