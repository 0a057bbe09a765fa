use crate::{BusAddress, Direction, Fault, Status, Timing};

/// Access to the slave-mode peripheral.
///
/// Methods take `&self` because the engine lives in a `static` shared with
/// the interrupt handler; implementations write through to hardware.
pub trait Registers {
    /// Disables the peripheral, programs the own address, input frequency,
    /// clock divisor and rise time, enables the event, error and buffer
    /// interrupts, then re-enables the peripheral with acknowledge on.
    fn configure(&self, address: BusAddress, timing: Timing);

    fn status(&self) -> Status;

    /// Completes the address phase. Reading the register that holds the
    /// transfer direction is what releases the clock line.
    fn release_address(&self) -> Direction;

    fn read_data(&self) -> u8;

    fn write_data(&self, byte: u8);

    fn clear_acknowledge_failure(&self);

    fn clear_fault(&self, fault: Fault);

    /// Clears a stop condition and acknowledges the next transaction.
    fn enable_acknowledge(&self);
}
