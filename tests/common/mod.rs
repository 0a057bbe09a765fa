#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use i2c_memory_slave::{
    BusAddress, Direction, Fault, MemorySlave, Registers, Resolver, Status, Timing,
};

/// Peripheral model: flags are latched by the test and cleared the way the
/// hardware clears them.
#[derive(Default)]
pub struct SimBus {
    status: Cell<Status>,
    direction: Cell<Option<Direction>>,
    data_in: Cell<u8>,
    data_out: RefCell<Vec<u8>>,
    configured: Cell<Option<(BusAddress, Timing)>>,
    acknowledge: Cell<bool>,
}

impl SimBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn configured(&self) -> Option<(BusAddress, Timing)> {
        self.configured.get()
    }

    pub fn acknowledge_enabled(&self) -> bool {
        self.acknowledge.get()
    }

    pub fn status(&self) -> Status {
        self.status.get()
    }

    pub fn latch(&self, f: impl FnOnce(&mut Status)) {
        let mut status = self.status.get();
        f(&mut status);
        self.status.set(status);
    }

    fn clear(&self, f: impl FnOnce(&mut Status)) {
        self.latch(f)
    }
}

impl Registers for SimBus {
    fn configure(&self, address: BusAddress, timing: Timing) {
        self.configured.set(Some((address, timing)));
        self.acknowledge.set(true);
    }

    fn status(&self) -> Status {
        self.status.get()
    }

    fn release_address(&self) -> Direction {
        self.clear(|s| s.address_matched = false);
        self.direction
            .get()
            .expect("address matched without a direction")
    }

    fn read_data(&self) -> u8 {
        self.clear(|s| s.byte_received = false);
        self.data_in.get()
    }

    fn write_data(&self, byte: u8) {
        self.clear(|s| s.byte_requested = false);
        self.data_out.borrow_mut().push(byte);
    }

    fn clear_acknowledge_failure(&self) {
        self.clear(|s| s.acknowledge_failure = false);
    }

    fn clear_fault(&self, fault: Fault) {
        self.clear(|s| match fault {
            Fault::BusError => s.bus_error = false,
            Fault::ArbitrationLoss => s.arbitration_loss = false,
            Fault::Overrun => s.overrun = false,
        });
    }

    fn enable_acknowledge(&self) {
        self.clear(|s| s.stop_detected = false);
        self.acknowledge.set(true);
    }
}

pub type Slave<R> = MemorySlave<SimBus, R, 8>;

/// Drives a slave the way a bus master would, servicing the interrupt until
/// the peripheral is idle after every bus condition.
pub struct Master<'a, R: Resolver> {
    slave: &'a Slave<R>,
}

impl<'a, R: Resolver> Master<'a, R> {
    pub fn new(slave: &'a Slave<R>) -> Self {
        Self { slave }
    }

    fn bus(&self) -> &SimBus {
        self.slave.bus()
    }

    pub fn service(&self) {
        for _ in 0..16 {
            if self.bus().status().is_idle() {
                return;
            }
            self.slave.handle_event();
        }
        panic!("peripheral never went idle");
    }

    pub fn start(&self, direction: Direction) {
        self.bus().direction.set(Some(direction));
        self.bus().latch(|s| s.address_matched = true);
        self.service();
    }

    pub fn send(&self, byte: u8) {
        self.bus().data_in.set(byte);
        self.bus().latch(|s| s.byte_received = true);
        self.service();
    }

    /// Latches the last data byte together with the stop condition.
    pub fn send_with_stop(&self, byte: u8) {
        self.bus().data_in.set(byte);
        self.bus().latch(|s| {
            s.byte_received = true;
            s.stop_detected = true;
        });
        self.service();
    }

    pub fn request(&self) -> u8 {
        self.bus().latch(|s| s.byte_requested = true);
        self.service();
        self.bus()
            .data_out
            .borrow_mut()
            .pop()
            .expect("slave did not transmit")
    }

    pub fn nack(&self) {
        self.bus().latch(|s| s.acknowledge_failure = true);
        self.service();
    }

    pub fn stop(&self) {
        self.bus().latch(|s| s.stop_detected = true);
        self.service();
    }

    pub fn fault(&self, fault: Fault) {
        self.bus().latch(|s| match fault {
            Fault::BusError => s.bus_error = true,
            Fault::ArbitrationLoss => s.arbitration_loss = true,
            Fault::Overrun => s.overrun = true,
        });
        self.service();
    }

    /// Write transaction: address, bytes, stop.
    pub fn write(&self, bytes: &[u8]) {
        self.start(Direction::Receive);
        for &b in bytes {
            self.send(b);
        }
        self.stop();
    }

    /// Write, repeated start, read `len` bytes, NACK the last one.
    pub fn write_read(&self, bytes: &[u8], len: usize) -> Vec<u8> {
        self.start(Direction::Receive);
        for &b in bytes {
            self.send(b);
        }
        self.read(len)
    }

    /// Read transaction without a preceding write.
    pub fn read(&self, len: usize) -> Vec<u8> {
        self.start(Direction::Transmit);
        let out = (0..len).map(|_| self.request()).collect();
        self.nack();
        out
    }
}
