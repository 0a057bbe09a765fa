//! Register backend for the STM32 I2C v1 peripheral.

use core::marker::PhantomData;

use embassy_stm32::{
    gpio::{low_level::AFType, Pull},
    i2c::{self, SclPin, SdaPin},
    pac, Peripheral,
};

use crate::{BusAddress, Direction, Fault, Registers, Status, Timing};

pub struct Stm32Registers<T: i2c::Instance> {
    _marker: PhantomData<T>,
}

impl<T: i2c::Instance> Default for Stm32Registers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: i2c::Instance> Stm32Registers<T> {
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    /// Clocks the peripheral and routes SCL/SDA to it. Returns the
    /// peripheral input frequency in MHz, as needed by
    /// [`SlaveConfig`](crate::SlaveConfig).
    pub fn attach<'d>(
        _i2c: impl Peripheral<P = T> + 'd,
        scl: impl Peripheral<P = impl SclPin<T>> + 'd,
        sda: impl Peripheral<P = impl SdaPin<T>> + 'd,
    ) -> u8 {
        T::enable_and_reset();

        let scl = scl.into_ref();
        let sda = sda.into_ref();

        scl.set_as_af_pull(scl.af_num(), AFType::OutputOpenDrain, Pull::None);
        sda.set_as_af_pull(sda.af_num(), AFType::OutputOpenDrain, Pull::None);

        (T::frequency().0 / 1_000_000) as u8
    }
}

impl<T: i2c::Instance> Registers for Stm32Registers<T> {
    fn configure(&self, address: BusAddress, timing: Timing) {
        let regs = T::regs();

        regs.cr1().modify(|w| w.set_pe(false));

        regs.oar1().modify(|w| {
            w.set_addmode(pac::i2c::vals::Addmode::BIT7);
            w.set_add(address.own_address_register() as u16);
        });

        regs.cr2().modify(|w| {
            w.set_itbufen(true);
            w.set_itevten(true);
            w.set_iterren(true);
            w.set_freq(timing.frequency_mhz());
        });

        regs.trise().modify(|w| w.set_trise(timing.rise_time()));

        regs.ccr().modify(|w| {
            w.set_ccr(timing.clock_control());
            w.set_f_s(pac::i2c::vals::FS::STANDARD);
        });

        regs.cr1().modify(|w| {
            w.set_ack(true);
            w.set_pe(true);
        });
    }

    fn status(&self) -> Status {
        // Error flags sit in the second byte of SR1 here.
        let sr1 = T::regs().sr1().read().0;
        Status::from_bits(sr1 as u8, (sr1 >> 8) as u8)
    }

    fn release_address(&self) -> Direction {
        if T::regs().sr2().read().tra() {
            Direction::Transmit
        } else {
            Direction::Receive
        }
    }

    fn read_data(&self) -> u8 {
        T::regs().dr().read().dr()
    }

    fn write_data(&self, byte: u8) {
        T::regs().dr().write(|w| w.set_dr(byte));
    }

    fn clear_acknowledge_failure(&self) {
        T::regs().sr1().modify(|w| w.set_af(false));
    }

    fn clear_fault(&self, fault: Fault) {
        T::regs().sr1().modify(|w| match fault {
            Fault::BusError => w.set_berr(false),
            Fault::ArbitrationLoss => w.set_arlo(false),
            Fault::Overrun => w.set_ovr(false),
        });
    }

    fn enable_acknowledge(&self) {
        // STOPF clears on the write to CR1 that follows the SR1 read.
        T::regs().cr1().modify(|w| {
            w.set_pe(true);
            w.set_ack(true);
        });
    }
}
