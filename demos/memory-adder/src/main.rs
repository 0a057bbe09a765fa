#![no_main]
#![no_std]

//! Exposes two operands and their sum at address 0x55:
//!
//! - 0x01 (u8): first operand
//! - 0x02 (u8): second operand
//! - 0x03 (u16): sum, recomputed whenever an operand is written

use cortex_m::peripheral::NVIC;

use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_stm32::{self as _, interrupt, peripherals::I2C1};
use i2c_memory_slave::{
    stm32::Stm32Registers, Exposed, Location, MemorySlave, Notification, SlaveConfig,
};
use panic_probe as _;

const OWN_ADDRESS: u8 = 0x55;

static LHS: Exposed<u8> = Exposed::new(0);
static RHS: Exposed<u8> = Exposed::new(0);
static SUM: Exposed<u16> = Exposed::new(0);

fn resolve(identifier: u8) -> Option<Location> {
    match identifier {
        0x01 => Some(LHS.location()),
        0x02 => Some(RHS.location()),
        0x03 => Some(SUM.location()),
        _ => None,
    }
}

type Resolve = fn(u8) -> Option<Location>;

static I2C_SLAVE: MemorySlave<Stm32Registers<I2C1>, Resolve, 4> =
    MemorySlave::new(Stm32Registers::new(), resolve as Resolve);

#[interrupt]
#[allow(non_snake_case)]
fn I2C1_EV() {
    I2C_SLAVE.handle_event();
}

#[interrupt]
#[allow(non_snake_case)]
fn I2C1_ER() {
    I2C_SLAVE.handle_event();
}

#[embassy_executor::main]
async fn main_task(_spawner: Spawner) {
    defmt::info!("Start!");

    let peripherals = embassy_stm32::init(Default::default());

    let mhz = Stm32Registers::attach(peripherals.I2C1, peripherals.PB6, peripherals.PB7);
    let config = match SlaveConfig::new(OWN_ADDRESS, mhz) {
        Ok(config) => config,
        Err(e) => defmt::panic!("Bad i2c config: {}", e),
    };
    I2C_SLAVE.init(config);

    unsafe {
        NVIC::unmask(interrupt::I2C1_ER);
        NVIC::unmask(interrupt::I2C1_EV);
    }

    loop {
        match I2C_SLAVE.listen().await {
            Notification::Written { identifier, len } => {
                defmt::info!("{} bytes written to {:#x}", len, identifier);

                let sum = LHS.get() as u16 + RHS.get() as u16;
                SUM.set(sum);
                defmt::info!("Sum: {}", sum);
            }
            Notification::UnknownIdentifier { identifier } => {
                defmt::warn!("Unknown identifier: {:#x}", identifier)
            }
            Notification::Fault(fault) => {
                defmt::error!("Fault: {}. Dump: {}", fault, I2C_SLAVE.dump_state());
            }
        }
    }
}
