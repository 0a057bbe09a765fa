use core::fmt;

pub const MIN_FREQUENCY_MHZ: u8 = 1;
pub const MAX_FREQUENCY_MHZ: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Only 7-bit addresses are supported.
    AddressOutOfRange(u8),
    FrequencyOutOfRange(u8),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::AddressOutOfRange(a) => {
                write!(f, "own address {a:#04x} does not fit in 7 bits")
            }
            ConfigError::FrequencyOutOfRange(mhz) => write!(
                f,
                "input clock of {mhz} MHz is outside {MIN_FREQUENCY_MHZ}..={MAX_FREQUENCY_MHZ} MHz"
            ),
        }
    }
}

/// 7-bit slave address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusAddress(u8);

impl BusAddress {
    pub const fn new(address: u8) -> Result<Self, ConfigError> {
        if address > 0x7F {
            Err(ConfigError::AddressOutOfRange(address))
        } else {
            Ok(Self(address))
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Value for the own-address register, where bit 0 is reserved.
    pub const fn own_address_register(self) -> u8 {
        self.0 << 1
    }
}

/// Clock register values for standard mode.
///
/// The bus period is `2 * CCR * t_master`, so for 100 kHz the divisor is
/// `f_MHz * 1_000_000 / (2 * 100_000) = f_MHz * 5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    frequency_mhz: u8,
    clock_control: u16,
    rise_time: u8,
}

impl Timing {
    pub const fn standard_mode(frequency_mhz: u8) -> Result<Self, ConfigError> {
        if frequency_mhz < MIN_FREQUENCY_MHZ || frequency_mhz > MAX_FREQUENCY_MHZ {
            return Err(ConfigError::FrequencyOutOfRange(frequency_mhz));
        }

        Ok(Self {
            frequency_mhz,
            clock_control: frequency_mhz as u16 * 5,
            rise_time: frequency_mhz + 1,
        })
    }

    pub const fn frequency_mhz(&self) -> u8 {
        self.frequency_mhz
    }

    pub const fn clock_control(&self) -> u16 {
        self.clock_control
    }

    pub const fn clock_control_low(&self) -> u8 {
        self.clock_control as u8
    }

    pub const fn clock_control_high(&self) -> u8 {
        (self.clock_control >> 8) as u8
    }

    /// Maximum rise time in input clock cycles.
    pub const fn rise_time(&self) -> u8 {
        self.rise_time
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlaveConfig {
    address: BusAddress,
    timing: Timing,
}

impl SlaveConfig {
    pub const fn new(address: u8, frequency_mhz: u8) -> Result<Self, ConfigError> {
        let address = match BusAddress::new(address) {
            Ok(a) => a,
            Err(e) => return Err(e),
        };
        let timing = match Timing::standard_mode(frequency_mhz) {
            Ok(t) => t,
            Err(e) => return Err(e),
        };

        Ok(Self { address, timing })
    }

    pub const fn address(&self) -> BusAddress {
        self.address
    }

    pub const fn timing(&self) -> Timing {
        self.timing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_must_fit_in_seven_bits() {
        assert_eq!(BusAddress::new(0x55).map(BusAddress::get), Ok(0x55));
        assert_eq!(BusAddress::new(0x7F).map(BusAddress::get), Ok(0x7F));
        assert_eq!(
            BusAddress::new(0x80),
            Err(ConfigError::AddressOutOfRange(0x80))
        );
    }

    #[test]
    fn own_address_register_is_shifted() {
        let address = BusAddress::new(0x55).unwrap();
        assert_eq!(address.own_address_register(), 0xAA);
    }

    #[test]
    fn standard_mode_divisor_for_16mhz() {
        let timing = Timing::standard_mode(16).unwrap();
        assert_eq!(timing.clock_control(), 80);
        assert_eq!(timing.clock_control_low(), 80);
        assert_eq!(timing.clock_control_high(), 0);
        assert_eq!(timing.rise_time(), 17);
    }

    #[test]
    fn divisor_split_is_exact_at_max_frequency() {
        let timing = Timing::standard_mode(50).unwrap();
        assert_eq!(timing.clock_control(), 250);
        assert_eq!(
            (timing.clock_control_high() as u16) << 8 | timing.clock_control_low() as u16,
            250
        );
        assert_eq!(timing.rise_time(), 51);
    }

    #[test]
    fn frequency_range_is_checked() {
        assert_eq!(
            Timing::standard_mode(0),
            Err(ConfigError::FrequencyOutOfRange(0))
        );
        assert_eq!(
            Timing::standard_mode(51),
            Err(ConfigError::FrequencyOutOfRange(51))
        );
        assert!(Timing::standard_mode(1).is_ok());
    }

    #[test]
    fn slave_config_reports_first_error() {
        assert_eq!(
            SlaveConfig::new(0xFF, 0),
            Err(ConfigError::AddressOutOfRange(0xFF))
        );
        assert_eq!(
            SlaveConfig::new(0x10, 0),
            Err(ConfigError::FrequencyOutOfRange(0))
        );

        let config = SlaveConfig::new(0x10, 8).unwrap();
        assert_eq!(config.address().get(), 0x10);
        assert_eq!(config.timing().clock_control(), 40);
    }

    #[test]
    fn errors_display() {
        use std::string::ToString;

        assert_eq!(
            ConfigError::AddressOutOfRange(0x80).to_string(),
            "own address 0x80 does not fit in 7 bits"
        );
    }
}
