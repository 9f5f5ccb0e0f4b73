//! MikroBUS socket model
//!
//! A MikroBUS socket exposes twelve logical pin roles. Each Click driver
//! binds the roles it uses (e.g. RST, CS, INT) to whichever socket the board
//! is mounted on. The role-to-pin table below is the only board-to-MCU wiring
//! contract in the workspace; a [`Board`](crate::Board) implementation maps
//! the resulting [`PinName`] values to its MCU pins.
//!
//! ```text
//!        ┌──────────────┐
//!   AN   │ 1         16 │  PWM
//!   RST  │ 2         15 │  INT
//!   CS   │ 3         14 │  RX
//!   SCK  │ 4         13 │  TX
//!   MISO │ 5         12 │  SCL
//!   MOSI │ 6         11 │  SDA
//!  +3.3V │ 7         10 │  +5V
//!   GND  │ 8          9 │  GND
//!        └──────────────┘
//! ```

use crate::error::{Error, Result};

/// Logical pin identifier as understood by the platform HAL.
///
/// [`PinName::NC`] is the "not connected" sentinel every configuration
/// starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinName(u16);

impl PinName {
    /// Not connected.
    pub const NC: Self = Self(u16::MAX);

    /// Wrap a HAL pin number.
    #[must_use]
    pub const fn new(number: u16) -> Self {
        Self(number)
    }

    /// `true` unless this is [`PinName::NC`].
    pub const fn is_connected(self) -> bool {
        self.0 != u16::MAX
    }

    /// HAL pin number, `None` for [`PinName::NC`].
    pub const fn number(self) -> Option<u16> {
        if self.is_connected() {
            Some(self.0)
        } else {
            None
        }
    }

    /// Return the pin, or [`Error::UnmappedPin`] tagged with `role` when `NC`.
    pub const fn require(self, role: PinRole) -> Result<Self> {
        if self.is_connected() {
            Ok(self)
        } else {
            Err(Error::UnmappedPin(role))
        }
    }
}

impl Default for PinName {
    fn default() -> Self {
        Self::NC
    }
}

/// The twelve signal roles of a MikroBUS socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinRole {
    /// Analog input
    An,
    /// Reset
    Rst,
    /// SPI chip select
    Cs,
    /// SPI clock
    Sck,
    /// SPI master in
    Miso,
    /// SPI master out
    Mosi,
    /// PWM output
    Pwm,
    /// Interrupt input
    Int,
    /// UART receive (MCU side)
    Rx,
    /// UART transmit (MCU side)
    Tx,
    /// I2C clock
    Scl,
    /// I2C data
    Sda,
}

impl PinRole {
    /// All roles in header order (left column top to bottom, then right).
    pub const ALL: [PinRole; 12] = [
        PinRole::An,
        PinRole::Rst,
        PinRole::Cs,
        PinRole::Sck,
        PinRole::Miso,
        PinRole::Mosi,
        PinRole::Pwm,
        PinRole::Int,
        PinRole::Rx,
        PinRole::Tx,
        PinRole::Scl,
        PinRole::Sda,
    ];

    const fn offset(self) -> u16 {
        match self {
            PinRole::An => 0,
            PinRole::Rst => 1,
            PinRole::Cs => 2,
            PinRole::Sck => 3,
            PinRole::Miso => 4,
            PinRole::Mosi => 5,
            PinRole::Pwm => 6,
            PinRole::Int => 7,
            PinRole::Rx => 8,
            PinRole::Tx => 9,
            PinRole::Scl => 10,
            PinRole::Sda => 11,
        }
    }
}

/// Physical MikroBUS socket on the host board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Socket {
    /// MIKROBUS_1
    Mikrobus1,
    /// MIKROBUS_2
    Mikrobus2,
}

/// Pin numbers reserved per socket in the logical numbering.
const SOCKET_STRIDE: u16 = 16;

impl Socket {
    const fn base(self) -> u16 {
        match self {
            Socket::Mikrobus1 => 0,
            Socket::Mikrobus2 => SOCKET_STRIDE,
        }
    }

    /// Pin carrying `role` on this socket.
    pub const fn pin(self, role: PinRole) -> PinName {
        PinName::new(self.base() + role.offset())
    }

    /// Every role of this socket resolved to a pin.
    pub const fn pins(self) -> MikrobusPins {
        MikrobusPins {
            an: self.pin(PinRole::An),
            rst: self.pin(PinRole::Rst),
            cs: self.pin(PinRole::Cs),
            sck: self.pin(PinRole::Sck),
            miso: self.pin(PinRole::Miso),
            mosi: self.pin(PinRole::Mosi),
            pwm: self.pin(PinRole::Pwm),
            int: self.pin(PinRole::Int),
            rx: self.pin(PinRole::Rx),
            tx: self.pin(PinRole::Tx),
            scl: self.pin(PinRole::Scl),
            sda: self.pin(PinRole::Sda),
        }
    }
}

/// All twelve pins of one socket.
///
/// `Default` leaves every role `NC`, which is also how a Click configuration
/// reports the roles it does not use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(missing_docs)]
pub struct MikrobusPins {
    pub an: PinName,
    pub rst: PinName,
    pub cs: PinName,
    pub sck: PinName,
    pub miso: PinName,
    pub mosi: PinName,
    pub pwm: PinName,
    pub int: PinName,
    pub rx: PinName,
    pub tx: PinName,
    pub scl: PinName,
    pub sda: PinName,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nc_is_not_connected() {
        assert!(!PinName::NC.is_connected());
        assert_eq!(PinName::NC.number(), None);
        assert_eq!(PinName::default(), PinName::NC);
    }

    #[test]
    fn require_reports_role() {
        assert_eq!(
            PinName::NC.require(PinRole::Cs),
            Err(Error::UnmappedPin(PinRole::Cs))
        );
        assert_eq!(PinName::new(3).require(PinRole::Cs), Ok(PinName::new(3)));
    }

    #[test]
    fn sockets_do_not_share_pins() {
        for role in PinRole::ALL {
            assert_ne!(Socket::Mikrobus1.pin(role), Socket::Mikrobus2.pin(role));
        }
    }

    #[test]
    fn roles_are_distinct_within_a_socket() {
        let pins: std::vec::Vec<PinName> =
            PinRole::ALL.iter().map(|r| Socket::Mikrobus1.pin(*r)).collect();
        for (i, a) in pins.iter().enumerate() {
            for b in pins.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn pins_table_matches_pin_lookup() {
        let p = Socket::Mikrobus2.pins();
        assert_eq!(p.rst, Socket::Mikrobus2.pin(PinRole::Rst));
        assert_eq!(p.sda, Socket::Mikrobus2.pin(PinRole::Sda));
        assert!(p.an.is_connected());
    }
}
