//! Shared configuration behaviour
//!
//! Every `<Name>Config` implements [`ClickConfig`]. Its `Default` is the
//! board's cfg-setup: pins `NC`, bus parameters at their documented
//! defaults. [`ClickConfig::mikrobus`] replaces the per-board pin-mapping
//! macro by binding the roles the board uses to a socket.

use platform::{I2cConfig, MikrobusPins, PinName, Socket, SpiConfig, UartConfig};

/// Configuration record of one Click board.
pub trait ClickConfig: Default + Copy {
    /// Copy the pins this board uses out of `pins`, keeping bus parameters.
    #[must_use]
    fn with_pins(self, pins: &MikrobusPins) -> Self;

    /// The pins this configuration binds; roles the board does not use are
    /// reported as `NC`.
    fn pins(&self) -> MikrobusPins;

    /// Default configuration with pins bound to `socket`.
    fn mikrobus(socket: Socket) -> Self {
        Self::default().with_pins(&socket.pins())
    }
}

/// I2C bus parameters shared by the I2C boards.
pub(crate) fn i2c_bus(scl: PinName, sda: PinName, speed: platform::I2cSpeed, address: u8) -> I2cConfig {
    I2cConfig {
        scl,
        sda,
        speed,
        address,
    }
}

/// SPI bus parameters with the given pins and mode, other fields default.
pub(crate) fn spi_bus(
    pins: (PinName, PinName, PinName, PinName),
    frequency: u32,
    mode: platform::SpiMode,
) -> SpiConfig {
    let (sck, miso, mosi, cs) = pins;
    SpiConfig {
        sck,
        miso,
        mosi,
        cs,
        frequency,
        mode,
        ..SpiConfig::default()
    }
}

/// UART parameters with the given pins and baud rate, other fields default.
pub(crate) fn uart_bus(rx: PinName, tx: PinName, baud_rate: u32) -> UartConfig {
    UartConfig {
        rx,
        tx,
        baud_rate,
        ..UartConfig::default()
    }
}
