//! Bus interface boards
//!
//! RS485 transceiver, I2C port expander and the two galvanic isolators.
//! The isolators are transparent: their drivers pass transactions straight
//! through to the bus.

pub mod expand2;
pub mod i2c_isolator;
pub mod rs485;
pub mod spi_isolator;
