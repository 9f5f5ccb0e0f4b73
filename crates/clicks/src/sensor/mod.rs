//! Sensor boards
//!
//! I2C register sensors (ambient 2, color 2, proximity, thermo 4,
//! temp&hum 4, current 2), SPI frame sensors (thermo, accel, RMS to DC).

pub mod accel;
pub mod ambient2;
pub mod color2;
pub mod current2;
pub mod proximity;
pub mod rmstodc;
pub mod temphum4;
pub mod thermo;
pub mod thermo4;
