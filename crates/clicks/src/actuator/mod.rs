//! GPIO and PWM driven actuators

pub mod buzz;
pub mod dc_motor;
pub mod relay;
pub mod vibro;
