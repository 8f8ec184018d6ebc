//! Range-based flywheel shooter control.
//!
//! # Overview
//!
//! This crate drives a two-flywheel ball shooter with a pneumatic loading piston. A range
//! measurement (usually from a vision or range-finding subsystem) is turned into flywheel
//! velocity setpoints using a calibrated [`RangeTable`], and a one-shot loading pulse is
//! sequenced on request.
//!
//! Velocity PID runs on the motor controllers themselves. This crate only pushes setpoints
//! and gains to them, and reads their feedback back to decide when a shot can be taken.
//!
//! # Devices
//!
//! Hardware is reached through three capability traits in the [`device`] module:
//!
//! - [`VelocityDrive`] for each flywheel motor (the outer and center wheel sets),
//! - [`VelocityController`] for the motor controller's onboard closed loop,
//! - [`PulseActuator`] for the loading piston.
//!
//! The controller is generic over these, so it can own its devices or borrow them
//! (`&mut T` implements every capability `T` does).
//!
//! # Lifecycle
//!
//! The robot program calls [`Subsystem::setup`] once, [`Subsystem::on_enable`] whenever the
//! robot becomes enabled, and [`Subsystem::execute`] once per [`CONTROL_PERIOD`]. Between
//! ticks, it feeds in ranges with [`RangeShooter::set_range`] and requests shots with
//! [`RangeShooter::fire`] once [`RangeShooter::is_ready`] reports `true`.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod device;
pub mod lifecycle;
pub mod range_table;
pub mod shooter;

#[cfg(test)]
pub(crate) mod mock;

pub use config::ShooterConfig;
pub use device::{
    DeviceError, Direction, IdleBehavior, PulseActuator, VelocityController, VelocityDrive,
    VelocityGains,
};
pub use lifecycle::{CONTROL_PERIOD, Subsystem};
pub use range_table::{Breakpoint, RangeTable, RangeTableError};
pub use shooter::{RangeShooter, ShooterError, ShooterTelemetry, ShotState};
