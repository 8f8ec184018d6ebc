//! Hardware capabilities used by the shooter.
//!
//! The shooter never talks to motor controllers or pneumatics directly. Instead it is
//! handed implementations of the traits in this module, which a robot program implements
//! on top of its own device drivers (and which tests implement with fakes).
//!
//! Every trait is also implemented for `&mut T`, so devices can be lent to a controller
//! rather than moved into it.

use core::time::Duration;

use snafu::Snafu;

/// Determines how a drive acts when it is not being commanded.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum IdleBehavior {
    /// Drive spins freely.
    Coast,

    /// Drive shorts its windings to slow down faster.
    Brake,
}

/// Represents a possible direction that a drive can be configured as.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    /// Positive velocities spin the drive forward.
    Forward,

    /// Positive velocities spin the drive in reverse.
    Reverse,
}

impl Direction {
    /// Returns `true` if the direction is [`Forward`](Direction::Forward).
    #[must_use]
    pub const fn is_forward(&self) -> bool {
        match self {
            Self::Forward => true,
            Self::Reverse => false,
        }
    }

    /// Returns `true` if the direction is [`Reverse`](Direction::Reverse).
    #[must_use]
    pub const fn is_reverse(&self) -> bool {
        match self {
            Self::Forward => false,
            Self::Reverse => true,
        }
    }
}

impl core::ops::Not for Direction {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }
}

/// Gains for a motor controller's onboard velocity loop.
///
/// Units are whatever the motor controller expects; these values are handed to it as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityGains {
    /// The proportional constant.
    pub kp: f64,

    /// The integral constant.
    pub ki: f64,

    /// The derivative constant.
    pub kd: f64,

    /// The feedforward constant.
    pub kf: f64,
}

impl VelocityGains {
    /// Creates a new set of gains.
    #[must_use]
    pub const fn new(kp: f64, ki: f64, kd: f64, kf: f64) -> Self {
        Self { kp, ki, kd, kf }
    }
}

#[derive(Debug, Snafu, Clone, Copy, PartialEq, Eq)]
/// Errors reported by shooter hardware.
pub enum DeviceError {
    /// No device is plugged into the port.
    Disconnected,

    /// The incorrect device type is plugged into the port.
    IncorrectDevice,

    /// Failed to communicate with the device.
    Busy,
}

/// The closed-loop velocity controller running on a motor controller.
pub trait VelocityController {
    /// Replaces the loop's gains.
    ///
    /// # Errors
    ///
    /// Returns a [`DeviceError`] if the motor controller could not be reached.
    fn set_gains(&mut self, gains: VelocityGains) -> Result<(), DeviceError>;

    /// Commands the loop to hold `rpm`.
    ///
    /// # Errors
    ///
    /// Returns a [`DeviceError`] if the motor controller could not be reached.
    fn set_velocity_target(&mut self, rpm: f64) -> Result<(), DeviceError>;
}

/// A velocity-controllable drive, such as a flywheel motor.
pub trait VelocityDrive {
    /// The closed-loop controller belonging to this drive.
    type Controller: VelocityController;

    /// Stops the drive, removing any output without actively braking.
    ///
    /// # Errors
    ///
    /// Returns a [`DeviceError`] if the motor controller could not be reached.
    fn stop(&mut self) -> Result<(), DeviceError>;

    /// Sets how the drive behaves when not commanded.
    ///
    /// # Errors
    ///
    /// Returns a [`DeviceError`] if the motor controller could not be reached.
    fn set_idle_behavior(&mut self, behavior: IdleBehavior) -> Result<(), DeviceError>;

    /// Sets which way the drive spins for a positive velocity.
    ///
    /// # Errors
    ///
    /// Returns a [`DeviceError`] if the motor controller could not be reached.
    fn set_direction(&mut self, direction: Direction) -> Result<(), DeviceError>;

    /// Returns the measured velocity of the drive in RPM.
    ///
    /// # Errors
    ///
    /// Returns a [`DeviceError`] if the motor controller could not be reached.
    fn velocity(&self) -> Result<f64, DeviceError>;

    /// Returns the drive's closed-loop velocity controller.
    fn velocity_controller(&mut self) -> &mut Self::Controller;
}

/// An actuator that can be fired for a fixed, hardware-timed pulse.
///
/// The pulse ends on its own once the configured duration has elapsed; callers can only
/// start one.
pub trait PulseActuator {
    /// Sets how long each pulse lasts.
    ///
    /// # Errors
    ///
    /// Returns a [`DeviceError`] if the actuator could not be reached.
    fn set_pulse_duration(&mut self, duration: Duration) -> Result<(), DeviceError>;

    /// Starts a single pulse.
    ///
    /// # Errors
    ///
    /// Returns a [`DeviceError`] if the actuator could not be reached.
    fn start_pulse(&mut self) -> Result<(), DeviceError>;

    /// Returns `true` if the actuator is in its resting position.
    ///
    /// # Errors
    ///
    /// Returns a [`DeviceError`] if the actuator could not be reached.
    fn is_at_rest(&self) -> Result<bool, DeviceError>;
}

impl<T: VelocityController + ?Sized> VelocityController for &mut T {
    fn set_gains(&mut self, gains: VelocityGains) -> Result<(), DeviceError> {
        (**self).set_gains(gains)
    }

    fn set_velocity_target(&mut self, rpm: f64) -> Result<(), DeviceError> {
        (**self).set_velocity_target(rpm)
    }
}

impl<T: VelocityDrive + ?Sized> VelocityDrive for &mut T {
    type Controller = T::Controller;

    fn stop(&mut self) -> Result<(), DeviceError> {
        (**self).stop()
    }

    fn set_idle_behavior(&mut self, behavior: IdleBehavior) -> Result<(), DeviceError> {
        (**self).set_idle_behavior(behavior)
    }

    fn set_direction(&mut self, direction: Direction) -> Result<(), DeviceError> {
        (**self).set_direction(direction)
    }

    fn velocity(&self) -> Result<f64, DeviceError> {
        (**self).velocity()
    }

    fn velocity_controller(&mut self) -> &mut Self::Controller {
        (**self).velocity_controller()
    }
}

impl<T: PulseActuator + ?Sized> PulseActuator for &mut T {
    fn set_pulse_duration(&mut self, duration: Duration) -> Result<(), DeviceError> {
        (**self).set_pulse_duration(duration)
    }

    fn start_pulse(&mut self) -> Result<(), DeviceError> {
        (**self).start_pulse()
    }

    fn is_at_rest(&self) -> Result<bool, DeviceError> {
        (**self).is_at_rest()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mock::{MockActuator, MockDrive};

    #[test]
    fn direction_not() {
        assert_eq!(!Direction::Forward, Direction::Reverse);
        assert_eq!(!Direction::Reverse, Direction::Forward);
        assert!(Direction::Forward.is_forward());
        assert!(Direction::Reverse.is_reverse());
    }

    fn spin_up<D: VelocityDrive>(mut drive: D) -> Result<f64, DeviceError> {
        drive.stop()?;
        drive.set_direction(Direction::Reverse)?;
        drive.velocity_controller().set_velocity_target(1200.0)?;
        drive.velocity()
    }

    fn pulse<A: PulseActuator>(mut actuator: A) -> Result<bool, DeviceError> {
        actuator.start_pulse()?;
        actuator.is_at_rest()
    }

    #[test]
    fn borrowed_drive_forwards_calls() {
        let mut drive = MockDrive::default();
        drive.velocity = 640.0;

        assert_eq!(spin_up(&mut drive), Ok(640.0));
        assert_eq!(drive.stop_calls, 1);
        assert_eq!(drive.direction, Some(Direction::Reverse));
        assert_eq!(drive.controller.targets, [1200.0]);
    }

    #[test]
    fn borrowed_actuator_forwards_calls() {
        let mut loader = MockActuator::default();

        assert_eq!(pulse(&mut loader), Ok(true));
        assert_eq!(loader.pulses, 1);
    }

    #[test]
    fn borrowed_drive_propagates_faults() {
        let mut drive = MockDrive::default();
        drive.fault = Some(DeviceError::Disconnected);

        assert_eq!(spin_up(&mut drive), Err(DeviceError::Disconnected));
    }
}
