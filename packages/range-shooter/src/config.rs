//! Shooter tuning and mounting configuration.

use core::time::Duration;

use crate::device::{Direction, IdleBehavior, VelocityGains};

/// Tuned constants for a [`RangeShooter`](crate::RangeShooter).
///
/// The [`Default`] configuration matches the competition robot's hardware. The gains in
/// particular were tuned on the real flywheels and should be changed with care.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShooterConfig {
    /// Closed-loop gains for the outer flywheel.
    pub outer_gains: VelocityGains,

    /// Closed-loop gains for the center flywheel.
    pub center_gains: VelocityGains,

    /// Mounting direction of the outer flywheel motor.
    pub outer_direction: Direction,

    /// Mounting direction of the center flywheel motor.
    pub center_direction: Direction,

    /// What both flywheels do when not commanded.
    pub idle_behavior: IdleBehavior,

    /// How long the loading piston stays extended for each shot.
    pub pulse_duration: Duration,

    /// Outer flywheel setpoint in RPM, used at every range.
    pub outer_rpm: f64,

    /// Largest velocity error, in RPM, at which a flywheel counts as up to speed.
    pub velocity_tolerance: f64,
}

impl ShooterConfig {
    /// Default outer flywheel gains.
    pub const OUTER_GAINS: VelocityGains = VelocityGains::new(0.0279 / 60.0, 1e-6, 0.0, 0.000156);

    /// Default center flywheel gains.
    pub const CENTER_GAINS: VelocityGains =
        VelocityGains::new(0.0247 / 60.0, 1e-6, 0.0, 0.000156);

    /// Default loading pulse length.
    pub const PULSE_DURATION: Duration = Duration::from_millis(500);

    /// Default outer flywheel setpoint.
    pub const OUTER_RPM: f64 = 5000.0;

    /// Default velocity tolerance.
    pub const VELOCITY_TOLERANCE: f64 = 50.0;
}

impl Default for ShooterConfig {
    fn default() -> Self {
        Self {
            outer_gains: Self::OUTER_GAINS,
            center_gains: Self::CENTER_GAINS,
            outer_direction: Direction::Forward,
            center_direction: Direction::Reverse,
            idle_behavior: IdleBehavior::Coast,
            pulse_duration: Self::PULSE_DURATION,
            outer_rpm: Self::OUTER_RPM,
            velocity_tolerance: Self::VELOCITY_TOLERANCE,
        }
    }
}
