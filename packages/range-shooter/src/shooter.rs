//! The range-based shooter controller.
//!
//! [`RangeShooter`] owns the shot setpoints and the loading latch. Each cycle a range is
//! supplied through [`RangeShooter::set_range`], and [`RangeShooter::execute`] pushes the
//! resulting setpoints to both flywheels and fires the loading piston if a shot was
//! requested.
//!
//! # Shot sequencing
//!
//! Shots move through three states (see [`ShotState`]):
//!
//! - **Idle**: piston at rest, no shot requested.
//! - **Requested**: [`fire`](RangeShooter::fire) was called; the pulse starts on the next
//!   [`execute`](RangeShooter::execute).
//! - **Firing**: the piston is extended. It retracts on its own after
//!   [`ShooterConfig::pulse_duration`], timed by the actuator rather than this controller.

use snafu::{ResultExt, Snafu};

use crate::{
    config::ShooterConfig,
    device::{DeviceError, PulseActuator, VelocityController, VelocityDrive},
    lifecycle::Subsystem,
    range_table::{RangeTable, RangeTableError},
};

/// Where the shooter is in its shot sequence.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ShotState {
    /// The piston is at rest and no shot is pending.
    Idle,

    /// A shot was requested and will start on the next control cycle.
    Requested,

    /// The piston is extended.
    Firing,
}

/// A snapshot of shooter setpoints and feedback, for dashboards and tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShooterTelemetry {
    /// Center flywheel setpoint in RPM.
    pub center_rpm_target: f64,

    /// Outer flywheel setpoint in RPM.
    pub outer_rpm_target: f64,

    /// Measured center flywheel velocity in RPM.
    pub center_velocity: f64,

    /// Measured outer flywheel velocity in RPM.
    pub outer_velocity: f64,

    /// Whether the last range was within the calibrated table.
    pub in_range: bool,

    /// Where the shooter is in its shot sequence.
    pub shot_state: ShotState,
}

/// Mutable controller state, reset when the controller is built.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ControllerState {
    center_rpm_target: f64,
    outer_rpm_target: f64,
    pulse_requested: bool,
    in_range: bool,
}

/// Flywheel shooter with range-based setpoints and a pneumatic loader.
///
/// `O` and `C` are the outer and center flywheel drives, `L` is the loading piston. Any of
/// them may be a `&mut` borrow of a device owned elsewhere.
#[derive(Debug)]
pub struct RangeShooter<O, C, L> {
    outer: O,
    center: C,
    loader: L,
    table: RangeTable,
    config: ShooterConfig,
    state: ControllerState,
}

impl<O, C, L> RangeShooter<O, C, L>
where
    O: VelocityDrive,
    C: VelocityDrive,
    L: PulseActuator,
{
    /// Creates a shooter using the [default configuration](ShooterConfig::default).
    ///
    /// Both setpoints start at zero and no shot is pending.
    #[must_use]
    pub fn new(outer: O, center: C, loader: L, table: RangeTable) -> Self {
        Self::with_config(outer, center, loader, table, ShooterConfig::default())
    }

    /// Creates a shooter with a custom configuration.
    #[must_use]
    pub const fn with_config(
        outer: O,
        center: C,
        loader: L,
        table: RangeTable,
        config: ShooterConfig,
    ) -> Self {
        Self {
            outer,
            center,
            loader,
            table,
            config,
            state: ControllerState {
                center_rpm_target: 0.0,
                outer_rpm_target: 0.0,
                pulse_requested: false,
                in_range: false,
            },
        }
    }

    /// Creates a shooter from parallel distance and center RPM calibration tables.
    ///
    /// # Errors
    ///
    /// Returns a [`RangeTableError`] if the tables are malformed. See [`RangeTable::new`].
    pub fn from_tables(
        outer: O,
        center: C,
        loader: L,
        distances: &[f64],
        center_rpms: &[f64],
    ) -> Result<Self, RangeTableError> {
        Ok(Self::new(
            outer,
            center,
            loader,
            RangeTable::new(distances, center_rpms)?,
        ))
    }

    /// Stops both flywheels.
    ///
    /// Called when the robot is enabled so the flywheels do not resume a stale setpoint.
    ///
    /// # Errors
    ///
    /// Returns a [`ShooterError`] if either flywheel could not be reached.
    pub fn on_enable(&mut self) -> Result<(), ShooterError> {
        log::info!("Stopping shooter flywheels on enable.");

        self.center.stop().context(CenterSnafu)?;
        self.outer.stop().context(OuterSnafu)?;

        Ok(())
    }

    /// Configures the loader and both flywheels.
    ///
    /// Sets the loading pulse length, idle behavior, motor directions and closed-loop gains
    /// from the shooter's [`ShooterConfig`].
    ///
    /// # Errors
    ///
    /// Returns a [`ShooterError`] naming the first device that could not be configured.
    pub fn setup(&mut self) -> Result<(), ShooterError> {
        let config = self.config;

        self.loader
            .set_pulse_duration(config.pulse_duration)
            .context(LoaderSnafu)?;

        self.outer
            .set_idle_behavior(config.idle_behavior)
            .context(OuterSnafu)?;
        self.center
            .set_idle_behavior(config.idle_behavior)
            .context(CenterSnafu)?;

        self.outer
            .set_direction(config.outer_direction)
            .context(OuterSnafu)?;
        self.center
            .set_direction(config.center_direction)
            .context(CenterSnafu)?;

        self.outer
            .velocity_controller()
            .set_gains(config.outer_gains)
            .context(OuterSnafu)?;
        self.center
            .velocity_controller()
            .set_gains(config.center_gains)
            .context(CenterSnafu)?;

        log::info!(
            "Shooter configured: outer {:?}, center {:?}, {:?} loading pulse.",
            config.outer_gains,
            config.center_gains,
            config.pulse_duration,
        );

        Ok(())
    }

    /// Runs one control cycle.
    ///
    /// Pushes both setpoints to the flywheel controllers, then starts a loading pulse if a
    /// shot was requested since the last cycle. The request is consumed, so each
    /// [`fire`](Self::fire) produces at most one pulse.
    ///
    /// # Errors
    ///
    /// Returns a [`ShooterError`] if a device could not be reached. A pending shot is kept
    /// if the pulse itself failed to start.
    pub fn execute(&mut self) -> Result<(), ShooterError> {
        log::trace!(
            "Shooter setpoints: center {} rpm, outer {} rpm.",
            self.state.center_rpm_target,
            self.state.outer_rpm_target,
        );

        self.center
            .velocity_controller()
            .set_velocity_target(self.state.center_rpm_target)
            .context(CenterSnafu)?;
        self.outer
            .velocity_controller()
            .set_velocity_target(self.state.outer_rpm_target)
            .context(OuterSnafu)?;

        if self.state.pulse_requested {
            self.loader.start_pulse().context(LoaderSnafu)?;
            self.state.pulse_requested = false;

            log::debug!("Loading pulse started.");
        }

        Ok(())
    }

    /// Sets the distance to the target, updating both flywheel setpoints.
    ///
    /// Distances outside the calibrated table are clamped to its nearest edge and mark the
    /// shooter as out of range. This never touches the hardware; new setpoints take effect
    /// on the next [`execute`](Self::execute).
    pub fn set_range(&mut self, distance: f64) {
        let in_range = self.table.contains(distance);
        let distance = if in_range {
            distance
        } else {
            let clamped = self.table.clamp(distance);
            log::warn!(
                "Range {distance} is outside of [{}, {}]. Clamping to {clamped}.",
                self.table.min_distance(),
                self.table.max_distance(),
            );
            clamped
        };

        self.state.in_range = in_range;
        self.state.center_rpm_target = self.table.center_rpm(distance);
        self.state.outer_rpm_target = self.config.outer_rpm;
    }

    /// Returns `true` if both flywheels are within the velocity tolerance of their setpoints.
    ///
    /// The tolerance is inclusive, and velocities are read live from the drives.
    ///
    /// # Errors
    ///
    /// Returns a [`ShooterError`] if either flywheel's velocity could not be read.
    pub fn is_at_speed(&self) -> Result<bool, ShooterError> {
        let tolerance = self.config.velocity_tolerance;

        let center_error = libm::fabs(self.state.center_rpm_target - self.center_velocity()?);
        let outer_error = libm::fabs(self.state.outer_rpm_target - self.outer_velocity()?);

        Ok(center_error <= tolerance && outer_error <= tolerance)
    }

    /// Returns `true` if the loading piston is out of its resting position.
    ///
    /// # Errors
    ///
    /// Returns a [`ShooterError`] if the loader's state could not be read.
    pub fn is_firing(&self) -> Result<bool, ShooterError> {
        Ok(!self.loader.is_at_rest().context(LoaderSnafu)?)
    }

    /// Returns `true` if the last range given to [`set_range`](Self::set_range) was within
    /// the calibrated table. Returns `false` if it was clamped.
    #[must_use]
    pub const fn is_in_range(&self) -> bool {
        self.state.in_range
    }

    /// Returns `true` if a shot can be taken now.
    ///
    /// That is, the target is in range, both flywheels are up to speed, and the loading
    /// piston is not already moving. Checks stop at the first one that fails, so hardware
    /// is only read when the earlier checks pass.
    ///
    /// # Errors
    ///
    /// Returns a [`ShooterError`] if the flywheels or loader could not be read.
    pub fn is_ready(&self) -> Result<bool, ShooterError> {
        if !self.is_in_range() {
            log::debug!("Shooter not ready: out of range.");
            return Ok(false);
        }

        let at_speed = self.is_at_speed()?;
        if !at_speed {
            log::debug!("Shooter not ready: in range, not at speed.");
            return Ok(false);
        }

        let firing = self.is_firing()?;
        log::debug!("Shooter in range: true, at speed: true, firing: {firing}.");

        Ok(!firing)
    }

    /// Requests a shot.
    ///
    /// The loading pulse starts on the next [`execute`](Self::execute). Requesting again
    /// before then has no additional effect.
    pub const fn fire(&mut self) {
        self.state.pulse_requested = true;
    }

    /// Returns the current [`ShotState`].
    ///
    /// # Errors
    ///
    /// Returns a [`ShooterError`] if the loader's state could not be read.
    pub fn shot_state(&self) -> Result<ShotState, ShooterError> {
        Ok(if self.is_firing()? {
            ShotState::Firing
        } else if self.state.pulse_requested {
            ShotState::Requested
        } else {
            ShotState::Idle
        })
    }

    /// Returns the measured center flywheel velocity in RPM.
    ///
    /// # Errors
    ///
    /// Returns a [`ShooterError`] if the velocity could not be read.
    pub fn center_velocity(&self) -> Result<f64, ShooterError> {
        self.center.velocity().context(CenterSnafu)
    }

    /// Returns the measured outer flywheel velocity in RPM.
    ///
    /// # Errors
    ///
    /// Returns a [`ShooterError`] if the velocity could not be read.
    pub fn outer_velocity(&self) -> Result<f64, ShooterError> {
        self.outer.velocity().context(OuterSnafu)
    }

    /// Returns the center flywheel setpoint in RPM.
    #[must_use]
    pub const fn center_rpm_target(&self) -> f64 {
        self.state.center_rpm_target
    }

    /// Returns the outer flywheel setpoint in RPM.
    #[must_use]
    pub const fn outer_rpm_target(&self) -> f64 {
        self.state.outer_rpm_target
    }

    /// Reads a [`ShooterTelemetry`] snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`ShooterError`] if any device could not be read.
    pub fn telemetry(&self) -> Result<ShooterTelemetry, ShooterError> {
        Ok(ShooterTelemetry {
            center_rpm_target: self.state.center_rpm_target,
            outer_rpm_target: self.state.outer_rpm_target,
            center_velocity: self.center_velocity()?,
            outer_velocity: self.outer_velocity()?,
            in_range: self.state.in_range,
            shot_state: self.shot_state()?,
        })
    }

    /// Returns the calibration table in use.
    #[must_use]
    pub const fn table(&self) -> &RangeTable {
        &self.table
    }

    /// Returns the configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ShooterConfig {
        &self.config
    }

    /// Consumes the shooter, returning the outer drive, center drive and loader.
    #[must_use]
    pub fn into_parts(self) -> (O, C, L) {
        (self.outer, self.center, self.loader)
    }
}

impl<O, C, L> Subsystem for RangeShooter<O, C, L>
where
    O: VelocityDrive,
    C: VelocityDrive,
    L: PulseActuator,
{
    type Error = ShooterError;

    fn setup(&mut self) -> Result<(), Self::Error> {
        RangeShooter::setup(self)
    }

    fn on_enable(&mut self) -> Result<(), Self::Error> {
        RangeShooter::on_enable(self)
    }

    fn execute(&mut self) -> Result<(), Self::Error> {
        RangeShooter::execute(self)
    }
}

#[derive(Debug, Snafu, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur when using a [`RangeShooter`].
pub enum ShooterError {
    /// The outer flywheel drive failed.
    #[snafu(display("outer flywheel: {source}"))]
    Outer {
        /// The source of the error.
        source: DeviceError,
    },

    /// The center flywheel drive failed.
    #[snafu(display("center flywheel: {source}"))]
    Center {
        /// The source of the error.
        source: DeviceError,
    },

    /// The loading actuator failed.
    #[snafu(display("loader: {source}"))]
    Loader {
        /// The source of the error.
        source: DeviceError,
    },
}
