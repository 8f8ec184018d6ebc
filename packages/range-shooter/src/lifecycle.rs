//! Scheduler-facing subsystem lifecycle.

use core::time::Duration;

/// Nominal period between [`Subsystem::execute`] calls.
pub const CONTROL_PERIOD: Duration = Duration::from_millis(20);

/// A robot subsystem driven by a fixed-rate scheduler.
///
/// The scheduler calls [`setup`](Subsystem::setup) once before anything else,
/// [`on_enable`](Subsystem::on_enable) each time the robot is enabled, and
/// [`execute`](Subsystem::execute) once per [`CONTROL_PERIOD`] while enabled. All calls are
/// made from the same thread and none of them block.
pub trait Subsystem {
    /// The error returned when a hardware call fails.
    type Error;

    /// Performs one-time hardware configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any device could not be configured.
    fn setup(&mut self) -> Result<(), Self::Error>;

    /// Called when the robot transitions into an enabled mode.
    ///
    /// # Errors
    ///
    /// Returns an error if any device could not be reached.
    fn on_enable(&mut self) -> Result<(), Self::Error>;

    /// Runs one control cycle.
    ///
    /// # Errors
    ///
    /// Returns an error if any device could not be reached.
    fn execute(&mut self) -> Result<(), Self::Error>;
}
