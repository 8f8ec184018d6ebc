//! Recording fakes for shooter hardware.

use core::time::Duration;

use alloc::vec::Vec;

use crate::device::{
    DeviceError, Direction, IdleBehavior, PulseActuator, VelocityController, VelocityDrive,
    VelocityGains,
};

#[derive(Debug, Default)]
pub struct MockController {
    pub gains: Option<VelocityGains>,
    pub targets: Vec<f64>,
    pub fault: Option<DeviceError>,
}

impl VelocityController for MockController {
    fn set_gains(&mut self, gains: VelocityGains) -> Result<(), DeviceError> {
        self.fault.map_or(Ok(()), Err)?;
        self.gains = Some(gains);
        Ok(())
    }

    fn set_velocity_target(&mut self, rpm: f64) -> Result<(), DeviceError> {
        self.fault.map_or(Ok(()), Err)?;
        self.targets.push(rpm);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MockDrive {
    pub stop_calls: usize,
    pub idle_behavior: Option<IdleBehavior>,
    pub direction: Option<Direction>,
    pub velocity: f64,
    pub controller: MockController,
    pub fault: Option<DeviceError>,
}

impl MockDrive {
    pub fn spinning_at(velocity: f64) -> Self {
        Self {
            velocity,
            ..Default::default()
        }
    }
}

impl VelocityDrive for MockDrive {
    type Controller = MockController;

    fn stop(&mut self) -> Result<(), DeviceError> {
        self.fault.map_or(Ok(()), Err)?;
        self.stop_calls += 1;
        Ok(())
    }

    fn set_idle_behavior(&mut self, behavior: IdleBehavior) -> Result<(), DeviceError> {
        self.fault.map_or(Ok(()), Err)?;
        self.idle_behavior = Some(behavior);
        Ok(())
    }

    fn set_direction(&mut self, direction: Direction) -> Result<(), DeviceError> {
        self.fault.map_or(Ok(()), Err)?;
        self.direction = Some(direction);
        Ok(())
    }

    fn velocity(&self) -> Result<f64, DeviceError> {
        self.fault.map_or(Ok(self.velocity), Err)
    }

    fn velocity_controller(&mut self) -> &mut Self::Controller {
        &mut self.controller
    }
}

#[derive(Debug)]
pub struct MockActuator {
    pub pulse_duration: Option<Duration>,
    pub pulses: usize,
    pub at_rest: bool,
    pub fault: Option<DeviceError>,
}

impl Default for MockActuator {
    fn default() -> Self {
        Self {
            pulse_duration: None,
            pulses: 0,
            at_rest: true,
            fault: None,
        }
    }
}

impl PulseActuator for MockActuator {
    fn set_pulse_duration(&mut self, duration: Duration) -> Result<(), DeviceError> {
        self.fault.map_or(Ok(()), Err)?;
        self.pulse_duration = Some(duration);
        Ok(())
    }

    fn start_pulse(&mut self) -> Result<(), DeviceError> {
        self.fault.map_or(Ok(()), Err)?;
        self.pulses += 1;
        Ok(())
    }

    fn is_at_rest(&self) -> Result<bool, DeviceError> {
        self.fault.map_or(Ok(self.at_rest), Err)
    }
}
