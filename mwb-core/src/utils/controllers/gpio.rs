//! Direct GPIO pin bank.
//!
//! For boards that wire each H-bridge straight to the MCU: eight push-pull
//! outputs for the direction lines and four PWM channels for the speed lines.

use embedded_hal::{
    digital::{OutputPin, PinState},
    pwm::SetDutyCycle,
};

use super::pins::{PinBank, PinId, PinMap};
use crate::utils::math::maneuvers::WheelPosition;

#[derive(Debug)]
pub enum GpioError<EO: core::fmt::Debug, EP: core::fmt::Debug> {
    Output(EO),
    Pwm(EP),
    /// Pin id is neither a direction nor a speed line of this bank.
    UnknownPin(PinId),
    /// Digital write to a speed line.
    NotDigital(PinId),
    /// Duty write to a direction line.
    NotPwm(PinId),
    /// Duty above the channel's `max_duty_cycle()`.
    DutyOutOfRange(u16),
}

/// [`PinBank`] over HAL output pins and PWM channels.
pub struct GpioPins<O, P> {
    dir_ids: [PinId; 8],
    dirs: [O; 8],
    speed_ids: [PinId; 4],
    speeds: [P; 4],
}

impl<O, P> GpioPins<O, P>
where
    O: OutputPin,
    P: SetDutyCycle,
{
    pub fn new(
        dir_ids: [PinId; 8],
        dirs: [O; 8],
        speed_ids: [PinId; 4],
        speeds: [P; 4],
    ) -> Self {
        Self {
            dir_ids,
            dirs,
            speed_ids,
            speeds,
        }
    }

    /// Label the lines from a pin map.
    ///
    /// `dirs` and `speeds` are given in wiring order: rear right, rear left,
    /// front right, front left (dir1 before dir2).
    pub fn for_map(
        map: &PinMap,
        dirs: [O; 8],
        speeds: [P; 4],
    ) -> Self {
        let mut dir_ids = [0; 8];
        let mut speed_ids = [0; 4];
        for (i, wheel) in WheelPosition::ALL.iter().enumerate() {
            let p = map.wheel(*wheel);
            speed_ids[i] = p.speed;
            dir_ids[i * 2] = p.dir1;
            dir_ids[i * 2 + 1] = p.dir2;
        }
        Self::new(dir_ids, dirs, speed_ids, speeds)
    }

    pub fn release(self) -> ([O; 8], [P; 4]) {
        (self.dirs, self.speeds)
    }
}

impl<O, P> PinBank for GpioPins<O, P>
where
    O: OutputPin,
    P: SetDutyCycle,
{
    type Error = GpioError<O::Error, P::Error>;

    fn configure_output(
        &mut self,
        pin: PinId,
    ) -> Result<(), Self::Error> {
        if self.dir_ids.contains(&pin) || self.speed_ids.contains(&pin) {
            Ok(())
        } else {
            Err(GpioError::UnknownPin(pin))
        }
    }

    fn write_digital(
        &mut self,
        pin: PinId,
        level: PinState,
    ) -> Result<(), Self::Error> {
        match self.dir_ids.iter().position(|&id| id == pin) {
            Some(i) => self.dirs[i].set_state(level).map_err(GpioError::Output),
            None if self.speed_ids.contains(&pin) => Err(GpioError::NotDigital(pin)),
            None => Err(GpioError::UnknownPin(pin)),
        }
    }

    fn write_analog(
        &mut self,
        pin: PinId,
        duty: u16,
    ) -> Result<(), Self::Error> {
        match self.speed_ids.iter().position(|&id| id == pin) {
            Some(i) => {
                let speed = &mut self.speeds[i];
                if duty > speed.max_duty_cycle() {
                    return Err(GpioError::DutyOutOfRange(duty));
                }
                speed.set_duty_cycle(duty).map_err(GpioError::Pwm)
            }
            None if self.dir_ids.contains(&pin) => Err(GpioError::NotPwm(pin)),
            None => Err(GpioError::UnknownPin(pin)),
        }
    }
}
