//! Maneuver controller for the four mecanum wheels.
//!
//! `MecanumDrive` owns the pin map, a [`PinBank`] and a blocking delay. Every
//! maneuver writes its pattern to all four wheels, blocks for the requested
//! time, then stops the car. The call does not return before the hold has
//! elapsed, so consecutive maneuvers never overlap. Commands can also arrive as
//! `MotionCommand` messages over `MOTION_CHANNEL`.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embedded_hal::{delay::DelayNs, digital::PinState};
use serde::{Deserialize, Serialize};

use super::pins::{ConfigError, PinBank, PinMap};
use crate::utils::math::maneuvers::{Direction, Maneuver, Speeds, WheelPosition};

/// Channel used to receive motion commands (`MotionCommand` messages).
pub static MOTION_CHANNEL: embassy_sync::channel::Channel<
    CriticalSectionRawMutex,
    MotionCommand,
    16,
> = embassy_sync::channel::Channel::new();

/// Errors that can occur while building or driving the car.
#[derive(Debug)]
pub enum DriveError<E: core::fmt::Debug> {
    Config(ConfigError),
    Io(E),
}

/// Motion command variants, one per public maneuver.
///
/// Serialized as JSON with tag `"mc"`. `s` is the duty, `t` the hold time in ms.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "mc", rename_all = "snake_case")]
pub enum MotionCommand {
    Forward { s: u16, t: u32 },
    Backward { s: u16, t: u32 },
    TurnLeft { s: u16, t: u32 },
    TurnRight { s: u16, t: u32 },
    TurnLeftBack { s: u16, t: u32 },
    TurnRightBack { s: u16, t: u32 },
    RotateCw { s: u16, t: u32 },
    RotateCcw { s: u16, t: u32 },
    /// Lateral shift with per-wheel duties.
    ShiftRight {
        fl: u16,
        rl: u16,
        rr: u16,
        fr: u16,
        t: u32,
    },
    ShiftLeft {
        fl: u16,
        rl: u16,
        rr: u16,
        fr: u16,
        t: u32,
    },
    /// Zero duty on every wheel, right away.
    Stop,
}

impl MotionCommand {
    /// Maneuver, speeds and hold time behind this command. `None` for `Stop`.
    pub fn plan(self) -> Option<(Maneuver, Speeds, u32)> {
        let uniform = |m: Maneuver, s: u16, t: u32| Some((m, Speeds::uniform(s), t));
        match self {
            MotionCommand::Forward { s, t } => uniform(Maneuver::GoForward, s, t),
            MotionCommand::Backward { s, t } => uniform(Maneuver::GoBackward, s, t),
            MotionCommand::TurnLeft { s, t } => uniform(Maneuver::TurnLeft, s, t),
            MotionCommand::TurnRight { s, t } => uniform(Maneuver::TurnRight, s, t),
            MotionCommand::TurnLeftBack { s, t } => uniform(Maneuver::TurnLeftBack, s, t),
            MotionCommand::TurnRightBack { s, t } => uniform(Maneuver::TurnRightBack, s, t),
            MotionCommand::RotateCw { s, t } => uniform(Maneuver::RotateClockwise, s, t),
            MotionCommand::RotateCcw { s, t } => uniform(Maneuver::RotateCounterClockwise, s, t),
            MotionCommand::ShiftRight { fl, rl, rr, fr, t } => {
                Some((Maneuver::ShiftRight, Speeds::shift(fl, rl, rr, fr), t))
            }
            MotionCommand::ShiftLeft { fl, rl, rr, fr, t } => {
                Some((Maneuver::ShiftLeft, Speeds::shift(fl, rl, rr, fr), t))
            }
            MotionCommand::Stop => None,
        }
    }
}

/// Blocking maneuver controller for a four-wheel mecanum car.
pub struct MecanumDrive<B, D> {
    bank: B,
    delay: D,
    pins: PinMap,
    max_duty: Option<u16>,
}

impl<B, D, E> MecanumDrive<B, D>
where
    B: PinBank<Error = E>,
    D: DelayNs,
    E: core::fmt::Debug,
{
    /// Validate the pin map, configure all twelve pins as outputs and zero the
    /// four speed lines.
    ///
    /// `max_duty` caps every duty written by a maneuver; `None` passes duties
    /// through to the bank unchecked.
    pub fn new(
        bank: B,
        delay: D,
        pins: PinMap,
        max_duty: Option<u16>,
    ) -> Result<Self, DriveError<E>> {
        pins.validate().map_err(DriveError::Config)?;

        let mut drive = MecanumDrive {
            bank,
            delay,
            pins,
            max_duty,
        };
        drive.init()?;
        tracing::info!(pins = ?drive.pins.slots(), ?max_duty, "mecanum drive ready");

        Ok(drive)
    }

    fn init(&mut self) -> Result<(), DriveError<E>> {
        for pin in self.pins.slots() {
            self.bank.configure_output(pin).map_err(DriveError::Io)?;
        }
        self.stop()
    }

    pub fn pins(&self) -> &PinMap {
        &self.pins
    }

    /// Give back the pin bank and delay.
    pub fn release(self) -> (B, D) {
        (self.bank, self.delay)
    }

    /// Set one wheel's direction pair, then its duty.
    ///
    /// Forward is dir1 HIGH / dir2 LOW, backward the opposite. Never blocks.
    pub fn drive_wheel(
        &mut self,
        wheel: WheelPosition,
        direction: Direction,
        duty: u16,
    ) -> Result<(), DriveError<E>> {
        let pins = *self.pins.wheel(wheel);
        let (dir1, dir2) = match direction {
            Direction::Forward => (PinState::High, PinState::Low),
            Direction::Backward => (PinState::Low, PinState::High),
        };
        let duty = match self.max_duty {
            Some(max) => duty.min(max),
            None => duty,
        };

        self.bank
            .write_digital(pins.dir1, dir1)
            .map_err(DriveError::Io)?;
        self.bank
            .write_digital(pins.dir2, dir2)
            .map_err(DriveError::Io)?;
        self.bank
            .write_analog(pins.speed, duty)
            .map_err(DriveError::Io)
    }

    /// Zero duty on all four speed lines. Direction lines are left as they are.
    ///
    /// Every wheel is attempted even if an earlier write fails; the first
    /// failure is returned.
    pub fn stop(&mut self) -> Result<(), DriveError<E>> {
        let mut result = Ok(());
        for wheel in WheelPosition::ALL {
            let speed = self.pins.wheel(wheel).speed;
            if let Err(e) = self.bank.write_analog(speed, 0) {
                tracing::error!(?wheel, ?e, "failed to stop wheel");
                if result.is_ok() {
                    result = Err(DriveError::Io(e));
                }
            }
        }
        result
    }

    /// Apply `maneuver`, hold it for `time_ms`, then stop.
    ///
    /// Blocks the caller for the whole hold. If the pattern cannot be applied
    /// the car is stopped before the error is returned.
    pub fn execute(
        &mut self,
        maneuver: Maneuver,
        speeds: Speeds,
        time_ms: u32,
    ) -> Result<(), DriveError<E>> {
        tracing::debug!(?maneuver, ?speeds, time_ms, "maneuver");

        for (wheel, cmd) in maneuver.commands(speeds) {
            if let Err(e) = self.drive_wheel(wheel, cmd.direction, cmd.duty) {
                tracing::error!(?maneuver, ?wheel, "maneuver aborted");
                let _ = self.stop();
                return Err(e);
            }
        }
        self.delay.delay_ms(time_ms);

        self.stop()
    }

    /// Run one `MotionCommand` to completion.
    pub fn execute_command(
        &mut self,
        command: MotionCommand,
    ) -> Result<(), DriveError<E>> {
        match command.plan() {
            Some((maneuver, speeds, time_ms)) => self.execute(maneuver, speeds, time_ms),
            None => self.stop(),
        }
    }

    pub fn go_forward(
        &mut self,
        speed: u16,
        time_ms: u32,
    ) -> Result<(), DriveError<E>> {
        self.execute(Maneuver::GoForward, Speeds::uniform(speed), time_ms)
    }

    pub fn go_backward(
        &mut self,
        speed: u16,
        time_ms: u32,
    ) -> Result<(), DriveError<E>> {
        self.execute(Maneuver::GoBackward, Speeds::uniform(speed), time_ms)
    }

    /// Pivot left on the right-hand wheels.
    pub fn turn_left(
        &mut self,
        speed: u16,
        time_ms: u32,
    ) -> Result<(), DriveError<E>> {
        self.execute(Maneuver::TurnLeft, Speeds::uniform(speed), time_ms)
    }

    /// Pivot right on the left-hand wheels.
    pub fn turn_right(
        &mut self,
        speed: u16,
        time_ms: u32,
    ) -> Result<(), DriveError<E>> {
        self.execute(Maneuver::TurnRight, Speeds::uniform(speed), time_ms)
    }

    pub fn turn_left_back(
        &mut self,
        speed: u16,
        time_ms: u32,
    ) -> Result<(), DriveError<E>> {
        self.execute(Maneuver::TurnLeftBack, Speeds::uniform(speed), time_ms)
    }

    pub fn turn_right_back(
        &mut self,
        speed: u16,
        time_ms: u32,
    ) -> Result<(), DriveError<E>> {
        self.execute(Maneuver::TurnRightBack, Speeds::uniform(speed), time_ms)
    }

    pub fn rotate_clockwise(
        &mut self,
        speed: u16,
        time_ms: u32,
    ) -> Result<(), DriveError<E>> {
        self.execute(Maneuver::RotateClockwise, Speeds::uniform(speed), time_ms)
    }

    pub fn rotate_counterclockwise(
        &mut self,
        speed: u16,
        time_ms: u32,
    ) -> Result<(), DriveError<E>> {
        self.execute(
            Maneuver::RotateCounterClockwise,
            Speeds::uniform(speed),
            time_ms,
        )
    }

    /// Strafe right. Front left and rear right spin forward, the others backward.
    pub fn shift_right(
        &mut self,
        fl: u16,
        rl: u16,
        rr: u16,
        fr: u16,
        time_ms: u32,
    ) -> Result<(), DriveError<E>> {
        self.execute(Maneuver::ShiftRight, Speeds::shift(fl, rl, rr, fr), time_ms)
    }

    /// Strafe left. Mirror of [`shift_right`](Self::shift_right).
    pub fn shift_left(
        &mut self,
        fl: u16,
        rl: u16,
        rr: u16,
        fr: u16,
        time_ms: u32,
    ) -> Result<(), DriveError<E>> {
        self.execute(Maneuver::ShiftLeft, Speeds::shift(fl, rl, rr, fr), time_ms)
    }
}
