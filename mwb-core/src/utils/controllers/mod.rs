//! Module Exports
//!
//! - `pins`: pin map and the `PinBank` I/O seam
//! - `drive`: the blocking `MecanumDrive` maneuver controller
//! - `i2c`: PCA9685-backed pin bank
//! - `gpio`: pin bank over HAL output pins and PWM channels

pub mod drive;
pub mod gpio;
pub mod i2c;
pub mod pins;

use embedded_hal::delay::DelayNs;

pub use drive::{DriveError, MecanumDrive, MotionCommand, MOTION_CHANNEL};
pub use pins::{ConfigError, PinBank, PinId, PinMap, WheelPins};

/// Owns the drive and serves `MOTION_CHANNEL`, one command at a time.
pub struct SystemController<B, D> {
    pub drive: MecanumDrive<B, D>,
}

impl<B, D, E> SystemController<B, D>
where
    B: PinBank<Error = E>,
    D: DelayNs,
    E: core::fmt::Debug,
{
    pub fn new(drive: MecanumDrive<B, D>) -> Self {
        SystemController { drive }
    }

    /// Run one command to completion and log the outcome.
    pub fn handle(
        &mut self,
        command: MotionCommand,
    ) -> Result<(), DriveError<E>> {
        match self.drive.execute_command(command) {
            Ok(()) => {
                tracing::info!("Motion command executed successfully");
                Ok(())
            }
            Err(e) => {
                tracing::error!(?e, "Motion command failed");
                Err(e)
            }
        }
    }

    /// Wait for the next command on `MOTION_CHANNEL` and run it to completion.
    pub async fn next_command(&mut self) -> Result<(), DriveError<E>> {
        let command = MOTION_CHANNEL.receiver().receive().await;
        tracing::info!("Received motion command: {:?}", command);
        self.handle(command)
    }

    /// Receive and execute commands forever.
    ///
    /// The next command is only received once the current maneuver has
    /// finished its hold and stopped the car.
    pub async fn motion_ch(&mut self) -> ! {
        loop {
            let _ = self.next_command().await;
        }
    }
}
