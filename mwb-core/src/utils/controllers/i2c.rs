//! PCA9685 pin bank for the Mecanum-Wheel Bot.
//!
//! Drives all twelve wheel lines from one PCA9685 PWM expander on a shared I2C
//! bus. Pin identifiers are the chip's channels 0-15. Direction lines use the
//! full-on / full-off bits, speed lines a 12-bit duty.

use core::cell::RefCell;

use embedded_hal::{digital::PinState, i2c::I2c};
use embedded_hal_bus::i2c::RefCellDevice;
use pwm_pca9685::{Address as PwmAddress, Channel, Error as PwmError, Pca9685};

use super::pins::{PinBank, PinId};

/// Default I2C address of the motor PWM expander.
pub const PWM_ADDRESS: u8 = 0x55;
/// Largest duty the PCA9685 accepts (12-bit counter).
pub const MAX_DUTY: u16 = 4095;

const CHANNELS: [Channel; 16] = [
    Channel::C0,
    Channel::C1,
    Channel::C2,
    Channel::C3,
    Channel::C4,
    Channel::C5,
    Channel::C6,
    Channel::C7,
    Channel::C8,
    Channel::C9,
    Channel::C10,
    Channel::C11,
    Channel::C12,
    Channel::C13,
    Channel::C14,
    Channel::C15,
];

/// Errors that can occur when driving pins through the PCA9685.
#[derive(Debug)]
pub enum PinError<E: core::fmt::Debug> {
    PwmError(PwmError<E>),
    /// Pin id is not a PCA9685 channel.
    InvalidChannel(PinId),
    /// Duty above [`MAX_DUTY`].
    DutyOutOfRange(u16),
}

/// [`PinBank`] backed by a PCA9685 on a shared I2C bus.
pub struct I2CPins<'a, I2C: 'static> {
    pwm: Pca9685<RefCellDevice<'a, I2C>>,
}

impl<'a, I2C, E> I2CPins<'a, I2C>
where
    I2C: I2c<Error = E> + 'static,
    E: core::fmt::Debug,
{
    /// Attach to the expander at `address` (defaults to [`PWM_ADDRESS`]).
    pub fn new(
        i2c_bus: &'a RefCell<I2C>,
        address: Option<u8>,
    ) -> Result<Self, PinError<E>> {
        let pwm = Pca9685::new(
            RefCellDevice::new(i2c_bus),
            PwmAddress::from(address.unwrap_or(PWM_ADDRESS)),
        )
        .map_err(PinError::PwmError)?;

        Ok(I2CPins { pwm })
    }

    /// Enable the PWM expander and set its prescale (100, roughly 60Hz).
    pub fn configure(&mut self) -> Result<(), PinError<E>> {
        self.pwm.enable().map_err(PinError::PwmError)?;
        tracing::info!("PWM enabled");
        self.pwm.set_prescale(100).map_err(PinError::PwmError)?;
        tracing::info!("PWM prescale set to 60Hz");
        Ok(())
    }

    /// Put the expander to sleep; every output stops toggling.
    pub fn disable(&mut self) -> Result<(), PinError<E>> {
        self.pwm.disable().map_err(PinError::PwmError)
    }

    fn channel(pin: PinId) -> Result<Channel, PinError<E>> {
        CHANNELS
            .get(pin as usize)
            .copied()
            .ok_or(PinError::InvalidChannel(pin))
    }
}

impl<I2C, E> PinBank for I2CPins<'_, I2C>
where
    I2C: I2c<Error = E> + 'static,
    E: core::fmt::Debug,
{
    type Error = PinError<E>;

    fn configure_output(
        &mut self,
        pin: PinId,
    ) -> Result<(), Self::Error> {
        // PCA9685 channels are always outputs.
        Self::channel(pin).map(|_| ())
    }

    fn write_digital(
        &mut self,
        pin: PinId,
        level: PinState,
    ) -> Result<(), Self::Error> {
        let channel = Self::channel(pin)?;
        match level {
            PinState::High => {
                // full-off wins over full-on, so clear it first
                self.pwm
                    .set_channel_off(channel, 0)
                    .map_err(PinError::PwmError)?;
                self.pwm
                    .set_channel_full_on(channel, 0)
                    .map_err(PinError::PwmError)
            }
            PinState::Low => self
                .pwm
                .set_channel_full_off(channel)
                .map_err(PinError::PwmError),
        }
    }

    fn write_analog(
        &mut self,
        pin: PinId,
        duty: u16,
    ) -> Result<(), Self::Error> {
        if duty > MAX_DUTY {
            return Err(PinError::DutyOutOfRange(duty));
        }
        self.pwm
            .set_channel_on_off(Self::channel(pin)?, 0, duty)
            .map_err(PinError::PwmError)
    }
}
