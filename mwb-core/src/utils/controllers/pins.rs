//! Pin map and the I/O seam between the drive and the hardware.
//!
//! The construction order of the twelve pin identifiers is fixed and matches
//! existing wiring tables:
//!
//! | slot | pin            | slot | pin            |
//! |------|----------------|------|----------------|
//! | 0    | rear right spd | 6    | front right spd|
//! | 1    | rear right d1  | 7    | front right d1 |
//! | 2    | rear right d2  | 8    | front right d2 |
//! | 3    | rear left spd  | 9    | front left spd |
//! | 4    | rear left d1   | 10   | front left d1  |
//! | 5    | rear left d2   | 11   | front left d2  |

use embedded_hal::digital::PinState;
use serde::{Deserialize, Serialize};

use crate::utils::math::maneuvers::WheelPosition;

/// Logical pin identifier understood by a [`PinBank`].
pub type PinId = u8;

/// Errors detected while building a [`PinMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The same identifier appears in more than one slot.
    DuplicatePin(PinId),
}

/// Speed line plus the two H-bridge direction lines of one wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelPins {
    pub speed: PinId,
    pub dir1: PinId,
    pub dir2: PinId,
}

impl WheelPins {
    pub const fn new(
        speed: PinId,
        dir1: PinId,
        dir2: PinId,
    ) -> Self {
        Self { speed, dir1, dir2 }
    }
}

/// All twelve pins of the car, one triple per wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinMap {
    pub rear_right: WheelPins,
    pub rear_left: WheelPins,
    pub front_right: WheelPins,
    pub front_left: WheelPins,
}

impl PinMap {
    /// Build a map from the flat wiring order (see module docs).
    pub fn from_slots(slots: [PinId; 12]) -> Result<Self, ConfigError> {
        let triple = |i: usize| WheelPins::new(slots[i], slots[i + 1], slots[i + 2]);
        let map = PinMap {
            rear_right: triple(0),
            rear_left: triple(3),
            front_right: triple(6),
            front_left: triple(9),
        };
        map.validate()?;
        Ok(map)
    }

    /// The flat wiring order this map was built from.
    pub fn slots(&self) -> [PinId; 12] {
        let mut out = [0; 12];
        for (i, wheel) in WheelPosition::ALL.iter().enumerate() {
            let p = self.wheel(*wheel);
            out[i * 3] = p.speed;
            out[i * 3 + 1] = p.dir1;
            out[i * 3 + 2] = p.dir2;
        }
        out
    }

    pub fn wheel(
        &self,
        wheel: WheelPosition,
    ) -> &WheelPins {
        match wheel {
            WheelPosition::FrontLeft => &self.front_left,
            WheelPosition::FrontRight => &self.front_right,
            WheelPosition::RearLeft => &self.rear_left,
            WheelPosition::RearRight => &self.rear_right,
        }
    }

    /// Check that no identifier is used twice.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let slots = self.slots();
        for (i, pin) in slots.iter().enumerate() {
            if slots[i + 1..].contains(pin) {
                return Err(ConfigError::DuplicatePin(*pin));
            }
        }
        Ok(())
    }
}

/// Digital and analog output primitives, addressed by [`PinId`].
///
/// Writes are assumed to take effect synchronously, one pin at a time.
pub trait PinBank {
    type Error: core::fmt::Debug;

    /// Prepare `pin` to be driven as an output. Unknown pins are an error.
    fn configure_output(
        &mut self,
        pin: PinId,
    ) -> Result<(), Self::Error>;

    fn write_digital(
        &mut self,
        pin: PinId,
        level: PinState,
    ) -> Result<(), Self::Error>;

    /// Write a PWM duty. The range is whatever the implementation supports.
    fn write_analog(
        &mut self,
        pin: PinId,
        duty: u16,
    ) -> Result<(), Self::Error>;
}

impl<T: PinBank + ?Sized> PinBank for &mut T {
    type Error = T::Error;

    fn configure_output(
        &mut self,
        pin: PinId,
    ) -> Result<(), Self::Error> {
        (**self).configure_output(pin)
    }

    fn write_digital(
        &mut self,
        pin: PinId,
        level: PinState,
    ) -> Result<(), Self::Error> {
        (**self).write_digital(pin, level)
    }

    fn write_analog(
        &mut self,
        pin: PinId,
        duty: u16,
    ) -> Result<(), Self::Error> {
        (**self).write_analog(pin, duty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLOTS: [PinId; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

    #[test]
    fn test_from_slots_groups_triples_in_wiring_order() {
        let map = PinMap::from_slots(SLOTS).unwrap();
        assert_eq!(map.rear_right, WheelPins::new(0, 1, 2));
        assert_eq!(map.rear_left, WheelPins::new(3, 4, 5));
        assert_eq!(map.front_right, WheelPins::new(6, 7, 8));
        assert_eq!(map.front_left, WheelPins::new(9, 10, 11));
        assert_eq!(map.slots(), SLOTS);
    }

    #[test]
    fn test_duplicate_pin_rejected() {
        let mut slots = SLOTS;
        slots[10] = 3;
        assert_eq!(PinMap::from_slots(slots), Err(ConfigError::DuplicatePin(3)));
    }
}
