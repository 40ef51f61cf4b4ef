//! Utility re-exports and helper macros for the Mecanum-Wheel Bot.
//!
//! - `controllers`: pin map, pin banks (PCA9685 over I2C, direct GPIO) and
//!   the `MecanumDrive` maneuver controller
//! - `math`: the constant per-wheel pattern table behind every maneuver
//!
//! The `mk_static!` macro simplifies static initialization in no-std contexts.

pub mod controllers;
pub mod math;

pub use controllers::{MecanumDrive, MotionCommand, SystemController};
pub use embassy_time::Delay;
pub use math::maneuvers::{Direction, Maneuver, Speeds, WheelPosition};

#[macro_export]
/// Initialize a no-std static cell and write the given value into it.
///
/// This macro creates a `static_cell::StaticCell` for type `$t` and initializes
/// it with `$val`, returning a mutable reference to the stored value.
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        STATIC_CELL.uninit().write($val)
    }};
}
