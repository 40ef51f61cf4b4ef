//! Core drivers and the maneuver table for a four-wheel mecanum robot car on
//! no-std embedded platforms.
//!
//! For a runnable host build, see the `mock-mcu` application in `mwb-app/`.
#![no_std]

pub mod utils;
