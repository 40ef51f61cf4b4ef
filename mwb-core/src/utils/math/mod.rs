//! Math utilities for the Mecanum-Wheel Bot.
//!
//! This module holds the wheel direction/duty patterns for every whole-vehicle maneuver.

pub mod maneuvers;
