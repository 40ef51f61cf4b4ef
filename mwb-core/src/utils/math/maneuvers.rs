//! Wheel patterns for a four-wheel mecanum car.
//!
//! Every whole-vehicle maneuver is a constant row of four wheel patterns: the
//! direction each wheel spins in and whether it receives its speed or duty 0.
//! The rows below are the sign conventions for the osoyoo-style chassis
//! (rollers at 45°, "X" layout seen from above) and are the only place they live.
//!
//! # Example
//! ```rust
//! use mwb_core::utils::math::maneuvers::{Direction, Maneuver, Speeds, WheelPosition};
//! let cmds = Maneuver::TurnLeft.commands(Speeds::uniform(150));
//! let (wheel, fr) = cmds[2];
//! assert_eq!(wheel, WheelPosition::FrontRight);
//! assert_eq!((fr.direction, fr.duty), (Direction::Forward, 150));
//! ```

use serde::{Deserialize, Serialize};

/// One of the four independently driven wheels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelPosition {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
}

impl WheelPosition {
    /// Wheels in wiring order: rear right first, front left last.
    pub const ALL: [WheelPosition; 4] = [
        WheelPosition::RearRight,
        WheelPosition::RearLeft,
        WheelPosition::FrontRight,
        WheelPosition::FrontLeft,
    ];

    /// Write order for straight runs, pivot turns and rotations.
    pub const APPLY_ORDER: [WheelPosition; 4] = [
        WheelPosition::RearLeft,
        WheelPosition::RearRight,
        WheelPosition::FrontRight,
        WheelPosition::FrontLeft,
    ];

    /// Write order for the lateral shifts, same as their speed arguments.
    pub const SHIFT_ORDER: [WheelPosition; 4] = [
        WheelPosition::FrontLeft,
        WheelPosition::RearLeft,
        WheelPosition::RearRight,
        WheelPosition::FrontRight,
    ];

    /// Column of this wheel in a [`Pattern`] (FL, FR, RL, RR).
    pub const fn column(self) -> usize {
        match self {
            WheelPosition::FrontLeft => 0,
            WheelPosition::FrontRight => 1,
            WheelPosition::RearLeft => 2,
            WheelPosition::RearRight => 3,
        }
    }
}

/// Spin direction of a single wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub const fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Direction plus duty for one wheel. Built fresh for every maneuver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveCommand {
    pub direction: Direction,
    pub duty: u16,
}

/// How one wheel takes part in a maneuver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelPattern {
    pub direction: Direction,
    /// `false` means the wheel is held at duty 0 (its direction pair is still written).
    pub driven: bool,
}

/// One table row, indexed by [`WheelPosition::column`].
pub type Pattern = [WheelPattern; 4];

const fn on(direction: Direction) -> WheelPattern {
    WheelPattern {
        direction,
        driven: true,
    }
}

const fn idle(direction: Direction) -> WheelPattern {
    WheelPattern {
        direction,
        driven: false,
    }
}

use Direction::{Backward as B, Forward as F};

// Columns: FL, FR, RL, RR.
const GO_FORWARD: Pattern = [on(F), on(F), on(F), on(F)];
const GO_BACKWARD: Pattern = [on(B), on(B), on(B), on(B)];
const TURN_LEFT: Pattern = [idle(B), on(F), idle(B), on(F)];
const TURN_RIGHT: Pattern = [on(F), idle(F), on(F), idle(F)];
const TURN_LEFT_BACK: Pattern = [idle(F), on(B), idle(F), on(B)];
const TURN_RIGHT_BACK: Pattern = [on(B), idle(F), on(B), idle(F)];
const ROTATE_CW: Pattern = [on(F), on(B), on(F), on(B)];
const ROTATE_CCW: Pattern = [on(B), on(F), on(B), on(F)];
const SHIFT_RIGHT: Pattern = [on(F), on(B), on(B), on(F)];
const SHIFT_LEFT: Pattern = [on(B), on(F), on(F), on(B)];

/// Per-wheel speed arguments of a maneuver.
///
/// Most maneuvers take one speed for every wheel ([`Speeds::uniform`]). The
/// shift maneuvers take four, in the positional order `fl, rl, rr, fr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Speeds {
    pub fl: u16,
    pub rl: u16,
    pub rr: u16,
    pub fr: u16,
}

impl Speeds {
    pub const fn uniform(speed: u16) -> Self {
        Self {
            fl: speed,
            rl: speed,
            rr: speed,
            fr: speed,
        }
    }

    pub const fn shift(
        fl: u16,
        rl: u16,
        rr: u16,
        fr: u16,
    ) -> Self {
        Self { fl, rl, rr, fr }
    }

    pub const fn for_wheel(
        &self,
        wheel: WheelPosition,
    ) -> u16 {
        match wheel {
            WheelPosition::FrontLeft => self.fl,
            WheelPosition::FrontRight => self.fr,
            WheelPosition::RearLeft => self.rl,
            WheelPosition::RearRight => self.rr,
        }
    }
}

/// Named whole-vehicle motions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Maneuver {
    GoForward,
    GoBackward,
    TurnLeft,
    TurnRight,
    TurnLeftBack,
    TurnRightBack,
    RotateClockwise,
    RotateCounterClockwise,
    ShiftRight,
    ShiftLeft,
}

impl Maneuver {
    pub const ALL: [Maneuver; 10] = [
        Maneuver::GoForward,
        Maneuver::GoBackward,
        Maneuver::TurnLeft,
        Maneuver::TurnRight,
        Maneuver::TurnLeftBack,
        Maneuver::TurnRightBack,
        Maneuver::RotateClockwise,
        Maneuver::RotateCounterClockwise,
        Maneuver::ShiftRight,
        Maneuver::ShiftLeft,
    ];

    /// The constant table row for this maneuver.
    pub const fn pattern(self) -> &'static Pattern {
        match self {
            Maneuver::GoForward => &GO_FORWARD,
            Maneuver::GoBackward => &GO_BACKWARD,
            Maneuver::TurnLeft => &TURN_LEFT,
            Maneuver::TurnRight => &TURN_RIGHT,
            Maneuver::TurnLeftBack => &TURN_LEFT_BACK,
            Maneuver::TurnRightBack => &TURN_RIGHT_BACK,
            Maneuver::RotateClockwise => &ROTATE_CW,
            Maneuver::RotateCounterClockwise => &ROTATE_CCW,
            Maneuver::ShiftRight => &SHIFT_RIGHT,
            Maneuver::ShiftLeft => &SHIFT_LEFT,
        }
    }

    /// The maneuver whose row spins every wheel the other way, if there is one.
    ///
    /// Pivot turns have none: backing out of a left turn drives the other pair of wheels.
    pub const fn inverse(self) -> Option<Maneuver> {
        match self {
            Maneuver::GoForward => Some(Maneuver::GoBackward),
            Maneuver::GoBackward => Some(Maneuver::GoForward),
            Maneuver::RotateClockwise => Some(Maneuver::RotateCounterClockwise),
            Maneuver::RotateCounterClockwise => Some(Maneuver::RotateClockwise),
            Maneuver::ShiftRight => Some(Maneuver::ShiftLeft),
            Maneuver::ShiftLeft => Some(Maneuver::ShiftRight),
            _ => None,
        }
    }

    /// Order in which this maneuver's row is written to the wheels.
    pub const fn apply_order(self) -> [WheelPosition; 4] {
        match self {
            Maneuver::ShiftRight | Maneuver::ShiftLeft => WheelPosition::SHIFT_ORDER,
            _ => WheelPosition::APPLY_ORDER,
        }
    }

    /// Resolve the row against concrete speeds.
    ///
    /// Returns one command per wheel in [`apply_order`](Self::apply_order).
    pub fn commands(
        self,
        speeds: Speeds,
    ) -> [(WheelPosition, DriveCommand); 4] {
        let row = self.pattern();
        self.apply_order().map(|wheel| {
            let cell = row[wheel.column()];
            let duty = if cell.driven {
                speeds.for_wheel(wheel)
            } else {
                0
            };
            (
                wheel,
                DriveCommand {
                    direction: cell.direction,
                    duty,
                },
            )
        })
    }
}
