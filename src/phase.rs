//! Gesture phases per mode, and which move handlers each phase runs.

use crate::config::{ControlsConfig, Mode};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OrbitPhase {
    #[default]
    Idle,
    Rotating,
    Dollying,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MapPhase {
    #[default]
    Idle,
    Panning,
    RotatingOrZooming,
}

/// The single active gesture phase. The variant always matches the
/// configured [`Mode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    Orbit(OrbitPhase),
    Map(MapPhase),
}

impl GesturePhase {
    pub fn idle(mode: Mode) -> Self {
        match mode {
            Mode::Orbit => GesturePhase::Orbit(OrbitPhase::Idle),
            Mode::Map => GesturePhase::Map(MapPhase::Idle),
        }
    }

    pub fn mode(self) -> Mode {
        match self {
            GesturePhase::Orbit(_) => Mode::Orbit,
            GesturePhase::Map(_) => Mode::Map,
        }
    }

    pub fn is_idle(self) -> bool {
        matches!(
            self,
            GesturePhase::Orbit(OrbitPhase::Idle) | GesturePhase::Map(MapPhase::Idle)
        )
    }

    /// Number of touches this phase was entered with.
    pub fn touch_count(self) -> usize {
        match self {
            GesturePhase::Orbit(OrbitPhase::Idle) | GesturePhase::Map(MapPhase::Idle) => 0,
            GesturePhase::Orbit(OrbitPhase::Rotating) | GesturePhase::Map(MapPhase::Panning) => 1,
            GesturePhase::Orbit(OrbitPhase::Dollying)
            | GesturePhase::Map(MapPhase::RotatingOrZooming) => 2,
        }
    }
}

/// Sub-handlers to run for a touch-move event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveHandlers {
    pub rotate: bool,
    pub dolly: bool,
    pub pan: bool,
    pub rotate_or_zoom: bool,
}

impl MoveHandlers {
    pub const NONE: Self = Self {
        rotate: false,
        dolly: false,
        pan: false,
        rotate_or_zoom: false,
    };

    /// The mode policy table, before enable flags are considered.
    pub const fn for_phase(phase: GesturePhase) -> Self {
        match phase {
            GesturePhase::Orbit(OrbitPhase::Idle) | GesturePhase::Map(MapPhase::Idle) => Self::NONE,
            GesturePhase::Orbit(OrbitPhase::Rotating) => Self {
                rotate: true,
                ..Self::NONE
            },
            GesturePhase::Orbit(OrbitPhase::Dollying) => Self {
                dolly: true,
                pan: true,
                ..Self::NONE
            },
            GesturePhase::Map(MapPhase::Panning) => Self {
                pan: true,
                ..Self::NONE
            },
            GesturePhase::Map(MapPhase::RotatingOrZooming) => Self {
                rotate_or_zoom: true,
                ..Self::NONE
            },
        }
    }

    /// [`MoveHandlers::for_phase`] with the per-axis enable flags applied.
    /// Rotate-or-zoom always runs: it gates its zoom and rotation parts
    /// internally and must keep its anchors current.
    pub fn gated(phase: GesturePhase, config: &ControlsConfig) -> Self {
        let table = Self::for_phase(phase);
        Self {
            rotate: table.rotate && config.enable_rotate,
            dolly: table.dolly && config.enable_zoom,
            pan: table.pan && config.enable_pan,
            rotate_or_zoom: table.rotate_or_zoom,
        }
    }

    pub fn any(self) -> bool {
        self.rotate || self.dolly || self.pan || self.rotate_or_zoom
    }
}
