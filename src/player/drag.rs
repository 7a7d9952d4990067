//! Pointer-drag state machines for the progress and volume bars.
//!
//! A drag starts on pointer-down, reports a clamped `[0, 1]` fraction on
//! every move and once more on release. Moves outside a drag are ignored.

use super::format::clamp_fraction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Fraction grows left to right
    Horizontal,
    /// Fraction grows bottom to top
    Vertical,
}

/// On-screen extent of a bar along its axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub start: f64,
    pub length: f64,
}

impl BarGeometry {
    pub fn new(start: f64, length: f64) -> Self {
        Self { start, length }
    }

    /// A bar drawn as `count` whole cells from `first`. The first and last
    /// cell map to the two ends of the bar.
    pub fn from_cells(first: u16, count: u16) -> Self {
        Self::new(first as f64, count.saturating_sub(1) as f64)
    }

    pub fn contains(&self, coord: f64) -> bool {
        coord >= self.start && coord < self.start + self.length
    }
}

#[derive(Debug, Clone)]
pub struct DragController {
    axis: Axis,
    state: DragState,
    geometry: BarGeometry,
}

impl DragController {
    pub fn new(axis: Axis, geometry: BarGeometry) -> Self {
        Self {
            axis,
            state: DragState::Idle,
            geometry,
        }
    }

    pub fn horizontal(geometry: BarGeometry) -> Self {
        Self::new(Axis::Horizontal, geometry)
    }

    pub fn vertical(geometry: BarGeometry) -> Self {
        Self::new(Axis::Vertical, geometry)
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state == DragState::Dragging
    }

    pub fn geometry(&self) -> BarGeometry {
        self.geometry
    }

    /// Bars move when the layout changes; an active drag keeps going
    pub fn set_geometry(&mut self, geometry: BarGeometry) {
        self.geometry = geometry;
    }

    pub fn start(&mut self) {
        self.state = DragState::Dragging;
    }

    pub fn move_to(&mut self, coord: f64) -> Option<f64> {
        self.is_dragging().then(|| self.fraction_at(coord))
    }

    pub fn end(&mut self, coord: f64) -> Option<f64> {
        let fraction = self.move_to(coord);
        self.state = DragState::Idle;
        fraction
    }

    pub fn fraction_at(&self, coord: f64) -> f64 {
        if self.geometry.length <= 0.0 {
            return 0.0;
        }
        let along = (coord - self.geometry.start) / self.geometry.length;
        match self.axis {
            Axis::Horizontal => clamp_fraction(along),
            Axis::Vertical => clamp_fraction(1.0 - along),
        }
    }
}

/// Seek target for a progress-bar fraction; unknown durations seek to 0
pub fn seek_target(duration: f64, fraction: f64) -> f64 {
    if duration.is_finite() && duration > 0.0 {
        duration * clamp_fraction(fraction)
    } else {
        0.0
    }
}
