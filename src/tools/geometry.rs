//! Pure geometry behind the shape tools.

use egui::{Pos2, Vec2, pos2, vec2};

/// Half of the 45° sector used when snapping angles
const SNAP_HALF_SECTOR: f32 = 22.5;

/// Fraction of the shaft an arrow head may occupy
const MAX_HEAD_FRACTION: f32 = 0.9;

/// Snap `current` so the segment from `origin` is horizontal, vertical or diagonal.
///
/// Within 22.5° of horizontal the vertical delta is dropped, within 22.5° of
/// vertical the horizontal delta is dropped. In the diagonal band both deltas
/// meet at their mean magnitude, keeping their signs.
pub fn snap_angle(origin: Pos2, current: Pos2) -> Pos2 {
    let d = current - origin;
    let degrees = if d.x == 0.0 {
        90.0
    } else {
        (-d.y / d.x).atan().to_degrees()
    };

    if degrees.abs() < SNAP_HALF_SECTOR {
        pos2(current.x, origin.y)
    } else if degrees.abs() > 90.0 - SNAP_HALF_SECTOR {
        pos2(origin.x, current.y)
    } else {
        let base = (d.x.abs() - d.y.abs()) / 2.0;
        pos2(
            current.x - base * sign(d.x),
            current.y + base * sign(d.y),
        )
    }
}

/// Shrink the larger side of a drag box so width and height match, keeping signs
pub fn constrain_square(size: Vec2) -> Vec2 {
    let side = size.x.abs().min(size.y.abs());
    vec2(side * sign(size.x), side * sign(size.y))
}

fn sign(v: f32) -> f32 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

/// Effective head length: never more than 90% of the shaft
pub fn arrow_head_length(arrow_length: f32, shaft_length: f32) -> f32 {
    arrow_length.min(MAX_HEAD_FRACTION * shaft_length).max(0.0)
}

/// Outline points of a concave-backed arrow head
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowHead {
    /// Head length after clamping to the shaft
    pub length: f32,
    pub tip: Pos2,
    pub flanks: [Pos2; 2],
    /// Where the head's back meets the shaft, a third of the way to each flank
    pub notches: [Pos2; 2],
}

impl ArrowHead {
    /// Closed polygon covering shaft and head, starting at the tip
    pub fn outline(&self, origin: Pos2) -> [Pos2; 6] {
        [
            self.tip,
            self.flanks[0],
            self.notches[0],
            origin,
            self.notches[1],
            self.flanks[1],
        ]
    }
}

/// Arrow head for a shaft from `origin` to `end`.
///
/// The head is centered on `end`: the tip sits `length` beyond it along the
/// shaft direction and the flanks sit at ±120° from the tip direction.
pub fn arrow_head(origin: Pos2, end: Pos2, arrow_length: f32) -> ArrowHead {
    let length = arrow_head_length(arrow_length, origin.distance(end));
    let angle = (end.y - origin.y).atan2(end.x - origin.x);
    let third = std::f32::consts::TAU / 3.0;
    let around = |a: f32| end + length * Vec2::angled(a);

    let tip = around(angle);
    let flanks = [around(angle + third), around(angle + 2.0 * third)];
    let notches = flanks.map(|flank| end + (flank - end) / 3.0);

    ArrowHead {
        length,
        tip,
        flanks,
        notches,
    }
}
