use egui::{Pos2, Rect, pos2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Triangle,
}

/// Geometry of a dragged shape, from the anchor to the current pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    kind: ShapeKind,
    bounds: Rect,
    /// Vertical drag direction; `true` when the pointer ended above the anchor
    upward: bool,
}

impl Shape {
    pub fn from_drag(kind: ShapeKind, anchor: Pos2, current: Pos2) -> Self {
        Self {
            kind,
            bounds: Rect::from_two_pos(anchor, current),
            upward: current.y < anchor.y,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn width(&self) -> f32 {
        self.bounds.width()
    }

    pub fn height(&self) -> f32 {
        self.bounds.height()
    }

    /// Too thin in either direction to be worth committing
    pub fn is_degenerate(&self, min_extent: f32) -> bool {
        self.width() < min_extent || self.height() < min_extent
    }

    /// Triangle corners: apex centred on one horizontal edge, base along the
    /// other. A downward drag puts the apex on top; an upward drag flips it
    /// to the bottom.
    pub fn vertices(&self) -> [Pos2; 3] {
        let Rect { min, max } = self.bounds;
        let mid_x = min.x + self.bounds.width() / 2.0;
        if self.upward {
            [pos2(mid_x, max.y), pos2(min.x, min.y), pos2(max.x, min.y)]
        } else {
            [pos2(mid_x, min.y), pos2(min.x, max.y), pos2(max.x, max.y)]
        }
    }
}
