use bitflags::bitflags;
use egui::{CursorIcon, Pos2, Rect, Vec2, pos2};

/// Pointer tolerance around edges and corners, in logical pixels
pub const HANDLE_RADIUS: f32 = 8.0;

bitflags! {
    /// Edges a resize drag is currently moving
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Edges: u8 {
        const TOP = 1 << 0;
        const RIGHT = 1 << 1;
        const BOTTOM = 1 << 2;
        const LEFT = 1 << 3;
    }
}

impl Edges {
    pub fn cursor_icon(self) -> CursorIcon {
        let nwse = Edges::TOP | Edges::LEFT;
        let nesw = Edges::TOP | Edges::RIGHT;
        if self == nwse || self == Edges::BOTTOM | Edges::RIGHT {
            CursorIcon::ResizeNwSe
        } else if self == nesw || self == Edges::BOTTOM | Edges::LEFT {
            CursorIcon::ResizeNeSw
        } else if self.intersects(Edges::LEFT | Edges::RIGHT) {
            CursorIcon::ResizeHorizontal
        } else {
            CursorIcon::ResizeVertical
        }
    }
}

/// What a pointer-down lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// One of the eight edge or corner handles
    Handle(Edges),
    Inside,
    Outside,
}

/// Selection rectangle in logical pixels, always inside the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionArea {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl SelectionArea {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left: left.min(right),
            top: top.min(bottom),
            right: left.max(right),
            bottom: top.max(bottom),
        }
    }

    /// Rectangle covering a whole `width` x `height` surface
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self::new(
            rect.min.x.round() as i32,
            rect.min.y.round() as i32,
            rect.max.x.round() as i32,
            rect.max.y.round() as i32,
        )
    }

    pub fn width(&self) -> u32 {
        (self.right - self.left).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.bottom - self.top).max(0) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_max(
            pos2(self.left as f32, self.top as f32),
            pos2(self.right as f32, self.bottom as f32),
        )
    }

    pub fn clamped(self, width: u32, height: u32) -> Self {
        let (w, h) = (width as i32, height as i32);
        Self::new(
            self.left.clamp(0, w),
            self.top.clamp(0, h),
            self.right.clamp(0, w),
            self.bottom.clamp(0, h),
        )
    }

    /// Resolve a pointer position against handles, then the interior
    pub fn hit_test(&self, pos: Pos2) -> Hit {
        let rect = self.rect();
        let near = |a: f32, b: f32| (a - b).abs() <= HANDLE_RADIUS;
        let within_x = pos.x >= rect.left() - HANDLE_RADIUS && pos.x <= rect.right() + HANDLE_RADIUS;
        let within_y = pos.y >= rect.top() - HANDLE_RADIUS && pos.y <= rect.bottom() + HANDLE_RADIUS;
        if !(within_x && within_y) {
            return Hit::Outside;
        }

        let mut edges = Edges::empty();
        if near(pos.y, rect.top()) {
            edges |= Edges::TOP;
        } else if near(pos.y, rect.bottom()) {
            edges |= Edges::BOTTOM;
        }
        if near(pos.x, rect.left()) {
            edges |= Edges::LEFT;
        } else if near(pos.x, rect.right()) {
            edges |= Edges::RIGHT;
        }

        if !edges.is_empty() {
            Hit::Handle(edges)
        } else if rect.contains(pos) {
            Hit::Inside
        } else {
            Hit::Outside
        }
    }

    /// Move the whole rectangle so its top-left sits at `min`, kept inside the surface
    pub fn move_to(&mut self, min: Pos2, width: u32, height: u32) {
        let (w, h) = (self.width() as i32, self.height() as i32);
        let left = (min.x.round() as i32).clamp(0, (width as i32 - w).max(0));
        let top = (min.y.round() as i32).clamp(0, (height as i32 - h).max(0));
        *self = Self::new(left, top, left + w, top + h);
    }

    /// Drag the edges in `edges` towards `pos`.
    ///
    /// An edge dragged across its opposite stops at the opposite's old
    /// position and the drag continues as the opposite edge, so `edges` is
    /// updated in place.
    pub fn drag_edges(&mut self, edges: &mut Edges, pos: Pos2, width: u32, height: u32) {
        let (w, h) = (width as i32, height as i32);
        let x = (pos.x.round() as i32).clamp(0, w);
        let y = (pos.y.round() as i32).clamp(0, h);

        if edges.contains(Edges::LEFT) {
            if x > self.right {
                self.left = self.right;
                self.right = x;
                edges.remove(Edges::LEFT);
                edges.insert(Edges::RIGHT);
            } else {
                self.left = x;
            }
        } else if edges.contains(Edges::RIGHT) {
            if x < self.left {
                self.right = self.left;
                self.left = x;
                edges.remove(Edges::RIGHT);
                edges.insert(Edges::LEFT);
            } else {
                self.right = x;
            }
        }

        if edges.contains(Edges::TOP) {
            if y > self.bottom {
                self.top = self.bottom;
                self.bottom = y;
                edges.remove(Edges::TOP);
                edges.insert(Edges::BOTTOM);
            } else {
                self.top = y;
            }
        } else if edges.contains(Edges::BOTTOM) {
            if y < self.top {
                self.bottom = self.top;
                self.top = y;
                edges.remove(Edges::BOTTOM);
                edges.insert(Edges::TOP);
            } else {
                self.bottom = y;
            }
        }
    }

    /// Re-derive edges from `ratio` (width / height) after a resize drag.
    ///
    /// The edges opposite to the dragged ones stay where they are. For a pure
    /// horizontal or vertical drag the cross axis grows towards bottom/right.
    pub fn keep_ratio(&mut self, edges: Edges, ratio: f32, width: u32, height: u32) {
        if !(ratio.is_finite() && ratio > 0.0) {
            return;
        }
        let (w, h) = (width as i32, height as i32);
        let left_keep = |a: &mut Self| {
            let new_w = (a.height() as f32 * ratio).round() as i32;
            a.left = (a.right - new_w).clamp(0, a.right);
        };
        let right_keep = |a: &mut Self| {
            let new_w = (a.height() as f32 * ratio).round() as i32;
            a.right = (a.left + new_w).clamp(a.left, w);
        };
        let top_keep = |a: &mut Self| {
            let new_h = (a.width() as f32 / ratio).round() as i32;
            a.top = (a.bottom - new_h).clamp(0, a.bottom);
        };
        let bottom_keep = |a: &mut Self| {
            let new_h = (a.width() as f32 / ratio).round() as i32;
            a.bottom = (a.top + new_h).clamp(a.top, h);
        };

        let horizontal = |a: &mut Self| {
            if edges.contains(Edges::LEFT) {
                left_keep(a)
            } else {
                right_keep(a)
            }
        };
        let vertical = |a: &mut Self| {
            if edges.contains(Edges::TOP) {
                top_keep(a)
            } else {
                bottom_keep(a)
            }
        };

        if edges.contains(Edges::TOP) {
            horizontal(self);
            top_keep(self);
        }
        if edges.contains(Edges::BOTTOM) {
            horizontal(self);
            bottom_keep(self);
        }
        if edges.contains(Edges::LEFT) {
            vertical(self);
            left_keep(self);
        }
        if edges.contains(Edges::RIGHT) {
            vertical(self);
            right_keep(self);
        }
    }

    pub fn min(&self) -> Pos2 {
        pos2(self.left as f32, self.top as f32)
    }

    /// Offset from the top-left corner to `pos`
    pub fn grab_offset(&self, pos: Pos2) -> Vec2 {
        pos - self.min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_test_prefers_handles() {
        let area = SelectionArea::new(10, 10, 110, 60);
        assert_eq!(area.hit_test(pos2(11.0, 12.0)), Hit::Handle(Edges::TOP | Edges::LEFT));
        assert_eq!(area.hit_test(pos2(60.0, 58.0)), Hit::Handle(Edges::BOTTOM));
        assert_eq!(area.hit_test(pos2(115.0, 30.0)), Hit::Handle(Edges::RIGHT));
        assert_eq!(area.hit_test(pos2(60.0, 30.0)), Hit::Inside);
        assert_eq!(area.hit_test(pos2(200.0, 30.0)), Hit::Outside);
    }

    #[test]
    fn test_left_handle_inverts_past_right_edge() {
        let mut area = SelectionArea::new(10, 10, 50, 50);
        let mut edges = Edges::LEFT;
        area.drag_edges(&mut edges, pos2(70.0, 30.0), 100, 100);
        assert_eq!(edges, Edges::RIGHT);
        assert_eq!(area, SelectionArea::new(50, 10, 70, 50));

        // The same drag now moves the right edge
        area.drag_edges(&mut edges, pos2(80.0, 30.0), 100, 100);
        assert_eq!(area, SelectionArea::new(50, 10, 80, 50));
    }

    #[test]
    fn test_inversion_is_symmetric() {
        let mut area = SelectionArea::new(10, 10, 50, 50);
        let mut edges = Edges::BOTTOM | Edges::RIGHT;
        area.drag_edges(&mut edges, pos2(0.0, 5.0), 100, 100);
        assert_eq!(edges, Edges::TOP | Edges::LEFT);
        assert_eq!(area, SelectionArea::new(0, 5, 10, 10));
    }

    #[test]
    fn test_drag_clamps_to_surface() {
        let mut area = SelectionArea::new(10, 10, 50, 50);
        let mut edges = Edges::RIGHT | Edges::BOTTOM;
        area.drag_edges(&mut edges, pos2(500.0, 500.0), 100, 80);
        assert_eq!(area, SelectionArea::new(10, 10, 100, 80));
    }

    #[test]
    fn test_keep_ratio_corner_drag() {
        let mut area = SelectionArea::new(0, 0, 150, 60);
        area.keep_ratio(Edges::BOTTOM | Edges::RIGHT, 2.0, 400, 400);
        assert_eq!(area, SelectionArea::new(0, 0, 120, 60));
    }

    #[test]
    fn test_keep_ratio_edge_drag() {
        let mut area = SelectionArea::new(0, 0, 160, 50);
        area.keep_ratio(Edges::RIGHT, 2.0, 400, 400);
        assert_eq!(area, SelectionArea::new(0, 0, 160, 80));

        let mut area = SelectionArea::new(100, 100, 200, 180);
        area.keep_ratio(Edges::TOP | Edges::LEFT, 1.0, 400, 400);
        assert_eq!(area.width(), area.height());
        assert_eq!((area.right, area.bottom), (200, 180));
    }

    #[test]
    fn test_move_stays_inside() {
        let mut area = SelectionArea::new(0, 0, 30, 20);
        area.move_to(pos2(90.0, -5.0), 100, 100);
        assert_eq!(area, SelectionArea::new(70, 0, 100, 20));
    }
}
