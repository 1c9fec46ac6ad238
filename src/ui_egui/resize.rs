// Event Resize Handles
//
// Grab zones along the top and bottom edge of a timed block.
// - Top handle: adjusts start time
// - Bottom handle: adjusts end time

use egui::{Pos2, Rect, Vec2};

/// Which edge of the block is being dragged
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeHandle {
    /// Top edge - adjusts start time
    Top,
    /// Bottom edge - adjusts end time
    Bottom,
}

impl ResizeHandle {
    /// Returns the cursor icon for this handle
    pub fn cursor_icon(&self) -> egui::CursorIcon {
        egui::CursorIcon::ResizeVertical
    }
}

/// Default height of the resize hit zone
pub const HANDLE_SIZE: f32 = 8.0;
/// Visual size of the handle bar
pub const HANDLE_VISUAL_SIZE: f32 = 4.0;

/// Hit zones for a timed block
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandleRects {
    pub top: Rect,
    pub bottom: Rect,
}

impl HandleRects {
    /// Full-width zones `handle_size` tall at each edge. When the block is
    /// shorter than both zones together, the top zone takes precedence.
    pub fn for_block(block_rect: Rect, handle_size: f32) -> Self {
        let zone = Vec2::new(block_rect.width(), handle_size.min(block_rect.height()));
        Self {
            top: Rect::from_min_size(block_rect.min, zone),
            bottom: Rect::from_min_size(
                Pos2::new(block_rect.left(), block_rect.bottom() - zone.y),
                zone,
            ),
        }
    }

    /// Check if a point hits a handle and return which one
    pub fn hit_test(&self, pos: Pos2) -> Option<ResizeHandle> {
        if self.top.contains(pos) {
            Some(ResizeHandle::Top)
        } else if self.bottom.contains(pos) {
            Some(ResizeHandle::Bottom)
        } else {
            None
        }
    }

    /// Get the rect for a specific handle
    pub fn get(&self, handle: ResizeHandle) -> Rect {
        match handle {
            ResizeHandle::Top => self.top,
            ResizeHandle::Bottom => self.bottom,
        }
    }
}

/// Draw a short bar at the hovered edge so the grab zone is discoverable.
pub fn draw_handle(ui: &egui::Ui, handles: &HandleRects, handle: ResizeHandle, color: egui::Color32) {
    let rect = handles.get(handle);
    let bar_y = match handle {
        ResizeHandle::Top => rect.top() + HANDLE_VISUAL_SIZE,
        ResizeHandle::Bottom => rect.bottom() - HANDLE_VISUAL_SIZE,
    };
    let half_width = rect.width().min(40.0) / 2.0;
    ui.painter().line_segment(
        [
            Pos2::new(rect.center().x - half_width, bar_y),
            Pos2::new(rect.center().x + half_width, bar_y),
        ],
        egui::Stroke::new(HANDLE_VISUAL_SIZE / 2.0, color),
    );
}
