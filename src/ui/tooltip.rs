//! Hover tooltip placement.
//!
//! Pure geometry: given the hovered anchor's rectangle, the tooltip's own
//! measured size, and the document's scrollable extent, compute where the
//! tooltip goes so it stays inside the viewport. The rules favor a
//! below-the-anchor placement and only flip above when the bottom edge
//! would overflow.

/// Gap between the anchor and a tooltip placed below it.
const BELOW_OFFSET: f64 = 30.0;
/// Gap between the anchor and a tooltip flipped above it.
const ABOVE_OFFSET: f64 = 10.0;
/// Overflow tolerance before the placement is adjusted.
const EDGE_MARGIN: f64 = 50.0;

/// An axis-aligned rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnchorRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Measured size of the tooltip itself.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TooltipSize {
    pub width: f64,
    pub height: f64,
}

/// Total scrollable extent of the document.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DocumentSize {
    pub width: f64,
    pub height: f64,
}

/// Computed tooltip placement.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TooltipPosition {
    pub top: f64,
    pub left: f64,
}

/// Presentation state for the hover tooltip.
///
/// `visible` is toggled only by hover-enter and hover-leave; the position
/// is recomputed on every hover-enter and whenever the tooltip's content
/// (and therefore its measured size) changes while visible.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TooltipState {
    pub position: TooltipPosition,
    pub visible: bool,
}

impl TooltipState {
    /// Hover entered an anchor: compute placement and show the tooltip.
    pub fn enter(&mut self, anchor: AnchorRect, size: TooltipSize, document: DocumentSize) {
        self.position = position_tooltip(anchor, size, document);
        self.visible = true;
    }

    /// Tooltip content changed while visible; its measured size may have
    /// changed, so the placement must be recomputed.
    pub fn resize(&mut self, anchor: AnchorRect, size: TooltipSize, document: DocumentSize) {
        if self.visible {
            self.position = position_tooltip(anchor, size, document);
        }
    }

    /// Hover left the anchor: hide the tooltip.
    pub fn leave(&mut self) {
        self.visible = false;
    }
}

/// Compute in-viewport coordinates for the tooltip.
///
/// Default placement is below the anchor, left-aligned to its left edge.
/// If that overflows the document's right edge by more than the margin,
/// the tooltip is right-aligned to the anchor's right edge instead, with
/// the left edge clamped at 0. If the below placement overflows the
/// bottom edge by more than the margin, the tooltip flips above the
/// anchor, unless that would put it past the top edge, in which case the
/// below placement stands.
pub fn position_tooltip(
    anchor: AnchorRect,
    size: TooltipSize,
    document: DocumentSize,
) -> TooltipPosition {
    let mut left = anchor.x;
    let mut top = anchor.y + BELOW_OFFSET;

    if left + size.width + EDGE_MARGIN > document.width {
        left = anchor.x + anchor.width - size.width;
        if left < 0.0 {
            left = 0.0;
        }
    }

    if top + size.height + EDGE_MARGIN > document.height {
        let above = anchor.y - size.height - ABOVE_OFFSET;
        if above >= 0.0 {
            top = above;
        }
    }

    TooltipPosition { top, left }
}
