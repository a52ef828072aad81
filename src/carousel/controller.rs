//! Carousel paging controller
//!
//! Presents `total_items` entries as equal pages of `items_per_row` entries and
//! keeps exactly one page aligned to the viewport. Every operation is a total
//! function of the current page, the page count and the trigger; none can fail.
//! The returned `Transition` tells the motion layer where the strip must go.

use std::ops::Range;
use std::time::Duration;

use super::motion::Easing;

/// Duration of an explicit page change
pub const PAGE_TRANSITION: Duration = Duration::from_secs(1);

/// Horizontal displacement that turns a press into a swipe (pixels)
pub const DRAG_THRESHOLD: f64 = 50.0;

/// Viewport classes that decide page size and spacing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoints {
    /// Widths up to and including this value are "narrow"
    pub narrow_max_width: f64,
    pub narrow_items_per_row: usize,
    pub wide_items_per_row: usize,
    pub narrow_gap: f64,
    pub wide_gap: f64,
    /// Displacement that classifies a press as a drag
    pub drag_threshold: f64,
}

impl Breakpoints {
    /// Browser pixel preset: 4 per row and no gap up to 600px, else 5 per row with 10px gaps
    pub const PIXELS: Breakpoints = Breakpoints {
        narrow_max_width: 600.0,
        narrow_items_per_row: 4,
        wide_items_per_row: 5,
        narrow_gap: 0.0,
        wide_gap: 10.0,
        drag_threshold: DRAG_THRESHOLD,
    };

    /// Terminal cell preset used by the TUI
    pub const CELLS: Breakpoints = Breakpoints {
        narrow_max_width: 100.0,
        narrow_items_per_row: 4,
        wide_items_per_row: 5,
        narrow_gap: 0.0,
        wide_gap: 2.0,
        drag_threshold: 6.0,
    };

    fn is_narrow(&self, width: f64) -> bool {
        width <= self.narrow_max_width
    }

    pub fn items_per_row(&self, width: f64) -> usize {
        let n = if self.is_narrow(width) {
            self.narrow_items_per_row
        } else {
            self.wide_items_per_row
        };
        n.max(1)
    }

    pub fn gap(&self, width: f64) -> f64 {
        if self.is_narrow(width) {
            self.narrow_gap
        } else {
            self.wide_gap
        }
    }
}

impl Default for Breakpoints {
    fn default() -> Self {
        Breakpoints::PIXELS
    }
}

/// Where the page strip must move, and how
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Page that is current once the transition starts
    pub page: usize,
    /// Resting offset of that page
    pub offset: f64,
    pub duration: Duration,
    pub easing: Easing,
}

impl Transition {
    pub fn is_instant(&self) -> bool {
        self.duration.is_zero()
    }
}

/// Page-index state machine for one carousel
#[derive(Debug, Clone)]
pub struct CarouselController {
    breakpoints: Breakpoints,
    total_items: usize,
    items_per_row: usize,
    gap: f64,
    page_width: f64,
    current: usize,
}

impl CarouselController {
    /// Controller for `total_items` entries. Until the first `on_resize` the
    /// wide layout is assumed and the page width is zero.
    pub fn new(total_items: usize, breakpoints: Breakpoints) -> Self {
        Self {
            breakpoints,
            total_items,
            items_per_row: breakpoints.wide_items_per_row.max(1),
            gap: breakpoints.wide_gap,
            page_width: 0.0,
            current: 0,
        }
    }

    pub fn breakpoints(&self) -> &Breakpoints {
        &self.breakpoints
    }

    pub fn current_page(&self) -> usize {
        self.current
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn items_per_row(&self) -> usize {
        self.items_per_row
    }

    pub fn gap(&self) -> f64 {
        self.gap
    }

    pub fn page_width(&self) -> f64 {
        self.page_width
    }

    pub fn drag_threshold(&self) -> f64 {
        self.breakpoints.drag_threshold
    }

    /// `max(0, ceil(total / per_row) - 1)`
    pub fn max_page_index(&self) -> usize {
        self.total_items.div_ceil(self.items_per_row).saturating_sub(1)
    }

    pub fn page_count(&self) -> usize {
        self.max_page_index() + 1
    }

    /// Resting strip offset for `page`
    pub fn offset_for(&self, page: usize) -> f64 {
        let page = page as f64;
        let gaps = if page > 0.0 { page * self.gap } else { 0.0 };
        -(page * self.page_width) - gaps
    }

    /// Resting strip offset for the current page
    pub fn resting_offset(&self) -> f64 {
        self.offset_for(self.current)
    }

    /// Item indices shown on `page`
    pub fn page_range(&self, page: usize) -> Range<usize> {
        let start = (page * self.items_per_row).min(self.total_items);
        let end = (start + self.items_per_row).min(self.total_items);
        start..end
    }

    /// Page that holds `item`
    pub fn page_of(&self, item: usize) -> usize {
        (item / self.items_per_row).min(self.max_page_index())
    }

    /// Next page, wrapping from the last page to the first
    pub fn advance(&mut self) -> Transition {
        let next = if self.current >= self.max_page_index() {
            0
        } else {
            self.current + 1
        };
        self.go_to(next, PAGE_TRANSITION)
    }

    /// Previous page, wrapping from the first page to the last
    pub fn retreat(&mut self) -> Transition {
        let prev = if self.current == 0 {
            self.max_page_index()
        } else {
            self.current - 1
        };
        self.go_to(prev, PAGE_TRANSITION)
    }

    /// Jump to `index`. Same or out-of-range targets are ignored.
    pub fn jump_to(&mut self, index: usize) -> Option<Transition> {
        self.jump_to_with(index, PAGE_TRANSITION)
    }

    pub fn jump_to_with(&mut self, index: usize, duration: Duration) -> Option<Transition> {
        if index == self.current || index > self.max_page_index() {
            return None;
        }
        Some(self.go_to(index, duration))
    }

    /// Re-measure after a viewport change and re-snap instantly
    pub fn on_resize(&mut self, width: f64) -> Transition {
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        self.page_width = width;
        self.items_per_row = self.breakpoints.items_per_row(width);
        self.gap = self.breakpoints.gap(width);
        self.clamp_and_snap()
    }

    /// Replace the item count (new data) and re-snap instantly
    pub fn set_total_items(&mut self, total_items: usize) -> Transition {
        self.total_items = total_items;
        self.clamp_and_snap()
    }

    /// Classify a released drag by its net displacement
    pub fn on_drag_end(&mut self, delta_x: f64) -> Transition {
        let threshold = self.breakpoints.drag_threshold;
        if delta_x > threshold {
            self.retreat()
        } else if delta_x < -threshold {
            self.advance()
        } else {
            self.snap()
        }
    }

    /// Zero-duration transition to the current page
    pub fn snap(&self) -> Transition {
        Transition {
            page: self.current,
            offset: self.resting_offset(),
            duration: Duration::ZERO,
            easing: Easing::EaseInOut,
        }
    }

    fn clamp_and_snap(&mut self) -> Transition {
        self.current = self.current.min(self.max_page_index());
        self.snap()
    }

    fn go_to(&mut self, page: usize, duration: Duration) -> Transition {
        self.current = page;
        Transition {
            page,
            offset: self.offset_for(page),
            duration,
            easing: Easing::EaseInOut,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(total: usize, width: f64) -> CarouselController {
        let mut c = CarouselController::new(total, Breakpoints::PIXELS);
        c.on_resize(width);
        c
    }

    #[test]
    fn test_max_page_index_formula() {
        for total in 0..40 {
            for width in [400.0, 1000.0] {
                let c = controller(total, width);
                let per_row = c.items_per_row();
                let expected = if total == 0 {
                    0
                } else {
                    (total + per_row - 1) / per_row - 1
                };
                assert_eq!(c.max_page_index(), expected, "total={total} per_row={per_row}");
            }
        }
    }

    #[test]
    fn test_breakpoints() {
        let bp = Breakpoints::PIXELS;
        assert_eq!(bp.items_per_row(600.0), 4);
        assert_eq!(bp.gap(600.0), 0.0);
        assert_eq!(bp.items_per_row(601.0), 5);
        assert_eq!(bp.gap(601.0), 10.0);
    }

    #[test]
    fn test_advance_wraps_to_first() {
        let mut c = controller(23, 1000.0);
        assert_eq!(c.max_page_index(), 4);
        c.jump_to(4);

        let t = c.advance();
        assert_eq!(c.current_page(), 0);
        assert_eq!(t.page, 0);
        assert_eq!(t.offset, 0.0);
        assert_eq!(t.duration, PAGE_TRANSITION);
    }

    #[test]
    fn test_retreat_wraps_to_last() {
        let mut c = controller(23, 1000.0);
        let t = c.retreat();
        assert_eq!(c.current_page(), 4);
        assert_eq!(t.offset, -(4.0 * 1000.0) - 40.0);
    }

    #[test]
    fn test_single_page_advance_stays() {
        let mut c = controller(3, 1000.0);
        assert_eq!(c.advance().page, 0);
        assert_eq!(c.retreat().page, 0);
    }

    #[test]
    fn test_jump_noops() {
        let mut c = controller(23, 1000.0);
        assert!(c.jump_to(0).is_none());
        assert!(c.jump_to(5).is_none());
        assert_eq!(c.current_page(), 0);

        let t = c.jump_to(2).unwrap();
        assert_eq!(t.page, 2);
        assert_eq!(c.current_page(), 2);
    }

    #[test]
    fn test_offset_formula() {
        let c = controller(23, 1000.0);
        assert_eq!(c.offset_for(0), 0.0);
        assert_eq!(c.offset_for(1), -1010.0);
        assert_eq!(c.offset_for(3), -3030.0);

        let narrow = controller(23, 500.0);
        assert_eq!(narrow.offset_for(2), -1000.0);
    }

    #[test]
    fn test_drag_end_classification() {
        let mut c = controller(23, 1000.0);
        c.jump_to(2);

        let t = c.on_drag_end(120.0);
        assert_eq!(c.current_page(), 1);
        assert!(!t.is_instant());

        c.on_drag_end(-51.0);
        assert_eq!(c.current_page(), 2);

        for delta in [50.0, -50.0, 0.0, 12.5] {
            let t = c.on_drag_end(delta);
            assert_eq!(c.current_page(), 2);
            assert!(t.is_instant());
            assert_eq!(t.offset, c.resting_offset());
        }
    }

    #[test]
    fn test_resize_clamps_current_page() {
        // 15 items: 4 pages when narrow, 3 when wide
        let mut c = controller(15, 500.0);
        assert_eq!(c.max_page_index(), 3);
        c.jump_to(3);

        let t = c.on_resize(800.0);
        assert_eq!(c.items_per_row(), 5);
        assert_eq!(c.max_page_index(), 2);
        assert_eq!(c.current_page(), 2);
        assert!(t.is_instant());
        assert_eq!(t.offset, -(2.0 * 800.0) - 20.0);
    }

    #[test]
    fn test_resize_resnaps_at_new_width() {
        let mut c = controller(23, 1000.0);
        c.jump_to(1);
        let t = c.on_resize(1200.0);
        assert_eq!(c.current_page(), 1);
        assert_eq!(t.offset, -1210.0);
        assert!(t.is_instant());
    }

    #[test]
    fn test_set_total_items_clamps() {
        let mut c = controller(23, 1000.0);
        c.jump_to(4);
        let t = c.set_total_items(6);
        assert_eq!(c.current_page(), 1);
        assert!(t.is_instant());

        c.set_total_items(0);
        assert_eq!(c.current_page(), 0);
        assert_eq!(c.max_page_index(), 0);
    }

    #[test]
    fn test_page_range() {
        let c = controller(23, 1000.0);
        assert_eq!(c.page_range(0), 0..5);
        assert_eq!(c.page_range(4), 20..23);
        assert_eq!(c.page_range(9), 23..23);
        assert_eq!(c.page_of(22), 4);
        assert_eq!(c.page_of(99), 4);
    }
}
