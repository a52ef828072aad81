//! Carousel paging tests
//!
//! Exercises the page controller through its public surface: wraparound,
//! jumps, drag release classification, resize clamping, and the strip motion
//! that follows each transition.

use std::time::{Duration, Instant};

use marquee::carousel::{
    Breakpoints, CarouselController, DragGesture, Motion, DRAG_THRESHOLD, PAGE_TRANSITION,
};

/// Controller measured at `width` pixels
fn measured(total: usize, width: f64) -> CarouselController {
    let mut controller = CarouselController::new(total, Breakpoints::PIXELS);
    controller.on_resize(width);
    controller
}

fn at_page(total: usize, width: f64, page: usize) -> CarouselController {
    let mut controller = measured(total, width);
    if page > 0 {
        controller.jump_to(page).unwrap();
    }
    controller
}

// =============================================================================
// Page Count
// =============================================================================

#[test]
fn test_max_page_index_formula() {
    for per_row_width in [400.0, 1200.0] {
        for total in 0..40 {
            let c = measured(total, per_row_width);
            let per_row = c.items_per_row();
            let expected = (total.div_ceil(per_row)).saturating_sub(1);
            assert_eq!(c.max_page_index(), expected, "total={} per_row={}", total, per_row);
        }
    }
}

#[test]
fn test_empty_carousel_has_one_page() {
    let mut c = measured(0, 1200.0);
    assert_eq!(c.max_page_index(), 0);
    assert_eq!(c.advance().page, 0);
    assert_eq!(c.retreat().page, 0);
    assert!(c.jump_to(0).is_none());
}

// =============================================================================
// Wraparound
// =============================================================================

#[test]
fn test_advance_wraps_to_first_page() {
    // 23 items, 5 per row
    let mut c = at_page(23, 1200.0, 4);
    assert_eq!(c.max_page_index(), 4);

    let t = c.advance();
    assert_eq!(c.current_page(), 0);
    assert_eq!(t.page, 0);
    assert_eq!(t.offset, 0.0);
    assert_eq!(t.duration, PAGE_TRANSITION);
}

#[test]
fn test_retreat_wraps_to_last_page() {
    let mut c = measured(23, 1200.0);
    let t = c.retreat();
    assert_eq!(c.current_page(), 4);
    assert_eq!(t.offset, c.offset_for(4));
}

// =============================================================================
// Jumps
// =============================================================================

#[test]
fn test_jump_to_same_or_out_of_range_is_ignored() {
    let mut c = at_page(20, 1200.0, 2);
    assert!(c.jump_to(2).is_none());
    assert!(c.jump_to(4).is_none());
    assert!(c.jump_to(usize::MAX).is_none());
    assert_eq!(c.current_page(), 2);
}

#[test]
fn test_jump_to_valid_page() {
    let mut c = measured(20, 1200.0);
    let t = c.jump_to(3).unwrap();
    assert_eq!(t.page, 3);
    assert_eq!(c.current_page(), 3);
    assert!(!t.is_instant());
}

// =============================================================================
// Drag Release
// =============================================================================

#[test]
fn test_drag_release_right_goes_back() {
    // Page 2 of 4 (max index 3)
    let mut c = at_page(20, 1200.0, 2);
    c.on_drag_end(120.0);
    assert_eq!(c.current_page(), 1);
}

#[test]
fn test_drag_release_left_goes_forward() {
    let mut c = at_page(20, 1200.0, 2);
    c.on_drag_end(-51.0);
    assert_eq!(c.current_page(), 3);
}

#[test]
fn test_drag_release_within_threshold_snaps_back() {
    for delta in [-DRAG_THRESHOLD, -10.0, 0.0, 10.0, DRAG_THRESHOLD] {
        let mut c = at_page(20, 1200.0, 2);
        let t = c.on_drag_end(delta);
        assert_eq!(c.current_page(), 2, "delta={}", delta);
        assert!(t.is_instant());
        assert_eq!(t.offset, c.resting_offset());
    }
}

#[test]
fn test_drag_release_wraps() {
    let mut c = measured(20, 1200.0);
    c.on_drag_end(200.0);
    assert_eq!(c.current_page(), 3);
    c.on_drag_end(-200.0);
    assert_eq!(c.current_page(), 0);
}

// =============================================================================
// Resize
// =============================================================================

#[test]
fn test_resize_clamps_current_page() {
    // 15 items: 4 per row when narrow (max 3), 5 per row when wide (max 2)
    let mut c = at_page(15, 500.0, 3);
    assert_eq!(c.items_per_row(), 4);
    assert_eq!(c.max_page_index(), 3);

    let t = c.on_resize(900.0);
    assert_eq!(c.items_per_row(), 5);
    assert_eq!(c.max_page_index(), 2);
    assert_eq!(c.current_page(), 2);
    assert!(t.is_instant());
    assert_eq!(t.offset, c.offset_for(2));
}

#[test]
fn test_resize_keeps_page_in_range_and_resnaps() {
    let mut c = at_page(40, 1200.0, 1);
    let t = c.on_resize(1000.0);
    assert_eq!(c.current_page(), 1);
    assert_eq!(t.offset, -(1000.0 + 10.0));
    assert!(t.is_instant());
}

#[test]
fn test_breakpoint_boundary_is_narrow() {
    let c = measured(20, 600.0);
    assert_eq!(c.items_per_row(), 4);
    assert_eq!(c.gap(), 0.0);

    let c = measured(20, 601.0);
    assert_eq!(c.items_per_row(), 5);
    assert_eq!(c.gap(), 10.0);
}

#[test]
fn test_new_data_clamps_page() {
    let mut c = at_page(40, 1200.0, 7);
    let t = c.set_total_items(12);
    assert_eq!(c.current_page(), 2);
    assert!(t.is_instant());
}

#[test]
fn test_terminal_breakpoints() {
    let mut c = CarouselController::new(20, Breakpoints::CELLS);
    c.on_resize(100.0);
    assert_eq!(c.items_per_row(), 4);
    c.on_resize(101.0);
    assert_eq!(c.items_per_row(), 5);
    assert_eq!(c.drag_threshold(), 6.0);
}

// =============================================================================
// Gesture and Motion
// =============================================================================

#[test]
fn test_drag_then_release_suppresses_click() {
    let mut gesture = DragGesture::new(DRAG_THRESHOLD);
    gesture.pointer_down(300.0);
    gesture.pointer_move(200.0);
    let delta = gesture.pointer_up(180.0).unwrap();
    assert_eq!(delta, -120.0);
    assert!(!gesture.should_open_item());

    let mut c = measured(20, 1200.0);
    c.on_drag_end(delta);
    assert_eq!(c.current_page(), 1);
}

#[test]
fn test_motion_plays_transition_to_rest() {
    let mut c = measured(20, 1200.0);
    let start = Instant::now();
    let mut motion = Motion::at_rest(c.resting_offset(), start);

    let t = c.advance();
    motion.start(&t, start);
    assert!(!motion.is_settled(start));
    assert_eq!(motion.target(), c.offset_for(1));

    let mid = motion.offset_at(start + PAGE_TRANSITION / 2);
    assert!(mid < 0.0 && mid > c.offset_for(1));

    let end = start + PAGE_TRANSITION + Duration::from_millis(1);
    assert!(motion.is_settled(end));
    assert_eq!(motion.offset_at(end), c.offset_for(1));
}
