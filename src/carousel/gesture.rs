//! Press/drag tracking for a carousel strip
//!
//! Tells a drag apart from a click: once the pointer has travelled the drag
//! threshold while pressed, the interaction counts as a drag and the click that
//! follows the release must not open an item.

/// Pointer state for one strip
#[derive(Debug, Clone)]
pub struct DragGesture {
    threshold: f64,
    start_x: f64,
    last_x: f64,
    pressed: bool,
    was_drag: bool,
}

impl DragGesture {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.abs(),
            start_x: 0.0,
            last_x: 0.0,
            pressed: false,
            was_drag: false,
        }
    }

    pub fn pointer_down(&mut self, x: f64) {
        self.start_x = x;
        self.last_x = x;
        self.pressed = true;
        self.was_drag = false;
    }

    /// Track a move; returns the live displacement while pressed
    pub fn pointer_move(&mut self, x: f64) -> Option<f64> {
        if !self.pressed {
            return None;
        }
        self.last_x = x;
        let delta = x - self.start_x;
        if delta.abs() >= self.threshold {
            self.was_drag = true;
        }
        Some(delta)
    }

    /// End the press; returns the net displacement if a press was active
    pub fn pointer_up(&mut self, x: f64) -> Option<f64> {
        let delta = self.pointer_move(x)?;
        self.pressed = false;
        Some(delta)
    }

    /// Abandon the press without classifying it
    pub fn cancel(&mut self) {
        self.pressed = false;
    }

    pub fn was_drag(&self) -> bool {
        self.was_drag
    }

    /// Current displacement from the press origin
    pub fn delta(&self) -> f64 {
        self.last_x - self.start_x
    }

    /// Item clicks are honoured only when the last interaction was not a drag
    pub fn should_open_item(&self) -> bool {
        !self.was_drag
    }
}

impl Default for DragGesture {
    fn default() -> Self {
        Self::new(super::DRAG_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_move_is_a_click() {
        let mut g = DragGesture::new(50.0);
        g.pointer_down(100.0);
        assert_eq!(g.pointer_move(130.0), Some(30.0));
        assert_eq!(g.pointer_up(120.0), Some(20.0));
        assert!(!g.was_drag());
        assert!(g.should_open_item());
    }

    #[test]
    fn test_drag_suppresses_click() {
        let mut g = DragGesture::new(50.0);
        g.pointer_down(300.0);
        g.pointer_move(240.0);
        assert!(g.was_drag());
        // Coming back near the origin does not undo the drag
        assert_eq!(g.pointer_up(295.0), Some(-5.0));
        assert!(!g.should_open_item());

        // Next press starts clean
        g.pointer_down(10.0);
        assert!(g.should_open_item());
    }

    #[test]
    fn test_moves_without_press_are_ignored() {
        let mut g = DragGesture::new(50.0);
        assert_eq!(g.pointer_move(500.0), None);
        assert_eq!(g.pointer_up(500.0), None);
        assert!(!g.was_drag());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut g = DragGesture::new(50.0);
        g.pointer_down(0.0);
        g.pointer_move(-50.0);
        assert!(g.was_drag());
    }
}
