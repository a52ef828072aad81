//! Paged carousel logic
//!
//! - controller: page-index state machine (advance, retreat, jump, resize, drag release)
//! - gesture: click-vs-drag disambiguation
//! - motion: eased offset transitions driven by the controller's output

pub mod controller;
pub mod gesture;
pub mod motion;

pub use controller::{
    Breakpoints, CarouselController, Transition, DRAG_THRESHOLD, PAGE_TRANSITION,
};
pub use gesture::DragGesture;
pub use motion::{Easing, Motion};
