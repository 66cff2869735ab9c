//! Frame-stepped smooth scrolling for keyboard-driven reading.
//!
//! A held key produces uniform, interruptible scroll ticks decoupled from
//! native momentum scrolling, suited to paging through a long image list.
//! Each step animates `step_distance` units over `frames_per_step` frames;
//! while the key stays down the loop chains straight into the next step, and
//! releasing the key lets the in-flight step finish before the machine
//! settles back to idle.

mod keys;

pub use keys::scroll_action_for_key;

use crate::config::SyncConfig;
use crate::scheduler::{FrameHandle, Scheduler};
use std::cell::RefCell;
use std::rc::Rc;

/// Offsets closer to the target than this snap onto it.
const SETTLE_EPSILON: f32 = 0.1;

/// The scrollable surface being driven. Implementations may clamp offsets to
/// their content bounds; the animator detects a clamped write and settles.
pub trait ScrollSurface {
    fn offset(&self) -> f32;
    fn set_offset(&mut self, offset: f32);
}

/// Logical scroll input, decoupled from physical keys (see
/// [`scroll_action_for_key`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollDirection {
    #[default]
    None,
    Forward,
    Backward,
}

impl ScrollDirection {
    fn sign(self) -> f32 {
        match self {
            ScrollDirection::None => 0.0,
            ScrollDirection::Forward => 1.0,
            ScrollDirection::Backward => -1.0,
        }
    }
}

impl From<ScrollAction> for ScrollDirection {
    fn from(action: ScrollAction) -> Self {
        match action {
            ScrollAction::Forward => ScrollDirection::Forward,
            ScrollAction::Backward => ScrollDirection::Backward,
        }
    }
}

struct AnimatorState {
    direction: ScrollDirection,
    target_offset: f32,
    animating: bool,
    frame_handle: Option<FrameHandle>,
    step_distance: f32,
    frames_per_step: f32,
}

/// Converts key-down / key-up events into bounded, frame-stepped scrolling
/// of a [`ScrollSurface`].
pub struct ScrollAnimator {
    state: Rc<RefCell<AnimatorState>>,
    scheduler: Rc<dyn Scheduler>,
    surface: Rc<RefCell<dyn ScrollSurface>>,
}

impl ScrollAnimator {
    pub fn new(
        scheduler: Rc<dyn Scheduler>,
        surface: Rc<RefCell<dyn ScrollSurface>>,
        config: &SyncConfig,
    ) -> Self {
        let target_offset = surface.borrow().offset();
        Self {
            state: Rc::new(RefCell::new(AnimatorState {
                direction: ScrollDirection::None,
                target_offset,
                animating: false,
                frame_handle: None,
                step_distance: config.scroll_step_distance,
                frames_per_step: config.frames_per_step(),
            })),
            scheduler,
            surface,
        }
    }

    /// Key pressed. Entering from idle or the opposite direction targets one
    /// step away from the current offset and starts the frame loop if it is
    /// not already running; auto-repeat in the same direction is a no-op
    /// (continuity comes from the loop itself).
    pub fn key_down(&self, action: ScrollAction) {
        let direction = ScrollDirection::from(action);
        let start_loop = {
            let mut state = self.state.borrow_mut();
            if state.direction == direction {
                false
            } else {
                state.direction = direction;
                let current = self.surface.borrow().offset();
                state.target_offset = current + state.step_distance * direction.sign();
                if state.animating {
                    false
                } else {
                    state.animating = true;
                    true
                }
            }
        };
        if start_loop {
            schedule_step(&self.scheduler, &self.state, &self.surface);
        }
    }

    /// Key released. The in-flight step finishes; the loop stops once it
    /// settles.
    pub fn key_up(&self, action: ScrollAction) {
        let mut state = self.state.borrow_mut();
        if state.direction == ScrollDirection::from(action) {
            state.direction = ScrollDirection::None;
        }
    }

    /// Abandon any animation, e.g. on navigation away from the view.
    pub fn reset(&self) {
        let handle = {
            let mut state = self.state.borrow_mut();
            state.direction = ScrollDirection::None;
            state.animating = false;
            state.frame_handle.take()
        };
        if let Some(handle) = handle {
            self.scheduler.cancel_frame(handle);
        }
    }

    /// Jump the surface straight to `offset` (restoring a saved reading
    /// position); any in-flight animation is abandoned.
    pub fn snap_to(&self, offset: f32) {
        self.reset();
        self.surface.borrow_mut().set_offset(offset);
        self.state.borrow_mut().target_offset = self.surface.borrow().offset();
    }

    pub fn direction(&self) -> ScrollDirection {
        self.state.borrow().direction
    }

    pub fn is_animating(&self) -> bool {
        self.state.borrow().animating
    }
}

fn schedule_step(
    scheduler: &Rc<dyn Scheduler>,
    state: &Rc<RefCell<AnimatorState>>,
    surface: &Rc<RefCell<dyn ScrollSurface>>,
) {
    let weak_state = Rc::downgrade(state);
    let weak_surface = Rc::downgrade(surface);
    let weak_scheduler = Rc::downgrade(scheduler);
    let handle = scheduler.next_frame(Box::new(move || {
        let (Some(state), Some(surface), Some(scheduler)) = (
            weak_state.upgrade(),
            weak_surface.upgrade(),
            weak_scheduler.upgrade(),
        ) else {
            return;
        };
        step_frame(&state, &surface, &scheduler);
    }));
    state.borrow_mut().frame_handle = Some(handle);
}

fn step_frame(
    state: &Rc<RefCell<AnimatorState>>,
    surface: &Rc<RefCell<dyn ScrollSurface>>,
    scheduler: &Rc<dyn Scheduler>,
) {
    let keep_looping = {
        let mut st = state.borrow_mut();
        st.frame_handle = None;
        if !st.animating {
            false
        } else {
            let mut surf = surface.borrow_mut();
            let current = surf.offset();
            let distance = st.target_offset - current;
            if distance.abs() < SETTLE_EPSILON {
                surf.set_offset(st.target_offset);
                match st.direction {
                    ScrollDirection::None => {
                        st.animating = false;
                        false
                    }
                    held => {
                        // Key still down: chain straight into the next step.
                        st.target_offset += st.step_distance * held.sign();
                        true
                    }
                }
            } else {
                // Clamp the advance to the remaining distance so the step
                // lands exactly instead of oscillating around the target.
                let per_frame = st.step_distance / st.frames_per_step;
                let advance = per_frame.min(distance.abs()) * distance.signum();
                surf.set_offset(current + advance);
                if surf.offset() == current {
                    // Surface refused to move (content edge); settle here.
                    st.target_offset = current;
                }
                true
            }
        }
    };
    if keep_looping {
        schedule_step(scheduler, state, surface);
    }
}
