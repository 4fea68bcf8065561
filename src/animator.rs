//! Snap rotation animator.
//!
//! A face key starts a rotation gesture that sweeps one axis by a fixed angle
//! (90° by default) over several frames and stops exactly on the target. The
//! animator is busy or idle as a whole: while any gesture is in flight, new
//! gestures are dropped rather than queued.
//!
//! ```
//! use cubeviz::{Axis, SnapAnimator};
//!
//! let mut animator = SnapAnimator::new(90.0, 5.0);
//! assert!(animator.begin(Axis::X, 1.0));
//! while animator.is_animating() {
//!     animator.step();
//! }
//! assert_eq!(animator.angles(), [90.0, 0.0, 0.0]);
//! ```

/// One of the three rotation axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Per-axis current/target angles advanced toward each other at a fixed step.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapAnimator {
    current: [f32; 3],
    target: [f32; 3],
    snap_angle: f32,
    step: f32,
    animating: bool,
}

impl SnapAnimator {
    /// Create an idle animator with all angles at zero.
    ///
    /// `snap_angle` is the sweep of one gesture and `step` the degrees
    /// advanced per frame.
    pub fn new(snap_angle: f32, step: f32) -> Self {
        Self {
            current: [0.0; 3],
            target: [0.0; 3],
            snap_angle,
            step: step.abs(),
            animating: false,
        }
    }

    /// Start a gesture on `axis`. `direction` is the sign of the sweep.
    ///
    /// Returns `false` without touching any state if a gesture is already in
    /// flight.
    pub fn begin(&mut self, axis: Axis, direction: f32) -> bool {
        if self.animating {
            return false;
        }

        let i = axis.index();
        self.target[i] = self.current[i] + self.snap_angle * direction.signum();
        self.animating = true;
        true
    }

    /// Advance one frame.
    pub fn step(&mut self) {
        if !self.animating {
            return;
        }

        for (current, &target) in self.current.iter_mut().zip(&self.target) {
            if *current < target {
                *current = (*current + self.step).min(target);
            } else if *current > target {
                *current = (*current - self.step).max(target);
            }
        }

        if self.current == self.target {
            self.animating = false;
        }
    }

    /// Return every axis to zero and go idle.
    pub fn reset(&mut self) {
        self.current = [0.0; 3];
        self.target = [0.0; 3];
        self.animating = false;
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Current X, Y, Z angles in degrees.
    pub fn angles(&self) -> [f32; 3] {
        self.current
    }

    /// Target X, Y, Z angles in degrees.
    pub fn targets(&self) -> [f32; 3] {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_shrinks_by_exactly_one_step() {
        let mut animator = SnapAnimator::new(90.0, 5.0);
        assert!(animator.begin(Axis::Y, -1.0));
        assert_eq!(animator.targets(), [0.0, -90.0, 0.0]);

        let mut distance = 90.0;
        while distance >= 5.0 {
            animator.step();
            let next = (animator.targets()[1] - animator.angles()[1]).abs();
            assert_eq!(distance - next, 5.0);
            distance = next;
        }

        assert_eq!(distance, 0.0);
        assert!(!animator.is_animating());
    }

    #[test]
    fn never_overshoots_with_uneven_step() {
        let mut animator = SnapAnimator::new(90.0, 7.0);
        animator.begin(Axis::Z, 1.0);

        let mut frames = 0;
        while animator.is_animating() {
            animator.step();
            assert!(animator.angles()[2] <= 90.0);
            frames += 1;
        }

        assert_eq!(frames, 13);
        assert_eq!(animator.angles(), [0.0, 0.0, 90.0]);
    }

    #[test]
    fn begin_ignored_while_busy() {
        let mut animator = SnapAnimator::new(90.0, 5.0);
        animator.begin(Axis::X, 1.0);
        animator.step();
        let before = animator.clone();

        assert!(!animator.begin(Axis::Z, 1.0));
        assert!(!animator.begin(Axis::X, -1.0));
        assert_eq!(animator, before);
    }

    #[test]
    fn gestures_accumulate_from_current_angle() {
        let mut animator = SnapAnimator::new(90.0, 5.0);
        for _ in 0..2 {
            animator.begin(Axis::X, 1.0);
            while animator.is_animating() {
                animator.step();
            }
        }
        assert_eq!(animator.angles()[0], 180.0);
    }

    #[test]
    fn reset_goes_idle_at_zero() {
        let mut animator = SnapAnimator::new(90.0, 5.0);
        animator.begin(Axis::Y, 1.0);
        animator.step();
        animator.reset();

        assert!(!animator.is_animating());
        assert_eq!(animator.angles(), [0.0; 3]);
        assert!(animator.begin(Axis::Y, 1.0));
    }
}
