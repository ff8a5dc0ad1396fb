//! A last-in-first-out stack of composed affine transforms.
//!
//! The stack is seeded once per frame (with the camera view times the world root)
//! and is never empty afterwards. [`TransformStack::push`] duplicates the top,
//! the mutators post-multiply the top in place, and [`TransformStack::pop`] restores
//! the previous frame. Popping the seed is a programming error and is reported as
//! [`StackError::Underflow`].
//!
//! ```
//! use fanrig::{TransformStack, Mat4, Vec3};
//!
//! let mut stack = TransformStack::new(Mat4::IDENTITY);
//! stack.push();
//! stack.translate(Vec3::new(0.0, 2.0, 0.0));
//! stack.rotate_y(0.5);
//! stack.pop().unwrap();
//! assert_eq!(stack.current(), Mat4::IDENTITY);
//! ```

use glam::{Mat4, Vec3};

/// Structural violations of the push/pop discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StackError {
    /// `pop` was called with only the frame seed left.
    #[error("transform stack underflow: pop with no saved frame")]
    Underflow,
    /// A subtree finished at a different depth than it started.
    #[error("transform stack unbalanced: expected depth {expected}, found {found}")]
    Unbalanced { expected: usize, found: usize },
}

/// Owning stack of `Mat4` transforms with copy-on-push semantics.
#[derive(Clone, Debug)]
pub struct TransformStack {
    frames: Vec<Mat4>,
}

impl TransformStack {
    /// Creates a stack holding only `seed`.
    pub fn new(seed: Mat4) -> Self {
        Self { frames: vec![seed] }
    }

    /// Drops every saved frame and reseeds the stack.
    pub fn reset(&mut self, seed: Mat4) {
        self.frames.clear();
        self.frames.push(seed);
    }

    /// Number of frames, including the seed. Never zero.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns a copy of the top transform.
    ///
    /// Returned by value so no borrow of the stack can outlive a later `pop`.
    pub fn current(&self) -> Mat4 {
        *self.top()
    }

    /// Saves the current top by pushing a copy of it.
    pub fn push(&mut self) {
        let top = self.current();
        self.frames.push(top);
    }

    /// Discards the top and exposes the previous frame.
    pub fn pop(&mut self) -> Result<(), StackError> {
        if self.frames.len() <= 1 {
            return Err(StackError::Underflow);
        }
        self.frames.pop();
        Ok(())
    }

    /// Post-multiplies the top by `m` (`top = top * m`).
    pub fn apply(&mut self, m: Mat4) {
        let top = self.top_mut();
        *top *= m;
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.apply(Mat4::from_translation(offset));
    }

    /// Rotates about `axis` (normalized here) by `radians`.
    pub fn rotate(&mut self, axis: Vec3, radians: f32) {
        self.apply(Mat4::from_axis_angle(axis.normalize(), radians));
    }

    pub fn rotate_x(&mut self, radians: f32) {
        self.apply(Mat4::from_rotation_x(radians));
    }

    pub fn rotate_y(&mut self, radians: f32) {
        self.apply(Mat4::from_rotation_y(radians));
    }

    pub fn rotate_z(&mut self, radians: f32) {
        self.apply(Mat4::from_rotation_z(radians));
    }

    pub fn scale(&mut self, factors: Vec3) {
        self.apply(Mat4::from_scale(factors));
    }

    fn top(&self) -> &Mat4 {
        // `frames` always holds the seed: `new`/`reset` insert it and `pop` refuses to
        // remove it.
        &self.frames[self.frames.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Mat4 {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY)
    }
}
