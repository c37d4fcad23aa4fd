//! Mouse adapter contract

use anyhow::Result;
use mimeo_core::step::MouseButton;

/// The capability the engine drives: optionally move the pointer, then
/// dispatch a press/release pair for one button.
///
/// Implementations must emit the press and release as two discrete
/// events so applications observing raw input see a realistic pair.
pub trait MouseAdapter: Send + Sync {
    /// `at` is an absolute screen coordinate; `None` clicks wherever
    /// the pointer currently is.
    fn click(&self, button: MouseButton, at: Option<(i32, i32)>) -> Result<()>;
}

/// Accepts every click without touching the system. Used for dry runs.
pub struct NoopMouse;

impl MouseAdapter for NoopMouse {
    fn click(&self, _button: MouseButton, _at: Option<(i32, i32)>) -> Result<()> {
        Ok(())
    }
}
