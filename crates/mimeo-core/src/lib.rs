//! mimeo-core - Mouse macro data model and persistence
//!
//! Step and document types shared by the playback engine and its
//! frontends, plus the on-disk macro format and a small macro library.

pub mod document;
pub mod error;
pub mod step;
pub mod storage;

pub use document::{MacroDocument, FORMAT_VERSION};
pub use error::PlaybackError;
pub use step::{ClickStep, MouseButton, Position, Step, StepId, WaitStep};
pub use storage::MacroStorage;

pub mod prelude {
    pub use crate::document::{MacroDocument, FORMAT_VERSION};
    pub use crate::error::PlaybackError;
    pub use crate::step::{ClickStep, MouseButton, Position, Step, StepId, WaitStep};
    pub use crate::storage::MacroStorage;
}
