//! # mimeo
//!
//! Mouse macro playback: record a list of click and wait steps in a
//! document, then replay it against the live cursor.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mimeo::prelude::*;
//!
//! let doc = MacroDocument::with_steps(vec![
//!     Step::wait(500),
//!     Step::click_at(MouseButton::Left, 120, 80, 0),
//! ]);
//!
//! let player = Player::new();
//! let status = player.subscribe();
//! player.run(&doc.steps, PlayOptions::default())?;
//! # Ok::<(), mimeo::PlaybackError>(())
//! ```

// Re-export the data model
pub use mimeo_core::*;

// Re-export the playback engine
pub use mimeo_player as player;
pub use mimeo_player::{
    MouseAdapter, NoopMouse, PlayOptions, PlaybackHandle, Player, RunOutcome, StatusEvent,
};

/// Prelude - import everything you need
pub mod prelude {
    pub use mimeo_core::prelude::*;
    pub use mimeo_player::prelude::*;
}
