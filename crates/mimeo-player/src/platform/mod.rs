//! Platform mouse backends
//!
//! Each supported OS contributes one adapter implementation. Platforms
//! without one get `None`, which the engine reports as
//! `UnsupportedPlatform`.

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "windows")]
pub mod windows;

use crate::adapter::MouseAdapter;

/// The host platform's mouse backend, if one exists.
pub fn system_adapter() -> Option<Box<dyn MouseAdapter>> {
    #[cfg(target_os = "windows")]
    {
        Some(Box::new(windows::SystemMouse::new()))
    }
    #[cfg(target_os = "macos")]
    {
        Some(Box::new(macos::SystemMouse::new()))
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        None
    }
}
