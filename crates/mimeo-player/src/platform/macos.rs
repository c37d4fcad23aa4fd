//! macOS mouse backend using CGEvent injection

use anyhow::{anyhow, Result};
use mimeo_core::step::MouseButton;

use cidre::cg;

use crate::adapter::MouseAdapter;

// Raw FFI for the pieces not exposed by cidre
#[link(name = "CoreGraphics", kind = "framework")]
extern "C" {
    fn CGEventPost(tap: u32, event: *const std::ffi::c_void);
    fn CGEventCreate(source: *const std::ffi::c_void) -> *mut std::ffi::c_void;
    fn CGEventGetLocation(event: *const std::ffi::c_void) -> cg::Point;
    fn CFRelease(cf: *const std::ffi::c_void);
}

const HID_EVENT_TAP: u32 = 0;

fn post_event(event: &cg::Event, location: u32) {
    unsafe {
        CGEventPost(location, event as *const _ as *const std::ffi::c_void);
    }
}

/// Current pointer position, read from an empty event.
fn pointer_location() -> Result<cg::Point> {
    unsafe {
        let event = CGEventCreate(std::ptr::null());
        if event.is_null() {
            return Err(anyhow!("failed to read cursor position"));
        }
        let location = CGEventGetLocation(event);
        CFRelease(event);
        Ok(location)
    }
}

pub struct SystemMouse;

impl SystemMouse {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemMouse {
    fn default() -> Self {
        Self::new()
    }
}

impl MouseAdapter for SystemMouse {
    fn click(&self, button: MouseButton, at: Option<(i32, i32)>) -> Result<()> {
        let pos = match at {
            Some((x, y)) => cg::Point {
                x: x as f64,
                y: y as f64,
            },
            None => pointer_location()?,
        };

        if at.is_some() {
            // Move first so the press lands at the requested point.
            let moved =
                cg::Event::mouse(None, cg::EventType::MOUSE_MOVED, pos, cg::MouseButton::Left)
                    .ok_or_else(|| anyhow!("failed to create move event"))?;
            post_event(&moved, HID_EVENT_TAP);
        }

        let (btn, down_type, up_type) = match button {
            MouseButton::Left => (
                cg::MouseButton::Left,
                cg::EventType::LEFT_MOUSE_DOWN,
                cg::EventType::LEFT_MOUSE_UP,
            ),
            MouseButton::Right => (
                cg::MouseButton::Right,
                cg::EventType::RIGHT_MOUSE_DOWN,
                cg::EventType::RIGHT_MOUSE_UP,
            ),
            MouseButton::Middle => (
                cg::MouseButton::Center,
                cg::EventType::OHTER_MOUSE_DOWN,
                cg::EventType::OHTER_MOUSE_UP,
            ),
        };

        let down = cg::Event::mouse(None, down_type, pos, btn)
            .ok_or_else(|| anyhow!("failed to create mouse event"))?;
        post_event(&down, HID_EVENT_TAP);
        std::thread::sleep(std::time::Duration::from_millis(10));
        let up = cg::Event::mouse(None, up_type, pos, btn)
            .ok_or_else(|| anyhow!("failed to create mouse event"))?;
        post_event(&up, HID_EVENT_TAP);

        Ok(())
    }
}
