//! Windows mouse backend
//!
//! Uses SetCursorPos for moves and SendInput for the press/release
//! pair (two INPUT records in one batch, delivered as discrete events).

use anyhow::Result;
use mimeo_core::step::MouseButton;

use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_MOUSE, MOUSEINPUT, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP,
    MOUSEEVENTF_MIDDLEDOWN, MOUSEEVENTF_MIDDLEUP, MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP,
    MOUSE_EVENT_FLAGS,
};
use windows::Win32::UI::WindowsAndMessaging::SetCursorPos;

use crate::adapter::MouseAdapter;

pub struct SystemMouse;

impl SystemMouse {
    pub fn new() -> Self {
        Self
    }

    fn move_to(&self, x: i32, y: i32) -> Result<()> {
        unsafe {
            SetCursorPos(x, y).map_err(|e| anyhow::anyhow!("failed to move cursor: {:?}", e))?;
        }
        Ok(())
    }
}

impl Default for SystemMouse {
    fn default() -> Self {
        Self::new()
    }
}

impl MouseAdapter for SystemMouse {
    fn click(&self, button: MouseButton, at: Option<(i32, i32)>) -> Result<()> {
        if let Some((x, y)) = at {
            self.move_to(x, y)?;
        }

        let (down_flags, up_flags) = match button {
            MouseButton::Left => (MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP),
            MouseButton::Right => (MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP),
            MouseButton::Middle => (MOUSEEVENTF_MIDDLEDOWN, MOUSEEVENTF_MIDDLEUP),
        };

        let inputs = [make_mouse_input(down_flags), make_mouse_input(up_flags)];
        send_inputs(&inputs)
    }
}

fn make_mouse_input(flags: MOUSE_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx: 0,
                dy: 0,
                mouseData: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn send_inputs(inputs: &[INPUT]) -> Result<()> {
    let sent = unsafe { SendInput(inputs, std::mem::size_of::<INPUT>() as i32) };

    if sent as usize != inputs.len() {
        return Err(anyhow::anyhow!(
            "SendInput failed: sent {} of {}",
            sent,
            inputs.len()
        ));
    }

    Ok(())
}
