//! Macro step model
//!
//! Steps serialize to the same flat JSON shape the document format has
//! always used: a `type` tag plus `delayMs`, `button`, `position`, `x`,
//! `y` fields. Numeric fields are loaded permissively - anything that is
//! not a finite non-negative number becomes 0.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Opaque step identity, used by editors for row selection.
/// Has no meaning during playback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(String);

impl StepId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for StepId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mouse button a click step dispatches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

// Unknown button values load as Left.
impl<'de> Deserialize<'de> for MouseButton {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(match value.as_str() {
            "right" => Self::Right,
            "middle" => Self::Middle,
            _ => Self::Left,
        })
    }
}

/// Where a click lands: the pointer's current location, or the step's
/// own `x`/`y` coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Current,
    Custom,
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(match value.as_str() {
            "custom" => Self::Custom,
            _ => Self::Current,
        })
    }
}

/// One unit of macro playback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Step {
    Wait(WaitStep),
    Click(ClickStep),
}

/// A pure delay. No OS interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitStep {
    #[serde(default)]
    pub id: StepId,
    #[serde(rename = "delayMs", default, deserialize_with = "coerce_millis")]
    pub delay_ms: u64,
}

/// A mouse click, optionally at an absolute screen coordinate, followed
/// by a delay before the next step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickStep {
    #[serde(default)]
    pub id: StepId,
    #[serde(default)]
    pub button: MouseButton,
    #[serde(default)]
    pub position: Position,
    #[serde(default, deserialize_with = "coerce_coord")]
    pub x: i32,
    #[serde(default, deserialize_with = "coerce_coord")]
    pub y: i32,
    #[serde(rename = "delayMs", default, deserialize_with = "coerce_millis")]
    pub delay_ms: u64,
}

impl ClickStep {
    /// Absolute target for this click, `None` when the click lands at
    /// the pointer's current location (`x`/`y` are ignored then).
    pub fn target(&self) -> Option<(i32, i32)> {
        match self.position {
            Position::Custom => Some((self.x, self.y)),
            Position::Current => None,
        }
    }
}

impl Step {
    pub fn wait(delay_ms: u64) -> Self {
        Self::Wait(WaitStep {
            id: StepId::new(),
            delay_ms,
        })
    }

    /// Click at the pointer's current location.
    pub fn click_here(button: MouseButton, delay_ms: u64) -> Self {
        Self::Click(ClickStep {
            id: StepId::new(),
            button,
            position: Position::Current,
            x: 0,
            y: 0,
            delay_ms,
        })
    }

    /// Click at an absolute screen coordinate.
    pub fn click_at(button: MouseButton, x: i32, y: i32, delay_ms: u64) -> Self {
        Self::Click(ClickStep {
            id: StepId::new(),
            button,
            position: Position::Custom,
            x,
            y,
            delay_ms,
        })
    }

    pub fn id(&self) -> &StepId {
        match self {
            Self::Wait(w) => &w.id,
            Self::Click(c) => &c.id,
        }
    }

    /// Delay applied after this step, in milliseconds.
    pub fn delay_ms(&self) -> u64 {
        match self {
            Self::Wait(w) => w.delay_ms,
            Self::Click(c) => c.delay_ms,
        }
    }
}

fn coerce_millis<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(serde_json::Value::deserialize(deserializer)?) as u64)
}

fn coerce_coord<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(serde_json::Value::deserialize(deserializer)?) as i32)
}

/// Invalid, negative or non-finite numbers collapse to 0; fractional
/// values round.
fn lenient_number(value: serde_json::Value) -> f64 {
    value
        .as_f64()
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(f64::round)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_round_trips() {
        let step = Step::wait(500);
        let json = serde_json::to_string(&step).unwrap();
        let back: Step = serde_json::from_str(&json).unwrap();
        assert_eq!(back, step);
    }

    #[test]
    fn click_round_trips_with_all_fields() {
        let step = Step::click_at(MouseButton::Right, 100, 200, 250);
        let json = serde_json::to_string(&step).unwrap();
        assert!(json.contains(r#""type":"click""#));
        assert!(json.contains(r#""button":"right""#));
        assert!(json.contains(r#""position":"custom""#));
        assert!(json.contains(r#""delayMs":250"#));
        let back: Step = serde_json::from_str(&json).unwrap();
        assert_eq!(back, step);
    }

    #[test]
    fn invalid_numbers_collapse_to_zero() {
        let step: Step = serde_json::from_str(
            r#"{"type":"click","id":"s1","button":"left","position":"custom","x":-40,"y":"oops","delayMs":-250}"#,
        )
        .unwrap();
        let Step::Click(click) = step else {
            panic!("expected click");
        };
        assert_eq!((click.x, click.y), (0, 0));
        assert_eq!(click.delay_ms, 0);
    }

    #[test]
    fn fractional_delay_rounds() {
        let step: Step =
            serde_json::from_str(r#"{"type":"wait","id":"s1","delayMs":1500.6}"#).unwrap();
        assert_eq!(step.delay_ms(), 1501);
    }

    #[test]
    fn missing_fields_default() {
        let step: Step = serde_json::from_str(r#"{"type":"click"}"#).unwrap();
        let Step::Click(click) = step else {
            panic!("expected click");
        };
        assert_eq!(click.button, MouseButton::Left);
        assert_eq!(click.position, Position::Current);
        assert_eq!(click.delay_ms, 0);
        assert!(!click.id.as_str().is_empty());
    }

    #[test]
    fn unknown_button_loads_as_left() {
        let step: Step =
            serde_json::from_str(r#"{"type":"click","id":"s1","button":"back"}"#).unwrap();
        let Step::Click(click) = step else {
            panic!("expected click");
        };
        assert_eq!(click.button, MouseButton::Left);
    }

    #[test]
    fn current_position_has_no_target() {
        let here = Step::click_here(MouseButton::Left, 0);
        let Step::Click(click) = here else {
            panic!("expected click");
        };
        assert_eq!(click.target(), None);

        let there = Step::click_at(MouseButton::Left, 10, 20, 0);
        let Step::Click(click) = there else {
            panic!("expected click");
        };
        assert_eq!(click.target(), Some((10, 20)));
    }
}
