//! Config command handler

use thiserror::Error;

use crate::application::ports::PreferenceStore;
use crate::domain::config::{
    ControlMode, PrefKey, PreferenceValue, ValueKind, MAX_OPACITY, MAX_VOLUME_STEP,
    MIN_OPACITY, MIN_VOLUME_STEP,
};
use crate::domain::error::{InvalidSizeInput, PreferenceError};
use crate::domain::overlay::geometry::{
    clamp_button_size, clamp_gesture_box_edge, DEFAULT_BUTTON_SIZE_DP,
    DEFAULT_GESTURE_BOX_HEIGHT_DP, DEFAULT_GESTURE_BOX_WIDTH_DP,
};
use crate::domain::timing::Duration;
use crate::infrastructure::{TomlPreferenceStore, VolumeToolPreference};

use super::args::{ConfigAction, MODE_KEY};
use super::presenter::Presenter;

/// Errors from `volux config`
#[derive(Debug, Error)]
pub enum ConfigCommandError {
    #[error(transparent)]
    Preference(#[from] PreferenceError),

    #[error(transparent)]
    InvalidSize(#[from] InvalidSizeInput),
}

/// Handle config subcommand.
///
/// Returns true when stored preferences changed, so the caller can tell a
/// running daemon to reload.
pub fn handle_config_command(
    action: ConfigAction,
    store: &mut TomlPreferenceStore,
    presenter: &Presenter,
) -> Result<bool, ConfigCommandError> {
    match action {
        ConfigAction::Init => {
            store.init()?;
            presenter.success(&format!(
                "Preferences file created at: {}",
                store.path().display()
            ));
            Ok(true)
        }
        ConfigAction::Set { key, value } => {
            handle_set(store, presenter, &key, &value)?;
            Ok(true)
        }
        ConfigAction::Get { key } => {
            handle_get(store, presenter, &key)?;
            Ok(false)
        }
        ConfigAction::List => {
            handle_list(store, presenter)?;
            Ok(false)
        }
        ConfigAction::Path => {
            presenter.output(&store.path().to_string_lossy());
            Ok(false)
        }
        ConfigAction::ResetPositions => {
            reset_positions(store)?;
            presenter.success("Positions and sizes reset to defaults");
            Ok(true)
        }
        ConfigAction::GestureBoxSize { width, height } => {
            let (w, h) = set_gesture_box_size(store, &width, &height)?;
            presenter.success(&format!("Gesture box size set to {}×{} dp", w, h));
            Ok(true)
        }
    }
}

fn handle_set<S: PreferenceStore>(
    store: &mut S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), PreferenceError> {
    if key == MODE_KEY {
        let mode: ControlMode = value.parse()?;
        set_control_mode(store, mode)?;
        presenter.success(&format!("{} = {}", MODE_KEY, mode));
        return Ok(());
    }

    let key: PrefKey = key.parse()?;
    let parsed = parse_value(key, value)?;
    let shown = parsed.to_string();
    store.put(key, parsed)?;
    presenter.success(&format!("{} = {}", key, shown));
    Ok(())
}

fn handle_get<S: PreferenceStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), PreferenceError> {
    let prefs = store.load()?;
    if key == MODE_KEY {
        presenter.output(prefs.control_mode().as_str());
        return Ok(());
    }

    let key: PrefKey = key.parse()?;
    match prefs.get(key) {
        Some(v) => presenter.output(&v.to_string()),
        None => presenter.output("(not set)"),
    }
    Ok(())
}

fn handle_list<S: PreferenceStore>(store: &S, presenter: &Presenter) -> Result<(), PreferenceError> {
    let prefs = store.load()?;
    presenter.key_value(MODE_KEY, prefs.control_mode().as_str());
    for key in PrefKey::ALL {
        let value = prefs
            .get(key)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "(not set)".to_string());
        presenter.key_value(key.as_str(), &value);
    }
    Ok(())
}

/// Store the three mode flags as a radio group
fn set_control_mode<S: PreferenceStore>(
    store: &mut S,
    mode: ControlMode,
) -> Result<(), PreferenceError> {
    let (buttons, gesture_box, both) = mode.flags();
    store.put_bool(PrefKey::FloatingButtons, buttons)?;
    store.put_bool(PrefKey::GestureBox, gesture_box)?;
    store.put_bool(PrefKey::BothModes, both)
}

/// Forget saved positions and restore default sizes
fn reset_positions<S: PreferenceStore>(store: &mut S) -> Result<(), PreferenceError> {
    for key in PrefKey::POSITIONS {
        store.remove(key)?;
    }
    store.put_int(PrefKey::GestureBoxWidth, DEFAULT_GESTURE_BOX_WIDTH_DP as i64)?;
    store.put_int(PrefKey::GestureBoxHeight, DEFAULT_GESTURE_BOX_HEIGHT_DP as i64)?;
    store.put_int(PrefKey::CurrentButtonSize, DEFAULT_BUTTON_SIZE_DP as i64)
}

/// Parse and clamp a custom gesture box size. Nothing is written unless both
/// values are numbers.
fn set_gesture_box_size<S: PreferenceStore>(
    store: &mut S,
    width: &str,
    height: &str,
) -> Result<(u32, u32), ConfigCommandError> {
    let parse = |raw: &str| {
        raw.trim().parse::<i64>().map_err(|_| InvalidSizeInput {
            input: raw.to_string(),
        })
    };
    let w = clamp_gesture_box_edge(parse(width)?);
    let h = clamp_gesture_box_edge(parse(height)?);

    store.put_int(PrefKey::GestureBoxWidth, w as i64)?;
    store.put_int(PrefKey::GestureBoxHeight, h as i64)?;
    Ok((w, h))
}

/// Parse a command-line value for `key`, clamping numbers into range
fn parse_value(key: PrefKey, value: &str) -> Result<PreferenceValue, PreferenceError> {
    let invalid = |message: String| PreferenceError::ValidationError {
        key: key.as_str().to_string(),
        message,
    };
    let value = value.trim();

    match key.kind() {
        ValueKind::Bool => parse_bool(value)
            .map(PreferenceValue::Bool)
            .map_err(|_| invalid("Value must be 'true' or 'false'".to_string())),
        ValueKind::Float => {
            let v: f64 = value
                .parse()
                .ok()
                .filter(|v: &f64| v.is_finite())
                .ok_or_else(|| invalid(format!("'{}' is not a number", value)))?;
            let v = match key {
                PrefKey::Opacity => v.clamp(MIN_OPACITY, MAX_OPACITY),
                _ => v,
            };
            Ok(PreferenceValue::Float(v))
        }
        ValueKind::DurationMs => {
            // Plain numbers are milliseconds
            let duration = match value.parse::<u64>() {
                Ok(ms) => Duration::from_millis(ms),
                Err(_) => value
                    .parse::<Duration>()
                    .map_err(|e| invalid(e.to_string()))?,
            };
            Ok(PreferenceValue::Int(
                duration.clamp_auto_hide().as_millis() as i64,
            ))
        }
        ValueKind::Int => {
            let v: i64 = value
                .parse()
                .map_err(|_| invalid(format!("'{}' is not a whole number", value)))?;
            let v = match key {
                PrefKey::CurrentButtonSize => clamp_button_size(v) as i64,
                PrefKey::GestureBoxWidth | PrefKey::GestureBoxHeight => {
                    clamp_gesture_box_edge(v) as i64
                }
                PrefKey::VolumeStep => v.clamp(MIN_VOLUME_STEP as i64, MAX_VOLUME_STEP as i64),
                _ => v,
            };
            Ok(PreferenceValue::Int(v))
        }
        ValueKind::Str => {
            let tool = value
                .parse::<VolumeToolPreference>()
                .map_err(|e| invalid(e.to_string()))?;
            Ok(PreferenceValue::Str(tool.to_string()))
        }
    }
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::Preferences;
    use crate::infrastructure::MemoryPreferenceStore;

    #[test]
    fn parse_bool_values() {
        assert_eq!(parse_bool("true"), Ok(true));
        assert_eq!(parse_bool("false"), Ok(false));
        assert_eq!(parse_bool("yes"), Ok(true));
        assert_eq!(parse_bool("off"), Ok(false));
        assert_eq!(parse_bool("1"), Ok(true));
        assert!(parse_bool("invalid").is_err());
    }

    #[test]
    fn opacity_is_clamped() {
        assert_eq!(
            parse_value(PrefKey::Opacity, "5").unwrap(),
            PreferenceValue::Float(1.0)
        );
        assert_eq!(
            parse_value(PrefKey::Opacity, "0.05").unwrap(),
            PreferenceValue::Float(0.2)
        );
        assert!(parse_value(PrefKey::Opacity, "NaN").is_err());
        assert!(parse_value(PrefKey::Opacity, "dim").is_err());
    }

    #[test]
    fn auto_hide_accepts_durations_and_millis() {
        assert_eq!(
            parse_value(PrefKey::AutoHideDelay, "5s").unwrap(),
            PreferenceValue::Int(5000)
        );
        assert_eq!(
            parse_value(PrefKey::AutoHideDelay, "2500").unwrap(),
            PreferenceValue::Int(2500)
        );
        assert_eq!(
            parse_value(PrefKey::AutoHideDelay, "1m").unwrap(),
            PreferenceValue::Int(10_000)
        );
        assert!(parse_value(PrefKey::AutoHideDelay, "soon").is_err());
    }

    #[test]
    fn sizes_are_clamped() {
        assert_eq!(
            parse_value(PrefKey::CurrentButtonSize, "500").unwrap(),
            PreferenceValue::Int(120)
        );
        assert_eq!(
            parse_value(PrefKey::GestureBoxHeight, "1").unwrap(),
            PreferenceValue::Int(40)
        );
        assert_eq!(
            parse_value(PrefKey::VolumeStep, "0").unwrap(),
            PreferenceValue::Int(1)
        );
    }

    #[test]
    fn positions_are_not_clamped() {
        assert_eq!(
            parse_value(PrefKey::FloatingButtonsX, "-40").unwrap(),
            PreferenceValue::Int(-40)
        );
    }

    #[test]
    fn volume_tool_is_validated() {
        assert_eq!(
            parse_value(PrefKey::VolumeTool, "pactl").unwrap(),
            PreferenceValue::Str("pactl".to_string())
        );
        assert!(parse_value(PrefKey::VolumeTool, "alsa-magic").is_err());
    }

    #[test]
    fn mode_is_a_radio_group() {
        let mut store = MemoryPreferenceStore::new();
        let presenter = Presenter::new();
        handle_set(&mut store, &presenter, "mode", "both").unwrap();
        let prefs = store.load().unwrap();
        assert_eq!(prefs.floating_buttons, Some(false));
        assert_eq!(prefs.gesture_box, Some(false));
        assert_eq!(prefs.both_modes, Some(true));
        assert_eq!(prefs.control_mode(), ControlMode::Both);

        handle_set(&mut store, &presenter, "mode", "gesture-box").unwrap();
        let prefs = store.load().unwrap();
        assert_eq!(prefs.control_mode(), ControlMode::GestureBox);
        assert_eq!(prefs.both_modes, Some(false));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let mut store = MemoryPreferenceStore::new();
        let err = handle_set(&mut store, &Presenter::new(), "colour", "red").unwrap_err();
        assert!(err.to_string().contains("Unknown key"));
        assert_eq!(store.load().unwrap(), Preferences::empty());
    }

    #[test]
    fn bad_boolean_mutates_nothing() {
        let mut store = MemoryPreferenceStore::new();
        assert!(handle_set(&mut store, &Presenter::new(), "always_visible", "maybe").is_err());
        assert_eq!(store.load().unwrap().always_visible, None);
    }

    #[test]
    fn gesture_box_size_rejects_text() {
        let mut store = MemoryPreferenceStore::new();
        let err = set_gesture_box_size(&mut store, "wide", "100").unwrap_err();
        assert!(err.to_string().contains("Please enter valid numbers"));
        let prefs = store.load().unwrap();
        assert_eq!(prefs.gesture_box_width, None);
        assert_eq!(prefs.gesture_box_height, None);
    }

    #[test]
    fn gesture_box_size_bad_height_writes_nothing() {
        let mut store = MemoryPreferenceStore::new();
        assert!(set_gesture_box_size(&mut store, "300", "tall").is_err());
        assert_eq!(store.load().unwrap().gesture_box_width, None);
    }

    #[test]
    fn gesture_box_size_is_clamped() {
        let mut store = MemoryPreferenceStore::new();
        assert_eq!(
            set_gesture_box_size(&mut store, "1000", " 10 ").unwrap(),
            (400, 40)
        );
        let prefs = store.load().unwrap();
        assert_eq!(prefs.gesture_box_width, Some(400));
        assert_eq!(prefs.gesture_box_height, Some(40));
    }

    #[test]
    fn reset_positions_clears_positions_and_restores_sizes() {
        let mut prefs = Preferences::empty();
        prefs.floating_buttons_x = Some(7);
        prefs.gesture_box_y = Some(-30);
        prefs.gesture_box_width = Some(321);
        prefs.current_button_size = Some(99);
        prefs.opacity = Some(0.5);
        let mut store = MemoryPreferenceStore::with_preferences(prefs);

        reset_positions(&mut store).unwrap();

        let prefs = store.load().unwrap();
        assert_eq!(prefs.floating_buttons_x, None);
        assert_eq!(prefs.gesture_box_y, None);
        assert_eq!(prefs.gesture_box_width, Some(200));
        assert_eq!(prefs.gesture_box_height, Some(100));
        assert_eq!(prefs.current_button_size, Some(60));
        assert_eq!(prefs.opacity, Some(0.5));
    }
}
