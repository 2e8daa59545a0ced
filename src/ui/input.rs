use crate::ui::message::AppMessage;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub const THRESHOLD_STEP_KMH: f64 = 0.5;
pub const SPEED_STEP_KMH: f64 = 1.0;
pub const VOLUME_STEP: i32 = 5;

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key(key: KeyEvent) -> Option<AppMessage> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppMessage::Quit),
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => Some(AppMessage::Quit),
            (KeyCode::Char('e'), _) => Some(AppMessage::ToggleEnabled),
            (KeyCode::Char('m'), _) => Some(AppMessage::ToggleDynamicMode),
            (KeyCode::Char('['), _) => Some(AppMessage::PauseThreshold(-THRESHOLD_STEP_KMH)),
            (KeyCode::Char(']'), _) => Some(AppMessage::PauseThreshold(THRESHOLD_STEP_KMH)),
            (KeyCode::Char('j'), _) => Some(AppMessage::SpeedForMaxVolume(-SPEED_STEP_KMH)),
            (KeyCode::Char('k'), _) => Some(AppMessage::SpeedForMaxVolume(SPEED_STEP_KMH)),
            (KeyCode::Char('-'), _) => Some(AppMessage::DefaultVolume(-VOLUME_STEP)),
            (KeyCode::Char('+'), _) | (KeyCode::Char('='), _) => {
                Some(AppMessage::DefaultVolume(VOLUME_STEP))
            }
            (KeyCode::Char(','), _) => Some(AppMessage::MinVolume(-VOLUME_STEP)),
            (KeyCode::Char('.'), _) => Some(AppMessage::MinVolume(VOLUME_STEP)),
            (KeyCode::Char('<'), _) => Some(AppMessage::MaxVolume(-VOLUME_STEP)),
            (KeyCode::Char('>'), _) => Some(AppMessage::MaxVolume(VOLUME_STEP)),
            _ => None,
        }
    }
}
