use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::core::operation::OperationType;

/// TUI-specific input events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuiEvent {
    Quit,
    ForceQuit, // Ctrl+C
    ListUp,
    ListDown,
    ToggleFocus,
    /// Start a simulated operation of this kind
    Start(OperationType),
    /// Start a simulated copy that fails halfway
    StartFailing,
    Resize,
}

/// Poll from async code. The wait runs through `block_in_place` so other
/// tasks on this worker (the registry listener) keep running. Needs the
/// multi-thread runtime.
pub fn poll_event_blocking(timeout: std::time::Duration) -> Option<TuiEvent> {
    tokio::task::block_in_place(|| poll_event_timeout(timeout))
}

fn poll_event_timeout(timeout: std::time::Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => {}
        Ok(false) => return None,
        Err(e) => {
            log::warn!("Event poll failed: {}", e);
            return None;
        }
    }
    match event::read() {
        Ok(Event::Key(key_event)) if key_event.kind == KeyEventKind::Press => {
            log::debug!("Key event: {:?} with modifiers {:?}", key_event.code, key_event.modifiers);
            map_key(key_event.modifiers, key_event.code)
        }
        Ok(Event::Resize(_, _)) => Some(TuiEvent::Resize),
        Ok(_) => None,
        Err(e) => {
            log::warn!("Event read failed: {}", e);
            None
        }
    }
}

fn map_key(modifiers: KeyModifiers, code: KeyCode) -> Option<TuiEvent> {
    match (modifiers, code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
        (_, KeyCode::Char('q')) | (_, KeyCode::Esc) => Some(TuiEvent::Quit),
        (_, KeyCode::Up) | (_, KeyCode::Char('k')) => Some(TuiEvent::ListUp),
        (_, KeyCode::Down) | (_, KeyCode::Char('j')) => Some(TuiEvent::ListDown),
        (_, KeyCode::Tab) => Some(TuiEvent::ToggleFocus),
        (_, KeyCode::Char('c')) => Some(TuiEvent::Start(OperationType::Copy)),
        (_, KeyCode::Char('m')) => Some(TuiEvent::Start(OperationType::Cut)),
        (_, KeyCode::Char('d')) => Some(TuiEvent::Start(OperationType::Delete)),
        (_, KeyCode::Char('z')) => Some(TuiEvent::Start(OperationType::Compress)),
        (_, KeyCode::Char('x')) => Some(TuiEvent::Start(OperationType::Extract)),
        (_, KeyCode::Char('e')) => Some(TuiEvent::Start(OperationType::Encrypt)),
        (_, KeyCode::Char('u')) => Some(TuiEvent::Start(OperationType::Decrypt)),
        (_, KeyCode::Char('f')) => Some(TuiEvent::StartFailing),
        _ => None,
    }
}
