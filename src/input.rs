use crate::model::Scene;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::time::Duration;

/// What the user asked the app to do, already stripped of key details.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum UiAction {
    DateChar(char),
    DateBackspace,
    Calculate,
    Reset,
    ThemeToggle,
    DriftToggle,
    SelectPrev,
    SelectNext,
    QuizOpen,
    QuizAnswer(usize),
    QuizNext,
    HelpToggle,
    Back,
    Quit,
}

/// Drain pending key presses without blocking the frame loop.
pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<KeyCode>> {
    let mut out = Vec::new();
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        if let Event::Key(k) = event::read()? {
            if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                out.push(k.code);
                if out.len() >= 32 {
                    break;
                }
            }
        }
    }
    Ok(out)
}

pub(crate) fn map_key_to_action(scene: Scene, key: KeyCode) -> Option<UiAction> {
    match scene {
        Scene::Quiz => match key {
            KeyCode::Char(c @ '1'..='4') => {
                Some(UiAction::QuizAnswer(c as usize - '1' as usize))
            }
            KeyCode::Enter | KeyCode::Char('n') | KeyCode::Char('N') => Some(UiAction::QuizNext),
            KeyCode::Esc | KeyCode::Char('x') | KeyCode::Char('X') => Some(UiAction::Back),
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(UiAction::Quit),
            _ => None,
        },
        Scene::Help => match key {
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H') => Some(UiAction::Back),
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(UiAction::Quit),
            _ => None,
        },
        Scene::Main => match key {
            // the date field only ever holds digits and dashes, so letters
            // stay free for shortcuts
            KeyCode::Char(c @ ('0'..='9' | '-')) => Some(UiAction::DateChar(c)),
            KeyCode::Backspace => Some(UiAction::DateBackspace),
            KeyCode::Enter => Some(UiAction::Calculate),
            KeyCode::Left => Some(UiAction::SelectPrev),
            KeyCode::Right => Some(UiAction::SelectNext),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(UiAction::Reset),
            KeyCode::Char('t') | KeyCode::Char('T') => Some(UiAction::ThemeToggle),
            KeyCode::Char('g') | KeyCode::Char('G') => Some(UiAction::DriftToggle),
            KeyCode::Char('x') | KeyCode::Char('X') => Some(UiAction::QuizOpen),
            KeyCode::Char('h') | KeyCode::Char('H') => Some(UiAction::HelpToggle),
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(UiAction::Quit),
            KeyCode::Esc => Some(UiAction::Back),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_scene_date_entry_and_shortcuts() {
        assert_eq!(
            map_key_to_action(Scene::Main, KeyCode::Char('7')),
            Some(UiAction::DateChar('7'))
        );
        assert_eq!(
            map_key_to_action(Scene::Main, KeyCode::Char('-')),
            Some(UiAction::DateChar('-'))
        );
        assert_eq!(
            map_key_to_action(Scene::Main, KeyCode::Enter),
            Some(UiAction::Calculate)
        );
        assert_eq!(
            map_key_to_action(Scene::Main, KeyCode::Char('g')),
            Some(UiAction::DriftToggle)
        );
        assert_eq!(
            map_key_to_action(Scene::Main, KeyCode::Right),
            Some(UiAction::SelectNext)
        );
        assert_eq!(map_key_to_action(Scene::Main, KeyCode::Char('z')), None);
    }

    #[test]
    fn quiz_scene_maps_digits_to_options() {
        assert_eq!(
            map_key_to_action(Scene::Quiz, KeyCode::Char('1')),
            Some(UiAction::QuizAnswer(0))
        );
        assert_eq!(
            map_key_to_action(Scene::Quiz, KeyCode::Char('4')),
            Some(UiAction::QuizAnswer(3))
        );
        // selection keys belong to the main scene only
        assert_eq!(map_key_to_action(Scene::Quiz, KeyCode::Left), None);
        assert_eq!(
            map_key_to_action(Scene::Quiz, KeyCode::Esc),
            Some(UiAction::Back)
        );
    }

    #[test]
    fn help_scene_only_closes() {
        assert_eq!(
            map_key_to_action(Scene::Help, KeyCode::Char('h')),
            Some(UiAction::Back)
        );
        assert_eq!(map_key_to_action(Scene::Help, KeyCode::Char('1')), None);
    }
}
