//! Keyboard bindings.
//!
//! Raw crossterm key events are translated into [`Action`]s here so the
//! rest of the host never matches on key codes.

use crossterm::event::{KeyCode, KeyModifiers};
use physlab::SimKind;

/// Something the user asked the host to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Leave the program.
    Quit,
    /// Start the active simulation if stopped, stop it if running.
    ToggleRun,
    /// Reset the active simulation.
    Reset,
    /// Move the selected parameter by this many steps.
    Nudge(i32),
    /// Move the parameter selection up (negative) or down (positive).
    Select(i32),
    /// Jump to a tab.
    Tab(SimKind),
    /// Next tab, wrapping.
    NextTab,
    /// Previous tab, wrapping.
    PrevTab,
    /// Show or hide trails.
    ToggleTrail,
    /// Show or hide velocity and force arrows.
    ToggleVectors,
    /// Show or hide reference lines.
    ToggleGuides,
}

/// Steps applied by a shifted nudge.
const COARSE: i32 = 10;

/// Maps a key press to an action. Unbound keys return `None`.
pub fn action_for(code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let shift = modifiers.contains(KeyModifiers::SHIFT);

    let action = match code {
        KeyCode::Char('c') if ctrl => Action::Quit,
        _ if ctrl => return None,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char(' ') => Action::ToggleRun,
        KeyCode::Char('r') => Action::Reset,
        KeyCode::Left if shift => Action::Nudge(-COARSE),
        KeyCode::Right if shift => Action::Nudge(COARSE),
        KeyCode::Left | KeyCode::Char('h') => Action::Nudge(-1),
        KeyCode::Right | KeyCode::Char('l') => Action::Nudge(1),
        KeyCode::Char('H') => Action::Nudge(-COARSE),
        KeyCode::Char('L') => Action::Nudge(COARSE),
        KeyCode::Up | KeyCode::Char('k') => Action::Select(-1),
        KeyCode::Down | KeyCode::Char('j') => Action::Select(1),
        KeyCode::Tab if shift => Action::PrevTab,
        KeyCode::Tab => Action::NextTab,
        KeyCode::BackTab => Action::PrevTab,
        KeyCode::Char('t') => Action::ToggleTrail,
        KeyCode::Char('v') => Action::ToggleVectors,
        KeyCode::Char('g') => Action::ToggleGuides,
        KeyCode::Char(c @ '1'..='6') => {
            let index = c as usize - '1' as usize;
            Action::Tab(SimKind::ALL[index])
        }
        _ => return None,
    };
    Some(action)
}

/// One-line summary of the bindings, for the footer.
pub const HELP: &str =
    "space run · r reset · ←/→ adjust · ↑/↓ select · 1-6/tab switch · t/v/g overlays · q quit";

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> Option<Action> {
        action_for(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(press(KeyCode::Char('q')), Some(Action::Quit));
        assert_eq!(press(KeyCode::Esc), Some(Action::Quit));
        assert_eq!(
            action_for(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Some(Action::Quit)
        );
        assert_eq!(action_for(KeyCode::Char('r'), KeyModifiers::CONTROL), None);
    }

    #[test]
    fn test_digits_select_tabs() {
        assert_eq!(press(KeyCode::Char('1')), Some(Action::Tab(SimKind::Projectile)));
        assert_eq!(press(KeyCode::Char('6')), Some(Action::Tab(SimKind::Orbit)));
        assert_eq!(press(KeyCode::Char('7')), None);
    }

    #[test]
    fn test_arrows_and_vim_keys_agree() {
        assert_eq!(press(KeyCode::Left), press(KeyCode::Char('h')));
        assert_eq!(press(KeyCode::Right), press(KeyCode::Char('l')));
        assert_eq!(press(KeyCode::Up), press(KeyCode::Char('k')));
        assert_eq!(press(KeyCode::Down), press(KeyCode::Char('j')));
        assert_eq!(
            action_for(KeyCode::Right, KeyModifiers::SHIFT),
            Some(Action::Nudge(COARSE))
        );
    }

    #[test]
    fn test_tab_cycling() {
        assert_eq!(press(KeyCode::Tab), Some(Action::NextTab));
        assert_eq!(press(KeyCode::BackTab), Some(Action::PrevTab));
        assert_eq!(action_for(KeyCode::Tab, KeyModifiers::SHIFT), Some(Action::PrevTab));
    }
}
