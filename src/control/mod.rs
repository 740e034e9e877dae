//! Operator commands
//!
//! An operator talks to a running search with single-character commands.
//! Each command expands to an explicit sequence of [`Action`]s, so shared
//! behaviour (a summary also prints status, an exit also checkpoints) is
//! composed rather than reached by falling through from one command into the
//! next.

mod sources;

pub use sources::{
    Autosave, ChannelControl, ControlHandle, ControlSource, KeyboardControl, SignalControl,
};

/// A request from the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// `T`: elapsed time and current position.
    Status,
    /// `S`: list of perfect numbers, then status.
    Summary,
    /// `C`: save a checkpoint and keep searching.
    Checkpoint,
    /// `X`: save a checkpoint and stop.
    Exit,
    /// `Q`: stop without saving.
    Quit,
    /// Any other key: show the menu.
    Help,
}

/// One step of handling a [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ReportElapsed,
    ReportStatus,
    ListRecords,
    SaveCheckpoint,
    ShowMenu,
    /// Stop the search. `saved` is true when the preceding save must have
    /// succeeded for the stop to go ahead.
    Terminate { saved: bool },
}

impl Command {
    /// Map a key press to a command; matching ignores case.
    pub fn from_key(key: char) -> Self {
        match key.to_ascii_uppercase() {
            'T' => Command::Status,
            'S' => Command::Summary,
            'C' => Command::Checkpoint,
            'X' => Command::Exit,
            'Q' => Command::Quit,
            _ => Command::Help,
        }
    }

    /// Actions to perform, in order.
    pub fn actions(self) -> &'static [Action] {
        match self {
            Command::Status => &[Action::ReportStatus],
            Command::Summary => &[Action::ListRecords, Action::ReportStatus],
            Command::Checkpoint => &[Action::SaveCheckpoint],
            Command::Exit => &[Action::SaveCheckpoint, Action::Terminate { saved: true }],
            Command::Quit => &[Action::ReportElapsed, Action::Terminate { saved: false }],
            Command::Help => &[Action::ShowMenu],
        }
    }
}

/// Menu text shown for unrecognised keys.
pub const MENU: &str = "\
Perfect Numbers Menu:
    T - Display elapsed Time/computation status only
    S - Display status and Summary
    C - Save context and Continue
    X - Save context and eXit
    Q - Quit without saving context";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_key_is_case_insensitive() {
        assert_eq!(Command::from_key('t'), Command::Status);
        assert_eq!(Command::from_key('S'), Command::Summary);
        assert_eq!(Command::from_key('c'), Command::Checkpoint);
        assert_eq!(Command::from_key('x'), Command::Exit);
        assert_eq!(Command::from_key('Q'), Command::Quit);
    }

    #[test]
    fn test_unknown_keys_show_help() {
        assert_eq!(Command::from_key('f'), Command::Help);
        assert_eq!(Command::from_key('?'), Command::Help);
        assert_eq!(Command::Help.actions(), &[Action::ShowMenu]);
    }

    #[test]
    fn test_summary_composes_list_and_status() {
        assert_eq!(
            Command::Summary.actions(),
            &[Action::ListRecords, Action::ReportStatus]
        );
    }

    #[test]
    fn test_exit_saves_before_terminating() {
        assert_eq!(
            Command::Exit.actions(),
            &[Action::SaveCheckpoint, Action::Terminate { saved: true }]
        );
        assert_eq!(
            Command::Quit.actions().last(),
            Some(&Action::Terminate { saved: false })
        );
    }

    #[test]
    fn test_menu_lists_every_command_key() {
        for key in ['T', 'S', 'C', 'X', 'Q'] {
            assert!(MENU.contains(&format!("    {key} - ")), "missing {key}");
        }
    }
}
