//! Named command surface and keyboard shortcut resolution.
//!
//! Toolbars, shortcut handlers, and the export dialog all talk to the
//! session through [`EditorCommand`] values rather than poking components
//! directly.

/// Keyboard modifiers. `command` is ⌘ on macOS; either it or `ctrl` counts
/// as the primary modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub command: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
        command: false,
    };

    /// Primary modifier (Ctrl, or ⌘ on macOS).
    #[inline]
    pub fn primary(&self) -> bool {
        self.ctrl || self.command
    }

    /// Whether any modifier is held.
    #[inline]
    pub fn any(&self) -> bool {
        self.ctrl || self.shift || self.alt || self.command
    }
}

/// A command accepted by the editor session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorCommand {
    Play,
    Pause,
    TogglePlayback,
    /// Seek to an absolute time in seconds.
    Seek { seconds: f64 },
    /// Split the selected clip at the playhead.
    SplitAtPlayhead,
    /// Delete the selected clip.
    DeleteSelected,
    /// Clear clip selection.
    Deselect,
    Undo,
    Redo,
    StepForward { large: bool },
    StepBack { large: bool },
}

/// Resolve a key press to a command.
///
/// All shortcuts are suppressed while input focus is in a text field so
/// typing never edits the timeline — undo/redo in particular must not fire
/// from inside a rename box.
pub fn command_for_key(
    key: &str,
    mods: Modifiers,
    in_text_field: bool,
) -> Option<EditorCommand> {
    if in_text_field {
        return None;
    }
    match key {
        k if k.eq_ignore_ascii_case("z") && mods.primary() && mods.shift => {
            Some(EditorCommand::Redo)
        }
        k if k.eq_ignore_ascii_case("z") && mods.primary() => Some(EditorCommand::Undo),
        k if k.eq_ignore_ascii_case("y") && mods.primary() => Some(EditorCommand::Redo),
        k if k.eq_ignore_ascii_case("b") && mods.primary() => {
            Some(EditorCommand::SplitAtPlayhead)
        }
        " " | "Space" => Some(EditorCommand::TogglePlayback),
        "ArrowRight" => Some(EditorCommand::StepForward { large: mods.shift }),
        "ArrowLeft" => Some(EditorCommand::StepBack { large: mods.shift }),
        "Delete" | "Backspace" => Some(EditorCommand::DeleteSelected),
        "Escape" => Some(EditorCommand::Deselect),
        _ => None,
    }
}
