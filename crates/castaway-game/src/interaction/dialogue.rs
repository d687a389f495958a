//! Dialogue line sequencer
//!
//! Presents one line at a time to the presentation boundary. No timer runs
//! here: the boundary calls `advance` when the player continues, and all
//! pacing (typewriter effects, skip) is owned outside the core.

use crate::level::DialogueDef;

/// What the sequencer tells its caller. `Line` carries everything the
/// presentation boundary needs to show it; `Ended` tells the caller to hide
/// the box and resolve any pending hotspot effects.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogueEvent {
    Started,
    Line {
        speaker: String,
        text: String,
        audio: Option<String>,
    },
    Ended,
}

/// Idle ⇄ Presenting dialogue state machine
#[derive(Debug, Clone, Default)]
pub struct DialogueSystem {
    lines: Vec<crate::level::DialogueLine>,
    current_line: usize,
    active: bool,
}

impl DialogueSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin presenting a dialogue from its first line. An empty dialogue
    /// starts and ends in the same call.
    pub fn start(&mut self, dialogue: &DialogueDef) -> Vec<DialogueEvent> {
        self.lines = dialogue.lines.clone();
        self.current_line = 0;
        self.active = true;

        let mut events = vec![DialogueEvent::Started];
        events.extend(self.present());
        events
    }

    /// Advance past the current line; called by the presentation boundary
    /// when the player continues. No-op while idle.
    pub fn advance(&mut self) -> Vec<DialogueEvent> {
        if !self.active {
            return Vec::new();
        }
        self.current_line += 1;
        self.present()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    fn present(&mut self) -> Vec<DialogueEvent> {
        if self.current_line >= self.lines.len() {
            self.active = false;
            self.lines.clear();
            return vec![DialogueEvent::Ended];
        }

        let line = &self.lines[self.current_line];
        vec![DialogueEvent::Line {
            speaker: line.speaker.clone(),
            text: line.text.clone(),
            audio: line.audio.clone(),
        }]
    }
}

#[cfg(test)]
mod tests {
    use crate::level::DialogueLine;

    use super::*;

    fn line(speaker: &str, text: &str) -> DialogueLine {
        DialogueLine {
            speaker: speaker.into(),
            text: text.into(),
            audio: None,
            duration: 0.0,
        }
    }

    fn two_lines() -> DialogueDef {
        DialogueDef {
            lines: vec![line("Pirate", "A"), line("Pirate", "B")],
        }
    }

    #[test]
    fn test_started_lines_ended_in_order() {
        let mut dialogue = DialogueSystem::new();

        let events = dialogue.start(&two_lines());
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], DialogueEvent::Started);
        assert!(matches!(&events[1], DialogueEvent::Line { text, .. } if text == "A"));
        assert!(dialogue.is_active());

        let events = dialogue.advance();
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], DialogueEvent::Line { text, .. } if text == "B"));

        let events = dialogue.advance();
        assert_eq!(events, vec![DialogueEvent::Ended]);
        assert!(!dialogue.is_active());
    }

    #[test]
    fn test_advance_while_idle_is_noop() {
        let mut dialogue = DialogueSystem::new();
        assert!(dialogue.advance().is_empty());
    }

    #[test]
    fn test_empty_dialogue_ends_immediately() {
        let mut dialogue = DialogueSystem::new();
        let events = dialogue.start(&DialogueDef { lines: Vec::new() });
        assert_eq!(events, vec![DialogueEvent::Started, DialogueEvent::Ended]);
        assert!(!dialogue.is_active());
    }

    #[test]
    fn test_restart_replaces_session() {
        let mut dialogue = DialogueSystem::new();
        dialogue.start(&two_lines());
        dialogue.advance();

        let events = dialogue.start(&DialogueDef { lines: vec![line("Ghost", "Boo")] });
        assert!(matches!(&events[1], DialogueEvent::Line { text, .. } if text == "Boo"));
    }
}
