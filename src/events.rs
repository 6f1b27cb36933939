//! Event channel messages.
//!
//! Only note messages reach the overlay; keyboard and mode messages are
//! decoded so a shared channel can be consumed without errors, then ignored.

use serde::{Deserialize, Serialize};

/// A normalized note event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteEvent {
    On(u8),
    Off(u8),
}

/// Input mode reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    Midi,
    Keyboard,
}

/// A message as it arrives on the event channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChannelMessage {
    NoteOn {
        note: u8,
        #[serde(default = "full_velocity")]
        velocity: u8,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source: Option<String>,
    },
    NoteOff {
        note: u8,
        #[serde(default)]
        velocity: u8,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source: Option<String>,
    },
    KeyDown { key: String },
    KeyUp { key: String },
    KeyPress { key: String },
    ModeSwitch { input: InputMode },
}

/// Highest note number a channel message may carry.
pub const MIDI_NOTE_MAX: u8 = 127;

fn full_velocity() -> u8 {
    127
}

impl ChannelMessage {
    /// Decode one JSON message. Note numbers must be 0..=127.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let message: Self =
            serde_json::from_str(json).map_err(|e| format!("Invalid channel message: {e}"))?;
        match message {
            ChannelMessage::NoteOn { note, .. } | ChannelMessage::NoteOff { note, .. }
                if note > MIDI_NOTE_MAX =>
            {
                Err(format!("Invalid channel message: note {note} out of range 0..=127"))
            }
            _ => Ok(message),
        }
    }

    /// The note event carried by this message, if any. A `note_on` with
    /// velocity 0 is a note off.
    pub fn note_event(&self) -> Option<NoteEvent> {
        match *self {
            ChannelMessage::NoteOn { note, velocity: 0, .. } => Some(NoteEvent::Off(note)),
            ChannelMessage::NoteOn { note, .. } => Some(NoteEvent::On(note)),
            ChannelMessage::NoteOff { note, .. } => Some(NoteEvent::Off(note)),
            _ => None,
        }
    }
}
