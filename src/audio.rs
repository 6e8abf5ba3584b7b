use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;

/// Sound cues the game asks its host to play
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SoundEvent {
    Drop,
    Land,
    ClearWord,
    InvalidWord,
    LevelUp,
    GameOver,
    Button,
}

/// What the client's background music should be doing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MusicState {
    Playing,
    /// Resumes from the same spot
    Paused,
    /// Rewinds; the next play starts from the top
    Stopped,
}

impl MusicState {
    /// Music only plays in a live, unpaused game with sound on
    pub fn for_session(muted: bool, paused: bool, game_over: bool) -> Self {
        if game_over {
            MusicState::Stopped
        } else if muted || paused {
            MusicState::Paused
        } else {
            MusicState::Playing
        }
    }
}

/// Fire-and-forget sound output. Implementations must never block and must
/// swallow their own failures.
pub trait AudioNotifier: Send + Sync {
    fn play(&self, event: SoundEvent);
}

/// Forwards cues to a connected client. Starts muted.
#[derive(Debug)]
pub struct ChannelAudio {
    tx: mpsc::Sender<SoundEvent>,
    muted: AtomicBool,
}

impl ChannelAudio {
    pub fn new(tx: mpsc::Sender<SoundEvent>) -> Self {
        Self {
            tx,
            muted: AtomicBool::new(true),
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Relaxed)
    }

    /// Unmuting confirms with a button click
    pub fn set_muted(&self, muted: bool) {
        let was_muted = self.muted.swap(muted, Ordering::Relaxed);
        if was_muted && !muted {
            self.play(SoundEvent::Button);
        }
    }
}

impl AudioNotifier for ChannelAudio {
    fn play(&self, event: SoundEvent) {
        if self.is_muted() {
            return;
        }
        if let Err(e) = self.tx.try_send(event) {
            tracing::debug!("Dropped sound cue {:?}: {}", event, e);
        }
    }
}

/// Records every cue, for assertions
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingAudio {
    events: std::sync::Mutex<Vec<SoundEvent>>,
}

#[cfg(test)]
impl RecordingAudio {
    pub fn events(&self) -> Vec<SoundEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl AudioNotifier for RecordingAudio {
    fn play(&self, event: SoundEvent) {
        self.events.lock().unwrap().push(event);
    }
}
