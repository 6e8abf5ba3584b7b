use std::{sync::Arc, time::Duration};
use tokio::{
    sync::mpsc::{self, error::SendError},
    time::{Instant, MissedTickBehavior},
};
use uuid::Uuid;

use crate::{
    audio::{ChannelAudio, MusicState, SoundEvent},
    config::GameConfig,
    dictionary::Dictionary,
    error::CommandError,
    game::GameSession,
    models::{Direction, SessionEvent, SessionSnapshot},
    storage::{record_final_score, HighScoreStore},
    websocket::messages::{ClientMessage, ServerMessage},
};

/// What woke the actor up
enum Wake {
    Command(ClientMessage),
    Sound(SoundEvent),
    Frame,
    Stop,
}

/// Sole owner of one connection's `GameSession`. Commands, sound cues, and
/// frame ticks are handled one at a time, so session state never sees two
/// mutations at once.
pub struct SessionActor {
    id: Uuid,
    session: GameSession,
    audio: Arc<ChannelAudio>,
    outbound: mpsc::Sender<ServerMessage>,
    high_scores: Arc<dyn HighScoreStore>,
    frame: Duration,
    last_snapshot: Option<SessionSnapshot>,
    last_music: Option<MusicState>,
}

impl SessionActor {
    /// Build an actor and the receiving end of its sound cues
    pub fn new(
        id: Uuid,
        config: &GameConfig,
        dictionary: Arc<Dictionary>,
        high_scores: Arc<dyn HighScoreStore>,
        outbound: mpsc::Sender<ServerMessage>,
    ) -> (Self, mpsc::Receiver<SoundEvent>) {
        let (sound_tx, sound_rx) = mpsc::channel(32);
        let audio = Arc::new(ChannelAudio::new(sound_tx));
        let session = GameSession::new(config.rows, config.cols, dictionary, audio.clone());

        let actor = Self {
            id,
            session,
            audio,
            outbound,
            high_scores,
            frame: Duration::from_millis(config.frame_interval_ms),
            last_snapshot: None,
            last_music: None,
        };
        (actor, sound_rx)
    }

    /// Run until the command channel closes or the client stops listening
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<ClientMessage>,
        mut sounds: mpsc::Receiver<SoundEvent>,
    ) {
        let mut frames = tokio::time::interval(self.frame);
        frames.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_frame = Instant::now();

        tracing::debug!("Session {} started", self.id);

        loop {
            let wake = tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => Wake::Command(command),
                    None => Wake::Stop,
                },
                Some(event) = sounds.recv() => Wake::Sound(event),
                _ = frames.tick() => Wake::Frame,
            };

            let sent = match wake {
                Wake::Command(command) => match self.handle_client_message(command) {
                    Ok(()) => Ok(()),
                    Err(e) => {
                        tracing::warn!("Session {} rejected command: {}", self.id, e);
                        self.outbound
                            .send(ServerMessage::Error {
                                message: e.to_string(),
                            })
                            .await
                    }
                },
                Wake::Sound(event) => self.outbound.send(ServerMessage::Sound { event }).await,
                Wake::Frame => {
                    let now = Instant::now();
                    self.session.advance(now - last_frame);
                    last_frame = now;
                    Ok(())
                }
                Wake::Stop => break,
            };

            if sent.is_err() || self.flush().await.is_err() {
                break;
            }
        }

        tracing::debug!("Session {} stopped", self.id);
    }

    /// Check a command against the board and apply it
    fn handle_client_message(&mut self, msg: ClientMessage) -> Result<(), CommandError> {
        match msg {
            ClientMessage::MovePiece { direction } => {
                let direction = Direction::from_delta(direction)
                    .ok_or(CommandError::InvalidDirection(direction))?;
                self.session.move_active_piece(direction);
            }
            ClientMessage::HardDrop => self.session.hard_drop_active_piece(),
            ClientMessage::ActivateCell { x, y } => {
                let grid = self.session.grid();
                if !grid.in_bounds(x, y) {
                    return Err(CommandError::CellOutOfBounds {
                        x,
                        y,
                        cols: grid.cols(),
                        rows: grid.rows(),
                    });
                }
                self.session.activate_cell(x, y);
            }
            ClientMessage::SetPaused { paused } => self.session.set_paused(paused),
            ClientMessage::Reset => self.session.reset(),
            ClientMessage::SetMuted { muted } => self.audio.set_muted(muted),
        }
        Ok(())
    }

    /// Forward session events, then the music state and snapshot if they changed
    async fn flush(&mut self) -> Result<(), SendError<ServerMessage>> {
        for event in self.session.drain_events() {
            let message = match event {
                SessionEvent::Notification(notification) => {
                    ServerMessage::Notification { notification }
                }
                SessionEvent::LevelUp { level } => ServerMessage::LevelUp { level },
                SessionEvent::GameOver { score } => {
                    let outcome = record_final_score(self.high_scores.as_ref(), score).await;
                    ServerMessage::GameOver {
                        score,
                        high_score: outcome.high_score,
                        is_new_high_score: outcome.is_new_high_score,
                    }
                }
            };
            self.outbound.send(message).await?;
        }

        let music = MusicState::for_session(
            self.audio.is_muted(),
            self.session.is_paused(),
            self.session.is_game_over(),
        );
        if self.last_music != Some(music) {
            self.outbound.send(ServerMessage::Music { state: music }).await?;
            self.last_music = Some(music);
        }

        let snapshot = self.session.snapshot();
        if self.last_snapshot.as_ref() != Some(&snapshot) {
            self.outbound
                .send(ServerMessage::State {
                    snapshot: snapshot.clone(),
                })
                .await?;
            self.last_snapshot = Some(snapshot);
        }
        Ok(())
    }
}
