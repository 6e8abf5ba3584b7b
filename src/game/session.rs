use rand::{rngs::StdRng, Rng};
use std::{sync::Arc, time::Duration};

use crate::{
    audio::{AudioNotifier, SoundEvent},
    dictionary::Dictionary,
    game::{
        clock::{SessionClock, Timer},
        piece::{PieceController, StepOutcome},
        selection::{Activation, SelectionPath},
        validator::{WordValidator, MIN_WORD_LENGTH},
        Grid, LetterGenerator, Scorer,
    },
    models::{Direction, Notification, Position, SessionEvent, SessionSnapshot},
};

/// Applied to every word score before it reaches the running total
pub const SCORE_MULTIPLIER: f64 = 1.5;
/// Points needed per level
pub const POINTS_PER_LEVEL: f64 = 75.0;
/// Pause between a landing and the next spawn
pub const SETTLE_DELAY: Duration = Duration::from_millis(400);
/// How long a notification stays visible
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(2);

const BASE_TICK_MS: u64 = 1200;
const TICK_STEP_MS: u64 = 40;
const MIN_TICK_MS: u64 = 300;

/// Fall period for a level: 1200ms minus 40ms per level, never under 300ms
pub fn tick_interval(level: u32) -> Duration {
    let ms = BASE_TICK_MS
        .saturating_sub(u64::from(level) * TICK_STEP_MS)
        .max(MIN_TICK_MS);
    Duration::from_millis(ms)
}

pub fn level_for_score(score: f64) -> u32 {
    (score / POINTS_PER_LEVEL).floor() as u32 + 1
}

#[derive(Debug, Clone)]
struct LiveNotification {
    notification: Notification,
    expires_at: Duration,
}

/// One player's game: grid, falling letter, selection, and score.
///
/// Everything is synchronous. The host feeds in commands and elapsed time and
/// drains `SessionEvent`s afterwards.
pub struct GameSession<R = StdRng> {
    grid: Grid,
    score: f64,
    level: u32,
    next_letter: char,
    piece: PieceController,
    selection: SelectionPath,
    paused: bool,
    game_over: bool,
    generator: LetterGenerator<R>,
    validator: WordValidator,
    audio: Arc<dyn AudioNotifier>,
    /// Always runs; drives notification expiry
    clock: SessionClock,
    /// Runs only while playing; drives ticks and the settle delay
    play_clock: SessionClock,
    next_tick_at: Duration,
    settle: Timer,
    notifications: Vec<LiveNotification>,
    events: Vec<SessionEvent>,
}

impl GameSession<StdRng> {
    pub fn new(
        rows: usize,
        cols: usize,
        dictionary: Arc<Dictionary>,
        audio: Arc<dyn AudioNotifier>,
    ) -> Self {
        Self::with_generator(rows, cols, dictionary, audio, LetterGenerator::from_entropy())
    }
}

impl<R: Rng> GameSession<R> {
    pub fn with_generator(
        rows: usize,
        cols: usize,
        dictionary: Arc<Dictionary>,
        audio: Arc<dyn AudioNotifier>,
        mut generator: LetterGenerator<R>,
    ) -> Self {
        let next_letter = generator.next(1);
        Self {
            grid: Grid::new(rows, cols),
            score: 0.0,
            level: 1,
            next_letter,
            piece: PieceController::new(),
            selection: SelectionPath::new(),
            paused: false,
            game_over: false,
            generator,
            validator: WordValidator::new(dictionary),
            audio,
            clock: SessionClock::new(),
            play_clock: SessionClock::new(),
            next_tick_at: tick_interval(1),
            settle: Timer::new(),
            notifications: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[cfg(test)]
    pub fn score(&self) -> f64 {
        self.score
    }

    #[cfg(test)]
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    #[cfg(test)]
    pub fn selection(&self) -> &[Position] {
        self.selection.cells()
    }

    pub fn tick_interval(&self) -> Duration {
        tick_interval(self.level)
    }

    /// Move time forward by `dt`, firing whatever falls due in order: the
    /// settle delay's spawn and fall ticks at the current level's period.
    /// Notifications expire even while paused.
    pub fn advance(&mut self, dt: Duration) {
        self.clock.advance(dt);
        self.expire_notifications();

        if self.paused || self.game_over {
            return;
        }

        let target = self.play_clock.now().saturating_add(dt);
        while !self.game_over {
            let settle_due = self.settle.deadline().filter(|at| *at <= target);
            let tick_due = Some(self.next_tick_at).filter(|at| *at <= target);

            match (settle_due, tick_due) {
                (Some(settle_at), Some(tick_at)) if settle_at <= tick_at => {
                    self.fire_settle(settle_at)
                }
                (Some(settle_at), None) => self.fire_settle(settle_at),
                (_, Some(tick_at)) => {
                    self.play_clock.advance_to(tick_at);
                    self.next_tick_at = tick_at + self.tick_interval();
                    self.tick();
                }
                (None, None) => break,
            }
        }
        self.play_clock.advance_to(target);
    }

    fn fire_settle(&mut self, at: Duration) {
        self.play_clock.advance_to(at);
        if self.settle.fire_if_due(at) {
            self.spawn_piece();
        }
    }

    /// Advance the falling letter one step. A session with nothing falling
    /// and no pending settle spawns the next letter instead.
    pub fn tick(&mut self) {
        if self.paused || self.game_over {
            return;
        }

        match self.piece.step(&self.grid) {
            StepOutcome::Idle => {
                if !self.settle.is_armed() {
                    self.spawn_piece();
                }
            }
            StepOutcome::Fell => {}
            StepOutcome::Landed { top_out: true, .. } => self.end_game(),
            StepOutcome::Landed { piece, .. } => {
                self.grid.place(piece.x, piece.y, piece.letter);
                tracing::debug!("Landed {} at ({}, {})", piece.letter, piece.x, piece.y);
                self.audio.play(SoundEvent::Land);
                self.settle.arm(self.play_clock.now(), SETTLE_DELAY);
            }
        }
    }

    fn spawn_piece(&mut self) {
        let piece = self.piece.spawn(self.next_letter, &self.grid);
        self.next_letter = self.generator.next(self.level);
        tracing::debug!(
            "Spawned {} at column {}, next is {}",
            piece.letter,
            piece.x,
            self.next_letter
        );
        self.audio.play(SoundEvent::Drop);
    }

    fn end_game(&mut self) {
        debug_assert!(!self.game_over, "game over latched twice");
        self.game_over = true;
        self.piece.clear();
        self.settle.cancel();
        self.selection.clear();
        tracing::info!("Game over with score {}", self.score);
        self.audio.play(SoundEvent::GameOver);
        self.events.push(SessionEvent::GameOver { score: self.score });
    }

    pub fn move_active_piece(&mut self, direction: Direction) {
        if self.paused || self.game_over {
            return;
        }
        self.piece.shift(direction, &self.grid);
    }

    pub fn hard_drop_active_piece(&mut self) {
        if self.paused || self.game_over {
            return;
        }
        self.piece.hard_drop(&self.grid);
    }

    /// Ignored once the game is over
    pub fn set_paused(&mut self, paused: bool) {
        if self.game_over {
            return;
        }
        self.paused = paused;
    }

    /// Feed one cell activation to the selection; re-activating the last cell
    /// submits the path.
    pub fn activate_cell(&mut self, x: usize, y: usize) {
        if self.game_over {
            return;
        }

        if let Activation::Submit(path) = self.selection.activate(Position::new(x, y), &self.grid)
        {
            self.submit_word(&path);
        }
    }

    /// Resolve a selection path. Paths shorter than three letters, or any
    /// submission while paused, are dropped without a word.
    pub fn submit_word(&mut self, path: &[Position]) {
        self.selection.clear();

        if path.len() < MIN_WORD_LENGTH || self.paused || self.game_over {
            return;
        }

        let word = if self.validator.is_valid_path(&self.grid, path) {
            self.validator
                .extract_word(&self.grid, path)
                .filter(|word| self.validator.is_valid_word(word))
        } else {
            None
        };

        match word {
            Some(word) => self.clear_word(&word, path),
            None => {
                let spelled = self.validator.spell(&self.grid, path);
                tracing::debug!("Rejected word {:?}", spelled);
                self.audio.play(SoundEvent::InvalidWord);
                self.notify(Notification::word_invalid(&spelled));
            }
        }
    }

    fn clear_word(&mut self, word: &str, path: &[Position]) {
        let points = f64::from(Scorer::score(word)) * SCORE_MULTIPLIER;
        self.score += points;
        self.grid.remove_set(path);
        tracing::debug!("Cleared {:?} for {} points", word, points);

        self.audio.play(SoundEvent::ClearWord);
        self.notify(Notification::word_cleared(word, points));

        let level = level_for_score(self.score);
        if level > self.level {
            self.level = level;
            tracing::info!("Reached level {}", level);
            self.audio.play(SoundEvent::LevelUp);
            self.events.push(SessionEvent::LevelUp { level });
        }
    }

    fn notify(&mut self, notification: Notification) {
        self.events
            .push(SessionEvent::Notification(notification.clone()));
        self.notifications.push(LiveNotification {
            notification,
            expires_at: self.clock.now() + NOTIFICATION_TTL,
        });
    }

    fn expire_notifications(&mut self) {
        let now = self.clock.now();
        self.notifications.retain(|live| live.expires_at > now);
    }

    /// Start over on an empty board. Pending spawns and notifications from
    /// the previous game are cancelled.
    pub fn reset(&mut self) {
        self.grid.clear();
        self.score = 0.0;
        self.level = 1;
        self.next_letter = self.generator.next(1);
        self.piece.clear();
        self.selection.clear();
        self.paused = false;
        self.game_over = false;
        self.settle.cancel();
        self.notifications.clear();
        self.events.clear();
        self.next_tick_at = self.play_clock.now() + tick_interval(1);
        tracing::info!("Session reset");
    }

    /// Everything that happened since the last drain
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            rows: self.grid.rows(),
            cols: self.grid.cols(),
            grid: self.grid.to_rows(),
            score: self.score,
            level: self.level,
            next_letter: self.next_letter,
            active_piece: self.piece.active(),
            selection: self.selection.cells().to_vec(),
            paused: self.paused,
            game_over: self.game_over,
            notifications: self
                .notifications
                .iter()
                .map(|live| live.notification.clone())
                .collect(),
            tick_interval_ms: self.tick_interval().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{audio::RecordingAudio, models::game::NotificationKind};

    const WORDS: [&str; 6] = ["cab", "quiz", "cat", "tea", "eat", "rain"];

    fn session_with_audio(rows: usize, cols: usize) -> (GameSession, Arc<RecordingAudio>) {
        let audio = Arc::new(RecordingAudio::default());
        let session = GameSession::with_generator(
            rows,
            cols,
            Arc::new(Dictionary::from_words(WORDS)),
            audio.clone(),
            LetterGenerator::seeded(99),
        );
        (session, audio)
    }

    fn session(rows: usize, cols: usize) -> GameSession {
        session_with_audio(rows, cols).0
    }

    /// Session whose grid starts as the given rows
    fn session_on(rows: &[&str]) -> GameSession {
        let mut session = session(rows.len(), rows[0].len());
        session.grid = Grid::from_rows(rows);
        session
    }

    fn pos(x: usize, y: usize) -> Position {
        Position::new(x, y)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_tick_interval_by_level() {
        assert_eq!(tick_interval(1), ms(1160));
        assert_eq!(tick_interval(10), ms(800));
        assert_eq!(tick_interval(22), ms(320));
        assert_eq!(tick_interval(23), ms(300));
        assert_eq!(tick_interval(500), ms(300));
    }

    #[test]
    fn test_level_for_score() {
        assert_eq!(level_for_score(0.0), 1);
        assert_eq!(level_for_score(74.9), 1);
        assert_eq!(level_for_score(75.0), 2);
        assert_eq!(level_for_score(300.0), 5);
    }

    #[test]
    fn test_first_tick_spawns_in_middle_of_top_row() {
        let mut session = session(8, 8);
        let expected_letter = session.snapshot().next_letter;

        session.tick();

        let piece = session.snapshot().active_piece.expect("piece should spawn");
        assert_eq!((piece.x, piece.y), (4, 0));
        assert_eq!(piece.letter, expected_letter);
    }

    #[test]
    fn test_piece_falls_and_lands_then_respawns_after_settle() {
        let (mut session, audio) = session_with_audio(3, 3);
        session.tick(); // spawn at row 0
        session.tick(); // row 1
        session.tick(); // row 2
        session.tick(); // blocked by floor: lands

        assert_eq!(session.grid().occupied_count(), 1);
        assert!(session.grid().get(1, 2).is_some());
        assert!(session.snapshot().active_piece.is_none());

        // Ticks during the settle delay don't spawn
        session.tick();
        assert!(session.snapshot().active_piece.is_none());

        session.advance(SETTLE_DELAY);
        assert!(session.snapshot().active_piece.is_some());
        assert_eq!(
            audio.events(),
            vec![SoundEvent::Drop, SoundEvent::Land, SoundEvent::Drop]
        );
    }

    #[test]
    fn test_advance_drives_ticks_at_level_period() {
        let mut session = session(8, 8);

        session.advance(ms(1159));
        assert!(session.snapshot().active_piece.is_none());

        session.advance(ms(1));
        assert_eq!(session.snapshot().active_piece.map(|p| p.y), Some(0));

        session.advance(tick_interval(1) * 3);
        assert_eq!(session.snapshot().active_piece.map(|p| p.y), Some(3));
    }

    #[test]
    fn test_top_out_sets_game_over_without_touching_grid() {
        let mut session = session_on(&[
            "...", //
            ".E.", //
            ".A.",
        ]);
        let before = session.grid().clone();

        session.tick(); // spawn on row 0
        session.tick(); // blocked immediately

        assert!(session.is_game_over());
        assert_eq!(session.grid(), &before);
        assert_eq!(session.score(), 0.0);
        assert!(session.snapshot().active_piece.is_none());
        assert_eq!(
            session.drain_events(),
            vec![SessionEvent::GameOver { score: 0.0 }]
        );
    }

    #[test]
    fn test_game_over_blocks_further_mutation() {
        let mut session = session_on(&[
            "...", //
            "CAT", //
            "EAT",
        ]);
        session.tick();
        session.tick();
        assert!(session.is_game_over());
        let before = session.snapshot();

        session.tick();
        session.advance(ms(10_000));
        session.move_active_piece(Direction::Left);
        session.hard_drop_active_piece();
        session.set_paused(true);
        session.activate_cell(0, 1);
        session.submit_word(&[pos(0, 1), pos(1, 1), pos(2, 1)]);

        let after = session.snapshot();
        assert_eq!(after.grid, before.grid);
        assert_eq!(after.score, before.score);
        assert_eq!(after.active_piece, None);
        assert!(!after.paused);
        assert!(after.selection.is_empty());
    }

    #[test]
    fn test_moves_ignored_while_paused() {
        let mut session = session(8, 8);
        session.tick();
        session.set_paused(true);

        session.move_active_piece(Direction::Left);
        session.hard_drop_active_piece();
        session.tick();
        session.advance(ms(60_000));

        let piece = session.snapshot().active_piece.unwrap();
        assert_eq!((piece.x, piece.y), (4, 0));

        session.set_paused(false);
        session.move_active_piece(Direction::Left);
        assert_eq!(session.snapshot().active_piece.map(|p| p.x), Some(3));
    }

    #[test]
    fn test_hard_drop_lands_on_next_tick() {
        let mut session = session(5, 3);
        session.tick();
        session.hard_drop_active_piece();

        // Resting on the floor but not yet part of the grid
        assert_eq!(session.snapshot().active_piece.map(|p| p.y), Some(4));
        assert_eq!(session.grid().occupied_count(), 0);

        session.tick();
        assert_eq!(session.grid().occupied_count(), 1);
        assert!(session.snapshot().active_piece.is_none());
    }

    #[test]
    fn test_valid_word_scores_clears_and_compacts() {
        let (mut session, audio) = session_with_audio(3, 3);
        session.grid = Grid::from_rows(&[
            "Z..", //
            "CAB", //
            "EEE",
        ]);

        session.activate_cell(0, 1);
        session.activate_cell(1, 1);
        session.activate_cell(2, 1);
        session.activate_cell(2, 1); // submit

        // C and B are uncommon letters: (15 + 2 + 2) * 1.5
        assert_eq!(session.score(), 28.5);
        assert_eq!(
            session.grid().to_rows(),
            vec![
                vec![None, None, None],
                vec![Some('Z'), None, None],
                vec![Some('E'), Some('E'), Some('E')],
            ]
        );
        assert!(session.selection().is_empty());
        assert_eq!(audio.events(), vec![SoundEvent::ClearWord]);

        let events = session.drain_events();
        assert_eq!(events.len(), 1);
        let SessionEvent::Notification(notification) = &events[0] else {
            panic!("expected a notification, got {:?}", events[0]);
        };
        assert_eq!(notification.kind, NotificationKind::WordCleared);
        assert_eq!(notification.points, Some(28.5));
        assert_eq!(notification.text, "CAB! +29");
    }

    #[test]
    fn test_quiz_scores_forty_nine_and_a_half() {
        let mut session = session_on(&[
            "QU", //
            "ZI",
        ]);
        // q -> u -> i -> z
        session.submit_word(&[pos(0, 0), pos(1, 0), pos(1, 1), pos(0, 1)]);

        assert_eq!(session.score(), 49.5);
        assert_eq!(session.grid().occupied_count(), 0);
    }

    #[test]
    fn test_invalid_word_leaves_state_alone() {
        let (mut session, audio) = session_with_audio(2, 3);
        session.grid = Grid::from_rows(&[
            "...", //
            "TAC",
        ]);
        let before = session.grid().clone();

        session.activate_cell(0, 1);
        session.activate_cell(1, 1);
        session.activate_cell(2, 1);
        assert_eq!(session.selection().len(), 3);
        session.activate_cell(2, 1);

        assert_eq!(session.score(), 0.0);
        assert_eq!(session.grid(), &before);
        assert!(session.selection().is_empty());
        assert_eq!(audio.events(), vec![SoundEvent::InvalidWord]);
        assert_eq!(
            session.drain_events(),
            vec![SessionEvent::Notification(Notification::word_invalid("tac"))]
        );
    }

    #[test]
    fn test_short_or_empty_path_is_a_silent_noop() {
        let (mut session, audio) = session_with_audio(2, 3);
        session.grid = Grid::from_rows(&[
            "...", //
            "TEA",
        ]);
        let before = session.snapshot();

        session.submit_word(&[]);
        session.submit_word(&[pos(0, 1), pos(1, 1)]);
        session.activate_cell(0, 1);
        session.activate_cell(0, 1); // one-letter submit

        assert_eq!(session.snapshot(), before);
        assert!(session.drain_events().is_empty());
        assert!(audio.events().is_empty());
    }

    #[test]
    fn test_submit_while_paused_only_clears_path() {
        let mut session = session_on(&[
            "...", //
            "TEA",
        ]);
        session.activate_cell(0, 1);
        session.activate_cell(1, 1);
        session.activate_cell(2, 1);
        session.set_paused(true);
        session.activate_cell(2, 1);

        assert_eq!(session.score(), 0.0);
        assert_eq!(session.grid().occupied_count(), 3);
        assert!(session.selection().is_empty());
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_level_up_from_new_score() {
        let (mut session, audio) = session_with_audio(1, 4);
        session.score = 70.0;
        session.grid = Grid::from_rows(&["RAIN"]);

        session.submit_word(&[pos(0, 0), pos(1, 0), pos(2, 0), pos(3, 0)]);

        // rain: 23 * 1.5 = 34.5
        assert_eq!(session.score(), 104.5);
        assert_eq!(session.level(), 2);
        assert_eq!(session.tick_interval(), ms(1120));
        assert!(audio.events().contains(&SoundEvent::LevelUp));
        assert!(session
            .drain_events()
            .contains(&SessionEvent::LevelUp { level: 2 }));
    }

    #[test]
    fn test_notifications_expire_after_two_seconds() {
        let mut session = session_on(&[
            "...", //
            "XQZ",
        ]);
        session.submit_word(&[pos(0, 1), pos(1, 1), pos(2, 1)]);
        assert_eq!(session.snapshot().notifications.len(), 1);

        session.set_paused(true);
        session.advance(ms(1999));
        assert_eq!(session.snapshot().notifications.len(), 1);
        session.advance(ms(1));
        assert!(session.snapshot().notifications.is_empty());
    }

    #[test]
    fn test_reset_restores_fresh_state() {
        let mut session = session_on(&[
            "...", //
            "TEA", //
            "CAB",
        ]);
        session.submit_word(&[pos(0, 2), pos(1, 2), pos(2, 2)]);
        session.tick();
        session.activate_cell(0, 2);
        session.set_paused(true);

        session.reset();

        let snapshot = session.snapshot();
        assert!(snapshot.grid.iter().flatten().all(|cell| cell.is_none()));
        assert_eq!(snapshot.score, 0.0);
        assert_eq!(snapshot.level, 1);
        assert!(!snapshot.game_over);
        assert!(!snapshot.paused);
        assert!(snapshot.selection.is_empty());
        assert!(snapshot.active_piece.is_none());
        assert!(snapshot.notifications.is_empty());
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_reset_cancels_pending_spawn() {
        let mut session = session(2, 3);
        session.tick(); // spawn
        session.tick(); // row 1
        session.tick(); // land, settle armed
        assert!(session.settle.is_armed());

        session.reset();
        session.advance(SETTLE_DELAY);

        assert!(
            session.snapshot().active_piece.is_none(),
            "stale settle timer must not spawn into the new game"
        );
    }

    #[test]
    fn test_reset_after_game_over() {
        let mut session = session_on(&[
            "...", //
            "EEE",
        ]);
        session.tick();
        session.tick();
        assert!(session.is_game_over());

        session.reset();
        assert!(!session.is_game_over());
        assert_eq!(session.grid().occupied_count(), 0);

        session.tick();
        assert!(session.snapshot().active_piece.is_some());
    }
}
