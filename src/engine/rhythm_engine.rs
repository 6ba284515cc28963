use tracing::{debug, info, trace};

use crate::chart::{Lane, NoteId, NoteSpec, Schedule};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::judge::{JudgmentCategory, JudgmentPolicy, JudgmentResult};
use crate::score::{ComboTracker, GameSession, SessionSummary};
use crate::traits::Clock;

use super::{ActiveNote, EngineState, LastJudgment, StateSnapshot};

/// What a single press resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Judged(JudgmentResult),
    /// No unresolved note in range on that lane. Nothing changed.
    Ghost,
}

impl InputOutcome {
    pub fn judgment(&self) -> Option<&JudgmentResult> {
        match self {
            Self::Judged(result) => Some(result),
            Self::Ghost => None,
        }
    }
}

/// Drives one play session against caller-supplied gameplay time.
///
/// The engine never reads a clock after `start_game`: every `update` and
/// `handle_input` call carries the gameplay time, which must already exclude
/// paused spans (see [`crate::traits::PausableClock`]). All methods take
/// `&mut self` and complete synchronously.
pub struct RhythmEngine {
    config: EngineConfig,
    policy: JudgmentPolicy,
    state: EngineState,
    schedule: Option<Schedule>,
    combo: ComboTracker,
    session: GameSession,
    newly_hittable: Vec<NoteId>,
    summary: Option<SessionSummary>,
}

impl RhythmEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: EngineConfig) -> Self {
        Self {
            policy: JudgmentPolicy::new(config.timing, config.scores),
            combo: ComboTracker::new(config.combo_tiers.clone()),
            config,
            state: EngineState::Idle,
            schedule: None,
            session: GameSession::new(),
            newly_hittable: Vec::new(),
            summary: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn score(&self) -> u64 {
        self.session.cumulative_score
    }

    pub fn combo(&self) -> u32 {
        self.session.current_combo
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn schedule(&self) -> Option<&Schedule> {
        self.schedule.as_ref()
    }

    pub fn last_judgment(&self) -> Option<&JudgmentResult> {
        self.session.last_judgment()
    }

    /// Notes that entered their lead window during the latest `update`.
    pub fn newly_hittable(&self) -> &[NoteId] {
        &self.newly_hittable
    }

    /// Final result, available once the session has ended.
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    pub fn start_game<C: Clock + ?Sized>(&mut self, notes: &[NoteSpec], clock: &C) -> Result<()> {
        self.require("start_game", &[EngineState::Idle])?;

        let start_ms = clock.now_ms().map_err(EngineError::ClockUnavailable)?;
        let schedule = Schedule::new(notes)?
            .with_windows(self.config.lead_ms, self.config.timing.miss_ms)
            .with_visible_trail(self.config.visible_trail_ms);

        info!(
            "session started with {} notes (clock at {start_ms}ms)",
            schedule.len()
        );

        self.schedule = Some(schedule);
        self.session = GameSession::new();
        self.combo.reset();
        self.newly_hittable.clear();
        self.summary = None;
        self.state = EngineState::Running;
        Ok(())
    }

    /// Expire overdue notes and refresh lead-window promotions.
    ///
    /// Returns the auto-miss judgments produced by this tick. While paused
    /// this is a no-op.
    pub fn update(&mut self, current_time_ms: i64) -> Result<Vec<JudgmentResult>> {
        match self.state {
            EngineState::Paused => return Ok(Vec::new()),
            EngineState::Running => {}
            state => return Err(invalid_state("update", state)),
        }

        let Some(schedule) = self.schedule.as_mut() else {
            return Err(invalid_state("update", self.state));
        };
        let outcome = schedule.advance(current_time_ms);

        self.newly_hittable = outcome.newly_hittable;
        let misses: Vec<JudgmentResult> = outcome
            .expired
            .into_iter()
            .map(|note_id| self.record_resolution(note_id, JudgmentCategory::Miss, None))
            .collect();

        if !misses.is_empty() {
            debug!("{} note(s) expired at {current_time_ms}ms", misses.len());
        }
        Ok(misses)
    }

    /// Judge a press on `lane` at gameplay time `input_time_ms`.
    pub fn handle_input(&mut self, lane: Lane, input_time_ms: i64) -> Result<InputOutcome> {
        self.require("handle_input", &[EngineState::Running])?;

        let Some(schedule) = self.schedule.as_mut() else {
            return Err(invalid_state("handle_input", self.state));
        };
        let Some(note_id) =
            schedule.find_best_match(lane, input_time_ms, self.policy.windows().miss_ms)
        else {
            trace!("ghost input on lane {lane} at {input_time_ms}ms");
            return Ok(InputOutcome::Ghost);
        };

        let delta = match schedule.get(note_id) {
            Some(note) => note.timing_delta(input_time_ms),
            None => return Ok(InputOutcome::Ghost),
        };
        let category = self.policy.classify(Some(delta));
        if !schedule.resolve(note_id, category) {
            return Ok(InputOutcome::Ghost);
        }

        let result = self.record_resolution(note_id, category, Some(delta));
        trace!(
            "note {} judged {} ({delta:+}ms) for {}",
            note_id.0,
            category.label(),
            result.score_awarded
        );
        Ok(InputOutcome::Judged(result))
    }

    /// Enter the paused state. `wall_time_ms` is the caller's wall-clock reading.
    pub fn pause(&mut self, wall_time_ms: i64) -> Result<()> {
        self.require("pause", &[EngineState::Running])?;
        self.session.begin_pause(wall_time_ms);
        self.state = EngineState::Paused;
        debug!("paused at wall {wall_time_ms}ms");
        Ok(())
    }

    /// Leave the paused state. Returns the length of the pause just closed.
    pub fn resume(&mut self, wall_time_ms: i64) -> Result<i64> {
        self.require("resume", &[EngineState::Paused])?;
        let paused_for = self.session.end_pause(wall_time_ms);
        self.state = EngineState::Running;
        debug!("resumed after {paused_for}ms");
        Ok(paused_for)
    }

    /// Finish the session. Further calls fail with `InvalidState`.
    pub fn end_game(&mut self) -> Result<SessionSummary> {
        self.require_active("end_game")?;

        let total_notes = self.schedule.take().map_or(0, |s| s.len());
        let summary = self.session.finalize(total_notes);
        self.newly_hittable.clear();
        self.summary = Some(summary.clone());
        self.state = EngineState::Ended;

        info!(
            "session ended: score {} max combo {} accuracy {:.2}%",
            summary.final_score, summary.max_combo, summary.accuracy_percent
        );
        Ok(summary)
    }

    pub fn get_state_snapshot(&self) -> Result<StateSnapshot> {
        self.require_active("get_state_snapshot")?;

        let active_notes = self
            .schedule
            .iter()
            .flat_map(|s| s.active_notes())
            .map(ActiveNote::from)
            .collect();

        Ok(StateSnapshot {
            active_notes,
            score: self.session.cumulative_score,
            combo: self.session.current_combo,
            multiplier: self.combo.multiplier(),
            last_judgment: self.session.last_judgment().map(LastJudgment::from),
            accuracy_percent: self.session.accuracy(),
            paused: self.state == EngineState::Paused,
        })
    }

    fn record_resolution(
        &mut self,
        note_id: NoteId,
        category: JudgmentCategory,
        timing_delta_ms: Option<i64>,
    ) -> JudgmentResult {
        // Multiplier is looked up after the combo transition.
        let combo_after = self.combo.record(category);
        let score_awarded = self
            .combo
            .apply_multiplier(self.policy.base_score(category));

        let result = JudgmentResult {
            note_id,
            category,
            timing_delta_ms,
            score_awarded,
            combo_after,
        };
        self.session.record(result);
        result
    }

    fn require(&self, operation: &'static str, allowed: &[EngineState]) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(invalid_state(operation, self.state))
        }
    }

    fn require_active(&self, operation: &'static str) -> Result<()> {
        if self.state.is_active() {
            Ok(())
        } else {
            Err(invalid_state(operation, self.state))
        }
    }
}

impl Default for RhythmEngine {
    fn default() -> Self {
        Self::with_valid_config(EngineConfig::default())
    }
}

fn invalid_state(operation: &'static str, state: EngineState) -> EngineError {
    EngineError::InvalidState { operation, state }
}
