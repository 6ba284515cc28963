use crate::judge::{JudgmentCategory, JudgmentResult, TimingDirection};

use super::SessionSummary;

/// Running totals for one play session.
#[derive(Debug, Clone, Default)]
pub struct GameSession {
    pub cumulative_score: u64,
    pub current_combo: u32,
    pub max_combo: u32,
    pub perfect_count: u32,
    pub good_count: u32,
    pub miss_count: u32,
    pub early_count: u32,
    pub late_count: u32,
    pub paused: bool,
    pub pause_accumulated_ms: i64,
    pause_started_at_ms: Option<i64>,
    last_judgment: Option<JudgmentResult>,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: JudgmentResult) {
        match result.category {
            JudgmentCategory::Perfect => self.perfect_count += 1,
            JudgmentCategory::Good => self.good_count += 1,
            JudgmentCategory::Miss => self.miss_count += 1,
        }

        if let Some(delta) = result.timing_delta_ms {
            match TimingDirection::from_delta(delta) {
                TimingDirection::Early => self.early_count += 1,
                TimingDirection::Late => self.late_count += 1,
                TimingDirection::Exact => {}
            }
        }

        self.cumulative_score += result.score_awarded;
        self.current_combo = result.combo_after;
        self.max_combo = self.max_combo.max(result.combo_after);
        self.last_judgment = Some(result);
    }

    pub fn last_judgment(&self) -> Option<&JudgmentResult> {
        self.last_judgment.as_ref()
    }

    pub fn resolved_count(&self) -> u32 {
        self.perfect_count + self.good_count + self.miss_count
    }

    /// Share of resolved notes hit as Perfect or Good. 100% before any resolution.
    pub fn accuracy(&self) -> f64 {
        let resolved = self.resolved_count();
        if resolved == 0 {
            return 100.0;
        }
        (self.perfect_count + self.good_count) as f64 / resolved as f64 * 100.0
    }

    pub fn begin_pause(&mut self, wall_time_ms: i64) {
        self.paused = true;
        self.pause_started_at_ms = Some(wall_time_ms);
    }

    /// Closes the open pause span. Readings that go backwards count as zero.
    pub fn end_pause(&mut self, wall_time_ms: i64) -> i64 {
        self.paused = false;
        let elapsed = self
            .pause_started_at_ms
            .take()
            .map_or(0, |start| (wall_time_ms - start).max(0));
        self.pause_accumulated_ms += elapsed;
        elapsed
    }

    pub fn finalize(&self, total_notes: usize) -> SessionSummary {
        let total_notes = total_notes as u32;
        SessionSummary {
            final_score: self.cumulative_score,
            max_combo: self.max_combo,
            perfect_count: self.perfect_count,
            good_count: self.good_count,
            miss_count: self.miss_count,
            early_count: self.early_count,
            late_count: self.late_count,
            total_notes,
            unplayed_count: total_notes.saturating_sub(self.resolved_count()),
            paused_ms: self.pause_accumulated_ms,
            accuracy_percent: SessionSummary::accuracy_over(
                self.perfect_count + self.good_count,
                total_notes,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::NoteId;

    fn result(category: JudgmentCategory, delta: Option<i64>, score: u64, combo: u32) -> JudgmentResult {
        JudgmentResult {
            note_id: NoteId(0),
            category,
            timing_delta_ms: delta,
            score_awarded: score,
            combo_after: combo,
        }
    }

    #[test]
    fn test_record_counts_and_score() {
        let mut session = GameSession::new();
        session.record(result(JudgmentCategory::Perfect, Some(-3), 1000, 1));
        session.record(result(JudgmentCategory::Good, Some(40), 500, 2));
        session.record(result(JudgmentCategory::Miss, None, 0, 0));

        assert_eq!(session.cumulative_score, 1500);
        assert_eq!(session.perfect_count, 1);
        assert_eq!(session.good_count, 1);
        assert_eq!(session.miss_count, 1);
        assert_eq!(session.current_combo, 0);
        assert_eq!(session.max_combo, 2);
        assert_eq!(session.early_count, 1);
        assert_eq!(session.late_count, 1);
        assert!(session.last_judgment().unwrap().is_auto_miss());
    }

    #[test]
    fn test_exact_hit_counts_neither_early_nor_late() {
        let mut session = GameSession::new();
        session.record(result(JudgmentCategory::Perfect, Some(0), 1000, 1));
        assert_eq!(session.early_count, 0);
        assert_eq!(session.late_count, 0);
    }

    #[test]
    fn test_accuracy() {
        let mut session = GameSession::new();
        assert!((session.accuracy() - 100.0).abs() < f64::EPSILON);
        session.record(result(JudgmentCategory::Perfect, Some(0), 1000, 1));
        session.record(result(JudgmentCategory::Miss, None, 0, 0));
        assert!((session.accuracy() - 50.0).abs() < 0.001);
    }

    #[test]
    fn test_pause_accumulates() {
        let mut session = GameSession::new();
        session.begin_pause(1000);
        assert!(session.paused);
        assert_eq!(session.end_pause(4000), 3000);
        session.begin_pause(5000);
        session.end_pause(5500);
        assert!(!session.paused);
        assert_eq!(session.pause_accumulated_ms, 3500);
    }

    #[test]
    fn test_finalize_counts_unplayed() {
        let mut session = GameSession::new();
        session.record(result(JudgmentCategory::Perfect, Some(0), 1000, 1));
        let summary = session.finalize(4);
        assert_eq!(summary.total_notes, 4);
        assert_eq!(summary.unplayed_count, 3);
        assert!((summary.accuracy_percent - 25.0).abs() < 0.001);
    }
}
