use std::collections::{BTreeMap, HashSet};

use tracing::trace;

use super::{Lane, Note, NoteId, NoteSpec, ScheduleError};
use crate::judge::JudgmentCategory;

pub const DEFAULT_LEAD_MS: i64 = 2000;
pub const DEFAULT_MISS_THRESHOLD_MS: i64 = 100;
pub const DEFAULT_VISIBLE_TRAIL_MS: i64 = 100;

/// Notes touched by a single `advance` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvanceOutcome {
    /// Notes auto-resolved as Miss, in schedule order.
    pub expired: Vec<NoteId>,
    /// Notes that entered their lead window during this call.
    pub newly_hittable: Vec<NoteId>,
}

/// Per-lane note indices in time order.
#[derive(Debug, Clone, Default)]
struct LaneQueue {
    indices: Vec<usize>,
    /// Position of the first possibly-unresolved note.
    head: usize,
}

/// Time-ordered note list with per-note lifecycle state.
///
/// Expiry and lead-window promotion are driven by two cursors that only move
/// forward, so a full session costs O(notes) regardless of tick count.
#[derive(Debug, Clone)]
pub struct Schedule {
    notes: Vec<Note>,
    lanes: BTreeMap<Lane, LaneQueue>,
    expiry_cursor: usize,
    lead_cursor: usize,
    lead_ms: i64,
    miss_threshold_ms: i64,
    visible_trail_ms: i64,
    /// Time passed to the latest `advance`.
    current_time_ms: Option<i64>,
}

impl Schedule {
    pub fn new(specs: &[NoteSpec]) -> Result<Self, ScheduleError> {
        validate(specs)?;

        let notes: Vec<Note> = specs
            .iter()
            .enumerate()
            .map(|(i, spec)| Note::new(NoteId(i), *spec))
            .collect();

        let mut lanes: BTreeMap<Lane, LaneQueue> = BTreeMap::new();
        for (i, note) in notes.iter().enumerate() {
            lanes.entry(note.lane()).or_default().indices.push(i);
        }

        Ok(Self {
            notes,
            lanes,
            expiry_cursor: 0,
            lead_cursor: 0,
            lead_ms: DEFAULT_LEAD_MS,
            miss_threshold_ms: DEFAULT_MISS_THRESHOLD_MS,
            visible_trail_ms: DEFAULT_VISIBLE_TRAIL_MS,
            current_time_ms: None,
        })
    }

    pub fn with_windows(mut self, lead_ms: i64, miss_threshold_ms: i64) -> Self {
        self.lead_ms = lead_ms;
        self.miss_threshold_ms = miss_threshold_ms;
        self
    }

    /// How long past its hit time an unresolved note stays in `active_notes`.
    pub fn with_visible_trail(mut self, visible_trail_ms: i64) -> Self {
        self.visible_trail_ms = visible_trail_ms;
        self
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.get(id.0)
    }

    /// Expire overdue notes and promote notes entering their lead window.
    pub fn advance(&mut self, current_time_ms: i64) -> AdvanceOutcome {
        let mut outcome = AdvanceOutcome::default();
        self.current_time_ms = Some(current_time_ms);

        while let Some(note) = self.notes.get_mut(self.expiry_cursor) {
            if !note.is_resolved() {
                if note.timing_delta(current_time_ms) <= self.miss_threshold_ms {
                    break;
                }
                note.resolve(JudgmentCategory::Miss);
                trace!(
                    "note {} expired at {current_time_ms}ms (due {}ms)",
                    note.id().0,
                    note.scheduled_time_ms()
                );
                outcome.expired.push(note.id());
            }
            self.expiry_cursor += 1;
        }

        while let Some(note) = self.notes.get_mut(self.lead_cursor) {
            if note.scheduled_time_ms().saturating_sub(self.lead_ms) > current_time_ms {
                break;
            }
            if note.mark_hittable() {
                outcome.newly_hittable.push(note.id());
            }
            self.lead_cursor += 1;
        }

        outcome
    }

    /// Earliest unresolved note on `lane` within `window_ms` of `input_time_ms`.
    ///
    /// Earliest-due wins over closest-in-time so a late press cannot steal a
    /// later note. `None` is a ghost input.
    pub fn find_best_match(
        &mut self,
        lane: Lane,
        input_time_ms: i64,
        window_ms: i64,
    ) -> Option<NoteId> {
        let queue = self.lanes.get_mut(&lane)?;

        while let Some(&idx) = queue.indices.get(queue.head) {
            if !self.notes[idx].is_resolved() {
                break;
            }
            queue.head += 1;
        }

        for &idx in &queue.indices[queue.head..] {
            let note = &self.notes[idx];
            if note.is_resolved() {
                continue;
            }
            let delta = note.timing_delta(input_time_ms);
            if delta > window_ms {
                // Overdue but not yet expired by `advance`.
                continue;
            }
            if delta < -window_ms {
                break;
            }
            return Some(note.id());
        }
        None
    }

    /// Resolve a note by explicit judgment. Returns false if it was already resolved.
    pub fn resolve(&mut self, id: NoteId, category: JudgmentCategory) -> bool {
        match self.notes.get_mut(id.0) {
            Some(note) => note.resolve(category),
            None => false,
        }
    }

    /// Unresolved notes whose lead window has been entered and whose hit
    /// time is at most `visible_trail_ms` behind the latest `advance`.
    pub fn active_notes(&self) -> impl Iterator<Item = &Note> {
        let end = self.lead_cursor.max(self.expiry_cursor);
        let trail_start = self
            .current_time_ms
            .map_or(i64::MIN, |now| now.saturating_sub(self.visible_trail_ms));
        self.notes[self.expiry_cursor..end]
            .iter()
            .filter(move |n| !n.is_resolved() && n.scheduled_time_ms() >= trail_start)
    }
}

fn validate(specs: &[NoteSpec]) -> Result<(), ScheduleError> {
    let mut lanes_at_time: HashSet<Lane> = HashSet::new();
    let mut previous: Option<i64> = None;

    for (index, spec) in specs.iter().enumerate() {
        if spec.time_ms < 0 {
            return Err(ScheduleError::NegativeTime {
                index,
                time_ms: spec.time_ms,
            });
        }
        match previous {
            Some(previous_ms) if spec.time_ms < previous_ms => {
                return Err(ScheduleError::Unsorted {
                    index,
                    time_ms: spec.time_ms,
                    previous_ms,
                });
            }
            Some(previous_ms) if spec.time_ms == previous_ms => {}
            _ => lanes_at_time.clear(),
        }
        if !lanes_at_time.insert(spec.lane) {
            return Err(ScheduleError::DuplicateNote {
                time_ms: spec.time_ms,
                lane: spec.lane,
            });
        }
        previous = Some(spec.time_ms);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::NoteState;

    fn specs(times: &[(i64, Lane)]) -> Vec<NoteSpec> {
        times.iter().map(|&(t, l)| NoteSpec::new(t, l)).collect()
    }

    #[test]
    fn rejects_unsorted() {
        let err = Schedule::new(&specs(&[(1000, 0), (900, 0)])).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::Unsorted {
                index: 1,
                time_ms: 900,
                previous_ms: 1000
            }
        );
    }

    #[test]
    fn rejects_duplicate_time_and_lane() {
        let err = Schedule::new(&specs(&[(1000, 0), (1000, 1), (1000, 0)])).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::DuplicateNote {
                time_ms: 1000,
                lane: 0
            }
        );
    }

    #[test]
    fn rejects_negative_time() {
        let err = Schedule::new(&specs(&[(-5, 0)])).unwrap_err();
        assert!(matches!(err, ScheduleError::NegativeTime { index: 0, .. }));
    }

    #[test]
    fn accepts_shared_time_on_distinct_lanes() {
        let schedule = Schedule::new(&specs(&[(1000, 0), (1000, 1), (2000, 0)])).unwrap();
        assert_eq!(schedule.len(), 3);
    }

    #[test]
    fn same_lane_allowed_again_at_later_time() {
        assert!(Schedule::new(&specs(&[(1000, 0), (1000, 1), (1500, 1), (1500, 0)])).is_ok());
    }

    #[test]
    fn advance_promotes_within_lead_window() {
        let mut schedule = Schedule::new(&specs(&[(3000, 0), (6000, 0)])).unwrap();

        let outcome = schedule.advance(999);
        assert!(outcome.newly_hittable.is_empty());

        let outcome = schedule.advance(1000);
        assert_eq!(outcome.newly_hittable, vec![NoteId(0)]);
        assert_eq!(schedule.get(NoteId(0)).unwrap().state(), NoteState::Hittable);

        // Already promoted notes are not reported again.
        let outcome = schedule.advance(1500);
        assert!(outcome.newly_hittable.is_empty());
    }

    #[test]
    fn advance_expires_strictly_after_threshold() {
        let mut schedule = Schedule::new(&specs(&[(1000, 0)])).unwrap();

        assert!(schedule.advance(1100).expired.is_empty());
        assert_eq!(schedule.advance(1101).expired, vec![NoteId(0)]);
        assert_eq!(
            schedule.get(NoteId(0)).unwrap().state(),
            NoteState::Resolved(JudgmentCategory::Miss)
        );
        assert!(schedule.advance(5000).expired.is_empty());
    }

    #[test]
    fn advance_can_expire_pending_note_directly() {
        let mut schedule = Schedule::new(&specs(&[(1000, 0)])).unwrap();
        let outcome = schedule.advance(10_000);
        assert_eq!(outcome.expired, vec![NoteId(0)]);
        assert!(outcome.newly_hittable.is_empty());
    }

    #[test]
    fn advance_skips_notes_resolved_by_input() {
        let mut schedule = Schedule::new(&specs(&[(1000, 0), (1200, 1)])).unwrap();
        assert!(schedule.resolve(NoteId(0), JudgmentCategory::Perfect));
        let outcome = schedule.advance(2000);
        assert_eq!(outcome.expired, vec![NoteId(1)]);
    }

    #[test]
    fn best_match_prefers_earliest_due() {
        let mut schedule = Schedule::new(&specs(&[(1000, 0), (1080, 0)])).unwrap();
        // 1075 is closer to 1080, but 1000 is still within the window.
        assert_eq!(schedule.find_best_match(0, 1075, 100), Some(NoteId(0)));
    }

    #[test]
    fn best_match_respects_lane_and_window() {
        let mut schedule = Schedule::new(&specs(&[(1000, 0)])).unwrap();
        assert_eq!(schedule.find_best_match(1, 1000, 100), None);
        assert_eq!(schedule.find_best_match(0, 1101, 100), None);
        assert_eq!(schedule.find_best_match(0, 899, 100), None);
        assert_eq!(schedule.find_best_match(0, 900, 100), Some(NoteId(0)));
        assert_eq!(schedule.find_best_match(0, 1100, 100), Some(NoteId(0)));
    }

    #[test]
    fn best_match_ignores_resolved() {
        let mut schedule = Schedule::new(&specs(&[(1000, 0), (1050, 0)])).unwrap();
        schedule.resolve(NoteId(0), JudgmentCategory::Good);
        assert_eq!(schedule.find_best_match(0, 1010, 100), Some(NoteId(1)));
    }

    #[test]
    fn resolve_twice_is_rejected() {
        let mut schedule = Schedule::new(&specs(&[(1000, 0)])).unwrap();
        assert!(schedule.resolve(NoteId(0), JudgmentCategory::Perfect));
        assert!(!schedule.resolve(NoteId(0), JudgmentCategory::Perfect));
        assert!(!schedule.resolve(NoteId(7), JudgmentCategory::Perfect));
    }

    #[test]
    fn active_notes_excludes_resolved() {
        let mut schedule = Schedule::new(&specs(&[(1000, 0), (1500, 1), (9000, 0)])).unwrap();
        schedule.advance(0);
        schedule.resolve(NoteId(0), JudgmentCategory::Perfect);
        let active: Vec<NoteId> = schedule.active_notes().map(|n| n.id()).collect();
        assert_eq!(active, vec![NoteId(1)]);
    }

    #[test]
    fn active_notes_drop_after_visible_trail() {
        let mut schedule = Schedule::new(&specs(&[(1000, 0), (1200, 1)]))
            .unwrap()
            .with_visible_trail(30);
        schedule.advance(1030);
        let active: Vec<NoteId> = schedule.active_notes().map(|n| n.id()).collect();
        assert_eq!(active, vec![NoteId(0), NoteId(1)]);

        // Past the trail but not yet expired: hidden, still matchable.
        schedule.advance(1031);
        let active: Vec<NoteId> = schedule.active_notes().map(|n| n.id()).collect();
        assert_eq!(active, vec![NoteId(1)]);
        assert_eq!(schedule.find_best_match(0, 1031, 100), Some(NoteId(0)));
    }

    #[test]
    fn extreme_times_do_not_overflow() {
        let mut schedule = Schedule::new(&specs(&[(1000, 0)])).unwrap();
        assert_eq!(schedule.find_best_match(0, i64::MIN, 100), None);
        assert_eq!(schedule.find_best_match(0, i64::MAX, 100), None);
        assert!(schedule.advance(i64::MIN).expired.is_empty());
        assert_eq!(schedule.advance(i64::MAX).expired, vec![NoteId(0)]);
    }

    #[test]
    fn custom_windows() {
        let mut schedule = Schedule::new(&specs(&[(1000, 0)]))
            .unwrap()
            .with_windows(500, 50);
        assert!(schedule.advance(400).newly_hittable.is_empty());
        assert_eq!(schedule.advance(1051).expired, vec![NoteId(0)]);
    }
}
