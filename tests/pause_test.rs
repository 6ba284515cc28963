use rhythm_core::traits::{Clock, MockClock, PausableClock};
use rhythm_core::{EngineState, JudgmentCategory, NoteSpec, RhythmEngine};

fn schedule() -> Vec<NoteSpec> {
    vec![NoteSpec::new(1000, 0), NoteSpec::new(1500, 0)]
}

/// Pausing for 3000ms must not expire notes due after the pause.
#[test]
fn test_pause_does_not_burst_misses() {
    let wall = MockClock::new();
    let clock = PausableClock::new(&wall);
    let mut engine = RhythmEngine::default();
    engine.start_game(&schedule(), &clock).unwrap();

    wall.set_time(500);
    engine.update(clock.now_ms().unwrap()).unwrap();

    engine.pause(clock.pause().unwrap()).unwrap();
    wall.advance(3000);
    // Ticks keep arriving while paused; they are ignored.
    assert!(engine.update(clock.now_ms().unwrap()).unwrap().is_empty());
    let paused_for = engine.resume(clock.resume().unwrap()).unwrap();
    assert_eq!(paused_for, 3000);

    let misses = engine.update(clock.now_ms().unwrap()).unwrap();
    assert!(misses.is_empty());
    assert_eq!(clock.now_ms().unwrap(), 500);

    wall.advance(500);
    let now = clock.now_ms().unwrap();
    assert_eq!(now, 1000);
    let result = engine.handle_input(0, now).unwrap();
    assert_eq!(
        result.judgment().map(|r| r.category),
        Some(JudgmentCategory::Perfect)
    );

    wall.advance(500);
    engine.handle_input(0, clock.now_ms().unwrap()).unwrap();

    let summary = engine.end_game().unwrap();
    assert_eq!(summary.miss_count, 0);
    assert_eq!(summary.perfect_count, 2);
    assert_eq!(summary.paused_ms, 3000);
}

/// Feeding wall time instead of gameplay time is what the contract forbids:
/// the same pause then expires both notes.
#[test]
fn test_wall_time_would_expire_notes() {
    let wall = MockClock::new();
    let mut engine = RhythmEngine::default();
    engine.start_game(&schedule(), &wall).unwrap();

    engine.pause(500).unwrap();
    engine.resume(3500).unwrap();
    let misses = engine.update(3500).unwrap();
    assert_eq!(misses.len(), 2);
}

#[test]
fn test_multiple_pauses_accumulate() {
    let wall = MockClock::new();
    let clock = PausableClock::new(&wall);
    let mut engine = RhythmEngine::default();
    engine.start_game(&schedule(), &clock).unwrap();

    for _ in 0..3 {
        wall.advance(100);
        engine.pause(clock.pause().unwrap()).unwrap();
        assert_eq!(engine.state(), EngineState::Paused);
        wall.advance(1000);
        engine.resume(clock.resume().unwrap()).unwrap();
    }

    assert_eq!(clock.now_ms().unwrap(), 300);
    assert_eq!(engine.session().pause_accumulated_ms, 3000);
    assert!(engine.update(clock.now_ms().unwrap()).unwrap().is_empty());
}
