use crate::chart::NoteSpec;
use crate::traits::InputEvent;

/// One press per note, shifted by `offset_ms` (positive = late).
pub fn autoplay_inputs(notes: &[NoteSpec], offset_ms: i64) -> Vec<InputEvent> {
    notes
        .iter()
        .map(|note| InputEvent::new(note.lane, note.time_ms + offset_ms))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autoplay_offsets_every_note() {
        let notes = [NoteSpec::new(1000, 0), NoteSpec::new(1500, 3)];
        assert_eq!(
            autoplay_inputs(&notes, -10),
            vec![InputEvent::new(0, 990), InputEvent::new(3, 1490)]
        );
    }
}
