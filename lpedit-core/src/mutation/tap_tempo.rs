//! Tap tempo: BPM from the interval between two consecutive taps.

use lpedit_types::Parameter;

const MS_PER_MINUTE: f64 = 60_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TapOutcome {
    /// First tap; nothing to measure yet.
    Anchored,
    /// No tempo parameter to range-check against.
    NoTarget(f64),
    /// Within the tempo parameter's range; should be submitted.
    Estimated(f64),
    /// Outside the range; discarded.
    OutOfRange(f64),
}

/// Remembers the previous tap. Every tap becomes the anchor for the next one,
/// whether or not it produced a usable tempo.
#[derive(Debug, Clone, Copy, Default)]
pub struct TapTempo {
    previous_ms: Option<u64>,
}

impl TapTempo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tap at `now_ms` (milliseconds since any fixed epoch).
    pub fn tap(&mut self, now_ms: u64, tempo: Option<&Parameter>) -> TapOutcome {
        let previous = self.previous_ms.replace(now_ms);
        let Some(previous) = previous else {
            return TapOutcome::Anchored;
        };

        // Zero or negative intervals give an infinite rate and fail the range check.
        let interval = now_ms.saturating_sub(previous) as f64;
        let bpm = MS_PER_MINUTE / interval;

        match tempo {
            None => TapOutcome::NoTarget(bpm),
            Some(param) if bpm.is_finite() && param.in_range(bpm) => TapOutcome::Estimated(bpm),
            Some(_) => TapOutcome::OutOfRange(bpm),
        }
    }

    pub fn previous_ms(&self) -> Option<u64> {
        self.previous_ms
    }

    pub fn reset(&mut self) {
        self.previous_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lpedit_types::ParameterId;

    fn tempo() -> Parameter {
        Parameter::numeric(ParameterId::new(3), "Tempo", 120.0, 40, 220)
    }

    #[test]
    fn first_tap_only_anchors() {
        let mut tap = TapTempo::new();
        assert_eq!(tap.tap(0, Some(&tempo())), TapOutcome::Anchored);
        assert_eq!(tap.previous_ms(), Some(0));
    }

    #[test]
    fn half_second_interval_is_120_bpm() {
        let mut tap = TapTempo::new();
        tap.tap(0, Some(&tempo()));
        assert_eq!(tap.tap(500, Some(&tempo())), TapOutcome::Estimated(120.0));
    }

    #[test]
    fn too_fast_is_discarded_but_reanchors() {
        let mut tap = TapTempo::new();
        tap.tap(0, Some(&tempo()));
        assert_eq!(tap.tap(50, Some(&tempo())), TapOutcome::OutOfRange(1200.0));
        assert_eq!(tap.previous_ms(), Some(50));
        // The next interval is measured from the discarded tap.
        assert_eq!(tap.tap(550, Some(&tempo())), TapOutcome::Estimated(120.0));
    }

    #[test]
    fn long_gap_is_discarded() {
        let mut tap = TapTempo::new();
        tap.tap(1_000, Some(&tempo()));
        match tap.tap(4_000, Some(&tempo())) {
            TapOutcome::OutOfRange(bpm) => assert!((bpm - 20.0).abs() < 1e-9),
            other => panic!("Expected OutOfRange, got {:?}", other),
        }
        assert_eq!(tap.previous_ms(), Some(4_000));
    }

    #[test]
    fn same_millisecond_is_out_of_range() {
        let mut tap = TapTempo::new();
        tap.tap(10, Some(&tempo()));
        assert!(matches!(tap.tap(10, Some(&tempo())), TapOutcome::OutOfRange(_)));
    }

    #[test]
    fn without_target_still_measures() {
        let mut tap = TapTempo::new();
        tap.tap(0, None);
        assert_eq!(tap.tap(1_000, None), TapOutcome::NoTarget(60.0));
    }
}
