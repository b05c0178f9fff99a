//! Property tests for the classifier, scanner and streak tracker.
//!
//! Uses proptest to verify:
//! 1. Classification is case-insensitive and total
//! 2. Scanner never exceeds its cap and returns hits oldest-first
//! 3. No hit is anchored on a window that contains a Neutral candle
//! 4. Every hit satisfies the run/setup predicates and its kind matches the signal
//! 5. The streak is a suffix of the hit list sharing one kind

use candlewatch_core::scanner::WINDOW;
use candlewatch_core::{
    Candle, Direction, KeywordTable, PatternKind, PatternScanner, Streak,
};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        4 => Just(Direction::Up),
        4 => Just(Direction::Down),
        1 => Just(Direction::Neutral),
    ]
}

fn arb_candles(max: usize) -> impl Strategy<Value = Vec<Candle>> {
    prop::collection::vec(arb_direction(), 0..max).prop_map(|dirs| {
        dirs.into_iter()
            .enumerate()
            .map(|(i, d)| Candle::plain(format!("2024-05-01 {:02}:{:02}:00", i / 60, i % 60), d))
            .collect()
    })
}

fn arb_case(word: &'static str) -> impl Strategy<Value = String> {
    prop::collection::vec(any::<bool>(), word.len()).prop_map(move |flips| {
        word.chars()
            .zip(flips)
            .map(|(c, up)| {
                if up {
                    c.to_ascii_uppercase()
                } else {
                    c.to_ascii_lowercase()
                }
            })
            .collect()
    })
}

// ── 1. Classification ────────────────────────────────────────────────

proptest! {
    #[test]
    fn up_keyword_any_case_is_up(word in arb_case("verde"), prefix in "[ xyz]{0,3}") {
        let table = KeywordTable::default();
        prop_assert_eq!(table.classify(&format!("{prefix}{word}")), Direction::Up);
    }

    #[test]
    fn down_keyword_any_case_is_down(word in arb_case("vermelho")) {
        let table = KeywordTable::default();
        prop_assert_eq!(table.classify(&word), Direction::Down);
    }

    #[test]
    fn arbitrary_labels_never_panic(label in any::<String>()) {
        let table = KeywordTable::default();
        let _ = table.classify(&label);
        let _ = table.tint(&label);
    }

    #[test]
    fn labels_without_keywords_are_neutral(label in "[0-9 ._:-]{0,20}") {
        prop_assert_eq!(KeywordTable::default().classify(&label), Direction::Neutral);
    }
}

// ── 2-4. Scanner ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn never_exceeds_cap(candles in arb_candles(200), cap in 1usize..15) {
        let hits = PatternScanner::new(cap).scan(&candles);
        prop_assert!(hits.len() <= cap);
    }

    #[test]
    fn hits_are_chronological(candles in arb_candles(200)) {
        let hits = PatternScanner::default().scan(&candles);
        for w in hits.windows(2) {
            prop_assert!(w[0].index < w[1].index);
            prop_assert!(w[0].timestamp <= w[1].timestamp);
        }
    }

    #[test]
    fn every_hit_satisfies_predicates(candles in arb_candles(120)) {
        for hit in PatternScanner::new(usize::MAX).scan(&candles) {
            prop_assert!(hit.index >= WINDOW - 1);
            let window = &candles[hit.index + 1 - WINDOW..=hit.index];
            prop_assert!(window.iter().all(|c| c.direction != Direction::Neutral));
            let (base, mid1, mid2, signal) = (&window[0], &window[1], &window[2], &window[3]);
            prop_assert_eq!(mid1.direction, mid2.direction);
            prop_assert_ne!(base.direction, mid1.direction);
            let expected = if signal.direction == mid1.direction {
                PatternKind::Continuation
            } else {
                PatternKind::Reversal
            };
            prop_assert_eq!(hit.kind, expected);
            prop_assert_eq!(&hit.timestamp, &signal.timestamp);
        }
    }

    #[test]
    fn capped_scan_is_newest_suffix(candles in arb_candles(200), cap in 1usize..12) {
        let all = PatternScanner::new(usize::MAX).scan(&candles);
        let capped = PatternScanner::new(cap).scan(&candles);
        let keep = all.len().min(cap);
        prop_assert_eq!(&capped[..], &all[all.len() - keep..]);
    }
}

// ── 5. Streak ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn streak_is_uniform_suffix(candles in arb_candles(200)) {
        let hits = PatternScanner::new(usize::MAX).scan(&candles);
        let streak = Streak::from_hits(&hits);
        prop_assert!(streak.len() <= hits.len());
        prop_assert_eq!(&streak.hits[..], &hits[hits.len() - streak.len()..]);
        if let Some(kind) = streak.kind {
            prop_assert!(streak.hits.iter().all(|h| h.kind == kind));
            // The hit just before the streak, if any, has the other kind.
            if streak.len() < hits.len() {
                prop_assert_ne!(hits[hits.len() - streak.len() - 1].kind, kind);
            }
        } else {
            prop_assert!(hits.is_empty());
        }
    }
}

// ── Scenarios ────────────────────────────────────────────────────────

fn from_dirs(dirs: &[Direction]) -> Vec<Candle> {
    dirs.iter()
        .enumerate()
        .map(|(i, d)| Candle::plain(format!("T{i}"), *d))
        .collect()
}

#[test]
fn up_down_down_down_is_continuation_at_fourth() {
    use Direction::{Down, Up};
    let hits = PatternScanner::default().scan(&from_dirs(&[Up, Down, Down, Down]));
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].timestamp, "T3");
    assert_eq!(hits[0].kind, PatternKind::Continuation);
}

#[test]
fn up_down_down_up_is_reversal_at_fourth() {
    use Direction::{Down, Up};
    let hits = PatternScanner::default().scan(&from_dirs(&[Up, Down, Down, Up]));
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].timestamp, "T3");
    assert_eq!(hits[0].kind, PatternKind::Reversal);
}

#[test]
fn mirrored_setup_behaves_the_same() {
    use Direction::{Down, Up};
    let cont = PatternScanner::default().scan(&from_dirs(&[Down, Up, Up, Up]));
    let rev = PatternScanner::default().scan(&from_dirs(&[Down, Up, Up, Down]));
    assert_eq!(cont[0].kind, PatternKind::Continuation);
    assert_eq!(rev[0].kind, PatternKind::Reversal);
}
