//! End-to-end duel tests
//!
//! Run real two-thread duels with instant pacing and check the outcome and
//! the event stream the engine produces.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sd_arena::{DuelConfig, DuelEngine, DuelEvent, EventLog, NullSink, PacingWindow};
use sd_core::{Competitor, CompetitorId, MoveCatalog};

fn engine(threshold: u32, stun_chance: f64) -> DuelEngine {
    DuelEngine::new(
        DuelConfig::default()
            .with_threshold(threshold)
            .with_stun_chance(stun_chance)
            .with_pacing(PacingWindow::instant()),
    )
    .unwrap()
}

fn spark_and_blast() -> MoveCatalog {
    MoveCatalog::from_pairs([("Spark", 5), ("Blast", 10)]).unwrap()
}

fn duelists() -> (Competitor, Competitor) {
    (
        Competitor::new("Merlin", "Avalon").unwrap(),
        Competitor::new("Morgana", "Fay").unwrap(),
    )
}

/// Acting competitor of every turn, in order.
fn turn_order(events: &[DuelEvent]) -> Vec<CompetitorId> {
    events.iter().filter_map(|e| e.actor()).map(|t| t.id).collect()
}

fn assert_alternates(order: &[CompetitorId], first: CompetitorId) {
    for (i, actor) in order.iter().enumerate() {
        if i % 2 == 0 {
            assert_eq!(*actor, first, "turn {i} should belong to the opener");
        } else {
            assert_ne!(*actor, first, "turn {i} should belong to the second");
        }
    }
}

#[test]
fn low_threshold_ends_within_two_moves() {
    let engine = engine(10, 0.1);
    for seed in 0..20 {
        let (mut a, mut b) = duelists();
        let mut rng = StdRng::seed_from_u64(seed);
        let result = engine
            .run_duel(&mut a, &mut b, &spark_and_blast(), &mut rng, &NullSink)
            .unwrap();
        assert!(result.winner_moves() <= 2, "seed {seed}: {result}");
        assert!(
            result.winner_score() == 10 || result.winner_score() == 15,
            "seed {seed}: {result}"
        );
    }
}

#[test]
fn event_stream_shape() {
    let engine = engine(60, 0.3);
    let (mut a, mut b) = duelists();
    let log = EventLog::new(0);
    let mut rng = StdRng::seed_from_u64(8);
    let result = engine
        .run_duel(&mut a, &mut b, &spark_and_blast(), &mut rng, &log)
        .unwrap();

    let events = log.events();
    assert!(matches!(events.first(), Some(DuelEvent::DuelStarted { .. })));
    assert!(matches!(events.last(), Some(DuelEvent::DuelFinished { result: r }) if *r == result));
    let finished = events
        .iter()
        .filter(|e| matches!(e, DuelEvent::DuelFinished { .. }))
        .count();
    assert_eq!(finished, 1);
    assert_alternates(&turn_order(&events), a.id);
}

#[test]
fn scores_only_grow_per_competitor() {
    let engine = engine(80, 0.2);
    let (mut a, mut b) = duelists();
    let log = EventLog::new(0);
    let mut rng = StdRng::seed_from_u64(21);
    engine
        .run_duel(&mut a, &mut b, &spark_and_blast(), &mut rng, &log)
        .unwrap();

    for id in [a.id, b.id] {
        let scores: Vec<u32> = log
            .events_for(id)
            .iter()
            .filter_map(|e| match e {
                DuelEvent::MoveResolved { score, .. } => Some(*score),
                _ => None,
            })
            .collect();
        assert!(scores.windows(2).all(|w| w[0] < w[1]), "{scores:?}");
    }
}

#[test]
fn certain_stun_locks_out_the_second_competitor() {
    let engine = engine(30, 1.0);
    let (mut a, mut b) = duelists();
    let log = EventLog::new(0);
    let mut rng = StdRng::seed_from_u64(4);
    let result = engine
        .run_duel(&mut a, &mut b, &spark_and_blast(), &mut rng, &log)
        .unwrap();

    // The opener stuns on every scoring turn, so the other side only ever
    // spends its turns recovering.
    assert_eq!(result.winner().id, a.id);
    assert_eq!(result.loser_score(), 0);
    assert_eq!(b.moves_used(), 0);

    let events = log.events();
    let recoveries = events
        .iter()
        .filter(|e| matches!(e, DuelEvent::Recovered { competitor } if competitor.id == b.id))
        .count();
    assert!(recoveries >= 1);
    assert_eq!(recoveries as u32, result.winner_moves() - 1);
    assert_alternates(&turn_order(&events), a.id);
}

#[test]
fn no_stun_means_no_recoveries() {
    let engine = engine(100, 0.0);
    let (mut a, mut b) = duelists();
    let log = EventLog::new(0);
    let mut rng = StdRng::seed_from_u64(2);
    engine
        .run_duel(&mut a, &mut b, &spark_and_blast(), &mut rng, &log)
        .unwrap();
    assert!(
        log.events()
            .iter()
            .all(|e| !matches!(e, DuelEvent::Stunned { .. } | DuelEvent::Recovered { .. }))
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_duel_outcome_respects_threshold(
        seed in any::<u64>(),
        threshold in 1u32..200,
        stun_chance in 0.0f64..=1.0,
    ) {
        let engine = engine(threshold, stun_chance);
        let (mut a, mut b) = duelists();
        let log = EventLog::new(0);
        let mut rng = StdRng::seed_from_u64(seed);
        let result = engine
            .run_duel(&mut a, &mut b, &spark_and_blast(), &mut rng, &log)
            .unwrap();

        prop_assert!(result.winner_score() >= threshold);
        prop_assert!(result.loser_score() < threshold);
        prop_assert_ne!(result.winner().id, result.loser().id);

        let order = turn_order(&log.events());
        for (i, actor) in order.iter().enumerate() {
            let expected_opener = i % 2 == 0;
            prop_assert_eq!(*actor == a.id, expected_opener);
        }
    }
}
