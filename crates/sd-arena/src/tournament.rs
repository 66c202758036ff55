//! Champion-defends tournament manager.
//!
//! The first duel pairs the first two queued competitors. From then on the
//! latest winner defends against the next queued challenger who has not
//! already faced them. Losers leave the tournament.

use std::collections::{HashSet, VecDeque};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sd_core::{Competitor, CompetitorId, CompetitorTag, DuelResult, MoveCatalog, Roster};

use crate::config::{RematchPolicy, TournamentConfig};
use crate::engine::DuelEngine;
use crate::error::{ArenaError, ArenaResult};
use crate::event::EventSink;
use crate::stop::StopSignal;

/// Where the tournament stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TournamentPhase {
    /// No champion yet; at least two competitors are queued.
    AwaitingFirstPairing,
    /// A champion is waiting for a challenger.
    AwaitingChallenger,
    /// No valid pairing remains.
    Exhausted,
}

/// Point-in-time summary of a tournament.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TournamentStats {
    /// Current round (0 before the first pairing).
    pub round: u32,
    /// Number of finished duels.
    pub duels_completed: usize,
    /// Competitors still waiting in the queue.
    pub remaining: usize,
    /// The latest winner, if any.
    pub champion: Option<CompetitorTag>,
}

/// Sequences duels over a roster with a defending champion.
#[derive(Debug)]
pub struct Tournament {
    config: TournamentConfig,
    engine: DuelEngine,
    catalog: MoveCatalog,
    competitors: Vec<Competitor>,
    queue: VecDeque<CompetitorId>,
    champion: Option<CompetitorId>,
    history: Vec<DuelResult>,
    contested: HashSet<(CompetitorId, CompetitorId)>,
    round: u32,
    rng: StdRng,
}

impl Tournament {
    /// Create a tournament over `roster`, queued in roster order.
    pub fn new(roster: Roster, catalog: MoveCatalog, config: TournamentConfig) -> ArenaResult<Self> {
        let engine = DuelEngine::new(config.duel.clone())?;
        let rng = StdRng::seed_from_u64(config.seed);
        let mut tournament = Self {
            config,
            engine,
            catalog,
            competitors: Vec::new(),
            queue: VecDeque::new(),
            champion: None,
            history: Vec::new(),
            contested: HashSet::new(),
            round: 0,
            rng,
        };
        tournament.reset(roster);
        Ok(tournament)
    }

    /// Observe an externally owned stop signal during duels.
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.engine = self.engine.with_stop_signal(stop);
        self
    }

    /// Start over with a new roster. Clears the queue, champion, history,
    /// round counter, and contested pairs.
    pub fn reset(&mut self, roster: Roster) {
        self.competitors = roster.into_competitors();
        self.queue = self.competitors.iter().map(|c| c.id).collect();
        self.champion = None;
        self.history.clear();
        self.contested.clear();
        self.round = 0;
        tracing::info!(competitors = self.competitors.len(), "tournament reset");
    }

    /// Current phase, derived from the queue and champion.
    pub fn phase(&self) -> TournamentPhase {
        if !self.has_next_duel() {
            TournamentPhase::Exhausted
        } else if self.champion.is_some() {
            TournamentPhase::AwaitingChallenger
        } else {
            TournamentPhase::AwaitingFirstPairing
        }
    }

    /// Returns true if another duel can be paired.
    pub fn has_next_duel(&self) -> bool {
        match self.champion {
            None => self.queue.len() >= 2,
            Some(champion) => match self.config.rematch_policy {
                RematchPolicy::AllowFallback => !self.queue.is_empty(),
                RematchPolicy::Strict => self
                    .queue
                    .iter()
                    .any(|&candidate| !self.already_contested(champion, candidate)),
            },
        }
    }

    /// Take the next pairing off the queue and advance the round.
    ///
    /// Without a champion this is the first two queued competitors. With a
    /// champion, the queue is scanned from the front for the first challenger
    /// who has not faced the champion; skipped candidates rotate to the back.
    /// If everyone has faced the champion, the front of the queue is used
    /// (under [`RematchPolicy::AllowFallback`]).
    pub fn next_pairing(&mut self) -> ArenaResult<(CompetitorId, CompetitorId)> {
        if !self.has_next_duel() {
            return Err(self.exhausted_error());
        }

        let pairing = match self.champion {
            None => {
                let (Some(first), Some(second)) = (self.queue.pop_front(), self.queue.pop_front())
                else {
                    return Err(self.exhausted_error());
                };
                self.round = 1;
                (first, second)
            }
            Some(champion) => {
                let challenger = match self.take_fresh_challenger(champion) {
                    Some(challenger) => challenger,
                    None => {
                        tracing::info!("every queued challenger has faced the champion; allowing a rematch");
                        self.queue
                            .pop_front()
                            .ok_or_else(|| self.exhausted_error())?
                    }
                };
                self.round += 1;
                (champion, challenger)
            }
        };
        tracing::debug!(round = self.round, "pairing selected");
        Ok(pairing)
    }

    /// Pair, run, and record the next duel.
    ///
    /// On success the winner becomes champion, the result joins the history,
    /// and the pair is marked as contested. The loser is not re-queued.
    ///
    /// If the duel is aborted, nothing is recorded: the challengers return to
    /// the front of the queue and the round counter is restored.
    pub fn run_next_duel(&mut self, sink: &dyn EventSink) -> ArenaResult<DuelResult> {
        let previous_round = self.round;
        let (first, second) = self.next_pairing()?;
        tracing::info!(round = self.round, "running duel");

        let mut duel_rng = StdRng::seed_from_u64(self.rng.random());
        let outcome = match pair_mut(&mut self.competitors, first, second) {
            Ok((a, b)) => self
                .engine
                .run_duel(a, b, &self.catalog, &mut duel_rng, sink),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(result) => {
                self.record(&result);
                Ok(result)
            }
            Err(err) => {
                if self.champion.is_none() {
                    self.queue.push_front(second);
                    self.queue.push_front(first);
                } else {
                    self.queue.push_front(second);
                }
                self.round = previous_round;
                Err(err)
            }
        }
    }

    /// Snapshot of round, duels completed, queue size, and champion.
    pub fn stats(&self) -> TournamentStats {
        TournamentStats {
            round: self.round,
            duels_completed: self.history.len(),
            remaining: self.queue.len(),
            champion: self.champion().map(Competitor::tag),
        }
    }

    /// The latest winner, if any.
    pub fn champion(&self) -> Option<&Competitor> {
        self.champion.and_then(|id| self.competitor(id))
    }

    /// Current round number (0 before the first pairing).
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Number of finished duels.
    pub fn duels_completed(&self) -> usize {
        self.history.len()
    }

    /// Competitors waiting in the queue.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Queued competitors, front first.
    pub fn queued(&self) -> impl Iterator<Item = &Competitor> {
        self.queue.iter().filter_map(|&id| self.competitor(id))
    }

    /// Every finished duel, oldest first.
    pub fn history(&self) -> &[DuelResult] {
        &self.history
    }

    /// Look up a competitor by ID.
    pub fn competitor(&self, id: CompetitorId) -> Option<&Competitor> {
        self.competitors.iter().find(|c| c.id == id)
    }

    /// Every competitor in the current roster.
    pub fn competitors(&self) -> &[Competitor] {
        &self.competitors
    }

    /// The move catalog used for every duel.
    pub fn catalog(&self) -> &MoveCatalog {
        &self.catalog
    }

    /// The tournament's configuration.
    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    /// The stop signal observed by running duels.
    pub fn stop_signal(&self) -> &StopSignal {
        self.engine.stop_signal()
    }

    /// Returns true if the two competitors have already dueled.
    pub fn already_contested(&self, a: CompetitorId, b: CompetitorId) -> bool {
        self.contested.contains(&CompetitorId::ordered_pair(a, b))
    }

    /// Pull the first queued challenger who has not faced `champion`.
    /// Skipped candidates are rotated to the back in their original order.
    fn take_fresh_challenger(&mut self, champion: CompetitorId) -> Option<CompetitorId> {
        for _ in 0..self.queue.len() {
            let candidate = self.queue.pop_front()?;
            if !self.already_contested(champion, candidate) {
                return Some(candidate);
            }
            self.queue.push_back(candidate);
        }
        None
    }

    fn record(&mut self, result: &DuelResult) {
        self.history.push(result.clone());
        self.champion = Some(result.winner().id);
        self.contested.insert(result.pair());
        tracing::info!(
            champion = %result.winner(),
            duels = self.history.len(),
            remaining = self.queue.len(),
            "result recorded"
        );
    }

    fn exhausted_error(&self) -> ArenaError {
        ArenaError::NoDuelAvailable(format!(
            "{} queued, champion {}",
            self.queue.len(),
            if self.champion.is_some() { "set" } else { "unset" }
        ))
    }
}

/// Borrow two distinct competitors mutably.
fn pair_mut(
    competitors: &mut [Competitor],
    a: CompetitorId,
    b: CompetitorId,
) -> ArenaResult<(&mut Competitor, &mut Competitor)> {
    let position = |id: CompetitorId| {
        competitors
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| ArenaError::UnknownCompetitor(id.to_string()))
    };
    let ia = position(a)?;
    let ib = position(b)?;
    if ia == ib {
        return Err(ArenaError::SameCompetitor(competitors[ia].name.clone()));
    }
    if ia < ib {
        let (low, high) = competitors.split_at_mut(ib);
        Ok((&mut low[ia], &mut high[0]))
    } else {
        let (low, high) = competitors.split_at_mut(ia);
        Ok((&mut high[0], &mut low[ib]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DuelConfig, PacingWindow};
    use crate::event::NullSink;

    fn fast_config() -> TournamentConfig {
        TournamentConfig::default().with_duel(
            DuelConfig::default()
                .with_threshold(40)
                .with_pacing(PacingWindow::instant()),
        )
    }

    fn catalog() -> MoveCatalog {
        MoveCatalog::from_pairs([("Spark", 5), ("Blast", 10)]).unwrap()
    }

    fn tournament(names: &[&str], config: TournamentConfig) -> Tournament {
        let roster = Roster::from_entries(names.iter().map(|n| (*n, "House"))).unwrap();
        Tournament::new(roster, catalog(), config).unwrap()
    }

    fn id_of(t: &Tournament, name: &str) -> CompetitorId {
        t.competitors().iter().find(|c| c.name == name).unwrap().id
    }

    #[test]
    fn fresh_tournament_state() {
        let t = tournament(&["X", "Y", "Z"], fast_config());
        assert_eq!(t.phase(), TournamentPhase::AwaitingFirstPairing);
        assert!(t.has_next_duel());
        assert_eq!(
            t.stats(),
            TournamentStats {
                round: 0,
                duels_completed: 0,
                remaining: 3,
                champion: None,
            }
        );
    }

    #[test]
    fn single_competitor_is_exhausted() {
        let mut t = tournament(&["X"], fast_config());
        assert_eq!(t.phase(), TournamentPhase::Exhausted);
        assert!(matches!(
            t.next_pairing(),
            Err(ArenaError::NoDuelAvailable(_))
        ));
    }

    #[test]
    fn first_pairing_takes_front_two() {
        let mut t = tournament(&["X", "Y", "Z"], fast_config());
        let (a, b) = t.next_pairing().unwrap();
        assert_eq!(a, id_of(&t, "X"));
        assert_eq!(b, id_of(&t, "Y"));
        assert_eq!(t.round(), 1);
        assert_eq!(t.queue_len(), 1);
    }

    #[test]
    fn challenger_scan_skips_and_rotates() {
        let mut t = tournament(&["C", "P", "Q", "R"], fast_config());
        let (c, p, q, r) = (id_of(&t, "C"), id_of(&t, "P"), id_of(&t, "Q"), id_of(&t, "R"));
        t.queue = VecDeque::from([p, q, r]);
        t.champion = Some(c);
        t.round = 3;
        t.contested.insert(CompetitorId::ordered_pair(c, p));
        t.contested.insert(CompetitorId::ordered_pair(c, q));

        let pairing = t.next_pairing().unwrap();
        assert_eq!(pairing, (c, r));
        assert_eq!(t.round(), 4);
        assert_eq!(t.queue.iter().copied().collect::<Vec<_>>(), [p, q]);
    }

    #[test]
    fn fallback_allows_rematch() {
        let mut t = tournament(&["C", "P", "Q"], fast_config());
        let (c, p, q) = (id_of(&t, "C"), id_of(&t, "P"), id_of(&t, "Q"));
        t.queue = VecDeque::from([p, q]);
        t.champion = Some(c);
        t.contested.insert(CompetitorId::ordered_pair(c, p));
        t.contested.insert(CompetitorId::ordered_pair(c, q));

        assert!(t.has_next_duel());
        assert_eq!(t.next_pairing().unwrap(), (c, p));
        assert_eq!(t.queue.iter().copied().collect::<Vec<_>>(), [q]);
    }

    #[test]
    fn strict_policy_refuses_rematch() {
        let config = fast_config().with_rematch_policy(RematchPolicy::Strict);
        let mut t = tournament(&["C", "P"], config);
        let (c, p) = (id_of(&t, "C"), id_of(&t, "P"));
        t.queue = VecDeque::from([p]);
        t.champion = Some(c);
        t.contested.insert(CompetitorId::ordered_pair(c, p));

        assert!(!t.has_next_duel());
        assert_eq!(t.phase(), TournamentPhase::Exhausted);
        assert!(t.next_pairing().is_err());
        assert_eq!(t.queue_len(), 1);
    }

    #[test]
    fn run_next_duel_records_result() {
        let mut t = tournament(&["X", "Y", "Z"], fast_config());
        let result = t.run_next_duel(&NullSink).unwrap();
        assert_eq!(t.duels_completed(), 1);
        assert_eq!(t.champion().unwrap().id, result.winner().id);
        assert!(t.already_contested(result.winner().id, result.loser().id));
        assert_eq!(t.phase(), TournamentPhase::AwaitingChallenger);
        assert_eq!(t.history()[0], result);
        assert_eq!(t.queued().map(|c| c.name.as_str()).collect::<Vec<_>>(), ["Z"]);
    }

    #[test]
    fn aborted_duel_restores_queue() {
        let mut t = tournament(&["X", "Y", "Z"], fast_config());
        t.stop_signal().stop();
        let err = t.run_next_duel(&NullSink).unwrap_err();
        assert!(matches!(err, ArenaError::Aborted(_)));
        assert_eq!(t.round(), 0);
        assert_eq!(t.duels_completed(), 0);
        assert_eq!(
            t.queued().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            ["X", "Y", "Z"]
        );

        t.stop_signal().reset();
        assert!(t.run_next_duel(&NullSink).is_ok());
    }

    #[test]
    fn reset_clears_everything() {
        let mut t = tournament(&["X", "Y"], fast_config());
        t.run_next_duel(&NullSink).unwrap();
        assert!(!t.has_next_duel());

        let roster = Roster::from_entries([("A", "H"), ("B", "H"), ("C", "H")]).unwrap();
        t.reset(roster);
        assert_eq!(t.stats().round, 0);
        assert_eq!(t.stats().duels_completed, 0);
        assert_eq!(t.stats().remaining, 3);
        assert!(t.stats().champion.is_none());
        assert!(t.history().is_empty());
        assert!(t.contested.is_empty());
    }

    #[test]
    fn same_seed_same_tournament() {
        let run = || {
            let mut t = tournament(&["A", "B", "C", "D"], fast_config().with_seed(77));
            let mut winners = Vec::new();
            while t.has_next_duel() {
                winners.push(t.run_next_duel(&NullSink).unwrap().winner().name.clone());
            }
            winners
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn pair_mut_rejects_unknown_and_same() {
        let mut competitors = vec![
            Competitor::new("A", "H").unwrap(),
            Competitor::new("B", "H").unwrap(),
        ];
        let (a, b) = (competitors[0].id, competitors[1].id);
        let (first, second) = pair_mut(&mut competitors, b, a).unwrap();
        assert_eq!(first.name, "B");
        assert_eq!(second.name, "A");
        assert!(matches!(
            pair_mut(&mut competitors, a, a),
            Err(ArenaError::SameCompetitor(_))
        ));
        assert!(matches!(
            pair_mut(&mut competitors, a, CompetitorId::new()),
            Err(ArenaError::UnknownCompetitor(_))
        ));
    }
}
