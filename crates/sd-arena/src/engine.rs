//! The two-thread duel engine.
//!
//! Each competitor gets its own turn-taking thread. Both threads share one
//! monitor (a mutex around [`Arena`] plus a condition variable); the turn
//! owner flag is read and flipped only while the mutex is held, so turns
//! alternate strictly. Pacing pauses happen after the mutex is released.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Instant;

use rand::Rng;
use rand::rngs::StdRng;
use sd_core::{Competitor, DuelResult, MoveCatalog};

use crate::config::DuelConfig;
use crate::error::{AbortReason, ArenaError, ArenaResult};
use crate::event::{DuelEvent, EventSink};
use crate::stop::StopSignal;

/// Runs duels between pairs of competitors.
#[derive(Debug, Clone)]
pub struct DuelEngine {
    config: DuelConfig,
    stop: StopSignal,
}

/// Shared state guarded by the duel monitor.
struct Arena<'a> {
    fighters: [&'a mut Competitor; 2],
    /// Index into `fighters` of the side allowed to act.
    turn: usize,
    active: bool,
    result: Option<DuelResult>,
    abort: Option<AbortReason>,
    rng: &'a mut StdRng,
}

impl Arena<'_> {
    fn finish(&mut self) {
        self.active = false;
    }
}

struct Monitor<'a> {
    arena: Mutex<Arena<'a>>,
    turn_passed: Condvar,
}

impl<'a> Monitor<'a> {
    fn new(arena: Arena<'a>) -> Self {
        Self {
            arena: Mutex::new(arena),
            turn_passed: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Arena<'a>> {
        self.arena.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block until it is `side`'s turn or the duel is over.
    fn wait_for_turn(&self, side: usize) -> MutexGuard<'_, Arena<'a>> {
        let guard = self.lock();
        self.turn_passed
            .wait_while(guard, |arena| arena.active && arena.turn != side)
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn into_arena(self) -> Arena<'a> {
        self.arena.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DuelEngine {
    /// Create an engine. Fails if the configuration is out of range.
    pub fn new(config: DuelConfig) -> ArenaResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            stop: StopSignal::new(),
        })
    }

    /// Observe an externally owned stop signal instead of a private one.
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    /// The engine's configuration.
    pub fn config(&self) -> &DuelConfig {
        &self.config
    }

    /// The stop signal running duels observe. Clone it to cancel from
    /// another thread.
    pub fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }

    /// Run one duel to completion and return its result.
    ///
    /// Both competitors' per-duel state is reset first. `first` takes the
    /// opening turn. Blocks until both turn-taking threads have exited.
    ///
    /// Returns [`ArenaError::Aborted`] if the stop signal or the time limit
    /// ended the duel before anyone won.
    pub fn run_duel(
        &self,
        first: &mut Competitor,
        second: &mut Competitor,
        catalog: &MoveCatalog,
        rng: &mut StdRng,
        sink: &dyn EventSink,
    ) -> ArenaResult<DuelResult> {
        if first.id == second.id {
            return Err(ArenaError::SameCompetitor(first.name.clone()));
        }
        if catalog.is_empty() {
            return Err(sd_core::CoreError::EmptyCatalog.into());
        }

        first.reset_duel_state();
        second.reset_duel_state();
        tracing::info!(
            first = %first.name,
            second = %second.name,
            threshold = self.config.score_threshold,
            "duel started"
        );
        sink.emit(DuelEvent::DuelStarted {
            first: first.tag(),
            second: second.tag(),
        });

        // A limit too far out to represent is no limit at all.
        let deadline = self
            .config
            .time_limit
            .and_then(|limit| Instant::now().checked_add(limit));
        let monitor = Monitor::new(Arena {
            fighters: [first, second],
            turn: 0,
            active: true,
            result: None,
            abort: None,
            rng,
        });

        let outcomes = thread::scope(|scope| {
            let handles = [0, 1].map(|side| {
                let monitor = &monitor;
                scope.spawn(move || self.take_turns(monitor, side, catalog, sink, deadline))
            });
            handles.map(|handle| handle.join())
        });
        for outcome in outcomes {
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => return Err(err),
                Err(_) => return Err(ArenaError::TaskPanicked),
            }
        }

        let arena = monitor.into_arena();
        match (arena.result, arena.abort) {
            (Some(result), _) => {
                tracing::info!(%result, "duel finished");
                Ok(result)
            }
            (None, reason) => {
                let reason = reason.unwrap_or(AbortReason::Cancelled);
                tracing::warn!(%reason, "duel aborted without a winner");
                Err(ArenaError::Aborted(reason))
            }
        }
    }

    /// Turn loop for one side of the duel.
    fn take_turns(
        &self,
        monitor: &Monitor<'_>,
        side: usize,
        catalog: &MoveCatalog,
        sink: &dyn EventSink,
        deadline: Option<Instant>,
    ) -> ArenaResult<()> {
        let foe = 1 - side;
        loop {
            let mut arena = monitor.wait_for_turn(side);
            if !arena.active {
                return Ok(());
            }

            if let Some(reason) = self.interruption(deadline) {
                arena.abort = Some(reason);
                arena.finish();
                monitor.turn_passed.notify_all();
                return Ok(());
            }

            if arena.fighters[side].is_stunned() {
                arena.fighters[side].recover();
                tracing::debug!(competitor = %arena.fighters[side].name, "recovered");
                sink.emit(DuelEvent::Recovered {
                    competitor: arena.fighters[side].tag(),
                });
                arena.turn = foe;
                monitor.turn_passed.notify_all();
                continue;
            }

            let index = arena.rng.random_range(0..catalog.len());
            let Some(mv) = catalog.get(index) else {
                arena.finish();
                monitor.turn_passed.notify_all();
                return Err(sd_core::CoreError::EmptyCatalog.into());
            };
            let score = arena.fighters[side].apply_move(mv);
            tracing::debug!(competitor = %arena.fighters[side].name, mv = %mv, score, "move resolved");
            sink.emit(DuelEvent::MoveResolved {
                competitor: arena.fighters[side].tag(),
                mv: mv.clone(),
                score,
            });

            if score >= self.config.score_threshold {
                arena.finish();
                monitor.turn_passed.notify_all();
                let result = DuelResult::new(
                    &*arena.fighters[side],
                    &*arena.fighters[foe],
                    self.config.score_threshold,
                )?;
                sink.emit(DuelEvent::DuelFinished {
                    result: result.clone(),
                });
                arena.result = Some(result);
                return Ok(());
            }

            if arena.rng.random_bool(self.config.stun_chance) {
                arena.fighters[foe].stun();
                tracing::debug!(competitor = %arena.fighters[foe].name, "stunned");
                sink.emit(DuelEvent::Stunned {
                    competitor: arena.fighters[foe].tag(),
                });
            }

            arena.turn = foe;
            let mut pause = self.config.pacing.sample(&mut *arena.rng);
            drop(arena);
            monitor.turn_passed.notify_all();

            if let Some(deadline) = deadline {
                pause = pause.min(deadline.saturating_duration_since(Instant::now()));
            }
            self.stop.sleep(pause);
        }
    }

    /// Reason to stop before acting, if any.
    fn interruption(&self, deadline: Option<Instant>) -> Option<AbortReason> {
        if self.stop.is_stopped() {
            return Some(AbortReason::Cancelled);
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return Some(AbortReason::TimedOut);
        }
        None
    }
}
