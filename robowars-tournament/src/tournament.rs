//! Tournament execution - a fixed list of rounds between two robots
//!
//! Level 1 - Orchestration and Level 2 - Phases
//!
//! One duel is reused for every round: it is reconfigured with the round's
//! field and first shooter, then prepared. Rounds alternate the first shooter
//! (even rounds left, odd rounds right). Once the last round is recorded the
//! results are frozen until the next `start`.

use robowars_core::{
    ConfigError, Duel, DuelError, DuelObserver, DuelState, FieldConfiguration, Side, Strategy, TurnReport,
};

use crate::config::TournamentConfig;
use crate::stats::{RobotStats, RoundEnd, RoundResult, TournamentReport};

/// Tournament lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TournamentState {
    /// Not started yet
    Idle,
    Running,
    /// Every round recorded
    Finished,
}

/// First shooter of round `index`
pub fn first_shooter_for(index: usize) -> Side {
    if index % 2 == 0 {
        Side::Left
    } else {
        Side::Right
    }
}

pub struct Tournament {
    config: TournamentConfig,
    rounds: Vec<FieldConfiguration>,
    current: usize,
    duel: Option<Duel>,
    names: [String; 2],
    results: Vec<RoundResult>,
    round_stats: [RobotStats; 2],
    turn_limit_hit: bool,
    state: TournamentState,
    observers: Vec<Box<dyn DuelObserver>>,
}

impl Tournament {
    pub fn new(config: TournamentConfig) -> Self {
        Self {
            config,
            rounds: Vec::new(),
            current: 0,
            duel: None,
            names: [String::new(), String::new()],
            results: Vec::new(),
            round_stats: [RobotStats::default(); 2],
            turn_limit_hit: false,
            state: TournamentState::Idle,
            observers: Vec::new(),
        }
    }

    /// Attach an observer to the duel of every round
    pub fn add_observer(&mut self, observer: Box<dyn DuelObserver>) {
        match self.duel.as_mut() {
            Some(duel) => duel.add_observer(observer),
            None => self.observers.push(observer),
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn state(&self) -> TournamentState {
        self.state
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    /// Duel of the current round, once started
    pub fn duel(&self) -> Option<&Duel> {
        self.duel.as_ref()
    }

    pub fn current_round(&self) -> usize {
        self.current
    }

    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    /// Recorded rounds, in play order
    pub fn results(&self) -> &[RoundResult] {
        &self.results
    }

    /// Counters of the round in progress
    pub fn round_stats(&self, side: Side) -> &RobotStats {
        &self.round_stats[side.index()]
    }

    pub fn robot_name(&self, side: Side) -> &str {
        &self.names[side.index()]
    }

    pub fn report(&self) -> TournamentReport {
        TournamentReport::new(&self.names[0], &self.names[1], &self.results)
    }

    // ========================================================================
    // LEVEL 1 - ORCHESTRATION
    // ========================================================================

    /// Reset results, seat both robots and prepare round 0.
    ///
    /// Every round configuration is checked up front; an empty round list
    /// finishes immediately.
    pub fn start(
        &mut self,
        rounds: Vec<FieldConfiguration>,
        left: Box<dyn Strategy>,
        right: Box<dyn Strategy>,
    ) -> Result<(), ConfigError> {
        for round in &rounds {
            round.validate()?;
        }

        let mut observers = std::mem::take(&mut self.observers);
        if let Some(mut previous) = self.duel.take() {
            previous.stop_game();
            observers.extend(previous.take_observers());
        }

        self.names = [left.name().to_string(), right.name().to_string()];
        self.results.clear();
        self.current = 0;
        self.rounds = rounds;

        let Some(first) = self.rounds.first().cloned() else {
            self.observers = observers;
            self.finish();
            return Ok(());
        };

        tracing::info!(
            "Tournament started: {} vs {}, {} rounds",
            self.names[0],
            self.names[1],
            self.rounds.len()
        );

        let mut duel = Duel::new(left, right, first);
        for observer in observers {
            duel.add_observer(observer);
        }
        self.duel = Some(duel);
        self.state = TournamentState::Running;
        self.begin_round(0);
        Ok(())
    }

    /// Drive every remaining round synchronously
    pub fn run_to_completion(&mut self) -> TournamentReport {
        while self.state == TournamentState::Running {
            if !self.step() {
                break;
            }
        }
        self.report()
    }

    /// One unit of progress: a turn while a duel runs, otherwise `advance`
    pub fn step(&mut self) -> bool {
        if self.duel_state() == Some(DuelState::InProgress) {
            self.tick();
            true
        } else {
            self.advance()
        }
    }

    // ========================================================================
    // LEVEL 2 - CONTROL SURFACE
    // ========================================================================

    /// Step the current duel to its next state.
    ///
    /// Ready starts, InProgress pauses, Paused resumes, Finished records the
    /// round and moves on. Returns false once the tournament is over.
    pub fn advance(&mut self) -> bool {
        if self.state != TournamentState::Running {
            return false;
        }
        match self.duel_state() {
            Some(DuelState::NotReady) => {
                self.begin_round(self.current);
                true
            }
            Some(DuelState::Ready) => self.duel.as_mut().is_some_and(Duel::start_game),
            Some(DuelState::InProgress) => self.duel.as_mut().is_some_and(Duel::pause_game),
            Some(DuelState::Paused) => self.duel.as_mut().is_some_and(Duel::resume_game),
            Some(DuelState::Finished) => {
                self.complete_round();
                true
            }
            None => false,
        }
    }

    /// Play one turn of the current duel and tally it for the shooter
    pub fn tick(&mut self) -> Option<TurnReport> {
        if self.state != TournamentState::Running {
            return None;
        }
        let duel = self.duel.as_mut()?;
        let report = duel.tick()?;
        self.round_stats[report.shooter.index()].record(&report);

        let limit = self.config.turn_limit(duel.config());
        if duel.state() == DuelState::InProgress && duel.turns() >= limit {
            tracing::warn!("Round {} hit the turn limit of {}", self.current + 1, limit);
            self.turn_limit_hit = true;
            duel.stop_game();
        }
        Some(report)
    }

    /// Stop the current duel; the next `advance` records it as aborted
    pub fn reset(&mut self) -> bool {
        if self.state != TournamentState::Running {
            return false;
        }
        self.duel.as_mut().is_some_and(Duel::stop_game)
    }

    // ========================================================================
    // LEVEL 3 - STEPS
    // ========================================================================

    /// Set up round `index`, skipping past rounds lost at placement
    fn begin_round(&mut self, index: usize) {
        let mut index = index;
        while index < self.rounds.len() {
            self.current = index;
            self.round_stats = [RobotStats::default(); 2];
            self.turn_limit_hit = false;

            let config = self.rounds[index].clone();
            let first = first_shooter_for(index);
            tracing::info!("Round {}/{}: {}, {} first", index + 1, self.rounds.len(), config, first);

            if let Some(duel) = self.duel.as_mut() {
                duel.reconfigure(config, first);
            }
            match self.place_fleets() {
                Ok(()) => return,
                Err(err) => {
                    self.record_disqualification(&err);
                    index += 1;
                }
            }
        }
        self.finish();
    }

    /// Prepare the duel under the placement policy
    fn place_fleets(&mut self) -> Result<(), DuelError> {
        let attempts = self.config.placement_policy.max_attempts();
        let Some(duel) = self.duel.as_mut() else {
            return Ok(());
        };

        let mut attempt = 1;
        loop {
            match duel.prepare() {
                Ok(_) => return Ok(()),
                Err(err @ DuelError::Placement { .. }) if attempt < attempts => {
                    tracing::warn!("Placement attempt {}/{} rejected: {}", attempt, attempts, err);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn record_disqualification(&mut self, err: &DuelError) {
        let winner = err.side().opponent();
        tracing::info!("Round {} forfeited: {}", self.current + 1, err);
        self.results.push(RoundResult {
            index: self.current,
            config: self.rounds[self.current].clone(),
            first_shooter: first_shooter_for(self.current),
            winner: Some(winner),
            end: RoundEnd::Disqualified,
            turns: 0,
            stats: self.round_stats,
        });
    }

    fn complete_round(&mut self) {
        let Some(duel) = self.duel.as_ref() else {
            return;
        };
        let Some(outcome) = duel.outcome() else {
            return;
        };

        let end = if self.turn_limit_hit {
            RoundEnd::TurnLimit
        } else {
            RoundEnd::from(outcome.reason)
        };
        let result = RoundResult {
            index: self.current,
            config: duel.config().clone(),
            first_shooter: duel.first_shooter(),
            winner: outcome.winner,
            end,
            turns: outcome.turns,
            stats: self.round_stats,
        };
        tracing::info!(
            "Round {} finished: {:?} after {} turns, winner {}",
            self.current + 1,
            end,
            outcome.turns,
            outcome.winner.map_or("none", |side| self.names[side.index()].as_str())
        );

        self.results.push(result);
        self.begin_round(self.current + 1);
    }

    fn finish(&mut self) {
        self.state = TournamentState::Finished;
        let report = self.report();
        tracing::info!(
            "Tournament finished: {} {} - {} {}",
            report.left.name,
            report.left.wins,
            report.right.wins,
            report.right.name
        );
    }

    fn duel_state(&self) -> Option<DuelState> {
        self.duel.as_ref().map(Duel::state)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::config::PlacementPolicy;
    use robowars_core::{
        DuelEvent, EventRecorder, Point, RandomStrategy, Rect, ScriptedStrategy, Size,
    };

    fn tiny_config() -> FieldConfiguration {
        FieldConfiguration::square(4, 1, Size::new(2, 1))
    }

    fn sniper() -> Box<ScriptedStrategy> {
        Box::new(ScriptedStrategy::new(
            "Sniper",
            vec![Rect::new(0, 2, 2, 1)],
            vec![Point::new(0, 0), Point::new(1, 0)],
        ))
    }

    fn sitting_duck() -> Box<ScriptedStrategy> {
        Box::new(ScriptedStrategy::new("Duck", vec![Rect::new(0, 0, 2, 1)], vec![]))
    }

    #[test]
    fn test_first_shooter_alternates() {
        let config = FieldConfiguration::square(6, 2, Size::new(2, 1));
        let mut tournament = Tournament::new(TournamentConfig::default());
        tournament
            .start(
                vec![config; 4],
                Box::new(RandomStrategy::with_seed(1)),
                Box::new(RandomStrategy::with_seed(2)),
            )
            .unwrap();
        let report = tournament.run_to_completion();

        let firsts: Vec<Side> = report.rounds.iter().map(|r| r.first_shooter).collect();
        assert_eq!(firsts, vec![Side::Left, Side::Right, Side::Left, Side::Right]);
        assert!(report.rounds.iter().all(|r| r.end == RoundEnd::FleetDestroyed));
        assert_eq!(report.left.wins + report.right.wins, 4);
    }

    #[test]
    fn test_stats_belong_to_the_shooter() {
        let mut tournament = Tournament::new(TournamentConfig::default());
        tournament.start(vec![tiny_config(); 2], sniper(), sitting_duck()).unwrap();
        let report = tournament.run_to_completion();

        // Round 0: left fires first and sinks the duck with two shots
        let first = &report.rounds[0];
        assert_eq!(first.winner, Some(Side::Left));
        assert_eq!(*first.stats_for(Side::Left), RobotStats { shots: 2, hits: 2, kills: 1, repeats: 0 });
        assert_eq!(first.stats_for(Side::Right).shots, 0);
        assert_eq!(first.stats_for(Side::Right).accuracy(), 100);

        // Round 1: the duck opens by firing outside the field
        let second = &report.rounds[1];
        assert_eq!(second.first_shooter, Side::Right);
        assert_eq!(second.winner, Some(Side::Left));
        assert_eq!(second.stats_for(Side::Right).shots, 1);
        assert_eq!(second.stats_for(Side::Right).accuracy(), 0);
        assert_eq!(second.turns, 3);

        assert_eq!(report.left.wins, 2);
        assert_eq!(report.left.accuracy, 100);
    }

    #[test]
    fn test_retry_policy_then_disqualification() {
        let recorder = EventRecorder::new();
        let cheat = Box::new(ScriptedStrategy::new("Cheat", vec![Rect::new(3, 3, 2, 1)], vec![]));
        let mut tournament = Tournament::new(TournamentConfig::default());
        tournament.add_observer(Box::new(recorder.clone()));
        tournament.start(vec![tiny_config()], sitting_duck(), cheat).unwrap();

        assert_eq!(tournament.state(), TournamentState::Finished);
        let rejected = recorder
            .events()
            .iter()
            .filter(|e| matches!(e, DuelEvent::PlacementRejected { .. }))
            .count();
        assert_eq!(rejected, 3);

        let round = &tournament.results()[0];
        assert_eq!(round.winner, Some(Side::Left));
        assert_eq!(round.end, RoundEnd::Disqualified);
        assert_eq!(round.turns, 0);
    }

    /// Panics on every placement request, counting them
    struct Fumbler {
        placements: Arc<AtomicUsize>,
    }

    impl Strategy for Fumbler {
        fn name(&self) -> &str {
            "Fumbler"
        }
        fn define_field(&mut self, _rect: Rect) {}
        fn define_ship_count(&mut self, _count: usize) {}
        fn define_allowed_ship_sizes(&mut self, _sizes: &[Size]) {}
        fn ship_placements(&mut self) -> Vec<Rect> {
            self.placements.fetch_add(1, Ordering::SeqCst);
            panic!("dropped the fleet")
        }
        fn next_shooting_position(&mut self) -> Point {
            Point::new(0, 0)
        }
    }

    #[test]
    fn test_placement_panic_disqualifies_without_retry() {
        let placements = Arc::new(AtomicUsize::new(0));
        let fumbler = Box::new(Fumbler {
            placements: Arc::clone(&placements),
        });
        let mut tournament = Tournament::new(TournamentConfig::default());
        tournament.start(vec![tiny_config()], fumbler, sitting_duck()).unwrap();

        assert_eq!(tournament.state(), TournamentState::Finished);
        assert_eq!(placements.load(Ordering::SeqCst), 1);
        let round = &tournament.results()[0];
        assert_eq!(round.winner, Some(Side::Right));
        assert_eq!(round.end, RoundEnd::Disqualified);
        assert_eq!(round.turns, 0);
    }

    #[test]
    fn test_disqualify_policy_moves_on() {
        let recorder = EventRecorder::new();
        let cheat = Box::new(ScriptedStrategy::new("Cheat", vec![], vec![]));
        let config = TournamentConfig::default().with_placement_policy(PlacementPolicy::Disqualify);
        let mut tournament = Tournament::new(config);
        tournament.add_observer(Box::new(recorder.clone()));
        tournament.start(vec![tiny_config(); 2], cheat, sitting_duck()).unwrap();

        let rejected = recorder
            .events()
            .iter()
            .filter(|e| matches!(e, DuelEvent::PlacementRejected { .. }))
            .count();
        assert_eq!(rejected, 2);
        let winners: Vec<_> = tournament.results().iter().map(|r| r.winner).collect();
        assert_eq!(winners, vec![Some(Side::Right), Some(Side::Right)]);
    }

    #[test]
    fn test_turn_limit_ends_round_without_winner() {
        let idle = || Box::new(ScriptedStrategy::new("Idle", vec![Rect::new(0, 0, 2, 1)], vec![]));
        let config = TournamentConfig::default().with_max_turns(10);
        let mut tournament = Tournament::new(config);
        tournament.start(vec![tiny_config()], idle(), idle()).unwrap();
        let report = tournament.run_to_completion();

        let round = &report.rounds[0];
        assert_eq!(round.end, RoundEnd::TurnLimit);
        assert_eq!(round.winner, None);
        assert_eq!(round.turns, 10);
        assert_eq!(round.stats_for(Side::Left).shots, 5);
        assert_eq!(report.undecided, 1);
    }

    #[test]
    fn test_control_surface() {
        let mut tournament = Tournament::new(TournamentConfig::default());
        assert!(!tournament.advance());
        tournament.start(vec![tiny_config()], sniper(), sitting_duck()).unwrap();
        assert_eq!(tournament.duel_state(), Some(DuelState::Ready));

        assert!(tournament.advance());
        assert_eq!(tournament.duel_state(), Some(DuelState::InProgress));
        assert!(tournament.advance());
        assert_eq!(tournament.duel_state(), Some(DuelState::Paused));
        assert!(tournament.tick().is_none());
        assert!(tournament.advance());
        assert_eq!(tournament.duel_state(), Some(DuelState::InProgress));

        tournament.tick();
        assert_eq!(tournament.round_stats(Side::Left).hits, 1);
        tournament.tick();
        assert_eq!(tournament.duel_state(), Some(DuelState::Finished));

        assert!(tournament.advance());
        assert_eq!(tournament.state(), TournamentState::Finished);
        assert_eq!(tournament.results().len(), 1);

        // Frozen
        assert!(!tournament.advance());
        assert!(tournament.tick().is_none());
        assert!(!tournament.reset());
        assert_eq!(tournament.results().len(), 1);
    }

    #[test]
    fn test_reset_records_aborted_round() {
        let mut tournament = Tournament::new(TournamentConfig::default());
        tournament.start(vec![tiny_config(); 2], sniper(), sitting_duck()).unwrap();
        tournament.advance();
        tournament.tick();
        assert!(tournament.reset());
        assert!(tournament.advance());

        let round = &tournament.results()[0];
        assert_eq!(round.end, RoundEnd::Aborted);
        assert_eq!(round.winner, None);
        assert_eq!(tournament.current_round(), 1);
        assert_eq!(tournament.duel_state(), Some(DuelState::Ready));
    }

    #[test]
    fn test_empty_and_invalid_rounds() {
        let mut tournament = Tournament::new(TournamentConfig::default());
        tournament.start(Vec::new(), sniper(), sitting_duck()).unwrap();
        assert_eq!(tournament.state(), TournamentState::Finished);
        assert!(tournament.results().is_empty());

        let broken = FieldConfiguration::new(Rect::new(0, 0, 4, 4), 0, vec![Size::new(1, 1)]);
        assert_eq!(
            tournament.start(vec![broken], sniper(), sitting_duck()),
            Err(ConfigError::NoShips)
        );
    }
}
