//! Decay Engine
//!
//! Recomputes entity scores on save, based on the time elapsed since each
//! entity was last touched and its importance pattern:
//! - `preference`: resonance slowly strengthens, never decays
//! - `strengthen`: trust and resonance both strengthen
//! - `time-based`: half-life style decay keyed to a one-week window
//! - `self-managed`: untouched
//!
//! Passes closer together than `min_interval` are skipped, so decay
//! granularity is hourly at finest.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use super::graph::KnowledgeGraph;
use super::metadata::{ImportancePattern, Metadata};

/// Source of "now" for the engine and the graph manager
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Hand-driven clock for tests and replays
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Decay tuning
#[derive(Debug, Clone)]
pub struct DecayConfig {
    /// Minimum spacing between two passes
    pub min_interval: Duration,
    /// Hours over which `time-based` resonance is multiplied by `decayRate` once
    pub reference_window_hours: f64,
    /// Lowest resonance decay can produce
    pub resonance_floor: f64,
    /// Per-pass resonance growth for `preference`
    pub preference_growth: f64,
    /// Per-pass trust growth for `strengthen`
    pub strengthen_trust_growth: f64,
    /// Per-pass resonance growth for `strengthen`
    pub strengthen_resonance_growth: f64,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::hours(1),
            reference_window_hours: 168.0, // one week
            resonance_floor: 0.1,
            preference_growth: 1.001,
            strengthen_trust_growth: 1.002,
            strengthen_resonance_growth: 1.001,
        }
    }
}

/// Outcome of one `DecayEngine::run` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayReport {
    /// False when the interval guard skipped the pass
    pub ran: bool,
    /// Entities whose scores were recomputed
    pub entities_decayed: usize,
    /// Clock reading taken for this call
    pub at: DateTime<Utc>,
}

/// Owns the timestamp of its last pass; one instance per process
pub struct DecayEngine {
    config: DecayConfig,
    clock: Arc<dyn Clock>,
    last_run: Option<DateTime<Utc>>,
}

impl DecayEngine {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_config(DecayConfig::default(), clock)
    }

    pub fn with_config(config: DecayConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            last_run: None,
        }
    }

    pub fn last_run(&self) -> Option<DateTime<Utc>> {
        self.last_run
    }

    /// Put the interval guard back to `last_run`, for a pass whose result
    /// was never persisted
    pub fn rewind(&mut self, last_run: Option<DateTime<Utc>>) {
        self.last_run = last_run;
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Whether a pass at `now` would be skipped by the interval guard
    pub fn is_throttled(&self, now: DateTime<Utc>) -> bool {
        match self.last_run {
            Some(last) => now - last < self.config.min_interval,
            None => false,
        }
    }

    /// Run a decay pass over the whole graph, unless throttled
    pub fn run(&mut self, graph: &mut KnowledgeGraph) -> DecayReport {
        let now = self.clock.now();

        if self.is_throttled(now) {
            tracing::debug!(last_run = ?self.last_run, "Decay pass skipped, ran less than an hour ago");
            return DecayReport {
                ran: false,
                entities_decayed: 0,
                at: now,
            };
        }

        let mut decayed = 0;
        for entity in &mut graph.entities {
            let hours = hours_between(entity.metadata.last_updated, now);
            if self.apply(&mut entity.metadata, hours) {
                decayed += 1;
            }
            entity.metadata.last_updated = now;
        }

        self.last_run = Some(now);
        tracing::debug!(entities = graph.entities.len(), decayed, "Decay pass complete");

        DecayReport {
            ran: true,
            entities_decayed: decayed,
            at: now,
        }
    }

    /// Apply the pattern's rule; returns false when the pattern is left alone
    pub fn apply(&self, metadata: &mut Metadata, hours_elapsed: f64) -> bool {
        match metadata.importance_pattern {
            ImportancePattern::Preference => {
                metadata.resonance = (metadata.resonance * self.config.preference_growth).min(1.0);
            }
            ImportancePattern::Strengthen => {
                metadata.trust = (metadata.trust * self.config.strengthen_trust_growth).min(1.0);
                metadata.resonance =
                    (metadata.resonance * self.config.strengthen_resonance_growth).min(1.0);
            }
            ImportancePattern::TimeBased => {
                metadata.resonance = self.time_decay(metadata.resonance, metadata.decay_rate(), hours_elapsed);
            }
            ImportancePattern::SelfManaged => return false,
        }
        true
    }

    /// `resonance * rate^(hours / window)`, floored
    pub fn time_decay(&self, resonance: f64, rate: f64, hours_elapsed: f64) -> f64 {
        let exponent = hours_elapsed.max(0.0) / self.config.reference_window_hours;
        (resonance * rate.powf(exponent))
            .max(self.config.resonance_floor)
            .min(1.0)
    }
}

fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    ((to - from).num_milliseconds() as f64 / 3_600_000.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::Entity;

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-05T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn graph_with(entity: Entity) -> KnowledgeGraph {
        let mut graph = KnowledgeGraph::empty(entity.metadata.created_at);
        graph.entities.push(entity);
        graph
    }

    #[test]
    fn test_time_based_one_week() {
        let clock = Arc::new(ManualClock::new(start()));
        let mut engine = DecayEngine::new(clock.clone());

        let entity = Entity::new("Build_Cache", "note", vec!["warm".into()], start());
        let mut graph = graph_with(entity);
        clock.advance(Duration::hours(168));

        let report = engine.run(&mut graph);
        assert!(report.ran);
        assert_eq!(report.entities_decayed, 1);
        assert!((graph.entities[0].metadata.resonance - 0.25).abs() < 1e-9);
        assert_eq!(graph.entities[0].metadata.last_updated, clock.now());
    }

    #[test]
    fn test_time_based_floor() {
        let engine = DecayEngine::new(Arc::new(SystemClock));
        let r = engine.time_decay(0.5, 0.5, 24.0 * 365.0 * 10.0);
        assert!((r - 0.1).abs() < 1e-12);
        let r = engine.time_decay(0.9, 0.01, f64::MAX);
        assert!((r - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_custom_decay_rate() {
        let engine = DecayEngine::new(Arc::new(SystemClock));
        let r = engine.time_decay(0.8, 0.25, 168.0);
        assert!((r - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_guard_prevents_double_decay() {
        let clock = Arc::new(ManualClock::new(start()));
        let mut engine = DecayEngine::new(clock.clone());
        let mut graph = graph_with(Entity::new("Log", "note", vec![], start()));

        clock.advance(Duration::hours(10));
        assert!(engine.run(&mut graph).ran);
        let after_first = graph.clone();

        clock.advance(Duration::minutes(59));
        let report = engine.run(&mut graph);
        assert!(!report.ran);
        assert_eq!(graph, after_first);

        clock.advance(Duration::minutes(1));
        assert!(engine.run(&mut graph).ran);
    }

    #[test]
    fn test_preference_and_strengthen_never_decrease() {
        let clock = Arc::new(ManualClock::new(start()));
        let mut engine = DecayEngine::new(clock.clone());

        let mut pref = Entity::new("Shell", "user_preference", vec!["prefers zsh".into()], start());
        pref.metadata.resonance = 0.999_5;
        let team = Entity::new("Crew", "team", vec![], start());
        let mut graph = graph_with(pref);
        graph.entities.push(team);

        let mut previous: Vec<(f64, f64)> = graph
            .entities
            .iter()
            .map(|e| (e.metadata.resonance, e.metadata.trust))
            .collect();

        for _ in 0..50 {
            clock.advance(Duration::hours(200));
            engine.run(&mut graph);
            for (entity, (res, trust)) in graph.entities.iter().zip(previous.iter()) {
                assert!(entity.metadata.resonance >= *res);
                assert!(entity.metadata.trust >= *trust);
                assert!(entity.metadata.resonance <= 1.0);
                assert!(entity.metadata.trust <= 1.0);
            }
            previous = graph
                .entities
                .iter()
                .map(|e| (e.metadata.resonance, e.metadata.trust))
                .collect();
        }
        assert_eq!(graph.entities[0].metadata.resonance, 1.0);
    }

    #[test]
    fn test_self_managed_untouched_but_restamped() {
        let clock = Arc::new(ManualClock::new(start()));
        let mut engine = DecayEngine::new(clock.clone());
        let mut entity = Entity::new("Me", "identity", vec![], start());
        entity.metadata.importance_pattern = ImportancePattern::SelfManaged;
        entity.metadata.resonance = 0.95;
        let mut graph = graph_with(entity);

        clock.advance(Duration::hours(500));
        let report = engine.run(&mut graph);
        assert_eq!(report.entities_decayed, 0);
        assert_eq!(graph.entities[0].metadata.resonance, 0.95);
        assert_eq!(graph.entities[0].metadata.last_updated, clock.now());
    }

    #[test]
    fn test_interval_measured_from_last_pass() {
        let clock = Arc::new(ManualClock::new(start()));
        let mut engine = DecayEngine::new(clock.clone());
        let mut graph = graph_with(Entity::new("Note", "note", vec![], start()));

        clock.advance(Duration::hours(84));
        engine.run(&mut graph);
        clock.advance(Duration::hours(84));
        engine.run(&mut graph);

        // two half-week passes compound to one full week
        assert!((graph.entities[0].metadata.resonance - 0.25).abs() < 1e-9);
    }
}
