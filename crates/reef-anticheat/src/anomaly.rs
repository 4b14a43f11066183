use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Escalation state driven by cumulative anomaly flags: `1` flag warns,
/// `3` flags impose a timed cooldown, `5` flags disconnect the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    None,
    Warning,
    Cooldown,
    Disconnect,
}

fn escalation_for_flag_count(flags: u32) -> Escalation {
    if flags >= 5 {
        Escalation::Disconnect
    } else if flags >= 3 {
        Escalation::Cooldown
    } else if flags >= 1 {
        Escalation::Warning
    } else {
        Escalation::None
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct WeaponCounters {
    shots: u32,
    hits: u32,
}

/// Per-session, per-weapon shot/hit counters and the resulting z-score
/// escalation state. One instance lives on the session; only the
/// connection's own task mutates it.
#[derive(Debug, Default)]
pub struct AnomalyTracker {
    per_weapon: HashMap<String, WeaponCounters>,
    flag_count: u32,
    escalation: Escalation,
    cooldown_until: Option<Instant>,
}

impl AnomalyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_shot(&mut self, weapon: &str) {
        self.per_weapon.entry(weapon.to_string()).or_default().shots += 1;
    }

    pub fn record_hit(&mut self, weapon: &str) {
        self.per_weapon.entry(weapon.to_string()).or_default().hits += 1;
    }

    pub fn escalation(&self) -> Escalation {
        self.escalation
    }
    pub fn flag_count(&self) -> u32 {
        self.flag_count
    }
    pub fn is_cooling_down(&self, now: Instant) -> bool {
        self.cooldown_until.is_some_and(|until| now < until)
    }

    /// Computes the z-score for `weapon`'s observed hit rate against
    /// `expected_hit_rate`; if shots are below `min_shots` there isn't
    /// enough signal and no flag is raised. On `z > sigma_threshold`,
    /// records a flag and re-evaluates escalation.
    pub fn evaluate(
        &mut self,
        weapon: &str,
        expected_hit_rate: f64,
        sigma_threshold: f64,
        min_shots: u32,
        cooldown_duration: Duration,
        now: Instant,
    ) -> Escalation {
        let counters = self.per_weapon.entry(weapon.to_string()).or_default();
        if counters.shots < min_shots {
            return self.escalation;
        }
        let p_hat = counters.hits as f64 / counters.shots as f64;
        let p = expected_hit_rate.clamp(1e-9, 1.0 - 1e-9);
        let sigma = (p * (1.0 - p) / counters.shots as f64).sqrt();
        if sigma <= 0.0 {
            return self.escalation;
        }
        let z = (p_hat - p) / sigma;
        if z > sigma_threshold {
            self.flag_count += 1;
            let new_level = escalation_for_flag_count(self.flag_count);
            if new_level == Escalation::Cooldown {
                self.cooldown_until = Some(now + cooldown_duration);
            }
            self.escalation = new_level;
        }
        self.escalation
    }
}
