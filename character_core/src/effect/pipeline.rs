//! Status effect pipeline - per-turn ticking, expiry and passive suppression

use super::status::StatusEffect;
use crate::types::{SourceRef, Stat};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Result of one pipeline pass
#[derive(Debug, Clone, Default)]
pub struct TurnReport {
    /// Net health change from over-time effects
    pub health_delta: f64,
    /// Effects whose duration ran out this turn
    pub expired: Vec<StatusEffect>,
    /// Passive effects suppressed this turn
    pub banished: Vec<StatusEffect>,
    /// Passive effects brought back this turn
    pub restored: Vec<StatusEffect>,
}

/// Ordered active effects plus the passives currently suppressed
///
/// Insertion order is application order and is preserved through every pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusEffects {
    #[serde(default)]
    active: Vec<StatusEffect>,
    #[serde(default)]
    banished_passive: Vec<StatusEffect>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a newly applied effect
    pub fn add(&mut self, effect: StatusEffect) {
        trace!(
            status = %effect.status_effect_type,
            duration = effect.duration,
            source = %effect.source.name,
            "status effect added"
        );
        self.active.push(effect);
    }

    pub fn active(&self) -> &[StatusEffect] {
        &self.active
    }

    pub fn banished(&self) -> &[StatusEffect] {
        &self.banished_passive
    }

    /// Whether any effect, active or banished, came from `source`
    pub fn contains_source(&self, source: &SourceRef) -> bool {
        self.active
            .iter()
            .chain(&self.banished_passive)
            .any(|e| e.source.kind == source.kind && e.source.name == source.name)
    }

    pub fn is_stunned(&self) -> bool {
        self.active.iter().any(|e| matches!(e.kind, super::StatusKind::Stun))
    }

    pub fn passives_blocked(&self) -> bool {
        self.active.iter().any(StatusEffect::is_passive_block)
    }

    /// Strongest single modifier to `stat` among active boosts
    ///
    /// Boosts of the same stat do not add up; the largest one wins. Returns 0
    /// when nothing targets the stat.
    pub fn modifier_for(&self, stat: Stat, base: f64) -> f64 {
        self.active
            .iter()
            .filter_map(StatusEffect::as_boost)
            .filter_map(|boost| boost.modifier(stat, base))
            .fold(None, |best: Option<f64>, m| Some(best.map_or(m, |b| b.max(m))))
            .unwrap_or(0.0)
    }

    /// Run one turn of the pipeline
    ///
    /// 1. tick every active effect
    /// 2. split into still-running and expired, dropping the expired
    /// 3. with a `passive_block` running, move passive-sourced effects aside
    /// 4. without one, bring every banished effect back
    ///
    /// Banished effects are not ticked, so they return with the duration they
    /// had when suppressed.
    pub fn apply_turn(&mut self) -> TurnReport {
        let mut report = TurnReport::default();

        for effect in &mut self.active {
            report.health_delta += effect.tick().health_delta;
        }

        let (mut current, expired): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.active).into_iter().partition(StatusEffect::is_active);
        for effect in &expired {
            debug!(status = %effect.status_effect_type, source = %effect.source.name, "status effect expired");
        }
        report.expired = expired;

        if current.iter().any(StatusEffect::is_passive_block) {
            let (passives, kept): (Vec<_>, Vec<_>) = current.into_iter().partition(StatusEffect::is_passive);
            current = kept;
            for effect in &passives {
                debug!(status = %effect.status_effect_type, source = %effect.source.name, "passive effect banished");
            }
            self.banished_passive.extend(passives.iter().cloned());
            report.banished = passives;
        } else if !self.banished_passive.is_empty() {
            let restored = std::mem::take(&mut self.banished_passive);
            debug!(count = restored.len(), "passive effects restored");
            current.extend(restored.iter().cloned());
            report.restored = restored;
        }

        self.active = current;
        report
    }

    /// Drop everything, active and banished
    pub fn clear(&mut self) {
        self.active.clear();
        self.banished_passive.clear();
    }
}
