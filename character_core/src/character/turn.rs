//! Turn flow - effect application, the status pipeline, recovery and skill use

use super::Character;
use crate::defense::absorb_with_barrier;
use crate::effect::{Effect, EffectAction, StatusEffect, TurnReport};
use crate::skill::{Skill, SkillCost, SkillError};
use crate::types::{Resource, SourceRef, Stat};
use rand::Rng;
use tracing::{debug, trace};

/// What happened when an effect landed
#[derive(Debug, Clone, PartialEq)]
pub enum EffectOutcome {
    /// Instantaneous damage; `absorbed` went into a barrier
    Damaged { taken: f64, absorbed: f64 },
    /// Instantaneous heal, after clamping
    Healed { amount: f64 },
    /// The effect lingers as a status effect
    StatusAdded,
}

impl Character {
    /// Append a status effect to the active list
    pub fn add_status_effect(&mut self, effect: StatusEffect) {
        self.status_effects.add(effect);
        self.clamp_pools();
    }

    pub fn is_stunned(&self) -> bool {
        self.status_effects.is_stunned()
    }

    /// Land an effect on this character
    ///
    /// Instantaneous damage hits the magic barrier when tagged `magic` and the
    /// physical barrier otherwise, then health. Instantaneous heals restore
    /// health. Everything else becomes a status effect.
    pub fn apply_effect(&mut self, effect: &Effect, source: SourceRef, rng: &mut impl Rng) -> EffectOutcome {
        let magnitude = effect.roll_magnitude(rng);

        if let Some(status) = effect.to_status_effect(magnitude, source) {
            self.add_status_effect(status);
            return EffectOutcome::StatusAdded;
        }

        match effect.action {
            EffectAction::Damage => {
                let (taken, absorbed) = self.take_damage(magnitude, effect.tags.contains("magic"));
                debug!(character = %self.name, taken, absorbed, health = self.current_health, "damaged");
                EffectOutcome::Damaged { taken, absorbed }
            }
            _ => {
                let before = self.current_health;
                self.set_health(before + magnitude.max(0.0));
                let amount = self.current_health - before;
                debug!(character = %self.name, amount, health = self.current_health, "healed");
                EffectOutcome::Healed { amount }
            }
        }
    }

    /// Returns (taken, absorbed)
    fn take_damage(&mut self, damage: f64, magic: bool) -> (f64, f64) {
        let barrier = (if magic { self.magic_barrier } else { self.physical_barrier }).max(0.0);
        let (taken, left) = absorb_with_barrier(barrier, damage);
        if magic {
            self.magic_barrier = left;
        } else {
            self.physical_barrier = left;
        }
        self.set_health(self.current_health - taken);
        (taken, barrier - left)
    }

    /// Run the status effect pipeline once
    pub fn apply_status_effects(&mut self) -> TurnReport {
        let report = self.status_effects.apply_turn();
        self.clamp_pools();
        if report.health_delta != 0.0 {
            self.set_health(self.current_health + report.health_delta);
            trace!(character = %self.name, delta = report.health_delta, "over-time effects");
        }
        report
    }

    pub fn recover_stamina(&mut self) {
        let rate = self.stat(Stat::StaminaRecoveryRate).max(0.0);
        self.set_stamina(self.current_stamina + self.max_stamina() * rate);
    }

    pub fn recover_mana(&mut self) {
        let rate = self.stat(Stat::ManaRecoveryRate).max(0.0);
        self.set_mana(self.current_mana + self.max_mana() * rate);
    }

    /// Start-of-turn processing: the status pipeline, then recovery
    pub fn apply_turn_effects(&mut self) -> TurnReport {
        let report = self.apply_status_effects();
        self.recover_stamina();
        self.recover_mana();
        report
    }

    /// Put the effects of every switched-on passive skill in place
    ///
    /// Skips passives whose effects are already active or banished. Returns
    /// the number of status effects added.
    pub fn apply_passive_skills(&mut self) -> usize {
        let Some(class) = self.character_class.as_ref() else {
            return 0;
        };

        let pending: Vec<StatusEffect> = class
            .skills()
            .iter()
            .filter(|skill| skill.is_passive && skill.toggled_on)
            .filter(|skill| !self.status_effects.contains_source(&skill.source_ref()))
            .flat_map(|skill| {
                let source = skill.source_ref();
                skill
                    .effects
                    .iter()
                    .filter_map(move |effect| effect.to_status_effect(effect.value, source.clone()))
            })
            .collect();

        let added = pending.len();
        for status in pending {
            self.add_status_effect(status);
        }
        added
    }

    fn pool(&self, resource: Resource) -> f64 {
        match resource {
            Resource::Mana => self.current_mana,
            Resource::Stamina => self.current_stamina,
            Resource::Health => self.current_health,
        }
    }

    pub fn can_afford(&self, cost: &SkillCost) -> bool {
        self.pool(cost.resource) >= cost.amount
    }

    /// Spend a skill's cost from its pool
    pub fn pay_cost(&mut self, cost: &SkillCost) -> Result<(), SkillError> {
        let available = self.pool(cost.resource);
        if !self.can_afford(cost) {
            return Err(SkillError::InsufficientResource {
                resource: cost.resource,
                cost: cost.amount,
                available,
            });
        }
        let remaining = available - cost.amount;
        match cost.resource {
            Resource::Mana => self.set_mana(remaining),
            Resource::Stamina => self.set_stamina(remaining),
            Resource::Health => self.set_health(remaining),
        }
        Ok(())
    }

    /// Pay for a class skill and grant it experience from use against `opponent`
    ///
    /// `Ok(None)` when there is no class or no such skill. Nothing is paid
    /// when the cost cannot be afforded. A level-up rejected by a formula
    /// leaves the skill at its last good level; the use still counts.
    pub fn use_skill(
        &mut self,
        skill_name: &str,
        opponent: &Character,
        base_exp: f64,
    ) -> Result<Option<&Skill>, SkillError> {
        let cost = match self.character_class.as_ref().and_then(|class| class.skill(skill_name)) {
            Some(skill) => skill.cost.clone(),
            None => return Ok(None),
        };
        self.pay_cost(&cost)?;
        debug!(character = %self.name, skill = skill_name, cost = cost.amount, "skill used");

        let Some(class) = self.character_class.as_mut() else {
            return Ok(None);
        };
        if let Err(err) = class
            .use_skill(skill_name, base_exp, opponent.level, self.level, &self.stats, &opponent.stats)
            .map(|_| ())
        {
            debug!(character = %self.name, skill = skill_name, error = %err, "skill stays at its level");
        }
        Ok(class.skill(skill_name))
    }
}

#[cfg(test)]
mod tests {
    use crate::character::{Character, EffectOutcome};
    use crate::effect::{Effect, StatusEffect, PASSIVE_BLOCK};
    use crate::formula::Formula;
    use crate::skill::{CharacterClass, Skill, SkillError};
    use crate::stat_block::StatBlock;
    use crate::types::{Resource, SourceRef, Stat};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hero() -> Character {
        Character::new("Hero", StatBlock::new(8, 10, 5, 5, 6))
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn aura_class() -> CharacterClass {
        let mut class = CharacterClass::new("Captain", "");
        class.add_skill(
            Skill::new("Leadership Aura", "")
                .with_effect(Effect::boost(&[Stat::Strength], 2.0, 999))
                .passive(),
        );
        class.add_skill(
            Skill::new("Blast", "")
                .with_cost(Resource::Mana, 8.0, Formula::parse("x*1.1").unwrap())
                .with_effect(Effect::damage(14.0)),
        );
        class
    }

    #[test]
    fn test_damage_goes_through_matching_barrier() {
        let mut hero = hero();
        hero.set_physical_barrier(5.0);
        hero.set_magic_barrier(100.0);

        let outcome = hero.apply_effect(&Effect::damage(12.0), SourceRef::skill("Slash", false), &mut rng());
        assert_eq!(outcome, EffectOutcome::Damaged { taken: 7.0, absorbed: 5.0 });
        assert!((hero.health() - 83.0).abs() < f64::EPSILON);
        assert_eq!(hero.physical_barrier(), 0.0);

        let bolt = Effect::damage(30.0).with_tag("magic");
        hero.apply_effect(&bolt, SourceRef::skill("Bolt", false), &mut rng());
        assert!((hero.magic_barrier() - 70.0).abs() < f64::EPSILON);
        assert!((hero.health() - 83.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut hero = hero();
        hero.set_health(80.0);
        let outcome = hero.apply_effect(&Effect::heal(20.0), SourceRef::item("Health Potion"), &mut rng());
        assert_eq!(outcome, EffectOutcome::Healed { amount: 10.0 });
        assert!((hero.health() - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lingering_effects_become_status() {
        let mut hero = hero();
        let source = SourceRef::skill("Hypnotise", false);
        let outcome = hero.apply_effect(&Effect::stun(1), source, &mut rng());
        assert_eq!(outcome, EffectOutcome::StatusAdded);
        assert!(hero.is_stunned());

        hero.apply_turn_effects();
        assert!(!hero.is_stunned());
    }

    #[test]
    fn test_damage_over_time_ticks() {
        let mut hero = hero();
        let burn = Effect::damage(4.0).with_duration(2);
        hero.apply_effect(&burn, SourceRef::skill("Ignite", false), &mut rng());
        assert!((hero.health() - 90.0).abs() < f64::EPSILON);

        hero.apply_turn_effects();
        hero.apply_turn_effects();
        hero.apply_turn_effects();
        assert!((hero.health() - 82.0).abs() < f64::EPSILON);
        assert!(hero.status_effects().active().is_empty());
    }

    #[test]
    fn test_boost_expiry_clamps_health() {
        let mut hero = hero();
        hero.add_status_effect(StatusEffect::stat_boost(&[Stat::Strength], 10.0, 1, SourceRef::skill("Cheer", false)));
        hero.refill_pools();
        assert!((hero.health() - 140.0).abs() < f64::EPSILON);

        hero.apply_turn_effects();
        assert!((hero.health() - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_turn_recovery() {
        let mut hero = hero();
        hero.set_mana(0.0);
        hero.set_stamina(95.0);
        hero.apply_turn_effects();
        assert!((hero.mana() - 5.0).abs() < 1e-9);
        assert!((hero.stamina() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_passive_skills_apply_once() {
        let mut hero = hero();
        assert_eq!(hero.apply_passive_skills(), 0);

        hero.assign_class(aura_class());
        assert_eq!(hero.apply_passive_skills(), 1);
        assert_eq!(hero.apply_passive_skills(), 0);
        assert!((hero.strength() - 10.0).abs() < f64::EPSILON);

        let aura = &hero.status_effects().active()[0];
        assert!(aura.is_passive());
        assert_eq!(aura.source.owner, Some(hero.id()));
    }

    #[test]
    fn test_toggled_off_passive_is_skipped() {
        let mut hero = hero();
        let mut class = aura_class();
        class.skill_mut("Leadership Aura").unwrap().toggled_on = false;
        hero.assign_class(class);
        assert_eq!(hero.apply_passive_skills(), 0);
    }

    #[test]
    fn test_passive_block_banishes_and_restores() {
        let mut hero = hero();
        hero.assign_class(aura_class());
        hero.apply_passive_skills();

        hero.add_status_effect(StatusEffect::passive_block(2, SourceRef::skill("Silence", false)));
        hero.apply_turn_effects();
        assert_eq!(hero.modifier_for(Stat::Strength), 0.0);
        assert_eq!(hero.status_effects().banished().len(), 1);
        // Banished passives are not re-applied
        assert_eq!(hero.apply_passive_skills(), 0);

        hero.apply_turn_effects();
        assert!((hero.modifier_for(Stat::Strength) - 2.0).abs() < f64::EPSILON);
        assert_eq!(hero.status_effects().active()[0].duration, 998);
        assert!(!hero.status_effects().active().iter().any(|e| e.status_effect_type == PASSIVE_BLOCK));
    }

    #[test]
    fn test_use_skill_pays_and_levels() {
        let mut hero = hero();
        let foe = Character::new("Goblin", StatBlock::new(8, 10, 5, 5, 6));
        assert!(hero.use_skill("Blast", &foe, 100.0).unwrap().is_none());

        hero.assign_class(aura_class());
        let skill = hero.use_skill("Blast", &foe, 100.0).unwrap().unwrap();
        assert_eq!(skill.level, 2);
        assert!((skill.cost.amount - 8.8).abs() < 1e-12);
        assert!((hero.mana() - 42.0).abs() < f64::EPSILON);

        assert!(hero.use_skill("Fireball", &foe, 100.0).unwrap().is_none());
    }

    #[test]
    fn test_use_skill_refused_when_broke() {
        let mut hero = hero();
        hero.assign_class(aura_class());
        hero.set_mana(3.0);
        let foe = hero.clone();

        let err = hero.use_skill("Blast", &foe, 100.0).unwrap_err();
        assert!(matches!(err, SkillError::InsufficientResource { resource: Resource::Mana, .. }));
        assert!((hero.mana() - 3.0).abs() < f64::EPSILON);
        assert_eq!(hero.character_class().unwrap().skill("Blast").unwrap().level, 1);
    }

    #[test]
    fn test_debuff_effect_does_not_break_pools() {
        let mut hero = hero();
        let hex = Effect::boost(&[Stat::Strength, Stat::Endurance], -20.0, 3);
        let outcome = hero.apply_effect(&hex, SourceRef::skill("Hex", false), &mut rng());
        assert_eq!(outcome, EffectOutcome::StatusAdded);
        assert_eq!(hero.max_health(), 0.0);
        assert_eq!(hero.health(), 0.0);
        assert_eq!(hero.stamina(), 0.0);

        hero.apply_turn_effects();
        assert_eq!(hero.stamina(), 0.0);
    }

    #[test]
    fn test_use_skill_survives_rejected_level_up() {
        let mut hero = hero();
        let foe = hero.clone();
        let mut class = CharacterClass::new("Unstable", "");
        class.add_skill(
            Skill::new("Rift", "")
                .with_cost(Resource::Mana, 8.0, Formula::identity())
                .with_effect(Effect::damage(14.0).with_formula(Formula::parse("x/(level-2)").unwrap())),
        );
        hero.assign_class(class);

        for expected_mana in [42.0, 34.0, 26.0] {
            let rift = hero.use_skill("Rift", &foe, 100.0).unwrap().unwrap();
            assert_eq!(rift.level, 1);
            assert!((rift.effects[0].value - 14.0).abs() < f64::EPSILON);
            assert!((hero.mana() - expected_mana).abs() < f64::EPSILON);
        }
    }

    #[derive(Debug, Clone)]
    enum Action {
        Damage(f64),
        Heal(f64),
        Mana(f64),
        Boost(f64),
        Turn,
    }

    fn action() -> impl Strategy<Value = Action> {
        prop_oneof![
            (0.0f64..200.0).prop_map(Action::Damage),
            (0.0f64..200.0).prop_map(Action::Heal),
            (-100.0f64..200.0).prop_map(Action::Mana),
            (-40.0f64..20.0).prop_map(Action::Boost),
            Just(Action::Turn),
        ]
    }

    proptest! {
        #[test]
        fn prop_pools_stay_within_bounds(actions in prop::collection::vec(action(), 1..40)) {
            let mut hero = hero();
            let mut rng = rng();
            let source = SourceRef::skill("Test", false);

            for action in actions {
                match action {
                    Action::Damage(v) => { hero.apply_effect(&Effect::damage(v), source.clone(), &mut rng); }
                    Action::Heal(v) => { hero.apply_effect(&Effect::heal(v), source.clone(), &mut rng); }
                    Action::Mana(v) => hero.set_mana(v),
                    Action::Boost(v) => hero.add_status_effect(
                        StatusEffect::stat_boost(&[Stat::Endurance, Stat::Focus], v, 2, source.clone()),
                    ),
                    Action::Turn => { hero.apply_turn_effects(); }
                }
                prop_assert!(hero.health() >= 0.0 && hero.health() <= hero.max_health());
                prop_assert!(hero.mana() >= 0.0 && hero.mana() <= hero.max_mana());
                prop_assert!(hero.stamina() >= 0.0 && hero.stamina() <= hero.max_stamina());
            }
        }
    }
}
