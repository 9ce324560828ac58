//! Derived stats
//!
//! Everything here is computed on demand from the base stats, the active
//! stat boosts and the equipped items. Nothing is cached.

use super::Character;
use crate::config::DodgeConstants;
use crate::defense;
use crate::dice::{roll_pool, Dice};
use crate::types::Stat;
use rand::Rng;

impl Character {
    /// Strongest active boost to `stat`, or 0
    pub fn modifier_for(&self, stat: Stat) -> f64 {
        self.status_effects.modifier_for(stat, self.stats.get(stat))
    }

    /// Base value plus the strongest active boost
    pub fn stat(&self, stat: Stat) -> f64 {
        self.stats.get(stat) + self.modifier_for(stat)
    }

    pub fn strength(&self) -> f64 {
        self.stat(Stat::Strength)
    }

    pub fn endurance(&self) -> f64 {
        self.stat(Stat::Endurance)
    }

    pub fn focus(&self) -> f64 {
        self.stat(Stat::Focus)
    }

    pub fn willpower(&self) -> f64 {
        self.stat(Stat::Willpower)
    }

    pub fn agility(&self) -> f64 {
        self.stat(Stat::Agility)
    }

    /// Pool maxima never drop below zero, whatever the active debuffs
    pub fn max_health(&self) -> f64 {
        ((self.strength() + self.endurance()) * 5.0).max(0.0)
    }

    pub fn max_mana(&self) -> f64 {
        ((self.focus() + self.willpower()) * 5.0).max(0.0)
    }

    pub fn max_stamina(&self) -> f64 {
        (self.endurance() * 10.0).max(0.0)
    }

    pub fn speed(&self) -> f64 {
        self.agility().max(self.strength() / 2.0) / 2.0 + 5.0
    }

    pub fn physical_defense(&self) -> f64 {
        self.endurance() * 0.1 + self.equipment.total_physical_defense()
    }

    pub fn magic_defense(&self) -> f64 {
        self.willpower() * 0.1 + self.equipment.total_magic_defense()
    }

    pub fn physical_attack(&self) -> f64 {
        self.strength() * 2.0 + self.equipment.total_physical_attack()
    }

    pub fn magic_attack(&self) -> f64 {
        self.focus() * 2.0 + self.equipment.total_magic_attack()
    }

    pub fn basic_attack_type(&self) -> &str {
        &self.default_basic_attack_type
    }

    /// Default dice followed by every equipped item's attack dice
    pub fn basic_attack_dice(&self) -> Vec<Dice> {
        let mut dice = self.default_basic_attack_dice.clone();
        dice.extend(self.equipment.attack_dice());
        dice
    }

    pub fn defense_dice(&self) -> Vec<Dice> {
        self.equipment.defense_dice()
    }

    pub fn roll_basic_attack(&self, rng: &mut impl Rng) -> u32 {
        roll_pool(&self.basic_attack_dice(), rng)
    }

    pub fn roll_defense(&self, rng: &mut impl Rng) -> u32 {
        roll_pool(&self.defense_dice(), rng)
    }

    /// Chance to dodge an attack from `opponent`
    pub fn dodge_chance(&self, opponent: &Character) -> f64 {
        defense::dodge_chance(self.speed(), opponent.speed())
    }

    pub fn dodge_chance_with(&self, opponent: &Character, constants: &DodgeConstants) -> f64 {
        defense::dodge_chance_with(self.speed(), opponent.speed(), constants)
    }

    /// Experience granted for defeating this character
    ///
    /// The configured value when set, otherwise ten times the mean attribute
    /// plus two per level.
    pub fn rewarded_exp(&self) -> f64 {
        self.rewarded_exp
            .unwrap_or_else(|| self.stats.attribute_mean() * 10.0 + self.level as f64 * 2.0)
    }
}

#[cfg(test)]
mod tests {
    use crate::character::Character;
    use crate::dice::Dice;
    use crate::effect::StatusEffect;
    use crate::item::{EquipmentItem, ItemData};
    use crate::stat_block::StatBlock;
    use crate::types::{SourceRef, Stat};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hero() -> Character {
        Character::new("Hero", StatBlock::new(8, 10, 5, 5, 6))
    }

    #[test]
    fn test_derived_from_base_stats() {
        let hero = hero();
        assert!((hero.max_health() - 90.0).abs() < f64::EPSILON);
        assert!((hero.max_mana() - 50.0).abs() < f64::EPSILON);
        assert!((hero.max_stamina() - 100.0).abs() < f64::EPSILON);
        // max(6, 4) / 2 + 5
        assert!((hero.speed() - 8.0).abs() < f64::EPSILON);
        assert!((hero.physical_attack() - 16.0).abs() < f64::EPSILON);
        assert!((hero.magic_attack() - 10.0).abs() < f64::EPSILON);
        assert!((hero.magic_defense() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_chest_piece_adds_defense() {
        let mut hero = hero();
        hero.add_to_inventory(EquipmentItem::new(ItemData::new("Breastplate", "armor"), "chest").with_physical(0.0, 2.0));
        hero.equip("Breastplate").unwrap();
        assert!((hero.physical_defense() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_boosts_feed_derived_stats() {
        let mut hero = hero();
        let source = SourceRef::skill("Cheer", false);
        hero.add_status_effect(StatusEffect::stat_boost(&[Stat::Strength], 5.0, 3, source.clone()));
        hero.add_status_effect(StatusEffect::stat_boost(&[Stat::Strength], 12.0, 3, source));

        assert!((hero.modifier_for(Stat::Strength) - 12.0).abs() < f64::EPSILON);
        assert!((hero.strength() - 20.0).abs() < f64::EPSILON);
        assert!((hero.max_health() - 150.0).abs() < f64::EPSILON);
        assert_eq!(hero.stats.strength, 8);
    }

    #[test]
    fn test_heavy_debuff_floors_pool_maxima() {
        let mut hero = hero();
        let curse = SourceRef::skill("Wither", false);
        hero.add_status_effect(StatusEffect::stat_boost(
            &[Stat::Strength, Stat::Endurance, Stat::Focus, Stat::Willpower],
            -20.0,
            3,
            curse,
        ));

        assert!((hero.strength() + 12.0).abs() < f64::EPSILON);
        assert_eq!(hero.max_health(), 0.0);
        assert_eq!(hero.max_mana(), 0.0);
        assert_eq!(hero.max_stamina(), 0.0);
        assert_eq!(hero.health(), 0.0);
        assert!(hero.is_incapacitated());
    }

    #[test]
    fn test_basic_attack_dice_include_weapon() {
        let mut hero = hero();
        assert_eq!(hero.basic_attack_dice(), vec![Dice::new(1, 6)]);
        assert!(hero.defense_dice().is_empty());

        hero.add_to_inventory(
            EquipmentItem::new(ItemData::new("Fire Sword", "weapon"), "main_hand").with_attack_dice(Dice::new(1, 4)),
        );
        hero.equip("Fire Sword").unwrap();
        assert_eq!(hero.basic_attack_dice(), vec![Dice::new(1, 6), Dice::new(1, 4)]);

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            assert!((2..=10).contains(&hero.roll_basic_attack(&mut rng)));
        }
        assert_eq!(hero.roll_defense(&mut rng), 0);
    }

    #[test]
    fn test_dodge_at_parity() {
        let a = hero();
        let b = hero();
        assert!(a.dodge_chance(&b) < 0.5);
    }

    #[test]
    fn test_rewarded_exp() {
        // mean of (8, 10, 5, 5, 6, 0, 0) is 34/7
        let hero = hero().with_level(3);
        let expected = 34.0 / 7.0 * 10.0 + 6.0;
        assert!((hero.rewarded_exp() - expected).abs() < 1e-9);

        let boss = hero.with_rewarded_exp(500.0);
        assert!((boss.rewarded_exp() - 500.0).abs() < f64::EPSILON);
    }

    proptest! {
        #[test]
        fn prop_faster_character_dodges_more(agility in 0u32..60, extra in 0u32..60, opponent_agility in 0u32..60) {
            let slow = Character::new("Slow", StatBlock::new(1, 1, 1, 1, agility));
            let fast = Character::new("Fast", StatBlock::new(1, 1, 1, 1, agility + extra));
            let opponent = Character::new("Foe", StatBlock::new(1, 1, 1, 1, opponent_agility));

            let slow_chance = slow.dodge_chance(&opponent);
            let fast_chance = fast.dodge_chance(&opponent);
            prop_assert!((0.0..=1.0).contains(&slow_chance));
            prop_assert!(fast_chance >= slow_chance);
        }
    }
}
