//! Character class configuration loading

use super::ConfigError;
use crate::skill::CharacterClass;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// Container for class configurations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassesConfig {
    #[serde(rename = "classes")]
    pub classes: Vec<CharacterClass>,
}

fn into_class_map(config: ClassesConfig) -> Result<HashMap<String, CharacterClass>, ConfigError> {
    let mut map = HashMap::new();
    for mut class in config.classes {
        class.validate().map_err(ConfigError::ValidationError)?;
        class.prepare();
        if map.contains_key(&class.name) {
            return Err(ConfigError::ValidationError(format!("duplicate class '{}'", class.name)));
        }
        map.insert(class.name.clone(), class);
    }
    Ok(map)
}

/// Load class configurations from a TOML file
pub fn load_class_configs(path: &Path) -> Result<HashMap<String, CharacterClass>, ConfigError> {
    let config: ClassesConfig = super::load_toml(path)?;
    into_class_map(config)
}

/// Load class configurations from a TOML string
pub fn parse_class_configs(content: &str) -> Result<HashMap<String, CharacterClass>, ConfigError> {
    let config: ClassesConfig = super::parse_toml(content)?;
    into_class_map(config)
}

/// Load a single class from its JSON dump
pub fn parse_class_json(content: &str) -> Result<CharacterClass, ConfigError> {
    let mut class: CharacterClass = serde_json::from_str(content)?;
    class.validate().map_err(ConfigError::ValidationError)?;
    class.prepare();
    Ok(class)
}

/// Get the bundled class configurations
pub fn default_classes() -> HashMap<String, CharacterClass> {
    let toml = include_str!("../../config/classes.toml");
    parse_class_configs(toml).unwrap_or_else(|err| {
        warn!(error = %err, "bundled class config failed to load");
        HashMap::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::EffectAction;
    use crate::types::{Resource, Stat, TargetGroup};

    #[test]
    fn test_parse_classes() {
        let toml = r#"
[[classes]]
name = "Brawler"
description = "Hits things"

[[classes.skills]]
name = "Jab"
target_group = "single_enemy"

[classes.skills.cost]
resource = "stamina"
amount = 4
level_up_formula = "x+1"

[[classes.skills.effects]]
action = "damage"
value = 6
dice = ["1d4"]
"#;

        let classes = parse_class_configs(toml).unwrap();
        let brawler = &classes["Brawler"];
        let jab = brawler.skill("Jab").unwrap();
        assert_eq!(jab.cost.resource, Resource::Stamina);
        assert!((jab.cost.amount - 4.0).abs() < f64::EPSILON);
        assert_eq!(jab.target_group, TargetGroup::SingleEnemy);
        assert_eq!(jab.effects[0].dice.len(), 1);
        assert_eq!(jab.effects[0].source.as_ref().unwrap().name, "Jab");
        assert!((jab.level_requirement(2) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bad_formula_fails_to_load() {
        let toml = r#"
[[classes]]
name = "Cheat"

[[classes.skills]]
name = "Exploit"

[classes.skills.cost]
level_up_formula = "__import__('os')"
"#;
        assert!(matches!(parse_class_configs(toml), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_duplicate_skill_fails_validation() {
        let toml = r#"
[[classes]]
name = "Twin"

[[classes.skills]]
name = "Jab"

[[classes.skills]]
name = "Jab"
"#;
        assert!(matches!(parse_class_configs(toml), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_duplicate_class_fails_validation() {
        let toml = r#"
[[classes]]
name = "Twin"

[[classes]]
name = "Twin"
"#;
        assert!(matches!(parse_class_configs(toml), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_default_classes() {
        let classes = default_classes();
        let adept = &classes["Arcane Adept"];
        assert_eq!(adept.skills().len(), 8);

        let blast = adept.skill("Blast").unwrap();
        assert!((blast.cost.amount - 8.0).abs() < f64::EPSILON);
        assert_eq!(blast.effects[0].action, EffectAction::Damage);
        assert!(blast.effects[0].tags.contains("fire"));

        let limit_break = adept.skill("Limit Break").unwrap();
        assert_eq!(limit_break.target_group, TargetGroup::OwnSelf);
        assert_eq!(limit_break.effects[0].boost_percentage, Some(1.1));
        assert_eq!(limit_break.effects[0].stat_names.len(), 4);

        let aura = adept.skill("Leadership Aura").unwrap();
        assert!(aura.is_passive);
        assert!(aura.effects[0].source.as_ref().unwrap().is_passive);
        assert!(aura.effects[0].stat_names.contains(&Stat::Willpower));
    }

    #[test]
    fn test_class_json_round_trip() {
        let adept = default_classes().remove("Arcane Adept").unwrap();
        let json = serde_json::to_string(&adept).unwrap();
        let back = parse_class_json(&json).unwrap();
        assert_eq!(back, adept);
    }
}
