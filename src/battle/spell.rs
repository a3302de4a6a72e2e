//! Cast actions offered during an encounter

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Projectile color, one per spell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectileColor {
    Red,
    Blue,
    Yellow,
    Green,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Spell {
    Fireball,
    IceShard,
    Lightning,
    Heal,
}

impl Spell {
    pub const ALL: [Spell; 4] = [Spell::Fireball, Spell::IceShard, Spell::Lightning, Spell::Heal];

    pub fn label(&self) -> &'static str {
        match self {
            Spell::Fireball => "Fireball",
            Spell::IceShard => "Ice Shard",
            Spell::Lightning => "Lightning",
            Spell::Heal => "Heal",
        }
    }

    pub fn color(&self) -> ProjectileColor {
        match self {
            Spell::Fireball => ProjectileColor::Red,
            Spell::IceShard => ProjectileColor::Blue,
            Spell::Lightning => ProjectileColor::Yellow,
            Spell::Heal => ProjectileColor::Green,
        }
    }
}

impl fmt::Display for Spell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Spell {
    type Err = String;

    /// Case-insensitive; spaces, dashes and underscores are ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        Spell::ALL
            .iter()
            .copied()
            .find(|spell| spell.label().replace(' ', "").to_lowercase() == wanted)
            .ok_or_else(|| format!("unknown spell: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_spell_has_own_color() {
        let colors: std::collections::HashSet<ProjectileColor> =
            Spell::ALL.iter().map(|s| s.color()).collect();
        assert_eq!(colors.len(), 4);
        assert_eq!(Spell::IceShard.color(), ProjectileColor::Blue);
    }

    #[test]
    fn test_parse_spell_names() {
        assert_eq!("fireball".parse::<Spell>().unwrap(), Spell::Fireball);
        assert_eq!("Ice Shard".parse::<Spell>().unwrap(), Spell::IceShard);
        assert_eq!("ice-shard".parse::<Spell>().unwrap(), Spell::IceShard);
        assert!("meteor".parse::<Spell>().is_err());
    }
}
