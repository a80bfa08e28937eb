//! Type effectiveness
//!
//! The classic eighteen-type interaction grid. Each side carries one or two
//! tags; a dual-type defender multiplies both axes, a dual-type attacker
//! picks its better type.

use serde::{Deserialize, Serialize};

/// Elemental type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

/// Separator between the two tags of a dual type
pub const TYPE_SEPARATOR: char = '/';

/// Multiplier applied when an immunity would otherwise stall the battle
pub const IMMUNITY_FLOOR: f32 = 0.25;

impl ElementType {
    pub const ALL: [ElementType; 18] = [
        ElementType::Normal,
        ElementType::Fire,
        ElementType::Water,
        ElementType::Electric,
        ElementType::Grass,
        ElementType::Ice,
        ElementType::Fighting,
        ElementType::Poison,
        ElementType::Ground,
        ElementType::Flying,
        ElementType::Psychic,
        ElementType::Bug,
        ElementType::Rock,
        ElementType::Ghost,
        ElementType::Dragon,
        ElementType::Dark,
        ElementType::Steel,
        ElementType::Fairy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ElementType::Normal => "normal",
            ElementType::Fire => "fire",
            ElementType::Water => "water",
            ElementType::Electric => "electric",
            ElementType::Grass => "grass",
            ElementType::Ice => "ice",
            ElementType::Fighting => "fighting",
            ElementType::Poison => "poison",
            ElementType::Ground => "ground",
            ElementType::Flying => "flying",
            ElementType::Psychic => "psychic",
            ElementType::Bug => "bug",
            ElementType::Rock => "rock",
            ElementType::Ghost => "ghost",
            ElementType::Dragon => "dragon",
            ElementType::Dark => "dark",
            ElementType::Steel => "steel",
            ElementType::Fairy => "fairy",
        }
    }

    /// Case-insensitive lookup. Empty, `unknown` and unrecognised names are `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|t| t.name() == s)
    }
}

/// Split a tag string like `"Fire / Flying"` into its usable types
pub fn parse_types(tag: &str) -> Vec<ElementType> {
    tag.split(TYPE_SEPARATOR)
        .filter_map(ElementType::parse)
        .collect()
}

/// Single-axis multiplier: 0, 0.5, 1 or 2. Unlisted pairs are neutral.
pub fn type_multiplier(attack: ElementType, defend: ElementType) -> f32 {
    use ElementType::*;
    match (attack, defend) {
        (Normal, Rock | Steel) => 0.5,
        (Normal, Ghost) => 0.0,

        (Fire, Grass | Ice | Bug | Steel) => 2.0,
        (Fire, Fire | Water | Rock | Dragon) => 0.5,

        (Water, Fire | Ground | Rock) => 2.0,
        (Water, Water | Grass | Dragon) => 0.5,

        (Electric, Water | Flying) => 2.0,
        (Electric, Electric | Grass | Dragon) => 0.5,
        (Electric, Ground) => 0.0,

        (Grass, Water | Ground | Rock) => 2.0,
        (Grass, Fire | Grass | Poison | Flying | Bug | Dragon | Steel) => 0.5,

        (Ice, Grass | Ground | Flying | Dragon) => 2.0,
        (Ice, Fire | Water | Ice | Steel) => 0.5,

        (Fighting, Normal | Ice | Rock | Dark | Steel) => 2.0,
        (Fighting, Poison | Flying | Psychic | Bug | Fairy) => 0.5,
        (Fighting, Ghost) => 0.0,

        (Poison, Grass | Fairy) => 2.0,
        (Poison, Poison | Ground | Rock | Ghost) => 0.5,
        (Poison, Steel) => 0.0,

        (Ground, Fire | Electric | Poison | Rock | Steel) => 2.0,
        (Ground, Grass | Bug) => 0.5,
        (Ground, Flying) => 0.0,

        (Flying, Grass | Fighting | Bug) => 2.0,
        (Flying, Electric | Rock | Steel) => 0.5,

        (Psychic, Fighting | Poison) => 2.0,
        (Psychic, Psychic | Steel) => 0.5,
        (Psychic, Dark) => 0.0,

        (Bug, Grass | Psychic | Dark) => 2.0,
        (Bug, Fire | Fighting | Poison | Flying | Ghost | Steel | Fairy) => 0.5,

        (Rock, Fire | Ice | Flying | Bug) => 2.0,
        (Rock, Fighting | Ground | Steel) => 0.5,

        (Ghost, Ghost | Psychic) => 2.0,
        (Ghost, Dark) => 0.5,
        (Ghost, Normal) => 0.0,

        (Dragon, Dragon) => 2.0,
        (Dragon, Steel) => 0.5,
        (Dragon, Fairy) => 0.0,

        (Dark, Psychic | Ghost) => 2.0,
        (Dark, Fighting | Dark | Fairy) => 0.5,

        (Steel, Ice | Rock | Fairy) => 2.0,
        (Steel, Fire | Water | Electric | Steel) => 0.5,

        (Fairy, Fighting | Dragon | Dark) => 2.0,
        (Fairy, Fire | Poison | Steel) => 0.5,

        _ => 1.0,
    }
}

/// Best multiplier the attacking side can get against the defending side.
///
/// For each attacking type the per-axis multipliers against every defending
/// type are multiplied together; the attacker keeps the maximum. Either side
/// without a usable type is neutral, and a full immunity is softened to
/// [`IMMUNITY_FLOOR`] so collision-only battles cannot stall.
pub fn best_multiplier(attack: &[ElementType], defend: &[ElementType]) -> f32 {
    if attack.is_empty() || defend.is_empty() {
        return 1.0;
    }

    let best = attack
        .iter()
        .map(|&att| {
            defend
                .iter()
                .map(|&def| type_multiplier(att, def))
                .product::<f32>()
        })
        .fold(f32::MIN, f32::max);

    if best == 0.0 { IMMUNITY_FLOOR } else { best }
}

/// [`best_multiplier`] straight from two tag strings
pub fn best_multiplier_for_tags(attack_tag: &str, defend_tag: &str) -> f32 {
    best_multiplier(&parse_types(attack_tag), &parse_types(defend_tag))
}
