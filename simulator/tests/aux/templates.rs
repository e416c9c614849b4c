use std::sync::Arc;

use models::{
    AbilityKind, AbilitySpec, CardCategory, CardEffect, DiceSpec, EffectKind, PersistenceScope,
    Rarity,
};
use rand::rngs::StdRng;
use simulator::{
    CardTemplate, Deck, Hero, HeroProfile, HeroTemplate, Monster, RulesConfig,
    TargetPolicy,
};

lazy_static::lazy_static! {
    pub static ref STRIKE_CARD_TEMPLATE: CardTemplate =
        CardTemplate::new("Strike", CardCategory::Melee, DiceSpec::new(1, 8));
    pub static ref SMASH_CARD_TEMPLATE: CardTemplate =
        CardTemplate::new("Smash", CardCategory::Melee, DiceSpec::new(3, 8));
    pub static ref JAB_CARD_TEMPLATE: CardTemplate =
        CardTemplate::new("Jab", CardCategory::Melee, DiceSpec::new(1, 4));
    pub static ref VOLLEY_CARD_TEMPLATE: CardTemplate =
        CardTemplate::new("Volley", CardCategory::Ranged, DiceSpec::new(1, 8));
    pub static ref BRACE_CARD_TEMPLATE: CardTemplate = CardTemplate {
        armor: 5,
        ..CardTemplate::new("Brace", CardCategory::Utility, DiceSpec::NONE)
    };
    pub static ref BLESSING_CARD_TEMPLATE: CardTemplate = CardTemplate {
        rarity: Rarity::Common,
        ..CardTemplate::new("Blessing", CardCategory::Melee, DiceSpec::new(2, 8))
    };
}

pub fn utility(
    name: &str,
    scope: PersistenceScope,
    effects: Vec<(EffectKind, u32)>,
) -> CardTemplate {
    CardTemplate {
        scope,
        effects: effects
            .into_iter()
            .map(|(kind, magnitude)| CardEffect::new(kind, magnitude))
            .collect(),
        ..CardTemplate::new(name, CardCategory::Utility, DiceSpec::NONE)
    }
}

pub fn with_effects(template: &CardTemplate, effects: Vec<(EffectKind, u32)>) -> CardTemplate {
    CardTemplate {
        effects: effects
            .into_iter()
            .map(|(kind, magnitude)| CardEffect::new(kind, magnitude))
            .collect(),
        ..template.clone()
    }
}

pub fn hero_profile(name: &str, max_hp: u64, cards: Vec<CardTemplate>) -> Arc<HeroProfile> {
    let template = HeroTemplate {
        name: name.to_string(),
        max_hp,
        fate_max: 10,
        starting_fate: 0,
        plate: 0,
        targeting: TargetPolicy::LowestHp,
        card_templates: cards,
        upgrade_templates: vec![],
    };
    let profile: HeroProfile = template.try_into().unwrap();
    Arc::new(profile)
}

/// A hero holding exactly `hand` in hand and nothing in the draw or discard pile.
pub fn hero_with_hand(
    max_hp: u64,
    hand: Vec<CardTemplate>,
    rules: &RulesConfig,
    rng: &mut StdRng,
) -> Hero {
    let profile = hero_profile("Tester", max_hp, vec![STRIKE_CARD_TEMPLATE.clone()]);
    let mut hero = Hero::new(profile, rules, rng);
    let count = hand.len();
    let cards = hand
        .into_iter()
        .rev()
        .map(|template| hero.mint_card(Arc::new(template), false))
        .collect();
    hero.deck = Deck::new(cards, rules.hand_capacity);
    hero.deck.draw(count, rng);
    hero
}

pub fn monster(name: &str, hp: u64, defense: u32, bands: [u32; 4]) -> Monster {
    Monster::new(0, name.to_string(), false, hp, defense, bands)
}

pub fn monster_with(
    name: &str,
    hp: u64,
    defense: u32,
    bands: [u32; 4],
    kind: AbilityKind,
    magnitude: u32,
) -> Monster {
    monster(name, hp, defense, bands).with_ability(Some(AbilitySpec { kind, magnitude }))
}

/// Numbers the monsters by their position in the wave.
pub fn wave_of(monsters: Vec<Monster>) -> Vec<Monster> {
    monsters
        .into_iter()
        .enumerate()
        .map(|(index, mut monster)| {
            monster.index = index;
            monster
        })
        .collect()
}
