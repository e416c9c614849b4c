mod aux;

use aux::{
    BRACE_CARD_TEMPLATE, STRIKE_CARD_TEMPLATE, VOLLEY_CARD_TEMPLATE, hero_with_hand, monster,
    run_exchange, seeded_rng, utility, wave_of, with_effects,
};
use std::collections::HashSet;

use models::{CardCategory, CardEffect, DiceSpec, EffectKind, PersistenceScope};
use rand::{SeedableRng, rngs::StdRng};
use rstest::rstest;
use simulator::{
    ArmorPolicy, CardTemplate, CombatEvent, CombatLog, ExchangeOutcome, ExchangePhase,
    RulesConfig, TaggedCombatEvent, TargetPolicy,
};

fn position(events: &[TaggedCombatEvent], event: &CombatEvent) -> Option<usize> {
    events.iter().position(|tagged| &tagged.1 == event)
}

fn attack_targets(log: &CombatLog) -> Vec<String> {
    log.events()
        .iter()
        .filter_map(|tagged| match &tagged.1 {
            CombatEvent::Attack { target, .. } => Some(target.clone()),
            _ => None,
        })
        .collect()
}

/// Two monsters that always strike for the same amount, fought by a threat-targeting hero.
fn threat_tie(seed: u64, card: CardTemplate) -> Vec<String> {
    let rules = RulesConfig::default();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut hero = hero_with_hand(100, vec![card], &rules, &mut rng);
    hero.targeting = TargetPolicy::HighestThreat;
    let mut monsters = wave_of(vec![
        monster("Left", 60, 1, [3; 4]),
        monster("Right", 40, 1, [3; 4]),
    ]);

    let (_, log) = run_exchange(1, &mut hero, &mut monsters, &rules, &mut rng);
    attack_targets(&log)
}

#[test]
fn test_single_strike_wins_exchange() {
    let rules = RulesConfig::default();
    let mut rng = seeded_rng();
    let mut hero = hero_with_hand(10, vec![STRIKE_CARD_TEMPLATE.clone()], &rules, &mut rng);
    let mut monsters = vec![monster("Goblin", 1, 1, [0; 4])];

    let (report, log) = run_exchange(1, &mut hero, &mut monsters, &rules, &mut rng);

    assert_eq!(report.outcome, ExchangeOutcome::Won);
    assert_eq!(report.cards_played, 1);
    assert_eq!(report.monsters_slain, 1);
    assert!(!monsters[0].is_alive());
    assert!(position(log.events(), &CombatEvent::MonsterSlain("Goblin".to_string())).is_some());
}

#[test]
fn test_phases_run_in_order() {
    let rules = RulesConfig::default();
    let mut rng = seeded_rng();
    let mut hero = hero_with_hand(10, vec![], &rules, &mut rng);
    let mut monsters = vec![monster("Wall", 100, 8, [0; 4])];

    let (report, log) = run_exchange(1, &mut hero, &mut monsters, &rules, &mut rng);

    assert_eq!(report.outcome, ExchangeOutcome::Continue);
    assert_eq!(log.phases(1), ExchangePhase::ORDER.to_vec());
}

#[test]
fn test_monster_strike_hurts_hero() {
    let rules = RulesConfig::default();
    let mut rng = seeded_rng();
    let mut hero = hero_with_hand(10, vec![], &rules, &mut rng);
    let mut monsters = vec![monster("Goblin", 100, 8, [3; 4])];

    let (report, _) = run_exchange(1, &mut hero, &mut monsters, &rules, &mut rng);

    assert_eq!(hero.health.current(), 7);
    assert_eq!(report.damage_taken.get("Goblin"), Some(&3));
}

#[test]
fn test_plate_reduces_every_strike() {
    let rules = RulesConfig::default();
    let mut rng = seeded_rng();
    let mut hero = hero_with_hand(10, vec![], &rules, &mut rng);
    hero.plate = 2;
    let mut monsters = wave_of(vec![
        monster("Goblin", 100, 8, [3; 4]),
        monster("Goblin", 100, 8, [1; 4]),
    ]);

    let (report, _) = run_exchange(1, &mut hero, &mut monsters, &rules, &mut rng);

    assert_eq!(hero.health.current(), 9);
    assert_eq!(report.damage_taken.get("Goblin"), Some(&1));
}

#[test]
fn test_strikes_stop_once_the_hero_falls() {
    let rules = RulesConfig::default();
    let mut rng = seeded_rng();
    let mut hero = hero_with_hand(2, vec![], &rules, &mut rng);
    let mut monsters = wave_of(vec![
        monster("Ogre", 100, 8, [9; 4]),
        monster("Imp", 100, 8, [4; 4]),
    ]);

    let (report, log) = run_exchange(1, &mut hero, &mut monsters, &rules, &mut rng);

    assert_eq!(report.outcome, ExchangeOutcome::Lost);
    assert!(hero.is_defeated());
    assert_eq!(report.damage_taken.values().sum::<u64>(), 2);
    assert_eq!(report.damage_taken.get("Ogre"), Some(&2));
    assert!(!report.damage_taken.contains_key("Imp"));
    let strikes = log
        .events()
        .iter()
        .filter(|tagged| matches!(tagged.1, CombatEvent::MonsterStruck { .. }))
        .count();
    assert_eq!(strikes, 1);
}

#[rstest]
#[case(ArmorPolicy::Reset, 0)]
#[case(ArmorPolicy::Halve, 1)]
#[case(ArmorPolicy::Persist, 2)]
fn test_armor_soaks_strikes_then_decays(#[case] armor_policy: ArmorPolicy, #[case] left: u32) {
    let rules = RulesConfig {
        armor_policy,
        ..Default::default()
    };
    let mut rng = seeded_rng();
    let mut hero = hero_with_hand(10, vec![BRACE_CARD_TEMPLATE.clone()], &rules, &mut rng);
    let mut monsters = vec![monster("Goblin", 100, 8, [3; 4])];

    let (report, _) = run_exchange(1, &mut hero, &mut monsters, &rules, &mut rng);

    assert_eq!(hero.health.current(), 10);
    assert!(report.damage_taken.is_empty());
    assert_eq!(hero.armor, left);
}

#[test]
fn test_defeated_hero_stops_resolution() {
    let rules = RulesConfig::default();
    let mut rng = seeded_rng();
    let mut hero = hero_with_hand(3, vec![STRIKE_CARD_TEMPLATE.clone()], &rules, &mut rng);
    let mut monsters = vec![monster("Ogre", 100, 1, [5; 4])];

    let (report, log) = run_exchange(1, &mut hero, &mut monsters, &rules, &mut rng);

    assert_eq!(report.outcome, ExchangeOutcome::Lost);
    assert!(hero.is_defeated());
    assert_eq!(
        log.phases(1),
        vec![
            ExchangePhase::Utility,
            ExchangePhase::Ranged,
            ExchangePhase::MonsterStrike
        ]
    );
    assert_eq!(report.cards_played, 0);
    assert_eq!(hero.deck.hand().len(), 1);
    assert_eq!(monsters[0].health.current(), 100);
}

#[test]
fn test_ranged_kill_prevents_strike() {
    let rules = RulesConfig::default();
    let mut rng = seeded_rng();
    let mut hero = hero_with_hand(10, vec![VOLLEY_CARD_TEMPLATE.clone()], &rules, &mut rng);
    let mut monsters = vec![monster("Ogre", 1, 1, [50; 4])];

    let (report, _) = run_exchange(1, &mut hero, &mut monsters, &rules, &mut rng);

    assert_eq!(report.outcome, ExchangeOutcome::Won);
    assert_eq!(hero.health.current(), 10);
}

#[test]
fn test_lowest_hp_monster_is_targeted() {
    let rules = RulesConfig::default();
    let mut rng = seeded_rng();
    let mut hero = hero_with_hand(10, vec![STRIKE_CARD_TEMPLATE.clone()], &rules, &mut rng);
    let mut monsters = wave_of(vec![
        monster("Brute", 5, 1, [0; 4]),
        monster("Imp", 1, 1, [0; 4]),
    ]);

    let (report, _) = run_exchange(1, &mut hero, &mut monsters, &rules, &mut rng);

    assert_eq!(report.outcome, ExchangeOutcome::Continue);
    assert!(!monsters[1].is_alive());
    assert_eq!(monsters[0].health.current(), 5);
}

#[rstest]
fn test_threat_ties_are_reproducible(#[values(1, 2, 3, 4)] seed: u64) {
    let first = threat_tie(seed, STRIKE_CARD_TEMPLATE.clone());
    let second = threat_tie(seed, STRIKE_CARD_TEMPLATE.clone());
    assert_eq!(first.len(), 1);
    assert_eq!(first, second);
}

#[test]
fn test_threat_ties_are_broken_at_random() {
    let picked: HashSet<String> = (0..32)
        .flat_map(|seed| threat_tie(seed, STRIKE_CARD_TEMPLATE.clone()))
        .collect();
    assert_eq!(
        picked,
        HashSet::from(["Left".to_string(), "Right".to_string()])
    );
}

#[test]
fn test_threat_targeting_falls_back_to_lowest_hp_before_any_strike() {
    for seed in 0..8 {
        let targets = threat_tie(seed, VOLLEY_CARD_TEMPLATE.clone());
        assert_eq!(targets, vec!["Right".to_string()]);
    }
}

#[test]
fn test_sweep_hits_every_monster() {
    let rules = RulesConfig::default();
    let mut rng = seeded_rng();
    let sweep = with_effects(&STRIKE_CARD_TEMPLATE, vec![(EffectKind::Sweep, 1)]);
    let mut hero = hero_with_hand(10, vec![sweep], &rules, &mut rng);
    let mut monsters = wave_of(vec![
        monster("Imp", 1, 1, [0; 4]),
        monster("Imp", 1, 1, [0; 4]),
        monster("Imp", 1, 1, [0; 4]),
    ]);

    let (report, _) = run_exchange(1, &mut hero, &mut monsters, &rules, &mut rng);

    assert_eq!(report.outcome, ExchangeOutcome::Won);
    assert_eq!(report.monsters_slain, 3);
}

#[test]
fn test_splash_hits_the_other_monsters() {
    let rules = RulesConfig::default();
    let mut rng = seeded_rng();
    let splash = with_effects(&STRIKE_CARD_TEMPLATE, vec![(EffectKind::Splash, 2)]);
    let mut hero = hero_with_hand(10, vec![splash], &rules, &mut rng);
    let mut monsters = wave_of(vec![
        monster("Imp", 1, 1, [0; 4]),
        monster("Brute", 10, 8, [0; 4]),
    ]);

    run_exchange(1, &mut hero, &mut monsters, &rules, &mut rng);

    assert!(!monsters[0].is_alive());
    assert_eq!(monsters[1].health.current(), 8);
}

#[test]
fn test_scoped_effects_expire_with_their_scope() {
    let rules = RulesConfig::default();
    let mut rng = seeded_rng();
    let focus = utility(
        "Focus",
        PersistenceScope::Exchange,
        vec![(EffectKind::FlatDamage, 2)],
    );
    let oath = utility(
        "Oath",
        PersistenceScope::Combat,
        vec![(EffectKind::RollModifier, 1)],
    );
    let mut hero = hero_with_hand(10, vec![focus, oath], &rules, &mut rng);
    let mut monsters = vec![monster("Wall", 100, 8, [0; 4])];

    let (report, log) = run_exchange(1, &mut hero, &mut monsters, &rules, &mut rng);

    assert_eq!(report.cards_played, 2);
    assert!(hero.exchange_effects.is_empty());
    assert_eq!(hero.combat_effects.len(), 1);
    assert_eq!(hero.effect_total(EffectKind::RollModifier), 1);
    assert!(position(log.events(), &CombatEvent::EffectsExpired(1)).is_some());

    hero.end_wave();
    assert_eq!(hero.active_effects(), 0);
}

#[test]
fn test_immediate_effects_apply_on_play() {
    let rules = RulesConfig::default();
    let mut rng = seeded_rng();
    let mending = utility(
        "Mending",
        PersistenceScope::None,
        vec![
            (EffectKind::Heal, 3),
            (EffectKind::Draw, 2),
            (EffectKind::Fate, 4),
        ],
    );
    let mut hero = hero_with_hand(10, vec![mending], &rules, &mut rng);
    hero.take_damage(5);
    let mut monsters = vec![monster("Wall", 100, 8, [0; 4])];

    run_exchange(1, &mut hero, &mut monsters, &rules, &mut rng);

    assert_eq!(hero.health.current(), 8);
    assert_eq!(hero.pending_draws, 2);
    assert_eq!(hero.fate.current(), 4);
}

#[test]
fn test_utility_cards_resolve_before_attacks() {
    let rules = RulesConfig::default();
    let mut rng = seeded_rng();
    let mut hero = hero_with_hand(
        10,
        vec![STRIKE_CARD_TEMPLATE.clone(), BRACE_CARD_TEMPLATE.clone()],
        &rules,
        &mut rng,
    );
    let mut monsters = vec![monster("Wall", 100, 8, [0; 4])];

    let (_, log) = run_exchange(1, &mut hero, &mut monsters, &rules, &mut rng);

    let brace = position(
        log.events(),
        &CombatEvent::CardPlayed("Brace".to_string(), CardCategory::Utility),
    );
    let strike = position(
        log.events(),
        &CombatEvent::CardPlayed("Strike".to_string(), CardCategory::Melee),
    );
    let melee = position(log.events(), &CombatEvent::PhaseStarted(ExchangePhase::Melee));
    assert!(brace.is_some());
    assert!(brace < melee);
    assert!(melee < strike);
}

#[test]
fn test_hits_are_reported_as_monster_hp_removed() {
    let rules = RulesConfig::default();
    let mut rng = seeded_rng();
    let mut hero = hero_with_hand(10, vec![STRIKE_CARD_TEMPLATE.clone()], &rules, &mut rng);
    let mut monsters = vec![monster("Wall", 100, 1, [0; 4])];

    let (report, _) = run_exchange(1, &mut hero, &mut monsters, &rules, &mut rng);

    assert!(report.monster_hp_removed > 0);
    assert_eq!(
        report.monster_hp_removed,
        (100 - monsters[0].health.current()) as u64
    );
}

#[test]
fn test_unhittable_monster_removes_no_hp() {
    let rules = RulesConfig::default();
    let mut rng = seeded_rng();
    let mut hero = hero_with_hand(10, vec![STRIKE_CARD_TEMPLATE.clone()], &rules, &mut rng);
    let mut monsters = vec![monster("Wall", 100, 9, [0; 4])];

    let (report, _) = run_exchange(1, &mut hero, &mut monsters, &rules, &mut rng);

    assert_eq!(report.cards_played, 1);
    assert_eq!(report.monster_hp_removed, 0);
}

#[test]
fn test_oversized_magnitudes_saturate() {
    let rules = RulesConfig::default();
    let mut rng = seeded_rng();
    let meteor = CardTemplate {
        damage: u32::MAX,
        effects: vec![CardEffect::new(EffectKind::FlatDamage, u32::MAX)],
        ..CardTemplate::new("Meteor", CardCategory::Melee, DiceSpec::NONE)
    };
    let swarm = with_effects(
        &STRIKE_CARD_TEMPLATE,
        vec![(EffectKind::ExtraDice, u32::MAX), (EffectKind::Armor, u32::MAX)],
    );
    let mut hero = hero_with_hand(10, vec![swarm, meteor], &rules, &mut rng);
    hero.armor = 5;
    let mut monsters = wave_of(vec![
        monster("Titan", 1000, 1, [0; 4]),
        monster("Wall", 1000, 1, [0; 4]),
    ]);

    let (report, log) = run_exchange(1, &mut hero, &mut monsters, &rules, &mut rng);

    assert_eq!(report.monsters_slain, 1);
    let hits: Vec<u32> = log
        .events()
        .iter()
        .filter_map(|tagged| match &tagged.1 {
            CombatEvent::Attack { hits, .. } => Some(*hits),
            _ => None,
        })
        .collect();
    assert!(hits.contains(&64));
}
