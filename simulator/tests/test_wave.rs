mod aux;

use std::{sync::Arc, time::Duration};

use aux::{
    BLESSING_CARD_TEMPLATE, STRIKE_CARD_TEMPLATE, hero_profile, hero_with_hand, monster,
    seeded_rng,
};
use rstest::rstest;
use simulator::{
    CombatEvent, Deck, EncounterBook, Gauntlet, GauntletContext, Hero, HeroTemplate, LossCause,
    MonsterTemplate, RulesConfig, RunBounds, SimulationError, TargetPolicy, TimeoutBound, Wave,
    WaveEntry, WaveOutcome, WaveSelection, WaveState, WaveTemplate,
};

fn monster_template(name: &str, hp: u64, defense: u32, bands: [u32; 4]) -> MonsterTemplate {
    MonsterTemplate {
        name: name.to_string(),
        elite: false,
        hp,
        defense,
        element: Default::default(),
        vulnerability: None,
        resistance: None,
        bands,
        level: 1,
        ability: None,
    }
}

fn single(monster: &str) -> WaveTemplate {
    WaveTemplate {
        name: None,
        monsters: vec![WaveEntry {
            monster: monster.to_string(),
            elite: false,
            count: 1,
            level: None,
        }],
    }
}

fn gauntlet(hero: HeroTemplate, monsters: Vec<MonsterTemplate>, waves: Vec<WaveTemplate>) -> Gauntlet {
    let book = EncounterBook::new(monsters, waves, WaveSelection::Fixed).unwrap();
    Gauntlet::new(
        Arc::new(hero.try_into().unwrap()),
        Arc::new(book),
        Arc::new(RulesConfig::default()),
        RunBounds::unbounded(),
    )
    .with_event_log()
}

fn striker(max_hp: u64) -> HeroTemplate {
    HeroTemplate {
        name: "Striker".to_string(),
        max_hp,
        fate_max: 10,
        starting_fate: 0,
        plate: 0,
        targeting: TargetPolicy::LowestHp,
        card_templates: vec![STRIKE_CARD_TEMPLATE.clone(); 6],
        upgrade_templates: vec![],
    }
}

fn empty_handed(rules: &RulesConfig) -> Hero {
    let mut rng = seeded_rng();
    let mut hero = hero_with_hand(10, vec![], rules, &mut rng);
    hero.deck = Deck::new(vec![], rules.hand_capacity);
    hero
}

#[test]
fn test_zero_wave_timeout_fails_before_any_exchange() {
    let rules = RulesConfig::default();
    let mut hero = empty_handed(&rules);
    let bounds = RunBounds {
        wave_timeout: Some(Duration::ZERO),
        ..RunBounds::unbounded()
    };
    let mut rng = seeded_rng();
    let mut ctx = GauntletContext::new(&rules, bounds, &mut rng);
    let mut wave = Wave::new(0, vec![monster("Goblin", 5, 8, [1; 4])]);

    let error = wave.run(&mut hero, &mut ctx).unwrap_err();

    match &error {
        SimulationError::Timeout {
            hero,
            wave,
            monsters,
            bound,
        } => {
            assert_eq!(hero, "Tester");
            assert_eq!(*wave, 1);
            assert_eq!(monsters, &vec!["Goblin".to_string()]);
            assert_eq!(*bound, TimeoutBound::WaveDuration(Duration::ZERO));
        }
        error => panic!("Expected `Timeout` got `{error}`"),
    }
    assert!(error.to_string().contains("Goblin"));
    assert_eq!(wave.monsters[0].health.current(), 5);
    assert_eq!(hero.health.current(), 10);
    assert_eq!(ctx.total_exchanges, 0);
}

#[test]
fn test_exchange_budget_times_out() {
    let rules = RulesConfig {
        stall_limit: 100,
        ..Default::default()
    };
    let mut rng = seeded_rng();
    let mut hero = hero_with_hand(10, vec![], &rules, &mut rng);
    let bounds = RunBounds {
        max_exchanges_per_wave: Some(2),
        ..RunBounds::unbounded()
    };
    let mut ctx = GauntletContext::new(&rules, bounds, &mut rng);
    let mut wave = Wave::new(0, vec![monster("Wall", 100, 9, [0; 4])]);
    let strikes = (0..10)
        .map(|_| hero.mint_card(Arc::new(STRIKE_CARD_TEMPLATE.clone()), false))
        .collect();
    hero.deck = Deck::new(strikes, rules.hand_capacity);

    let error = wave.run(&mut hero, &mut ctx).unwrap_err();

    assert!(matches!(
        error,
        SimulationError::Timeout {
            bound: TimeoutBound::WaveExchanges(2),
            ..
        }
    ));
    assert_eq!(ctx.total_exchanges, 2);
}

#[test]
fn test_stalled_wave_is_lost() {
    let rules = RulesConfig::default();
    let mut hero = empty_handed(&rules);
    let mut rng = seeded_rng();
    let mut ctx = GauntletContext::new(&rules, RunBounds::unbounded(), &mut rng).with_event_log();
    let mut wave = Wave::new(0, vec![monster("Wall", 100, 8, [0; 4])]);

    let report = wave.run(&mut hero, &mut ctx).unwrap();

    assert_eq!(report.outcome, WaveOutcome::Lost(LossCause::Stalled));
    assert_eq!(report.exchanges, rules.stall_limit);
    assert_eq!(wave.state, WaveState::Lost);
    assert!(wave.monsters.iter().all(|m| !m.is_alive()));
    assert_eq!(
        hero.health.current(),
        10 - rules.stall_penalty as i64
    );
    assert!(
        wave.log
            .events()
            .iter()
            .any(|event| event.1 == CombatEvent::Stalled(rules.stall_penalty))
    );
}

#[test]
fn test_playing_cards_without_damage_still_stalls() {
    let rules = RulesConfig::default();
    let mut rng = seeded_rng();
    let mut hero = hero_with_hand(10, vec![], &rules, &mut rng);
    let strikes = (0..10)
        .map(|_| hero.mint_card(Arc::new(STRIKE_CARD_TEMPLATE.clone()), false))
        .collect();
    hero.deck = Deck::new(strikes, rules.hand_capacity);
    hero.deck.draw(4, &mut rng);
    let mut ctx = GauntletContext::new(&rules, RunBounds::unbounded(), &mut rng);
    let mut wave = Wave::new(0, vec![monster("Wall", 100, 9, [0; 4])]);

    let report = wave.run(&mut hero, &mut ctx).unwrap();

    assert_eq!(report.outcome, WaveOutcome::Lost(LossCause::Stalled));
    assert_eq!(report.exchanges, rules.stall_limit);
    assert_eq!(
        hero.health.current(),
        10 - rules.stall_penalty as i64
    );
}

#[rstest]
fn test_exchange_cap_ends_the_wave(#[values(1, 3, 5)] cap: u32) {
    let rules = RulesConfig {
        max_exchanges_per_wave: cap,
        stall_limit: 100,
        ..Default::default()
    };
    let mut hero = empty_handed(&rules);
    let mut rng = seeded_rng();
    let mut ctx = GauntletContext::new(&rules, RunBounds::unbounded(), &mut rng);
    let mut wave = Wave::new(0, vec![monster("Wall", 100, 8, [0; 4])]);

    let report = wave.run(&mut hero, &mut ctx).unwrap();

    assert_eq!(report.outcome, WaveOutcome::Lost(LossCause::ExchangeCap));
    assert_eq!(report.exchanges, cap);
}

#[test]
fn test_won_wave_resets_wave_state() {
    let rules = RulesConfig::default();
    let mut rng = seeded_rng();
    let mut hero = hero_with_hand(10, vec![STRIKE_CARD_TEMPLATE.clone()], &rules, &mut rng);
    hero.armor = 4;
    hero.poison = 2;
    let mut ctx = GauntletContext::new(&rules, RunBounds::unbounded(), &mut rng);
    ctx.skip_next_draw = true;
    let mut wave = Wave::new(0, vec![monster("Goblin", 1, 1, [0; 4])]);

    let report = wave.run(&mut hero, &mut ctx).unwrap();

    assert_eq!(report.outcome, WaveOutcome::Won);
    assert_eq!(report.exchanges, 1);
    assert_eq!(wave.state, WaveState::Won);
    assert_eq!(hero.armor, 0);
    assert_eq!(hero.poison, 0);
    assert!(!ctx.skip_next_draw);
}

#[test]
fn test_hp_log_is_zero_after_defeat() {
    let gauntlet = gauntlet(
        striker(5),
        vec![
            monster_template("Goblin", 1, 1, [0; 4]),
            monster_template("Ogre", 100, 8, [10; 4]),
            monster_template("Dragon", 100, 8, [10; 4]),
        ],
        vec![single("Goblin"), single("Ogre"), single("Dragon")],
    );

    let record = gauntlet.run_once_with_rng(seeded_rng()).unwrap();

    assert!(!record.won);
    assert_eq!(record.waves_cleared, 1);
    assert_eq!(record.hp_log, [100.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    assert_eq!(record.logs.len(), 2);
    assert!(record.damage_taken.contains_key("Ogre"));
    assert!(!record.damage_taken.contains_key("Dragon"));
    let met: Vec<&str> = record
        .encounters
        .iter()
        .map(|encounter| encounter.monster.as_str())
        .collect();
    assert_eq!(met, vec!["Goblin", "Ogre"]);
}

#[test]
fn test_won_waves_grant_upgrades() {
    let hero = HeroTemplate {
        upgrade_templates: vec![BLESSING_CARD_TEMPLATE.clone()],
        ..striker(10)
    };
    let gauntlet = gauntlet(
        hero,
        vec![monster_template("Goblin", 1, 1, [0; 4])],
        vec![single("Goblin"), single("Goblin")],
    );

    let record = gauntlet.run_once_with_rng(seeded_rng()).unwrap();

    assert!(record.won);
    assert_eq!(record.waves_cleared, 2);
    let blessings = record
        .deck
        .iter()
        .filter(|(_, name)| name == "Blessing")
        .count();
    assert!((1..=2).contains(&blessings), "gained {blessings} upgrades");
    let logged = record.logs[0]
        .events()
        .iter()
        .filter(|event| matches!(&event.1, CombatEvent::UpgradeGained(name) if name == "Blessing"))
        .count();
    assert_eq!(logged, blessings);
}

#[test]
fn test_gauntlet_is_deterministic_per_seed() {
    let gauntlet = gauntlet(
        striker(12),
        vec![
            monster_template("Goblin", 4, 4, [0, 1, 2, 3]),
            monster_template("Ogre", 9, 5, [1, 2, 3, 4]),
        ],
        vec![single("Goblin"), single("Ogre"), single("Goblin")],
    );

    let first = gauntlet.run_once_with_rng(seeded_rng()).unwrap();
    let second = gauntlet.run_once_with_rng(seeded_rng()).unwrap();

    assert_eq!(first.won, second.won);
    assert_eq!(first.hp_log, second.hp_log);
    assert_eq!(first.exchanges, second.exchanges);
    assert_eq!(first.damage_taken, second.damage_taken);
}

#[test]
fn test_hero_profile_expands_copies() {
    let profile = hero_profile(
        "Copier",
        10,
        vec![simulator::CardTemplate {
            copies: 3,
            ..STRIKE_CARD_TEMPLATE.clone()
        }],
    );
    assert_eq!(profile.starting_deck.len(), 3);
}
