use models::{AbilityKind, AbilityTrigger};

use super::Monster;

/// Read-only view of the exchange handed to ability behaviors.
#[derive(Debug, Clone, Copy)]
pub struct AbilityContext {
    /// Exchange number within the wave. Start-of-wave hooks run in exchange 0.
    pub exchange: u32,
    pub hero_hand: usize,
    pub hero_effects: usize,
    pub others_alive: usize,
}

/// What an ability asks the exchange resolver to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityEffect {
    BonusDamage(u32),
    IgnoreArmor,
    Poison(u32),
    DrainFate(u32),
    ForceMelee,
    CancelEffect { heal: u32 },
    ForceDiscard(usize),
    TransientArmor(u32),
    DamageReduction(u32),
    HeroDamage(u32),
    KillOther,
}

pub type AbilityFn = fn(&Monster, u32, &AbilityContext) -> Option<AbilityEffect>;

#[derive(Clone, Copy)]
pub struct AbilityEntry {
    pub trigger: AbilityTrigger,
    pub behavior: AbilityFn,
}

pub fn ability_entry(kind: AbilityKind) -> AbilityEntry {
    let (trigger, behavior): (AbilityTrigger, AbilityFn) = match kind {
        AbilityKind::Enrage => (AbilityTrigger::OnDamageDealt, enrage),
        AbilityKind::ArmorBreaker => (AbilityTrigger::OnDamageDealt, armor_breaker),
        AbilityKind::Venom => (AbilityTrigger::OnDamageDealt, venom),
        AbilityKind::FateDrain => (AbilityTrigger::OnDamageDealt, fate_drain),
        AbilityKind::Web => (AbilityTrigger::StartOfExchange, web),
        AbilityKind::PowerSap => (AbilityTrigger::StartOfExchange, power_sap),
        AbilityKind::Terror => (AbilityTrigger::StartOfExchange, terror),
        AbilityKind::Toughened => (AbilityTrigger::StartOfExchange, toughened),
        AbilityKind::Carapace => (AbilityTrigger::StartOfWave, carapace),
        AbilityKind::RootsOfDespair => (AbilityTrigger::OnMiss, roots_of_despair),
        AbilityKind::Domino => (AbilityTrigger::OnDeath, domino),
    };
    AbilityEntry { trigger, behavior }
}

fn enrage(monster: &Monster, magnitude: u32, _: &AbilityContext) -> Option<AbilityEffect> {
    monster
        .health
        .is_at_or_below_half()
        .then_some(AbilityEffect::BonusDamage(magnitude))
}

fn armor_breaker(_: &Monster, _: u32, _: &AbilityContext) -> Option<AbilityEffect> {
    Some(AbilityEffect::IgnoreArmor)
}

fn venom(_: &Monster, magnitude: u32, _: &AbilityContext) -> Option<AbilityEffect> {
    Some(AbilityEffect::Poison(magnitude))
}

fn fate_drain(_: &Monster, magnitude: u32, _: &AbilityContext) -> Option<AbilityEffect> {
    Some(AbilityEffect::DrainFate(magnitude))
}

fn web(_: &Monster, _: u32, _: &AbilityContext) -> Option<AbilityEffect> {
    Some(AbilityEffect::ForceMelee)
}

fn power_sap(_: &Monster, magnitude: u32, context: &AbilityContext) -> Option<AbilityEffect> {
    (context.hero_effects > 0).then_some(AbilityEffect::CancelEffect { heal: magnitude })
}

fn terror(_: &Monster, magnitude: u32, context: &AbilityContext) -> Option<AbilityEffect> {
    (context.hero_hand > 0).then_some(AbilityEffect::ForceDiscard(magnitude as usize))
}

fn toughened(_: &Monster, magnitude: u32, _: &AbilityContext) -> Option<AbilityEffect> {
    Some(AbilityEffect::TransientArmor(magnitude))
}

fn carapace(_: &Monster, magnitude: u32, _: &AbilityContext) -> Option<AbilityEffect> {
    Some(AbilityEffect::DamageReduction(magnitude))
}

fn roots_of_despair(_: &Monster, magnitude: u32, _: &AbilityContext) -> Option<AbilityEffect> {
    Some(AbilityEffect::HeroDamage(magnitude))
}

fn domino(_: &Monster, _: u32, context: &AbilityContext) -> Option<AbilityEffect> {
    (context.others_alive > 0).then_some(AbilityEffect::KillOther)
}
