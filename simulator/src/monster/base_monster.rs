use models::{AbilitySpec, AbilityTrigger, Element};

use crate::{ACTION_BANDS, Health};

use super::{AbilityContext, AbilityEffect, ability_entry};

#[derive(Clone, Debug)]
pub struct Monster {
    /// Position in the wave.
    pub index: usize,
    pub name: String,
    pub elite: bool,
    pub level: u8,
    pub health: Health,
    pub defense: u32,
    pub element: Element,
    pub vulnerability: Option<Element>,
    pub resistance: Option<Element>,
    pub bands: [u32; ACTION_BANDS],
    pub ability: Option<AbilitySpec>,
    pub transient_armor: u32,
    pub damage_reduction: u32,
    /// Damage rolled by this monster's strike in the current exchange.
    pub threat: Option<u32>,
    pub slain: bool,
    last_fired: Option<u32>,
}

impl Monster {
    pub fn new(
        index: usize,
        name: String,
        elite: bool,
        hp: u64,
        defense: u32,
        bands: [u32; ACTION_BANDS],
    ) -> Self {
        Self {
            index,
            name,
            elite,
            level: 1,
            health: Health::full(hp),
            defense: defense.max(1),
            element: Element::None,
            vulnerability: None,
            resistance: None,
            bands,
            ability: None,
            transient_armor: 0,
            damage_reduction: 0,
            threat: None,
            slain: false,
            last_fired: None,
        }
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn with_affinity(
        mut self,
        element: Element,
        vulnerability: Option<Element>,
        resistance: Option<Element>,
    ) -> Self {
        self.element = element;
        self.vulnerability = vulnerability;
        self.resistance = resistance;
        self
    }

    pub fn with_ability(mut self, ability: Option<AbilitySpec>) -> Self {
        self.ability = ability;
        self
    }

    pub fn is_alive(&self) -> bool {
        !self.health.is_depleted()
    }

    /// Display name, prefixed for elite variants.
    pub fn label(&self) -> String {
        if self.elite {
            format!("Elite {}", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Band of the action table selected by a d8 roll.
    pub fn band_for_roll(roll: u32) -> usize {
        ((roll.clamp(1, 8) - 1) / 2) as usize
    }

    pub fn strike_damage(&self, roll: u32) -> u32 {
        self.bands[Self::band_for_roll(roll)]
    }

    /// Applies an incoming hit through damage reduction and transient armor. Returns the
    /// hit points actually lost.
    pub fn take_hit(&mut self, amount: u32) -> u32 {
        let reduced = amount.saturating_sub(self.damage_reduction);
        let absorbed = reduced.min(self.transient_armor);
        self.transient_armor -= absorbed;
        let remaining = self.health.current().max(0) as u32;
        let dealt = (reduced - absorbed).min(remaining);
        self.health -= dealt as i64;
        dealt
    }

    pub fn heal(&mut self, amount: u32) {
        self.health += amount as i64;
    }

    pub fn kill(&mut self) {
        self.health = Health(0, self.health.max());
    }

    /// Invokes the ability hook if it listens to `trigger` and has not fired yet during
    /// the exchange described by `context`.
    pub fn try_fire(
        &mut self,
        trigger: AbilityTrigger,
        context: &AbilityContext,
    ) -> Option<AbilityEffect> {
        let ability = self.ability?;
        let entry = ability_entry(ability.kind);
        if entry.trigger != trigger || self.last_fired == Some(context.exchange) {
            return None;
        }
        let effect = (entry.behavior)(self, ability.magnitude, context)?;
        self.last_fired = Some(context.exchange);
        Some(effect)
    }

    pub fn end_exchange(&mut self) {
        self.transient_armor = 0;
        self.threat = None;
    }
}

impl std::fmt::Display for Monster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(lvl {}, ❤️ {}/{}, def {}, bands {:?})",
            self.label(),
            self.level,
            self.health.current(),
            self.health.max(),
            self.defense,
            self.bands,
        )
    }
}
