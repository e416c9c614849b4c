use models::{DiceSpec, Element};
use rand::{Rng, rngs::StdRng};
use smallvec::SmallVec;

use crate::{Fate, RulesConfig};

/// Everything besides the dice themselves that shapes an attack roll.
#[derive(Debug, Clone, Copy, Default)]
pub struct RollModifiers {
    /// Added to every face before clamping into `1..=sides`.
    pub roll_modifier: i32,
    /// Added to the hit total when at least one die hits, or outright for diceless attacks.
    pub flat_damage: u32,
    /// Card-granted rerolls, spent before fate.
    pub rerolls: u32,
    pub element: Element,
    pub vulnerability: Option<Element>,
    pub resistance: Option<Element>,
    /// Remaining hit points of the target including its transient armor. Fate is only
    /// spent while the attack can still finish the target.
    pub target_hp: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiceOutcome {
    pub hits: u32,
    pub crits: u32,
    pub total: u32,
    pub card_rerolls: u32,
    pub fate_rerolls: u32,
    pub faces: SmallVec<[u32; 8]>,
}

impl DiceOutcome {
    pub fn missed(&self) -> bool {
        !self.faces.is_empty() && self.hits == 0
    }
}

fn roll_face(sides: u32, modifier: i32, rng: &mut StdRng) -> u32 {
    let face = rng.random_range(1..=sides) as i64 + modifier as i64;
    face.clamp(1, sides as i64) as u32
}

/// Rolls `spec` against `threshold` and returns the hit total. Fate is spent from
/// `fate`; the target itself is never touched.
pub fn resolve(
    spec: DiceSpec,
    threshold: u32,
    modifiers: &RollModifiers,
    fate: &mut Fate,
    rules: &RulesConfig,
    rng: &mut StdRng,
) -> DiceOutcome {
    let threshold = threshold.max(1);
    let mut outcome = DiceOutcome::default();
    let mut card_rerolls = modifiers.rerolls;
    let mut points = 0u32;
    let reachable = max_face(spec.sides, modifiers.roll_modifier) >= threshold;

    for die in 0..spec.count {
        let mut face = roll_face(spec.sides, modifiers.roll_modifier, rng);
        while face < threshold && reachable {
            if card_rerolls > 0 {
                card_rerolls -= 1;
                outcome.card_rerolls += 1;
            } else if outcome.fate_rerolls < rules.max_fate_rerolls
                && fate_could_finish(spec, die, points, modifiers, rules)
                && fate.spend(1)
            {
                outcome.fate_rerolls += 1;
            } else {
                break;
            }
            #[cfg(feature = "trace")]
            tracing::trace!(face, threshold, "Reroll die");
            face = roll_face(spec.sides, modifiers.roll_modifier, rng);
        }
        if face >= threshold {
            outcome.hits += 1;
            if face == spec.sides {
                outcome.crits += 1;
                points = points.saturating_add(rules.critical_points);
            } else {
                points = points.saturating_add(1);
            }
        }
        outcome.faces.push(face);
    }

    if outcome.hits > 0 || spec.is_empty() {
        points = points.saturating_add(modifiers.flat_damage);
    }
    if modifiers.element.matches(modifiers.vulnerability) {
        points = points.saturating_mul(2);
    } else if modifiers.element.matches(modifiers.resistance) {
        points /= 2;
    }
    if outcome.hits > 0 {
        points = points.max(rules.minimum_damage);
    }
    outcome.total = points;

    #[cfg(feature = "trace")]
    tracing::trace!(?spec, threshold, ?outcome, "Resolve dice");

    outcome
}

/// Highest face a die can show once the modifier is applied.
fn max_face(sides: u32, modifier: i32) -> u32 {
    let sides = sides.max(1) as i64;
    (sides + modifier as i64).clamp(1, sides) as u32
}

/// Whether the remaining dice, each rolling its best face, could still finish the target.
/// A die only counts as a critical when the critical face clears the threshold.
fn fate_could_finish(
    spec: DiceSpec,
    die: u32,
    points: u32,
    modifiers: &RollModifiers,
    rules: &RulesConfig,
) -> bool {
    if !rules.fate_requires_lethal {
        return true;
    }
    let Some(target_hp) = modifiers.target_hp else {
        return true;
    };
    let per_die = if max_face(spec.sides, modifiers.roll_modifier) == spec.sides {
        rules.critical_points.max(1)
    } else {
        1
    };
    let dice_left = spec.count - die;
    let mut best_case = points
        .saturating_add(dice_left.saturating_mul(per_die))
        .saturating_add(modifiers.flat_damage);
    if modifiers.element.matches(modifiers.vulnerability) {
        best_case = best_case.saturating_mul(2);
    }
    best_case >= target_hp
}
