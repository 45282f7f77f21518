//! Expected-value evaluation of a roster.
//!
//! Every effect value is `rate × skill level × base stat × calibration ×
//! support × range × counter × stack`, floored once at the end. Roster-wide
//! support and legendary aggregates are folded once per call and shared by
//! every card.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::combat::rates::{
    activation_probability, buff_rate, damage_rate, debuff_rate, heal_rate, skill_level,
    support_level_rate, COSTUME_BASE_RATE, COUNTER_RATE, DEFENSE_WEIGHT, GRACE_RATE,
    MAX_CONCENTRATION, THEME_RATE,
};
use crate::combat::stacking::{RosterKey, StackContribution, StatStacking};
use crate::data::card::{Card, StatRow};
use crate::skill::types::{
    Amount, DamageKind, Effect, Element, Range, StatusKind, SupportEffect, SupportType, Trigger,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error("card {card_id}: no {table} rate for amount {amount:?}")]
    MissingRateTableEntry {
        card_id: u32,
        table: &'static str,
        amount: Amount,
    },
    #[error("card {card_id}: a debuff on Life cannot be evaluated")]
    LifeDebuff { card_id: u32 },
    #[error("card {card_id}: concentration {concentration} is outside 0..={MAX_CONCENTRATION}")]
    InvalidConcentration { card_id: u32, concentration: u8 },
    #[error("card {card_id} is not in the roster")]
    UnknownRosterCard { card_id: u32 },
}

impl EvaluationError {
    /// Life debuffs are a hard stop rather than a recoverable fault.
    pub fn is_hard_stop(&self) -> bool {
        matches!(self, Self::LifeDebuff { .. })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyStats {
    pub atk: u32,
    pub sp_atk: u32,
    pub def: u32,
    pub sp_def: u32,
}

impl PartyStats {
    fn add_row(&mut self, row: StatRow) {
        self.atk = self.atk.saturating_add(row[0]);
        self.sp_atk = self.sp_atk.saturating_add(row[1]);
        self.def = self.def.saturating_add(row[2]);
        self.sp_def = self.sp_def.saturating_add(row[3]);
    }

    fn attack_base(self, kind: DamageKind, opponent: OpponentDefense) -> f64 {
        let (attack, defense) = match kind {
            DamageKind::Normal => (self.atk, opponent.def),
            DamageKind::Special => (self.sp_atk, opponent.sp_def),
        };
        (f64::from(attack) - DEFENSE_WEIGHT * f64::from(defense)).max(0.0)
    }

    fn assist_base(self) -> f64 {
        f64::from(self.sp_atk) + f64::from(self.sp_def)
    }

    fn heal_base(self) -> f64 {
        f64::from(self.def) + f64::from(self.sp_def)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentDefense {
    pub def: u32,
    pub sp_def: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementBoost {
    pub element: Element,
    pub rate: f64,
}

impl ElementBoost {
    fn factor(self, element: Element) -> f64 {
        if self.element == element {
            1.0 + self.rate
        } else {
            1.0
        }
    }
}

/// Equipped trinket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Charm {
    pub name: String,
    #[serde(default)]
    pub ability: Option<ElementBoost>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Costume {
    pub name: String,
    #[serde(default)]
    pub base_bonus: bool,
    #[serde(default)]
    pub skill: Option<ElementBoost>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackOptions {
    pub rate: f64,
    pub targets: Vec<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluateOptions {
    #[serde(default)]
    pub counter_enabled: bool,
    #[serde(default)]
    pub stack: Option<StackOptions>,
    #[serde(default)]
    pub theme: Option<Element>,
    #[serde(default)]
    pub grace: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub card: Card,
    pub concentration: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluateRequest {
    pub roster: Vec<RosterEntry>,
    pub self_stats: PartyStats,
    #[serde(default)]
    pub opponent: OpponentDefense,
    #[serde(default)]
    pub charm: Option<Charm>,
    #[serde(default)]
    pub costume: Option<Costume>,
    #[serde(default)]
    pub options: EvaluateOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expected {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<u64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub buff: BTreeMap<StatusKind, u64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub debuff: BTreeMap<StatusKind, u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardResult {
    pub card_id: u32,
    pub name: String,
    pub concentration: u8,
    pub expected: Expected,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub skill: Vec<CardResult>,
    pub support_buff: BTreeMap<StatusKind, u64>,
    pub support_debuff: BTreeMap<StatusKind, u64>,
}

/// Roster-wide state shared by every card of one evaluation.
struct RosterContext<'a> {
    request: &'a EvaluateRequest,
    party: PartyStats,
    aggregates: StatStacking<RosterKey>,
}

pub fn evaluate(request: &EvaluateRequest) -> Result<EvaluationReport, EvaluationError> {
    let party = party_stats(request)?;
    let aggregates = roster_aggregates(&request.roster)?;
    let context = RosterContext {
        request,
        party,
        aggregates,
    };

    let skill = request
        .roster
        .iter()
        .map(|entry| evaluate_card(entry, &context))
        .collect::<Result<Vec<_>, _>>()?;

    let (support_buff, support_debuff) = ally_support(&context);
    debug!(
        cards = skill.len(),
        buffed_channels = support_buff.len(),
        debuffed_channels = support_debuff.len(),
        "evaluated roster"
    );
    Ok(EvaluationReport {
        skill,
        support_buff,
        support_debuff,
    })
}

fn party_stats(request: &EvaluateRequest) -> Result<PartyStats, EvaluationError> {
    let mut party = request.self_stats;
    for entry in &request.roster {
        let row = entry
            .card
            .stats_at(entry.concentration)
            .ok_or(EvaluationError::InvalidConcentration {
                card_id: entry.card.id,
                concentration: entry.concentration,
            })?;
        party.add_row(row);
    }
    Ok(party)
}

fn roster_aggregates(roster: &[RosterEntry]) -> Result<StatStacking<RosterKey>, EvaluationError> {
    let mut aggregates = StatStacking::new();

    for entry in roster {
        let Some(legendary) = &entry.card.legendary else {
            continue;
        };
        let rate = legendary
            .rate_at(entry.concentration)
            .ok_or(EvaluationError::InvalidConcentration {
                card_id: entry.card.id,
                concentration: entry.concentration,
            })?;
        aggregates.add_many(legendary.elements.iter().map(|element| {
            let key = match legendary.trigger {
                Trigger::Command => RosterKey::Activation(*element),
                trigger => RosterKey::Legendary(trigger, *element),
            };
            StackContribution::additive(key, rate)
        }));
    }

    // Activation bonuses above must be complete before any support skill reads them.
    for entry in roster {
        let card = &entry.card;
        let probability = activation_probability(card.support.probability, entry.concentration)
            .ok_or(EvaluationError::InvalidConcentration {
                card_id: card.id,
                concentration: entry.concentration,
            })?
            + aggregates.additive_for(&RosterKey::Activation(card.element));

        for effect in &card.support.effects {
            if let Some(contribution) = support_contribution(card.id, effect, probability)? {
                aggregates.add(contribution);
            }
        }
    }
    Ok(aggregates)
}

fn support_contribution(
    card_id: u32,
    effect: &SupportEffect,
    probability: f64,
) -> Result<Option<StackContribution<RosterKey>>, EvaluationError> {
    let level = || {
        support_level_rate(effect.kind, effect.amount).ok_or(
            EvaluationError::MissingRateTableEntry {
                card_id,
                table: "support level",
                amount: effect.amount,
            },
        )
    };
    let contribution = match (effect.kind, effect.status) {
        (SupportType::SupportUp, _) => {
            StackContribution::additive(RosterKey::SupportUp, level()? * probability)
        }
        (SupportType::RecoveryUp, _) => {
            StackContribution::additive(RosterKey::RecoveryUp, level()? * probability)
        }
        (SupportType::RangeUp, _) => StackContribution::chance(RosterKey::RangeUp, probability),
        (SupportType::Up, Some(status)) => {
            StackContribution::additive(RosterKey::AllyBuff(status), level()? * probability)
        }
        (SupportType::Down, Some(StatusKind::Life)) => {
            return Err(EvaluationError::LifeDebuff { card_id })
        }
        (SupportType::Down, Some(status)) => {
            StackContribution::additive(RosterKey::AllyDebuff(status), level()? * probability)
        }
        // Damage-up only feeds attack cards, which take no support multiplier.
        (SupportType::DamageUp, _)
        | (SupportType::MatchPtUp, _)
        | (SupportType::MpCostDown, _)
        | (SupportType::Up | SupportType::Down, None) => return Ok(None),
    };
    Ok(Some(contribution))
}

fn calibration(card: &Card, context: &RosterContext<'_>) -> f64 {
    let request = context.request;
    let element = card.element;
    let charm = request
        .charm
        .as_ref()
        .and_then(|charm| charm.ability)
        .map_or(1.0, |boost| boost.factor(element));
    let (costume_base, costume_skill) = request.costume.as_ref().map_or((1.0, 1.0), |costume| {
        (
            if costume.base_bonus {
                COSTUME_BASE_RATE
            } else {
                1.0
            },
            costume.skill.map_or(1.0, |boost| boost.factor(element)),
        )
    });
    let theme = if request.options.theme == Some(element) {
        THEME_RATE
    } else {
        1.0
    };
    let grace = if request.options.grace { GRACE_RATE } else { 1.0 };
    let legendary = context
        .aggregates
        .multiplier_for(&RosterKey::Legendary(card.category.channel(), element));

    charm * costume_base * costume_skill * theme * grace * legendary
}

fn range_factor(range: Range, miss: f64) -> f64 {
    let (min, max) = (f64::from(range.min), f64::from(range.max));
    max - (max - min) * miss
}

fn evaluate_card(
    entry: &RosterEntry,
    context: &RosterContext<'_>,
) -> Result<CardResult, EvaluationError> {
    let card = &entry.card;
    let options = &context.request.options;
    let level = skill_level(entry.concentration).ok_or(EvaluationError::InvalidConcentration {
        card_id: card.id,
        concentration: entry.concentration,
    })?;

    let calibration = calibration(card, context);
    let support = match card.category.channel() {
        Trigger::Assist => context.aggregates.multiplier_for(&RosterKey::SupportUp),
        Trigger::Recovery => context.aggregates.multiplier_for(&RosterKey::RecoveryUp),
        Trigger::Attack | Trigger::Command => 1.0,
    };
    let counter = if options.counter_enabled && card.skill.is_counter() {
        COUNTER_RATE
    } else {
        1.0
    };
    let stack = options
        .stack
        .as_ref()
        .filter(|stack| stack.targets.contains(&card.id))
        .map_or(1.0, |stack| stack.rate);
    let miss = context.aggregates.miss_for(&RosterKey::RangeUp);
    let party = context.party;

    let missing = |table: &'static str, amount: Amount| EvaluationError::MissingRateTableEntry {
        card_id: card.id,
        table,
        amount,
    };
    let value = |rate: f64, base: f64, range: Range| -> u64 {
        (rate * level * base * calibration * support * range_factor(range, miss) * counter * stack)
            .floor() as u64
    };

    let mut expected = Expected::default();
    for effect in &card.skill.effects {
        match *effect {
            Effect::Damage {
                range,
                kind,
                amount,
            } => {
                let rate = damage_rate(amount).ok_or_else(|| missing("damage", amount))?;
                let damage = value(rate, party.attack_base(kind, context.request.opponent), range);
                *expected.damage.get_or_insert(0) += damage;
            }
            Effect::Buff {
                range,
                amount,
                status,
            } => {
                let rate = buff_rate(status, amount).ok_or_else(|| missing("buff", amount))?;
                let gained = value(rate, party.assist_base(), range);
                *expected.buff.entry(status).or_default() += gained;
            }
            Effect::Debuff { status, .. } if status == StatusKind::Life => {
                return Err(EvaluationError::LifeDebuff { card_id: card.id });
            }
            Effect::Debuff {
                range,
                amount,
                status,
            } => {
                let rate = debuff_rate(status, amount).ok_or_else(|| missing("debuff", amount))?;
                *expected.debuff.entry(status).or_default() +=
                    value(rate, party.assist_base(), range);
            }
            Effect::Heal { range, amount } => {
                let rate = heal_rate(amount).ok_or_else(|| missing("heal", amount))?;
                *expected.recovery.get_or_insert(0) += value(rate, party.heal_base(), range);
            }
            Effect::Stack { .. } | Effect::Element { .. } => {}
        }
    }

    debug!(card_id = card.id, calibration, support, counter, stack, "evaluated card");
    Ok(CardResult {
        card_id: card.id,
        name: card.name.clone(),
        concentration: entry.concentration,
        expected,
    })
}

/// Roster-wide UP/DOWN support effects, applied once per card by callers.
fn ally_support(
    context: &RosterContext<'_>,
) -> (BTreeMap<StatusKind, u64>, BTreeMap<StatusKind, u64>) {
    let base = context.party.assist_base();
    let mut buff = BTreeMap::new();
    let mut debuff = BTreeMap::new();
    for (key, totals) in context.aggregates.iter() {
        let value = (totals.additive * base).floor() as u64;
        match *key {
            RosterKey::AllyBuff(status) => {
                buff.insert(status, value);
            }
            RosterKey::AllyDebuff(status) => {
                debuff.insert(status, value);
            }
            _ => {}
        }
    }
    (buff, debuff)
}
