//! Published balance constants.
//!
//! Every table is a total `match` over its key enums; tiers with no published
//! value return `None` so the engine can fail loudly instead of reading zero.
//! Some entries (for example `Damage` at `SuperUltraLarge`) have no card using
//! them yet.

use crate::skill::types::{Amount, Probability, StatusKind, SupportType};

pub const MAX_CONCENTRATION: u8 = 4;

pub const SKILL_LEVEL: [f64; 5] = [1.35, 1.375, 1.40, 1.45, 1.50];

pub const CERTAIN_PROBABILITY: [f64; 5] = [0.10, 0.105, 0.11, 0.115, 0.12];
pub const MEDIUM_PROBABILITY: [f64; 5] = [0.15, 0.1575, 0.165, 0.1725, 0.18];
pub const HIGH_PROBABILITY: [f64; 5] = [0.20, 0.21, 0.22, 0.23, 0.24];

pub const COSTUME_BASE_RATE: f64 = 1.10;
pub const THEME_RATE: f64 = 1.10;
pub const GRACE_RATE: f64 = 1.05;
pub const COUNTER_RATE: f64 = 1.50;

/// Normal damage subtracts this share of the opponent's matching defense.
pub const DEFENSE_WEIGHT: f64 = 2.0 / 3.0;

pub fn skill_level(concentration: u8) -> Option<f64> {
    SKILL_LEVEL.get(usize::from(concentration)).copied()
}

pub fn activation_probability(probability: Probability, concentration: u8) -> Option<f64> {
    let table = match probability {
        Probability::Certain => &CERTAIN_PROBABILITY,
        Probability::Medium => &MEDIUM_PROBABILITY,
        Probability::High => &HIGH_PROBABILITY,
    };
    table.get(usize::from(concentration)).copied()
}

pub const fn damage_rate(amount: Amount) -> Option<f64> {
    match amount {
        Amount::Small => None,
        Amount::Medium => Some(0.110),
        Amount::Large => Some(0.132),
        Amount::ExtraLarge => Some(0.156),
        Amount::SuperLarge => Some(0.174),
        Amount::UltraLarge => Some(0.198),
        Amount::SuperUltraLarge => Some(0.225),
    }
}

/// Which of the three buff/debuff sub-tables a status reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTable {
    Plain,
    Elemental,
    Life,
}

impl StatusTable {
    pub const fn of(status: StatusKind) -> Self {
        match status {
            StatusKind::Atk | StatusKind::Def | StatusKind::SpAtk | StatusKind::SpDef => {
                Self::Plain
            }
            StatusKind::Life => Self::Life,
            StatusKind::FireAtk
            | StatusKind::FireDef
            | StatusKind::WaterAtk
            | StatusKind::WaterDef
            | StatusKind::WindAtk
            | StatusKind::WindDef
            | StatusKind::LightAtk
            | StatusKind::LightDef
            | StatusKind::DarkAtk
            | StatusKind::DarkDef => Self::Elemental,
        }
    }
}

pub const fn buff_rate(status: StatusKind, amount: Amount) -> Option<f64> {
    match (StatusTable::of(status), amount) {
        (StatusTable::Plain, Amount::Small) => Some(0.0228),
        (StatusTable::Plain, Amount::Medium) => Some(0.0285),
        (StatusTable::Plain, Amount::Large) => Some(0.0371),
        (StatusTable::Plain, Amount::ExtraLarge) => Some(0.0456),
        (StatusTable::Plain, Amount::SuperLarge) => Some(0.0513),
        (StatusTable::Elemental, Amount::Small) => Some(0.0180),
        (StatusTable::Elemental, Amount::Medium) => Some(0.0225),
        (StatusTable::Elemental, Amount::Large) => Some(0.0293),
        (StatusTable::Elemental, Amount::ExtraLarge) => Some(0.0360),
        (StatusTable::Life, Amount::Small) => Some(0.0100),
        (StatusTable::Life, Amount::Medium) => Some(0.0150),
        (StatusTable::Life, Amount::Large) => Some(0.0200),
        _ => None,
    }
}

/// Debuff rates. The Life channel has no table at all; the engine stops before
/// reaching this lookup.
pub const fn debuff_rate(status: StatusKind, amount: Amount) -> Option<f64> {
    match (StatusTable::of(status), amount) {
        (StatusTable::Plain, Amount::Small) => Some(0.0182),
        (StatusTable::Plain, Amount::Medium) => Some(0.0228),
        (StatusTable::Plain, Amount::Large) => Some(0.0297),
        (StatusTable::Plain, Amount::ExtraLarge) => Some(0.0365),
        (StatusTable::Plain, Amount::SuperLarge) => Some(0.0410),
        (StatusTable::Elemental, Amount::Small) => Some(0.0144),
        (StatusTable::Elemental, Amount::Medium) => Some(0.0180),
        (StatusTable::Elemental, Amount::Large) => Some(0.0234),
        (StatusTable::Elemental, Amount::ExtraLarge) => Some(0.0288),
        _ => None,
    }
}

pub const fn heal_rate(amount: Amount) -> Option<f64> {
    match amount {
        Amount::Small => Some(0.060),
        Amount::Medium => Some(0.080),
        Amount::Large => Some(0.100),
        Amount::ExtraLarge => Some(0.120),
        Amount::SuperLarge => Some(0.140),
        Amount::UltraLarge | Amount::SuperUltraLarge => None,
    }
}

/// Level rate of a support-skill effect. `MpCostDown` and `RangeUp` carry no
/// level rate; range extension is driven by activation probability alone.
pub const fn support_level_rate(kind: SupportType, amount: Amount) -> Option<f64> {
    match kind {
        SupportType::DamageUp | SupportType::SupportUp | SupportType::RecoveryUp => match amount {
            Amount::Small => Some(0.10),
            Amount::Medium => Some(0.15),
            Amount::Large => Some(0.20),
            Amount::ExtraLarge => Some(0.25),
            _ => None,
        },
        SupportType::Up | SupportType::Down => match amount {
            Amount::Small => Some(0.0114),
            Amount::Medium => Some(0.0143),
            Amount::Large => Some(0.0185),
            _ => None,
        },
        SupportType::MatchPtUp => match amount {
            Amount::Small => Some(0.05),
            Amount::Medium => Some(0.10),
            Amount::Large => Some(0.15),
            _ => None,
        },
        SupportType::MpCostDown | SupportType::RangeUp => None,
    }
}
