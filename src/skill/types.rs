//! Typed model produced by the skill and support-skill parsers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The seven fixed roles a memoria's primary skill can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "通常単体")]
    NormalSingle,
    #[serde(rename = "通常範囲")]
    NormalRange,
    #[serde(rename = "特殊単体")]
    SpecialSingle,
    #[serde(rename = "特殊範囲")]
    SpecialRange,
    #[serde(rename = "支援")]
    Support,
    #[serde(rename = "妨害")]
    Interference,
    #[serde(rename = "回復")]
    Recovery,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Self::NormalSingle,
        Self::NormalRange,
        Self::SpecialSingle,
        Self::SpecialRange,
        Self::Support,
        Self::Interference,
        Self::Recovery,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::NormalSingle => "通常単体",
            Self::NormalRange => "通常範囲",
            Self::SpecialSingle => "特殊単体",
            Self::SpecialRange => "特殊範囲",
            Self::Support => "支援",
            Self::Interference => "妨害",
            Self::Recovery => "回復",
        }
    }

    pub const fn is_attack(self) -> bool {
        matches!(
            self,
            Self::NormalSingle | Self::NormalRange | Self::SpecialSingle | Self::SpecialRange
        )
    }

    pub const fn is_special(self) -> bool {
        matches!(self, Self::SpecialSingle | Self::SpecialRange)
    }

    /// Trigger channel a card of this category belongs to.
    pub const fn channel(self) -> Trigger {
        match self {
            Self::NormalSingle | Self::NormalRange | Self::SpecialSingle | Self::SpecialRange => {
                Trigger::Attack
            }
            Self::Support | Self::Interference => Trigger::Assist,
            Self::Recovery => Trigger::Recovery,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered severity label attached to an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Amount {
    Small,
    Medium,
    Large,
    ExtraLarge,
    SuperLarge,
    UltraLarge,
    SuperUltraLarge,
}

impl Amount {
    pub const ALL: [Amount; 7] = [
        Self::Small,
        Self::Medium,
        Self::Large,
        Self::ExtraLarge,
        Self::SuperLarge,
        Self::UltraLarge,
        Self::SuperUltraLarge,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Water,
    Wind,
    Light,
    Dark,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Self::Fire,
        Self::Water,
        Self::Wind,
        Self::Light,
        Self::Dark,
    ];
}

/// One of the 15 stat channels a buff or debuff can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatusKind {
    #[serde(rename = "ATK")]
    Atk,
    #[serde(rename = "DEF")]
    Def,
    #[serde(rename = "Sp.ATK")]
    SpAtk,
    #[serde(rename = "Sp.DEF")]
    SpDef,
    Life,
    #[serde(rename = "Fire ATK")]
    FireAtk,
    #[serde(rename = "Fire DEF")]
    FireDef,
    #[serde(rename = "Water ATK")]
    WaterAtk,
    #[serde(rename = "Water DEF")]
    WaterDef,
    #[serde(rename = "Wind ATK")]
    WindAtk,
    #[serde(rename = "Wind DEF")]
    WindDef,
    #[serde(rename = "Light ATK")]
    LightAtk,
    #[serde(rename = "Light DEF")]
    LightDef,
    #[serde(rename = "Dark ATK")]
    DarkAtk,
    #[serde(rename = "Dark DEF")]
    DarkDef,
}

impl StatusKind {
    pub const ALL: [StatusKind; 15] = [
        Self::Atk,
        Self::Def,
        Self::SpAtk,
        Self::SpDef,
        Self::Life,
        Self::FireAtk,
        Self::FireDef,
        Self::WaterAtk,
        Self::WaterDef,
        Self::WindAtk,
        Self::WindDef,
        Self::LightAtk,
        Self::LightDef,
        Self::DarkAtk,
        Self::DarkDef,
    ];

    pub const fn elemental_atk(element: Element) -> Self {
        match element {
            Element::Fire => Self::FireAtk,
            Element::Water => Self::WaterAtk,
            Element::Wind => Self::WindAtk,
            Element::Light => Self::LightAtk,
            Element::Dark => Self::DarkAtk,
        }
    }

    pub const fn elemental_def(element: Element) -> Self {
        match element {
            Element::Fire => Self::FireDef,
            Element::Water => Self::WaterDef,
            Element::Wind => Self::WindDef,
            Element::Light => Self::LightDef,
            Element::Dark => Self::DarkDef,
        }
    }

    /// Element the channel is bound to, `None` for the five plain channels.
    pub const fn element(self) -> Option<Element> {
        match self {
            Self::Atk | Self::Def | Self::SpAtk | Self::SpDef | Self::Life => None,
            Self::FireAtk | Self::FireDef => Some(Element::Fire),
            Self::WaterAtk | Self::WaterDef => Some(Element::Water),
            Self::WindAtk | Self::WindDef => Some(Element::Wind),
            Self::LightAtk | Self::LightDef => Some(Element::Light),
            Self::DarkAtk | Self::DarkDef => Some(Element::Dark),
        }
    }
}

/// Inclusive target-count pair recovered from a sentence (`1～3体`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub min: u8,
    pub max: u8,
}

impl Range {
    pub const fn single(count: u8) -> Self {
        Self {
            min: count,
            max: count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DamageKind {
    Normal,
    Special,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StackKind {
    Meteor,
    Barrier,
    Eden,
    Anima,
}

impl StackKind {
    pub const ALL: [StackKind; 4] = [Self::Meteor, Self::Barrier, Self::Eden, Self::Anima];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResonanceKind {
    Stimulation,
    Spread,
    Strengthen,
    Weaken,
}

impl ResonanceKind {
    pub const ALL: [ResonanceKind; 4] = [
        Self::Stimulation,
        Self::Spread,
        Self::Strengthen,
        Self::Weaken,
    ];
}

/// Closed union of combat effects a primary skill can carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Effect {
    Damage {
        range: Range,
        kind: DamageKind,
        amount: Amount,
    },
    Buff {
        range: Range,
        amount: Amount,
        status: StatusKind,
    },
    Debuff {
        range: Range,
        amount: Amount,
        status: StatusKind,
    },
    Heal {
        range: Range,
        amount: Amount,
    },
    Stack {
        kind: StackKind,
        rate: f64,
        times: u32,
    },
    Element {
        element: Element,
        kind: ResonanceKind,
    },
}

impl Effect {
    pub fn is_damage(&self) -> bool {
        matches!(self, Effect::Damage { .. })
    }
}

/// Flags recovered from the skill name rather than the description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AuxFlag {
    Resonance {
        element: Element,
        kind: ResonanceKind,
    },
    Charge,
    Counter,
    SCounter,
    Heal,
    Recover,
}

/// Verbatim ability text as it appears in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawSkill {
    pub name: String,
    pub description: String,
}

impl RawSkill {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Parsed primary skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub raw: RawSkill,
    pub effects: Vec<Effect>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kinds: Vec<AuxFlag>,
}

impl Skill {
    pub fn has_flag(&self, flag: AuxFlag) -> bool {
        self.kinds.contains(&flag)
    }

    /// True when the name carries either counter marker.
    pub fn is_counter(&self) -> bool {
        self.has_flag(AuxFlag::Counter) || self.has_flag(AuxFlag::SCounter)
    }

    /// Target range of the first range-bearing effect.
    pub fn range(&self) -> Option<Range> {
        self.effects.iter().find_map(|effect| match effect {
            Effect::Damage { range, .. }
            | Effect::Buff { range, .. }
            | Effect::Debuff { range, .. }
            | Effect::Heal { range, .. } => Some(*range),
            Effect::Stack { .. } | Effect::Element { .. } => None,
        })
    }
}

/// Channel a support skill (or legendary skill) listens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Trigger {
    Attack,
    Assist,
    Recovery,
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Probability {
    Certain,
    Medium,
    High,
}

impl Probability {
    pub const ALL: [Probability; 3] = [Self::Certain, Self::Medium, Self::High];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SupportType {
    DamageUp,
    SupportUp,
    RecoveryUp,
    MatchPtUp,
    MpCostDown,
    RangeUp,
    #[serde(rename = "UP")]
    Up,
    #[serde(rename = "DOWN")]
    Down,
}

impl SupportType {
    pub const ALL: [SupportType; 8] = [
        Self::DamageUp,
        Self::SupportUp,
        Self::RecoveryUp,
        Self::MatchPtUp,
        Self::MpCostDown,
        Self::RangeUp,
        Self::Up,
        Self::Down,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SupportEffect {
    #[serde(rename = "type")]
    pub kind: SupportType,
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusKind>,
}

/// Parsed secondary (auto) skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportSkill {
    pub raw: RawSkill,
    pub trigger: Trigger,
    pub probability: Probability,
    pub effects: Vec<SupportEffect>,
}
