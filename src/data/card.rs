use serde::{Deserialize, Serialize};

use crate::skill::{
    parse_skill, parse_support, Category, Element, ParseError, RawSkill, Skill, SupportSkill,
    Trigger, Validate,
};

/// Base stats at one concentration: ATK, Sp.ATK, DEF, Sp.DEF.
pub type StatRow = [u32; 4];

/// Optional roster-wide bonus skill carried by some memoria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendarySkill {
    pub trigger: Trigger,
    pub elements: Vec<Element>,
    /// Rate per concentration of the holder.
    pub rates: [f64; 5],
}

impl LegendarySkill {
    pub fn rate_at(&self, concentration: u8) -> Option<f64> {
        self.rates.get(usize::from(concentration)).copied()
    }
}

/// Catalogue record with unparsed ability text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memoria {
    pub id: u32,
    pub name: String,
    pub category: Category,
    pub element: Element,
    pub status: [StatRow; 5],
    pub skill: RawSkill,
    pub support: RawSkill,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legendary: Option<LegendarySkill>,
}

/// A memoria whose primary and support texts both parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: u32,
    pub name: String,
    pub category: Category,
    pub element: Element,
    pub status: [StatRow; 5],
    pub skill: Skill,
    pub support: SupportSkill,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legendary: Option<LegendarySkill>,
}

impl Card {
    /// Parse both texts; every error from either parser is returned together.
    pub fn from_memoria(memoria: &Memoria) -> Result<Self, Vec<ParseError>> {
        let (skill, support) = (
            parse_skill(memoria.category, &memoria.skill),
            parse_support(&memoria.support),
        )
            .validate()?;
        Ok(Self {
            id: memoria.id,
            name: memoria.name.clone(),
            category: memoria.category,
            element: memoria.element,
            status: memoria.status,
            skill,
            support,
            legendary: memoria.legendary.clone(),
        })
    }

    pub fn stats_at(&self, concentration: u8) -> Option<StatRow> {
        self.status.get(usize::from(concentration)).copied()
    }
}
