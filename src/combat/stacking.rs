use std::collections::BTreeMap;

use crate::skill::types::{Element, StatusKind, Trigger};

/// How a contribution folds into its key's running total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackCategory {
    /// Summed (`1 + Σ value` once composed).
    Additive,
    /// Independent chance; folded as `Π (1 - p)`.
    Chance,
}

/// Roster-wide quantity a support or legendary skill feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RosterKey {
    /// Primary-skill multiplier for cards on a channel with a listed element.
    Legendary(Trigger, Element),
    /// Extra activation probability for support skills of an element.
    Activation(Element),
    SupportUp,
    RecoveryUp,
    RangeUp,
    AllyBuff(StatusKind),
    AllyDebuff(StatusKind),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackContribution<K> {
    pub key: K,
    pub category: StackCategory,
    pub value: f64,
}

impl<K> StackContribution<K> {
    pub fn additive(key: K, value: f64) -> Self {
        Self {
            key,
            category: StackCategory::Additive,
            value,
        }
    }

    pub fn chance(key: K, value: f64) -> Self {
        Self {
            key,
            category: StackCategory::Chance,
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryTotals {
    pub additive: f64,
    /// Probability that no chance contribution fires.
    pub miss: f64,
}

impl Default for CategoryTotals {
    fn default() -> Self {
        Self {
            additive: 0.0,
            miss: 1.0,
        }
    }
}

impl CategoryTotals {
    pub fn apply(&mut self, category: StackCategory, value: f64) {
        match category {
            StackCategory::Additive => self.additive += value,
            StackCategory::Chance => self.miss *= 1.0 - value.clamp(0.0, 1.0),
        }
    }

    pub fn multiplier(self) -> f64 {
        1.0 + self.additive
    }
}

/// Per-key totals, built once per evaluation and read for every card.
#[derive(Debug, Clone, Default)]
pub struct StatStacking<K: Ord> {
    totals: BTreeMap<K, CategoryTotals>,
}

impl<K: Ord> StatStacking<K> {
    pub fn new() -> Self {
        Self {
            totals: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, contribution: StackContribution<K>) {
        self.totals
            .entry(contribution.key)
            .or_default()
            .apply(contribution.category, contribution.value);
    }

    pub fn add_many<I>(&mut self, contributions: I)
    where
        I: IntoIterator<Item = StackContribution<K>>,
    {
        for contribution in contributions {
            self.add(contribution);
        }
    }

    /// Totals for `key`; an untouched key reads as the neutral element.
    pub fn totals_for(&self, key: &K) -> CategoryTotals {
        self.totals.get(key).copied().unwrap_or_default()
    }

    pub fn additive_for(&self, key: &K) -> f64 {
        self.totals_for(key).additive
    }

    pub fn multiplier_for(&self, key: &K) -> f64 {
        self.totals_for(key).multiplier()
    }

    pub fn miss_for(&self, key: &K) -> f64 {
        self.totals_for(key).miss
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &CategoryTotals)> {
        self.totals.iter()
    }
}
