//! Before/after comparison of a roster and the same roster with one card swapped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::combat::engine::{
    evaluate, EvaluateRequest, EvaluationError, EvaluationReport, RosterEntry,
};
use crate::skill::types::StatusKind;

/// `[before, after]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta(pub u64, pub u64);

impl Delta {
    pub fn before(self) -> u64 {
        self.0
    }

    pub fn after(self) -> u64 {
        self.1
    }

    pub fn change(self) -> i128 {
        i128::from(self.1) - i128::from(self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDelta {
    pub buff: Delta,
    pub debuff: Delta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffReport {
    /// Every status channel, including untouched ones.
    pub channels: BTreeMap<StatusKind, ChannelDelta>,
    pub damage: Delta,
    pub recovery: Delta,
}

impl DiffReport {
    pub fn is_neutral(&self) -> bool {
        self.damage.change() == 0
            && self.recovery.change() == 0
            && self
                .channels
                .values()
                .all(|channel| channel.buff.change() == 0 && channel.debuff.change() == 0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Totals {
    buff: BTreeMap<StatusKind, u64>,
    debuff: BTreeMap<StatusKind, u64>,
    damage: u64,
    recovery: u64,
}

impl Totals {
    /// Card values per channel plus ally support once per roster member.
    fn from_report(report: &EvaluationReport, roster_size: usize) -> Self {
        let size = roster_size as u64;
        let mut totals = Self::default();
        for status in StatusKind::ALL {
            let card_buff: u64 = report
                .skill
                .iter()
                .filter_map(|card| card.expected.buff.get(&status))
                .sum();
            let card_debuff: u64 = report
                .skill
                .iter()
                .filter_map(|card| card.expected.debuff.get(&status))
                .sum();
            let support_buff = report.support_buff.get(&status).copied().unwrap_or(0);
            let support_debuff = report.support_debuff.get(&status).copied().unwrap_or(0);
            totals.buff.insert(status, card_buff + support_buff * size);
            totals.debuff.insert(status, card_debuff + support_debuff * size);
        }
        totals.damage = report.skill.iter().filter_map(|card| card.expected.damage).sum();
        totals.recovery = report.skill.iter().filter_map(|card| card.expected.recovery).sum();
        totals
    }
}

/// Evaluate `request` as-is and with the card `swap_out` replaced by `swap_in`.
pub fn diff(
    request: &EvaluateRequest,
    swap_out: u32,
    swap_in: &RosterEntry,
) -> Result<DiffReport, EvaluationError> {
    let position = request
        .roster
        .iter()
        .position(|entry| entry.card.id == swap_out)
        .ok_or(EvaluationError::UnknownRosterCard { card_id: swap_out })?;

    let mut swapped = request.clone();
    swapped.roster[position] = swap_in.clone();

    let before = Totals::from_report(&evaluate(request)?, request.roster.len());
    let after = Totals::from_report(&evaluate(&swapped)?, swapped.roster.len());

    let channels = StatusKind::ALL
        .into_iter()
        .map(|status| {
            let pick = |map: &BTreeMap<StatusKind, u64>| map.get(&status).copied().unwrap_or(0);
            (
                status,
                ChannelDelta {
                    buff: Delta(pick(&before.buff), pick(&after.buff)),
                    debuff: Delta(pick(&before.debuff), pick(&after.debuff)),
                },
            )
        })
        .collect();

    Ok(DiffReport {
        channels,
        damage: Delta(before.damage, after.damage),
        recovery: Delta(before.recovery, after.recovery),
    })
}
