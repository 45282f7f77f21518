//! Support (auto) skill parser.

use std::ops::Range;

use regex::Regex;
use tracing::debug;

use crate::skill::error::{CallPath, ParseError};
use crate::skill::patterns;
use crate::skill::parser::reject_unconsumed;
use crate::skill::resolver::{
    capture, resolve_amount, resolve_probability, resolve_status_list, resolve_trigger,
};
use crate::skill::types::{Probability, RawSkill, SupportEffect, SupportSkill, SupportType};
use crate::skill::validation::{lift, validate_all, Validate, Validated};

/// Single-occurrence sentences, scanned in this order after the status scan.
const SENTENCES: &[(SupportType, &str)] = &[
    (SupportType::DamageUp, "damage_up"),
    (SupportType::SupportUp, "support_up"),
    (SupportType::RecoveryUp, "recovery_up"),
    (SupportType::MatchPtUp, "match_pt_up"),
    (SupportType::MpCostDown, "mp_cost_down"),
    (SupportType::RangeUp, "range_up"),
];

fn sentence_pattern(kind: SupportType) -> Option<&'static Regex> {
    match kind {
        SupportType::DamageUp => Some(&patterns::SUPPORT_DAMAGE_UP),
        SupportType::SupportUp => Some(&patterns::SUPPORT_SUPPORT_UP),
        SupportType::RecoveryUp => Some(&patterns::SUPPORT_RECOVERY_UP),
        SupportType::MatchPtUp => Some(&patterns::SUPPORT_MATCH_PT_UP),
        SupportType::MpCostDown => Some(&patterns::SUPPORT_MP_COST_DOWN),
        SupportType::RangeUp => Some(&patterns::SUPPORT_RANGE_UP),
        SupportType::Up | SupportType::Down => None,
    }
}

pub fn parse_support(raw: &RawSkill) -> Validated<SupportSkill> {
    let path = CallPath::root("parse_support");
    debug!(name = %raw.name, "parsing support skill");

    let trigger = lift(resolve_trigger(&raw.name, &path));
    let probability = parse_probability(&raw.description, &path);
    let statuses = parse_status_modifiers(&raw.description, &path);
    let sentences = validate_all(
        SENTENCES
            .iter()
            .map(|(kind, label)| parse_sentence(*kind, label, &raw.description, &path)),
    );
    let leftover = reject_unconsumed(&raw.description, &consumed_spans(&raw.description), &path);

    let (trigger, probability, statuses, sentences, ()) =
        (trigger, probability, statuses, sentences, leftover)
            .validate()
            .inspect_err(|errors| {
                debug!(name = %raw.name, errors = errors.len(), "support skill rejected")
            })?;

    let effects: Vec<SupportEffect> = statuses
        .into_iter()
        .chain(sentences.into_iter().flatten())
        .collect();
    if effects.is_empty() {
        return Err(vec![ParseError::mismatch(
            &path,
            &raw.description,
            "no support effects recognized",
        )]);
    }

    Ok(SupportSkill {
        raw: raw.clone(),
        trigger,
        probability,
        effects,
    })
}

fn parse_probability(description: &str, path: &CallPath) -> Validated<Probability> {
    let path = path.push("parse_probability");
    let caps = patterns::SUPPORT_PROBABILITY.captures(description).ok_or_else(|| {
        vec![ParseError::mismatch(&path, description, "no activation probability")]
    })?;
    lift(capture(&caps, "probability", &path).and_then(|token| resolve_probability(token, &path)))
}

/// Spans of every status occurrence and of the first match of each sentence.
fn consumed_spans(description: &str) -> Vec<Range<usize>> {
    patterns::SUPPORT_STATUS
        .find_iter(description)
        .chain(
            SENTENCES
                .iter()
                .filter_map(|(kind, _)| sentence_pattern(*kind)?.find(description)),
        )
        .map(|m| m.range())
        .collect()
}

/// Every `の{statuses}を{amount}{アップ|ダウン}` occurrence, one entry per status.
fn parse_status_modifiers(description: &str, path: &CallPath) -> Validated<Vec<SupportEffect>> {
    let path = path.push("parse_status_modifiers");
    let occurrences = patterns::SUPPORT_STATUS.captures_iter(description).map(|caps| {
        let kind = lift(capture(&caps, "direction", &path).map(|direction| {
            if direction == "アップ" {
                SupportType::Up
            } else {
                SupportType::Down
            }
        }));
        let statuses = capture(&caps, "status", &path)
            .map_err(|err| vec![err])
            .and_then(|list| resolve_status_list(list, &path));
        let amount =
            lift(capture(&caps, "amount", &path).and_then(|token| resolve_amount(token, &path)));
        let (kind, statuses, amount) = (kind, statuses, amount).validate()?;
        Ok(statuses
            .into_iter()
            .map(|status| SupportEffect {
                kind,
                amount,
                status: Some(status),
            })
            .collect::<Vec<_>>())
    });
    validate_all(occurrences).map(|per_occurrence| per_occurrence.into_iter().flatten().collect())
}

fn parse_sentence(
    kind: SupportType,
    label: &str,
    description: &str,
    path: &CallPath,
) -> Validated<Option<SupportEffect>> {
    let Some(caps) = sentence_pattern(kind).and_then(|regex| regex.captures(description)) else {
        return Ok(None);
    };
    let path = path.push(label);
    lift(capture(&caps, "amount", &path).and_then(|token| resolve_amount(token, &path))).map(
        |amount| {
            Some(SupportEffect {
                kind,
                amount,
                status: None,
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skill::error::ParseErrorKind;
    use crate::skill::types::{Amount, StatusKind, Trigger};

    #[test]
    fn every_sentence_type_has_a_pattern() {
        for (kind, _) in SENTENCES {
            assert!(sentence_pattern(*kind).is_some(), "{kind:?}");
        }
        for kind in SupportType::ALL {
            let scanned = SENTENCES.iter().any(|(k, _)| *k == kind);
            let status_driven = matches!(kind, SupportType::Up | SupportType::Down);
            assert!(scanned ^ status_driven, "{kind:?} must be reachable exactly once");
        }
    }

    #[test]
    fn union_of_status_and_sentence_effects() {
        let skill = parse_support(&RawSkill::new(
            "援:支援UP/ATKアップ",
            "支援/妨害スキル発動時、一定確率で支援/妨害効果を中アップし、味方のATKとSp.ATKを小アップする。",
        ))
        .unwrap();
        assert_eq!(skill.trigger, Trigger::Assist);
        assert_eq!(skill.probability, Probability::Certain);
        assert_eq!(
            skill.effects,
            vec![
                SupportEffect {
                    kind: SupportType::Up,
                    amount: Amount::Small,
                    status: Some(StatusKind::Atk)
                },
                SupportEffect {
                    kind: SupportType::Up,
                    amount: Amount::Small,
                    status: Some(StatusKind::SpAtk)
                },
                SupportEffect {
                    kind: SupportType::SupportUp,
                    amount: Amount::Medium,
                    status: None
                },
            ]
        );
    }

    #[test]
    fn no_effects_is_fatal() {
        let errors = parse_support(&RawSkill::new("攻:謎", "攻撃時、一定確率で何かが起こる。"))
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "no support effects recognized");
    }

    #[test]
    fn trigger_and_probability_failures_accumulate() {
        let errors = parse_support(&RawSkill::new("守:防御", "いつでも与ダメージを小アップする。"))
            .unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.kind == ParseErrorKind::PatternMismatch));
        assert_eq!(errors[1].path.segments(), ["parse_support", "parse_probability"]);
    }

    #[test]
    fn continuation_clause_keeps_its_own_direction() {
        let skill = parse_support(&RawSkill::new(
            "援:DEFダウン",
            "支援/妨害スキル発動時、中確率で敵のDEFを小ダウンさせ、Sp.DEFを中ダウンさせる。",
        ))
        .unwrap();
        assert_eq!(
            skill.effects,
            vec![
                SupportEffect {
                    kind: SupportType::Down,
                    amount: Amount::Small,
                    status: Some(StatusKind::Def)
                },
                SupportEffect {
                    kind: SupportType::Down,
                    amount: Amount::Medium,
                    status: Some(StatusKind::SpDef)
                },
            ]
        );
    }

    #[test]
    fn repeated_sentence_is_not_dropped() {
        let errors = parse_support(&RawSkill::new(
            "攻:与ダメージUP",
            "攻撃時、一定確率で与ダメージを小アップし、与ダメージを中アップする。",
        ))
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].target, "与ダメージを中アップ");
        assert_eq!(
            errors[0].path.segments(),
            ["parse_support", "reject_unconsumed"]
        );
    }
}
