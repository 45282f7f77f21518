//! Primary-skill parser: `(category, {name, description})` -> [Skill].
//!
//! The category picks one of four sentence strategies (damage, buff, debuff,
//! heal). Name-driven auxiliary scans (stack family, elemental resonance,
//! literal markers) then run independently, and every failure from every
//! sub-parse is reported together.

use std::ops::Range as Span;

use regex::{Captures, Regex};
use tracing::debug;

use crate::skill::error::{CallPath, ParseError};
use crate::skill::patterns::{
    self, first_contained, stack_families, COUNTER_MARKERS, LITERAL_MARKERS, RESONANCE_MARKER,
};
use crate::skill::resolver::{
    capture, parse_rate, parse_times, resolve_amount, resolve_damage_kind, resolve_element,
    resolve_range, resolve_resonance, resolve_status_list,
};
use crate::skill::types::{
    Amount, AuxFlag, Category, DamageKind, Effect, Element, Range, RawSkill, ResonanceKind, Skill,
    StatusKind,
};
use crate::skill::validation::{lift, validate_all, Validate, Validated};

/// Maximum number of buff/debuff clauses appended to a damage sentence.
const MAX_DAMAGE_RIDERS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

/// One `{status list}を{amount}{アップ|ダウン}` clause before it is bound to a range.
#[derive(Debug, Clone)]
struct Modifier {
    direction: Direction,
    statuses: Vec<StatusKind>,
    amount: Amount,
}

impl Modifier {
    fn into_effects(self, range: Range) -> impl Iterator<Item = Effect> {
        let Modifier {
            direction,
            statuses,
            amount,
        } = self;
        statuses.into_iter().map(move |status| match direction {
            Direction::Up => Effect::Buff {
                range,
                amount,
                status,
            },
            Direction::Down => Effect::Debuff {
                range,
                amount,
                status,
            },
        })
    }
}

pub fn parse_skill(category: Category, raw: &RawSkill) -> Validated<Skill> {
    let path = CallPath::root("parse_skill");
    debug!(%category, name = %raw.name, "parsing skill");

    let primary = match category {
        Category::NormalSingle
        | Category::NormalRange
        | Category::SpecialSingle
        | Category::SpecialRange => parse_damage(category, &raw.description, &path),
        Category::Support => parse_buff(&raw.description, &path),
        Category::Interference => parse_debuff(&raw.description, &path),
        Category::Recovery => parse_heal(&raw.description, &path),
    };
    let stack = parse_stack(raw, &path);
    let resonance = parse_resonance(&raw.name, &path);

    let (mut effects, stack, resonance) = (primary, stack, resonance)
        .validate()
        .inspect_err(|errors| debug!(name = %raw.name, errors = errors.len(), "skill rejected"))?;

    effects.extend(stack);
    let mut kinds = Vec::new();
    if let Some((element, kind)) = resonance {
        effects.push(Effect::Element { element, kind });
        kinds.push(AuxFlag::Resonance { element, kind });
    }
    kinds.extend(scan_name_markers(&raw.name));

    Ok(Skill {
        raw: raw.clone(),
        effects,
        kinds,
    })
}

fn sentence<'t>(
    regex: &Regex,
    text: &'t str,
    path: &CallPath,
    shape: &str,
) -> Validated<Captures<'t>> {
    regex
        .captures(text)
        .ok_or_else(|| vec![ParseError::mismatch(path, text, format!("no {shape} sentence"))])
}

fn span_of(caps: &Captures<'_>) -> Span<usize> {
    caps.get(0).map_or(0..0, |m| m.range())
}

/// Every `…を{amount}{verb}` clause in `text` must lie inside a consumed span;
/// each one outside is a PatternMismatch.
pub(crate) fn reject_unconsumed(
    text: &str,
    consumed: &[Span<usize>],
    path: &CallPath,
) -> Validated<()> {
    let path = path.push("reject_unconsumed");
    let errors: Vec<ParseError> = patterns::CLAUSE
        .captures_iter(text)
        .filter_map(|caps| {
            let amount = caps.name("amount")?.start();
            if consumed.iter().any(|span| span.contains(&amount)) {
                return None;
            }
            Some(ParseError::mismatch(
                &path,
                caps.get(0).map_or("", |m| m.as_str()),
                "clause outside every recognized sentence",
            ))
        })
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn amount_at(caps: &Captures<'_>, group: &str, path: &CallPath) -> Validated<Amount> {
    lift(capture(caps, group, path).and_then(|token| resolve_amount(token, path)))
}

fn statuses_at(caps: &Captures<'_>, group: &str, path: &CallPath) -> Validated<Vec<StatusKind>> {
    capture(caps, group, path)
        .map_err(|err| vec![err])
        .and_then(|list| resolve_status_list(list, path))
}

fn parse_damage(
    category: Category,
    description: &str,
    path: &CallPath,
) -> Validated<Vec<Effect>> {
    let path = path.push("parse_damage");
    let caps = sentence(&patterns::DAMAGE, description, &path, "damage")?;

    let range = resolve_range(&caps, &path);
    let kind = lift(
        capture(&caps, "kind", &path)
            .and_then(|token| resolve_damage_kind(token, &path))
            .and_then(|kind| {
                let expected = if category.is_special() {
                    DamageKind::Special
                } else {
                    DamageKind::Normal
                };
                if kind == expected {
                    Ok(kind)
                } else {
                    Err(ParseError::mismatch(
                        &path,
                        caps.get(0).map_or("", |m| m.as_str()),
                        format!("{kind:?} damage does not fit category {category}"),
                    ))
                }
            }),
    );
    let amount = amount_at(&caps, "amount", &path);
    let offset = span_of(&caps).end;
    let rest = &description[offset..];
    let riders = parse_damage_riders(rest, &path);

    let mut consumed = vec![span_of(&caps)];
    consumed.extend(
        patterns::DAMAGE_RIDER
            .find_iter(rest)
            .map(|m| offset + m.start()..offset + m.end()),
    );
    let leftover = reject_unconsumed(description, &consumed, &path);

    let (range, kind, amount, riders, ()) = (range, kind, amount, riders, leftover).validate()?;
    let mut effects = vec![Effect::Damage {
        range,
        kind,
        amount,
    }];
    effects.extend(riders.into_iter().flat_map(|rider| rider.into_effects(range)));
    Ok(effects)
}

fn parse_damage_riders(rest: &str, path: &CallPath) -> Validated<Vec<Modifier>> {
    let path = path.push("parse_damage_riders");
    let clauses: Vec<Captures<'_>> = patterns::DAMAGE_RIDER.captures_iter(rest).collect();
    if clauses.len() > MAX_DAMAGE_RIDERS {
        return Err(vec![ParseError::mismatch(
            &path,
            rest,
            format!(
                "{} buff/debuff clauses after damage, at most {MAX_DAMAGE_RIDERS}",
                clauses.len()
            ),
        )]);
    }
    let mut side = None;
    validate_all(clauses.iter().map(|caps| {
        side = caps.name("side").map(|m| m.as_str()).or(side);
        parse_rider(caps, side, &path)
    }))
}

/// A rider without its own side continues the side of the clause before it.
fn parse_rider(
    caps: &Captures<'_>,
    side: Option<&str>,
    path: &CallPath,
) -> Validated<Modifier> {
    let clause = caps.get(0).map_or("", |m| m.as_str());
    let direction = lift(
        side.ok_or_else(|| ParseError::missing(path, clause, "continuation with no side"))
            .and_then(|side| Ok((side, capture(caps, "direction", path)?)))
            .and_then(|pair| match pair {
                ("味方", "アップ") => Ok(Direction::Up),
                ("敵", "ダウン") => Ok(Direction::Down),
                (side, direction) => Err(ParseError::mismatch(
                    path,
                    clause,
                    format!("{side} cannot take a {direction} clause"),
                )),
            }),
    );
    let statuses = statuses_at(caps, "status", path);
    let amount = amount_at(caps, "amount", path);
    let (direction, statuses, amount) = (direction, statuses, amount).validate()?;
    Ok(Modifier {
        direction,
        statuses,
        amount,
    })
}

fn parse_buff(description: &str, path: &CallPath) -> Validated<Vec<Effect>> {
    parse_modifier_sentence(
        &patterns::BUFF,
        Direction::Up,
        description,
        &path.push("parse_buff"),
    )
}

fn parse_debuff(description: &str, path: &CallPath) -> Validated<Vec<Effect>> {
    parse_modifier_sentence(
        &patterns::DEBUFF,
        Direction::Down,
        description,
        &path.push("parse_debuff"),
    )
}

/// Buff and debuff sentences share one shape: a range, a first status/amount
/// pair and an optional second pair behind the secondary delimiter.
fn parse_modifier_sentence(
    regex: &Regex,
    direction: Direction,
    description: &str,
    path: &CallPath,
) -> Validated<Vec<Effect>> {
    let shape = match direction {
        Direction::Up => "buff",
        Direction::Down => "debuff",
    };
    let caps = sentence(regex, description, path, shape)?;

    let range = resolve_range(&caps, path);
    let first = (
        statuses_at(&caps, "status", path),
        amount_at(&caps, "amount", path),
    )
        .validate();
    let second = match caps.name("status2") {
        Some(_) => {
            let second_path = path.push("secondary");
            (
                statuses_at(&caps, "status2", &second_path),
                amount_at(&caps, "amount2", &second_path),
            )
                .validate()
                .map(Some)
        }
        None => Ok(None),
    };

    let leftover = reject_unconsumed(description, &[span_of(&caps)], path);

    let (range, (statuses, amount), second, ()) = (range, first, second, leftover).validate()?;
    let mut modifiers = vec![Modifier {
        direction,
        statuses,
        amount,
    }];
    if let Some((statuses, amount)) = second {
        modifiers.push(Modifier {
            direction,
            statuses,
            amount,
        });
    }
    Ok(modifiers
        .into_iter()
        .flat_map(|modifier| modifier.into_effects(range))
        .collect())
}

fn parse_heal(description: &str, path: &CallPath) -> Validated<Vec<Effect>> {
    let path = path.push("parse_heal");
    let caps = sentence(&patterns::HEAL, description, &path, "heal")?;

    let range = resolve_range(&caps, &path);
    let amount = amount_at(&caps, "amount", &path);
    let offset = span_of(&caps).end;
    let rider_caps = patterns::HEAL_RIDER.captures(&description[offset..]);
    let mut consumed = vec![span_of(&caps)];
    consumed.extend(rider_caps.iter().map(|rider| {
        let span = span_of(rider);
        offset + span.start..offset + span.end
    }));
    let leftover = reject_unconsumed(description, &consumed, &path);

    let rider = match rider_caps {
        Some(rider) => {
            let rider_path = path.push("parse_heal_rider");
            (
                statuses_at(&rider, "status", &rider_path),
                amount_at(&rider, "amount", &rider_path),
            )
                .validate()
                .map(|(statuses, amount)| {
                    Some(Modifier {
                        direction: Direction::Up,
                        statuses,
                        amount,
                    })
                })
        }
        None => Ok(None),
    };

    let (range, amount, rider, ()) = (range, amount, rider, leftover).validate()?;
    let mut effects = vec![Effect::Heal { range, amount }];
    if let Some(rider) = rider {
        effects.extend(rider.into_effects(range));
    }
    Ok(effects)
}

/// Stack families are declared by the name; the description must supply one
/// rate and one repetition count per family, scraped independently.
fn parse_stack(raw: &RawSkill, path: &CallPath) -> Validated<Vec<Effect>> {
    let families = stack_families(&raw.name);
    if families.is_empty() {
        return Ok(Vec::new());
    }
    let path = path.push("parse_stack");
    let description = raw.description.as_str();

    let expected = families.len();
    let rates = scrape_counted(&patterns::STACK_RATE, "rate", description, expected, &path)
        .and_then(|tokens| {
            validate_all(tokens.into_iter().map(|token| lift(parse_rate(token, &path))))
        });
    let times = scrape_counted(&patterns::STACK_TIMES, "times", description, expected, &path)
        .and_then(|tokens| {
            validate_all(tokens.into_iter().map(|token| lift(parse_times(token, &path))))
        });

    let (rates, times) = (rates, times).validate()?;
    Ok(families
        .into_iter()
        .zip(rates.into_iter().zip(times))
        .map(|(kind, (rate, times))| Effect::Stack { kind, rate, times })
        .collect())
}

fn scrape_counted<'t>(
    regex: &Regex,
    group: &str,
    text: &'t str,
    expected: usize,
    path: &CallPath,
) -> Validated<Vec<&'t str>> {
    let path = path.push(group);
    let tokens: Vec<&str> = regex
        .captures_iter(text)
        .filter_map(|caps| caps.name(group).map(|m| m.as_str()))
        .collect();
    if tokens.len() < expected {
        return Err((tokens.len()..expected)
            .map(|index| {
                ParseError::missing(
                    &path,
                    text,
                    format!("stack {group} #{} absent ({expected} families declared)", index + 1),
                )
            })
            .collect());
    }
    if tokens.len() > expected {
        return Err(vec![ParseError::mismatch(
            &path,
            text,
            format!(
                "{} stack {group} captures for {expected} declared families",
                tokens.len()
            ),
        )]);
    }
    Ok(tokens)
}

fn parse_resonance(name: &str, path: &CallPath) -> Validated<Option<(Element, ResonanceKind)>> {
    if !name.contains(RESONANCE_MARKER) {
        return Ok(None);
    }
    let path = path.push("parse_resonance");
    let Some(caps) = patterns::RESONANCE.captures(name) else {
        return Err(vec![ParseError::missing(
            &path,
            name,
            "bracket present but no [element:kind] tag",
        )]);
    };
    let element = lift(capture(&caps, "element", &path).and_then(|t| resolve_element(t, &path)));
    let kind = lift(capture(&caps, "kind", &path).and_then(|t| resolve_resonance(t, &path)));
    (element, kind).validate().map(Some)
}

fn scan_name_markers(name: &str) -> Vec<AuxFlag> {
    let mut flags = Vec::new();
    if let Some((_, flag)) = first_contained(name, COUNTER_MARKERS) {
        flags.push(flag);
    }
    flags.extend(
        LITERAL_MARKERS
            .iter()
            .filter(|(marker, _)| name.contains(marker))
            .map(|(_, flag)| *flag),
    );
    flags
}
