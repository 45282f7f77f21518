//! Token resolvers: captured substring -> closed enumeration value.
//!
//! Every resolver is total over its vocabulary and rejects anything else with
//! a located `UnknownToken` error; nothing is silently dropped.

use regex::Captures;

use crate::skill::error::{CallPath, ParseError};
use crate::skill::patterns::{first_prefix, STATUS_JOINER, TRIGGER_PREFIXES};
use crate::skill::types::{
    Amount, DamageKind, Element, Probability, Range, ResonanceKind, StatusKind, Trigger,
};
use crate::skill::validation::{lift, validate_all, Validate, Validated};

pub const fn amount_label(amount: Amount) -> &'static str {
    match amount {
        Amount::Small => "小",
        Amount::Medium => "中",
        Amount::Large => "大",
        Amount::ExtraLarge => "特大",
        Amount::SuperLarge => "超特大",
        Amount::UltraLarge => "極大",
        Amount::SuperUltraLarge => "超極大",
    }
}

pub const fn element_label(element: Element) -> &'static str {
    match element {
        Element::Fire => "火",
        Element::Water => "水",
        Element::Wind => "風",
        Element::Light => "光",
        Element::Dark => "闇",
    }
}

pub const fn status_label(status: StatusKind) -> &'static str {
    match status {
        StatusKind::Atk => "ATK",
        StatusKind::Def => "DEF",
        StatusKind::SpAtk => "Sp.ATK",
        StatusKind::SpDef => "Sp.DEF",
        StatusKind::Life => "最大HP",
        StatusKind::FireAtk => "火属性攻撃力",
        StatusKind::FireDef => "火属性防御力",
        StatusKind::WaterAtk => "水属性攻撃力",
        StatusKind::WaterDef => "水属性防御力",
        StatusKind::WindAtk => "風属性攻撃力",
        StatusKind::WindDef => "風属性防御力",
        StatusKind::LightAtk => "光属性攻撃力",
        StatusKind::LightDef => "光属性防御力",
        StatusKind::DarkAtk => "闇属性攻撃力",
        StatusKind::DarkDef => "闇属性防御力",
    }
}

pub const fn resonance_label(kind: ResonanceKind) -> &'static str {
    match kind {
        ResonanceKind::Stimulation => "刺激",
        ResonanceKind::Spread => "拡散",
        ResonanceKind::Strengthen => "強化",
        ResonanceKind::Weaken => "弱体",
    }
}

pub const fn probability_label(probability: Probability) -> &'static str {
    match probability {
        Probability::Certain => "一定",
        Probability::Medium => "中",
        Probability::High => "高",
    }
}

pub fn resolve_amount(token: &str, path: &CallPath) -> Result<Amount, ParseError> {
    Amount::ALL
        .into_iter()
        .find(|amount| amount_label(*amount) == token)
        .ok_or_else(|| ParseError::unknown(&path.push("resolve_amount"), token, "amount tier"))
}

pub fn resolve_element(token: &str, path: &CallPath) -> Result<Element, ParseError> {
    Element::ALL
        .into_iter()
        .find(|element| element_label(*element) == token)
        .ok_or_else(|| ParseError::unknown(&path.push("resolve_element"), token, "element"))
}

pub fn resolve_resonance(token: &str, path: &CallPath) -> Result<ResonanceKind, ParseError> {
    ResonanceKind::ALL
        .into_iter()
        .find(|kind| resonance_label(*kind) == token)
        .ok_or_else(|| {
            ParseError::unknown(&path.push("resolve_resonance"), token, "resonance kind")
        })
}

pub fn resolve_probability(token: &str, path: &CallPath) -> Result<Probability, ParseError> {
    Probability::ALL
        .into_iter()
        .find(|probability| probability_label(*probability) == token)
        .ok_or_else(|| {
            ParseError::unknown(&path.push("resolve_probability"), token, "probability tier")
        })
}

pub fn resolve_damage_kind(token: &str, path: &CallPath) -> Result<DamageKind, ParseError> {
    match token {
        "通常" => Ok(DamageKind::Normal),
        "特殊" => Ok(DamageKind::Special),
        _ => Err(ParseError::unknown(
            &path.push("resolve_damage_kind"),
            token,
            "damage kind",
        )),
    }
}

/// Single status token; `Sp.ATK` is matched whole, never as a trailing `ATK`.
pub fn resolve_status(token: &str, path: &CallPath) -> Result<StatusKind, ParseError> {
    let path = path.push("resolve_status");
    match token {
        "ATK" => return Ok(StatusKind::Atk),
        "DEF" => return Ok(StatusKind::Def),
        "Sp.ATK" => return Ok(StatusKind::SpAtk),
        "Sp.DEF" => return Ok(StatusKind::SpDef),
        "最大HP" => return Ok(StatusKind::Life),
        _ => {}
    }
    let elemental = token
        .strip_suffix("属性攻撃力")
        .map(|element| (element, true))
        .or_else(|| token.strip_suffix("属性防御力").map(|element| (element, false)));
    match elemental {
        Some((element, is_attack)) => {
            let element = resolve_element(element, &path)?;
            Ok(if is_attack {
                StatusKind::elemental_atk(element)
            } else {
                StatusKind::elemental_def(element)
            })
        }
        None => Err(ParseError::unknown(&path, token, "status")),
    }
}

/// `ATKとSp.DEF` -> every token resolved independently; any failure fails the list.
pub fn resolve_status_list(list: &str, path: &CallPath) -> Validated<Vec<StatusKind>> {
    let path = path.push("resolve_status_list");
    if list.is_empty() {
        return Err(vec![ParseError::missing(&path, list, "empty status list")]);
    }
    validate_all(
        list.split(STATUS_JOINER)
            .map(|token| lift(resolve_status(token.trim(), &path))),
    )
}

/// Trigger channel from the literal two-character prefix of a support-skill name.
pub fn resolve_trigger(name: &str, path: &CallPath) -> Result<Trigger, ParseError> {
    first_prefix(name.trim_start(), TRIGGER_PREFIXES)
        .map(|(_, trigger)| trigger)
        .ok_or_else(|| {
            ParseError::mismatch(
                &path.push("resolve_trigger"),
                name,
                "name has no trigger prefix (攻:/援:/回:/コ:)",
            )
        })
}

pub fn parse_count(token: &str, path: &CallPath) -> Result<u8, ParseError> {
    token.parse::<u8>().map_err(|err| {
        ParseError::invalid_number(&path.push("parse_count"), token, err.to_string())
    })
}

pub fn parse_rate(token: &str, path: &CallPath) -> Result<f64, ParseError> {
    token.parse::<f64>().map_err(|err| {
        ParseError::invalid_number(&path.push("parse_rate"), token, err.to_string())
    })
}

pub fn parse_times(token: &str, path: &CallPath) -> Result<u32, ParseError> {
    token.parse::<u32>().map_err(|err| {
        ParseError::invalid_number(&path.push("parse_times"), token, err.to_string())
    })
}

/// Named capture that the surrounding pattern guarantees; absence is a `MissingCapture`.
pub fn capture<'t>(
    caps: &Captures<'t>,
    name: &str,
    path: &CallPath,
) -> Result<&'t str, ParseError> {
    caps.name(name).map(|m| m.as_str()).ok_or_else(|| {
        let whole = caps.get(0).map_or("", |m| m.as_str());
        ParseError::missing(path, whole, format!("capture '{name}' absent"))
    })
}

/// `min` / optional `max` captures of a target-count phrase.
pub fn resolve_range(caps: &Captures<'_>, path: &CallPath) -> Validated<Range> {
    let path = path.push("resolve_range");
    let min = lift(capture(caps, "min", &path).and_then(|token| parse_count(token, &path)));
    let max = match caps.name("max") {
        Some(token) => lift(parse_count(token.as_str(), &path)).map(Some),
        None => Ok(None),
    };
    let (min, max) = (min, max).validate()?;
    let max = max.unwrap_or(min);
    if max < min {
        return Err(vec![ParseError::mismatch(
            &path,
            caps.get(0).map_or("", |m| m.as_str()),
            format!("target range {min}～{max} is inverted"),
        )]);
    }
    Ok(Range { min, max })
}
