use serde::{Deserialize, Serialize};

use crate::combat::{
    diff, evaluate, Charm, Costume, EvaluateOptions, EvaluateRequest, EvaluationError,
    OpponentDefense, PartyStats, RosterEntry,
};
use crate::data::catalogue::{Catalogue, CatalogueError};
use crate::skill::{parse_skill, parse_support, Category, Element, ParseError, RawSkill};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    BadRequest(#[source] serde_json::Error),
    #[error("{} parse error(s)", .0.len())]
    Parse(Vec<ParseError>),
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error("unable to serialize response: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> (u16, &'static str) {
        match self {
            Self::BadRequest(_) => (400, "Bad Request"),
            Self::Evaluation(err) if err.is_hard_stop() => (500, "Internal Server Error"),
            Self::Parse(_) | Self::Catalogue(_) | Self::Evaluation(_) => {
                (422, "Unprocessable Entity")
            }
            Self::Serialize(_) => (500, "Internal Server Error"),
        }
    }

    /// JSON error body; parse failures list every located error.
    pub fn body(&self) -> String {
        let errors: &[ParseError] = match self {
            Self::Parse(errors) | Self::Catalogue(CatalogueError::Unparseable { errors, .. }) => {
                errors.as_slice()
            }
            _ => &[],
        };
        let payload = ErrorBody {
            status: "error",
            message: self.to_string(),
            hard_stop: matches!(self, Self::Evaluation(err) if err.is_hard_stop()),
            errors,
        };
        serde_json::to_string_pretty(&payload).unwrap_or_else(|_| {
            "{\n  \"status\": \"error\",\n  \"message\": \"Unknown error\"\n}".to_string()
        })
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    status: &'static str,
    message: String,
    #[serde(skip_serializing_if = "is_false")]
    hard_stop: bool,
    #[serde(skip_serializing_if = "no_errors")]
    errors: &'a [ParseError],
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

fn no_errors(errors: &&[ParseError]) -> bool {
    errors.is_empty()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkillRequest {
    pub category: Category,
    pub skill: RawSkill,
}

/// Roster member referenced by catalogue id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSlot {
    pub id: u32,
    #[serde(default)]
    pub concentration: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatePayload {
    pub roster: Vec<RosterSlot>,
    #[serde(default)]
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

impl EvaluatePayload {
    /// Replace ids with parsed cards from `catalogue`.
    pub fn resolve(&self, catalogue: &Catalogue) -> Result<EvaluateRequest, ApiError> {
        let roster = self
            .roster
            .iter()
            .map(|slot| resolve_slot(*slot, catalogue))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EvaluateRequest {
            roster,
            self_stats: self.self_stats,
            opponent: self.opponent,
            charm: self.charm.clone(),
            costume: self.costume.clone(),
            options: self.options.clone(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffPayload {
    #[serde(flatten)]
    pub evaluate: EvaluatePayload,
    pub swap_out: u32,
    pub swap_in: RosterSlot,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemoriaListItem {
    pub id: u32,
    pub name: String,
    pub category: Category,
    pub element: Element,
    pub legendary: bool,
}

pub fn resolve_slot(slot: RosterSlot, catalogue: &Catalogue) -> Result<RosterEntry, ApiError> {
    Ok(RosterEntry {
        card: catalogue.card(slot.id)?,
        concentration: slot.concentration,
    })
}

fn parse_body<'a, T: Deserialize<'a>>(body: &'a str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(ApiError::BadRequest)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(ApiError::Serialize)
}

pub fn health_payload(catalogue: &Catalogue) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "memoria-api",
        "version": env!("CARGO_PKG_VERSION"),
        "memoria": catalogue.len(),
    }))
}

pub fn memoria_payload(catalogue: &Catalogue) -> Result<String, ApiError> {
    let list: Vec<MemoriaListItem> = catalogue
        .records()
        .map(|record| MemoriaListItem {
            id: record.id,
            name: record.name.clone(),
            category: record.category,
            element: record.element,
            legendary: record.legendary.is_some(),
        })
        .collect();
    to_json(&list)
}

pub fn skill_payload(body: &str) -> Result<String, ApiError> {
    let request: SkillRequest = parse_body(body)?;
    let skill = parse_skill(request.category, &request.skill).map_err(ApiError::Parse)?;
    to_json(&skill)
}

pub fn support_payload(body: &str) -> Result<String, ApiError> {
    let raw: RawSkill = parse_body(body)?;
    let support = parse_support(&raw).map_err(ApiError::Parse)?;
    to_json(&support)
}

pub fn evaluate_payload(body: &str, catalogue: &Catalogue) -> Result<String, ApiError> {
    let payload: EvaluatePayload = parse_body(body)?;
    let report = evaluate(&payload.resolve(catalogue)?)?;
    to_json(&report)
}

pub fn diff_payload(body: &str, catalogue: &Catalogue) -> Result<String, ApiError> {
    let payload: DiffPayload = parse_body(body)?;
    let request = payload.evaluate.resolve(catalogue)?;
    let swap_in = resolve_slot(payload.swap_in, catalogue)?;
    let report = diff(&request, payload.swap_out, &swap_in)?;
    to_json(&report)
}
