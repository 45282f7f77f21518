//! Skill-text parsing: Japanese ability text -> typed effect records.

pub mod error;
pub mod parser;
pub mod patterns;
pub mod resolver;
pub mod support;
pub mod types;
pub mod validation;

pub use error::{CallPath, ParseError, ParseErrorKind};
pub use parser::parse_skill;
pub use support::parse_support;
pub use types::{
    Amount, AuxFlag, Category, DamageKind, Effect, Element, Probability, Range, RawSkill,
    ResonanceKind, Skill, StackKind, StatusKind, SupportEffect, SupportSkill, SupportType, Trigger,
};
pub use validation::{Validate, Validated};
