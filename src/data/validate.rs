use std::fmt;

use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::data::card::{Card, Memoria};
use crate::data::catalogue::Catalogue;
use crate::parallel::WorkerPool;
use crate::skill::{Effect, StatusKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    /// RFC 3339 timestamp of when the report was produced.
    pub generated_at: String,
    pub records: usize,
    pub parsed: usize,
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }

    fn for_record(parsed: bool) -> Self {
        Self {
            records: 1,
            parsed: usize::from(parsed),
            ..Self::default()
        }
    }

    fn merge(&mut self, other: ValidationReport) {
        self.records += other.records;
        self.parsed += other.parsed;
        self.diagnostics.extend(other.diagnostics);
    }
}

/// Parse every record of `catalogue` in parallel and check the invariants a
/// parsed card must satisfy.
pub fn validate_catalogue(catalogue: &Catalogue, pool: WorkerPool) -> ValidationReport {
    let records: Vec<&Memoria> = catalogue.records().collect();
    let per_record: Vec<ValidationReport> =
        pool.install(|| records.par_iter().map(|record| validate_record(record)).collect());

    let mut report = ValidationReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        ..ValidationReport::default()
    };
    for record_report in per_record {
        report.merge(record_report);
    }
    info!(
        records = report.records,
        parsed = report.parsed,
        errors = report.count(ValidationSeverity::Error),
        warnings = report.count(ValidationSeverity::Warning),
        "validated catalogue"
    );
    report
}

fn validate_record(record: &Memoria) -> ValidationReport {
    let context = format!("memoria[{}] {}", record.id, record.name);
    let card = Card::from_memoria(record);
    let mut report = ValidationReport::for_record(card.is_ok());

    for pair in record.status.windows(2) {
        if pair[0].iter().zip(pair[1].iter()).any(|(lower, higher)| higher < lower) {
            report.push(
                ValidationSeverity::Warning,
                &context,
                "base stats decrease with concentration",
            );
            break;
        }
    }
    if let Some(legendary) = &record.legendary {
        if legendary.elements.is_empty() {
            report.push(
                ValidationSeverity::Warning,
                &context,
                "legendary skill lists no elements",
            );
        }
    }

    let card = match card {
        Ok(card) => card,
        Err(errors) => {
            for error in errors {
                report.push(ValidationSeverity::Error, &context, error.to_string());
            }
            return report;
        }
    };

    let damage = card.skill.effects.iter().filter(|e| e.is_damage()).count();
    let expected = usize::from(card.category.is_attack());
    if damage != expected {
        report.push(
            ValidationSeverity::Error,
            &context,
            format!(
                "category {} carries {damage} damage effects, expected {expected}",
                card.category
            ),
        );
    }
    if card
        .skill
        .effects
        .iter()
        .any(|effect| matches!(effect, Effect::Debuff { status: StatusKind::Life, .. }))
    {
        report.push(
            ValidationSeverity::Warning,
            &context,
            "debuff on Life parses but stops evaluation",
        );
    }
    report
}
