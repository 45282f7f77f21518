//! Flatten an evaluation report into CSV rows.
//!
//! One row per expected value: `card_id,name,concentration,metric,status,value`.
//! Ally support rows carry an empty card id and the name `support`.

use std::io::Write;

use serde::Serialize;

use crate::combat::engine::EvaluationReport;
use crate::skill::types::StatusKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub card_id: Option<u32>,
    pub name: String,
    pub concentration: Option<u8>,
    pub metric: &'static str,
    pub status: Option<StatusKind>,
    pub value: u64,
}

pub fn report_rows(report: &EvaluationReport) -> Vec<ExportRow> {
    let mut rows = Vec::new();
    for card in &report.skill {
        let row = |metric: &'static str, status: Option<StatusKind>, value: u64| ExportRow {
            card_id: Some(card.card_id),
            name: card.name.clone(),
            concentration: Some(card.concentration),
            metric,
            status,
            value,
        };
        if let Some(damage) = card.expected.damage {
            rows.push(row("damage", None, damage));
        }
        rows.extend(
            card.expected
                .buff
                .iter()
                .map(|(status, value)| row("buff", Some(*status), *value)),
        );
        rows.extend(
            card.expected
                .debuff
                .iter()
                .map(|(status, value)| row("debuff", Some(*status), *value)),
        );
        if let Some(recovery) = card.expected.recovery {
            rows.push(row("recovery", None, recovery));
        }
    }
    for (metric, map) in [
        ("support_buff", &report.support_buff),
        ("support_debuff", &report.support_debuff),
    ] {
        rows.extend(map.iter().map(|(status, value)| ExportRow {
            card_id: None,
            name: "support".to_string(),
            concentration: None,
            metric,
            status: Some(*status),
            value: *value,
        }));
    }
    rows
}

pub fn write_report<W: Write>(report: &EvaluationReport, writer: W) -> Result<(), csv::Error> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in report_rows(report) {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}
