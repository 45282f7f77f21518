use std::fs;
use std::io;

use serde::Serialize;
use tracing::error;

use crate::combat::{diff, evaluate, export_csv};
use crate::config::Config;
use crate::data::catalogue::{load_catalogue, Catalogue};
use crate::data::validate::validate_catalogue;
use crate::parallel::WorkerPool;
use crate::server;
use crate::server::api::{resolve_slot, ApiError, DiffPayload, EvaluatePayload};
use crate::skill::{parse_skill, parse_support, Category, ParseError, RawSkill};

const USAGE: &str = "usage: memoria <serve|skill|support|validate|evaluate|diff>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Skill,
    Support,
    Validate,
    Evaluate,
    Diff,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("skill") => Some(Command::Skill),
        Some("support") => Some(Command::Support),
        Some("validate") => Some(Command::Validate),
        Some("evaluate") => Some(Command::Evaluate),
        Some("diff") => Some(Command::Diff),
        _ => None,
    }
}

pub fn run_with_args(args: &[String], config: &Config) -> i32 {
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(config),
        Some(Command::Skill) => handle_skill(args),
        Some(Command::Support) => handle_support(args),
        Some(Command::Validate) => handle_validate(args, config),
        Some(Command::Evaluate) => handle_evaluate(args, config),
        Some(Command::Diff) => handle_diff(args, config),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

/// Category by its catalogue label (`通常単体`) or variant name (`NormalSingle`).
fn parse_category(token: &str) -> Option<Category> {
    Category::ALL
        .into_iter()
        .find(|category| category.label() == token || format!("{category:?}") == token)
}

fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize result: {err}");
            1
        }
    }
}

fn report_parse_errors(errors: &[ParseError]) -> i32 {
    eprintln!("parse failed: {} error(s)", errors.len());
    for err in errors {
        eprintln!("- {err}");
    }
    1
}

fn open_catalogue(config: &Config) -> Result<Catalogue, i32> {
    load_catalogue(&config.catalogue).map_err(|err| {
        error!(error = %err, "catalogue unavailable");
        eprintln!("catalogue error: {err}");
        1
    })
}

fn read_payload(path: &str) -> Result<String, i32> {
    fs::read_to_string(path).map_err(|err| {
        eprintln!("unable to read '{path}': {err}");
        1
    })
}

fn report_api_error(err: &ApiError) -> i32 {
    eprintln!("{err}");
    if let ApiError::Parse(errors) = err {
        return report_parse_errors(errors);
    }
    1
}

fn handle_serve(config: &Config) -> i32 {
    let catalogue = match open_catalogue(config) {
        Ok(catalogue) => catalogue,
        Err(code) => return code,
    };
    match server::run_server(&config.bind, &catalogue) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_skill(args: &[String]) -> i32 {
    let (Some(category), Some(name), Some(description)) = (args.get(2), args.get(3), args.get(4))
    else {
        eprintln!("usage: memoria skill <category> <name> <description>");
        return 2;
    };
    let Some(category) = parse_category(category) else {
        eprintln!("unknown category '{category}'");
        return 2;
    };
    match parse_skill(category, &RawSkill::new(name.as_str(), description.as_str())) {
        Ok(skill) => print_json(&skill),
        Err(errors) => report_parse_errors(&errors),
    }
}

fn handle_support(args: &[String]) -> i32 {
    let (Some(name), Some(description)) = (args.get(2), args.get(3)) else {
        eprintln!("usage: memoria support <name> <description>");
        return 2;
    };
    match parse_support(&RawSkill::new(name.as_str(), description.as_str())) {
        Ok(support) => print_json(&support),
        Err(errors) => report_parse_errors(&errors),
    }
}

fn handle_validate(args: &[String], config: &Config) -> i32 {
    let config = match args.get(2) {
        Some(path) => Config {
            catalogue: path.into(),
            ..config.clone()
        },
        None => config.clone(),
    };
    let catalogue = match open_catalogue(&config) {
        Ok(catalogue) => catalogue,
        Err(code) => return code,
    };
    let report = validate_catalogue(&catalogue, WorkerPool::with_workers(config.workers));
    let code = print_json(&report);
    if report.has_errors() {
        eprintln!(
            "validation failed: {} of {} record(s) parsed",
            report.parsed, report.records
        );
        return 1;
    }
    code
}

fn handle_evaluate(args: &[String], config: &Config) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: memoria evaluate <request.json> [--csv]");
        return 2;
    };
    let as_csv = args.iter().any(|arg| arg == "--csv");
    let (catalogue, body) = match (open_catalogue(config), read_payload(path)) {
        (Ok(catalogue), Ok(body)) => (catalogue, body),
        (Err(code), _) | (_, Err(code)) => return code,
    };

    let payload: EvaluatePayload = match serde_json::from_str(&body) {
        Ok(payload) => payload,
        Err(err) => {
            eprintln!("invalid request '{path}': {err}");
            return 1;
        }
    };
    let report = match payload
        .resolve(&catalogue)
        .and_then(|request| evaluate(&request).map_err(ApiError::from))
    {
        Ok(report) => report,
        Err(err) => return report_api_error(&err),
    };

    if as_csv {
        match export_csv::write_report(&report, io::stdout().lock()) {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("failed to write csv: {err}");
                1
            }
        }
    } else {
        print_json(&report)
    }
}

fn handle_diff(args: &[String], config: &Config) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: memoria diff <request.json>");
        return 2;
    };
    let (catalogue, body) = match (open_catalogue(config), read_payload(path)) {
        (Ok(catalogue), Ok(body)) => (catalogue, body),
        (Err(code), _) | (_, Err(code)) => return code,
    };

    let payload: DiffPayload = match serde_json::from_str(&body) {
        Ok(payload) => payload,
        Err(err) => {
            eprintln!("invalid request '{path}': {err}");
            return 1;
        }
    };
    let result = payload.evaluate.resolve(&catalogue).and_then(|request| {
        let swap_in = resolve_slot(payload.swap_in, &catalogue)?;
        diff(&request, payload.swap_out, &swap_in).map_err(ApiError::from)
    });
    match result {
        Ok(report) => print_json(&report),
        Err(err) => report_api_error(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn commands_are_recognized() {
        assert_eq!(parse_command(&args(&["memoria", "diff"])), Some(Command::Diff));
        assert_eq!(parse_command(&args(&["memoria", "simulate"])), None);
    }

    #[test]
    fn category_accepts_label_or_variant() {
        assert_eq!(parse_category("回復"), Some(Category::Recovery));
        assert_eq!(parse_category("SpecialRange"), Some(Category::SpecialRange));
        assert_eq!(parse_category("攻撃"), None);
    }
}
