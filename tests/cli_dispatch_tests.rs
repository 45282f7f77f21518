use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_memoria")
}

fn sample_catalogue() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/data/memoria.yaml")
}

fn memoria_cmd() -> Command {
    let mut command = Command::new(bin());
    command
        .env("MEMORIA_CATALOGUE", sample_catalogue())
        .env("MEMORIA_LOG", "warn");
    command
}

fn unique_temp_path(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("memoria-{name}-{stamp}.json"))
}

#[test]
fn missing_command_prints_usage() {
    let output = memoria_cmd().output().expect("memoria should run");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: memoria"));
}

#[test]
fn skill_command_emits_parsed_json() {
    let output = memoria_cmd()
        .args(["skill", "通常単体", "ブレイズ・ストライク", "敵1体に通常極大ダメージを与える。"])
        .output()
        .expect("skill should run");

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("skill should emit json");
    assert_eq!(payload["effects"][0]["amount"], "ultraLarge");
}

#[test]
fn skill_command_rejects_unknown_category() {
    let output = memoria_cmd()
        .args(["skill", "攻撃", "ブレイズ", "敵1体に通常大ダメージを与える。"])
        .output()
        .expect("skill should run");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn support_command_lists_every_parse_error() {
    let output = memoria_cmd()
        .args(["support", "守:防御", "いつでも与ダメージを小アップする。"])
        .output()
        .expect("support should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("parse failed: 2 error(s)"));
}

#[test]
fn validate_command_accepts_sample_catalogue() {
    let output = memoria_cmd()
        .args(["validate", sample_catalogue()])
        .output()
        .expect("validate should run");

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("validate should emit json");
    assert_eq!(payload["records"], 16);
    assert_eq!(payload["parsed"], 16);
}

#[test]
fn evaluate_command_writes_csv() {
    let path = unique_temp_path("evaluate");
    fs::write(
        &path,
        r#"{"roster":[{"id":1,"concentration":4},{"id":6,"concentration":4}],"self_stats":{"atk":12000,"sp_atk":9000,"def":8000,"sp_def":8000}}"#,
    )
    .expect("request should be writable");

    let output = memoria_cmd()
        .args(["evaluate", path.to_str().expect("utf-8 temp path"), "--csv"])
        .output()
        .expect("evaluate should run");
    let _ = fs::remove_file(&path);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("card_id,name,concentration,metric,status,value"));
    assert!(stdout.contains("1,紅蓮の一撃,4,damage,,"));
    assert!(stdout.contains(",support,,support_buff,ATK,"));
}

#[test]
fn diff_command_requires_a_request_path() {
    let output = memoria_cmd().arg("diff").output().expect("diff should run");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: memoria diff"));
}
