//! Pattern library: one regular expression or literal table per semantic category.
//!
//! Amount, status and element captures are loose (`[^、。]+?`): an unexpected
//! token still reaches its resolver and fails there with `UnknownToken`.

use std::sync::LazyLock;

use regex::Regex;

use crate::skill::types::{AuxFlag, StackKind, Trigger};

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("pattern library regex")
}

const RANGE: &str = r"(?P<min>\d+)(?:[～〜~](?P<max>\d+))?体";
const STATUS_TOKEN: &str = r"(?:[A-Za-z.]+|最大HP|[^\sをの、。]属性(?:攻撃力|防御力))";

/// `敵1～3体に通常特大ダメージを与え`
pub static DAMAGE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"敵{RANGE}に(?P<kind>通常|特殊)(?P<amount>[^、。]+?)ダメージを与え"
    ))
});

/// `味方のATKを小アップ` / `敵のDEFを中ダウン` appended after a damage sentence.
/// A clause without a side (`し、DEFを中アップ`) continues the previous one.
pub static DAMAGE_RIDER: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?:(?P<side>味方|敵)の)?(?P<status>[^を、。]+)を(?P<amount>[^、。]+?)(?P<direction>アップ|ダウン)")
});

/// `味方1～2体のATKとSp.ATKを大アップし、DEFを小アップ`
pub static BUFF: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"味方{RANGE}の(?P<status>[^を、。]+)を(?P<amount>[^、。]+?)アップ(?:し、(?P<status2>[^を、。]+)を(?P<amount2>[^、。]+?)アップ)?"
    ))
});

/// `敵1～2体のATKを大ダウンさせ、DEFを小ダウン`
pub static DEBUFF: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"敵{RANGE}の(?P<status>[^を、。]+)を(?P<amount>[^、。]+?)ダウン(?:させ、(?P<status2>[^を、。]+)を(?P<amount2>[^、。]+?)ダウン)?"
    ))
});

/// `味方1～2体のHPを大回復`
pub static HEAL: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(r"味方{RANGE}のHPを(?P<amount>[^、。]+?)回復"))
});

/// `さらに味方のATKを小アップ` (or `し、味方の…`) following a heal sentence.
pub static HEAL_RIDER: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?:さらに、?)?味方の(?P<status>[^を、。]+)を(?P<amount>[^、。]+?)アップ")
});

/// Any `…を{amount}{verb}` clause. Used to find clauses no recognizer consumed.
pub static CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"[^、。を]*を(?P<amount>[^を、。]+?)(?:アップ|ダウン|軽減|拡大)")
});

pub static STACK_RATE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?P<rate>\d+(?:\.\d+)?)[%％]"));

pub static STACK_TIMES: LazyLock<Regex> = LazyLock::new(|| compile(r"(?P<times>\d+)回"));

/// `[火:刺激]` in a skill name.
pub static RESONANCE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"\[(?P<element>[^\]:：]+)[:：](?P<kind>[^\]]+)\]")
});

pub const RESONANCE_MARKER: char = '[';

pub static SUPPORT_PROBABILITY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?P<probability>一定|[^\s、。])確率"));

/// Status up/down inside a support description; may occur many times.
/// `し、DEFを中アップ` continues the previous clause.
pub static SUPPORT_STATUS: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"(?:の|し、|させ、)(?P<status>{STATUS_TOKEN}(?:と{STATUS_TOKEN})*)を(?P<amount>[^をの、。]+?)(?P<direction>アップ|ダウン)"
    ))
});

pub static SUPPORT_DAMAGE_UP: LazyLock<Regex> =
    LazyLock::new(|| compile(r"与ダメージを(?P<amount>[^、。]+?)アップ"));

pub static SUPPORT_SUPPORT_UP: LazyLock<Regex> =
    LazyLock::new(|| compile(r"支援[/／・]妨害効果を(?P<amount>[^、。]+?)アップ"));

pub static SUPPORT_RECOVERY_UP: LazyLock<Regex> =
    LazyLock::new(|| compile(r"回復量を(?P<amount>[^、。]+?)アップ"));

pub static SUPPORT_MATCH_PT_UP: LazyLock<Regex> =
    LazyLock::new(|| compile(r"マッチPtを(?P<amount>[^、。]+?)アップ"));

pub static SUPPORT_MP_COST_DOWN: LazyLock<Regex> =
    LazyLock::new(|| compile(r"消費MPを(?P<amount>[^、。]+?)軽減"));

pub static SUPPORT_RANGE_UP: LazyLock<Regex> =
    LazyLock::new(|| compile(r"効果範囲を(?P<amount>[^、。]+?)拡大"));

/// Joiner between tokens of a multi-status list.
pub const STATUS_JOINER: char = 'と';

/// Name prefixes selecting a support skill's trigger channel, tried in order.
pub const TRIGGER_PREFIXES: &[(&str, Trigger)] = &[
    ("攻:", Trigger::Attack),
    ("攻：", Trigger::Attack),
    ("援:", Trigger::Assist),
    ("援：", Trigger::Assist),
    ("回:", Trigger::Recovery),
    ("回：", Trigger::Recovery),
    ("コ:", Trigger::Command),
    ("コ：", Trigger::Command),
];

/// Characters that delimit words of a skill name.
pub const NAME_SEPARATORS: &[char] = &['・', ' ', '　', '/', '／', '&', '＆', '['];

/// Stack family markers in a skill name.
pub const STACK_MARKERS: &[(&str, StackKind)] = &[
    ("メテオ", StackKind::Meteor),
    ("バリア", StackKind::Barrier),
    ("エデン", StackKind::Eden),
    ("アニマ", StackKind::Anima),
];

/// Counter markers; `Sカウンター` must win over its `カウンター` suffix.
pub const COUNTER_MARKERS: &[(&str, AuxFlag)] = &[
    ("Sカウンター", AuxFlag::SCounter),
    ("Ｓカウンター", AuxFlag::SCounter),
    ("カウンター", AuxFlag::Counter),
];

/// Independent literal markers, each optional.
pub const LITERAL_MARKERS: &[(&str, AuxFlag)] = &[
    ("チャージ", AuxFlag::Charge),
    ("ヒール", AuxFlag::Heal),
    ("リカバー", AuxFlag::Recover),
];

/// Ordered fallback chain: the first candidate whose literal satisfies `test`
/// wins, and the caller learns which literal matched.
pub fn first_match<T: Copy>(
    candidates: &[(&'static str, T)],
    test: impl Fn(&str) -> bool,
) -> Option<(&'static str, T)> {
    candidates
        .iter()
        .find(|(literal, _)| test(literal))
        .copied()
}

pub fn first_prefix<T: Copy>(
    text: &str,
    candidates: &[(&'static str, T)],
) -> Option<(&'static str, T)> {
    first_match(candidates, |literal| text.starts_with(literal))
}

pub fn first_contained<T: Copy>(
    text: &str,
    candidates: &[(&'static str, T)],
) -> Option<(&'static str, T)> {
    first_match(candidates, |literal| text.contains(literal))
}

/// Every stack family named in `name`, ordered by where it appears. A marker
/// only counts as a whole word: `バリアント` does not declare Barrier.
pub fn stack_families(name: &str) -> Vec<StackKind> {
    let mut found: Vec<(usize, StackKind)> = STACK_MARKERS
        .iter()
        .filter_map(|(marker, kind)| {
            name.match_indices(marker)
                .find(|(pos, _)| is_whole_word(name, *pos, marker.len()))
                .map(|(pos, _)| (pos, *kind))
        })
        .collect();
    found.sort_by_key(|(pos, _)| *pos);
    found.into_iter().map(|(_, kind)| kind).collect()
}

fn is_whole_word(name: &str, start: usize, len: usize) -> bool {
    let before = name[..start].chars().next_back();
    let after = name[start + len..].chars().next();
    let bounded = |c: Option<char>| c.map_or(true, |c| NAME_SEPARATORS.contains(&c));
    bounded(before) && bounded(after)
}
