use memoria::combat::{
    evaluate, Charm, Costume, ElementBoost, EvaluateOptions, EvaluateRequest, EvaluationError,
    OpponentDefense, PartyStats, RosterEntry, StackOptions,
};
use memoria::data::{Card, LegendarySkill, Memoria};
use memoria::skill::{Amount, Category, Element, RawSkill, StatusKind, Trigger};

const DAMAGE_UP: (&str, &str) = (
    "攻:与ダメージUP",
    "攻撃時、一定確率で与ダメージを小アップする。",
);

fn card(
    id: u32,
    category: Category,
    element: Element,
    skill: (&str, &str),
    support: (&str, &str),
) -> Card {
    Card::from_memoria(&Memoria {
        id,
        name: format!("memoria-{id}"),
        category,
        element,
        status: [[0; 4]; 5],
        skill: RawSkill::new(skill.0, skill.1),
        support: RawSkill::new(support.0, support.1),
        legendary: None,
    })
    .expect("test card should parse")
}

fn striker(id: u32) -> Card {
    card(
        id,
        Category::NormalSingle,
        Element::Fire,
        ("ブレイズ・ストライク", "敵1体に通常極大ダメージを与える。"),
        DAMAGE_UP,
    )
}

fn at_max(card: Card) -> RosterEntry {
    RosterEntry {
        card,
        concentration: 4,
    }
}

fn request(roster: Vec<RosterEntry>) -> EvaluateRequest {
    EvaluateRequest {
        roster,
        self_stats: PartyStats {
            atk: 12345,
            sp_atk: 10000,
            def: 0,
            sp_def: 0,
        },
        opponent: OpponentDefense::default(),
        charm: None,
        costume: None,
        options: EvaluateOptions::default(),
    }
}

fn damage_of(request: &EvaluateRequest, card_id: u32) -> Option<u64> {
    let report = evaluate(request).expect("evaluation should succeed");
    report
        .skill
        .iter()
        .find(|result| result.card_id == card_id)
        .and_then(|result| result.expected.damage)
}

#[test]
fn single_target_damage_is_floored_once() {
    // 0.198 × 1.5 × 12345 = 3666.465
    assert_eq!(damage_of(&request(vec![at_max(striker(1))]), 1), Some(3666));
}

#[test]
fn opponent_defense_reduces_normal_damage() {
    let mut request = request(vec![at_max(striker(1))]);
    request.opponent = OpponentDefense {
        def: 3000,
        sp_def: 0,
    };
    // base 12345 - 2000 = 10345
    assert_eq!(damage_of(&request, 1), Some(3072));
}

#[test]
fn counter_and_stack_multiply_the_card_value() {
    let counter = card(
        2,
        Category::NormalSingle,
        Element::Fire,
        ("カウンター・ブレイク", "敵1体に通常極大ダメージを与える。"),
        DAMAGE_UP,
    );
    let mut request = request(vec![at_max(counter)]);
    assert_eq!(damage_of(&request, 2), Some(3666));

    request.options.counter_enabled = true;
    assert_eq!(damage_of(&request, 2), Some(5499));

    request.options.counter_enabled = false;
    request.options.stack = Some(StackOptions {
        rate: 1.2,
        targets: vec![2],
    });
    assert_eq!(damage_of(&request, 2), Some(4399));

    request.options.stack = Some(StackOptions {
        rate: 1.2,
        targets: vec![99],
    });
    assert_eq!(damage_of(&request, 2), Some(3666));
}

#[test]
fn theme_element_calibrates_matching_cards() {
    let mut request = request(vec![at_max(striker(1))]);
    request.options.theme = Some(Element::Water);
    assert_eq!(damage_of(&request, 1), Some(3666));
    request.options.theme = Some(Element::Fire);
    assert_eq!(damage_of(&request, 1), Some(4033));
}

#[test]
fn charm_boosts_only_its_element() {
    let mut request = request(vec![at_max(striker(1))]);
    request.charm = Some(Charm {
        name: "アクアリング".to_string(),
        ability: Some(ElementBoost {
            element: Element::Water,
            rate: 0.2,
        }),
    });
    assert_eq!(damage_of(&request, 1), Some(3666));

    request.charm = Some(Charm {
        name: "フレイムリング".to_string(),
        ability: Some(ElementBoost {
            element: Element::Fire,
            rate: 0.2,
        }),
    });
    // 3666.465 × 1.2
    assert_eq!(damage_of(&request, 1), Some(4399));
}

#[test]
fn costume_base_bonus_applies_to_every_card() {
    let mut request = request(vec![at_max(striker(1))]);
    request.costume = Some(Costume {
        name: "制服".to_string(),
        base_bonus: true,
        skill: None,
    });
    // 3666.465 × 1.10
    assert_eq!(damage_of(&request, 1), Some(4033));
}

#[test]
fn costume_skill_boosts_its_element() {
    let mut request = request(vec![at_max(striker(1))]);
    request.costume = Some(Costume {
        name: "火の衣装".to_string(),
        base_bonus: false,
        skill: Some(ElementBoost {
            element: Element::Fire,
            rate: 0.15,
        }),
    });
    // 3666.465 × 1.15
    assert_eq!(damage_of(&request, 1), Some(4216));
}

#[test]
fn grace_multiplies_every_card() {
    let mut request = request(vec![at_max(striker(1))]);
    request.options.grace = true;
    // 3666.465 × 1.05
    assert_eq!(damage_of(&request, 1), Some(3849));
}

#[test]
fn calibration_factors_compose_multiplicatively() {
    let mut request = request(vec![at_max(striker(1))]);
    request.charm = Some(Charm {
        name: "フレイムリング".to_string(),
        ability: Some(ElementBoost {
            element: Element::Fire,
            rate: 0.2,
        }),
    });
    request.costume = Some(Costume {
        name: "火の衣装".to_string(),
        base_bonus: true,
        skill: Some(ElementBoost {
            element: Element::Fire,
            rate: 0.15,
        }),
    });
    request.options.theme = Some(Element::Fire);
    request.options.grace = true;
    // 3666.465 × 1.2 × 1.10 × 1.15 × 1.10 × 1.05
    assert_eq!(damage_of(&request, 1), Some(6428));
}

#[test]
fn special_damage_reads_sp_atk_against_sp_def() {
    let caster = card(
        7,
        Category::SpecialSingle,
        Element::Water,
        ("アクア・ノヴァ", "敵1体に特殊極大ダメージを与える。"),
        DAMAGE_UP,
    );
    let mut request = request(vec![at_max(caster)]);
    request.opponent = OpponentDefense {
        def: 9000,
        sp_def: 3300,
    };
    // 0.198 × 1.5 × (10000 - 2/3 × 3300)
    assert_eq!(damage_of(&request, 7), Some(2316));
}

fn healer(support: (&str, &str)) -> Card {
    card(
        8,
        Category::Recovery,
        Element::Light,
        ("ムーン・ライト", "味方1体のHPを中回復する。"),
        support,
    )
}

fn recovery_of(request: &EvaluateRequest, card_id: u32) -> Option<u64> {
    let report = evaluate(request).expect("evaluation should succeed");
    report
        .skill
        .iter()
        .find(|result| result.card_id == card_id)
        .and_then(|result| result.expected.recovery)
}

#[test]
fn heal_reads_def_plus_sp_def() {
    let mut request = request(vec![at_max(healer(DAMAGE_UP))]);
    request.self_stats.def = 5000;
    request.self_stats.sp_def = 3001;
    // 0.08 × 1.5 × 8001
    assert_eq!(recovery_of(&request, 8), Some(960));
}

#[test]
fn recovery_up_scales_recovery_cards() {
    let mut request = request(vec![
        at_max(healer((
            "回:回復量UP",
            "回復スキル発動時、中確率で回復量を中アップする。",
        ))),
        at_max(striker(1)),
    ]);
    request.self_stats.def = 5000;
    request.self_stats.sp_def = 3001;
    // 960.12 × (1 + 0.15 × 0.18)
    assert_eq!(recovery_of(&request, 8), Some(986));
    assert_eq!(damage_of(&request, 1), Some(3666));
}

#[test]
fn support_up_scales_assist_cards_only() {
    let buffer = card(
        1,
        Category::Support,
        Element::Dark,
        ("ダーク・ブレス", "味方1体のATKを大アップする。"),
        DAMAGE_UP,
    );
    let booster = card(
        2,
        Category::Interference,
        Element::Dark,
        ("ダーク・カース", "敵1体のDEFを小ダウンさせる。"),
        (
            "援:支援UP",
            "支援/妨害スキル発動時、一定確率で支援/妨害効果を中アップする。",
        ),
    );
    let report = evaluate(&request(vec![at_max(buffer), at_max(booster), at_max(striker(3))]))
        .expect("evaluation should succeed");

    // multiplier 1 + 0.15 × 0.12
    assert_eq!(report.skill[0].expected.buff.get(&StatusKind::Atk), Some(&566));
    assert_eq!(report.skill[1].expected.debuff.get(&StatusKind::Def), Some(&277));
    assert_eq!(report.skill[2].expected.damage, Some(3666));
}

#[test]
fn command_legendary_raises_activation_of_its_elements() {
    let buffer = card(
        1,
        Category::Support,
        Element::Light,
        ("ホーリー・ブレス", "味方1体のATKを大アップする。"),
        (
            "援:支援UP",
            "支援/妨害スキル発動時、一定確率で支援/妨害効果を中アップする。",
        ),
    );
    let mut commander = card(
        2,
        Category::Recovery,
        Element::Water,
        ("リカバー・ムーン", "味方1体のHPを中回復する。"),
        ("コ:マッチPtUP", "コマンド時、一定確率でマッチPtを中アップする。"),
    );
    commander.legendary = Some(LegendarySkill {
        trigger: Trigger::Command,
        elements: vec![Element::Light],
        rates: [0.03; 5],
    });
    let report = evaluate(&request(vec![at_max(buffer), at_max(commander)]))
        .expect("evaluation should succeed");

    // multiplier 1 + 0.15 × (0.12 + 0.03)
    assert_eq!(report.skill[0].expected.buff.get(&StatusKind::Atk), Some(&569));
}

#[test]
fn attack_legendary_multiplies_matching_attackers() {
    let mut holder = striker(1);
    holder.legendary = Some(LegendarySkill {
        trigger: Trigger::Attack,
        elements: vec![Element::Fire],
        rates: [0.0, 0.0, 0.0, 0.0, 0.1],
    });
    assert_eq!(damage_of(&request(vec![at_max(holder)]), 1), Some(4033));
}

#[test]
fn range_up_widens_multi_target_effects() {
    let sweeper = card(
        1,
        Category::NormalRange,
        Element::Fire,
        ("ブレイズ・ストーム", "敵1～3体に通常極大ダメージを与える。"),
        DAMAGE_UP,
    );
    let widener = card(
        2,
        Category::Support,
        Element::Light,
        ("ライト・ブレス", "味方1体のATKを小アップする。"),
        ("援:範囲拡大", "支援/妨害スキル発動時、一定確率で効果範囲を小拡大する。"),
    );

    assert_eq!(damage_of(&request(vec![at_max(sweeper.clone())]), 1), Some(3666));
    // factor 3 - 2 × 0.88
    assert_eq!(
        damage_of(&request(vec![at_max(sweeper), at_max(widener)]), 1),
        Some(4546)
    );
}

#[test]
fn ally_up_support_is_reported_per_status() {
    let cheerleader = card(
        1,
        Category::Support,
        Element::Fire,
        ("ファイア・ブレス", "味方2体の火属性攻撃力を特大アップする。"),
        (
            "援:ATKアップ",
            "支援/妨害スキル発動時、一定確率で味方のATKとSp.ATKを小アップする。",
        ),
    );
    let report = evaluate(&request(vec![at_max(cheerleader)])).expect("evaluation should succeed");

    // 0.0114 × 0.12 × 10000
    assert_eq!(report.support_buff.get(&StatusKind::Atk), Some(&13));
    assert_eq!(report.support_buff.get(&StatusKind::SpAtk), Some(&13));
    assert!(report.support_debuff.is_empty());
    assert!(report.skill[0].expected.buff.contains_key(&StatusKind::FireAtk));
}

#[test]
fn life_debuff_is_a_hard_stop() {
    let drainer = card(
        4,
        Category::Interference,
        Element::Dark,
        ("ライフ・ドレイン", "敵1体の最大HPを小ダウンさせる。"),
        DAMAGE_UP,
    );
    let err = evaluate(&request(vec![at_max(striker(1)), at_max(drainer)]))
        .expect_err("life debuff should stop evaluation");
    assert_eq!(err, EvaluationError::LifeDebuff { card_id: 4 });
    assert!(err.is_hard_stop());
}

#[test]
fn life_down_support_is_a_hard_stop() {
    let drainer = card(
        5,
        Category::NormalSingle,
        Element::Dark,
        ("シャドウ・ストライク", "敵1体に通常大ダメージを与える。"),
        ("攻:HPダウン", "攻撃時、一定確率で敵の最大HPを小ダウンさせる。"),
    );
    let err = evaluate(&request(vec![at_max(drainer)])).expect_err("life down should stop");
    assert_eq!(err, EvaluationError::LifeDebuff { card_id: 5 });
}

#[test]
fn unpublished_damage_tier_fails_loudly() {
    let weak = card(
        6,
        Category::NormalSingle,
        Element::Wind,
        ("ウィンド・タップ", "敵1体に通常小ダメージを与える。"),
        DAMAGE_UP,
    );
    let err = evaluate(&request(vec![at_max(weak)])).expect_err("small damage has no rate");
    assert_eq!(
        err,
        EvaluationError::MissingRateTableEntry {
            card_id: 6,
            table: "damage",
            amount: Amount::Small,
        }
    );
    assert!(!err.is_hard_stop());
}

#[test]
fn concentration_above_four_is_rejected() {
    let err = evaluate(&request(vec![RosterEntry {
        card: striker(1),
        concentration: 5,
    }]))
    .expect_err("concentration 5 is out of range");
    assert_eq!(
        err,
        EvaluationError::InvalidConcentration {
            card_id: 1,
            concentration: 5,
        }
    );
}

#[test]
fn repeated_evaluation_is_identical() {
    let sweeper = card(
        1,
        Category::NormalRange,
        Element::Fire,
        ("ブレイズ・ストーム", "敵1～3体に通常極大ダメージを与える。"),
        DAMAGE_UP,
    );
    let widener = card(
        2,
        Category::Support,
        Element::Light,
        ("ライト・ブレス", "味方1体のATKを小アップする。"),
        ("援:範囲拡大", "支援/妨害スキル発動時、一定確率で効果範囲を小拡大する。"),
    );
    let request = request(vec![at_max(sweeper), at_max(widener)]);
    let first = evaluate(&request).expect("evaluation should succeed");
    let second = evaluate(&request).expect("evaluation should succeed");
    assert_eq!(first, second);
}
