use memoria::skill::{
    parse_skill, Amount, AuxFlag, Category, DamageKind, Effect, Element, ParseErrorKind, Range,
    RawSkill, ResonanceKind, StackKind, StatusKind,
};

fn raw(name: &str, description: &str) -> RawSkill {
    RawSkill::new(name, description)
}

#[test]
fn ultra_large_damage_maps_to_its_own_tier() {
    let skill = parse_skill(
        Category::NormalSingle,
        &raw("ブレイズ・ストライク", "敵1体に通常極大ダメージを与える。"),
    )
    .expect("damage sentence should parse");

    assert_eq!(
        skill.effects,
        vec![Effect::Damage {
            range: Range::single(1),
            kind: DamageKind::Normal,
            amount: Amount::UltraLarge,
        }]
    );
    assert!(skill.kinds.is_empty());
}

#[test]
fn heal_with_rider_shares_the_heal_range() {
    let skill = parse_skill(
        Category::Recovery,
        &raw("ヒール・ライト", "味方1～2体のHPを大回復する。さらに味方のATKとDEFを小アップする。"),
    )
    .expect("compound heal should parse");

    let range = Range { min: 1, max: 2 };
    assert_eq!(
        skill.effects,
        vec![
            Effect::Heal {
                range,
                amount: Amount::Large
            },
            Effect::Buff {
                range,
                amount: Amount::Small,
                status: StatusKind::Atk
            },
            Effect::Buff {
                range,
                amount: Amount::Small,
                status: StatusKind::Def
            },
        ]
    );
    assert_eq!(skill.kinds, vec![AuxFlag::Heal]);
}

#[test]
fn independent_failures_are_all_reported() {
    let errors = parse_skill(
        Category::NormalRange,
        &raw(
            "ブレイズ・ストーム",
            "敵1～3体に通常激大ダメージを与え、味方のSPDを小アップする。",
        ),
    )
    .expect_err("two bad tokens should fail");

    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e.kind == ParseErrorKind::UnknownToken));
    assert_eq!(errors[0].target, "激大");
    assert_eq!(
        errors[0].path.segments(),
        ["parse_skill", "parse_damage", "resolve_amount"]
    );
    assert_eq!(errors[1].target, "SPD");
    assert_eq!(
        errors[1].path.segments(),
        [
            "parse_skill",
            "parse_damage",
            "parse_damage_riders",
            "resolve_status_list",
            "resolve_status"
        ]
    );
}

#[test]
fn parsing_is_deterministic() {
    let input = raw(
        "Sカウンター・ゲイル [風:刺激]",
        "敵1体に特殊大ダメージを与え、味方のSp.ATKを小アップし、敵のSp.DEFを小ダウンさせる。",
    );
    let first = parse_skill(Category::SpecialSingle, &input).expect("should parse");
    let second = parse_skill(Category::SpecialSingle, &input).expect("should parse");
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).expect("skill should serialize"),
        serde_json::to_string(&second).expect("skill should serialize")
    );
}

#[test]
fn sp_status_is_not_read_as_plain_status() {
    let skill = parse_skill(
        Category::Support,
        &raw("スペシャル・ブレス", "味方1体のSp.ATKを小アップする。"),
    )
    .expect("buff should parse");
    assert_eq!(
        skill.effects,
        vec![Effect::Buff {
            range: Range::single(1),
            amount: Amount::Small,
            status: StatusKind::SpAtk
        }]
    );
}

#[test]
fn enemy_side_cannot_be_buffed_by_a_rider() {
    let errors = parse_skill(
        Category::NormalSingle,
        &raw("ストライク", "敵1体に通常大ダメージを与え、敵のATKを小アップする。"),
    )
    .expect_err("enemy buff rider should fail");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ParseErrorKind::PatternMismatch);
}

#[test]
fn category_selects_the_sentence_shape() {
    let errors = parse_skill(
        Category::Support,
        &raw("ストライク", "敵1体に通常大ダメージを与える。"),
    )
    .expect_err("support card with a damage sentence should fail");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ParseErrorKind::PatternMismatch);
    assert_eq!(errors[0].path.segments(), ["parse_skill", "parse_buff"]);
}

#[test]
fn two_stack_families_pair_rates_and_counts_in_order() {
    let skill = parse_skill(
        Category::NormalSingle,
        &raw(
            "メテオ・バリア・ブロウ",
            "敵1体に通常大ダメージを与え、自身にメテオ（与ダメージ+20%）とバリア（被ダメージ-15%）を付与する。メテオは3回、バリアは2回まで発動する。",
        ),
    )
    .expect("double stack should parse");

    let stacks: Vec<&Effect> = skill
        .effects
        .iter()
        .filter(|effect| matches!(effect, Effect::Stack { .. }))
        .collect();
    assert_eq!(
        stacks,
        vec![
            &Effect::Stack {
                kind: StackKind::Meteor,
                rate: 20.0,
                times: 3
            },
            &Effect::Stack {
                kind: StackKind::Barrier,
                rate: 15.0,
                times: 2
            },
        ]
    );
}

#[test]
fn surplus_stack_rates_are_a_mismatch() {
    let errors = parse_skill(
        Category::NormalSingle,
        &raw(
            "メテオ・ブロウ",
            "敵1体に通常大ダメージを与え、自身にメテオ（与ダメージ+20%、会心+5%）を付与する。メテオは3回まで発動する。",
        ),
    )
    .expect_err("two rates for one family should fail");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ParseErrorKind::PatternMismatch);
    assert_eq!(errors[0].path.segments(), ["parse_skill", "parse_stack", "rate"]);
}

#[test]
fn full_width_resonance_separator_is_accepted() {
    let skill = parse_skill(
        Category::Interference,
        &raw("アクア・カース [水：強化]", "敵1～2体のATKを大ダウンさせ、DEFを中ダウンさせる。"),
    )
    .expect("resonance with full-width colon should parse");

    assert!(skill.effects.contains(&Effect::Element {
        element: Element::Water,
        kind: ResonanceKind::Strengthen
    }));
    assert_eq!(skill.effects.iter().filter(|e| matches!(e, Effect::Debuff { .. })).count(), 2);
}

#[test]
fn attack_categories_yield_exactly_one_damage_effect() {
    let samples = [
        (Category::NormalSingle, "敵1体に通常大ダメージを与える。"),
        (Category::NormalRange, "敵1～3体に通常特大ダメージを与え、敵のDEFを小ダウンさせる。"),
        (Category::SpecialSingle, "敵1体に特殊極大ダメージを与える。"),
        (Category::SpecialRange, "敵2～3体に特殊超特大ダメージを与える。"),
    ];
    for (category, description) in samples {
        let skill = parse_skill(category, &raw("テスト", description)).expect("should parse");
        let damage = skill.effects.iter().filter(|e| e.is_damage()).count();
        assert_eq!(damage, 1, "{category}");
    }

    let heal = parse_skill(Category::Recovery, &raw("テスト", "味方1体のHPを中回復する。"))
        .expect("heal should parse");
    assert!(heal.effects.iter().all(|e| !e.is_damage()));
}

#[test]
fn continuation_rider_inherits_the_previous_side() {
    let skill = parse_skill(
        Category::NormalSingle,
        &raw(
            "ブレイズ・ブースト",
            "敵1体に通常大ダメージを与え、味方のATKを小アップし、DEFを中アップする。",
        ),
    )
    .expect("continuation rider should parse");

    let range = Range::single(1);
    assert_eq!(
        skill.effects,
        vec![
            Effect::Damage {
                range,
                kind: DamageKind::Normal,
                amount: Amount::Large,
            },
            Effect::Buff {
                range,
                amount: Amount::Small,
                status: StatusKind::Atk
            },
            Effect::Buff {
                range,
                amount: Amount::Medium,
                status: StatusKind::Def
            },
        ]
    );
}

#[test]
fn rider_without_any_side_is_a_missing_capture() {
    let errors = parse_skill(
        Category::NormalSingle,
        &raw("ブレイズ", "敵1体に通常大ダメージを与え、DEFを小ダウンさせる。"),
    )
    .expect_err("a first rider needs a side");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ParseErrorKind::MissingCapture);
    assert_eq!(
        errors[0].path.segments(),
        ["parse_skill", "parse_damage", "parse_damage_riders"]
    );
}

#[test]
fn heal_rider_may_follow_a_plain_comma() {
    let skill = parse_skill(
        Category::Recovery,
        &raw("ムーン・ライト", "味方1～2体のHPを大回復し、味方のATKを小アップする。"),
    )
    .expect("heal rider should parse");

    let range = Range { min: 1, max: 2 };
    assert_eq!(
        skill.effects,
        vec![
            Effect::Heal {
                range,
                amount: Amount::Large
            },
            Effect::Buff {
                range,
                amount: Amount::Small,
                status: StatusKind::Atk
            },
        ]
    );
}

#[test]
fn clause_after_a_heal_is_reported() {
    let errors = parse_skill(
        Category::Recovery,
        &raw("ムーン・ライト", "味方1体のHPを中回復し、敵のDEFを小ダウンさせる。"),
    )
    .expect_err("a debuff clause cannot follow a heal");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ParseErrorKind::PatternMismatch);
    assert_eq!(errors[0].target, "敵のDEFを小ダウン");
    assert_eq!(
        errors[0].path.segments(),
        ["parse_skill", "parse_heal", "reject_unconsumed"]
    );
}

#[test]
fn third_buff_pair_is_reported_not_dropped() {
    let errors = parse_skill(
        Category::Support,
        &raw(
            "トリプル・ブレス",
            "味方1体のATKを大アップし、DEFを小アップし、Sp.DEFを小アップする。",
        ),
    )
    .expect_err("only two status pairs fit a buff sentence");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ParseErrorKind::PatternMismatch);
    assert_eq!(errors[0].target, "Sp.DEFを小アップ");
    assert_eq!(
        errors[0].path.segments(),
        ["parse_skill", "parse_buff", "reject_unconsumed"]
    );
}
