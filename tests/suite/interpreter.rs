//! Casting-to-reading integration tests.

use yarrow_divination::{DivinationEngine, ScriptedSplitter};
use yarrow_interpreter::{HexagramTable, build_divination_prompt, interpret, reading_guide};

/// Every line splits 25/21/21, landing on old yang six times: the primary
/// hexagram is the first, its transformation the second.
fn all_old_yang_casting() -> yarrow_types::DivinationResult {
    let script: Vec<u32> = std::iter::repeat([25u32, 21, 21]).take(6).flatten().collect();
    DivinationEngine::with_splitter(ScriptedSplitter::new(script)).run()
}

#[test]
fn scripted_casting_resolves_both_hexagrams() {
    let result = all_old_yang_casting();
    let table = HexagramTable::embedded();
    let interp = interpret(table, &result.hex_result).unwrap();

    assert_eq!(interp.original.number, 1);
    assert_eq!(interp.original.name, "乾");
    let changed = interp.changed.unwrap();
    assert_eq!(changed.number, 2);
    assert_eq!(changed.name, "坤");
    assert_eq!(interp.changing_lines, vec![1, 2, 3, 4, 5, 6]);
    assert!(interp.guide.contains("用九"));
}

#[test]
fn every_possible_casting_outcome_has_a_table_entry() {
    let table = HexagramTable::embedded();
    // All 64 binaries, derived rather than read from the table itself.
    for bits in 0u8..64 {
        let binary: String = (0..6)
            .map(|i| if bits & (1 << i) != 0 { '1' } else { '0' })
            .collect();
        assert!(
            table.by_binary(&binary).is_some(),
            "no entry for {binary}"
        );
    }
}

#[test]
fn prompt_for_a_moving_casting_cites_both_judgments() {
    let result = all_old_yang_casting();
    let table = HexagramTable::embedded();
    let interp = interpret(table, &result.hex_result).unwrap();
    let prompt = build_divination_prompt("今年适合换工作吗", &interp);

    assert!(prompt.user.contains("今年适合换工作吗"));
    assert!(prompt.user.contains("本卦: 乾卦 (第1卦)"));
    assert!(prompt.user.contains("之卦: 坤卦 (第2卦)"));
    assert!(prompt.user.contains("元，亨，利，贞。"));
    assert!(prompt.user.contains("利牝马之贞"));
    assert!(prompt.system.contains("周易"));
}

#[test]
fn guide_depends_only_on_moving_count_except_all_six() {
    assert_eq!(reading_guide(2, "111111"), reading_guide(2, "000000"));
    assert_ne!(reading_guide(6, "111111"), reading_guide(6, "000000"));
    assert_ne!(reading_guide(6, "111111"), reading_guide(6, "101010"));
}
