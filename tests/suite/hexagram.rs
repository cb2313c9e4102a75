//! Hexagram encoding tests.

use yarrow_divination::build_hexagram;
use yarrow_types::LineValue;

fn lines(values: [u8; 6]) -> [LineValue; 6] {
    values.map(|v| LineValue::try_from(v).unwrap())
}

#[test]
fn encoding_table_per_value() {
    // Each value in isolation at the bottom, young yin elsewhere.
    let cases = [
        (6u8, '0', '1', true),
        (7, '1', '1', false),
        (8, '0', '0', false),
        (9, '1', '0', true),
    ];
    for (value, original_bit, changed_bit, moving) in cases {
        let result = build_hexagram(lines([value, 8, 8, 8, 8, 8]));
        assert_eq!(
            result.original_binary.chars().next().unwrap(),
            original_bit,
            "original bit for {value}"
        );
        assert_eq!(
            result.changed_binary.chars().next().unwrap(),
            changed_bit,
            "changed bit for {value}"
        );
        assert_eq!(result.changing_lines.contains(&1), moving);
    }
}

#[test]
fn every_position_is_encoded_independently() {
    for pos in 0..6 {
        let mut values = [7u8; 6];
        values[pos] = 6;
        let result = build_hexagram(lines(values));
        assert_eq!(result.changing_lines, vec![pos as u8 + 1]);

        let mut expected_original = ['1'; 6];
        expected_original[pos] = '0';
        assert_eq!(
            result.original_binary,
            expected_original.iter().collect::<String>()
        );
        // Old yin flips back to solid.
        assert_eq!(result.changed_binary, "111111");
    }
}

#[test]
fn quiet_hexagram_has_no_transformation() {
    let result = build_hexagram(lines([8, 7, 8, 7, 8, 7]));
    assert_eq!(result.original_binary, result.changed_binary);
    assert!(!result.has_change);
    assert!(result.changing_lines.is_empty());
}

#[test]
fn original_lines_are_preserved_in_order() {
    let input = lines([6, 7, 8, 9, 7, 6]);
    let result = build_hexagram(input);
    assert_eq!(result.original_lines, input);
}
