#![forbid(unsafe_code)]
use chrono::NaiveDate;
use rotaplan::{compute, Holiday, RotationConfig, RotationError};

fn d(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn rotation_first_week_matches_anchor() {
    // Ancrage 2025-01-01 (mercredi), motif WFA,WFO,WFO,WFO, blocs A..D.
    let config = RotationConfig::default();
    let result = compute(d(2025, 1, 1), d(2025, 1, 7), &config, &[]).unwrap();

    let got: Vec<(NaiveDate, &str)> = result
        .entries
        .iter()
        .map(|e| (e.date, e.block.as_str()))
        .collect();
    assert_eq!(
        got,
        vec![
            (d(2025, 1, 1), "A"),
            (d(2025, 1, 2), "B"),
            (d(2025, 1, 3), "C"),
            // 01-04 et 01-05 : week-end, rien d'émis, compteur inchangé
            (d(2025, 1, 6), "D"),
            (d(2025, 1, 7), "A"),
        ]
    );
    assert!(result.holidays.is_empty());
}

#[test]
fn range_before_anchor_is_empty() {
    let config = RotationConfig::default();
    let holidays = vec![Holiday::new(d(2024, 12, 25), "Noël")];
    let result = compute(d(2024, 12, 1), d(2024, 12, 31), &config, &holidays).unwrap();
    assert!(result.entries.is_empty());
    assert!(result.holidays.is_empty());
}

#[test]
fn anchor_day_is_inclusive() {
    let config = RotationConfig::default();
    let result = compute(d(2024, 12, 1), d(2025, 1, 1), &config, &[]).unwrap();
    assert_eq!(result.entries.len(), 1);
    assert_eq!(result.entries[0].date, d(2025, 1, 1));
    assert_eq!(result.entries[0].block, "A");
}

#[test]
fn holiday_does_not_advance_rotation() {
    let config = RotationConfig::default();
    let holidays = vec![Holiday::new(d(2025, 1, 2), "Jour férié")];
    let result = compute(d(2025, 1, 1), d(2025, 1, 3), &config, &holidays).unwrap();

    // Le férié n'émet rien et ne consomme pas d'indice : le 3 reprend là
    // où le 1er s'était arrêté.
    let got: Vec<(NaiveDate, &str)> = result
        .entries
        .iter()
        .map(|e| (e.date, e.block.as_str()))
        .collect();
    assert_eq!(got, vec![(d(2025, 1, 1), "A"), (d(2025, 1, 3), "B")]);
    assert_eq!(result.holidays.len(), 1);
    assert_eq!(result.holidays[0].date, d(2025, 1, 2));
}

#[test]
fn invalid_range_is_rejected() {
    let config = RotationConfig::default();
    let err = compute(d(2025, 2, 1), d(2025, 1, 1), &config, &[]).unwrap_err();
    assert!(matches!(err, RotationError::InvalidRange { .. }));
}

#[test]
fn split_range_concatenation_is_continuous() {
    let config = RotationConfig::default();
    let holidays = vec![
        Holiday::new(d(2025, 1, 6), "Férié un"),
        Holiday::new(d(2025, 1, 20), "Férié deux"),
    ];

    let whole = compute(d(2025, 1, 1), d(2025, 1, 31), &config, &holidays).unwrap();
    let first = compute(d(2025, 1, 1), d(2025, 1, 15), &config, &holidays).unwrap();
    let second = compute(d(2025, 1, 16), d(2025, 1, 31), &config, &holidays).unwrap();

    let mut joined = first.entries.clone();
    joined.extend(second.entries.clone());
    assert_eq!(whole.entries, joined);
}

#[test]
fn periodicity_over_pattern_length() {
    let config = RotationConfig::default();
    // Janvier 2025, sans férié : tous les 4 jours ouvrés, même bloc.
    let result = compute(d(2025, 1, 1), d(2025, 1, 31), &config, &[]).unwrap();
    let blocks: Vec<&str> = result.entries.iter().map(|e| e.block.as_str()).collect();
    for window in blocks.chunks(4) {
        if window.len() == 4 {
            assert_eq!(window, ["A", "B", "C", "D"]);
        }
    }
}

#[test]
fn empty_config_falls_back_to_defaults() {
    let mut config = RotationConfig::default();
    config.blocks.clear();
    config.pattern.clear();
    let result = compute(d(2025, 1, 1), d(2025, 1, 1), &config, &[]).unwrap();
    assert_eq!(result.entries.len(), 1);
    assert_eq!(result.entries[0].block, "A");
}

#[test]
fn offset_shifts_the_starting_block() {
    let mut config = RotationConfig::default();
    config.offset = 1;
    let result = compute(d(2025, 1, 1), d(2025, 1, 1), &config, &[]).unwrap();
    // Décalage initial de 1 : le jour d'ancrage se comporte comme le
    // deuxième jour ouvré.
    assert_eq!(result.entries.len(), 1);
    assert_eq!(result.entries[0].block, "B");
}
