use chrono::{DateTime, TimeZone, Utc};
use dumpguard_core::{evaluate, Dataset, EtlMode, ManifestRow, TimeWindow};
use proptest::prelude::*;
use std::io::Cursor;

fn window() -> TimeWindow {
    TimeWindow::default()
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 12, 2, 19, 0, 0).unwrap()
}

fn manifest(table: &str, rows: u64) -> ManifestRow {
    ManifestRow::new(
        table,
        rows,
        t0(),
        Utc.with_ymd_and_hms(2024, 12, 3, 19, 0, 0).unwrap(),
    )
}

fn dataset(data: &str) -> Dataset {
    Dataset::from_reader(Cursor::new(data.to_string())).unwrap()
}

// ============================================================================
// Both modes
// ============================================================================

#[test]
fn test_row_count_mismatch_message() {
    let raw = dataset("Id\n1\n2\n");
    let outcome = evaluate(&raw, &manifest("orders", 3), EtlMode::Full, &window());
    assert_eq!(outcome.messages(), ["Row count mismatch: expected 3, got 2"]);
}

#[test]
fn test_missing_id_column() {
    let raw = dataset("Code,Name\n1,a\n");
    let outcome = evaluate(&raw, &manifest("orders", 1), EtlMode::Delta, &window());
    assert_eq!(outcome.messages(), ["No valid ID column found"]);
}

#[test]
fn test_id_and_data_id_selects_id() {
    let raw = dataset("Id,DataID\n1,2\n");
    assert_eq!(dumpguard_core::rules::find_id_column(&raw), Some("Id"));
    assert!(evaluate(&raw, &manifest("orders", 1), EtlMode::Delta, &window()).is_valid());
}

#[test]
fn test_all_defects_are_collected() {
    let raw = dataset(
        "Code,IsCreated,DateCreated,IsModified,DateModified\n\
         1,0,2024-12-02 20:00:00+00:00,0,2024-12-02 21:00:00+00:00\n\
         2,1,2024-11-01 00:00:00+00:00,1,2024-11-01 00:00:00+00:00\n",
    );
    let outcome = evaluate(&raw, &manifest("orders", 5), EtlMode::Delta, &window());
    assert_eq!(
        outcome.messages(),
        [
            "Row count mismatch: expected 5, got 2",
            "No valid ID column found",
            "Found 1 invalid IsCreated values",
            "Found 1 invalid IsModified values",
            "Found 1 records outside time window",
        ]
    );
}

proptest! {
    #[test]
    fn prop_row_count_defect_iff_counts_differ(rows in 0usize..25, declared in 0u64..25) {
        let mut data = String::from("ID\n");
        for i in 0..rows {
            data.push_str(&format!("{}\n", i));
        }
        let raw = dataset(&data);
        for mode in EtlMode::ALL {
            let outcome = evaluate(&raw, &manifest("t", declared), mode, &window());
            let has_defect = outcome
                .messages()
                .iter()
                .any(|m| m.starts_with("Row count mismatch"));
            prop_assert_eq!(has_defect, rows as u64 != declared);
        }
    }
}

// ============================================================================
// Daily mode
// ============================================================================

#[test]
fn test_daily_scenario_passes() {
    let raw = dataset(
        "ID,IsCreated,DateCreated\n\
         1,1,2024-12-02 19:30:00+00:00\n\
         2,1,2024-12-03 10:00:00+00:00\n",
    );
    let outcome = evaluate(&raw, &manifest("orders", 2), EtlMode::Delta, &window());
    assert_eq!(outcome.into_parts(), (true, vec![]));
}

#[test]
fn test_daily_scenario_one_bad_created_flag() {
    let raw = dataset(
        "ID,IsCreated,DateCreated\n\
         1,1,2024-12-02 19:30:00+00:00\n\
         2,0,2024-12-03 10:00:00+00:00\n",
    );
    let outcome = evaluate(&raw, &manifest("orders", 2), EtlMode::Delta, &window());
    assert_eq!(
        outcome.into_parts(),
        (false, vec!["Found 1 invalid IsCreated values".to_string()])
    );
}

#[test]
fn test_created_at_window_start_is_fresh() {
    let at_start = format!("ID,IsCreated,DateCreated\n1,0,{}\n", t0().to_rfc3339());
    let outcome = evaluate(&dataset(&at_start), &manifest("t", 1), EtlMode::Delta, &window());
    assert_eq!(outcome.messages(), ["Found 1 invalid IsCreated values"]);

    let flagged = format!("ID,IsCreated,DateCreated\n1,1,{}\n", t0().to_rfc3339());
    assert!(evaluate(&dataset(&flagged), &manifest("t", 1), EtlMode::Delta, &window()).is_valid());
}

#[test]
fn test_stale_records_are_not_flag_checked() {
    let raw = dataset(
        "ID,IsCreated,DateCreated,IsModified,DateModified\n\
         1,0,2024-12-01 00:00:00+00:00,0,2024-12-02 19:00:00+00:00\n",
    );
    // Modified inside the window keeps the row in scope, but IsModified=0 is a defect
    let outcome = evaluate(&raw, &manifest("t", 1), EtlMode::Delta, &window());
    assert_eq!(outcome.messages(), ["Found 1 invalid IsModified values"]);
}

#[test]
fn test_records_after_window_end_still_need_flags() {
    let raw = dataset("ID,IsCreated,DateCreated\n1,0,2024-12-05 00:00:00+00:00\n");
    let outcome = evaluate(&raw, &manifest("t", 1), EtlMode::Delta, &window());
    assert_eq!(outcome.messages(), ["Found 1 invalid IsCreated values"]);
}

#[test]
fn test_blank_flag_counts_as_invalid() {
    let raw = dataset("ID,IsCreated,DateCreated\n1,,2024-12-02 20:00:00+00:00\n");
    let outcome = evaluate(&raw, &manifest("t", 1), EtlMode::Delta, &window());
    assert_eq!(outcome.messages(), ["Found 1 invalid IsCreated values"]);
}

#[test]
fn test_window_membership_uses_either_date() {
    let raw = dataset(
        "ID,DateCreated,DateModified\n\
         1,2024-12-02 20:00:00+00:00,\n\
         2,2024-01-01 00:00:00+00:00,2024-12-03 18:59:59+00:00\n\
         3,2024-01-01 00:00:00+00:00,2024-12-03 19:00:00+00:00\n\
         4,,\n",
    );
    let outcome = evaluate(&raw, &manifest("t", 4), EtlMode::Delta, &window());
    assert_eq!(outcome.messages(), ["Found 2 records outside time window"]);
}

#[test]
fn test_daily_skips_rules_without_columns() {
    // IsCreated without DateCreated cannot be judged for freshness
    let raw = dataset("ID,IsCreated,IsModified\n1,0,0\n");
    assert!(evaluate(&raw, &manifest("t", 1), EtlMode::Delta, &window()).is_valid());
}

// ============================================================================
// Full mode
// ============================================================================

#[test]
fn test_full_flags_are_constant() {
    let raw = dataset(
        "ID,IsCreated,IsModified,DateModified\n\
         1,1,0,2020-01-01\n\
         2,0,1,2020-01-01\n\
         3,1,1,\n",
    );
    let outcome = evaluate(&raw, &manifest("t", 3), EtlMode::Full, &window());
    assert_eq!(
        outcome.messages(),
        [
            "Found 1 rows with IsCreated != 1",
            "Found 2 rows with IsModified != 0",
        ]
    );
}

#[test]
fn test_full_ignores_dates() {
    let raw = dataset(
        "ID,IsCreated,IsModified,DateCreated,DateModified\n\
         1,1,0,1999-01-01,1999-01-01\n",
    );
    assert!(evaluate(&raw, &manifest("t", 1), EtlMode::Full, &window()).is_valid());
}

#[test]
fn test_full_without_flag_columns() {
    let raw = dataset("DataID,Name\n1,a\n2,b\n");
    assert!(evaluate(&raw, &manifest("t", 2), EtlMode::Full, &window()).is_valid());
}
