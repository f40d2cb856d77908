//! Integration tests for database collection and exposition rendering.
//!
//! These tests build rasdaemon databases on disk and verify the text that a
//! scrape would return.

use rasdaemon_exporter::testdata::{generate, TestdataOptions, MC_EVENT_SCHEMA};
use rasdaemon_exporter::{db, exposition, DbError, SampleValue, FAMILIES};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn create_db(dir: &TempDir, rows: &[(i64, i64, i64, i64, &str, i64)]) -> PathBuf {
    let path = dir.path().join("ras-mc_event.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(MC_EVENT_SCHEMA).unwrap();
    for (mc, top, middle, lower, err_type, count) in rows {
        conn.execute(
            "INSERT INTO mc_event (mc, top_layer, middle_layer, lower_layer, err_type, err_count) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![mc, top, middle, lower, err_type, count],
        )
        .unwrap();
    }
    path
}

fn scrape(path: &Path) -> String {
    let snapshots = db::collect(path, FAMILIES).expect("collect");
    exposition::render(&snapshots)
}

#[test]
fn test_empty_table_exports_single_zero_line() {
    let dir = TempDir::new().unwrap();
    let path = create_db(&dir, &[]);

    let out = scrape(&path);
    let samples: Vec<&str> = out.lines().filter(|l| !l.starts_with('#')).collect();

    assert_eq!(samples, vec!["rasdaemon_mc_events_total 0"]);
}

#[test]
fn test_single_row_labels_and_value() {
    let dir = TempDir::new().unwrap();
    let path = create_db(&dir, &[(0, 1, -1, -1, "CE", 5)]);

    let out = scrape(&path);

    assert!(out.contains(
        "rasdaemon_mc_events_total{mc=\"0\",top_layer=\"1\",middle_layer=\"-1\",lower_layer=\"-1\",err_type=\"CE\"} 5\n"
    ));
}

#[test]
fn test_grouping_sums_err_count() {
    let dir = TempDir::new().unwrap();
    let path = create_db(
        &dir,
        &[
            (1, 2, 0, -1, "Corrected", 4),
            (1, 2, 0, -1, "Corrected", 6),
            (1, 2, 0, -1, "Corrected", 10),
            (1, 3, 0, -1, "Corrected", 1),
        ],
    );

    let out = scrape(&path);

    assert!(out.contains(
        "rasdaemon_mc_events_total{mc=\"1\",top_layer=\"2\",middle_layer=\"0\",lower_layer=\"-1\",err_type=\"Corrected\"} 20\n"
    ));
    assert!(out.contains(
        "rasdaemon_mc_events_total{mc=\"1\",top_layer=\"3\",middle_layer=\"0\",lower_layer=\"-1\",err_type=\"Corrected\"} 1\n"
    ));
}

#[test]
fn test_label_values_are_escaped() {
    let dir = TempDir::new().unwrap();
    let path = create_db(&dir, &[(0, 0, 0, 0, "odd \"type\"\\x", 1)]);

    let out = scrape(&path);

    assert!(out.contains(r#"err_type="odd \"type\"\\x"} 1"#), "got: {out}");
}

#[test]
fn test_generated_database_totals_match() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("generated.db");
    let options = TestdataOptions {
        controllers: 3,
        events: 120,
        seed: Some(1),
        force: false,
    };
    let inserted = generate(&path, &options).unwrap();

    let snapshots = db::collect(&path, FAMILIES).unwrap();
    let exported: i64 = snapshots[0]
        .samples
        .iter()
        .map(|s| match s.value {
            SampleValue::Integer(i) => i,
            SampleValue::Float(f) => panic!("unexpected float sum {f}"),
        })
        .sum();

    assert_eq!(exported, inserted);
    for sample in &snapshots[0].samples {
        let mc: i64 = sample.labels[0].1.parse().unwrap();
        assert!((0..3).contains(&mc));
    }
}

#[test]
fn test_corrupt_database_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("corrupt.db");
    std::fs::write(&path, vec![0x42u8; 4096]).unwrap();

    let err = db::collect(&path, FAMILIES).unwrap_err();
    assert!(
        matches!(err, DbError::Open { .. } | DbError::Query { .. }),
        "unexpected error: {err:?}"
    );
}

#[test]
fn test_reads_do_not_modify_database() {
    let dir = TempDir::new().unwrap();
    let path = create_db(&dir, &[(0, 0, 0, 0, "Corrected", 3)]);
    let before = std::fs::read(&path).unwrap();

    for _ in 0..3 {
        scrape(&path);
    }

    assert_eq!(std::fs::read(&path).unwrap(), before);
}
