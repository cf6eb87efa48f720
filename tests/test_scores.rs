use invaders_term::scores::*;

use std::fs;

#[test]
fn missing_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let table = HighScores::load(&dir.path().join("nope.json"));
    assert!(table.entries().is_empty());
    assert_eq!(table.best(), 0);
}

#[test]
fn corrupt_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.json");
    fs::write(&path, "{ not json").unwrap();
    let table = HighScores::load(&path);
    assert!(table.entries().is_empty());
}

#[test]
fn load_sorts_best_first() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.json");
    fs::write(
        &path,
        r#"[{"name":"B","score":3},{"name":"A","score":9},{"name":"C","score":3}]"#,
    )
    .unwrap();
    let table = HighScores::load(&path);
    let names: Vec<&str> = table.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert_eq!(table.best(), 9);
}

#[test]
fn insert_ranks_and_ties_go_below() {
    let mut table = HighScores::in_memory();
    assert_eq!(table.insert("first", 10), Some(1));
    assert_eq!(table.insert("second", 20), Some(1));
    assert_eq!(table.insert("third", 10), Some(3));
    let names: Vec<&str> = table.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["second", "first", "third"]);
}

#[test]
fn table_keeps_top_ten_only() {
    let mut table = HighScores::in_memory();
    for score in 1..=TABLE_SIZE as u32 {
        table.insert("p", score * 10);
    }
    assert!(!table.qualifies(5));
    assert_eq!(table.insert("low", 5), None);
    assert_eq!(table.insert("mid", 55), Some(6));
    assert_eq!(table.entries().len(), TABLE_SIZE);
    assert_eq!(table.entries().last().unwrap().score, 20);
}

#[test]
fn zero_never_qualifies() {
    let table = HighScores::in_memory();
    assert!(!table.qualifies(0));
}

#[test]
fn saved_table_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.json");
    let mut table = HighScores::load(&path);
    table.insert("ACE", 42);
    table.insert("BOB", 7);
    table.save().unwrap();

    let reloaded = HighScores::load(&path);
    assert_eq!(reloaded.entries(), table.entries());
}

#[test]
fn in_memory_save_writes_nothing() {
    let mut table = HighScores::in_memory();
    table.insert("ACE", 1);
    assert!(table.save().is_ok());
}

#[test]
fn save_to_missing_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut table = HighScores::load(&dir.path().join("gone").join("scores.json"));
    table.insert("ACE", 1);
    assert!(table.save().is_err());
}
