use anyhow::Result;
use chrono::{Local, TimeZone};
use fsquery::{parse, QueryEvaluation};

// Declare the common module for test utilities using a path attribute
#[path = "../common/mod.rs"]
mod common;
use common::{column_text, home_fixture, FakeFileSystem};

#[test]
fn test_order_by_size_ascending_is_stable() -> Result<()> {
    let evaluation = QueryEvaluation::new(home_fixture());
    let query = parse("SELECT name FROM /home ORDER BY size ASC")?;

    let result = evaluation.evaluate(&query)?;

    // Equal sizes keep enumeration order.
    assert_eq!(
        column_text(&result, 0),
        vec!["a1.txt", "a2.jpg", "a3.mov", "b1.txt", "b2.jpg", "b3.mov", "AAA", "aaa1", "ZZZ"]
    );
    Ok(())
}

#[test]
fn test_order_by_size_descending() -> Result<()> {
    let evaluation = QueryEvaluation::new(home_fixture());
    let query = parse("SELECT name FROM /home ORDER BY size DESC")?;

    let result = evaluation.evaluate(&query)?;

    assert_eq!(
        column_text(&result, 0),
        vec!["AAA", "aaa1", "ZZZ", "b1.txt", "b2.jpg", "b3.mov", "a1.txt", "a2.jpg", "a3.mov"]
    );
    Ok(())
}

#[test]
fn test_order_by_defaults_to_ascending() -> Result<()> {
    let evaluation = QueryEvaluation::new(home_fixture());
    let implicit = parse("SELECT name FROM /home ORDER BY size")?;
    let explicit = parse("SELECT name FROM /home ORDER BY size ASC")?;

    assert_eq!(
        evaluation.evaluate(&implicit)?,
        evaluation.evaluate(&explicit)?
    );
    Ok(())
}

#[test]
fn test_order_by_name_is_case_sensitive_by_default() -> Result<()> {
    let evaluation = QueryEvaluation::new(home_fixture());
    let query = parse("SELECT name FROM /home ORDER BY name ASC")?;

    let result = evaluation.evaluate(&query)?;

    // Ordinal byte order puts every uppercase name first.
    assert_eq!(
        column_text(&result, 0),
        vec!["AAA", "ZZZ", "a1.txt", "a2.jpg", "a3.mov", "aaa1", "b1.txt", "b2.jpg", "b3.mov"]
    );
    Ok(())
}

#[test]
fn test_order_by_lower_name_ignores_case() -> Result<()> {
    let evaluation = QueryEvaluation::new(home_fixture());
    let query = parse("SELECT name FROM /home ORDER BY lower(name) ASC")?;

    let result = evaluation.evaluate(&query)?;

    assert_eq!(
        column_text(&result, 0),
        vec!["a1.txt", "a2.jpg", "a3.mov", "AAA", "aaa1", "b1.txt", "b2.jpg", "b3.mov", "ZZZ"]
    );
    Ok(())
}

#[test]
fn test_nulls_sort_last_ascending_and_first_descending() -> Result<()> {
    let fs = FakeFileSystem::new()
        .with_files("/home", 1024, &["a.txt", "b.jpg"])
        .with_directory("/home", "docs");
    let evaluation = QueryEvaluation::new(fs);

    let ascending = parse("SELECT name FROM /home ORDER BY extension ASC")?;
    let result = evaluation.evaluate(&ascending)?;
    assert_eq!(column_text(&result, 0), vec!["b.jpg", "a.txt", "docs"]);

    let descending = parse("SELECT name FROM /home ORDER BY extension DESC")?;
    let result = evaluation.evaluate(&descending)?;
    assert_eq!(column_text(&result, 0), vec!["docs", "a.txt", "b.jpg"]);
    Ok(())
}

#[test]
fn test_order_by_modify_time() -> Result<()> {
    let fs = FakeFileSystem::new()
        .with_timed_file("/logs", "new.log", 10, Local.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap())
        .with_timed_file("/logs", "old.log", 10, Local.with_ymd_and_hms(2019, 1, 1, 8, 0, 0).unwrap())
        .with_timed_file("/logs", "mid.log", 10, Local.with_ymd_and_hms(2022, 6, 15, 8, 0, 0).unwrap());
    let evaluation = QueryEvaluation::new(fs);

    let query = parse("SELECT name FROM /logs ORDER BY modify_time ASC")?;
    let result = evaluation.evaluate(&query)?;

    assert_eq!(column_text(&result, 0), vec!["old.log", "mid.log", "new.log"]);
    Ok(())
}

#[test]
fn test_ordering_preserved_through_where() -> Result<()> {
    let evaluation = QueryEvaluation::new(home_fixture());
    let query = parse("SELECT name FROM /home WHERE size < 4k ORDER BY name DESC")?;

    let result = evaluation.evaluate(&query)?;

    assert_eq!(
        column_text(&result, 0),
        vec!["b3.mov", "b2.jpg", "b1.txt", "a3.mov", "a2.jpg", "a1.txt"]
    );
    Ok(())
}
