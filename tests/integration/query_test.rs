use anyhow::Result;
use fsquery::{parse, QueryEvaluation, Value};

// Declare the common module for test utilities using a path attribute
#[path = "../common/mod.rs"]
mod common;
use common::{column_text, home_fixture, FakeFileSystem};

#[test]
fn test_select_single_attribute() -> Result<()> {
    let evaluation = QueryEvaluation::new(home_fixture());
    let query = parse("SELECT name FROM /home")?;

    let result = evaluation.evaluate(&query)?;

    assert_eq!(result.attribute_names, vec!["name"]);
    assert_eq!(
        column_text(&result, 0),
        vec!["a1.txt", "a2.jpg", "a3.mov", "b1.txt", "b2.jpg", "b3.mov", "AAA", "aaa1", "ZZZ"]
    );
    Ok(())
}

#[test]
fn test_select_multiple_attributes() -> Result<()> {
    let evaluation = QueryEvaluation::new(home_fixture());
    let query = parse("SELECT name, size FROM /home")?;

    let result = evaluation.evaluate(&query)?;

    assert_eq!(result.attribute_names, vec!["name", "size"]);
    assert_eq!(result.rows[0], vec![Value::String("a1.txt".to_string()), Value::Number(1024.0)]);
    assert_eq!(result.rows[8], vec![Value::String("ZZZ".to_string()), Value::Number(4096.0)]);
    Ok(())
}

#[test]
fn test_attribute_names_keep_their_spelling() -> Result<()> {
    let evaluation = QueryEvaluation::new(home_fixture());
    let query = parse("SELECT Name, SIZE FROM /home")?;

    let result = evaluation.evaluate(&query)?;

    assert_eq!(result.attribute_names, vec!["Name", "SIZE"]);
    assert_eq!(result.rows[0][1], Value::Number(1024.0));
    Ok(())
}

#[test]
fn test_wildcard_expands_in_source_order() -> Result<()> {
    let evaluation = QueryEvaluation::new(home_fixture());
    let query = parse("SELECT * FROM /home")?;

    let result = evaluation.evaluate(&query)?;

    assert_eq!(
        result.attribute_names,
        vec![
            "name",
            "extension",
            "type",
            "size",
            "access_time",
            "create_time",
            "modify_time",
            "absolute_path"
        ]
    );
    assert_eq!(result.rows.len(), 9);

    let first = &result.rows[0];
    assert_eq!(first[0], Value::String("a1.txt".to_string()));
    assert_eq!(first[1], Value::String(".txt".to_string()));
    assert_eq!(first[2], Value::String("File".to_string()));
    assert_eq!(first[3], Value::Number(1024.0));
    // No timestamps in the fixture.
    assert_eq!(first[4], Value::Null);
    assert_eq!(first[7], Value::String("/home/a1.txt".to_string()));
    Ok(())
}

#[test]
fn test_wildcard_mixes_with_named_attributes() -> Result<()> {
    let evaluation = QueryEvaluation::new(home_fixture());
    let query = parse("SELECT name, * FROM /home")?;

    let result = evaluation.evaluate(&query)?;

    assert_eq!(result.attribute_names.len(), 9);
    assert_eq!(result.attribute_names[0], "name");
    assert_eq!(result.attribute_names[1], "name");
    Ok(())
}

#[test]
fn test_function_projection_gets_placeholder_header() -> Result<()> {
    let evaluation = QueryEvaluation::new(home_fixture());
    let query = parse("SELECT name, human(size) FROM /home")?;

    let result = evaluation.evaluate(&query)?;

    assert_eq!(result.attribute_names, vec!["name", "?"]);
    assert_eq!(result.rows[0][1], Value::String("1.0k".to_string()));
    assert_eq!(result.rows[3][1], Value::String("2.0k".to_string()));
    Ok(())
}

#[test]
fn test_directory_attributes() -> Result<()> {
    let fs = FakeFileSystem::new()
        .with_files("/home", 1024, &["a.txt"])
        .with_directory("/home", "docs");
    let evaluation = QueryEvaluation::new(fs);
    let query = parse("SELECT name, extension, type FROM /home")?;

    let result = evaluation.evaluate(&query)?;

    assert_eq!(result.rows[1][0], Value::String("docs".to_string()));
    assert_eq!(result.rows[1][1], Value::Null);
    assert_eq!(result.rows[1][2], Value::String("Directory".to_string()));
    Ok(())
}

#[test]
fn test_evaluating_the_same_query_twice_gives_identical_results() -> Result<()> {
    let evaluation = QueryEvaluation::new(home_fixture());
    let query = parse("SELECT name, size FROM /home ORDER BY size DESC")?;

    let first = evaluation.evaluate(&query)?;
    let second = evaluation.evaluate(&query)?;

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_unknown_attribute_fails_the_evaluation() -> Result<()> {
    let evaluation = QueryEvaluation::new(home_fixture());
    let query = parse("SELECT owner FROM /home")?;

    let result = evaluation.evaluate(&query);

    assert!(matches!(
        result,
        Err(fsquery::QueryError::UnknownAttribute(_))
    ));
    Ok(())
}

#[test]
fn test_empty_directory_yields_empty_result_with_headers() -> Result<()> {
    let evaluation = QueryEvaluation::new(FakeFileSystem::new());
    let query = parse("SELECT name, size FROM /empty")?;

    let result = evaluation.evaluate(&query)?;

    assert_eq!(result.attribute_names, vec!["name", "size"]);
    assert!(result.rows.is_empty());
    Ok(())
}
