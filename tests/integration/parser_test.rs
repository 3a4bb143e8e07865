use anyhow::Result;
use fsquery::query::parser::{parse, ParseError};

#[test]
fn test_full_query_round_trip() -> Result<()> {
    let query = parse(
        "SELECT name, size FROM /var/log RECURSIVE WHERE size > 1k GROUP BY extension ORDER BY size DESC",
    )?;

    assert_eq!(query.selected_attributes.len(), 2);
    assert_eq!(query.from.path, "/var/log");
    assert!(query.from.recursive);
    assert!(query.where_clause.is_some());
    assert!(query.group_by.key().is_some());
    let condition = query.order_by.condition().unwrap();
    assert!(!condition.ascending);
    Ok(())
}

#[test]
fn test_keywords_are_case_insensitive() -> Result<()> {
    let lower = parse("select name from /tmp where size > 5 order by name asc")?;
    let upper = parse("SELECT name FROM /tmp WHERE size > 5 ORDER BY name ASC")?;
    assert_eq!(lower, upper);
    Ok(())
}

#[test]
fn test_missing_clauses_default_to_empty() -> Result<()> {
    let query = parse("SELECT * FROM /tmp")?;
    assert!(query.where_clause.is_none());
    assert!(query.group_by.key().is_none());
    assert!(query.order_by.condition().is_none());
    assert!(!query.from.recursive);
    Ok(())
}

#[test]
fn test_parse_errors() {
    assert!(parse("").is_err());
    assert!(parse("SELECT").is_err());
    assert!(parse("SELECT name").is_err());
    assert!(parse("SELECT name FROM").is_err());
    assert!(parse("SELECT name FROM *").is_err());
    assert!(parse("SELECT name FROM /tmp WHERE").is_err());
    assert!(parse("SELECT name FROM /tmp GROUP size").is_err());
    assert!(parse("SELECT name FROM /tmp ORDER size").is_err());
    assert!(parse("SELECT name FROM /tmp trailing").is_err());
}

#[test]
fn test_unit_multiplier_errors_are_reported_by_name() {
    let error = parse("SELECT name FROM /tmp WHERE size > 10q").unwrap_err();
    assert_eq!(error, ParseError::UnsupportedMultiplier('q'));
    assert!(error.to_string().contains("k, m, g, t"));
}

#[test]
fn test_relational_operators_do_not_chain() {
    assert!(parse("SELECT name FROM /tmp WHERE 1 < 2 < 3").is_err());
}

#[test]
fn test_parenthesized_logical_combinations() -> Result<()> {
    let query = parse(
        "SELECT name FROM /tmp WHERE (size > 1k AND size < 1m) OR name LIKE '%.log'",
    )?;
    assert!(query.where_clause.is_some());
    Ok(())
}
