use anyhow::{Context, Result};
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use fsquery::query::executor::result::QueryEvaluationResult;
use fsquery::{parse, OsFileSystem, QueryEvaluation};

const HISTORY_FILE: &str = ".fsquery_history";

#[derive(Parser)]
#[command(author, version, about = "fsquery - SQL-like queries over the filesystem")]
struct Cli {
    /// Query to execute; starts an interactive shell when omitted
    query: Option<String>,

    /// Print results as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.query {
        Some(query) => run_query(query, cli.json),
        None => run_shell(cli.json),
    }
}

fn run_query(query_text: &str, json: bool) -> Result<()> {
    let query = parse(query_text).context("failed to parse query")?;
    let evaluation = QueryEvaluation::new(OsFileSystem);
    let result = evaluation.evaluate(&query).context("failed to evaluate query")?;
    print_result(&result, json)
}

fn run_shell(json: bool) -> Result<()> {
    println!("fsquery interactive shell. Type 'exit' to quit.");

    let mut rl = Editor::<(), DefaultHistory>::new()?;
    if let Err(err) = rl.load_history(HISTORY_FILE) {
        if !err.to_string().contains("No such file or directory") {
            println!("Error loading history: {}", err);
        }
    }

    let evaluation = QueryEvaluation::new(OsFileSystem);

    loop {
        let readline = rl.readline("fsquery> ");
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);

                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match line.to_lowercase().as_str() {
                    "exit" | "quit" => {
                        break;
                    }
                    _ => match parse(line) {
                        Ok(query) => match evaluation.evaluate(&query) {
                            Ok(result) => {
                                if let Err(err) = print_result(&result, json) {
                                    println!("Error: {}", err);
                                }
                            }
                            Err(err) => {
                                println!("Error: {}", err);
                            }
                        },
                        Err(err) => {
                            println!("Parse error: {}", err);
                        }
                    },
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                println!("Error: {}", err);
                break;
            }
        }
    }

    if let Err(err) = rl.save_history(HISTORY_FILE) {
        println!("Error saving history: {}", err);
    }
    Ok(())
}

fn print_result(result: &QueryEvaluationResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }
    print!("{}", render_table(result));
    Ok(())
}

/// Render the result as an aligned text table: every column is padded to
/// its widest cell.
fn render_table(result: &QueryEvaluationResult) -> String {
    let cells: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| row.iter().map(|value| value.to_text()).collect())
        .collect();

    let mut widths: Vec<usize> = result
        .attribute_names
        .iter()
        .map(|name| name.chars().count())
        .collect();
    for row in &cells {
        for (index, cell) in row.iter().enumerate() {
            if index < widths.len() {
                widths[index] = widths[index].max(cell.chars().count());
            }
        }
    }

    let mut output = String::new();
    render_row(&mut output, &result.attribute_names, &widths);
    let separator: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    render_row(&mut output, &separator, &widths);
    for row in &cells {
        render_row(&mut output, row, &widths);
    }
    output.push_str(&format!("({} rows)\n", result.rows.len()));
    output
}

fn render_row(output: &mut String, cells: &[String], widths: &[usize]) {
    for (index, cell) in cells.iter().enumerate() {
        let width = widths.get(index).copied().unwrap_or(0);
        let padding = width.saturating_sub(cell.chars().count());
        output.push_str("| ");
        output.push_str(cell);
        output.push_str(&" ".repeat(padding));
        output.push(' ');
    }
    output.push_str("|\n");
}
