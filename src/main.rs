use std::path::PathBuf;

use clap::Parser;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use flatdb::{
    Database, DropOutcome, JsonStorage, Selection, StdinConfirm, clause, render,
};

/// Flat-file record store with a tiny equality-only query shell.
#[derive(Parser)]
#[command(name = "flatdb", version, about)]
struct Args {
    /// Directory holding db_meta.json and the per-table data files.
    #[arg(long, default_value = "db_data")]
    data_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    let mut db = Database::open(JsonStorage::new(&args.data_dir))?;

    println!("flatdb shell - type 'help' for commands, 'exit' to quit");
    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline("flatdb> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);
                if matches!(line, "exit" | "quit") {
                    break;
                }
                // Every engine error surfaces here as a message; the shell
                // keeps going no matter what the operation reported.
                if let Err(err) = run_command(&mut db, line) {
                    println!("{err}");
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("input error: {err}");
                break;
            }
        }
    }
    Ok(())
}

fn run_command(db: &mut Database<JsonStorage>, line: &str) -> flatdb::Result<()> {
    let (command, rest) = split_word(line);
    match command.to_lowercase().as_str() {
        "help" => print_help(),
        "create_table" => {
            let (name, spec_text) = split_word(rest);
            if name.is_empty() || spec_text.is_empty() {
                println!("usage: create_table <name> <column:type> [..]");
                return Ok(());
            }
            let specs: Vec<String> = spec_text.split_whitespace().map(str::to_string).collect();
            db.create_table(name, &specs)?;
            println!("table '{name}' created");
        }
        "drop_table" => {
            let name = rest.trim();
            if name.is_empty() {
                println!("usage: drop_table <name>");
                return Ok(());
            }
            match db.drop_table(name, &StdinConfirm)? {
                DropOutcome::Dropped => println!("table '{name}' dropped"),
                DropOutcome::Cancelled => println!("operation cancelled"),
            }
        }
        "list_tables" => match db.list_tables() {
            Some(names) => println!("{}", render::table_listing(names)),
            None => println!("no tables"),
        },
        "info" => {
            let name = rest.trim();
            if name.is_empty() {
                println!("usage: info <table>");
                return Ok(());
            }
            let info = db.info(name)?;
            let columns: Vec<String> = info.columns.iter().map(ToString::to_string).collect();
            println!("table: {}", info.name);
            println!("columns: {}", columns.join(", "));
            println!("records: {}", info.record_count);
        }
        "insert" => {
            let (table, values_text) = split_word(rest);
            if table.is_empty() || values_text.is_empty() {
                println!("usage: insert <table> (<value>, ..)");
                return Ok(());
            }
            let values = clause::parse_values(values_text);
            db.insert(table, &values)?;
            println!("record added to table '{table}'");
        }
        "select" => {
            let (table, tail) = split_word(rest);
            if table.is_empty() {
                println!("usage: select <table> [where <column> = <value>]");
                return Ok(());
            }
            let filter = if tail.is_empty() {
                None
            } else {
                let (keyword, condition) = split_word(tail);
                if !keyword.eq_ignore_ascii_case("where") {
                    println!("usage: select <table> [where <column> = <value>]");
                    return Ok(());
                }
                Some(condition)
            };
            match db.select(table, filter)? {
                Selection::Rows(records) => {
                    let columns = db.catalog().columns(table)?.to_vec();
                    println!("{}", render::records_table(&columns, &records));
                }
                Selection::EmptyTable => println!("table '{table}' is empty"),
                Selection::NoMatch => println!("no records found"),
            }
        }
        "update" => {
            let (table, tail) = split_word(rest);
            let (keyword, clauses) = split_word(tail);
            if table.is_empty() || !keyword.eq_ignore_ascii_case("set") {
                println!("usage: update <table> set <column> = <value> where <column> = <value>");
                return Ok(());
            }
            let Some(at) = find_keyword(clauses, " where ") else {
                println!("usage: update <table> set <column> = <value> where <column> = <value>");
                return Ok(());
            };
            let set_clause = clauses[..at].trim();
            let where_clause = clauses[at + " where ".len()..].trim();
            db.update(table, set_clause, where_clause)?;
            println!("records updated in table '{table}'");
        }
        "delete" => {
            let (table, tail) = split_word(rest);
            let (keyword, condition) = split_word(tail);
            if table.is_empty() || !keyword.eq_ignore_ascii_case("where") {
                println!("usage: delete <table> where <column> = <value>");
                return Ok(());
            }
            db.delete(table, condition)?;
            println!("records deleted from table '{table}'");
        }
        _ => println!("unknown command '{command}', type 'help'"),
    }
    Ok(())
}

/// Splits off the first whitespace-delimited word.
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim()),
        None => (input, ""),
    }
}

/// Byte position of the first case-insensitive occurrence of `keyword`.
fn find_keyword(input: &str, keyword: &str) -> Option<usize> {
    input
        .as_bytes()
        .windows(keyword.len())
        .position(|window| window.eq_ignore_ascii_case(keyword.as_bytes()))
}

fn print_help() {
    println!("commands:");
    println!("  create_table <name> <column:type> [..]   declare a table (ID:int is implicit)");
    println!("  drop_table <name>                        remove a table (asks for confirmation)");
    println!("  list_tables                              sorted table names");
    println!("  info <table>                             columns and record count");
    println!("  insert <table> (<value>, ..)             add a record, ID is assigned");
    println!("  select <table> [where <col> = <value>]   show records");
    println!("  update <table> set <col> = <value> where <col> = <value>");
    println!("  delete <table> where <col> = <value>");
    println!("  exit");
}
