use crate::{
    error::CliError,
    output::{CastOutput, describe, to_json},
    shutdown::{ExitCode, ShutdownCoordinator},
};
use clap::Parser;
use commands::{Commands, ParseCommand};
use criteria_engine::CompiledQuery;
use criteria_syntax::{parse_filters, parse_sorts};
use model::{
    shape::{json::JsonShape, resolver::PathResolver},
    transform::MappingConfig,
};
use serde_json::Value as Json;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;
mod shutdown;

#[derive(Parser)]
#[command(
    name = "criteria",
    version = "0.1.0",
    about = "Parse, cast and run filter/sort criteria"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli.command).await {
        error!("{err}");
        let code = match err {
            CliError::Cancelled(_) => ExitCode::Cancelled,
            _ => ExitCode::GeneralError,
        };
        std::process::exit(code.as_i32());
    }
}

async fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Parse { target } => match target {
            ParseCommand::Filter { expr, json } => {
                let filters = parse_filters(&expr)?;
                if json {
                    println!("{}", to_json(&filters)?);
                } else {
                    println!(
                        "{}",
                        describe("filters", &filters.to_string(), &filters.fingerprint())
                    );
                }
            }
            ParseCommand::Sort { expr, json } => {
                let sorts = parse_sorts(&expr)?;
                if json {
                    println!("{}", to_json(&sorts)?);
                } else {
                    println!(
                        "{}",
                        describe("sorts", &sorts.to_string(), &sorts.fingerprint())
                    );
                }
            }
        },
        Commands::Cast {
            mapping,
            filter,
            sort,
            json,
        } => cast(&mapping, filter.as_deref(), sort.as_deref(), json)?,
        Commands::Query {
            records,
            shape,
            filter,
            sort,
            batch_size,
            output,
        } => {
            let matched = query(&records, shape.as_deref(), &filter, &sort, batch_size).await?;
            output::write_records(&matched, output).await?;
        }
    }

    Ok(())
}

fn cast(
    mapping: &str,
    filter: Option<&str>,
    sort: Option<&str>,
    as_json: bool,
) -> Result<(), CliError> {
    if filter.is_none() && sort.is_none() {
        warn!("Nothing to cast, pass --filter and/or --sort");
    }

    let table = MappingConfig::from_file(mapping)?.to_table()?;
    let filters = filter
        .map(parse_filters)
        .transpose()?
        .map(|filters| table.rewrite_filters(&filters));
    let sorts = sort
        .map(parse_sorts)
        .transpose()?
        .map(|sorts| table.rewrite_sorts(&sorts));

    if as_json {
        let output = CastOutput {
            filters: filters.as_ref(),
            sorts: sorts.as_ref(),
        };
        println!("{}", to_json(&output)?);
        return Ok(());
    }

    if let Some(filters) = &filters {
        println!(
            "{}",
            describe("filters", &filters.to_string(), &filters.fingerprint())
        );
    }
    if let Some(sorts) = &sorts {
        println!(
            "{}",
            describe("sorts", &sorts.to_string(), &sorts.fingerprint())
        );
    }
    Ok(())
}

async fn query(
    records_path: &str,
    shape_path: Option<&str>,
    filter: &str,
    sort: &str,
    batch_size: usize,
) -> Result<Vec<Json>, CliError> {
    let source = tokio::fs::read_to_string(records_path).await?;
    let records = match serde_json::from_str::<Json>(&source)? {
        Json::Array(records) => records,
        other => return Err(CliError::InvalidRecords(json_type(&other))),
    };

    let shape = match shape_path {
        Some(path) => {
            let schema = tokio::fs::read_to_string(path).await?;
            JsonShape::from_schema_str("record", &schema)?
        }
        None => JsonShape::infer("record", &records),
    };
    let resolver = PathResolver::new(shape);
    let query = CompiledQuery::compile_str(filter, sort, &resolver)?;

    info!(records = records.len(), filter, sort, "Running query");

    let shutdown = ShutdownCoordinator::new(CancellationToken::new());
    shutdown.register_handlers();
    let token = shutdown.cancel_token();

    let matched = tokio::task::spawn_blocking(move || {
        query
            .apply_cancellable(&records, batch_size, &token)
            .map(|matched| matched.into_iter().cloned().collect::<Vec<Json>>())
    })
    .await
    .map_err(|err| CliError::Unexpected(format!("Query task failed: {err}")))??;

    info!(matched = matched.len(), "Query finished");
    Ok(matched)
}

fn json_type(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_query_command() {
        let cli = Cli::try_parse_from([
            "criteria",
            "query",
            "--records",
            "people.json",
            "--filter",
            "age:gte(25)",
            "--sort",
            "name:asc",
        ])
        .unwrap();

        match cli.command {
            Commands::Query {
                records,
                shape,
                filter,
                sort,
                batch_size,
                output,
            } => {
                assert_eq!(records, "people.json");
                assert_eq!(shape, None);
                assert_eq!(filter, "age:gte(25)");
                assert_eq!(sort, "name:asc");
                assert_eq!(batch_size, 1024);
                assert_eq!(output, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parses_parse_subcommands() {
        let cli = Cli::try_parse_from(["criteria", "parse", "sort", "salary:desc", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Parse {
                target: ParseCommand::Sort { ref expr, json: true }
            } if expr == "salary:desc"
        ));

        assert!(Cli::try_parse_from(["criteria", "cast", "--filter", "a:1"]).is_err());
    }

    #[tokio::test]
    async fn test_query_runs_against_a_file() {
        let dir = std::env::temp_dir().join(format!("criteria-cli-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("records.json");
        tokio::fs::write(
            &path,
            r#"[{"name": "John", "salary": 50000}, {"name": "Alice", "salary": 55000},
                {"name": "Bob", "salary": 60000}]"#,
        )
        .await
        .unwrap();

        let matched = query(path.to_str().unwrap(), None, "salary:gt(50000)", "salary:desc", 2)
            .await
            .unwrap();
        let names: Vec<&str> = matched.iter().filter_map(|r| r["name"].as_str()).collect();
        assert_eq!(names, vec!["Bob", "Alice"]);

        tokio::fs::write(&path, r#"{"name": "x"}"#).await.unwrap();
        let err = query(path.to_str().unwrap(), None, "", "", 2).await.unwrap_err();
        assert!(matches!(err, CliError::InvalidRecords("an object")));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
