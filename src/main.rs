use anyhow::Context;
#[cfg(not(feature = "aws-config"))]
use aws_credential_types::Credentials;
use clap::Parser;
use std::sync::mpsc;
use timestream_query::config::cli::{CallMode, CliArgs, Command};
use timestream_query::operations::{
    CancelQuery, DescribeAccountSettings, DescribeEndpoints, ListScheduledQueries, PrepareQuery,
    Query,
};
use timestream_query::utils::logger;
use timestream_query::utils::render::{render_json, render_rows};
use timestream_query::{Client, ClientError, ErrorCategory, Operation, Outcome};

fn main() {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting tsq");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    if let Err(err) = run(&args) {
        match err.downcast_ref::<ClientError>() {
            Some(e) => {
                tracing::error!("❌ {} (Category: {:?})", e, e.category());
                eprintln!("❌ {:#}", err);
                eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

                // 根據錯誤類別決定退出碼
                let exit_code = match e.category() {
                    ErrorCategory::Client => 1,
                    ErrorCategory::Validation => 2,
                    ErrorCategory::Transport => 3,
                    ErrorCategory::Service => 4,
                };
                std::process::exit(exit_code);
            }
            None => {
                eprintln!("❌ {:#}", err);
                std::process::exit(1);
            }
        }
    }
}

fn run(args: &CliArgs) -> anyhow::Result<()> {
    let config = args.resolve_config().context("invalid configuration")?;
    let client = build_client(config)?;
    tracing::debug!("Client config: {:?}", client.config());

    let output = match &args.command {
        Command::Query {
            query_string,
            max_rows,
            next_token,
            all_pages,
        } => {
            let mut query = Query::new(query_string.clone());
            query.max_rows = *max_rows;
            query.next_token = next_token.clone();

            let mut pages = Vec::new();
            loop {
                let page = dispatch(&client, args.mode, query.clone())?;
                let next = page.next_token.clone();
                tracing::debug!("Fetched page with {} rows", page.rows.len());
                pages.push(page);
                match next {
                    Some(token) if *all_pages => query.next_token = Some(token),
                    _ => break,
                }
            }
            if let Some(token) = pages.last().and_then(|page| page.next_token.as_deref()) {
                eprintln!("More rows available, next token: {}", token);
            }
            render_rows(&pages, args.format)?
        }
        Command::CancelQuery { query_id } => {
            render_json(&dispatch(&client, args.mode, CancelQuery::new(query_id.clone()))?)?
        }
        Command::PrepareQuery { query_string } => {
            let prepare = PrepareQuery {
                query_string: query_string.clone(),
                validate_only: Some(true),
            };
            render_json(&dispatch(&client, args.mode, prepare)?)?
        }
        Command::DescribeEndpoints => {
            render_json(&dispatch(&client, args.mode, DescribeEndpoints::default())?)?
        }
        Command::DescribeAccountSettings => {
            render_json(&dispatch(&client, args.mode, DescribeAccountSettings::default())?)?
        }
        Command::ListScheduledQueries {
            max_results,
            next_token,
        } => {
            let list = ListScheduledQueries {
                max_results: *max_results,
                next_token: next_token.clone(),
            };
            render_json(&dispatch(&client, args.mode, list)?)?
        }
    };

    println!("{}", output);
    Ok(())
}

fn build_client(config: timestream_query::ClientConfig) -> anyhow::Result<Client> {
    let builder = Client::builder().config(config);

    #[cfg(feature = "aws-config")]
    let builder = tokio::runtime::Runtime::new()
        .context("failed to start runtime for credential loading")?
        .block_on(builder.load_default_credentials());

    #[cfg(not(feature = "aws-config"))]
    let builder = match env_credentials() {
        Some(credentials) => builder.credentials_provider(credentials),
        None => {
            tracing::warn!("AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY not set; sending unsigned requests");
            builder
        }
    };

    Ok(builder.build()?)
}

#[cfg(not(feature = "aws-config"))]
fn env_credentials() -> Option<Credentials> {
    let access_key = std::env::var("AWS_ACCESS_KEY_ID").ok()?;
    let secret_key = std::env::var("AWS_SECRET_ACCESS_KEY").ok()?;
    let session_token = std::env::var("AWS_SESSION_TOKEN").ok();
    Some(Credentials::new(
        access_key,
        secret_key,
        session_token,
        None,
        "Environment",
    ))
}

/// Runs `operation` through the requested call mode.
fn dispatch<Op: Operation>(client: &Client, mode: CallMode, operation: Op) -> Outcome<Op::Output> {
    match mode {
        CallMode::Sync => client.call(&operation),
        CallMode::Future => client.call_async(operation).wait(),
        CallMode::Callback => {
            let (tx, rx) = mpsc::channel();
            client.call_with_handler(operation, Op::NAME, move |_, outcome, name| {
                tracing::debug!("{} handler invoked", name);
                // The receiver only goes away if main already gave up.
                let _ = tx.send(outcome);
            });
            rx.recv().map_err(|_| ClientError::RuntimeError {
                message: "callback was never invoked".to_string(),
            })?
        }
    }
}
