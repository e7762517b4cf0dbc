// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The `docsync` command line.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use futures_util::{Stream, StreamExt};
use serde_json::Value;
use tracing::info;

use docsync_core::draft::{id_pair, published_id};
use docsync_core::{
    history_events, ndjson, HistoryEvent, HistorySelector, Params, Transaction,
    TransactionCompiler,
};

use crate::config::{Config, CONFIG_FILE_NAME};
use crate::error::{Error, Result, SyncResult};
use crate::sync::{fetch_revision, stream_history, sync_query, WebSocketTransport};

#[derive(Parser, Debug)]
#[command(name = "docsync")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Live query results and document history from a document store")]
pub struct Cli {
    /// Config file
    #[arg(long, global = true, value_name = "path", default_value = CONFIG_FILE_NAME)]
    pub config: PathBuf,

    /// Document store address, overriding the config file
    #[arg(long, global = true, value_name = "url")]
    pub url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a query's result every time it changes
    Watch {
        /// Query to run
        query: String,

        /// Query parameter; the value is read as JSON, else as a string
        #[arg(long = "param", value_name = "key=value", value_parser = parse_param)]
        params: Vec<(String, Value)>,
    },

    /// Print a document's history every time it changes
    History {
        /// Document id (published or draft)
        document_id: String,

        /// Print each update as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Print a document as it was at a point in its history
    Revision {
        /// Document id
        document_id: String,

        /// Read the document at this time (RFC 3339)
        #[arg(long, value_name = "time")]
        time: Option<DateTime<Utc>>,

        /// Read the document at this transaction id
        #[arg(long, value_name = "id")]
        rev: Option<String>,
    },

    /// Print the history recorded in a saved transaction log
    Replay {
        /// NDJSON transaction log
        log: PathBuf,

        /// Document id (published or draft)
        document_id: String,

        /// Print the history as a JSON array
        #[arg(long)]
        json: bool,
    },
}

/// Parse a `key=value` query parameter.
pub fn parse_param(s: &str) -> Result<(String, Value)> {
    let (key, raw) = s
        .split_once('=')
        .filter(|(key, _)| !key.trim().is_empty())
        .ok_or_else(|| Error::InvalidParam(s.to_string()))?;
    let value =
        serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.trim().to_string(), value))
}

pub async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(&cli.config)?;
    if let Some(url) = cli.url {
        config.url = url;
    }

    match cli.command {
        Command::Watch { query, params } => watch(&config, query, params).await,
        Command::History { document_id, json } => history(&config, &document_id, json).await,
        Command::Revision {
            document_id,
            time,
            rev,
        } => revision(&config, &document_id, time, rev).await,
        Command::Replay {
            log,
            document_id,
            json,
        } => replay(&config, &log, &document_id, json),
    }
}

async fn watch(config: &Config, query: String, params: Vec<(String, Value)>) -> Result<()> {
    let params: Params = params.into_iter().collect();
    let transport = Arc::new(WebSocketTransport::new(&config.url));
    info!(url = %config.url, "watching query");

    let results = sync_query(transport, query, params, &config.sync);
    until_interrupted(results, |result| {
        println!("{}", serde_json::to_string(&result)?);
        Ok(())
    })
    .await
}

async fn history(config: &Config, document_id: &str, json: bool) -> Result<()> {
    let transport = Arc::new(WebSocketTransport::new(&config.url));
    info!(url = %config.url, document = document_id, "watching history");

    let histories = stream_history(transport, &[document_id.to_string()], config);
    until_interrupted(histories, |events| print_history(&events, json)).await
}

async fn revision(
    config: &Config,
    document_id: &str,
    time: Option<DateTime<Utc>>,
    rev: Option<String>,
) -> Result<()> {
    let selector = HistorySelector::from_parts(time, rev)?;
    let transport = WebSocketTransport::new(&config.url);

    let documents = fetch_revision(&transport, document_id, selector.as_ref()).await?;
    for document in documents {
        println!("{}", serde_json::to_string_pretty(&document)?);
    }
    Ok(())
}

fn replay(config: &Config, log: &Path, document_id: &str, json: bool) -> Result<()> {
    let ids = id_pair(document_id);
    let transactions: Vec<Transaction> = ndjson::read_file(log)?;
    let transactions: Vec<Transaction> = transactions
        .into_iter()
        .filter(|tx| ids.iter().any(|id| tx.touches(id)))
        .collect();

    let mut compiler = TransactionCompiler::new();
    let unified = compiler.apply_history(transactions);
    let events = history_events(
        &published_id(document_id),
        unified,
        config.history.coalesce_threshold(),
    );
    print_history(&events, json)
}

/// Drain a subscription until it ends, errors, or the user interrupts.
async fn until_interrupted<S, T, F>(mut stream: S, mut on_item: F) -> Result<()>
where
    S: Stream<Item = SyncResult<T>> + Unpin,
    F: FnMut(T) -> Result<()>,
{
    loop {
        tokio::select! {
            item = stream.next() => match item {
                Some(item) => on_item(item?)?,
                None => return Ok(()),
            },
            _ = tokio::signal::ctrl_c() => return Ok(()),
        }
    }
}

fn print_history(events: &[HistoryEvent], json: bool) -> Result<()> {
    let mut out = std::io::stdout().lock();
    if json {
        writeln!(out, "{}", serde_json::to_string(events)?)?;
        return Ok(());
    }

    for event in events {
        writeln!(
            out,
            "{}  {:<11} {}  {}",
            event.end_time.format("%Y-%m-%d %H:%M"),
            event.kind.as_str(),
            event.rev,
            event.user_ids.join(", ")
        )?;
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
