// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compiles a bundled sample dataset for every chart type and prints the options.
//!
//! ```text
//! chartir_demo [--dark] [CHART_TYPE...]
//! ```
//!
//! Set `CHARTIR_LOG` to a filter such as `debug` or `chartir_charts::sankey=trace` to see
//! processor logs on stderr. Only warnings are shown by default.

use std::process::ExitCode;

use chartir_charts::{ChartKind, ProcessorTable};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

/// Routes the library's `log` records to stderr through a `tracing` subscriber.
fn init_logging() {
    let filter =
        EnvFilter::try_from_env("CHARTIR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Sample rows and config for one chart type.
fn sample(kind: ChartKind) -> (Value, Value) {
    match kind {
        ChartKind::Bar | ChartKind::Line | ChartKind::Area | ChartKind::Radar => (
            json!([
                {"date": "2025-01-06", "chain": "ethereum", "value": 1_250_000},
                {"date": "2025-01-06", "chain": "gnosis", "value": 310_000},
                {"date": "2025-01-13", "chain": "ethereum", "value": 1_410_000},
                {"date": "2025-01-13", "chain": "gnosis", "value": 295_500},
                {"date": "2025-01-20", "chain": "ethereum", "value": 1_330_000},
                {"date": "2025-01-20", "chain": "gnosis", "value": 402_250},
            ]),
            json!({"seriesField": "chain", "stacked": kind == ChartKind::Area, "format": "currency"}),
        ),
        ChartKind::Pie => (
            json!([
                {"category": "Safe", "value": 420},
                {"category": "EOA", "value": 910},
                {"category": "Module", "value": 75},
                {"category": "Relayer", "value": 40},
                {"category": "Other", "value": 12},
            ]),
            json!({"maxSlices": 4, "donut": true}),
        ),
        ChartKind::Boxplot => (
            json!([
                {"category": "ethereum", "min": 0.4, "q1": 1.2, "median": 2.1, "q3": 3.8, "max": 9.5},
                {"category": "gnosis", "min": 0.01, "q1": 0.02, "median": 0.05, "q3": 0.09, "max": 0.4},
            ]),
            json!({"decimals": 2}),
        ),
        ChartKind::Heatmap => (
            json!([
                {"weekday": "Mon", "hour": "00", "value": 12},
                {"weekday": "Mon", "hour": "12", "value": 48},
                {"weekday": "Tue", "hour": "00", "value": 9},
                {"weekday": "Tue", "hour": "12", "value": 61},
            ]),
            json!({"xField": "hour", "seriesField": "weekday"}),
        ),
        ChartKind::Sankey => (
            json!([
                {"source": "Bridge", "target": "DEX", "value": 80},
                {"source": "DEX", "target": "Lending", "value": 35},
                {"source": "DEX", "target": "Wallets", "value": 45},
                {"source": "Lending", "target": "Bridge", "value": 5},
            ]),
            Value::Null,
        ),
        ChartKind::Sunburst => (
            json!([
                {"path": "DeFi/DEX/Uniswap", "value": 40},
                {"path": "DeFi/DEX/Curve", "value": 25},
                {"path": "DeFi/Lending", "value": 30},
                {"path": "NFT", "value": 5},
            ]),
            Value::Null,
        ),
        ChartKind::WordCloud => (
            json!([
                {"word": "bridge", "value": 30},
                {"word": "Gnosis", "value": 22},
                {"word": "gnosis", "value": 8},
                {"word": "safe", "value": 17},
                {"word": "to", "value": 50},
            ]),
            json!({"minWordLength": 3}),
        ),
        ChartKind::QuantileBands => (
            json!([
                {"date": "2025-01-06", "p05": 1, "p25": 3, "p50": 5, "p75": 8, "p95": 14},
                {"date": "2025-01-13", "p05": 2, "p25": 4, "p50": 6, "p75": 9, "p95": 15},
                {"date": "2025-01-20", "p05": 1, "p25": 4, "p50": 7, "p75": 11, "p95": 19},
            ]),
            Value::Null,
        ),
        ChartKind::Network => (
            json!([
                {"source": "treasury", "target": "alice", "kind": "transfer", "value": 120, "token": "GNO"},
                {"source": "treasury", "target": "bob", "kind": "transfer", "value": 45, "token": "GNO"},
                {"source": "alice", "target": "bob", "kind": "swap", "value": 30},
                {"source": "bob", "target": "alice", "kind": "swap", "value": 12},
            ]),
            json!({"edgeStyleField": "kind", "boundaryAnchorSources": ["treasury"]}),
        ),
    }
}

fn main() -> ExitCode {
    init_logging();

    let mut dark = false;
    let mut kinds = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--dark" {
            dark = true;
            continue;
        }
        match arg.parse::<ChartKind>() {
            Ok(kind) => kinds.push(kind),
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        }
    }
    if kinds.is_empty() {
        kinds.extend(ChartKind::ALL);
    }

    let table = ProcessorTable::standard();
    for kind in kinds {
        let (rows, config) = sample(kind);
        let spec = table.compile(kind.key(), &rows, &config, dark);
        match serde_json::to_string_pretty(&spec.option) {
            Ok(text) => println!("// {kind}\n{text}\n"),
            Err(err) => {
                eprintln!("{kind}: {err}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
