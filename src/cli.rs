//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::cached_data_port::CachedDataPort;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{load_dashboard_settings, load_full_config};
use crate::domain::dashboard::{build_dashboard, DashboardSettings};
use crate::domain::error::SignalboardError;
use crate::domain::signal::CrossKind;
use crate::domain::snapshot::Snapshot;
use crate::domain::timeframe::UnknownTimeframe;
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

/// Exit status when no requested symbol produced a snapshot.
const EXIT_ALL_UNAVAILABLE: u8 = 5;

#[derive(Parser, Debug)]
#[command(name = "signalboard", about = "Technical-analysis signal snapshots")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute and print snapshots
    Snapshot {
        #[arg(short, long)]
        config: PathBuf,
        /// Comma-separated symbols, overriding [dashboard] symbols
        #[arg(long)]
        symbol: Option<String>,
        /// daily, weekly or monthly (also 1d, 1wk, 1mo)
        #[arg(long)]
        timeframe: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Snapshot {
            config,
            symbol,
            timeframe,
        } => run_snapshot(&config, symbol.as_deref(), timeframe.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SignalboardError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        error!("{err}");
        ExitCode::from(&err)
    })
}

fn fail(err: SignalboardError) -> ExitCode {
    error!("{err}");
    (&err).into()
}

/// Apply `--symbol` and `--timeframe` on top of the file settings.
pub fn apply_overrides(
    mut settings: DashboardSettings,
    symbol: Option<&str>,
    timeframe: Option<&str>,
) -> Result<DashboardSettings, SignalboardError> {
    if let Some(raw) = symbol {
        settings.symbols = parse_symbols(raw)
            .map_err(|e| SignalboardError::invalid("dashboard", "symbols", e.to_string()))?;
    }
    if let Some(raw) = timeframe {
        settings.timeframe = raw.parse().map_err(|e: UnknownTimeframe| {
            SignalboardError::invalid("dashboard", "timeframe", e.to_string())
        })?;
    }
    Ok(settings)
}

fn run_snapshot(config_path: &PathBuf, symbol: Option<&str>, timeframe: Option<&str>) -> ExitCode {
    info!(path = %config_path.display(), "loading config");
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let (settings, signals) = match load_full_config(&adapter)
        .and_then(|(s, signals)| Ok((apply_overrides(s, symbol, timeframe)?, signals)))
    {
        Ok(loaded) => loaded,
        Err(e) => return fail(e),
    };

    let port = CachedDataPort::new(
        CsvAdapter::new(settings.data_dir.clone()),
        settings.cache_ttl,
    );
    info!(
        symbols = settings.symbols.len(),
        timeframe = %settings.timeframe,
        data = %settings.data_dir.display(),
        "building dashboard"
    );

    let entries = build_dashboard(&port, &settings.symbols, settings.timeframe, &signals);

    let mut ready = 0;
    for entry in &entries {
        match entry {
            Ok(snapshot) => {
                ready += 1;
                print!("{}", render_snapshot(snapshot));
            }
            Err(unavailable) => {
                println!(
                    "{}: data unavailable ({})\n",
                    unavailable.symbol, unavailable.reason
                );
            }
        }
    }

    if !entries.is_empty() && ready == 0 {
        error!("no symbol produced a snapshot");
        return ExitCode::from(EXIT_ALL_UNAVAILABLE);
    }
    info!(ready, total = entries.len(), "done");
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    info!(path = %config_path.display(), "validating config");
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    for section in ["dashboard", "data", "signals"] {
        if !adapter.has_section(section) {
            warn!(section, "section absent, defaults apply");
        }
    }

    let (settings, signals) = match load_full_config(&adapter) {
        Ok(loaded) => loaded,
        Err(e) => return fail(e),
    };

    println!("symbols:    {}", settings.symbols.join(", "));
    println!("timeframe:  {}", settings.timeframe);
    println!("data:       {}", settings.data_dir.display());
    println!("cache ttl:  {}s", settings.cache_ttl.as_secs());
    let indicators: Vec<String> = signals
        .required_indicators()
        .iter()
        .map(|t| t.to_string())
        .collect();
    println!("indicators: {}", indicators.join(", "));
    println!("configuration is valid");
    ExitCode::SUCCESS
}

fn run_list_symbols(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let settings = match load_dashboard_settings(&adapter) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    let symbols = match CsvAdapter::new(settings.data_dir.clone()).list_symbols() {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    if symbols.is_empty() {
        warn!(data = %settings.data_dir.display(), "no symbols found");
    }
    for symbol in &symbols {
        println!("{symbol}");
    }
    info!(count = symbols.len(), "symbols listed");
    ExitCode::SUCCESS
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

fn fmt_signed_pct(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:+.2}%"))
}

/// Plain-text block for one snapshot, ending in a blank line.
pub fn render_snapshot(s: &Snapshot) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_snapshot(&mut out, s);
    out
}

fn write_snapshot(out: &mut String, s: &Snapshot) -> std::fmt::Result {
    writeln!(out, "== {} ({}) as of {} ==", s.symbol, s.timeframe, s.as_of)?;
    writeln!(
        out,
        "price {:.2}  change over {} bars {}  streak {:+}",
        s.last_price,
        s.change_bars,
        fmt_signed_pct(s.change_pct),
        s.streak
    )?;

    writeln!(out, "levels:")?;
    for level in &s.levels {
        writeln!(out, "  {:<10} {}", level.indicator.to_string(), fmt_opt(level.value))?;
    }

    writeln!(out, "fast EMA above:")?;
    for signal in &s.comparisons {
        let distance = signal.magnitude.map_or_else(
            || "n/a".to_string(),
            |m| format!("{:.2} ({})", m.absolute, fmt_signed_pct(m.percent)),
        );
        writeln!(out, "  {:<10} {:<9} {}", signal.name, signal.status.to_string(), distance)?;
    }

    let b = &s.bollinger;
    writeln!(
        out,
        "bollinger: top {} bottom {} width {}",
        fmt_opt(b.top),
        fmt_opt(b.bottom),
        fmt_opt(b.width)
    )?;
    writeln!(
        out,
        "  position {}  touches upper {} lower {}  volatility {}",
        b.position, b.touches.upper, b.touches.lower, b.volatility
    )?;

    let k = &s.stochastic;
    let cross = match k.last_cross {
        Some(event) => {
            let label = match event.kind {
                CrossKind::BelowUpper => "below upper",
                CrossKind::AboveLower => "above lower",
            };
            format!("{label} on {}", event.date)
        }
        None => "none".to_string(),
    };
    writeln!(
        out,
        "stochastic: %K {}  direction {}  last cross {}",
        fmt_opt(k.k),
        k.direction,
        cross
    )?;

    for estimate in &s.convergence {
        writeln!(
            out,
            "convergence {} -> {}: {}",
            estimate.pair.left, estimate.pair.right, estimate.estimate
        )?;
    }
    writeln!(out)
}
