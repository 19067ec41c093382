//! Stderr logging for the `rodfit` binary and ad-hoc tools.
//!
//! Library code only talks to the `log` facade. A binary installs one of two
//! backends at startup:
//!
//! - [`init_with_verbosity`] / [`init_with_level`]: a plain line logger.
//!   Records from `rodfit*` crates pass at the chosen level; records from
//!   dependencies (image decoders and the like) only at `warn` and above.
//!   Lines look like `   0.412s DEBUG shape::fit  powell sweep 3: ...`.
//! - `init_tracing` (feature `tracing`): a `tracing-subscriber` fmt layer
//!   driven by `RUST_LOG`, which also receives `log` records and span timings.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

const OWN_PREFIX: &str = "rodfit";

/// Level for a `-v` count: 0 warn, 1 info, 2 debug, 3+ trace.
pub fn verbosity_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// `rodfit_shape::fit::powell` -> `shape::fit::powell`.
fn short_target(target: &str) -> &str {
    target
        .strip_prefix("rodfit_")
        .or_else(|| target.strip_prefix("rodfit::"))
        .unwrap_or(target)
}

struct RodfitLogger {
    own: LevelFilter,
    started: Instant,
}

impl RodfitLogger {
    fn passes(&self, level: Level, target: &str) -> bool {
        if target.starts_with(OWN_PREFIX) {
            level <= self.own
        } else {
            level <= Level::Warn
        }
    }
}

impl Log for RodfitLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.passes(metadata.level(), metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let secs = self.started.elapsed().as_secs_f64();
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "{secs:>8.3}s {:<5} {:<12} {}",
            record.level(),
            short_target(record.target()),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<RodfitLogger> = OnceLock::new();

/// Install the stderr logger; `level` applies to `rodfit*` targets.
///
/// Repeated calls keep the first logger and return `Ok`.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| RodfitLogger {
        own: level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level.max(LevelFilter::Warn));
    Ok(())
}

/// [`init_with_level`] for a `-v` count.
pub fn init_with_verbosity(verbose: u8) -> Result<(), log::SetLoggerError> {
    init_with_level(verbosity_level(verbose))
}

/// Install a `tracing` fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `rodfit*` spans and events show at
/// `info` and everything else at `warn`. `json` switches to one JSON object
/// per line with span close timings flattened in.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,rodfit=info,rodfit_core=info,rodfit_filters=info,rodfit_shape=info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE);
    if json {
        let _ = builder.json().flatten_event(true).finish().try_init();
    } else {
        let _ = builder
            .with_timer(fmt::time::Uptime::default())
            .with_target(true)
            .finish()
            .try_init();
    }
}
