use std::io::{self, Write};
use std::sync::LazyLock;

use chrono::Local;
use log::{Level, LevelFilter, Log};
#[cfg(all(unix, feature = "journald"))]
use systemd_journal_logger::{JournalLog, connected_to_journal, current_exe_identifier};

/// Setting this environment variable to anything non-empty turns off timestamps in log output.
const NO_TIMESTAMPS_VAR: &str = "INWX_LOG_NO_TIMESTAMPS";

/// A simple logger that writes messages to `stderr`, or to journald when running under systemd.
///
/// Colour support is automatically provided by the [`anstream`] crate.
pub struct Logger {
    filter: LevelFilter,
    timestamps: bool,
    #[cfg(all(unix, feature = "journald"))]
    journald: Option<JournalLog>,
}

/// Timestamp format for log output. Format is `Jul 8 2001 14:46:23`.
static TIMESTAMP_FMT: LazyLock<&'static [chrono::format::Item<'static>]> = LazyLock::new(|| {
    // NB: `LazyLock`'s own docs have a note about how static items don't ever get dropped, so leaking this Vec into a
    // static slice doesn't make any difference in that regard.
    chrono::format::StrftimeItems::new("%b %d %Y %H:%M:%S")
        .parse_to_owned()
        .expect("hardcoded strftime string should be valid")
        .leak()
});

/// Styles for log levels, matching the colours `journalctl` uses for the corresponding syslog priorities.
#[rustfmt::skip]
mod styles {
    use anstyle::{Ansi256Color, AnsiColor, Color, Style};

    pub const TRACE: Style = Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(245))));
    pub const DEBUG: Style = Style::new().fg_color(None);
    pub const INFO: Style  = Style::new().fg_color(None).bold();
    pub const WARN: Style  = Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(185)))).bold();
    pub const ERROR: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold();
}

impl Logger {
    /// Creates a new logger instance.
    pub fn new(level: LevelFilter) -> Self {
        let mut timestamps = !std::env::var(NO_TIMESTAMPS_VAR).is_ok_and(|v| !v.is_empty());

        // journald stamps every entry itself.
        #[cfg(all(unix, feature = "journald"))]
        let journald = init_journald().inspect(|_| timestamps = false);

        Self {
            filter: level,
            timestamps,
            #[cfg(all(unix, feature = "journald"))]
            journald,
        }
    }

    /// Installs this logger as the global [`log`] logger.
    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.filter;
        log::set_boxed_logger(Box::new(self)).map(|_| log::set_max_level(level))
    }

    /// Whether a record should be printed at all: it must come from this package (the library or the binary, both
    /// named `inwx`), not from one of its dependencies, and pass the level filter.
    fn accepts(&self, record: &log::Record) -> bool {
        record.target().starts_with(env!("CARGO_CRATE_NAME")) && self.enabled(record.metadata())
    }

    /// Fallible version of [`Log::log`] to enable the use of `?` within.
    fn try_log(&self, record: &log::Record) -> io::Result<()> {
        if !self.accepts(record) {
            return Ok(());
        }

        #[cfg(all(unix, feature = "journald"))]
        if let Some(journald) = self.journald.as_ref() {
            return journald.journal_send(record);
        }

        // `anstream`'s versions of `stderr` will automatically handle terminal/VT configuration and NO_COLOR support.
        let mut output = anstream::stderr().lock();
        if self.timestamps {
            let timestamp = Local::now().format_with_items(TIMESTAMP_FMT.iter());
            write!(output, "{timestamp} ")?;
        }
        write_line(&mut output, record)?;
        output.flush()
    }
}

/// Writes the level tag, target, and message of `record` as a single line.
fn write_line(output: &mut impl Write, record: &log::Record) -> io::Result<()> {
    #[rustfmt::skip]
    let (style, tag) = match record.level() {
        Level::Trace => (styles::TRACE, "[trace]"),
        Level::Debug => (styles::DEBUG, "[debug]"),
        Level::Info  => ( styles::INFO, "[info]"),
        Level::Warn  => ( styles::WARN, "[warn]"),
        Level::Error => (styles::ERROR, "[error]"),
    };

    if !record.target().is_empty() {
        write!(output, "{} ", record.target())?;
    }

    writeln!(output, "{style}{tag} {}{style:#}", record.args())
}

impl Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.filter
    }

    fn log(&self, record: &log::Record) {
        let _ = self.try_log(record);
    }

    fn flush(&self) {
        let _ = anstream::stderr().flush();

        #[cfg(all(unix, feature = "journald"))]
        if let Some(journald) = self.journald.as_ref() {
            <JournalLog as Log>::flush(journald);
        }
    }
}

#[cfg(all(unix, feature = "journald"))]
fn init_journald() -> Option<JournalLog> {
    if connected_to_journal() {
        let identifier = current_exe_identifier().unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
        let logger = JournalLog::empty()
            .ok()?
            .with_syslog_identifier(identifier)
            .add_extra_field("version", env!("CARGO_PKG_VERSION"));
        Some(logger)
    } else {
        None
    }
}
