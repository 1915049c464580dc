//! # Log Sink
//!
//! Components never log through a process-wide singleton. Each one receives a
//! [`Logger`] handle at construction time; every handle created from the same
//! [`SharedLogSink`] feeds the same bounded, de-duplicating buffer.
//!
//! A repeated message (same level, source and text as the most recent entry)
//! bumps that entry's `count` instead of appending, so a program spinning on an
//! out-of-range read produces one line with a large counter rather than
//! thousands of lines.
//!
//! New (non-repeated) entries are also forwarded to the [`log`] facade with the
//! component name as target, so native hosts can attach any `log` backend.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Default number of entries retained by a [`LogSink`].
pub const DEFAULT_LOG_CAPACITY: usize = 256;

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Recoverable faults. They never interrupt emulation; they are reported
/// through a [`Logger`] with their name as the message prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Access outside a bank's extent. Reads return 0, writes are dropped.
    OutOfBounds,
    /// Write to ROM. Dropped.
    ReadOnlyViolation,
    /// Value wider than 8 bits, masked before being stored.
    MaskedValue,
    /// Bulk-load payload that is too short or has non-numeric entries.
    InvalidFlashData,
    /// Undocumented opcode, executed as a NOP.
    IllegalOpcode,
}

impl Fault {
    /// Level the fault is logged at.
    pub fn level(self) -> LogLevel {
        match self {
            Fault::MaskedValue => LogLevel::Info,
            Fault::InvalidFlashData => LogLevel::Error,
            _ => LogLevel::Warn,
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Fault::OutOfBounds => "OutOfBounds",
            Fault::ReadOnlyViolation => "ReadOnlyViolation",
            Fault::MaskedValue => "MaskedValue",
            Fault::InvalidFlashData => "InvalidFlashData",
            Fault::IllegalOpcode => "IllegalOpcode",
        };
        f.write_str(name)
    }
}

/// One (possibly repeated) log message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub source: String,
    pub message: String,
    /// How many times this exact message was reported back-to-back.
    pub count: u32,
}

/// Bounded buffer of log entries with back-to-back de-duplication.
#[derive(Debug)]
pub struct LogSink {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

/// Sink shared by every component of one emulator instance.
pub type SharedLogSink = Rc<RefCell<LogSink>>;

impl LogSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
        }
    }

    /// Creates a sink ready to be handed out to components.
    pub fn shared(capacity: usize) -> SharedLogSink {
        Rc::new(RefCell::new(Self::new(capacity)))
    }

    /// Records a message. Returns `true` if a new entry was appended and
    /// `false` if it was folded into the previous one.
    pub fn record(&mut self, level: LogLevel, source: &str, message: String) -> bool {
        if let Some(last) = self.entries.back_mut() {
            if last.level == level && last.source == source && last.message == message {
                last.count = last.count.saturating_add(1);
                return false;
            }
        }

        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            level,
            source: source.to_string(),
            message,
            count: 1,
        });
        true
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&mut self) -> Vec<LogEntry> {
        self.entries.drain(..).collect()
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

/// Per-component logging handle.
///
/// Cloning is cheap (one `Rc` bump); [`Logger::named`] derives a handle for
/// another component that writes into the same sink.
#[derive(Clone)]
pub struct Logger {
    source: Rc<str>,
    sink: SharedLogSink,
}

impl Logger {
    pub fn new(source: &str, sink: SharedLogSink) -> Self {
        Self {
            source: Rc::from(source),
            sink,
        }
    }

    /// A logger with its own private sink. Handy for standalone components
    /// and tests.
    pub fn detached(source: &str) -> Self {
        Self::new(source, LogSink::shared(DEFAULT_LOG_CAPACITY))
    }

    /// Another handle on the same sink, reporting under `source`.
    pub fn named(&self, source: &str) -> Self {
        Self::new(source, Rc::clone(&self.sink))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn sink(&self) -> &SharedLogSink {
        &self.sink
    }

    pub fn info(&self, message: impl Into<String>) {
        self.emit(LogLevel::Info, message.into());
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.emit(LogLevel::Warn, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(LogLevel::Error, message.into());
    }

    /// Logs a recoverable fault at its own level, prefixed with its name.
    pub fn fault(&self, fault: Fault, detail: impl fmt::Display) {
        self.emit(fault.level(), format!("{}: {}", fault, detail));
    }

    fn emit(&self, level: LogLevel, message: String) {
        let appended = self
            .sink
            .borrow_mut()
            .record(level, &self.source, message.clone());
        if !appended {
            return;
        }
        let target: &str = &self.source;
        match level {
            LogLevel::Info => log::info!(target: target, "{}", message),
            LogLevel::Warn => log::warn!(target: target, "{}", message),
            LogLevel::Error => log::error!(target: target, "{}", message),
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Logger")
            .field("source", &self.source)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_messages_are_folded() {
        let logger = Logger::detached("ram");
        for _ in 0..5 {
            logger.warn("read out of bounds at 0x1000");
        }
        logger.warn("read out of bounds at 0x1001");

        let entries = logger.sink().borrow_mut().drain();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].count, 5);
        assert_eq!(entries[1].count, 1);
        assert_eq!(entries[0].source, "ram");
        assert_eq!(entries[0].level, LogLevel::Warn);
    }

    #[test]
    fn test_same_text_different_level_is_not_folded() {
        let logger = Logger::detached("bus");
        logger.info("hello");
        logger.warn("hello");
        assert_eq!(logger.sink().borrow().len(), 2);
    }

    #[test]
    fn test_named_handles_share_sink() {
        let cpu = Logger::detached("cpu");
        let pia = cpu.named("pia");
        cpu.info("reset");
        pia.info("reset");

        let sink = cpu.sink().borrow();
        let sources: Vec<&str> = sink.entries().map(|e| e.source.as_str()).collect();
        assert_eq!(sources, vec!["cpu", "pia"]);
    }

    #[test]
    fn test_fault_levels() {
        let logger = Logger::detached("rom");
        logger.fault(Fault::ReadOnlyViolation, "write to offset 0x0010");
        logger.fault(Fault::MaskedValue, "0x1FF stored as 0xFF");

        let entries = logger.sink().borrow_mut().drain();
        assert_eq!(entries[0].level, LogLevel::Warn);
        assert_eq!(
            entries[0].message,
            "ReadOnlyViolation: write to offset 0x0010"
        );
        assert_eq!(entries[1].level, LogLevel::Info);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut sink = LogSink::new(2);
        sink.record(LogLevel::Info, "a", "1".into());
        sink.record(LogLevel::Info, "a", "2".into());
        sink.record(LogLevel::Info, "a", "3".into());

        let messages: Vec<String> = sink.drain().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["2", "3"]);
        assert!(sink.is_empty());
    }
}
