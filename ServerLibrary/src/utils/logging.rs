use chrono::{DateTime, Local};
use colored::*;
use std::fmt::Display;

pub use crate::utils::log_entry::detect::DetectEntry;
pub use crate::utils::logger::Logger;
pub use crate::utils::log_entry::io::IOEntry;
pub use crate::utils::log_entry::system::SystemEntry;
pub use crate::{debug_entry, information_entry, notice_entry, warning_entry, error_entry, critical_entry, emergency_entry};
pub use crate::{logging_debug, logging_information, logging_notice, logging_warning, logging_error, logging_critical, logging_emergency, logging_entry, logging_console};

#[derive(Copy, Clone)]
pub enum LogLevel {
    Debug,
    Information,
    Notice,
    Warning,
    Error,
    Critical,
    Emergency,
}

impl LogLevel {
    pub fn to_plain_string(&self) -> String {
        match self {
            LogLevel::Debug => "Debug      ".to_string(),
            LogLevel::Information => "Information".to_string(),
            LogLevel::Notice => "Notice     ".to_string(),
            LogLevel::Warning => "Warning    ".to_string(),
            LogLevel::Error => "Error      ".to_string(),
            LogLevel::Critical => "Critical   ".to_string(),
            LogLevel::Emergency => "Emergency  ".to_string(),
        }
    }

    pub fn to_colored_string(&self) -> ColoredString {
        match self {
            LogLevel::Debug => "Debug      ".to_string().bright_black(),
            LogLevel::Information => "Information".to_string().bright_blue(),
            LogLevel::Notice => "Notice     ".to_string().bright_green(),
            LogLevel::Warning => "Warning    ".to_string().yellow(),
            LogLevel::Error => "Error      ".to_string().bright_red(),
            LogLevel::Critical => "Critical   ".to_string().bright_yellow(),
            LogLevel::Emergency => "Emergency  ".to_string().magenta(),
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}

#[derive(Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub debug_info: String,
}

impl LogEntry {
    pub fn new<T: Into<String>, U: Into<String>>(level: LogLevel, message: T, debug_info: U) -> Self {
        Self {
            level,
            timestamp: Local::now(),
            message: message.into(),
            debug_info: debug_info.into(),
        }
    }

    pub fn to_plain_string(&self) -> String {
        let level = self.level.to_plain_string();
        let timestamp = self.timestamp.format("%Y/%m/%d %H:%M:%S").to_string();
        if self.debug_info.is_empty() {
            format!("[{}] {} {}", level, timestamp, self.message)
        } else {
            format!("[{}] {} {}\n{}", level, timestamp, self.message, self.debug_info)
        }
    }

    pub fn to_colored_string(&self) -> String {
        let level = self.level.to_colored_string();
        let timestamp = self.timestamp.format("%Y/%m/%d %H:%M:%S").to_string();
        if self.debug_info.is_empty() {
            format!("[{}] {} {}", level, timestamp, self.message.white())
        } else {
            format!("[{}] {} {}\n{}", level, timestamp, self.message.white(), self.debug_info.bright_black())
        }
    }
}

impl Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}

#[macro_export]
macro_rules! debug_entry {
    ($message:expr) => {
        LogEntry::new(LogLevel::Debug, $message, format!("{}:{}", file!(), line!()))
    };
    ($message:expr, $debug_info:expr) => {
        LogEntry::new(LogLevel::Debug, $message, format!("{}:{} {}", file!(), line!(), $debug_info))
    };
}

#[macro_export]
macro_rules! information_entry {
    ($message:expr) => {
        LogEntry::new(LogLevel::Information, $message, format!("{}:{}", file!(), line!()))
    };
    ($message:expr, $debug_info:expr) => {
        LogEntry::new(LogLevel::Information, $message, format!("{}:{} {}", file!(), line!(), $debug_info))
    };
}

#[macro_export]
macro_rules! notice_entry {
    ($message:expr) => {
        LogEntry::new(LogLevel::Notice, $message, format!("{}:{}", file!(), line!()))
    };
    ($message:expr, $debug_info:expr) => {
        LogEntry::new(LogLevel::Notice, $message, format!("{}:{} {}", file!(), line!(), $debug_info))
    };
}

#[macro_export]
macro_rules! warning_entry {
    ($message:expr) => {
        LogEntry::new(LogLevel::Warning, $message, format!("{}:{}", file!(), line!()))
    };
    ($message:expr, $debug_info:expr) => {
        LogEntry::new(LogLevel::Warning, $message, format!("{}:{} {}", file!(), line!(), $debug_info))
    };
}

#[macro_export]
macro_rules! error_entry {
    ($message:expr) => {
        LogEntry::new(LogLevel::Error, $message, format!("{}:{}", file!(), line!()))
    };
    ($message:expr, $debug_info:expr) => {
        LogEntry::new(LogLevel::Error, $message, format!("{}:{} {}", file!(), line!(), $debug_info))
    };
}

#[macro_export]
macro_rules! critical_entry {
    ($message:expr) => {
        LogEntry::new(LogLevel::Critical, $message, format!("{}:{}", file!(), line!()))
    };
    ($message:expr, $debug_info:expr) => {
        LogEntry::new(LogLevel::Critical, $message, format!("{}:{} {}", file!(), line!(), $debug_info))
    };
}

#[macro_export]
macro_rules! emergency_entry {
    ($message:expr) => {
        LogEntry::new(LogLevel::Emergency, $message, format!("{}:{}", file!(), line!()))
    };
    ($message:expr, $debug_info:expr) => {
        LogEntry::new(LogLevel::Emergency, $message, format!("{}:{} {}", file!(), line!(), $debug_info))
    };
}
