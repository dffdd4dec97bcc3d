use lazy_static::lazy_static;
use std::collections::VecDeque;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use crate::utils::logging::{LogEntry, LogLevel};

lazy_static! {
    static ref LOGGER: RwLock<Logger> = RwLock::new(Logger::new());
}

pub struct Logger {
    system_log: VecDeque<LogEntry>,
}

impl Logger {
    fn new() -> Self {
        let mut system_log = VecDeque::new();
        system_log.push_back(LogEntry::new(LogLevel::Information, "Logger online now", ""));
        Self {
            system_log,
        }
    }

    pub async fn instance() -> RwLockReadGuard<'static, Logger> {
        LOGGER.read().await
    }

    pub async fn instance_mut() -> RwLockWriteGuard<'static, Logger> {
        LOGGER.write().await
    }

    pub async fn add_system_log_entry(log_entry: LogEntry) {
        Self::logging_console(&log_entry);
        let mut logger = Self::instance_mut().await;
        logger.system_log.push_back(log_entry);
    }

    pub async fn get_system_logs() -> VecDeque<LogEntry> {
        Self::instance().await.system_log.clone()
    }

    pub fn format_logs(logs: &VecDeque<LogEntry>) -> String {
        logs.iter().map(LogEntry::to_string).collect::<Vec<_>>().join("\n")
    }

    pub fn logging_console(log_entry: &LogEntry) {
        println!("{}", log_entry.to_colored_string());
    }
}

#[macro_export]
macro_rules! logging_debug {
    ($message:expr) => {
        Logger::add_system_log_entry($crate::debug_entry!($message)).await
    };
    ($message:expr, $debug_info:expr) => {
        Logger::add_system_log_entry($crate::debug_entry!($message, $debug_info)).await
    };
}

#[macro_export]
macro_rules! logging_information {
    ($message:expr) => {
        Logger::add_system_log_entry($crate::information_entry!($message)).await
    };
    ($message:expr, $debug_info:expr) => {
        Logger::add_system_log_entry($crate::information_entry!($message, $debug_info)).await
    };
}

#[macro_export]
macro_rules! logging_notice {
    ($message:expr) => {
        Logger::add_system_log_entry($crate::notice_entry!($message)).await
    };
    ($message:expr, $debug_info:expr) => {
        Logger::add_system_log_entry($crate::notice_entry!($message, $debug_info)).await
    };
}

#[macro_export]
macro_rules! logging_warning {
    ($message:expr) => {
        Logger::add_system_log_entry($crate::warning_entry!($message)).await
    };
    ($message:expr, $debug_info:expr) => {
        Logger::add_system_log_entry($crate::warning_entry!($message, $debug_info)).await
    };
}

#[macro_export]
macro_rules! logging_error {
    ($message:expr) => {
        Logger::add_system_log_entry($crate::error_entry!($message)).await
    };
    ($message:expr, $debug_info:expr) => {
        Logger::add_system_log_entry($crate::error_entry!($message, $debug_info)).await
    };
}

#[macro_export]
macro_rules! logging_critical {
    ($message:expr) => {
        Logger::add_system_log_entry($crate::critical_entry!($message)).await
    };
    ($message:expr, $debug_info:expr) => {
        Logger::add_system_log_entry($crate::critical_entry!($message, $debug_info)).await
    };
}

#[macro_export]
macro_rules! logging_emergency {
    ($message:expr) => {
        Logger::add_system_log_entry($crate::emergency_entry!($message)).await
    };
    ($message:expr, $debug_info:expr) => {
        Logger::add_system_log_entry($crate::emergency_entry!($message, $debug_info)).await
    };
}

#[macro_export]
macro_rules! logging_entry {
    ($entry:expr) => {
        Logger::add_system_log_entry($entry).await
    };
}

#[macro_export]
macro_rules! logging_console {
    ($entry:expr) => {
        Logger::logging_console(&$entry)
    };
}
