//! Panic hook
//!
//! 服务端通过 tracing 记录（带上当前请求的 span），CLI 只在终端打印一行。
//! 两种模式都会把完整报告追加到 crash.log。

use std::backtrace::Backtrace;
use std::fs::OpenOptions;
use std::io::Write;
use std::panic::{self, PanicHookInfo};

use chrono::Utc;
use colored::Colorize;

const CRASH_LOG: &str = "crash.log";

/// Running mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Server,
    Cli,
}

pub fn install_panic_hook(mode: RunMode) {
    panic::set_hook(Box::new(move |info| {
        let message = panic_message(info);
        let location = info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let backtrace = Backtrace::force_capture();

        let report = crash_report(&message, &location, &backtrace.to_string());
        let saved = append_crash_log(&report);

        match mode {
            // 当前请求的 span（request_id、path）会附在这条日志上
            RunMode::Server => {
                tracing::error!(
                    version = env!("CARGO_PKG_VERSION"),
                    %location,
                    "panic: {}",
                    message
                );
            }
            RunMode::Cli => {
                eprintln!("{} {} ({})", "panic:".red().bold(), message, location.dimmed());
            }
        }

        if let Err(e) = saved {
            eprintln!("Failed to write {}: {}", CRASH_LOG, e);
        }
    }));
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string())
}

fn crash_report(message: &str, location: &str, backtrace: &str) -> String {
    format!(
        "[{}] ekranu-crm {} panicked at {}: {}\n{}\n",
        Utc::now().to_rfc3339(),
        env!("CARGO_PKG_VERSION"),
        location,
        message,
        backtrace
    )
}

fn append_crash_log(report: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(CRASH_LOG)?;
    file.write_all(report.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crash_report_names_version_and_location() {
        let report = crash_report("boom", "src/main.rs:10", "frame 0");
        assert!(report.contains(env!("CARGO_PKG_VERSION")));
        assert!(report.contains("panicked at src/main.rs:10: boom"));
        assert!(report.ends_with("frame 0\n"));
    }
}
