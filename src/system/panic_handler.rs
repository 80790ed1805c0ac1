//! Panic hook
//!
//! 服务器模式打印彩色详情，CLI 模式只打印一行。两种模式都把报告追加到
//! `shrt-crash.log`。

use std::fs::OpenOptions;
use std::io::Write;
use std::panic;

use chrono::Utc;

const CRASH_LOG: &str = "shrt-crash.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Server,
    Cli,
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

pub fn install_panic_hook(mode: RunMode) {
    panic::set_hook(Box::new(move |info| {
        let message = panic_message(info.payload());
        let location = info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_else(|| "unknown location".to_string());
        let backtrace = std::backtrace::Backtrace::force_capture();

        tracing::error!("panic at {}: {}", location, message);

        if let Err(e) = write_crash_log(&message, &location, &backtrace) {
            eprintln!("Failed to write {}: {}", CRASH_LOG, e);
        }

        match mode {
            RunMode::Server => print_server_panic(&message, &location),
            RunMode::Cli => eprintln!("shrt crashed: {} (see {})", message, CRASH_LOG),
        }
    }));
}

fn print_server_panic(message: &str, location: &str) {
    use colored::Colorize;

    eprintln!();
    eprintln!("{}", "PANIC".red().bold());
    eprintln!("{} {}", "Reason:".yellow().bold(), message);
    eprintln!("{} {}", "Location:".yellow().bold(), location);
    eprintln!("{}", format!("Backtrace saved to {}", CRASH_LOG).cyan());
    eprintln!();
}

fn write_crash_log(
    message: &str,
    location: &str,
    backtrace: &std::backtrace::Backtrace,
) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(CRASH_LOG)?;

    writeln!(file, "=== crash {} ===", Utc::now().to_rfc3339())?;
    writeln!(file, "message: {}", message)?;
    writeln!(file, "location: {}", location)?;
    writeln!(file, "{:?}", backtrace)?;
    writeln!(file)?;
    Ok(())
}
