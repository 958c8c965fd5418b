use std::time::Duration;

use autowriter_core::{LengthExit, LengthReport};
use owo_colors::OwoColorize;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!("\n{} {} {}", "Autowriter".bold().bright_blue(), "v".dimmed(), VERSION.dimmed());
    eprintln!("{}", "Generate, check and publish SEO articles\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print timing information with color coding
///
/// Stages are remote calls, so the thresholds are in seconds.
pub fn print_timing(label: &str, duration: Duration) {
    let secs = duration.as_secs_f64();
    let label = format!("{}:", label);

    if secs < 10.0 {
        eprintln!("  {} {:>8.2}s ({})", label.dimmed(), secs, "fast".dimmed());
    } else if secs < 30.0 {
        eprintln!("  {} {:>8.2}s ({})", label.dimmed(), secs, "moderate".bright_yellow());
    } else {
        eprintln!("  {} {:>8.2}s ({})", label.dimmed(), secs, "slow".bright_red());
    }
}

/// Print the outcome of strict length control
pub fn print_length_report(report: &LengthReport) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Length Control".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());
    eprintln!("  {} {}", "Visible length:".dimmed(), report.visible_length.to_string().bright_white());
    eprintln!("  {} {}", "Fill attempts:".dimmed(), report.attempts.to_string().bright_white());

    let exit = format!("{:?}", report.exit);
    match report.exit {
        LengthExit::Satisfied | LengthExit::Trimmed => eprintln!("  {} {}\n", "Result:".dimmed(), exit.bright_green()),
        _ => eprintln!("  {} {}\n", "Result:".dimmed(), exit.bright_yellow()),
    }
}

/// Print timing summary
pub fn print_timing_summary(total: Duration, timings: &[(String, Duration)]) {
    eprintln!("{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Timing Summary".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());

    for (label, duration) in timings {
        print_timing(label, *duration);
    }

    eprintln!("  {} {:>8.2}s\n", format!("{}:", "Total").bold().dimmed(), total.as_secs_f64());
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
