//! # 美化输出工具
//!
//! 提供统一的终端输出样式，以及批处理结束时的摘要。
//!
//! ## 依赖关系
//! - 被所有 `commands/` 模块使用
//! - 使用 `colored`、`tabled` crate

use crate::models::BatchReport;

use colored::Colorize;
use tabled::{Table, Tabled};

/// 打印错误消息
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印完成消息
pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// 打印转换成功消息
pub fn print_conversion(from: &str, to: &str) {
    println!(
        "{} {} {} {}",
        "[OK]".green().bold(),
        from.dimmed(),
        "->".cyan(),
        to
    );
}

/// 打印进度行（非终端环境下代替进度条）
pub fn print_progress(completed: usize, total: usize, from: &str, to: &str) {
    println!(
        "{} {} {} {}",
        format!("[{}/{}]", completed, total).blue().bold(),
        from.dimmed(),
        "->".cyan(),
        to
    );
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}

/// 打印分隔线
pub fn print_separator() {
    println!("{}", "─".repeat(60).dimmed());
}

#[derive(Tabled)]
struct FailureRow {
    #[tabled(rename = "Input")]
    input: String,
    #[tabled(rename = "Output")]
    output: String,
    #[tabled(rename = "Cause")]
    cause: String,
}

/// 打印批处理摘要，列出全部失败项
pub fn print_report(report: &BatchReport) {
    print_separator();

    let summary = format!(
        "Batch complete: {} attempted, {} succeeded, {} failed, {} cancelled ({:.2}s)",
        report.attempted,
        report.succeeded,
        report.failed,
        report.cancelled,
        report.elapsed.as_secs_f64()
    );
    if report.failed == 0 && report.cancelled == 0 {
        print_done(&summary);
    } else {
        print_warning(&summary);
    }

    if !report.failures.is_empty() {
        eprintln!("{}", Table::new(failure_rows(report)));
    }
}

fn failure_rows(report: &BatchReport) -> Vec<FailureRow> {
    report
        .failures
        .iter()
        .map(|f| FailureRow {
            input: f.input.display().to_string(),
            output: f.output.display().to_string(),
            cause: f.cause.to_string(),
        })
        .collect()
}
