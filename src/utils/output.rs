//! # 美化输出工具
//!
//! 统一的终端状态行。库层只返回警告，由命令层通过这里打印。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `colored` crate

use colored::Colorize;

/// 标题栏宽度
const HEADER_WIDTH: usize = 72;

/// 打印成功消息（也用于通过的检查项）
pub fn print_success(msg: &str) {
    println!("{} {}", "[o]".green().bold(), msg);
}

/// 打印错误消息
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印警告消息（也用于未通过的检查项）
pub fn print_warning(msg: &str) {
    println!("{} {}", "[x]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(HEADER_WIDTH);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}
