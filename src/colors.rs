// SPDX-License-Identifier: AGPL-3.0-or-later
//! ANSI colors for the operator-facing audit trail

pub const RESET: &str = "\x1b[0m";
pub const RED: &str = "\x1b[31m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";

/// `[info]` line announcing a side-effecting step
pub fn info(message: &str) {
    println!("{BLUE}[info] {message}{RESET}");
}

pub fn warning(message: &str) {
    println!("{RED}warning: {message}.{RESET}");
}

pub fn error(message: &str) {
    println!("{RED}error: {message}{RESET}");
}

/// Highlighted line without a prefix (menu headers, prompts)
pub fn notice(message: &str) {
    println!("{YELLOW}{message}{RESET}");
}
