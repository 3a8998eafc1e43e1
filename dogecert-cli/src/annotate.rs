//! GitHub Actions workflow commands (`::error::`, `::warning::`).
//!
//! Only emitted when running inside an Actions runner; elsewhere tracing
//! output is the whole story.

fn in_actions() -> bool {
    std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

/// Escape a message so it survives as a single workflow command line.
pub fn escape_data(msg: &str) -> String {
    msg.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

pub fn error(msg: &str) {
    if in_actions() {
        println!("::error::{}", escape_data(msg));
    }
}

pub fn warning(msg: &str) {
    if in_actions() {
        println!("::warning::{}", escape_data(msg));
    }
}
