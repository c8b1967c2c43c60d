pub mod constants;
pub(crate) mod defaults;
pub mod models;
pub mod utils;

pub use models::*;
pub use utils::*;

pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commit the binary was built from, set by the release build.
const GIT_SHA: Option<&str> = option_env!("GIT_SHA");

/// Sent as the `User-Agent` header on every backend request.
pub fn user_agent() -> String {
    format!("{}/{}", APP_NAME, VERSION)
}

pub fn version() -> String {
    match GIT_SHA {
        Some(sha) => format!("{} version: {} ({})", APP_NAME, VERSION, sha),
        None => format!("{} version: {}", APP_NAME, VERSION),
    }
}

/// Print startup progress to stderr when `general.verbose` is set.
#[macro_export]
macro_rules! verbose {
    ($($arg:tt)*) => {
        if $crate::config::Configuration::instance().general.verbose {
            eprintln!($($arg)*);
        }
    };
}

pub use verbose;
