pub mod ops;

mod app;
pub mod change;
pub mod commands;
pub mod config;
pub mod query;
pub mod resolve;
pub mod ssh_config;

// Re-export App from its module
pub use app::App;
pub use app::DEFAULT_BRANCH;

// Disable colors for all tests to get clean output
#[cfg(test)]
#[ctor::ctor]
fn init_tests() {
    colored::control::set_override(false);
}
