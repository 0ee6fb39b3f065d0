//! Command implementations for the user directory CLI.

pub mod companies;
pub mod completions;
pub mod list;
pub mod show;

pub use companies::run_companies;
pub use completions::generate_completions;
pub use list::run_list;
pub use show::run_show;
