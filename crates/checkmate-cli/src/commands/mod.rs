//! Command implementations.

pub mod chat;
pub mod check;
pub mod list;
pub mod show;

pub use chat::run_chat;
pub use check::execute_check;
pub use list::execute_list;
pub use show::execute_show;
