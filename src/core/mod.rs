//! Pure state and rules. Nothing in here touches the terminal.

pub mod chat;
pub mod fs;
pub mod shell;
pub mod snake;
pub mod wm;
