pub mod error;
pub mod fetch;
pub mod loader;
pub mod lyrics;
pub mod messages;
pub mod paths;
pub mod player;
pub mod playlist;
pub mod tui;
