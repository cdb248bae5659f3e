pub mod client;
pub mod config;
pub mod reveal;
pub mod state;
pub mod theme;
pub mod transcript;

// Re-export main types for convenience
pub use client::StatsClient;
pub use config::{Config, ThemeStore};
pub use reveal::{Reveal, RevealStep};
pub use state::{ChatMessage, ChatRole};
pub use theme::Theme;
pub use transcript::{LineView, MessageView, Transcript};

/// Shown as the first, permanent entry of every conversation
pub const WELCOME_MESSAGE: &str = "Hi! I can compare Lionel Messi and Cristiano Ronaldo: goals, assists, trophies, awards and more. What would you like to know?";

pub const ASK_FAILED_MESSAGE: &str = "Sorry, I encountered an error while processing your question.";
pub const REFRESH_STARTED_MESSAGE: &str = "Refreshing player statistics and data...";
pub const REFRESH_DONE_MESSAGE: &str = "Statistics database updated successfully with the latest player data!";
pub const REFRESH_FAILED_MESSAGE: &str = "Unable to refresh data. Please try again later.";
