pub mod commands;
pub mod events;
pub mod leaderboard;
pub mod run;
pub mod store;
pub mod templates;
pub mod time;
