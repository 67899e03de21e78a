pub mod progress;
pub mod theme;
