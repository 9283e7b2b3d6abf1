//! Terminal interaction.

pub mod progress;
pub mod prompt;
pub mod report;
