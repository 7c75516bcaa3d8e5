pub mod error;
pub mod options;
pub mod pipeline;
pub mod plugin;
pub mod prompt;
pub mod text;
