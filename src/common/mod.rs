pub mod args;
pub mod color;
pub mod error;
pub mod settings;
pub mod types;
pub mod util;
