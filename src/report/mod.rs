pub mod formatters;
pub mod writer;

pub use formatters::OutputFormat;
