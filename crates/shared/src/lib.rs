/// Output of messages and diagnostics from dsktcc operations
pub mod output;
