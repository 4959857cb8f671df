pub mod digest;
pub mod prompt;
