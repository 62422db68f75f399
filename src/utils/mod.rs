pub mod fs;
pub mod prompt;
