pub mod input;
pub mod parse;
pub mod rules_file;
