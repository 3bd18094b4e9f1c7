pub mod rule;

pub use rule::RuleCommands;
