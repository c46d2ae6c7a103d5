pub mod dispatch_rules;

pub use dispatch_rules::DispatchRules;
