pub mod builders;
pub mod strategies;
