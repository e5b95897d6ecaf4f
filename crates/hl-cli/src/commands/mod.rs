//! CLI subcommand implementations.

pub mod calendar;
pub mod edit;
pub mod holidays;
pub mod import;
pub mod ledger;
pub mod punch;
pub mod summary;
pub mod util;
