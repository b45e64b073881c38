//! Command implementations.

pub mod categories;
pub mod run;
pub mod schemas;

pub use self::categories::execute_categories;
pub use self::run::execute_run;
pub use self::schemas::execute_schemas;
