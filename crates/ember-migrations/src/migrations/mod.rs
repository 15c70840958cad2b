//! Concrete migrations, one module per version

mod m135;
mod m147;

pub use m135::Migration135;
pub use m147::Migration147;

use crate::migration::Migration;

/// Every built-in migration, in ascending version order
pub fn builtin() -> Vec<Box<dyn Migration>> {
    vec![Box::new(Migration135), Box::new(Migration147)]
}
