//! Synonym-table cleaners for controlled template fields.

use std::sync::Arc;

use harmonize_common::is_blank;
use harmonize_model::{Resolution, SynonymTable, Unresolved};

/// Maps raw cell values onto a table's canonical labels.
///
/// Anything the table does not list is unresolved; cleaners never pass raw
/// text through.
#[derive(Debug, Clone)]
pub struct Cleaner {
    table: Arc<SynonymTable>,
}

impl Cleaner {
    pub fn new(table: SynonymTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    pub fn clean(&self, value: &str) -> Resolution<String> {
        if is_blank(value) {
            return Err(Unresolved);
        }
        self.table.lookup(value).map(str::to_string)
    }

    pub fn table(&self) -> &SynonymTable {
        &self.table
    }
}

impl From<&SynonymTable> for Cleaner {
    fn from(table: &SynonymTable) -> Self {
        Self::new(table.clone())
    }
}
