//! Statistics reported by snapshot runs.

/// Outcome of reconciling one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableStats {
    /// Table name.
    pub table: String,
    /// Rows returned by the source.
    pub rows: usize,
    /// Files written (new or rewritten).
    pub written: usize,
    /// Files left alone because their content already matched.
    pub unchanged: usize,
    /// Stale files removed.
    pub deleted: usize,
}

impl TableStats {
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }
}

/// Outcome of a whole run, one entry per table in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub tables: Vec<TableStats>,
}

impl RunSummary {
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows).sum()
    }

    #[must_use]
    pub fn total_deleted(&self) -> usize {
        self.tables.iter().map(|t| t.deleted).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_summary_totals() {
        let mut summary = RunSummary::default();
        assert!(summary.is_empty());

        summary.tables.push(TableStats {
            rows: 5,
            deleted: 1,
            ..TableStats::new("users")
        });
        summary.tables.push(TableStats {
            rows: 3,
            deleted: 2,
            ..TableStats::new("roles")
        });

        assert_eq!(summary.total_rows(), 8);
        assert_eq!(summary.total_deleted(), 3);
        assert!(!summary.is_empty());
    }
}
