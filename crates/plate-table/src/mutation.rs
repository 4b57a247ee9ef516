use crate::grid::{Cell, Grid};

impl Grid {
    /// Inserts a blank column before the 1-based `index`, or appends it when
    /// `index` is `None` or outside `1..=column_count`. New cells get a copy
    /// of the table style. Returns the 1-based index of the new column.
    pub fn insert_column(&mut self, index: Option<usize>) -> usize {
        let at = match index {
            Some(ix) if (1..=self.columns).contains(&ix) => ix - 1,
            _ => self.columns,
        };

        for row in &mut self.rows {
            row.insert(at, Cell::default());
        }
        for row in &mut self.styles {
            row.insert(at, self.table_style.clone());
        }
        self.columns += 1;

        // Columns inserted into the heading row inherit its mark.
        self.mark_headings();

        tracing::debug!(
            column = at + 1,
            rows = self.rows.len(),
            columns = self.columns,
            "inserted column"
        );
        at + 1
    }

    /// Inserts a blank row before the 1-based `index`, or appends it when
    /// `index` is `None` or outside `1..=row_count`. Returns the 1-based index
    /// of the new row.
    pub fn insert_row(&mut self, index: Option<usize>) -> usize {
        // Captured before the row exists so the new row is never measured
        // against itself.
        let columns = self.columns;
        let at = match index {
            Some(ix) if (1..=self.rows.len()).contains(&ix) => ix - 1,
            _ => self.rows.len(),
        };

        self.strip_headings();
        self.rows.insert(at, vec![Cell::default(); columns]);
        self.styles
            .insert(at, vec![self.table_style.clone(); columns]);
        self.mark_headings();

        tracing::debug!(
            row = at + 1,
            rows = self.rows.len(),
            columns,
            "inserted row"
        );
        at + 1
    }

    /// Removes the 1-based column `index` from every row.
    ///
    /// Returns `false` without touching anything when the index does not
    /// resolve to a cell or when it is the only column left.
    pub fn delete_column(&mut self, index: usize) -> bool {
        if index == 0 || index > self.columns {
            tracing::debug!(index, columns = self.columns, "delete_column: no such column");
            return false;
        }
        if self.columns <= 1 {
            tracing::debug!("delete_column: refusing to remove the last column");
            return false;
        }
        if self.rows.iter().any(|row| row.len() < index) {
            tracing::warn!(index, "delete_column: ragged grid, aborting");
            return false;
        }

        for row in &mut self.rows {
            row.remove(index - 1);
        }
        for row in &mut self.styles {
            if index - 1 < row.len() {
                row.remove(index - 1);
            }
        }
        self.columns -= 1;

        tracing::debug!(
            column = index,
            rows = self.rows.len(),
            columns = self.columns,
            "deleted column"
        );
        true
    }

    /// Removes the 1-based row `index`. Returns `false` when there is no such
    /// row or it is the only row left.
    pub fn delete_row(&mut self, index: usize) -> bool {
        if index == 0 || index > self.rows.len() {
            tracing::debug!(index, rows = self.rows.len(), "delete_row: no such row");
            return false;
        }
        if self.rows.len() <= 1 {
            tracing::debug!("delete_row: refusing to remove the last row");
            return false;
        }

        self.strip_headings();
        self.rows.remove(index - 1);
        self.styles.remove(index - 1);
        self.mark_headings();

        tracing::debug!(
            row = index,
            rows = self.rows.len(),
            columns = self.columns,
            "deleted row"
        );
        true
    }
}
