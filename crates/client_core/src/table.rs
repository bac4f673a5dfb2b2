use crate::schema::EntitySchema;

/// Rows from the most recent list or search response, in server order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTable {
    pub columns: &'static [&'static str],
    pub rows: Vec<Vec<String>>,
}

impl ResultTable {
    pub fn from_entities<S: EntitySchema>(entities: &[S::Entity]) -> Self {
        Self {
            columns: S::COLUMNS,
            rows: entities.iter().map(S::table_row).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Plain-text rendering: header line, separator, one line per row.
    pub fn render_text(&self) -> String {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.len()).collect();
        for row in &self.rows {
            for (idx, cell) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(idx) {
                    *width = (*width).max(cell.chars().count());
                }
            }
        }

        let line = |cells: Vec<&str>| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };

        let mut out = line(self.columns.to_vec());
        out.push('\n');
        out.push_str(
            &widths
                .iter()
                .map(|width| "-".repeat(*width))
                .collect::<Vec<_>>()
                .join("-+-"),
        );
        for row in &self.rows {
            out.push('\n');
            out.push_str(&line(row.iter().map(String::as_str).collect()));
        }
        out
    }
}
