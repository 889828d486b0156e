//! In-memory table produced by the sheet reader

use chrono::NaiveDateTime;

/// A single cell read from the sheet
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Blank cell (or an Excel error value)
    Empty,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Render the value as text, the way a mixed-type column stores it
    pub fn to_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Int(i) => Some(i.to_string()),
            CellValue::Float(f) => Some(f.to_string()),
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Text(s) => Some(s.clone()),
            CellValue::DateTime(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

/// SQL column type inferred from the cells of one column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    Text,
    Timestamp,
}

impl ColumnType {
    /// Infer the narrowest type that holds every non-empty cell
    ///
    /// Whole-number floats count as integers, ints mixed with floats widen to
    /// float, and any other mix falls back to text. A column with no values at
    /// all is text.
    pub fn infer<'a>(cells: impl IntoIterator<Item = &'a CellValue>) -> Self {
        let mut current: Option<ColumnType> = None;

        for cell in cells {
            let cell_type = match cell {
                CellValue::Empty => continue,
                CellValue::Int(_) => ColumnType::Integer,
                CellValue::Float(f) if is_whole(*f) => ColumnType::Integer,
                CellValue::Float(_) => ColumnType::Float,
                CellValue::Bool(_) => ColumnType::Boolean,
                CellValue::Text(_) => ColumnType::Text,
                CellValue::DateTime(_) => ColumnType::Timestamp,
            };

            current = Some(match (current, cell_type) {
                (None, t) => t,
                (Some(a), b) if a == b => a,
                (Some(ColumnType::Integer), ColumnType::Float)
                | (Some(ColumnType::Float), ColumnType::Integer) => ColumnType::Float,
                _ => return ColumnType::Text,
            });
        }

        current.unwrap_or(ColumnType::Text)
    }

    /// Coerce a cell into this column's type
    pub fn coerce(self, cell: &CellValue) -> SqlValue {
        match self {
            ColumnType::Integer => SqlValue::Integer(match cell {
                CellValue::Int(i) => Some(*i),
                CellValue::Float(f) if is_whole(*f) => Some(*f as i64),
                _ => None,
            }),
            ColumnType::Float => SqlValue::Float(match cell {
                CellValue::Int(i) => Some(*i as f64),
                CellValue::Float(f) => Some(*f),
                _ => None,
            }),
            ColumnType::Boolean => SqlValue::Boolean(match cell {
                CellValue::Bool(b) => Some(*b),
                _ => None,
            }),
            ColumnType::Timestamp => SqlValue::Timestamp(match cell {
                CellValue::DateTime(dt) => Some(*dt),
                _ => None,
            }),
            ColumnType::Text => SqlValue::Text(cell.to_text()),
        }
    }
}

fn is_whole(f: f64) -> bool {
    f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64
}

/// A cell coerced to its column type; nulls keep the type so they bind cleanly
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Integer(Option<i64>),
    Float(Option<f64>),
    Boolean(Option<bool>),
    Text(Option<String>),
    Timestamp(Option<NaiveDateTime>),
}

/// One data row: the index value plus one cell per data column
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub index: CellValue,
    pub cells: Vec<CellValue>,
}

/// A typed column of the destination table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
}

/// Sheet contents keyed by the index column
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTable {
    /// Name of the column used as the row index
    pub index_column: String,
    /// Remaining column names, in sheet order
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl SourceTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Destination columns: the index first, then the data columns
    pub fn column_defs(&self) -> Vec<ColumnDef> {
        let mut defs = Vec::with_capacity(self.columns.len() + 1);
        defs.push(ColumnDef {
            name: self.index_column.clone(),
            column_type: ColumnType::infer(self.rows.iter().map(|r| &r.index)),
        });

        for (i, name) in self.columns.iter().enumerate() {
            defs.push(ColumnDef {
                name: name.clone(),
                column_type: ColumnType::infer(self.rows.iter().filter_map(|r| r.cells.get(i))),
            });
        }

        defs
    }

    /// Rows coerced to the given column definitions, index first
    pub fn sql_rows(&self, defs: &[ColumnDef]) -> Vec<Vec<SqlValue>> {
        self.rows
            .iter()
            .map(|row| {
                std::iter::once(&row.index)
                    .chain(row.cells.iter())
                    .zip(defs)
                    .map(|(cell, def)| def.column_type.coerce(cell))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SourceTable {
        SourceTable {
            index_column: "id".to_string(),
            columns: vec!["name".to_string(), "score".to_string()],
            rows: vec![
                Row {
                    index: CellValue::Float(1.0),
                    cells: vec![CellValue::Text("a".into()), CellValue::Int(3)],
                },
                Row {
                    index: CellValue::Float(2.0),
                    cells: vec![CellValue::Text("b".into()), CellValue::Float(4.5)],
                },
                Row {
                    index: CellValue::Float(3.0),
                    cells: vec![CellValue::Empty, CellValue::Empty],
                },
            ],
        }
    }

    #[test]
    fn test_infer_types() {
        assert_eq!(
            ColumnType::infer(&[CellValue::Float(1.0), CellValue::Int(2)]),
            ColumnType::Integer
        );
        assert_eq!(
            ColumnType::infer(&[CellValue::Int(1), CellValue::Float(2.5)]),
            ColumnType::Float
        );
        assert_eq!(
            ColumnType::infer(&[CellValue::Bool(true), CellValue::Empty]),
            ColumnType::Boolean
        );
        assert_eq!(
            ColumnType::infer(&[CellValue::Int(1), CellValue::Text("x".into())]),
            ColumnType::Text
        );
        assert_eq!(ColumnType::infer(&[CellValue::Empty]), ColumnType::Text);
    }

    #[test]
    fn test_column_defs_put_index_first() {
        let defs = table().column_defs();
        let names: Vec<_> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "score"]);
        assert_eq!(defs[0].column_type, ColumnType::Integer);
        assert_eq!(defs[1].column_type, ColumnType::Text);
        assert_eq!(defs[2].column_type, ColumnType::Float);
    }

    #[test]
    fn test_sql_rows_keep_typed_nulls() {
        let t = table();
        let rows = t.sql_rows(&t.column_defs());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], SqlValue::Integer(Some(1)));
        assert_eq!(rows[1][2], SqlValue::Float(Some(4.5)));
        assert_eq!(rows[2][1], SqlValue::Text(None));
        assert_eq!(rows[2][2], SqlValue::Float(None));
    }

    #[test]
    fn test_mixed_column_renders_text() {
        let ty = ColumnType::infer(&[CellValue::Int(7), CellValue::Bool(false)]);
        assert_eq!(ty.coerce(&CellValue::Int(7)), SqlValue::Text(Some("7".into())));
        assert_eq!(
            ty.coerce(&CellValue::Bool(false)),
            SqlValue::Text(Some("false".into()))
        );
    }
}
