use tabled::{settings::Style, Table, Tabled};

use crate::schema::TableSchema;

#[derive(Tabled)]
pub struct ColumnRow {
    #[tabled(rename = "#")]
    pub position: usize,
    #[tabled(rename = "Column")]
    pub name: String,
    #[tabled(rename = "Type")]
    pub column_type: String,
    #[tabled(rename = "Sample")]
    pub sample: String,
}

#[derive(Default)]
pub struct TableBuilder {
    rows: Vec<ColumnRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, name: &str, column_type: &str, sample: &str) {
        self.rows.push(ColumnRow {
            position: self.rows.len() + 1,
            name: name.to_string(),
            column_type: column_type.to_string(),
            sample: sample.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

/// Render an inferred schema next to the sample values it was inferred from
pub fn schema_table(schema: &TableSchema, samples: &[String]) -> String {
    let mut builder = TableBuilder::new();
    for (column, sample) in schema.columns.iter().zip(samples) {
        builder.add_row(&column.name, column.column_type.as_str(), sample);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    #[test]
    fn test_schema_table_lists_columns() {
        let record = Record::from_text(1, ["name", "age"], ["Alice", "30"]).unwrap();
        let schema = TableSchema::infer("people", &record);
        let rendered = schema_table(&schema, &["Alice".to_string(), "30".to_string()]);
        assert!(rendered.contains("INTEGER"));
        assert!(rendered.contains("Alice"));
        assert!(TableBuilder::new().build().is_empty());
    }
}
