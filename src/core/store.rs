//! Append-only table of the feature rows built during this process

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::entities::product::Product;
use crate::entities::row::{columns, FeatureRow};

/// A stored row with the product it came from
#[derive(Debug, Clone, Serialize)]
pub struct StoredRow {
    pub product: Option<String>,
    pub brand: Option<String>,
    pub recorded_at: DateTime<Utc>,
    pub row: FeatureRow,
}

/// In-memory accumulation of feature rows, in build order
///
/// Rows live for the lifetime of the owning context; nothing is persisted.
#[derive(Debug, Default)]
pub struct AccumulationStore {
    entries: Vec<StoredRow>,
}

impl AccumulationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row built for `product`
    pub fn push(&mut self, product: &Product, row: FeatureRow) -> &StoredRow {
        self.entries.push(StoredRow {
            product: product.name.clone(),
            brand: product.brand.clone(),
            recorded_at: Utc::now(),
            row,
        });
        &self.entries[self.entries.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[StoredRow] {
        &self.entries
    }

    pub fn last(&self) -> Option<&StoredRow> {
        self.entries.last()
    }

    /// Feature rows in insertion order
    pub fn rows(&self) -> impl Iterator<Item = &FeatureRow> + '_ {
        self.entries.iter().map(|entry| &entry.row)
    }

    /// Write all rows as CSV with the schema header
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        self.write_delimited(writer, b',')
    }

    /// Write all rows with the given delimiter and the schema header
    pub fn write_delimited<W: Write>(&self, writer: W, delimiter: u8) -> Result<(), csv::Error> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);
        wtr.write_record(columns())?;
        for row in self.rows() {
            wtr.write_record(row.cells())?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::material::CanonicalMaterial;
    use crate::entities::product::Facts;

    fn product(name: &str) -> Product {
        Product::new(name, Facts::new()).with_brand("Acme")
    }

    #[test]
    fn test_push_preserves_order() {
        let mut store = AccumulationStore::new();
        assert!(store.is_empty());

        store.push(&product("first"), FeatureRow::new("Asia", 1.0));
        let stored = store.push(&product("second"), FeatureRow::new("Europe", 2.0));
        assert_eq!(stored.product.as_deref(), Some("second"));
        assert_eq!(stored.brand.as_deref(), Some("Acme"));

        assert_eq!(store.len(), 2);
        let uses: Vec<_> = store.rows().map(|r| r.use_location.as_str()).collect();
        assert_eq!(uses, vec!["Asia", "Europe"]);
        assert_eq!(store.last().unwrap().product.as_deref(), Some("second"));
        assert!(store.entries()[0].recorded_at <= store.entries()[1].recorded_at);
    }

    #[test]
    fn test_write_csv() {
        let mut store = AccumulationStore::new();
        let mut row = FeatureRow::new("Europe", 12.5);
        row.set_material(CanonicalMaterial::Cotton, 1.0);
        store.push(&product("tee"), row);

        let mut out = Vec::new();
        store.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("Cotton,Organic_cotton,"));
        assert!(header.ends_with("Other,Manufacturing_location,Use_location,Transportation_distance"));

        let data = lines.next().unwrap();
        assert!(data.starts_with("1,0,"));
        assert!(data.ends_with(",,Europe,12.5"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_write_tsv() {
        let mut store = AccumulationStore::new();
        store.push(&product("tee"), FeatureRow::new("Asia", 3.0));

        let mut out = Vec::new();
        store.write_delimited(&mut out, b'\t').unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().next().unwrap().starts_with("Cotton\tOrganic_cotton"));
        assert!(text.lines().nth(1).unwrap().ends_with("\t\tAsia\t3"));
    }
}
