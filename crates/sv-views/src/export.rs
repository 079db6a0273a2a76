//! Arrow export of the published datasets

use std::sync::Arc;
use arrow::array::{ArrayRef, Float64Builder, StringBuilder, UInt64Builder};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use sv_core::{ChartViewDataset, MapViewDataset};

/// Conversion of a published dataset into a columnar batch
pub trait ToRecordBatch {
    fn schema() -> SchemaRef;

    fn to_record_batch(&self) -> Result<RecordBatch, ArrowError>;
}

impl ToRecordBatch for MapViewDataset {
    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("x", DataType::Float64, false),
            Field::new("y", DataType::Float64, false),
            Field::new("event_date_text", DataType::Utf8, false),
            Field::new("common_name", DataType::Utf8, false),
            Field::new("species", DataType::Utf8, true),
            Field::new("color_tag", DataType::Utf8, false),
            Field::new("detail_link", DataType::Utf8, false),
        ]))
    }

    fn to_record_batch(&self) -> Result<RecordBatch, ArrowError> {
        let len = self.rows.len();
        let mut x = Float64Builder::with_capacity(len);
        let mut y = Float64Builder::with_capacity(len);
        let mut event_date = StringBuilder::new();
        let mut common_name = StringBuilder::new();
        let mut species = StringBuilder::new();
        let mut color_tag = StringBuilder::new();
        let mut detail_link = StringBuilder::new();

        for row in &self.rows {
            x.append_value(row.x);
            y.append_value(row.y);
            event_date.append_value(&row.event_date_text);
            common_name.append_value(&row.common_name);
            species.append_option(row.species.as_deref());
            color_tag.append_value(&row.color_tag);
            detail_link.append_value(&row.detail_link);
        }

        let columns: Vec<ArrayRef> = vec![
            Arc::new(x.finish()),
            Arc::new(y.finish()),
            Arc::new(event_date.finish()),
            Arc::new(common_name.finish()),
            Arc::new(species.finish()),
            Arc::new(color_tag.finish()),
            Arc::new(detail_link.finish()),
        ];
        RecordBatch::try_new(Self::schema(), columns)
    }
}

impl ToRecordBatch for ChartViewDataset {
    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("year", DataType::Utf8, false),
            Field::new("count", DataType::UInt64, false),
        ]))
    }

    fn to_record_batch(&self) -> Result<RecordBatch, ArrowError> {
        let mut year = StringBuilder::new();
        let mut count = UInt64Builder::with_capacity(self.rows.len());
        for row in &self.rows {
            year.append_value(&row.year);
            count.append_value(row.count);
        }

        let columns: Vec<ArrayRef> = vec![Arc::new(year.finish()), Arc::new(count.finish())];
        RecordBatch::try_new(Self::schema(), columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, StringArray, UInt64Array};
    use sv_core::{ChartViewRow, MapViewRow};

    #[test]
    fn test_map_batch_columns() {
        let dataset = MapViewDataset {
            rows: vec![
                MapViewRow {
                    x: 1.5,
                    y: -2.5,
                    event_date_text: "1995-07-04".into(),
                    common_name: "killer whale".into(),
                    species: Some("Orcinus orca".into()),
                    color_tag: "red".into(),
                    detail_link: "Orcinus_orca".into(),
                },
                MapViewRow {
                    x: 3.0,
                    y: 4.0,
                    event_date_text: "1990-01-01".into(),
                    common_name: String::new(),
                    species: None,
                    color_tag: "blue".into(),
                    detail_link: "cetacea".into(),
                },
            ],
            center: None,
        };

        let batch = dataset.to_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 7);

        let species = batch.column_by_name("species").unwrap();
        assert_eq!(species.null_count(), 1);
        let links = batch
            .column_by_name("detail_link")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(links.value(1), "cetacea");
    }

    #[test]
    fn test_empty_map_batch_keeps_schema() {
        let batch = MapViewDataset::empty().to_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.schema(), MapViewDataset::schema());
    }

    #[test]
    fn test_chart_batch() {
        let dataset = ChartViewDataset {
            rows: vec![
                ChartViewRow { year: "1990".into(), count: 2 },
                ChartViewRow { year: "1991".into(), count: 7 },
            ],
        };
        let batch = dataset.to_record_batch().unwrap();
        let counts = batch.column(1).as_any().downcast_ref::<UInt64Array>().unwrap();
        assert_eq!(counts.values().to_vec(), vec![2, 7]);

        let printed = arrow::util::pretty::pretty_format_batches(&[batch]).unwrap().to_string();
        assert!(printed.contains("1991"));
    }
}
