//! Apache Parquet output format.

use arrow::array::{Float64Array, StringArray, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use spotwatt_types::PricePoint;
use std::io::Write;
use std::sync::Arc;

use crate::{ChartRow, FormatError, Formatter};

fn parquet_error(e: impl std::fmt::Display) -> FormatError {
    FormatError::Parquet(e.to_string())
}

/// Parquet formatter.
#[derive(Debug, Clone)]
pub struct ParquetFormatter {
    /// Compression codec.
    compression: Compression,
}

impl Default for ParquetFormatter {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
        }
    }
}

impl ParquetFormatter {
    /// Creates a new Parquet formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression codec.
    #[must_use]
    pub const fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    fn timestamp_field() -> Field {
        Field::new(
            "timestamp",
            DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
            false,
        )
    }

    /// Creates the Arrow schema for chart rows.
    fn row_schema() -> Schema {
        Schema::new(vec![
            Self::timestamp_field(),
            Field::new("date", DataType::Utf8, false),
            Field::new("time", DataType::Utf8, false),
            Field::new("cents_per_kwh", DataType::Float64, false),
            Field::new("eur_per_kwh", DataType::Float64, false),
            Field::new("compare_cents_per_kwh", DataType::Float64, true),
            Field::new("compare_eur_per_kwh", DataType::Float64, true),
            Field::new("delta_cents_per_kwh", DataType::Float64, true),
        ])
    }

    /// Creates the Arrow schema for raw points.
    fn point_schema() -> Schema {
        Schema::new(vec![
            Self::timestamp_field(),
            Field::new("cents_per_kwh", DataType::Float64, false),
        ])
    }

    fn rows_to_batch(rows: &[ChartRow]) -> Result<RecordBatch, FormatError> {
        let timestamps: Vec<_> = rows.iter().map(|r| r.timestamp.timestamp_micros()).collect();
        let dates: Vec<_> = rows.iter().map(|r| r.date.as_str()).collect();
        let times: Vec<_> = rows.iter().map(|r| r.display_time.as_str()).collect();
        let cents: Vec<_> = rows.iter().map(|r| r.cents).collect();
        let euros: Vec<_> = rows.iter().map(|r| r.euros).collect();
        let compare_cents: Vec<_> = rows.iter().map(|r| r.compare_cents).collect();
        let compare_euros: Vec<_> = rows.iter().map(|r| r.compare_euros).collect();
        let deltas: Vec<_> = rows.iter().map(|r| r.delta_cents).collect();

        RecordBatch::try_new(
            Arc::new(Self::row_schema()),
            vec![
                Arc::new(TimestampMicrosecondArray::from(timestamps).with_timezone("UTC")),
                Arc::new(StringArray::from(dates)),
                Arc::new(StringArray::from(times)),
                Arc::new(Float64Array::from(cents)),
                Arc::new(Float64Array::from(euros)),
                Arc::new(Float64Array::from(compare_cents)),
                Arc::new(Float64Array::from(compare_euros)),
                Arc::new(Float64Array::from(deltas)),
            ],
        )
        .map_err(parquet_error)
    }

    fn points_to_batch(points: &[PricePoint]) -> Result<RecordBatch, FormatError> {
        let timestamps: Vec<_> = points.iter().map(|p| p.timestamp.timestamp_micros()).collect();
        let values: Vec<_> = points.iter().map(|p| p.value).collect();

        RecordBatch::try_new(
            Arc::new(Self::point_schema()),
            vec![
                Arc::new(TimestampMicrosecondArray::from(timestamps).with_timezone("UTC")),
                Arc::new(Float64Array::from(values)),
            ],
        )
        .map_err(parquet_error)
    }

    /// Writes one batch as a single-row-group file.
    fn write_batch<W: Write + Send>(&self, batch: &RecordBatch, writer: W) -> Result<(), FormatError> {
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .build();

        let mut arrow_writer =
            ArrowWriter::try_new(writer, batch.schema(), Some(props)).map_err(parquet_error)?;
        arrow_writer.write(batch).map_err(parquet_error)?;
        arrow_writer.close().map_err(parquet_error)?;

        Ok(())
    }
}

impl Formatter for ParquetFormatter {
    fn write_rows<W: Write + Send>(&self, rows: &[ChartRow], writer: W) -> Result<(), FormatError> {
        self.write_batch(&Self::rows_to_batch(rows)?, writer)
    }

    fn write_points<W: Write + Send>(
        &self,
        points: &[PricePoint],
        writer: W,
    ) -> Result<(), FormatError> {
        self.write_batch(&Self::points_to_batch(points)?, writer)
    }

    fn extension(&self) -> &str {
        "parquet"
    }
}
