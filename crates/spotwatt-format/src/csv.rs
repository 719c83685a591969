//! CSV output format.

use spotwatt_types::PricePoint;
use std::io::Write;

use crate::{ChartRow, FormatError, Formatter};

/// Field delimiter.
const DELIMITER: char = ',';

/// CSV formatter, comma separated with a header row.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFormatter;

impl CsvFormatter {
    /// Creates a new CSV formatter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl Formatter for CsvFormatter {
    fn write_rows<W: Write + Send>(
        &self,
        rows: &[ChartRow],
        mut writer: W,
    ) -> Result<(), FormatError> {
        let d = DELIMITER;

        writeln!(
            writer,
            "timestamp{d}date{d}time{d}cents_per_kwh{d}eur_per_kwh{d}compare_cents_per_kwh{d}compare_eur_per_kwh{d}delta_cents_per_kwh"
        )?;

        for row in rows {
            writeln!(
                writer,
                "{}{d}{}{d}{}{d}{}{d}{}{d}{}{d}{}{d}{}",
                row.timestamp.format("%Y-%m-%dT%H:%M:%SZ"),
                row.date,
                row.display_time,
                row.cents,
                row.euros,
                optional(row.compare_cents),
                optional(row.compare_euros),
                optional(row.delta_cents),
            )?;
        }

        Ok(())
    }

    fn write_points<W: Write + Send>(
        &self,
        points: &[PricePoint],
        mut writer: W,
    ) -> Result<(), FormatError> {
        let d = DELIMITER;

        writeln!(writer, "timestamp{d}cents_per_kwh")?;

        for point in points {
            writeln!(
                writer,
                "{}{d}{}",
                point.timestamp.format("%Y-%m-%dT%H:%M:%SZ"),
                point.value
            )?;
        }

        Ok(())
    }

    fn extension(&self) -> &str {
        "csv"
    }
}
