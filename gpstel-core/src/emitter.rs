use std::{fmt, io::Write};

use gpstel_types::{GpsFix, PositionSample, Precision, TelemetryResult};

use crate::SampleStore;

/// Имена колонок выходного CSV, в порядке вывода.
pub const COLUMN_NAMES: [&str; 9] = [
    "cts",
    "date",
    "GPS (Lat.) [deg]",
    "GPS (Long.) [deg]",
    "GPS (Alt.) [m]",
    "GPS (2D speed) [m/s]",
    "GPS (3D speed) [m/s]",
    "fix",
    "precision",
];

/// Строка заголовка: имена в кавычках через запятую без пробела.
pub fn header_line() -> String {
    COLUMN_NAMES
        .iter()
        .map(|name| format!("\"{name}\""))
        .collect::<Vec<_>>()
        .join(",")
}

/// Одна строка вывода.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    /// Миллисекунды от начала первого файла
    pub timestamp_millis: f64,
    /// `YYYY-MM-DDTHH:MM:SS.mmmZ`
    pub iso_timestamp: String,
    pub sample: PositionSample,
    pub fix: GpsFix,
    pub precision: Precision,
}

impl OutputRow {
    /// Собирает строку из смещения внутри файла и текущего состояния
    /// хранилища.
    pub fn new(
        file_time_offset: f64,
        offset: f64,
        sample: &PositionSample,
        store: &SampleStore,
    ) -> Self {
        OutputRow {
            timestamp_millis: (file_time_offset + offset) * 1000.0,
            iso_timestamp: store.current_time_anchor().to_iso8601(),
            sample: *sample,
            fix: store.current_fix(),
            precision: store.current_precision(),
        }
    }
}

impl fmt::Display for OutputRow {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{:.6}, {}, ", self.timestamp_millis, self.iso_timestamp)?;
        for value in self.sample.fields() {
            write!(f, "{value:.6}, ")?;
        }
        write!(f, "{}, {}", self.fix.0, self.precision.0)
    }
}

/// Пишет строки CSV в приёмник.
pub struct RowEmitter<W: Write> {
    sink: W,
    file_time_offset: f64,
    rows: u64,
}

impl<W: Write> RowEmitter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            file_time_offset: 0.0,
            rows: 0,
        }
    }

    /// Накопленная длительность предыдущих файлов, секунды.
    pub fn set_file_time_offset(
        &mut self,
        offset: f64,
    ) {
        self.file_time_offset = offset;
    }

    pub fn file_time_offset(&self) -> f64 {
        self.file_time_offset
    }

    pub fn write_header(&mut self) -> TelemetryResult<()> {
        writeln!(self.sink, "{}", header_line())?;
        Ok(())
    }

    /// Пишет одну строку для выборки со смещением `offset` внутри файла.
    pub fn emit(
        &mut self,
        offset: f64,
        sample: &PositionSample,
        store: &SampleStore,
    ) -> TelemetryResult<()> {
        let row = OutputRow::new(self.file_time_offset, offset, sample, store);
        writeln!(self.sink, "{row}")?;
        self.rows += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> TelemetryResult<()> {
        self.sink.flush()?;
        Ok(())
    }

    /// Количество записанных строк данных.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}
