//! Сшивка нескольких файлов в один поток строк.
//!
//! Метки `cts` в файле N+1 продолжаются от конца последнего payload файла N,
//! а не начинаются с нуля.

use std::{io::Write, path::Path};

use gpstel_types::{TelemetryError, TelemetryResult};
use log::{debug, info};

use crate::{ExportStats, MetadataSource, PayloadDriver, RowEmitter, SourceOpener};

/// Настройки сшивки.
#[derive(Debug, Clone)]
pub struct StitchConfig {
    /// Писать строку заголовка перед первой строкой данных
    pub write_header: bool,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self { write_header: true }
    }
}

/// Обрабатывает файлы по порядку, накапливая смещение времени.
pub struct FileStitcher<W: Write> {
    config: StitchConfig,
    emitter: RowEmitter<W>,
    driver: PayloadDriver,
    file_time_offset: f64,
    header_written: bool,
    stats: ExportStats,
}

impl<W: Write> FileStitcher<W> {
    pub fn new(
        sink: W,
        config: StitchConfig,
    ) -> Self {
        Self {
            config,
            emitter: RowEmitter::new(sink),
            driver: PayloadDriver::new(),
            file_time_offset: 0.0,
            header_written: false,
            stats: ExportStats::default(),
        }
    }

    /// Прогоняет все payload источника. Возвращает `finish` последнего
    /// payload файла (секунды от начала файла).
    ///
    /// Смещение для следующего файла не меняется: это делает вызывающий
    /// код через [`FileStitcher::add_file_time`].
    pub fn process_file(
        &mut self,
        source: &dyn MetadataSource,
    ) -> TelemetryResult<f64> {
        let duration = source.duration();

        // NaN тоже отвергается
        if !(duration > 0.0) {
            return Err(TelemetryError::empty_source(format!(
                "non-positive metadata duration {duration}"
            )));
        }

        let count = source.payload_count();
        if count == 0 {
            return Err(TelemetryError::empty_source("metadata track has no payloads"));
        }

        if self.config.write_header && !self.header_written {
            self.emitter.write_header()?;
            self.header_written = true;
        }

        self.emitter.set_file_time_offset(self.file_time_offset);

        let mut last_finish = 0.0;

        for index in 0..count {
            let payload = source.payload(index)?;
            debug!(
                "Payload {index}/{count}: [{:.3}, {:.3}]",
                payload.window.start, payload.window.finish
            );

            last_finish = self.driver.process_payload(
                payload.records,
                payload.window,
                &mut self.emitter,
                &mut self.stats,
            )?;
        }

        self.stats.files += 1;
        Ok(last_finish)
    }

    /// Сдвигает смещение следующих файлов на длительность завершённого.
    pub fn add_file_time(
        &mut self,
        last_finish: f64,
    ) {
        self.file_time_offset += last_finish;
    }

    /// Открывает файл, обрабатывает его и продвигает смещение.
    pub fn run_file<O: SourceOpener + ?Sized>(
        &mut self,
        opener: &O,
        path: &Path,
    ) -> TelemetryResult<f64> {
        let source = opener.open(path)?;
        let last_finish = self.process_file(source.as_ref())?;

        info!(
            "{:?}: {} payloads, ends at {:.3}s (offset {:.3}s)",
            path,
            source.payload_count(),
            last_finish,
            self.file_time_offset
        );

        self.add_file_time(last_finish);
        Ok(last_finish)
    }

    /// Накопленное смещение времени, секунды.
    pub fn file_time_offset(&self) -> f64 {
        self.file_time_offset
    }

    pub fn stats(&self) -> &ExportStats {
        &self.stats
    }

    pub fn flush(&mut self) -> TelemetryResult<()> {
        self.emitter.flush()
    }

    /// Сбрасывает буфер и возвращает приёмник вместе со статистикой.
    pub fn finish(mut self) -> TelemetryResult<(W, ExportStats)> {
        self.emitter.flush()?;
        Ok((self.emitter.into_inner(), self.stats))
    }
}

#[cfg(test)]
mod tests {
    use gpstel_types::{KeyedRecord, PayloadWindow};

    use super::*;
    use crate::TelemetryDump;

    fn file(
        windows: &[(f64, f64)],
        utc: &str,
    ) -> TelemetryDump {
        let mut dump = TelemetryDump::new(windows.last().map(|w| w.1).unwrap_or(0.0));
        for (i, &(start, finish)) in windows.iter().enumerate() {
            let mut records = vec![KeyedRecord::fix(3), KeyedRecord::precision(150)];
            if i == 0 {
                records.insert(0, KeyedRecord::utc(utc));
            }
            records.push(KeyedRecord::position_batch(&[[1.0; 5], [2.0; 5]]));
            dump.push_payload(PayloadWindow::new(start, finish), &records);
        }
        dump
    }

    fn cts(out: &[u8]) -> Vec<f64> {
        String::from_utf8_lossy(out)
            .lines()
            .skip(1)
            .map(|l| l.split(", ").next().unwrap().parse().unwrap())
            .collect()
    }

    #[test]
    fn test_offset_continues_across_files() {
        let a = file(&[(0.0, 5.0), (5.0, 10.0)], "210615123045.000");
        let b = file(&[(0.0, 2.0)], "210615123055.000");

        let mut stitcher = FileStitcher::new(Vec::new(), StitchConfig::default());
        let finish_a = stitcher.process_file(&a).unwrap();
        assert_eq!(finish_a, 10.0);
        stitcher.add_file_time(finish_a);
        stitcher.process_file(&b).unwrap();
        stitcher.add_file_time(2.0);

        assert_eq!(stitcher.file_time_offset(), 12.0);

        let (out, stats) = stitcher.finish().unwrap();
        assert_eq!(
            cts(&out),
            vec![0.0, 2500.0, 5000.0, 7500.0, 10_000.0, 11_000.0]
        );
        assert_eq!(stats.files, 2);
        assert_eq!(stats.payloads, 3);
        assert_eq!(stats.rows, 6);
    }

    #[test]
    fn test_header_written_once() {
        let a = file(&[(0.0, 1.0)], "210615123045.000");

        let mut stitcher = FileStitcher::new(Vec::new(), StitchConfig::default());
        stitcher.process_file(&a).unwrap();
        stitcher.process_file(&a).unwrap();

        let (out, _) = stitcher.finish().unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\"cts\",\"date\""));
        assert_eq!(text.matches("\"cts\"").count(), 1);
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn test_header_can_be_disabled() {
        let a = file(&[(0.0, 1.0)], "210615123045.000");

        let mut stitcher = FileStitcher::new(Vec::new(), StitchConfig { write_header: false });
        stitcher.process_file(&a).unwrap();

        let (out, _) = stitcher.finish().unwrap();
        assert!(!String::from_utf8(out).unwrap().contains("cts"));
    }

    #[test]
    fn test_non_positive_duration_rejected() {
        let mut dump = file(&[(0.0, 1.0)], "210615123045.000");
        dump.duration = 0.0;

        let mut stitcher = FileStitcher::new(Vec::new(), StitchConfig::default());
        assert!(matches!(
            stitcher.process_file(&dump),
            Err(TelemetryError::EmptyOrInvalidSource(_))
        ));

        dump.duration = f64::NAN;
        assert!(stitcher.process_file(&dump).is_err());

        // Ни заголовка, ни строк
        let (out, _) = stitcher.finish().unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_no_payloads_rejected() {
        let dump = TelemetryDump::new(3.0);

        let mut stitcher = FileStitcher::new(Vec::new(), StitchConfig::default());
        assert!(matches!(
            stitcher.process_file(&dump),
            Err(TelemetryError::EmptyOrInvalidSource(_))
        ));
    }
}
