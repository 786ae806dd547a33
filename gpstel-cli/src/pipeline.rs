use std::io::Write;

use gpstel_core::{ExportStats, FileStitcher, SourceOpener};
use log::info;

use crate::{CliError, CliResult, ExportConfig};

/// Оркестрирует экспорт: файлы по порядку, первая ошибка останавливает
/// весь запуск.
pub struct ExportPipeline {
    config: ExportConfig,
}

impl ExportPipeline {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Запускает экспорт в `sink`. Буфер сбрасывается и при ошибке, так
    /// что уже записанные строки остаются в выводе.
    pub fn run<O, W>(
        &self,
        opener: &O,
        sink: W,
    ) -> CliResult<ExportStats>
    where
        O: SourceOpener + ?Sized,
        W: Write,
    {
        if self.config.inputs.is_empty() {
            return Err(CliError::NoInputs);
        }

        let mut stitcher = FileStitcher::new(sink, self.config.stitch_config());

        let outcome = self.config.inputs.iter().try_for_each(|path| {
            info!("Processing {:?}", path);
            stitcher
                .run_file(opener, path)
                .map(|_| ())
                .map_err(|source| CliError::File {
                    path: path.clone(),
                    source,
                })
        });

        let flushed = stitcher.finish();

        outcome?;
        let (_, stats) = flushed?;

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use std::{io::Write, path::PathBuf};

    use gpstel_core::{DumpOpener, KeyedRecord, PayloadWindow, TelemetryDump, TelemetryError};
    use tempfile::NamedTempFile;

    use super::*;

    fn dump_file(
        utc: &str,
        finish: f64,
    ) -> NamedTempFile {
        let mut dump = TelemetryDump::new(finish);
        dump.push_payload(
            PayloadWindow::new(0.0, finish),
            &[
                KeyedRecord::utc(utc),
                KeyedRecord::fix(3),
                KeyedRecord::precision(120),
                KeyedRecord::position_batch(&[[55.75, 37.61, 150.0, 0.5, 0.6]; 4]),
            ],
        );

        let mut tmp = NamedTempFile::new().unwrap();
        dump.to_writer(&mut tmp).unwrap();
        tmp.flush().unwrap();
        tmp
    }

    #[test]
    fn test_run_two_files() {
        let a = dump_file("240101000000.000", 2.0);
        let b = dump_file("240101000002.000", 2.0);

        let pipeline = ExportPipeline::new(ExportConfig::new(vec![
            a.path().to_path_buf(),
            b.path().to_path_buf(),
        ]));

        let mut out = Vec::new();
        let stats = pipeline.run(&DumpOpener, &mut out).unwrap();

        assert_eq!(stats.files, 2);
        assert_eq!(stats.rows, 8);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines[5].starts_with("2000.000000, 2024-01-01T00:00:02.000Z, 55.750000"));
        assert!(lines[8].starts_with("3500.000000, 2024-01-01T00:00:03.500Z"));
    }

    #[test]
    fn test_first_error_stops_run() {
        let a = dump_file("240101000000.000", 2.0);
        let c = dump_file("240101000004.000", 2.0);
        let missing = PathBuf::from("/nonexistent/GH020001.json");

        let pipeline = ExportPipeline::new(ExportConfig::new(vec![
            a.path().to_path_buf(),
            missing.clone(),
            c.path().to_path_buf(),
        ]));

        let mut out = Vec::new();
        let err = pipeline.run(&DumpOpener, &mut out).unwrap_err();

        match err {
            CliError::File { path, source } => {
                assert_eq!(path, missing);
                assert!(matches!(source, TelemetryError::NoMetadataTrack(_)));
            }
            other => panic!("unexpected error: {other}"),
        }

        // Строки первого файла сохранены, третий не обрабатывался
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 5);
        assert!(!text.contains("00:00:04"));
    }

    #[test]
    fn test_no_inputs() {
        let pipeline = ExportPipeline::new(ExportConfig::default());
        assert!(matches!(
            pipeline.run(&DumpOpener, Vec::new()),
            Err(CliError::NoInputs)
        ));
    }
}
