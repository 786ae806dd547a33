use std::path::PathBuf;

use gpstel_core::StitchConfig;

/// Конфигурация запуска экспорта.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Входные файлы, в порядке сшивки
    pub inputs: Vec<PathBuf>,
    /// Строка заголовка перед первой строкой данных
    pub write_header: bool,
}

impl ExportConfig {
    pub fn new(inputs: Vec<PathBuf>) -> Self {
        Self {
            inputs,
            ..Self::default()
        }
    }

    pub fn stitch_config(&self) -> StitchConfig {
        StitchConfig {
            write_header: self.write_header,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            write_header: true,
        }
    }
}
