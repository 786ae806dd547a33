use std::path::PathBuf;

use gpstel_types::TelemetryError;
use thiserror::Error;

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Ошибка обработки конкретного входного файла
    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: TelemetryError,
    },

    /// Ошибка вывода (stdout закрыт и т.п.)
    #[error("Output error: {0}")]
    Output(#[from] TelemetryError),

    /// Пустой список входных файлов
    #[error("No input files")]
    NoInputs,
}

impl CliError {
    /// Однострочная диагностика для stderr: неизвестный тип записи
    /// отличается от прочих повреждений.
    pub fn diagnostic(&self) -> String {
        match self {
            CliError::File { path, source } => match source {
                TelemetryError::NoMetadataTrack(_) => format!(
                    "{} is an invalid telemetry source or it has no GPS metadata ({source})",
                    path.display()
                ),
                e if e.is_unknown_type() => {
                    format!("Unknown metadata type within {}: {e}", path.display())
                }
                e => format!("Telemetry data has corruption in {}: {e}", path.display()),
            },
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use gpstel_types::FourCc;

    use super::*;

    #[test]
    fn test_diagnostic_distinguishes_unknown_type() {
        let unknown = CliError::File {
            path: PathBuf::from("GH010001.json"),
            source: TelemetryError::unsupported(FourCc::GPSP, 'f'),
        };
        assert!(unknown.diagnostic().starts_with("Unknown metadata type within GH010001.json"));

        let corrupt = CliError::File {
            path: PathBuf::from("GH010001.json"),
            source: TelemetryError::DegenerateWindow,
        };
        assert!(corrupt.diagnostic().starts_with("Telemetry data has corruption"));

        let missing = CliError::File {
            path: PathBuf::from("a.mp4"),
            source: TelemetryError::no_metadata_track("a.mp4: not found"),
        };
        assert!(missing.diagnostic().contains("has no GPS metadata"));
        assert!(!missing.diagnostic().contains('\n'));
    }
}
