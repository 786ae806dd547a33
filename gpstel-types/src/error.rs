use thiserror::Error;

use crate::FourCc;

/// Результат для операций реконструкции телеметрии.
pub type TelemetryResult<T> = std::result::Result<T, TelemetryError>;

/// Типы ошибок конвейера телеметрии.
///
/// Любая из них фатальна для всего запуска: восстановления на уровне файла
/// или payload нет.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Файл не читается или в нём нет трека метаданных
    #[error("No metadata track: {0}")]
    NoMetadataTrack(String),

    /// Нулевая/отрицательная длительность или ни одного payload
    #[error("Empty or invalid source: {0}")]
    EmptyOrInvalidSource(String),

    /// Строка GPSU не соответствует формату `YYMMDDHHMMSS.mmm`
    #[error("Malformed timestamp: {0}")]
    MalformedTimestamp(String),

    /// Запись с временной привязкой не содержит ни одной выборки
    #[error("Degenerate payload window: zero samples in a time-bearing record")]
    DegenerateWindow,

    /// Тип значения записи не поддерживается для данного ключа
    #[error("Unsupported record type '{value_type}' for key {key}")]
    UnsupportedRecordType { key: FourCc, value_type: char },

    /// Прочие повреждения потока метаданных
    #[error("Stream corruption: {0}")]
    StreamCorruption(String),

    /// Ошибки ввода/вывода (автоконвертируются из std::io::Error)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TelemetryError {
    /// Удобные конструкторы
    pub fn no_metadata_track<S: Into<String>>(s: S) -> Self {
        Self::NoMetadataTrack(s.into())
    }

    pub fn empty_source<S: Into<String>>(s: S) -> Self {
        Self::EmptyOrInvalidSource(s.into())
    }

    pub fn malformed_timestamp<S: Into<String>>(s: S) -> Self {
        Self::MalformedTimestamp(s.into())
    }

    pub fn corrupted<S: Into<String>>(s: S) -> Self {
        Self::StreamCorruption(s.into())
    }

    pub fn unsupported(
        key: FourCc,
        value_type: char,
    ) -> Self {
        Self::UnsupportedRecordType { key, value_type }
    }

    /// `true` для ошибок "неизвестный тип", остальные считаются повреждением.
    pub fn is_unknown_type(&self) -> bool {
        matches!(self, Self::UnsupportedRecordType { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_type_classification() {
        let e = TelemetryError::unsupported(FourCc::GPS5, 'U');
        assert!(e.is_unknown_type());
        assert_eq!(e.to_string(), "Unsupported record type 'U' for key GPS5");

        assert!(!TelemetryError::corrupted("bad").is_unknown_type());
        assert!(!TelemetryError::DegenerateWindow.is_unknown_type());
    }
}
