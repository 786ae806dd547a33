//! Граница с внешним экстрактором метаданных.
//!
//! Разбор контейнера и бинарного потока метаданных сюда не входит:
//! конвейер получает уже декодированные записи через [`MetadataSource`].

use std::path::Path;

use gpstel_types::{KeyedRecord, PayloadWindow, TelemetryResult};

/// Ленивая, конечная и одноразовая последовательность записей payload в
/// порядке потока.
pub type RecordStream<'a> = Box<dyn Iterator<Item = TelemetryResult<KeyedRecord>> + 'a>;

/// Один payload: окно времени и его записи.
pub struct Payload<'a> {
    pub window: PayloadWindow,
    pub records: RecordStream<'a>,
}

/// Открытый источник с треком метаданных.
pub trait MetadataSource {
    /// Общая длительность трека метаданных, секунды.
    fn duration(&self) -> f64;

    /// Количество payload в треке.
    fn payload_count(&self) -> u32;

    /// Payload с индексом `index` (0..payload_count).
    fn payload(
        &self,
        index: u32,
    ) -> TelemetryResult<Payload<'_>>;
}

/// Открывает источник по пути.
pub trait SourceOpener {
    /// Ошибка [`NoMetadataTrack`](gpstel_types::TelemetryError::NoMetadataTrack),
    /// если файл не читается или трека метаданных нет.
    fn open(
        &self,
        path: &Path,
    ) -> TelemetryResult<Box<dyn MetadataSource>>;
}
