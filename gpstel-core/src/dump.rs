//! Источник на основе JSON-дампа, подготовленного внешним экстрактором.
//!
//! Формат:
//!
//! ```json
//! {
//!   "metadata": {
//!     "duration": 2.0,
//!     "payloads": [
//!       {
//!         "start": 0.0,
//!         "finish": 1.0,
//!         "records": [
//!           { "key": "GPSU", "type": "U", "struct_size": 16, "repeat": 1,
//!             "values": "210615123045.500" },
//!           { "key": "GPS5", "type": "l", "struct_size": 20, "repeat": 2,
//!             "elements": 5, "scale": [10000000, 10000000, 1000, 1000, 100],
//!             "values": [475000000, 85000000, 512000, 1500, 1600,
//!                        475000010, 85000010, 512100, 1510, 1610] }
//!         ]
//!       }
//!     ]
//!   }
//! }
//! ```

use std::{
    fs::File,
    io::{BufReader, Read, Write},
    path::Path,
};

use gpstel_types::{
    FourCc, KeyedRecord, PayloadWindow, RecordValues, TelemetryError, TelemetryResult, ValueType,
};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{MetadataSource, Payload, SourceOpener};

/// Корневой документ дампа.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DumpDocument {
    /// Трек метаданных; отсутствует, если в исходном файле его не было
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TelemetryDump>,
}

/// Трек метаданных: длительность и payload по порядку.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetryDump {
    pub duration: f64,
    #[serde(default)]
    pub payloads: Vec<DumpPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpPayload {
    pub start: f64,
    pub finish: f64,
    #[serde(default)]
    pub records: Vec<DumpRecord>,
}

/// Запись в том виде, в каком она хранится в дампе.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpRecord {
    pub key: String,
    #[serde(rename = "type")]
    pub value_type: char,
    pub struct_size: u32,
    pub repeat: u32,
    #[serde(default = "one")]
    pub elements: u32,
    pub values: DumpValues,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DumpValues {
    Text(String),
    Numbers(Vec<f64>),
}

fn one() -> u32 {
    1
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl TelemetryDump {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            payloads: Vec::new(),
        }
    }

    /// Добавляет payload (удобно для тестов и бенчмарков).
    pub fn push_payload(
        &mut self,
        window: PayloadWindow,
        records: &[KeyedRecord],
    ) -> &mut Self {
        self.payloads.push(DumpPayload {
            start: window.start,
            finish: window.finish,
            records: records.iter().map(DumpRecord::from).collect(),
        });
        self
    }

    /// Читает дамп. Нет объекта `metadata` или это не JSON — ошибка
    /// [`TelemetryError::NoMetadataTrack`]; JSON правильный, но поля трека
    /// неверного вида — [`TelemetryError::StreamCorruption`].
    pub fn from_reader<R: Read>(reader: R) -> TelemetryResult<Self> {
        let doc: DumpDocument = serde_json::from_reader(reader).map_err(|e| {
            if e.is_data() {
                TelemetryError::corrupted(format!("malformed metadata track: {e}"))
            } else {
                TelemetryError::no_metadata_track(format!("not a telemetry dump: {e}"))
            }
        })?;

        doc.metadata
            .ok_or_else(|| TelemetryError::no_metadata_track("document has no metadata track"))
    }

    pub fn from_slice(bytes: &[u8]) -> TelemetryResult<Self> {
        Self::from_reader(bytes)
    }

    /// Записывает дамп в формате, который читает [`TelemetryDump::from_reader`].
    pub fn to_writer<W: Write>(
        &self,
        writer: W,
    ) -> TelemetryResult<()> {
        let doc = DumpDocument {
            metadata: Some(self.clone()),
        };
        serde_json::to_writer_pretty(writer, &doc)
            .map_err(|e| TelemetryError::corrupted(format!("cannot serialize dump: {e}")))
    }
}

impl DumpRecord {
    /// Декодирует запись. Ключ не из четырёх ASCII символов — повреждение.
    pub fn to_record(&self) -> TelemetryResult<KeyedRecord> {
        let key: FourCc = self.key.parse()?;

        let values = match &self.values {
            DumpValues::Text(s) => RecordValues::Text(s.clone()),
            DumpValues::Numbers(v) => RecordValues::Numbers(v.clone()),
        };

        Ok(KeyedRecord {
            key,
            value_type: ValueType::from_char(self.value_type),
            struct_size: self.struct_size,
            repeat: self.repeat,
            elements: self.elements,
            values,
            scale: self.scale.clone(),
        })
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов
////////////////////////////////////////////////////////////////////////////////

impl From<&KeyedRecord> for DumpRecord {
    fn from(r: &KeyedRecord) -> Self {
        DumpRecord {
            key: r.key.to_string(),
            value_type: r.value_type.as_char(),
            struct_size: r.struct_size,
            repeat: r.repeat,
            elements: r.elements,
            values: match &r.values {
                RecordValues::Text(s) => DumpValues::Text(s.clone()),
                RecordValues::Numbers(v) => DumpValues::Numbers(v.clone()),
            },
            scale: r.scale.clone(),
        }
    }
}

impl MetadataSource for TelemetryDump {
    fn duration(&self) -> f64 {
        self.duration
    }

    fn payload_count(&self) -> u32 {
        self.payloads.len() as u32
    }

    fn payload(
        &self,
        index: u32,
    ) -> TelemetryResult<Payload<'_>> {
        let p = self.payloads.get(index as usize).ok_or_else(|| {
            TelemetryError::corrupted(format!(
                "payload {index} out of range ({} payloads)",
                self.payloads.len()
            ))
        })?;

        Ok(Payload {
            window: PayloadWindow::new(p.start, p.finish),
            records: Box::new(p.records.iter().map(DumpRecord::to_record)),
        })
    }
}

/// Открывает JSON-дампы с диска.
#[derive(Debug, Clone, Copy, Default)]
pub struct DumpOpener;

impl SourceOpener for DumpOpener {
    fn open(
        &self,
        path: &Path,
    ) -> TelemetryResult<Box<dyn MetadataSource>> {
        let file = File::open(path)
            .map_err(|e| TelemetryError::no_metadata_track(format!("{}: {e}", path.display())))?;

        let dump = TelemetryDump::from_reader(BufReader::new(file)).map_err(|e| match e {
            TelemetryError::NoMetadataTrack(msg) => {
                TelemetryError::no_metadata_track(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;

        debug!(
            "Opened {:?}: duration {:.3}s, {} payloads",
            path,
            dump.duration,
            dump.payloads.len()
        );

        Ok(Box::new(dump))
    }
}
