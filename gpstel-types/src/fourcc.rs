use std::{fmt, str::FromStr};

use crate::{TelemetryError, TelemetryResult};

/// Четырёхсимвольный ключ записи потока метаданных (FourCC).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCc([u8; 4]);

impl FourCc {
    /// Метка времени UTC, строка `YYMMDDHHMMSS.mmm`
    pub const GPSU: FourCc = FourCc(*b"GPSU");
    /// Качество фикса: 0 — нет, 2 — 2D, 3 — 3D
    pub const GPSF: FourCc = FourCc(*b"GPSF");
    /// Геометрический фактор точности (DOP × 100)
    pub const GPSP: FourCc = FourCc(*b"GPSP");
    /// Пакет выборок: широта, долгота, высота, 2D и 3D скорость
    pub const GPS5: FourCc = FourCc(*b"GPS5");

    pub const fn new(bytes: [u8; 4]) -> Self {
        FourCc(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl FromStr for FourCc {
    type Err = TelemetryError;

    fn from_str(s: &str) -> TelemetryResult<Self> {
        let bytes: [u8; 4] = s
            .as_bytes()
            .try_into()
            .map_err(|_| TelemetryError::corrupted(format!("Invalid FourCC '{s}'")))?;

        if !bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            return Err(TelemetryError::corrupted(format!("Invalid FourCC '{s}'")));
        }

        Ok(FourCc(bytes))
    }
}

impl fmt::Display for FourCc {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for &b in &self.0 {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for FourCc {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "FourCc(\"{self}\")")
    }
}
