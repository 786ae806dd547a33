use chrono::NaiveDate;
use gpstel_types::{GpsFix, Precision, TelemetryError, TelemetryResult, TimeAnchor};

/// Минимальная длина строки `GPSU`: `YYMMDDHHMMSS.mmm`.
pub const GPSU_TEXT_LEN: usize = 16;

/// Последние наблюдённые значения фикса, точности и метки времени.
///
/// Значение действует, пока не перезаписано следующей записью того же
/// ключа. До первого наблюдения фикс и точность равны нулю, метка времени
/// равна Unix epoch.
#[derive(Debug, Clone, Default)]
pub struct SampleStore {
    fix: GpsFix,
    precision: Precision,
    anchor: TimeAnchor,
    anchor_observed: bool,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe_fix(
        &mut self,
        quality: u32,
    ) {
        self.fix = GpsFix(quality);
    }

    pub fn observe_precision(
        &mut self,
        value: u16,
    ) {
        self.precision = Precision(value);
    }

    /// Разбирает строку `GPSU` и заменяет текущую метку времени.
    ///
    /// При ошибке разбора текущая метка не изменяется.
    pub fn observe_time_anchor(
        &mut self,
        raw: &str,
    ) -> TelemetryResult<()> {
        self.anchor = parse_time_anchor(raw)?;
        self.anchor_observed = true;
        Ok(())
    }

    pub fn current_fix(&self) -> GpsFix {
        self.fix
    }

    pub fn current_precision(&self) -> Precision {
        self.precision
    }

    pub fn current_time_anchor(&self) -> &TimeAnchor {
        &self.anchor
    }

    /// Была ли хотя бы одна запись `GPSU`.
    pub fn has_time_anchor(&self) -> bool {
        self.anchor_observed
    }

    pub(crate) fn time_anchor_mut(&mut self) -> &mut TimeAnchor {
        &mut self.anchor
    }
}

/// Разбирает `YYMMDDHHMMSS.mmm` (UTC, год = 2000 + YY).
///
/// Символ в позиции 12 — разделитель и не проверяется; всё после 16-го
/// символа игнорируется.
pub fn parse_time_anchor(raw: &str) -> TelemetryResult<TimeAnchor> {
    let b = raw.as_bytes();

    if b.len() < GPSU_TEXT_LEN {
        return Err(TelemetryError::malformed_timestamp(format!(
            "'{raw}' is shorter than {GPSU_TEXT_LEN} characters"
        )));
    }

    let field = |at: usize| -> TelemetryResult<u32> {
        match (b[at], b[at + 1]) {
            (hi @ b'0'..=b'9', lo @ b'0'..=b'9') => {
                Ok(u32::from(hi - b'0') * 10 + u32::from(lo - b'0'))
            }
            _ => Err(TelemetryError::malformed_timestamp(format!(
                "'{raw}': non-digit at position {at}"
            ))),
        }
    };

    let year = 2000 + field(0)? as i32;
    let month = field(2)?;
    let day = field(4)?;
    let hour = field(6)?;
    let minute = field(8)?;
    let second = field(10)?;

    let millis = b[13..16].iter().enumerate().try_fold(0u32, |acc, (i, c)| {
        if c.is_ascii_digit() {
            Ok(acc * 10 + u32::from(c - b'0'))
        } else {
            Err(TelemetryError::malformed_timestamp(format!(
                "'{raw}': non-digit at position {}",
                13 + i
            )))
        }
    })?;

    let whole_seconds = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, second))
        .ok_or_else(|| {
            TelemetryError::malformed_timestamp(format!("'{raw}' is not a valid calendar time"))
        })?
        .and_utc();

    Ok(TimeAnchor {
        whole_seconds,
        sub_second_millis: millis as f64,
    })
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
