use chrono::{DateTime, TimeDelta, Utc};

/// Количество полей в одной выборке `GPS5`.
pub const POSITION_FIELDS: usize = 5;

/// Качество фикса из записи `GPSF` (0 — фикса нет).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GpsFix(pub u32);

/// Точность позиционирования из записи `GPSP` (меньше — лучше).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Precision(pub u16);

/// Последняя наблюдённая абсолютная метка времени UTC.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeAnchor {
    /// Целые секунды (UTC)
    pub whole_seconds: DateTime<Utc>,
    /// Доля секунды в миллисекундах, [0, 1000)
    pub sub_second_millis: f64,
}

impl TimeAnchor {
    pub fn new(
        whole_seconds: DateTime<Utc>,
        sub_second_millis: f64,
    ) -> Self {
        let mut anchor = TimeAnchor {
            whole_seconds,
            sub_second_millis: 0.0,
        };
        anchor.add_millis(sub_second_millis);
        anchor
    }

    /// Сдвигает метку на `millis`, перенося переполнение миллисекунд в
    /// целые секунды (в том числе через границы минуты, часа и суток).
    pub fn add_millis(
        &mut self,
        millis: f64,
    ) {
        if !millis.is_finite() {
            return;
        }

        let mut ms = self.sub_second_millis + millis;

        if (0.0..1000.0).contains(&ms) {
            self.sub_second_millis = ms;
            return;
        }

        let carry = (ms / 1000.0).floor();
        ms = (ms - carry * 1000.0).clamp(0.0, 999.999_999);

        let shifted = TimeDelta::try_seconds(carry as i64)
            .and_then(|delta| self.whole_seconds.checked_add_signed(delta));

        if let Some(t) = shifted {
            self.whole_seconds = t;
        }
        self.sub_second_millis = ms;
    }

    /// `YYYY-MM-DDTHH:MM:SS.mmmZ`, миллисекунды усекаются.
    pub fn to_iso8601(&self) -> String {
        format!(
            "{}.{:03}Z",
            self.whole_seconds.format("%Y-%m-%dT%H:%M:%S"),
            self.sub_second_millis as u32
        )
    }
}

/// Одна выборка позиции/скорости в физических единицах.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PositionSample {
    /// Широта, градусы
    pub latitude: f64,
    /// Долгота, градусы
    pub longitude: f64,
    /// Высота, м
    pub altitude: f64,
    /// Горизонтальная скорость, м/с
    pub speed_2d: f64,
    /// Пространственная скорость, м/с
    pub speed_3d: f64,
}

impl PositionSample {
    pub fn fields(&self) -> [f64; POSITION_FIELDS] {
        [
            self.latitude,
            self.longitude,
            self.altitude,
            self.speed_2d,
            self.speed_3d,
        ]
    }
}

impl From<[f64; POSITION_FIELDS]> for PositionSample {
    fn from(v: [f64; POSITION_FIELDS]) -> Self {
        PositionSample {
            latitude: v[0],
            longitude: v[1],
            altitude: v[2],
            speed_2d: v[3],
            speed_3d: v[4],
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn anchor(
        h: u32,
        m: u32,
        s: u32,
        ms: f64,
    ) -> TimeAnchor {
        TimeAnchor::new(Utc.with_ymd_and_hms(2021, 6, 15, h, m, s).unwrap(), ms)
    }

    #[test]
    fn test_rollover_single_second() {
        let mut a = anchor(12, 30, 45, 995.0);
        a.add_millis(10.0);

        assert_eq!(a.sub_second_millis, 5.0);
        assert_eq!(
            a.whole_seconds,
            Utc.with_ymd_and_hms(2021, 6, 15, 12, 30, 46).unwrap()
        );
    }

    #[test]
    fn test_rollover_across_day() {
        let mut a = TimeAnchor::new(
            Utc.with_ymd_and_hms(2021, 12, 31, 23, 59, 59).unwrap(),
            950.0,
        );
        a.add_millis(100.0);

        assert_eq!(a.to_iso8601(), "2022-01-01T00:00:00.050Z");
    }

    #[test]
    fn test_rollover_multiple_seconds() {
        let mut a = anchor(0, 0, 0, 500.0);
        a.add_millis(2_600.0);

        assert_eq!(a.sub_second_millis, 100.0);
        assert_eq!(a.to_iso8601(), "2021-06-15T00:00:03.100Z");
    }

    #[test]
    fn test_no_rollover_below_second() {
        let mut a = anchor(1, 2, 3, 100.0);
        a.add_millis(899.0);

        assert_eq!(a.sub_second_millis, 999.0);
        assert_eq!(a.to_iso8601(), "2021-06-15T01:02:03.999Z");
    }

    #[test]
    fn test_iso_formatting_pads_millis() {
        assert_eq!(anchor(12, 30, 45, 7.9).to_iso8601(), "2021-06-15T12:30:45.007Z");
    }

    #[test]
    fn test_default_is_epoch() {
        assert_eq!(TimeAnchor::default().to_iso8601(), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_position_fields_order() {
        let p = PositionSample::from([1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(p.speed_3d, 5.0);
        assert_eq!(p.fields(), [1.0, 2.0, 3.0, 4.0, 5.0]);
    }
}
