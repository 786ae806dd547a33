//! Линейная интерполяция времени внутри payload.
//!
//! Метки `GPSU` приходят гораздо реже выборок `GPS5`, поэтому время каждой
//! выборки восстанавливается равномерным делением окна payload.

use gpstel_types::{PayloadWindow, TelemetryError, TelemetryResult};

use crate::SampleStore;

#[derive(Debug, Clone, Default)]
pub struct TimeInterpolator {
    now: f64,
    step: f64,
}

impl TimeInterpolator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Сбрасывает состояние под новое окно и `sample_count` выборок.
    pub fn begin(
        &mut self,
        window: PayloadWindow,
        sample_count: u32,
    ) -> TelemetryResult<()> {
        if sample_count == 0 {
            return Err(TelemetryError::DegenerateWindow);
        }

        self.now = window.start;
        self.step = window.duration() / sample_count as f64;

        Ok(())
    }

    /// Смещение (секунды от начала файла) для очередной выборки.
    pub fn current(&self) -> f64 {
        self.now
    }

    /// Шаг между выборками, секунды.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Переходит к следующей выборке: сдвигает смещение на шаг, а метку
    /// времени хранилища на `step * 1000` мс с переносом в секунды.
    /// Возвращает новое смещение.
    pub fn advance(
        &mut self,
        store: &mut SampleStore,
    ) -> f64 {
        self.now += self.step;
        store.time_anchor_mut().add_millis(self.step * 1000.0);
        self.now
    }
}
