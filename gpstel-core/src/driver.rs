use std::io::Write;

use gpstel_types::{
    FourCc, KeyedRecord, PayloadWindow, PositionSample, TelemetryError, TelemetryResult,
    POSITION_FIELDS,
};
use log::{debug, trace, warn};

use crate::{ExportStats, RowEmitter, SampleStore, TimeInterpolator};

/// Обходит записи одного payload и направляет их в хранилище или в
/// интерполятор и эмиттер строк.
///
/// Владеет [`SampleStore`], поэтому фикс, точность и метка времени
/// переносятся между payload (и между файлами, если драйвер один на запуск).
#[derive(Debug, Default)]
pub struct PayloadDriver {
    store: SampleStore,
    interpolator: TimeInterpolator,
    warned_no_anchor: bool,
}

impl PayloadDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    /// Обрабатывает записи payload в порядке потока.
    ///
    /// Первая ошибка прерывает обработку; уже записанные строки остаются в
    /// приёмнике. Возвращает `window.finish`.
    pub fn process_payload<I, W>(
        &mut self,
        records: I,
        window: PayloadWindow,
        emitter: &mut RowEmitter<W>,
        stats: &mut ExportStats,
    ) -> TelemetryResult<f64>
    where
        I: IntoIterator<Item = TelemetryResult<KeyedRecord>>,
        W: Write,
    {
        if window.finish <= window.start {
            warn!(
                "Payload window [{:.3}, {:.3}] is not increasing",
                window.start, window.finish
            );
        }

        for record in records {
            let record = record?;
            stats.records += 1;

            if record.is_empty() {
                trace!("Skipping empty {} record", record.key);
                stats.records_skipped += 1;
                continue;
            }

            self.process_record(&record, window, emitter, stats)?;
        }

        stats.payloads += 1;
        Ok(window.finish)
    }

    fn process_record<W: Write>(
        &mut self,
        record: &KeyedRecord,
        window: PayloadWindow,
        emitter: &mut RowEmitter<W>,
        stats: &mut ExportStats,
    ) -> TelemetryResult<()> {
        match record.key {
            FourCc::GPSU => {
                self.store.observe_time_anchor(record.text()?)?;
            }
            FourCc::GPSF => {
                let quality = u32::try_from(record.first_unsigned()?).map_err(|_| {
                    TelemetryError::corrupted(format!("{}: fix out of range", record.key))
                })?;
                self.store.observe_fix(quality);
            }
            FourCc::GPSP => {
                let precision = u16::try_from(record.first_unsigned()?).map_err(|_| {
                    TelemetryError::corrupted(format!("{}: precision out of range", record.key))
                })?;
                self.store.observe_precision(precision);
            }
            FourCc::GPS5 => {
                stats.rows += self.emit_batch(record, window, emitter)?;
            }
            other => trace!("Ignoring {other} record"),
        }

        Ok(())
    }

    /// Пишет по строке на каждую выборку пакета `GPS5`.
    fn emit_batch<W: Write>(
        &mut self,
        record: &KeyedRecord,
        window: PayloadWindow,
        emitter: &mut RowEmitter<W>,
    ) -> TelemetryResult<u64> {
        if record.elements as usize != POSITION_FIELDS {
            return Err(TelemetryError::unsupported(
                record.key,
                record.value_type.as_char(),
            ));
        }

        let samples: Vec<PositionSample> = record
            .scaled()?
            .chunks_exact(POSITION_FIELDS)
            .map(|c| PositionSample::from([c[0], c[1], c[2], c[3], c[4]]))
            .collect();

        let count = u32::try_from(samples.len())
            .map_err(|_| TelemetryError::corrupted("too many samples in one batch"))?;

        self.interpolator.begin(window, count)?;

        if !self.store.has_time_anchor() && !self.warned_no_anchor {
            warn!("Position samples before the first GPSU record; dates start at Unix epoch");
            self.warned_no_anchor = true;
        }

        debug!(
            "{count} samples in [{:.3}, {:.3}], step {:.6}s",
            window.start,
            window.finish,
            self.interpolator.step()
        );

        for sample in &samples {
            emitter.emit(self.interpolator.current(), sample, &self.store)?;
            self.interpolator.advance(&mut self.store);
        }

        Ok(samples.len() as u64)
    }
}
