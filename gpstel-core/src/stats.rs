use std::fmt;

/// Статистика, накопленная за запуск.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportStats {
    /// Полностью обработанных файлов.
    pub files: u64,
    /// Обработанных payload.
    pub payloads: u64,
    /// Прочитанных записей (включая пропущенные и с неизвестным ключом).
    pub records: u64,
    /// Записей без выборок или с нулевым размером структуры.
    pub records_skipped: u64,
    /// Записанных строк данных.
    pub rows: u64,
}

impl fmt::Display for ExportStats {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(f, "  Files         : {}", self.files)?;
        writeln!(f, "  Payloads      : {}", self.payloads)?;
        writeln!(
            f,
            "  Records       : {} ({} skipped)",
            self.records, self.records_skipped
        )?;
        writeln!(f, "  Rows          : {}", self.rows)?;
        write!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")
    }
}
