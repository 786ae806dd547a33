use crate::{FourCc, TelemetryError, TelemetryResult};

/// Тип значения записи (символ типа в потоке метаданных).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// `c` — ASCII строка
    Ascii,
    /// `U` — дата UTC, 16 символов `YYMMDDHHMMSS.mmm`
    UtcDate,
    /// `b`
    Int8,
    /// `B`
    UInt8,
    /// `s`
    Int16,
    /// `S`
    UInt16,
    /// `l`
    Int32,
    /// `L`
    UInt32,
    /// `j`
    Int64,
    /// `J`
    UInt64,
    /// `f`
    Float32,
    /// `d`
    Float64,
    /// Любой другой символ (сохраняется для диагностики)
    Other(char),
}

impl ValueType {
    pub fn from_char(c: char) -> Self {
        match c {
            'c' => ValueType::Ascii,
            'U' => ValueType::UtcDate,
            'b' => ValueType::Int8,
            'B' => ValueType::UInt8,
            's' => ValueType::Int16,
            'S' => ValueType::UInt16,
            'l' => ValueType::Int32,
            'L' => ValueType::UInt32,
            'j' => ValueType::Int64,
            'J' => ValueType::UInt64,
            'f' => ValueType::Float32,
            'd' => ValueType::Float64,
            other => ValueType::Other(other),
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            ValueType::Ascii => 'c',
            ValueType::UtcDate => 'U',
            ValueType::Int8 => 'b',
            ValueType::UInt8 => 'B',
            ValueType::Int16 => 's',
            ValueType::UInt16 => 'S',
            ValueType::Int32 => 'l',
            ValueType::UInt32 => 'L',
            ValueType::Int64 => 'j',
            ValueType::UInt64 => 'J',
            ValueType::Float32 => 'f',
            ValueType::Float64 => 'd',
            ValueType::Other(c) => *c,
        }
    }

    /// Размер одного элемента в байтах (0 для неизвестных типов).
    pub fn size(&self) -> u32 {
        match self {
            ValueType::Ascii | ValueType::Int8 | ValueType::UInt8 => 1,
            ValueType::Int16 | ValueType::UInt16 => 2,
            ValueType::Int32 | ValueType::UInt32 | ValueType::Float32 => 4,
            ValueType::Int64 | ValueType::UInt64 | ValueType::Float64 => 8,
            ValueType::UtcDate => 16,
            ValueType::Other(_) => 0,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ValueType::Ascii | ValueType::UtcDate)
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(
            self,
            ValueType::UInt8 | ValueType::UInt16 | ValueType::UInt32 | ValueType::UInt64
        )
    }

    pub fn is_numeric(&self) -> bool {
        !self.is_text() && !matches!(self, ValueType::Other(_))
    }
}

/// Значения записи в том виде, в каком их отдал внешний экстрактор.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValues {
    Text(String),
    Numbers(Vec<f64>),
}

impl RecordValues {
    fn len(&self) -> usize {
        match self {
            RecordValues::Text(s) => s.len(),
            RecordValues::Numbers(v) => v.len(),
        }
    }
}

/// Одна запись `ключ → значения` внутри payload.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedRecord {
    /// Ключ записи
    pub key: FourCc,
    /// Тип элементов
    pub value_type: ValueType,
    /// Размер одной структуры (выборки) в байтах
    pub struct_size: u32,
    /// Количество выборок
    pub repeat: u32,
    /// Элементов в одной выборке
    pub elements: u32,
    /// Значения (сырые, без масштабирования)
    pub values: RecordValues,
    /// Делители масштаба: пусто, один общий или по одному на элемент
    pub scale: Vec<f64>,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl KeyedRecord {
    /// Создаёт запись с одним элементом на выборку; заголовочные поля
    /// вычисляются из значений.
    pub fn new(
        key: FourCc,
        value_type: ValueType,
        values: RecordValues,
    ) -> Self {
        let (struct_size, repeat) = match &values {
            RecordValues::Text(s) => (s.len() as u32, u32::from(!s.is_empty())),
            RecordValues::Numbers(v) => (value_type.size(), v.len() as u32),
        };

        KeyedRecord {
            key,
            value_type,
            struct_size,
            repeat,
            elements: 1,
            values,
            scale: Vec::new(),
        }
    }

    /// Запись `GPSU` со строкой времени.
    pub fn utc(raw: &str) -> Self {
        Self::new(
            FourCc::GPSU,
            ValueType::UtcDate,
            RecordValues::Text(raw.to_string()),
        )
    }

    /// Запись `GPSF` с одним значением качества фикса.
    pub fn fix(quality: u32) -> Self {
        Self::new(
            FourCc::GPSF,
            ValueType::UInt32,
            RecordValues::Numbers(vec![quality as f64]),
        )
    }

    /// Запись `GPSP` с одним значением точности.
    pub fn precision(value: u16) -> Self {
        Self::new(
            FourCc::GPSP,
            ValueType::UInt16,
            RecordValues::Numbers(vec![value as f64]),
        )
    }

    /// Запись `GPS5` из уже масштабированных выборок (тип `d`, масштаб 1).
    pub fn position_batch(samples: &[[f64; 5]]) -> Self {
        let values = samples.iter().flatten().copied().collect();

        Self::new(FourCc::GPS5, ValueType::Float64, RecordValues::Numbers(values))
            .with_elements(5)
    }

    /// Задаёт число элементов в выборке, пересчитывая `repeat` и
    /// `struct_size`.
    pub fn with_elements(
        mut self,
        elements: u32,
    ) -> Self {
        self.elements = elements;
        if elements > 0 {
            self.repeat = self.values.len() as u32 / elements;
            self.struct_size = self.value_type.size() * elements;
        }
        self
    }

    pub fn with_scale(
        mut self,
        scale: Vec<f64>,
    ) -> Self {
        self.scale = scale;
        self
    }

    /// Переопределяет заголовочные поля как есть (для повреждённых потоков).
    pub fn with_header(
        mut self,
        struct_size: u32,
        repeat: u32,
    ) -> Self {
        self.struct_size = struct_size;
        self.repeat = repeat;
        self
    }

    /// Запись без выборок или с нулевым размером структуры: пропускается.
    pub fn is_empty(&self) -> bool {
        self.repeat == 0 || self.struct_size == 0
    }

    /// Значение как строка (типы `c` и `U`).
    pub fn text(&self) -> TelemetryResult<&str> {
        match (&self.values, self.value_type.is_text()) {
            (RecordValues::Text(s), true) => Ok(s),
            _ => Err(self.unsupported()),
        }
    }

    /// Первое значение как беззнаковое целое (типы `B`, `S`, `L`, `J`).
    pub fn first_unsigned(&self) -> TelemetryResult<u64> {
        let values = match (&self.values, self.value_type.is_unsigned()) {
            (RecordValues::Numbers(v), true) => v,
            _ => return Err(self.unsupported()),
        };

        let first = *values
            .first()
            .ok_or_else(|| TelemetryError::corrupted(format!("{}: no values", self.key)))?;

        if !first.is_finite() || first < 0.0 || first.fract() != 0.0 || first > u64::MAX as f64 {
            return Err(TelemetryError::corrupted(format!(
                "{}: value {first} is not an unsigned integer",
                self.key
            )));
        }

        Ok(first as u64)
    }

    /// Значения, поделённые на масштаб, как `f64`.
    ///
    /// Масштаб применяется поэлементно: общий делитель, если задан один,
    /// иначе делитель с индексом элемента внутри выборки.
    pub fn scaled(&self) -> TelemetryResult<Vec<f64>> {
        let values = match (&self.values, self.value_type.is_numeric()) {
            (RecordValues::Numbers(v), true) => v,
            _ => return Err(self.unsupported()),
        };

        if self.elements == 0 {
            return Err(TelemetryError::corrupted(format!(
                "{}: zero elements per sample",
                self.key
            )));
        }

        let elements = self.elements as usize;

        if values.len() % elements != 0 {
            return Err(TelemetryError::corrupted(format!(
                "{}: {} values do not split into samples of {elements}",
                self.key,
                values.len(),
            )));
        }

        if !(self.scale.len() <= 1 || self.scale.len() == elements) {
            return Err(TelemetryError::corrupted(format!(
                "{}: {} scale factors for {elements} elements",
                self.key,
                self.scale.len(),
            )));
        }

        if self.scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
            return Err(TelemetryError::corrupted(format!(
                "{}: invalid scale factor",
                self.key
            )));
        }

        let divisor = |i: usize| match self.scale.len() {
            0 => 1.0,
            1 => self.scale[0],
            _ => self.scale[i % elements],
        };

        Ok(values
            .iter()
            .enumerate()
            .map(|(i, v)| v / divisor(i))
            .collect())
    }

    fn unsupported(&self) -> TelemetryError {
        TelemetryError::unsupported(self.key, self.value_type.as_char())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
