/// Временное окно payload внутри текущего файла, секунды.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PayloadWindow {
    pub start: f64,
    pub finish: f64,
}

impl PayloadWindow {
    pub fn new(
        start: f64,
        finish: f64,
    ) -> Self {
        PayloadWindow { start, finish }
    }

    pub fn duration(&self) -> f64 {
        self.finish - self.start
    }
}
