//! Реконструкция GPS телеметрии
//!
//! Превращает пакеты выборок `GPS5`, метки времени `GPSU`, качество фикса
//! `GPSF` и точность `GPSP` в непрерывный поток строк CSV с метками
//! времени, сквозной для нескольких файлов.
//!
//! # Быстрый старт
//!
//! ```no_run
//! use gpstel_core::{DumpOpener, FileStitcher, StitchConfig};
//!
//! let stdout = std::io::stdout();
//! let mut stitcher = FileStitcher::new(stdout.lock(), StitchConfig::default());
//! stitcher.run_file(&DumpOpener, "GH010001.json".as_ref())?;
//! stitcher.run_file(&DumpOpener, "GH020001.json".as_ref())?;
//! stitcher.flush()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod driver;
pub mod dump;
pub mod emitter;
pub mod interpolator;
pub mod source;
pub mod stats;
pub mod stitcher;
pub mod store;

pub use driver::*;
pub use dump::*;
pub use emitter::*;
pub use gpstel_types::*;
pub use interpolator::*;
pub use source::*;
pub use stats::*;
pub use stitcher::*;
pub use store::*;

/// Версия библиотеки.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
