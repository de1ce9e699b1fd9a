pub mod convert;
pub mod field;
pub mod layout;
pub mod parity;
pub mod render;
pub mod store;
pub mod word;

pub use convert::{ConvertConfig, ConvertError, ConvertStats, Converter};
pub use layout::{classify, Field, Line, LineRecord, Strictness, VersionSet};
pub use parity::{ParityBits, ERRATA};
pub use render::{JsonRenderer, Renderer, TextRenderer, VhdlRenderer};
pub use store::ControlStore;
pub use word::{ControlWord, WordPacker};

/// Banner printed for `-v`.
pub const BANNER: &str = "CCROS file converter 2012-04-07";
