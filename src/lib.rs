//! Decoding and lossless re-encoding of GoldSource-era BSP containers and
//! the quoted key-value text grammar used for entity data and text assets.

pub mod bsp;
pub mod common;
mod error;
pub mod keyvalues;

pub use error::BinParse as BinParseError;
pub use error::Layout as LayoutError;
pub use error::TextParse as TextParseError;
pub use error::Write as WriteError;
pub use error::{BinParseResult, TextParseResult, WriteResult};
