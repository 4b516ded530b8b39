//! Series extraction, normalization, and persistence

pub mod extract;
pub mod normalize;
pub mod sequence;
pub mod store;

pub use extract::{ExtractedRow, ExtractedTable, extract};
pub use normalize::{CLOSE_FIELD, SeriesNormalizer, normalize};
pub use sequence::{FileSequence, SequenceSource};
pub use store::{read_series, write_series};
