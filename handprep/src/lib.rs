pub mod convert;
pub mod dataset;
pub mod decode;

// Re-export commonly used types
pub use convert::{convert_dataset, SplitCounts};
pub use decode::{decode, DepthImage, MAX_DEPTH};
