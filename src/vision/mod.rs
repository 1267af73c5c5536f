/// Attribute extraction
///
/// This module derives catalog attributes from raw inputs:
/// - RGB value type and darkness measure (color.rs)
/// - Dominant color by pixel clustering (dominant.rs)
/// - Coarse type from file names and classifier labels (tagger.rs)

pub mod color;
pub mod dominant;
pub mod tagger;

pub use color::{ParseRgbError, Rgb};
pub use dominant::{extract_dominant_color, ClusterParams};
pub use tagger::classify_type_from_name;
