/// Outfit recommendation
///
/// - Pairing, color-clash and weather rules (rules.rs)
/// - Seeded reshuffling for "regenerate" requests (regenerate.rs)

pub mod regenerate;
pub mod rules;

pub use regenerate::{regeneration_seed, shuffle_outfits, RegenerationSession};
pub use rules::{recommend, Context, Occasion, Outfit, DEFAULT_TEMP_F, MAX_OUTFITS};
