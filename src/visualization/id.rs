use rand::Rng;
use rand::distr::Alphanumeric;

/// Number of random characters appended to a node label.
pub const ID_SUFFIX_LEN: usize = 8;

/// Generates an identifier of the form `<label>-<suffix>`.
///
/// The suffix is random, so collisions are unlikely but not impossible.
pub fn generate_id(label: &str) -> String {
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(ID_SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("{}-{}", label, suffix)
}
