//! Error types raised by strict container construction.
//!
//! Lookups that miss are not errors anywhere in this crate: they return
//! `Option::None` (or `false`) without allocating. The only recoverable
//! error surface is strict construction, which rejects duplicated keys.
//! Out-of-range indexed access (`at`, `Index`) panics with a precise
//! message instead of returning a sentinel.

/// Two source entries resolved to the same key during strict construction.
///
/// Carries the offending key and the positions of **both** conflicting
/// entries in the source, so the caller can point at the bad input rather
/// than guess. The failed container is never published; the caller must fix
/// the source data rather than retry.
///
/// # Examples
///
/// ```rust
/// use permafrost::FrozenMap;
///
/// let error = FrozenMap::<u32, &str>::try_from_pairs([(10, "a"), (10, "b")])
///     .unwrap_err();
/// assert_eq!(error.key, 10);
/// assert_eq!(error.first_position, 0);
/// assert_eq!(error.second_position, 1);
/// assert_eq!(
///     format!("{error}"),
///     "duplicate key 10 at source positions 0 and 1"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKeyError<K> {
    /// The key shared by both entries.
    pub key: K,
    /// Position of the earlier conflicting entry in the source.
    pub first_position: usize,
    /// Position of the later conflicting entry in the source.
    pub second_position: usize,
}

impl<K: std::fmt::Debug> std::fmt::Display for DuplicateKeyError<K> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "duplicate key {:?} at source positions {} and {}",
            self.key, self.first_position, self.second_position
        )
    }
}

impl<K: std::fmt::Debug> std::error::Error for DuplicateKeyError<K> {}

/// Positions of a duplicate pair, before the key itself has been recovered.
///
/// Internal builders report positions only; the façade constructors own the
/// source entries and attach the key when converting to [`DuplicateKeyError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DuplicatePositions {
    pub(crate) first: usize,
    pub(crate) second: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_error_display() {
        let error = DuplicateKeyError {
            key: "alpha",
            first_position: 2,
            second_position: 7,
        };
        assert_eq!(
            format!("{error}"),
            "duplicate key \"alpha\" at source positions 2 and 7"
        );
    }

    #[test]
    fn test_duplicate_key_error_is_std_error() {
        let error: Box<dyn std::error::Error> = Box::new(DuplicateKeyError {
            key: 1u32,
            first_position: 0,
            second_position: 1,
        });
        assert!(error.to_string().contains("duplicate key"));
    }
}
