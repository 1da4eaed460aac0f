//! Embedding distance

/// Euclidean distance between two equal-length embeddings.
///
/// Raw coordinates, no normalization. Callers check lengths first.
#[inline]
pub fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f32>()
        .sqrt()
}
