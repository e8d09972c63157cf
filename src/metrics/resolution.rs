use super::relevance::pair_similarities;
use crate::conversation::DialogueTurnPair;
use crate::embeddings::EmbeddingService;
use anyhow::Result;

/// Mean user/assistant embedding similarity, used as a resolution proxy.
/// Unlabelled; see [`is_resolved`].
pub async fn score_resolution(
    embeddings: &dyn EmbeddingService,
    pairs: &[DialogueTurnPair<'_>],
) -> Result<f64> {
    let similarities = pair_similarities(embeddings, pairs).await?;
    Ok(super::mean(&similarities).unwrap_or(0.0))
}

/// With the default threshold of `0.0` any positive similarity counts as
/// resolved, so nearly every conversation with overlapping vocabulary is.
pub fn is_resolved(score: f64, threshold: f64) -> bool {
    score > threshold
}
