use super::{Level, MetricResult, cosine_similarity};
use crate::conversation::DialogueTurnPair;
use crate::embeddings::EmbeddingService;
use anyhow::Result;

/// Embedding similarity of one user turn and its paired assistant turn,
/// floored at zero.
pub async fn pair_similarity(
    embeddings: &dyn EmbeddingService,
    pair: &DialogueTurnPair<'_>,
) -> Result<f64> {
    let user = embeddings.embed(pair.user_text()).await?;
    let assistant = embeddings.embed(pair.assistant_text()).await?;
    Ok(cosine_similarity(&user, &assistant).max(0.0))
}

pub async fn pair_similarities(
    embeddings: &dyn EmbeddingService,
    pairs: &[DialogueTurnPair<'_>],
) -> Result<Vec<f64>> {
    let mut similarities = Vec::with_capacity(pairs.len());
    for pair in pairs {
        similarities.push(pair_similarity(embeddings, pair).await?);
    }
    Ok(similarities)
}

pub fn relevance_label(score: f64) -> Level {
    if score > 0.7 {
        Level::High
    } else if score > 0.4 {
        Level::Medium
    } else {
        Level::Low
    }
}

pub async fn score_relevance(
    embeddings: &dyn EmbeddingService,
    pairs: &[DialogueTurnPair<'_>],
) -> Result<MetricResult<Level>> {
    let similarities = pair_similarities(embeddings, pairs).await?;
    let avg = super::mean(&similarities).unwrap_or(0.0);
    Ok(MetricResult::new(avg, relevance_label(avg)))
}
