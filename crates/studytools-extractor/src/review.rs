//! Random review subsets of a deck

use crate::error::ExtractorError;
use rand::seq::SliceRandom;
use rand::Rng;
use studytools_domain::FlashcardRecord;

/// Pick `count` distinct cards for a review session.
///
/// When `count` covers the whole deck, every card is returned in deck order.
/// Otherwise the subset is drawn uniformly at random from `rng`.
///
/// # Errors
///
/// [`ExtractorError::InvalidArgument`] for an empty deck or a zero count.
pub fn pick_review_cards<R>(
    cards: &[FlashcardRecord],
    count: usize,
    rng: &mut R,
) -> Result<Vec<FlashcardRecord>, ExtractorError>
where
    R: Rng + ?Sized,
{
    if count < 1 {
        return Err(ExtractorError::InvalidArgument(
            "Review count must be at least 1".to_string(),
        ));
    }
    if cards.is_empty() {
        return Err(ExtractorError::InvalidArgument(
            "Cannot review an empty deck".to_string(),
        ));
    }

    if count >= cards.len() {
        return Ok(cards.to_vec());
    }

    Ok(cards.choose_multiple(rng, count).cloned().collect())
}
