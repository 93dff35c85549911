use crate::distances::pearson_approximation;
use controller::{MapedRatings, Ratings};
use std::hash::Hash;

/// Predict the score `target` would give to `item` out of the users that
/// already rated it.
///
/// Every other user is weighted by its Pearson similarity with `target`,
/// only positive similarities count. Gives `None` when nobody similar rated
/// the item.
pub fn weighted_prediction<UserId, ItemId>(
    target: &Ratings<ItemId>,
    others: &MapedRatings<UserId, ItemId>,
    item: &ItemId,
) -> Option<f64>
where
    UserId: Hash + Eq,
    ItemId: Hash + Eq,
{
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for ratings in others.values() {
        let score = match ratings.get(item) {
            Some(score) => *score,
            None => continue,
        };

        match pearson_approximation(target, ratings) {
            Ok(similarity) if similarity > 0.0 => {
                numerator += score * similarity;
                denominator += similarity;
            }

            Ok(_) => {}

            Err(e) => log::trace!("Skipping neighbour: {}", e),
        }
    }

    if denominator > 0.0 {
        Some(numerator / denominator)
    } else {
        None
    }
}
