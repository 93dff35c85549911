#![allow(clippy::implicit_hasher)]

use crate::error::ErrorKind;
use controller::Ratings;
use num_traits::float::Float;
use std::{
    hash::Hash,
    ops::{AddAssign, Mul, Sub},
};

/// Iterate over the scores both maps have for the same key, walking the
/// shortest map and probing the longest one.
pub fn common_scores<'a, K, V>(
    a: &'a Ratings<K, V>,
    b: &'a Ratings<K, V>,
) -> impl Iterator<Item = (V, V)> + 'a
where
    K: Hash + Eq,
    V: Copy,
{
    let swapped = a.len() > b.len();
    let (shortest, longest) = if swapped { (b, a) } else { (a, b) };

    shortest.iter().filter_map(move |(key, x)| {
        let y = longest.get(key)?;
        if swapped {
            Some((*y, *x))
        } else {
            Some((*x, *y))
        }
    })
}

/// Pearson correlation between two rating maps, using the sum of products
/// form. Only keys present in both maps take part.
pub fn pearson_approximation<ItemId, Value>(
    a: &Ratings<ItemId, Value>,
    b: &Ratings<ItemId, Value>,
) -> Result<Value, ErrorKind>
where
    ItemId: Hash + Eq,
    Value: Float + AddAssign + Sub + Mul,
{
    let mut sum_x = Value::zero();
    let mut sum_y = Value::zero();
    let mut sum_x_sq = Value::zero();
    let mut sum_y_sq = Value::zero();
    let mut dot_prod = Value::zero();
    let mut n = 0usize;

    for (x, y) in common_scores(a, b) {
        sum_x += x;
        sum_y += y;
        sum_x_sq += x.powi(2);
        sum_y_sq += y.powi(2);
        dot_prod += x * y;
        n += 1;
    }

    if n == 0 {
        return Err(ErrorKind::NoMatchingRatings);
    }

    let n = Value::from(n).ok_or(ErrorKind::ConvertType)?;
    let num = dot_prod - (sum_x * sum_y) / n;

    let dem_x = sum_x_sq - sum_x.powi(2) / n;
    let dem_y = sum_y_sq - sum_y.powi(2) / n;
    let dem = dem_x.sqrt() * dem_y.sqrt();

    let pearson = num / dem;
    if pearson.is_nan() {
        Err(ErrorKind::IndeterminateForm)
    } else if pearson.is_infinite() {
        Err(ErrorKind::DivisionByZero)
    } else {
        Ok(pearson)
    }
}
