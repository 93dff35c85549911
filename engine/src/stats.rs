use num_traits::NumCast;

/// Arithmetic mean of some scores, `None` when there's nothing to average
pub fn mean<I, T>(scores: I) -> Option<f64>
where
    I: IntoIterator<Item = T>,
    T: NumCast,
{
    let mut sum = 0.0;
    let mut count = 0usize;

    for score in scores {
        sum += <f64 as NumCast>::from(score)?;
        count += 1;
    }

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn mean_of_scores() {
        assert_approx_eq!(mean(vec![1, 2, 3, 4]).unwrap(), 2.5);
        assert_approx_eq!(mean(vec![5.0, 4.0]).unwrap(), 4.5);
    }

    #[test]
    fn mean_of_nothing() {
        assert_eq!(mean(Vec::<i32>::new()), None);
    }
}
