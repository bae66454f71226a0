//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Return the euclidian norm (distance between) of two points.
///
/// If the points do not have the same number of dimentions then `None` is
/// returned.
pub fn norm<T>(point_0: &[T], point_1: &[T]) -> Option<T>
where
    T: Float + std::ops::AddAssign,
{
    if point_0.len() != point_1.len() {
        return None;
    }

    let mut sum = T::zero();

    for (a, b) in point_0.iter().zip(point_1.iter()) {
        sum += (*a - *b).powi(2);
    }

    Some(sum.sqrt())
}

/// Limit a value to the range `[min, max]`.
///
/// Unlike `f64::clamp` this never panics, if `min > max` the result is `max`.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float,
{
    let mut ret = *value;

    if ret < *min {
        ret = *min
    }
    if ret > *max {
        ret = *max
    }

    ret
}

/// Wrap an angle in degrees into the range (-180, 180].
///
/// The angle is first reduced to less than a whole turn with the floating point remainder, so
/// the cost doesn't grow with the magnitude of the angle. Angles already inside the range are
/// returned unchanged. Non-finite angles are returned as-is.
pub fn wrap_180_deg<T>(angle_deg: T) -> T
where
    T: Float,
{
    if !angle_deg.is_finite() {
        return angle_deg;
    }

    let half_turn = T::from(180.0).unwrap_or_else(T::zero);
    let full_turn = half_turn + half_turn;

    // In (-360, 360)
    let a = angle_deg % full_turn;

    if a > half_turn {
        a - full_turn
    } else if a <= -half_turn {
        a + full_turn
    } else {
        a
    }
}
