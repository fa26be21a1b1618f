//! Buffer summing and clamping primitives for the mix path.
//!
//! Effect summation is plain addition - commutative, so the order in which
//! concurrent effects were triggered never changes the mixed result. The
//! clamp guards against inter-layer and inter-effect summation exceeding the
//! intensity ceiling.

/// Add signal `b` into signal `a` in-place.
#[inline]
pub fn sum_in_place(a: &mut [f32], b: &[f32]) {
    debug_assert!(a.len() >= b.len());
    for (sa, &sb) in a.iter_mut().zip(b.iter()) {
        *sa += sb;
    }
}

/// Clamp every sample to `±limit` in-place.
#[inline]
pub fn clamp_in_place(buffer: &mut [f32], limit: f32) {
    let limit = limit.abs();
    for sample in buffer.iter_mut() {
        *sample = sample.clamp(-limit, limit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_adds_pairwise() {
        let mut a = [1.0, 0.5, -0.5, -1.0];
        let b = [1.0, 0.8, 0.2, -0.5];
        sum_in_place(&mut a, &b);
        assert_eq!(a, [2.0, 1.3, -0.3, -1.5]);
    }

    #[test]
    fn sum_tolerates_shorter_source() {
        let mut a = [1.0, 1.0, 1.0];
        let b = [0.5];
        sum_in_place(&mut a, &b);
        assert_eq!(a, [1.5, 1.0, 1.0]);
    }

    #[test]
    fn clamp_bounds_both_signs() {
        let mut buffer = [2.0, -2.0, 0.3, -0.3];
        clamp_in_place(&mut buffer, 0.6);
        assert_eq!(buffer, [0.6, -0.6, 0.3, -0.3]);
    }
}
