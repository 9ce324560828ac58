//! Barrier - Absorbing buffer in front of health

/// Run incoming damage through a barrier
///
/// Returns a tuple of (damage_taken, barrier_left)
pub fn absorb_with_barrier(barrier: f64, damage: f64) -> (f64, f64) {
    let barrier = barrier.max(0.0);
    if damage <= 0.0 {
        return (0.0, barrier);
    }

    if damage <= barrier {
        // Barrier holds
        (0.0, barrier - damage)
    } else {
        (damage - barrier, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barrier_holds() {
        let (taken, left) = absorb_with_barrier(10.0, 4.0);
        assert_eq!(taken, 0.0);
        assert!((left - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_barrier_breaks() {
        let (taken, left) = absorb_with_barrier(3.0, 10.0);
        assert!((taken - 7.0).abs() < f64::EPSILON);
        assert_eq!(left, 0.0);
    }

    #[test]
    fn test_no_barrier() {
        assert_eq!(absorb_with_barrier(0.0, 5.0), (5.0, 0.0));
        assert_eq!(absorb_with_barrier(2.0, -1.0), (0.0, 2.0));
    }
}
