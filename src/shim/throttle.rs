/// Drop-all-but-every-Nth counter for high-frequency vendor calls.
#[derive(Debug, Clone)]
pub struct Throttle {
    threshold: u32,
    count: u32,
}

impl Throttle {
    /// Drops `threshold` calls, then admits one and starts over.
    pub fn new(threshold: u32) -> Throttle {
        Throttle {
            threshold,
            count: 0,
        }
    }

    /// Count a call; true when it should be published.
    pub fn admit(&mut self) -> bool {
        if self.count < self.threshold {
            self.count += 1;
            return false;
        }
        self.count = 0;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admits_once_in_the_last_five_of_twenty_five() {
        let mut throttle = Throttle::new(20);
        let admitted: Vec<usize> = (0..25).filter(|_| throttle.admit()).collect();
        assert_eq!(admitted, vec![20]);
    }

    #[test]
    fn zero_admits_everything() {
        let mut throttle = Throttle::new(0);
        assert!((0..10).all(|_| throttle.admit()));
    }

    #[test]
    fn keeps_cycling() {
        let mut throttle = Throttle::new(2);
        let pattern: Vec<bool> = (0..6).map(|_| throttle.admit()).collect();
        assert_eq!(pattern, vec![false, false, true, false, false, true]);
    }
}
