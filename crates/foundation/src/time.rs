/// Frame-clock timestamp in milliseconds.
///
/// The host frame driver supplies these (e.g. from `requestAnimationFrame`);
/// nothing in the engine reads a wall clock, so tests can pass synthetic
/// timestamps.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct Time(pub f64);

impl Time {
    pub fn from_millis(ms: f64) -> Self {
        Self(ms)
    }

    pub fn millis(self) -> f64 {
        self.0
    }

    pub fn add_millis(self, ms: f64) -> Self {
        Self(self.0 + ms)
    }

    /// Milliseconds elapsed since `earlier` (negative if `earlier` is later).
    pub fn since(self, earlier: Time) -> f64 {
        self.0 - earlier.0
    }
}

#[cfg(test)]
mod tests {
    use super::Time;

    #[test]
    fn since_and_add() {
        let t0 = Time::from_millis(100.0);
        let t1 = t0.add_millis(50.0);
        assert_eq!(t1.since(t0), 50.0);
        assert!(t1 > t0);
    }
}
