//! Binary sensor trait

/// Two-state input exposed to the application
pub trait BinarySensor {
    /// Current logical state, `None` until the first successful read
    fn state(&self) -> Option<bool>;

    /// Check if the sensor currently reads `true`
    fn is_on(&self) -> bool {
        self.state().unwrap_or(false)
    }
}
