/// Chance that a new node climbs one more express level.
pub const DEFAULT_PROBABILITY: f64 = 0.5;

/// Express levels per tower when the list type does not say otherwise.
pub const DEFAULT_LEVELS: usize = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub probability: f64,
    /// Node slots to reserve up front.
    pub capacity: usize,
    /// Fixed seed for reproducible tower heights; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            probability: DEFAULT_PROBABILITY,
            capacity: 0,
            seed: None,
        }
    }
}
