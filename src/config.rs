use crate::harness::HarnessError;

/// Parameters of the producer/consumer publication scenario run by
/// [`run_publication`](crate::harness::run_publication).
///
/// Each round allocates a fresh buffer of `len` `u32` slots, publishes
/// `i * 2` into slot `i` and checks every slot through a dependency chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicationConfig {
    /// Number of published elements per round.
    pub len: usize,
    /// Number of independent publish/consume rounds.
    pub rounds: usize,
}

impl PublicationConfig {
    /// Element count of the reference scenario.
    pub const DEFAULT_LEN: usize = 1024;
    /// Largest element count whose values `i * 2` still fit in a `u32`.
    pub const MAX_LEN: usize = 1 << 31;

    /// Check that the scenario can run.
    ///
    /// # Errors
    /// If there is nothing to publish or the published values would overflow.
    pub fn validate(&self) -> Result<(), HarnessError> {
        let Self { len, rounds } = *self;
        if len == 0 {
            return Err(HarnessError::InvalidConfig("len must be non-zero"));
        }
        if len > Self::MAX_LEN {
            return Err(HarnessError::InvalidConfig("len must not exceed 2^31"));
        }
        if rounds == 0 {
            return Err(HarnessError::InvalidConfig("rounds must be non-zero"));
        }
        Ok(())
    }
}

impl Default for PublicationConfig {
    fn default() -> Self {
        Self {
            len: Self::DEFAULT_LEN,
            rounds: 1,
        }
    }
}
