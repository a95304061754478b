/// Tunable combat rules shared by the combat model and its callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatRules {
    /// Largest tick offset a join battle roll can produce.
    ///
    /// The best roll acts on tick 0; everyone else waits the difference in
    /// successes, capped at this value.
    pub max_join_offset: u64,
}

impl CombatRules {
    pub const DEFAULT_MAX_JOIN_OFFSET: u64 = 6;

    pub const fn new() -> Self {
        Self {
            max_join_offset: Self::DEFAULT_MAX_JOIN_OFFSET,
        }
    }

    pub const fn with_max_join_offset(max_join_offset: u64) -> Self {
        Self { max_join_offset }
    }
}

impl Default for CombatRules {
    fn default() -> Self {
        Self::new()
    }
}
