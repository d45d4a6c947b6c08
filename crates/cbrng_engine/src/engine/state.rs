//! Saved engine state.

/// Snapshot of an engine: algorithm identity plus key and counter bytes.
///
/// The byte fields use the little-endian word layout of
/// [`cbrng_core::Key::to_bytes`] and [`cbrng_core::Counter::to_bytes`], so a
/// state saved on one machine restores identically on any other.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineState {
    /// Algorithm name, e.g. `"philox4x32"`.
    pub algorithm: String,
    /// Round count of the algorithm.
    pub rounds: usize,
    /// Key bytes.
    pub key: Vec<u8>,
    /// Counter bytes.
    pub counter: Vec<u8>,
}

impl EngineState {
    /// Key bytes followed by counter bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.key.len() + self.counter.len());
        out.extend_from_slice(&self.key);
        out.extend_from_slice(&self.counter);
        out
    }
}
