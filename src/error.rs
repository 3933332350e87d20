//! Error taxonomy for the fetch pipeline.
//!
//! Every variant maps to a short user-facing message; the technical detail
//! stays in the error itself and goes to the log. The fetcher aborts on the
//! first error - callers get either a full snapshot or one of these, never a
//! partial result.

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Input is not a syntactically valid 20-byte hex address. Raised before
    /// any network interaction.
    #[error("invalid address {0:?}")]
    InvalidAddress(String),

    /// The aggregator was handed zero calls.
    #[error("empty multicall batch")]
    EmptyBatch,

    /// Network unreachable, node error, or request timeout.
    #[error("transport error: {0}")]
    Transport(String),

    /// A call inside the batch reverted on-chain. The index is known only on
    /// the tolerant path; plain `aggregate` reverts the batch as a whole.
    #[error("call reverted{}", .index.map(|i| format!(" at batch index {i}")).unwrap_or_default())]
    CallReverted { index: Option<usize> },

    /// Return bytes did not match the expected layout - typically the target
    /// is not a pair or token contract.
    #[error("failed to decode {context} return data")]
    Decode { context: &'static str },

    /// A reserve is zero, so the spot price is undefined.
    #[error("undefined price: pool has a zero reserve")]
    UndefinedPrice,
}

impl FetchError {
    /// Short, non-technical message for the terminal.
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::InvalidAddress(_) => "Please enter a valid Ethereum address.",
            FetchError::EmptyBatch => "Nothing to fetch.",
            FetchError::Transport(_) => {
                "Could not reach the network. Check your RPC endpoint and try again."
            }
            FetchError::CallReverted { .. } | FetchError::Decode { .. } => {
                "Failed to fetch pair data. Please check the address and try again."
            }
            FetchError::UndefinedPrice => {
                "This pool has no liquidity, so prices are undefined."
            }
        }
    }
}
