use thiserror::Error;

/// Failures surfaced by the storefront core.
///
/// User-input problems (out-of-range or non-numeric quantities) never show up
/// here; they are clamped where they enter.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// The key-value store rejected a read or write.
    #[error("storage {op} failed for `{key}`: {reason}")]
    Storage {
        op: &'static str,
        key: String,
        reason: String,
    },

    /// Persisted cart state could not be decoded.
    #[error("persisted cart is corrupt: {0}")]
    CorruptCart(#[source] serde_json::Error),

    /// The cart could not be encoded for persistence.
    #[error("failed to encode cart: {0}")]
    Encode(#[source] serde_json::Error),

    /// Checkout was requested with nothing in the cart.
    #[error("Your cart is empty!")]
    EmptyCart,

    /// A required element of the page markup was not found.
    #[error("missing page element `{0}`")]
    MissingElement(&'static str),
}

impl StorefrontError {
    pub fn storage(op: &'static str, key: &str, reason: impl Into<String>) -> Self {
        StorefrontError::Storage {
            op,
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// Faults the page recovers from on its own without bothering the user.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StorefrontError::Storage { .. }
                | StorefrontError::CorruptCart(_)
                | StorefrontError::Encode(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
