use serde::{Deserialize, Serialize};

pub const DEFAULT_STORAGE_KEY: &str = "cart";
pub const DEFAULT_CURRENCY: &str = "RM";
pub const DEFAULT_CHECKOUT_URL: &str = "checkout.html";
pub const DEFAULT_POPUP_PREFIX: &str = "popup-";

/// Page-level knobs. Every field has a default so a partial JSON override
/// (or none at all) is enough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    // Key of the persisted cart; the checkout page reads the same entry.
    pub storage_key: String,

    // Currency used when a price string carries no prefix of its own.
    pub currency: String,

    // Upper bound of every quantity stepper.
    pub max_quantity: u32,

    // Toast timing in milliseconds. `notification_ms == 0` keeps toasts until dismissed.
    pub notification_ms: u32,
    pub entry_delay_ms: u32,
    pub exit_delay_ms: u32,

    pub checkout_url: String,

    // Fragment ids with this prefix are treated as popup deep links.
    pub popup_prefix: String,

    // Cart item titles are trimmed to this many rendered lines.
    pub title_lines: u32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            max_quantity: 10,
            notification_ms: 3000,
            entry_delay_ms: 10,
            exit_delay_ms: 300,
            checkout_url: DEFAULT_CHECKOUT_URL.to_string(),
            popup_prefix: DEFAULT_POPUP_PREFIX.to_string(),
            title_lines: 2,
        }
    }
}

impl StorefrontConfig {
    /// Parse a JSON override. Unknown keys are ignored, missing keys keep
    /// their defaults.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let mut cfg: Self = serde_json::from_str(raw)?;
        cfg.normalize();
        Ok(cfg)
    }

    fn normalize(&mut self) {
        if self.max_quantity == 0 {
            self.max_quantity = 1;
        }
        if self.storage_key.trim().is_empty() {
            self.storage_key = DEFAULT_STORAGE_KEY.to_string();
        }
        if self.popup_prefix.is_empty() {
            self.popup_prefix = DEFAULT_POPUP_PREFIX.to_string();
        }
        if self.title_lines == 0 {
            self.title_lines = 1;
        }
    }
}
