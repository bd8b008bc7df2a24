//! Token model

use serde::{Deserialize, Serialize};

/// Opaque signed token returned by login; never persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub token: String,
}
