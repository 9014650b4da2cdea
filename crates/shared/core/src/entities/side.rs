use serde::{Deserialize, Serialize};

/// Quote side (Bid to buy quota, Ask to sell it)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Bid,
    Ask,
}
