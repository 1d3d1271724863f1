use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Full account view returned by the primary source (`/api/user/profile`).
///
/// Only the primary source ever produces this; the secondary source and
/// the backup cache carry identity fields alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Wallet address. Older service builds send `walletAddress`.
    #[serde(alias = "walletAddress")]
    pub wallet: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    /// Political-coin balance.
    #[serde(default)]
    pub balance: i64,
    #[serde(default)]
    pub usdt_balance: i64,
    #[serde(default)]
    pub usdc_balance: i64,
    #[serde(default)]
    pub total_coins: i64,
    #[serde(default)]
    pub referral_credits: u32,
    /// Coin count per politician id.
    #[serde(default)]
    pub politician_coins: HashMap<String, i64>,
    #[serde(default)]
    pub escrow_account: Option<EscrowAccount>,
}

/// Amounts frozen by open trading orders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EscrowAccount {
    #[serde(default)]
    pub frozen_usdt_balance: i64,
    #[serde(default)]
    pub frozen_usdc_balance: i64,
}

impl UserProfile {
    /// USDT not locked in escrow.
    pub fn available_usdt(&self) -> i64 {
        let frozen = self
            .escrow_account
            .as_ref()
            .map_or(0, |e| e.frozen_usdt_balance);
        self.usdt_balance - frozen
    }

    /// USDC not locked in escrow.
    pub fn available_usdc(&self) -> i64 {
        let frozen = self
            .escrow_account
            .as_ref()
            .map_or(0, |e| e.frozen_usdc_balance);
        self.usdc_balance - frozen
    }
}
