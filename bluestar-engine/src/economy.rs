//! Coin economy: duplicate income, upgrade costs, and the transaction
//! ledger.

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::config::{CoinPerDuplicate, UpgradeTable};

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Spend,
}

/// One committed ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinTransaction {
    pub amount: u64,
    pub kind: TransactionKind,
    pub card_id: String,
    pub day: u32,
}

/// Income and spend totals for a single day plus the running balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLedgerSummary {
    pub total_income: u64,
    pub total_spent: u64,
    pub balance: u64,
}

/// Running non-negative coin balance with an append-only transaction
/// history. Spends are all-or-nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinLedger {
    balance: u64,
    transactions: Vec<CoinTransaction>,
}

impl CoinLedger {
    #[must_use]
    pub fn new(initial_balance: u64) -> Self {
        Self {
            balance: initial_balance,
            transactions: Vec::new(),
        }
    }

    #[must_use]
    pub const fn balance(&self) -> u64 {
        self.balance
    }

    #[must_use]
    pub fn transactions(&self) -> &[CoinTransaction] {
        &self.transactions
    }

    /// Record income. Always succeeds.
    pub fn earn(&mut self, amount: u64, card_id: &str, day: u32) {
        self.balance += amount;
        self.transactions.push(CoinTransaction {
            amount,
            kind: TransactionKind::Income,
            card_id: card_id.to_string(),
            day,
        });
    }

    /// Attempt a spend. Returns false and leaves the balance untouched when
    /// the amount exceeds it; records the transaction only on success.
    #[must_use]
    pub fn spend(&mut self, amount: u64, card_id: &str, day: u32) -> bool {
        if amount > self.balance {
            return false;
        }
        self.balance -= amount;
        self.transactions.push(CoinTransaction {
            amount,
            kind: TransactionKind::Spend,
            card_id: card_id.to_string(),
            day,
        });
        true
    }

    /// Income and spend totals restricted to `day`, with the current
    /// cumulative balance.
    #[must_use]
    pub fn daily_summary(&self, day: u32) -> DailyLedgerSummary {
        let mut total_income = 0;
        let mut total_spent = 0;
        for tx in self.transactions.iter().filter(|tx| tx.day == day) {
            match tx.kind {
                TransactionKind::Income => total_income += tx.amount,
                TransactionKind::Spend => total_spent += tx.amount,
            }
        }
        DailyLedgerSummary {
            total_income,
            total_spent,
            balance: self.balance,
        }
    }

    /// Lifetime income total.
    #[must_use]
    pub fn total_earned(&self) -> u64 {
        self.total_for(TransactionKind::Income)
    }

    /// Lifetime spend total.
    #[must_use]
    pub fn total_spent(&self) -> u64 {
        self.total_for(TransactionKind::Spend)
    }

    fn total_for(&self, kind: TransactionKind) -> u64 {
        self.transactions
            .iter()
            .filter(|tx| tx.kind == kind)
            .map(|tx| tx.amount)
            .sum()
    }
}

/// Coins earned from duplicate copies of a card. Maxed cards fall back to
/// the flat first-entry rate; everyone else pays out at the current level.
#[must_use]
pub fn compute_coin_income(
    card: &Card,
    duplicates_received: u32,
    coin_table: &CoinPerDuplicate,
    max_level: u32,
) -> u64 {
    let table = &coin_table.coins_per_dupe;
    let rate = if card.is_maxed(max_level) {
        table.first().copied().unwrap_or(0)
    } else {
        table.get((card.level - 1) as usize).copied().unwrap_or(0)
    };
    rate * u64::from(duplicates_received)
}

/// Duplicate and coin cost to leave the card's current level, both indexed
/// by `level - 1`. Undefined at max level; callers check maxed status first.
#[must_use]
pub fn upgrade_cost(card: &Card, upgrade_table: &UpgradeTable) -> (u32, u64) {
    let index = (card.level - 1) as usize;
    let dupes = upgrade_table.duplicate_costs.get(index).copied().unwrap_or(0);
    let coins = upgrade_table.coin_costs.get(index).copied().unwrap_or(0);
    (dupes, coins)
}
