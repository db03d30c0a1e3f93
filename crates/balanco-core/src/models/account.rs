//! Account metadata: tariff group, role and processing batches.

use serde::{Deserialize, Serialize};

use super::invoice::InvoiceRecord;

/// Brazilian tariff classification of the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TariffGroup {
    /// High voltage: demand plus time-of-use segmented billing.
    A,
    /// Low voltage: single consumption figure.
    B,
}

/// Role of an account in the compensation arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Generating unit (UC geradora).
    Generator,
    /// Beneficiary unit receiving compensation credits (UC beneficiária).
    Beneficiary,
}

/// One account's worth of invoices handed to the populator.
///
/// Normally twelve records, one per month, but may be a single record whose
/// history table backfills the remaining months.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBatch {
    pub role: AccountRole,
    /// 1-based position within the role, matching the prepared tab names.
    pub sequence_index: u32,
    pub records: Vec<InvoiceRecord>,
}

impl AccountBatch {
    pub fn new(role: AccountRole, sequence_index: u32, records: Vec<InvoiceRecord>) -> Self {
        Self {
            role,
            sequence_index,
            records,
        }
    }

    /// Destination tab name for this account, matching the names produced by
    /// template preparation: the first generator keeps the model tab name,
    /// beneficiary tabs always carry the numeric suffix.
    pub fn tab_name(&self) -> String {
        match self.role {
            AccountRole::Generator if self.sequence_index == 1 => "UC GERADORA".to_string(),
            AccountRole::Generator => format!("UC GERADORA {}", self.sequence_index),
            AccountRole::Beneficiary => format!("UC BENEF. {}", self.sequence_index),
        }
    }
}
