use reef_core::{MoneyFp, PlayerId, TargetId};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// An audit record tying one kill event to the rules it was resolved
/// under and to the receipt immediately before it, forming a per-room
/// hash chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub target_id: TargetId,
    pub contributors: Vec<(PlayerId, MoneyFp)>,
    pub reward_fp: MoneyFp,
    pub rules_hash: [u8; 32],
    pub rules_version: u32,
    pub seed_commitment: [u8; 32],
    pub prev_receipt_hash: [u8; 32],
}

impl Receipt {
    /// SHA-256 over every field in declaration order, contributors sorted
    /// by player id so the hash doesn't depend on map iteration order.
    pub fn hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.target_id.inner().as_bytes());
        let mut contributors = self.contributors.clone();
        contributors.sort_by_key(|(player, _)| *player);
        for (player, reward) in &contributors {
            hasher.update(player.inner().as_bytes());
            hasher.update(reward.to_be_bytes());
        }
        hasher.update(self.reward_fp.to_be_bytes());
        hasher.update(self.rules_hash);
        hasher.update(self.rules_version.to_be_bytes());
        hasher.update(self.seed_commitment);
        hasher.update(self.prev_receipt_hash);
        hasher.finalize().into()
    }
}

/// Stands in for the external append-only audit sink (§6): the workspace
/// never implements a concrete store, only this narrow interface.
pub trait ReceiptSink {
    fn append(&mut self, receipt: Receipt);
}

/// Errors minting a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptError {
    /// I-5: a target may carry at most one kill receipt.
    DuplicateKillReceipt,
}

/// A per-room hash chain of kill receipts. Each minted receipt's
/// `prev_receipt_hash` is the previous receipt's hash (the zero hash for
/// the room's first kill), and [`mint`](Self::mint) refuses to emit a
/// second receipt for a target already paid out.
#[derive(Default)]
pub struct ReceiptChain {
    receipts: Vec<Receipt>,
    paid_targets: HashSet<TargetId>,
    last_hash: [u8; 32],
}

impl ReceiptChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_hash(&self) -> [u8; 32] {
        self.last_hash
    }
    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    #[allow(clippy::too_many_arguments)]
    pub fn mint(
        &mut self,
        target_id: TargetId,
        contributors: Vec<(PlayerId, MoneyFp)>,
        reward_fp: MoneyFp,
        rules_hash: [u8; 32],
        rules_version: u32,
        seed_commitment: [u8; 32],
    ) -> Result<Receipt, ReceiptError> {
        if !self.paid_targets.insert(target_id) {
            return Err(ReceiptError::DuplicateKillReceipt);
        }
        let receipt = Receipt {
            target_id,
            contributors,
            reward_fp,
            rules_hash,
            rules_version,
            seed_commitment,
            prev_receipt_hash: self.last_hash,
        };
        self.last_hash = receipt.hash();
        self.receipts.push(receipt.clone());
        Ok(receipt)
    }
}

impl ReceiptSink for ReceiptChain {
    /// Appends an externally-minted receipt, re-chaining it onto the
    /// current tail regardless of the `prev_receipt_hash` it arrived
    /// with — used when replaying a receipt stream from an external sink.
    fn append(&mut self, mut receipt: Receipt) {
        receipt.prev_receipt_hash = self.last_hash;
        self.last_hash = receipt.hash();
        self.paid_targets.insert(receipt.target_id);
        self.receipts.push(receipt);
    }
}
