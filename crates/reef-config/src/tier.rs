use reef_core::RtpFp;
use reef_core::MoneyFp;
use reef_core::Tier;
use serde::Deserialize;
use serde::Serialize;

/// A single row of the tier table: `{rtp_tier_fp, n1_fp, reward_fp, pity_comp_fp?}`.
///
/// Example row (Tier 1): `{9000, 6000, 4500}` — target RTP 90.00%, pity at
/// 6 shots of 1 unit, reward 4500 fp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierEntry {
    /// Target RTP for this tier, scaled by `RTP_SCALE` (9000 = 90.00%).
    pub rtp_tier_fp: RtpFp,
    /// Hard-pity threshold in cost units (`shots * cost_fp >= n1_fp` forces a kill).
    pub n1_fp: MoneyFp,
    /// Reward paid on kill, in fixed-point money units.
    pub reward_fp: MoneyFp,
    /// Optional pity compensation override; falls back to `reward_fp` when absent.
    pub pity_comp_fp: Option<MoneyFp>,
}

impl TierEntry {
    pub fn pity_comp_fp(&self) -> MoneyFp {
        self.pity_comp_fp.unwrap_or(self.reward_fp)
    }
}

/// Immutable six-row tier table, indexed by [`Tier`].
///
/// Constructed once at startup and never mutated; its canonical encoding
/// feeds the `rules_hash` computed in `reef-audit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTable {
    rows: [TierEntry; 6],
}

impl TierTable {
    pub fn new(rows: [TierEntry; 6]) -> Self {
        Self { rows }
    }
    pub fn get(&self, tier: Tier) -> &TierEntry {
        &self.rows[tier.index()]
    }
    pub fn rows(&self) -> &[TierEntry; 6] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(rtp: i64, n1: i64, reward: i64) -> TierEntry {
        TierEntry {
            rtp_tier_fp: rtp,
            n1_fp: n1,
            reward_fp: reward,
            pity_comp_fp: None,
        }
    }

    #[test]
    fn tier_one_matches_spec_example() {
        let row = sample_row(9000, 6000, 4500);
        assert_eq!(row.rtp_tier_fp, 9000);
        assert_eq!(row.n1_fp, 6000);
        assert_eq!(row.reward_fp, 4500);
        assert_eq!(row.pity_comp_fp(), 4500);
    }

    #[test]
    fn table_indexes_by_tier() {
        let table = TierTable::new([
            sample_row(9000, 6000, 4500),
            sample_row(9200, 6200, 4600),
            sample_row(9300, 6400, 4700),
            sample_row(9400, 6600, 4800),
            sample_row(9450, 6800, 4900),
            sample_row(9500, 7000, 5000),
        ]);
        assert_eq!(table.get(Tier::new(1)).rtp_tier_fp, 9000);
        assert_eq!(table.get(Tier::new(6)).rtp_tier_fp, 9500);
    }
}
