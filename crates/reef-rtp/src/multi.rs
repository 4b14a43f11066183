use reef_config::TierEntry;
use reef_core::{MoneyFp, Tier, WeightFp, RTP_SCALE, WEIGHT_SCALE};

/// One candidate target in a multi-hit event, already trimmed to the
/// weapon's target cap and ordered by the weapon's rule (AOE: distance
/// ascending; laser: beam index ascending).
#[derive(Debug, Clone, Copy)]
pub struct MultiTargetCandidate {
    pub tier: Tier,
    /// AOE: distance from impact point. Laser: beam index (0-based),
    /// read by [`compute_weights`] depending on `is_laser`.
    pub distance_or_index: u32,
}

/// `raw_i = floor(WEIGHT_SCALE / max(distance_i, 1))` for AOE, or
/// `floor(WEIGHT_SCALE / (i + 1))` for laser, then normalized so
/// `Σ w_i = WEIGHT_SCALE` exactly via last-index residue absorption.
pub fn compute_weights(candidates: &[MultiTargetCandidate], is_laser: bool) -> Vec<WeightFp> {
    let n = candidates.len();
    if n == 0 {
        return Vec::new();
    }
    let raw: Vec<i64> = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let denom = if is_laser {
                (i as i64) + 1
            } else {
                (c.distance_or_index as i64).max(1)
            };
            WEIGHT_SCALE / denom
        })
        .collect();

    let mut raw_sum: i64 = raw.iter().sum();
    if raw_sum == 0 {
        raw_sum = 1;
    }

    let mut weights = vec![0i64; n];
    let mut assigned = 0i64;
    for (i, raw_i) in raw.iter().enumerate().take(n - 1) {
        let w_i = raw_i * WEIGHT_SCALE / raw_sum;
        weights[i] = w_i;
        assigned += w_i;
    }
    weights[n - 1] = WEIGHT_SCALE - assigned;
    weights
}

/// `rtp_weighted_fp = Σ floor(w_i * rtp_tier_fp(tier_i) / WEIGHT_SCALE)`,
/// `budget_total_fp = floor(weapon_cost_fp * rtp_weighted_fp / RTP_SCALE)`,
/// and per-target allocation via the same last-index residue trick.
///
/// Returns `(per_target_budget_fp, per_target_attributed_cost_fp)`, both
/// summing exactly to `budget_total_fp` and `weapon_cost_fp` respectively.
pub fn compute_budget(
    weights: &[WeightFp],
    tiers: &[TierEntry],
    weapon_cost_fp: MoneyFp,
) -> (Vec<MoneyFp>, Vec<MoneyFp>) {
    let n = weights.len();
    debug_assert_eq!(n, tiers.len());
    if n == 0 {
        return (Vec::new(), Vec::new());
    }

    let rtp_weighted_fp: i64 = weights
        .iter()
        .zip(tiers.iter())
        .map(|(w, t)| w * t.rtp_tier_fp / WEIGHT_SCALE)
        .sum();
    let budget_total_fp = weapon_cost_fp * rtp_weighted_fp / RTP_SCALE;

    let mut budgets = vec![0i64; n];
    let mut assigned_budget = 0i64;
    for i in 0..n - 1 {
        let b_i = weights[i] * budget_total_fp / WEIGHT_SCALE;
        budgets[i] = b_i;
        assigned_budget += b_i;
    }
    budgets[n - 1] = budget_total_fp - assigned_budget;

    let mut costs = vec![0i64; n];
    let mut assigned_cost = 0i64;
    for i in 0..n - 1 {
        let c_i = weights[i] * weapon_cost_fp / WEIGHT_SCALE;
        costs[i] = c_i;
        assigned_cost += c_i;
    }
    costs[n - 1] = weapon_cost_fp - assigned_cost;

    (budgets, costs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(rtp_tier_fp: i64) -> TierEntry {
        TierEntry {
            rtp_tier_fp,
            n1_fp: 6000,
            reward_fp: 4500,
            pity_comp_fp: None,
        }
    }

    #[test]
    fn weights_sum_to_weight_scale_exactly() {
        let candidates = [
            MultiTargetCandidate {
                tier: Tier::new(1),
                distance_or_index: 10,
            },
            MultiTargetCandidate {
                tier: Tier::new(2),
                distance_or_index: 20,
            },
            MultiTargetCandidate {
                tier: Tier::new(3),
                distance_or_index: 30,
            },
        ];
        let weights = compute_weights(&candidates, false);
        assert_eq!(weights.iter().sum::<i64>(), WEIGHT_SCALE);
        assert!(weights[0] > weights[1]);
        assert!(weights[1] > weights[2]);
    }

    #[test]
    fn budget_conserves_exactly() {
        let candidates = [
            MultiTargetCandidate {
                tier: Tier::new(1),
                distance_or_index: 10,
            },
            MultiTargetCandidate {
                tier: Tier::new(2),
                distance_or_index: 20,
            },
            MultiTargetCandidate {
                tier: Tier::new(3),
                distance_or_index: 30,
            },
        ];
        let weights = compute_weights(&candidates, false);
        let tiers = [tier(9000), tier(9200), tier(9300)];
        let weapon_cost_fp = 5_000;
        let (budgets, costs) = compute_budget(&weights, &tiers, weapon_cost_fp);

        let rtp_weighted_fp: i64 = weights
            .iter()
            .zip(tiers.iter())
            .map(|(w, t)| w * t.rtp_tier_fp / WEIGHT_SCALE)
            .sum();
        let expected_total = weapon_cost_fp * rtp_weighted_fp / RTP_SCALE;

        assert_eq!(budgets.iter().sum::<i64>(), expected_total);
        assert_eq!(costs.iter().sum::<i64>(), weapon_cost_fp);
    }

    #[test]
    fn laser_weights_decrease_by_beam_index() {
        let candidates = [
            MultiTargetCandidate {
                tier: Tier::new(1),
                distance_or_index: 0,
            },
            MultiTargetCandidate {
                tier: Tier::new(1),
                distance_or_index: 1,
            },
        ];
        let weights = compute_weights(&candidates, true);
        assert_eq!(weights.iter().sum::<i64>(), WEIGHT_SCALE);
        assert!(weights[0] > weights[1]);
    }

    #[test]
    fn single_candidate_takes_entire_weight() {
        let candidates = [MultiTargetCandidate {
            tier: Tier::new(1),
            distance_or_index: 5,
        }];
        let weights = compute_weights(&candidates, false);
        assert_eq!(weights, vec![WEIGHT_SCALE]);
    }
}
