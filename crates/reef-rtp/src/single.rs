use crate::outcome::ShotOutcome;
use crate::reason::Reason;
use crate::state::TargetRtpState;
use rand::Rng;
use reef_config::TierEntry;
use reef_core::{MoneyFp, P_SCALE};

/// Scale factor for [`reef_config::DEFAULT_SMOOTHING_K_FP`]-style smoothing
/// constants: a `smoothing_k_fp` of `1_200` means `K = 1.2`.
pub const SMOOTHING_K_SCALE: i64 = 1_000;

/// Runs the single-target per-shot algorithm against an already-looked-up
/// state. The caller is responsible for the `already_killed` short-circuit,
/// for creating `state` on first hit, and for computing `budget_contrib_fp`
/// — see [`crate::RtpEngine::resolve_shot`] for the single-target case
/// (`cost_fp * tier.rtp_tier_fp / RTP_SCALE`) and
/// [`crate::RtpEngine::resolve_attributed_shot`] for the multi-target case
/// (the allocator's own `b_i`, §4.4). Taking it as an explicit input rather
/// than deriving it here is what lets a multi-hit event's budget shares
/// conserve exactly against `budget_total_fp` — re-deriving it per target
/// from `cost_fp` alone would drift from the allocator's rounding.
pub fn resolve_single_shot(
    state: &mut TargetRtpState,
    cost_fp: MoneyFp,
    budget_contrib_fp: MoneyFp,
    tier: &TierEntry,
    smoothing_k_fp: i64,
    rng: &mut impl Rng,
) -> ShotOutcome {
    state.sum_cost_fp += cost_fp;
    state.budget_remaining_fp += budget_contrib_fp;
    state.shots += 1;

    let hard_pity = (state.shots as i64) * cost_fp >= tier.n1_fp;

    if hard_pity {
        let reward_fp = tier.pity_comp_fp();
        state.budget_remaining_fp -= reward_fp;
        state.killed = true;
        return ShotOutcome {
            kill: true,
            reward_fp: Some(reward_fp),
            reason: Reason::HardPity,
            budget_remaining_fp: state.budget_remaining_fp,
        };
    }

    if state.budget_remaining_fp < tier.reward_fp {
        return ShotOutcome {
            kill: false,
            reward_fp: None,
            reason: Reason::BudgetGate,
            budget_remaining_fp: state.budget_remaining_fp,
        };
    }

    let draw = rng.random_range(0..P_SCALE);
    let p_fp = soft_roll_probability_fp(tier.reward_fp, tier.n1_fp, smoothing_k_fp);

    if draw < p_fp {
        let reward_fp = tier.reward_fp;
        state.budget_remaining_fp -= reward_fp;
        state.killed = true;
        ShotOutcome {
            kill: true,
            reward_fp: Some(reward_fp),
            reason: Reason::Soft,
            budget_remaining_fp: state.budget_remaining_fp,
        }
    } else {
        ShotOutcome {
            kill: false,
            reward_fp: None,
            reason: Reason::RollFailed,
            budget_remaining_fp: state.budget_remaining_fp,
        }
    }
}

/// `p_fp = reward_fp * P_SCALE / n1_fp / K`, computed in `i128` to avoid
/// overflow in the numerator and with `K` expressed as `smoothing_k_fp /
/// SMOOTHING_K_SCALE` so the whole expression stays integer.
fn soft_roll_probability_fp(reward_fp: MoneyFp, n1_fp: i64, smoothing_k_fp: i64) -> i64 {
    let numerator = reward_fp as i128 * P_SCALE as i128 * SMOOTHING_K_SCALE as i128;
    let denominator = n1_fp as i128 * smoothing_k_fp as i128;
    (numerator / denominator) as i64
}
