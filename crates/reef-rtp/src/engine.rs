use crate::outcome::ShotOutcome;
use crate::reason::Reason;
use crate::single::resolve_single_shot;
use crate::state::TargetRtpState;
use rand::Rng;
use reef_config::TierEntry;
use reef_core::{MoneyFp, PlayerId, TargetId, RTP_SCALE};
use std::collections::HashMap;

/// Owns the per-`(player, target)` RTP state and exposes the single-shot
/// and multi-target resolution entry points. One instance is shared by a
/// room across its lifetime.
pub struct RtpEngine {
    states: HashMap<(PlayerId, TargetId), TargetRtpState>,
    smoothing_k_fp: i64,
}

impl RtpEngine {
    pub fn new(smoothing_k_fp: i64) -> Self {
        Self {
            states: HashMap::new(),
            smoothing_k_fp,
        }
    }

    pub fn state(&self, player_id: PlayerId, target_id: TargetId) -> Option<&TargetRtpState> {
        self.states.get(&(player_id, target_id))
    }

    /// Resolves one confirmed hit. Handles the `already_killed` short
    /// circuit and lazily creates state on first hit, then delegates to
    /// [`resolve_single_shot`] with the single-target budget contribution
    /// `cost_fp * tier.rtp_tier_fp / RTP_SCALE`.
    pub fn resolve_shot(
        &mut self,
        player_id: PlayerId,
        target_id: TargetId,
        cost_fp: MoneyFp,
        tier: &TierEntry,
        rng: &mut impl Rng,
    ) -> ShotOutcome {
        let budget_contrib_fp = cost_fp * tier.rtp_tier_fp / RTP_SCALE;
        self.resolve(player_id, target_id, cost_fp, budget_contrib_fp, tier, rng)
    }

    /// Resolves a pseudo-shot contributed by the multi-target allocator
    /// (§4.4): `attributed_cost_fp` and `budget_contrib_fp` are the `c_i`
    /// and `b_i` [`crate::compute_budget`] already computed for this
    /// target, so this does not re-derive the budget increment from
    /// `attributed_cost_fp * tier.rtp_tier_fp / RTP_SCALE` — doing so would
    /// drift from the allocator's own rounding and break the event's
    /// `Σ b_i = budget_total_fp` conservation (I-4).
    pub fn resolve_attributed_shot(
        &mut self,
        player_id: PlayerId,
        target_id: TargetId,
        attributed_cost_fp: MoneyFp,
        budget_contrib_fp: MoneyFp,
        tier: &TierEntry,
        rng: &mut impl Rng,
    ) -> ShotOutcome {
        self.resolve(
            player_id,
            target_id,
            attributed_cost_fp,
            budget_contrib_fp,
            tier,
            rng,
        )
    }

    fn resolve(
        &mut self,
        player_id: PlayerId,
        target_id: TargetId,
        cost_fp: MoneyFp,
        budget_contrib_fp: MoneyFp,
        tier: &TierEntry,
        rng: &mut impl Rng,
    ) -> ShotOutcome {
        let key = (player_id, target_id);
        if let Some(existing) = self.states.get(&key) {
            if existing.killed {
                return ShotOutcome {
                    kill: false,
                    reward_fp: None,
                    reason: Reason::AlreadyKilled,
                    budget_remaining_fp: existing.budget_remaining_fp,
                };
            }
        }
        let state = self.states.entry(key).or_insert_with(TargetRtpState::new);
        resolve_single_shot(state, cost_fp, budget_contrib_fp, tier, self.smoothing_k_fp, rng)
    }

    /// Drops all RTP state for a target across every player, e.g. when the
    /// room despawns it.
    pub fn clear_target(&mut self, target_id: TargetId) {
        self.states.retain(|(_, t), _| *t != target_id);
    }

    pub fn clear_target_states(&mut self) {
        self.states.clear();
    }
}
