use reef_core::MoneyFp;

/// Per-`(player, target)` RTP state. Created on the first credited hit,
/// mutated only by [`crate::RtpEngine`], and dropped when the target leaves
/// the room or [`crate::RtpEngine::clear_target`] is called.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetRtpState {
    pub sum_cost_fp: MoneyFp,
    pub budget_remaining_fp: MoneyFp,
    pub shots: u32,
    pub killed: bool,
}

impl TargetRtpState {
    pub fn new() -> Self {
        Self::default()
    }
}
