use crate::reason::Reason;
use reef_core::MoneyFp;

/// The result of resolving one confirmed hit against the RTP engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotOutcome {
    pub kill: bool,
    pub reward_fp: Option<MoneyFp>,
    pub reason: Reason,
    pub budget_remaining_fp: MoneyFp,
}
