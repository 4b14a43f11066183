/// Why a shot did or did not produce a kill. A tagged variant instead of a
/// sentinel string, so callers match exhaustively instead of string-comparing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    AlreadyKilled,
    BudgetGate,
    RollFailed,
    HardPity,
    Soft,
}
