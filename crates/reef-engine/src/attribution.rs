use reef_core::{MoneyFp, PlayerId};
use std::collections::HashMap;

/// Splits `total_reward_fp` across a target's contributors in proportion
/// to damage dealt, in integer arithmetic, with the last contributor (by
/// damage descending, then stable player id ascending for ties) absorbing
/// the rounding residue so the split sums exactly.
///
/// Returns contributors ordered the same way the residue absorption used,
/// which is also the order `FishDeath` contributor records are emitted in.
pub fn distribute_reward(
    damage_by_player: &HashMap<PlayerId, i32>,
    total_reward_fp: MoneyFp,
) -> Vec<(PlayerId, MoneyFp)> {
    let total_damage: i64 = damage_by_player.values().map(|&d| d as i64).sum();
    if total_damage == 0 || damage_by_player.is_empty() {
        return Vec::new();
    }

    let mut contributors: Vec<(PlayerId, i32)> =
        damage_by_player.iter().map(|(&p, &d)| (p, d)).collect();
    contributors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let n = contributors.len();
    let mut rewards = Vec::with_capacity(n);
    let mut assigned = 0i64;
    for &(player, damage) in contributors.iter().take(n - 1) {
        let share = total_reward_fp * damage as i64 / total_damage;
        assigned += share;
        rewards.push((player, share));
    }
    let (last_player, _) = contributors[n - 1];
    rewards.push((last_player, total_reward_fp - assigned));
    rewards
}

#[cfg(test)]
mod tests {
    use super::*;
    use reef_core::{Player, ID};

    #[test]
    fn single_contributor_takes_entire_reward() {
        let mut map = HashMap::new();
        let p: PlayerId = ID::<Player>::default();
        map.insert(p, 40);
        let split = distribute_reward(&map, 9_000);
        assert_eq!(split, vec![(p, 9_000)]);
    }

    #[test]
    fn proportional_split_conserves_total_exactly() {
        let a: PlayerId = ID::<Player>::default();
        let b: PlayerId = ID::<Player>::default();
        let c: PlayerId = ID::<Player>::default();
        let mut map = HashMap::new();
        map.insert(a, 50);
        map.insert(b, 30);
        map.insert(c, 20);
        let split = distribute_reward(&map, 9_997);
        let sum: i64 = split.iter().map(|(_, r)| r).sum();
        assert_eq!(sum, 9_997);
        assert_eq!(split.len(), 3);
    }

    #[test]
    fn no_damage_yields_no_contributors() {
        let map: HashMap<PlayerId, i32> = HashMap::new();
        assert!(distribute_reward(&map, 1_000).is_empty());
    }

    #[test]
    fn higher_damage_contributor_sorts_first() {
        let small: PlayerId = ID::<Player>::default();
        let big: PlayerId = ID::<Player>::default();
        let mut map = HashMap::new();
        map.insert(small, 10);
        map.insert(big, 90);
        let split = distribute_reward(&map, 1_000);
        assert_eq!(split[0].0, big);
    }
}
