//! Score engine: bill values, combos, penalties
//!
//! Scores are unsigned and every delta is clamped at zero.

use super::state::{FallingItem, Player};

/// Consecutive positive bills needed for the bonus
pub const COMBO_LENGTH: u32 = 3;
pub const COMBO_BONUS: i64 = 2;
pub const OBSTACLE_PENALTY: i64 = 1;
pub const GOLDEN_HOUR_FACTOR: i64 = 2;

/// What a bill collection did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillOutcome {
    /// Value applied before clamping (bonus excluded)
    pub value: i64,
    pub combo_bonus: bool,
}

/// Add a signed delta, flooring the result at zero
pub fn apply_delta(score: u32, delta: i64) -> u32 {
    (i64::from(score) + delta).clamp(0, i64::from(u32::MAX)) as u32
}

/// Final value of a bill for this player
pub fn bill_value(item: &FallingItem, player: &Player, golden_hour: bool) -> i64 {
    let golden = if golden_hour { GOLDEN_HOUR_FACTOR } else { 1 };
    i64::from(item.base_value)
        * i64::from(item.multiplier_tag)
        * player.effects.multiplier.factor()
        * golden
}

pub fn collect_bill(player: &mut Player, item: &FallingItem, golden_hour: bool) -> BillOutcome {
    let value = bill_value(item, player, golden_hour);
    player.score = apply_delta(player.score, value);
    player.stats.bills += 1;

    let mut combo_bonus = false;
    if value > 0 {
        player.combo += 1;
        if player.combo == COMBO_LENGTH {
            player.score = apply_delta(player.score, COMBO_BONUS);
            player.combo = 0;
            combo_bonus = true;
        }
    } else {
        player.combo = 0;
    }

    BillOutcome { value, combo_bonus }
}

pub fn collect_obstacle(player: &mut Player) {
    player.score = apply_delta(player.score, -OBSTACLE_PENALTY);
    player.stats.hits += 1;
    player.combo = 0;
}

pub fn collect_freeze(player: &mut Player) {
    player.combo = 0;
}

/// Move one point from `victim` to `thief` (victim floored at zero)
pub fn steal_point(thief: &mut Player, victim: &mut Player) {
    thief.score = apply_delta(thief.score, 1);
    victim.score = apply_delta(victim.score, -1);
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use proptest::prelude::*;

    use super::*;
    use crate::sim::effects::ScoreMultiplier;
    use crate::sim::state::{ItemKind, PlayerSlot};

    fn bill(base_value: i32, multiplier_tag: i32) -> FallingItem {
        let mut item = FallingItem::new(1, ItemKind::Bill, Vec2::ZERO, 150.0);
        item.base_value = base_value;
        item.multiplier_tag = multiplier_tag;
        item
    }

    #[test]
    fn test_three_positive_bills_award_bonus() {
        let mut player = Player::new(PlayerSlot::One, 100.0);
        assert!(!collect_bill(&mut player, &bill(1, 1), false).combo_bonus);
        assert!(!collect_bill(&mut player, &bill(1, 1), false).combo_bonus);
        assert_eq!(player.combo, 2);
        assert!(collect_bill(&mut player, &bill(1, 1), false).combo_bonus);
        assert_eq!(player.score, 3 + 2);
        assert_eq!(player.combo, 0);
        assert_eq!(player.stats.bills, 3);
    }

    #[test]
    fn test_negative_bill_breaks_combo() {
        let mut player = Player::new(PlayerSlot::One, 100.0);
        collect_bill(&mut player, &bill(1, 1), false);
        collect_bill(&mut player, &bill(1, 1), false);
        collect_bill(&mut player, &bill(-1, 1), false);
        assert_eq!(player.combo, 0);
        assert_eq!(player.score, 1);
        collect_bill(&mut player, &bill(1, 1), false);
        assert_eq!(player.combo, 1);
    }

    #[test]
    fn test_pitch_red_bill_costs_five() {
        let mut player = Player::new(PlayerSlot::One, 100.0);
        player.score = 7;
        let outcome = collect_bill(&mut player, &bill(-5, 1), false);
        assert_eq!(outcome.value, -5);
        assert_eq!(player.score, 2);
    }

    #[test]
    fn test_full_stack_is_ten() {
        // Golden hour x2 with a x5 multiplier on a plain +1 bill
        let mut player = Player::new(PlayerSlot::One, 100.0);
        player.effects.multiplier = ScoreMultiplier::X5;
        let outcome = collect_bill(&mut player, &bill(1, 1), true);
        assert_eq!(outcome.value, 10);

        let tagged = bill(1, 2);
        assert_eq!(bill_value(&tagged, &player, true), 20);
    }

    #[test]
    fn test_obstacle_and_freeze_reset_combo() {
        let mut player = Player::new(PlayerSlot::Two, 100.0);
        collect_bill(&mut player, &bill(1, 1), false);
        collect_obstacle(&mut player);
        assert_eq!(player.combo, 0);
        assert_eq!(player.score, 0);
        assert_eq!(player.stats.hits, 1);

        collect_obstacle(&mut player);
        assert_eq!(player.score, 0);

        collect_bill(&mut player, &bill(1, 1), false);
        collect_freeze(&mut player);
        assert_eq!(player.combo, 0);
        assert_eq!(player.score, 1);
    }

    #[test]
    fn test_steal_floors_victim() {
        let mut thief = Player::new(PlayerSlot::One, 100.0);
        let mut victim = Player::new(PlayerSlot::Two, 700.0);
        steal_point(&mut thief, &mut victim);
        assert_eq!(thief.score, 1);
        assert_eq!(victim.score, 0);
    }

    #[derive(Debug, Clone)]
    enum Pickup {
        Bill(i32, i32, bool),
        Obstacle,
        Freeze,
    }

    fn pickup_strategy() -> impl Strategy<Value = Pickup> {
        prop_oneof![
            (prop_oneof![Just(1), Just(-1), Just(-5)], 1..=2i32, any::<bool>())
                .prop_map(|(v, tag, golden)| Pickup::Bill(v, tag, golden)),
            Just(Pickup::Obstacle),
            Just(Pickup::Freeze),
        ]
    }

    proptest! {
        /// Score never goes negative and combo never reaches the bonus length
        #[test]
        fn prop_score_never_negative(
            seq in proptest::collection::vec(pickup_strategy(), 0..200),
            mult in prop_oneof![Just(ScoreMultiplier::X1), Just(ScoreMultiplier::X2), Just(ScoreMultiplier::X5)],
        ) {
            let mut player = Player::new(PlayerSlot::One, 100.0);
            player.effects.multiplier = mult;
            for pickup in seq {
                let before = player.score;
                match pickup {
                    Pickup::Bill(v, tag, golden) => {
                        let outcome = collect_bill(&mut player, &bill(v, tag), golden);
                        if outcome.value < 0 {
                            prop_assert_eq!(player.combo, 0);
                        }
                    }
                    Pickup::Obstacle => {
                        collect_obstacle(&mut player);
                        prop_assert!(player.score <= before);
                    }
                    Pickup::Freeze => {
                        collect_freeze(&mut player);
                        prop_assert_eq!(player.score, before);
                    }
                }
                prop_assert!(player.combo < COMBO_LENGTH);
            }
        }
    }
}
