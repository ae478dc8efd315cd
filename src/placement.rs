//! Rejection samplers for barriers and apples.
//!
//! Both samplers draw candidates until enough of them are accepted. Under a
//! configuration that leaves no room (arena too small for the requested
//! barrier lengths or counts) an unbounded budget never terminates, so
//! callers normally pass [`Budget::Attempts`].

use std::{collections::HashSet, ops::RangeInclusive};

use log::debug;
use rand::Rng;

use crate::error::{GameError, Result};
use crate::geometry::{intersects, line, Arena, Direction, Point};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Budget {
    Unbounded,
    Attempts(u64),
}

impl Budget {
    fn allows(self, attempts: u64) -> bool {
        match self {
            Budget::Unbounded => true,
            Budget::Attempts(max) => attempts < max,
        }
    }
}

pub struct BarrierRules {
    pub count: RangeInclusive<usize>,
    pub len: RangeInclusive<usize>,
    pub margin: i32,
}

/// Places a random number of straight barrier lines inside `arena` shrunk by
/// the margin. Lines never touch `keep_clear` or each other.
pub fn place_barriers<R: Rng>(
    rng: &mut R,
    arena: &Arena,
    rules: &BarrierRules,
    keep_clear: &HashSet<Point>,
    budget: Budget,
) -> Result<HashSet<Point>> {
    let area = arena.inset(rules.margin.abs());
    if area.is_empty() {
        return Err(GameError::EmptyArea { what: "barriers" });
    }

    let target = rng.gen_range(rules.count.clone());
    let mut barrier = HashSet::new();
    let mut placed = 0;
    let mut attempts = 0;

    while placed != target {
        if !budget.allows(attempts) {
            return Err(GameError::PlacementExhausted { what: "barriers", attempts });
        }
        attempts += 1;

        let candidate = line(
            Direction::random(rng),
            area.random_point(rng),
            rng.gen_range(rules.len.clone()),
        );

        if candidate.iter().all(|p| area.contains(*p))
            && !intersects(&candidate, keep_clear)
            && !intersects(&candidate, &barrier)
        {
            barrier.extend(candidate);
            placed += 1;
        }
    }

    debug!("placed {} barriers ({} cells) in {} attempts", placed, barrier.len(), attempts);
    Ok(barrier)
}

/// Scatters a random number of apples anywhere in `arena` except on `head`
/// or a barrier cell.
pub fn place_apples<R: Rng>(
    rng: &mut R,
    arena: &Arena,
    count: RangeInclusive<usize>,
    head: Point,
    barrier: &HashSet<Point>,
    budget: Budget,
) -> Result<HashSet<Point>> {
    if arena.is_empty() {
        return Err(GameError::EmptyArea { what: "apples" });
    }

    let target = rng.gen_range(count);
    let cells = arena.width() as usize * arena.height() as usize;
    let mut apples = HashSet::with_capacity(target.min(cells));
    let mut attempts = 0;

    while apples.len() != target {
        if !budget.allows(attempts) {
            return Err(GameError::PlacementExhausted { what: "apples", attempts });
        }
        attempts += 1;

        let p = arena.random_point(rng);
        if p != head && !barrier.contains(&p) {
            apples.insert(p);
        }
    }

    Ok(apples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn rules() -> BarrierRules {
        BarrierRules { count: 3..=5, len: 4..=8, margin: 1 }
    }

    #[test]
    fn barriers_stay_in_inset_and_avoid_snake() {
        let arena = Arena::from_size(40, 20);
        let inner = arena.inset(1);
        let snake: HashSet<Point> = line(Direction::Right, Point::new(0, 1), 15).into_iter().collect();

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let barrier = place_barriers(&mut rng, &arena, &rules(), &snake, Budget::Unbounded).unwrap();

            assert!(barrier.len() >= 4 * 3);
            assert!(barrier.iter().all(|p| inner.contains(*p)));
            assert!(!intersects(&snake, &barrier));
        }
    }

    #[test]
    fn negative_margin_is_treated_as_positive() {
        let arena = Arena::from_size(30, 30);
        let rules = BarrierRules { margin: -2, ..rules() };
        let mut rng = StdRng::seed_from_u64(7);
        let barrier = place_barriers(&mut rng, &arena, &rules, &HashSet::new(), Budget::Unbounded).unwrap();
        assert!(barrier.iter().all(|p| arena.inset(2).contains(*p)));
    }

    #[test]
    fn barrier_lines_do_not_overlap() {
        // With a fixed count and length, overlap would show up as missing cells.
        let arena = Arena::from_size(30, 30);
        let rules = BarrierRules { count: 4..=4, len: 5..=5, margin: 1 };
        let mut rng = StdRng::seed_from_u64(3);
        let barrier = place_barriers(&mut rng, &arena, &rules, &HashSet::new(), Budget::Unbounded).unwrap();
        assert_eq!(barrier.len(), 20);
    }

    #[test]
    fn impossible_barrier_hits_budget() {
        let arena = Arena::from_size(6, 6);
        let rules = BarrierRules { count: 1..=1, len: 10..=10, margin: 1 };
        let mut rng = StdRng::seed_from_u64(1);
        let err = place_barriers(&mut rng, &arena, &rules, &HashSet::new(), Budget::Attempts(500)).unwrap_err();
        assert!(matches!(err, GameError::PlacementExhausted { what: "barriers", attempts: 500 }));
    }

    #[test]
    fn margin_swallowing_arena_is_reported() {
        let arena = Arena::from_size(4, 4);
        let rules = BarrierRules { margin: 2, ..rules() };
        let mut rng = StdRng::seed_from_u64(1);
        let err = place_barriers(&mut rng, &arena, &rules, &HashSet::new(), Budget::Unbounded).unwrap_err();
        assert!(matches!(err, GameError::EmptyArea { .. }));
    }

    #[test]
    fn apples_avoid_head_and_barrier() {
        let arena = Arena::from_size(5, 5);
        let head = Point::new(2, 2);
        let barrier: HashSet<Point> = line(Direction::Down, Point::new(0, 0), 5).into_iter().collect();

        for seed in 0..30 {
            let mut rng = StdRng::seed_from_u64(seed);
            let apples = place_apples(&mut rng, &arena, 1..=3, head, &barrier, Budget::Unbounded).unwrap();

            assert!((1..=3).contains(&apples.len()));
            assert!(!apples.contains(&head));
            assert!(!intersects(&apples, &barrier));
            assert!(apples.iter().all(|p| arena.contains(*p)));
        }
    }

    #[test]
    fn apples_exhaust_when_no_free_cell() {
        let arena = Arena::from_size(2, 1);
        let head = Point::new(0, 0);
        let barrier: HashSet<Point> = [Point::new(1, 0)].iter().copied().collect();
        let mut rng = StdRng::seed_from_u64(9);
        let err = place_apples(&mut rng, &arena, 1..=1, head, &barrier, Budget::Attempts(50)).unwrap_err();
        assert!(matches!(err, GameError::PlacementExhausted { what: "apples", .. }));
    }

    #[test]
    fn oversized_apple_target_exhausts_instead_of_allocating() {
        let arena = Arena::from_size(10, 10);
        let n = usize::MAX / 2;
        let mut rng = StdRng::seed_from_u64(4);
        let err = place_apples(&mut rng, &arena, n..=n, Point::new(0, 0), &HashSet::new(), Budget::Attempts(1000))
            .unwrap_err();
        assert!(matches!(err, GameError::PlacementExhausted { what: "apples", attempts: 1000 }));
    }
}
