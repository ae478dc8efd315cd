use std::collections::{HashMap, HashSet, VecDeque};
use std::ops::RangeInclusive;

use log::{info, warn};
use rand::{rngs::StdRng, SeedableRng};

use crate::config::GameConfig;
use crate::error::Result;
use crate::geometry::{line, Arena, Direction, Point};
use crate::placement::{place_apples, place_barriers, BarrierRules, Budget};

const INITIAL_DIRECTION: Direction = Direction::Right;

pub struct Snake {
    // Tail first, head last.
    body: VecDeque<Point>,
    // How many body segments sit on each cell.
    cells: HashMap<Point, usize>,
    direction: Direction,
    arena: Arena,
    apples: HashSet<Point>,
    apples_range: RangeInclusive<usize>,
    barrier: HashSet<Point>,
    budget: Budget,
    rng: StdRng,
}

impl Snake {
    /// Lays the body out from the arena's top-left corner heading right, then
    /// places barriers (if enabled) and the first batch of apples.
    pub fn new(arena: Arena, config: &GameConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut snake = Snake {
            body: VecDeque::new(),
            cells: HashMap::new(),
            direction: INITIAL_DIRECTION,
            arena,
            apples: HashSet::new(),
            apples_range: config.apples.clone(),
            barrier: HashSet::new(),
            budget: config.budget,
            rng,
        };

        for p in line(snake.direction, arena.min, config.body_len) {
            snake.push_head(p);
        }

        if config.use_barrier {
            // Keep the start and the stretch ahead of it free.
            let head = snake.head();
            let mut keep_clear: HashSet<Point> = snake.body.iter().copied().collect();
            keep_clear.extend(line(snake.direction, head.step(snake.direction), snake.len() * 2));

            let rules = BarrierRules {
                count: config.barrier_count.clone(),
                len: config.barrier_len_for(&arena),
                margin: config.barrier_margin,
            };
            snake.barrier = place_barriers(&mut snake.rng, &arena, &rules, &keep_clear, snake.budget)?;
        }

        snake.apples = snake.sample_apples()?;

        info!(
            "new snake: arena {}x{}, {} barrier cells, {} apples",
            arena.width(),
            arena.height(),
            snake.barrier.len(),
            snake.apples.len()
        );

        Ok(snake)
    }

    pub fn head(&self) -> Point {
        // The body is never empty.
        self.body[self.body.len() - 1]
    }

    pub fn tail(&self) -> Point {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn body(&self) -> impl Iterator<Item = &Point> {
        self.body.iter()
    }

    pub fn apples(&self) -> &HashSet<Point> {
        &self.apples
    }

    pub fn barrier(&self) -> &HashSet<Point> {
        &self.barrier
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Only turns onto the other axis; same-axis requests, including reversing,
    /// are ignored.
    pub fn set_direction(&mut self, requested: Direction) {
        if requested.is_vertical() != self.direction.is_vertical() {
            self.direction = requested;
        }
    }

    /// Shifts the whole body one cell forward, keeping its length.
    pub fn move_step(&mut self) {
        let new_head = self.head().step(self.direction);
        self.pop_tail();
        self.push_head(new_head);
    }

    /// Eats the apple under the head, if any. An apple set that is already
    /// empty gets refilled when `refill` is set.
    pub fn hit(&mut self, refill: bool, auto_extend: bool) -> bool {
        if self.apples.is_empty() {
            if refill {
                match self.sample_apples() {
                    Ok(apples) => self.apples = apples,
                    Err(e) => warn!("could not refill apples: {}", e),
                }
            }
            return false;
        }

        let head = self.head();
        if !self.apples.remove(&head) {
            return false;
        }

        if auto_extend {
            self.extend();
        }
        true
    }

    /// Adds a segment behind the tail, continuing the line of the last two
    /// segments.
    pub fn extend(&mut self) {
        let back = self.tail();
        let new_tail = match self.body.get(1) {
            Some(prev) => Point::new(2 * back.x - prev.x, 2 * back.y - prev.y),
            None => back.step(self.direction.opposite()),
        };

        self.body.push_front(new_tail);
        *self.cells.entry(new_tail).or_insert(0) += 1;
    }

    /// True when the head left the arena, sits on a barrier, or overlaps the
    /// rest of the body.
    pub fn crash(&self) -> bool {
        let head = self.head();
        !self.arena.contains(head)
            || self.barrier.contains(&head)
            || self.cells.get(&head).copied().unwrap_or(0) > 1
    }

    ///////////////////////////////////////////////////////////////////////////

    fn sample_apples(&mut self) -> Result<HashSet<Point>> {
        let head = self.head();
        place_apples(
            &mut self.rng,
            &self.arena,
            self.apples_range.clone(),
            head,
            &self.barrier,
            self.budget,
        )
    }

    fn push_head(&mut self, p: Point) {
        self.body.push_back(p);
        *self.cells.entry(p).or_insert(0) += 1;
    }

    fn pop_tail(&mut self) {
        if let Some(p) = self.body.pop_front() {
            if let Some(n) = self.cells.get_mut(&p) {
                *n -= 1;
                if *n == 0 {
                    self.cells.remove(&p);
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn set_apples(&mut self, apples: &[Point]) {
        self.apples = apples.iter().copied().collect();
    }
}
