use std::{thread::sleep, time::Duration};

use log::{debug, info};

use crate::config::{speed_presets, GameConfig};
use crate::error::Result;
use crate::geometry::{Arena, Direction};
use crate::snake::Snake;
use crate::term::{Key, Screen};
use crate::toggle::{JumpOutcome, Toggle};

const BARRIER_CHAR: char = 'x';
const APPLE_CHAR: char = '+';
const SNAKE_BODY_CHAR: char = 'o';

/// Waits out the rest of a tick.
pub trait Scheduler {
    fn sleep(&mut self, duration: Duration);
}

pub struct ThreadSleep;

impl Scheduler for ThreadSleep {
    fn sleep(&mut self, duration: Duration) {
        sleep(duration);
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    Running,
    Paused,
    GameOver,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndReason {
    Quit,
    Interrupted,
    /// The terminal changed size; the arena is fixed for the session.
    Resized,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub reason: EndReason,
    pub score: u32,
    pub crashed: bool,
}

/// What a single tick asks the loop to do next.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Crashed,
    End(EndReason),
}

pub struct SnakeGame<S: Screen, C: Scheduler> {
    screen: S,
    clock: C,
    snake: Snake,
    running: Toggle<bool>,
    speed: Toggle<Duration>,
    score: u32,
    crashed: bool,
}

impl<S: Screen, C: Scheduler> SnakeGame<S, C> {
    /// Sizes the arena to the whole screen and builds the snake, barriers and
    /// apples for it.
    pub fn new(screen: S, clock: C, config: &GameConfig) -> Result<Self> {
        let (width, height) = screen.size();
        let snake = Snake::new(Arena::from_size(width, height), config)?;

        let mut speed = Toggle::new(speed_presets());
        if let Some(initial) = config.initial_speed {
            if speed.jump_to(initial) == JumpOutcome::NotFound {
                debug!("{:?} is not a speed preset, keeping {:?}", initial, speed.current());
            }
        }

        Ok(SnakeGame {
            screen,
            clock,
            snake,
            running: Toggle::new(vec![true, false]),
            speed,
            score: 0,
            crashed: false,
        })
    }

    pub fn state(&self) -> State {
        if self.crashed {
            State::GameOver
        } else if self.running.current() {
            State::Running
        } else {
            State::Paused
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn speed(&self) -> Duration {
        self.speed.current()
    }

    #[cfg(test)]
    pub(crate) fn screen(&self) -> &S {
        &self.screen
    }

    /// Runs until the player quits, either mid-game or from the game over
    /// screen.
    pub fn play(&mut self) -> Result<Outcome> {
        self.screen.set_cursor_visible(false)?;

        loop {
            match self.tick()? {
                Flow::Continue => {}
                Flow::Crashed => break,
                Flow::End(reason) => return Ok(self.outcome(reason)),
            }
        }

        let reason = self.game_over()?;
        Ok(self.outcome(reason))
    }

    /// One pass of the main loop: draw, read a key, step the snake, sleep.
    pub fn tick(&mut self) -> Result<Flow> {
        let paused = self.state() == State::Paused;

        self.render()?;
        if paused {
            self.show_message(&format!(" Paused. Score: {} ", self.score));
        }
        self.screen.flush()?;

        let press = self.screen.read_key(paused)?;

        match press {
            Some(Key::Resize) => return Ok(Flow::End(EndReason::Resized)),
            Some(Key::Interrupt) => return Ok(Flow::End(EndReason::Interrupted)),
            Some(Key::Char('q')) | Some(Key::Char('Q')) => return Ok(Flow::End(EndReason::Quit)),
            Some(Key::Char(' ')) => {
                let running = self.running.advance();
                debug!("{}", if running { "resumed" } else { "paused" });
            }
            Some(Key::Char('s')) | Some(Key::Char('S')) => {
                let speed = self.speed.advance();
                debug!("tick now {:?}", speed);
            }
            _ => {}
        }

        if self.state() == State::Running {
            match press {
                Some(Key::Up) => self.snake.set_direction(Direction::Up),
                Some(Key::Down) => self.snake.set_direction(Direction::Down),
                Some(Key::Left) => self.snake.set_direction(Direction::Left),
                Some(Key::Right) => self.snake.set_direction(Direction::Right),
                _ => {}
            }

            self.snake.move_step();

            if self.snake.hit(true, true) {
                self.score += 1;
                debug!("apple eaten at {:?}, score {}", self.snake.head(), self.score);
            }

            if self.snake.crash() {
                info!("crashed at {:?} with score {}", self.snake.head(), self.score);
                self.crashed = true;
                return Ok(Flow::Crashed);
            }
        }

        let timing = self.tick_duration();
        self.clock.sleep(timing);

        Ok(Flow::Continue)
    }

    /// The current preset, stretched on the vertical axis since terminal
    /// cells are taller than they are wide.
    pub fn tick_duration(&self) -> Duration {
        let timing = self.speed();
        if !self.snake().direction().is_vertical() {
            return timing;
        }

        let (width, height) = self.screen.size();
        timing.mul_f64(height as f64 / width as f64 + 1.0)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn game_over(&mut self) -> Result<EndReason> {
        let msg = format!(" Game over! Score: {} ", self.score);

        loop {
            self.show_message(&msg);
            self.screen.flush()?;

            match self.screen.read_key(true)? {
                Some(Key::Char('q')) | Some(Key::Char('Q')) => return Ok(EndReason::Quit),
                Some(Key::Interrupt) => return Ok(EndReason::Interrupted),
                _ => {}
            }
        }
    }

    fn render(&mut self) -> Result<()> {
        self.screen.clear()?;

        for p in self.snake.barrier() {
            self.screen.draw_char(p.x, p.y, BARRIER_CHAR, false);
        }
        for p in self.snake.apples() {
            self.screen.draw_char(p.x, p.y, APPLE_CHAR, false);
        }
        for p in self.snake.body() {
            self.screen.draw_char(p.x, p.y, SNAKE_BODY_CHAR, false);
        }

        Ok(())
    }

    fn show_message(&mut self, msg: &str) {
        let (width, height) = self.screen.size();
        let x = width as i32 / 2 - msg.chars().count() as i32 / 2;
        let y = height as i32 / 2 + 1;
        self.screen.draw_str(x, y, msg, true);
    }

    fn outcome(&self, reason: EndReason) -> Outcome {
        info!("session ended ({:?}), score {}", reason, self.score());
        Outcome { reason, score: self.score(), crashed: self.crashed }
    }

    #[cfg(test)]
    pub(crate) fn snake_mut(&mut self) -> &mut Snake {
        &mut self.snake
    }
}
