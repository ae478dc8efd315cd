/// Cyclic cursor over a fixed, non-empty list of options.
#[derive(Clone, Debug)]
pub struct Toggle<T> {
    options: Vec<T>,
    index: usize,
}

/// Result of [`Toggle::jump_to`]. A miss leaves the cursor where it was.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JumpOutcome {
    Moved(usize),
    NotFound,
}

impl<T: Copy + PartialEq> Toggle<T> {
    pub fn new(options: Vec<T>) -> Self {
        assert!(!options.is_empty(), "a toggle needs at least one option");
        Toggle { options, index: 0 }
    }

    pub fn current(&self) -> T {
        self.options[self.index]
    }

    #[cfg(test)]
    pub(crate) fn index(&self) -> usize {
        self.index
    }

    #[cfg(test)]
    pub(crate) fn options(&self) -> &[T] {
        &self.options
    }

    /// Moves to the next option, wrapping to the first after the last.
    pub fn advance(&mut self) -> T {
        self.index = (self.index + 1) % self.options.len();
        self.current()
    }

    pub fn jump_to(&mut self, value: T) -> JumpOutcome {
        match self.options.iter().position(|o| *o == value) {
            Some(i) => {
                self.index = i;
                JumpOutcome::Moved(i)
            }
            None => JumpOutcome::NotFound,
        }
    }
}
