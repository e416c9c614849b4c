/// The capped reroll currency of a hero.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Fate {
    current: u32,
    max: u32,
}

impl Fate {
    pub fn new(current: u32, max: u32) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Adds fate up to the cap and returns how much was actually gained.
    pub fn gain(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.max - self.current);
        self.current += gained;
        gained
    }

    /// Spends exactly `amount`, or nothing if there is not enough fate.
    pub fn spend(&mut self, amount: u32) -> bool {
        if self.current < amount {
            return false;
        }
        self.current -= amount;
        true
    }

    /// Removes up to `amount` and returns how much was lost.
    pub fn drain(&mut self, amount: u32) -> u32 {
        let drained = amount.min(self.current);
        self.current -= drained;
        drained
    }
}
