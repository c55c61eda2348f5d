// Recoil banking
//
// Holds the primary ion and every recoil spawned in its cascade until the
// driver gets to it. Strictly FIFO: a cascade is processed generation by
// generation, which keeps the processing order fixed for a given random
// stream and the stack depth flat however much the cascade branches.

use crate::ion::Ion;
use std::collections::VecDeque;

/// Work queue of ions waiting to be followed through the sample.
///
/// The bank owns every pending ion; popping transfers ownership to the
/// caller.
#[derive(Debug)]
pub struct IonBank {
    queue: VecDeque<Ion>,
}

impl IonBank {
    /// Create a new empty bank
    pub fn new() -> Self {
        IonBank {
            queue: VecDeque::new(),
        }
    }

    /// Seed the bank with a primary ion
    pub fn add_primary(&mut self, ion: Ion) {
        self.queue.push_back(ion);
    }

    /// Bank a recoil produced by a displacement
    pub fn bank_recoil(&mut self, ion: Ion) {
        self.queue.push_back(ion);
    }

    /// Next ion to follow, oldest first. `None` once the cascade is done.
    pub fn pop_ion(&mut self) -> Option<Ion> {
        self.queue.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

impl Default for IonBank {
    fn default() -> Self {
        Self::new()
    }
}
