//! Quest countdowns: one global timer plus one per counterpart, each seeded
//! to a randomized, game-speed-scaled value and decremented once per turn.
//!
//! A countdown that reaches exactly zero has "fired". The scheduler never
//! resets a fired countdown itself; the selector sets it back to unset only
//! after a successful assignment, so an empty candidate pool retries every
//! turn until something sticks.

use std::collections::BTreeMap;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::model::{FactionId, World};

/// No quests of either scope before this turn.
pub const FIRST_POSSIBLE_TURN: u32 = 30;
/// Width of the randomized window for the very first seed.
pub const FIRST_SEED_WINDOW: u32 = 20;
pub const GLOBAL_MIN_TURNS_BETWEEN: u32 = 40;
pub const INDIVIDUAL_MIN_TURNS_BETWEEN: u32 = 20;
/// Randomized spread added on top of the minimum gap when re-seeding.
pub const RESEED_WINDOW: u32 = 25;

pub const GLOBAL_MAX_ACTIVE: usize = 1;
pub const INDIVIDUAL_MAX_ACTIVE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Countdown {
    #[default]
    Unset,
    Armed(u32),
}

impl Countdown {
    pub fn is_unset(self) -> bool {
        self == Countdown::Unset
    }

    /// True once the countdown has run all the way down.
    pub fn fired(self) -> bool {
        self == Countdown::Armed(0)
    }

    fn decrement(&mut self) {
        if let Countdown::Armed(n) = self {
            *n = n.saturating_sub(1);
        }
    }
}

/// Countdown state for one quest-dispatching minor faction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    pub global: Countdown,
    /// Lazily created per known-alive major counterpart.
    pub individual: BTreeMap<FactionId, Countdown>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed unset countdowns, then decrement the rest. A countdown seeded
    /// this tick keeps its full value until the next tick, so a seed of `n`
    /// fires exactly `n` turns later.
    pub fn tick(&mut self, world: &World, rng: &mut dyn RngCore) {
        if world.turn < FIRST_POSSIBLE_TURN {
            return;
        }

        if self.global.is_unset() {
            self.global = Countdown::Armed(seed_value(world, rng, GLOBAL_MIN_TURNS_BETWEEN));
        } else {
            self.global.decrement();
        }

        for major in world.alive_majors().map(|f| f.id).collect::<Vec<_>>() {
            let countdown = self.individual.entry(major).or_default();
            if countdown.is_unset() {
                *countdown =
                    Countdown::Armed(seed_value(world, rng, INDIVIDUAL_MIN_TURNS_BETWEEN));
            } else {
                countdown.decrement();
            }
        }
    }

    pub fn individual_for(&self, id: FactionId) -> Countdown {
        self.individual.get(&id).copied().unwrap_or_default()
    }

    pub fn reset_global(&mut self) {
        self.global = Countdown::Unset;
    }

    pub fn reset_individual(&mut self, id: FactionId) {
        self.individual.insert(id, Countdown::Unset);
    }

    pub fn clear(&mut self) {
        self.global = Countdown::Unset;
        self.individual.clear();
    }
}

fn seed_value(world: &World, rng: &mut dyn RngCore, min_between: u32) -> u32 {
    let raw = if world.turn == FIRST_POSSIBLE_TURN {
        rng.random_range(0..FIRST_SEED_WINDOW)
    } else {
        min_between + rng.random_range(0..RESEED_WINDOW)
    };
    world.scaled(raw)
}
