use rand::RngCore;

use crate::catalog::Catalog;
use crate::model::World;

/// Context handed to the engine for every turn-end invocation and event hook.
///
/// The random source is injected so tests (and any future turn re-simulation)
/// can pin selection outcomes with a seeded generator.
pub struct TurnContext<'a> {
    pub world: &'a mut World,
    pub catalog: &'a Catalog,
    pub rng: &'a mut dyn RngCore,
}
