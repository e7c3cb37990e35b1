//! Movement integration: advances every pathfinder by one tick.

use hecs::World;

use dread_core::constants::DT;

use crate::nav::ArenaNav;

pub fn run(world: &mut World) {
    for (_entity, nav) in world.query_mut::<&mut ArenaNav>() {
        nav.advance(DT);
    }
}
