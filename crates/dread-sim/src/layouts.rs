//! Prebuilt encounter layouts.
//!
//! Each layout is a target start point and a list of placement commands.
//! Persistent agents use "<layout>/<name>" ids so a resolved agent stays
//! gone when the layout reloads.

use dread_core::commands::EncounterCommand;
use dread_core::director::{DirectorProfile, FleeProfile};
use dread_core::enums::{AgentArchetype, EncounterLayout};
use dread_core::types::{Rect, Vec2};

/// Where the target starts and what gets placed.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    pub target_start: Vec2,
    pub placements: Vec<EncounterCommand>,
}

/// Build the plan for a layout.
pub fn build_layout(layout: EncounterLayout) -> LayoutPlan {
    match layout {
        EncounterLayout::Graveyard => build_graveyard(),
        EncounterLayout::PumpkinPatch => build_pumpkin_patch(),
        EncounterLayout::ReaperLair => build_reaper_lair(),
    }
}

/// Two brawlers, a wrench and two archers, plus a fleeing grave spawner.
fn build_graveyard() -> LayoutPlan {
    LayoutPlan {
        target_start: Vec2::new(-15.0, 0.0),
        placements: vec![
            agent(AgentArchetype::Brawler, Vec2::new(0.0, 5.0), Some("graveyard/brawler_north")),
            agent(AgentArchetype::Brawler, Vec2::new(0.0, -5.0), Some("graveyard/brawler_south")),
            agent(AgentArchetype::Wrench, Vec2::new(8.0, 0.0), Some("graveyard/wrench")),
            agent(AgentArchetype::Archer, Vec2::new(12.0, 6.0), Some("graveyard/archer_north")),
            agent(AgentArchetype::Archer, Vec2::new(12.0, -6.0), Some("graveyard/archer_south")),
            EncounterCommand::PlaceDirector {
                position: Vec2::new(16.0, 0.0),
                profile: DirectorProfile {
                    spawn_archetype: AgentArchetype::Brawler,
                    spawn_interval_secs: 4.0,
                    population_cap: 3,
                    telegraph_secs: 1.0,
                    spawn_area: Some(Rect::from_center(
                        Vec2::new(14.0, 0.0),
                        Vec2::new(3.0, 6.0),
                    )),
                    flee: Some(FleeProfile::default()),
                },
            },
        ],
    }
}

/// Three pumpkins guarded by a sentinel, with a pumpkin spawner behind.
fn build_pumpkin_patch() -> LayoutPlan {
    LayoutPlan {
        target_start: Vec2::new(-15.0, 0.0),
        placements: vec![
            agent(AgentArchetype::Pumpkin, Vec2::new(5.0, 4.0), None),
            agent(AgentArchetype::Pumpkin, Vec2::new(5.0, -4.0), None),
            agent(AgentArchetype::Pumpkin, Vec2::new(10.0, 0.0), None),
            agent(AgentArchetype::Sentinel, Vec2::new(14.0, 0.0), Some("pumpkin_patch/sentinel")),
            EncounterCommand::PlaceDirector {
                position: Vec2::new(17.0, 0.0),
                profile: DirectorProfile {
                    spawn_archetype: AgentArchetype::Pumpkin,
                    spawn_interval_secs: 6.0,
                    population_cap: 2,
                    ..DirectorProfile::default()
                },
            },
        ],
    }
}

fn build_reaper_lair() -> LayoutPlan {
    LayoutPlan {
        target_start: Vec2::new(-12.0, 0.0),
        placements: vec![agent(
            AgentArchetype::Reaper,
            Vec2::new(10.0, 0.0),
            Some("reaper_lair/reaper"),
        )],
    }
}

fn agent(archetype: AgentArchetype, position: Vec2, persistence_id: Option<&str>) -> EncounterCommand {
    EncounterCommand::PlaceAgent {
        archetype,
        position,
        persistence_id: persistence_id.map(str::to_string),
    }
}
