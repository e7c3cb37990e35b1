//! Encounter engine: the core of the simulation.
//!
//! `EncounterEngine` owns the hecs ECS world, processes host commands,
//! runs all systems, and produces `EncounterSnapshot`s. Completely headless,
//! enabling deterministic testing.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use dread_agent_ai::director::EncounterDirector;
use dread_core::commands::EncounterCommand;
use dread_core::constants::DT;
use dread_core::enums::EncounterLayout;
use dread_core::error::ConfigError;
use dread_core::events::PresentationEvent;
use dread_core::session::Session;
use dread_core::state::EncounterSnapshot;
use dread_core::types::{SimTime, Vec2};

use crate::components::TargetState;
use crate::config::EncounterConfig;
use crate::context::{IdAllocator, SessionPolicy, SimContext};
use crate::layouts;
use crate::systems;
use crate::systems::contacts::ContactTracker;
use crate::world_setup;

/// The encounter engine. Owns the ECS world and all encounter state.
pub struct EncounterEngine {
    world: World,
    config: EncounterConfig,
    time: SimTime,
    paused: bool,
    rng: ChaCha8Rng,
    session: Session,
    policy: SessionPolicy,
    target: TargetState,
    layout: Option<EncounterLayout>,
    /// Where the target returns on reload.
    spawn_point: Vec2,
    /// Placement commands replayed on reload.
    placements: Vec<EncounterCommand>,
    ids: IdAllocator,
    contacts: ContactTracker,
    command_queue: VecDeque<EncounterCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    presentation: Vec<PresentationEvent>,
}

impl EncounterEngine {
    /// Create an empty encounter. Fails if the config does not validate.
    pub fn new(config: EncounterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let session = Session::new(config.fear.clone())?;
        let target = TargetState::new(config.arena.clamp(config.target_start), config.target_radius);
        Ok(Self {
            world: World::new(),
            time: SimTime::default(),
            paused: false,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            session,
            policy: SessionPolicy::new(config.overflow_policy),
            spawn_point: target.position,
            target,
            layout: None,
            placements: Vec::new(),
            ids: IdAllocator::default(),
            contacts: ContactTracker::default(),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            presentation: Vec::new(),
            config,
        })
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: EncounterCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = EncounterCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the encounter by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> EncounterSnapshot {
        self.process_commands();

        if !self.paused {
            self.run_systems();
            self.time.advance();
        }

        if self.policy.take_reload_request() {
            self.reload();
        }

        let presentation = std::mem::take(&mut self.presentation);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.layout,
            &self.target,
            &self.session,
            presentation,
        )
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn target(&self) -> TargetState {
        self.target
    }

    pub fn layout(&self) -> Option<EncounterLayout> {
        self.layout
    }

    pub fn config(&self) -> &EncounterConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Split borrows of the engine into a system context plus the world.
    fn with_context<R>(&mut self, f: impl FnOnce(&mut World, &mut SimContext<'_>) -> R) -> R {
        let mut ctx = SimContext {
            config: &self.config,
            target: self.target,
            rng: &mut self.rng,
            session: &mut self.session,
            policy: &mut self.policy,
            ids: &mut self.ids,
            contacts: &mut self.contacts,
            presentation: &mut self.presentation,
        };
        f(&mut self.world, &mut ctx)
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: EncounterCommand) {
        match command {
            EncounterCommand::MoveTarget { position } => {
                self.target.position = self.config.arena.clamp(position);
            }
            EncounterCommand::SetTargetActive { active } => {
                self.target.active = active;
                if !active {
                    self.contacts.clear();
                }
            }
            EncounterCommand::Pause => self.paused = true,
            EncounterCommand::Resume => self.paused = false,
            EncounterCommand::CollectKey { key_id } => {
                self.session.collect_key(&key_id);
            }
            EncounterCommand::LoadLayout { layout } => {
                let plan = layouts::build_layout(layout);
                tracing::info!(?layout, placements = plan.placements.len(), "layout loaded");
                self.layout = Some(layout);
                self.spawn_point = self.config.arena.clamp(plan.target_start);
                self.placements = plan.placements;
                self.reload();
            }
            EncounterCommand::PlaceAgent { .. } | EncounterCommand::PlaceDirector { .. } => {
                if self.place(&command) {
                    self.placements.push(command);
                }
            }
            EncounterCommand::DamageAgent { agent, amount } => {
                let found = self.with_context(|world, ctx| {
                    systems::agents::with_agent(world, ctx, agent, |controller, env| {
                        controller.take_damage(amount, env)
                    })
                });
                if !found {
                    tracing::debug!(agent = agent.0, "damage for unknown agent ignored");
                }
            }
            EncounterCommand::DestroyDirector { director } => {
                let Some(entity) = world_setup::find_director(&self.world, director) else {
                    return;
                };
                if let Ok(spawner) = self.world.query_one_mut::<&mut EncounterDirector>(entity) {
                    spawner.deactivate();
                }
            }
            EncounterCommand::ReportContact {
                subject,
                category,
                phase,
            } => {
                self.with_context(|world, ctx| {
                    systems::contacts::report(world, ctx, subject, category, phase)
                });
            }
        }
    }

    /// Spawn one placement. Returns false if the placement is rejected.
    fn place(&mut self, command: &EncounterCommand) -> bool {
        match command {
            EncounterCommand::PlaceAgent {
                archetype,
                position,
                persistence_id,
            } => {
                self.with_context(|world, ctx| {
                    world_setup::spawn_agent(
                        world,
                        ctx,
                        *archetype,
                        *position,
                        persistence_id.clone(),
                        None,
                    )
                });
                true
            }
            EncounterCommand::PlaceDirector { position, profile } => {
                if let Err(error) = profile.validate() {
                    tracing::warn!(%error, "director placement rejected");
                    return false;
                }
                self.with_context(|world, ctx| {
                    world_setup::spawn_director(world, ctx, *position, profile.clone())
                });
                true
            }
            _ => false,
        }
    }

    /// Clear the arena and replay the placement log. Resolved agents stay gone.
    fn reload(&mut self) {
        self.world.clear();
        self.contacts.clear();
        self.target.position = self.spawn_point;
        let placements = std::mem::take(&mut self.placements);
        for command in &placements {
            self.place(command);
        }
        self.placements = placements;
        tracing::info!(
            layout = ?self.layout,
            resolved = self.session.registry.len(),
            "encounter reloaded"
        );
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let detect_contacts = self.config.detect_contacts;
        self.with_context(|world, ctx| {
            // 1. Directors (telegraphs, spawns, flee)
            systems::directors::run(world, ctx);
            // 2. Agent/target contact begins
            if detect_contacts {
                systems::contacts::run(world, ctx);
            }
            // 3. Agent AI
            systems::agents::run(world, ctx);
        });
        // 4. Movement integration
        systems::movement::run(&mut self.world);
        self.with_context(|world, ctx| {
            // 5. Projectile flight and contacts
            systems::projectiles::run(world, ctx);
            // 6. Hazard occupancy, damage, expiry
            systems::hazards::run(world, ctx);
        });
        // 7. Fear meter smoothing and decay
        self.session.fear.tick(DT);
        // 8. Cleanup
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
    }
}
