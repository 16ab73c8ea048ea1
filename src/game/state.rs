//! Game state machine
//!
//! Owns all game data and routes per-frame updates through the current
//! `GameState`. The dispatcher holds the canonical enemy list and the
//! target selection; the combat manager works off handles it hands out.

use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::combat::{entity_tile, is_alive, CombatManager};
use crate::data::load_mutation_catalog;
use crate::ecs::{Enemy, Health, MutationState, StatusEffects, StatusKind, TilePos, WorldPos};
use crate::entities::{spawn_player, spawn_tiered_pack};
use crate::mutations::{mutation_choices, spend_mutation_point, SelectionState, CHOICE_COUNT};
use crate::services::{GameServices, SurvivalEvent};
use crate::world::{find_path, Terrain, WorldGrid};

/// Seconds between the player's death and the game-over screen
pub const DEATH_TO_GAME_OVER_SECS: f32 = 2.0;

/// Lines kept in the rolling display log
pub const DISPLAY_LOG_LINES: usize = 5;

const GRID_WIDTH: i32 = 48;
const GRID_HEIGHT: i32 = 32;

const PLAYER_SPAWN: TilePos = TilePos { x: 8, y: 8 };
const ENEMY_SPAWNS: [TilePos; 4] = [
    TilePos { x: 24, y: 8 },
    TilePos { x: 34, y: 14 },
    TilePos { x: 16, y: 24 },
    TilePos { x: 38, y: 26 },
];

/// All possible game states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Exploring or fighting on the surface
    Playing,
    /// Spending mutation points in the modal overlay
    MutationSelect,
    /// The player is dead
    GameOver,
    /// Update processing suspended
    Paused,
}

/// The main game struct that holds all game data
pub struct Game {
    state: GameState,
    world: World,
    grid: WorldGrid,
    rng: StdRng,
    services: GameServices,
    combat: CombatManager,
    player: Entity,
    /// Canonical enemy list; the combat manager holds a working copy
    enemies: Vec<Entity>,
    /// Enemies whose deaths have already been settled with the services
    settled_dead: HashSet<Entity>,
    /// Pending mutation choices while in MutationSelect
    selection: Option<SelectionState>,
    /// Enemy the player has clicked as their target
    selected_target: Option<Entity>,
    /// Rolling display buffer mirroring the combat log
    display_log: VecDeque<String>,
    /// Seconds since the player's death was first observed
    death_timer: Option<f32>,
    quit_requested: bool,
}

impl Game {
    /// Create a new game with a random session seed
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Create a new game with a fixed seed (reproducible sessions and tests)
    pub fn with_seed(seed: u64) -> Self {
        let services = GameServices::new(load_mutation_catalog());
        let mut rng = StdRng::seed_from_u64(seed);
        let (world, grid, player, enemies) = build_session(&mut rng);
        let combat = CombatManager::new(player, enemies.clone());

        let mut game = Self {
            state: GameState::Playing,
            world,
            grid,
            rng,
            services,
            combat,
            player,
            enemies,
            settled_dead: HashSet::new(),
            selection: None,
            selected_target: None,
            display_log: VecDeque::new(),
            death_timer: None,
            quit_requested: false,
        };
        game.push_log("You wake beneath the ash.");
        game
    }

    /// Full new-game reconstruction: fresh world, entities, combat manager,
    /// cleared logs, selection, and timers. Services reset to a blank slate.
    pub fn new_game(&mut self) {
        log::info!("Starting a new game");
        self.services.reset();
        let (world, grid, player, enemies) = build_session(&mut self.rng);
        self.world = world;
        self.grid = grid;
        self.player = player;
        self.combat = CombatManager::new(player, enemies.clone());
        self.enemies = enemies;
        self.settled_dead.clear();
        self.selection = None;
        self.selected_target = None;
        self.display_log.clear();
        self.death_timer = None;
        self.set_state(GameState::Playing);
        self.push_log("You wake beneath the ash.");
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut WorldGrid {
        &mut self.grid
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    pub fn enemies(&self) -> &[Entity] {
        &self.enemies
    }

    pub fn combat(&self) -> &CombatManager {
        &self.combat
    }

    pub fn services(&self) -> &GameServices {
        &self.services
    }

    pub fn selection(&self) -> Option<&SelectionState> {
        self.selection.as_ref()
    }

    pub fn selected_target(&self) -> Option<Entity> {
        self.selected_target
    }

    pub fn display_log(&self) -> &VecDeque<String> {
        &self.display_log
    }

    /// Whether the death grace window is running
    pub fn is_dying(&self) -> bool {
        self.death_timer.is_some()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    /// Tiles the player can see, widened by Night Eye
    pub fn vision_radius(&self) -> i32 {
        let night_eye = self
            .world
            .get::<&MutationState>(self.player)
            .map(|m| m.level(crate::mutations::MutationKind::NightEye))
            .unwrap_or(0);
        8 + 2 * night_eye as i32
    }

    fn set_state(&mut self, state: GameState) {
        log::debug!("State transition: {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    // =========================================================================
    // Per-frame update dispatch
    // =========================================================================

    /// Route the frame's update to the handler for the current state
    pub fn update(&mut self, delta: Duration) {
        match self.state {
            GameState::Playing => self.update_playing(delta.as_secs_f32()),
            // Modal, paused, and terminal states do not advance the world
            GameState::MutationSelect | GameState::Paused | GameState::GameOver => {}
        }
    }

    fn update_playing(&mut self, dt: f32) {
        // Death grace window: fully frozen except for the timer itself
        if let Some(timer) = self.death_timer.as_mut() {
            *timer += dt;
            if *timer >= DEATH_TO_GAME_OVER_SECS {
                self.combat.force_end_combat();
                self.drain_combat_log();
                self.death_timer = None;
                self.set_state(GameState::GameOver);
            }
            return;
        }

        if !is_alive(&self.world, self.player) {
            self.death_timer = Some(0.0);
            self.push_log("Everything goes dark.");
            return;
        }

        self.combat.update(&mut self.world, &self.grid, &mut self.rng);
        self.drain_combat_log();
        self.settle_new_deaths();

        if !self.combat.in_combat() {
            self.tick_exploration(dt);
        }

        // A dead or respawned-away target is no longer a target
        if let Some(target) = self.selected_target {
            if !is_alive(&self.world, target) {
                self.selected_target = None;
            }
        }
    }

    /// Real-time effects that only run while exploring
    fn tick_exploration(&mut self, dt: f32) {
        let dot = self
            .world
            .get::<&mut StatusEffects>(self.player)
            .map(|mut s| s.tick_time(dt))
            .unwrap_or(0.0);
        if dot > 0.0 {
            if let Ok(mut health) = self.world.get::<&mut Health>(self.player) {
                health.take_damage(dot);
            }
        }

        if let Some(SurvivalEvent::Soaked) = self.services.survival.tick(dt) {
            if let Ok(mut statuses) = self.world.get::<&mut StatusEffects>(self.player) {
                statuses.add_effect(StatusKind::Wet, 20.0, 0.0);
            }
            self.push_log("Ash rain soaks you through.");
        }
    }

    // =========================================================================
    // Player actions (Playing)
    // =========================================================================

    /// Move one tile, or bump-attack an adjacent enemy in combat
    pub fn player_move_dir(&mut self, dx: i32, dy: i32) {
        if self.state != GameState::Playing || self.death_timer.is_some() {
            return;
        }
        let Some(tile) = entity_tile(&self.world, self.player) else {
            return;
        };
        let dest = TilePos::new(tile.x + dx, tile.y + dy);

        if self.combat.in_combat() {
            if let Some(enemy) = self.live_enemy_at(dest) {
                self.selected_target = Some(enemy);
                self.combat.player_attack(&mut self.world, &mut self.rng, enemy);
            } else {
                self.combat.player_move(&mut self.world, &self.grid, dest);
            }
            self.drain_combat_log();
            self.settle_new_deaths();
            return;
        }

        // Free exploration movement; Gills open the water
        let passable = self.grid.is_passable(dest)
            || (self.grid.terrain(dest) == Some(Terrain::Water) && self.player_has_gills());
        if passable && self.live_enemy_at(dest).is_none() {
            if let Ok(mut pos) = self.world.get::<&mut WorldPos>(self.player) {
                *pos = dest.center();
            }
        }
    }

    /// Click routing: enemies get targeted (and attacked when in reach on
    /// the player's turn); open ground is a move request.
    pub fn handle_world_click(&mut self, tile: TilePos) {
        if self.state != GameState::Playing || self.death_timer.is_some() {
            return;
        }

        if let Some(enemy) = self.live_enemy_at(tile) {
            self.selected_target = Some(enemy);
            if self.combat.in_combat() && self.combat.is_player_turn() {
                let in_reach = entity_tile(&self.world, self.player)
                    .map(|p| p.manhattan(&tile) <= 1)
                    .unwrap_or(false);
                if in_reach {
                    self.combat.player_attack(&mut self.world, &mut self.rng, enemy);
                    self.drain_combat_log();
                    self.settle_new_deaths();
                }
            }
            return;
        }

        // Ground click: step along a path toward the tile
        let Some(player_tile) = entity_tile(&self.world, self.player) else {
            return;
        };
        let Some(path) = find_path(&self.grid, player_tile, tile) else {
            return;
        };
        let Some(&step) = path.get(1) else {
            return;
        };
        if self.combat.in_combat() {
            self.combat.player_move(&mut self.world, &self.grid, step);
            self.drain_combat_log();
        } else if self.live_enemy_at(step).is_none() {
            if let Ok(mut pos) = self.world.get::<&mut WorldPos>(self.player) {
                *pos = step.center();
            }
        }
    }

    /// Hand the rest of the combat turn to the enemies
    pub fn end_turn(&mut self) {
        if self.state != GameState::Playing || self.death_timer.is_some() {
            return;
        }
        self.combat.end_player_turn();
    }

    // =========================================================================
    // Mutation selection flow
    // =========================================================================

    /// Open the mutation overlay.
    ///
    /// Only opens when a point or free pick is available and at least one
    /// eligible mutation exists; points are offered before free picks.
    pub fn open_mutation_select(&mut self) -> bool {
        if self.state != GameState::Playing || self.death_timer.is_some() {
            return false;
        }
        let Ok(mutations) = self.world.get::<&MutationState>(self.player).map(|m| (*m).clone())
        else {
            return false;
        };
        if !mutations.can_spend() {
            return false;
        }

        let free_pick = mutations.points == 0;
        // A free pick surfaces the whole eligible catalog
        let n = if free_pick {
            self.services.mutations.len()
        } else {
            CHOICE_COUNT
        };
        let choices = mutation_choices(&self.services.mutations, &mutations, n, &mut self.rng);
        if choices.is_empty() {
            return false;
        }

        self.selection = Some(SelectionState::new(choices, free_pick));
        self.set_state(GameState::MutationSelect);
        true
    }

    pub fn selection_next(&mut self) {
        if let Some(sel) = self.selection.as_mut() {
            sel.next();
        }
    }

    pub fn selection_prev(&mut self) {
        if let Some(sel) = self.selection.as_mut() {
            sel.prev();
        }
    }

    /// Numeric quick-select into a fixed slot
    pub fn selection_jump(&mut self, slot: usize) {
        if let Some(sel) = self.selection.as_mut() {
            sel.jump_to(slot);
        }
    }

    /// Apply the highlighted mutation and close the overlay.
    ///
    /// The overlay always closes and the choice list always clears, even
    /// when the spend fails.
    pub fn confirm_mutation(&mut self) -> bool {
        if self.state != GameState::MutationSelect {
            return false;
        }
        let picked = self.selection.as_ref().and_then(|s| s.selected());
        let free_pick = self.selection.as_ref().map(|s| s.free_pick).unwrap_or(false);

        let mut applied = false;
        if let Some(kind) = picked {
            if let Ok(mut mutations) = self.world.get::<&mut MutationState>(self.player) {
                applied =
                    spend_mutation_point(&mut mutations, &self.services.mutations, kind, free_pick);
            }
            if applied {
                let name = self
                    .services
                    .mutations
                    .find(kind)
                    .map(|d| d.name.clone())
                    .unwrap_or_default();
                self.push_log(format!("Your flesh shifts: {}.", name));
            }
        }

        self.selection = None;
        self.set_state(GameState::Playing);
        applied
    }

    /// Close the overlay without spending; stale choices never leak into
    /// the next opening.
    pub fn cancel_mutation_select(&mut self) {
        if self.state != GameState::MutationSelect {
            return;
        }
        self.selection = None;
        self.set_state(GameState::Playing);
    }

    // =========================================================================
    // Pause / game over
    // =========================================================================

    pub fn toggle_pause(&mut self) {
        match self.state {
            GameState::Playing => self.set_state(GameState::Paused),
            GameState::Paused => self.set_state(GameState::Playing),
            _ => {}
        }
    }

    // =========================================================================
    // Services wiring
    // =========================================================================

    /// Spend time at the bench; breakthroughs earn a free mutation pick
    pub fn do_research(&mut self) {
        if self.state != GameState::Playing || self.death_timer.is_some() {
            return;
        }
        if self.services.research.advance() {
            if let Ok(mut mutations) = self.world.get::<&mut MutationState>(self.player) {
                mutations.free_picks += 1;
            }
            self.push_log("Breakthrough! The mutagen yields a free pick.");
        } else {
            self.push_log("You pore over your samples.");
        }
    }

    /// Burn salvage for a stim and inject it
    pub fn craft_stim(&mut self) {
        if self.state != GameState::Playing || self.death_timer.is_some() {
            return;
        }
        match self.services.crafting.craft_stim() {
            Some(heal) => {
                if let Ok(mut health) = self.world.get::<&mut Health>(self.player) {
                    health.heal(heal);
                }
                self.push_log("You jab a stim into your thigh.");
            }
            None => self.push_log("Not enough salvage for a stim."),
        }
    }

    // =========================================================================
    // Debug triggers
    // =========================================================================

    /// Recreate the enemy pack wholesale and refresh the combat manager's
    /// working list
    pub fn respawn_enemies(&mut self) {
        for &enemy in &self.enemies {
            let _ = self.world.despawn(enemy);
        }
        self.enemies = spawn_tiered_pack(&mut self.world, ENEMY_SPAWNS);
        self.combat.update_enemy_list(self.enemies.clone());
        self.settled_dead.clear();
        self.selected_target = None;
        self.push_log("The wasteland stirs anew.");
    }

    pub fn grant_mutation_point(&mut self) {
        if let Ok(mut mutations) = self.world.get::<&mut MutationState>(self.player) {
            mutations.points += 1;
        }
        self.push_log("A point of raw change settles in.");
    }

    pub fn grant_free_pick(&mut self) {
        if let Ok(mut mutations) = self.world.get::<&mut MutationState>(self.player) {
            mutations.free_picks += 1;
        }
        self.push_log("A free pick settles in.");
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// The live enemy standing on a tile, if any
    pub fn live_enemy_at(&self, tile: TilePos) -> Option<Entity> {
        self.enemies
            .iter()
            .copied()
            .filter(|&e| is_alive(&self.world, e))
            .find(|&e| entity_tile(&self.world, e) == Some(tile))
    }

    /// Mirror pending combat log lines into the bounded display buffer
    fn drain_combat_log(&mut self) {
        for line in self.combat.drain_log() {
            self.push_log(line);
        }
    }

    fn push_log(&mut self, line: impl Into<String>) {
        self.display_log.push_back(line.into());
        while self.display_log.len() > DISPLAY_LOG_LINES {
            self.display_log.pop_front();
        }
    }

    /// Settle quest/faction/salvage bookkeeping for enemies that died since
    /// the last check, however they died.
    fn settle_new_deaths(&mut self) {
        let newly_dead: Vec<Entity> = self
            .enemies
            .iter()
            .copied()
            .filter(|&e| !self.settled_dead.contains(&e) && !is_alive(&self.world, e))
            .collect();

        for enemy in newly_dead {
            self.settled_dead.insert(enemy);
            if self.selected_target == Some(enemy) {
                self.selected_target = None;
            }
            let Some((kind, tier)) = self
                .world
                .get::<&Enemy>(enemy)
                .ok()
                .map(|e| (e.kind, e.tier))
            else {
                continue;
            };
            self.services.quests.record_kill(kind);
            self.services.factions.record_kill(kind);
            let salvage = 1 + tier / 2;
            self.services.crafting.add_salvage(salvage);
            self.push_log(format!("You strip {} salvage from the remains.", salvage));
        }
    }

    fn player_has_gills(&self) -> bool {
        self.world
            .get::<&MutationState>(self.player)
            .map(|m| m.level(crate::mutations::MutationKind::Gills) > 0)
            .unwrap_or(false)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a fresh session: generated terrain with cleared spawn sites, the
/// player, and the tiered enemy pack.
fn build_session(rng: &mut StdRng) -> (World, WorldGrid, Entity, Vec<Entity>) {
    let mut world = World::new();
    let mut grid = WorldGrid::generate(GRID_WIDTH, GRID_HEIGHT, rng.gen());

    grid.clear_area(PLAYER_SPAWN, 2);
    for spawn in ENEMY_SPAWNS {
        grid.clear_area(spawn, 1);
    }

    let player = spawn_player(&mut world, PLAYER_SPAWN);
    let enemies = spawn_tiered_pack(&mut world, ENEMY_SPAWNS);
    (world, grid, player, enemies)
}
