//! Main UI Application
//!
//! Coordinates rendering and input handling across all screens.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::combat::entity_tile;
use crate::ecs::{Health, MutationState, Renderable, StatusEffects, TilePos, Traits, WorldPos};
use crate::game::{Game, GameState, InputFrame, MouseClick};
use crate::services::FactionId;

/// Main UI application
pub struct App {
    /// Tile the camera is centered on
    camera: TilePos,
    /// Manual camera pan offset from the player
    pan: (i32, i32),
    /// Map viewport interior from the last draw, for mouse hit testing
    map_inner: Rect,
    /// Choice row rectangles from the last mutation overlay draw
    choice_rows: Vec<Rect>,
}

impl App {
    pub fn new() -> Self {
        Self {
            camera: TilePos::new(0, 0),
            pan: (0, 0),
            map_inner: Rect::default(),
            choice_rows: Vec::new(),
        }
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Route one tick's edge-triggered input. Returns true to quit.
    pub fn handle_input(&mut self, input: &InputFrame, game: &mut Game) -> Result<bool> {
        for key in &input.keys {
            // Global quit shortcut
            if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
                return Ok(true);
            }
            match game.state() {
                GameState::Playing => self.handle_playing_key(*key, game),
                GameState::MutationSelect => self.handle_mutation_key(*key, game),
                GameState::Paused => self.handle_pause_key(*key, game),
                GameState::GameOver => self.handle_game_over_key(*key, game),
            }
        }

        for click in &input.clicks {
            match game.state() {
                GameState::Playing => self.handle_playing_click(*click, game),
                GameState::MutationSelect => self.handle_mutation_click(*click, game),
                _ => {}
            }
        }

        Ok(game.quit_requested())
    }

    fn handle_playing_key(&mut self, key: KeyEvent, game: &mut Game) {
        // Shift+arrows pan the camera without moving the survivor
        if key.modifiers.contains(KeyModifiers::SHIFT) {
            match key.code {
                KeyCode::Up => self.pan.1 -= 2,
                KeyCode::Down => self.pan.1 += 2,
                KeyCode::Left => self.pan.0 -= 2,
                KeyCode::Right => self.pan.0 += 2,
                _ => {}
            }
            return;
        }

        match key.code {
            // Movement
            KeyCode::Up | KeyCode::Char('k') => game.player_move_dir(0, -1),
            KeyCode::Down | KeyCode::Char('j') => game.player_move_dir(0, 1),
            KeyCode::Left | KeyCode::Char('h') => game.player_move_dir(-1, 0),
            KeyCode::Right | KeyCode::Char('l') => game.player_move_dir(1, 0),

            // Combat
            KeyCode::Char('e') => game.end_turn(),

            // Mutation overlay
            KeyCode::Char('m') => {
                game.open_mutation_select();
            }

            // Camp actions
            KeyCode::Char('r') => game.do_research(),
            KeyCode::Char('g') => game.craft_stim(),

            // Camera
            KeyCode::Char('c') => self.pan = (0, 0),

            // Debug triggers
            KeyCode::F(5) => game.respawn_enemies(),
            KeyCode::F(6) => game.grant_mutation_point(),
            KeyCode::F(7) => game.grant_free_pick(),

            KeyCode::Esc => game.toggle_pause(),
            _ => {}
        }
    }

    fn handle_mutation_key(&mut self, key: KeyEvent, game: &mut Game) {
        match key.code {
            KeyCode::Up | KeyCode::Left | KeyCode::Char('k') => game.selection_prev(),
            KeyCode::Down | KeyCode::Right | KeyCode::Char('j') => game.selection_next(),
            KeyCode::Char(c @ '1'..='3') => {
                game.selection_jump(c as usize - '1' as usize);
            }
            KeyCode::Enter => {
                game.confirm_mutation();
            }
            KeyCode::Esc => game.cancel_mutation_select(),
            _ => {}
        }
    }

    fn handle_pause_key(&mut self, key: KeyEvent, game: &mut Game) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('p') => game.toggle_pause(),
            KeyCode::Char('q') => game.request_quit(),
            _ => {}
        }
    }

    fn handle_game_over_key(&mut self, key: KeyEvent, game: &mut Game) {
        match key.code {
            KeyCode::Enter | KeyCode::Char('n') => game.new_game(),
            KeyCode::Char('q') | KeyCode::Esc => game.request_quit(),
            _ => {}
        }
    }

    fn handle_playing_click(&mut self, click: MouseClick, game: &mut Game) {
        if click.button != MouseButton::Left {
            return;
        }
        if let Some(tile) = self.screen_to_tile(click.column, click.row) {
            game.handle_world_click(tile);
        }
    }

    fn handle_mutation_click(&mut self, click: MouseClick, game: &mut Game) {
        if click.button != MouseButton::Left {
            return;
        }
        let hit = self
            .choice_rows
            .iter()
            .position(|r| contains(*r, click.column, click.row));
        if let Some(slot) = hit {
            let already_selected = game.selection().map(|s| s.cursor) == Some(slot);
            if already_selected {
                game.confirm_mutation();
            } else {
                game.selection_jump(slot);
            }
        }
    }

    /// Map a terminal cell to a world tile using the last-drawn viewport
    fn screen_to_tile(&self, column: u16, row: u16) -> Option<TilePos> {
        let inner = self.map_inner;
        if !contains(inner, column, row) {
            return None;
        }
        let cam_x = self.camera.x - inner.width as i32 / 2;
        let cam_y = self.camera.y - inner.height as i32 / 2;
        Some(TilePos::new(
            cam_x + (column - inner.x) as i32,
            cam_y + (row - inner.y) as i32,
        ))
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Route the frame's draw to the handler for the current state
    pub fn render(&mut self, frame: &mut Frame, game: &Game) {
        frame.render_widget(Clear, frame.area());

        // Camera follows the player plus any manual pan
        if let Some(tile) = entity_tile(game.world(), game.player()) {
            self.camera = TilePos::new(tile.x + self.pan.0, tile.y + self.pan.1);
        }

        match game.state() {
            GameState::Playing => self.render_playing(frame, game),
            GameState::MutationSelect => {
                self.render_playing(frame, game);
                self.render_mutation_overlay(frame, game);
            }
            GameState::Paused => {
                self.render_playing(frame, game);
                self.render_center_box(frame, "PAUSED", &["[Esc] resume", "[q] quit"]);
            }
            GameState::GameOver => self.render_game_over(frame, game),
        }
    }

    fn render_playing(&mut self, frame: &mut Frame, game: &Game) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(10),
                Constraint::Length(crate::game::DISPLAY_LOG_LINES as u16 + 2),
            ])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(30)])
            .split(rows[0]);

        self.render_map(frame, game, columns[0]);
        self.render_sidebar(frame, game, columns[1]);
        self.render_log(frame, game, rows[1]);
    }

    fn render_map(&mut self, frame: &mut Frame, game: &Game, area: Rect) {
        let title = if game.combat().in_combat() {
            format!(" The Ashfall - Turn {} ", game.combat().turn())
        } else {
            " The Ashfall ".to_string()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Rgb(120, 110, 100)));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.map_inner = inner;

        let grid = game.grid();
        let player_tile = entity_tile(game.world(), game.player());
        let vision = game.vision_radius();

        let view_width = inner.width as i32;
        let view_height = inner.height as i32;
        let cam_x = self.camera.x - view_width / 2;
        let cam_y = self.camera.y - view_height / 2;

        // Terrain layer
        for screen_y in 0..view_height {
            for screen_x in 0..view_width {
                let tile = TilePos::new(cam_x + screen_x, cam_y + screen_y);
                let cell_x = inner.x + screen_x as u16;
                let cell_y = inner.y + screen_y as u16;

                let buf = frame.buffer_mut();
                if let Some(terrain) = grid.terrain(tile) {
                    let in_sight = player_tile
                        .map(|p| p.chebyshev(&tile) <= vision)
                        .unwrap_or(true);
                    let (r, g, b) = terrain.color();
                    let fg = if in_sight {
                        Color::Rgb(r, g, b)
                    } else {
                        Color::Rgb(r / 3, g / 3, b / 3)
                    };
                    buf[(cell_x, cell_y)].set_char(terrain.glyph());
                    buf[(cell_x, cell_y)].set_fg(fg);
                } else {
                    buf[(cell_x, cell_y)].set_char(' ');
                }
            }
        }

        // Entity layer, lowest render order first
        let mut drawables: Vec<(TilePos, char, (u8, u8, u8), i32)> = Vec::new();
        for (entity, (pos, renderable)) in game.world().query::<(&WorldPos, &Renderable)>().iter() {
            let alive = game
                .world()
                .get::<&Health>(entity)
                .map(|h| h.is_alive())
                .unwrap_or(true);
            if !alive {
                continue;
            }
            drawables.push((pos.tile(), renderable.glyph, renderable.fg, renderable.render_order));
        }
        drawables.sort_by_key(|d| d.3);

        let target_tile = game
            .selected_target()
            .and_then(|t| entity_tile(game.world(), t));

        for (tile, glyph, (r, g, b), _) in drawables {
            let screen_x = tile.x - cam_x;
            let screen_y = tile.y - cam_y;
            if screen_x < 0 || screen_x >= view_width || screen_y < 0 || screen_y >= view_height {
                continue;
            }
            let cell_x = inner.x + screen_x as u16;
            let cell_y = inner.y + screen_y as u16;
            let buf = frame.buffer_mut();
            buf[(cell_x, cell_y)].set_char(glyph);
            buf[(cell_x, cell_y)].set_fg(Color::Rgb(r, g, b));
            if target_tile == Some(tile) {
                buf[(cell_x, cell_y)].set_bg(Color::Rgb(90, 60, 20));
            }
        }
    }

    fn render_sidebar(&self, frame: &mut Frame, game: &Game, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(" Survivor ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let world = game.world();
        let player = game.player();
        let mut lines: Vec<Line> = Vec::new();

        if let Ok(health) = world.get::<&Health>(player) {
            let color = if health.percentage() > 0.5 {
                Color::Rgb(120, 200, 120)
            } else if health.percentage() > 0.25 {
                Color::Rgb(220, 200, 90)
            } else {
                Color::Rgb(220, 90, 70)
            };
            lines.push(Line::from(Span::styled(
                format!("HP {:>3.0}/{:<3.0}", health.current, health.max),
                Style::default().fg(color),
            )));
        }
        if let Ok(exp) = world.get::<&crate::ecs::Experience>(player) {
            lines.push(Line::from(format!(
                "Level {}  XP {}/{}",
                exp.level, exp.current_xp, exp.xp_to_next
            )));
        }
        if let Ok(traits) = world.get::<&Traits>(player) {
            let names: Vec<&str> = traits.0.iter().map(|t| t.name()).collect();
            lines.push(Line::from(Span::styled(
                names.join(", "),
                Style::default().fg(Color::Rgb(150, 140, 120)),
            )));
        }

        // Combat readout
        if game.combat().in_combat() {
            let turn_label = if game.combat().is_player_turn() {
                Span::styled("Your turn", Style::default().fg(Color::Rgb(240, 220, 130)))
            } else {
                Span::styled("Enemy turn", Style::default().fg(Color::Rgb(220, 120, 90)))
            };
            lines.push(Line::from(turn_label));

            let mut pips = String::from("AP ");
            for i in 0..game.combat().max_action_points() {
                pips.push(if i < game.combat().action_points() { '●' } else { '○' });
                pips.push(' ');
            }
            lines.push(Line::from(pips));
        } else {
            lines.push(Line::from(Span::styled(
                "Exploring",
                Style::default().fg(Color::Rgb(140, 160, 140)),
            )));
        }
        lines.push(Line::from(""));

        // Mutation economy
        if let Ok(mutations) = world.get::<&MutationState>(player) {
            lines.push(Line::from(format!(
                "Mutation pts {}  Free {}",
                mutations.points, mutations.free_picks
            )));
            let mut acquired: Vec<_> = mutations.levels.iter().collect();
            acquired.sort_by_key(|(kind, _)| format!("{:?}", kind));
            for (kind, level) in acquired {
                let name = game
                    .services()
                    .mutations
                    .find(*kind)
                    .map(|d| d.name.clone())
                    .unwrap_or_else(|| format!("{:?}", kind));
                lines.push(Line::from(Span::styled(
                    format!("  {} {}", name, level),
                    Style::default().fg(Color::Rgb(170, 140, 200)),
                )));
            }
        }

        // Active statuses
        if let Ok(statuses) = world.get::<&StatusEffects>(player) {
            if !statuses.effects.is_empty() {
                lines.push(Line::from(""));
                for effect in &statuses.effects {
                    let (r, g, b) = effect.kind.color();
                    lines.push(Line::from(Span::styled(
                        format!("{} ({:.0}s)", effect.kind.name(), effect.duration),
                        Style::default().fg(Color::Rgb(r, g, b)),
                    )));
                }
            }
        }

        lines.push(Line::from(""));
        let services = game.services();
        lines.push(Line::from(format!("Salvage {}", services.crafting.salvage())));
        lines.push(Line::from(format!(
            "Research {}/{}",
            services.research.progress(),
            crate::services::RESEARCH_PROJECT_COST
        )));
        lines.push(Line::from(format!("Kills {}", services.quests.total_kills())));
        for faction in [FactionId::Ashwalkers, FactionId::Scrappers, FactionId::Covenant] {
            let rep = services.factions.reputation(faction);
            if rep != 0 {
                lines.push(Line::from(format!("{} {:+}", faction.name(), rep)));
            }
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_log(&self, frame: &mut Frame, game: &Game, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(" Log ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines: Vec<Line> = game
            .display_log()
            .iter()
            .map(|l| Line::from(l.as_str()))
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_mutation_overlay(&mut self, frame: &mut Frame, game: &Game) {
        let Some(selection) = game.selection() else {
            return;
        };

        let height = (selection.choices.len() as u16 + 6).min(frame.area().height);
        let area = centered_rect(frame.area(), 46, height);
        frame.render_widget(Clear, area);

        let title = if selection.free_pick {
            " Mutation - free pick "
        } else {
            " Mutation - 1 point "
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Rgb(170, 140, 200)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.choice_rows.clear();
        let mut lines: Vec<Line> = Vec::new();
        for (i, kind) in selection.choices.iter().enumerate() {
            let def = game.services().mutations.find(*kind);
            let name = def.map(|d| d.name.as_str()).unwrap_or("?");
            let category = def.map(|d| d.category.name()).unwrap_or("?");
            let style = if i == selection.cursor {
                Style::default()
                    .fg(Color::Rgb(240, 220, 130))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Rgb(190, 180, 170))
            };
            let slot = if i < 3 {
                format!("[{}] ", i + 1)
            } else {
                "    ".to_string()
            };
            lines.push(Line::from(Span::styled(
                format!("{}{} ({})", slot, name, category),
                style,
            )));
            self.choice_rows.push(Rect {
                x: inner.x,
                y: inner.y + i as u16,
                width: inner.width,
                height: 1,
            });
        }

        lines.push(Line::from(""));
        if let Some(def) = selection.selected().and_then(|k| game.services().mutations.find(k)) {
            lines.push(Line::from(Span::styled(
                def.description.clone(),
                Style::default().fg(Color::Rgb(150, 150, 150)),
            )));
        }
        lines.push(Line::from(Span::styled(
            "[Enter] take  [Esc] cancel",
            Style::default().fg(Color::Rgb(120, 120, 120)),
        )));

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_game_over(&self, frame: &mut Frame, game: &Game) {
        let kills = game.services().quests.total_kills();
        let level = game
            .world()
            .get::<&crate::ecs::Experience>(game.player())
            .map(|e| e.level)
            .unwrap_or(1);
        let summary = format!("Level {} - {} kills", level, kills);
        self.render_center_box(
            frame,
            "THE ASH TAKES YOU",
            &[summary.as_str(), "", "[Enter] start over", "[q] quit"],
        );
    }

    fn render_center_box(&self, frame: &mut Frame, title: &str, lines: &[&str]) {
        let area = centered_rect(frame.area(), 40, lines.len() as u16 + 4);
        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", title))
            .border_style(Style::default().fg(Color::Rgb(180, 70, 60)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let text: Vec<Line> = lines.iter().map(|l| Line::from(*l)).collect();
        frame.render_widget(
            Paragraph::new(text).alignment(ratatui::layout::Alignment::Center),
            inner,
        );
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a cell lies within a rect
fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x + rect.width
        && row >= rect.y
        && row < rect.y + rect.height
}

/// A rect of the given size centered in `area`
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
