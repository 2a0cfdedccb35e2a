//! The player-controlled snake and its per-tick state machine.

use std::time::Duration;

use super::{
    action::{Action, Direction},
    collision::occupied_by,
    config::GameConfig,
    entity::{Entity, Rgba, palette},
    grid::{Cell, Grid},
};

/// Why a snake died
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    /// The head moved onto the body
    SelfCollision,
    /// Hunger passed the starvation threshold
    Starvation,
}

/// Life state of the snake. `Dead` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeState {
    Alive,
    Dead(DeathCause),
}

/// What the head did during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// No direction was known, or the snake is dead
    Idle,
    /// An obstacle sat on the target cell
    Blocked,
    /// The head moved to the given cell
    Moved(Cell),
}

/// Result of one [`Organism::advance`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport {
    pub movement: Movement,
    /// Food was eaten and the body grew by one segment
    pub grew: bool,
    pub life: LifeState,
}

/// The snake: one head plus trailing segments ordered head to tail
#[derive(Debug, Clone, PartialEq)]
pub struct Organism {
    head: Entity,
    segments: Vec<Entity>,
    pending_direction: Option<Direction>,
    hunger: Duration,
    life: LifeState,
}

impl Organism {
    /// Create a snake at the center of the grid.
    ///
    /// Segments are laid out leftwards from the center cell, so the first one
    /// shares the head's cell until the first move.
    pub fn new(grid: &Grid, initial_segments: usize, direction: Option<Direction>) -> Self {
        let center = grid.center();
        let segments = std::iter::successors(Some(center), |cell| {
            Some(grid.step(*cell, Direction::Left))
        })
        .take(initial_segments)
        .collect();

        Self::with_body(center, segments, direction)
    }

    /// Create a snake from explicit cells
    pub fn with_body(head: Cell, segments: Vec<Cell>, direction: Option<Direction>) -> Self {
        Self {
            head: Entity::head(head),
            segments: segments.into_iter().map(Entity::segment).collect(),
            pending_direction: direction,
            hunger: Duration::ZERO,
            life: LifeState::Alive,
        }
    }

    pub fn head(&self) -> &Entity {
        &self.head
    }

    pub fn segments(&self) -> &[Entity] {
        &self.segments
    }

    /// Head plus segments
    pub fn len(&self) -> usize {
        self.segments.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    pub fn hunger(&self) -> Duration {
        self.hunger
    }

    pub fn life(&self) -> LifeState {
        self.life
    }

    pub fn is_alive(&self) -> bool {
        self.life == LifeState::Alive
    }

    pub fn death_cause(&self) -> Option<DeathCause> {
        match self.life {
            LifeState::Alive => None,
            LifeState::Dead(cause) => Some(cause),
        }
    }

    /// Override the head color; used by the death flash
    pub fn set_head_color(&mut self, color: Rgba) {
        self.head.color = color;
    }

    /// Where the head would land with `direction`, without moving it
    pub fn peek(&self, grid: &Grid, direction: Direction) -> Cell {
        grid.step(self.head.position, direction)
    }

    /// Run one tick of the state machine.
    ///
    /// Obstacles block the move without killing. Moving onto any segment except
    /// the tail being vacated this tick kills. Hunger grows by one tick interval
    /// unless food was eaten, collision ticks included, and starvation is checked
    /// last.
    pub fn advance(
        &mut self,
        grid: &Grid,
        action: Action,
        obstacles: &[Entity],
        food: &Entity,
        config: &GameConfig,
    ) -> MoveReport {
        if !self.is_alive() {
            return self.report(Movement::Idle, false);
        }

        if let Action::Move(direction) = action {
            self.pending_direction = Some(direction);
        }

        let mut movement = Movement::Idle;
        let mut grew = false;

        if let Some(direction) = self.pending_direction {
            let target = self.peek(grid, direction);

            if occupied_by(target, obstacles) {
                self.pending_direction = None;
                movement = Movement::Blocked;
            } else {
                let vacated = self.head.position;
                self.head.position = target;
                movement = Movement::Moved(target);

                // The last segment leaves its cell this tick, so the head may take it
                let staying = &self.segments[..self.segments.len().saturating_sub(1)];
                if occupied_by(target, staying) {
                    self.life = LifeState::Dead(DeathCause::SelfCollision);
                } else {
                    grew = target == food.position;
                    self.shift_segments(vacated, grew);

                    if grew {
                        self.hunger = Duration::ZERO;
                        self.head.color = palette::HEAD;
                    }
                }
            }
        }

        if !grew {
            self.hunger += config.tick_interval;
        }

        // Starvation wins over a collision on the same tick
        if self.hunger > config.starvation_after {
            self.life = LifeState::Dead(DeathCause::Starvation);
        }

        self.recolor_segments(config);
        self.report(movement, grew)
    }

    fn shift_segments(&mut self, vacated: Cell, grow: bool) {
        self.segments.insert(0, Entity::segment(vacated));

        if !grow {
            self.segments.pop();
        }
    }

    fn recolor_segments(&mut self, config: &GameConfig) {
        let color = if self.hunger > config.hunger_warning_after {
            palette::HUNGRY
        } else {
            palette::SEGMENT
        };

        for segment in &mut self.segments {
            segment.color = color;
        }
    }

    fn report(&self, movement: Movement, grew: bool) -> MoveReport {
        MoveReport {
            movement,
            grew,
            life: self.life,
        }
    }
}
