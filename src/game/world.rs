use rand::{Rng, SeedableRng, rngs::StdRng};
use std::{collections::HashSet, slice, time::Duration};
use tracing::{debug, info};

use super::{
    action::{Action, Direction},
    collision::occupied_by,
    config::GameConfig,
    entity::{Entity, Rgba},
    error::GameError,
    grid::{Cell, Grid},
    organism::{DeathCause, LifeState, MoveReport, Movement, Organism},
};

/// Life state reported after every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Alive,
    Dead,
}

impl From<LifeState> for TickOutcome {
    fn from(life: LifeState) -> Self {
        match life {
            LifeState::Alive => TickOutcome::Alive,
            LifeState::Dead(_) => TickOutcome::Dead,
        }
    }
}

/// Render-ready view of the board.
///
/// Cells are listed in paint order: food, body, obstacles, head.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub grid: Grid,
    pub cells: Vec<(Cell, Rgba)>,
    pub score: i64,
    pub hunger: Duration,
    pub alive: bool,
}

/// Picks a uniformly random cell not present in any of `occupied`.
///
/// Gives up with [`GameError::NoFreeCellAvailable`] when the board is full or
/// `max_attempts` samples all hit occupied cells.
pub fn place_free_cell<R: Rng + ?Sized>(
    rng: &mut R,
    grid: &Grid,
    occupied: &[&[Entity]],
    max_attempts: usize,
) -> Result<Cell, GameError> {
    let taken: HashSet<Cell> = occupied
        .iter()
        .flat_map(|set| set.iter().map(|entity| entity.position))
        .collect();

    if taken.len() >= grid.cell_count() {
        return Err(GameError::NoFreeCellAvailable { attempts: 0 });
    }

    for _ in 0..max_attempts {
        let candidate = Cell(rng.gen_range(0..grid.cell_count()));

        if !occupied.iter().any(|set| occupied_by(candidate, *set)) {
            return Ok(candidate);
        }
    }

    Err(GameError::NoFreeCellAvailable {
        attempts: max_attempts,
    })
}

/// Complete game state: the snake, the food and the obstacles
pub struct WorldState {
    config: GameConfig,
    grid: Grid,
    organism: Organism,
    food: Entity,
    obstacles: Vec<Entity>,
    rng: StdRng,
    ticks: u64,
}

impl WorldState {
    /// Start a new game with a random seed
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Self::with_seed(config, rand::random())
    }

    /// Start a new game with a reproducible seed.
    ///
    /// The snake heads Right, Up or Down, never Left into its own body. One
    /// food and one obstacle are placed on free cells.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(seed);
        let grid = Grid::new(config.grid_size);
        let starts = [Direction::Right, Direction::Up, Direction::Down];
        let direction = starts[rng.gen_range(0..starts.len())];
        let organism = Organism::new(&grid, config.initial_segments, Some(direction));

        let mut world = Self {
            food: Entity::food(grid.center()),
            obstacles: Vec::new(),
            config,
            grid,
            organism,
            rng,
            ticks: 0,
        };

        world.food = Entity::food(world.free_cell(false)?);
        let stone = world.free_cell(true)?;
        world.obstacles.push(Entity::obstacle(stone));

        info!(seed, ?direction, food = world.food.position.index(), "new world");
        Ok(world)
    }

    /// Build a world with a fixed layout.
    ///
    /// Food and obstacles must sit on the board, off the snake and on cells of
    /// their own.
    pub fn with_layout(
        config: GameConfig,
        organism: Organism,
        food: Cell,
        obstacles: Vec<Cell>,
        seed: u64,
    ) -> Result<Self, GameError> {
        config.validate()?;
        let grid = Grid::new(config.grid_size);

        let snake: HashSet<Cell> = organism
            .segments()
            .iter()
            .chain(slice::from_ref(organism.head()))
            .map(|entity| entity.position)
            .collect();
        if let Some(cell) = snake.iter().find(|cell| !grid.contains(**cell)) {
            return Err(GameError::InvalidConfig(format!(
                "snake cell {} is off the board",
                cell.index()
            )));
        }

        let mut taken = snake;
        let mut placed = vec![("food", food)];
        placed.extend(obstacles.iter().map(|cell| ("obstacle", *cell)));

        for (what, cell) in placed {
            if !grid.contains(cell) {
                return Err(GameError::InvalidConfig(format!(
                    "{} cell {} is off the board",
                    what,
                    cell.index()
                )));
            }
            if !taken.insert(cell) {
                return Err(GameError::InvalidConfig(format!(
                    "{} cell {} is already occupied",
                    what,
                    cell.index()
                )));
            }
        }

        Ok(Self {
            grid,
            config,
            organism,
            food: Entity::food(food),
            obstacles: obstacles.into_iter().map(Entity::obstacle).collect(),
            rng: StdRng::seed_from_u64(seed),
            ticks: 0,
        })
    }

    /// Run one simulation step.
    ///
    /// After the snake eats, the food moves to a free cell and one new
    /// obstacle is added on another free cell.
    pub fn tick(&mut self, action: Action) -> Result<TickOutcome, GameError> {
        if !self.organism.is_alive() {
            return Ok(TickOutcome::Dead);
        }

        let report = self.organism.advance(
            &self.grid,
            action,
            &self.obstacles,
            &self.food,
            &self.config,
        );
        self.ticks += 1;
        self.log_report(&report);

        if report.grew {
            self.food.position = self.free_cell(false)?;
            let stone = self.free_cell(true)?;
            self.obstacles.push(Entity::obstacle(stone));

            info!(
                length = self.organism.len(),
                obstacles = self.obstacles.len(),
                food = self.food.position.index(),
                "snake grew"
            );
        }

        Ok(report.life.into())
    }

    fn free_cell(&mut self, avoid_food: bool) -> Result<Cell, GameError> {
        let food = slice::from_ref(&self.food);
        let mut occupied = vec![
            slice::from_ref(self.organism.head()),
            self.organism.segments(),
            self.obstacles.as_slice(),
        ];
        if avoid_food {
            occupied.push(food);
        }

        place_free_cell(
            &mut self.rng,
            &self.grid,
            &occupied,
            self.config.max_placement_attempts,
        )
    }

    fn log_report(&self, report: &MoveReport) {
        match (report.movement, report.life) {
            (_, LifeState::Dead(DeathCause::SelfCollision)) => {
                info!(tick = self.ticks, "snake ran into itself")
            }
            (_, LifeState::Dead(DeathCause::Starvation)) => {
                info!(tick = self.ticks, hunger = ?self.organism.hunger(), "snake starved")
            }
            (Movement::Blocked, _) => debug!(tick = self.ticks, "move blocked by obstacle"),
            (Movement::Moved(cell), _) => debug!(tick = self.ticks, head = cell.index(), "moved"),
            (Movement::Idle, _) => debug!(tick = self.ticks, "idle"),
        }
    }

    /// Points earned so far: grown segments times the configured value
    pub fn score(&self) -> i64 {
        let grown = self
            .organism
            .segments()
            .len()
            .saturating_sub(self.config.initial_segments);
        grown as i64 * self.config.points_per_segment
    }

    pub fn outcome(&self) -> TickOutcome {
        self.organism.life().into()
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut cells = Vec::with_capacity(self.organism.len() + self.obstacles.len() + 1);
        cells.push((self.food.position, self.food.color));
        cells.extend(self.organism.segments().iter().map(|s| (s.position, s.color)));
        cells.extend(self.obstacles.iter().map(|o| (o.position, o.color)));
        let head = self.organism.head();
        cells.push((head.position, head.color));

        Snapshot {
            grid: self.grid,
            cells,
            score: self.score(),
            hunger: self.organism.hunger(),
            alive: self.organism.is_alive(),
        }
    }

    pub fn set_head_color(&mut self, color: Rgba) {
        self.organism.set_head_color(color);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn organism(&self) -> &Organism {
        &self.organism
    }

    pub fn food(&self) -> &Entity {
        &self.food
    }

    pub fn obstacles(&self) -> &[Entity] {
        &self.obstacles
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entity::palette;

    fn all_distinct(world: &WorldState) {
        let food = world.food().position;
        let head = world.organism().head().position;
        let body: Vec<Cell> = world.organism().segments().iter().map(|s| s.position).collect();

        assert!(!body.contains(&food));
        assert_ne!(head, food);
        for (i, stone) in world.obstacles().iter().enumerate() {
            assert_ne!(stone.position, food);
            assert_ne!(stone.position, head);
            assert!(!body.contains(&stone.position));
            assert!(!world.obstacles()[i + 1..].iter().any(|o| o.position == stone.position));
        }
    }

    #[test]
    fn test_new_world() {
        let world = WorldState::with_seed(GameConfig::default(), 7).unwrap();

        assert_eq!(world.organism().head().position, Cell(210));
        assert_eq!(world.organism().segments().len(), 2);
        assert_ne!(world.organism().pending_direction(), Some(Direction::Left));
        assert!(world.organism().pending_direction().is_some());
        assert_eq!(world.obstacles().len(), 1);
        assert_eq!(world.score(), 0);
        assert_eq!(world.outcome(), TickOutcome::Alive);
        all_distinct(&world);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = GameConfig::default();
        config.grid_size = 1;
        assert!(matches!(
            WorldState::with_seed(config, 1),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_layout_rejects_overlapping_cells() {
        let config = GameConfig::small();
        let snake = || Organism::with_body(Cell(55), vec![Cell(54), Cell(53)], None);

        let food_on_body = WorldState::with_layout(config.clone(), snake(), Cell(54), vec![], 1);
        assert!(matches!(food_on_body, Err(GameError::InvalidConfig(_))));

        let stone_on_head =
            WorldState::with_layout(config.clone(), snake(), Cell(0), vec![Cell(55)], 1);
        assert!(matches!(stone_on_head, Err(GameError::InvalidConfig(_))));

        let stone_on_food =
            WorldState::with_layout(config.clone(), snake(), Cell(0), vec![Cell(0)], 1);
        assert!(matches!(stone_on_food, Err(GameError::InvalidConfig(_))));

        let stacked_stones =
            WorldState::with_layout(config.clone(), snake(), Cell(0), vec![Cell(9), Cell(9)], 1);
        assert!(matches!(stacked_stones, Err(GameError::InvalidConfig(_))));

        let off_board = WorldState::with_layout(config.clone(), snake(), Cell(100), vec![], 1);
        assert!(matches!(off_board, Err(GameError::InvalidConfig(_))));

        // The starting body shares the head's cell; that alone is fine
        let grid = Grid::new(config.grid_size);
        let fresh = Organism::new(&grid, 2, Some(Direction::Right));
        let world = WorldState::with_layout(config, fresh, Cell(0), vec![Cell(9)], 1).unwrap();
        all_distinct(&world);
    }

    #[test]
    fn test_growth_respawns_food_and_adds_obstacle() {
        let config = GameConfig::small();
        let organism =
            Organism::with_body(Cell(55), vec![Cell(54), Cell(53)], Some(Direction::Right));
        let mut world =
            WorldState::with_layout(config, organism, Cell(56), vec![Cell(11)], 3).unwrap();

        let outcome = world.tick(Action::Continue).unwrap();
        assert_eq!(outcome, TickOutcome::Alive);
        assert_eq!(world.organism().segments().len(), 3);
        assert_eq!(world.organism().segments()[0].position, Cell(55));
        assert_eq!(world.obstacles().len(), 2);
        assert_eq!(world.obstacles()[0].position, Cell(11));
        assert_eq!(world.score(), 10);
        all_distinct(&world);
    }

    #[test]
    fn test_obstacles_never_decrease() {
        let mut world = WorldState::with_seed(GameConfig::small(), 11).unwrap();
        let mut count = world.obstacles().len();

        for step in 0..200 {
            let direction = Direction::ALL[step % 4];
            let action = if step % 3 == 0 { Action::Move(direction) } else { Action::Continue };
            if world.tick(action).unwrap() == TickOutcome::Dead {
                break;
            }
            assert!(world.obstacles().len() >= count);
            count = world.obstacles().len();
            all_distinct(&world);
        }
    }

    #[test]
    fn test_dead_world_stays_dead() {
        let mut config = GameConfig::small();
        config.starvation_after = config.tick_interval;
        config.hunger_warning_after = Duration::ZERO;
        let organism = Organism::with_body(Cell(55), vec![Cell(54)], None);
        let mut world = WorldState::with_layout(config, organism, Cell(0), vec![], 1).unwrap();

        assert_eq!(world.tick(Action::Continue).unwrap(), TickOutcome::Alive);
        assert_eq!(world.tick(Action::Continue).unwrap(), TickOutcome::Dead);
        let ticks = world.ticks();
        assert_eq!(world.tick(Action::Move(Direction::Up)).unwrap(), TickOutcome::Dead);
        assert_eq!(world.ticks(), ticks);
    }

    #[test]
    fn test_snapshot_paints_head_last() {
        let world = WorldState::with_seed(GameConfig::default(), 5).unwrap();
        let snapshot = world.snapshot();

        assert_eq!(snapshot.cells.len(), 1 + 2 + 1 + 1);
        assert_eq!(snapshot.cells[0].1, palette::FOOD);
        assert_eq!(snapshot.cells.last(), Some(&(Cell(210), palette::HEAD)));
        assert!(snapshot.alive);
    }

    #[test]
    fn test_place_free_cell_avoids_occupied() {
        let grid = Grid::new(3);
        let taken: Vec<Entity> = (0..8).map(|i| Entity::obstacle(Cell(i))).collect();
        let mut rng = StdRng::seed_from_u64(9);

        let cell = place_free_cell(&mut rng, &grid, &[taken.as_slice()], 10_000).unwrap();
        assert_eq!(cell, Cell(8));
    }

    #[test]
    fn test_place_free_cell_full_board() {
        let grid = Grid::new(3);
        let taken: Vec<Entity> = (0..9).map(|i| Entity::obstacle(Cell(i))).collect();
        let mut rng = StdRng::seed_from_u64(9);

        assert_eq!(
            place_free_cell(&mut rng, &grid, &[taken.as_slice()], 100),
            Err(GameError::NoFreeCellAvailable { attempts: 0 })
        );
    }

    #[test]
    fn test_place_free_cell_respects_attempt_cap() {
        let grid = Grid::new(10);
        let taken: Vec<Entity> = (0..99).map(|i| Entity::obstacle(Cell(i))).collect();
        let mut rng = StdRng::seed_from_u64(1);

        // One free cell out of 100: a single try misses for most seeds
        let missed = (0..50).any(|seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            place_free_cell(&mut rng, &grid, &[taken.as_slice()], 1).is_err()
        });
        assert!(missed);
        assert_eq!(place_free_cell(&mut rng, &grid, &[taken.as_slice()], 100_000), Ok(Cell(99)));
    }
}
