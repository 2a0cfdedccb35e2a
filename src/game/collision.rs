use super::entity::Positioned;
use super::grid::Cell;

/// Returns true if any of `entities` sits on `cell`
pub fn occupied_by<'a, P>(cell: Cell, entities: impl IntoIterator<Item = &'a P>) -> bool
where
    P: Positioned + 'a,
{
    entities.into_iter().any(|entity| entity.position() == cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entity::Entity;

    #[test]
    fn test_occupied_by() {
        let stones = vec![Entity::obstacle(Cell(3)), Entity::obstacle(Cell(9))];
        assert!(occupied_by(Cell(3), &stones));
        assert!(occupied_by(Cell(9), &stones));
        assert!(!occupied_by(Cell(4), &stones));
    }

    #[test]
    fn test_empty_set_is_never_occupied() {
        let none: Vec<Entity> = Vec::new();
        assert!(!occupied_by(Cell(0), &none));
    }

    #[test]
    fn test_works_on_plain_cells_and_slices() {
        let cells = [Cell(1), Cell(2)];
        assert!(occupied_by(Cell(2), &cells[1..]));
        assert!(!occupied_by(Cell(1), &cells[1..]));
    }
}
