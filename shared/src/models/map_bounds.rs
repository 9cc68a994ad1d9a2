use crate::Position;

/// Dimensions of a grid map, in cells
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MapBounds {
    pub width: u16,
    pub height: u16,
}

impl MapBounds {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: &Position) -> bool {
        position.x < self.width && position.y < self.height
    }
}
