use crate::error::{BuildingsError, BuildingsErrorExt};
use crate::kind::BuildingType;
use skyline_domain::position::Position;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// A placed building: its own position plus a handle to a shared [`BuildingType`].
#[derive(Debug, Clone)]
pub struct Building {
    position: Position,
    kind: Arc<BuildingType>,
}

impl Building {
    #[must_use]
    pub const fn new(x: i32, y: i32, kind: Arc<BuildingType>) -> Self {
        Self { position: Position::new(x, y), kind }
    }

    #[must_use]
    pub const fn x(&self) -> i32 {
        self.position.x
    }

    #[must_use]
    pub const fn y(&self) -> i32 {
        self.position.y
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub const fn kind(&self) -> &Arc<BuildingType> {
        &self.kind
    }

    /// Moves the building. The shared type is untouched.
    pub const fn move_to(&mut self, x: i32, y: i32) {
        self.position = Position::new(x, y);
    }

    /// Returns `true` if both buildings reference the same shared type instance.
    #[must_use]
    pub fn shares_type_with(&self, other: &Self) -> bool {
        BuildingType::same_instance(&self.kind, &other.kind)
    }

    /// Writes the human-readable record of this building, followed by a newline.
    ///
    /// # Errors
    /// Returns [`BuildingsError::Io`] if the writer fails.
    pub fn display(&self, out: &mut impl Write) -> Result<(), BuildingsError> {
        writeln!(out, "{self}").context("Writing building record")
    }
}

impl fmt::Display for Building {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Displaying {} at {} with {} texture and {} color\n shared type id: {}",
            self.kind.name(),
            self.position,
            self.kind.texture(),
            self.kind.color(),
            self.kind.id(),
        )
    }
}
