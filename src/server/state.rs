use crate::location::{Gazetteer, LocationResolver};
use crate::points::PointsTable;

/// Reference data shared by all handlers. Read-only for the server's life.
pub struct AppState {
    pub gazetteer: Gazetteer,
    pub tiers: PointsTable,
}

impl AppState {
    pub fn new(gazetteer: Gazetteer, tiers: PointsTable) -> Self {
        Self { gazetteer, tiers }
    }

    pub fn builtin() -> Self {
        Self::new(Gazetteer::builtin().clone(), PointsTable::builtin().clone())
    }

    pub fn resolver(&self) -> LocationResolver<'_> {
        LocationResolver::new(&self.gazetteer)
    }
}
