// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod export;
pub mod ids;
pub mod model;
pub mod offsets;
pub mod reconcile;
pub mod rows;
pub mod state;

pub use export::*;
pub use ids::*;
pub use model::*;
pub use offsets::*;
pub use reconcile::*;
pub use rows::*;
pub use state::*;
