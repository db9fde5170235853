// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod achievements;
pub mod capture;
pub mod catalog;
pub mod chat;
pub mod ids;
pub mod leaderboard;
pub mod model;
pub mod source;
pub mod state;

pub use achievements::*;
pub use capture::*;
pub use catalog::*;
pub use chat::*;
pub use ids::*;
pub use leaderboard::*;
pub use model::*;
pub use source::*;
pub use state::*;
