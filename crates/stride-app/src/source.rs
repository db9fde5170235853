// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::{
    Achievement, AthleteProfile, Category, ChatMessage, Competition, FitnessTest, Gamification,
    LeaderboardEntry, NutritionSummary, TrainingPlan,
};

/// Read access to everything the screens display. Implementations return
/// owned snapshots; callers never write back.
pub trait DataSource {
    fn tests(&self) -> Result<Vec<FitnessTest>>;
    fn categories(&self) -> Result<Vec<Category>>;
    fn chat_history(&self) -> Result<Vec<ChatMessage>>;
    fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>>;
    fn achievements(&self) -> Result<Vec<Achievement>>;
    fn profile(&self) -> Result<AthleteProfile>;
    fn competitions(&self) -> Result<Vec<Competition>>;
    fn training_plan(&self) -> Result<Option<TrainingPlan>>;
    fn nutrition(&self) -> Result<Option<NutritionSummary>>;
    fn gamification(&self) -> Result<Gamification>;
}

/// Every record set in one value; also the on-disk JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub tests: Vec<FitnessTest>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub chat_history: Vec<ChatMessage>,
    #[serde(default)]
    pub leaderboard: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
    pub profile: AthleteProfile,
    #[serde(default)]
    pub competitions: Vec<Competition>,
    #[serde(default)]
    pub training_plan: Option<TrainingPlan>,
    #[serde(default)]
    pub nutrition: Option<NutritionSummary>,
    #[serde(default)]
    pub gamification: Gamification,
}

impl DataSource for Dataset {
    fn tests(&self) -> Result<Vec<FitnessTest>> {
        Ok(self.tests.clone())
    }

    fn categories(&self) -> Result<Vec<Category>> {
        Ok(self.categories.clone())
    }

    fn chat_history(&self) -> Result<Vec<ChatMessage>> {
        Ok(self.chat_history.clone())
    }

    fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        Ok(self.leaderboard.clone())
    }

    fn achievements(&self) -> Result<Vec<Achievement>> {
        Ok(self.achievements.clone())
    }

    fn profile(&self) -> Result<AthleteProfile> {
        Ok(self.profile.clone())
    }

    fn competitions(&self) -> Result<Vec<Competition>> {
        Ok(self.competitions.clone())
    }

    fn training_plan(&self) -> Result<Option<TrainingPlan>> {
        Ok(self.training_plan.clone())
    }

    fn nutrition(&self) -> Result<Option<NutritionSummary>> {
        Ok(self.nutrition.clone())
    }

    fn gamification(&self) -> Result<Gamification> {
        Ok(self.gamification.clone())
    }
}
