// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::Date;

use crate::ids::*;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

/// A fitness test definition from the catalog. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessTest {
    pub id: TestId,
    pub name: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub estimated_time: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub last_score: Option<f64>,
    pub benchmark: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    /// Count as supplied by the data source; may disagree with the catalog.
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    #[serde(alias = "coach")]
    Assistant,
}

impl Sender {
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "you",
            Self::Assistant => "coach",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender: Sender,
    pub text: String,
    /// Wall-clock time of creation, `HH:MM` on a 24-hour clock.
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub name: String,
    pub location: String,
    pub total_score: u64,
    #[serde(default)]
    pub is_current_user: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub current: u32,
    pub required: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    pub category: String,
    pub earned: bool,
    #[serde(default)]
    pub progress: Option<Progress>,
    #[serde(default)]
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub test: String,
    pub score: f64,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteProfile {
    pub name: String,
    pub tests_completed: u32,
    pub recent_score: f64,
    pub rank: u32,
    pub total_athletes: u32,
    #[serde(default)]
    pub recent_activity: Vec<ActivityRecord>,
}

impl AthleteProfile {
    /// Most recent activity first, capped at `limit`.
    pub fn latest_activity(&self, limit: usize) -> Vec<&ActivityRecord> {
        let mut records: Vec<&ActivityRecord> = self.recent_activity.iter().collect();
        records.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.time.cmp(&a.time)));
        records.truncate(limit);
        records
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competition {
    pub name: String,
    pub participants: u32,
    #[serde(with = "iso_date")]
    pub end_date: Date,
    pub prize: String,
}

impl Competition {
    pub fn is_open_on(&self, day: Date) -> bool {
        day <= self.end_date
    }
}

pub const DEFAULT_PLAN_WEEKS: u32 = 8;

/// One line of a training plan: either sets of reps or a timed hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanExercise {
    pub name: String,
    #[serde(default)]
    pub sets: Option<u32>,
    #[serde(default)]
    pub reps: Option<u32>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl PlanExercise {
    /// `3 x 12`, `60s`, or both when a set scheme carries a duration.
    pub fn prescription(&self) -> String {
        let scheme = match (self.sets, self.reps) {
            (Some(sets), Some(reps)) => Some(format!("{sets} x {reps}")),
            (Some(sets), None) => Some(format!("{sets} sets")),
            (None, Some(reps)) => Some(format!("{reps} reps")),
            (None, None) => None,
        };
        match (scheme, self.duration.as_deref()) {
            (Some(scheme), Some(duration)) => format!("{scheme}, {duration}"),
            (Some(scheme), None) => scheme,
            (None, Some(duration)) => duration.to_owned(),
            (None, None) => String::new(),
        }
    }
}

fn default_plan_weeks() -> u32 {
    DEFAULT_PLAN_WEEKS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingPlan {
    pub name: String,
    pub week: u32,
    #[serde(default = "default_plan_weeks")]
    pub total_weeks: u32,
    /// Percent complete as supplied, 0-100.
    pub progress: u8,
    #[serde(default)]
    pub exercises: Vec<PlanExercise>,
}

impl TrainingPlan {
    pub fn completed_exercises(&self) -> usize {
        self.exercises.iter().filter(|e| e.completed).count()
    }

    pub fn progress_percent(&self) -> u8 {
        self.progress.min(100)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealSuggestion {
    pub name: String,
    pub calories: u32,
    /// Grams.
    pub protein: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionSummary {
    /// Daily score out of 100.
    pub score: u8,
    #[serde(default)]
    pub meals: Vec<MealSuggestion>,
}

impl NutritionSummary {
    pub fn score_percent(&self) -> u8 {
        self.score.min(100)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyChallenge {
    pub name: String,
    pub progress: u32,
    pub total: u32,
    /// Points awarded on completion.
    pub reward: u32,
}

impl WeeklyChallenge {
    /// Rounded share of `total` reached, clamped to `0..=100`. A challenge
    /// with no target reports 0.
    pub fn progress_percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let ratio = f64::from(self.progress) / f64::from(self.total);
        (ratio * 100.0).round().clamp(0.0, 100.0) as u8
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.progress >= self.total
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gamification {
    #[serde(default)]
    pub points: u64,
    #[serde(default)]
    pub daily_streak: u32,
    #[serde(default)]
    pub weekly_challenge: Option<WeeklyChallenge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabKind {
    Home,
    Tests,
    Coach,
    Community,
    Profile,
}

impl TabKind {
    pub const ALL: [Self; 5] = [
        Self::Home,
        Self::Tests,
        Self::Coach,
        Self::Community,
        Self::Profile,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Tests => "tests",
            Self::Coach => "coach",
            Self::Community => "community",
            Self::Profile => "profile",
        }
    }
}
