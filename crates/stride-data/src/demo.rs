// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use stride_app::{
    Achievement, AchievementId, ActivityRecord, AthleteProfile, Category, ChatMessage,
    Competition, DataSource, Dataset, Difficulty, FitnessTest, Gamification, LeaderboardEntry,
    MealSuggestion, MessageId, NutritionSummary, PlanExercise, Progress, Sender, TestId,
    TrainingPlan, WeeklyChallenge,
};
use time::macros::date;

/// Built-in records used when no dataset file is configured.
#[derive(Debug, Clone)]
pub struct DemoSource {
    dataset: Dataset,
}

impl DemoSource {
    pub fn new() -> Self {
        Self {
            dataset: demo_dataset(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

impl Default for DemoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSource for DemoSource {
    fn tests(&self) -> Result<Vec<FitnessTest>> {
        self.dataset.tests()
    }

    fn categories(&self) -> Result<Vec<Category>> {
        self.dataset.categories()
    }

    fn chat_history(&self) -> Result<Vec<ChatMessage>> {
        self.dataset.chat_history()
    }

    fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        self.dataset.leaderboard()
    }

    fn achievements(&self) -> Result<Vec<Achievement>> {
        self.dataset.achievements()
    }

    fn profile(&self) -> Result<AthleteProfile> {
        self.dataset.profile()
    }

    fn competitions(&self) -> Result<Vec<Competition>> {
        self.dataset.competitions()
    }

    fn training_plan(&self) -> Result<Option<TrainingPlan>> {
        self.dataset.training_plan()
    }

    fn nutrition(&self) -> Result<Option<NutritionSummary>> {
        self.dataset.nutrition()
    }

    fn gamification(&self) -> Result<Gamification> {
        self.dataset.gamification()
    }
}

struct TestSeed {
    name: &'static str,
    category: &'static str,
    difficulty: Difficulty,
    estimated_time: &'static str,
    icon: &'static str,
    last_score: Option<f64>,
    benchmark: f64,
    description: &'static str,
}

const TESTS: [TestSeed; 5] = [
    TestSeed {
        name: "Push-ups",
        category: "Strength",
        difficulty: Difficulty::Medium,
        estimated_time: "2-3 min",
        icon: "fitness-center",
        last_score: Some(22.0),
        benchmark: 85.0,
        description: "Test upper body strength and endurance",
    },
    TestSeed {
        name: "Vertical Jump",
        category: "Agility",
        difficulty: Difficulty::Easy,
        estimated_time: "1-2 min",
        icon: "trending-up",
        last_score: None,
        benchmark: 90.0,
        description: "Measure explosive leg power",
    },
    TestSeed {
        name: "Sit-ups",
        category: "Strength",
        difficulty: Difficulty::Easy,
        estimated_time: "2-3 min",
        icon: "accessibility",
        last_score: Some(35.0),
        benchmark: 80.0,
        description: "Core strength and endurance test",
    },
    TestSeed {
        name: "Plank",
        category: "Strength",
        difficulty: Difficulty::Hard,
        estimated_time: "3-5 min",
        icon: "remove",
        last_score: Some(45.0),
        benchmark: 120.0,
        description: "Core stability and endurance",
    },
    TestSeed {
        name: "Sprint 100m",
        category: "Endurance",
        difficulty: Difficulty::Medium,
        estimated_time: "1-2 min",
        icon: "directions-run",
        last_score: None,
        benchmark: 15.0,
        description: "Speed and cardiovascular fitness",
    },
];

// supplied counts disagree with the catalog; live counts are derived from the tests
const CATEGORIES: [(&str, usize, &str, &str); 4] = [
    ("Strength", 6, "fitness-center", "#FF5722"),
    ("Endurance", 4, "directions-run", "#2196F3"),
    ("Agility", 5, "flash-on", "#FF9800"),
    ("Flexibility", 3, "self-improvement", "#9C27B0"),
];

pub fn demo_dataset() -> Dataset {
    Dataset {
        tests: TESTS
            .iter()
            .zip(1..)
            .map(|(seed, id)| FitnessTest {
                id: TestId::new(id),
                name: seed.name.to_owned(),
                category: seed.category.to_owned(),
                difficulty: seed.difficulty,
                estimated_time: seed.estimated_time.to_owned(),
                icon: seed.icon.to_owned(),
                last_score: seed.last_score,
                benchmark: seed.benchmark,
                description: seed.description.to_owned(),
            })
            .collect(),
        categories: CATEGORIES
            .iter()
            .map(|(name, count, icon, color)| Category {
                name: (*name).to_owned(),
                icon: (*icon).to_owned(),
                color: (*color).to_owned(),
                count: *count,
            })
            .collect(),
        chat_history: vec![
            message(
                1,
                Sender::Assistant,
                "Great job on your push-up test! Ready to improve your form?",
                "14:30",
            ),
            message(2, Sender::User, "Yes, how can I improve?", "14:32"),
            message(
                3,
                Sender::Assistant,
                "Focus on keeping your core tight and lowering slowly. Try 3 sets of 8 perfect reps.",
                "14:33",
            ),
        ],
        leaderboard: vec![
            entry(1, "Priya Patel", "Mumbai", 1250, false),
            entry(2, "Arjun Singh", "Delhi", 1180, false),
            entry(3, "Sneha Reddy", "Hyderabad", 1155, false),
            entry(145, "Rahul Sharma", "Pune", 785, true),
        ],
        achievements: vec![
            achievement(1, "First Steps", "emoji-events", "milestone", None),
            achievement(2, "Consistency Champion", "whatshot", "streak", None),
            achievement(
                3,
                "Strength Master",
                "fitness-center",
                "performance",
                Some((28, 50)),
            ),
            achievement(4, "Endurance Pro", "timer", "performance", Some((45, 120))),
            achievement(5, "Social Butterfly", "share", "social", Some((3, 5))),
            achievement(6, "Perfect Form", "star", "performance", Some((85, 95))),
        ],
        profile: AthleteProfile {
            name: "Rahul Sharma".to_owned(),
            tests_completed: 12,
            recent_score: 78.5,
            rank: 145,
            total_athletes: 15_420,
            recent_activity: vec![
                activity("Push-ups", 22.0, date!(2024 - 09 - 16), "14:30"),
                activity("Sit-ups", 35.0, date!(2024 - 09 - 15), "16:45"),
                activity("Plank", 45.0, date!(2024 - 09 - 14), "10:20"),
            ],
        },
        competitions: vec![
            Competition {
                name: "Maharashtra Push-up Challenge".to_owned(),
                participants: 1200,
                end_date: date!(2024 - 09 - 25),
                prize: "State Recognition".to_owned(),
            },
            Competition {
                name: "Weekly Flexibility Contest".to_owned(),
                participants: 450,
                end_date: date!(2024 - 09 - 20),
                prize: "Yoga Mat".to_owned(),
            },
        ],
        training_plan: Some(TrainingPlan {
            name: "Upper Body Strength".to_owned(),
            week: 2,
            total_weeks: 8,
            progress: 65,
            exercises: vec![
                PlanExercise {
                    name: "Push-ups".to_owned(),
                    sets: Some(3),
                    reps: Some(12),
                    duration: None,
                    completed: true,
                },
                PlanExercise {
                    name: "Plank".to_owned(),
                    sets: None,
                    reps: None,
                    duration: Some("60s".to_owned()),
                    completed: false,
                },
            ],
        }),
        nutrition: Some(NutritionSummary {
            score: 78,
            meals: vec![
                meal("Protein Bowl", 420, 32),
                meal("Recovery Smoothie", 280, 25),
            ],
        }),
        gamification: Gamification {
            points: 2340,
            daily_streak: 7,
            weekly_challenge: Some(WeeklyChallenge {
                name: "Complete 5 Different Tests".to_owned(),
                progress: 3,
                total: 5,
                reward: 100,
            }),
        },
    }
}

fn meal(name: &str, calories: u32, protein: u32) -> MealSuggestion {
    MealSuggestion {
        name: name.to_owned(),
        calories,
        protein,
    }
}

fn message(id: i64, sender: Sender, text: &str, timestamp: &str) -> ChatMessage {
    ChatMessage {
        id: MessageId::new(id),
        sender,
        text: text.to_owned(),
        timestamp: timestamp.to_owned(),
    }
}

fn entry(rank: u32, name: &str, location: &str, score: u64, current: bool) -> LeaderboardEntry {
    LeaderboardEntry {
        rank,
        name: name.to_owned(),
        location: location.to_owned(),
        total_score: score,
        is_current_user: current,
    }
}

fn achievement(
    id: i64,
    name: &str,
    icon: &str,
    category: &str,
    progress: Option<(u32, u32)>,
) -> Achievement {
    Achievement {
        id: AchievementId::new(id),
        name: name.to_owned(),
        icon: icon.to_owned(),
        category: category.to_owned(),
        earned: progress.is_none(),
        progress: progress.map(|(current, required)| Progress { current, required }),
        points: 100,
    }
}

fn activity(test: &str, score: f64, date: time::Date, time: &str) -> ActivityRecord {
    ActivityRecord {
        test: test.to_owned(),
        score,
        date,
        time: time.to_owned(),
    }
}
