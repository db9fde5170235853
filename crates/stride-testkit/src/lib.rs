// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::path::PathBuf;
use stride_app::{
    Achievement, AchievementId, ActivityRecord, AthleteProfile, Category, ChatMessage,
    Competition, Dataset, Difficulty, FitnessTest, Gamification, LeaderboardEntry, MealSuggestion,
    MessageId, NutritionSummary, PlanExercise, Progress, Sender, TestId, TrainingPlan,
    WeeklyChallenge,
};
use time::OffsetDateTime;
use time::macros::{date, datetime};

const CATEGORIES: [&str; 4] = ["Strength", "Endurance", "Agility", "Flexibility"];

const EXERCISES: [&str; 16] = [
    "Push-ups",
    "Sit-ups",
    "Plank",
    "Vertical Jump",
    "Sprint 100m",
    "Shuttle Run",
    "Burpees",
    "Wall Sit",
    "Broad Jump",
    "Sit and Reach",
    "Pull-ups",
    "Squats",
    "Lunges",
    "Step Test",
    "Mountain Climbers",
    "Bridge Hold",
];

const FOCUS_WORDS: [&str; 12] = [
    "upper body",
    "core",
    "explosive",
    "leg power",
    "speed",
    "balance",
    "mobility",
    "endurance",
    "stability",
    "coordination",
    "posture",
    "cardio",
];

const FIRST_NAMES: [&str; 12] = [
    "Priya", "Arjun", "Sneha", "Rahul", "Ananya", "Vikram", "Meera", "Kabir", "Isha", "Rohan",
    "Kavya", "Dev",
];
const LAST_NAMES: [&str; 10] = [
    "Patel", "Singh", "Reddy", "Sharma", "Iyer", "Khan", "Das", "Nair", "Gupta", "Mehta",
];
const CITIES: [&str; 8] = [
    "Mumbai",
    "Delhi",
    "Hyderabad",
    "Pune",
    "Chennai",
    "Kolkata",
    "Jaipur",
    "Bengaluru",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator for catalogs, chat logs and leaderboards.
#[derive(Debug, Clone)]
pub struct AthleteFaker {
    rng: DeterministicRng,
    next_test_id: i64,
}

impl AthleteFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_test_id: 1,
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn fitness_test(&mut self) -> FitnessTest {
        let id = self.next_test_id;
        self.next_test_id += 1;
        let name = self.pick(&EXERCISES);
        let focus = self.pick(&FOCUS_WORDS);
        let difficulty = match self.rng.int_n(3) {
            0 => Difficulty::Easy,
            1 => Difficulty::Medium,
            _ => Difficulty::Hard,
        };
        let minutes = 1 + self.rng.int_n(4);
        FitnessTest {
            id: TestId::new(id),
            name: name.to_owned(),
            category: self.pick(&CATEGORIES).to_owned(),
            difficulty,
            estimated_time: format!("{minutes}-{} min", minutes + 1),
            icon: String::new(),
            last_score: self
                .rng
                .bool()
                .then(|| (10 + self.rng.int_n(90)) as f64),
            benchmark: (15 + self.rng.int_n(105)) as f64,
            description: format!("Measures {focus}"),
        }
    }

    pub fn catalog(&mut self, len: usize) -> Vec<FitnessTest> {
        (0..len).map(|_| self.fitness_test()).collect()
    }

    /// A search string: usually a fragment of some name or description in
    /// `tests` with shuffled case, sometimes noise that matches nothing.
    pub fn query_for(&mut self, tests: &[FitnessTest]) -> String {
        if tests.is_empty() || self.rng.int_n(5) == 0 {
            return "zzq".to_owned();
        }
        let test = &tests[self.rng.int_n(tests.len())];
        let source = if self.rng.bool() {
            &test.name
        } else {
            &test.description
        };
        let chars: Vec<char> = source.chars().collect();
        let start = self.rng.int_n(chars.len());
        let len = 1 + self.rng.int_n(chars.len() - start);
        chars[start..start + len]
            .iter()
            .map(|ch| {
                if self.rng.bool() {
                    ch.to_ascii_uppercase()
                } else {
                    ch.to_ascii_lowercase()
                }
            })
            .collect()
    }

    pub fn category_name(&mut self) -> &'static str {
        self.pick(&CATEGORIES)
    }

    pub fn leaderboard(&mut self, len: usize) -> Vec<LeaderboardEntry> {
        let me = self.rng.int_n(len.max(1));
        let mut score = 1500 + self.rng.int_n(500) as u64;
        (0..len)
            .map(|index| {
                score = score.saturating_sub(self.rng.int_n(80) as u64);
                LeaderboardEntry {
                    rank: index as u32 + 1,
                    name: format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES)),
                    location: self.pick(&CITIES).to_owned(),
                    total_score: score,
                    is_current_user: index == me,
                }
            })
            .collect()
    }

    fn pick<'a>(&mut self, values: &'a [&'a str]) -> &'a str {
        values[self.rng.int_n(values.len())]
    }
}

pub fn fitness_test(id: i64, name: &str, category: &str, description: &str) -> FitnessTest {
    FitnessTest {
        id: TestId::new(id),
        name: name.to_owned(),
        category: category.to_owned(),
        difficulty: Difficulty::Medium,
        estimated_time: "2-3 min".to_owned(),
        icon: String::new(),
        last_score: None,
        benchmark: 50.0,
        description: description.to_owned(),
    }
}

/// The two-test catalog used in the search walkthrough.
pub fn scenario_tests() -> Vec<FitnessTest> {
    vec![
        fitness_test(1, "Push-ups", "Strength", "upper body"),
        fitness_test(2, "Sprint", "Endurance", "speed"),
    ]
}

pub fn chat_message(id: i64, sender: Sender, text: &str, timestamp: &str) -> ChatMessage {
    ChatMessage {
        id: MessageId::new(id),
        sender,
        text: text.to_owned(),
        timestamp: timestamp.to_owned(),
    }
}

pub fn fixture_now() -> OffsetDateTime {
    datetime!(2024-09-16 14:35 UTC)
}

pub fn fixture_dataset() -> Dataset {
    Dataset {
        tests: vec![
            fitness_test(1, "Push-ups", "Strength", "Test upper body strength"),
            fitness_test(2, "Vertical Jump", "Agility", "Measure explosive leg power"),
            fitness_test(3, "Sit-ups", "Strength", "Core strength and endurance"),
        ],
        categories: vec![
            category("Strength", 2),
            category("Agility", 1),
            category("Endurance", 0),
        ],
        chat_history: vec![
            chat_message(1, Sender::Assistant, "Ready to improve your form?", "14:30"),
            chat_message(2, Sender::User, "Yes, how?", "14:32"),
        ],
        leaderboard: vec![
            leaderboard_entry(2, "Arjun Singh", 1180, false),
            leaderboard_entry(1, "Priya Patel", 1250, false),
            leaderboard_entry(145, "Rahul Sharma", 785, true),
        ],
        achievements: vec![
            achievement(1, "First Steps", "milestone", true, None),
            achievement(2, "Strength Master", "performance", false, Some((28, 50))),
        ],
        profile: AthleteProfile {
            name: "Rahul Sharma".to_owned(),
            tests_completed: 12,
            recent_score: 78.5,
            rank: 145,
            total_athletes: 15_420,
            recent_activity: vec![ActivityRecord {
                test: "Push-ups".to_owned(),
                score: 22.0,
                date: date!(2024 - 09 - 16),
                time: "14:30".to_owned(),
            }],
        },
        competitions: vec![Competition {
            name: "Push-up Challenge".to_owned(),
            participants: 1200,
            end_date: date!(2024 - 09 - 25),
            prize: "State Recognition".to_owned(),
        }],
        training_plan: Some(TrainingPlan {
            name: "Upper Body Strength".to_owned(),
            week: 2,
            total_weeks: 8,
            progress: 65,
            exercises: vec![
                plan_exercise("Push-ups", Some((3, 12)), None, true),
                plan_exercise("Plank", None, Some("60s"), false),
            ],
        }),
        nutrition: Some(NutritionSummary {
            score: 78,
            meals: vec![MealSuggestion {
                name: "Protein Bowl".to_owned(),
                calories: 420,
                protein: 32,
            }],
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

pub fn plan_exercise(
    name: &str,
    sets_reps: Option<(u32, u32)>,
    duration: Option<&str>,
    completed: bool,
) -> PlanExercise {
    PlanExercise {
        name: name.to_owned(),
        sets: sets_reps.map(|(sets, _)| sets),
        reps: sets_reps.map(|(_, reps)| reps),
        duration: duration.map(str::to_owned),
        completed,
    }
}

pub fn category(name: &str, count: usize) -> Category {
    Category {
        name: name.to_owned(),
        icon: String::new(),
        color: String::new(),
        count,
    }
}

pub fn leaderboard_entry(rank: u32, name: &str, score: u64, current: bool) -> LeaderboardEntry {
    LeaderboardEntry {
        rank,
        name: name.to_owned(),
        location: "Pune".to_owned(),
        total_score: score,
        is_current_user: current,
    }
}

pub fn achievement(
    id: i64,
    name: &str,
    category: &str,
    earned: bool,
    progress: Option<(u32, u32)>,
) -> Achievement {
    Achievement {
        id: AchievementId::new(id),
        name: name.to_owned(),
        icon: String::new(),
        category: category.to_owned(),
        earned,
        progress: progress.map(|(current, required)| Progress { current, required }),
        points: 25,
    }
}

pub fn write_dataset(dataset: &Dataset) -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("dataset.json");
    let json = serde_json::to_string_pretty(dataset).context("encode dataset")?;
    std::fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
    Ok((dir, path))
}
