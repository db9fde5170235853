// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;

use crate::Achievement;

pub const POINTS_PER_EARNED: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AchievementFilter {
    #[default]
    All,
    Category(String),
}

impl AchievementFilter {
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Category(value.to_owned())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Category(name) => name,
        }
    }
}

pub fn filter_achievements(
    achievements: &[Achievement],
    filter: &AchievementFilter,
) -> Vec<Achievement> {
    achievements
        .iter()
        .filter(|achievement| match filter {
            AchievementFilter::All => true,
            AchievementFilter::Category(name) => achievement.category == *name,
        })
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AchievementStats {
    pub earned: usize,
    pub total: usize,
    pub points: u32,
}

pub fn achievement_stats(achievements: &[Achievement]) -> AchievementStats {
    let earned = achievements.iter().filter(|a| a.earned).count();
    AchievementStats {
        earned,
        total: achievements.len(),
        points: u32::try_from(earned)
            .unwrap_or(u32::MAX)
            .saturating_mul(POINTS_PER_EARNED),
    }
}

pub fn achievement_category_counts(achievements: &[Achievement]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for achievement in achievements {
        *counts.entry(achievement.category.clone()).or_insert(0) += 1;
    }
    counts
}

/// Rounded completion percentage in `0..=100`. Earned achievements are 100.
pub fn progress_percent(achievement: &Achievement) -> u8 {
    if achievement.earned {
        return 100;
    }
    let Some(progress) = achievement.progress else {
        return 0;
    };
    if progress.required == 0 {
        return 0;
    }
    let ratio = f64::from(progress.current) / f64::from(progress.required);
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Earned achievements may only carry progress that is already complete.
pub fn progress_is_consistent(achievement: &Achievement) -> bool {
    match (achievement.earned, achievement.progress) {
        (true, Some(progress)) => progress.current == progress.required,
        _ => true,
    }
}
