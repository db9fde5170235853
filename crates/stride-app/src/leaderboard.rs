// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::LeaderboardEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Silver => "silver",
            Self::Bronze => "bronze",
        }
    }

    /// Medal for a zero-based display position.
    pub const fn for_position(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Gold),
            1 => Some(Self::Silver),
            2 => Some(Self::Bronze),
            _ => None,
        }
    }
}

/// Leaderboard rows ordered by rank, best first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new(mut entries: Vec<LeaderboardEntry>) -> Self {
        entries.sort_by_key(|entry| entry.rank);
        Self { entries }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn top(&self, count: usize) -> &[LeaderboardEntry] {
        &self.entries[..count.min(self.entries.len())]
    }

    pub fn current_user(&self) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|entry| entry.is_current_user)
    }

    pub fn by_score(&self) -> Vec<&LeaderboardEntry> {
        let mut rows: Vec<&LeaderboardEntry> = self.entries.iter().collect();
        rows.sort_by(|a, b| b.total_score.cmp(&a.total_score).then(a.rank.cmp(&b.rank)));
        rows
    }
}

pub fn format_points(points: u64) -> String {
    let digits = points.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
