// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use std::collections::{BTreeMap, BTreeSet};
use stride_app::{DataSource, count_by_category, progress_is_consistent};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IssueKind {
    CategoryCountDrift,
    UnknownCategory,
    DuplicateTestId,
    NonPositiveRank,
    DuplicateRank,
    MultipleCurrentUsers,
    InconsistentProgress,
    BlankChatMessage,
    PlanOutOfRange,
}

impl IssueKind {
    /// Warnings are reported but never fail a check.
    pub const fn is_warning(self) -> bool {
        matches!(self, Self::CategoryCountDrift | Self::UnknownCategory)
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CategoryCountDrift => f.write_str("category count drift"),
            Self::UnknownCategory => f.write_str("unknown category"),
            Self::DuplicateTestId => f.write_str("duplicate test id"),
            Self::NonPositiveRank => f.write_str("non-positive rank"),
            Self::DuplicateRank => f.write_str("duplicate rank"),
            Self::MultipleCurrentUsers => f.write_str("multiple current users"),
            Self::InconsistentProgress => f.write_str("inconsistent achievement progress"),
            Self::BlankChatMessage => f.write_str("blank chat message"),
            Self::PlanOutOfRange => f.write_str("training plan out of range"),
        }
    }
}

impl std::error::Error for IssueKind {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetIssue {
    pub kind: IssueKind,
    pub detail: String,
}

impl std::fmt::Display for DatasetIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.detail)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetReport {
    issues: Vec<DatasetIssue>,
}

impl DatasetReport {
    pub fn issues(&self) -> &[DatasetIssue] {
        &self.issues
    }

    pub fn warnings(&self) -> impl Iterator<Item = &DatasetIssue> {
        self.issues.iter().filter(|issue| issue.kind.is_warning())
    }

    pub fn errors(&self) -> impl Iterator<Item = &DatasetIssue> {
        self.issues.iter().filter(|issue| !issue.kind.is_warning())
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn kinds(&self) -> BTreeSet<IssueKind> {
        self.issues.iter().map(|issue| issue.kind).collect()
    }

    /// Fails with the first error; warnings alone pass.
    pub fn into_result(self) -> Result<()> {
        let count = self.errors().count();
        if let Some(first) = self.errors().next() {
            bail!("dataset has {count} error(s); first: {first}");
        }
        Ok(())
    }

    fn push(&mut self, kind: IssueKind, detail: String) {
        if kind.is_warning() {
            warn!(issue = %kind, %detail, "dataset warning");
        }
        self.issues.push(DatasetIssue { kind, detail });
    }
}

pub fn check_dataset(source: &dyn DataSource) -> Result<DatasetReport> {
    let mut report = DatasetReport::default();

    let tests = source.tests()?;
    let categories = source.categories()?;
    let live = count_by_category(&tests);

    for category in &categories {
        let actual = live.get(category.name.as_str()).copied().unwrap_or(0);
        if actual != category.count {
            report.push(
                IssueKind::CategoryCountDrift,
                format!(
                    "{} lists {} test(s) but the catalog has {actual}",
                    category.name, category.count
                ),
            );
        }
    }

    let known: BTreeSet<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    if !known.is_empty() {
        for name in live.keys() {
            if !known.contains(name.as_str()) {
                report.push(
                    IssueKind::UnknownCategory,
                    format!("{name} is used by tests but not listed"),
                );
            }
        }
    }

    let mut seen_ids = BTreeSet::new();
    for test in &tests {
        if !seen_ids.insert(test.id) {
            report.push(
                IssueKind::DuplicateTestId,
                format!("test {} ({}) reuses an id", test.id, test.name),
            );
        }
    }

    let rows = source.leaderboard()?;
    let mut ranks: BTreeMap<u32, &str> = BTreeMap::new();
    for row in &rows {
        if row.rank == 0 {
            report.push(
                IssueKind::NonPositiveRank,
                format!("{} has rank 0", row.name),
            );
            continue;
        }
        if let Some(previous) = ranks.insert(row.rank, row.name.as_str()) {
            report.push(
                IssueKind::DuplicateRank,
                format!("rank {} held by {previous} and {}", row.rank, row.name),
            );
        }
    }
    let current = rows.iter().filter(|row| row.is_current_user).count();
    if current > 1 {
        report.push(
            IssueKind::MultipleCurrentUsers,
            format!("{current} rows are marked as the current user"),
        );
    }

    for achievement in source.achievements()? {
        if !progress_is_consistent(&achievement) {
            report.push(
                IssueKind::InconsistentProgress,
                format!(
                    "{} is {} with progress {:?}",
                    achievement.name,
                    if achievement.earned { "earned" } else { "unearned" },
                    achievement.progress
                ),
            );
        }
    }

    for message in source.chat_history()? {
        if message.text.trim().is_empty() {
            report.push(
                IssueKind::BlankChatMessage,
                format!("message {} has no text", message.id),
            );
        }
    }

    if let Some(plan) = source.training_plan()? {
        if plan.week == 0 || plan.total_weeks == 0 || plan.week > plan.total_weeks {
            report.push(
                IssueKind::PlanOutOfRange,
                format!("{} is on week {} of {}", plan.name, plan.week, plan.total_weeks),
            );
        }
        if plan.progress > 100 {
            report.push(
                IssueKind::PlanOutOfRange,
                format!("{} reports {}% progress", plan.name, plan.progress),
            );
        }
    }

    Ok(report)
}
