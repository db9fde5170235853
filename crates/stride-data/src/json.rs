// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use stride_app::{
    Achievement, AthleteProfile, Category, ChatMessage, Competition, DataSource, Dataset,
    FitnessTest, Gamification, LeaderboardEntry, NutritionSummary, TrainingPlan,
};
use tracing::debug;

/// Dataset loaded once from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonSource {
    path: PathBuf,
    dataset: Dataset,
}

impl JsonSource {
    pub fn open(path: &Path) -> Result<Self> {
        validate_dataset_path(&path.to_string_lossy())?;
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read dataset {}", path.display()))?;
        let dataset = Self::parse(&raw)
            .with_context(|| format!("parse dataset {}", path.display()))?;
        debug!(
            path = %path.display(),
            tests = dataset.tests.len(),
            messages = dataset.chat_history.len(),
            "dataset loaded"
        );
        Ok(Self {
            path: path.to_path_buf(),
            dataset,
        })
    }

    pub fn parse(raw: &str) -> Result<Dataset> {
        serde_json::from_str(raw).context("decode dataset JSON")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

impl DataSource for JsonSource {
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

pub fn validate_dataset_path(path: &str) -> Result<()> {
    if path.is_empty() {
        bail!("dataset path must not be empty");
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "dataset path {path:?} looks like a URL ({scheme}://); download it and pass a local file"
            );
        }
    }

    if path.starts_with("file:") {
        bail!("dataset path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    Ok(())
}
