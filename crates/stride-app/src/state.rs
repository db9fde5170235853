// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use tracing::info;

use crate::{
    Achievement, AchievementFilter, AthleteProfile, CaptureSession, CatalogQuery, Category,
    CategoryFilter, ChatConfig, ChatMessage, ChatSession, ChatState, Clock, Competition,
    DataSource, FitnessTest, Gamification, Leaderboard, MessageId, NutritionSummary, ReplyTimer,
    SubmitOutcome, TabKind, TestId, TestResult, TrainingPlan, filter_achievements, result_label,
    with_live_counts,
};

pub const DEFAULT_CAPTURE_URL: &str = "https://capture.stride.invalid/session";

/// Catalog inputs plus the data they filter.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogState {
    tests: Vec<FitnessTest>,
    categories: Vec<Category>,
    trust_supplied_counts: bool,
    pub query: CatalogQuery,
}

impl CatalogState {
    pub fn new(
        tests: Vec<FitnessTest>,
        categories: Vec<Category>,
        trust_supplied_counts: bool,
    ) -> Self {
        Self {
            tests,
            categories,
            trust_supplied_counts,
            query: CatalogQuery::default(),
        }
    }

    pub fn tests(&self) -> &[FitnessTest] {
        &self.tests
    }

    pub fn find(&self, id: TestId) -> Option<&FitnessTest> {
        self.tests.iter().find(|test| test.id == id)
    }

    pub fn visible(&self) -> Vec<FitnessTest> {
        self.query.apply(&self.tests)
    }

    pub fn result_label(&self) -> String {
        result_label(self.visible().len())
    }

    /// Category chips. Counts come from the catalog itself unless the
    /// supplied counts are explicitly trusted.
    pub fn categories(&self) -> Vec<Category> {
        if self.trust_supplied_counts {
            self.categories.clone()
        } else {
            with_live_counts(&self.categories, &self.tests)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateOptions {
    pub chat: ChatConfig,
    pub trust_category_counts: bool,
    pub capture_url: String,
}

impl Default for StateOptions {
    fn default() -> Self {
        Self {
            chat: ChatConfig::default(),
            trust_category_counts: false,
            capture_url: DEFAULT_CAPTURE_URL.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    NextTab,
    PrevTab,
    SelectTab(TabKind),
    SetSearch(String),
    SelectCategory(CategoryFilter),
    EditDraft(String),
    SendDraft,
    PumpReplies,
    CloseChat,
    FilterAchievements(AchievementFilter),
    StartCapture(TestId),
    CaptureLoaded,
    CaptureMessage(String),
    CaptureLoadFailed(String),
    RetryCapture,
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    TabChanged(TabKind),
    CatalogChanged { visible: usize },
    MessageSent(MessageId),
    ReplyDelivered(MessageId),
    ChatClosed { cancelled: usize },
    AchievementsFiltered { visible: usize },
    CaptureStarted { test: TestId, url: String },
    CaptureFinished(TestResult),
    CaptureFailed(String),
    StatusUpdated(String),
    StatusCleared,
}

/// Screen-independent view-model: owns every piece of UI state and
/// exposes it through read accessors and [`AppState::dispatch`].
pub struct AppState<T: ReplyTimer, C: Clock> {
    pub active_tab: TabKind,
    pub status_line: Option<String>,
    pub catalog: CatalogState,
    pub achievement_filter: AchievementFilter,
    achievements: Vec<Achievement>,
    leaderboard: Leaderboard,
    profile: AthleteProfile,
    competitions: Vec<Competition>,
    training_plan: Option<TrainingPlan>,
    nutrition: Option<NutritionSummary>,
    gamification: Gamification,
    chat: ChatSession<T, C>,
    chat_draft: String,
    capture_url: String,
    capture: Option<CaptureSession>,
    last_result: Option<TestResult>,
}

impl<T: ReplyTimer, C: Clock> AppState<T, C> {
    pub fn load(
        source: &dyn DataSource,
        timer: T,
        clock: C,
        options: StateOptions,
    ) -> Result<Self> {
        let tests = source.tests().context("load test catalog")?;
        let categories = source.categories().context("load categories")?;
        let history = source.chat_history().context("load coach chat history")?;
        let leaderboard = source.leaderboard().context("load leaderboard")?;
        let achievements = source.achievements().context("load achievements")?;
        let profile = source.profile().context("load athlete profile")?;
        let competitions = source.competitions().context("load competitions")?;
        let training_plan = source.training_plan().context("load training plan")?;
        let nutrition = source.nutrition().context("load nutrition summary")?;
        let gamification = source.gamification().context("load points and streak")?;
        info!(
            tests = tests.len(),
            categories = categories.len(),
            history = history.len(),
            "app state loaded"
        );

        Ok(Self {
            active_tab: TabKind::Home,
            status_line: None,
            catalog: CatalogState::new(tests, categories, options.trust_category_counts),
            achievement_filter: AchievementFilter::All,
            achievements,
            leaderboard: Leaderboard::new(leaderboard),
            profile,
            competitions,
            training_plan,
            nutrition,
            gamification,
            chat: ChatSession::new(history, timer, clock, options.chat),
            chat_draft: String::new(),
            capture_url: options.capture_url,
            capture: None,
            last_result: None,
        })
    }

    pub fn visible_tests(&self) -> Vec<FitnessTest> {
        self.catalog.visible()
    }

    pub fn result_label(&self) -> String {
        self.catalog.result_label()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.chat.messages()
    }

    pub fn chat_state(&self) -> ChatState {
        self.chat.state()
    }

    pub fn chat_draft(&self) -> &str {
        &self.chat_draft
    }

    pub fn chat_mut(&mut self) -> &mut ChatSession<T, C> {
        &mut self.chat
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn visible_achievements(&self) -> Vec<Achievement> {
        filter_achievements(&self.achievements, &self.achievement_filter)
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn profile(&self) -> &AthleteProfile {
        &self.profile
    }

    pub fn competitions(&self) -> &[Competition] {
        &self.competitions
    }

    pub fn training_plan(&self) -> Option<&TrainingPlan> {
        self.training_plan.as_ref()
    }

    pub fn nutrition(&self) -> Option<&NutritionSummary> {
        self.nutrition.as_ref()
    }

    pub fn gamification(&self) -> &Gamification {
        &self.gamification
    }

    pub fn capture(&self) -> Option<&CaptureSession> {
        self.capture.as_ref()
    }

    pub fn last_result(&self) -> Option<&TestResult> {
        self.last_result.as_ref()
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NextTab => self.rotate_tab(1),
            AppCommand::PrevTab => self.rotate_tab(-1),
            AppCommand::SelectTab(tab) => {
                self.active_tab = tab;
                vec![AppEvent::TabChanged(tab)]
            }
            AppCommand::SetSearch(search) => {
                self.catalog.query.search = search;
                self.catalog_changed()
            }
            AppCommand::SelectCategory(category) => {
                self.catalog.query.category = category;
                self.catalog_changed()
            }
            AppCommand::EditDraft(text) => {
                self.chat_draft = text;
                Vec::new()
            }
            AppCommand::SendDraft => self.send_draft(),
            AppCommand::PumpReplies => self
                .chat
                .pump()
                .into_iter()
                .map(AppEvent::ReplyDelivered)
                .collect(),
            AppCommand::CloseChat => {
                let cancelled = self.chat.close();
                vec![AppEvent::ChatClosed { cancelled }]
            }
            AppCommand::FilterAchievements(filter) => {
                self.achievement_filter = filter;
                vec![AppEvent::AchievementsFiltered {
                    visible: self.visible_achievements().len(),
                }]
            }
            AppCommand::StartCapture(test) => self.start_capture(test),
            AppCommand::CaptureLoaded => {
                if let Some(capture) = self.capture.as_mut() {
                    capture.on_loaded();
                }
                Vec::new()
            }
            AppCommand::CaptureMessage(raw) => self.capture_message(&raw),
            AppCommand::CaptureLoadFailed(reason) => {
                let Some(capture) = self.capture.as_mut() else {
                    return Vec::new();
                };
                capture.on_load_error(&reason);
                vec![
                    AppEvent::CaptureFailed(reason),
                    self.set_status("capture page failed to load; retry"),
                ]
            }
            AppCommand::RetryCapture => {
                let retried = self
                    .capture
                    .as_mut()
                    .is_some_and(|capture| capture.retry());
                if retried {
                    vec![self.set_status("retrying capture")]
                } else {
                    Vec::new()
                }
            }
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn rotate_tab(&mut self, delta: isize) -> Vec<AppEvent> {
        let tabs = TabKind::ALL;
        let current = tabs
            .iter()
            .position(|tab| *tab == self.active_tab)
            .unwrap_or(0) as isize;
        let len = tabs.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.active_tab = tabs[next];
        vec![AppEvent::TabChanged(self.active_tab)]
    }

    fn catalog_changed(&self) -> Vec<AppEvent> {
        vec![AppEvent::CatalogChanged {
            visible: self.catalog.visible().len(),
        }]
    }

    fn send_draft(&mut self) -> Vec<AppEvent> {
        match self.chat.submit(&self.chat_draft) {
            SubmitOutcome::Sent { message, .. } => {
                self.chat_draft.clear();
                vec![AppEvent::MessageSent(message)]
            }
            SubmitOutcome::Blank => Vec::new(),
            SubmitOutcome::Busy => vec![self.set_status("coach is still replying")],
            SubmitOutcome::Closed => vec![self.set_status("chat closed")],
        }
    }

    fn start_capture(&mut self, test: TestId) -> Vec<AppEvent> {
        if self.catalog.find(test).is_none() {
            return vec![self.set_status(&format!("unknown test {test}"))];
        }
        let session = CaptureSession::new(test, &self.capture_url);
        let url = session.url().to_owned();
        self.capture = Some(session);
        self.last_result = None;
        vec![AppEvent::CaptureStarted { test, url }]
    }

    fn capture_message(&mut self, raw: &str) -> Vec<AppEvent> {
        let Some(capture) = self.capture.as_mut() else {
            return Vec::new();
        };
        if capture.on_message(raw).is_none() {
            return Vec::new();
        }
        let result = TestResult::simulated(capture.test_id());
        self.capture = None;
        self.last_result = Some(result);
        self.active_tab = TabKind::Tests;
        vec![
            AppEvent::CaptureFinished(result),
            self.set_status("test complete"),
        ]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
