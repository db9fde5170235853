// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use stride_app::{
    AchievementFilter, AppCommand, AppEvent, AppState, CategoryFilter, ChatMessage, Clock,
    LeaderboardEntry, Medal, MessageId, ReplyTimer, TabKind, TestId, TestResult,
    achievement_category_counts, achievement_stats, format_points, progress_percent,
};
use time::Date;
use tracing::{debug, info};

const COACH_POLL: Duration = Duration::from_millis(100);
const RECENT_ACTIVITY_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoachInput {
    Line(String),
    Idle,
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoachFlow {
    Continue,
    Quit,
}

/// Ordering and length of the printed community ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeaderboardView {
    pub by_score: bool,
    pub top: Option<usize>,
}

/// Line-oriented front end over [`AppState`]. Every screen is reached
/// through `dispatch` so the terminal and the view-model stay in step.
pub struct Runtime<T: ReplyTimer, C: Clock> {
    state: AppState<T, C>,
}

impl<T: ReplyTimer, C: Clock> Runtime<T, C> {
    pub fn new(state: AppState<T, C>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState<T, C> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState<T, C> {
        &mut self.state
    }

    pub fn render_home<W: Write>(&mut self, today: Date, out: &mut W) -> Result<()> {
        self.state.dispatch(AppCommand::SelectTab(TabKind::Home));
        let profile = self.state.profile();
        writeln!(out, "{}", profile.name)?;
        writeln!(
            out,
            "tests {}  best score {}%  rank #{} of {}",
            profile.tests_completed,
            profile.recent_score,
            profile.rank,
            format_points(u64::from(profile.total_athletes)),
        )?;

        let progress = self.state.gamification();
        writeln!(
            out,
            "streak {} days  points {}",
            progress.daily_streak,
            format_points(progress.points)
        )?;
        if let Some(challenge) = &progress.weekly_challenge {
            let status = if challenge.is_complete() { "  done" } else { "" };
            writeln!(
                out,
                "challenge {}  {}/{} ({}%)  +{} points{status}",
                challenge.name,
                challenge.progress,
                challenge.total,
                challenge.progress_percent(),
                challenge.reward
            )?;
        }

        let recent = profile.latest_activity(RECENT_ACTIVITY_LIMIT);
        if !recent.is_empty() {
            writeln!(out)?;
            writeln!(out, "recent activity")?;
            for record in recent {
                writeln!(
                    out,
                    "  {}  {} {}  {}",
                    record.test, record.date, record.time, record.score
                )?;
            }
        }

        let open: Vec<_> = self
            .state
            .competitions()
            .iter()
            .filter(|competition| competition.is_open_on(today))
            .collect();
        if !open.is_empty() {
            writeln!(out)?;
            writeln!(out, "open competitions")?;
            for competition in open {
                writeln!(
                    out,
                    "  {}  ends {}  {} athletes  prize: {}",
                    competition.name,
                    competition.end_date,
                    format_points(u64::from(competition.participants)),
                    competition.prize
                )?;
            }
        }
        Ok(())
    }

    pub fn render_tests<W: Write>(
        &mut self,
        search: &str,
        category: &CategoryFilter,
        out: &mut W,
    ) -> Result<()> {
        self.state.dispatch(AppCommand::SelectTab(TabKind::Tests));
        self.state.dispatch(AppCommand::SetSearch(search.to_owned()));
        self.state
            .dispatch(AppCommand::SelectCategory(category.clone()));

        for test in self.state.visible_tests() {
            let last = test
                .last_score
                .map_or_else(|| "not taken".to_owned(), |score| format!("last {score}"));
            writeln!(
                out,
                "{:>3}  {:<16} {:<12} {:<6} {:<8} {}",
                test.id,
                test.name,
                test.category,
                test.difficulty.as_str(),
                test.estimated_time,
                last
            )?;
        }
        writeln!(out, "{}", self.state.result_label())?;
        Ok(())
    }

    pub fn render_categories<W: Write>(&self, out: &mut W) -> Result<()> {
        for category in self.state.catalog.categories() {
            writeln!(out, "{:<12} {}", category.name, category.count)?;
        }
        Ok(())
    }

    /// Prints the ranking. Medals follow the printed order; when `top`
    /// cuts the current user off, their row is appended after a gap.
    pub fn render_leaderboard<W: Write>(
        &mut self,
        view: LeaderboardView,
        out: &mut W,
    ) -> Result<()> {
        self.state
            .dispatch(AppCommand::SelectTab(TabKind::Community));
        let board = self.state.leaderboard();
        let rows: Vec<&LeaderboardEntry> = match (view.by_score, view.top) {
            (true, top) => {
                let mut rows = board.by_score();
                if let Some(count) = top {
                    rows.truncate(count);
                }
                rows
            }
            (false, Some(count)) => board.top(count).iter().collect(),
            (false, None) => board.entries().iter().collect(),
        };
        for (index, entry) in rows.iter().enumerate() {
            write_leaderboard_row(out, entry, Medal::for_position(index))?;
        }
        let shown = rows.iter().any(|entry| entry.is_current_user);
        if let Some(me) = board.current_user().filter(|_| !shown) {
            writeln!(out, "...")?;
            write_leaderboard_row(out, me, None)?;
        }
        Ok(())
    }

    pub fn render_achievements<W: Write>(
        &mut self,
        filter: AchievementFilter,
        out: &mut W,
    ) -> Result<()> {
        self.state
            .dispatch(AppCommand::SelectTab(TabKind::Profile));
        self.state.dispatch(AppCommand::FilterAchievements(filter));

        let stats = achievement_stats(self.state.achievements());
        writeln!(
            out,
            "{} of {} earned, {} points",
            stats.earned, stats.total, stats.points
        )?;
        let counts = achievement_category_counts(self.state.achievements());
        let chips: Vec<String> = counts
            .iter()
            .map(|(name, count)| format!("{name} {count}"))
            .collect();
        writeln!(out, "all {}  {}", stats.total, chips.join("  "))?;

        for achievement in self.state.visible_achievements() {
            let state = if achievement.earned {
                "earned".to_owned()
            } else {
                format!("{}%", progress_percent(&achievement))
            };
            writeln!(
                out,
                "  {:<22} {:<12} {state}",
                achievement.name, achievement.category
            )?;
        }
        Ok(())
    }

    pub fn render_history<W: Write>(&self, out: &mut W) -> Result<()> {
        for message in self.state.messages() {
            write_message(out, message)?;
        }
        Ok(())
    }

    /// Feeds one input to the coach chat and prints whatever it produces.
    pub fn coach_step<W: Write>(&mut self, input: CoachInput, out: &mut W) -> Result<CoachFlow> {
        match input {
            CoachInput::Line(line) if line.trim() == "/quit" => {
                self.close_coach(out)?;
                return Ok(CoachFlow::Quit);
            }
            CoachInput::Line(line) => {
                self.state.dispatch(AppCommand::EditDraft(line));
                for event in self.state.dispatch(AppCommand::SendDraft) {
                    match event {
                        AppEvent::MessageSent(id) => debug!(id = %id, "coach question sent"),
                        AppEvent::StatusUpdated(status) => writeln!(out, "! {status}")?,
                        _ => {}
                    }
                }
            }
            CoachInput::Idle => {}
            CoachInput::Eof => {
                self.close_coach(out)?;
                return Ok(CoachFlow::Quit);
            }
        }

        let delivered = self.state.dispatch(AppCommand::PumpReplies);
        for event in delivered {
            if let AppEvent::ReplyDelivered(id) = event {
                self.write_message_by_id(id, out)?;
            }
        }
        out.flush()?;
        Ok(CoachFlow::Continue)
    }

    /// Current training plan and nutrition summary, when the source has them.
    pub fn render_plan<W: Write>(&self, out: &mut W) -> Result<()> {
        if let Some(plan) = self.state.training_plan() {
            writeln!(
                out,
                "{}  week {} of {}  {}% complete  {}/{} exercises done",
                plan.name,
                plan.week,
                plan.total_weeks,
                plan.progress_percent(),
                plan.completed_exercises(),
                plan.exercises.len()
            )?;
            for exercise in &plan.exercises {
                let mark = if exercise.completed { "x" } else { " " };
                writeln!(
                    out,
                    "  [{mark}] {:<18} {}",
                    exercise.name,
                    exercise.prescription()
                )?;
            }
        }
        if let Some(nutrition) = self.state.nutrition() {
            writeln!(out, "nutrition score {}/100", nutrition.score_percent())?;
            for meal in &nutrition.meals {
                writeln!(
                    out,
                    "  {:<18} {} kcal  {}g protein",
                    meal.name, meal.calories, meal.protein
                )?;
            }
        }
        Ok(())
    }

    /// Interactive chat on stdin. Lines are read on a helper thread so
    /// replies print as soon as their delay elapses.
    pub fn run_coach<W: Write>(&mut self, out: &mut W) -> Result<()> {
        self.state.dispatch(AppCommand::SelectTab(TabKind::Coach));
        self.render_plan(out)?;
        self.render_history(out)?;
        writeln!(out, "(type a question, /quit to leave)")?;
        out.flush()?;

        let (tx, rx) = mpsc::channel::<String>();
        thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        loop {
            let input = match rx.recv_timeout(COACH_POLL) {
                Ok(line) => CoachInput::Line(line),
                Err(RecvTimeoutError::Timeout) => CoachInput::Idle,
                Err(RecvTimeoutError::Disconnected) => CoachInput::Eof,
            };
            if self.coach_step(input, out)? == CoachFlow::Quit {
                return Ok(());
            }
        }
    }

    /// Runs one capture hand-off. Each input line is a raw message from the
    /// capture page; `/error <reason>` reports a load failure and `/retry`
    /// reloads the page.
    pub fn run_capture<R: BufRead, W: Write>(
        &mut self,
        test: TestId,
        input: R,
        out: &mut W,
    ) -> Result<TestResult> {
        for event in self.state.dispatch(AppCommand::StartCapture(test)) {
            match event {
                AppEvent::CaptureStarted { url, .. } => {
                    writeln!(out, "open {url} to record the test")?;
                }
                AppEvent::StatusUpdated(status) => bail!("{status}; run `stride tests` for ids"),
                _ => {}
            }
        }
        self.state.dispatch(AppCommand::CaptureLoaded);
        out.flush()?;

        for line in input.lines() {
            let line = line.context("read capture message")?;
            let trimmed = line.trim();
            let command = if trimmed == "/retry" {
                AppCommand::RetryCapture
            } else if let Some(reason) = trimmed.strip_prefix("/error") {
                AppCommand::CaptureLoadFailed(reason.trim().to_owned())
            } else {
                AppCommand::CaptureMessage(line)
            };
            let retrying = command == AppCommand::RetryCapture;

            for event in self.state.dispatch(command) {
                match event {
                    AppEvent::CaptureFinished(result) => {
                        self.write_result(&result, out)?;
                        return Ok(result);
                    }
                    AppEvent::CaptureFailed(reason) => {
                        writeln!(out, "capture page failed: {reason}; type /retry")?;
                    }
                    AppEvent::StatusUpdated(status) => writeln!(out, "{status}")?,
                    _ => {}
                }
            }
            if retrying {
                self.state.dispatch(AppCommand::CaptureLoaded);
            }
            out.flush()?;
        }

        bail!("capture input ended before test {test} finished")
    }

    fn close_coach<W: Write>(&mut self, out: &mut W) -> Result<()> {
        for event in self.state.dispatch(AppCommand::CloseChat) {
            if let AppEvent::ChatClosed { cancelled } = event {
                info!(cancelled, "coach session ended");
                if cancelled > 0 {
                    writeln!(out, "({cancelled} pending replies cancelled)")?;
                }
            }
        }
        out.flush()?;
        Ok(())
    }

    fn write_message_by_id<W: Write>(&self, id: MessageId, out: &mut W) -> Result<()> {
        if let Some(message) = self.state.messages().iter().find(|m| m.id == id) {
            write_message(out, message)?;
        }
        Ok(())
    }

    fn write_result<W: Write>(&self, result: &TestResult, out: &mut W) -> Result<()> {
        let Some(test) = self.state.catalog.find(result.test_id) else {
            bail!("finished capture for unknown test {}", result.test_id);
        };
        writeln!(out, "{} complete", test.name)?;
        writeln!(
            out,
            "score {}  reps {}  form {}%  {}% of benchmark {}",
            result.score,
            result.reps,
            result.form,
            result.percent_of_target(test.benchmark),
            test.benchmark
        )?;
        Ok(())
    }
}

fn write_leaderboard_row<W: Write>(
    out: &mut W,
    entry: &LeaderboardEntry,
    medal: Option<Medal>,
) -> Result<()> {
    let marker = if entry.is_current_user { "  <- you" } else { "" };
    writeln!(
        out,
        "#{:<4} {:<6} {:<14} {:<10} {:>6}{marker}",
        entry.rank,
        medal.map_or("", Medal::label),
        entry.name,
        entry.location,
        format_points(entry.total_score),
    )?;
    Ok(())
}

fn write_message<W: Write>(out: &mut W, message: &ChatMessage) -> Result<()> {
    writeln!(
        out,
        "[{}] {}: {}",
        message.timestamp,
        message.sender.label(),
        message.text
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{CoachFlow, CoachInput, LeaderboardView, Runtime};
    use anyhow::Result;
    use std::io::Cursor;
    use std::time::Duration;
    use stride_app::{
        AchievementFilter, AppState, CategoryFilter, ChatConfig, Dataset, FixedClock,
        ManualTimer, StateOptions, TabKind, TestId,
    };
    use stride_testkit::{fixture_dataset, fixture_now};
    use time::macros::date;

    fn runtime(options: StateOptions) -> Result<Runtime<ManualTimer, FixedClock>> {
        runtime_with(&fixture_dataset(), options)
    }

    fn runtime_with(
        dataset: &Dataset,
        options: StateOptions,
    ) -> Result<Runtime<ManualTimer, FixedClock>> {
        let state = AppState::load(
            dataset,
            ManualTimer::new(),
            FixedClock::new(fixture_now()),
            options,
        )?;
        Ok(Runtime::new(state))
    }

    fn text(buffer: Vec<u8>) -> String {
        String::from_utf8(buffer).expect("utf-8 output")
    }

    #[test]
    fn tests_listing_ends_with_result_label() -> Result<()> {
        let mut runtime = runtime(StateOptions::default())?;
        let mut out = Vec::new();
        runtime.render_tests("", &CategoryFilter::parse("Strength"), &mut out)?;
        let output = text(out);
        assert!(output.contains("Push-ups"));
        assert!(output.contains("Sit-ups"));
        assert!(!output.contains("Vertical Jump"));
        assert!(output.ends_with("2 results\n"));
        assert_eq!(runtime.state().active_tab, TabKind::Tests);
        Ok(())
    }

    #[test]
    fn single_match_uses_singular_label() -> Result<()> {
        let mut runtime = runtime(StateOptions::default())?;
        let mut out = Vec::new();
        runtime.render_tests("jump", &CategoryFilter::All, &mut out)?;
        assert!(text(out).ends_with("1 result\n"));
        Ok(())
    }

    #[test]
    fn categories_list_names_with_counts() -> Result<()> {
        let runtime = runtime(StateOptions::default())?;
        let mut out = Vec::new();
        runtime.render_categories(&mut out)?;
        let output = text(out);
        let rows: Vec<Vec<&str>> = output
            .lines()
            .map(|line| line.split_whitespace().collect())
            .collect();
        assert_eq!(
            rows,
            vec![
                vec!["Strength", "2"],
                vec!["Agility", "1"],
                vec!["Endurance", "0"]
            ]
        );
        Ok(())
    }

    #[test]
    fn leaderboard_marks_medals_and_current_user() -> Result<()> {
        let mut runtime = runtime(StateOptions::default())?;
        let mut out = Vec::new();
        runtime.render_leaderboard(LeaderboardView::default(), &mut out)?;
        let output = text(out);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("gold") && lines[0].contains("Priya Patel"));
        assert!(lines[1].contains("silver"));
        assert!(lines[2].contains("<- you") && lines[2].contains("bronze"));
        assert!(lines[0].contains("1,250"));
        Ok(())
    }

    #[test]
    fn leaderboard_top_keeps_current_user_below_cut() -> Result<()> {
        let mut runtime = runtime(StateOptions::default())?;
        let mut out = Vec::new();
        let view = LeaderboardView {
            by_score: false,
            top: Some(2),
        };
        runtime.render_leaderboard(view, &mut out)?;
        let output = text(out);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("Arjun Singh"));
        assert_eq!(lines[2], "...");
        assert!(lines[3].starts_with("#145"));
        assert!(lines[3].contains("<- you"));
        assert!(!lines[3].contains("bronze"));
        Ok(())
    }

    #[test]
    fn leaderboard_by_score_reassigns_medals() -> Result<()> {
        let mut dataset = fixture_dataset();
        for entry in &mut dataset.leaderboard {
            if entry.name == "Arjun Singh" {
                entry.total_score = 1300;
            }
        }
        let mut runtime = runtime_with(&dataset, StateOptions::default())?;
        let mut out = Vec::new();
        let view = LeaderboardView {
            by_score: true,
            top: Some(1),
        };
        runtime.render_leaderboard(view, &mut out)?;
        let output = text(out);
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].starts_with("#2"));
        assert!(lines[0].contains("gold") && lines[0].contains("1,300"));
        assert!(!output.contains("Priya Patel"));
        assert!(lines[lines.len() - 1].contains("Rahul Sharma"));
        Ok(())
    }

    #[test]
    fn achievements_report_stats_and_filter() -> Result<()> {
        let mut runtime = runtime(StateOptions::default())?;
        let mut out = Vec::new();
        runtime.render_achievements(AchievementFilter::parse("performance"), &mut out)?;
        let output = text(out);
        assert!(output.starts_with("1 of 2 earned, 100 points\n"));
        assert!(output.contains("Strength Master"));
        assert!(output.contains("56%"));
        assert!(!output.contains("First Steps"));
        Ok(())
    }

    #[test]
    fn home_lists_open_competitions_only() -> Result<()> {
        let mut runtime = runtime(StateOptions::default())?;
        let mut open = Vec::new();
        runtime.render_home(date!(2024 - 09 - 20), &mut open)?;
        assert!(text(open).contains("Push-up Challenge"));

        let mut closed = Vec::new();
        runtime.render_home(date!(2024 - 10 - 01), &mut closed)?;
        let output = text(closed);
        assert!(output.contains("rank #145 of 15,420"));
        assert!(!output.contains("open competitions"));
        Ok(())
    }

    #[test]
    fn home_shows_streak_points_and_weekly_challenge() -> Result<()> {
        let mut runtime = runtime(StateOptions::default())?;
        let mut out = Vec::new();
        runtime.render_home(date!(2024 - 10 - 01), &mut out)?;
        let output = text(out);
        assert!(output.contains("streak 7 days  points 2,340\n"));
        assert!(output.contains("challenge Complete 5 Different Tests  3/5 (60%)  +100 points\n"));
        Ok(())
    }

    #[test]
    fn home_marks_finished_challenge() -> Result<()> {
        let mut dataset = fixture_dataset();
        if let Some(challenge) = dataset.gamification.weekly_challenge.as_mut() {
            challenge.progress = 7;
        }
        let mut runtime = runtime_with(&dataset, StateOptions::default())?;
        let mut out = Vec::new();
        runtime.render_home(date!(2024 - 10 - 01), &mut out)?;
        assert!(text(out).contains("7/5 (100%)  +100 points  done"));
        Ok(())
    }

    #[test]
    fn plan_lists_exercises_and_meals() -> Result<()> {
        let runtime = runtime(StateOptions::default())?;
        let mut out = Vec::new();
        runtime.render_plan(&mut out)?;
        let output = text(out);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines[0],
            "Upper Body Strength  week 2 of 8  65% complete  1/2 exercises done"
        );
        assert!(lines[1].starts_with("  [x] Push-ups") && lines[1].ends_with("3 x 12"));
        assert!(lines[2].starts_with("  [ ] Plank") && lines[2].ends_with("60s"));
        assert_eq!(lines[3], "nutrition score 78/100");
        assert!(lines[4].contains("Protein Bowl") && lines[4].ends_with("420 kcal  32g protein"));
        Ok(())
    }

    #[test]
    fn plan_is_silent_without_plan_or_nutrition() -> Result<()> {
        let mut dataset = fixture_dataset();
        dataset.training_plan = None;
        dataset.nutrition = None;
        let runtime = runtime_with(&dataset, StateOptions::default())?;
        let mut out = Vec::new();
        runtime.render_plan(&mut out)?;
        assert!(out.is_empty());
        Ok(())
    }

    #[test]
    fn coach_prints_reply_after_delay() -> Result<()> {
        let mut runtime = runtime(StateOptions::default())?;
        let mut out = Vec::new();

        let flow = runtime.coach_step(CoachInput::Line("Hello".to_owned()), &mut out)?;
        assert_eq!(flow, CoachFlow::Continue);
        assert!(out.is_empty());

        runtime
            .state_mut()
            .chat_mut()
            .timer_mut()
            .advance(Duration::from_secs(1));
        runtime.coach_step(CoachInput::Idle, &mut out)?;
        let output = text(out);
        assert!(output.starts_with("[14:35] coach: Thanks for your question!"));
        Ok(())
    }

    #[test]
    fn coach_quit_cancels_pending_replies() -> Result<()> {
        let mut runtime = runtime(StateOptions::default())?;
        let mut out = Vec::new();
        runtime.coach_step(CoachInput::Line("one".to_owned()), &mut out)?;
        runtime.coach_step(CoachInput::Line("two".to_owned()), &mut out)?;

        let flow = runtime.coach_step(CoachInput::Line(" /quit ".to_owned()), &mut out)?;
        assert_eq!(flow, CoachFlow::Quit);
        assert_eq!(text(out), "(2 pending replies cancelled)\n");
        assert_eq!(runtime.state().messages().len(), 4);
        Ok(())
    }

    #[test]
    fn coach_reports_busy_when_capped() -> Result<()> {
        let options = StateOptions {
            chat: ChatConfig {
                max_pending: Some(1),
                ..ChatConfig::default()
            },
            ..StateOptions::default()
        };
        let mut runtime = runtime(options)?;
        let mut out = Vec::new();
        runtime.coach_step(CoachInput::Line("one".to_owned()), &mut out)?;
        runtime.coach_step(CoachInput::Line("two".to_owned()), &mut out)?;
        assert_eq!(text(out), "! coach is still replying\n");
        Ok(())
    }

    #[test]
    fn capture_finishes_on_completion_signal() -> Result<()> {
        let mut runtime = runtime(StateOptions::default())?;
        let input = Cursor::new("page ready\n/error offline\n/retry\nTest COMPLETE\n");
        let mut out = Vec::new();
        let result = runtime.run_capture(TestId::new(1), input, &mut out)?;
        assert_eq!(result.reps, 25);

        let output = text(out);
        assert!(output.contains("?test=1"));
        assert!(output.contains("capture page failed: offline; type /retry"));
        assert!(output.contains("Push-ups complete"));
        assert_eq!(runtime.state().active_tab, TabKind::Tests);
        Ok(())
    }

    #[test]
    fn capture_rejects_unknown_test() -> Result<()> {
        let mut runtime = runtime(StateOptions::default())?;
        let mut out = Vec::new();
        let error = runtime
            .run_capture(TestId::new(99), Cursor::new(""), &mut out)
            .expect_err("unknown test must fail");
        assert!(error.to_string().contains("unknown test 99"));
        Ok(())
    }

    #[test]
    fn capture_without_signal_fails_at_eof() -> Result<()> {
        let mut runtime = runtime(StateOptions::default())?;
        let mut out = Vec::new();
        let error = runtime
            .run_capture(TestId::new(2), Cursor::new("still going\n"), &mut out)
            .expect_err("eof before completion must fail");
        assert!(error.to_string().contains("before test 2 finished"));
        Ok(())
    }
}
