// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use stride_app::{
    CategoryFilter, DataSource, Progress, Sender, filter_tests, with_live_counts,
};
use stride_data::{DemoSource, IssueKind, JsonSource, check_dataset, demo_dataset};
use stride_testkit::{
    achievement, chat_message, fixture_dataset, leaderboard_entry, write_dataset,
};

#[test]
fn json_source_round_trips_fixture_from_disk() -> Result<()> {
    let dataset = fixture_dataset();
    let (_dir, path) = write_dataset(&dataset)?;

    let source = JsonSource::open(&path)?;
    assert_eq!(source.path(), path.as_path());
    assert_eq!(source.tests()?, dataset.tests);
    assert_eq!(source.chat_history()?.len(), 2);
    assert_eq!(source.profile()?.name, "Rahul Sharma");
    Ok(())
}

#[test]
fn json_source_reports_missing_file_with_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.json");
    let error = JsonSource::open(&path).expect_err("missing file must fail");
    assert!(format!("{error:#}").contains("absent.json"));
}

#[test]
fn json_source_reports_malformed_json() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json")?;
    let error = JsonSource::open(&path).expect_err("malformed JSON must fail");
    assert!(format!("{error:#}").contains("decode dataset JSON"));
    Ok(())
}

#[test]
fn json_source_defaults_missing_plan_and_points() -> Result<()> {
    let mut value = serde_json::to_value(fixture_dataset())?;
    if let Some(object) = value.as_object_mut() {
        object.remove("training_plan");
        object.remove("nutrition");
        object.remove("gamification");
    }
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("older.json");
    std::fs::write(&path, serde_json::to_string(&value)?)?;

    let source = JsonSource::open(&path)?;
    assert_eq!(source.training_plan()?, None);
    assert_eq!(source.nutrition()?, None);
    let points = source.gamification()?;
    assert_eq!(points.points, 0);
    assert!(points.weekly_challenge.is_none());
    Ok(())
}

#[test]
fn demo_catalog_strength_filter_matches_live_count() -> Result<()> {
    let source = DemoSource::new();
    let tests = source.tests()?;
    let strength = filter_tests(&tests, "", &CategoryFilter::parse("Strength"));
    let names: Vec<&str> = strength.iter().map(|test| test.name.as_str()).collect();
    assert_eq!(names, vec!["Push-ups", "Sit-ups", "Plank"]);

    let live = with_live_counts(&source.categories()?, &tests);
    let counts: Vec<(&str, usize)> = live
        .iter()
        .map(|category| (category.name.as_str(), category.count))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("Strength", 3),
            ("Endurance", 1),
            ("Agility", 1),
            ("Flexibility", 0)
        ]
    );
    Ok(())
}

#[test]
fn demo_dataset_only_warns_about_supplied_counts() -> Result<()> {
    let report = check_dataset(&DemoSource::new())?;
    assert!(!report.has_errors(), "{:?}", report.issues());
    assert_eq!(report.warnings().count(), 4);
    assert!(
        report
            .issues()
            .iter()
            .all(|issue| issue.kind == IssueKind::CategoryCountDrift)
    );
    report.into_result()
}

#[test]
fn fixture_dataset_is_clean() -> Result<()> {
    let report = check_dataset(&fixture_dataset())?;
    assert!(report.issues().is_empty(), "{:?}", report.issues());
    Ok(())
}

#[test]
fn check_flags_every_structural_problem() -> Result<()> {
    let mut dataset = fixture_dataset();
    dataset.tests[2].id = dataset.tests[0].id;
    dataset.leaderboard.push(leaderboard_entry(2, "Sneha Reddy", 1155, true));
    dataset.leaderboard.push(leaderboard_entry(0, "Nobody", 0, false));
    dataset.achievements.push(achievement(
        3,
        "Perfect Form",
        "performance",
        true,
        Some((85, 95)),
    ));
    dataset
        .chat_history
        .push(chat_message(3, Sender::User, "   ", "14:34"));
    dataset.tests[1].category = "Balance".to_owned();
    if let Some(plan) = dataset.training_plan.as_mut() {
        plan.week = 9;
    }

    let report = check_dataset(&dataset)?;
    let kinds: Vec<IssueKind> = report.kinds().into_iter().collect();
    assert_eq!(
        kinds,
        vec![
            IssueKind::CategoryCountDrift,
            IssueKind::UnknownCategory,
            IssueKind::DuplicateTestId,
            IssueKind::NonPositiveRank,
            IssueKind::DuplicateRank,
            IssueKind::MultipleCurrentUsers,
            IssueKind::InconsistentProgress,
            IssueKind::BlankChatMessage,
            IssueKind::PlanOutOfRange,
        ]
    );
    let error = report.into_result().expect_err("errors fail the check");
    assert!(error.to_string().contains("error(s)"));
    Ok(())
}

#[test]
fn earned_achievement_without_progress_is_consistent() -> Result<()> {
    let mut dataset = demo_dataset();
    dataset.achievements[0].progress = None;
    dataset.achievements[1].progress = Some(Progress {
        current: 5,
        required: 5,
    });
    let report = check_dataset(&dataset)?;
    assert!(!report.kinds().contains(&IssueKind::InconsistentProgress));
    Ok(())
}
