// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use stride_app::{CategoryFilter, count_by_category, filter_tests};
use stride_testkit::{AthleteFaker, scenario_tests};

const SEEDS: std::ops::Range<u64> = 1..40;

#[test]
fn scenario_search_and_category_walkthrough() {
    let tests = scenario_tests();
    assert_eq!(
        filter_tests(&tests, "sprint", &CategoryFilter::All),
        vec![tests[1].clone()]
    );
    assert_eq!(
        filter_tests(&tests, "", &CategoryFilter::parse("Strength")),
        vec![tests[0].clone()]
    );
    assert!(filter_tests(&tests, "zzz", &CategoryFilter::All).is_empty());
}

#[test]
fn empty_query_with_all_returns_input_unchanged() {
    for seed in SEEDS {
        let tests = AthleteFaker::new(seed).catalog(seed as usize % 12);
        assert_eq!(filter_tests(&tests, "", &CategoryFilter::All), tests);
    }
}

#[test]
fn category_filter_agrees_with_counts() {
    for seed in SEEDS {
        let mut faker = AthleteFaker::new(seed);
        let tests = faker.catalog(15);
        let counts = count_by_category(&tests);
        for (category, count) in &counts {
            let visible = filter_tests(&tests, "", &CategoryFilter::Named(category.clone()));
            assert!(visible.iter().all(|test| &test.category == category));
            assert_eq!(visible.len(), *count, "seed {seed} category {category}");
        }
        assert_eq!(counts.values().sum::<usize>(), tests.len());
    }
}

#[test]
fn search_results_contain_query_and_nothing_is_missed() {
    for seed in SEEDS {
        let mut faker = AthleteFaker::new(seed);
        let tests = faker.catalog(12);
        let query = faker.query_for(&tests);
        let needle = query.to_lowercase();
        let visible = filter_tests(&tests, &query, &CategoryFilter::All);

        for test in &tests {
            let matches = test.name.to_lowercase().contains(&needle)
                || test.description.to_lowercase().contains(&needle);
            assert_eq!(
                visible.contains(test),
                matches,
                "seed {seed} query {query:?} test {}",
                test.name
            );
        }
    }
}

#[test]
fn filter_is_idempotent_and_order_preserving() {
    for seed in SEEDS {
        let mut faker = AthleteFaker::new(seed);
        let tests = faker.catalog(20);
        let query = faker.query_for(&tests);
        let category = CategoryFilter::parse(faker.category_name());

        let once = filter_tests(&tests, &query, &category);
        let twice = filter_tests(&once, &query, &category);
        assert_eq!(once, twice);
        assert!(once.len() <= tests.len());

        let positions: Vec<usize> = once
            .iter()
            .map(|test| {
                tests
                    .iter()
                    .position(|candidate| candidate.id == test.id)
                    .expect("result comes from input")
            })
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
