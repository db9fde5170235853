// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod demo;
mod json;
pub mod validation;

pub use demo::{DemoSource, demo_dataset};
pub use json::{JsonSource, validate_dataset_path};
pub use validation::{DatasetIssue, DatasetReport, IssueKind, check_dataset};

pub const APP_NAME: &str = "stride";
