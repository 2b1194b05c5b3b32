use pretty_assertions::assert_eq;
use scrape_core::{JobSpec, JobSpecError};

fn valid_spec() -> JobSpec {
    JobSpec::new(
        "https://portal.example.com/login",
        vec![
            "https://portal.example.com/table/1".to_string(),
            "https://portal.example.com/table/2".to_string(),
        ],
        "east_district",
    )
}

#[test]
fn well_formed_spec_passes() {
    assert_eq!(valid_spec().validate(), Ok(()));
}

#[test]
fn login_url_is_required() {
    let mut spec = valid_spec();
    spec.login_url = "   ".to_string();
    assert_eq!(spec.validate(), Err(JobSpecError::MissingLoginUrl));
}

#[test]
fn login_url_must_parse() {
    let mut spec = valid_spec();
    spec.login_url = "not a url".to_string();
    assert_eq!(
        spec.validate(),
        Err(JobSpecError::InvalidLoginUrl("not a url".to_string()))
    );
}

#[test]
fn at_least_one_table_url_is_required() {
    let mut spec = valid_spec();
    spec.table_urls.clear();
    assert_eq!(spec.validate(), Err(JobSpecError::NoTableUrls));
}

#[test]
fn every_table_url_must_parse() {
    let mut spec = valid_spec();
    spec.table_urls.push("::broken::".to_string());
    assert_eq!(
        spec.validate(),
        Err(JobSpecError::InvalidTableUrl("::broken::".to_string()))
    );
}

#[test]
fn folder_name_must_survive_sanitization() {
    let mut spec = valid_spec();
    spec.folder_name = "///".to_string();
    assert_eq!(spec.validate(), Err(JobSpecError::MissingFolderName));
}

#[test]
fn row_range_builder_clamps_start_to_one() {
    let spec = valid_spec().with_row_range(0, Some(5));
    assert_eq!(spec.start_index, 1);
    assert_eq!(spec.last_index, Some(5));
}
