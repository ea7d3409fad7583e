//! End-to-end tests: rows validated against database vocabularies and
//! accepted rows persisted through the PostgreSQL sink.

use assert_matches::assert_matches;
use labimport_core::validation::rules::{MSG_INVALID_SAMPLE_SOURCE, MSG_INVALID_SUBCENTER};
use labimport_core::validation::{
    ImportRow, PersistOutcome, RowValidator, TestResultEntry, ValidationOutcome,
};
use labimport_db::models::reference::{CreateHealthCenter, CreateLabTest, CreateSampleSource};
use labimport_db::repositories::{HealthCenterRepo, LabTestRepo, SampleRepo, SampleSourceRepo};
use labimport_db::{PgReferenceStore, PgSampleSink};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

type PgValidator = RowValidator<PgReferenceStore, PgSampleSink>;

async fn seed(pool: &PgPool) {
    HealthCenterRepo::create(
        pool,
        &CreateHealthCenter {
            name: "SC1".to_string(),
            description: Some("Primary health subcenter".to_string()),
        },
    )
    .await
    .unwrap();
    SampleSourceRepo::create(
        pool,
        &CreateSampleSource {
            name: "Blood".to_string(),
            display_order: None,
        },
    )
    .await
    .unwrap();
    for name in ["Hb", "ESR"] {
        LabTestRepo::create(
            pool,
            &CreateLabTest {
                test_name: name.to_string(),
                is_active: None,
            },
        )
        .await
        .unwrap();
    }
}

fn validator(pool: &PgPool) -> PgValidator {
    RowValidator::new(
        PgReferenceStore::new(pool.clone()),
        PgSampleSink::new(pool.clone()),
    )
}

fn row(accession_number: &str) -> ImportRow {
    ImportRow {
        subcenter_code: "SC1".into(),
        patient_registration_number: "3051".into(),
        sample_source: "Blood".into(),
        accession_number: accession_number.into(),
        sample_date: "14-02-2024".into(),
        test_results: vec![
            TestResultEntry::new("HB", Some("11.4")),
            TestResultEntry::new("esr", Some("22")),
            TestResultEntry::new("Unlisted", None),
        ],
    }
}

async fn accept(validator: &mut PgValidator, input: ImportRow) -> PersistOutcome {
    let accepted = match validator.validate(input).await.unwrap() {
        ValidationOutcome::Accepted { row } => row,
        other => panic!("row should be accepted, got {other:?}"),
    };
    validator.persist(accepted).await.unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn accepted_row_is_stored_with_results(pool: PgPool) {
    seed(&pool).await;
    let mut validator = validator(&pool);

    let persisted = accept(&mut validator, row("2024-001")).await;
    let sample_id = match persisted {
        PersistOutcome::Saved { sample_id, .. } => sample_id,
        other => panic!("expected saved sample, got {other:?}"),
    };

    let sample = SampleRepo::find_by_accession_number(&pool, "2024-001")
        .await
        .unwrap()
        .expect("sample should exist");
    assert_eq!(sample.id, sample_id);
    assert_eq!(sample.patient_registration_number, 3051);
    assert_eq!(sample.collection_date.to_string(), "2024-02-14");

    let results = SampleRepo::list_results(&pool, sample_id).await.unwrap();
    let stored: Vec<(&str, &str)> = results
        .iter()
        .map(|r| (r.test_name.as_str(), r.result_value.as_str()))
        .collect();
    assert_eq!(stored, vec![("Hb", "11.4"), ("ESR", "22")]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_accession_number_is_refused(pool: PgPool) {
    seed(&pool).await;
    let mut validator = validator(&pool);

    assert!(accept(&mut validator, row("55-1")).await.is_saved());
    let second = accept(&mut validator, row("55-1")).await;
    assert_matches!(
        second,
        PersistOutcome::Failed { ref error, .. } if error.contains("55-1")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rejected_row_reports_all_reference_failures(pool: PgPool) {
    seed(&pool).await;
    let mut validator = validator(&pool);

    let mut input = row("9");
    input.subcenter_code = "SC7".into();
    input.sample_source = "blood".into();

    let outcome = validator.validate(input).await.unwrap();
    assert_eq!(
        outcome.messages(),
        vec![MSG_INVALID_SUBCENTER, MSG_INVALID_SAMPLE_SOURCE]
    );
    assert!(SampleRepo::find_by_accession_number(&pool, "9")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn known_test_names_come_from_the_catalog(pool: PgPool) {
    seed(&pool).await;
    let mut validator = validator(&pool);

    let names = validator.test_names().await.unwrap();
    assert_eq!(names.sorted(), vec!["esr", "hb"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_catalog_rejects_every_populated_test(pool: PgPool) {
    HealthCenterRepo::create(
        &pool,
        &CreateHealthCenter {
            name: "SC1".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();
    SampleSourceRepo::create(
        &pool,
        &CreateSampleSource {
            name: "Blood".to_string(),
            display_order: None,
        },
    )
    .await
    .unwrap();
    let mut validator = validator(&pool);

    let outcome = validator.validate(row("3")).await.unwrap();
    assert_eq!(outcome.messages(), vec!["Invalid test names: HB,esr."]);

    // The catalog is re-read while it is empty, so a test added mid-import
    // is picked up by the next row.
    LabTestRepo::create(
        &pool,
        &CreateLabTest {
            test_name: "Hb".to_string(),
            is_active: None,
        },
    )
    .await
    .unwrap();
    let outcome = validator.validate(row("4")).await.unwrap();
    assert_eq!(outcome.messages(), vec!["Invalid test names: esr."]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_ascii_test_names_resolve_case_insensitively(pool: PgPool) {
    seed(&pool).await;
    LabTestRepo::create(
        &pool,
        &CreateLabTest {
            test_name: "HÉMOGLOBINE".to_string(),
            is_active: None,
        },
    )
    .await
    .unwrap();
    let mut validator = validator(&pool);

    let mut input = row("812");
    input.test_results = vec![TestResultEntry::new("hémoglobine", Some("13.2"))];

    let sample_id = match accept(&mut validator, input).await {
        PersistOutcome::Saved { sample_id, .. } => sample_id,
        other => panic!("expected saved sample, got {other:?}"),
    };
    let results = SampleRepo::list_results(&pool, sample_id).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].test_name, "HÉMOGLOBINE");
    assert_eq!(results[0].result_value, "13.2");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_retired_after_validation_fails_only_that_row(pool: PgPool) {
    seed(&pool).await;
    let platelets = LabTestRepo::create(
        &pool,
        &CreateLabTest {
            test_name: "Platelets".to_string(),
            is_active: None,
        },
    )
    .await
    .unwrap();
    let mut validator = validator(&pool);

    let mut input = row("77-1");
    input
        .test_results
        .push(TestResultEntry::new("Platelets", Some("250000")));
    let accepted = match validator.validate(input).await.unwrap() {
        ValidationOutcome::Accepted { row } => row,
        other => panic!("row should be accepted, got {other:?}"),
    };

    LabTestRepo::set_active(&pool, platelets.id, false)
        .await
        .unwrap()
        .expect("test should exist");

    let persisted = validator.persist(accepted).await.unwrap();
    assert_matches!(
        persisted,
        PersistOutcome::Failed { ref error, .. } if error.contains("no longer active")
    );
    assert!(SampleRepo::find_by_accession_number(&pool, "77-1")
        .await
        .unwrap()
        .is_none());

    // The next row, which does not use the retired test, still imports.
    assert!(accept(&mut validator, row("77-2")).await.is_saved());
}
