//! # Insured Lifecycle Tests
//!
//! End-to-end scenarios through [`InsuredService`] over the in-memory store:
//! create → read → update → delete, uniqueness across records, and the
//! race-closure guarantee of the store under concurrent creates.

use chrono::{DateTime, TimeZone, Utc};
use seguros_core::{
    Field, InsuredDraft, InsuredError, InsuredId, InsuredRepository, InsuredService, MemoryStore,
    ValidationError,
};

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap()
}

fn service() -> InsuredService<MemoryStore> {
    InsuredService::with_clock(MemoryStore::new(), fixed_now)
}

fn ana() -> InsuredDraft {
    InsuredDraft {
        first_name: "Ana".into(),
        last_name: "Lopez".into(),
        second_last_name: "Garcia".into(),
        phone_number: "555-0100".into(),
        email: "ana@x.com".into(),
        birth_date: "1990-01-01".into(),
        estimated_value: 1000,
        ..Default::default()
    }
}

fn rule(err: InsuredError) -> ValidationError {
    match err {
        InsuredError::Validation(rule) => rule,
        other => panic!("expected a validation failure, got {other:?}"),
    }
}

#[tokio::test]
async fn full_lifecycle() {
    let svc = service();

    let created = svc.create(ana()).await.unwrap();
    assert_eq!(created.id, InsuredId::new(1));
    assert_eq!(svc.get(InsuredId::new(1)).await.unwrap(), created);

    let mut changed = ana();
    changed.estimated_value = 2000;
    let updated = svc.update(created.id, changed).await.unwrap();
    assert_eq!(updated.estimated_value, 2000);
    assert_eq!(svc.get(created.id).await.unwrap().estimated_value, 2000);

    svc.delete(created.id).await.unwrap();
    let err = svc.get(created.id).await.unwrap_err();
    assert_eq!(err.to_string(), "Insured with ID 1 not found.");
}

#[tokio::test]
async fn second_record_with_same_phone_is_rejected() {
    let svc = service();
    svc.create(ana()).await.unwrap();

    let mut other = ana();
    other.email = "other@x.com".into();
    let err = rule(svc.create(other).await.unwrap_err());
    assert_eq!(
        err,
        ValidationError::DuplicateValue {
            field: Field::PhoneNumber,
            value: "555-0100".into()
        }
    );
    assert_eq!(svc.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn email_checked_before_phone() {
    let svc = service();
    svc.create(ana()).await.unwrap();
    let err = rule(svc.create(ana()).await.unwrap_err());
    assert_eq!(err.field(), Field::Email);
}

#[tokio::test]
async fn update_cannot_take_another_records_email() {
    let svc = service();
    let first = svc.create(ana()).await.unwrap();
    let mut bea = ana();
    bea.first_name = "Bea".into();
    bea.email = "bea@x.com".into();
    bea.phone_number = "555-0200".into();
    svc.create(bea).await.unwrap();

    let mut steal = ana();
    steal.email = "bea@x.com".into();
    let err = rule(svc.update(first.id, steal).await.unwrap_err());
    assert_eq!(err.code(), "DUPLICATE_VALUE");
    assert_eq!(err.field(), Field::Email);
    assert_eq!(svc.get(first.id).await.unwrap().email, "ana@x.com");
}

#[tokio::test]
async fn update_is_a_full_replace() {
    let svc = service();
    let mut with_notes = ana();
    with_notes.notes = Some("vip".into());
    with_notes.second_name = Some("Maria".into());
    let created = svc.create(with_notes).await.unwrap();

    let updated = svc.update(created.id, ana()).await.unwrap();
    assert_eq!(updated.notes, None);
    assert_eq!(updated.second_name, None);
    assert_eq!(updated.id, created.id);
}

#[tokio::test]
async fn every_required_field_is_enforced_on_update_too() {
    let svc = service();
    let created = svc.create(ana()).await.unwrap();

    let mut missing = ana();
    missing.second_last_name.clear();
    let err = rule(svc.update(created.id, missing).await.unwrap_err());
    assert_eq!(err, ValidationError::MissingField(Field::SecondLastName));

    let mut future = ana();
    future.birth_date = "2030-01-01".into();
    let err = rule(svc.update(created.id, future).await.unwrap_err());
    assert_eq!(err, ValidationError::FutureDate(Field::BirthDate));
}

#[tokio::test]
async fn list_returns_creation_order() {
    let svc = service();
    for (i, name) in ["Ana", "Bea", "Cam"].iter().enumerate() {
        let mut draft = ana();
        draft.first_name = (*name).into();
        draft.email = format!("{name}@x.com");
        draft.phone_number = format!("555-010{i}");
        svc.create(draft).await.unwrap();
    }
    let names: Vec<String> = svc
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.first_name)
        .collect();
    assert_eq!(names, ["Ana", "Bea", "Cam"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_with_same_email_store_one_record() {
    let svc = std::sync::Arc::new(service());
    let mut handles = Vec::new();
    for i in 0..16 {
        let svc = svc.clone();
        handles.push(tokio::spawn(async move {
            let mut draft = ana();
            draft.phone_number = format!("555-{i:04}");
            svc.create(draft).await
        }));
    }

    let mut stored = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => stored += 1,
            Err(err) => assert_eq!(rule(err).code(), "DUPLICATE_VALUE"),
        }
    }
    assert_eq!(stored, 1);
    assert_eq!(svc.repository().find_all().await.unwrap().len(), 1);
}
