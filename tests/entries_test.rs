mod common;

use anyhow::Result;
use common::{draft, parse_date, test_service};
use spendlog::application::AppError;
use spendlog::domain::{EntryDraft, MAX_NOTES_LEN};

#[tokio::test]
async fn test_empty_date_returns_empty_not_error() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let day = service.entries_for_date(parse_date("2024-08-01")).await?;
    assert!(day.entries.is_empty());
    assert_eq!(day.total_cents, 0);

    Ok(())
}

#[tokio::test]
async fn test_save_then_fetch_roundtrip() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let date = parse_date("2024-08-01");

    let outcome = service
        .replace_for_date(
            date,
            vec![
                EntryDraft::new(10000, "Food").with_notes("groceries"),
                draft(5000, "Rent"),
            ],
        )
        .await?;
    assert_eq!(outcome.saved, 2);
    assert_eq!(outcome.total_cents, 15000);

    let day = service.entries_for_date(date).await?;
    assert_eq!(day.entries.len(), 2);
    assert_eq!(day.total_cents, 15000);

    let food = day
        .entries
        .iter()
        .find(|e| e.category == "Food")
        .expect("food entry");
    assert_eq!(food.amount_cents, 10000);
    assert_eq!(food.date, date);
    assert_eq!(food.notes.as_deref(), Some("groceries"));

    let rent = day
        .entries
        .iter()
        .find(|e| e.category == "Rent")
        .expect("rent entry");
    assert_eq!(rent.notes, None);

    Ok(())
}

#[tokio::test]
async fn test_entries_are_scoped_to_their_date() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .replace_for_date(parse_date("2024-08-01"), vec![draft(10000, "Food")])
        .await?;
    service
        .replace_for_date(parse_date("2024-08-02"), vec![draft(20000, "Shopping")])
        .await?;

    let day1 = service.entries_for_date(parse_date("2024-08-01")).await?;
    assert_eq!(day1.entries.len(), 1);
    assert_eq!(day1.entries[0].category, "Food");

    let day2 = service.entries_for_date(parse_date("2024-08-02")).await?;
    assert_eq!(day2.entries.len(), 1);
    assert_eq!(day2.entries[0].category, "Shopping");

    Ok(())
}

#[tokio::test]
async fn test_clear_date_removes_all_entries() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let date = parse_date("2024-08-01");

    service
        .replace_for_date(date, vec![draft(10000, "Food"), draft(5000, "Rent")])
        .await?;

    let removed = service.clear_date(date).await?;
    assert_eq!(removed, 2);

    let day = service.entries_for_date(date).await?;
    assert!(day.entries.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_clear_empty_date_is_a_noop() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let removed = service.clear_date(parse_date("2024-08-01")).await?;
    assert_eq!(removed, 0);

    Ok(())
}

#[tokio::test]
async fn test_insert_rejects_negative_amount() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let date = parse_date("2024-08-01");

    let err = service
        .insert_for_date(date, vec![draft(-100, "Food")])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NegativeAmount { slot: 1, .. }));
    assert!(err.is_validation());

    // Nothing was written
    let day = service.entries_for_date(date).await?;
    assert!(day.entries.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_insert_rejects_blank_category() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service
        .insert_for_date(parse_date("2024-08-01"), vec![draft(100, "")])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::MissingCategory { slot: 1 }));

    Ok(())
}

#[tokio::test]
async fn test_insert_rejects_oversized_notes() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let long_notes = "x".repeat(MAX_NOTES_LEN + 1);
    let err = service
        .insert_for_date(
            parse_date("2024-08-01"),
            vec![EntryDraft::new(100, "Food").with_notes(long_notes)],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotesTooLong { slot: 1, .. }));

    Ok(())
}

#[tokio::test]
async fn test_store_accepts_labels_outside_default_set() -> Result<()> {
    // The store is label-agnostic; the closed category set is enforced
    // only at the presentation boundary.
    let (service, _temp) = test_service().await?;
    let date = parse_date("2024-08-01");

    service
        .replace_for_date(date, vec![draft(4200, "Travel")])
        .await?;

    let day = service.entries_for_date(date).await?;
    assert_eq!(day.entries[0].category, "Travel");

    Ok(())
}

#[tokio::test]
async fn test_list_all_entries_ordered_by_date() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .replace_for_date(parse_date("2024-08-03"), vec![draft(300, "Food")])
        .await?;
    service
        .replace_for_date(parse_date("2024-08-01"), vec![draft(100, "Rent")])
        .await?;
    service
        .replace_for_date(parse_date("2024-08-02"), vec![draft(200, "Other")])
        .await?;

    let entries = service.list_all_entries().await?;
    let dates: Vec<_> = entries.iter().map(|e| e.date.to_string()).collect();
    assert_eq!(dates, vec!["2024-08-01", "2024-08-02", "2024-08-03"]);

    Ok(())
}
