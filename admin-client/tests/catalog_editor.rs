//! Catalog editor scenarios against the in-memory backend

mod common;

use admin_client::catalog::{BulkAction, BulkDialog, ProductDraft, TranslationStatus};
use admin_client::http::ImageFile;
use admin_client::{CatalogEditor, ClientError};
use common::{EchoTranslator, FakeBackend, config, row};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use serde_json::json;
use shared::ErrorCode;
use shared::models::{ImageId, Language, LocalizedText, ProductId};
use std::sync::Arc;
use std::time::Duration;

fn editor_for(backend: &Arc<FakeBackend>) -> CatalogEditor {
    CatalogEditor::new(
        backend.clone(),
        Arc::new(EchoTranslator::default()),
        &config(),
    )
}

fn id(raw: &str) -> ProductId {
    ProductId::from(raw)
}

#[tokio::test]
async fn non_numeric_products_are_hidden_and_immutable() {
    let backend = Arc::new(FakeBackend::with_products(vec![
        row("1", "Almonds", 499),
        row("legacy-7", "Old stock", 10),
    ]));
    let editor = editor_for(&backend);
    assert_eq!(editor.mount().await.unwrap(), 1);

    let legacy = id("legacy-7");
    assert!(editor.snapshot().product(&legacy).is_none());

    editor.session().enter_edit();
    assert!(matches!(
        editor.session().set_price(&legacy, Decimal::from(5)),
        Err(ClientError::NonNumericId(_))
    ));
    assert!(matches!(
        editor.session().select(&legacy, true),
        Err(ClientError::NonNumericId(_))
    ));
    assert!(matches!(
        editor.images().open_edit(&legacy),
        Err(ClientError::NonNumericId(_))
    ));
    assert!(editor.images().open_view(&legacy).await.is_empty());
    assert!(matches!(
        editor.delete_product(&legacy).await,
        Err(ClientError::NonNumericId(_))
    ));

    assert!(backend.writes().is_empty());
    assert_eq!(backend.count("list_images"), 0);
}

#[tokio::test]
async fn save_without_changes_makes_no_calls() {
    let backend = Arc::new(FakeBackend::with_products(vec![
        row("1", "Almonds", 499),
        row("2", "Cashews", 650),
    ]));
    let editor = editor_for(&backend);
    editor.mount().await.unwrap();
    backend.reset_calls();

    editor.session().enter_edit();
    // same value as stored
    editor.session().set_price_text(&id("1"), "499.00").unwrap();
    let outcome = editor.session().save().await.unwrap();

    assert_eq!(outcome.updated, 0);
    assert!(!editor.session().is_editing());
    assert_eq!(backend.calls(), Vec::<String>::new());
}

#[tokio::test(start_paused = true)]
async fn rapid_typing_translates_the_final_value_once() {
    let backend = Arc::new(FakeBackend::new());
    let translator = Arc::new(EchoTranslator::default());
    let editor = CatalogEditor::new(backend, translator.clone(), &config());
    let form = editor.new_product_form();

    for typed in ["C", "Ca", "Cas", "Cash", "Cashe", "Cashew", "Cashews"] {
        form.on_name_change(typed);
        tokio::time::advance(Duration::from_millis(100)).await;
    }
    assert!(translator.calls().is_empty());
    assert!(form.assist().is_pending());
    assert_eq!(form.draft().name.en, "Cashews");

    form.assist().flush().await;

    let mut calls = translator.calls();
    calls.sort_by_key(|(_, lang)| *lang);
    assert_eq!(
        calls,
        vec![
            ("Cashews".to_string(), Language::Hi),
            ("Cashews".to_string(), Language::Te),
        ]
    );
    let name = form.draft().name;
    assert_eq!(name.hi, "Cashews [hi]");
    assert_eq!(name.te, "Cashews [te]");
    assert_eq!(form.assist().status(), TranslationStatus::Translated);
}

#[tokio::test(start_paused = true)]
async fn closing_the_form_cancels_pending_translation() {
    let translator = Arc::new(EchoTranslator::default());
    let editor = CatalogEditor::new(Arc::new(FakeBackend::new()), translator.clone(), &config());
    let form = editor.new_product_form();

    form.on_description_change("Roasted and salted");
    form.close();
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert!(translator.calls().is_empty());
    assert_eq!(form.draft().description.hi, "");
}

#[tokio::test]
async fn deleting_images_calls_backend_only_for_numeric_ids() {
    let backend = Arc::new(FakeBackend::with_products(vec![row("1", "Almonds", 499)]));
    backend.set_images("1", &["42", "placeholder-a"]);
    let editor = editor_for(&backend);
    editor.mount().await.unwrap();
    backend.reset_calls();

    let images = editor.images();
    images.open_edit(&id("1")).unwrap();

    assert_eq!(images.delete_image(0).await.unwrap(), ImageId::from("42"));
    assert_eq!(images.image_ids(), vec![ImageId::from("placeholder-a")]);
    assert_eq!(backend.calls(), vec!["delete_image:42".to_string()]);

    assert_eq!(
        images.delete_image(0).await.unwrap(),
        ImageId::from("placeholder-a")
    );
    assert!(images.image_ids().is_empty());
    assert_eq!(backend.count("delete_image"), 1);
}

#[tokio::test]
async fn failed_uploads_stay_pending() {
    let backend = Arc::new(FakeBackend::with_products(vec![row("1", "Almonds", 499)]));
    backend.fail_on("upload_image:broken.png");
    let editor = editor_for(&backend);
    editor.mount().await.unwrap();

    let images = editor.images();
    images.open_edit(&id("1")).unwrap();
    images
        .add_pending([
            ImageFile::new("front.jpg", b"jpeg".to_vec()),
            ImageFile::new("broken.png", b"png".to_vec()),
        ])
        .unwrap();

    let report = images.upload_pending().await.unwrap();
    assert_eq!(report.uploaded.len(), 1);
    assert_eq!(report.failed, vec!["broken.png".to_string()]);
    assert_eq!(images.image_ids(), report.uploaded);
    assert_eq!(
        images.pending().iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
        vec!["broken.png"]
    );
}

#[tokio::test]
async fn bulk_disable_keeps_failed_rows_unchanged() {
    let backend = Arc::new(FakeBackend::with_products(vec![
        row("1", "Almonds", 499),
        row("2", "Cashews", 650),
        row("3", "Raisins", 220),
    ]));
    backend.fail_on("set_disabled:2");
    let editor = editor_for(&backend);
    editor.mount().await.unwrap();

    editor.session().enter_edit();
    for raw in ["1", "2", "3"] {
        editor.session().select(&id(raw), true).unwrap();
    }
    editor.bulk().request(BulkAction::Disable).unwrap();
    assert_eq!(
        editor.bulk().dialog(),
        BulkDialog::Confirming(BulkAction::Disable)
    );

    let report = editor.bulk().confirm().await.unwrap();
    assert_eq!(report.succeeded, vec![id("1"), id("3")]);
    assert_eq!(report.failed, vec![id("2")]);

    let snapshot = editor.snapshot();
    assert!(snapshot.product(&id("1")).unwrap().is_disabled);
    assert!(!snapshot.product(&id("2")).unwrap().is_disabled);
    assert!(snapshot.product(&id("3")).unwrap().is_disabled);
    assert!(editor.session().selected_ids().is_empty());
    assert_eq!(editor.bulk().dialog(), BulkDialog::Idle);
}

#[tokio::test]
async fn bulk_request_needs_a_selection() {
    let backend = Arc::new(FakeBackend::with_products(vec![row("1", "Almonds", 499)]));
    let editor = editor_for(&backend);
    editor.mount().await.unwrap();
    editor.session().enter_edit();

    assert!(editor.bulk().request(BulkAction::Delete).is_err());
    assert_eq!(editor.bulk().dialog(), BulkDialog::Idle);
}

#[tokio::test]
async fn bulk_delete_refreshes_the_catalog() {
    let backend = Arc::new(FakeBackend::with_products(vec![
        row("1", "Almonds", 499),
        row("2", "Cashews", 650),
    ]));
    let editor = editor_for(&backend);
    editor.mount().await.unwrap();

    editor.session().enter_edit();
    editor.session().select(&id("2"), true).unwrap();
    editor.bulk().request(BulkAction::Delete).unwrap();
    backend.reset_calls();
    let report = editor.bulk().confirm().await.unwrap();

    assert!(report.is_complete());
    assert_eq!(backend.count("delete_product"), 1);
    assert_eq!(backend.count("list_products"), 1);
    assert!(editor.store().product(&id("2")).is_none());
    assert!(editor.snapshot().product(&id("2")).is_none());
}

#[tokio::test]
async fn created_product_round_trips_with_numeric_id_and_price() {
    let backend = Arc::new(FakeBackend::new());
    let editor = editor_for(&backend);

    let draft = ProductDraft {
        category: "Nuts".into(),
        name: LocalizedText::new("Almonds"),
        price: "499".into(),
        ..Default::default()
    };
    let created = editor.add_product(&draft).await.unwrap().unwrap();

    assert!(created.is_numeric());
    let product = editor.store().product(&created).unwrap();
    assert_eq!(product.price, Decimal::from(499));
    assert_eq!(product.name.en, "Almonds");
    assert_eq!(product.category, "Nuts");
    assert_eq!(
        backend.writes(),
        vec![
            "create_product:Almonds".to_string(),
            format!("update_price:{created}"),
        ]
    );
}

#[tokio::test]
async fn add_product_requires_category_name_and_price() {
    let backend = Arc::new(FakeBackend::new());
    let editor = editor_for(&backend);

    let draft = ProductDraft {
        name: LocalizedText::new("Almonds"),
        price: "499".into(),
        ..Default::default()
    };
    assert!(matches!(
        editor.add_product(&draft).await,
        Err(ClientError::Validation { .. })
    ));
    assert!(backend.calls().is_empty());
    assert!(editor.take_notice().is_some_and(|n| n.is_error()));
}

#[tokio::test]
async fn cancel_restores_five_edited_prices_without_calls() {
    let rows: Vec<_> = (1..=5)
        .map(|i| row(&i.to_string(), &format!("Item {i}"), i * 100))
        .collect();
    let backend = Arc::new(FakeBackend::with_products(rows));
    let editor = editor_for(&backend);
    editor.mount().await.unwrap();
    let before = editor.snapshot().products;
    backend.reset_calls();

    editor.session().enter_edit();
    for i in 1..=5 {
        editor
            .session()
            .set_price(&id(&i.to_string()), Decimal::from(i * 100 + 1))
            .unwrap();
    }
    assert_eq!(editor.session().changed_prices().len(), 5);

    editor.session().cancel_edit();

    assert!(!editor.session().is_editing());
    assert_eq!(editor.snapshot().products, before);
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn partial_save_failure_keeps_edit_mode_and_working_copy() {
    let backend = Arc::new(FakeBackend::with_products(vec![
        row("1", "Almonds", 499),
        row("2", "Cashews", 650),
        row("3", "Raisins", 220),
    ]));
    backend.fail_on("update_price:2");
    let editor = editor_for(&backend);
    editor.mount().await.unwrap();
    backend.reset_calls();

    editor.session().enter_edit();
    for (raw, price) in [("1", 500), ("2", 651), ("3", 221)] {
        editor.session().set_price(&id(raw), Decimal::from(price)).unwrap();
    }

    let err = editor.session().save().await.unwrap_err();
    match err {
        ClientError::Batch { failed, total, .. } => {
            assert_eq!(failed, vec!["2".to_string()]);
            assert_eq!(total, 3);
        }
        other => panic!("expected batch error, got {other:?}"),
    }

    assert!(editor.session().is_editing());
    assert_eq!(
        editor.snapshot().product(&id("2")).unwrap().price,
        Decimal::from(651)
    );
    assert_eq!(backend.count("update_price"), 3);
    assert_eq!(backend.count("list_products"), 0);
}

#[tokio::test]
async fn successful_save_leaves_edit_mode_and_refetches() {
    let backend = Arc::new(FakeBackend::with_products(vec![
        row("1", "Almonds", 499),
        row("2", "Cashews", 650),
    ]));
    let editor = editor_for(&backend);
    editor.mount().await.unwrap();
    backend.reset_calls();

    editor.session().enter_edit();
    editor.session().set_price_text(&id("2"), "700").unwrap();
    let outcome = editor.session().save().await.unwrap();

    assert_eq!(outcome.updated, 1);
    assert!(!editor.session().is_editing());
    assert_eq!(
        backend.calls(),
        vec!["update_price:2".to_string(), "list_products".to_string()]
    );
    assert_eq!(
        editor.store().product(&id("2")).unwrap().price,
        Decimal::from(700)
    );
}

#[tokio::test]
async fn refresh_during_edit_keeps_the_working_copy() {
    let backend = Arc::new(FakeBackend::with_products(vec![row("1", "Almonds", 499)]));
    let editor = editor_for(&backend);
    editor.mount().await.unwrap();

    editor.session().enter_edit();
    editor.session().set_price(&id("1"), Decimal::from(10)).unwrap();
    editor.store().refresh().await.unwrap();

    assert_eq!(
        editor.snapshot().product(&id("1")).unwrap().price,
        Decimal::from(10)
    );
    editor.session().cancel_edit();
    assert_eq!(
        editor.store().product(&id("1")).unwrap().price,
        Decimal::from(499)
    );
}

#[tokio::test]
async fn failed_refresh_in_edit_mode_keeps_unsaved_prices() {
    let backend = Arc::new(FakeBackend::with_products(vec![
        row("1", "Almonds", 499),
        row("2", "Cashews", 650),
    ]));
    let editor = editor_for(&backend);
    editor.mount().await.unwrap();

    editor.session().enter_edit();
    editor.session().set_price(&id("1"), Decimal::from(999)).unwrap();
    backend.fail_on("list_products");
    editor.images().open_edit(&id("1")).unwrap();
    assert!(editor.images().close().await.is_err());

    assert!(editor.session().is_editing());
    assert_eq!(
        editor.session().changed_prices(),
        vec![(id("1"), Decimal::from(999))]
    );

    // the write goes out; only the follow-up refresh fails
    backend.reset_calls();
    assert!(editor.session().save().await.is_err());
    assert_eq!(backend.writes(), vec!["update_price:1".to_string()]);
}

#[tokio::test]
async fn failed_remote_image_delete_keeps_the_image() {
    let backend = Arc::new(FakeBackend::with_products(vec![row("1", "Almonds", 499)]));
    backend.set_images("1", &["42", "43"]);
    backend.fail_on("delete_image:42");
    let editor = editor_for(&backend);
    editor.mount().await.unwrap();

    let images = editor.images();
    images.open_edit(&id("1")).unwrap();
    assert!(images.delete_image(0).await.is_err());

    assert_eq!(
        images.image_ids(),
        vec![ImageId::from("42"), ImageId::from("43")]
    );
    let notice = editor.take_notice().unwrap();
    assert!(notice.is_error());
    assert_eq!(notice.code, Some(ErrorCode::ImageDeleteFailed));
}

#[tokio::test]
async fn bulk_enable_clears_the_disabled_flag() {
    let mut disabled = row("1", "Almonds", 499);
    disabled.disabled = Some(json!(true));
    let mut legacy_flag = row("2", "Cashews", 650);
    legacy_flag.disabled = None;
    legacy_flag.is_disabled_snake = Some(json!("1"));
    let backend = Arc::new(FakeBackend::with_products(vec![disabled, legacy_flag]));
    let editor = editor_for(&backend);
    editor.mount().await.unwrap();
    assert!(editor.snapshot().products.iter().all(|p| p.is_disabled));
    backend.reset_calls();

    editor.session().enter_edit();
    editor.session().select_all().unwrap();
    editor.bulk().request(BulkAction::Enable).unwrap();
    let report = editor.bulk().confirm().await.unwrap();

    assert!(report.is_complete());
    assert_eq!(
        backend.writes(),
        vec!["set_disabled:1".to_string(), "set_disabled:2".to_string()]
    );
    assert!(editor.snapshot().products.iter().all(|p| !p.is_disabled));
    assert!(editor.session().selected_ids().is_empty());
    assert_eq!(editor.bulk().dialog(), BulkDialog::Idle);
}

#[tokio::test]
async fn dismissed_bulk_confirmation_makes_no_calls() {
    let backend = Arc::new(FakeBackend::with_products(vec![row("1", "Almonds", 499)]));
    let editor = editor_for(&backend);
    editor.mount().await.unwrap();
    backend.reset_calls();

    editor.session().enter_edit();
    editor.session().select(&id("1"), true).unwrap();
    editor.bulk().request(BulkAction::Delete).unwrap();
    editor.bulk().dismiss();

    assert_eq!(editor.bulk().dialog(), BulkDialog::Idle);
    assert!(matches!(
        editor.bulk().confirm().await,
        Err(ClientError::Validation { .. })
    ));
    assert!(backend.calls().is_empty());
    assert!(editor.snapshot().product(&id("1")).is_some());
}
