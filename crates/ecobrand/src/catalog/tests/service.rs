use approx::assert_relative_eq;

use super::common::*;
use crate::catalog::domain::{ProductDraft, ProductId, ProductUpdate, UserId};
use crate::catalog::repository::{ProductRepository, RepositoryError};
use crate::catalog::service::CatalogServiceError;
use crate::scoring::{EcoLetter, RawEnvironmentalProfile};

#[test]
fn create_scores_and_stores_products() {
    let (service, repository, _) = build_service();

    let record = create(&service, draft("Glass Bottle", "Kitchen", recyclable_profile()));

    assert!(record.id.0.starts_with("prod-"));
    assert_eq!(record.eco.score, Some(95.0));
    assert_eq!(record.eco.letter, Some(EcoLetter::A));
    assert_eq!(record.uploaded_by, owner());
    let stored = repository
        .fetch(&record.id)
        .expect("fetch succeeds")
        .expect("record stored");
    assert_eq!(stored, record);
}

#[test]
fn create_requires_an_owner() {
    let (service, _, _) = build_service();

    let missing = service.create(draft("Tote", "", recyclable_profile()), None);
    assert!(matches!(missing, Err(CatalogServiceError::MissingOwner)));

    let blank = service.create(
        draft("Tote", "", recyclable_profile()),
        Some(UserId("  ".to_string())),
    );
    assert!(matches!(blank, Err(CatalogServiceError::MissingOwner)));
}

#[test]
fn create_sanitizes_and_rejects_blank_names() {
    let (service, _, _) = build_service();

    let record = create(
        &service,
        draft("  <b>Hemp Tote</b> ", " Bags ", RawEnvironmentalProfile::default()),
    );
    assert_eq!(record.name, "bHemp Tote/b");
    assert_eq!(record.category, "Bags");
    assert!(!record.eco.is_scored());

    let rejected = service.create(
        draft(" <> ", "Bags", recyclable_profile()),
        Some(owner()),
    );
    assert!(matches!(
        rejected,
        Err(CatalogServiceError::InvalidProduct(_))
    ));
}

#[test]
fn update_recomputes_the_score_from_replaced_attributes() {
    let (service, _, _) = build_service();
    let record = create(&service, draft("Water Bottle", "Kitchen", recyclable_profile()));

    let updated = service
        .update(
            &record.id,
            ProductUpdate {
                profile: Some(heavy_profile()),
                ..ProductUpdate::default()
            },
        )
        .expect("update succeeds");

    assert_relative_eq!(updated.eco.score.expect("scored"), 11.07, epsilon = 1e-9);
    assert_eq!(updated.eco.letter, Some(EcoLetter::E));
    assert_eq!(updated.name, "Water Bottle");
    assert!(updated.updated_at >= record.updated_at);
    assert_eq!(service.get(&record.id).expect("stored"), updated);
}

#[test]
fn update_keeps_profile_when_only_scalars_change() {
    let (service, _, _) = build_service();
    let record = create(&service, draft("Lunch Box", "Kitchen", middling_profile()));

    let updated = service
        .update(
            &record.id,
            ProductUpdate {
                name: Some("Steel Lunch Box".to_string()),
                ingredients: Some(vec!["steel".to_string()]),
                ..ProductUpdate::default()
            },
        )
        .expect("update succeeds");

    assert_eq!(updated.name, "Steel Lunch Box");
    assert_eq!(updated.ingredients, vec!["steel"]);
    assert_eq!(updated.profile, record.profile);
    assert_eq!(updated.eco, record.eco);
}

#[test]
fn update_and_delete_report_unknown_products() {
    let (service, _, _) = build_service();
    let missing = ProductId("prod-missing".to_string());

    assert!(matches!(
        service.update(&missing, ProductUpdate::default()),
        Err(CatalogServiceError::NotFound(_))
    ));
    assert!(matches!(
        service.delete(&missing),
        Err(CatalogServiceError::NotFound(_))
    ));
    assert!(matches!(
        service.get(&missing),
        Err(CatalogServiceError::NotFound(_))
    ));
}

#[test]
fn bulk_delete_skips_unknown_ids() {
    let (service, _, _) = build_service();
    let first = create(&service, draft("Cup", "Kitchen", recyclable_profile()));
    let second = create(&service, draft("Plate", "Kitchen", recyclable_profile()));
    let kept = create(&service, draft("Bowl", "Kitchen", recyclable_profile()));

    let removed = service
        .bulk_delete(&[
            first.id.clone(),
            ProductId("prod-unknown".to_string()),
            second.id.clone(),
        ])
        .expect("bulk delete succeeds");

    assert_eq!(removed, 2);
    let remaining = service.list().expect("list succeeds");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, kept.id);
}

#[test]
fn listings_are_newest_first_and_refresh_after_writes() {
    let (service, _, _) = build_service();
    let older = create(&service, draft("Cup", "Kitchen", recyclable_profile()));
    assert_eq!(service.count().expect("count"), 1);

    let newer = create(&service, draft("Plate", "Kitchen", middling_profile()));
    let listed = service.list().expect("list succeeds");

    assert_eq!(
        listed.iter().map(|record| record.id.clone()).collect::<Vec<_>>(),
        vec![newer.id, older.id]
    );
}

#[test]
fn cached_listing_is_served_until_invalidated() {
    let (service, repository, _) = build_service();
    create(&service, draft("Cup", "Kitchen", recyclable_profile()));
    assert_eq!(service.list().expect("list").len(), 1);

    let extra = service
        .list()
        .expect("list")
        .into_iter()
        .next()
        .map(|mut record| {
            record.id = ProductId("prod-direct".to_string());
            record
        })
        .expect("record present");
    repository.insert(extra).expect("direct insert");

    assert_eq!(service.list().expect("cached list").len(), 1);

    create(&service, draft("Plate", "Kitchen", recyclable_profile()));
    assert_eq!(service.list().expect("fresh list").len(), 3);
}

#[test]
fn listing_loaded_before_an_update_is_not_cached() {
    let repository = PausingRepository::default();
    let service = service_with(repository.clone());
    let record = service
        .create(draft("Glass Bottle", "Kitchen", recyclable_profile()), Some(owner()))
        .expect("product creation succeeds");
    let (loaded, resume) = repository.pause_next_list();

    std::thread::scope(|scope| {
        let reader = scope.spawn(|| service.list().expect("list succeeds"));
        loaded.recv().expect("reader loaded its snapshot");

        service
            .update(
                &record.id,
                ProductUpdate {
                    profile: Some(RawEnvironmentalProfile {
                        recyclability_level: Some("low".to_string()),
                        ..RawEnvironmentalProfile::default()
                    }),
                    ..ProductUpdate::default()
                },
            )
            .expect("update succeeds");
        resume.send(()).expect("reader resumes");

        let snapshot = reader.join().expect("reader thread completes");
        assert_eq!(snapshot[0].eco.score, Some(95.0));
    });

    assert_eq!(service.get(&record.id).expect("get").eco.score, Some(20.0));
    let listed = service.list().expect("list succeeds");
    assert_eq!(listed[0].eco.score, Some(20.0));
    assert_eq!(listed[0].eco.letter, Some(EcoLetter::E));
}

#[test]
fn category_listing_ignores_case_and_whitespace() {
    let (service, _, _) = build_service();
    create(&service, draft("Cup", "Kitchen", recyclable_profile()));
    create(&service, draft("Shirt", "Apparel", recyclable_profile()));
    create(&service, draft("Pan", " kitchen ", middling_profile()));

    let kitchen = service.list_by_category("KITCHEN ").expect("category list");
    assert_eq!(kitchen.len(), 2);
    assert!(service.list_by_category("  ").expect("blank").is_empty());
    assert!(service.list_by_category("garden").expect("none").is_empty());
}

#[test]
fn owner_listing_filters_by_uploader() {
    let (service, _, _) = build_service();
    create(&service, draft("Cup", "Kitchen", recyclable_profile()));
    service
        .create(
            draft("Shirt", "Apparel", recyclable_profile()),
            Some(UserId("other".to_string())),
        )
        .expect("create succeeds");

    let mine = service.list_by_owner(&owner()).expect("owner list");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].name, "Cup");
}

#[test]
fn categorized_buckets_by_impact_level() {
    let (service, _, _) = build_service();
    let impact = |level: &str| RawEnvironmentalProfile {
        environmental_impact_level: Some(level.to_string()),
        ..RawEnvironmentalProfile::default()
    };
    create(&service, draft("Cup", "Kitchen", impact("Low impact")));
    create(&service, draft("Pan", "Kitchen", impact("medium")));
    create(&service, draft("Grill", "Garden", impact("HIGH")));
    create(&service, draft("Mystery", "", RawEnvironmentalProfile::default()));

    let categorized = service.categorized().expect("categorized");

    assert_eq!(categorized.low.len(), 1);
    assert_eq!(categorized.moderate.len(), 1);
    assert_eq!(categorized.high.len(), 1);
    assert_eq!(categorized.uncategorized, 1);
    assert_eq!(categorized.high[0].name, "Grill");
}

#[test]
fn search_matches_names_and_records_history() {
    let (service, _, history) = build_service();
    create(&service, draft("Bamboo Toothbrush", "Bath", recyclable_profile()));
    create(&service, draft("Plastic Toothbrush", "Bath", heavy_profile()));
    let user = owner();

    let hits = service
        .search("  TOOTHBRUSH ", Some(&user))
        .expect("search succeeds");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].name, "Plastic Toothbrush");

    let misses = service.search("kettle", Some(&user)).expect("search");
    assert!(misses.is_empty());

    let entries = history.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].query, "TOOTHBRUSH");
    assert!(entries[0].is_found);
    assert_eq!(entries[0].eco_letter, Some(EcoLetter::E));
    assert_eq!(
        entries[0].searched_product_name.as_deref(),
        Some("Plastic Toothbrush")
    );
    assert!(!entries[1].is_found);
    assert_eq!(entries[1].product_id, None);
}

#[test]
fn blank_search_returns_nothing_and_is_not_recorded() {
    let (service, _, history) = build_service();
    create(&service, draft("Cup", "Kitchen", recyclable_profile()));

    assert!(service.search("   ", None).expect("search").is_empty());
    assert!(history.entries().is_empty());
}

#[test]
fn search_history_is_per_user_and_newest_first() {
    let (service, _, _) = build_service();
    let user = owner();
    let other = UserId("someone-else".to_string());
    service.search("cup", Some(&user)).expect("search");
    service.search("pan", Some(&other)).expect("search");
    service.search("lid", Some(&user)).expect("search");

    let history = service.search_history(&user).expect("history");
    let queries: Vec<_> = history.iter().map(|entry| entry.query.as_str()).collect();
    assert_eq!(queries, vec!["lid", "cup"]);
}

#[test]
fn suggestions_are_distinct_and_limited() {
    let (service, _, _) = build_service();
    for _ in 0..2 {
        create(&service, draft("Bamboo Straw", "Kitchen", recyclable_profile()));
    }
    for index in 0..10 {
        create(
            &service,
            draft(&format!("Bamboo Plate {index}"), "Kitchen", recyclable_profile()),
        );
    }

    let suggestions = service.suggestions("bamboo").expect("suggestions");
    assert_eq!(suggestions.len(), 8);
    let straws = suggestions
        .iter()
        .filter(|name| name.as_str() == "Bamboo Straw")
        .count();
    assert!(straws <= 1);
    assert!(service.suggestions(" ").expect("blank").is_empty());
}

#[test]
fn recompute_reports_changed_products() {
    let (service, repository, _) = build_service();
    let record = create(&service, draft("Cup", "Kitchen", recyclable_profile()));
    create(&service, draft("Pan", "Kitchen", middling_profile()));

    let mut stale = record.clone();
    stale.eco = crate::scoring::EcoScoreResult::unscored();
    repository.update(stale).expect("update succeeds");

    let summary = service.recompute_all().expect("recompute succeeds");
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.changed, 1);
    assert_eq!(service.get(&record.id).expect("stored").eco, record.eco);
}

#[test]
fn import_creates_drafts_and_skips_nameless_rows() {
    let (service, _, _) = build_service();
    let drafts = vec![
        draft("Cup", "Kitchen", recyclable_profile()),
        draft("Mystery", "", RawEnvironmentalProfile::default()),
        ProductDraft::default(),
    ];

    let summary = service.import(drafts, &owner()).expect("import succeeds");

    assert_eq!(summary.imported, 2);
    assert_eq!(summary.scored, 1);
    assert_eq!(summary.unscored, 1);
    assert_eq!(summary.skipped, 1);
}

#[test]
fn preview_returns_the_computation_trail() {
    let (service, _, _) = build_service();

    let assessment = service.preview(&heavy_profile());

    assert_relative_eq!(assessment.result.score.expect("scored"), 11.07, epsilon = 1e-9);
    assert_eq!(assessment.components.len(), 4);
    assert_eq!(assessment.dropped.len(), 4);
}

#[test]
fn repository_errors_propagate() {
    let conflict = service_with(ConflictRepository);
    assert!(matches!(
        conflict.create(draft("Cup", "", recyclable_profile()), Some(owner())),
        Err(CatalogServiceError::Repository(RepositoryError::Conflict))
    ));

    let unavailable = service_with(UnavailableRepository);
    assert!(matches!(
        unavailable.list(),
        Err(CatalogServiceError::Repository(RepositoryError::Unavailable(_)))
    ));
}
