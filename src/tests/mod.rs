use indicatif::ProgressBar;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::api::RecommendationsResponse;
use crate::catalog::{
    CatalogState, FilterConfig, FilterUpdate, MinCompatibility, Recommendation,
    RecommendationView, ShoeType, SortKey, TypeFilter, TypeSource, PAGE_SIZE,
};
use crate::runner::{Options, Runner};

fn rec(model: &str, compatibility: u8, shoe_type: ShoeType) -> Recommendation {
    Recommendation {
        model: model.to_string(),
        compatibility,
        best_size_eu: 42.0,
        shoe_type,
        type_source: TypeSource::Lookup,
    }
}

fn models(visible: &[&Recommendation]) -> Vec<String> {
    visible.iter().map(|r| r.model.clone()).collect()
}

#[test]
fn min_compatibility_bound_holds_for_every_visible_item() {
    let items = vec![
        rec("a", 50, ShoeType::Sport),
        rec("b", 90, ShoeType::Casual),
        rec("c", 30, ShoeType::Sport),
        rec("d", 40, ShoeType::Boots),
    ];
    let mut view = RecommendationView::new(items);
    view.set_filter(FilterUpdate {
        min_compatibility: Some(MinCompatibility::AtLeast(40)),
        ..Default::default()
    });
    assert!(view.visible().iter().all(|r| r.compatibility >= 40));
    assert_eq!(view.filtered_count(), 3);
}

#[test]
fn type_filter_only_admits_the_requested_category() {
    let items = vec![
        rec("a", 80, ShoeType::Sport),
        rec("b", 70, ShoeType::Casual),
        rec("c", 60, ShoeType::Sport),
    ];
    let mut view = RecommendationView::new(items);
    view.set_filter(FilterUpdate {
        type_filter: Some(TypeFilter::Only(ShoeType::Sport)),
        ..Default::default()
    });
    let visible = view.visible();
    assert_eq!(visible.len(), 2);
    assert!(visible.iter().all(|r| r.shoe_type == ShoeType::Sport));
}

#[test]
fn visible_length_is_min_of_window_and_filtered_count() {
    let items: Vec<_> = (0..30)
        .map(|i| rec(&format!("model {i}"), 90, ShoeType::Sport))
        .collect();
    let view = RecommendationView::new(items);
    assert_eq!(view.visible().len(), PAGE_SIZE.min(view.filtered_count()));

    let few = RecommendationView::new(vec![rec("only", 90, ShoeType::Sport)]);
    assert_eq!(few.visible().len(), 1);
}

#[test]
fn set_filter_is_idempotent() {
    let items = vec![
        rec("a", 50, ShoeType::Sport),
        rec("b", 90, ShoeType::Casual),
        rec("c", 70, ShoeType::Sport),
    ];
    let update = FilterUpdate {
        min_compatibility: Some(MinCompatibility::AtLeast(60)),
        sort_key: Some(SortKey::NameAsc),
        ..Default::default()
    };
    let mut once = RecommendationView::new(items.clone());
    once.set_filter(update);
    let mut twice = RecommendationView::new(items);
    twice.set_filter(update);
    twice.set_filter(update);
    assert_eq!(models(&once.visible()), models(&twice.visible()));
}

#[test]
fn numeric_sort_ties_keep_fetch_order() {
    let items = vec![
        rec("third", 90, ShoeType::Sport),
        rec("first", 90, ShoeType::Sport),
        rec("second", 90, ShoeType::Sport),
    ];
    let view = RecommendationView::new(items);
    assert_eq!(models(&view.visible()), vec!["third", "first", "second"]);
}

#[test]
fn show_more_extends_the_previous_window_as_a_prefix() {
    let items: Vec<_> = (0..30)
        .map(|i| rec(&format!("model {i:02}"), (i % 100) as u8, ShoeType::Sport))
        .collect();
    let mut view = RecommendationView::new(items);
    let before = models(&view.visible());
    view.show_more();
    let after = models(&view.visible());
    assert!(after.len() > before.len());
    assert_eq!(&after[..before.len()], &before[..]);
}

#[test]
fn partial_updates_leave_other_fields_alone() {
    let mut view = RecommendationView::new(vec![rec("a", 50, ShoeType::Sport)]);
    view.set_filter(FilterUpdate {
        sort_key: Some(SortKey::NameDesc),
        ..Default::default()
    });
    view.set_filter(FilterUpdate {
        min_compatibility: Some(MinCompatibility::AtLeast(10)),
        ..Default::default()
    });
    let filters = view.filters();
    assert_eq!(filters.sort_key, SortKey::NameDesc);
    assert_eq!(filters.min_compatibility, MinCompatibility::AtLeast(10));
    assert_eq!(filters.type_filter, TypeFilter::All);
    assert_eq!(filters.visible_count, PAGE_SIZE);
}

// Scenario: 15 items with equal compatibility render as the first page
// in fetch order, and one `more` reveals the rest.
#[test]
fn full_page_then_show_more_reveals_everything() {
    let items: Vec<_> = (0..15)
        .map(|i| rec(&format!("model {i:02}"), 90, ShoeType::Sport))
        .collect();
    let expected: Vec<String> = items.iter().map(|r| r.model.clone()).collect();
    let mut view = RecommendationView::new(items);

    assert_eq!(models(&view.visible()), &expected[..12]);
    view.show_more();
    assert_eq!(models(&view.visible()), expected);
}

// Scenario: compatibilities [50, 90, 30] with a threshold of 40 sort
// descending to [90, 50].
#[test]
fn threshold_plus_default_sort_scenario() {
    let items = vec![
        rec("fifty", 50, ShoeType::Sport),
        rec("ninety", 90, ShoeType::Sport),
        rec("thirty", 30, ShoeType::Sport),
    ];
    let mut view = RecommendationView::new(items);
    view.set_filter(FilterUpdate {
        min_compatibility: Some(MinCompatibility::AtLeast(40)),
        ..Default::default()
    });
    assert_eq!(models(&view.visible()), vec!["ninety", "fifty"]);
}

// Scenario: a populated catalog where no item matches the type filter is
// "no matches", which is not the same as an empty catalog.
#[test]
fn no_matches_is_distinct_from_an_empty_catalog() {
    let items = vec![rec("a", 80, ShoeType::Sport)];
    let mut view = RecommendationView::new(items);
    view.set_filter(FilterUpdate {
        type_filter: Some(TypeFilter::Only(ShoeType::Casual)),
        ..Default::default()
    });
    assert!(view.visible().is_empty());
    assert_eq!(view.filtered_count(), 0);
    assert!(!view.items().is_empty());
}

#[test]
fn name_sorts_order_case_insensitively_both_ways() {
    let items = vec![
        rec("bravo", 10, ShoeType::Sport),
        rec("Alpha", 20, ShoeType::Sport),
        rec("charlie", 30, ShoeType::Sport),
    ];
    let mut view = RecommendationView::new(items);
    view.set_filter(FilterUpdate {
        sort_key: Some(SortKey::NameAsc),
        ..Default::default()
    });
    assert_eq!(models(&view.visible()), vec!["Alpha", "bravo", "charlie"]);
    view.set_filter(FilterUpdate {
        sort_key: Some(SortKey::NameDesc),
        ..Default::default()
    });
    assert_eq!(models(&view.visible()), vec!["charlie", "bravo", "Alpha"]);
}

#[test]
fn recommendations_decode_distinguishes_error_empty_and_populated() {
    let unauthenticated: RecommendationsResponse =
        serde_json::from_str(r#"{"error":"not logged in"}"#).unwrap();
    assert!(matches!(
        unauthenticated,
        RecommendationsResponse::Unauthenticated { .. }
    ));

    let empty: RecommendationsResponse = serde_json::from_str("[]").unwrap();
    assert!(matches!(empty, RecommendationsResponse::List(records) if records.is_empty()));

    let populated: RecommendationsResponse = serde_json::from_str(
        r#"[{"model":"Court Pro","compatibility":88,"best_size":{"eu":42.5}}]"#,
    )
    .unwrap();
    match populated {
        RecommendationsResponse::List(records) => {
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].model, "Court Pro");
            assert_eq!(records[0].compatibility, 88);
            assert_eq!(records[0].best_size.eu, 42.5);
        }
        other => panic!("expected a list, got {other:?}"),
    }
}

#[test]
fn photo_and_detail_urls_percent_encode_the_model_name() {
    let base = crate::api::parse_base_url("http://localhost:5000/").unwrap();
    let url = crate::api::image_url(&base, "Air Max 90", 1);
    assert_eq!(
        url.as_str(),
        "http://localhost:5000/static/models%20photo/Air%20Max%2090/1.jpg"
    );
    assert_eq!(
        crate::api::detail_path(&base, "Air Max 90"),
        "/shoe/Air%20Max%2090"
    );
}

// Minimal canned HTTP service so the full load pipeline can run against
// a loopback socket.
async fn spawn_service(recommendations_body: &'static str) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut sock, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];
                let Ok(n) = sock.read(&mut buf).await else {
                    return;
                };
                let request = String::from_utf8_lossy(&buf[..n]).to_string();
                let body = if request.starts_with("GET /get_recommendations") {
                    recommendations_body.to_string()
                } else if request.starts_with("GET /get_shoe_type") {
                    r#"{"shoeType":"running"}"#.to_string()
                } else {
                    "{}".to_string()
                };
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = sock.write_all(response.as_bytes()).await;
                let _ = sock.shutdown().await;
            });
        }
    });
    format!("http://{addr}/")
}

#[tokio::test]
async fn load_pipeline_enriches_every_item_before_reporting_ready() {
    let base_url = spawn_service(
        r#"[{"model":"Court Pro","compatibility":88,"best_size":{"eu":42.5}},{"model":"Aurora 7","compatibility":61,"best_size":{"eu":41.0}}]"#,
    )
    .await;

    let runner = Runner::new(Options {
        base_url,
        probe_images: false,
        ..Default::default()
    })
    .unwrap();
    let report = runner.run(&ProgressBar::hidden()).await.unwrap();

    match report.state {
        CatalogState::Ready(view) => {
            assert_eq!(view.items().len(), 2);
            assert!(view
                .items()
                .iter()
                .all(|r| r.shoe_type == ShoeType::Running
                    && r.type_source == TypeSource::Lookup));
        }
        other => panic!("expected Ready, got {other:?}"),
    }
    assert_eq!(report.stats.looked_up, 2);
}

#[tokio::test]
async fn error_marker_maps_to_the_unauthenticated_state() {
    let base_url = spawn_service(r#"{"error":"please log in"}"#).await;
    let runner = Runner::new(Options {
        base_url,
        probe_images: false,
        ..Default::default()
    })
    .unwrap();
    let report = runner.run(&ProgressBar::hidden()).await.unwrap();
    assert!(matches!(report.state, CatalogState::Unauthenticated));
}

#[tokio::test]
async fn empty_list_maps_to_the_empty_state() {
    let base_url = spawn_service("[]").await;
    let runner = Runner::new(Options {
        base_url,
        probe_images: false,
        ..Default::default()
    })
    .unwrap();
    let report = runner.run(&ProgressBar::hidden()).await.unwrap();
    assert!(matches!(report.state, CatalogState::Empty));
}

#[test]
fn filter_config_defaults_match_the_first_render() {
    let filters = FilterConfig::default();
    assert_eq!(filters.min_compatibility, MinCompatibility::Any);
    assert_eq!(filters.type_filter, TypeFilter::All);
    assert_eq!(filters.sort_key, SortKey::CompatibilityDesc);
    assert_eq!(filters.visible_count, PAGE_SIZE);
}
