use httpmock::prelude::*;
use learning_catalog::core::session::{GroupKind, ModuleListing, Notice, Selection};
use learning_catalog::core::{AggregateStats, DifficultyFilter, ModuleKey, Technology};
use learning_catalog::{CatalogError, CatalogLoader, HttpCatalogSource, MemoryStore, Session};

fn catalog_json() -> serde_json::Value {
    serde_json::json!({
        "javascript": {
            "modules": [
                {"name": "Arrays", "title": "Arrays", "summary": "Lists of values",
                 "page_html": "arrays.html", "difficulty": "beginner", "hours": 6},
                {"name": "OOP", "title": "Object-Oriented Programming", "summary": "Classes",
                 "page_html": "oop.html", "difficulty": "advanced", "hours": 12}
            ],
            "metadata": {"total_modules": 2, "estimated_hours": 18}
        },
        "react": {
            "modules": [
                {"name": "Events", "title": "Events in React", "summary": "onClick and friends",
                 "page_html": "react-events.html", "difficulty": "beginner", "hours": 3}
            ],
            "metadata": {"total_modules": 1, "estimated_hours": 3}
        },
        "learning_paths": [
            {"id": "fundamentals", "name": "Fundamentals", "technology": "javascript",
             "modules": ["Arrays", "OOP"]}
        ],
        "project_examples": [
            {"id": "click-counter", "name": "Click counter", "technology": "react",
             "required_modules": ["Events", "State"]}
        ]
    })
}

async fn loaded_session(server: &MockServer) -> Session<MemoryStore> {
    let source = HttpCatalogSource::new(server.url("/modules.json"));
    let mut session = Session::restore(MemoryStore::new(), "it");
    session.finish_loading(CatalogLoader::load(&source).await);
    session
}

fn js(id: &str) -> ModuleKey {
    ModuleKey::new(Technology::JavaScript, id)
}

#[tokio::test]
async fn test_cart_scenario_over_http_catalog() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/modules.json");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(catalog_json());
    });

    let mut session = loaded_session(&server).await;
    api_mock.assert();

    assert_eq!(session.add(&js("Arrays")), Selection::Added);
    assert_eq!(
        session.totals(),
        AggregateStats {
            item_count: 1,
            total_hours: 6
        }
    );

    assert_eq!(session.add(&js("OOP")), Selection::Added);
    assert_eq!(
        session.totals(),
        AggregateStats {
            item_count: 2,
            total_hours: 18
        }
    );

    assert_eq!(session.toggle(&js("Arrays")), Selection::Removed);
    let cart = session.cart();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.entries()[0].identifier, "OOP");
    assert_eq!(cart.entries()[0].hours, 12);
    assert_eq!(session.totals().total_hours, 12);

    let before = session.cart();
    assert_eq!(session.remove(&js("missing")), Selection::Unchanged);
    assert_eq!(session.cart(), before);
    assert!(session.take_notices().is_empty());
}

#[tokio::test]
async fn test_search_filter_over_http_catalog() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/modules.json");
        then.status(200).json_body(catalog_json());
    });

    let mut session = loaded_session(&server).await;
    session.set_search("arr");
    match session.visible_modules() {
        ModuleListing::Ready(modules) => {
            assert_eq!(modules.len(), 1);
            assert_eq!(modules[0].identifier, "Arrays");
        }
        other => panic!("unexpected listing {:?}", other),
    }

    session.set_search("");
    session.set_difficulty(DifficultyFilter::All);
    match session.visible_modules() {
        ModuleListing::Ready(modules) => {
            let ids: Vec<_> = modules.iter().map(|m| m.identifier.as_str()).collect();
            assert_eq!(ids, vec!["Arrays", "OOP"]);
        }
        other => panic!("unexpected listing {:?}", other),
    }
}

#[tokio::test]
async fn test_same_name_in_both_technologies() {
    let server = MockServer::start();
    let mut catalog = catalog_json();
    catalog["javascript"]["modules"]
        .as_array_mut()
        .unwrap()
        .push(serde_json::json!({"name": "Events", "title": "DOM Events", "hours": 4}));
    server.mock(|when, then| {
        when.method(GET).path("/modules.json");
        then.status(200).json_body(catalog);
    });

    let mut session = loaded_session(&server).await;
    session.add(&js("Events"));
    session.add(&ModuleKey::new(Technology::React, "Events"));

    assert_eq!(session.totals().item_count, 2);
    assert_eq!(session.totals().total_hours, 7);
    session.remove(&js("Events"));
    assert!(session.is_selected(&ModuleKey::new(Technology::React, "Events")));
}

#[tokio::test]
async fn test_bulk_add_from_groups() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/modules.json");
        then.status(200).json_body(catalog_json());
    });

    let mut session = loaded_session(&server).await;
    session.add(&js("OOP"));

    let report = session.add_group(GroupKind::LearningPath, "fundamentals").unwrap();
    assert_eq!(report.added, 1);
    assert_eq!(report.already_selected, 1);

    let report = session.add_project_example("click-counter").unwrap();
    assert_eq!(report.added, 1);
    assert_eq!(report.unknown, vec!["State".to_string()]);
    assert_eq!(session.totals().total_hours, 21);
}

#[tokio::test]
async fn test_server_error_leaves_session_usable() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/modules.json");
        then.status(500);
    });

    let mut session = loaded_session(&server).await;
    api_mock.assert_hits(1);

    assert_eq!(session.visible_modules(), ModuleListing::Unavailable);
    assert!(session.find_module(&js("Arrays")).is_none());
    assert_eq!(session.add(&js("Arrays")), Selection::UnknownModule);
    assert_eq!(session.totals(), AggregateStats::default());

    let notices = session.take_notices();
    assert_eq!(notices.len(), 1);
    assert!(matches!(&notices[0], Notice::CatalogUnavailable { .. }));
    assert!(session.take_notices().is_empty());
}

#[tokio::test]
async fn test_malformed_document_is_catalog_unavailable() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/modules.json");
        then.status(200).body("<html>not a catalog</html>");
    });

    let source = HttpCatalogSource::new(server.url("/modules.json"));
    let err = CatalogLoader::load(&source).await.unwrap_err();
    match err {
        CatalogError::CatalogUnavailable { location, .. } => {
            assert!(location.ends_with("/modules.json"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}
