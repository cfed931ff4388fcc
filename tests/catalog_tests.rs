//! Tests for the catalog client against a mocked API.

use futures::StreamExt;
use reqwest::Url;
use serde_json::json;
use std::sync::Arc;
use streamdl::catalog::{
    CatalogClient, CatalogConfig, Collection, CredentialsProvider, SessionCredentials,
};
use streamdl::download::MediaKind;
use streamdl::Error;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn page_body(page: u32, page_count: u32, ids: &[u64]) -> serde_json::Value {
    let data: Vec<_> = ids
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "attributes": {
                    "title": format!("Arte {}", id),
                    "file": { "data": { "attributes": {
                        "url": format!("/uploads/arte_{}.jpg", id),
                        "mime": "image/jpeg"
                    } } }
                }
            })
        })
        .collect();
    json!({
        "data": data,
        "meta": { "pagination": {
            "page": page, "pageSize": ids.len(), "pageCount": page_count, "total": 5
        } }
    })
}

fn client(server: &MockServer, credentials: Arc<SessionCredentials>) -> CatalogClient {
    let base = Url::parse(&server.uri()).unwrap();
    let config = CatalogConfig::new(base).page_size(2).retries(0);
    CatalogClient::new(config, credentials).unwrap()
}

#[test]
fn test_collection_url() {
    let config = CatalogConfig::new(Url::parse("https://cms.example.com/strapi").unwrap());
    assert_eq!(config.base_url.as_str(), "https://cms.example.com/strapi/");

    let credentials = Arc::new(SessionCredentials::anonymous());
    let catalog = CatalogClient::new(config.page_size(10), credentials).unwrap();
    let url = catalog.collection_url(Collection::Stickers, 3).unwrap();

    assert_eq!(url.path(), "/strapi/api/stickers");
    let query: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert!(query.contains(&("pagination[page]".into(), "3".into())));
    assert!(query.contains(&("pagination[pageSize]".into(), "10".into())));
}

#[tokio::test]
async fn test_fetch_page_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/arts"))
        .and(query_param("pagination[page]", "1"))
        .and(header("authorization", "Bearer jwt-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 3, &[1, 2])))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = client(&server, Arc::new(SessionCredentials::new("jwt-123")));
    let page = catalog.fetch_page(Collection::Arts, 1).await.unwrap();

    assert_eq!(page.page, 1);
    assert_eq!(page.page_count, 3);
    assert!(page.has_more());
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].kind, MediaKind::Art);
    assert_eq!(
        page.items[1].url.as_str(),
        format!("{}/uploads/arte_2.jpg", server.uri())
    );
    assert_eq!(page.items[1].to_request().file_name(), "Arte_2.jpg");
}

#[tokio::test]
async fn test_pages_walks_until_page_count() {
    let server = MockServer::start().await;
    let pages: [&[u64]; 3] = [&[1, 2], &[3, 4], &[5]];
    for (i, ids) in pages.iter().enumerate() {
        let page = i as u32 + 1;
        Mock::given(method("GET"))
            .and(path("/api/arts"))
            .and(query_param("pagination[page]", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(page, 3, ids)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let catalog = client(&server, Arc::new(SessionCredentials::new("jwt")));
    let fetched: Vec<_> = catalog.pages(Collection::Arts).collect().await;
    assert_eq!(fetched.len(), 3);

    let ids: Vec<u64> = fetched
        .into_iter()
        .flat_map(|page| page.unwrap().items)
        .map(|item| item.id)
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_fetch_all_collects_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/videos"))
        .and(query_param("pagination[page]", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": 1, "title": "Reels 1", "video": { "url": "/uploads/r1.mp4", "mime": "video/mp4" } },
                { "id": 2, "title": "" }
            ],
            "meta": { "pagination": { "page": 1, "pageSize": 2, "pageCount": 2, "total": 3 } }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/videos"))
        .and(query_param("pagination[page]", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": 3, "name": "Reels 3", "url": "https://bucket.example.com/r3.mp4" }
            ],
            "meta": { "pagination": { "page": 2, "pageSize": 2, "pageCount": 2, "total": 3 } }
        })))
        .mount(&server)
        .await;

    let catalog = client(&server, Arc::new(SessionCredentials::new("jwt")));
    let items = catalog.fetch_all(Collection::Videos).await.unwrap();

    let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["Reels 1", "Reels 3"]);
    assert_eq!(items[1].url.as_str(), "https://bucket.example.com/r3.mp4");
    assert_eq!(items[1].to_request().file_name(), "Reels_3.mp4");
}

#[tokio::test]
async fn test_unauthorized_clears_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stickers"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let credentials = Arc::new(SessionCredentials::new("expired"));
    let catalog = client(&server, credentials.clone());

    let result = catalog.fetch_page(Collection::Stickers, 1).await;
    assert!(matches!(result, Err(Error::Unauthorized)));
    assert!(!credentials.is_authenticated());
    assert_eq!(credentials.token(), None);
}

#[tokio::test]
async fn test_server_error_stops_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/arts"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let credentials = Arc::new(SessionCredentials::new("jwt"));
    let catalog = client(&server, credentials.clone());
    let pages: Vec<_> = catalog.pages(Collection::Arts).collect().await;

    assert_eq!(pages.len(), 1);
    assert!(matches!(
        pages[0],
        Err(Error::Status(status)) if status == reqwest::StatusCode::FORBIDDEN
    ));
    assert!(credentials.is_authenticated());
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let catalog = client(&server, Arc::new(SessionCredentials::anonymous()));
    let result = catalog.fetch_page(Collection::Arts, 1).await;
    assert!(matches!(result, Err(Error::Decode { .. })));
}
