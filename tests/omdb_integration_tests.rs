use cinema::search::{MovieSearch, OmdbClient, SearchError};
use wiremock::{
    matchers::{method, query_param},
    Mock, MockServer, ResponseTemplate,
};

// ============================================================================
// Helper Functions
// ============================================================================

/// Creates a client pointed at the mock server
fn client_for(server: &MockServer) -> OmdbClient {
    OmdbClient::new("test-key".to_string(), Some(format!("{}/", server.uri())))
}

const BATMAN_PAGE: &str = r#"{
    "Search": [
        {"Title":"Batman Begins","Year":"2005","imdbID":"tt0372784","Type":"movie","Poster":"https://img.example.com/begins.jpg"},
        {"Title":"Batman","Year":"1989","imdbID":"tt0096895","Type":"movie","Poster":"N/A"}
    ],
    "totalResults":"2",
    "Response":"True"
}"#;

// ============================================================================
// Successful Searches
// ============================================================================

#[tokio::test]
async fn test_search_sends_query_and_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("s", "batman"))
        .and(query_param("apikey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BATMAN_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let movies = tokio_test::assert_ok!(client.search("batman").await);

    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0].title, "Batman Begins");
    assert_eq!(movies[0].imdb_id, "tt0372784");
    assert_eq!(movies[0].poster_url(), Some("https://img.example.com/begins.jpg"));
    assert_eq!(movies[1].poster_url(), None);
}

#[tokio::test]
async fn test_query_is_url_encoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("s", "star wars & co"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"Search":[],"totalResults":"0","Response":"True"}"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let movies = client_for(&mock_server).search("star wars & co").await;
    assert_eq!(movies, Ok(Vec::new()));
}

#[tokio::test]
async fn test_not_found_is_an_empty_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"Response":"False","Error":"Movie not found!"}"#),
        )
        .mount(&mock_server)
        .await;

    let movies = client_for(&mock_server).search("qwertyuiop").await;
    assert_eq!(movies, Ok(Vec::new()));
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_in_band_error_is_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"Response":"False","Error":"Too many results."}"#),
        )
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server).search("a").await;
    match result {
        Err(SearchError::Api { status, message }) => {
            assert_eq!(status, 200);
            assert_eq!(message, "Too many results.");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_key_http_401() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string(r#"{"Response":"False","Error":"Invalid API key!"}"#),
        )
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server).search("batman").await;
    assert!(matches!(result, Err(SearchError::Api { status: 401, .. })));
}

#[tokio::test]
async fn test_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server).search("batman").await;
    match result {
        Err(SearchError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("Internal Server Error"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server).search("batman").await;
    assert!(matches!(result, Err(SearchError::Parse(_))));
}

#[tokio::test]
async fn test_unrelated_json_is_parse_error() {
    let mock_server = MockServer::start().await;

    // A gateway answering in place of OMDb
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"message":"upstream unavailable"}"#),
        )
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server).search("batman").await;
    assert!(matches!(result, Err(SearchError::Parse(_))));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // Reserve a free port, then release it so nothing is listening there
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let client = OmdbClient::new(
        "test-key".to_string(),
        Some(format!("http://127.0.0.1:{port}/")),
    );
    let result = client.search("batman").await;
    assert!(matches!(result, Err(SearchError::Network(_))));
}
