//! Integration tests for the maps clients (wiremock-based)

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integration_maps::{
    DirectionsClient, GeocodingClient, GoogleDirectionsClient, GoogleGeocodingClient, MapsConfig,
    MapsError, PlaceQuery,
};

fn config_for_mock(base_url: &str) -> MapsConfig {
    MapsConfig {
        base_url: base_url.to_string(),
        region_bias: "pk".to_string(),
        ..MapsConfig::for_testing()
    }
}

const fn sample_geocode_json() -> &'static str {
    r#"{
        "status": "OK",
        "results": [{
            "address_components": [
                {"long_name": "Gulberg III", "short_name": "Gulberg III", "types": ["sublocality_level_1", "sublocality", "political"]},
                {"long_name": "Lahore", "short_name": "Lahore", "types": ["locality", "political"]},
                {"long_name": "Punjab", "short_name": "Punjab", "types": ["administrative_area_level_1", "political"]},
                {"long_name": "Pakistan", "short_name": "PK", "types": ["country", "political"]}
            ],
            "formatted_address": "Gulberg III, Lahore, Punjab, Pakistan"
        }]
    }"#
}

const fn sample_autocomplete_json() -> &'static str {
    r#"{
        "status": "OK",
        "predictions": [
            {
                "place_id": "ChIJ_liberty",
                "description": "Liberty Market, Gulberg III, Lahore, Pakistan",
                "structured_formatting": {"main_text": "Liberty Market", "secondary_text": "Gulberg III, Lahore, Pakistan"}
            },
            {
                "place_id": "ChIJ_libchowk",
                "description": "Liberty Chowk, Lahore, Pakistan",
                "structured_formatting": {"main_text": "Liberty Chowk", "secondary_text": "Lahore, Pakistan"}
            }
        ]
    }"#
}

const fn sample_directions_json() -> &'static str {
    r#"{
        "status": "OK",
        "routes": [{
            "overview_polyline": {"points": "_p~iF~ps|U_ulLnnqC_mqNvxq`@"},
            "legs": [{
                "distance": {"text": "12.4 km", "value": 12400},
                "duration": {"text": "25 mins", "value": 1500}
            }]
        }]
    }"#
}

#[tokio::test]
async fn test_reverse_geocode_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .and(query_param("latlng", "31.5204,74.3587"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_geocode_json()))
        .mount(&server)
        .await;

    let client = GoogleGeocodingClient::new(&config_for_mock(&server.uri())).unwrap();
    let results = client.reverse_geocode(31.5204, 74.3587).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].parts.len(), 4);
    assert_eq!(results[0].formatted_address, "Gulberg III, Lahore, Punjab, Pakistan");
}

#[tokio::test]
async fn test_reverse_geocode_zero_results_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"status": "ZERO_RESULTS", "results": []}"#),
        )
        .mount(&server)
        .await;

    let client = GoogleGeocodingClient::new(&config_for_mock(&server.uri())).unwrap();
    let results = client.reverse_geocode(0.0, 0.0).await.unwrap();

    assert!(results.is_empty());
}

#[tokio::test]
async fn test_reverse_geocode_is_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_geocode_json()))
        .expect(1)
        .mount(&server)
        .await;

    let config = MapsConfig {
        cache_ttl_minutes: 10,
        ..config_for_mock(&server.uri())
    };
    let client = GoogleGeocodingClient::new(&config).unwrap();

    let first = client.reverse_geocode(31.520_400_1, 74.3587).await.unwrap();
    let second = client.reverse_geocode(31.520_400_2, 74.3587).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_request_denied_is_not_retryable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"status": "REQUEST_DENIED", "error_message": "The provided API key is invalid.", "results": []}"#,
        ))
        .mount(&server)
        .await;

    let client = GoogleGeocodingClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.reverse_geocode(31.5, 74.3).await.unwrap_err();

    assert!(matches!(err, MapsError::RequestDenied(ref msg) if msg.contains("API key")));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_autocomplete_sends_bias_and_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/autocomplete/json"))
        .and(query_param("input", "liberty"))
        .and(query_param("components", "country:pk"))
        .and(query_param("sessiontoken", "session-1"))
        .and(query_param("language", "ur"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_autocomplete_json()))
        .mount(&server)
        .await;

    let client = GoogleGeocodingClient::new(&config_for_mock(&server.uri())).unwrap();
    let query = PlaceQuery {
        language: Some("ur".to_string()),
        region: None,
        session_token: Some("session-1".to_string()),
    };
    let predictions = client.autocomplete("liberty", &query).await.unwrap();

    assert_eq!(predictions.len(), 2);
    assert_eq!(predictions[0].place_id, "ChIJ_liberty");
    assert_eq!(predictions[0].main_text, "Liberty Market");
}

#[tokio::test]
async fn test_autocomplete_over_query_limit_is_retryable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/autocomplete/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"status": "OVER_QUERY_LIMIT", "predictions": []}"#,
        ))
        .mount(&server)
        .await;

    let client = GoogleGeocodingClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client
        .autocomplete("liberty", &PlaceQuery::default())
        .await
        .unwrap_err();

    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_place_details_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .and(query_param("place_id", "ChIJ_liberty"))
        .and(query_param("fields", "geometry,name,formatted_address"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{
                "status": "OK",
                "result": {
                    "name": "Liberty Market",
                    "formatted_address": "Liberty Market, Gulberg III, Lahore",
                    "geometry": {"location": {"lat": 31.5102, "lng": 74.3441}}
                }
            }"#,
        ))
        .mount(&server)
        .await;

    let client = GoogleGeocodingClient::new(&config_for_mock(&server.uri())).unwrap();
    let place = client
        .place_details("ChIJ_liberty", &PlaceQuery::default())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(place.name, "Liberty Market");
    assert!((place.latitude - 31.5102).abs() < 1e-9);
}

#[tokio::test]
async fn test_place_details_not_found_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status": "NOT_FOUND"}"#))
        .mount(&server)
        .await;

    let client = GoogleGeocodingClient::new(&config_for_mock(&server.uri())).unwrap();
    let place = client
        .place_details("ChIJ_gone", &PlaceQuery::default())
        .await
        .unwrap();

    assert!(place.is_none());
}

#[tokio::test]
async fn test_directions_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/directions/json"))
        .and(query_param("origin", "31.5204,74.3587"))
        .and(query_param("destination", "31.5216,74.4036"))
        .and(query_param("mode", "driving"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_directions_json()))
        .mount(&server)
        .await;

    let client = GoogleDirectionsClient::new(&config_for_mock(&server.uri())).unwrap();
    let routes = client
        .driving_routes(31.5204, 74.3587, 31.5216, 74.4036)
        .await
        .unwrap();

    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].polyline, "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
    assert_eq!(routes[0].distance_m, 12_400);
    assert_eq!(routes[0].duration_text.as_deref(), Some("25 mins"));
}

#[tokio::test]
async fn test_directions_zero_results_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/directions/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"status": "ZERO_RESULTS", "routes": []}"#),
        )
        .mount(&server)
        .await;

    let client = GoogleDirectionsClient::new(&config_for_mock(&server.uri())).unwrap();
    let routes = client.driving_routes(31.5, 74.3, 40.7, -74.0).await.unwrap();

    assert!(routes.is_empty());
}

#[tokio::test]
async fn test_http_rate_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/directions/json"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&server)
        .await;

    let client = GoogleDirectionsClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client
        .driving_routes(31.5, 74.3, 31.6, 74.4)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        MapsError::RateLimitExceeded {
            retry_after_secs: Some(30)
        }
    ));
}

#[tokio::test]
async fn test_server_error_is_retryable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = GoogleGeocodingClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.reverse_geocode(31.5, 74.3).await.unwrap_err();

    assert!(matches!(err, MapsError::ServiceUnavailable(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = GoogleGeocodingClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.reverse_geocode(31.5, 74.3).await.unwrap_err();

    assert!(matches!(err, MapsError::ParseError(_)));
}
