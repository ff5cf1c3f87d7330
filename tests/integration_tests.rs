use std::collections::HashMap;

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;

use gbfs_client::feed::{
    AlertType, Day, Envelope, StationInformationData, SystemAlertsData, SystemInformationData,
    Timestamp, UserType,
};
use gbfs_client::fetch::BasicClient;
use gbfs_client::fetch::auth::{ApiKey, UrlParam};
use gbfs_client::output::export_feeds;
use gbfs_client::{AnyFeed, Client, Error, FeedKey};

#[derive(Clone)]
struct AppState {
    base: String,
}

fn json(body: impl Into<String>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body.into(),
    )
        .into_response()
}

fn fixture(file: &str) -> Option<&'static str> {
    let body = match file {
        "system_information.json" => include_str!("fixtures/system_information.json"),
        "station_information.json" => include_str!("fixtures/station_information.json"),
        "station_status.json" => include_str!("fixtures/station_status.json"),
        "free_bike_status.json" => include_str!("fixtures/free_bike_status.json"),
        "system_hours.json" => include_str!("fixtures/system_hours.json"),
        "system_calendar.json" => include_str!("fixtures/system_calendar.json"),
        "system_regions.json" => include_str!("fixtures/system_regions.json"),
        "system_pricing_plans.json" => include_str!("fixtures/system_pricing_plans.json"),
        "system_alerts.json" => include_str!("fixtures/system_alerts.json"),
        _ => return None,
    };
    Some(body)
}

async fn discovery_handler(State(state): State<AppState>) -> Response {
    json(include_str!("fixtures/gbfs.json").replace("{base}", &state.base))
}

async fn regions_handler() -> Response {
    json(include_str!("fixtures/system_regions.json"))
}

async fn feed_handler(
    State(state): State<AppState>,
    Path((lang, file)): Path<(String, String)>,
) -> Response {
    if lang != "en" {
        return StatusCode::NOT_FOUND.into_response();
    }
    match file.as_str() {
        "gbfs.json" => discovery_handler(State(state)).await,
        "500.json" => (StatusCode::INTERNAL_SERVER_ERROR, "temporary failure").into_response(),
        "garbage.json" => json("<html>maintenance</html>"),
        other => match fixture(other) {
            Some(body) => json(body),
            None => StatusCode::NOT_FOUND.into_response(),
        },
    }
}

async fn header_protected_handler(headers: HeaderMap, Path(file): Path<String>) -> Response {
    if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some("secret") {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match fixture(&file) {
        Some(body) => json(body),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn query_protected_handler(
    Query(params): Query<HashMap<String, String>>,
    Path(file): Path<String>,
) -> Response {
    if params.get("client_key").map(String::as_str) != Some("secret") {
        return StatusCode::FORBIDDEN.into_response();
    }
    match fixture(&file) {
        Some(body) => json(body),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Serves the fixtures from a background thread and returns the base URL.
///
/// The client is blocking, so the server gets its own runtime instead of
/// sharing one with the test.
fn spawn_test_server() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("listener should bind");
    listener
        .set_nonblocking(true)
        .expect("listener should be non-blocking");
    let address = listener.local_addr().expect("local addr should exist");
    let base = format!("http://{address}");

    let state = AppState { base: base.clone() };
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime should build");
        runtime.block_on(async move {
            let app = Router::new()
                .route("/gbfs.json", get(discovery_handler))
                .route("/feeds/regions", get(regions_handler))
                .route("/header/{file}", get(header_protected_handler))
                .route("/query/{file}", get(query_protected_handler))
                .route("/{lang}/{file}", get(feed_handler))
                .with_state(state);
            let listener =
                tokio::net::TcpListener::from_std(listener).expect("listener should convert");
            axum::serve(listener, app).await.expect("server should run");
        });
    });

    base
}

fn client(base: &str) -> Client {
    Client::builder()
        .base_url(base)
        .language("en")
        .build()
        .expect("client should build")
}

#[test]
fn test_station_information() {
    let base = spawn_test_server();
    let mut client = client(&base);

    let feed = client
        .station_information()
        .expect("station_information should decode");

    assert_eq!(feed.last_updated, Timestamp(1589230640));
    assert_eq!(feed.ttl, 10);
    assert_eq!(feed.version.as_deref(), Some("2.0"));
    assert_eq!(feed.data.stations.len(), 10);

    let first = &feed.data.stations[0];
    assert_eq!(first.station_id, "74");
    assert_eq!(first.capacity, Some(27));
    assert_eq!(first.region_id.as_deref(), Some("3"));
    assert_eq!(feed.data.stations[1].region_id.as_deref(), Some("3"));

    assert_eq!(
        client.resolver().cached(FeedKey::StationInformation),
        Some(format!("{base}/en/station_information.json").as_str())
    );
}

#[test]
fn test_system_information_start_date_in_system_zone() {
    let base = spawn_test_server();
    let mut client = client(&base);

    let feed = client.system_information().unwrap();
    assert_eq!(feed.data.name, "Bay Wheels");
    assert_eq!(feed.data.timezone, "America/Los_Angeles");

    let start = feed.data.start_date_time().unwrap().unwrap();
    assert_eq!(start.to_rfc3339(), "2017-05-14T00:00:00-07:00");

    let apps = feed.data.rental_apps.unwrap();
    assert_eq!(
        apps.ios.and_then(|a| a.discovery_uri).as_deref(),
        Some("lyft://")
    );
}

#[test]
fn test_station_status_booleans() {
    let base = spawn_test_server();
    let mut client = client(&base);

    let feed = client.station_status().unwrap();
    assert_eq!(feed.data.stations.len(), 10);

    let closed = feed.data.station("77").unwrap();
    assert!(!closed.is_renting.get());
    assert!(closed.is_returning.get());
    assert!(closed.is_installed.get());

    let first = feed.data.station("74").unwrap();
    assert_eq!(first.num_bikes_available, 0);
    assert_eq!(first.num_docks_available, Some(27));
    assert!(feed.data.station("999").is_none());
}

#[test]
fn test_free_bike_status_available() {
    let base = spawn_test_server();
    let mut client = client(&base);

    let feed = client.free_bike_status().unwrap();
    assert_eq!(feed.data.bikes.len(), 3);
    assert!(feed.data.bikes[1].is_reserved.get());
    assert!(feed.data.bikes[2].is_disabled.get());

    let available: Vec<_> = feed.data.available().map(|b| b.bike_id.as_str()).collect();
    assert_eq!(available, vec!["f3c8b1"]);
}

#[test]
fn test_pricing_plans_keep_price_text() {
    let base = spawn_test_server();
    let mut client = client(&base);

    let feed = client.system_pricing_plans().unwrap();
    let prices: Vec<_> = feed.data.plans.iter().map(|p| p.price.as_str()).collect();
    assert_eq!(prices, vec!["2.00", "10", "149"]);
    assert_eq!(feed.data.plans[0].price.as_f64(), Some(2.0));

    let taxable: Vec<_> = feed.data.plans.iter().map(|p| p.is_taxable.get()).collect();
    assert_eq!(taxable, vec![false, false, true]);
}

#[test]
fn test_hours_calendar_and_regions() {
    let base = spawn_test_server();
    let mut client = client(&base);

    let hours = client.system_hours().unwrap();
    let weekend: Vec<_> = hours
        .data
        .hours_for(&Day::Saturday, &UserType::Member)
        .collect();
    assert_eq!(weekend.len(), 1);
    assert_eq!(weekend[0].end_time.clock(), (23, 59, 59));
    assert_eq!(
        hours
            .data
            .hours_for(&Day::Sunday, &UserType::NonMember)
            .count(),
        0
    );
    assert_eq!(hours.data.rental_hours[0].end_time.clock(), (25, 30, 0));

    let calendar = client.system_calendar().unwrap();
    assert_eq!(calendar.data.calendars.len(), 1);
    assert_eq!(calendar.data.calendars[0].start_year, Some(2020));

    let regions = client.system_regions().unwrap();
    assert_eq!(regions.data.regions.len(), 3);
}

#[test]
fn test_alerts_with_zero_ttl_are_always_expired() {
    let base = spawn_test_server();
    let mut client = client(&base);

    let mut alerts = client.system_alerts().unwrap();
    assert!(alerts.is_expired());
    assert!(alerts.expires_at().is_none());

    let alert = &alerts.data.alerts[0];
    assert_eq!(alert.alert_type, AlertType::StationClosure);
    assert!(!alert.is_system_wide());
    assert!(alert.is_active_at(Timestamp(1589230640)));
    assert!(!alert.is_active_at(Timestamp(1589400000)));

    alerts.data.alerts.clear();
    client.refresh(&mut alerts, false).unwrap();
    assert_eq!(alerts.data.alerts.len(), 1);
}

#[test]
fn test_refresh_only_fetches_when_expired_or_forced() {
    let base = spawn_test_server();
    let mut client = client(&base);

    let mut info = Envelope::<StationInformationData> {
        last_updated: Timestamp::now(),
        ttl: 3600,
        version: None,
        data: StationInformationData::default(),
    };

    client.refresh(&mut info, false).unwrap();
    assert!(info.data.stations.is_empty());

    client.refresh(&mut info, true).unwrap();
    assert_eq!(info.data.stations.len(), 10);
    assert_eq!(info.last_updated, Timestamp(1589230640));
}

#[test]
fn test_get_into_checks_destination() {
    let base = spawn_test_server();
    let mut client = client(&base);

    let mut info = Envelope::<SystemInformationData>::default();
    let err = client
        .get_into(FeedKey::GbfsVersions, &mut info)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidFeed {
            requested: FeedKey::GbfsVersions,
            declared: FeedKey::SystemInformation,
        }
    ));

    client
        .get_into(FeedKey::SystemInformation, &mut info)
        .unwrap();
    assert_eq!(info.data.system_id, "bay_wheels");
}

#[test]
fn test_missing_feed_is_not_found() {
    let base = spawn_test_server();
    let mut client = client(&base);

    let err = client.gbfs_versions().unwrap_err();
    assert!(err.is_not_found());
    match err {
        Error::FeedNotFound { key, url } => {
            assert_eq!(key, FeedKey::GbfsVersions);
            assert_eq!(url, format!("{base}/en/gbfs_versions.json"));
        }
        other => panic!("expected FeedNotFound, got {other:?}"),
    }
}

#[test]
fn test_server_error_reports_status() {
    let base = spawn_test_server();
    let mut client = Client::builder()
        .base_url(&base)
        .language("en")
        .force_url(FeedKey::SystemRegions, format!("{base}/en/500.json"))
        .build()
        .unwrap();

    let err = client.system_regions().unwrap_err();
    assert!(matches!(
        err,
        Error::UnexpectedStatus {
            key: FeedKey::SystemRegions,
            status: 500
        }
    ));
    assert!(err.to_string().contains("500"));
}

#[test]
fn test_malformed_body_is_a_decode_error() {
    let base = spawn_test_server();
    let mut client = client(&base);
    client.force_urls(
        [(FeedKey::SystemHours, format!("{base}/en/garbage.json"))],
        false,
    );

    let err = client.system_hours().unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}

#[test]
fn test_fetch_any_by_runtime_key() {
    let base = spawn_test_server();
    let mut client = client(&base);

    let key: FeedKey = "station_information".parse().unwrap();
    let feed = client.fetch_any(key).unwrap();
    assert_eq!(feed.data.key(), FeedKey::StationInformation);
    assert_eq!(feed.data.entity_count(), 10);
    assert!(matches!(feed.data, AnyFeed::StationInformation(_)));

    let raw = client.get_raw(FeedKey::SystemAlerts).unwrap();
    let alerts = raw.decode::<SystemAlertsData>().unwrap();
    assert_eq!(alerts.ttl, 0);
    assert_eq!(alerts.data.alerts.len(), 1);
}

#[test]
fn test_auto_discovery_overrides_composed_urls() {
    let base = spawn_test_server();
    let mut client = Client::builder().base_url(&base).build().unwrap();

    let discovery = client.use_auto_discovery(Some("en")).unwrap();
    assert_eq!(discovery.data.languages.len(), 2);
    assert_eq!(discovery.data.languages["en"].feeds.len(), 5);

    // vehicle_types is not a known key and is skipped.
    assert_eq!(client.url(FeedKey::SystemRegions), format!("{base}/feeds/regions"));
    assert_eq!(client.resolver().len(), 5);

    let regions = client.system_regions().unwrap();
    assert_eq!(regions.data.regions[2].name, "Oakland");

    let stations = client.station_information().unwrap();
    assert_eq!(stations.data.stations.len(), 10);
}

#[test]
fn test_auto_discovery_with_unpublished_language() {
    let base = spawn_test_server();
    let mut client = Client::builder().base_url(&base).build().unwrap();

    client.use_auto_discovery(Some("de")).unwrap();
    assert_eq!(client.resolver().len(), 1);
    assert_eq!(
        client.resolver().cached(FeedKey::Gbfs),
        Some(format!("{base}/gbfs.json").as_str())
    );
}

#[test]
fn test_api_key_header() {
    let base = spawn_test_server();

    let mut anonymous = Client::builder()
        .base_url(format!("{base}/header"))
        .build()
        .unwrap();
    let err = anonymous.system_regions().unwrap_err();
    assert!(matches!(err, Error::UnexpectedStatus { status: 401, .. }));

    let http = ApiKey::new(BasicClient::new(), "x-api-key", "secret").unwrap();
    let mut client = Client::builder()
        .base_url(format!("{base}/header"))
        .http_client(http)
        .build()
        .unwrap();
    assert_eq!(client.system_regions().unwrap().data.regions.len(), 3);
}

#[test]
fn test_url_param_key() {
    let base = spawn_test_server();

    let http = UrlParam::new(BasicClient::new(), "client_key", "secret");
    let mut client = Client::builder()
        .base_url(format!("{base}/query"))
        .http_client(http)
        .build()
        .unwrap();
    assert_eq!(client.system_calendar().unwrap().data.calendars.len(), 1);

    let http = UrlParam::new(BasicClient::new(), "client_key", "wrong");
    let mut client = Client::builder()
        .base_url(format!("{base}/query"))
        .http_client(http)
        .build()
        .unwrap();
    assert!(matches!(
        client.system_calendar().unwrap_err(),
        Error::UnexpectedStatus { status: 403, .. }
    ));
}

#[test]
fn test_export_summaries_to_csv() {
    let base = spawn_test_server();
    let mut client = client(&base);
    client.force_urls(
        [
            (FeedKey::SystemHours, "not a url".to_string()),
            (FeedKey::SystemCalendar, format!("{base}/en/500.json")),
            (FeedKey::SystemRegions, format!("{base}/en/garbage.json")),
        ],
        false,
    );
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feeds.csv");

    let keys = [
        FeedKey::StationInformation,
        FeedKey::GbfsVersions,
        FeedKey::SystemHours,
        FeedKey::SystemCalendar,
        FeedKey::SystemRegions,
    ];
    assert_eq!(export_feeds(&mut client, &keys, &path).unwrap(), 5);
    assert_eq!(export_feeds(&mut client, &keys[..1], &path).unwrap(), 1);

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 6);

    let column = |name: &str| headers.iter().position(|h| h == name).unwrap();
    let error_types: Vec<_> = rows.iter().map(|r| &r[column("error_type")]).collect();
    assert_eq!(
        error_types,
        vec!["", "not_found", "invalid_url", "status", "decode", ""]
    );

    assert_eq!(&rows[0][column("feed")], "station_information");
    assert_eq!(&rows[0][column("entities")], "10");
    assert_eq!(&rows[0][column("ttl")], "10");
    assert_eq!(
        &rows[1][column("url")],
        format!("{base}/en/gbfs_versions.json").as_str()
    );
    assert_eq!(&rows[2][column("url")], "not a url");
}
