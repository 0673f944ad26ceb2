//! Integration tests for the Cachet client using wiremock
//!
//! These tests run the real client against mocked endpoints, checking the
//! request shapes it sends and how responses and error codes are mapped.

use cachet_client::enums::*;
use cachet_client::{
    CachetError, Client, ComponentUpdate, IncidentChanges, NewComponent, NewComponentGroup,
    NewIncident,
};
use futures::{StreamExt, TryStreamExt};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-token";

fn client(server: &MockServer) -> Client {
    Client::new(&format!("{}/api/v1", server.uri()), TOKEN).expect("client should build")
}

fn component_json(id: i64, name: &str, status: i64) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": "This is a test",
        "link": "",
        "status": status,
        "status_name": component_status_name(status),
        "order": 0,
        "group_id": 0,
        "enabled": true,
        "tags": {},
        "created_at": "2019-05-25 12:14:21",
        "updated_at": "2019-05-25 12:14:21",
        "deleted_at": null
    })
}

/// Build a list envelope the way Cachet paginates
fn page_json(rows: Vec<Value>, total: u64, per_page: u32, current_page: u32) -> Value {
    let total_pages = ((total as f64 / per_page as f64).ceil() as u32).max(1);
    json!({
        "meta": {
            "pagination": {
                "total": total,
                "count": rows.len(),
                "per_page": per_page,
                "current_page": current_page,
                "total_pages": total_pages,
                "links": {"next_page": null, "previous_page": null}
            }
        },
        "data": rows
    })
}

mod crud_tests {
    use super::*;

    /// Create sends only set fields, encodes booleans and carries the token
    #[tokio::test]
    async fn test_create_component_posts_payload() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/components"))
            .and(header("X-Cachet-Token", TOKEN))
            .and(body_json(json!({
                "name": "Test Component",
                "status": 1,
                "description": "This is a test",
                "enabled": 1
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": component_json(5, "Test Component", COMPONENT_STATUS_OPERATIONAL)
            })))
            .expect(1)
            .mount(&server)
            .await;

        let comp = client(&server)
            .components
            .create(
                NewComponent::new("Test Component", COMPONENT_STATUS_OPERATIONAL)
                    .description("This is a test"),
            )
            .await
            .expect("create should succeed");

        assert_eq!(comp.id(), 5);
        assert_eq!(comp.status(), Some(COMPONENT_STATUS_OPERATIONAL));
        assert!(comp.created_at().is_some());
        assert!(comp.updated_at().is_some());
    }

    /// Full lifecycle: create, rename, update, refetch, delete, get fails
    #[tokio::test]
    async fn test_component_lifecycle() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/components"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": component_json(7, "Test Component", COMPONENT_STATUS_OPERATIONAL)
            })))
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/api/v1/components/7"))
            .and(body_partial_json(json!({"name": "Test Thing"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": component_json(7, "Test Thing", COMPONENT_STATUS_OPERATIONAL)
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v1/components/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": component_json(7, "Test Thing", COMPONENT_STATUS_OPERATIONAL)
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/api/v1/components/7"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v1/components/7"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "errors": [{"id": "x", "status": 404, "title": "Not Found"}]
            })))
            .mount(&server)
            .await;

        let client = client(&server);
        let mut comp = client
            .components
            .create(
                NewComponent::new("Test Component", COMPONENT_STATUS_OPERATIONAL)
                    .description("This is a test"),
            )
            .await
            .unwrap();

        comp.set_name("Test Thing");
        let updated = comp.update().await.expect("update should succeed");
        assert_eq!(updated.name(), Some("Test Thing"));

        let fetched = client.components.get(7).await.unwrap();
        assert_eq!(fetched.name(), Some("Test Thing"));
        assert_eq!(fetched, comp);

        fetched.delete().await.expect("delete should succeed");

        let err = client.components.get(7).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "components/7 not found");
    }

    /// Deleting twice: the second call surfaces NotFound
    #[tokio::test]
    async fn test_second_delete_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/v1/incidents/3"))
            .respond_with(ResponseTemplate::new(204))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/api/v1/incidents/3"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client(&server);
        client.incidents.delete(3).await.expect("first delete succeeds");
        let err = client.incidents.delete(3).await.unwrap_err();
        assert!(matches!(err, CachetError::NotFound { id: Some(3), .. }));
    }

    /// Other non-2xx statuses carry status, path and the decoded body
    #[tokio::test]
    async fn test_api_error_carries_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/components/groups"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "errors": [{"status": 400, "detail": "The name field is required."}]
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .component_groups
            .create(NewComponentGroup::new(""))
            .await
            .unwrap_err();

        match err {
            CachetError::Api {
                status, path, body, ..
            } => {
                assert_eq!(status, 400);
                assert_eq!(path, "components/groups");
                assert_eq!(body["errors"][0]["detail"], "The name field is required.");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    /// A 2xx answer that is not an entity is a decode error, never a blank record
    #[tokio::test]
    async fn test_success_without_data_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/components/5"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/components"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"errors": []})))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let client = client(&server);

        let err = client.components.get(5).await.unwrap_err();
        assert!(matches!(err, CachetError::Decode { ref path, .. } if path == "components"));

        let err = client
            .components
            .create(NewComponent::new("Test Component", COMPONENT_STATUS_OPERATIONAL))
            .await
            .unwrap_err();
        assert!(matches!(err, CachetError::Decode { .. }));
    }

    /// List rows that are not objects fail the listing
    #[tokio::test]
    async fn test_non_object_row_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/subscribers"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(page_json(vec![json!("oops")], 1, 20, 1)),
            )
            .mount(&server)
            .await;

        let result: Result<Vec<_>, _> = client(&server).subscribers.list(1, 20).try_collect().await;
        assert!(matches!(result, Err(CachetError::Decode { .. })));
    }

    /// Boolean fields go out as 0/1 and come back as bool
    #[tokio::test]
    async fn test_boolean_round_trip() {
        let server = MockServer::start().await;

        let mut disabled = component_json(9, "API", COMPONENT_STATUS_OPERATIONAL);
        disabled["enabled"] = json!(0);

        Mock::given(method("PUT"))
            .and(path("/api/v1/components/9"))
            .and(body_partial_json(json!({"enabled": 0})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": disabled})))
            .expect(1)
            .mount(&server)
            .await;

        let comp = client(&server)
            .components
            .update(
                9,
                ComponentUpdate {
                    enabled: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(!comp.enabled());
    }
}

mod validation_tests {
    use super::*;

    /// A partial incident update is refused before any request is sent
    #[tokio::test]
    async fn test_incident_update_requires_fields() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client(&server);
        let full = IncidentChanges {
            name: Some("Outage".into()),
            message: Some("Looking into it".into()),
            status: Some(INCIDENT_INVESTIGATING),
            visible: Some(true),
            ..Default::default()
        };

        for field in ["name", "message", "status", "visible"] {
            let mut changes = full.clone();
            match field {
                "name" => changes.name = None,
                "message" => changes.message = None,
                "status" => changes.status = None,
                _ => changes.visible = None,
            }

            let err = client.incidents.update(1, changes).await.unwrap_err();
            match err {
                CachetError::Validation { resource, fields } => {
                    assert_eq!(resource, "incidents");
                    assert_eq!(fields, vec![field]);
                }
                other => panic!("expected Validation error, got {other:?}"),
            }
        }
    }

    /// A complete incident update goes through
    #[tokio::test]
    async fn test_incident_update_with_required_fields() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/v1/incidents/4"))
            .and(body_partial_json(json!({
                "name": "Outage",
                "message": "Fixed",
                "status": 4,
                "visible": 0,
                "notify": 1
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"id": 4, "name": "Outage", "message": "Fixed", "status": 4, "visible": 0}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let incident = client(&server)
            .incidents
            .update(
                4,
                IncidentChanges {
                    name: Some("Outage".into()),
                    message: Some("Fixed".into()),
                    status: Some(INCIDENT_FIXED),
                    visible: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(incident.status(), Some(INCIDENT_FIXED));
        assert!(!incident.visible());
    }
}

mod pagination_tests {
    use super::*;

    async fn mount_components(server: &MockServer, total: i64, per_page: u32) {
        let total_pages = ((total as f64 / per_page as f64).ceil() as u32).max(1);
        for page in 1..=total_pages {
            let start = (page - 1) as i64 * per_page as i64 + 1;
            let end = (start + per_page as i64 - 1).min(total);
            let rows = (start..=end)
                .map(|id| component_json(id, &format!("c{id}"), COMPONENT_STATUS_OPERATIONAL))
                .collect();

            Mock::given(method("GET"))
                .and(path("/api/v1/components"))
                .and(query_param("page", page.to_string()))
                .and(query_param("per_page", per_page.to_string()))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(page_json(rows, total as u64, per_page, page)),
                )
                .mount(server)
                .await;
        }
    }

    /// Every entity is emitted once, in page order
    #[tokio::test]
    async fn test_list_walks_all_pages_in_order() {
        let server = MockServer::start().await;
        mount_components(&server, 7, 3).await;

        let ids: Vec<i64> = client(&server)
            .components
            .list(1, 3)
            .map_ok(|c| c.id())
            .try_collect()
            .await
            .unwrap();

        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    /// Listing can start from a later page
    #[tokio::test]
    async fn test_list_from_later_page() {
        let server = MockServer::start().await;
        mount_components(&server, 7, 3).await;

        let ids: Vec<i64> = client(&server)
            .components
            .list(2, 3)
            .map_ok(|c| c.id())
            .try_collect()
            .await
            .unwrap();

        assert_eq!(ids, vec![4, 5, 6, 7]);
    }

    /// Pages are only requested as the stream is consumed
    #[tokio::test]
    async fn test_list_is_lazy() {
        let server = MockServer::start().await;
        mount_components(&server, 10, 2).await;

        let first_two: Vec<_> = client(&server)
            .components
            .list(1, 2)
            .take(2)
            .try_collect()
            .await
            .unwrap();

        assert_eq!(first_two.len(), 2);
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.query().unwrap().contains("page=1"));
    }

    /// count() reads the total and matches a full drain
    #[tokio::test]
    async fn test_count_matches_drained_list() {
        let server = MockServer::start().await;
        mount_components(&server, 5, 2).await;
        mount_components(&server, 5, 1).await;

        let client = client(&server);
        let count = client.components.count().await.unwrap();
        let drained = client.components.list(1, 2).try_collect::<Vec<_>>().await.unwrap();

        assert_eq!(count, 5);
        assert_eq!(drained.len() as u64, count);
    }

    /// Empty collections yield nothing after one request
    #[tokio::test]
    async fn test_empty_list() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/subscribers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![], 0, 20, 1)))
            .expect(1)
            .mount(&server)
            .await;

        let subs: Vec<_> = client(&server)
            .subscribers
            .list(1, 20)
            .try_collect()
            .await
            .unwrap();
        assert!(subs.is_empty());
    }

    /// Filters are passed through as query parameters
    #[tokio::test]
    async fn test_filters_are_forwarded() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/components"))
            .and(query_param("status", "4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
                vec![component_json(2, "DB", COMPONENT_STATUS_MAJOR_OUTAGE)],
                1,
                20,
                1,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let down: Vec<_> = client(&server)
            .components
            .list_filtered(vec![("status".into(), "4".into())], 1, 20)
            .try_collect()
            .await
            .unwrap();

        assert_eq!(down.len(), 1);
        assert_eq!(down[0].status(), Some(COMPONENT_STATUS_MAJOR_OUTAGE));
    }

    /// A listing response without a pagination block is a decode error
    #[tokio::test]
    async fn test_malformed_envelope() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/metrics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let err = client(&server).metrics.count().await.unwrap_err();
        assert!(matches!(err, CachetError::Decode { .. }));
    }
}

mod nested_tests {
    use super::*;

    /// Incident updates live under the incident's path
    #[tokio::test]
    async fn test_incident_updates_path() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/incidents/12/updates"))
            .and(body_json(json!({"status": 2, "message": "Found it"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"id": 30, "incident_id": 12, "status": 2, "message": "Found it"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v1/incidents/12/updates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
                vec![json!({"id": 30, "incident_id": 12, "status": 2, "message": "Found it"})],
                1,
                20,
                1,
            )))
            .mount(&server)
            .await;

        let client = client(&server);
        let update = client
            .incident_updates()
            .create(12, INCIDENT_IDENTIFIED, "Found it")
            .await
            .unwrap();
        assert_eq!(update.incident_id(), Some(12));

        let listed: Vec<_> = client
            .incident_updates()
            .list(12, 1, 20)
            .try_collect()
            .await
            .unwrap();
        assert_eq!(listed, vec![update]);
    }

    /// Metric points are created under the metric's path
    #[tokio::test]
    async fn test_metric_point_create() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/metrics/3/points"))
            .and(body_json(json!({"value": 42.5, "timestamp": 1558786461})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"id": 1, "metric_id": 3, "value": "42.5", "counter": 1}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let point = client(&server)
            .metric_points()
            .create(3, 42.5, Some(1558786461))
            .await
            .unwrap();

        assert_eq!(point.metric_id(), Some(3));
        assert_eq!(point.value(), Some(42.5));
        assert_eq!(point.counter(), Some(1));
    }

    /// Incident create carries component status and flags
    #[tokio::test]
    async fn test_incident_create() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/incidents"))
            .and(body_partial_json(json!({
                "name": "Something blew up!",
                "status": 1,
                "visible": 1,
                "notify": 1,
                "component_id": 1,
                "component_status": 4
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"id": 1, "name": "Something blew up!", "status": 1, "visible": 1}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let issue = client(&server)
            .incidents
            .create(
                NewIncident::new("Something blew up!", "We are looking into it", INCIDENT_INVESTIGATING)
                    .component(1, COMPONENT_STATUS_MAJOR_OUTAGE),
            )
            .await
            .unwrap();

        assert!(issue.visible());
    }
}

mod general_tests {
    use super::*;

    #[tokio::test]
    async fn test_ping() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": "Pong!"})))
            .mount(&server)
            .await;

        assert!(client(&server).ping().await.unwrap());
    }

    #[tokio::test]
    async fn test_version() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/version"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "meta": {"on_latest": false, "latest": {"tag_name": "v2.3.15"}},
                "data": "2.3.10"
            })))
            .mount(&server)
            .await;

        let version = client(&server).version().await.unwrap();
        assert_eq!(version.value, "2.3.10");
        assert!(!version.on_latest);
    }

    /// 401 surfaces as an Api error with the status
    #[tokio::test]
    async fn test_401_is_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/components/1"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let err = client(&server).components.get(1).await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.body(), Some(&Value::String("Unauthorized".into())));
    }

    /// Connection failures surface as transport errors
    #[tokio::test]
    async fn test_transport_error() {
        let client = Client::new("http://127.0.0.1:1/api/v1", TOKEN).unwrap();
        let err = client.ping().await.unwrap_err();
        assert!(matches!(err, CachetError::Transport(_)));
    }
}
