use axum::http::{Method, StatusCode};
use integration_tests::Harness;
use serde_json::json;

#[tokio::test]
async fn request_review_round_trip_over_http() {
    let h = Harness::review();
    let (staff, staff_token) = h.staff("coordinator").await;
    let project = h.project(&staff, "Clean Water").await;
    let (_, token) = h.user("amina").await;

    let (status, _) = h
        .call(Method::POST, &format!("/projects/{}/join", project.id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, filed) = h
        .call(
            Method::POST,
            &format!("/projects/{}/requests", project.id),
            Some(&token),
            Some(json!({ "role": "mentor", "message": "I teach maths." })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{filed}");
    assert_eq!(filed["data"]["status"], "pending");
    let request_id = filed["data"]["id"].as_str().unwrap().to_string();

    let (status, dup) = h
        .call(
            Method::POST,
            &format!("/projects/{}/requests", project.id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(dup["conflict"], "already_pending");

    let (status, _) = h
        .call(
            Method::GET,
            &format!("/staff/projects/{}/requests", project.id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, pending) = h
        .call(
            Method::GET,
            &format!("/staff/projects/{}/requests", project.id),
            Some(&staff_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pending.as_array().unwrap().len(), 1);

    let approve = format!("/staff/membership-requests/{request_id}/approve");
    let (status, approved) = h.call(Method::POST, &approve, Some(&staff_token), None).await;
    assert_eq!(status, StatusCode::OK, "{approved}");
    assert_eq!(approved["data"]["request"]["status"], "approved");
    assert_eq!(approved["data"]["membership"]["role"], "mentor");

    let (status, again) = h.call(Method::POST, &approve, Some(&staff_token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(again["conflict"], "request_not_pending");

    let (_, detail) = h
        .call(Method::GET, &format!("/projects/{}", project.id), Some(&token), None)
        .await;
    assert_eq!(detail["viewer"]["is_member"], true);
    assert_eq!(h.state.metrics.count("approve_request", "ok"), 1);
    assert_eq!(h.state.metrics.count("approve_request", "conflict"), 1);
}

#[tokio::test]
async fn cancelling_someone_elses_request_is_not_found() {
    let h = Harness::review();
    let (staff, _) = h.staff("coordinator").await;
    let project = h.project(&staff, "Clean Water").await;
    let (_, amina) = h.user("amina").await;
    let (_, brian) = h.user("brian").await;

    let (_, filed) = h
        .call(
            Method::POST,
            &format!("/projects/{}/requests", project.id),
            Some(&amina),
            None,
        )
        .await;
    let cancel = format!("/membership-requests/{}/cancel", filed["data"]["id"].as_str().unwrap());

    let (status, _) = h.call(Method::POST, &cancel, Some(&brian), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, cancelled) = h.call(Method::POST, &cancel, Some(&amina), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["data"]["status"], "cancelled");
}

#[tokio::test]
async fn staff_manage_newsletter_and_projects() {
    let h = Harness::direct();
    let (staff, staff_token) = h.staff("coordinator").await;
    let project = h.project(&staff, "Clean Water").await;

    let (_, sub) = h
        .call(
            Method::POST,
            "/newsletter/subscribe",
            None,
            Some(json!({ "email": "reader@example.org", "name": "Reader" })),
        )
        .await;
    let (status, deactivated) = h
        .call(
            Method::POST,
            &format!("/staff/newsletter/{}/deactivate", sub["data"]["id"].as_str().unwrap()),
            Some(&staff_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deactivated["data"]["is_active"], false);

    let (status, listed) = h.call(Method::GET, "/staff/newsletter", Some(&staff_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = h
        .call(Method::DELETE, &format!("/staff/projects/{}", project.id), Some(&staff_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = h
        .call(Method::GET, &format!("/projects/{}", project.id), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn anonymous_staff_calls_are_unauthorized() {
    let h = Harness::direct();
    let (status, body) = h.call(Method::GET, "/staff/contact-messages", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"]["text"], "Authentication credentials were not provided.");
}
