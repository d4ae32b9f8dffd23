use std::sync::Arc;

use domains::inputs::{JoinInput, JoinRequestInput};
use domains::ports::MembershipRepository;
use domains::{ConflictKind, DomainError, ProjectRole, RequestStatus};
use integration_tests::Harness;
use services::{JoinOutcome, LeaveOutcome};
use uuid::Uuid;

fn as_mentor() -> JoinInput {
    JoinInput {
        role: Some("mentor".into()),
    }
}

#[tokio::test]
async fn joining_twice_reports_the_existing_membership() {
    let h = Harness::direct();
    let (staff, _) = h.staff("coordinator").await;
    let project = h.project(&staff, "Clean Water").await;
    let (amina, _) = h.user("amina").await;

    let first = h
        .state
        .membership
        .join(project.id, &amina, JoinInput::default())
        .await
        .unwrap();
    assert!(matches!(first, JoinOutcome::Joined(_)));
    assert_eq!(first.membership().role, ProjectRole::Student);

    let second = h.state.membership.join(project.id, &amina, as_mentor()).await.unwrap();
    assert!(matches!(second, JoinOutcome::AlreadyMember(_)));
    assert_eq!(second.membership(), first.membership());
    assert_eq!(second.membership().role, ProjectRole::Student);
    assert_eq!(h.store.count_members(project.id).await.unwrap(), 1);
}

#[tokio::test]
async fn leaving_without_membership_is_informational() {
    let h = Harness::direct();
    let (staff, _) = h.staff("coordinator").await;
    let project = h.project(&staff, "Clean Water").await;
    let (amina, _) = h.user("amina").await;

    let outcome = h.state.membership.leave(project.id, &amina).await.unwrap();
    assert!(matches!(outcome, LeaveOutcome::NotAMember));

    h.state.membership.join(project.id, &amina, JoinInput::default()).await.unwrap();
    let outcome = h.state.membership.leave(project.id, &amina).await.unwrap();
    assert!(matches!(outcome, LeaveOutcome::Left));
    assert_eq!(h.store.count_members(project.id).await.unwrap(), 0);
}

#[tokio::test]
async fn join_rejects_unknown_project_and_role() {
    let h = Harness::direct();
    let (staff, _) = h.staff("coordinator").await;
    let project = h.project(&staff, "Clean Water").await;
    let (amina, _) = h.user("amina").await;

    let err = h
        .state
        .membership
        .join(Uuid::now_v7(), &amina, JoinInput::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(..)));

    let err = h
        .state
        .membership
        .join(project.id, &amina, JoinInput { role: Some("captain".into()) })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn direct_policy_has_no_join_requests() {
    let h = Harness::direct();
    let (staff, _) = h.staff("coordinator").await;
    let project = h.project(&staff, "Clean Water").await;
    let (amina, _) = h.user("amina").await;

    let err = h
        .state
        .membership
        .request_join(project.id, &amina, JoinRequestInput::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
}

#[tokio::test]
async fn review_policy_allows_one_pending_request() {
    let h = Harness::review();
    let (staff, _) = h.staff("coordinator").await;
    let project = h.project(&staff, "Clean Water").await;
    let (amina, _) = h.user("amina").await;

    let err = h
        .state
        .membership
        .join(project.id, &amina, JoinInput::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let request = h
        .state
        .membership
        .request_join(
            project.id,
            &amina,
            JoinRequestInput {
                role: Some("partner".into()),
                message: Some("  We run a school garden.  ".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(request.role, ProjectRole::Partner);
    assert_eq!(request.message, "We run a school garden.");

    let err = h
        .state
        .membership
        .request_join(project.id, &amina, JoinRequestInput::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(ConflictKind::AlreadyPending)));
}

#[tokio::test]
async fn only_the_owner_can_cancel_a_request() {
    let h = Harness::review();
    let (staff, _) = h.staff("coordinator").await;
    let project = h.project(&staff, "Clean Water").await;
    let (amina, _) = h.user("amina").await;
    let (brian, _) = h.user("brian").await;

    let request = h
        .state
        .membership
        .request_join(project.id, &amina, JoinRequestInput::default())
        .await
        .unwrap();

    let err = h.state.membership.cancel_request(request.id, &brian).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(..)));

    let cancelled = h.state.membership.cancel_request(request.id, &amina).await.unwrap();
    assert_eq!(cancelled.status, RequestStatus::Cancelled);
    assert!(cancelled.decided_at.is_some());

    // Closed requests are not cancellable either
    let err = h.state.membership.cancel_request(request.id, &amina).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(..)));

    // and a new request may now be filed
    h.state
        .membership
        .request_join(project.id, &amina, JoinRequestInput::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn approval_creates_exactly_one_membership() {
    let h = Harness::review();
    let (staff, _) = h.staff("coordinator").await;
    let project = h.project(&staff, "Clean Water").await;
    let (amina, _) = h.user("amina").await;

    let request = h
        .state
        .membership
        .request_join(project.id, &amina, JoinRequestInput { role: Some("mentor".into()), message: None })
        .await
        .unwrap();

    let (approved, membership) = h.state.membership.approve_request(request.id, &staff).await.unwrap();
    assert_eq!(approved.status, RequestStatus::Approved);
    assert_eq!(membership.role, ProjectRole::Mentor);
    assert_eq!(membership.user_id, amina.id);

    let err = h.state.membership.approve_request(request.id, &staff).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(ConflictKind::RequestNotPending)));
    let err = h.state.membership.reject_request(request.id, &staff).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(ConflictKind::RequestNotPending)));

    assert_eq!(h.store.count_members(project.id).await.unwrap(), 1);
    assert!(h
        .state
        .membership
        .list_pending_requests(project.id, &staff)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn concurrent_approvals_only_one_wins() {
    let h = Harness::review();
    let (staff, _) = h.staff("coordinator").await;
    let project = h.project(&staff, "Clean Water").await;
    let (amina, _) = h.user("amina").await;
    let request = h
        .state
        .membership
        .request_join(project.id, &amina, JoinRequestInput::default())
        .await
        .unwrap();

    let membership = Arc::clone(&h.state.membership);
    let mut handles = Vec::new();
    for _ in 0..8 {
        let membership = Arc::clone(&membership);
        let staff = staff.clone();
        handles.push(tokio::spawn(async move {
            membership.approve_request(request.id, &staff).await
        }));
    }
    let mut approved = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => approved += 1,
            Err(DomainError::Conflict(ConflictKind::RequestNotPending)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(approved, 1);
    assert_eq!(h.store.count_members(project.id).await.unwrap(), 1);
}

#[tokio::test]
async fn reviewing_requests_is_staff_only() {
    let h = Harness::review();
    let (staff, _) = h.staff("coordinator").await;
    let project = h.project(&staff, "Clean Water").await;
    let (amina, _) = h.user("amina").await;
    let request = h
        .state
        .membership
        .request_join(project.id, &amina, JoinRequestInput::default())
        .await
        .unwrap();

    let err = h.state.membership.approve_request(request.id, &amina).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
    let err = h.state.membership.list_pending_requests(project.id, &amina).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let rejected = h.state.membership.reject_request(request.id, &staff).await.unwrap();
    assert_eq!(rejected.status, RequestStatus::Rejected);
    assert_eq!(h.store.count_members(project.id).await.unwrap(), 0);
}
