use domains::inputs::{ClubInput, JoinInput, ProgramInput, SchoolInput};
use domains::ports::{CatalogRepository, MembershipRepository};
use domains::{DomainError, JoinPolicy};
use integration_tests::Harness;
use services::pagination::PROJECTS_PER_PAGE;
use uuid::Uuid;

fn school(name: &str) -> SchoolInput {
    SchoolInput {
        name: name.into(),
        location: Some("Kampala".into()),
        image: None,
        badge: None,
        description: None,
        partnership_date: None,
        contact_person: None,
        contact_email: None,
        contact_phone: None,
        website: None,
        student_population: Some(800),
    }
}

fn club(title: &str, school_id: Option<Uuid>) -> ClubInput {
    ClubInput {
        school_id,
        icon: None,
        image: None,
        title: title.into(),
        description: None,
        location: None,
        meeting_schedule: Some("Fridays".into()),
        coordinator: None,
        member_count: Some(12),
    }
}

#[tokio::test]
async fn project_pages_clamp_out_of_range_numbers() {
    let h = Harness::direct();
    let (staff, _) = h.staff("coordinator").await;
    for n in 0..=PROJECTS_PER_PAGE {
        h.project(&staff, &format!("Project {n}")).await;
    }

    let first = h.state.catalog.list_projects(Some("not-a-number")).await.unwrap();
    assert_eq!(first.number, 1);
    assert_eq!(first.num_pages, 2);
    assert_eq!(first.items.len() as i64, PROJECTS_PER_PAGE);
    assert!(first.has_next);

    let last = h.state.catalog.list_projects(Some("99")).await.unwrap();
    assert_eq!(last.number, 2);
    assert_eq!(last.items.len(), 1);
    assert!(last.has_previous && !last.has_next);

    let zero = h.state.catalog.list_projects(Some("0")).await.unwrap();
    assert_eq!(zero.number, 2);
}

#[tokio::test]
async fn empty_listing_has_one_empty_page() {
    let h = Harness::direct();
    let page = h.state.catalog.list_schools(Some("3")).await.unwrap();
    assert_eq!(page.number, 1);
    assert_eq!(page.num_pages, 1);
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn deleting_a_project_removes_its_dependents() {
    let h = Harness::new(JoinPolicy::Direct);
    let (staff, _) = h.staff("coordinator").await;
    let project = h.project(&staff, "Clean Water").await;
    let (amina, _) = h.user("amina").await;
    h.state
        .membership
        .join(project.id, &amina, JoinInput::default())
        .await
        .unwrap();

    let err = h.state.catalog.delete_project(&amina, project.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    h.state.catalog.delete_project(&staff, project.id).await.unwrap();
    assert!(h.store.get_project(project.id).await.unwrap().is_none());
    assert!(h.store.find_membership(project.id, amina.id).await.unwrap().is_none());
    let err = h.state.catalog.project_detail(project.id, None).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(..)));

    let err = h.state.catalog.delete_project(&staff, project.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(..)));
}

#[tokio::test]
async fn project_detail_reports_viewer_status() {
    let h = Harness::direct();
    let (staff, _) = h.staff("coordinator").await;
    let project = h.project(&staff, "Clean Water").await;
    let (amina, _) = h.user("amina").await;

    let anonymous = h.state.catalog.project_detail(project.id, None).await.unwrap();
    assert!(anonymous.viewer.is_none());
    assert_eq!(anonymous.members_count, 0);

    h.state
        .membership
        .join(project.id, &amina, JoinInput::default())
        .await
        .unwrap();
    let page = h.state.catalog.project_detail(project.id, Some(&amina)).await.unwrap();
    let viewer = page.viewer.unwrap();
    assert!(viewer.is_member);
    assert!(viewer.pending_request.is_none());
    assert_eq!(page.members_count, 1);
    assert_eq!(page.members[0].username, "amina");
}

#[tokio::test]
async fn program_filter_by_category() {
    let h = Harness::direct();
    let (staff, _) = h.staff("coordinator").await;
    let water = h.project(&staff, "Water").await;
    let health = h.project(&staff, "Health").await;
    for (category_id, title) in [
        (water.category_id, "Boreholes"),
        (water.category_id, "Rain Tanks"),
        (health.category_id, "First Aid"),
    ] {
        h.state
            .catalog
            .create_program(
                &staff,
                ProgramInput {
                    category_id: Some(category_id),
                    image: None,
                    title: title.into(),
                    description: None,
                },
            )
            .await
            .unwrap();
    }

    let all = h.state.catalog.list_programs(None).await.unwrap();
    assert_eq!(all.len(), 2);

    let filtered = h
        .state
        .catalog
        .list_programs(Some(&water.category_id.to_string()))
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    let titles: Vec<_> = filtered[0].programs.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Boreholes", "Rain Tanks"]);

    assert!(h.state.catalog.list_programs(Some("garbage")).await.unwrap().is_empty());

    let detail = h.state.catalog.program_detail(filtered[0].programs[0].id).await.unwrap();
    assert_eq!(detail.related.len(), 1);
    assert_eq!(detail.related[0].title, "Rain Tanks");
}

#[tokio::test]
async fn schools_list_their_clubs() {
    let h = Harness::direct();
    let (staff, _) = h.staff("coordinator").await;
    let school = h.state.catalog.create_school(&staff, school("Hillside High")).await.unwrap();
    h.state
        .catalog
        .create_club(&staff, club("Debate", Some(school.id)))
        .await
        .unwrap();
    h.state.catalog.create_club(&staff, club("Chess", None)).await.unwrap();

    let page = h.state.catalog.list_schools(None).await.unwrap();
    assert_eq!(page.items[0].clubs_count, 1);

    let detail = h.state.catalog.school_detail(school.id).await.unwrap();
    assert_eq!(detail.clubs.len(), 1);
    assert_eq!(detail.clubs[0].title, "Debate");

    let clubs = h.state.catalog.list_clubs(None).await.unwrap();
    let titles: Vec<_> = clubs.items.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Chess", "Debate"]);
}

#[tokio::test]
async fn club_with_unknown_school_is_rejected() {
    let h = Harness::direct();
    let (staff, _) = h.staff("coordinator").await;
    let err = h
        .state
        .catalog
        .create_club(&staff, club("Debate", Some(Uuid::now_v7())))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}
