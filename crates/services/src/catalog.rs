//! # Content Catalog
//!
//! Read models for the public pages plus the staff-only catalog writes.
//! Paginated listings resolve their page window first, then fetch only that
//! slice from storage.

use std::sync::Arc;

use chrono::Utc;
use domains::inputs::{self, CategoryInput, ClubInput, ProgramInput, ProjectInput, SchoolInput};
use domains::ports::{ArticleRepository, CatalogRepository, MembershipRepository, ShowcaseRepository};
use domains::{
    Article, Category, Club, DomainError, Donation, Impact, ImpactCounter, Membership,
    MembershipRequest, Mentor, Photo, Program, Project, ProjectAchievement, ProjectDetails,
    ProjectMember, ProjectPhoto, Resource, Result, School, SpotlightCategory, SpotlightItem,
    SpotlightStat, TeamMember, User, Visibility, VoiceOfChange,
};
use serde::Serialize;
use uuid::Uuid;

use crate::pagination::{Page, PageWindow, CLUBS_PER_PAGE, PROJECTS_PER_PAGE, SCHOOLS_PER_PAGE};
use crate::require_staff;
use crate::status::StatusMessage;

const RELATED_PROGRAMS: usize = 6;
const HOME_MENTORS: i64 = 6;
const HOME_ARTICLES: i64 = 6;
const HOME_RESOURCES: i64 = 6;
const HOME_PHOTOS: i64 = 8;
/// Used where a page lists every row.
const UNBOUNDED: i64 = i64::MAX;

#[derive(Debug, Clone, Serialize)]
pub struct ProjectCard {
    #[serde(flatten)]
    pub project: Project,
    pub members_count: i64,
}

/// What the signed-in reader has to do with a project.
#[derive(Debug, Clone, Serialize)]
pub struct ViewerStatus {
    pub is_member: bool,
    pub membership: Option<Membership>,
    pub pending_request: Option<MembershipRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectPage {
    pub project: Project,
    pub category: Option<Category>,
    pub details: Option<ProjectDetails>,
    pub members_count: usize,
    pub members: Vec<ProjectMember>,
    pub photos: Vec<ProjectPhoto>,
    pub achievements: Vec<ProjectAchievement>,
    /// `None` for anonymous readers
    pub viewer: Option<ViewerStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClubPage {
    pub club: Club,
    pub school: Option<School>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryPrograms {
    #[serde(flatten)]
    pub category: Category,
    pub programs: Vec<Program>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgramPage {
    pub program: Program,
    pub category: Option<Category>,
    pub related: Vec<Program>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchoolCard {
    #[serde(flatten)]
    pub school: School,
    pub clubs_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchoolPage {
    pub school: School,
    pub clubs: Vec<Club>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImpactPage {
    pub sections: Vec<Impact>,
    pub counters: Vec<ImpactCounter>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpotlightSection {
    #[serde(flatten)]
    pub category: SpotlightCategory,
    pub label: &'static str,
    pub items: Vec<SpotlightItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpotlightPage {
    pub categories: Vec<SpotlightSection>,
    pub stats: Vec<SpotlightStat>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomePage {
    pub impact: ImpactPage,
    pub spotlight: SpotlightPage,
    pub team: Vec<TeamMember>,
    pub voices: Vec<VoiceOfChange>,
    pub mentors: Vec<Mentor>,
    pub projects: Vec<Project>,
    pub clubs: Vec<Club>,
    pub categories: Vec<CategoryPrograms>,
    pub schools: Vec<School>,
    pub donations: Vec<Donation>,
    pub articles: Vec<Article>,
    pub resources: Vec<Resource>,
    pub photos: Vec<Photo>,
}

pub struct CatalogService {
    catalog: Arc<dyn CatalogRepository>,
    showcase: Arc<dyn ShowcaseRepository>,
    memberships: Arc<dyn MembershipRepository>,
    articles: Arc<dyn ArticleRepository>,
}

impl CatalogService {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        showcase: Arc<dyn ShowcaseRepository>,
        memberships: Arc<dyn MembershipRepository>,
        articles: Arc<dyn ArticleRepository>,
    ) -> Self {
        Self {
            catalog,
            showcase,
            memberships,
            articles,
        }
    }

    // ── Projects ───────────────────────────────────────────────────────────

    pub async fn list_projects(&self, page: Option<&str>) -> Result<Page<ProjectCard>> {
        let total = self.catalog.count_projects().await?;
        let window = PageWindow::resolve(page, total, PROJECTS_PER_PAGE);
        let projects = self
            .catalog
            .list_projects(window.limit(), window.offset())
            .await?;

        let mut cards = Vec::with_capacity(projects.len());
        for project in projects {
            let members_count = self.memberships.count_members(project.id).await?;
            cards.push(ProjectCard {
                project,
                members_count,
            });
        }
        tracing::debug!(page = window.number, total, "listed projects");
        Ok(window.into_page(cards))
    }

    pub async fn project_detail(&self, project_id: Uuid, viewer: Option<&User>) -> Result<ProjectPage> {
        let project = self
            .catalog
            .get_project(project_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Project", project_id))?;

        let category = self.catalog.get_category(project.category_id).await?;
        let details = self.catalog.get_project_details(project_id).await?;
        let members = self.memberships.list_members(project_id).await?;
        let photos = self.catalog.list_project_photos(project_id).await?;
        let achievements = self.catalog.list_project_achievements(project_id).await?;

        let viewer = match viewer {
            Some(user) => {
                let membership = self.memberships.find_membership(project_id, user.id).await?;
                let pending_request = self
                    .memberships
                    .find_pending_request(project_id, user.id)
                    .await?;
                Some(ViewerStatus {
                    is_member: membership.is_some(),
                    membership,
                    pending_request,
                })
            }
            None => None,
        };

        Ok(ProjectPage {
            project,
            category,
            details,
            members_count: members.len(),
            members,
            photos,
            achievements,
            viewer,
        })
    }

    // ── Clubs ──────────────────────────────────────────────────────────────

    pub async fn list_clubs(&self, page: Option<&str>) -> Result<Page<Club>> {
        let total = self.catalog.count_clubs().await?;
        let window = PageWindow::resolve(page, total, CLUBS_PER_PAGE);
        let clubs = self.catalog.list_clubs(window.limit(), window.offset()).await?;
        Ok(window.into_page(clubs))
    }

    pub async fn club_detail(&self, club_id: Uuid) -> Result<ClubPage> {
        let club = self
            .catalog
            .get_club(club_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Club", club_id))?;
        let school = match club.school_id {
            Some(school_id) => self.catalog.get_school(school_id).await?,
            None => None,
        };
        Ok(ClubPage { club, school })
    }

    // ── Programs ───────────────────────────────────────────────────────────

    /// Every category with its programs, or only the selected one. A filter
    /// that names no category yields an empty listing.
    pub async fn list_programs(&self, category: Option<&str>) -> Result<Vec<CategoryPrograms>> {
        let categories = self.catalog.list_categories().await?;
        let selected: Vec<Category> = match category.map(str::trim).filter(|c| !c.is_empty()) {
            None => categories,
            Some(raw) => match raw.parse::<Uuid>() {
                Ok(id) => categories.into_iter().filter(|c| c.id == id).collect(),
                Err(_) => Vec::new(),
            },
        };
        self.with_programs(selected).await
    }

    pub async fn program_detail(&self, program_id: Uuid) -> Result<ProgramPage> {
        let program = self
            .catalog
            .get_program(program_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Program", program_id))?;
        let category = self.catalog.get_category(program.category_id).await?;
        let related = self
            .catalog
            .list_programs(Some(program.category_id))
            .await?
            .into_iter()
            .filter(|p| p.id != program.id)
            .take(RELATED_PROGRAMS)
            .collect();
        let categories = self.catalog.list_categories().await?;
        Ok(ProgramPage {
            program,
            category,
            related,
            categories,
        })
    }

    async fn with_programs(&self, categories: Vec<Category>) -> Result<Vec<CategoryPrograms>> {
        let mut out = Vec::with_capacity(categories.len());
        for category in categories {
            let programs = self.catalog.list_programs(Some(category.id)).await?;
            out.push(CategoryPrograms { category, programs });
        }
        Ok(out)
    }

    // ── Partner schools ────────────────────────────────────────────────────

    pub async fn list_schools(&self, page: Option<&str>) -> Result<Page<SchoolCard>> {
        let total = self.catalog.count_schools().await?;
        let window = PageWindow::resolve(page, total, SCHOOLS_PER_PAGE);
        let schools = self
            .catalog
            .list_schools(window.limit(), window.offset())
            .await?;

        let mut cards = Vec::with_capacity(schools.len());
        for school in schools {
            let clubs_count = self.catalog.list_clubs_for_school(school.id).await?.len();
            cards.push(SchoolCard { school, clubs_count });
        }
        Ok(window.into_page(cards))
    }

    pub async fn school_detail(&self, school_id: Uuid) -> Result<SchoolPage> {
        let school = self
            .catalog
            .get_school(school_id)
            .await?
            .ok_or_else(|| DomainError::not_found("School", school_id))?;
        let clubs = self.catalog.list_clubs_for_school(school_id).await?;
        Ok(SchoolPage { school, clubs })
    }

    // ── Showcase ───────────────────────────────────────────────────────────

    pub async fn impact(&self) -> Result<ImpactPage> {
        Ok(ImpactPage {
            sections: self.showcase.active_impacts().await?,
            counters: self.showcase.active_impact_counters().await?,
        })
    }

    pub async fn spotlight(&self) -> Result<SpotlightPage> {
        let mut categories = Vec::new();
        for category in self.showcase.active_spotlight_categories().await? {
            let items = self.showcase.active_spotlight_items(category.id).await?;
            categories.push(SpotlightSection {
                label: category.kind.label(),
                category,
                items,
            });
        }
        Ok(SpotlightPage {
            categories,
            stats: self.showcase.active_spotlight_stats().await?,
        })
    }

    pub async fn home(&self) -> Result<HomePage> {
        let categories = self.catalog.list_categories().await?;
        Ok(HomePage {
            impact: self.impact().await?,
            spotlight: self.spotlight().await?,
            team: self.showcase.list_team().await?,
            voices: self.showcase.list_voices().await?,
            mentors: self.showcase.list_mentors(Some(HOME_MENTORS)).await?,
            projects: self.catalog.list_projects(UNBOUNDED, 0).await?,
            clubs: self.catalog.list_clubs(UNBOUNDED, 0).await?,
            categories: self.with_programs(categories).await?,
            schools: self.catalog.list_schools(UNBOUNDED, 0).await?,
            donations: self.showcase.list_donations().await?,
            articles: self
                .articles
                .list_articles(Visibility::Published, Some(HOME_ARTICLES))
                .await?,
            resources: self.showcase.list_resources(Some(HOME_RESOURCES)).await?,
            photos: self.showcase.list_photos(Some(HOME_PHOTOS)).await?,
        })
    }

    pub async fn donations(&self) -> Result<Vec<Donation>> {
        self.showcase.list_donations().await
    }

    pub async fn resources(&self) -> Result<Vec<Resource>> {
        self.showcase.list_resources(None).await
    }

    pub async fn gallery(&self) -> Result<Vec<Photo>> {
        self.showcase.list_photos(None).await
    }

    pub async fn team(&self) -> Result<Vec<TeamMember>> {
        self.showcase.list_team().await
    }

    pub async fn mentors(&self) -> Result<Vec<Mentor>> {
        self.showcase.list_mentors(None).await
    }

    pub async fn testimonials(&self) -> Result<Vec<VoiceOfChange>> {
        self.showcase.list_voices().await
    }

    // ── Staff writes ───────────────────────────────────────────────────────

    pub async fn create_category(&self, staff: &User, input: CategoryInput) -> Result<Category> {
        require_staff(staff, STAFF_ONLY)?;
        inputs::validate(&input)?;
        let category = Category {
            id: Uuid::now_v7(),
            name: input.name.trim().to_string(),
            created_at: Utc::now(),
        };
        let category = self.catalog.insert_category(category).await?;
        tracing::info!(category_id = %category.id, "category created");
        Ok(category)
    }

    pub async fn create_project(&self, staff: &User, input: ProjectInput) -> Result<Project> {
        require_staff(staff, STAFF_ONLY)?;
        inputs::validate(&input)?;
        let category_id = self.require_category(input.category_id).await?;

        let now = Utc::now();
        let project = Project {
            id: Uuid::now_v7(),
            category_id,
            image: inputs::optional(&input.image),
            title: input.title.trim().to_string(),
            description: inputs::text(&input.description),
            created_at: now,
            updated_at: now,
        };
        let project = self.catalog.insert_project(project).await?;
        tracing::info!(project_id = %project.id, "project created");
        Ok(project)
    }

    /// Removes the project with its memberships, requests, details, photos
    /// and achievements.
    pub async fn delete_project(&self, staff: &User, project_id: Uuid) -> Result<()> {
        require_staff(staff, STAFF_ONLY)?;
        if !self.catalog.delete_project(project_id).await? {
            return Err(DomainError::not_found("Project", project_id));
        }
        tracing::info!(project_id = %project_id, staff_id = %staff.id, "project deleted");
        Ok(())
    }

    pub async fn create_program(&self, staff: &User, input: ProgramInput) -> Result<Program> {
        require_staff(staff, STAFF_ONLY)?;
        inputs::validate(&input)?;
        let category_id = self.require_category(input.category_id).await?;

        let now = Utc::now();
        let program = Program {
            id: Uuid::now_v7(),
            category_id,
            image: inputs::optional(&input.image),
            title: input.title.trim().to_string(),
            description: inputs::text(&input.description),
            created_at: now,
            updated_at: now,
        };
        let program = self.catalog.insert_program(program).await?;
        tracing::info!(program_id = %program.id, "program created");
        Ok(program)
    }

    pub async fn create_school(&self, staff: &User, input: SchoolInput) -> Result<School> {
        require_staff(staff, STAFF_ONLY)?;
        let input = SchoolInput {
            contact_email: inputs::optional(&input.contact_email),
            ..input
        };
        inputs::validate(&input)?;

        let now = Utc::now();
        let school = School {
            id: Uuid::now_v7(),
            name: input.name.trim().to_string(),
            location: inputs::optional(&input.location),
            image: inputs::optional(&input.image),
            badge: inputs::optional(&input.badge),
            description: inputs::text(&input.description),
            partnership_date: input.partnership_date,
            contact_person: inputs::text(&input.contact_person),
            contact_email: inputs::text(&input.contact_email),
            contact_phone: inputs::text(&input.contact_phone),
            website: inputs::text(&input.website),
            student_population: input.student_population,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let school = self.catalog.insert_school(school).await?;
        tracing::info!(school_id = %school.id, "school created");
        Ok(school)
    }

    pub async fn create_club(&self, staff: &User, input: ClubInput) -> Result<Club> {
        require_staff(staff, STAFF_ONLY)?;
        inputs::validate(&input)?;
        if let Some(school_id) = input.school_id {
            if self.catalog.get_school(school_id).await?.is_none() {
                return Err(DomainError::invalid("school_id", INVALID_CHOICE));
            }
        }

        let now = Utc::now();
        let club = Club {
            id: Uuid::now_v7(),
            school_id: input.school_id,
            icon: inputs::optional(&input.icon),
            image: inputs::optional(&input.image),
            title: input.title.trim().to_string(),
            description: inputs::text(&input.description),
            location: inputs::text(&input.location),
            meeting_schedule: inputs::text(&input.meeting_schedule),
            coordinator: inputs::text(&input.coordinator),
            member_count: input.member_count.unwrap_or(0),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let club = self.catalog.insert_club(club).await?;
        tracing::info!(club_id = %club.id, "club created");
        Ok(club)
    }

    async fn require_category(&self, category_id: Option<Uuid>) -> Result<Uuid> {
        let id = category_id.ok_or_else(|| DomainError::invalid("category_id", inputs::REQUIRED))?;
        match self.catalog.get_category(id).await? {
            Some(category) => Ok(category.id),
            None => Err(DomainError::invalid("category_id", INVALID_CHOICE)),
        }
    }
}

const STAFF_ONLY: &str = "Only staff can manage the catalog.";
const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";

/// Shown after a staff create, e.g. "Program created successfully."
pub fn created_message(entity: &str) -> StatusMessage {
    StatusMessage::success(format!("{entity} created successfully."))
}

pub fn project_deleted_message() -> StatusMessage {
    StatusMessage::success("The project has been deleted.")
}
