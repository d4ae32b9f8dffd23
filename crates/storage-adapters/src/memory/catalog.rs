use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use domains::ports::CatalogRepository;
use domains::*;
use uuid::Uuid;

use super::{snapshot, window, MemoryStore};

impl MemoryStore {
    pub fn put_project_details(&self, details: ProjectDetails) {
        self.project_details.insert(details.project_id, details);
    }

    pub fn add_project_photo(&self, photo: ProjectPhoto) {
        self.project_photos.insert(photo.id, photo);
    }

    pub fn add_project_achievement(&self, achievement: ProjectAchievement) {
        self.project_achievements.insert(achievement.id, achievement);
    }

    fn sorted_projects(&self) -> Vec<Project> {
        let mut rows = snapshot(&self.projects);
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.title.cmp(&b.title)));
        rows
    }

    fn sorted_schools(&self) -> Vec<School> {
        let mut rows = snapshot(&self.schools);
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        rows
    }

    fn sorted_clubs(&self) -> Vec<Club> {
        let mut rows = snapshot(&self.clubs);
        rows.sort_by(|a, b| a.title.cmp(&b.title));
        rows
    }
}

#[async_trait]
impl CatalogRepository for MemoryStore {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        let mut rows = snapshot(&self.categories);
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>> {
        Ok(self.categories.get(&id).map(|c| c.value().clone()))
    }

    async fn insert_category(&self, category: Category) -> Result<Category> {
        match self.category_names.entry(category.name.clone()) {
            Entry::Occupied(_) => Err(DomainError::Conflict(ConflictKind::DuplicateName)),
            Entry::Vacant(slot) => {
                self.categories.insert(category.id, category.clone());
                slot.insert(category.id);
                Ok(category)
            }
        }
    }

    async fn list_projects(&self, limit: i64, offset: i64) -> Result<Vec<Project>> {
        Ok(window(self.sorted_projects(), limit, offset))
    }

    async fn count_projects(&self) -> Result<i64> {
        Ok(self.projects.len() as i64)
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
        Ok(self.projects.get(&id).map(|p| p.value().clone()))
    }

    async fn insert_project(&self, project: Project) -> Result<Project> {
        self.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool> {
        if self.projects.remove(&id).is_none() {
            return Ok(false);
        }
        self.project_details.remove(&id);
        self.project_photos.retain(|_, p| p.project_id != id);
        self.project_achievements.retain(|_, a| a.project_id != id);
        self.memberships.retain(|(project_id, _), _| *project_id != id);
        self.requests.retain(|_, r| r.project_id != id);
        self.pending.retain(|(project_id, _), _| *project_id != id);
        tracing::debug!(project_id = %id, "project removed with dependents");
        Ok(true)
    }

    async fn get_project_details(&self, project_id: Uuid) -> Result<Option<ProjectDetails>> {
        Ok(self.project_details.get(&project_id).map(|d| d.value().clone()))
    }

    async fn list_project_photos(&self, project_id: Uuid) -> Result<Vec<ProjectPhoto>> {
        let mut rows: Vec<_> = snapshot(&self.project_photos)
            .into_iter()
            .filter(|p| p.project_id == project_id)
            .collect();
        rows.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(rows)
    }

    async fn list_project_achievements(&self, project_id: Uuid) -> Result<Vec<ProjectAchievement>> {
        let mut rows: Vec<_> = snapshot(&self.project_achievements)
            .into_iter()
            .filter(|a| a.project_id == project_id)
            .collect();
        // Undated achievements sort last: `None` is the smallest `Option`
        rows.sort_by(|a, b| {
            b.achieved_on
                .cmp(&a.achieved_on)
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| a.title.cmp(&b.title))
        });
        Ok(rows)
    }

    async fn list_programs(&self, category_id: Option<Uuid>) -> Result<Vec<Program>> {
        let mut rows: Vec<_> = snapshot(&self.programs)
            .into_iter()
            .filter(|p| category_id.map_or(true, |c| p.category_id == c))
            .collect();
        rows.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(rows)
    }

    async fn get_program(&self, id: Uuid) -> Result<Option<Program>> {
        Ok(self.programs.get(&id).map(|p| p.value().clone()))
    }

    async fn insert_program(&self, program: Program) -> Result<Program> {
        self.programs.insert(program.id, program.clone());
        Ok(program)
    }

    async fn list_schools(&self, limit: i64, offset: i64) -> Result<Vec<School>> {
        Ok(window(self.sorted_schools(), limit, offset))
    }

    async fn count_schools(&self) -> Result<i64> {
        Ok(self.schools.len() as i64)
    }

    async fn get_school(&self, id: Uuid) -> Result<Option<School>> {
        Ok(self.schools.get(&id).map(|s| s.value().clone()))
    }

    async fn insert_school(&self, school: School) -> Result<School> {
        self.schools.insert(school.id, school.clone());
        Ok(school)
    }

    async fn list_clubs(&self, limit: i64, offset: i64) -> Result<Vec<Club>> {
        Ok(window(self.sorted_clubs(), limit, offset))
    }

    async fn count_clubs(&self) -> Result<i64> {
        Ok(self.clubs.len() as i64)
    }

    async fn list_clubs_for_school(&self, school_id: Uuid) -> Result<Vec<Club>> {
        Ok(self
            .sorted_clubs()
            .into_iter()
            .filter(|c| c.school_id == Some(school_id))
            .collect())
    }

    async fn get_club(&self, id: Uuid) -> Result<Option<Club>> {
        Ok(self.clubs.get(&id).map(|c| c.value().clone()))
    }

    async fn insert_club(&self, club: Club) -> Result<Club> {
        self.clubs.insert(club.id, club.clone());
        Ok(club)
    }

    async fn list_blog_posts(&self, include_drafts: bool) -> Result<Vec<BlogPost>> {
        let mut rows: Vec<_> = snapshot(&self.blog_posts)
            .into_iter()
            .filter(|p| include_drafts || p.is_published)
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.created_at.cmp(&a.created_at)));
        Ok(rows)
    }

    async fn get_blog_post(&self, id: Uuid) -> Result<Option<BlogPost>> {
        Ok(self.blog_posts.get(&id).map(|p| p.value().clone()))
    }

    async fn insert_blog_post(&self, post: BlogPost) -> Result<BlogPost> {
        self.blog_posts.insert(post.id, post.clone());
        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, Utc};

    fn project_at(title: &str, minutes_ago: i64) -> Project {
        let at = Utc::now() - Duration::minutes(minutes_ago);
        Project {
            id: Uuid::now_v7(),
            category_id: Uuid::now_v7(),
            image: None,
            title: title.into(),
            description: String::new(),
            created_at: at,
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn projects_list_newest_first_with_window() {
        let store = MemoryStore::new();
        for (title, age) in [("Old", 30), ("Newest", 0), ("Middle", 10)] {
            store.insert_project(project_at(title, age)).await.unwrap();
        }
        let titles: Vec<_> = store
            .list_projects(2, 0)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Newest", "Middle"]);
        let rest = store.list_projects(2, 2).await.unwrap();
        assert_eq!(rest[0].title, "Old");
    }

    #[tokio::test]
    async fn category_names_are_unique() {
        let store = MemoryStore::new();
        let category = |name: &str| Category {
            id: Uuid::now_v7(),
            name: name.into(),
            created_at: Utc::now(),
        };
        store.insert_category(category("Health")).await.unwrap();
        let err = store.insert_category(category("Health")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(ConflictKind::DuplicateName)));
    }

    #[tokio::test]
    async fn achievements_put_undated_last() {
        let store = MemoryStore::new();
        let project = store.insert_project(project_at("P", 0)).await.unwrap();
        let achievement = |title: &str, on: Option<NaiveDate>| ProjectAchievement {
            id: Uuid::now_v7(),
            project_id: project.id,
            title: title.into(),
            description: String::new(),
            achieved_on: on,
            value: String::new(),
            created_at: Utc::now(),
        };
        store.add_project_achievement(achievement("Undated", None));
        store.add_project_achievement(achievement("Early", NaiveDate::from_ymd_opt(2023, 1, 5)));
        store.add_project_achievement(achievement("Late", NaiveDate::from_ymd_opt(2024, 6, 1)));

        let titles: Vec<_> = store
            .list_project_achievements(project.id)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["Late", "Early", "Undated"]);
    }
}
