use async_trait::async_trait;
use domains::ports::CatalogRepository;
use domains::*;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use super::{col, db_err, PgStore};

fn category_from(row: &PgRow) -> Result<Category> {
    Ok(Category {
        id: col(row, "id")?,
        name: col(row, "name")?,
        created_at: col(row, "created_at")?,
    })
}

fn project_from(row: &PgRow) -> Result<Project> {
    Ok(Project {
        id: col(row, "id")?,
        category_id: col(row, "category_id")?,
        image: col(row, "image")?,
        title: col(row, "title")?,
        description: col(row, "description")?,
        created_at: col(row, "created_at")?,
        updated_at: col(row, "updated_at")?,
    })
}

fn program_from(row: &PgRow) -> Result<Program> {
    Ok(Program {
        id: col(row, "id")?,
        category_id: col(row, "category_id")?,
        image: col(row, "image")?,
        title: col(row, "title")?,
        description: col(row, "description")?,
        created_at: col(row, "created_at")?,
        updated_at: col(row, "updated_at")?,
    })
}

fn school_from(row: &PgRow) -> Result<School> {
    Ok(School {
        id: col(row, "id")?,
        name: col(row, "name")?,
        location: col(row, "location")?,
        image: col(row, "image")?,
        badge: col(row, "badge")?,
        description: col(row, "description")?,
        partnership_date: col(row, "partnership_date")?,
        contact_person: col(row, "contact_person")?,
        contact_email: col(row, "contact_email")?,
        contact_phone: col(row, "contact_phone")?,
        website: col(row, "website")?,
        student_population: col(row, "student_population")?,
        is_active: col(row, "is_active")?,
        created_at: col(row, "created_at")?,
        updated_at: col(row, "updated_at")?,
    })
}

fn club_from(row: &PgRow) -> Result<Club> {
    Ok(Club {
        id: col(row, "id")?,
        school_id: col(row, "school_id")?,
        icon: col(row, "icon")?,
        image: col(row, "image")?,
        title: col(row, "title")?,
        description: col(row, "description")?,
        location: col(row, "location")?,
        meeting_schedule: col(row, "meeting_schedule")?,
        coordinator: col(row, "coordinator")?,
        member_count: col(row, "member_count")?,
        is_active: col(row, "is_active")?,
        created_at: col(row, "created_at")?,
        updated_at: col(row, "updated_at")?,
    })
}

fn blog_post_from(row: &PgRow) -> Result<BlogPost> {
    Ok(BlogPost {
        id: col(row, "id")?,
        title: col(row, "title")?,
        image: col(row, "image")?,
        author: col(row, "author")?,
        date: col(row, "date")?,
        content: col(row, "content")?,
        is_published: col(row, "is_published")?,
        created_at: col(row, "created_at")?,
        updated_at: col(row, "updated_at")?,
    })
}

fn all<T>(rows: Vec<PgRow>, map: fn(&PgRow) -> Result<T>) -> Result<Vec<T>> {
    rows.iter().map(map).collect()
}

#[async_trait]
impl CatalogRepository for PgStore {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT * FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        all(rows, category_from)
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(category_from).transpose()
    }

    async fn insert_category(&self, category: Category) -> Result<Category> {
        sqlx::query("INSERT INTO categories (id, name, created_at) VALUES ($1, $2, $3)")
            .bind(category.id)
            .bind(&category.name)
            .bind(category.created_at)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(category)
    }

    async fn list_projects(&self, limit: i64, offset: i64) -> Result<Vec<Project>> {
        let rows = sqlx::query(
            "SELECT * FROM projects ORDER BY created_at DESC, title LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        all(rows, project_from)
    }

    async fn count_projects(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
        let row = sqlx::query("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(project_from).transpose()
    }

    async fn insert_project(&self, project: Project) -> Result<Project> {
        sqlx::query(
            "INSERT INTO projects (id, category_id, image, title, description, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(project.id)
        .bind(project.category_id)
        .bind(&project.image)
        .bind(&project.title)
        .bind(&project.description)
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(project)
    }

    /// Dependents go with the row through `ON DELETE CASCADE`.
    async fn delete_project(&self, id: Uuid) -> Result<bool> {
        let done = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(done.rows_affected() == 1)
    }

    async fn get_project_details(&self, project_id: Uuid) -> Result<Option<ProjectDetails>> {
        let row = sqlx::query("SELECT * FROM project_details WHERE project_id = $1")
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref()
            .map(|row| {
                Ok(ProjectDetails {
                    project_id: col(row, "project_id")?,
                    challenge: col(row, "challenge")?,
                    solution: col(row, "solution")?,
                    key_objectives: col(row, "key_objectives")?,
                    updated_at: col(row, "updated_at")?,
                })
            })
            .transpose()
    }

    async fn list_project_photos(&self, project_id: Uuid) -> Result<Vec<ProjectPhoto>> {
        let rows = sqlx::query(
            "SELECT * FROM project_photos WHERE project_id = $1 ORDER BY uploaded_at DESC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        all(rows, |row| {
            Ok(ProjectPhoto {
                id: col(row, "id")?,
                project_id: col(row, "project_id")?,
                image: col(row, "image")?,
                caption: col(row, "caption")?,
                uploaded_at: col(row, "uploaded_at")?,
            })
        })
    }

    async fn list_project_achievements(&self, project_id: Uuid) -> Result<Vec<ProjectAchievement>> {
        let rows = sqlx::query(
            "SELECT * FROM project_achievements WHERE project_id = $1 \
             ORDER BY achieved_on DESC NULLS LAST, created_at DESC, title",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        all(rows, |row| {
            Ok(ProjectAchievement {
                id: col(row, "id")?,
                project_id: col(row, "project_id")?,
                title: col(row, "title")?,
                description: col(row, "description")?,
                achieved_on: col(row, "achieved_on")?,
                value: col(row, "value")?,
                created_at: col(row, "created_at")?,
            })
        })
    }

    async fn list_programs(&self, category_id: Option<Uuid>) -> Result<Vec<Program>> {
        let rows = sqlx::query(
            "SELECT * FROM programs WHERE ($1::uuid IS NULL OR category_id = $1) ORDER BY title",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        all(rows, program_from)
    }

    async fn get_program(&self, id: Uuid) -> Result<Option<Program>> {
        let row = sqlx::query("SELECT * FROM programs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(program_from).transpose()
    }

    async fn insert_program(&self, program: Program) -> Result<Program> {
        sqlx::query(
            "INSERT INTO programs (id, category_id, image, title, description, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(program.id)
        .bind(program.category_id)
        .bind(&program.image)
        .bind(&program.title)
        .bind(&program.description)
        .bind(program.created_at)
        .bind(program.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(program)
    }

    async fn list_schools(&self, limit: i64, offset: i64) -> Result<Vec<School>> {
        let rows = sqlx::query("SELECT * FROM schools ORDER BY name LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        all(rows, school_from)
    }

    async fn count_schools(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM schools")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)
    }

    async fn get_school(&self, id: Uuid) -> Result<Option<School>> {
        let row = sqlx::query("SELECT * FROM schools WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(school_from).transpose()
    }

    async fn insert_school(&self, school: School) -> Result<School> {
        sqlx::query(
            "INSERT INTO schools (id, name, location, image, badge, description, partnership_date, \
             contact_person, contact_email, contact_phone, website, student_population, is_active, \
             created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
        )
        .bind(school.id)
        .bind(&school.name)
        .bind(&school.location)
        .bind(&school.image)
        .bind(&school.badge)
        .bind(&school.description)
        .bind(school.partnership_date)
        .bind(&school.contact_person)
        .bind(&school.contact_email)
        .bind(&school.contact_phone)
        .bind(&school.website)
        .bind(school.student_population)
        .bind(school.is_active)
        .bind(school.created_at)
        .bind(school.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(school)
    }

    async fn list_clubs(&self, limit: i64, offset: i64) -> Result<Vec<Club>> {
        let rows = sqlx::query("SELECT * FROM clubs ORDER BY title LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        all(rows, club_from)
    }

    async fn count_clubs(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM clubs")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)
    }

    async fn list_clubs_for_school(&self, school_id: Uuid) -> Result<Vec<Club>> {
        let rows = sqlx::query("SELECT * FROM clubs WHERE school_id = $1 ORDER BY title")
            .bind(school_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        all(rows, club_from)
    }

    async fn get_club(&self, id: Uuid) -> Result<Option<Club>> {
        let row = sqlx::query("SELECT * FROM clubs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(club_from).transpose()
    }

    async fn insert_club(&self, club: Club) -> Result<Club> {
        sqlx::query(
            "INSERT INTO clubs (id, school_id, icon, image, title, description, location, \
             meeting_schedule, coordinator, member_count, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(club.id)
        .bind(club.school_id)
        .bind(&club.icon)
        .bind(&club.image)
        .bind(&club.title)
        .bind(&club.description)
        .bind(&club.location)
        .bind(&club.meeting_schedule)
        .bind(&club.coordinator)
        .bind(club.member_count)
        .bind(club.is_active)
        .bind(club.created_at)
        .bind(club.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(club)
    }

    async fn list_blog_posts(&self, include_drafts: bool) -> Result<Vec<BlogPost>> {
        let rows = sqlx::query(
            "SELECT * FROM blog_posts WHERE ($1 OR is_published) ORDER BY date DESC, created_at DESC",
        )
        .bind(include_drafts)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        all(rows, blog_post_from)
    }

    async fn get_blog_post(&self, id: Uuid) -> Result<Option<BlogPost>> {
        let row = sqlx::query("SELECT * FROM blog_posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(blog_post_from).transpose()
    }

    async fn insert_blog_post(&self, post: BlogPost) -> Result<BlogPost> {
        sqlx::query(
            "INSERT INTO blog_posts (id, title, image, author, date, content, is_published, \
             created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.image)
        .bind(&post.author)
        .bind(post.date)
        .bind(&post.content)
        .bind(post.is_published)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(post)
    }
}
