use async_trait::async_trait;
use domains::ports::ShowcaseRepository;
use domains::*;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use uuid::Uuid;

use super::{col, db_err, text_col, PgStore};

impl PgStore {
    async fn fetch<T>(&self, sql: &str, limit: Option<i64>, map: fn(&PgRow) -> Result<T>) -> Result<Vec<T>> {
        let rows = sqlx::query(sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(map).collect()
    }
}

fn team_member_from(row: &PgRow) -> Result<TeamMember> {
    Ok(TeamMember {
        id: col(row, "id")?,
        image: col(row, "image")?,
        name: col(row, "name")?,
        title: col(row, "title")?,
        social_links: col(row, "social_links")?,
        created_at: col(row, "created_at")?,
    })
}

fn voice_from(row: &PgRow) -> Result<VoiceOfChange> {
    Ok(VoiceOfChange {
        id: col(row, "id")?,
        image: col(row, "image")?,
        name: col(row, "name")?,
        title: col(row, "title")?,
        quote: col(row, "quote")?,
        created_at: col(row, "created_at")?,
    })
}

fn mentor_from(row: &PgRow) -> Result<Mentor> {
    Ok(Mentor {
        id: col(row, "id")?,
        image: col(row, "image")?,
        name: col(row, "name")?,
        title: col(row, "title")?,
        description: col(row, "description")?,
        social_links: col(row, "social_links")?,
        created_at: col(row, "created_at")?,
    })
}

fn photo_from(row: &PgRow) -> Result<Photo> {
    Ok(Photo {
        id: col(row, "id")?,
        image: col(row, "image")?,
        title: col(row, "title")?,
        description: col(row, "description")?,
        created_at: col(row, "created_at")?,
    })
}

fn resource_from(row: &PgRow) -> Result<Resource> {
    Ok(Resource {
        id: col(row, "id")?,
        icon: col(row, "icon")?,
        title: col(row, "title")?,
        description: col(row, "description")?,
        file: col(row, "file")?,
        file_size_bytes: col(row, "file_size_bytes")?,
        created_at: col(row, "created_at")?,
    })
}

fn donation_from(row: &PgRow) -> Result<Donation> {
    Ok(Donation {
        id: col(row, "id")?,
        icon: col(row, "icon")?,
        title: col(row, "title")?,
        description: col(row, "description")?,
        goal_cents: col(row, "goal_cents")?,
        raised_cents: col(row, "raised_cents")?,
        created_at: col(row, "created_at")?,
    })
}

fn impact_from(row: &PgRow) -> Result<Impact> {
    let Json(highlights) = col::<Json<Vec<Highlight>>>(row, "highlights")?;
    Ok(Impact {
        id: col(row, "id")?,
        title: col(row, "title")?,
        subtitle: col(row, "subtitle")?,
        description: col(row, "description")?,
        section_image: col(row, "section_image")?,
        highlights,
        order: col(row, "order")?,
        is_active: col(row, "is_active")?,
        created_at: col(row, "created_at")?,
        updated_at: col(row, "updated_at")?,
    })
}

fn counter_from(row: &PgRow) -> Result<ImpactCounter> {
    Ok(ImpactCounter {
        id: col(row, "id")?,
        title: col(row, "title")?,
        counter_type: text_col(row, "counter_type")?,
        target_number: col(row, "target_number")?,
        prefix: col(row, "prefix")?,
        suffix: col(row, "suffix")?,
        icon_class: col(row, "icon_class")?,
        color_theme: text_col(row, "color_theme")?,
        custom_color: col(row, "custom_color")?,
        order: col(row, "order")?,
        is_active: col(row, "is_active")?,
        created_at: col(row, "created_at")?,
    })
}

fn spotlight_category_from(row: &PgRow) -> Result<SpotlightCategory> {
    Ok(SpotlightCategory {
        id: col(row, "id")?,
        kind: text_col(row, "kind")?,
        title: col(row, "title")?,
        subtitle: col(row, "subtitle")?,
        icon_class: col(row, "icon_class")?,
        background_color: col(row, "background_color")?,
        is_active: col(row, "is_active")?,
        order: col(row, "order")?,
        created_at: col(row, "created_at")?,
        updated_at: col(row, "updated_at")?,
    })
}

fn spotlight_item_from(row: &PgRow) -> Result<SpotlightItem> {
    Ok(SpotlightItem {
        id: col(row, "id")?,
        category_id: col(row, "category_id")?,
        title: col(row, "title")?,
        subtitle: col(row, "subtitle")?,
        description: col(row, "description")?,
        image: col(row, "image")?,
        performance_level: text_col(row, "performance_level")?,
        achievement_score: col(row, "achievement_score")?,
        key_achievements: col(row, "key_achievements")?,
        location: col(row, "location")?,
        contact_info: col(row, "contact_info")?,
        is_featured: col(row, "is_featured")?,
        is_active: col(row, "is_active")?,
        order: col(row, "order")?,
        created_at: col(row, "created_at")?,
        updated_at: col(row, "updated_at")?,
    })
}

fn spotlight_stat_from(row: &PgRow) -> Result<SpotlightStat> {
    Ok(SpotlightStat {
        id: col(row, "id")?,
        title: col(row, "title")?,
        value: col(row, "value")?,
        description: col(row, "description")?,
        icon_class: col(row, "icon_class")?,
        color: col(row, "color")?,
        order: col(row, "order")?,
        is_active: col(row, "is_active")?,
        created_at: col(row, "created_at")?,
    })
}

// `LIMIT NULL` is `LIMIT ALL` in PostgreSQL, so every list binds its cap.
#[async_trait]
impl ShowcaseRepository for PgStore {
    async fn list_team(&self) -> Result<Vec<TeamMember>> {
        self.fetch("SELECT * FROM team_members ORDER BY name LIMIT $1", None, team_member_from)
            .await
    }

    async fn list_voices(&self) -> Result<Vec<VoiceOfChange>> {
        self.fetch("SELECT * FROM voices ORDER BY name LIMIT $1", None, voice_from)
            .await
    }

    async fn list_mentors(&self, limit: Option<i64>) -> Result<Vec<Mentor>> {
        self.fetch("SELECT * FROM mentors ORDER BY name LIMIT $1", limit, mentor_from)
            .await
    }

    async fn list_photos(&self, limit: Option<i64>) -> Result<Vec<Photo>> {
        self.fetch("SELECT * FROM photos ORDER BY created_at DESC LIMIT $1", limit, photo_from)
            .await
    }

    async fn list_resources(&self, limit: Option<i64>) -> Result<Vec<Resource>> {
        self.fetch("SELECT * FROM resources ORDER BY title LIMIT $1", limit, resource_from)
            .await
    }

    async fn list_donations(&self) -> Result<Vec<Donation>> {
        self.fetch("SELECT * FROM donations ORDER BY title LIMIT $1", None, donation_from)
            .await
    }

    async fn active_impacts(&self) -> Result<Vec<Impact>> {
        self.fetch(
            r#"SELECT * FROM impacts WHERE is_active ORDER BY "order", title LIMIT $1"#,
            None,
            impact_from,
        )
        .await
    }

    async fn active_impact_counters(&self) -> Result<Vec<ImpactCounter>> {
        self.fetch(
            r#"SELECT * FROM impact_counters WHERE is_active ORDER BY "order", title LIMIT $1"#,
            None,
            counter_from,
        )
        .await
    }

    async fn active_spotlight_categories(&self) -> Result<Vec<SpotlightCategory>> {
        self.fetch(
            r#"SELECT * FROM spotlight_categories WHERE is_active ORDER BY "order", kind LIMIT $1"#,
            None,
            spotlight_category_from,
        )
        .await
    }

    async fn active_spotlight_items(&self, category_id: Uuid) -> Result<Vec<SpotlightItem>> {
        let rows = sqlx::query(
            r#"SELECT * FROM spotlight_items WHERE is_active AND category_id = $1
               ORDER BY "order", achievement_score DESC, title"#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(spotlight_item_from).collect()
    }

    async fn active_spotlight_stats(&self) -> Result<Vec<SpotlightStat>> {
        self.fetch(
            r#"SELECT * FROM spotlight_stats WHERE is_active ORDER BY "order", title LIMIT $1"#,
            None,
            spotlight_stat_from,
        )
        .await
    }
}
