//! # In-Memory Store
//!
//! `DashMap`-backed implementation of every repository port, used by tests
//! and by deployments running with `database.backend = "memory"`.
//!
//! Uniqueness rules are enforced with the entry API (each shard is locked
//! while the slot is checked and filled), so concurrent callers get the same
//! `Conflict` outcomes the PostgreSQL constraints produce. Secondary indexes
//! are always locked after their primary map has been released, never the
//! other way round.

mod accounts;
mod catalog;
mod intake;
mod membership;
mod publication;
mod showcase;

use dashmap::DashMap;
use domains::*;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<Uuid, User>,
    usernames: DashMap<String, Uuid>,

    categories: DashMap<Uuid, Category>,
    category_names: DashMap<String, Uuid>,
    projects: DashMap<Uuid, Project>,
    project_details: DashMap<Uuid, ProjectDetails>,
    project_photos: DashMap<Uuid, ProjectPhoto>,
    project_achievements: DashMap<Uuid, ProjectAchievement>,
    programs: DashMap<Uuid, Program>,
    schools: DashMap<Uuid, School>,
    clubs: DashMap<Uuid, Club>,
    blog_posts: DashMap<Uuid, BlogPost>,

    team: DashMap<Uuid, TeamMember>,
    voices: DashMap<Uuid, VoiceOfChange>,
    mentors: DashMap<Uuid, Mentor>,
    photos: DashMap<Uuid, Photo>,
    resources: DashMap<Uuid, Resource>,
    donations: DashMap<Uuid, Donation>,
    impacts: DashMap<Uuid, Impact>,
    impact_counters: DashMap<Uuid, ImpactCounter>,
    spotlight_categories: DashMap<Uuid, SpotlightCategory>,
    spotlight_items: DashMap<Uuid, SpotlightItem>,
    spotlight_stats: DashMap<Uuid, SpotlightStat>,

    memberships: DashMap<(Uuid, Uuid), Membership>,
    requests: DashMap<Uuid, MembershipRequest>,
    /// (project, user) → id of the pending request
    pending: DashMap<(Uuid, Uuid), Uuid>,

    articles: DashMap<Uuid, Article>,

    contact_messages: DashMap<Uuid, ContactMessage>,
    subscriptions: DashMap<Uuid, NewsletterSubscription>,
    subscription_emails: DashMap<String, Uuid>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Clones every value out of a map. Callers sort the snapshot afterwards.
fn snapshot<K, V>(map: &DashMap<K, V>) -> Vec<V>
where
    K: Eq + std::hash::Hash,
    V: Clone,
{
    map.iter().map(|entry| entry.value().clone()).collect()
}

/// LIMIT/OFFSET over an already ordered snapshot.
fn window<T>(rows: Vec<T>, limit: i64, offset: i64) -> Vec<T> {
    let offset = usize::try_from(offset).unwrap_or(0);
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    rows.into_iter().skip(offset).take(limit).collect()
}

fn cap<T>(rows: Vec<T>, limit: Option<i64>) -> Vec<T> {
    match limit {
        Some(limit) => window(rows, limit, 0),
        None => rows,
    }
}
