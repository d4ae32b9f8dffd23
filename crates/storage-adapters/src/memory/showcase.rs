use async_trait::async_trait;
use domains::ports::ShowcaseRepository;
use domains::*;
use uuid::Uuid;

use super::{cap, snapshot, MemoryStore};

/// Showcase rows are maintained by administrators; these inserts stand in
/// for the admin panel.
impl MemoryStore {
    pub fn add_team_member(&self, member: TeamMember) {
        self.team.insert(member.id, member);
    }

    pub fn add_voice(&self, voice: VoiceOfChange) {
        self.voices.insert(voice.id, voice);
    }

    pub fn add_mentor(&self, mentor: Mentor) {
        self.mentors.insert(mentor.id, mentor);
    }

    pub fn add_photo(&self, photo: Photo) {
        self.photos.insert(photo.id, photo);
    }

    pub fn add_resource(&self, resource: Resource) {
        self.resources.insert(resource.id, resource);
    }

    pub fn add_donation(&self, donation: Donation) {
        self.donations.insert(donation.id, donation);
    }

    pub fn add_impact(&self, impact: Impact) {
        self.impacts.insert(impact.id, impact);
    }

    pub fn add_impact_counter(&self, counter: ImpactCounter) {
        self.impact_counters.insert(counter.id, counter);
    }

    pub fn add_spotlight_category(&self, category: SpotlightCategory) {
        self.spotlight_categories.insert(category.id, category);
    }

    pub fn add_spotlight_item(&self, item: SpotlightItem) {
        self.spotlight_items.insert(item.id, item);
    }

    pub fn add_spotlight_stat(&self, stat: SpotlightStat) {
        self.spotlight_stats.insert(stat.id, stat);
    }
}

#[async_trait]
impl ShowcaseRepository for MemoryStore {
    async fn list_team(&self) -> Result<Vec<TeamMember>> {
        let mut rows = snapshot(&self.team);
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn list_voices(&self) -> Result<Vec<VoiceOfChange>> {
        let mut rows = snapshot(&self.voices);
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn list_mentors(&self, limit: Option<i64>) -> Result<Vec<Mentor>> {
        let mut rows = snapshot(&self.mentors);
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(cap(rows, limit))
    }

    async fn list_photos(&self, limit: Option<i64>) -> Result<Vec<Photo>> {
        let mut rows = snapshot(&self.photos);
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(cap(rows, limit))
    }

    async fn list_resources(&self, limit: Option<i64>) -> Result<Vec<Resource>> {
        let mut rows = snapshot(&self.resources);
        rows.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(cap(rows, limit))
    }

    async fn list_donations(&self) -> Result<Vec<Donation>> {
        let mut rows = snapshot(&self.donations);
        rows.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(rows)
    }

    async fn active_impacts(&self) -> Result<Vec<Impact>> {
        let mut rows: Vec<_> = snapshot(&self.impacts)
            .into_iter()
            .filter(|i| i.is_active)
            .collect();
        rows.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.title.cmp(&b.title)));
        Ok(rows)
    }

    async fn active_impact_counters(&self) -> Result<Vec<ImpactCounter>> {
        let mut rows: Vec<_> = snapshot(&self.impact_counters)
            .into_iter()
            .filter(|c| c.is_active)
            .collect();
        rows.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.title.cmp(&b.title)));
        Ok(rows)
    }

    async fn active_spotlight_categories(&self) -> Result<Vec<SpotlightCategory>> {
        let mut rows: Vec<_> = snapshot(&self.spotlight_categories)
            .into_iter()
            .filter(|c| c.is_active)
            .collect();
        rows.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then_with(|| a.kind.as_str().cmp(b.kind.as_str()))
        });
        Ok(rows)
    }

    async fn active_spotlight_items(&self, category_id: Uuid) -> Result<Vec<SpotlightItem>> {
        let mut rows: Vec<_> = snapshot(&self.spotlight_items)
            .into_iter()
            .filter(|i| i.is_active && i.category_id == category_id)
            .collect();
        rows.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then_with(|| b.achievement_score.cmp(&a.achievement_score))
                .then_with(|| a.title.cmp(&b.title))
        });
        Ok(rows)
    }

    async fn active_spotlight_stats(&self) -> Result<Vec<SpotlightStat>> {
        let mut rows: Vec<_> = snapshot(&self.spotlight_stats)
            .into_iter()
            .filter(|s| s.is_active)
            .collect();
        rows.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.title.cmp(&b.title)));
        Ok(rows)
    }
}
