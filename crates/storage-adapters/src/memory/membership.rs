use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use domains::ports::MembershipRepository;
use domains::*;
use uuid::Uuid;

use super::MemoryStore;

impl MemoryStore {
    /// Moves a pending request to `status` and drops it from the pending index.
    fn close(&self, id: Uuid, status: RequestStatus) -> Option<MembershipRequest> {
        let closed = {
            let mut request = self.requests.get_mut(&id)?;
            if !request.is_pending() {
                return None;
            }
            request.status = status;
            request.decided_at = Some(Utc::now());
            request.clone()
        };
        self.pending
            .remove_if(&(closed.project_id, closed.user_id), |_, pending_id| *pending_id == id);
        Some(closed)
    }
}

#[async_trait]
impl MembershipRepository for MemoryStore {
    async fn insert_membership(&self, membership: Membership) -> Result<Membership> {
        match self.memberships.entry((membership.project_id, membership.user_id)) {
            Entry::Occupied(_) => Err(DomainError::Conflict(ConflictKind::AlreadyMember)),
            // Checked while the entry is held, so a project delete either refuses
            // this row here or removes it in its sweep
            Entry::Vacant(_) if !self.projects.contains_key(&membership.project_id) => {
                Err(DomainError::not_found("Project", membership.project_id))
            }
            Entry::Vacant(slot) => {
                slot.insert(membership.clone());
                Ok(membership)
            }
        }
    }

    async fn find_membership(&self, project_id: Uuid, user_id: Uuid) -> Result<Option<Membership>> {
        Ok(self
            .memberships
            .get(&(project_id, user_id))
            .map(|m| m.value().clone()))
    }

    async fn delete_membership(&self, project_id: Uuid, user_id: Uuid) -> Result<bool> {
        Ok(self.memberships.remove(&(project_id, user_id)).is_some())
    }

    async fn list_members(&self, project_id: Uuid) -> Result<Vec<ProjectMember>> {
        let mut rows: Vec<Membership> = self
            .memberships
            .iter()
            .filter(|m| m.project_id == project_id)
            .map(|m| m.value().clone())
            .collect();
        rows.sort_by(|a, b| b.joined_at.cmp(&a.joined_at));

        Ok(rows
            .into_iter()
            .map(|membership| {
                let username = self
                    .users
                    .get(&membership.user_id)
                    .map(|u| u.username.clone())
                    .unwrap_or_default();
                ProjectMember {
                    membership,
                    username,
                }
            })
            .collect())
    }

    async fn count_members(&self, project_id: Uuid) -> Result<i64> {
        Ok(self
            .memberships
            .iter()
            .filter(|m| m.project_id == project_id)
            .count() as i64)
    }

    async fn insert_request(&self, request: MembershipRequest) -> Result<MembershipRequest> {
        match self.pending.entry((request.project_id, request.user_id)) {
            Entry::Occupied(_) => Err(DomainError::Conflict(ConflictKind::AlreadyPending)),
            Entry::Vacant(_) if !self.projects.contains_key(&request.project_id) => {
                Err(DomainError::not_found("Project", request.project_id))
            }
            Entry::Vacant(slot) => {
                self.requests.insert(request.id, request.clone());
                slot.insert(request.id);
                Ok(request)
            }
        }
    }

    async fn get_request(&self, id: Uuid) -> Result<Option<MembershipRequest>> {
        Ok(self.requests.get(&id).map(|r| r.value().clone()))
    }

    async fn find_pending_request(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<MembershipRequest>> {
        let id = match self.pending.get(&(project_id, user_id)) {
            Some(id) => *id.value(),
            None => return Ok(None),
        };
        Ok(self
            .requests
            .get(&id)
            .map(|r| r.value().clone())
            .filter(MembershipRequest::is_pending))
    }

    async fn list_pending_requests(&self, project_id: Uuid) -> Result<Vec<MembershipRequest>> {
        let mut rows: Vec<MembershipRequest> = self
            .requests
            .iter()
            .filter(|r| r.project_id == project_id && r.is_pending())
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
    }

    async fn close_request(
        &self,
        id: Uuid,
        status: RequestStatus,
    ) -> Result<Option<MembershipRequest>> {
        Ok(self.close(id, status))
    }

    async fn approve_request(&self, id: Uuid) -> Result<Option<(MembershipRequest, Membership)>> {
        let Some(request) = self.close(id, RequestStatus::Approved) else {
            return Ok(None);
        };
        let membership = self
            .memberships
            .entry((request.project_id, request.user_id))
            .or_insert_with(|| Membership::new(request.project_id, request.user_id, request.role))
            .value()
            .clone();
        Ok(Some((request, membership)))
    }
}
