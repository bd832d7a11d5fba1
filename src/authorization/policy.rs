use crate::types::db::{activity, company, contact, deal, lead, task};
use crate::types::internal::AuthenticatedUser;

use super::permissions::{Ability, Resource, ASSIGN_LEADS, CONVERT_LEADS, MANAGE_STAGES_DEALS};

/// Exposes the user a record belongs to.
///
/// Lead, Deal and Task are owned through `assigned_to_id`, Contact and Company through
/// `owner_id`, Activity through its author.
pub trait Owned {
    fn owner_id(&self) -> Option<i64>;

    fn is_owned_by(&self, user: &AuthenticatedUser) -> bool {
        self.owner_id() == Some(user.id)
    }
}

impl Owned for lead::Model {
    fn owner_id(&self) -> Option<i64> {
        self.assigned_to_id
    }
}

impl Owned for contact::Model {
    fn owner_id(&self) -> Option<i64> {
        Some(self.owner_id)
    }
}

impl Owned for company::Model {
    fn owner_id(&self) -> Option<i64> {
        Some(self.owner_id)
    }
}

impl Owned for deal::Model {
    fn owner_id(&self) -> Option<i64> {
        Some(self.assigned_to_id)
    }
}

impl Owned for task::Model {
    fn owner_id(&self) -> Option<i64> {
        Some(self.assigned_to_id)
    }
}

impl Owned for activity::Model {
    fn owner_id(&self) -> Option<i64> {
        Some(self.user_id)
    }
}

/// Capability checks for one resource type.
///
/// The default methods implement the shared rule shape: a `*-all` permission grants the
/// action on every record, the plain permission grants it on owned records only.
/// Denials are plain `false`; callers turn them into errors.
pub trait Policy {
    type Entity: Owned;
    const RESOURCE: Resource;

    fn can_view_any(user: &AuthenticatedUser) -> bool {
        user.can(Ability::View, Self::RESOURCE) || user.can(Ability::ViewAll, Self::RESOURCE)
    }

    fn can_view(user: &AuthenticatedUser, entity: &Self::Entity) -> bool {
        scoped(user, Ability::ViewAll, Ability::View, Self::RESOURCE, entity)
    }

    fn can_create(user: &AuthenticatedUser) -> bool {
        user.can(Ability::Create, Self::RESOURCE)
    }

    fn can_update(user: &AuthenticatedUser, entity: &Self::Entity) -> bool {
        scoped(user, Ability::EditAll, Ability::Edit, Self::RESOURCE, entity)
    }

    fn can_delete(user: &AuthenticatedUser, entity: &Self::Entity) -> bool {
        scoped(user, Ability::DeleteAll, Ability::Delete, Self::RESOURCE, entity)
    }

    fn can_restore(user: &AuthenticatedUser, _entity: &Self::Entity) -> bool {
        user.can(Ability::DeleteAll, Self::RESOURCE)
    }

    fn can_force_delete(user: &AuthenticatedUser, _entity: &Self::Entity) -> bool {
        user.can(Ability::DeleteAll, Self::RESOURCE)
    }
}

fn scoped(
    user: &AuthenticatedUser,
    all: Ability,
    own: Ability,
    resource: Resource,
    entity: &impl Owned,
) -> bool {
    user.can(all, resource) || (user.can(own, resource) && entity.is_owned_by(user))
}

pub struct LeadPolicy;

impl Policy for LeadPolicy {
    type Entity = lead::Model;
    const RESOURCE: Resource = Resource::Leads;
}

impl LeadPolicy {
    pub fn can_convert(user: &AuthenticatedUser, lead: &lead::Model) -> bool {
        user.has_permission(CONVERT_LEADS)
            && (user.can(Ability::EditAll, Resource::Leads) || lead.is_owned_by(user))
    }

    pub fn can_assign(user: &AuthenticatedUser) -> bool {
        user.has_permission(ASSIGN_LEADS)
    }
}

pub struct ContactPolicy;

impl Policy for ContactPolicy {
    type Entity = contact::Model;
    const RESOURCE: Resource = Resource::Contacts;
}

pub struct CompanyPolicy;

impl Policy for CompanyPolicy {
    type Entity = company::Model;
    const RESOURCE: Resource = Resource::Companies;
}

pub struct DealPolicy;

impl Policy for DealPolicy {
    type Entity = deal::Model;
    const RESOURCE: Resource = Resource::Deals;
}

impl DealPolicy {
    pub fn can_manage_stages(user: &AuthenticatedUser) -> bool {
        user.has_permission(MANAGE_STAGES_DEALS)
    }
}

pub struct TaskPolicy;

impl Policy for TaskPolicy {
    type Entity = task::Model;
    const RESOURCE: Resource = Resource::Tasks;
}

/// Activities belong to their author; `view-all-activities` doubles as moderation
pub struct ActivityPolicy;

impl Policy for ActivityPolicy {
    type Entity = activity::Model;
    const RESOURCE: Resource = Resource::Activities;

    fn can_update(user: &AuthenticatedUser, entity: &Self::Entity) -> bool {
        entity.is_owned_by(user) || user.can(Ability::ViewAll, Resource::Activities)
    }

    fn can_delete(user: &AuthenticatedUser, entity: &Self::Entity) -> bool {
        entity.is_owned_by(user) || user.can(Ability::Delete, Resource::Activities)
    }

    fn can_restore(user: &AuthenticatedUser, _entity: &Self::Entity) -> bool {
        user.can(Ability::Delete, Resource::Activities)
    }

    fn can_force_delete(user: &AuthenticatedUser, _entity: &Self::Entity) -> bool {
        user.can(Ability::Delete, Resource::Activities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::db::activity::ActivityType;
    use crate::types::db::lead::{LeadSource, LeadStatus};
    use crate::types::internal::EntityKind;
    use chrono::Utc;

    fn user(id: i64, permissions: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            id,
            name: format!("user {}", id),
            email: format!("user{}@example.com", id),
            permissions: permissions.iter().copied().collect(),
        }
    }

    fn lead_assigned_to(assigned_to_id: Option<i64>) -> lead::Model {
        let now = Utc::now();
        lead::Model {
            id: 1,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone_number: None,
            source: LeadSource::Website,
            status: LeadStatus::New,
            assigned_to_id,
            converted_to_contact_id: None,
            converted_at: None,
            notes: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn activity_by(user_id: i64) -> activity::Model {
        let now = Utc::now();
        activity::Model {
            id: 1,
            description: "Called".to_string(),
            kind: ActivityType::Call,
            user_id,
            subject_type: EntityKind::Deal,
            subject_id: 4,
            activity_date: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_view_requires_view_all_or_ownership() {
        let own = lead_assigned_to(Some(1));
        let other = lead_assigned_to(Some(2));

        let scoped_user = user(1, &["view-leads"]);
        assert!(LeadPolicy::can_view(&scoped_user, &own));
        assert!(!LeadPolicy::can_view(&scoped_user, &other));

        let global_user = user(1, &["view-all-leads"]);
        assert!(LeadPolicy::can_view(&global_user, &other));

        let no_permission = user(1, &[]);
        assert!(!LeadPolicy::can_view(&no_permission, &own));
    }

    #[test]
    fn test_unassigned_lead_is_not_owned_by_anyone() {
        let unassigned = lead_assigned_to(None);
        let scoped_user = user(1, &["view-leads", "edit-leads"]);

        assert!(!LeadPolicy::can_view(&scoped_user, &unassigned));
        assert!(!LeadPolicy::can_update(&scoped_user, &unassigned));
    }

    #[test]
    fn test_view_any_accepts_either_view_permission() {
        assert!(LeadPolicy::can_view_any(&user(1, &["view-leads"])));
        assert!(LeadPolicy::can_view_any(&user(1, &["view-all-leads"])));
        assert!(!LeadPolicy::can_view_any(&user(1, &["view-deals"])));
    }

    #[test]
    fn test_update_and_delete_follow_scoped_shape() {
        let other = lead_assigned_to(Some(2));
        let own = lead_assigned_to(Some(1));

        let editor = user(1, &["edit-leads", "delete-leads"]);
        assert!(LeadPolicy::can_update(&editor, &own));
        assert!(!LeadPolicy::can_update(&editor, &other));
        assert!(LeadPolicy::can_delete(&editor, &own));
        assert!(!LeadPolicy::can_delete(&editor, &other));

        let manager = user(1, &["edit-all-leads", "delete-all-leads"]);
        assert!(LeadPolicy::can_update(&manager, &other));
        assert!(LeadPolicy::can_delete(&manager, &other));
    }

    #[test]
    fn test_restore_requires_delete_all() {
        let own = lead_assigned_to(Some(1));

        assert!(!LeadPolicy::can_restore(&user(1, &["delete-leads"]), &own));
        assert!(LeadPolicy::can_restore(&user(1, &["delete-all-leads"]), &own));
        assert!(LeadPolicy::can_force_delete(&user(1, &["delete-all-leads"]), &own));
    }

    #[test]
    fn test_convert_requires_permission_and_ownership_or_edit_all() {
        let own = lead_assigned_to(Some(1));
        let other = lead_assigned_to(Some(2));

        assert!(LeadPolicy::can_convert(&user(1, &["convert-leads"]), &own));
        assert!(!LeadPolicy::can_convert(&user(1, &["convert-leads"]), &other));
        assert!(LeadPolicy::can_convert(&user(1, &["convert-leads", "edit-all-leads"]), &other));
        assert!(!LeadPolicy::can_convert(&user(1, &["edit-all-leads"]), &own));
    }

    #[test]
    fn test_assign_and_manage_stages() {
        assert!(LeadPolicy::can_assign(&user(1, &["assign-leads"])));
        assert!(!LeadPolicy::can_assign(&user(1, &["edit-all-leads"])));
        assert!(DealPolicy::can_manage_stages(&user(1, &["manage-stages-deals"])));
        assert!(!DealPolicy::can_manage_stages(&user(1, &["edit-all-deals"])));
    }

    #[test]
    fn test_author_can_delete_activity_without_permissions() {
        let mine = activity_by(1);
        let theirs = activity_by(2);
        let author = user(1, &[]);

        assert!(ActivityPolicy::can_delete(&author, &mine));
        assert!(!ActivityPolicy::can_delete(&author, &theirs));
        assert!(ActivityPolicy::can_delete(&user(1, &["delete-activities"]), &theirs));
    }

    #[test]
    fn test_activity_update_is_author_or_moderator() {
        let theirs = activity_by(2);

        assert!(ActivityPolicy::can_update(&user(2, &[]), &theirs));
        assert!(!ActivityPolicy::can_update(&user(1, &["edit-all-activities"]), &theirs));
        assert!(ActivityPolicy::can_update(&user(1, &["view-all-activities"]), &theirs));
    }

    #[test]
    fn test_activity_restore_uses_delete_permission() {
        let theirs = activity_by(2);

        assert!(ActivityPolicy::can_restore(&user(1, &["delete-activities"]), &theirs));
        assert!(!ActivityPolicy::can_force_delete(&user(2, &[]), &theirs));
    }
}
