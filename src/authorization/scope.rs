use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, Select};
use sea_orm::sea_query::{Expr, Func, LikeExpr};

use crate::types::db::{activity, company, contact, deal, lead, task};
use crate::types::internal::AuthenticatedUser;

use super::permissions::{Ability, Resource};

/// Entity whose listings are narrowed to the caller's own rows
pub trait ScopedEntity: EntityTrait {
    const RESOURCE: Resource;

    /// Column holding the owning user's id
    fn owner_column() -> Self::Column;
}

impl ScopedEntity for lead::Entity {
    const RESOURCE: Resource = Resource::Leads;

    fn owner_column() -> Self::Column {
        lead::Column::AssignedToId
    }
}

impl ScopedEntity for contact::Entity {
    const RESOURCE: Resource = Resource::Contacts;

    fn owner_column() -> Self::Column {
        contact::Column::OwnerId
    }
}

impl ScopedEntity for company::Entity {
    const RESOURCE: Resource = Resource::Companies;

    fn owner_column() -> Self::Column {
        company::Column::OwnerId
    }
}

impl ScopedEntity for deal::Entity {
    const RESOURCE: Resource = Resource::Deals;

    fn owner_column() -> Self::Column {
        deal::Column::AssignedToId
    }
}

impl ScopedEntity for task::Entity {
    const RESOURCE: Resource = Resource::Tasks;

    fn owner_column() -> Self::Column {
        task::Column::AssignedToId
    }
}

impl ScopedEntity for activity::Entity {
    const RESOURCE: Resource = Resource::Activities;

    fn owner_column() -> Self::Column {
        activity::Column::UserId
    }
}

/// Restricts `query` to rows owned by `user` unless they hold `view-all-<type>`.
///
/// Must be applied before pagination and before any free-text condition.
pub fn scope_filter<E: ScopedEntity>(user: &AuthenticatedUser, query: Select<E>) -> Select<E> {
    if user.can(Ability::ViewAll, E::RESOURCE) {
        query
    } else {
        query.filter(E::owner_column().eq(user.id))
    }
}

/// Case-insensitive substring match OR-ed across `columns`.
///
/// Returns None for a blank term so callers can skip the filter entirely.
pub fn text_search<C: ColumnTrait>(columns: &[C], term: &str) -> Option<Condition> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }

    let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
    let condition = columns.iter().fold(Condition::any(), |condition, column| {
        condition.add(
            Expr::expr(Func::lower(Expr::col(*column)))
                .like(LikeExpr::new(pattern.clone()).escape('\\')),
        )
    });

    Some(condition)
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
