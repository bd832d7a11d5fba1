use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::ActiveEnum;

use crate::app_data::AppData;
use crate::authorization::{Ability, Resource};
use crate::errors::CrmError;
use crate::stores::{CompanyStore, ContactStore, DealStore, LeadStore, TaskStore};
use crate::types::dto::search::{SearchHit, MIN_QUERY_CHARS, RESULTS_PER_TYPE};
use crate::types::internal::context::RequestContext;
use crate::types::internal::EntityKind;

/// Cross-entity search for the global search box
pub struct SearchCoordinator {
    app_data: Arc<AppData>,
    lead_store: Arc<LeadStore>,
    contact_store: Arc<ContactStore>,
    company_store: Arc<CompanyStore>,
    deal_store: Arc<DealStore>,
    task_store: Arc<TaskStore>,
}

impl SearchCoordinator {
    /// Create SearchCoordinator from AppData
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            lead_store: app_data.lead_store.clone(),
            contact_store: app_data.contact_store.clone(),
            company_store: app_data.company_store.clone(),
            deal_store: app_data.deal_store.clone(),
            task_store: app_data.task_store.clone(),
            app_data,
        }
    }

    /// Up to five scoped hits per type, in the order leads, contacts, companies, deals, tasks.
    ///
    /// Types the caller holds no `view-<type>` for are skipped. Queries shorter than two
    /// characters, surrounding whitespace included, or blank queries return nothing.
    pub async fn search(&self, ctx: &RequestContext, query: &str) -> Result<Vec<SearchHit>, CrmError> {
        let term = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS || term.is_empty() {
            return Ok(Vec::new());
        }

        let db = &self.app_data.connections.crm;
        let user = ctx.user();
        let allowed = |resource| user.can(Ability::View, resource);
        let mut hits = Vec::new();

        if allowed(Resource::Leads) {
            for lead in self.lead_store.search(db, user, term, RESULTS_PER_TYPE).await? {
                hits.push(SearchHit {
                    id: lead.id,
                    kind: EntityKind::Lead,
                    label: lead.full_name(),
                    subtitle: lead.email,
                });
            }
        }

        if allowed(Resource::Contacts) {
            for (contact, company) in self.contact_store.search(db, user, term, RESULTS_PER_TYPE).await? {
                let subtitle = match company {
                    Some(company) => format!("{} • {}", contact.email, company.name),
                    None => contact.email.clone(),
                };
                hits.push(SearchHit {
                    id: contact.id,
                    kind: EntityKind::Contact,
                    label: contact.full_name(),
                    subtitle,
                });
            }
        }

        if allowed(Resource::Companies) {
            for company in self.company_store.search(db, user, term, RESULTS_PER_TYPE).await? {
                let subtitle = company.industry.or(company.website).unwrap_or_default();
                hits.push(SearchHit {
                    id: company.id,
                    kind: EntityKind::Company,
                    label: company.name,
                    subtitle,
                });
            }
        }

        if allowed(Resource::Deals) {
            for (deal, contact) in self.deal_store.search(db, user, term, RESULTS_PER_TYPE).await? {
                let mut subtitle = format_money(deal.amount_cents);
                if let Some(contact) = contact {
                    subtitle = format!("{} • {}", subtitle, contact.full_name());
                }
                hits.push(SearchHit {
                    id: deal.id,
                    kind: EntityKind::Deal,
                    label: deal.name,
                    subtitle,
                });
            }
        }

        if allowed(Resource::Tasks) {
            for task in self.task_store.search(db, user, term, RESULTS_PER_TYPE).await? {
                let mut subtitle = task.status.to_value();
                if let Some(due) = task.due_date {
                    subtitle = format!("{} • Due {}", subtitle, due.format("%b %d, %Y"));
                }
                hits.push(SearchHit {
                    id: task.id,
                    kind: EntityKind::Task,
                    label: task.title,
                    subtitle,
                });
            }
        }

        tracing::debug!(user_id = user.id, hits = hits.len(), "Global search");
        Ok(hits)
    }
}

/// Formats cents as dollars with thousands separators, e.g. `$1,234.50`
fn format_money(cents: i64) -> String {
    let amount = Decimal::new(cents, 2).to_string();
    let (sign, amount) = match amount.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", amount.as_str()),
    };
    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, "00"));

    format!("{}${}.{}", sign, group_thousands(whole), fraction)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
