use std::fmt;

pub const CONVERT_LEADS: &str = "convert-leads";
pub const ASSIGN_LEADS: &str = "assign-leads";
pub const MANAGE_STAGES_DEALS: &str = "manage-stages-deals";

/// Permission-bearing resource types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Leads,
    Contacts,
    Companies,
    Deals,
    Tasks,
    Activities,
}

impl Resource {
    pub const ALL: [Resource; 6] = [
        Resource::Leads,
        Resource::Contacts,
        Resource::Companies,
        Resource::Deals,
        Resource::Tasks,
        Resource::Activities,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Leads => "leads",
            Resource::Contacts => "contacts",
            Resource::Companies => "companies",
            Resource::Deals => "deals",
            Resource::Tasks => "tasks",
            Resource::Activities => "activities",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ability {
    View,
    ViewAll,
    Create,
    Edit,
    EditAll,
    Delete,
    DeleteAll,
}

impl Ability {
    pub const ALL: [Ability; 7] = [
        Ability::View,
        Ability::ViewAll,
        Ability::Create,
        Ability::Edit,
        Ability::EditAll,
        Ability::Delete,
        Ability::DeleteAll,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Ability::View => "view",
            Ability::ViewAll => "view-all",
            Ability::Create => "create",
            Ability::Edit => "edit",
            Ability::EditAll => "edit-all",
            Ability::Delete => "delete",
            Ability::DeleteAll => "delete-all",
        }
    }

    /// `<ability>-<resource>`
    pub fn permission_for(&self, resource: Resource) -> String {
        format!("{}-{}", self.as_str(), resource.as_str())
    }
}

/// Every permission name the system knows about, in a stable order
pub fn catalogue() -> Vec<String> {
    let mut names: Vec<String> = Resource::ALL
        .iter()
        .flat_map(|resource| Ability::ALL.iter().map(move |ability| ability.permission_for(*resource)))
        .collect();
    names.extend([CONVERT_LEADS, ASSIGN_LEADS, MANAGE_STAGES_DEALS].map(String::from));
    names
}
