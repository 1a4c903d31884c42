//! User Filter Value Object
//!
//! Optional substring filters for the user listing. Values are trimmed and a
//! value that is empty after trimming counts as unset.

/// Column a filter applies to, in the order clauses are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Name,
    City,
    Province,
    JobRole,
    Status,
}

impl FilterField {
    /// Qualified column in the listing join
    pub const fn column(&self) -> &'static str {
        match self {
            FilterField::Name => "p.name",
            FilterField::City => "p.city",
            FilterField::Province => "p.province",
            FilterField::JobRole => "s.job_role",
            FilterField::Status => "s.status",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    name: Option<String>,
    city: Option<String>,
    province: Option<String>,
    job_role: Option<String>,
    status: Option<String>,
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl UserFilter {
    pub fn new(
        name: Option<String>,
        city: Option<String>,
        province: Option<String>,
        job_role: Option<String>,
        status: Option<String>,
    ) -> Self {
        Self {
            name: normalize(name),
            city: normalize(city),
            province: normalize(province),
            job_role: normalize(job_role),
            status: normalize(status),
        }
    }

    pub fn with(mut self, field: FilterField, value: impl Into<String>) -> Self {
        let value = normalize(Some(value.into()));
        match field {
            FilterField::Name => self.name = value,
            FilterField::City => self.city = value,
            FilterField::Province => self.province = value,
            FilterField::JobRole => self.job_role = value,
            FilterField::Status => self.status = value,
        }
        self
    }

    pub fn get(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Name => self.name.as_deref(),
            FilterField::City => self.city.as_deref(),
            FilterField::Province => self.province.as_deref(),
            FilterField::JobRole => self.job_role.as_deref(),
            FilterField::Status => self.status.as_deref(),
        }
    }

    /// Set fields in clause order: name, city, province, job role, status
    pub fn active(&self) -> impl Iterator<Item = (FilterField, &str)> {
        [
            FilterField::Name,
            FilterField::City,
            FilterField::Province,
            FilterField::JobRole,
            FilterField::Status,
        ]
        .into_iter()
        .filter_map(|field| self.get(field).map(|value| (field, value)))
    }

    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }
}
