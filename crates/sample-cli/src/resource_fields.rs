//! Field sets shown by the list and show commands.

/// Columns of a listing and the subset usable with `--sort-key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceFields {
    /// Record fields, in display order
    pub fields: &'static [&'static str],
    /// Column labels, parallel to `fields`
    pub labels: &'static [&'static str],
    /// Fields the service cannot sort on
    pub unsortable: &'static [&'static str],
}

impl ResourceFields {
    /// Fields accepted by `--sort-key`.
    pub fn sort_fields(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .copied()
            .filter(|f| !self.unsortable.contains(f))
            .collect()
    }

    /// Labels of the fields accepted by `--sort-key`.
    pub fn sort_labels(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .zip(self.labels)
            .filter(|(f, _)| !self.unsortable.contains(f))
            .map(|(_, l)| *l)
            .collect()
    }
}

pub const SAMPLE_RESOURCE: ResourceFields = ResourceFields {
    fields: &["uuid", "description"],
    labels: &["UUID", "Description"],
    unsortable: &[],
};

pub const SAMPLE_DETAILED_RESOURCE: ResourceFields = ResourceFields {
    fields: &["uuid", "description", "created_at", "updated_at", "extra"],
    labels: &["UUID", "Description", "Created At", "Updated At", "Extra"],
    unsortable: &["extra"],
};

// Children are samples nested under a parent, listed with the same columns.
pub const CHILD_RESOURCE: ResourceFields = SAMPLE_RESOURCE;
pub const CHILD_DETAILED_RESOURCE: ResourceFields = SAMPLE_DETAILED_RESOURCE;

/// Fields printed by `sample-show` and `sample-update`.
pub const SAMPLE_SHOW_FIELDS: &[&str] = &["uuid", "description", "created_at", "updated_at", "extra"];

/// Fields printed by `sample-create`.
pub const SAMPLE_CREATE_FIELDS: &[&str] = &["description", "extra", "uuid"];
