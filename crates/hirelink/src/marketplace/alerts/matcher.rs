use std::collections::BTreeSet;
use std::sync::Arc;

use crate::marketplace::directory::{
    DirectoryError, JobSnapshot, PreferenceProfile, SeekerDirectory, UserId,
};

/// Evaluates a newly published job against stored seeker preferences.
/// Read-only; produces the recipient set handed to the dispatcher.
pub struct PreferenceMatcher<D> {
    seekers: Arc<D>,
}

impl<D> PreferenceMatcher<D>
where
    D: SeekerDirectory,
{
    pub fn new(seekers: Arc<D>) -> Self {
        Self { seekers }
    }

    /// A seeker matches when the job's category is among their preferred
    /// categories OR its location is among their preferred locations.
    /// Each matched seeker appears exactly once; a job matching nobody
    /// yields an empty set.
    pub fn match_seekers(&self, job: &JobSnapshot) -> Result<Vec<UserId>, DirectoryError> {
        let mut matched = Vec::new();
        let mut seen = BTreeSet::new();

        for seeker in self.seekers.job_seekers()? {
            if !profile_matches(job, &seeker.preferences) {
                continue;
            }
            if seen.insert(seeker.user_id.clone()) {
                matched.push(seeker.user_id);
            }
        }

        Ok(matched)
    }
}

fn profile_matches(job: &JobSnapshot, preferences: &PreferenceProfile) -> bool {
    let category_hit = job
        .category
        .as_deref()
        .map_or(false, |category| {
            contains_ignore_case(&preferences.preferred_categories, category)
        });
    let location_hit = job
        .location
        .as_deref()
        .map_or(false, |location| {
            contains_ignore_case(&preferences.preferred_locations, location)
        });

    category_hit || location_hit
}

fn contains_ignore_case(set: &BTreeSet<String>, value: &str) -> bool {
    set.iter().any(|entry| entry.eq_ignore_ascii_case(value))
}
