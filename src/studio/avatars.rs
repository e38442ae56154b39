//! AvatarRoster: profile batches, best-effort portrait renders and custom
//! avatars.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::error::{StudioError, StudioResult};
use crate::gateway::GatewayError;
use crate::studio::model::Avatar;
use crate::task::{MergeOutcome, TaskState};

#[derive(Debug, Clone, Default)]
pub struct AvatarRoster {
    /// Newest first.
    avatars: Vec<Avatar>,
    in_flight: HashSet<String>,
    profiles: TaskState<usize>,
    custom: TaskState<String>,
}

impl AvatarRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn avatars(&self) -> &[Avatar] {
        &self.avatars
    }

    pub fn avatar(&self, id: &str) -> Option<&Avatar> {
        self.avatars.iter().find(|a| a.id == id)
    }

    pub fn profiles_task(&self) -> &TaskState<usize> {
        &self.profiles
    }

    pub fn custom_task(&self) -> &TaskState<String> {
        &self.custom
    }

    pub fn is_rendering(&self, id: &str) -> bool {
        self.in_flight.contains(id)
    }

    /// Ids with a portrait render in flight, sorted.
    pub fn rendering(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.in_flight.iter().cloned().collect();
        ids.sort();
        ids
    }

    // =========================================================================
    // PROFILE BATCHES
    // =========================================================================

    pub fn begin_profiles(&mut self) {
        self.profiles = TaskState::Pending;
    }

    /// Prepends a new batch, keeping batch order. Returns the new ids.
    pub fn complete_profiles(&mut self, result: Result<Vec<Avatar>, GatewayError>) -> Vec<String> {
        match result {
            Ok(batch) => {
                let ids: Vec<String> = batch.iter().map(|a| a.id.clone()).collect();
                info!(count = ids.len(), "Avatar profiles added");
                self.profiles = TaskState::Succeeded(ids.len());
                self.avatars.splice(0..0, batch);
                ids
            }
            Err(err) => {
                warn!(error = %err, "Avatar profile batch failed");
                self.profiles = TaskState::Failed(err.to_string());
                Vec::new()
            }
        }
    }

    // =========================================================================
    // PORTRAITS
    // =========================================================================

    /// Marks a portrait render in flight and returns the prompt description.
    ///
    /// Returns `None` when the avatar already has an image or a render is
    /// already running for it.
    pub fn begin_image(&mut self, id: &str) -> StudioResult<Option<String>> {
        let avatar = self
            .avatars
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| StudioError::avatar_not_found(id))?;
        if avatar.img.is_some() || self.in_flight.contains(id) {
            debug!(avatar = id, "Skipping duplicate portrait request");
            return Ok(None);
        }
        let desc = avatar.desc.clone();
        self.in_flight.insert(id.to_string());
        Ok(Some(desc))
    }

    /// Patches the portrait by id. Failures only clear the in-flight marker.
    pub fn complete_image(&mut self, id: &str, result: Result<String, GatewayError>) -> MergeOutcome {
        if !self.in_flight.remove(id) {
            return MergeOutcome::Stale;
        }
        match result {
            Ok(url) => match self.avatars.iter_mut().find(|a| a.id == id) {
                Some(avatar) => {
                    avatar.img = Some(url);
                    MergeOutcome::Applied
                }
                None => MergeOutcome::Stale,
            },
            Err(err) => {
                debug!(avatar = id, error = %err, "Portrait render dropped");
                MergeOutcome::Applied
            }
        }
    }

    // =========================================================================
    // CUSTOM AVATARS
    // =========================================================================

    pub fn begin_custom(&mut self) {
        self.custom = TaskState::Pending;
    }

    /// Prepends the analysed custom avatar. Returns its id.
    pub fn complete_custom(&mut self, result: Result<Avatar, GatewayError>) -> Option<String> {
        match result {
            Ok(mut avatar) => {
                avatar.is_custom = true;
                avatar.img = None;
                let id = avatar.id.clone();
                info!(avatar = %id, "Custom avatar added");
                self.avatars.insert(0, avatar);
                self.custom = TaskState::Succeeded(id.clone());
                Some(id)
            }
            Err(err) => {
                warn!(error = %err, "Custom avatar analysis failed");
                self.custom = TaskState::Failed(err.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(prefix: &str, n: usize) -> Vec<Avatar> {
        (1..=n)
            .map(|i| Avatar::new(format!("{prefix}{i}"), format!("P{i}")).with_desc(format!("look {i}")))
            .collect()
    }

    #[test]
    fn test_batches_prepend_newest_first() {
        let mut roster = AvatarRoster::new();
        roster.begin_profiles();
        roster.complete_profiles(Ok(batch("a", 2)));
        let ids = roster.complete_profiles(Ok(batch("b", 2)));

        assert_eq!(ids, vec!["b1", "b2"]);
        let order: Vec<&str> = roster.avatars().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(order, vec!["b1", "b2", "a1", "a2"]);
        assert_eq!(roster.profiles_task(), &TaskState::Succeeded(2));
    }

    #[test]
    fn test_profile_failure_keeps_roster() {
        let mut roster = AvatarRoster::new();
        roster.complete_profiles(Ok(batch("a", 1)));
        let ids = roster.complete_profiles(Err(GatewayError::EmptyResponse));

        assert!(ids.is_empty());
        assert_eq!(roster.avatars().len(), 1);
        assert!(roster.profiles_task().is_failed());
    }

    #[test]
    fn test_duplicate_image_requests_are_skipped() {
        let mut roster = AvatarRoster::new();
        roster.complete_profiles(Ok(batch("a", 1)));

        assert_eq!(roster.begin_image("a1").unwrap().as_deref(), Some("look 1"));
        assert!(roster.is_rendering("a1"));
        assert_eq!(roster.begin_image("a1").unwrap(), None);

        roster.complete_image("a1", Ok("https://img.test/a1.png".to_string()));
        assert!(!roster.is_rendering("a1"));
        assert_eq!(roster.begin_image("a1").unwrap(), None);
        assert!(roster.begin_image("ghost").is_err());
    }

    #[test]
    fn test_image_merges_by_id_in_any_order() {
        let mut roster = AvatarRoster::new();
        roster.complete_profiles(Ok(batch("a", 3)));
        for id in ["a1", "a2", "a3"] {
            roster.begin_image(id).unwrap();
        }
        roster.complete_image("a3", Ok("u3".to_string()));
        roster.complete_image("a1", Ok("u1".to_string()));
        roster.complete_image("a2", Ok("u2".to_string()));

        for (id, url) in [("a1", "u1"), ("a2", "u2"), ("a3", "u3")] {
            let avatar = roster.avatar(id).unwrap();
            assert_eq!(avatar.img.as_deref(), Some(url));
            assert_eq!(avatar.desc, format!("look {}", &id[1..]));
        }
    }

    #[test]
    fn test_image_failure_is_silent() {
        let mut roster = AvatarRoster::new();
        roster.complete_profiles(Ok(batch("a", 1)));
        roster.begin_image("a1").unwrap();
        roster.complete_image("a1", Err(GatewayError::EmptyResponse));

        assert!(roster.avatar("a1").unwrap().img.is_none());
        assert!(!roster.is_rendering("a1"));
        assert!(roster.profiles_task().error().is_none());
        assert!(roster.begin_image("a1").unwrap().is_some());
    }

    #[test]
    fn test_custom_avatar_is_prepended() {
        let mut roster = AvatarRoster::new();
        roster.complete_profiles(Ok(batch("a", 1)));
        roster.begin_custom();
        let id = roster.complete_custom(Ok(Avatar::new("c1", "Me").with_img("ignored")));

        assert_eq!(id.as_deref(), Some("c1"));
        let first = &roster.avatars()[0];
        assert!(first.is_custom);
        assert!(first.img.is_none());
        assert_eq!(roster.custom_task(), &TaskState::Succeeded("c1".to_string()));
    }
}
