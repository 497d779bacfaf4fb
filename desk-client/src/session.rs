//! Session store
//!
//! Holds the logged-in owner, the restaurants they own and which of them
//! the desk is currently scoped to. [`MemorySession`] keeps it in process;
//! [`FileSession`] mirrors every change to a JSON file so a restarted
//! runner resumes on the same restaurant.

use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared::{RestaurantId, UserId};
use tracing::{debug, info};

use crate::error::DeskResult;

/// Session data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Option<UserId>,
    pub access_token: Option<String>,
    #[serde(default)]
    pub restaurant_ids: Vec<RestaurantId>,
    pub active_restaurant_id: Option<RestaurantId>,
}

impl Session {
    pub fn new(user_id: impl Into<String>, access_token: Option<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            access_token,
            ..Default::default()
        }
    }

    /// Replace the owned restaurants.
    ///
    /// The active restaurant survives if it is still owned, otherwise the
    /// first owned restaurant becomes active.
    pub fn set_restaurants(&mut self, ids: Vec<RestaurantId>) {
        let keep = self
            .active_restaurant_id
            .as_ref()
            .is_some_and(|active| ids.contains(active));
        if !keep {
            self.active_restaurant_id = ids.first().cloned();
        }
        self.restaurant_ids = ids;
    }

    /// Switch to another owned restaurant. Returns false if it is not owned.
    pub fn select_restaurant(&mut self, restaurant_id: &str) -> bool {
        if self.restaurant_ids.iter().any(|id| id == restaurant_id) {
            self.active_restaurant_id = Some(restaurant_id.to_string());
            true
        } else {
            false
        }
    }

    /// Record a newly registered restaurant; it becomes active if none is
    pub fn add_restaurant(&mut self, restaurant_id: RestaurantId) {
        if !self.restaurant_ids.contains(&restaurant_id) {
            self.restaurant_ids.push(restaurant_id.clone());
        }
        if self.active_restaurant_id.is_none() {
            self.active_restaurant_id = Some(restaurant_id);
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Read/write access to the current session
pub trait SessionProvider: Send + Sync {
    /// Copy of the current session
    fn snapshot(&self) -> Session;

    /// Mutate the session in place
    fn update(&self, f: &mut dyn FnMut(&mut Session)) -> DeskResult<()>;

    fn active_restaurant_id(&self) -> Option<RestaurantId> {
        self.snapshot().active_restaurant_id
    }

    fn user_id(&self) -> Option<UserId> {
        self.snapshot().user_id
    }

    fn access_token(&self) -> Option<String> {
        self.snapshot().access_token
    }

    fn set_restaurants(&self, ids: Vec<RestaurantId>) -> DeskResult<()> {
        self.update(&mut |session| session.set_restaurants(ids.clone()))
    }

    fn select_restaurant(&self, restaurant_id: &str) -> DeskResult<bool> {
        let mut selected = false;
        self.update(&mut |session| selected = session.select_restaurant(restaurant_id))?;
        Ok(selected)
    }

    /// Logout
    fn clear(&self) -> DeskResult<()> {
        self.update(&mut Session::clear)
    }
}

/// In-process session
#[derive(Debug, Default)]
pub struct MemorySession {
    inner: RwLock<Session>,
}

impl MemorySession {
    pub fn new(session: Session) -> Self {
        Self {
            inner: RwLock::new(session),
        }
    }
}

impl SessionProvider for MemorySession {
    fn snapshot(&self) -> Session {
        self.inner.read().clone()
    }

    fn update(&self, f: &mut dyn FnMut(&mut Session)) -> DeskResult<()> {
        f(&mut *self.inner.write());
        Ok(())
    }
}

/// Session persisted as pretty JSON
#[derive(Debug)]
pub struct FileSession {
    path: PathBuf,
    inner: RwLock<Session>,
}

impl FileSession {
    /// Load the session file, starting empty if it does not exist yet
    pub fn load(path: impl AsRef<Path>) -> DeskResult<Self> {
        let path = path.as_ref().to_path_buf();
        let session = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let session: Session = serde_json::from_str(&content)?;
            debug!(path = %path.display(), "Loaded session");
            session
        } else {
            Session::default()
        };

        Ok(Self {
            path,
            inner: RwLock::new(session),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, session: &Session) -> DeskResult<()> {
        if *session == Session::default() {
            if self.path.exists() {
                std::fs::remove_file(&self.path)?;
                info!(path = %self.path.display(), "Session cleared");
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl SessionProvider for FileSession {
    fn snapshot(&self) -> Session {
        self.inner.read().clone()
    }

    /// The change only becomes visible once it is on disk
    fn update(&self, f: &mut dyn FnMut(&mut Session)) -> DeskResult<()> {
        let mut guard = self.inner.write();
        let mut next = guard.clone();
        f(&mut next);
        self.save(&next)?;
        *guard = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_restaurants_selects_first() {
        let mut session = Session::new("u1", None);
        session.set_restaurants(vec!["r1".into(), "r2".into()]);
        assert_eq!(session.active_restaurant_id.as_deref(), Some("r1"));
    }

    #[test]
    fn test_set_restaurants_keeps_owned_active() {
        let mut session = Session::new("u1", None);
        session.set_restaurants(vec!["r1".into(), "r2".into()]);
        assert!(session.select_restaurant("r2"));
        session.set_restaurants(vec!["r3".into(), "r2".into()]);
        assert_eq!(session.active_restaurant_id.as_deref(), Some("r2"));

        session.set_restaurants(vec!["r4".into()]);
        assert_eq!(session.active_restaurant_id.as_deref(), Some("r4"));

        session.set_restaurants(Vec::new());
        assert!(session.active_restaurant_id.is_none());
    }

    #[test]
    fn test_select_unknown_restaurant() {
        let provider = MemorySession::new(Session::new("u1", None));
        provider.set_restaurants(vec!["r1".into()]).unwrap();
        assert!(!provider.select_restaurant("r9").unwrap());
        assert_eq!(provider.active_restaurant_id().as_deref(), Some("r1"));
    }

    #[test]
    fn test_memory_session_clear() {
        let provider = MemorySession::new(Session::new("u1", Some("tok".into())));
        provider.set_restaurants(vec!["r1".into()]).unwrap();
        provider.clear().unwrap();
        assert_eq!(provider.snapshot(), Session::default());
        assert!(provider.user_id().is_none());
    }

    #[test]
    fn test_file_session_persists_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desk/session.json");

        let provider = FileSession::load(&path).unwrap();
        provider
            .update(&mut |s| *s = Session::new("u1", Some("tok".into())))
            .unwrap();
        provider.set_restaurants(vec!["r1".into(), "r2".into()]).unwrap();
        assert!(path.exists());

        let reloaded = FileSession::load(&path).unwrap();
        assert_eq!(reloaded.user_id().as_deref(), Some("u1"));
        assert_eq!(reloaded.active_restaurant_id().as_deref(), Some("r1"));
        assert_eq!(reloaded.snapshot().restaurant_ids.len(), 2);

        reloaded.clear().unwrap();
        assert!(!path.exists());
        assert_eq!(FileSession::load(&path).unwrap().snapshot(), Session::default());
    }

    #[test]
    fn test_file_session_failed_save_keeps_memory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let provider = FileSession::load(blocker.join("session.json")).unwrap();
        let err = provider
            .update(&mut |s| *s = Session::new("u1", None))
            .unwrap_err();
        assert!(matches!(err, crate::DeskError::Session(_)));
        assert_eq!(provider.snapshot(), Session::default());
        assert!(provider.user_id().is_none());
    }

    #[test]
    fn test_add_restaurant() {
        let mut session = Session::new("u1", None);
        session.add_restaurant("r1".into());
        assert_eq!(session.active_restaurant_id.as_deref(), Some("r1"));

        session.add_restaurant("r2".into());
        session.add_restaurant("r2".into());
        assert_eq!(session.restaurant_ids, ["r1", "r2"]);
        assert_eq!(session.active_restaurant_id.as_deref(), Some("r1"));
    }

    #[test]
    fn test_file_session_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(FileSession::load(&path).is_err());
    }
}
