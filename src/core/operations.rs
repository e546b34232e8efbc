//! Board controller
//!
//! `BusBoard` owns all application state and is the only place where it
//! changes. Every mutating entry point checks the access policy against the
//! signed-in role before touching the registry, then writes the result
//! through to storage.

use crate::core::data::{BusInput, BusRecord, BusRegistry, BusStatus, Role, UserProfile};
use crate::core::policy::{AccessPolicy, Action};
use crate::core::query::{DateFilter, SearchEngine};
use crate::core::session::{ProfileUpdate, RegistrationForm, SessionStore};
use crate::core::traits::KvStore;
use crate::storage::BUSES_KEY;
use crate::utils::error::{AppError, AppResult};
use tracing::{debug, info};

/// Startup options for a board
#[derive(Debug, Clone, Copy)]
pub struct BoardOptions {
    /// Start with the demo buses when nothing has been stored yet
    pub seed_sample_buses: bool,
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self {
            seed_sample_buses: true,
        }
    }
}

pub struct BusBoard<S: KvStore> {
    store: S,
    registry: BusRegistry,
    sessions: SessionStore,
}

impl<S: KvStore> BusBoard<S> {
    /// Load registry and session state from `store`
    pub fn open(store: S, options: BoardOptions) -> AppResult<Self> {
        let sessions = SessionStore::load(&store)?;
        let registry = match store.get(BUSES_KEY)? {
            Some(raw) => {
                let mut registry: BusRegistry = serde_json::from_str(&raw)?;
                registry.normalize();
                registry
            }
            None if options.seed_sample_buses => {
                debug!("No stored buses, seeding demo registry");
                BusRegistry::with_samples()
            }
            None => BusRegistry::new(),
        };
        debug!(buses = registry.len(), "Opened board");

        Ok(Self {
            store,
            registry,
            sessions,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn registry(&self) -> &BusRegistry {
        &self.registry
    }

    pub fn users(&self) -> &[UserProfile] {
        self.sessions.users()
    }

    pub fn current_user(&self) -> Option<&UserProfile> {
        self.sessions.current()
    }

    pub fn role(&self) -> Option<Role> {
        self.current_user().map(|u| u.role)
    }

    /// Whether the signed-in user may perform `action`
    pub fn can(&self, action: Action) -> bool {
        self.role()
            .is_some_and(|role| AccessPolicy::permits(role, action))
    }

    /// Fail early, before collecting input for an action the user may not take
    pub fn check(&self, action: Action) -> AppResult<()> {
        self.authorize(action).map(|_| ())
    }

    // ========== Session ==========

    pub fn register(&mut self, form: RegistrationForm) -> AppResult<UserProfile> {
        self.sessions.register(&self.store, form)
    }

    pub fn login(&mut self, phone: &str, password: &str) -> AppResult<&UserProfile> {
        self.sessions.login(&self.store, phone, password)
    }

    pub fn logout(&mut self) {
        self.sessions.logout(&self.store);
    }

    pub fn update_profile(&mut self, update: ProfileUpdate) -> AppResult<&UserProfile> {
        self.sessions.update_profile(&self.store, update)
    }

    // ========== Bus mutations ==========

    pub fn create_bus(&mut self, input: &BusInput) -> AppResult<BusRecord> {
        let actor = self.authorize(Action::CreateBus)?;
        let bus = self.commit(|registry| registry.create_bus(input, &actor))?;
        info!(id = %bus.id, number = %bus.number, by = %actor.role, "Added bus");
        Ok(bus)
    }

    pub fn edit_bus(&mut self, id: &str, input: &BusInput) -> AppResult<BusRecord> {
        let actor = self.authorize(Action::EditBus)?;
        let bus = self.commit(|registry| registry.edit_bus(id, input, &actor))?;
        info!(id = %bus.id, by = %actor.role, "Edited bus");
        Ok(bus)
    }

    pub fn update_status(
        &mut self,
        id: &str,
        status: BusStatus,
        delay_minutes: Option<u32>,
    ) -> AppResult<BusRecord> {
        let actor = self.authorize(Action::UpdateStatus)?;
        let bus =
            self.commit(|registry| registry.update_status(id, status, delay_minutes, &actor))?;
        info!(
            id = %bus.id,
            status = %bus.status(),
            delay = ?bus.delay_minutes(),
            by = %actor.role,
            "Updated bus status"
        );
        Ok(bus)
    }

    pub fn delete_bus(&mut self, id: &str) -> AppResult<BusRecord> {
        let actor = self.authorize(Action::DeleteBus)?;
        let bus = self.commit(|registry| registry.delete_bus(id))?;
        info!(id = %bus.id, by = %actor.role, "Deleted bus");
        Ok(bus)
    }

    // ========== Queries ==========

    pub fn visible_buses(&self, query: &str, filter: DateFilter) -> Vec<&BusRecord> {
        SearchEngine::visible_buses(&self.registry, query, filter)
    }

    pub fn resolve(&self, identifier: &str) -> AppResult<&BusRecord> {
        self.registry
            .resolve(identifier)
            .ok_or_else(|| AppError::NotFound(format!("Bus '{}'", identifier)))
    }

    fn authorize(&self, action: Action) -> AppResult<UserProfile> {
        let actor = self
            .current_user()
            .ok_or_else(|| AppError::Unauthorized(format!("sign in to {}", action)))?;
        AccessPolicy::authorize(actor.role, action)?;
        Ok(actor.clone())
    }

    /// Apply `mutate` to a copy of the registry and keep it only once stored
    fn commit<T>(
        &mut self,
        mutate: impl FnOnce(&mut BusRegistry) -> AppResult<T>,
    ) -> AppResult<T> {
        let mut next = self.registry.clone();
        let outcome = mutate(&mut next)?;
        let raw = serde_json::to_string_pretty(&next)?;
        self.store.set(BUSES_KEY, &raw)?;
        self.registry = next;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FlakyKvStore, MemoryKvStore};

    fn empty_board() -> BusBoard<MemoryKvStore> {
        BusBoard::open(
            MemoryKvStore::new(),
            BoardOptions {
                seed_sample_buses: false,
            },
        )
        .unwrap()
    }

    fn sign_up(board: &mut BusBoard<MemoryKvStore>, phone: &str, role: Role) {
        board
            .register(RegistrationForm {
                name: format!("{} user", role),
                phone: phone.to_string(),
                password: "pw".to_string(),
                role,
            })
            .unwrap();
        board.login(phone, "pw").unwrap();
    }

    #[test]
    fn test_seeding_only_when_storage_is_empty() {
        let board = BusBoard::open(MemoryKvStore::new(), BoardOptions::default()).unwrap();
        assert_eq!(board.registry().len(), 3);

        let mut board = empty_board();
        assert!(board.registry().is_empty());
        board.login("000", "admin").unwrap();
        board.create_bus(&BusInput::new("Only", "O1")).unwrap();

        let reopened = BusBoard::open(board.store, BoardOptions::default()).unwrap();
        assert_eq!(reopened.registry().len(), 1);
    }

    #[test]
    fn test_mutations_require_sign_in() {
        let mut board = BusBoard::open(MemoryKvStore::new(), BoardOptions::default()).unwrap();
        let id = board.registry().list_all()[0].id.clone();

        assert!(matches!(
            board.create_bus(&BusInput::new("X", "Y")),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            board.update_status(&id, BusStatus::Arrived, None),
            Err(AppError::Unauthorized(_))
        ));
        assert!(!board.can(Action::UpdateStatus));
        assert_eq!(board.registry().len(), 3);
    }

    #[test]
    fn test_passenger_reports_but_cannot_restructure() {
        let mut board = BusBoard::open(MemoryKvStore::new(), BoardOptions::default()).unwrap();
        sign_up(&mut board, "555", Role::Passenger);
        let id = board.registry().list_all()[0].id.clone();

        assert!(!board.can(Action::CreateBus));
        assert!(board.can(Action::UpdateStatus));
        assert!(matches!(
            board.create_bus(&BusInput::new("X", "Y")),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            board.edit_bus(&id, &BusInput::new("X", "Y")),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(board.delete_bus(&id), Err(AppError::Unauthorized(_))));

        let bus = board.update_status(&id, BusStatus::Delayed, Some(10)).unwrap();
        assert_eq!(bus.updated_by, "Passenger user");
        assert_eq!(bus.updated_by_role, Role::Passenger);
        assert_eq!(board.registry().len(), 3);
    }

    #[test]
    fn test_conductor_manages_buses_and_changes_persist() {
        let mut board = empty_board();
        sign_up(&mut board, "777", Role::Conductor);

        let bus = board
            .create_bus(&BusInput::new("Night Rider", "TS 07 N 0001").with_stops("A,B"))
            .unwrap();
        board
            .edit_bus(&bus.id, &BusInput::new("Night Rider", "TS 07 N 0001").with_stops("A,B,C"))
            .unwrap();
        board.update_status(&bus.id, BusStatus::Arrived, None).unwrap();

        let reopened = BusBoard::open(board.store, BoardOptions::default()).unwrap();
        let stored = reopened.resolve("ts 07 n 0001").unwrap();
        assert_eq!(stored.route_stops, vec!["A", "B", "C"]);
        assert_eq!(stored.status(), BusStatus::Arrived);
        assert_eq!(reopened.role(), Some(Role::Conductor));
    }

    #[test]
    fn test_failed_mutation_does_not_persist() {
        let mut board = empty_board();
        board.login("000", "admin").unwrap();
        assert!(board.create_bus(&BusInput::new("X", "")).is_err());
        assert!(board.store().get(BUSES_KEY).unwrap().is_none());
    }

    #[test]
    fn test_failed_save_leaves_registry_untouched() {
        let store = FlakyKvStore::default();
        let mut board = BusBoard::open(&store, BoardOptions::default()).unwrap();
        board.login("000", "admin").unwrap();
        let before = board.registry().clone();
        let id = before.list_all()[2].id.clone();

        store.reject_writes(true);
        assert_eq!(
            board.create_bus(&BusInput::new("Ghost", "G1")).unwrap_err(),
            AppError::Io("disk full".to_string())
        );
        assert!(board.edit_bus(&id, &BusInput::new("Renamed", "R1")).is_err());
        assert!(board.update_status(&id, BusStatus::Arrived, None).is_err());
        assert!(board.delete_bus(&id).is_err());

        assert_eq!(board.registry(), &before);
        assert!(board.visible_buses("ghost", DateFilter::Today).is_empty());

        store.reject_writes(false);
        board.create_bus(&BusInput::new("Ghost", "G1")).unwrap();
        assert_eq!(board.registry().len(), before.len() + 1);
    }

    #[test]
    fn test_resolve_unknown_bus() {
        let board = empty_board();
        assert_eq!(
            board.resolve("KA 01").unwrap_err(),
            AppError::NotFound("Bus 'KA 01'".to_string())
        );
    }
}
