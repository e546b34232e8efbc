use chalobus::{
    AppError, AppResult, BoardOptions, BusBoard, BusInput, BusStatus, DateFilter, FileKvStore,
    KvStore, MemoryKvStore, RegistrationForm, Role,
};
use std::cell::Cell;

/// Memory store that starts refusing writes once `full` is set
#[derive(Default)]
struct FullDisk {
    inner: MemoryKvStore,
    full: Cell<bool>,
}

impl KvStore for FullDisk {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        if self.full.get() {
            return Err(AppError::Io("disk full".to_string()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.inner.remove(key)
    }
}

fn board_with(store: MemoryKvStore) -> BusBoard<MemoryKvStore> {
    BusBoard::open(
        store,
        BoardOptions {
            seed_sample_buses: false,
        },
    )
    .unwrap()
}

fn admin_board() -> BusBoard<MemoryKvStore> {
    let mut board = board_with(MemoryKvStore::new());
    board.login("000", "admin").unwrap();
    board
}

fn registration(phone: &str, role: Role) -> RegistrationForm {
    RegistrationForm {
        name: "Ravi Kumar".to_string(),
        phone: phone.to_string(),
        password: "pass123".to_string(),
        role,
    }
}

#[test]
fn village_local_is_hidden_tomorrow_but_shown_this_week() {
    let mut board = admin_board();
    board
        .create_bus(&BusInput::new("Village Local", "AP10K5566").with_availability(false, true))
        .unwrap();

    assert!(board.visible_buses("", DateFilter::Tomorrow).is_empty());
    let week = board.visible_buses("", DateFilter::Next7Days);
    assert_eq!(week.len(), 1);
    assert_eq!(week[0].number, "AP10K5566");
}

#[test]
fn create_without_number_is_rejected() {
    let mut board = admin_board();
    let result = board.create_bus(&BusInput::new("X", ""));

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(board.registry().is_empty());
}

#[test]
fn super_admin_signs_in_on_empty_directory() {
    let mut board = board_with(MemoryKvStore::new());
    assert!(board.users().is_empty());

    let admin = board.login("000", "admin").unwrap();
    assert_eq!(admin.role, Role::Admin);
    assert_eq!(board.role(), Some(Role::Admin));
}

#[test]
fn arriving_clears_a_reported_delay() {
    let mut board = admin_board();
    let bus = board.create_bus(&BusInput::new("Main Road Bus", "TS 09 J 9900")).unwrap();

    board.update_status(&bus.id, BusStatus::Delayed, Some(15)).unwrap();
    let arrived = board.update_status(&bus.id, BusStatus::Arrived, None).unwrap();

    assert_eq!(arrived.status(), BusStatus::Arrived);
    assert_eq!(arrived.delay_minutes(), None);
}

#[test]
fn second_registration_with_same_phone_fails() {
    let mut board = board_with(MemoryKvStore::new());
    board.register(registration("9999999999", Role::Passenger)).unwrap();

    let err = board.register(registration("9999999999", Role::Conductor)).unwrap_err();
    assert_eq!(err, AppError::DuplicatePhone("9999999999".to_string()));
    assert_eq!(board.users().len(), 1);
    assert_eq!(board.users()[0].role, Role::Passenger);
}

#[test]
fn editing_a_deleted_bus_is_not_found() {
    let mut board = admin_board();
    let bus = board.create_bus(&BusInput::new("Hyderabad Express", "AP 28 Z 1234")).unwrap();

    board.delete_bus(&bus.id).unwrap();
    let result = board.edit_bus(&bus.id, &BusInput::new("Hyderabad Express", "AP 28 Z 1234"));
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[test]
fn delay_is_present_only_while_delayed() {
    let mut board = admin_board();
    let bus = board.create_bus(&BusInput::new("Loop", "L1")).unwrap();

    let steps = [
        (BusStatus::Delayed, Some(10)),
        (BusStatus::OnTheWay, Some(10)),
        (BusStatus::Delayed, None),
        (BusStatus::Delayed, Some(40)),
        (BusStatus::Arrived, None),
    ];
    for (status, delay) in steps {
        let updated = board.update_status(&bus.id, status, delay).unwrap();
        if updated.delay_minutes().is_some() {
            assert_eq!(updated.status(), BusStatus::Delayed);
        }
        if status != BusStatus::Delayed {
            assert_eq!(updated.delay_minutes(), None);
        }
    }
}

#[test]
fn passenger_can_only_report_status() {
    let mut board = BusBoard::open(MemoryKvStore::new(), BoardOptions::default()).unwrap();
    board.register(registration("8888888888", Role::Passenger)).unwrap();
    board.login("8888888888", "pass123").unwrap();
    let id = board.registry().list_all()[0].id.clone();

    assert!(matches!(
        board.delete_bus(&id),
        Err(AppError::Unauthorized(_))
    ));
    let bus = board.update_status(&id, BusStatus::Arrived, None).unwrap();
    assert_eq!(bus.updated_by, "Ravi Kumar");
    assert_eq!(board.registry().len(), 3);
}

#[test]
fn state_survives_restart_on_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let bus_id = {
        let mut board =
            BusBoard::open(FileKvStore::new(tmp.path()), BoardOptions::default()).unwrap();
        board.register(registration("7777777777", Role::Conductor)).unwrap();
        board.login("7777777777", "pass123").unwrap();
        let bus = board
            .create_bus(&BusInput::new("Night Rider", "TS 07 N 0001").with_stops("Depot, Market"))
            .unwrap();
        board.update_status(&bus.id, BusStatus::Delayed, Some(25)).unwrap();
        bus.id
    };

    let mut board = BusBoard::open(FileKvStore::new(tmp.path()), BoardOptions::default()).unwrap();
    assert_eq!(board.role(), Some(Role::Conductor));
    assert_eq!(board.registry().len(), 4);

    let bus = board.resolve(&bus_id).unwrap();
    assert_eq!(bus.route_stops, vec!["Depot", "Market"]);
    assert_eq!(bus.delay_minutes(), Some(25));

    board.logout();
    assert!(board.store().get("session_v2").unwrap().is_none());
    let reopened = BusBoard::open(FileKvStore::new(tmp.path()), BoardOptions::default()).unwrap();
    assert!(reopened.current_user().is_none());
}

#[test]
fn search_and_filter_keep_registry_order() {
    let mut board = admin_board();
    for (name, number) in [("Alpha Local", "A1"), ("Beta Express", "B2"), ("Gamma Local", "C3")] {
        board.create_bus(&BusInput::new(name, number)).unwrap();
    }

    let locals: Vec<_> = board
        .visible_buses("local", DateFilter::Today)
        .into_iter()
        .map(|b| b.name.clone())
        .collect();
    assert_eq!(locals, vec!["Alpha Local", "Gamma Local"]);
}

#[test]
fn unsaved_bus_never_shows_on_the_board() {
    let disk = FullDisk::default();
    let mut board = BusBoard::open(&disk, BoardOptions::default()).unwrap();
    board.login("000", "admin").unwrap();

    disk.full.set(true);
    let result = board.create_bus(&BusInput::new("Ghost", "G1"));

    assert_eq!(result.unwrap_err(), AppError::Io("disk full".to_string()));
    assert_eq!(board.registry().len(), 3);
    assert!(board.visible_buses("ghost", DateFilter::Today).is_empty());
}
