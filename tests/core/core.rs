use garage::core::audit::AuditLog;
use garage::core::catalog::GarageCatalog;
use garage::core::config::{GarageConfig, GarageDefaults};
use garage::core::console::{Console, ShellCommand};
use garage::core::error::GarageError;
use garage::core::registry::{
    JsonFilePlateStore, LicensePlateRegistry, MemoryPlateStore, PlateStore, validate_plate_format,
};
use garage::core::store::{GARAGE_SIZE_MAX, GarageStore, next_pow2_capacity};
use garage::vehicles::{Bus, Car, Color, Vehicle, VehicleKind, VehicleRecord};
use std::cell::Cell;
use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Cursor};
use tempfile::tempdir;

fn car(plate: &str) -> Vehicle {
    Car::new(validate_plate_format, plate, Color::Red, 4, 5)
        .expect("valid car")
        .into()
}

fn memory_registry() -> LicensePlateRegistry<MemoryPlateStore> {
    LicensePlateRegistry::open(MemoryPlateStore::new()).expect("memory registry opens")
}

// --- store ---------------------------------------------------------------

#[test]
fn small_garages_get_four_slots() {
    for size in 1..=4 {
        let g: GarageStore<Vehicle> = GarageStore::new(size).unwrap();
        assert_eq!(g.capacity(), 4, "size {}", size);
        assert_eq!(g.vehicle_limit(), size);
        assert_eq!(g.used_spaces(), 0);
    }
}

#[test]
fn larger_garages_round_up_to_power_of_two() {
    for size in [5, 7, 8, 9, 100, 1000, 4097, GARAGE_SIZE_MAX - 1, GARAGE_SIZE_MAX] {
        let cap = next_pow2_capacity(size);
        assert!(cap.is_power_of_two());
        assert!(cap >= size);
        assert!(cap / 2 < size, "size {} got {}", size, cap);
    }
    let g: GarageStore<Vehicle> = GarageStore::new(GARAGE_SIZE_MAX).unwrap();
    assert_eq!(g.capacity(), GARAGE_SIZE_MAX);
}

#[test]
fn sizes_outside_bounds_are_rejected() {
    for size in [0, GARAGE_SIZE_MAX + 1] {
        match GarageStore::<Vehicle>::new(size) {
            Err(GarageError::GarageSize { size: s, min, max }) => {
                assert_eq!(s, size);
                assert_eq!(min, 1);
                assert_eq!(max, GARAGE_SIZE_MAX);
            }
            other => panic!("expected GarageSize for {}, got {:?}", size, other.map(|_| ())),
        }
    }
}

#[test]
fn listing_is_repeatable_and_in_slot_order() {
    let mut g: GarageStore<Vehicle> = GarageStore::new(6).unwrap();
    for p in ["AAA001", "AAA002", "AAA003"] {
        g.add_vehicle(car(p)).unwrap();
    }
    let first: Vec<String> = g.get_all_vehicles_information().collect();
    let second: Vec<String> = g.get_all_vehicles_information().collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
    assert!(first[0].contains("AAA001"));
    assert!(first[2].contains("AAA003"));
}

#[test]
fn add_then_lookup_and_remove_round_trip() {
    let mut g: GarageStore<Vehicle> = GarageStore::new(3).unwrap();
    let v = car("XYZ789");
    let expected = v.to_string();
    assert_eq!(g.add_vehicle(v).unwrap(), 0);

    assert_eq!(g.get_vehicle_information("xyz789"), Some(expected.clone()));
    let removed = g.remove_vehicle("Xyz789").expect("vehicle present");
    assert_eq!(removed.to_string(), expected);
    assert_eq!(g.used_spaces(), 0);
    assert_eq!(g.get_vehicle_information("XYZ789"), None);
    assert!(g.remove_vehicle("XYZ789").is_none());
}

#[test]
fn removed_slot_is_reused_without_growth() {
    let mut g: GarageStore<Vehicle> = GarageStore::new(4).unwrap();
    for p in ["AAA001", "AAA002", "AAA003", "AAA004"] {
        g.add_vehicle(car(p)).unwrap();
    }
    assert!(g.is_full());
    assert!(g.remove_vehicle("AAA002").is_some());
    assert_eq!(g.add_vehicle(car("AAA005")).unwrap(), 1);
    assert_eq!(g.capacity(), 4);
    assert_eq!(g.used_spaces(), 4);
    assert_eq!(g.slot_of("AAA005"), Some(1));
}

#[test]
fn full_garage_rejects_and_stays_unchanged() {
    let mut g: GarageStore<Vehicle> = GarageStore::new(2).unwrap();
    g.add_vehicle(car("AAA001")).unwrap();
    g.add_vehicle(car("AAA002")).unwrap();
    let before: Vec<String> = g.get_all_vehicles_information().collect();

    let err = g.add_vehicle(car("AAA003")).unwrap_err();
    assert!(matches!(err, GarageError::GarageFull { limit: 2 }));
    assert_eq!(g.used_spaces(), 2);
    assert_eq!(g.capacity(), 4);
    assert_eq!(g.get_all_vehicles_information().collect::<Vec<_>>(), before);
}

#[test]
fn size_five_garage_end_to_end() {
    let mut registry = memory_registry();
    let mut g: GarageStore<Vehicle> = GarageStore::new(5).unwrap();
    assert_eq!(g.capacity(), 8);
    assert_eq!(g.vehicle_limit(), 5);

    for (i, p) in ["ABC001", "ABC002", "ABC003", "ABC004", "ABC005"]
        .iter()
        .enumerate()
    {
        let v = Car::new(registry.registrar(), p, Color::Blue, 4, 4).unwrap();
        assert_eq!(g.add_vehicle(v.into()).unwrap(), i);
    }
    assert!(g.is_full());
    assert_eq!(g.free_spaces(), 0);

    let sixth = Car::new(registry.registrar(), "ABC006", Color::Blue, 4, 4).unwrap();
    assert!(matches!(
        g.add_vehicle(sixth.into()),
        Err(GarageError::GarageFull { limit: 5 })
    ));
    assert_eq!(g.used_spaces(), 5);
    assert_eq!(g.iter().count(), 5);
}

#[test]
fn iteration_skips_holes() {
    let mut g: GarageStore<Vehicle> = GarageStore::new(4).unwrap();
    for p in ["AAA001", "AAA002", "AAA003"] {
        g.add_vehicle(car(p)).unwrap();
    }
    g.remove_vehicle("AAA002");
    let plates: Vec<&str> = (&g).into_iter().map(|v| v.plate()).collect();
    assert_eq!(plates, vec!["AAA001", "AAA003"]);
}

#[test]
fn perform_query_returns_borrowed_results() {
    let mut g: GarageStore<Vehicle> = GarageStore::new(4).unwrap();
    g.add_vehicle(car("AAA001")).unwrap();
    g.add_vehicle(
        Bus::new(validate_plate_format, "BUS001", Color::Green, 6, 2)
            .unwrap()
            .into(),
    )
    .unwrap();
    let buses: Vec<&Vehicle> =
        g.perform_query(|vs| vs.filter(|v| v.kind() == VehicleKind::Bus).collect());
    assert_eq!(buses.len(), 1);
    assert_eq!(buses[0].plate(), "BUS001");
}

// --- registry ------------------------------------------------------------

#[test]
fn plate_format_accepts_mixed_case() {
    let registry = memory_registry();
    for plate in ["BBK159", "azm129", "uRE832"] {
        assert!(registry.is_valid_license_plate(plate).unwrap(), "{}", plate);
    }
}

#[test]
fn plate_format_rejections_are_specific() {
    let registry = memory_registry();
    assert!(matches!(
        registry.is_valid_license_plate("159KBB"),
        Err(GarageError::PlateFormat(_))
    ));
    assert!(matches!(
        registry.is_valid_license_plate("azmm129"),
        Err(GarageError::PlateLength(_))
    ));
    assert!(matches!(
        registry.is_valid_license_plate("uRE32"),
        Err(GarageError::PlateLength(_))
    ));
    assert!(matches!(
        registry.is_valid_license_plate(""),
        Err(GarageError::PlateMissing)
    ));
    assert!(matches!(
        registry.is_valid_license_plate("   "),
        Err(GarageError::PlateMissing)
    ));
}

#[test]
fn validation_does_not_register() {
    let registry = memory_registry();
    assert!(registry.is_valid_license_plate("AAA111").unwrap());
    assert!(registry.is_valid_license_plate("AAA111").unwrap());
    assert!(registry.is_empty());
}

#[test]
fn duplicate_registration_is_rejected() {
    let mut registry = memory_registry();
    registry.register_license_plate("AAA111").unwrap();
    assert_eq!(registry.len(), 1);

    let err = registry.register_license_plate("aaa111").unwrap_err();
    assert!(matches!(err, GarageError::PlateDuplicate(_)));
    assert!(err.to_string().contains("already exists"));
    assert_eq!(registry.len(), 1);
    assert!(registry.is_unique_license_plate("AAA112").is_ok());
}

#[test]
fn registry_persists_across_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plates.json");
    {
        let mut registry = LicensePlateRegistry::open_file(Some(path.as_path())).unwrap();
        registry.register_license_plate("def456").unwrap();
        registry.register_license_plate("ABC123").unwrap();
    }

    let on_disk: Vec<String> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk, vec!["ABC123".to_string(), "DEF456".to_string()]);

    let registry = LicensePlateRegistry::open_file(Some(path.as_path())).unwrap();
    assert!(registry.contains("abc123"));
    assert!(registry.contains("DEF456"));
    assert!(matches!(
        registry.is_valid_license_plate("Def456"),
        Err(GarageError::PlateDuplicate(_))
    ));
}

#[test]
fn missing_plate_file_is_created_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("plates.json");
    let registry = LicensePlateRegistry::open_file(Some(path.as_path())).unwrap();
    assert!(registry.is_empty());
    let on_disk: Vec<String> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert!(on_disk.is_empty());
}

#[test]
fn remove_and_clear_rewrite_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plates.json");
    let mut registry = LicensePlateRegistry::open(JsonFilePlateStore::new(&path)).unwrap();
    for p in ["AAA111", "BBB222", "CCC333"] {
        registry.register_license_plate(p).unwrap();
    }

    assert!(registry.remove_license_plate("bbb222").unwrap());
    assert!(!registry.remove_license_plate("BBB222").unwrap());
    let loaded = registry.store().load().unwrap().unwrap();
    assert_eq!(loaded.len(), 2);
    assert!(!loaded.contains("BBB222"));

    registry.clear_all_license_plates().unwrap();
    assert!(registry.is_empty());
    assert!(registry.store().load().unwrap().unwrap().is_empty());
    assert!(registry.is_valid_license_plate("AAA111").unwrap());
}

#[test]
fn audit_ledger_records_each_mutation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plates.json");
    let mut registry = LicensePlateRegistry::open_file(Some(path.as_path())).unwrap();
    registry.register_license_plate("AAA111").unwrap();
    let _ = registry.register_license_plate("AAA111");
    registry.remove_license_plate("AAA111").unwrap();
    registry.clear_all_license_plates().unwrap();

    let log = AuditLog::beside(&path);
    assert_eq!(log.path(), dir.path().join("plates.events.jsonl"));
    let events = log.read_all().unwrap();
    let summary: Vec<(&str, &str)> = events
        .iter()
        .map(|e| (e.op.as_str(), e.status.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("plates.register", "success"),
            ("plates.register", "error"),
            ("plates.remove", "success"),
            ("plates.clear", "success"),
        ]
    );
    assert_eq!(events[0].plate.as_deref(), Some("AAA111"));
    assert_eq!(events[3].plate, None);
    assert!(events.iter().all(|e| e.ts.ends_with('Z')));
    assert_ne!(events[0].event_id, events[1].event_id);
}

#[test]
fn audit_can_be_disabled() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plates.json");
    let mut registry =
        LicensePlateRegistry::open(JsonFilePlateStore::new(&path).without_audit()).unwrap();
    registry.register_license_plate("AAA111").unwrap();
    assert!(!dir.path().join("plates.events.jsonl").exists());
}

/// Memory store whose writes can be switched off mid-test.
struct FailingStore {
    inner: MemoryPlateStore,
    fail: Cell<bool>,
}

impl PlateStore for FailingStore {
    fn load(&self) -> Result<Option<BTreeSet<String>>, GarageError> {
        self.inner.load()
    }

    fn save(&self, plates: &BTreeSet<String>) -> Result<(), GarageError> {
        if self.fail.get() {
            return Err(io::Error::other("disk full").into());
        }
        self.inner.save(plates)
    }
}

fn persisted(registry: &LicensePlateRegistry<FailingStore>) -> BTreeSet<String> {
    registry.store().inner.snapshot().unwrap_or_default()
}

#[test]
fn failed_save_leaves_memory_matching_store() {
    let store = FailingStore {
        inner: MemoryPlateStore::new(),
        fail: Cell::new(false),
    };
    let mut registry = LicensePlateRegistry::open(store).unwrap();
    registry.register_license_plate("AAA111").unwrap();
    registry.register_license_plate("BBB222").unwrap();
    registry.store().fail.set(true);

    let err = registry.register_license_plate("CCC333").unwrap_err();
    assert!(matches!(err, GarageError::IoError(_)));
    assert!(!registry.contains("CCC333"));

    assert!(matches!(
        registry.remove_license_plate("AAA111"),
        Err(GarageError::IoError(_))
    ));
    assert!(registry.contains("AAA111"));
    assert!(registry.remove_license_plate("ZZZ999").is_err());
    assert!(!registry.contains("ZZZ999"));

    assert!(registry.clear_all_license_plates().is_err());
    assert_eq!(registry.len(), 2);

    let in_memory: BTreeSet<String> = registry.plates().map(str::to_string).collect();
    assert_eq!(in_memory, persisted(&registry));

    registry.store().fail.set(false);
    assert!(registry.remove_license_plate("aaa111").unwrap());
    assert_eq!(persisted(&registry).len(), 1);
}

#[test]
fn unwritable_ledger_does_not_change_outcomes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plates.json");
    fs::create_dir(dir.path().join("plates.events.jsonl")).unwrap();
    let mut registry = LicensePlateRegistry::open_file(Some(path.as_path())).unwrap();

    assert!(matches!(
        registry.register_license_plate("12"),
        Err(GarageError::PlateLength(_))
    ));
    assert_eq!(registry.audit_failures(), 1);

    let built = Car::new(registry.registrar(), "ABC123", Color::Red, 4, 4);
    assert!(built.is_ok());
    assert!(registry.contains("ABC123"));
    assert_eq!(registry.audit_failures(), 2);
    let on_disk: Vec<String> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk, vec!["ABC123"]);

    let mut out = Vec::new();
    Console::new(&mut registry, GarageDefaults::default())
        .run(
            Cursor::new("create 2\nadd car AB1 red 4 4\nadd car XYZ987 red 4 4\n"),
            &mut out,
        )
        .expect("session survives ledger failures");
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("error: License plate 'AB1' must contain exactly six characters."));
    assert!(out.contains("Parked XYZ987 in slot 0."));
}

#[test]
fn memory_store_rewrites_on_every_mutation() {
    let mut registry =
        LicensePlateRegistry::open(MemoryPlateStore::seeded(["abc123"])).unwrap();
    assert!(registry.contains("ABC123"));
    assert_eq!(registry.store().save_count(), 0);

    registry.register_license_plate("XYZ999").unwrap();
    registry.remove_license_plate("ABC123").unwrap();
    assert_eq!(registry.store().save_count(), 2);
    let snapshot = registry.store().snapshot().unwrap();
    assert_eq!(snapshot.into_iter().collect::<Vec<_>>(), vec!["XYZ999"]);
}

// --- catalog -------------------------------------------------------------

#[test]
fn catalog_ids_follow_highest_id() {
    let mut catalog: GarageCatalog = GarageCatalog::new();
    assert!(matches!(catalog.current(), Err(GarageError::NoGarageSelected)));
    assert_eq!(catalog.create_garage(3).unwrap(), 0);
    assert_eq!(catalog.create_garage(10).unwrap(), 1);
    assert!(catalog.create_garage(0).is_err());
    assert_eq!(catalog.len(), 2);

    assert!(matches!(catalog.select(7), Err(GarageError::GarageNotFound(7))));
    catalog.select(1).unwrap();
    assert_eq!(catalog.selected_id(), Some(1));
    assert_eq!(catalog.current().unwrap().vehicle_limit(), 10);
    assert_eq!(catalog.get(0).map(|g| g.capacity()), Some(4));
}

// --- config --------------------------------------------------------------

#[test]
fn config_file_in_directory_is_loaded() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("garage.toml"),
        "[registry]\npath = \"data/plates.json\"\naudit = false\n\n[garage]\ndefault_size = 3\n",
    )
    .unwrap();

    let config = GarageConfig::load(dir.path()).unwrap();
    assert_eq!(config.garage.default_size, 3);
    assert!(!config.registry.audit);
    assert_eq!(config.plates_path(), dir.path().join("data/plates.json"));
}

#[test]
fn missing_config_file_means_defaults_in_that_directory() {
    let dir = tempdir().unwrap();
    let config = GarageConfig::load(dir.path()).unwrap();
    assert_eq!(config.garage, GarageDefaults::default());
    assert_eq!(config.plates_path(), dir.path().join("licensePlates.json"));
}

#[test]
fn malformed_config_is_a_config_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[garage\n").unwrap();
    assert!(matches!(
        GarageConfig::load_from(&path),
        Err(GarageError::ConfigError(_))
    ));
    assert!(matches!(
        GarageConfig::load_from(&dir.path().join("absent.toml")),
        Err(GarageError::ConfigError(_))
    ));
}

// --- console -------------------------------------------------------------

fn run_console(
    registry: &mut LicensePlateRegistry<MemoryPlateStore>,
    defaults: GarageDefaults,
    script: &str,
) -> String {
    let mut out = Vec::new();
    Console::new(registry, defaults)
        .run(Cursor::new(script), &mut out)
        .expect("console session");
    String::from_utf8(out).unwrap()
}

#[test]
fn console_parses_commands() {
    assert_eq!(ShellCommand::parse("  ").unwrap(), None);
    assert_eq!(ShellCommand::parse("# note").unwrap(), None);
    assert_eq!(
        ShellCommand::parse("CREATE 12").unwrap(),
        Some(ShellCommand::Create(Some(12)))
    );
    assert_eq!(
        ShellCommand::parse("add 4 abc123 blue 4 5").unwrap(),
        Some(ShellCommand::Add {
            kind: VehicleKind::Car,
            plate: "abc123".into(),
            color: Color::Blue,
            wheels: 4,
            field: "5".into(),
        })
    );
    assert!(ShellCommand::parse("select x").is_err());
    assert!(ShellCommand::parse("fly away").is_err());
}

#[test]
fn console_session_parks_and_releases_plates() {
    let mut registry = memory_registry();
    let out = run_console(
        &mut registry,
        GarageDefaults::default(),
        "create 5\n\
         add car abc123 red 4 5\n\
         show ABC123\n\
         add car ABC123 red 4 5\n\
         add car abc124 red 4 9\n\
         status\n\
         remove abc123\n\
         quit\n\
         list\n",
    );

    assert!(out.starts_with("garage console."));
    assert!(out.contains("Garage 0 of size 5 created and selected."));
    assert!(out.contains("Parked abc123 in slot 0."));
    assert!(out.contains("Car: License plate: abc123, Color: Red, Wheels: 4, Seats: 5"));
    assert!(out.contains("error: License plate 'ABC123' already exists."));
    assert!(out.contains("error: Number of seats must be within the range of 0 - 7"));
    assert!(out.contains("Garage 0: 1/5 spaces used (capacity 8)"));
    assert!(out.contains("Removed Car: License plate: abc123"));
    assert!(!out.contains("(no vehicles)"), "commands after quit must not run");
    assert!(out.trim_end().ends_with("bye"));

    assert!(!registry.contains("ABC123"));
    assert!(!registry.contains("ABC124"));
}

#[test]
fn console_reports_missing_selection_and_keeps_going() {
    let mut registry = memory_registry();
    let out = run_console(
        &mut registry,
        GarageDefaults::default(),
        "garages\nlist\nselect 3\ncreate\ngarages\ncount\n",
    );
    assert!(out.contains("There are no created garages yet!"));
    assert!(out.contains("error: No garage selected."));
    assert!(out.contains("error: Garage 3 does not exist."));
    assert!(out.contains("Garage 0 of size 10 created and selected."));
    assert!(out.contains("* Garage 0: 0/10 spaces used (capacity 16)"));
    assert!(out.contains("(no vehicles)"));
}

#[test]
fn console_seed_stops_at_vehicle_limit() {
    let mut registry = memory_registry();
    let out = run_console(
        &mut registry,
        GarageDefaults::default(),
        "create 3\nseed\nfilter kind=airplane wheels>4\ncount\n",
    );
    assert!(out.contains("Seeded 3 sample vehicles before the garage filled up (3 spaces)."));
    assert!(out.contains("  1. Airplane: License plate: ABC112"));
    assert!(out.contains("  2. Airplane: License plate: ABC113"));
    assert!(out.contains("Airplane: 3"));
    assert_eq!(registry.len(), 3);
}

#[test]
fn console_create_can_seed_automatically() {
    let mut registry = memory_registry();
    let defaults = GarageDefaults {
        default_size: 40,
        seed_samples: true,
    };
    let mut out = Vec::new();
    let mut console = Console::new(&mut registry, defaults);
    console.run(Cursor::new("create\n"), &mut out).unwrap();
    assert_eq!(console.catalog().current().unwrap().used_spaces(), 40);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Seeded 40 sample vehicles."));

    // The plates are taken now, so a second garage cannot be seeded.
    let mut out = Vec::new();
    console.run(Cursor::new("create\n"), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Seeded 0 sample vehicles."));
    assert!(text.contains("error: License plate 'ABC111' already exists."));
}

#[test]
fn console_add_motorcycle_and_boat() {
    let mut registry = memory_registry();
    let out = run_console(
        &mut registry,
        GarageDefaults::default(),
        "create 4\nadd motorcycle MCY001 yellow 2 yes\nadd 2 BOT001 green 0 electric\nlist\n",
    );
    assert!(out.contains("Motorcycle: License plate: MCY001, Color: Yellow, Wheels: 2, Sidecar: yes"));
    assert!(out.contains("Boat: License plate: BOT001, Color: Green, Wheels: 0, Fuel type: Electric"));
}
