// ../tests/tests.rs
use cp2020_sheets::*;
use cp2020_sheets::item::{Cyberware, Skill, Weapon};
use cp2020_sheets::lookups::{AttackType, WeaponType};
use cp2020_sheets::sheet::{SheetResponse, SheetTab};
use cp2020_sheets::ui::item_sheet::draw_item_sheet;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{buffer::Buffer, layout::Rect};
use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;

fn fixture_store() -> RecordStore {
    let json = fs::read_to_string("tests/fixture_store.json")
        .expect("Failed to read fixture store JSON file");
    RecordStore::from_json(&json).expect("Failed to parse fixture store")
}

fn item_id(store: &RecordStore, name: &str) -> ItemId {
    store
        .items()
        .find(|item| item.name == name)
        .map(|item| item.id)
        .unwrap_or_else(|| panic!("No item named {name}"))
}

fn adapter(dispatch: DispatchMode) -> Arc<ViewAdapter> {
    Arc::new(ViewAdapter::new(
        Arc::new(Lookups::standard()),
        Arc::new(Localizer::load("en")),
        dispatch,
    ))
}

fn sheet_for(store: &RecordStore, name: &str, dispatch: DispatchMode) -> ItemSheet {
    ItemSheet::new(item_id(store, name), SheetOptions::default(), adapter(dispatch))
}

fn view_of(store: &RecordStore, name: &str, dispatch: DispatchMode) -> ItemView {
    sheet_for(store, name, dispatch)
        .get_data(store)
        .expect("Failed to build view")
}

fn view_keys(view: &ItemView) -> Vec<String> {
    let value = serde_json::to_value(view).expect("Failed to serialize view");
    let mut keys: Vec<String> = value
        .as_object()
        .expect("View should serialize to an object")
        .keys()
        .cloned()
        .collect();
    keys.sort();
    keys
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[test]
fn test_weapon_view_offers_sorted_option_lists() {
    let store = fixture_store();
    let view = view_of(&store, "Militech Avenger", DispatchMode::Exclusive);

    assert_eq!(view.actor.as_deref(), Some("Minami 10"));
    assert_eq!(
        view.weapon_types,
        Some(strings(&[
            "Exotic", "Heavy", "Melee", "Pistol", "Rifle", "SMG", "Shotgun"
        ]))
    );
    let attack_types = view.attack_types.expect("Weapons carry attack types");
    assert_eq!(attack_types.len(), 18);
    assert!(attack_types.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(view.concealabilities, Some(strings(&["P", "J", "L", "N"])));
    assert_eq!(view.availabilities, Some(strings(&["E", "C", "P", "R"])));
    assert_eq!(view.reliabilities, Some(strings(&["VR", "ST", "UR"])));
    assert_eq!(view.attack_skills, Some(strings(&["Handgun", "Karate"])));
    assert!(view.stats.is_none());
}

#[test]
fn test_melee_weapon_only_offers_melee_attacks() {
    let store = fixture_store();
    let view = view_of(&store, "Monoblade", DispatchMode::Exclusive);

    assert_eq!(
        view.attack_types,
        Some(strings(&[
            "Block", "Choke", "Disarm", "Dodge", "Escape", "Grapple", "Hold", "Kick", "Melee",
            "Ram", "Strike", "Sweep", "Throw"
        ]))
    );
    // Karate is trained, Judo sits at level 0.
    assert_eq!(
        view.attack_skills,
        Some(strings(&["Fencing", "Melee", "Karate"]))
    );
}

#[test]
fn test_attack_skills_fall_back_to_owner_skills() {
    let mut store = RecordStore::new();
    let actor = store.insert_actor(Actor::new("Rache Bartmoss"));
    for name in ["Fencing", "Brawling"] {
        store.insert_item(
            Item::new(
                name,
                ItemData::Skill(Skill {
                    level: 3,
                    ..Skill::default()
                }),
            )
            .owned_by(actor),
        );
    }
    let whip = store.insert_item(
        Item::new(
            "Monowire",
            ItemData::Weapon(Weapon {
                weapon_type: WeaponType::Exotic,
                ..Weapon::default()
            }),
        )
        .owned_by(actor),
    );

    let sheet = ItemSheet::new(whip, SheetOptions::default(), adapter(DispatchMode::Exclusive));
    let view = sheet.get_data(&store).unwrap();
    assert_eq!(view.attack_skills, Some(strings(&["Brawling", "Fencing"])));
}

#[test]
fn test_unowned_exotic_weapon_has_no_attack_skills() {
    let mut store = RecordStore::new();
    let id = store.insert_item(Item::new(
        "Microwaver",
        ItemData::Weapon(Weapon {
            weapon_type: WeaponType::Exotic,
            ..Weapon::default()
        }),
    ));
    let sheet = ItemSheet::new(id, SheetOptions::default(), adapter(DispatchMode::Exclusive));
    let view = sheet.get_data(&store).unwrap();
    assert_eq!(view.attack_skills, Some(Vec::new()));
    assert!(view.actor.is_none());
}

#[test]
fn test_heavy_weapon_skill_is_localized() {
    let mut store = RecordStore::new();
    let id = store.insert_item(Item::new(
        "Militech Cowboy",
        ItemData::Weapon(Weapon {
            weapon_type: WeaponType::Heavy,
            ..Weapon::default()
        }),
    ));
    let sheet = ItemSheet::new(id, SheetOptions::default(), adapter(DispatchMode::Exclusive));
    let view = sheet.get_data(&store).unwrap();
    assert_eq!(view.attack_skills, Some(strings(&["Heavy Weapons"])));
}

#[test]
fn test_types_without_options_carry_no_option_keys() {
    let store = fixture_store();
    let base = strings(&["activeTab", "editable", "item"]);
    let owned = strings(&["activeTab", "actor", "editable", "item"]);

    for dispatch in [DispatchMode::Exclusive, DispatchMode::FallThrough] {
        assert_eq!(view_keys(&view_of(&store, "Neural Link", dispatch)), owned);
        assert_eq!(view_keys(&view_of(&store, "Chevrolet Impulse", dispatch)), base);
        assert_eq!(view_keys(&view_of(&store, "Synthcoffee", dispatch)), base);
        assert_eq!(view_keys(&view_of(&store, "Mystery Box", dispatch)), base);
    }
    assert_eq!(view_keys(&view_of(&store, "Light Armor Jacket", DispatchMode::Exclusive)), base);
}

#[test]
fn test_unknown_type_tag_parses_as_unknown() {
    let store = fixture_store();
    let id = item_id(&store, "Mystery Box");
    assert_eq!(store.item(id).unwrap().data, ItemData::Unknown);
}

#[test]
fn test_exclusive_dispatch_gives_each_type_its_own_lists() {
    let store = fixture_store();

    let skill = view_of(&store, "Handgun", DispatchMode::Exclusive);
    assert_eq!(
        skill.stats,
        Some(strings(&[
            "int", "ref", "tech", "cool", "attr", "luck", "ma", "bt", "emp"
        ]))
    );
    assert!(skill.cyberdeck_types.is_none());
    assert!(skill.program_classes.is_none());

    let deck = view_of(&store, "Zetatech Parraline", DispatchMode::Exclusive);
    assert_eq!(
        deck.cyberdeck_types,
        Some(strings(&["Desktop", "Portable", "Cellular", "Cyberterminal"]))
    );
    assert!(deck.program_classes.is_none());

    let program = view_of(&store, "Hellhound", DispatchMode::Exclusive);
    assert_eq!(program.program_classes.as_ref().map(Vec::len), Some(11));
    assert!(program.stats.is_none());
}

#[test]
fn test_fall_through_dispatch_chains_augmentation() {
    let store = fixture_store();

    let armor = view_of(&store, "Light Armor Jacket", DispatchMode::FallThrough);
    assert!(armor.stats.is_some());
    assert!(armor.cyberdeck_types.is_some());
    assert!(armor.program_classes.is_some());
    assert!(armor.weapon_types.is_none());

    let skill = view_of(&store, "Handgun", DispatchMode::FallThrough);
    assert!(skill.stats.is_some());
    assert!(skill.cyberdeck_types.is_some());
    assert!(skill.program_classes.is_some());

    let deck = view_of(&store, "Zetatech Parraline", DispatchMode::FallThrough);
    assert!(deck.stats.is_none());
    assert!(deck.cyberdeck_types.is_some());
    assert!(deck.program_classes.is_some());

    let program = view_of(&store, "Hellhound", DispatchMode::FallThrough);
    assert!(program.cyberdeck_types.is_none());
    assert!(program.program_classes.is_some());

    // Weapons never chain.
    let weapon = view_of(&store, "Monoblade", DispatchMode::FallThrough);
    assert!(weapon.stats.is_none());
}

#[test]
fn test_get_data_reports_sheet_state() {
    let store = fixture_store();
    let mut sheet = ItemSheet::new(
        item_id(&store, "Hellhound"),
        SheetOptions::default().read_only(),
        adapter(DispatchMode::Exclusive),
    );
    sheet.next_tab();
    let view = sheet.get_data(&store).unwrap();
    assert!(!view.editable);
    assert_eq!(view.active_tab, SheetTab::Details);
    assert_eq!(view.item.name, "Hellhound");
}

#[test]
fn test_get_data_for_removed_item_fails() {
    let mut store = fixture_store();
    let sheet = sheet_for(&store, "Synthcoffee", DispatchMode::Exclusive);
    store.remove_item(sheet.item_id()).unwrap();
    assert!(matches!(
        sheet.get_data(&store),
        Err(SheetError::Store(StoreError::ItemNotFound(_)))
    ));
}

#[test]
fn test_set_position_clamps_body_height() {
    let store = fixture_store();
    let mut sheet = sheet_for(&store, "Militech Avenger", DispatchMode::Exclusive);

    sheet.set_position(PositionUpdate::height(250));
    assert_eq!(sheet.body_height(), 58);

    let position = sheet.set_position(PositionUpdate::height(100));
    assert_eq!(sheet.body_height(), 0);
    assert_eq!(position.height, 100);
    assert_eq!(position.width, 520);

    sheet.set_position(PositionUpdate::size(600, 192));
    assert_eq!(sheet.body_height(), 0);
    assert_eq!(sheet.position().width, 600);
}

#[test]
fn test_humanity_roll_with_dice_formula() {
    let mut store = fixture_store();
    let mut sheet = sheet_for(&store, "Neural Link", DispatchMode::Exclusive);
    let mut roller = SequenceRoller::new([3, 4]);
    let mut event = SheetEvent::new(SheetAction::HumanityCostRoll);

    let response = sheet.handle(&mut event, &mut store, &mut roller).unwrap();

    assert!(!event.propagates());
    assert!(response.render);
    let ActionOutcome::HumanityLoss(loss) = response.outcome else {
        panic!("Expected a humanity loss outcome");
    };
    assert_eq!(loss.value, 7.0);
    assert!(matches!(loss.source, LossSource::Rolled(_)));
    assert_eq!(
        store.item(sheet.item_id()).unwrap().humanity_loss(),
        Some(7.0)
    );
    assert!(store.is_dirty());
}

#[test]
fn test_humanity_roll_stays_within_dice_range() {
    let mut store = fixture_store();
    let mut sheet = sheet_for(&store, "Neural Link", DispatchMode::Exclusive);
    let mut roller = RandomRoller::seeded(2020);

    for _ in 0..50 {
        let mut event = SheetEvent::new(SheetAction::HumanityCostRoll);
        let response = sheet.handle(&mut event, &mut store, &mut roller).unwrap();
        let ActionOutcome::HumanityLoss(loss) = response.outcome else {
            panic!("Expected a humanity loss outcome");
        };
        assert!((2.0..=12.0).contains(&loss.value));
        assert_eq!(
            store.item(sheet.item_id()).unwrap().humanity_loss(),
            Some(loss.value)
        );
    }
}

fn roll_humanity(cost: HumanityCost) -> (SheetResponse, f64) {
    let mut store = RecordStore::new();
    let id = store.insert_item(Item::new(
        "Cyberoptic",
        ItemData::Cyberware(Cyberware {
            humanity_cost: cost,
            humanity_loss: 99.0,
            ..Cyberware::default()
        }),
    ));
    let mut sheet = ItemSheet::new(id, SheetOptions::default(), adapter(DispatchMode::Exclusive));
    let mut event = SheetEvent::new(SheetAction::HumanityCostRoll);
    let mut roller = SequenceRoller::new([5]);
    let response = sheet.handle(&mut event, &mut store, &mut roller).unwrap();
    assert!(!event.propagates());
    let persisted = store.item(id).unwrap().humanity_loss().unwrap();
    (response, persisted)
}

#[test]
fn test_humanity_roll_with_plain_numbers() {
    let (_, persisted) = roll_humanity(HumanityCost::Formula("3".into()));
    assert_eq!(persisted, 3.0);

    let (_, persisted) = roll_humanity(HumanityCost::Formula(" 1.5 ".into()));
    assert_eq!(persisted, 1.5);

    let (_, persisted) = roll_humanity(HumanityCost::Fixed(4.0));
    assert_eq!(persisted, 4.0);

    let (_, persisted) = roll_humanity(HumanityCost::Formula(String::new()));
    assert_eq!(persisted, 0.0);
}

#[test]
fn test_humanity_roll_with_garbage_defaults_to_zero() {
    let (response, persisted) = roll_humanity(HumanityCost::Formula("abc".into()));
    assert_eq!(persisted, 0.0);
    assert!(response.render);
    assert!(matches!(
        response.outcome,
        ActionOutcome::HumanityLoss(HumanityLoss {
            source: LossSource::Invalid(_),
            ..
        })
    ));
}

#[test]
fn test_humanity_roll_with_oversized_dice_defaults_to_zero() {
    for formula in ["2d4000000000", "500000000d6"] {
        let (response, persisted) = roll_humanity(HumanityCost::Formula(formula.into()));
        assert_eq!(persisted, 0.0, "{formula}");
        assert!(response.render);
        assert_eq!(
            response.outcome,
            ActionOutcome::HumanityLoss(HumanityLoss {
                value: 0.0,
                source: LossSource::Unevaluated(formula.to_string()),
            })
        );
    }
}

#[test]
fn test_humanity_roll_reads_prefixed_integers() {
    let (_, persisted) = roll_humanity(HumanityCost::Formula("0x10".into()));
    assert_eq!(persisted, 16.0);

    let (_, persisted) = roll_humanity(HumanityCost::Formula("Infinity".into()));
    assert_eq!(persisted, 0.0);
}

#[test]
fn test_humanity_roll_on_item_without_humanity_is_ignored() {
    let mut store = fixture_store();
    let mut sheet = sheet_for(&store, "Militech Avenger", DispatchMode::Exclusive);
    let before = store.item(sheet.item_id()).unwrap().clone();
    let mut event = SheetEvent::new(SheetAction::HumanityCostRoll);
    let mut roller = SequenceRoller::new([5]);

    let response = sheet.handle(&mut event, &mut store, &mut roller).unwrap();

    assert!(!event.propagates());
    assert!(!response.render);
    assert_eq!(response.outcome, ActionOutcome::Ignored);
    assert_eq!(store.item(sheet.item_id()).unwrap(), &before);
    assert!(!store.is_dirty());
}

#[test]
fn test_weapon_roll_adds_accuracy_reflex_and_skill() {
    let mut store = fixture_store();
    let mut sheet = sheet_for(&store, "Militech Avenger", DispatchMode::Exclusive);
    let mut event = SheetEvent::new(SheetAction::Roll);
    let mut roller = SequenceRoller::new([7]);

    let response = sheet.handle(&mut event, &mut store, &mut roller).unwrap();

    assert!(event.propagates());
    assert!(!response.render);
    let ActionOutcome::Rolled(report) = response.outcome else {
        panic!("Expected a roll outcome");
    };
    assert_eq!(report.total, 20);
    assert_eq!(
        report.describe(),
        "Militech Avenger attack: d10 [7] + WA 1 + REF 8 + Handgun 4 = 20"
    );
    assert!(!store.is_dirty());
}

#[test]
fn test_skill_roll_explodes_on_ten() {
    let mut store = fixture_store();
    let mut sheet = sheet_for(&store, "Handgun", DispatchMode::Exclusive);
    let mut event = SheetEvent::new(SheetAction::Roll);
    let mut roller = SequenceRoller::new([10, 3]);

    let response = sheet.handle(&mut event, &mut store, &mut roller).unwrap();
    let ActionOutcome::Rolled(report) = response.outcome else {
        panic!("Expected a roll outcome");
    };
    assert_eq!(report.check.dice_results, vec![10, 3]);
    assert!(report.check.critical_success);
    // 13 + REF 8 + Level 4
    assert_eq!(report.total, 25);
}

#[test]
fn test_roll_on_armor_is_rejected() {
    let mut store = fixture_store();
    let mut sheet = sheet_for(&store, "Light Armor Jacket", DispatchMode::Exclusive);
    let mut event = SheetEvent::new(SheetAction::Roll);
    let mut roller = SequenceRoller::new([5]);

    let result = sheet.handle(&mut event, &mut store, &mut roller);
    assert!(matches!(
        result,
        Err(SheetError::Item(ItemError::NotRollable("armor")))
    ));
}

#[test]
fn test_accel_and_decel_clamp_speed() {
    let mut store = fixture_store();
    let mut sheet = sheet_for(&store, "Chevrolet Impulse", DispatchMode::Exclusive);
    let mut roller = SequenceRoller::new([1]);
    let mut speed_after = |action, store: &mut RecordStore| {
        let mut event = SheetEvent::new(action);
        let response = sheet.handle(&mut event, store, &mut roller).unwrap();
        assert!(response.render);
        match response.outcome {
            ActionOutcome::SpeedChanged(speed) => speed.value,
            other => panic!("Expected a speed change, got {other:?}"),
        }
    };

    assert_eq!(speed_after(SheetAction::Accelerate, &mut store), 50);
    assert_eq!(speed_after(SheetAction::Accelerate, &mut store), 70);
    assert_eq!(speed_after(SheetAction::Accelerate, &mut store), 90);
    assert_eq!(speed_after(SheetAction::Accelerate, &mut store), 100);
    assert_eq!(speed_after(SheetAction::Decelerate, &mut store), 60);
    assert_eq!(speed_after(SheetAction::Decelerate, &mut store), 20);
    assert_eq!(speed_after(SheetAction::Decelerate, &mut store), 0);
}

#[test]
fn test_accel_on_non_vehicle_fails() {
    let mut store = fixture_store();
    let mut sheet = sheet_for(&store, "Synthcoffee", DispatchMode::Exclusive);
    let mut event = SheetEvent::new(SheetAction::Accelerate);
    let mut roller = SequenceRoller::new([1]);
    assert!(matches!(
        sheet.handle(&mut event, &mut store, &mut roller),
        Err(SheetError::Item(ItemError::NotAVehicle("misc")))
    ));
}

#[test]
fn test_read_only_sheet_binds_nothing() {
    let mut store = fixture_store();
    let mut sheet = ItemSheet::new(
        item_id(&store, "Neural Link"),
        SheetOptions::default().read_only(),
        adapter(DispatchMode::Exclusive),
    );
    assert!(sheet.activate_listeners().is_empty());

    let mut event = SheetEvent::new(SheetAction::HumanityCostRoll);
    let mut roller = SequenceRoller::new([6]);
    assert!(matches!(
        sheet.handle(&mut event, &mut store, &mut roller),
        Err(SheetError::ReadOnly)
    ));
    assert_eq!(
        store.item(sheet.item_id()).unwrap().humanity_loss(),
        Some(0.0)
    );
}

#[test]
fn test_editable_sheet_binds_every_action() {
    let store = fixture_store();
    let sheet = sheet_for(&store, "Neural Link", DispatchMode::Exclusive);
    assert_eq!(
        sheet.activate_listeners(),
        vec![
            SheetAction::Roll,
            SheetAction::Accelerate,
            SheetAction::Decelerate,
            SheetAction::HumanityCostRoll,
            SheetAction::FocusNextField,
            SheetAction::NextOption,
            SheetAction::PreviousOption
        ]
    );
}

fn edit(sheet: &mut ItemSheet, store: &mut RecordStore, action: SheetAction) -> SheetResponse {
    let mut event = SheetEvent::new(action);
    let mut roller = SequenceRoller::new([1]);
    let response = sheet
        .handle(&mut event, store, &mut roller)
        .expect("Sheet action failed");
    assert!(event.propagates());
    response
}

#[test]
fn test_switching_weapon_type_to_melee_narrows_attack_types() {
    let mut store = fixture_store();
    let mut sheet = sheet_for(&store, "Militech Avenger", DispatchMode::Exclusive);

    let response = edit(&mut sheet, &mut store, SheetAction::FocusNextField);
    assert_eq!(
        response.outcome,
        ActionOutcome::FocusChanged(SheetField::WeaponType)
    );
    assert!(!store.is_dirty());

    // Sorted weapon types run Exotic, Heavy, Melee, Pistol, so one step back from Pistol.
    let response = edit(&mut sheet, &mut store, SheetAction::PreviousOption);
    assert!(response.render);
    assert_eq!(
        response.outcome,
        ActionOutcome::FieldChanged {
            field: SheetField::WeaponType,
            value: "Melee".to_string()
        }
    );
    assert!(store.is_dirty());

    let view = sheet.get_data(&store).unwrap();
    let ItemData::Weapon(weapon) = &view.item.data else {
        panic!("Expected a weapon");
    };
    assert_eq!(weapon.weapon_type, WeaponType::Melee);
    assert_eq!(weapon.attack_type, AttackType::Melee);
    assert_eq!(
        view.attack_types,
        Some(Lookups::standard().melee_attack_types_sorted())
    );
    assert_eq!(view.focused_field, Some(SheetField::WeaponType));
}

#[test]
fn test_focus_walks_editable_fields_and_wraps() {
    let mut store = fixture_store();
    let mut sheet = sheet_for(&store, "Militech Avenger", DispatchMode::Exclusive);
    let mut focused = Vec::new();
    for _ in 0..7 {
        edit(&mut sheet, &mut store, SheetAction::FocusNextField);
        focused.extend(sheet.focused_field());
    }
    assert_eq!(
        focused,
        vec![
            SheetField::WeaponType,
            SheetField::AttackType,
            SheetField::Concealability,
            SheetField::Availability,
            SheetField::Reliability,
            SheetField::AttackSkill,
            SheetField::WeaponType,
        ]
    );

    // Availability runs E, C, P, R; the record holds C.
    for _ in 0..3 {
        edit(&mut sheet, &mut store, SheetAction::FocusNextField);
    }
    edit(&mut sheet, &mut store, SheetAction::NextOption);
    edit(&mut sheet, &mut store, SheetAction::NextOption);
    edit(&mut sheet, &mut store, SheetAction::NextOption);
    let ItemData::Weapon(weapon) = &store.item(sheet.item_id()).unwrap().data else {
        panic!("Expected a weapon");
    };
    assert_eq!(weapon.availability.to_string(), "E");
}

#[test]
fn test_cycling_without_focus_or_fields_is_ignored() {
    let mut store = fixture_store();
    let mut sheet = sheet_for(&store, "Handgun", DispatchMode::Exclusive);
    let response = edit(&mut sheet, &mut store, SheetAction::NextOption);
    assert_eq!(response.outcome, ActionOutcome::Ignored);
    assert!(!response.render);

    edit(&mut sheet, &mut store, SheetAction::FocusNextField);
    assert_eq!(sheet.focused_field(), Some(SheetField::Stat));
    edit(&mut sheet, &mut store, SheetAction::NextOption);
    let ItemData::Skill(skill) = &store.item(sheet.item_id()).unwrap().data else {
        panic!("Expected a skill");
    };
    assert_eq!(skill.stat.to_string(), "tech");

    let mut coffee = sheet_for(&store, "Synthcoffee", DispatchMode::Exclusive);
    let response = edit(&mut coffee, &mut store, SheetAction::FocusNextField);
    assert_eq!(response.outcome, ActionOutcome::Ignored);
    assert_eq!(coffee.focused_field(), None);
}

#[test]
fn test_read_only_sheet_rejects_field_edits() {
    let mut store = fixture_store();
    let mut sheet = ItemSheet::new(
        item_id(&store, "Militech Avenger"),
        SheetOptions::default().read_only(),
        adapter(DispatchMode::Exclusive),
    );
    let mut roller = SequenceRoller::new([1]);
    for action in [SheetAction::FocusNextField, SheetAction::NextOption] {
        let mut event = SheetEvent::new(action);
        assert!(matches!(
            sheet.handle(&mut event, &mut store, &mut roller),
            Err(SheetError::ReadOnly)
        ));
    }
    assert_eq!(sheet.focused_field(), None);
    assert!(!store.is_dirty());
}

#[test]
fn test_store_round_trip() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("items.json");
    let mut store = fixture_store();
    let id = item_id(&store, "Neural Link");
    store
        .update_item(id, |item| item.set_humanity_loss(5.0))
        .unwrap();

    store.save(&path).expect("Failed to save store");
    assert!(!store.is_dirty());

    let loaded = RecordStore::load(&path).expect("Failed to load store");
    assert_eq!(loaded.items().count(), 12);
    assert_eq!(loaded.actors().count(), 1);
    assert_eq!(loaded.item(id).unwrap(), store.item(id).unwrap());
    assert_eq!(loaded.item(id).unwrap().humanity_loss(), Some(5.0));
}

#[test]
fn test_missing_store_file_is_empty() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = RecordStore::load(dir.path().join("absent.json")).unwrap();
    assert_eq!(store.items().count(), 0);
    assert!(store.item_ids().is_empty());
}

#[test]
fn test_dangling_owner_is_reported() {
    let mut store = RecordStore::new();
    let id = store.insert_item(Item::new("Orphan", ItemData::Misc).owned_by(ActorId::new()));
    assert!(matches!(
        store.owner_of(id),
        Err(StoreError::DanglingOwner { .. })
    ));
}

#[test]
fn test_item_ids_order_unowned_first() {
    let store = fixture_store();
    let names: Vec<String> = store
        .item_ids()
        .into_iter()
        .map(|id| store.item(id).unwrap().name.clone())
        .collect();
    assert_eq!(names.first().map(String::as_str), Some("Chevrolet Impulse"));
    assert_eq!(names.last().map(String::as_str), Some("Neural Link"));
}

#[test]
fn test_settings_round_trip() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("settings.json");
    let mut attack_skills = BTreeMap::new();
    attack_skills.insert(WeaponType::Exotic, vec!["Archery".to_string()]);
    let settings = Settings {
        language: "de".to_string(),
        dispatch_mode: DispatchMode::FallThrough,
        editable: false,
        attack_skills,
        ..Settings::default()
    };

    settings.save_to_file(&path).expect("Failed to save settings");
    let loaded = Settings::load_settings_from_file(&path).expect("Failed to load settings");

    assert_eq!(loaded, settings);
    assert_eq!(
        loaded.lookups().attack_skills_for(WeaponType::Exotic),
        ["Archery".to_string()]
    );
    assert!(!loaded.sheet_options().editable);
}

#[test]
fn test_partial_settings_use_defaults() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("settings.json");
    fs::write(
        &path,
        r#"{ "dispatchMode": "fallThrough", "chromeHeight": 4, "attackSkills": { "Exotic": ["Archery"] } }"#,
    )
    .unwrap();
    let loaded = Settings::load_settings_from_file(&path).unwrap();
    assert_eq!(loaded.dispatch_mode, DispatchMode::FallThrough);
    assert_eq!(loaded.chrome_height, 4);
    assert_eq!(
        loaded.lookups().attack_skills_for(WeaponType::Exotic),
        ["Archery".to_string()]
    );
    assert_eq!(loaded.language, "en");
    assert!(loaded.editable);
}

#[test]
fn test_settings_file_uses_camel_case_keys() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("settings.json");
    let settings = Settings {
        dispatch_mode: DispatchMode::FallThrough,
        ..Settings::default()
    };
    settings.save_to_file(&path).expect("Failed to save settings");

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["dispatchMode"], "fallThrough");
    for key in ["storePath", "chromeHeight", "attackSkills", "debugMode"] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert!(json.get("dispatch_mode").is_none());
}

#[test]
fn test_localizer_falls_back() {
    let localizer = Localizer::load("en");
    assert_eq!(localizer.skill("HeavyWeapons"), "Heavy Weapons");
    assert_eq!(localizer.localize("NoSuchKey"), "NoSuchKey");

    let fallback = Localizer::load("xx");
    assert_eq!(fallback.language(), "en");
    assert!(Localizer::available_languages().contains(&"de".to_string()));
}

#[test]
fn test_item_sheet_renders_name_and_details() {
    let store = fixture_store();
    let mut sheet = sheet_for(&store, "Militech Avenger", DispatchMode::Exclusive);
    sheet.next_tab();
    let view = sheet.get_data(&store).unwrap();
    let localizer = Localizer::load("en");
    let area = Rect::new(0, 0, 80, 40);
    let mut buffer = Buffer::empty(area);

    draw_item_sheet(
        &mut buffer,
        &view,
        area,
        28,
        &sheet.activate_listeners(),
        &localizer,
    );

    let text = ui::buffer_text(&buffer);
    assert!(text.contains("Militech Avenger"));
    assert!(text.contains("Minami 10"));
    assert!(text.contains("Details"));
    assert!(text.contains("r roll"));
}

#[test]
fn test_item_sheet_marks_focused_field() {
    let mut store = fixture_store();
    let mut sheet = sheet_for(&store, "Militech Avenger", DispatchMode::Exclusive);
    sheet.set_tab(SheetTab::Details);
    edit(&mut sheet, &mut store, SheetAction::FocusNextField);
    edit(&mut sheet, &mut store, SheetAction::FocusNextField);
    let view = sheet.get_data(&store).unwrap();
    let area = Rect::new(0, 0, 80, 40);
    let mut buffer = Buffer::empty(area);

    draw_item_sheet(
        &mut buffer,
        &view,
        area,
        28,
        &sheet.activate_listeners(),
        &Localizer::load("en"),
    );

    let text = ui::buffer_text(&buffer);
    assert!(text.contains("> Attack type: Single"));
    assert!(!text.contains("> Weapon type"));
    assert!(text.contains("f field"));
}

#[test]
fn test_app_humanity_key_persists_and_stops() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("items.json");
    let store = fixture_store();
    let id = item_id(&store, "Neural Link");
    let mut app = App::new(
        Settings::default(),
        path.clone(),
        store,
        Box::new(SequenceRoller::new([2, 6])),
    );
    let index = app
        .item_ids()
        .iter()
        .position(|i| *i == id)
        .expect("Neural Link should be listed");
    app.select(index);

    app.on_key(key(KeyCode::Char('h')));

    assert_eq!(app.store().item(id).unwrap().humanity_loss(), Some(8.0));
    assert!(path.exists());
    assert!(app.is_running());
    assert_eq!(
        app.messages().last().map(|m| m.message_type),
        Some(MessageType::Roll)
    );
}

#[test]
fn test_app_field_keys_edit_and_persist() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("items.json");
    let store = fixture_store();
    let id = item_id(&store, "Militech Avenger");
    let mut app = App::new(
        Settings::default(),
        path.clone(),
        store,
        Box::new(SequenceRoller::new([4])),
    );
    let index = app
        .item_ids()
        .iter()
        .position(|i| *i == id)
        .expect("Militech Avenger should be listed");
    app.select(index);

    app.on_key(key(KeyCode::Char('f')));
    app.on_key(key(KeyCode::Left));

    let saved = RecordStore::load(&path).expect("Failed to reload store");
    let ItemData::Weapon(weapon) = &saved.item(id).unwrap().data else {
        panic!("Expected a weapon");
    };
    assert_eq!(weapon.weapon_type, WeaponType::Melee);
    assert_eq!(
        app.messages().last().map(|m| m.content.as_str()),
        Some("Weapon type set to Melee")
    );
    assert_eq!(app.selected(), Some(index));
}

#[test]
fn test_app_keys_bubble_past_sheet() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut app = App::new(
        Settings::default(),
        dir.path().join("items.json"),
        fixture_store(),
        Box::new(SequenceRoller::new([4])),
    );
    assert_eq!(app.selected(), Some(0));

    app.on_key(key(KeyCode::Char('j')));
    assert_eq!(app.selected(), Some(1));
    app.on_key(key(KeyCode::Up));
    app.on_key(key(KeyCode::Up));
    assert_eq!(app.selected(), Some(0));

    app.on_key(key(KeyCode::Tab));
    assert_eq!(
        app.sheet().map(ItemSheet::active_tab),
        Some(SheetTab::Details)
    );

    app.on_key(key(KeyCode::Char('q')));
    assert!(!app.is_running());
}

#[test]
fn test_app_resize_sets_sheet_body() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut app = App::new(
        Settings::default(),
        dir.path().join("items.json"),
        fixture_store(),
        Box::new(SequenceRoller::new([4])),
    );

    // 40 rows minus title, log and hints leaves 31 for the sheet.
    app.on_resize(100, 40);
    let sheet = app.sheet().expect("A sheet should be open");
    assert_eq!(sheet.position().height, 31);
    assert_eq!(sheet.body_height(), 23);

    app.on_resize(100, 12);
    assert_eq!(app.sheet().unwrap().body_height(), 0);
}
