use todoey_core::{Item, ListService, ServiceError, Store, PALETTE};
use uuid::Uuid;

fn setup() -> ListService {
    ListService::new(Store::open_in_memory().unwrap()).unwrap()
}

fn titles(items: &[Item]) -> Vec<String> {
    items.iter().map(|item| item.title.clone()).collect()
}

#[test]
fn categories_get_capitalized_names_and_rotating_colours() {
    let mut service = setup();

    let work = service.create_category(Some("Work")).unwrap().unwrap();
    let home = service.create_category(Some("home")).unwrap().unwrap();
    let blank = service.create_category(Some("")).unwrap().unwrap();

    assert_eq!(
        [work.name.as_str(), home.name.as_str(), blank.name.as_str()],
        ["Work", "Home", ""]
    );
    assert_eq!(work.colour, PALETTE[0]);
    assert_eq!(home.colour, PALETTE[1]);
    assert_eq!(blank.colour, PALETTE[2]);

    let loaded: Vec<_> = service
        .load_categories()
        .unwrap()
        .into_iter()
        .map(|category| category.name)
        .collect();
    assert_eq!(loaded, vec!["Work", "Home", ""]);
}

#[test]
fn absent_category_name_is_a_no_op() {
    let mut service = setup();

    assert!(service.create_category(None).unwrap().is_none());
    assert!(service.load_categories().unwrap().is_empty());
    assert_eq!(service.rotation().index(), 0);
}

#[test]
fn colours_wrap_after_the_palette_is_exhausted() {
    let mut service = setup();

    let colours: Vec<_> = (0..16)
        .map(|index| {
            service
                .create_category(Some(format!("c{index}").as_str()))
                .unwrap()
                .unwrap()
                .colour
        })
        .collect();

    for (index, colour) in colours.iter().enumerate() {
        assert_eq!(colour, PALETTE[index % PALETTE.len()]);
    }
}

#[test]
fn rotation_resumes_from_live_count_after_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todoey.db");
    {
        let mut service = ListService::new(Store::open(&path).unwrap()).unwrap();
        service.create_category(Some("one")).unwrap();
        service.create_category(Some("two")).unwrap();
    }

    let mut reopened = ListService::new(Store::open(&path).unwrap()).unwrap();
    let third = reopened.create_category(Some("three")).unwrap().unwrap();
    assert_eq!(third.colour, PALETTE[2]);
}

#[test]
fn deleting_a_category_rederives_rotation_from_live_count() {
    let mut service = setup();
    let first = service.create_category(Some("a")).unwrap().unwrap();
    service.create_category(Some("b")).unwrap();
    service.create_category(Some("c")).unwrap();

    service.delete_category(first.uuid).unwrap();
    assert_eq!(service.rotation().index(), 2);

    let next = service.create_category(Some("d")).unwrap().unwrap();
    assert_eq!(next.colour, PALETTE[2]);
}

#[test]
fn deleting_a_category_removes_its_items() {
    let mut service = setup();
    let home = service.create_category(Some("home")).unwrap().unwrap();
    let item = service
        .create_item(home.uuid, Some("milk"))
        .unwrap()
        .unwrap();

    service.delete_category(home.uuid).unwrap();

    assert!(service.get_category(home.uuid).unwrap().is_none());
    assert!(service.get_item(item.uuid).unwrap().is_none());
    assert!(matches!(
        service.load_items(home.uuid, None),
        Err(ServiceError::CategoryNotFound(id)) if id == home.uuid
    ));
}

#[test]
fn deleting_an_unknown_category_is_typed_absence() {
    let mut service = setup();
    let missing = Uuid::new_v4();

    assert!(matches!(
        service.delete_category(missing),
        Err(ServiceError::CategoryNotFound(id)) if id == missing
    ));
}

#[test]
fn search_scenario_matches_case_insensitively_in_title_order() {
    let mut service = setup();
    let home = service.create_category(Some("Home")).unwrap().unwrap();
    for title in ["buy milk", "Buy Bread", "call mom"] {
        service.create_item(home.uuid, Some(title)).unwrap();
    }

    let all = service.load_items(home.uuid, None).unwrap();
    assert_eq!(titles(&all), vec!["Buy Bread", "Buy milk", "Call mom"]);

    let hits = service.load_items(home.uuid, Some("buy")).unwrap();
    assert_eq!(titles(&hits), vec!["Buy Bread", "Buy milk"]);
}

#[test]
fn empty_filter_equals_no_filter() {
    let mut service = setup();
    let home = service.create_category(Some("Home")).unwrap().unwrap();
    for title in ["zucchini", "apples", "Melon"] {
        service.create_item(home.uuid, Some(title)).unwrap();
    }

    assert_eq!(
        service.load_items(home.uuid, Some("")).unwrap(),
        service.load_items(home.uuid, None).unwrap()
    );
}

#[test]
fn filtered_result_is_a_subsequence_of_the_sorted_list() {
    let mut service = setup();
    let home = service.create_category(Some("Home")).unwrap().unwrap();
    for title in ["Réunion prep", "reunite team", "Lunch", "plan REUNION", "misc"] {
        service.create_item(home.uuid, Some(title)).unwrap();
    }

    let all = service.load_items(home.uuid, None).unwrap();
    let hits = service.load_items(home.uuid, Some("reun")).unwrap();
    let expected: Vec<_> = all
        .iter()
        .filter(|item| todoey_core::model::text::contains_folded(&item.title, "reun"))
        .cloned()
        .collect();

    assert_eq!(hits, expected);
    assert_eq!(hits.len(), 3);
}

#[test]
fn create_item_normalizes_and_timestamps() {
    let mut service = setup();
    let home = service.create_category(Some("Home")).unwrap().unwrap();

    let item = service
        .create_item(home.uuid, Some("water plants"))
        .unwrap()
        .unwrap();
    assert_eq!(item.title, "Water plants");
    assert_eq!(item.category_uuid, home.uuid);
    assert!(!item.done);
    assert!(item.date_created > 0);

    assert!(service.create_item(home.uuid, None).unwrap().is_none());
    assert_eq!(service.load_items(home.uuid, None).unwrap().len(), 1);
}

#[test]
fn create_item_in_unknown_category_is_typed_absence() {
    let mut service = setup();
    let missing = Uuid::new_v4();

    assert!(matches!(
        service.create_item(missing, Some("x")),
        Err(ServiceError::CategoryNotFound(id)) if id == missing
    ));
}

#[test]
fn toggle_done_is_its_own_inverse() {
    let mut service = setup();
    let home = service.create_category(Some("Home")).unwrap().unwrap();
    let item = service.create_item(home.uuid, Some("x")).unwrap().unwrap();

    let toggled = service.toggle_done(item.uuid).unwrap();
    assert!(toggled.done);
    assert!(service.get_item(item.uuid).unwrap().unwrap().done);

    let restored = service.toggle_done(item.uuid).unwrap();
    assert_eq!(restored.done, item.done);
    assert_eq!(service.get_item(item.uuid).unwrap().unwrap(), item);
}

#[test]
fn deleted_item_disappears_and_recreation_gets_new_identity() {
    let mut service = setup();
    let home = service.create_category(Some("Home")).unwrap().unwrap();
    let item = service
        .create_item(home.uuid, Some("buy milk"))
        .unwrap()
        .unwrap();

    service.delete_item(item.uuid).unwrap();
    assert!(service.load_items(home.uuid, None).unwrap().is_empty());
    assert!(matches!(
        service.toggle_done(item.uuid),
        Err(ServiceError::ItemNotFound(id)) if id == item.uuid
    ));
    assert!(matches!(
        service.delete_item(item.uuid),
        Err(ServiceError::ItemNotFound(_))
    ));

    let recreated = service
        .create_item(home.uuid, Some("buy milk"))
        .unwrap()
        .unwrap();
    assert_eq!(recreated.title, item.title);
    assert_ne!(recreated.uuid, item.uuid);
}
