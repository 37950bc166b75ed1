//! End-to-end scenarios against the page engine

use form_tabs_app::config::{load_settings, PanelConfig};
use form_tabs_app::{BrowserLocation, BusEvent, Page, PanelContext, ValidationErrors};
use form_tabs_core::FieldDescriptor;
use serde_json::json;
use tempfile::tempdir;

fn fixture_fields() -> Vec<FieldDescriptor> {
    let json = include_str!("fixtures/user_fields.json");
    serde_json::from_str(json).unwrap()
}

fn page(url: &str) -> Page {
    Page::new(BrowserLocation::parse(url).unwrap())
}

#[test]
fn test_fixture_assembles_in_first_seen_order() {
    let mut page = page("https://app.test/resources/users/1");
    let id = page
        .mount(
            PanelConfig::named("User"),
            PanelContext::for_resource("1"),
            fixture_fields(),
        )
        .unwrap();

    let view = page.view(id).unwrap();
    let slugs: Vec<_> = view.tabs.iter().map(|t| t.slug.as_str()).collect();
    assert_eq!(slugs, vec!["general", "company", "person", "posts"]);
    assert_eq!(view.visible, vec!["general", "company", "posts"]);
    assert_eq!(view.tabs[3].class, "relationship-tab");
    assert_eq!(view.tabs[0].fields.len(), 2);
}

#[test]
fn test_switching_type_swaps_tabs_and_heals_selection() {
    let mut page = page("https://app.test/resources/users/1");
    let id = page
        .mount(
            PanelConfig::named("User"),
            PanelContext::for_resource("1"),
            fixture_fields(),
        )
        .unwrap();
    page.click(id, "company").unwrap();
    assert_eq!(page.location().fragment(), "User=company");

    page.emit(BusEvent::AttributeChanged {
        attribute: "type".into(),
        value: json!("person"),
    });

    let view = page.view(id).unwrap();
    assert_eq!(view.visible, vec!["general", "person", "posts"]);
    assert_eq!(view.active.as_deref(), Some("general"));
    // The fragment only follows explicit clicks
    assert_eq!(page.location().fragment(), "User=company");

    // Healing is idempotent
    let again = page.view(id).unwrap();
    assert_eq!(again.active.as_deref(), Some("general"));
}

#[test]
fn test_selection_merges_into_existing_fragment() {
    let mut page = page("https://app.test/resources/users/1#panel1=b&panel2=c");
    let fields = vec![
        FieldDescriptor::new("x", "text-field").in_tab("A", "a", 0),
        FieldDescriptor::new("y", "text-field").in_tab("B", "b", 1),
    ];
    let id = page
        .mount(
            PanelConfig::named("panel1"),
            PanelContext::for_resource("1"),
            fields,
        )
        .unwrap();
    assert!(page.is_active(id, "b").unwrap());
    assert_eq!(page.location().fragment(), "panel1=b&panel2=c");

    page.click(id, "a").unwrap();

    assert_eq!(page.location().fragment(), "panel1=a&panel2=c");
}

#[test]
fn test_malformed_pair_does_not_erase_other_panels() {
    let mut page = page("https://x.test/r/1#p=%FF&other=c");
    let fields = vec![
        FieldDescriptor::new("x", "text-field").in_tab("A", "a", 0),
        FieldDescriptor::new("y", "text-field").in_tab("B", "b", 1),
    ];
    let id = page
        .mount(
            PanelConfig::named("p"),
            PanelContext::for_resource("1"),
            fields,
        )
        .unwrap();

    assert!(page.is_active(id, "a").unwrap());
    let state = page.location().hash_state();
    assert_eq!(state.get("p"), Some("a"));
    assert_eq!(state.get("other"), Some("c"));
}

#[test]
fn test_error_marks_only_owning_tab() {
    let mut page = page("https://app.test/resources/users/1");
    let id = page
        .mount(
            PanelConfig::named("User"),
            PanelContext::for_resource("1"),
            fixture_fields(),
        )
        .unwrap();

    page.set_validation_errors(Some(
        ValidationErrors::new().with("vat_number", "The VAT number is invalid."),
    ));

    let view = page.view(id).unwrap();
    let marked: Vec<_> = view
        .tabs
        .iter()
        .filter(|t| t.has_error)
        .map(|t| t.slug.as_str())
        .collect();
    assert_eq!(marked, vec!["company"]);
    assert_eq!(view.tabs[1].color.as_deref(), Some("red"));
}

#[test]
fn test_tab_position_survives_edit_round_trip() {
    let temp = tempdir().unwrap();
    let dir = temp.path().join(".form-tabs");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("config.toml"),
        "[panel]\nname = \"User\"\nretain_tab_position = true\n",
    )
    .unwrap();
    let settings = load_settings(temp.path());

    let mut page = page("https://app.test/resources/users/1");
    let id = page
        .mount(
            settings.panel,
            PanelContext::for_resource("1"),
            fixture_fields(),
        )
        .unwrap();
    page.click(id, "posts").unwrap();

    let target = page.before_navigate("/resources/users/1/edit").unwrap();
    assert_eq!(target.fragment(), Some("User=posts"));

    // The router clears the fragment before the visit starts
    page.set_location(BrowserLocation::parse("https://app.test/resources/users/1").unwrap());
    assert!(page.navigate_start());
    assert_eq!(page.location().fragment(), "User=posts");
    assert!(!page.navigate_start());
}

#[test]
fn test_two_panels_share_one_bus() {
    let mut page = page("https://app.test/resources/users/1");
    let first = page
        .mount(
            PanelConfig::named("one"),
            PanelContext::for_resource("1"),
            fixture_fields(),
        )
        .unwrap();
    let second = page
        .mount(
            PanelConfig::named("two"),
            PanelContext::for_resource("1"),
            fixture_fields(),
        )
        .unwrap();
    assert_eq!(page.location().fragment(), "one=general&two=general");

    page.emit(BusEvent::AttributeChanged {
        attribute: "type".into(),
        value: json!("person"),
    });

    for id in [first, second] {
        let view = page.view(id).unwrap();
        assert_eq!(view.visible, vec!["general", "person", "posts"]);
    }
}
