//! End-to-end runs of the library pipeline on small inventories.

use chrono::NaiveDate;
use drawermap::types::UNKNOWN;
use drawermap::{Config, Record, RenderOptions, SampleDate, render_inventory};

const CONFIG: &str = r#"{
    "main": {"db_path": "inventory.xlsx"},
    "clean": {
        "organism": {"human": ["human", "hsapiens"], "mouse": ["mouse", "musmusculus"]},
        "disease": {"cancer": ["carcinoma"], "healthy": ["normal"]},
        "tissue": {"lung": ["lung"]}
    },
    "draw": {
        "letters": ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K"],
        "circle": {"top_left": [0.5, 0.88], "diameter": 0.068, "pad": [0.012, 0.012], "x_shift": 0.04},
        "header": {"drawer_label": "Tiroir", "department": ["Service de médecine"]}
    }
}"#;

fn options() -> RenderOptions {
    RenderOptions {
        generated_at: NaiveDate::from_ymd_opt(2017, 5, 2)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap(),
        source_label: "inventory.xlsx".into(),
    }
}

fn record(drawer: u32, position: &str, name: &str) -> Record {
    Record {
        drawer,
        position: position.into(),
        name: Some(name.into()),
        ..Default::default()
    }
}

#[test]
fn one_page_per_drawer_up_to_the_highest() {
    let config = Config::from_json_str(CONFIG).unwrap();
    let records = vec![
        Record {
            organism: Some("Mus_musculus ".into()),
            disease: Some("Lung carcinoma".into()),
            tissue: Some("lung".into()),
            date: Some(SampleDate::Day(NaiveDate::from_ymd_opt(2016, 11, 4).unwrap())),
            ..record(1, "B2", "LLC")
        },
        record(3, "K3", "HeLa"),
    ];
    let run = render_inventory(&config, &records, &options());

    let drawers: Vec<_> = run.pages.iter().map(|p| p.drawer).collect();
    assert_eq!(drawers, [1, 2, 3]);
    assert!(run.conflicts.is_empty());
    assert!(run.unplaced.is_empty());

    let llc = &run.records[0];
    assert_eq!(
        (llc.organism.as_str(), llc.disease.as_str(), llc.tissue.as_str()),
        ("mouse", "cancer", "lung")
    );
    assert_eq!(run.records[1].organism, UNKNOWN);

    let first = &run.pages[0].svg;
    assert!(first.starts_with("<svg "));
    assert!(first.trim_end().ends_with("</svg>"));
    assert!(first.contains(r#"<tspan font-weight="bold">Tiroir</tspan> 1"#));
    assert!(first.contains(">LLC</text>"));
    assert!(first.contains(">04-11-16</text>"));
    assert!(first.contains(">Service de médecine</text>"));
    assert!(first.contains("inventory.xlsx"));
    assert!(first.contains("2017-05-02 09:30:00"));
    assert!(first.contains(r#"fill="rgb(230,230,230)""#));

    // drawer 2 exists only because drawer 3 does
    assert!(!run.pages[1].svg.contains("HeLa"));
    assert!(run.pages[2].svg.contains(">HeLa</text>"));
}

#[test]
fn duplicate_slot_is_reported_and_the_run_continues() {
    let config = Config::from_json_str(CONFIG).unwrap();
    let records = vec![
        record(1, "A1", "first"),
        record(1, "A1", "second"),
        record(2, "C4", "later drawer"),
    ];
    let run = render_inventory(&config, &records, &options());

    assert_eq!(run.pages.len(), 2);
    assert_eq!(run.conflicts.len(), 1);
    let conflict = &run.conflicts[0];
    assert_eq!((conflict.drawer, conflict.key.as_str(), conflict.count), (1, "A1", 2));
    assert!(run.pages[0].svg.contains(r#"fill="red""#));
    assert!(!run.pages[0].svg.contains(">first</text>"));
    assert!(run.pages[1].svg.contains(">later drawer</text>"));
}

#[test]
fn stored_codes_are_matched_after_canonicalisation() {
    let config = Config::from_json_str(CONFIG).unwrap();
    let records = vec![
        record(1, " c04 ", "padded"),
        record(1, "A9", "no such column"),
        record(1, "Z1", "no such row"),
    ];
    let run = render_inventory(&config, &records, &options());

    assert_eq!(run.records[0].position, "C4");
    assert!(run.pages[0].svg.contains(">padded</text>"));
    let unplaced: Vec<_> = run.unplaced.iter().map(|r| r.position.as_str()).collect();
    assert_eq!(unplaced, ["A9", "Z1"]);
}

#[test]
fn empty_inventory_draws_nothing() {
    let config = Config::from_json_str(CONFIG).unwrap();
    let run = render_inventory(&config, &[], &options());
    assert!(run.pages.is_empty());
    assert!(run.records.is_empty());
}

#[test]
fn unnamed_record_leaves_its_slot_empty() {
    let config = Config::from_json_str(CONFIG).unwrap();
    let records = vec![Record {
        drawer: 1,
        position: "A2".into(),
        ..Default::default()
    }];
    let run = render_inventory(&config, &records, &options());
    assert_eq!(run.pages.len(), 1);
    assert!(!run.pages[0].svg.contains("rgb(230,230,230)"));
}
