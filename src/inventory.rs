//! Occupancy lookup over normalized records.
//!
//! The inventory indexes records by `(drawer, position)` and turns lookup
//! cardinality into a fill: nothing (or an unnamed record) is empty, one named
//! record is occupied, several records are a conflict. Conflicts are a
//! data-quality problem, not a failure: they are logged at error level,
//! collected as [`SlotConflict`]s and drawn with the conflict fill.

use std::collections::HashMap;
use std::fmt;

use glam::DVec2;

use crate::layout::GridLayout;
use crate::log::{debug, error, warn};
use crate::slot::{RowLetters, SlotAddress, drawer_slots, slot_at};
use crate::types::NormalizedRecord;

/// Read-only index over the normalized table.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    records: Vec<NormalizedRecord>,
    index: HashMap<(u32, String), Vec<usize>>,
    drawer_count: u32,
}

impl Inventory {
    pub fn new(records: Vec<NormalizedRecord>) -> Self {
        let mut index: HashMap<(u32, String), Vec<usize>> = HashMap::new();
        for (i, r) in records.iter().enumerate() {
            index.entry((r.drawer, r.position.clone())).or_default().push(i);
        }
        let drawer_count = records.iter().map(|r| r.drawer).max().unwrap_or(0);
        Inventory {
            records,
            index,
            drawer_count,
        }
    }

    /// Highest drawer number in the table; drawers are `1..=drawer_count`.
    pub fn drawer_count(&self) -> u32 {
        self.drawer_count
    }

    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<NormalizedRecord> {
        self.records
    }

    /// Everything stored at `key` in `drawer`.
    pub fn lookup(&self, drawer: u32, key: &str) -> Occupancy<'_> {
        let hits: Vec<&NormalizedRecord> = self
            .index
            .get(&(drawer, key.to_string()))
            .map(|ids| ids.iter().map(|&i| &self.records[i]).collect())
            .unwrap_or_default();
        match hits.len() {
            0 => Occupancy::Vacant,
            1 if hits[0].display_name().is_none() => Occupancy::Unnamed(hits[0]),
            1 => Occupancy::Occupied(hits[0]),
            _ => Occupancy::Conflict(hits),
        }
    }

    /// Records whose `(drawer, position)` names no slot of any drawer that
    /// gets drawn. They are kept in the table but never appear on a page.
    pub fn unplaced(&self, letters: &RowLetters) -> Vec<&NormalizedRecord> {
        self.records
            .iter()
            .filter(|r| slot_at(letters, r.drawer, &r.position).is_none())
            .collect()
    }
}

/// Result of looking a slot up.
#[derive(Debug, Clone, PartialEq)]
pub enum Occupancy<'a> {
    Vacant,
    /// A single record without a sample name.
    Unnamed(&'a NormalizedRecord),
    Occupied(&'a NormalizedRecord),
    /// More than one record claims the slot.
    Conflict(Vec<&'a NormalizedRecord>),
}

impl Occupancy<'_> {
    pub fn cardinality(&self) -> usize {
        match self {
            Occupancy::Vacant => 0,
            Occupancy::Unnamed(_) | Occupancy::Occupied(_) => 1,
            Occupancy::Conflict(all) => all.len(),
        }
    }

    pub fn fill(&self) -> SlotFill {
        match self {
            Occupancy::Vacant | Occupancy::Unnamed(_) => SlotFill::Empty,
            Occupancy::Occupied(_) => SlotFill::Occupied,
            Occupancy::Conflict(_) => SlotFill::Conflict,
        }
    }

    /// Text printed inside an occupied slot.
    pub fn text(&self) -> Option<SlotText> {
        match self {
            Occupancy::Occupied(r) => Some(SlotText {
                name: r.display_name().unwrap_or_default().to_string(),
                date: r.date.as_ref().map(ToString::to_string),
            }),
            _ => None,
        }
    }
}

/// Colour class of a slot; the palette maps it to an actual colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotFill {
    Empty,
    Occupied,
    Conflict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotText {
    pub name: String,
    pub date: Option<String>,
}

/// Several records claim the same slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotConflict {
    pub drawer: u32,
    pub key: String,
    pub count: usize,
    /// Sample names of the competing records, blank names omitted.
    pub names: Vec<String>,
}

impl fmt::Display for SlotConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "multiple matches ({}) at D{}-{}", self.count, self.drawer, self.key)?;
        if !self.names.is_empty() {
            write!(f, ": {}", self.names.join(", "))?;
        }
        Ok(())
    }
}

/// One slot, ready for the page builder.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotView {
    pub address: SlotAddress,
    pub center: DVec2,
    pub fill: SlotFill,
    pub text: Option<SlotText>,
}

/// All slots of one drawer plus the conflicts found while resolving them.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawerPlan {
    pub drawer: u32,
    pub slots: Vec<SlotView>,
    pub conflicts: Vec<SlotConflict>,
}

impl DrawerPlan {
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.fill == SlotFill::Occupied).count()
    }
}

/// Resolve every slot of `drawer` against the inventory.
pub fn plan_drawer(
    inventory: &Inventory,
    letters: &RowLetters,
    layout: &GridLayout,
    drawer: u32,
) -> DrawerPlan {
    let mut slots = Vec::new();
    let mut conflicts = Vec::new();

    for address in drawer_slots(letters, drawer) {
        let occupancy = inventory.lookup(drawer, &address.key);
        match &occupancy {
            Occupancy::Vacant | Occupancy::Unnamed(_) => {
                debug!(drawer, slot = %address.key, "nothing at slot");
            }
            Occupancy::Occupied(r) => {
                debug!(drawer, slot = %address.key, name = ?r.name, "found sample");
            }
            Occupancy::Conflict(all) => {
                let conflict = SlotConflict {
                    drawer,
                    key: address.key.clone(),
                    count: all.len(),
                    names: all
                        .iter()
                        .filter_map(|r| r.display_name())
                        .map(str::to_owned)
                        .collect(),
                };
                error!(drawer, slot = %address.key, count = all.len(), "{}", conflict);
                conflicts.push(conflict);
            }
        }
        slots.push(SlotView {
            center: layout.slot_center(address.row, address.column),
            fill: occupancy.fill(),
            text: occupancy.text(),
            address,
        });
    }

    if !conflicts.is_empty() {
        warn!(drawer, conflicts = conflicts.len(), "drawer has conflicting slots");
    }
    DrawerPlan {
        drawer,
        slots,
        conflicts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::CircleSpec;
    use crate::types::{SampleDate, UNKNOWN};
    use chrono::NaiveDate;

    fn record(drawer: u32, position: &str, name: Option<&str>) -> NormalizedRecord {
        NormalizedRecord {
            drawer,
            position: position.into(),
            name: name.map(str::to_owned),
            date: None,
            organism: UNKNOWN.into(),
            tissue: UNKNOWN.into(),
            disease: UNKNOWN.into(),
        }
    }

    fn layout() -> GridLayout {
        GridLayout::new(&CircleSpec {
            top_left: [0.5, 0.88],
            diameter: 0.068,
            pad: [0.012, 0.012],
            x_shift: 0.04,
        })
        .unwrap()
    }

    #[test]
    fn drawer_count_is_the_highest_drawer() {
        let inv = Inventory::new(vec![record(3, "A1", Some("x")), record(1, "A1", Some("y"))]);
        assert_eq!(inv.drawer_count(), 3);
        assert_eq!(Inventory::new(Vec::new()).drawer_count(), 0);
    }

    #[test]
    fn lookup_cardinality_drives_the_fill() {
        let mut dated = record(1, "B2", Some("HeLa"));
        dated.date = Some(SampleDate::Day(NaiveDate::from_ymd_opt(2016, 11, 4).unwrap()));
        let inv = Inventory::new(vec![
            dated,
            record(1, "B3", None),
            record(1, "B1", Some("")),
            record(1, "A1", Some("one")),
            record(1, "A1", Some("two")),
        ]);

        assert_eq!(inv.lookup(1, "C1"), Occupancy::Vacant);
        assert_eq!(inv.lookup(1, "C1").fill(), SlotFill::Empty);
        assert_eq!(inv.lookup(1, "B3").fill(), SlotFill::Empty);
        assert_eq!(inv.lookup(1, "B1").fill(), SlotFill::Empty);
        assert_eq!(inv.lookup(1, "B1").text(), None);

        let occupied = inv.lookup(1, "B2");
        assert_eq!(occupied.fill(), SlotFill::Occupied);
        assert_eq!(
            occupied.text(),
            Some(SlotText {
                name: "HeLa".into(),
                date: Some("04-11-16".into()),
            })
        );

        let conflict = inv.lookup(1, "A1");
        assert_eq!(conflict.cardinality(), 2);
        assert_eq!(conflict.fill(), SlotFill::Conflict);
        assert_eq!(conflict.text(), None);
        // Same key in another drawer is a different slot.
        assert_eq!(inv.lookup(2, "A1"), Occupancy::Vacant);
    }

    #[test]
    fn duplicate_records_mark_a_conflict_and_the_plan_goes_on() {
        let inv = Inventory::new(vec![
            record(1, "A1", Some("first")),
            record(1, "A1", Some("second")),
            record(1, "K3", Some("last row")),
        ]);
        let plan = plan_drawer(&inv, &RowLetters::default(), &layout(), 1);

        assert_eq!(plan.slots.len(), 69);
        assert_eq!(plan.conflicts.len(), 1);
        let conflict = &plan.conflicts[0];
        assert_eq!((conflict.drawer, conflict.key.as_str(), conflict.count), (1, "A1", 2));
        insta::assert_snapshot!(conflict.to_string(), @"multiple matches (2) at D1-A1: first, second");

        assert_eq!(plan.slots[0].fill, SlotFill::Conflict);
        assert_eq!(plan.occupied(), 1);
        let k3 = plan.slots.iter().find(|s| s.address.key == "K3").unwrap();
        assert_eq!(k3.address.column, 7);
        assert_eq!(k3.center, layout().slot_center(10, 7));
        assert_eq!(k3.fill, SlotFill::Occupied);
    }

    #[test]
    fn records_outside_the_grid_are_unplaced() {
        let inv = Inventory::new(vec![
            record(1, "A1", Some("ok")),
            record(1, "A3", Some("row A has two slots")),
            record(2, "K5", Some("short row has four")),
            record(0, "A1", Some("no drawer zero")),
        ]);
        let unplaced: Vec<_> = inv
            .unplaced(&RowLetters::default())
            .into_iter()
            .map(|r| (r.drawer, r.position.as_str()))
            .collect();
        assert_eq!(unplaced, [(1, "A3"), (2, "K5"), (0, "A1")]);
    }

    #[test]
    fn far_drawer_number_is_checked_per_record() {
        let inv = Inventory::new(vec![
            record(100_000, "K4", Some("mistyped drawer")),
            record(100_000, "K9", Some("and a bad slot")),
        ]);
        assert_eq!(inv.drawer_count(), 100_000);
        let unplaced: Vec<_> = inv
            .unplaced(&RowLetters::default())
            .into_iter()
            .map(|r| r.position.as_str())
            .collect();
        assert_eq!(unplaced, ["K9"]);
    }
}
