//! The whole run: normalize an inventory and draw every drawer.

use chrono::NaiveDateTime;

use crate::config::Config;
use crate::inventory::{Inventory, SlotConflict, plan_drawer};
use crate::log::{info, warn};
use crate::normalize::normalize;
use crate::render::{Page, PageHeader, build_page, to_svg};
use crate::slot::RowLetters;
use crate::types::{NormalizedRecord, Record};

/// Per-run inputs that do not come from the configuration.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Timestamp printed in every page heading.
    pub generated_at: NaiveDateTime,
    /// Inventory location printed in every page footer.
    pub source_label: String,
}

#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub drawer: u32,
    pub page: Page,
    pub svg: String,
}

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct Rendering {
    /// One page per drawer, drawers `1..=max(drawer)`.
    pub pages: Vec<RenderedPage>,
    /// Slots claimed by more than one record, over all drawers.
    pub conflicts: Vec<SlotConflict>,
    pub records: Vec<NormalizedRecord>,
    /// Records whose position names no slot; they appear on no page.
    pub unplaced: Vec<NormalizedRecord>,
}

/// Normalize `records` and draw every drawer.
///
/// Infallible once the configuration has been validated: conflicting records
/// are reported in [`Rendering::conflicts`] and drawn with the conflict fill.
pub fn render_inventory(config: &Config, records: &[Record], options: &RenderOptions) -> Rendering {
    let records = canonical_positions(records, &config.letters);
    let inventory = Inventory::new(normalize(&records, &config.taxonomy));

    let unplaced: Vec<NormalizedRecord> = inventory
        .unplaced(&config.letters)
        .into_iter()
        .cloned()
        .collect();
    for r in &unplaced {
        warn!(drawer = r.drawer, position = %r.position, name = ?r.name, "record has no slot");
    }

    let drawers = inventory.drawer_count();
    if drawers == 0 {
        warn!("inventory is empty, nothing to draw");
    }
    info!(drawers, "drawing pages");

    let header = PageHeader {
        generated_at: options.generated_at,
        source_label: options.source_label.clone(),
    };
    let mut conflicts = Vec::new();
    let mut pages = Vec::with_capacity(drawers as usize);
    for drawer in 1..=drawers {
        let plan = plan_drawer(&inventory, &config.letters, &config.layout, drawer);
        info!(drawer, occupied = plan.occupied(), "drawing page");
        let page = build_page(&plan, &config.letters, &config.layout, &config.style, &header);
        conflicts.extend(plan.conflicts);
        pages.push(RenderedPage {
            drawer,
            svg: to_svg(&page, &config.style.frame),
            page,
        });
    }

    Rendering {
        pages,
        conflicts,
        records: inventory.into_records(),
        unplaced,
    }
}

/// Trim stored position codes and spell them like the slot keys (`" c04"` is
/// `C4`). Codes that name no configured row are only trimmed.
fn canonical_positions(records: &[Record], letters: &RowLetters) -> Vec<Record> {
    records
        .iter()
        .map(|r| Record {
            position: letters
                .canonical_position(&r.position)
                .unwrap_or_else(|| r.position.trim().to_string()),
            ..r.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(position: &str) -> Record {
        Record {
            drawer: 1,
            position: position.to_string(),
            name: Some("x".into()),
            date: None,
            organism: None,
            tissue: None,
            disease: None,
        }
    }

    #[test]
    fn positions_are_respelled_or_trimmed() {
        let records = [record(" c04 "), record("k3"), record(" Z1 ")];
        let positions: Vec<_> = canonical_positions(&records, &RowLetters::default())
            .into_iter()
            .map(|r| r.position)
            .collect();
        assert_eq!(positions, ["C4", "K3", "Z1"]);
    }
}
