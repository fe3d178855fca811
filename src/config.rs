//! Configuration document
//!
//! One JSON document with three sections: `main` (where the inventory lives and
//! how its columns are named), `clean` (the taxonomy) and `draw` (row letters,
//! slot geometry and page presentation). It is validated once into a [`Config`]
//! that is only ever read afterwards.

use serde::Deserialize;

use crate::errors::ConfigError;
use crate::layout::{CircleSpec, GridLayout};
use crate::render::{EllipseSpec, FontSizes, HeaderText, PageFrame, PageStyle, Palette, PolySpec};
use crate::slot::RowLetters;
use crate::taxonomy::{RawTaxonomy, Taxonomy};
use crate::types::{NumericError, check_finite, check_positive};

/// Sheet read from spreadsheet workbooks unless configured otherwise.
pub const DEFAULT_SHEET: &str = "DATABASE";

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub main: MainSection,
    pub taxonomy: Taxonomy,
    pub letters: RowLetters,
    pub layout: GridLayout,
    pub style: PageStyle,
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Config, ConfigError> {
        let raw: RawConfig = serde_json::from_str(json)?;
        let clean = raw.clean.ok_or(ConfigError::MissingSection { section: "clean" })?;
        let draw = raw.draw.ok_or(ConfigError::MissingSection { section: "draw" })?;
        let letters = draw
            .letters
            .ok_or(ConfigError::MissingSection { section: "draw.letters" })?;
        let circle = draw
            .circle
            .ok_or(ConfigError::MissingSection { section: "draw.circle" })?;

        let config = Config {
            main: raw.main,
            taxonomy: Taxonomy::from_raw(&clean)?,
            letters: RowLetters::new(letters)?,
            layout: GridLayout::new(&circle)?,
            style: PageStyle {
                frame: check_frame(draw.page)?,
                poly: draw.poly,
                ellipse: draw.ellipse,
                fonts: check_fonts(draw.fontsize)?,
                palette: draw.colors,
                header: draw.header,
                logo_path: draw.logo_path,
            },
        };
        Ok(config)
    }
}

/// The `main` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MainSection {
    /// Inventory table, used when none is given on the command line.
    pub db_path: Option<String>,
    pub output_dir: Option<String>,
    /// Worksheet holding the inventory in spreadsheet workbooks.
    pub sheet: String,
    pub columns: ColumnNames,
}

impl Default for MainSection {
    fn default() -> Self {
        MainSection {
            db_path: None,
            output_dir: None,
            sheet: DEFAULT_SHEET.to_string(),
            columns: ColumnNames::default(),
        }
    }
}

/// Header names of the inventory columns.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub drawer: String,
    pub position: String,
    pub name: String,
    pub date: String,
    pub organism: String,
    pub tissue: String,
    pub disease: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        ColumnNames {
            drawer: "Tiroir".into(),
            position: "Position".into(),
            name: "Name".into(),
            date: "Date_congel".into(),
            organism: "Organism".into(),
            tissue: "Tissue".into(),
            disease: "Disease".into(),
        }
    }
}

#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    main: MainSection,
    clean: Option<RawTaxonomy>,
    draw: Option<RawDraw>,
}

#[derive(Deserialize)]
struct RawDraw {
    letters: Option<Vec<String>>,
    circle: Option<CircleSpec>,
    #[serde(default)]
    page: PageFrame,
    #[serde(default)]
    poly: PolySpec,
    #[serde(default)]
    ellipse: EllipseSpec,
    #[serde(default)]
    fontsize: FontSizes,
    #[serde(default)]
    colors: Palette,
    #[serde(default)]
    header: HeaderText,
    logo_path: Option<String>,
}

fn check_frame(frame: PageFrame) -> Result<PageFrame, ConfigError> {
    let geometry = |field: &'static str| move |reason: NumericError| ConfigError::Geometry { field, reason };
    check_positive(frame.width).map_err(geometry("page.width"))?;
    check_positive(frame.height).map_err(geometry("page.height"))?;
    check_positive(frame.dpi).map_err(geometry("page.dpi"))?;
    let [left, bottom, width, height] = frame.axes;
    check_finite(left).map_err(geometry("page.axes"))?;
    check_finite(bottom).map_err(geometry("page.axes"))?;
    check_positive(width).map_err(geometry("page.axes"))?;
    check_positive(height).map_err(geometry("page.axes"))?;
    Ok(frame)
}

fn check_fonts(fonts: FontSizes) -> Result<FontSizes, ConfigError> {
    let sizes = [
        ("fontsize.header1", fonts.header1),
        ("fontsize.header2", fonts.header2),
        ("fontsize.footer", fonts.footer),
        ("fontsize.circle_name", fonts.circle_name),
        ("fontsize.circle_date", fonts.circle_date),
        ("fontsize.side_label", fonts.side_label),
    ];
    for (field, size) in sizes {
        check_positive(size).map_err(|reason| ConfigError::Geometry { field, reason })?;
    }
    Ok(fonts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, Color};

    const MINIMAL: &str = r#"{
        "clean": {
            "organism": {"human": ["human", "hsapiens"], "mouse": ["mouse", "musmusculus"]},
            "disease": {},
            "tissue": {"lung": ["lung"]}
        },
        "draw": {
            "letters": ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K"],
            "circle": {"top_left": [0.5, 0.88], "diameter": 0.068, "pad": [0.012, 0.012], "x_shift": 0.04}
        }
    }"#;

    fn with_draw(extra: &str) -> String {
        MINIMAL.replacen(r#""draw": {"#, &format!(r#""draw": {{ {extra},"#), 1)
    }

    #[test]
    fn minimal_document_gets_the_defaults() {
        let config = Config::from_json_str(MINIMAL).unwrap();
        assert_eq!(config.main, MainSection::default());
        assert_eq!(config.main.sheet, "DATABASE");
        assert_eq!(config.main.columns.drawer, "Tiroir");
        assert_eq!(config.style, PageStyle::default());
        assert_eq!(config.letters, RowLetters::default());
        assert_eq!(config.layout.diameter, 0.068);
        let keys: Vec<_> = config
            .taxonomy
            .vocabulary(Category::Organism)
            .keys
            .iter()
            .map(|k| k.name.as_str())
            .collect();
        assert_eq!(keys, ["human", "mouse"]);
    }

    #[test]
    fn presentation_sections_override_the_defaults() {
        let json = with_draw(
            r##""colors": {"occupied": [0.5, 0.5, 0.5], "conflict": "#ff0000"},
                "fontsize": {"circle_name": 7},
                "header": {"drawer_label": "Tiroir", "department": ["Service de médecine"]},
                "logo_path": "logo.png""##,
        );
        let config = Config::from_json_str(&json).unwrap();
        let style = &config.style;
        assert_eq!(style.palette.occupied, Color::Rgb(128, 128, 128));
        assert_eq!(style.palette.conflict, Color::Rgb(255, 0, 0));
        assert_eq!(style.palette.empty, Color::named("white"));
        assert_eq!(style.fonts.circle_name, 7.0);
        assert_eq!(style.fonts.circle_date, 5.0);
        assert_eq!(style.header.drawer_label, "Tiroir");
        assert_eq!(style.header.date_label, "Date");
        assert_eq!(style.logo_path.as_deref(), Some("logo.png"));
    }

    #[test]
    fn main_section_names_the_columns() {
        let json = MINIMAL.replacen(
            "{",
            r#"{"main": {"db_path": "db.xlsx", "sheet": "Stock", "columns": {"drawer": "Drawer"}},"#,
            1,
        );
        let config = Config::from_json_str(&json).unwrap();
        assert_eq!(config.main.db_path.as_deref(), Some("db.xlsx"));
        assert_eq!(config.main.sheet, "Stock");
        assert_eq!(config.main.columns.drawer, "Drawer");
        assert_eq!(config.main.columns.position, "Position");
    }

    #[test]
    fn mandatory_sections_are_reported() {
        let err = Config::from_json_str(r#"{"draw": {}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSection { section: "clean" }));

        let no_circle = MINIMAL.replace(r#""circle""#, r#""ring""#);
        let err = Config::from_json_str(&no_circle).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSection { section: "draw.circle" }));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let short = MINIMAL.replace(r#", "K"]"#, "]");
        assert!(matches!(
            Config::from_json_str(&short),
            Err(ConfigError::RowLetters { expected: 11, found: 10 })
        ));

        let bad_font = with_draw(r#""fontsize": {"footer": 0}"#);
        assert!(matches!(
            Config::from_json_str(&bad_font),
            Err(ConfigError::Geometry { field: "fontsize.footer", .. })
        ));

        let bad_page = with_draw(r#""page": {"axes": [0.05, 0.05, 0.0, 0.9]}"#);
        assert!(matches!(
            Config::from_json_str(&bad_page),
            Err(ConfigError::Geometry { field: "page.axes", .. })
        ));

        let bad_color = with_draw(r#""colors": {"empty": "not a color"}"#);
        assert!(matches!(Config::from_json_str(&bad_color), Err(ConfigError::Json(_))));

        let missing_category = MINIMAL.replace(r#""disease": {},"#, "");
        assert!(matches!(
            Config::from_json_str(&missing_category),
            Err(ConfigError::MissingCategory { category: "disease" })
        ));

        assert!(matches!(Config::from_json_str("{"), Err(ConfigError::Json(_))));
    }
}
