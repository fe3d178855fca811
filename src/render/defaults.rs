//! Default page settings, used for every presentation key the configuration leaves out

/// Page size in inches.
pub const PAGE_WIDTH: f64 = 7.0;
pub const PAGE_HEIGHT: f64 = 10.0;
/// Axes rectangle as `[left, bottom, width, height]` figure fractions.
pub const AXES: [f64; 4] = [0.05, 0.05, 0.95, 0.9];
/// Pixels per inch; 72 makes one font point one pixel.
pub const DPI: f64 = 72.0;

// Font sizes, in points
pub const HEADER1_SIZE: f64 = 20.0;
pub const HEADER2_SIZE: f64 = 11.0;
pub const FOOTER_SIZE: f64 = 7.0;
pub const CIRCLE_NAME_SIZE: f64 = 6.0;
pub const CIRCLE_DATE_SIZE: f64 = 5.0;
pub const SIDE_LABEL_SIZE: f64 = 9.0;

// Slot fills
pub const EMPTY_COLOR: &str = "white";
pub const OCCUPIED_RGB: [f64; 3] = [0.9, 0.9, 0.9];
pub const CONFLICT_COLOR: &str = "red";
pub const OUTLINE_COLOR: &str = "black";

// Rack base, in axes units
pub const POLY_BOT_LEFT: [f64; 2] = [0.03, 0.02];
pub const POLY_TOP_LEFT: [f64; 2] = [0.44, 0.95];
pub const POLY_TOP_RIGHT: [f64; 2] = [0.64, 0.95];
pub const POLY_BOT_RIGHT: [f64; 2] = [1.03, 0.02];
pub const POLY_RGB: [f64; 3] = [0.85, 0.85, 0.85];
pub const ELLIPSE_CENTER: [f64; 2] = [0.53, 0.02];
pub const ELLIPSE_WIDTH: f64 = 1.0;
pub const ELLIPSE_HEIGHT: f64 = 0.05;
pub const ELLIPSE_RGB: [f64; 3] = [0.85, 0.85, 0.85];

// Heading and footer text, in axes units
pub const TITLE_AT: [f64; 2] = [0.0, 1.01];
pub const TIMESTAMP_AT: [f64; 2] = [0.0, 0.97];
pub const FOOTER_AT: [f64; 2] = [-0.02, -0.03];
pub const DEPARTMENT_X: f64 = 0.98;
pub const DEPARTMENT_TOP: f64 = 0.96;
pub const DEPARTMENT_STEP: f64 = 0.02;
/// Logo rectangle as `[left, bottom, width, height]` figure fractions.
pub const LOGO_RECT: [f64; 4] = [0.82, 0.92, 0.15, 0.08];

pub const DRAWER_LABEL: &str = "Drawer";
pub const DATE_LABEL: &str = "Date";
pub const PATH_LABEL: &str = "Database file";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Stroke widths and arrow heads, in points
pub const OUTLINE_WIDTH: f64 = 2.0;
pub const ARROW_WIDTH: f64 = 0.8;
pub const ARROW_HEAD_LEN: f64 = 5.0;
pub const ARROW_HEAD_WIDTH: f64 = 3.5;
