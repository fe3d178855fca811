//! Inventory tables: delimited text files and spreadsheet workbooks.
//!
//! Both are read into a [`Table`] of loosely typed cells first; turning rows
//! into [`Record`]s is shared and format-independent.

use std::io;

use calamine::{Data, Reader, open_workbook_auto};
use camino::Utf8Path;
use chrono::{NaiveDate, NaiveDateTime};
use drawermap::config::ColumnNames;
use drawermap::{Record, SampleDate};
use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, info};

/// Text date layouts tried in order; anything else is kept as text.
pub const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%d-%m-%Y"];

#[derive(Error, Diagnostic, Debug)]
pub enum SourceError {
    #[error("cannot read `{path}`")]
    #[diagnostic(code(drawermap::source::csv))]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("cannot open workbook `{path}`")]
    #[diagnostic(code(drawermap::source::workbook))]
    Workbook {
        path: String,
        #[source]
        source: calamine::Error,
    },

    #[error("workbook has no sheet `{sheet}`")]
    #[diagnostic(
        code(drawermap::source::missing_sheet),
        help("available sheets: {available}; pass --sheet or set `main.sheet`")
    )]
    MissingSheet { sheet: String, available: String },

    #[error("inventory has no `{column}` column")]
    #[diagnostic(
        code(drawermap::source::missing_column),
        help("rename the header or map it under `main.columns` in the configuration")
    )]
    MissingColumn { column: String },

    #[error("line {line}: drawer `{value}` is not a positive integer")]
    #[diagnostic(code(drawermap::source::invalid_drawer))]
    InvalidDrawer { line: usize, value: String },

    #[error("unsupported inventory format `{path}`")]
    #[diagnostic(
        code(drawermap::source::format),
        help("use .csv, .tsv, .xlsx, .xlsm, .xlsb, .xls or .ods")
    )]
    UnsupportedFormat { path: String },
}

/// One cell, as much type as the source could tell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

static EMPTY: Cell = Cell::Empty;

impl Cell {
    /// Trimmed text; blank text is an empty cell.
    pub fn text(s: &str) -> Cell {
        let s = s.trim();
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Cell content as a string; integral numbers lose their `.0`.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(format!("{}", *n as i64)),
            Cell::Number(n) => Some(n.to_string()),
            Cell::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        }
    }
}

/// A header row and the data rows under it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Read the table at `path`, picking the reader from the file extension.
/// `sheet` only matters for workbooks.
pub fn load_table(path: &Utf8Path, sheet: &str) -> Result<Table, SourceError> {
    let extension = path.extension().map(str::to_ascii_lowercase);
    info!(%path, "reading inventory");
    match extension.as_deref() {
        Some("csv") => read_delimited_file(path, b','),
        Some("tsv" | "tab") => read_delimited_file(path, b'\t'),
        Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => read_workbook(path, sheet),
        _ => Err(SourceError::UnsupportedFormat {
            path: path.to_string(),
        }),
    }
}

fn read_delimited_file(path: &Utf8Path, delimiter: u8) -> Result<Table, SourceError> {
    let csv_error = |source| SourceError::Csv {
        path: path.to_string(),
        source,
    };
    let file = std::fs::File::open(path).map_err(|e| csv_error(csv::Error::from(e)))?;
    read_delimited(file, delimiter).map_err(csv_error)
}

/// Parse delimited text whose first record is the header.
pub fn read_delimited<R: io::Read>(input: R, delimiter: u8) -> Result<Table, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);
    let headers = reader.headers()?.iter().map(str::to_owned).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(Cell::text).collect());
    }
    Ok(Table { headers, rows })
}

fn read_workbook(path: &Utf8Path, sheet: &str) -> Result<Table, SourceError> {
    let workbook_error = |source| SourceError::Workbook {
        path: path.to_string(),
        source,
    };
    let mut workbook = open_workbook_auto(path).map_err(workbook_error)?;
    let names = workbook.sheet_names();
    if !names.iter().any(|n| n == sheet) {
        return Err(SourceError::MissingSheet {
            sheet: sheet.to_string(),
            available: names.join(", "),
        });
    }
    let range = workbook.worksheet_range(sheet).map_err(workbook_error)?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|header| {
            header
                .iter()
                .map(|d| cell_from_data(d).to_text().unwrap_or_default())
                .collect()
        })
        .unwrap_or_default();
    let rows = rows.map(|row| row.iter().map(cell_from_data).collect()).collect();
    Ok(Table { headers, rows })
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) | Data::DurationIso(s) => Cell::text(s),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(t) => Cell::Date(t.date()),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .map(|t| Cell::Date(t.date()))
            .unwrap_or_else(|_| Cell::text(s)),
        Data::Error(e) => {
            debug!(error = ?e, "treating error cell as empty");
            Cell::Empty
        }
    }
}

/// Turn table rows into records.
///
/// Columns are found by header name. Rows with all seven inventory cells empty
/// are dropped; any other row must carry a positive integer drawer.
pub fn records_from_table(table: &Table, columns: &ColumnNames) -> Result<Vec<Record>, SourceError> {
    let find = |name: &str| {
        table
            .headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| SourceError::MissingColumn {
                column: name.to_string(),
            })
    };
    let index = [
        find(&columns.drawer)?,
        find(&columns.position)?,
        find(&columns.name)?,
        find(&columns.date)?,
        find(&columns.organism)?,
        find(&columns.tissue)?,
        find(&columns.disease)?,
    ];

    let mut records = Vec::with_capacity(table.rows.len());
    let mut blank = 0usize;
    for (i, row) in table.rows.iter().enumerate() {
        let [drawer, position, name, date, organism, tissue, disease] =
            index.map(|c| row.get(c).unwrap_or(&EMPTY));
        if [drawer, position, name, date, organism, tissue, disease]
            .iter()
            .all(|c| c.is_empty())
        {
            blank += 1;
            continue;
        }
        let drawer = parse_drawer(drawer).ok_or_else(|| SourceError::InvalidDrawer {
            // the header is line 1
            line: i + 2,
            value: drawer.to_text().unwrap_or_default(),
        })?;
        records.push(Record {
            drawer,
            position: position.to_text().unwrap_or_default(),
            name: name.to_text(),
            date: sample_date(date),
            organism: organism.to_text(),
            tissue: tissue.to_text(),
            disease: disease.to_text(),
        });
    }

    if blank > 0 {
        debug!(rows = blank, "dropped empty rows");
    }
    info!(records = records.len(), "inventory loaded");
    Ok(records)
}

fn parse_drawer(cell: &Cell) -> Option<u32> {
    let n = match cell {
        Cell::Number(n) => *n,
        Cell::Text(s) => s.parse::<f64>().ok()?,
        Cell::Empty | Cell::Date(_) => return None,
    };
    (n.fract() == 0.0 && n >= 1.0 && n <= f64::from(u32::MAX)).then_some(n as u32)
}

/// Freezing date of a cell: real dates and recognised text become days,
/// other text is kept verbatim.
pub fn sample_date(cell: &Cell) -> Option<SampleDate> {
    match cell {
        Cell::Empty => None,
        Cell::Date(d) => Some(SampleDate::Day(*d)),
        Cell::Text(s) => Some(
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
                .map_or_else(|| SampleDate::Text(s.clone()), SampleDate::Day),
        ),
        Cell::Number(_) => cell.to_text().map(SampleDate::Text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INVENTORY: &str = "\
Tiroir,Position,Name,Date_congel,Organism,Tissue,Disease,Remark
1,A1,HeLa,04.11.2016,Homo sapiens,Cervix,adenocarcinoma,
,,,,,,,only a remark
2, c04 ,A549,2017-03-09,Human,Lung,carcinoma,
3,K2,,,,,,
";

    fn day(y: i32, m: u32, d: u32) -> SampleDate {
        SampleDate::Day(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn csv_rows_become_records() {
        let table = read_delimited(INVENTORY.as_bytes(), b',').unwrap();
        assert_eq!(table.headers.len(), 8);
        assert_eq!(table.rows.len(), 4);

        let records = records_from_table(&table, &ColumnNames::default()).unwrap();
        // the remark-only row has no inventory cell and is dropped
        assert_eq!(records.len(), 3);

        let hela = &records[0];
        assert_eq!((hela.drawer, hela.position.as_str()), (1, "A1"));
        assert_eq!(hela.name.as_deref(), Some("HeLa"));
        assert_eq!(hela.date, Some(day(2016, 11, 4)));
        assert_eq!(hela.organism.as_deref(), Some("Homo sapiens"));

        // trimmed by the reader; canonical spelling is the pipeline's job
        assert_eq!(records[1].position, "c04");
        assert_eq!(records[1].date, Some(day(2017, 3, 9)));

        let unnamed = &records[2];
        assert_eq!(unnamed.name, None);
        assert_eq!(unnamed.date, None);
        assert_eq!(unnamed.disease, None);
    }

    #[test]
    fn tab_separated_input() {
        let table = read_delimited("a\tb\n1\t x \n".as_bytes(), b'\t').unwrap();
        assert_eq!(table.headers, ["a", "b"]);
        assert_eq!(table.rows, [vec![Cell::Text("1".into()), Cell::Text("x".into())]]);
    }

    #[test]
    fn renamed_columns_are_honoured() {
        let table = read_delimited(
            "Drawer,Pos,Sample,Frozen,Species,Organ,Condition\n4,B1,x,,,,\n".as_bytes(),
            b',',
        )
        .unwrap();
        assert!(matches!(
            records_from_table(&table, &ColumnNames::default()),
            Err(SourceError::MissingColumn { column }) if column == "Tiroir"
        ));

        let columns = ColumnNames {
            drawer: "Drawer".into(),
            position: "Pos".into(),
            name: "Sample".into(),
            date: "Frozen".into(),
            organism: "Species".into(),
            tissue: "Organ".into(),
            disease: "Condition".into(),
        };
        let records = records_from_table(&table, &columns).unwrap();
        assert_eq!((records[0].drawer, records[0].position.as_str()), (4, "B1"));
    }

    #[test]
    fn drawer_must_be_a_positive_integer() {
        for (cell, expected) in [
            (Cell::Number(3.0), Some(3)),
            (Cell::Text("12".into()), Some(12)),
            (Cell::Text("2.0".into()), Some(2)),
            (Cell::Number(2.5), None),
            (Cell::Number(0.0), None),
            (Cell::Text("-1".into()), None),
            (Cell::Text("two".into()), None),
            (Cell::Empty, None),
        ] {
            assert_eq!(parse_drawer(&cell), expected, "{cell:?}");
        }

        let table = read_delimited(
            "Tiroir,Position,Name,Date_congel,Organism,Tissue,Disease\n1,A1,a,,,,\nII,A2,b,,,,\n"
                .as_bytes(),
            b',',
        )
        .unwrap();
        let err = records_from_table(&table, &ColumnNames::default()).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"line 3: drawer `II` is not a positive integer");
    }

    #[test]
    fn dates_parse_or_stay_text() {
        assert_eq!(sample_date(&Cell::text("09/03/2017")), Some(day(2017, 3, 9)));
        assert_eq!(sample_date(&Cell::text("09-03-2017")), Some(day(2017, 3, 9)));
        assert_eq!(
            sample_date(&Cell::text("spring 2016")),
            Some(SampleDate::Text("spring 2016".into()))
        );
        assert_eq!(sample_date(&Cell::Number(2016.0)), Some(SampleDate::Text("2016".into())));
        assert_eq!(sample_date(&Cell::Empty), None);
    }

    #[test]
    fn workbook_cells_map_to_table_cells() {
        assert_eq!(cell_from_data(&Data::Float(3.0)).to_text().as_deref(), Some("3"));
        assert_eq!(cell_from_data(&Data::Int(7)), Cell::Number(7.0));
        assert_eq!(cell_from_data(&Data::String("  ".into())), Cell::Empty);
        assert_eq!(
            cell_from_data(&Data::DateTimeIso("2016-11-04T00:00:00".into())),
            Cell::Date(NaiveDate::from_ymd_opt(2016, 11, 4).unwrap())
        );
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_table(Utf8Path::new("inventory.pdf"), "DATABASE").unwrap_err();
        assert!(matches!(err, SourceError::UnsupportedFormat { .. }));
    }
}
