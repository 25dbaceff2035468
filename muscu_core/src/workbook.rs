//! Workbook import and export.
//!
//! The exchanged document is an `.xlsx` workbook with three sheets:
//! `Musculation` (strength log), `Cardio` (cardio log) and `Catégories`
//! (catalog). Sheets are first lowered to raw `Table`s of `Cell`s; typed
//! records are only built from tables, never straight from spreadsheet cells.
//!
//! Columns are located by header name. Each canonical column also accepts a
//! handful of legacy header spellings so that older workbooks still import,
//! but export always writes the canonical schema.

use crate::catalog::{Catalog, CatalogEntry};
use crate::store::SessionStore;
use crate::{
    CardioRecord, Difficulty, Error, Result, StrengthRecord, CARDIO_CATEGORY, NO_SUPERSET,
};
use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
use chrono::{Datelike, Days, NaiveDate};
use fs2::FileExt;
use std::fmt;
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub const STRENGTH_SHEET: &str = "Musculation";
pub const CARDIO_SHEET: &str = "Cardio";
pub const CATALOG_SHEET: &str = "Catégories";

/// Extension appended to the user-chosen base file name
pub const DOCUMENT_EXTENSION: &str = "xlsx";

const STRENGTH_SHEET_ALIASES: &[&str] = &["Strength"];
const CATALOG_SHEET_ALIASES: &[&str] = &["Categories", "Catalogue"];

const DATE_FORMAT: &str = "%d/%m/%Y";

// ============================================================================
// Raw tables
// ============================================================================

/// A single spreadsheet value
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    fn text(s: &str) -> Self {
        if s.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{}", n),
        }
    }
}

/// A header row plus data rows
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// The three-table document exchanged with the user
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub strength: Table,
    pub cardio: Table,
    pub catalog: Table,
}

// ============================================================================
// Schemas
// ============================================================================

/// A canonical column and the legacy header names it also answers to
#[derive(Debug)]
pub struct Column {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub required: bool,
}

const fn col(name: &'static str, aliases: &'static [&'static str]) -> Column {
    Column {
        name,
        aliases,
        required: true,
    }
}

const fn optional(name: &'static str, aliases: &'static [&'static str]) -> Column {
    Column {
        name,
        aliases,
        required: false,
    }
}

const DATE: Column = col("Date", &[]);
const EXERCISE: Column = col("Exercice", &["Exercise"]);
const CATEGORY: Column = col("Catégorie", &["Categorie", "Category"]);
const DIFFICULTY: Column = col("Difficulté", &["Difficulte", "Difficulty"]);
const SUPERSET: Column = optional("Superset", &[]);

pub const STRENGTH_COLUMNS: &[Column] = &[
    DATE,
    EXERCISE,
    CATEGORY,
    col("Charge", &["Charge (kg)", "Load"]),
    DIFFICULTY,
    col("Répétitions", &["Répétition", "Repetitions", "Reps"]),
    col("Séries", &["Série", "Serie", "Series"]),
    col("Repos", &["Temps de repos", "Rest"]),
    SUPERSET,
];

pub const CARDIO_COLUMNS: &[Column] = &[
    DATE,
    EXERCISE,
    CATEGORY,
    col("Durée", &["Durée totale", "Duree", "Duration"]),
    DIFFICULTY,
    col("Temps", &["Splits"]),
    col("Niveaux", &["Levels"]),
];

pub const CATALOG_COLUMNS: &[Column] = &[
    col("Catégorie", &["Categorie", "Category"]),
    col("Exercice", &["Exercise"]),
    optional("Muscle", &["Muscles"]),
];

/// Column of `header` in `table`, ignoring case and surrounding blanks
fn header_position(table: &Table, header: &str) -> Option<usize> {
    let header = header.to_lowercase();
    table
        .headers
        .iter()
        .position(|h| h.trim().to_lowercase() == header)
}

/// Whether a strength table carries the optional `Superset` column
pub fn has_superset_column(table: &Table) -> bool {
    header_position(table, SUPERSET.name).is_some()
}

/// Canonical header row for a schema
fn headers(columns: &[Column]) -> Vec<String> {
    columns.iter().map(|c| c.name.to_string()).collect()
}

/// Where each canonical column of a schema sits in a given table
struct ColumnMap {
    sheet: &'static str,
    indices: Vec<Option<usize>>,
}

impl ColumnMap {
    fn resolve(table: &Table, columns: &[Column], sheet: &'static str) -> Result<Self> {
        let find = |name: &str| header_position(table, name);

        let mut indices = Vec::with_capacity(columns.len());
        for column in columns {
            let index = match find(column.name) {
                Some(i) => Some(i),
                None => {
                    let legacy = column.aliases.iter().find_map(|alias| find(*alias));
                    if legacy.is_some() {
                        tracing::warn!(
                            "Sheet {}: reading column {} from a legacy header",
                            sheet,
                            column.name
                        );
                    }
                    legacy
                }
            };

            if index.is_none() && column.required {
                return Err(Error::MalformedInput(format!(
                    "sheet {} is missing column {}",
                    sheet, column.name
                )));
            }
            indices.push(index);
        }

        Ok(Self { sheet, indices })
    }

    fn row<'a>(&'a self, cells: &'a [Cell], line: usize) -> RowReader<'a> {
        RowReader {
            map: self,
            cells,
            line,
        }
    }
}

/// Typed access to one table row; `line` is the 1-based spreadsheet row
struct RowReader<'a> {
    map: &'a ColumnMap,
    cells: &'a [Cell],
    line: usize,
}

impl RowReader<'_> {
    fn cell(&self, column: usize) -> &Cell {
        self.map.indices[column]
            .and_then(|i| self.cells.get(i))
            .unwrap_or(&EMPTY_CELL)
    }

    fn malformed(&self, message: impl fmt::Display) -> Error {
        Error::MalformedInput(format!(
            "sheet {}, row {}: {}",
            self.map.sheet, self.line, message
        ))
    }

    /// Required text; surrounding blanks are dropped so names match the catalog
    fn text(&self, column: usize, field: &str) -> Result<String> {
        match self.cell(column) {
            Cell::Text(s) => Ok(s.trim().to_string()),
            Cell::Number(n) => Ok(n.to_string()),
            Cell::Empty => Err(self.malformed(format_args!("{} is empty", field))),
        }
    }

    fn optional_text(&self, column: usize) -> Option<String> {
        match self.cell(column) {
            Cell::Empty => None,
            other => Some(other.to_string()),
        }
    }

    fn date(&self, column: usize) -> Result<NaiveDate> {
        let text = self.text(column, "date")?;
        parse_date(&text).ok_or_else(|| self.malformed(format_args!("unparseable date {:?}", text)))
    }

    fn optional_number(&self, column: usize, field: &str) -> Result<Option<f64>> {
        let value = match self.cell(column) {
            Cell::Empty => return Ok(None),
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                self.malformed(format_args!("{} is not a number: {:?}", field, s))
            })?,
        };

        if !value.is_finite() || value < 0.0 {
            return Err(self.malformed(format_args!("{} is out of range: {}", field, value)));
        }
        Ok(Some(value))
    }

    fn number(&self, column: usize, field: &str) -> Result<f64> {
        self.optional_number(column, field)?
            .ok_or_else(|| self.malformed(format_args!("{} is empty", field)))
    }

    fn count(&self, column: usize, field: &str) -> Result<u32> {
        let value = self.number(column, field)?;
        if value < 1.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
            return Err(self.malformed(format_args!(
                "{} must be a positive whole number, got {}",
                field, value
            )));
        }
        Ok(value as u32)
    }

    fn difficulty(&self, column: usize) -> Result<Difficulty> {
        let parsed = match self.cell(column) {
            Cell::Empty => Some(Difficulty::Unset),
            Cell::Number(n) if n.fract() == 0.0 && (0.0..=255.0).contains(n) => {
                Some(Difficulty::Rating(*n as u8))
            }
            Cell::Number(_) => None,
            Cell::Text(s) => Difficulty::parse(s),
        };

        match parsed {
            Some(d) if d.is_valid() => Ok(d),
            _ => Err(self.malformed(format_args!(
                "unknown difficulty {:?}",
                self.cell(column).to_string()
            ))),
        }
    }
}

// ============================================================================
// Dates
// ============================================================================

/// Parse a day-first date (`31/12/2024`, `31-12-2024`, `31.12.2024`) or an ISO date.
///
/// A trailing time part is ignored. Returns None for anything else.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let first = text.split_whitespace().next()?;
    let date_part = first.split('T').next()?;

    ["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d"]
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
        .find(|d| (1900..=9999).contains(&d.year()))
}

/// Day-first text form written to the workbook
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Excel 1900-system serial to calendar date, dropping the time of day
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.floor() as u64))
}

// ============================================================================
// Table <-> records
// ============================================================================

/// Build the strength log from its table; any malformed row fails the whole table
pub fn read_strength(table: &Table) -> Result<Vec<StrengthRecord>> {
    let map = ColumnMap::resolve(table, STRENGTH_COLUMNS, STRENGTH_SHEET)?;

    let mut records = Vec::with_capacity(table.rows.len());
    for (i, cells) in table.rows.iter().enumerate() {
        let row = map.row(cells, i + 2);
        let category = row.text(2, "category")?;
        if category == CARDIO_CATEGORY {
            return Err(row.malformed("cardio session in the strength sheet"));
        }

        records.push(StrengthRecord {
            date: row.date(0)?,
            exercise: row.text(1, "exercise")?,
            category,
            load: row.optional_number(3, "load")?,
            difficulty: row.difficulty(4)?,
            repetitions: row.count(5, "repetitions")?,
            series: row.count(6, "series")?,
            rest: row.count(7, "rest")?,
            superset: row
                .optional_text(8)
                .unwrap_or_else(|| NO_SUPERSET.to_string()),
        });
    }

    Ok(records)
}

/// Build the cardio log from its table; any malformed row fails the whole table
pub fn read_cardio(table: &Table) -> Result<Vec<CardioRecord>> {
    let map = ColumnMap::resolve(table, CARDIO_COLUMNS, CARDIO_SHEET)?;

    let mut records = Vec::with_capacity(table.rows.len());
    for (i, cells) in table.rows.iter().enumerate() {
        let row = map.row(cells, i + 2);
        let category = row.text(2, "category")?;
        if category != CARDIO_CATEGORY {
            return Err(row.malformed(format_args!(
                "category {} in the cardio sheet",
                category
            )));
        }

        records.push(CardioRecord {
            date: row.date(0)?,
            exercise: row.text(1, "exercise")?,
            category,
            duration: row.number(3, "duration")?,
            difficulty: row.difficulty(4)?,
            splits: row.optional_text(5).unwrap_or_default(),
            levels: row.optional_text(6).unwrap_or_default(),
        });
    }

    Ok(records)
}

/// Build the catalog from its table; duplicate pairs are malformed
pub fn read_catalog(table: &Table) -> Result<Catalog> {
    let map = ColumnMap::resolve(table, CATALOG_COLUMNS, CATALOG_SHEET)?;

    let mut entries = Vec::with_capacity(table.rows.len());
    for (i, cells) in table.rows.iter().enumerate() {
        let row = map.row(cells, i + 2);
        entries.push(CatalogEntry {
            category: row.text(0, "category")?,
            exercise: row.text(1, "exercise")?,
            muscle: row.optional_text(2),
        });
    }

    let mut catalog = Catalog::from_entries(entries).map_err(|e| match e {
        Error::DuplicateEntry { category, exercise } => Error::MalformedInput(format!(
            "sheet {} lists {} / {} twice",
            CATALOG_SHEET, category, exercise
        )),
        other => Error::MalformedInput(format!("sheet {}: {}", CATALOG_SHEET, other)),
    })?;

    if map.indices[2].is_some() {
        catalog.keep_muscle_column();
    }
    Ok(catalog)
}

fn difficulty_cell(difficulty: Difficulty) -> Cell {
    match difficulty {
        Difficulty::Unset => Cell::Empty,
        Difficulty::Rating(r) => Cell::Number(f64::from(r)),
        other => Cell::text(other.label().unwrap_or_default()),
    }
}

fn strength_row(r: &StrengthRecord, with_superset: bool) -> Vec<Cell> {
    let mut row = vec![
        Cell::Text(format_date(r.date)),
        Cell::text(&r.exercise),
        Cell::text(&r.category),
        r.load.map(Cell::Number).unwrap_or(Cell::Empty),
        difficulty_cell(r.difficulty),
        Cell::Number(f64::from(r.repetitions)),
        Cell::Number(f64::from(r.series)),
        Cell::Number(f64::from(r.rest)),
    ];
    if with_superset {
        row.push(Cell::text(&r.superset));
    }
    row
}

fn cardio_row(r: &CardioRecord) -> Vec<Cell> {
    vec![
        Cell::Text(format_date(r.date)),
        Cell::text(&r.exercise),
        Cell::text(&r.category),
        Cell::Number(r.duration),
        difficulty_cell(r.difficulty),
        Cell::text(&r.splits),
        Cell::text(&r.levels),
    ]
}

/// Flatten the catalog and both logs into the three-table document
///
/// The optional `Superset` and `Muscle` columns are written when the imported
/// tables had them or when some record needs them.
pub fn export_document(catalog: &Catalog, store: &SessionStore) -> Document {
    let (strength, cardio) = store.snapshot();

    let with_superset = store.has_superset_column();
    let strength_columns = if with_superset {
        STRENGTH_COLUMNS
    } else {
        &STRENGTH_COLUMNS[..STRENGTH_COLUMNS.len() - 1]
    };

    let with_muscle = catalog.has_muscle_column();
    let catalog_columns = if with_muscle {
        CATALOG_COLUMNS
    } else {
        &CATALOG_COLUMNS[..2]
    };
    let catalog_rows = catalog
        .entries()
        .iter()
        .map(|e| {
            let mut row = vec![Cell::text(&e.category), Cell::text(&e.exercise)];
            if with_muscle {
                row.push(e.muscle.as_deref().map(Cell::text).unwrap_or(Cell::Empty));
            }
            row
        })
        .collect();

    Document {
        strength: Table {
            headers: headers(strength_columns),
            rows: strength
                .iter()
                .map(|r| strength_row(r, with_superset))
                .collect(),
        },
        cardio: Table {
            headers: headers(CARDIO_COLUMNS),
            rows: cardio.iter().map(cardio_row).collect(),
        },
        catalog: Table {
            headers: headers(catalog_columns),
            rows: catalog_rows,
        },
    }
}

/// Base file name plus the fixed document extension
pub fn export_file_name(base: &str) -> Result<String> {
    let base = base.trim();
    let base = base
        .strip_suffix(&format!(".{}", DOCUMENT_EXTENSION))
        .unwrap_or(base);
    if base.is_empty() {
        return Err(Error::InvalidInput("file name is empty".into()));
    }
    Ok(format!("{}.{}", base, DOCUMENT_EXTENSION))
}

// ============================================================================
// xlsx codec
// ============================================================================

fn cell_from_data(data: &Data, sheet: &str) -> Result<Cell> {
    let cell = match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => {
            let date = serial_to_date(dt.as_f64()).ok_or_else(|| {
                Error::MalformedInput(format!("sheet {}: invalid date serial", sheet))
            })?;
            Cell::Text(format_date(date))
        }
        Data::DateTimeIso(s) => match parse_date(s) {
            Some(date) => Cell::Text(format_date(date)),
            None => Cell::text(s),
        },
        Data::DurationIso(s) => Cell::text(s),
        Data::Error(e) => {
            return Err(Error::MalformedInput(format!(
                "sheet {}: cell error {:?}",
                sheet, e
            )))
        }
    };
    Ok(cell)
}

fn table_from_range(range: &Range<Data>, sheet: &str) -> Result<Table> {
    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| Error::MalformedInput(format!("sheet {} is empty", sheet)))?;
    let headers = header_row
        .iter()
        .map(|d| cell_from_data(d, sheet).map(|c| c.to_string().trim().to_string()))
        .collect::<Result<Vec<_>>>()?;

    let mut table = Table {
        headers,
        rows: Vec::new(),
    };
    for row in rows {
        let cells = row
            .iter()
            .map(|d| cell_from_data(d, sheet))
            .collect::<Result<Vec<_>>>()?;
        // Formatting can leave blank rows inside the used range
        if cells.iter().all(Cell::is_empty) {
            continue;
        }
        table.rows.push(cells);
    }

    Ok(table)
}

fn find_sheet(names: &[String], wanted: &str, aliases: &[&str]) -> Result<String> {
    let matches = |name: &str, candidate: &str| name.trim().to_lowercase() == candidate.to_lowercase();

    names
        .iter()
        .find(|n| matches(n.as_str(), wanted))
        .or_else(|| {
            names
                .iter()
                .find(|n| aliases.iter().any(|alias| matches(n.as_str(), *alias)))
        })
        .cloned()
        .ok_or_else(|| Error::MalformedInput(format!("workbook has no {} sheet", wanted)))
}

fn write_sheet(workbook: &mut rust_xlsxwriter::Workbook, name: &str, table: &Table) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(name)?;

    for (col, header) in table.headers.iter().enumerate() {
        sheet.write_string(0, col as u16, header.as_str())?;
    }

    for (i, row) in table.rows.iter().enumerate() {
        let line = i as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                Cell::Empty => {}
                Cell::Text(s) => {
                    sheet.write_string(line, col as u16, s.as_str())?;
                }
                Cell::Number(n) => {
                    sheet.write_number(line, col as u16, *n)?;
                }
            }
        }
    }

    Ok(())
}

impl Document {
    /// Parse an uploaded `.xlsx` byte stream
    pub fn from_xlsx_bytes(bytes: &[u8]) -> Result<Self> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;
        let names = workbook.sheet_names();

        let mut read = |wanted: &'static str, aliases: &[&str]| -> Result<Table> {
            let name = find_sheet(&names, wanted, aliases)?;
            let range = workbook.worksheet_range(&name)?;
            table_from_range(&range, wanted)
        };

        let document = Document {
            strength: read(STRENGTH_SHEET, STRENGTH_SHEET_ALIASES)?,
            cardio: read(CARDIO_SHEET, &[])?,
            catalog: read(CATALOG_SHEET, CATALOG_SHEET_ALIASES)?,
        };

        tracing::debug!(
            "Parsed workbook: {} strength rows, {} cardio rows, {} catalog rows",
            document.strength.rows.len(),
            document.cardio.rows.len(),
            document.catalog.rows.len()
        );
        Ok(document)
    }

    /// Serialize to an `.xlsx` byte stream, sheets in canonical order
    pub fn to_xlsx_bytes(&self) -> Result<Vec<u8>> {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        write_sheet(&mut workbook, STRENGTH_SHEET, &self.strength)?;
        write_sheet(&mut workbook, CARDIO_SHEET, &self.cardio)?;
        write_sheet(&mut workbook, CATALOG_SHEET, &self.catalog)?;
        Ok(workbook.save_to_buffer()?)
    }
}

// ============================================================================
// Files
// ============================================================================

/// Read a workbook file from disk
pub fn read_workbook(path: &Path) -> Result<Document> {
    let bytes = std::fs::read(path)?;
    let document = Document::from_xlsx_bytes(&bytes)?;
    tracing::info!("Read workbook {:?}", path);
    Ok(document)
}

/// Write a workbook file, atomically replacing any previous file
///
/// The bytes go to a locked temp file in the target directory, which is
/// synced and then renamed over the destination.
pub fn write_workbook(path: &Path, document: &Document) -> Result<()> {
    let bytes = document.to_xlsx_bytes()?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        writer.write_all(&bytes)?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Wrote workbook {:?} ({} bytes)", path, bytes.len());
    Ok(())
}
