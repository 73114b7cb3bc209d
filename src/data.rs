use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Public copy of the Wooldridge `alcohol` dataset.
pub const DEFAULT_SOURCE: &str =
    "https://raw.githubusercontent.com/vincentarelbundock/Rdatasets/master/csv/wooldridge/alcohol.csv";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Immutable, column-oriented record table.
///
/// Every cell is stored as `f64`; missing cells (`""`, `NA`, `NaN`) become `NaN`.
/// Once built the table is never mutated, so it can be shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct RecordTable {
    headers: Vec<String>,
    columns: Vec<Vec<f64>>,
    row_count: usize,
}

impl RecordTable {
    /// Build a table from string rows, parsing every cell as a number.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if headers.is_empty() {
            bail!("CSV must contain a header row");
        }
        if rows.is_empty() {
            bail!("CSV must contain at least one data row");
        }

        let mut columns = vec![Vec::with_capacity(rows.len()); headers.len()];
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                bail!(
                    "Row {} has {} fields, expected {}",
                    row_idx + 1,
                    row.len(),
                    headers.len()
                );
            }
            for (col_idx, cell) in row.iter().enumerate() {
                let value = parse_cell(cell).ok_or_else(|| {
                    anyhow!(
                        "Non-numeric value '{}' in column '{}' at row {}",
                        cell,
                        headers[col_idx],
                        row_idx + 1
                    )
                })?;
                columns[col_idx].push(value);
            }
        }

        Ok(Self {
            headers,
            columns,
            row_count: rows.len(),
        })
    }

    /// Parse CSV text from any reader. The first record is the header.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()
            .context("Failed to read CSV header")?
            .iter()
            .map(normalize_header)
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record.context("Failed to read CSV record")?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Self::new(headers, rows)
    }

    /// Create a table from a JSON array of objects, keyed by the first object's fields.
    pub fn from_json(value: &Value) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| anyhow!("Input data must be a JSON array of objects"))?;

        let first_obj = array
            .first()
            .ok_or_else(|| anyhow!("Input data array is empty"))?
            .as_object()
            .ok_or_else(|| anyhow!("Items in array must be objects"))?;

        let headers: Vec<String> = first_obj.keys().cloned().collect();

        let mut rows = Vec::with_capacity(array.len());
        for item in array {
            let obj = item
                .as_object()
                .ok_or_else(|| anyhow!("Items in array must be objects"))?;

            let mut row = Vec::with_capacity(headers.len());
            for header in &headers {
                let val_str = match obj.get(header) {
                    Some(Value::Number(n)) => n.to_string(),
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Bool(b)) => if *b { "1" } else { "0" }.to_string(),
                    Some(Value::Null) | None => String::new(),
                    _ => return Err(anyhow!("Unsupported value type for field '{}'", header)),
                };
                row.push(val_str);
            }
            rows.push(row);
        }

        Self::new(headers, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Case-insensitive column lookup.
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        let idx = self
            .headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| anyhow!("Column '{}' not found", name))?;
        Ok(&self.columns[idx])
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h.eq_ignore_ascii_case(name))
    }

    /// Values of `value_col` for every row where `keep` holds on `filter_col`.
    ///
    /// Rows whose value is missing are skipped.
    pub fn select<F>(&self, value_col: &str, filter_col: &str, keep: F) -> Result<Vec<f64>>
    where
        F: Fn(f64) -> bool,
    {
        let values = self.column(value_col)?;
        let filter = self.column(filter_col)?;
        Ok(values
            .iter()
            .zip(filter)
            .filter(|&(v, &f)| !v.is_nan() && keep(f))
            .map(|(&v, _)| v)
            .collect())
    }

    /// Fail if any of `required` is missing from the header.
    pub fn require_columns<'a, I>(&self, required: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let missing: Vec<&str> = required
            .into_iter()
            .filter(|name| !self.has_column(name))
            .collect();
        if !missing.is_empty() {
            bail!("Dataset is missing required columns: {}", missing.join(", "));
        }
        Ok(())
    }
}

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Url(String),
    File(String),
    Stdin,
}

impl DataSource {
    pub fn parse(source: &str) -> Self {
        if source == "-" {
            DataSource::Stdin
        } else if source.starts_with("http://") || source.starts_with("https://") {
            DataSource::Url(source.to_string())
        } else {
            DataSource::File(source.to_string())
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{}", url),
            DataSource::File(path) => write!(f, "{}", path),
            DataSource::Stdin => write!(f, "<stdin>"),
        }
    }
}

/// Load the record table once. Any failure here is fatal for the caller.
pub fn load(source: &DataSource) -> Result<RecordTable> {
    info!(%source, "loading dataset");
    let table = match source {
        DataSource::Url(url) => fetch_url(url)?,
        DataSource::File(path) => read_file(Path::new(path))?,
        DataSource::Stdin => RecordTable::from_reader(std::io::stdin().lock())
            .context("Failed to read CSV from stdin")?,
    };
    info!(rows = table.len(), columns = table.headers().len(), "dataset loaded");
    Ok(table)
}

fn fetch_url(url: &str) -> Result<RecordTable> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;
    let response = client
        .get(url)
        .send()
        .with_context(|| format!("Failed to fetch dataset from {}", url))?
        .error_for_status()
        .with_context(|| format!("Dataset request to {} failed", url))?;
    let body = response.bytes().context("Failed to read dataset body")?;
    debug!(bytes = body.len(), "dataset downloaded");
    RecordTable::from_reader(body.as_ref()).with_context(|| format!("Failed to parse CSV from {}", url))
}

fn read_file(path: &Path) -> Result<RecordTable> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let value: Value = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse JSON in {}", path.display()))?;
        return RecordTable::from_json(&value);
    }

    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    RecordTable::from_reader(file).with_context(|| format!("Failed to parse CSV in {}", path.display()))
}

fn parse_cell(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("na") || cell.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }
    cell.parse::<f64>().ok()
}

// R exports an unnamed row-index column; give it a usable name.
fn normalize_header(header: &str) -> String {
    let header = header.trim().trim_matches('"');
    if header.is_empty() {
        "rownames".to_string()
    } else {
        header.to_string()
    }
}
