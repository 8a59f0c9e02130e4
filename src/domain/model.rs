use crate::utils::error::{DashboardError, Result};

/// 表格資料集：欄位名稱加上等長的列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Dataset {
    /// Every row must hold exactly one value (possibly null) per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Result<Self> {
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(DashboardError::ProcessingError {
                message: format!(
                    "row {} has {} values but the dataset declares {} columns",
                    index,
                    row.len(),
                    columns.len()
                ),
            });
        }

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn head(&self, n: usize) -> &[Vec<Option<String>>] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Looks up a single cell by row index and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(col)?.as_deref()
    }

    pub fn column_kinds(&self) -> Vec<ColumnKind> {
        (0..self.columns.len())
            .map(|col| {
                ColumnKind::infer(
                    self.rows
                        .iter()
                        .filter_map(|row| row[col].as_deref()),
                )
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Boolean,
    Text,
    Empty,
}

impl ColumnKind {
    /// Narrowest kind that accepts every non-null value.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut kind = ColumnKind::Empty;

        for value in values {
            let value = value.trim();
            let this = if value.parse::<i64>().is_ok() {
                ColumnKind::Integer
            } else if value.parse::<f64>().is_ok() {
                ColumnKind::Float
            } else if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false") {
                ColumnKind::Boolean
            } else {
                return ColumnKind::Text;
            };

            kind = match (kind, this) {
                (ColumnKind::Empty, k) => k,
                (a, b) if a == b => a,
                (ColumnKind::Integer, ColumnKind::Float) | (ColumnKind::Float, ColumnKind::Integer) => {
                    ColumnKind::Float
                }
                _ => return ColumnKind::Text,
            };
        }

        kind
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }
}

/// 使用者資料來源的單選項目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceChoice {
    #[default]
    UrlEntry,
    Upload,
}

impl SourceChoice {
    pub fn label(&self) -> &'static str {
        match self {
            SourceChoice::UrlEntry => "Enter Google Sheet CSV URL",
            SourceChoice::Upload => "Upload CSV",
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            SourceChoice::UrlEntry => "url",
            SourceChoice::Upload => "upload",
        }
    }

    /// Unknown values fall back to the default choice.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("upload") => SourceChoice::Upload,
            _ => SourceChoice::UrlEntry,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content: Vec<u8>,
}

/// What the user asked for on this render.
#[derive(Debug)]
pub enum UserRequest {
    Url(String),
    Upload(Option<UploadedFile>),
    /// The upload could not be received at all (e.g. over the size limit).
    UploadRejected(DashboardError),
}

impl UserRequest {
    pub fn choice(&self) -> SourceChoice {
        match self {
            UserRequest::Url(_) => SourceChoice::UrlEntry,
            UserRequest::Upload(_) | UserRequest::UploadRejected(_) => SourceChoice::Upload,
        }
    }
}

impl Default for UserRequest {
    fn default() -> Self {
        UserRequest::Url(String::new())
    }
}
