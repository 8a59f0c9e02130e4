use crate::core::loader::DatasetLoader;
use crate::core::{ConfigProvider, Dataset};
use crate::domain::model::{SourceChoice, UserRequest};
use crate::utils::error::{DashboardError, Result};
use serde::Serialize;

pub const CAPTION: &str =
    "Connect to a publicly accessible Google Sheet (CSV export) or upload a CSV.";

/// Everything the page template needs for one render.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub title: String,
    pub caption: &'static str,
    pub fixed_csv_url: String,
    pub fixed: SectionView,
    pub choices: Vec<ChoiceView>,
    pub upload_selected: bool,
    pub url_input: String,
    pub user: SectionView,
    pub rendered_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChoiceView {
    pub value: &'static str,
    pub label: &'static str,
    pub checked: bool,
}

/// Outcome of one data section: idle, a table, or an error message.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SectionView {
    pub success: Option<String>,
    pub error: Option<String>,
    pub table: Option<TableView>,
}

impl SectionView {
    fn loaded(success: Option<&str>, table: TableView) -> Self {
        Self {
            success: success.map(str::to_string),
            error: None,
            table: Some(table),
        }
    }

    fn failed(message: String) -> Self {
        Self {
            error: Some(message),
            ..Default::default()
        }
    }

    pub fn is_idle(&self) -> bool {
        self.table.is_none() && self.error.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub rows_label: String,
    pub columns_label: String,
    pub header: Vec<HeaderView>,
    pub rows: Vec<RowView>,
    pub shown: usize,
    pub truncated: bool,
    /// Put the `Rows/Columns` line under the table instead of above it.
    pub shape_last: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeaderView {
    pub name: String,
    pub numeric: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowView {
    pub index: usize,
    pub cells: Vec<CellView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CellView {
    pub value: Option<String>,
    pub numeric: bool,
}

impl TableView {
    pub fn from_dataset(dataset: &Dataset, preview_rows: usize) -> Self {
        let kinds = dataset.column_kinds();

        let header = dataset
            .columns()
            .iter()
            .zip(&kinds)
            .map(|(name, kind)| HeaderView {
                name: name.clone(),
                numeric: kind.is_numeric(),
            })
            .collect();

        let rows: Vec<RowView> = dataset
            .head(preview_rows)
            .iter()
            .enumerate()
            .map(|(index, row)| RowView {
                index,
                cells: row
                    .iter()
                    .zip(&kinds)
                    .map(|(value, kind)| CellView {
                        value: value.clone(),
                        numeric: kind.is_numeric(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            rows_label: format_count(dataset.row_count()),
            columns_label: format_count(dataset.column_count()),
            header,
            shown: rows.len(),
            rows,
            truncated: dataset.row_count() > preview_rows,
            shape_last: false,
        }
    }

    fn with_shape_last(mut self) -> Self {
        self.shape_last = true;
        self
    }
}

/// 1234567 -> "1,234,567"
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Renders the page top to bottom for a single request. Nothing survives
/// between renders.
pub struct Dashboard<C: ConfigProvider> {
    config: C,
    loader: DatasetLoader,
}

impl<C: ConfigProvider> Dashboard<C> {
    pub fn new(config: C) -> Result<Self> {
        let loader = DatasetLoader::new(config.request_timeout())?;
        Ok(Self { config, loader })
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub async fn render(&self, request: UserRequest) -> PageView {
        let fixed = self.fixed_section().await;

        let choice = request.choice();
        let url_input = match &request {
            UserRequest::Url(url) => url.clone(),
            UserRequest::Upload(_) | UserRequest::UploadRejected(_) => String::new(),
        };
        let user = self.user_section(request).await;

        PageView {
            title: self.config.page_title().to_string(),
            caption: CAPTION,
            fixed_csv_url: self.config.fixed_csv_url().to_string(),
            fixed,
            choices: [SourceChoice::UrlEntry, SourceChoice::Upload]
                .into_iter()
                .map(|c| ChoiceView {
                    value: c.as_param(),
                    label: c.label(),
                    checked: c == choice,
                })
                .collect(),
            upload_selected: choice == SourceChoice::Upload,
            url_input,
            user,
            rendered_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    async fn fixed_section(&self) -> SectionView {
        match self.loader.load_url(self.config.fixed_csv_url()).await {
            Ok(dataset) => {
                SectionView::loaded(
                None,
                TableView::from_dataset(&dataset, self.config.preview_rows()).with_shape_last(),
            )
            }
            Err(e) => {
                tracing::error!(
                    "❌ Configured CSV URL failed: {} (Category: {:?})",
                    e,
                    e.category()
                );
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                SectionView::failed(format!("Unable to read CSV from the configured URL. ({})", e))
            }
        }
    }

    async fn user_section(&self, request: UserRequest) -> SectionView {
        let preview_rows = self.config.preview_rows();

        match request {
            UserRequest::Url(url) => {
                let url = url.trim();
                if url.is_empty() {
                    return SectionView::default();
                }
                match self.loader.load_url(url).await {
                    Ok(dataset) => SectionView::loaded(
                        Some("Loaded data from the provided CSV URL."),
                        TableView::from_dataset(&dataset, preview_rows),
                    ),
                    Err(e) => {
                        tracing::warn!("User CSV URL failed: {}", e);
                        SectionView::failed(format!(
                            "Unable to read CSV from the provided URL. ({})",
                            e
                        ))
                    }
                }
            }
            UserRequest::Upload(None) => SectionView::default(),
            UserRequest::Upload(Some(file)) => match self.loader.load_upload(file).await {
                Ok(dataset) => SectionView::loaded(
                    Some("Loaded data from the uploaded file."),
                    TableView::from_dataset(&dataset, preview_rows),
                ),
                Err(e) => upload_failed(e),
            },
            UserRequest::UploadRejected(e) => upload_failed(e),
        }
    }
}

fn upload_failed(e: DashboardError) -> SectionView {
    tracing::warn!("Uploaded CSV failed: {}", e);
    SectionView::failed(format!("Unable to read the uploaded CSV. ({})", e))
}
