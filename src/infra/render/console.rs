use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::domain::entities::dataset::{FilterControls, OwnedSet, Record, VariantPage};
use crate::usecase::ports::view::ViewEvents;

pub const EMPTY_STATE_MESSAGE: &str = "no variants match the current filter";

/// Header row: the chosen fields when set, otherwise every record key in
/// first-seen order.
pub fn page_columns(records: &[Record], visible_fields: Option<&[String]>) -> Vec<String> {
    if let Some(fields) = visible_fields {
        return fields.to_vec();
    }
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !columns.iter().any(|column| column == key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

fn cell_to_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

pub fn write_page_csv<W: Write>(
    writer: W,
    records: &[Record],
    columns: &[String],
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(columns)
        .context("failed to write csv header")?;
    for record in records {
        csv_writer
            .write_record(columns.iter().map(|column| cell_to_string(record.get(column))))
            .context("failed to write csv row")?;
    }
    csv_writer.flush().context("failed to flush csv output")?;
    Ok(())
}

/// Lists the variant sets the signed-in account owns in this scope.
pub fn write_owned_sets_csv<W: Write>(writer: W, sets: &[OwnedSet]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(["id", "label"])
        .context("failed to write csv header")?;
    for set in sets {
        csv_writer
            .write_record([set.id.0.as_str(), set.label.as_str()])
            .context("failed to write csv row")?;
    }
    csv_writer.flush().context("failed to flush csv output")?;
    Ok(())
}

/// Terminal renderer: pages go to the writer as CSV, everything else to the
/// log.
pub struct ConsoleRenderer {
    out: Mutex<Box<dyn Write + Send>>,
    visible_fields: Option<Vec<String>>,
    status: Mutex<String>,
    last_error: Mutex<Option<String>>,
}

impl ConsoleRenderer {
    pub fn new(out: Box<dyn Write + Send>, visible_fields: Option<Vec<String>>) -> Self {
        Self {
            out: Mutex::new(out),
            visible_fields,
            status: Mutex::new("ready".to_string()),
            last_error: Mutex::new(None),
        }
    }

    pub fn stdout(visible_fields: Option<Vec<String>>) -> Self {
        Self::new(Box::new(std::io::stdout()), visible_fields)
    }

    pub fn status(&self) -> String {
        lock(&self.status).clone()
    }

    pub fn last_error(&self) -> Option<String> {
        lock(&self.last_error).clone()
    }

    fn set_status(&self, status: impl Into<String>) {
        *lock(&self.status) = status.into();
    }

    fn show_error(&self, message: &str) {
        tracing::error!("{message}");
        *lock(&self.last_error) = Some(message.to_string());
        self.set_status(format!("error: {message}"));
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ViewEvents for ConsoleRenderer {
    fn on_loading_start(&self) {
        tracing::debug!("loading");
        self.set_status("loading");
    }

    fn on_loading_done(&self) {
        tracing::debug!("loading done");
        if self.last_error().is_none() {
            self.set_status("ready");
        }
    }

    fn on_controls_ready(&self, controls: &FilterControls) {
        tracing::debug!(
            sets = controls.owned_sets.len(),
            filterable_fields = controls.filterable_fields.len(),
            "controls ready"
        );
    }

    fn on_page_rendered(&self, page: &VariantPage) {
        if page.is_empty() {
            tracing::info!("{EMPTY_STATE_MESSAGE}");
            self.set_status(EMPTY_STATE_MESSAGE);
            return;
        }
        let columns = page_columns(&page.records, self.visible_fields.as_deref());
        let mut out = lock(&self.out);
        if let Err(err) = write_page_csv(&mut *out, &page.records, &columns) {
            tracing::error!(error = %err, "failed to render page");
        }
        tracing::info!(
            shown = page.records.len(),
            total = page.total_matching_count,
            "variants"
        );
    }

    fn on_fetch_error(&self, message: &str) {
        self.show_error(message);
    }

    fn on_action_error(&self, message: &str) {
        self.show_error(message);
    }

    fn on_error_cleared(&self) {
        *lock(&self.last_error) = None;
    }
}
