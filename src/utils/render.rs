use crate::operations::QueryOutput;
use crate::utils::error::{ClientError, Result};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
    Tsv,
}

impl OutputFormat {
    fn delimiter(self) -> u8 {
        match self {
            OutputFormat::Tsv => b'\t',
            _ => b',',
        }
    }
}

/// Pretty JSON for any response.
pub fn render_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(ClientError::serialization)
}

/// Renders query result pages as a table with a header row of column names.
pub fn render_rows(pages: &[QueryOutput], format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        let rows: Vec<_> = pages.iter().flat_map(|page| page.rows.iter()).collect();
        return render_json(&rows);
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(format.delimiter())
        .flexible(true)
        .from_writer(Vec::new());

    if let Some(first) = pages.iter().find(|page| !page.column_info.is_empty()) {
        let header: Vec<String> = first
            .column_info
            .iter()
            .map(|column| column.name.clone().unwrap_or_default())
            .collect();
        writer.write_record(&header).map_err(csv_error)?;
    }

    for row in pages.iter().flat_map(|page| page.rows.iter()) {
        let cells: Vec<String> = row.data.iter().map(|datum| datum.to_text()).collect();
        writer.write_record(&cells).map_err(csv_error)?;
    }

    let bytes = writer.into_inner().map_err(|e| ClientError::SerializationError {
        message: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| ClientError::SerializationError {
        message: e.to_string(),
    })
}

fn csv_error(err: csv::Error) -> ClientError {
    ClientError::SerializationError {
        message: err.to_string(),
    }
}
