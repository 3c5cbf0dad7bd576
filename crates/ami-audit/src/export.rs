//! Pipe-delimited export of classified images.
//!
//! ```text
//! AMI ID|Region|whoAMI status|Public|Owner Alias|Owner ID|Name|Description
//! ami-0abc|us-east-1|Verified|Public|amazon|137112412989|al2023-ami|Amazon Linux
//! ami-0def|us-east-1|Unknown|Unknown|Unknown|Unknown|Unknown|Unknown
//! ```
//!
//! Rows follow [`Report::records`] order, so the same report always
//! produces the same bytes. Fields are written raw unless they contain `|`
//! or a line break; only those are quoted, with inner quotes doubled.

use std::borrow::Cow;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use ami_core::{AuditError, Category, ImageRecord, Result, UNKNOWN};

use crate::report::Report;

/// Header line columns
pub const HEADER: [&str; 8] = [
    "AMI ID",
    "Region",
    "whoAMI status",
    "Public",
    "Owner Alias",
    "Owner ID",
    "Name",
    "Description",
];

const DELIMITER: u8 = b'|';

/// Render one record as export columns.
#[must_use]
pub fn row(record: &ImageRecord) -> [&str; 8] {
    if record.category == Category::Unknown {
        return [
            record.id.as_str(),
            record.region.as_str(),
            Category::Unknown.label(),
            UNKNOWN,
            UNKNOWN,
            UNKNOWN,
            UNKNOWN,
            UNKNOWN,
        ];
    }
    [
        record.id.as_str(),
        record.region.as_str(),
        record.category.label(),
        record.visibility.label(),
        record.owner_alias.as_deref().unwrap_or(""),
        record.owner_id.as_str(),
        record.name.as_str(),
        record.description.as_str(),
    ]
}

/// Write the export for `report` to `writer`.
pub fn write_export<W: Write>(report: &Report, writer: W) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Never)
        .has_headers(false)
        .from_writer(writer);

    csv.write_record(HEADER).map_err(export_error)?;
    for record in &report.records {
        let fields = row(record).map(escape);
        csv.write_record(fields.iter().map(|f| f.as_bytes())).map_err(export_error)?;
    }
    csv.flush()?;
    Ok(())
}

/// Render the export into a string.
pub fn to_string(report: &Report) -> Result<String> {
    let mut buf = Vec::new();
    write_export(report, &mut buf)?;
    String::from_utf8(buf).map_err(export_error)
}

/// Create (or truncate) `path` and write the export into it.
///
/// The parent directory must already exist.
pub fn write_to_path(report: &Report, path: &Path) -> Result<()> {
    let wrap = |e: &dyn std::fmt::Display| AuditError::Export {
        path: path.display().to_string(),
        message: e.to_string(),
    };
    let file = File::create(path).map_err(|e| wrap(&e))?;
    write_export(report, file).map_err(|e| match e {
        AuditError::Export { message, .. } => wrap(&message),
        other => wrap(&other),
    })
}

/// Quote a field only when it would break the row structure.
fn escape(field: &str) -> Cow<'_, str> {
    if field.contains(['|', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn export_error(err: impl std::fmt::Display) -> AuditError {
    AuditError::Export {
        path: String::from("<writer>"),
        message: err.to_string(),
    }
}
