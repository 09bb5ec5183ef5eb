use std::fs;
use std::path::Path;

use serde_json::{Value, json};
use tracing::{info, warn};

use crate::utils::error::ClientError;

/// One row of the publisher's input file.
///
/// Records are published in ascending `priority` order regardless of file
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub age: u32,
    pub country: String,
    pub company: String,
    pub priority: u32,
}

impl Record {
    pub fn to_payload(&self) -> Value {
        json!({
            "name": self.name,
            "age": self.age,
            "country": self.country,
            "company": self.company,
            "priority": self.priority,
        })
    }
}

/// Reads a CSV file with a `name,age,country,company,priority` header (any
/// column order) and returns its records sorted by ascending priority.
///
/// A header missing a required column fails the whole run; a malformed data
/// row is logged and skipped so one bad record cannot sink the batch.
pub fn read_records(path: &Path) -> Result<Vec<Record>, ClientError> {
    let contents = fs::read_to_string(path)?;
    let mut lines = contents.lines();

    let header = lines
        .next()
        .ok_or_else(|| ClientError::InvalidRecords("empty record file".into()))?;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    let index_of = |name: &str| -> Result<usize, ClientError> {
        columns
            .iter()
            .position(|c| *c == name)
            .ok_or_else(|| ClientError::InvalidRecords(format!("missing column '{name}'")))
    };

    let name_col = index_of("name")?;
    let age_col = index_of("age")?;
    let country_col = index_of("country")?;
    let company_col = index_of("company")?;
    let priority_col = index_of("priority")?;

    let mut records = Vec::new();
    for (line_no, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let parsed = (|| -> Option<Record> {
            Some(Record {
                name: fields.get(name_col)?.to_string(),
                age: fields.get(age_col)?.parse().ok()?,
                country: fields.get(country_col)?.to_string(),
                company: fields.get(company_col)?.to_string(),
                priority: fields.get(priority_col)?.parse().ok()?,
            })
        })();
        match parsed {
            Some(record) => records.push(record),
            // Header is line 1, so the first data row is line 2.
            None => warn!(line = line_no + 2, "skipping malformed record"),
        }
    }

    records.sort_by_key(|r| r.priority);
    Ok(records)
}

/// Publishes each record to the broker in order, one POST per record.
///
/// A failed publish logs a warning and the batch continues with the next
/// record. Returns the number of records the broker accepted.
pub async fn publish_records(
    client: &reqwest::Client,
    base_url: &str,
    records: &[Record],
) -> usize {
    let url = format!("{base_url}/publish");
    let mut published = 0;

    for record in records {
        match publish_one(client, &url, record).await {
            Ok(()) => {
                info!(priority = record.priority, name = %record.name, "published");
                published += 1;
            }
            Err(e) => warn!(name = %record.name, "failed to publish: {e}"),
        }
    }

    published
}

async fn publish_one(
    client: &reqwest::Client,
    url: &str,
    record: &Record,
) -> Result<(), ClientError> {
    let resp = client.post(url).json(&record.to_payload()).send().await?;
    if !resp.status().is_success() {
        return Err(ClientError::UnexpectedStatus {
            status: resp.status(),
            url: url.to_string(),
        });
    }
    Ok(())
}
