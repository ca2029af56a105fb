//! CSV export of dashboard tables.
//!
//! Both tables use `Player` as the first header followed by the column
//! labels. Player rows hold integers. The summary's optional
//! "Guild Average" row holds two-decimal means.

use std::io::{Read, Write};

use csv::{Reader, Writer};

use super::StorageError;
use crate::models::{
    MissionStatus, StatusGrid, StatusRow, SummaryRow, SummaryTable, GUILD_AVERAGE,
};

const PLAYER_HEADER: &str = "Player";

/// Write `summary` as CSV.
///
/// A player row named "Guild Average" is rejected: it would read back as
/// the average row.
pub fn write_summary_csv<W: Write>(summary: &SummaryTable, out: W) -> Result<(), StorageError> {
    if summary.row(GUILD_AVERAGE).is_some() {
        return Err(StorageError::InvalidCsv(format!(
            "player row {:?} is reserved for the average",
            GUILD_AVERAGE
        )));
    }

    let mut writer = Writer::from_writer(out);

    writer.write_record(std::iter::once(PLAYER_HEADER).chain(summary.columns.iter().map(String::as_str)))?;

    for row in &summary.rows {
        let mut record = vec![row.player.clone()];
        record.extend(row.values.iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }

    if let Some(average) = &summary.average {
        let mut record = vec![GUILD_AVERAGE.to_string()];
        record.extend(average.iter().map(|v| format!("{:.2}", v)));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

pub fn read_summary_csv<R: Read>(input: R) -> Result<SummaryTable, StorageError> {
    let mut reader = Reader::from_reader(input);
    let columns = data_columns(&mut reader)?;

    let mut rows = Vec::new();
    let mut average = None;
    for record in reader.records() {
        let record = record?;
        let player = record.get(0).unwrap_or_default().to_string();
        let cells = record.iter().skip(1);

        if player == GUILD_AVERAGE {
            let values = cells
                .map(|c| parse_cell::<f64>(c, &player))
                .collect::<Result<Vec<_>, _>>()?;
            average = Some(values);
        } else {
            let values = cells
                .map(|c| parse_cell::<i64>(c, &player))
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(SummaryRow { player, values });
        }
    }

    Ok(SummaryTable {
        columns,
        rows,
        average,
    })
}

pub fn write_status_csv<W: Write>(grid: &StatusGrid, out: W) -> Result<(), StorageError> {
    let mut writer = Writer::from_writer(out);

    writer.write_record(std::iter::once(PLAYER_HEADER).chain(grid.missions.iter().map(String::as_str)))?;

    for row in &grid.rows {
        let mut record = vec![row.player.clone()];
        record.extend(row.statuses.iter().map(|s| s.code().to_string()));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

pub fn read_status_csv<R: Read>(input: R) -> Result<StatusGrid, StorageError> {
    let mut reader = Reader::from_reader(input);
    let missions = data_columns(&mut reader)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let player = record.get(0).unwrap_or_default().to_string();
        let statuses = record
            .iter()
            .skip(1)
            .map(|c| {
                let code = parse_cell::<i8>(c, &player)?;
                MissionStatus::from_code(code).ok_or_else(|| {
                    StorageError::InvalidCsv(format!("status {} for {} is out of range", code, player))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(StatusRow { player, statuses });
    }

    Ok(StatusGrid { missions, rows })
}

/// Column labels after the leading `Player` header.
fn data_columns<R: Read>(reader: &mut Reader<R>) -> Result<Vec<String>, StorageError> {
    let headers = reader.headers()?;
    if headers.get(0) != Some(PLAYER_HEADER) {
        return Err(StorageError::InvalidCsv(format!(
            "first header must be {:?}",
            PLAYER_HEADER
        )));
    }
    Ok(headers.iter().skip(1).map(str::to_string).collect())
}

fn parse_cell<T: std::str::FromStr>(cell: &str, player: &str) -> Result<T, StorageError> {
    cell.trim()
        .parse()
        .map_err(|_| StorageError::InvalidCsv(format!("bad value {:?} for {}", cell, player)))
}
