use crate::core::external_data::ExternalData;
use anyhow::Context;
use log::debug;
use std::fs::OpenOptions;
use std::io::Read;
use std::path::Path;

/// One row of an external data file: the numeric id in column 0, the data columns after it.
type Row = (i32, Vec<String>);

/// read_external_data loads the driver table and, if given, the team table. `points_col` is
/// the data column holding championship points, 0 if the table has none.
pub fn read_external_data(
    data_path: &Path,
    teams_path: Option<&Path>,
    points_col: usize,
) -> anyhow::Result<ExternalData> {
    let drivers = read_rows(data_path)?;
    let teams = match teams_path {
        Some(path) => read_rows(path)?,
        None => Vec::new(),
    };
    Ok(build_external_data(drivers, teams, points_col))
}

/// build_external_data collects the points of every driver row that has a parseable value in
/// `points_col`. Rows without one are not ranked.
pub fn build_external_data(drivers: Vec<Row>, teams: Vec<Row>, points_col: usize) -> ExternalData {
    let points = if points_col > 0 {
        drivers
            .iter()
            .filter_map(|(id, data)| {
                data.get(points_col)
                    .and_then(|p| p.trim().parse::<i32>().ok())
                    .map(|points| (*id, points))
            })
            .collect()
    } else {
        Vec::new()
    };
    ExternalData::new(drivers, teams, points)
}

fn read_rows(filepath: &Path) -> anyhow::Result<Vec<Row>> {
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!("Failed to open data file {}!", filepath.display()))?;
    parse_rows(fh).context(format!("Failed to parse data file {}!", filepath.display()))
}

/// parse_rows reads `;` separated rows without header. Rows with fewer than two columns or
/// without a positive numeric id are skipped.
pub fn parse_rows<R: Read>(reader: R) -> anyhow::Result<Vec<Row>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut rows: Vec<Row> = vec![];

    for result in csv_reader.records() {
        let record = result?;
        if record.len() < 2 {
            continue;
        }
        let id = match record[0].trim().parse::<i32>() {
            Ok(id) if id > 0 => id,
            _ => {
                debug!("Skipped data row with id {:?}", &record[0]);
                continue;
            }
        };
        rows.push((id, record.iter().skip(1).map(|c| c.to_owned()).collect()));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = "\
12;Rookie;DE;40
7;Veteran;FR;55;extra
x;broken;row
-3;negative;id;10
5
9;Guest;US
";

    #[test]
    fn rows_are_keyed_by_id() {
        let rows = parse_rows(DATA.as_bytes()).unwrap();
        let ids: Vec<i32> = rows.iter().map(|(id, _)| *id).collect();

        assert_eq!(ids, vec![12, 7, 9]);
        assert_eq!(rows[1].1, vec!["Veteran", "FR", "55", "extra"]);
    }

    #[test]
    fn points_are_taken_from_the_configured_column() {
        let rows = parse_rows(DATA.as_bytes()).unwrap();
        let data = build_external_data(rows, Vec::new(), 2);

        assert_eq!(data.points_for(7), Some(55));
        assert_eq!(data.points_for(9), None);
        assert_eq!(data.points_ranking(), vec![(7, 55), (12, 40)]);
        assert_eq!(data.data_for(12), ["Rookie", "DE", "40"]);
    }

    #[test]
    fn no_points_column_ranks_nobody() {
        let rows = parse_rows(DATA.as_bytes()).unwrap();
        assert_eq!(build_external_data(rows, Vec::new(), 0).ranked_count(), 0);
    }
}
