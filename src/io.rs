//! Reading and writing statistics tables and search histories in CSV.

use crate::error::PacError;
use crate::solvers::search_algorithms::{AnytimeSearch, SearchResult, SearchStatus};
use crate::statistics::{BucketedCdf, EmpiricalCdf, HSample, InstanceStatistics, PacStatistics};
use itertools::Itertools;
use std::fmt::{Debug, Display};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Header of a CDF table bucketed by h ranges.
pub const CDF_TABLE_HEADER: &str = "h_range,ratio,cumulative";
/// Header of a single CDF table.
pub const SINGLE_CDF_HEADER: &str = "ratio,cumulative";

/// Reads a vector of length n from an input str stream.
///
/// # Examples
///
/// ```
/// use pac_search::io;
///
/// let string = "1, 2.5, inf";
///
/// let mut fields = string.split(',');
/// let vector = io::read_vector::<f64>(&mut fields, 3).unwrap();
/// assert_eq!(vector, vec![1.0, 2.5, f64::INFINITY]);
/// ```
pub fn read_vector<'a, T>(
    input: &mut impl Iterator<Item = &'a str>,
    n: usize,
) -> Result<Vec<T>, <T as FromStr>::Err>
where
    T: FromStr,
{
    input.take(n).map(|x| x.trim().parse::<T>()).collect()
}

/// Parses the non-empty lines of a CSV table with `n` numeric fields per row.
///
/// A first line that does not parse is treated as a header.
/// Returns each row with its line number.
fn parse_rows<T>(reader: impl BufRead, n: usize) -> Result<Vec<(usize, Vec<T>)>, PacError>
where
    T: FromStr,
    <T as FromStr>::Err: Display,
{
    let mut rows = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;

        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split(',');
        let row = match read_vector::<T>(&mut fields, n) {
            Ok(row) => row,
            Err(_) if i == 0 => continue,
            Err(error) => {
                return Err(PacError::Parse {
                    line: i + 1,
                    message: error.to_string(),
                })
            }
        };

        if row.len() != n || fields.next().is_some() {
            return Err(PacError::Parse {
                line: i + 1,
                message: format!("expected {n} fields"),
            });
        }

        rows.push((i + 1, row));
    }

    Ok(rows)
}

/// Parses statistics of solved instances from rows `instance,initial_h,optimal`.
///
/// # Examples
///
/// ```
/// use pac_search::io;
///
/// let table = "instance,initial_h,optimal\n1,10,12\n2,8,8\n";
/// let statistics = io::parse_pac_statistics(table.as_bytes()).unwrap();
/// assert_eq!(statistics.len(), 2);
/// assert_eq!(statistics.get_optimal_cost(1), Some(12.0));
/// ```
pub fn parse_pac_statistics(reader: impl BufRead) -> Result<PacStatistics, PacError> {
    let rows = parse_rows::<f64>(reader, 3)?;
    let mut statistics = PacStatistics::default();

    for (line, row) in rows {
        if row[0] < 0.0 || row[0].fract() != 0.0 {
            return Err(PacError::Parse {
                line,
                message: format!("invalid instance id {}", row[0]),
            });
        }

        statistics.push(InstanceStatistics {
            instance: row[0] as usize,
            initial_h: row[1],
            optimal: row[2],
        });
    }

    Ok(statistics)
}

pub fn read_pac_statistics(path: impl AsRef<Path>) -> Result<PacStatistics, PacError> {
    parse_pac_statistics(BufReader::new(File::open(path)?))
}

/// Parses `(h, optimal)` samples from rows `h,optimal`.
pub fn parse_h_samples(reader: impl BufRead) -> Result<Vec<HSample>, PacError> {
    Ok(parse_rows::<f64>(reader, 2)?
        .into_iter()
        .map(|(_, row)| HSample {
            h: row[0],
            optimal: row[1],
        })
        .collect())
}

pub fn read_h_samples(path: impl AsRef<Path>) -> Result<Vec<HSample>, PacError> {
    parse_h_samples(BufReader::new(File::open(path)?))
}

/// Writes a bucketed CDF as rows `h_range,ratio,cumulative`.
///
/// The h range of a bucket is its inclusive upper end.
pub fn write_cdf_table(mut writer: impl Write, cdfs: &BucketedCdf) -> Result<(), PacError> {
    writeln!(writer, "{CDF_TABLE_HEADER}")?;

    for (upper, cdf) in cdfs.buckets() {
        for (ratio, cumulative) in cdf.points() {
            writeln!(writer, "{upper},{ratio},{cumulative}")?;
        }
    }

    writer.flush()?;

    Ok(())
}

/// Parses a bucketed CDF written by `write_cdf_table`.
///
/// Consecutive rows with the same h range form a bucket, in the order of the rows.
///
/// # Examples
///
/// ```
/// use pac_search::io;
///
/// let table = "h_range,ratio,cumulative\n4,1,0.5\n4,1.5,1\ninf,1,1\n";
/// let cdfs = io::parse_cdf_table(table.as_bytes()).unwrap();
/// assert_eq!(cdfs.len(), 2);
/// assert_eq!(cdfs.bucket_for(3.0).probability_at_least(1.0), 0.5);
/// assert_eq!(cdfs.bucket_for(10.0).probability_at_least(1.0), 0.0);
/// ```
pub fn parse_cdf_table(reader: impl BufRead) -> Result<BucketedCdf, PacError> {
    let rows = parse_rows::<f64>(reader, 3)?;
    let buckets = rows
        .into_iter()
        .map(|(_, row)| row)
        .chunk_by(|row| row[0].to_bits())
        .into_iter()
        .map(|(bits, group)| {
            let points = group.map(|row| (row[1], row[2])).collect();
            let cdf = EmpiricalCdf::from_points(points)?;

            Ok::<_, PacError>((f64::from_bits(bits), cdf))
        })
        .collect::<Result<Vec<_>, PacError>>()?;

    Ok(BucketedCdf::from_buckets(buckets)?)
}

pub fn save_cdf_table(path: impl AsRef<Path>, cdfs: &BucketedCdf) -> Result<(), PacError> {
    write_cdf_table(BufWriter::new(File::create(path)?), cdfs)
}

pub fn load_cdf_table(path: impl AsRef<Path>) -> Result<BucketedCdf, PacError> {
    parse_cdf_table(BufReader::new(File::open(path)?))
}

/// Writes a single CDF as rows `ratio,cumulative`.
pub fn write_single_cdf(mut writer: impl Write, cdf: &EmpiricalCdf) -> Result<(), PacError> {
    writeln!(writer, "{SINGLE_CDF_HEADER}")?;

    for (ratio, cumulative) in cdf.points() {
        writeln!(writer, "{ratio},{cumulative}")?;
    }

    writer.flush()?;

    Ok(())
}

pub fn parse_single_cdf(reader: impl BufRead) -> Result<EmpiricalCdf, PacError> {
    let points = parse_rows::<f64>(reader, 2)?
        .into_iter()
        .map(|(_, row)| (row[0], row[1]))
        .collect();

    Ok(EmpiricalCdf::from_points(points)?)
}

/// Writes the per-phase records of a result as rows
/// `iteration,incumbent,max_fmin,expanded,generated,time`.
///
/// The incumbent field is empty before the first solution.
pub fn write_iteration_history<O, S>(
    mut writer: impl Write,
    result: &SearchResult<O, S>,
) -> Result<(), PacError> {
    writeln!(writer, "iteration,incumbent,max_fmin,expanded,generated,time")?;

    for record in &result.iterations {
        let incumbent = record.incumbent.map(|c| c.to_string()).unwrap_or_default();
        writeln!(
            writer,
            "{},{},{},{},{},{}",
            record.iteration,
            incumbent,
            record.max_fmin,
            record.expanded,
            record.generated,
            record.time
        )?;
    }

    writer.flush()?;

    Ok(())
}

/// Runs an anytime search to termination and dumps each solution found to a CSV file.
///
/// The first field is the time, second is the cost, third is the lower bound, fourth is the
/// operators, fifth is the expanded, and sixth is the generated.
pub fn run_and_dump_solution_history<S>(
    search: &mut S,
    filename: impl AsRef<Path>,
) -> Result<SearchResult<S::Operator, S::State>, PacError>
where
    S: AnytimeSearch,
    S::Operator: Clone + Debug,
    S::State: Clone,
{
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(filename)?;
    let mut result = search.start();

    loop {
        if let Some(solution) = result.get_best_solution() {
            let operators = solution
                .operators
                .iter()
                .map(|op| format!("{op:?}"))
                .join(" ");
            let bound = result
                .get_max_fmin()
                .map(|bound| bound.to_string())
                .unwrap_or_default();
            let total = search.get_total_result();
            let line = format!(
                "{}, {}, {}, {}, {}, {}\n",
                result.time,
                solution.cost,
                bound,
                operators,
                total.counters.expanded,
                total.counters.generated
            );
            file.write_all(line.as_bytes())?;
            file.flush()?;
        }

        if result.status != SearchStatus::GoalFound {
            return Ok(search.get_total_result().clone());
        }

        result = search.continue_search();
    }
}

/// Logs the cost, bound, and statistics of a result.
pub fn log_search_statistics<O, S>(result: &SearchResult<O, S>) {
    if let Some(cost) = result.get_best_cost() {
        info!(cost, "Solution found.");
    } else {
        info!("No solution is found.");
    }

    if let Some(rule) = result.get_satisfied_by() {
        info!(%rule, "Solution certified.");
    }

    if let Some(bound) = result.get_max_fmin() {
        info!(bound, "Best bound.");
    }

    info!(
        time = result.time,
        cpu_time = result.cpu_time,
        expanded = result.counters.expanded,
        generated = result.counters.generated,
        duplicates = result.counters.duplicates,
        reopened = result.counters.reopened,
        open_updated = result.counters.open_updated,
        status = ?result.status,
        "Search statistics."
    );
}
