use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::evaluator::EvalOutcome;
use crate::search::CandidateResult;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("results file has no data rows")]
    Empty,
    #[error("results file is missing required column `{0}`")]
    MissingColumn(&'static str),
    #[error("unparsable value `{value}` on line {line}")]
    BadRow { line: usize, value: String },
}

/// Write the search results file consumed by the offline plotting step.
///
/// Column contract: `k_coh,k_ali,k_col`, one `coverage_seed_<S>` column per
/// configured seed in ascending order, then `average`. A seed a candidate
/// failed on is written as `nan`, never as zero.
pub fn write_search_results(
    path: &Path,
    seeds: &[u64],
    results: &[CandidateResult],
) -> Result<(), ReportError> {
    let mut seeds = seeds.to_vec();
    seeds.sort_unstable();

    let mut out = BufWriter::new(File::create(path)?);
    let seed_columns: Vec<String> = seeds
        .iter()
        .map(|s| format!("coverage_seed_{s}"))
        .collect();
    writeln!(out, "k_coh,k_ali,k_col,{},average", seed_columns.join(","))?;

    for result in results {
        write!(
            out,
            "{},{},{}",
            result.gains.k_cohesion, result.gains.k_alignment, result.gains.k_separation
        )?;
        for &seed in &seeds {
            match result.per_seed.iter().find(|&&(s, _)| s == seed) {
                Some(&(_, coverage)) => write!(out, ",{coverage}")?,
                None => write!(out, ",nan")?,
            }
        }
        writeln!(out, ",{}", result.average)?;
    }
    out.flush()?;
    Ok(())
}

/// Append per-seed uniformity metrics, creating the file with a header on
/// first use. Appending across runs is intentional; the log accumulates.
pub fn append_uniformity_log(
    path: &Path,
    environment_label: &str,
    num_boids: usize,
    outcomes: &[EvalOutcome],
) -> Result<(), ReportError> {
    let needs_header = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut out = BufWriter::new(file);
    if needs_header {
        writeln!(out, "environment,num_boids,seed,variance,mean,std_dev,normalized")?;
    }
    for outcome in outcomes {
        if let Some(stats) = outcome.uniformity {
            writeln!(
                out,
                "{},{},{},{:.4},{:.4},{:.4},{:.4}",
                environment_label,
                num_boids,
                outcome.seed,
                stats.variance,
                stats.mean,
                stats.std_dev,
                stats.coefficient_of_variation,
            )?;
        }
    }
    out.flush()?;
    Ok(())
}

/// The best-performing row of a previously written results file.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BestRow {
    pub k_coh: f32,
    pub k_ali: f32,
    pub k_col: f32,
    pub average: f32,
}

/// Re-load a results file and return the row with the highest average
/// coverage. Missing columns, unparsable rows, non-finite averages and empty
/// files are configuration errors, not zero-valued gains.
pub fn find_best_row(path: &Path) -> Result<BestRow, ReportError> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => return Err(ReportError::Empty),
    };
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    let column_index = |name: &'static str| -> Result<usize, ReportError> {
        columns
            .iter()
            .position(|&c| c == name)
            .ok_or(ReportError::MissingColumn(name))
    };
    let idx_coh = column_index("k_coh")?;
    let idx_ali = column_index("k_ali")?;
    let idx_col = column_index("k_col")?;
    let idx_avg = column_index("average")?;

    let parse = |line: usize, value: &str| -> Result<f32, ReportError> {
        value.trim().parse::<f32>().map_err(|_| ReportError::BadRow {
            line,
            value: value.to_string(),
        })
    };

    let mut best: Option<BestRow> = None;
    for (line_idx, line) in lines.enumerate() {
        let line_no = line_idx + 2;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        let needed = idx_coh.max(idx_ali).max(idx_col).max(idx_avg);
        if fields.len() <= needed {
            return Err(ReportError::BadRow {
                line: line_no,
                value: line.clone(),
            });
        }
        let average = parse(line_no, fields[idx_avg])?;
        // A NaN average would poison the strict-> comparison below: once
        // first, it is never replaced
        if !average.is_finite() {
            return Err(ReportError::BadRow {
                line: line_no,
                value: fields[idx_avg].trim().to_string(),
            });
        }
        let row = BestRow {
            k_coh: parse(line_no, fields[idx_coh])?,
            k_ali: parse(line_no, fields[idx_ali])?,
            k_col: parse(line_no, fields[idx_col])?,
            average,
        };
        // Strict > keeps the first of equal rows
        if best.map_or(true, |b| row.average > b.average) {
            best = Some(row);
        }
    }

    best.ok_or(ReportError::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gains::GainConfig;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("flockcover_{}_{}", std::process::id(), name))
    }

    fn candidate(k_coh: f32, average: f32) -> CandidateResult {
        CandidateResult {
            gains: GainConfig {
                k_cohesion: k_coh,
                k_alignment: 0.05,
                k_separation: 0.01,
                ..GainConfig::default()
            },
            per_seed: vec![(27, average - 1.0), (729, average), (4913, average + 1.0)],
            average,
        }
    }

    #[test]
    fn search_results_round_trip_to_the_best_row() {
        let path = temp_path("roundtrip.csv");
        let results = vec![candidate(0.1, 40.0), candidate(0.3, 55.0), candidate(0.2, 50.0)];
        write_search_results(&path, &[4913, 27, 729], &results).unwrap();

        let best = find_best_row(&path).unwrap();
        assert!((best.k_coh - 0.3).abs() < 1e-6);
        assert!((best.average - 55.0).abs() < 1e-6);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn header_lists_seed_columns_in_ascending_order() {
        let path = temp_path("header.csv");
        write_search_results(&path, &[4913, 27, 729], &[candidate(0.1, 40.0)]).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let header = contents.lines().next().unwrap();
        assert_eq!(
            header,
            "k_coh,k_ali,k_col,coverage_seed_27,coverage_seed_729,coverage_seed_4913,average"
        );
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn empty_file_is_an_error_not_default_gains() {
        let path = temp_path("empty.csv");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(find_best_row(&path), Err(ReportError::Empty)));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn header_only_file_is_an_error() {
        let path = temp_path("header_only.csv");
        std::fs::write(&path, "k_coh,k_ali,k_col,average\n").unwrap();
        assert!(matches!(find_best_row(&path), Err(ReportError::Empty)));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_required_column_is_reported() {
        let path = temp_path("missing_col.csv");
        std::fs::write(&path, "k_coh,k_ali,average\n0.1,0.2,50.0\n").unwrap();
        assert!(matches!(
            find_best_row(&path),
            Err(ReportError::MissingColumn("k_col"))
        ));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn unparsable_row_is_reported_with_its_line() {
        let path = temp_path("bad_row.csv");
        std::fs::write(
            &path,
            "k_coh,k_ali,k_col,average\n0.1,0.2,0.3,fifty\n",
        )
        .unwrap();
        match find_best_row(&path) {
            Err(ReportError::BadRow { line, value }) => {
                assert_eq!(line, 2);
                assert_eq!(value, "fifty");
            }
            other => panic!("expected BadRow, got {other:?}"),
        }
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn non_finite_average_is_rejected_not_kept_as_the_best_row() {
        let path = temp_path("nan_avg.csv");
        std::fs::write(
            &path,
            "k_coh,k_ali,k_col,average\n0.1,0.2,0.3,nan\n0.2,0.2,0.3,50.0\n",
        )
        .unwrap();
        match find_best_row(&path) {
            Err(ReportError::BadRow { line, value }) => {
                assert_eq!(line, 2);
                assert_eq!(value, "nan");
            }
            other => panic!("expected BadRow, got {other:?}"),
        }
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn uniformity_log_appends_without_duplicating_the_header() {
        use crate::coverage::UniformityStats;
        use crate::evaluator::EvalOutcome;

        let path = temp_path("uniformity.csv");
        std::fs::remove_file(&path).ok();
        let outcome = EvalOutcome {
            seed: 27,
            coverage_series: vec![10.0],
            final_coverage: 10.0,
            uniformity: Some(UniformityStats {
                mean: 1.5,
                variance: 0.25,
                std_dev: 0.5,
                coefficient_of_variation: 0.3333,
            }),
        };
        append_uniformity_log(&path, "Cafeteria", 50, &[outcome.clone()]).unwrap();
        append_uniformity_log(&path, "Cafeteria", 50, &[outcome]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "environment,num_boids,seed,variance,mean,std_dev,normalized"
        );
        assert_eq!(lines[1], lines[2]);
        assert!(lines[1].starts_with("Cafeteria,50,27,"));
        std::fs::remove_file(&path).ok();
    }
}
