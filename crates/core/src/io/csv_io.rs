//! Tabular (CSV) export of the labeled grid

use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::report::{AnalysisReport, ClusterLabel};

/// One CSV row. The global statistic is repeated on every row so the table
/// stands on its own.
#[derive(Debug, Serialize)]
struct CsvRow {
    cell_index: usize,
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
    count: u64,
    neighbor_count: usize,
    local_i: f64,
    local_p_value: f64,
    cluster_label: ClusterLabel,
    global_i: f64,
    global_p_value: f64,
}

/// Write the labeled grid as CSV to any writer
pub fn write_report_csv_to<W: Write>(report: &AnalysisReport, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for rec in &report.cells {
        let g = rec.cell_geometry;
        wtr.serialize(CsvRow {
            cell_index: rec.cell_index,
            min_x: g.min_x,
            min_y: g.min_y,
            max_x: g.max_x,
            max_y: g.max_y,
            count: rec.count,
            neighbor_count: rec.neighbor_count,
            local_i: rec.local_i,
            local_p_value: rec.local_p_value,
            cluster_label: rec.cluster_label,
            global_i: report.global.i,
            global_p_value: report.global.p_value,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the labeled grid to a CSV file.
///
/// Cell corners are written in the analysis frame.
pub fn write_report_csv<P: AsRef<Path>>(report: &AnalysisReport, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_report_csv_to(report, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{CellRecord, ClusterSummary, GlobalStatistic};
    use crate::vector::BoundingBox;

    #[test]
    fn test_csv_header_and_rows() {
        let report = AnalysisReport {
            global: GlobalStatistic {
                i: 0.3,
                expected: -0.5,
                p_value: 0.04,
                z_sim: 1.9,
                permutations: 99,
            },
            cells: vec![
                CellRecord {
                    cell_index: 0,
                    cell_geometry: BoundingBox::new(0.0, 0.0, 10.0, 10.0),
                    count: 3,
                    neighbor_count: 0,
                    local_i: 0.0,
                    local_p_value: 1.0,
                    cluster_label: ClusterLabel::NS,
                },
                CellRecord {
                    cell_index: 1,
                    cell_geometry: BoundingBox::new(10.0, 0.0, 20.0, 10.0),
                    count: 0,
                    neighbor_count: 1,
                    local_i: 0.5,
                    local_p_value: 0.01,
                    cluster_label: ClusterLabel::LL,
                },
            ],
            summary: ClusterSummary::from_labels(&[ClusterLabel::NS, ClusterLabel::LL]),
            cell_size: 10.0,
            alpha: 0.05,
            seed: 7,
        };

        let mut buf = Vec::new();
        write_report_csv_to(&report, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "cell_index,min_x,min_y,max_x,max_y,count,neighbor_count,local_i,local_p_value,cluster_label,global_i,global_p_value"
        );
        assert!(lines[1].starts_with("0,0.0,0.0,10.0,10.0,3,0,"), "{}", lines[1]);
        assert!(lines[2].starts_with("1,10.0,0.0,20.0,10.0,0,1,"), "{}", lines[2]);
        assert!(lines[2].contains(",LL,0.3,0.04"), "{}", lines[2]);
    }
}
