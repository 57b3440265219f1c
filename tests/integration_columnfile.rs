//! End-to-end tests reading columnfiles from disk and reporting on them.

use columnfile_stats::{
    ColumnStats, ParseOptions, Report, ReportOptions, ShortRowPolicy, read_columnfile,
    read_columnfile_or_empty, report,
};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const EXAMPLE: &str = "# rho = 2.7\n# x y z\n1.0 2.0 3.0\n4.0 5.0 6.0\n";

fn write_columnfile(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

/// Shape and metadata survive a round trip through the filesystem
#[test]
fn test_read_example_file() {
    let file = write_columnfile(EXAMPLE);
    let outcome = read_columnfile(file.path(), &ParseOptions::default()).unwrap();
    let table = outcome.table;

    assert_eq!(table.parameter("rho"), Some("2.7"));
    assert_eq!(table.metadata().len(), 1);
    assert_eq!(table.titles(), &["x", "y", "z"]);
    assert_eq!(table.column_count(), 3);
    assert_eq!(table.row_count(), 2);

    let report = Report::from_table(&table);
    assert_eq!(report.stats_for("x").unwrap().triple(), Some((1.0, 4.0, 2.5)));
    assert_eq!(report.stats_for("y").unwrap().triple(), Some((2.0, 5.0, 3.5)));
    assert_eq!(report.stats_for("z").unwrap().triple(), Some((3.0, 6.0, 4.5)));
}

#[test]
fn test_round_trip_shape() {
    let mut contents = String::from("# a b c d\n");
    for i in 0..50 {
        contents.push_str(&format!("{} {} {} {}\n", i, i * 2, i * 3, i * 4));
    }
    let file = write_columnfile(&contents);
    let outcome = read_columnfile(file.path(), &ParseOptions::default()).unwrap();

    assert_eq!(outcome.table.column_count(), 4);
    assert_eq!(outcome.table.row_count(), 50);
    assert_eq!(outcome.stats.success_rate(), 100.0);
}

#[test]
fn test_duplicate_metadata_keeps_last_value() {
    let file = write_columnfile("# rho = 1.0\n# omega = 5\n# rho = 2.7\n# x\n1\n");
    let table = read_columnfile(file.path(), &ParseOptions::default())
        .unwrap()
        .table;

    assert_eq!(table.parameter("rho"), Some("2.7"));
    assert_eq!(table.parameter("omega"), Some("5"));
    assert_eq!(table.metadata().len(), 2);
}

#[test]
fn test_blank_lines_do_not_change_table() {
    let plain = write_columnfile(EXAMPLE);
    let spaced = write_columnfile("\n# rho = 2.7\n\n\n# x y z\n1.0 2.0 3.0\n\n4.0 5.0 6.0\n\n");
    let options = ParseOptions::default();

    let plain = read_columnfile(plain.path(), &options).unwrap().table;
    let spaced = read_columnfile(spaced.path(), &options).unwrap().table;
    assert_eq!(plain, spaced);
}

#[test]
fn test_malformed_rows_are_dropped_and_reported() {
    let file = write_columnfile("# a b\n1 2\n1 2 3\n3 abc\n# short =\n5 6\n");
    let outcome = read_columnfile(file.path(), &ParseOptions::default()).unwrap();

    assert_eq!(outcome.table.row_count(), 2);
    assert_eq!(outcome.table.rows(), &[vec![1.0, 2.0], vec![5.0, 6.0]]);
    assert_eq!(outcome.stats.rows_rejected, 2);
    assert_eq!(outcome.issues.len(), 3);

    let line_numbers: Vec<usize> = outcome.issues.iter().map(|i| i.line_number).collect();
    assert_eq!(line_numbers, vec![3, 4, 5]);
    assert_eq!(outcome.issues.iter().filter(|i| i.is_row_rejection()).count(), 2);
}

#[test]
fn test_short_rows_follow_policy() {
    let file = write_columnfile("# a b c\n1 2\n4 5 6\n");

    let filled = read_columnfile(file.path(), &ParseOptions::default()).unwrap();
    assert_eq!(filled.table.rows()[0], vec![1.0, 2.0, 0.0]);

    let strict = ParseOptions {
        short_rows: ShortRowPolicy::Reject,
    };
    let rejected = read_columnfile(file.path(), &strict).unwrap();
    assert_eq!(rejected.table.row_count(), 1);
    assert_eq!(rejected.table.rows()[0], vec![4.0, 5.0, 6.0]);
}

#[test]
fn test_titles_without_rows_report_no_data() {
    let file = write_columnfile("# temperature = 300\n# x y\n");
    let table = read_columnfile(file.path(), &ParseOptions::default())
        .unwrap()
        .table;
    assert_eq!(table.row_count(), 0);

    let mut out = Vec::new();
    let built = report(&table, &ReportOptions::default(), &mut out).unwrap();
    assert!(built.column_stats.iter().all(|c| c.stats == ColumnStats::NoData));

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Columns: 2 Rows 0"));
    assert!(text.contains("Parameter temperature = 300"));
    assert!(text.contains("Column named x : no data"));
}

#[test]
fn test_missing_file() {
    let path = Path::new("/nonexistent/dir/columnfile.flt");
    let options = ParseOptions::default();

    let err = read_columnfile(path, &options).unwrap_err();
    assert!(err.to_string().contains("Cannot open columnfile"));

    let outcome = read_columnfile_or_empty(path, &options);
    assert!(outcome.table.is_empty());
    assert!(outcome.table.metadata().is_empty());
    assert!(outcome.table.titles().is_empty());

    let mut out = Vec::new();
    report(&outcome.table, &ReportOptions::default(), &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "Columns: 0 Rows 0\n");
}

#[test]
fn test_non_utf8_input_is_read_error() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"# x\n1\n\xff\xfe\n").unwrap();

    let err = read_columnfile(file.path(), &ParseOptions::default()).unwrap_err();
    assert!(err.to_string().contains("line 3"));
}
