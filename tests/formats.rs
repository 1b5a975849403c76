use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parquet::basic::{ConvertedType, Repetition, Type as PhysicalType};
use parquet::data_type::{ByteArray, ByteArrayType, DoubleType, Int64Type};
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::types::Type;

use trident::columns::{
    AGE, ASSISTS, COMP, GOALS, MINUTES, NON_PENALTY_GOALS, PENALTY_ATTEMPTS, PENALTY_GOALS,
    PLAYER, POS, SHOTS, SHOTS_ON_TARGET, SQUAD,
};
use trident::prepare::parse_number;
use trident::raw_table::{RawTable, load_raw_table};
use trident::{PreparedDataset, load_dataset};

const TEXT_COLUMNS: [&str; 5] = [PLAYER, SQUAD, AGE, POS, COMP];
const INT_COLUMNS: [&str; 8] = [
    MINUTES,
    GOALS,
    ASSISTS,
    SHOTS,
    SHOTS_ON_TARGET,
    NON_PENALTY_GOALS,
    PENALTY_GOALS,
    PENALTY_ATTEMPTS,
];

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn csv_sample() -> (RawTable, PreparedDataset) {
    let path = fixture_path("players_sample.csv");
    let raw = load_raw_table(&path).expect("fixture should read");
    let dataset = load_dataset(&path).expect("fixture should load");
    (raw, dataset)
}

fn number(cell: &str) -> f64 {
    parse_number(cell).unwrap_or(0.0)
}

/// Same rows as `raw`, with typed columns: text as UTF8, counts as INT64,
/// rates as DOUBLE.
fn write_parquet(raw: &RawTable, path: &Path) {
    let fields = raw
        .headers()
        .iter()
        .map(|name| {
            let builder = if TEXT_COLUMNS.contains(&name.as_str()) {
                Type::primitive_type_builder(name, PhysicalType::BYTE_ARRAY)
                    .with_converted_type(ConvertedType::UTF8)
            } else if INT_COLUMNS.contains(&name.as_str()) {
                Type::primitive_type_builder(name, PhysicalType::INT64)
            } else {
                Type::primitive_type_builder(name, PhysicalType::DOUBLE)
            };
            Arc::new(builder.with_repetition(Repetition::REQUIRED).build().unwrap())
        })
        .collect();
    let schema = Arc::new(
        Type::group_type_builder("players")
            .with_fields(fields)
            .build()
            .unwrap(),
    );
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path).unwrap();
    let mut writer = SerializedFileWriter::new(file, schema, props).unwrap();

    let mut group = writer.next_row_group().unwrap();
    let mut col = 0;
    while let Some(mut column) = group.next_column().unwrap() {
        let name = raw.headers()[col].as_str();
        let cells: Vec<&str> = (0..raw.len()).map(|row| raw.cell(row, col)).collect();
        if TEXT_COLUMNS.contains(&name) {
            let values: Vec<ByteArray> = cells.iter().map(|c| ByteArray::from(*c)).collect();
            column
                .typed::<ByteArrayType>()
                .write_batch(&values, None, None)
                .unwrap();
        } else if INT_COLUMNS.contains(&name) {
            let values: Vec<i64> = cells.iter().map(|c| number(c) as i64).collect();
            column
                .typed::<Int64Type>()
                .write_batch(&values, None, None)
                .unwrap();
        } else {
            let values: Vec<f64> = cells.iter().map(|c| number(c)).collect();
            column
                .typed::<DoubleType>()
                .write_batch(&values, None, None)
                .unwrap();
        }
        column.close().unwrap();
        col += 1;
    }
    group.close().unwrap();
    writer.close().unwrap();
}

fn write_tsv(raw: &RawTable, path: &Path) {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .unwrap();
    writer.write_record(raw.headers()).unwrap();
    for row in 0..raw.len() {
        let cells: Vec<&str> = (0..raw.headers().len())
            .map(|col| raw.cell(row, col))
            .collect();
        writer.write_record(&cells).unwrap();
    }
    writer.flush().unwrap();
}

#[test]
fn parquet_with_typed_columns_matches_csv() {
    let (raw, from_csv) = csv_sample();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("players.parquet");
    write_parquet(&raw, &path);

    let from_parquet = load_dataset(&path).expect("parquet should load");
    assert_eq!(from_parquet.len(), 20);
    assert_eq!(from_parquet, from_csv);

    let haaland = from_parquet
        .find_exact("Erling Haaland", "Manchester City")
        .unwrap();
    assert_eq!(from_parquet.value(haaland, MINUTES), Some(2550.0));
    assert_eq!(from_parquet.value(haaland, "Sh/90"), Some(4.24));
}

#[test]
fn tsv_dispatch_matches_csv() {
    let (raw, from_csv) = csv_sample();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("players.tsv");
    write_tsv(&raw, &path);

    let from_tsv = load_dataset(&path).expect("tsv should load");
    assert_eq!(from_tsv, from_csv);
}
