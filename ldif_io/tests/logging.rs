//! Log output of loading and record streams at each verbosity.

use std::io::Cursor;
use std::sync::{Mutex, MutexGuard, Once};

use ldif_io::{
    load_example, write_example, Field, FloatArray, LoaderConfig, MeshId, RecordReader,
    RecordWriter, ShapeExample, Verbosity,
};
use log::{Level, LevelFilter, Log, Metadata, Record};
use tempfile::TempDir;

/// Collects every record emitted by this crate.
struct CaptureLogger;

static RECORDS: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());
static LOGGER: CaptureLogger = CaptureLogger;
static INSTALL: Once = Once::new();
static SERIAL: Mutex<()> = Mutex::new(());

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.target().starts_with("ldif_io")
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let mut records = RECORDS.lock().unwrap_or_else(|e| e.into_inner());
            records.push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

/// Install the logger once and hold the capture buffer for one test.
fn capture() -> MutexGuard<'static, ()> {
    INSTALL.call_once(|| {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(LevelFilter::Debug);
    });
    let guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    take_records();
    guard
}

fn take_records() -> Vec<(Level, String)> {
    std::mem::take(&mut *RECORDS.lock().unwrap_or_else(|e| e.into_inner()))
}

fn count(records: &[(Level, String)], level: Level) -> usize {
    records.iter().filter(|(l, _)| *l == level).count()
}

fn make_example(mesh_id: &str) -> ShapeExample {
    let mut builder = ShapeExample::builder(MeshId::parse(mesh_id).unwrap());
    for field in Field::NUMERIC {
        builder = builder.with_array(field, FloatArray::zeros(field.shape()));
    }
    builder.build().unwrap()
}

#[test]
fn test_load_logging_follows_verbosity() {
    let _guard = capture();
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("04090263").join("22");
    let quiet = LoaderConfig::new().with_verbosity(Verbosity::Quiet);
    write_example(&dir, &make_example("04090263|22"), &quiet).unwrap();
    assert!(take_records().is_empty());

    load_example(&dir, &quiet).unwrap();
    let records = take_records();
    assert!(records.is_empty(), "quiet load logged {:?}", records);

    load_example(&dir, &LoaderConfig::new().with_verbosity(Verbosity::Normal)).unwrap();
    let records = take_records();
    assert_eq!(count(&records, Level::Info), 1);
    assert_eq!(count(&records, Level::Debug), 0);
    assert!(records[0].1.contains("04090263|22"));

    load_example(&dir, &LoaderConfig::new().with_verbosity(Verbosity::Verbose)).unwrap();
    let records = take_records();
    assert_eq!(count(&records, Level::Info), 1);
    assert_eq!(count(&records, Level::Debug), Field::NUMERIC.len());
    for field in Field::NUMERIC {
        assert!(
            records
                .iter()
                .any(|(level, line)| *level == Level::Debug && line.contains(field.name())),
            "no debug line for {}",
            field
        );
    }
}

#[test]
fn test_failed_load_logs_no_summary() {
    let _guard = capture();
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("cat").join("empty");
    std::fs::create_dir_all(&dir).unwrap();

    let config = LoaderConfig::new().with_verbosity(Verbosity::Verbose);
    assert!(load_example(&dir, &config).is_err());
    assert_eq!(count(&take_records(), Level::Info), 0);
}

#[test]
fn test_write_logging_follows_verbosity() {
    let _guard = capture();
    let tmp = TempDir::new().unwrap();
    let example = make_example("cat|h");

    let config = LoaderConfig::new().with_verbosity(Verbosity::Quiet);
    write_example(tmp.path().join("a"), &example, &config).unwrap();
    assert!(take_records().is_empty());

    let config = LoaderConfig::new().with_verbosity(Verbosity::Normal);
    write_example(tmp.path().join("b"), &example, &config).unwrap();
    let records = take_records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].0, Level::Info);
}

#[test]
fn test_stream_logs_one_debug_line_per_record() {
    let _guard = capture();
    let examples = [make_example("train|a"), make_example("train|b")];

    let mut writer = RecordWriter::new(Vec::new());
    for example in &examples {
        writer.write(example).unwrap();
    }
    let bytes = writer.finish().unwrap();
    let records = take_records();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|(level, _)| *level == Level::Debug));
    assert!(records[0].1.contains("train|a"));
    assert!(records[1].1.contains("train|b"));

    let decoded: Vec<_> = RecordReader::new(Cursor::new(bytes))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(decoded.len(), 2);
    let records = take_records();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|(level, _)| *level == Level::Debug));
    assert!(records[1].1.contains("train|b"));
}
