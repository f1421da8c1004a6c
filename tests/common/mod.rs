use headway::{blob::MemoryBlobSource, dataset::Dataset, gtfs::Gtfs};

/// Builds a dataset from named CSV tables held in memory, running the
/// whole ingestion pipeline including the geometric post-pass.
pub fn load_dataset(entries: &[(&str, &str)]) -> Dataset {
    let mut source = MemoryBlobSource::new();
    for (name, contents) in entries {
        source = source.insert(*name, contents.as_bytes().to_vec());
    }
    Dataset::new()
        .with_gtfs(&Gtfs::new(Box::new(source)))
        .expect("dataset should build")
}
