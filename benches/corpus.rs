use std::fs;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tempfile::tempdir;
use wlpclean::{
    CleanConfig, Cleaner, CorpusRunner, Overrides, SegmenterConfig, Settings, default_annotators,
};

fn document(sentences: usize) -> String {
    let mut doc = String::from("@@bench\tfic\n");
    for i in 0..sentences {
        doc.push_str("Mr.\tmr.\tnnb\nSmith\tsmith\tnp1\n");
        match i % 4 {
            0 => doc.push_str("barked;loudly\tx\tx\n"),
            1 => doc.push_str("went\tgo\tvvd\nhome.Then\thome.then\tnn1\n"),
            _ => doc.push_str("walked\twalk\tvvd\n"),
        }
        doc.push_str(".\t.\ty\n");
    }
    doc
}

fn bench_document(c: &mut Criterion) {
    let annotators = default_annotators(&SegmenterConfig::default()).expect("default segmenter");
    let cleaner = Cleaner::new(CleanConfig::default(), annotators).expect("valid config");
    let mut group = c.benchmark_group("reference_annotators");

    for sentences in [16usize, 256, 2048] {
        let text = document(sentences);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(sentences), &text, |b, text| {
            b.iter(|| {
                cleaner
                    .clean_text(black_box("bench"), black_box(text))
                    .expect("clean")
            })
        });
    }

    group.finish();
}

fn bench_corpus(c: &mut Criterion) {
    let input = tempdir().expect("input dir");
    for i in 0..64 {
        let path = input
            .path()
            .join(format!("{}0s/fic_{i}.txt", 180 + i % 8));
        fs::create_dir_all(path.parent().expect("nested path")).expect("mkdir");
        fs::write(&path, document(64)).expect("write fixture");
    }

    let mut group = c.benchmark_group("corpus");
    group.sample_size(10);
    for jobs in [1usize, 4] {
        let settings = Settings::default()
            .with_overrides(&Overrides {
                jobs: Some(jobs),
                ..Default::default()
            })
            .expect("valid settings");
        let runner = CorpusRunner::new(&settings).expect("runner");
        group.bench_function(format!("jobs_{jobs}"), |b| {
            b.iter(|| {
                let output = tempdir().expect("output dir");
                runner
                    .clean_corpus(input.path(), output.path())
                    .expect("corpus run")
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_document, bench_corpus);
criterion_main!(benches);
