use criterion::black_box;
use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;
use regex::Regex;
use std::convert::TryFrom;
use vaxel::event::Event;

const FRAMES: [&str; 5] = [
    "666|F|60|50",
    "1|U|12|9",
    "542532|B",
    "43|P|32|56",
    "634|S|32",
];

fn regex_parse(input: &str, patterns: &[Regex; 5]) -> (i64, Option<i64>, Option<i64>) {
    for pattern in patterns {
        if let Some(captures) = pattern.captures(input) {
            let field = |i: usize| captures.get(i).map(|m| m.as_str().parse().unwrap());
            return (field(1).unwrap(), field(2), field(3));
        }
    }
    panic!("no pattern matched `{}`", input);
}

fn struct_parse(input: &str) -> Event {
    Event::try_from(input.to_string()).unwrap()
}

fn criterion_benchmark(c: &mut Criterion) {
    let patterns = [
        Regex::new(r"^(\d+)\|F\|(\d+)\|(\d+)$").unwrap(),
        Regex::new(r"^(\d+)\|U\|(\d+)\|(\d+)$").unwrap(),
        Regex::new(r"^(\d+)\|B$").unwrap(),
        Regex::new(r"^(\d+)\|P\|(\d+)\|(\d+)$").unwrap(),
        Regex::new(r"^(\d+)\|S\|(\d+)$").unwrap(),
    ];

    let mut group = c.benchmark_group("Parse one frame of each kind");
    group.bench_function("regex parse", |b| {
        b.iter(|| {
            for frame in &FRAMES {
                regex_parse(black_box(frame), &patterns);
            }
        })
    });
    group.bench_function("struct parse", |b| {
        b.iter(|| {
            for frame in &FRAMES {
                struct_parse(black_box(frame));
            }
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
