//! Repository performance benchmarks.
//!
//! Measures listing, child scans and reopening over a thousand-ticket tree.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use pyticket_lib::{ListFilters, Repository, Status};
use tempfile::TempDir;

const ROOTS: usize = 10;
const CHILDREN: usize = 10;
const GRANDCHILDREN: usize = 9;

/// Ten roots, each with ten children holding nine grandchildren (1000 tickets).
fn populated_repository() -> (TempDir, Repository) {
    let temp = TempDir::new().expect("temp dir");
    let mut repo = Repository::create(temp.path()).expect("create repository");
    let tags = vec!["bench".to_string()];
    for r in 0..ROOTS {
        let root = format!("root{r}");
        repo.create_ticket(&root, Status::Opened, &tags, false)
            .expect("create root");
        for c in 0..CHILDREN {
            let child = format!("{root}.child{c}");
            repo.create_ticket(&child, Status::Opened, &[], false)
                .expect("create child");
            for g in 0..GRANDCHILDREN {
                let status = if g % 2 == 0 {
                    Status::Closed
                } else {
                    Status::Opened
                };
                repo.create_ticket(&format!("{child}.leaf{g}"), status, &[], false)
                    .expect("create leaf");
            }
        }
    }
    (temp, repo)
}

fn bench_list(c: &mut Criterion) {
    let (_temp, repo) = populated_repository();
    let mut group = c.benchmark_group("list");

    group.bench_function("all", |b| {
        b.iter(|| repo.list_tickets(black_box(&ListFilters::default())).map(|t| t.len()));
    });

    let filters = ListFilters::default()
        .with_root("root5")
        .with_status(Status::Closed);
    group.bench_function("subtree_closed", |b| {
        b.iter(|| repo.list_tickets(black_box(&filters)).map(|t| t.len()));
    });

    group.finish();
}

fn bench_children(c: &mut Criterion) {
    let (_temp, repo) = populated_repository();
    let mut group = c.benchmark_group("children");

    group.bench_function("direct", |b| {
        b.iter(|| repo.ticket_children(black_box("root3"), false).len());
    });
    group.bench_function("recursive", |b| {
        b.iter(|| repo.ticket_children(black_box("root3"), true).len());
    });

    group.finish();
}

fn bench_open(c: &mut Criterion) {
    let (temp, _repo) = populated_repository();
    c.bench_function("open_1000", |b| {
        b.iter(|| Repository::open(black_box(temp.path())).map(|r| r.len()));
    });
}

criterion_group!(benches, bench_list, bench_children, bench_open);
criterion_main!(benches);
