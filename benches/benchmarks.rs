// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use named_slug::{
    Document, MemoryStore, SlugConfig, base_slug, next_suffix, order_siblings, save_record,
};

fn benchmark_base_slug(c: &mut Criterion,)
{
    c.bench_function("base_slug_short", |b| {
        b.iter(|| base_slug(black_box(Some("Hello World",),),),)
    },);

    let long = "Ça <em>marche</em> très bien, über alles!  ".repeat(20,);
    c.bench_function("base_slug_long_markup", |b| {
        b.iter(|| base_slug(black_box(Some(long.as_str(),),),),)
    },);
}

fn benchmark_next_suffix(c: &mut Criterion,)
{
    let mut siblings = vec!["hello-world".to_owned()];
    for i in 1..1000 {
        siblings.push(format!("hello-world-{i}"),);
    }

    c.bench_function("order_1000_siblings", |b| {
        b.iter(|| {
            let mut ordered = siblings.clone();
            order_siblings(&mut ordered,);
            black_box(ordered,)
        },)
    },);

    let mut ordered = siblings.clone();
    order_siblings(&mut ordered,);
    c.bench_function("next_suffix_1000_siblings", |b| {
        b.iter(|| next_suffix(black_box("hello-world",), black_box(&ordered,),),)
    },);
}

fn benchmark_memory_saves(c: &mut Criterion,)
{
    let config = SlugConfig::new("post",).with_source_field("title",).with_slug_field("slug",);

    c.bench_function("save_100_identical_titles", |b| {
        b.iter(|| {
            let mut store = MemoryStore::new(&config,);
            for _ in 0..100 {
                let mut record = Document::from_fields([("title", "Hello World",)],);
                save_record(&config, &mut record, &mut store,).expect("save failed",);
            }
            black_box(store.len(),)
        },)
    },);
}

criterion_group!(benches, benchmark_base_slug, benchmark_next_suffix, benchmark_memory_saves);
criterion_main!(benches);
