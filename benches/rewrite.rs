use criterion::{black_box, criterion_group, criterion_main, Criterion};
use url::Url;
use yyyymmdd::{DateNormalizer, Dispatcher, Page, SiteRuleTable};

pub fn bench(c: &mut Criterion) {
    let normalizer = DateNormalizer::utc();
    let text = "Posted on Jan 5, 2021 by someone, edited 12th September 2021 and again Dec 3";
    c.bench_function("fix_text", |b| b.iter(|| normalizer.fix_text(black_box(text))));
    c.bench_function("date_fmt", |b| {
        b.iter(|| normalizer.date_fmt(black_box("2023-11-14T22:13:20Z")))
    });

    let html = include_str!("../resources/tests/hackernews.html").to_string();
    let url = Url::parse("https://news.ycombinator.com/news").unwrap();
    let site_rules = SiteRuleTable::parse(None);
    c.bench_function("dispatch", |b| {
        b.iter(|| dispatch(&url, black_box(&html), site_rules.clone()))
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench
}
criterion_main!(benches);

fn dispatch(url: &Url, html: &str, site_rules: SiteRuleTable) -> String {
    let mut page = Page::parse(url, html).unwrap();
    let mut dispatcher = Dispatcher::new(site_rules, DateNormalizer::utc());
    dispatcher.run(&mut page);
    page.to_html()
}
