use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use listshare::ingest::{normalize_batch, parse_generated_batch, DEFAULT_GENERATED_PRICE, MAX_GENERATED_ITEMS};
use listshare::store::MemoryIdentityStore;
use listshare::{IdentityService, ScopeResolver};
use std::sync::Arc;
use tokio::runtime::Runtime;

fn generated_reply(elements: usize) -> String {
  let body: Vec<String> = (0..elements)
    .map(|i| match i % 3 {
      0 => format!(r#"{{"name": "item {i}", "category": "Food", "price": {i}}}"#),
      1 => format!(r#"{{"name": "item {i}", "category": "Gıda", "price": "{i},50 TL"}}"#),
      _ => format!(r#"{{"name": "item {i}", "category": "unknown", "price": "n/a"}}"#),
    })
    .collect();
  format!("```json\n[{}]\n```", body.join(",\n"))
}

fn bench_parse_and_normalize(c: &mut Criterion) {
  let mut group = c.benchmark_group("ParseAndNormalize");
  for elements in [1usize, 10, 50].iter() {
    let reply = generated_reply(*elements);
    group.throughput(Throughput::Elements(*elements as u64));
    group.bench_with_input(BenchmarkId::from_parameter(elements), &reply, |b, reply| {
      b.iter(|| {
        let parsed = parse_generated_batch(criterion::black_box(reply)).unwrap();
        criterion::black_box(normalize_batch(&parsed, DEFAULT_GENERATED_PRICE, MAX_GENERATED_ITEMS))
      })
    });
  }
  group.finish();
}

fn bench_scope_resolution(c: &mut Criterion) {
  let mut group = c.benchmark_group("ScopeResolution");
  let rt = Runtime::new().unwrap();

  for partners in [0usize, 5, 50].iter() {
    let store = Arc::new(MemoryIdentityStore::new());
    let identities = IdentityService::new(store.clone());
    let resolver = ScopeResolver::new(store);

    let viewer_id = rt.block_on(async {
      let viewer = identities.register("viewer@example.com", None, "h".into()).await.unwrap();
      for i in 0..*partners {
        let email = format!("partner{i}@example.com");
        identities.register(&email, None, "h".into()).await.unwrap();
        identities.share_link(viewer.id, &email).await.unwrap();
      }
      viewer.id
    });

    group.bench_with_input(BenchmarkId::from_parameter(partners), partners, |b, _| {
      b.to_async(&rt).iter(|| {
        let resolver = resolver.clone();
        async move { resolver.resolve(viewer_id).await.unwrap() }
      })
    });
  }
  group.finish();
}

criterion_group!(benches, bench_parse_and_normalize, bench_scope_resolution);
criterion_main!(benches);
