//! Criterion benchmarks for the resolver core.
//!
//! Run with: `cargo bench`
//!
//! Uses a synthetic in-memory index so results do not depend on a checkout.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use grpcnav::{
    candidates, derive_base_name, CallSite, CandidateOrder, MemoryIndex, Resolver, ResolverConfig,
    SuffixPolicy,
};

// ─── Helpers ─────────────────────────────────────────────────────────

/// `num_services` services, each with a generated ImplBase, a server
/// implementation covering half the methods, and a client class.
fn build_synthetic_index(num_services: usize, methods_per_service: usize) -> MemoryIndex {
    let mut index = MemoryIndex::new();
    for s in 0..num_services {
        let service = format!("Service{}", s);
        let methods: Vec<String> = (0..methods_per_service).map(|m| format!("call{}", m)).collect();
        let method_refs: Vec<&str> = methods.iter().map(|m| m.as_str()).collect();
        let half = &method_refs[..methods_per_service / 2];

        let base = format!("gen.{}Grpc.{}ImplBase", service, service);
        index.add_class(&base, None, &[], &method_refs);
        let base_simple = format!("{}ImplBase", service);
        index.add_class(
            &format!("server.{}GrpcService", service),
            None,
            &[base_simple.as_str()],
            half,
        );
        index.add_class(&format!("client.{}Client", service), None, &[], &["connect"]);
    }
    index
}

// ─── Benchmarks ──────────────────────────────────────────────────────

fn bench_derive_base_name(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_base_name");
    for receiver in ["orderStub", "OrderServiceBlockingStub", "paymentsClient"] {
        group.bench_with_input(BenchmarkId::from_parameter(receiver), receiver, |b, r| {
            b.iter(|| black_box(derive_base_name(black_box(r), SuffixPolicy::RequireStub)))
        });
    }
    group.finish();
}

fn bench_candidates(c: &mut Criterion) {
    let mut group = c.benchmark_group("candidates");
    for &size in &[100usize, 1_000, 10_000] {
        let index = build_synthetic_index(size, 8);
        for order in [CandidateOrder::Index, CandidateOrder::Lexicographic] {
            let config = ResolverConfig { order, ..ResolverConfig::default() };
            group.bench_with_input(
                BenchmarkId::new(order.as_str(), size),
                &config,
                |b, config| b.iter(|| black_box(candidates(&index, "service4", config).len())),
            );
        }
    }
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    let index = build_synthetic_index(2_000, 10);
    let resolver = Resolver::new(&index, ResolverConfig::default());

    // declared on the server implementation
    let direct = CallSite::new("service1234Stub", "call1");
    group.bench_function("grpc_service_hit", |b| b.iter(|| black_box(resolver.resolve(&direct))));

    // only on the ImplBase, found after the GrpcService tier misses
    let fallback = CallSite::new("service1234Stub", "call9");
    group.bench_function("impl_base_fallback", |b| b.iter(|| black_box(resolver.resolve(&fallback))));

    let miss = CallSite::new("missingStub", "call1");
    group.bench_function("no_candidates", |b| b.iter(|| black_box(resolver.resolve(&miss))));

    group.finish();
}

criterion_group!(benches, bench_derive_base_name, bench_candidates, bench_resolve);
criterion_main!(benches);
