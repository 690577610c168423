use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use doppelganger::{bind_constant_return, Class, DoubleClass, Value};

const NO_ARGS: &[Value] = &[];

fn class_with_members(count: usize) -> Arc<Class> {
    let mut builder = Class::builder("Bench").initializer(|this, _| {
        this.set("state", 1)?;
        Ok(Value::Null)
    });
    for i in 0..count {
        builder = builder
            .member(format!("member_{i}"), i64::try_from(i).unwrap_or_default())
            .method(format!("method_{i}"), |_, _| Ok(Value::Null));
    }
    builder.build()
}

fn bench_instantiate(c: &mut Criterion) {
    let mut group = c.benchmark_group("instantiate");

    for count in [4usize, 32, 256] {
        let base = class_with_members(count);
        let doppel = DoubleClass::doppel(&base);
        let mock = DoubleClass::mock(&base);
        doppel.declare_untouchable("member_0").unwrap();
        mock.declare_untouchable("member_0").unwrap();

        group.throughput(Throughput::Elements(count as u64 * 2));
        group.bench_with_input(BenchmarkId::new("plain", count), &base, |b, base| {
            b.iter(|| Class::instantiate(black_box(base), &[]).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("doppel", count), &doppel, |b, double| {
            b.iter(|| double.instantiate(black_box(NO_ARGS)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("mock", count), &mock, |b, double| {
            b.iter(|| double.instantiate(black_box(NO_ARGS)).unwrap());
        });
    }

    group.finish();
}

fn bench_nested(c: &mut Criterion) {
    let base = class_with_members(32);
    let inner = DoubleClass::doppel(&base);
    let outer = DoubleClass::mock(inner.class());

    c.bench_function("instantiate/nested_32", |b| {
        b.iter(|| outer.instantiate(black_box(NO_ARGS)).unwrap());
    });
}

fn bench_patch(c: &mut Criterion) {
    let double = DoubleClass::doppel(&class_with_members(4));
    let obj = double.instantiate(&[]).unwrap();

    c.bench_function("patch/constant_return_call", |b| {
        b.iter(|| {
            bind_constant_return(&obj, "method_0", 42).unwrap();
            obj.call(black_box("method_0"), &[]).unwrap()
        });
    });
}

criterion_group!(benches, bench_instantiate, bench_nested, bench_patch);
criterion_main!(benches);
