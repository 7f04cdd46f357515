use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use eeprom_fifo::{Fifo, FifoConfig, RamMedium};

const RECORD: &[u8] = b"sixteen byte rec";

fn bench_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_pop");

    for region_len in [64usize, 128, 256] {
        group.throughput(Throughput::Elements(1));

        group.bench_with_input(BenchmarkId::new("push_then_pop", region_len), &region_len, |b, &region_len| {
            let mut fifo = Fifo::new(RamMedium::new(region_len), FifoConfig::default()).unwrap();
            fifo.format().unwrap();
            let mut dst = [0u8; 64];

            b.iter(|| {
                if fifo.push(black_box(RECORD)).is_err() {
                    // Ring filled: drain one record to make room and retry.
                    let mut len = dst.len();
                    fifo.pop(&mut dst, &mut len).unwrap();
                    fifo.push(RECORD).unwrap();
                }
                let mut len = dst.len();
                fifo.pop(&mut dst, &mut len).unwrap();
                black_box(&dst[..len]);
            });
        });
    }

    group.finish();
}

fn bench_fill_then_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_then_drain");
    group.throughput(Throughput::Bytes(RECORD.len() as u64));

    group.bench_function("256_byte_ring", |b| {
        b.iter(|| {
            let mut fifo = Fifo::new(RamMedium::new(256), FifoConfig::default()).unwrap();
            fifo.format().unwrap();
            let mut pushed = 0u64;
            while fifo.push(RECORD).is_ok() {
                pushed += 1;
            }
            let mut dst = [0u8; 64];
            for _ in 0..pushed {
                let mut len = dst.len();
                fifo.pop(&mut dst, &mut len).unwrap();
                black_box(&dst[..len]);
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_push_pop, bench_fill_then_drain);
criterion_main!(benches);
